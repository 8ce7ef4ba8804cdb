//! # relay-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain errors.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Channel, Membership, Message, Status, User, UserRole, MAX_CONTENT_CHARS, ONLINE_WINDOW_SECS,
};
pub use error::DomainError;
pub use traits::{
    AttachmentStore, ChannelRepository, MembershipRepository, MessagePage, MessageQuery,
    MessageRepository, RepoResult, StatusRepository, UserFilter, UserRepository,
};
pub use value_objects::{direct_key, Snowflake, SnowflakeGenerator, SnowflakeParseError};
