//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod access;
pub mod admin;
pub mod channel;
pub mod context;
pub mod error;
pub mod message;
pub mod presence;
pub mod unread;

// Re-export all services for convenience
pub use access::AccessGuard;
pub use admin::AdminService;
pub use channel::{ChannelService, CreateChannelOutcome};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use message::MessageService;
pub use presence::PresenceService;
pub use unread::UnreadService;
