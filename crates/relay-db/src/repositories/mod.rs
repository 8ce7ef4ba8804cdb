//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in relay-core.
//! Each repository handles database operations for a specific domain entity.

mod channel;
mod error;
mod membership;
mod message;
mod status;
mod user;

pub use channel::PgChannelRepository;
pub use membership::PgMembershipRepository;
pub use message::PgMessageRepository;
pub use status::PgStatusRepository;
pub use user::PgUserRepository;
