//! Domain entities - core business objects

mod channel;
mod membership;
mod message;
mod status;
mod user;

pub use channel::Channel;
pub use membership::Membership;
pub use message::{Message, MAX_CONTENT_CHARS};
pub use status::Status;
pub use user::{User, UserRole, ONLINE_WINDOW_SECS};
