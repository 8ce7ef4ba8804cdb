//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod membership;
mod message;
mod status;
mod user;

pub use channel::ChannelModel;
pub use membership::MembershipModel;
pub use message::MessageModel;
pub use status::StatusModel;
pub use user::UserModel;
