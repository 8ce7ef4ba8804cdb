//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod admin;
pub mod channels;
pub mod health;
pub mod messages;
pub mod presence;
pub mod unread;
