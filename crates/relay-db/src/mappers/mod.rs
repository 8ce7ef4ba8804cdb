//! Entity to model mappers
//!
//! Conversions between domain entities (relay-core) and database models:
//! `From<Model> for Entity` turns rows into domain objects. Inserts and
//! updates bind entity fields directly in the repositories.

mod channel;
mod membership;
mod message;
mod status;
mod user;
