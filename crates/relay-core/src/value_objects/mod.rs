//! Value objects - immutable domain primitives

mod direct_key;
mod snowflake;

pub use direct_key::direct_key;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
