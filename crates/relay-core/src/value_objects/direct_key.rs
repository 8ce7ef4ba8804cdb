//! Canonical key for the two members of a direct channel
//!
//! Direct channels must be unique per unordered user pair. The key is the
//! pair serialized as "min:max", stored on the channel row under a unique
//! index so concurrent double-creation collapses to one row at the
//! database level.

use crate::value_objects::Snowflake;

/// Build the canonical member-pair key for a direct channel.
///
/// The key is identical regardless of argument order.
pub fn direct_key(a: Snowflake, b: Snowflake) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}:{hi}")
}
