//! Rate resolution.
//!
//! Picks the single most specific rate rule of a role for a time entry and
//! derives the signature used to group entries billed at the same rate.

pub mod error;
pub mod matching;

#[cfg(test)]
mod matching_props;

pub use error::RateError;
pub use matching::{get_matching_rate, rate_signature, specificity};
