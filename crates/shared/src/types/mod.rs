//! Common types used across the application.

pub mod id;
pub mod money;

#[cfg(test)]
mod id_tests;
#[cfg(test)]
mod money_tests;

pub use id::*;
pub use money::{Currency, CurrencyError, Money};
