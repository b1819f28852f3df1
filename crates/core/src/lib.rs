//! Core business logic for Timebill.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence and third-party trackers sit behind traits the caller implements.
//!
//! # Modules
//!
//! - `generated` - Time-tracking reports as produced by a tracker
//! - `rates` - Role rate resolution
//! - `facts` - Derivation of proposed reports, costs, billings and links
//! - `preview` - Matching facts against persisted entities
//! - `reconciliation` - Loading inputs and executing previews
//! - `cube` - Hierarchical group-by and aggregation over tabular data
//! - `source` - Report source adapters
//! - `currency` - Rounding and exchange rates

pub mod cube;
pub mod currency;
pub mod entities;
pub mod facts;
pub mod generated;
pub mod preview;
pub mod rates;
pub mod reconciliation;
pub mod remote;
pub mod source;

#[cfg(test)]
mod test_support;
