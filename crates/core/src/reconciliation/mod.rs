//! Reconciliation of generated reports against persisted entities.
//!
//! - [`calculate_reconciliation_view`] is the pure preview calculation
//! - [`ReconciliationService`] loads inputs from a [`ReconciliationDataSource`]
//!   and executes previews through a [`MutationService`]

pub mod error;
pub mod ports;
pub mod service;
pub mod view;


pub use error::ReconciliationError;
pub use ports::{DataSourceError, MutationError, MutationService, ReconciliationDataSource};
pub use service::{ExecutionReport, MutationAction, MutationStep, ReconciliationService};
pub use view::{
    ReconciliationInput, calculate_reconciliation_view, calculate_reconciliation_view_with_rates,
};
