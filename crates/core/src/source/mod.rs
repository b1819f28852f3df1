//! Time-tracking report sources.
//!
//! A source pulls raw entries from a third-party tracker and adapts them to
//! the [`GenericReport`] shape fact derivation consumes. Transport and
//! authentication belong to the implementor of the source's API trait.

pub mod tmetric;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use timebill_shared::AppError;

use crate::generated::GenericReport;

pub use tmetric::{TmetricApi, TmetricMapping, TmetricPlugin, TmetricTimeEntry};

/// Period a report is pulled for, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportQuery {
    /// First day.
    pub period_start: NaiveDate,
    /// Last day.
    pub period_end: NaiveDate,
}

/// Errors that can occur while pulling a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// An entry cannot be turned into a time entry.
    #[error("Invalid time entry {entry_id}: {reason}")]
    InvalidEntry {
        /// Tracker id of the entry.
        entry_id: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The query period is empty.
    #[error("Invalid period: {start} is after {end}")]
    InvalidPeriod {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// The tracker could not be queried.
    #[error("Tracker request failed: {0}")]
    Api(String),
}

impl From<SourceError> for AppError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Api(_) => Self::ExternalService(error.to_string()),
            _ => Self::Validation(error.to_string()),
        }
    }
}

/// Something that produces generated reports.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Short identifier of the tracker.
    fn name(&self) -> &'static str;

    /// Pulls the report for a period.
    async fn get_report(&self, query: &ReportQuery) -> Result<GenericReport, SourceError>;
}
