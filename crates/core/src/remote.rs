//! Loading-state wrapper for asynchronously fetched values.
//!
//! Consumers that re-render as data arrives hold a [`RemoteData`] per input
//! and derive views from it; a view is only computed once every input is
//! available, and a failed calculation becomes a blocking error state.

use std::fmt;
use std::sync::Arc;

use timebill_shared::config::ReconciliationConfig;

use crate::facts::UuidFactory;
use crate::preview::ReconciliationPreview;
use crate::reconciliation::{ReconciliationInput, calculate_reconciliation_view};

/// Error carried by [`RemoteData::Error`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RemoteError {
    message: Arc<str>,
}

impl RemoteError {
    /// Wraps any displayable error.
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string().into(),
        }
    }

    /// Error text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RemoteError {}

/// A value that is not requested yet, loading, failed, or available.
#[derive(Debug, Clone, Default)]
pub enum RemoteData<T> {
    /// Not requested.
    #[default]
    Idle,
    /// Request in flight.
    Pending,
    /// Request failed.
    Error(RemoteError),
    /// Value available.
    Success(T),
}

impl<T> RemoteData<T> {
    /// Wraps a fetch result.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Error(RemoteError::new(error)),
        }
    }

    /// Returns true while the request is in flight.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true when the request failed.
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The value, if available.
    pub const fn success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrows the value, keeping the state.
    pub fn as_ref(&self) -> RemoteData<&T> {
        match self {
            Self::Idle => RemoteData::Idle,
            Self::Pending => RemoteData::Pending,
            Self::Error(e) => RemoteData::Error(e.clone()),
            Self::Success(value) => RemoteData::Success(value),
        }
    }

    /// Transforms an available value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> RemoteData<U> {
        self.and_then(|value| RemoteData::Success(f(value)))
    }

    /// Transforms an available value with a fallible function; failures
    /// become [`RemoteData::Error`].
    pub fn try_map<U, E: fmt::Display>(self, f: impl FnOnce(T) -> Result<U, E>) -> RemoteData<U> {
        self.and_then(|value| RemoteData::from_result(f(value)))
    }

    /// Chains a computation that itself yields remote data.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> RemoteData<U>) -> RemoteData<U> {
        match self {
            Self::Idle => RemoteData::Idle,
            Self::Pending => RemoteData::Pending,
            Self::Error(e) => RemoteData::Error(e),
            Self::Success(value) => f(value),
        }
    }

    /// Combines two values, available only when both are.
    ///
    /// An error on either side wins over loading states, and loading wins
    /// over idle.
    pub fn zip<U>(self, other: RemoteData<U>) -> RemoteData<(T, U)> {
        match (self, other) {
            (Self::Success(a), RemoteData::Success(b)) => RemoteData::Success((a, b)),
            (Self::Error(e), _) | (_, RemoteData::Error(e)) => RemoteData::Error(e),
            (Self::Pending, _) | (_, RemoteData::Pending) => RemoteData::Pending,
            _ => RemoteData::Idle,
        }
    }
}

/// Reconciliation preview for a remote input.
///
/// Loading and failed inputs pass through; a calculation failure becomes an error.
pub fn reconciliation_view(
    input: RemoteData<&ReconciliationInput>,
    ids: &impl UuidFactory,
    config: &ReconciliationConfig,
) -> RemoteData<ReconciliationPreview> {
    input.try_map(|input| calculate_reconciliation_view(input, ids, config))
}
