//! Reconciliation error types.

use thiserror::Error;
use timebill_shared::AppError;
use timebill_shared::types::{FactId, ProjectId};

use super::ports::{DataSourceError, MutationError};
use super::service::MutationStep;
use crate::facts::FactKind;
use crate::preview::PreviewError;

/// Errors that abort a reconciliation preview or execution.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// A time entry references a role with no definition.
    #[error("Role type not found: {0}")]
    RoleTypeNotFound(String),

    /// A fact needed the project's default workspace but the project has none.
    #[error("Project {0} has no workspaces")]
    EmptyProjectWorkspaces(ProjectId),

    /// A fact resolved to the `0` workspace placeholder.
    #[error("{kind} fact {fact} has no workspace")]
    MissingWorkspace {
        /// Kind of the fact.
        kind: FactKind,
        /// Fact id.
        fact: FactId,
    },

    /// A link references a fact without a preview.
    #[error("Referenced {kind} fact {fact} has no preview")]
    UnresolvedReference {
        /// Kind of the referenced fact.
        kind: FactKind,
        /// Referenced fact id.
        fact: FactId,
    },

    /// Loading inputs failed.
    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    /// A mutation failed. Earlier steps stay committed.
    #[error("{step} failed after {completed} committed steps: {source}")]
    Mutation {
        /// The failed step.
        step: MutationStep,
        /// Number of steps committed before the failure.
        completed: usize,
        /// Underlying failure.
        #[source]
        source: MutationError,
    },
}

impl From<PreviewError> for ReconciliationError {
    fn from(error: PreviewError) -> Self {
        match error {
            PreviewError::UnresolvedFact { kind, fact } => Self::UnresolvedReference { kind, fact },
        }
    }
}

impl From<ReconciliationError> for AppError {
    fn from(error: ReconciliationError) -> Self {
        let message = error.to_string();
        match error {
            ReconciliationError::RoleTypeNotFound(_) => Self::NotFound(message),
            ReconciliationError::EmptyProjectWorkspaces(_)
            | ReconciliationError::MissingWorkspace { .. } => Self::BusinessRule(message),
            ReconciliationError::UnresolvedReference { .. } => Self::Internal(message),
            ReconciliationError::DataSource(DataSourceError::NotFound { .. }) => {
                Self::NotFound(message)
            }
            ReconciliationError::DataSource(_) | ReconciliationError::Mutation { .. } => {
                Self::ExternalService(message)
            }
        }
    }
}
