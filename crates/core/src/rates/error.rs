//! Rate resolution error types.

use thiserror::Error;

/// Errors that can occur while resolving a rate for a time entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// The entry references a role with no definition.
    #[error("Role type not found: {0}")]
    RoleTypeNotFound(String),

    /// No rate of the role matches the entry.
    #[error(
        "No matching rate for role {role_id} (activity {activity_id}, task {task_id}, project {project_id})"
    )]
    NoMatchingRate {
        /// Role id.
        role_id: String,
        /// Entry activity id.
        activity_id: String,
        /// Entry task id.
        task_id: String,
        /// Entry project id.
        project_id: String,
    },
}
