//! Preview matching error types.

use thiserror::Error;
use timebill_shared::types::FactId;

use crate::facts::FactKind;

/// Errors that can occur while matching facts to existing entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    /// A link fact points at a fact that has no preview.
    #[error("Link references {kind} fact {fact} which has no preview")]
    UnresolvedFact {
        /// Kind of the missing fact.
        kind: FactKind,
        /// Id of the missing fact.
        fact: FactId,
    },
}
