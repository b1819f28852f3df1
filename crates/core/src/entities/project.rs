//! Projects and their billing periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use timebill_shared::types::{ClientId, Currency, ProjectId, ProjectIterationId, WorkspaceId};

/// A client project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project id.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Client billed for this project.
    pub client_id: ClientId,
    /// Workspaces the project is run from; the first is the default.
    #[serde(default)]
    pub workspace_ids: Vec<WorkspaceId>,
}

impl Project {
    /// Returns the default workspace, if any.
    #[must_use]
    pub fn default_workspace(&self) -> Option<WorkspaceId> {
        self.workspace_ids.first().copied()
    }
}

/// One billing period of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIteration {
    /// Iteration id.
    pub id: ProjectIterationId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Sequence number within the project.
    pub ordinal_number: u32,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Iteration currency.
    pub currency: Currency,
}

impl ProjectIteration {
    /// Returns true if `[start, end]` overlaps this iteration's period.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.period_end && end >= self.period_start
    }
}
