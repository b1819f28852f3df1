//! Generated report data types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use timebill_shared::types::{ContractorId, Currency, GeneratedReportId, ProjectIterationId};

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// A stored generated report for one project iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    /// Report id.
    pub id: GeneratedReportId,
    /// Iteration the report was generated for.
    pub project_iteration_id: ProjectIterationId,
    /// When the report was pulled from the time tracker.
    pub created_at: DateTime<Utc>,
    /// Report contents.
    pub data: GenericReport,
}

/// Time entries plus the definitions they reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericReport {
    /// Definitions keyed by their ids.
    pub definitions: ReportDefinitions,
    /// Recorded work intervals.
    pub time_entries: Vec<TimeEntry>,
}

/// Definitions referenced by time entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinitions {
    /// Task types.
    #[serde(default)]
    pub task_types: BTreeMap<String, Definition>,
    /// Activity types.
    #[serde(default)]
    pub activity_types: BTreeMap<String, Definition>,
    /// Project types.
    #[serde(default)]
    pub project_types: BTreeMap<String, Definition>,
    /// Role types with their rates.
    #[serde(default)]
    pub role_types: BTreeMap<String, RoleType>,
}

/// Named task, activity or project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A contractor role and the rates that apply to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleType {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Candidate rate rules, in priority order for ties.
    #[serde(default)]
    pub rates: Vec<RoleRate>,
}

/// A rate rule attached to a role.
///
/// Empty id lists match everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleRate {
    /// Activity ids this rate applies to.
    #[serde(default)]
    pub activity_types: Vec<String>,
    /// Task ids this rate applies to.
    #[serde(default)]
    pub task_types: Vec<String>,
    /// Project ids this rate applies to.
    #[serde(default)]
    pub project_ids: Vec<String>,
    /// Internal cost per hour.
    pub cost_rate: Decimal,
    /// Currency of the cost rate.
    pub cost_currency: Currency,
    /// External billing per hour.
    pub billing_rate: Decimal,
    /// Currency of the billing rate.
    pub billing_currency: Currency,
}

/// One recorded work interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    /// Entry id in the source system.
    pub id: String,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
    /// Task id.
    pub task_id: String,
    /// Activity id.
    pub activity_id: String,
    /// Project id.
    pub project_id: String,
    /// Role id.
    pub role_id: String,
    /// Contractor who did the work.
    pub contractor_id: ContractorId,
    /// Start of the interval.
    pub start_at: DateTime<Utc>,
    /// End of the interval.
    pub end_at: DateTime<Utc>,
}

impl TimeEntry {
    /// Duration in hours, unrounded.
    #[must_use]
    pub fn duration_hours(&self) -> Decimal {
        let millis = (self.end_at - self.start_at).num_milliseconds();
        Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR)
    }
}
