//! TMetric adapter.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use timebill_shared::types::ContractorId;
use tracing::debug;

use super::{ReportQuery, ReportSource, SourceError};
use crate::generated::{Definition, GenericReport, RoleType, TimeEntry};

/// Activity id used for entries without a mapped tag.
pub const DEFAULT_ACTIVITY: &str = "default";
/// Project id used for entries without a project.
pub const NO_PROJECT: &str = "no-project";
/// Task id used for entries without a task.
pub const NO_TASK: &str = "no-task";

/// Named tracker object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmetricRef {
    /// Tracker id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// Time entry as returned by the TMetric API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TmetricTimeEntry {
    /// Tracker id.
    pub id: i64,
    /// Timer start.
    pub start_time: DateTime<Utc>,
    /// Missing while the timer is running.
    pub end_time: Option<DateTime<Utc>>,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
    /// Project, if assigned.
    #[serde(default)]
    pub project: Option<TmetricRef>,
    /// Task, if assigned.
    #[serde(default)]
    pub task: Option<TmetricRef>,
    /// Tags; the first mapped one picks the activity.
    #[serde(default)]
    pub tags: Vec<TmetricRef>,
}

/// Raw access to a TMetric account.
#[async_trait]
pub trait TmetricApi: Send + Sync {
    /// Entries starting within the period.
    async fn time_entries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TmetricTimeEntry>, SourceError>;
}

/// How tracker entries map onto report ids.
#[derive(Debug, Clone)]
pub struct TmetricMapping {
    /// Contractor owning the tracker account.
    pub contractor_id: ContractorId,
    /// Role every entry is reported under.
    pub role_id: String,
    /// Definition of that role, with its rates.
    pub role: RoleType,
    /// Activity id per tag name; the first mapped tag of an entry wins.
    pub activity_by_tag: BTreeMap<String, String>,
}

impl TmetricMapping {
    fn activity<'a>(&'a self, entry: &'a TmetricTimeEntry) -> (&'a str, &'a str) {
        entry
            .tags
            .iter()
            .find_map(|tag| {
                self.activity_by_tag
                    .get(&tag.name)
                    .map(|id| (id.as_str(), tag.name.as_str()))
            })
            .unwrap_or((DEFAULT_ACTIVITY, "Default"))
    }
}

/// Converts tracker entries into a generated report.
///
/// # Errors
///
/// Returns [`SourceError::InvalidEntry`] for a running entry (no end time) or
/// one that ends before it starts.
pub fn convert_entries(
    entries: &[TmetricTimeEntry],
    mapping: &TmetricMapping,
) -> Result<GenericReport, SourceError> {
    let mut report = GenericReport::default();
    let definitions = &mut report.definitions;
    definitions
        .role_types
        .insert(mapping.role_id.clone(), mapping.role.clone());

    for entry in entries {
        let invalid = |reason| SourceError::InvalidEntry {
            entry_id: entry.id.to_string(),
            reason,
        };
        let end_at = entry.end_time.ok_or_else(|| invalid("missing end time"))?;
        if end_at < entry.start_time {
            return Err(invalid("ends before it starts"));
        }

        let project_id = define(&mut definitions.project_types, entry.project.as_ref(), NO_PROJECT);
        let task_id = define(&mut definitions.task_types, entry.task.as_ref(), NO_TASK);
        let (activity_id, activity_name) = mapping.activity(entry);
        definitions
            .activity_types
            .entry(activity_id.to_string())
            .or_insert_with(|| Definition {
                name: activity_name.to_string(),
                description: String::new(),
            });

        report.time_entries.push(TimeEntry {
            id: entry.id.to_string(),
            note: entry.note.clone(),
            task_id,
            activity_id: activity_id.to_string(),
            project_id,
            role_id: mapping.role_id.clone(),
            contractor_id: mapping.contractor_id,
            start_at: entry.start_time,
            end_at,
        });
    }

    Ok(report)
}

fn define(
    definitions: &mut BTreeMap<String, Definition>,
    reference: Option<&TmetricRef>,
    fallback: &str,
) -> String {
    let Some(reference) = reference else {
        return fallback.to_string();
    };
    let id = reference.id.to_string();
    definitions.entry(id.clone()).or_insert_with(|| Definition {
        name: reference.name.clone(),
        description: String::new(),
    });
    id
}

/// Report source backed by a TMetric account.
pub struct TmetricPlugin<A> {
    api: A,
    mapping: TmetricMapping,
}

impl<A: TmetricApi> TmetricPlugin<A> {
    /// Creates a source reading `api` and mapping entries with `mapping`.
    pub const fn new(api: A, mapping: TmetricMapping) -> Self {
        Self { api, mapping }
    }
}

#[async_trait]
impl<A: TmetricApi> ReportSource for TmetricPlugin<A> {
    fn name(&self) -> &'static str {
        "tmetric"
    }

    async fn get_report(&self, query: &ReportQuery) -> Result<GenericReport, SourceError> {
        if query.period_start > query.period_end {
            return Err(SourceError::InvalidPeriod {
                start: query.period_start,
                end: query.period_end,
            });
        }
        let entries = self
            .api
            .time_entries(query.period_start, query.period_end)
            .await?;
        debug!(entries = entries.len(), "Fetched TMetric entries");
        convert_entries(&entries, &self.mapping)
    }
}
