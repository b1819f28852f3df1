//! Fixtures shared by unit tests.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use timebill_shared::types::{
    ClientId, ContractorId, Currency, ProjectId, ProjectIterationId, WorkspaceId,
};

use crate::currency::FixedParity;
use crate::entities::{Project, ProjectIteration};
use crate::facts::{DerivationContext, Fact, FactSet, SequentialUuids, convert_generated_report_to_facts};
use crate::generated::{Definition, GenericReport, RoleRate, RoleType, TimeEntry};

pub fn rate(
    activities: &[&str],
    cost: Decimal,
    cost_currency: Currency,
    billing: Decimal,
    billing_currency: Currency,
) -> RoleRate {
    RoleRate {
        activity_types: activities.iter().map(ToString::to_string).collect(),
        task_types: Vec::new(),
        project_ids: Vec::new(),
        cost_rate: cost,
        cost_currency,
        billing_rate: billing,
        billing_currency,
    }
}

pub fn report_with_rates(rates: Vec<RoleRate>) -> GenericReport {
    let mut report = GenericReport::default();
    report.definitions.role_types = BTreeMap::from([(
        "dev".to_string(),
        RoleType {
            name: "Developer".to_string(),
            description: String::new(),
            rates,
        },
    )]);
    report.definitions.activity_types = BTreeMap::from([
        ("coding".to_string(), Definition { name: "Coding".to_string(), description: String::new() }),
        ("meeting".to_string(), Definition { name: "Meeting".to_string(), description: String::new() }),
    ]);
    report
}

/// Entry of `minutes` starting at 09:00 on May `day` 2024.
pub fn entry(id: &str, contractor: i64, activity: &str, day: u32, minutes: i64) -> TimeEntry {
    let start = Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap();
    TimeEntry {
        id: id.to_string(),
        note: None,
        task_id: "task-1".to_string(),
        activity_id: activity.to_string(),
        project_id: "proj-1".to_string(),
        role_id: "dev".to_string(),
        contractor_id: ContractorId::new(contractor),
        start_at: start,
        end_at: start + chrono::Duration::minutes(minutes),
    }
}

pub fn iteration() -> ProjectIteration {
    ProjectIteration {
        id: ProjectIterationId::new(7),
        project_id: ProjectId::new(3),
        ordinal_number: 5,
        period_start: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        period_end: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        currency: Currency::EUR,
    }
}

pub fn project(workspaces: &[i64]) -> Project {
    Project {
        id: ProjectId::new(3),
        name: "Apollo".to_string(),
        client_id: ClientId::new(11),
        workspace_ids: workspaces.iter().copied().map(WorkspaceId::new).collect(),
    }
}

pub fn names() -> HashMap<ContractorId, String> {
    HashMap::from([
        (ContractorId::new(1), "Ann Lee".to_string()),
        (ContractorId::new(2), "Bo Chen".to_string()),
    ])
}

/// Derives facts with sequential ids and no contractor workspace overrides.
pub fn derive(
    report: &GenericReport,
    project: &Project,
    workspaces: &HashMap<ContractorId, WorkspaceId>,
) -> Vec<Fact> {
    let iteration = iteration();
    let names = names();
    let ctx = DerivationContext {
        report,
        iteration: &iteration,
        project,
        contractor_workspaces: workspaces,
        contractor_names: &names,
        unit: "h",
        exchange_rates: &FixedParity,
    };
    convert_generated_report_to_facts(&ctx, &SequentialUuids::new())
}

pub fn derive_set(
    report: &GenericReport,
    project: &Project,
    workspaces: &HashMap<ContractorId, WorkspaceId>,
) -> FactSet {
    derive(report, project, workspaces).into_iter().collect()
}
