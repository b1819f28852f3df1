//! Preview calculation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use timebill_shared::config::ReconciliationConfig;
use timebill_shared::types::{ContractorId, WorkspaceId};
use tracing::{debug, info};

use super::error::ReconciliationError;
use crate::currency::{ExchangeRateLookup, FixedParity};
use crate::entities::{BillingRecord, CostRecord, Project, ProjectIteration, ReportRecord};
use crate::facts::{DerivationContext, FactKind, FactSet, UuidFactory, convert_generated_report_to_facts};
use crate::generated::GenericReport;
use crate::preview::{ExistingEntities, ReconciliationPreview, build_preview};

/// Everything a preview is calculated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationInput {
    /// Generated report contents.
    pub report: GenericReport,
    /// Reports already linked to costs or billings of the iteration.
    #[serde(default)]
    pub existing_reports: Vec<ReportRecord>,
    /// Billings in scope.
    #[serde(default)]
    pub existing_billings: Vec<BillingRecord>,
    /// Costs in scope.
    #[serde(default)]
    pub existing_costs: Vec<CostRecord>,
    /// Iteration being reconciled.
    pub iteration: ProjectIteration,
    /// Project of the iteration.
    pub project: Project,
    /// Workspace per contractor; missing contractors use the project default.
    #[serde(default)]
    pub contractor_workspaces: HashMap<ContractorId, WorkspaceId>,
    /// Contractor display names.
    #[serde(default)]
    pub contractor_names: HashMap<ContractorId, String>,
}

impl ReconciliationInput {
    fn existing(&self) -> ExistingEntities<'_> {
        ExistingEntities {
            reports: &self.existing_reports,
            billings: &self.existing_billings,
            costs: &self.existing_costs,
        }
    }
}

/// Calculates the preview with exchange rates fixed at parity.
///
/// Pure and repeatable: the same input and id sequence yield the same preview.
///
/// # Errors
///
/// See [`calculate_reconciliation_view_with_rates`].
pub fn calculate_reconciliation_view(
    input: &ReconciliationInput,
    ids: &impl UuidFactory,
    config: &ReconciliationConfig,
) -> Result<ReconciliationPreview, ReconciliationError> {
    calculate_reconciliation_view_with_rates(input, ids, config, &FixedParity)
}

/// Calculates the preview, stamping link breakdowns with `exchange_rates`.
///
/// # Errors
///
/// - [`ReconciliationError::RoleTypeNotFound`] if any entry names an undefined role
/// - [`ReconciliationError::EmptyProjectWorkspaces`] if a fact needs the project's
///   default workspace and the project has none
/// - [`ReconciliationError::MissingWorkspace`] if a fact resolved to workspace `0`
/// - [`ReconciliationError::UnresolvedReference`] if a link cannot be resolved
pub fn calculate_reconciliation_view_with_rates(
    input: &ReconciliationInput,
    ids: &impl UuidFactory,
    config: &ReconciliationConfig,
    exchange_rates: &dyn ExchangeRateLookup,
) -> Result<ReconciliationPreview, ReconciliationError> {
    validate_roles(&input.report)?;

    let ctx = DerivationContext {
        report: &input.report,
        iteration: &input.iteration,
        project: &input.project,
        contractor_workspaces: &input.contractor_workspaces,
        contractor_names: &input.contractor_names,
        unit: &config.unit,
        exchange_rates,
    };
    let facts: FactSet = convert_generated_report_to_facts(&ctx, ids).into_iter().collect();
    debug!(
        reports = facts.reports.len(),
        billings = facts.billings.len(),
        costs = facts.costs.len(),
        "Derived facts"
    );

    validate_workspaces(&facts, &input.project)?;

    let preview = build_preview(&facts, input.existing(), config.amount_tolerance)?;
    let summary = preview.summary();
    info!(
        iteration_id = %input.iteration.id,
        reports_created = summary.reports.create,
        reports_updated = summary.reports.update,
        steps = summary.total_steps(),
        "Calculated reconciliation preview"
    );
    Ok(preview)
}

fn validate_roles(report: &GenericReport) -> Result<(), ReconciliationError> {
    let roles = &report.definitions.role_types;
    match report.time_entries.iter().find(|e| !roles.contains_key(&e.role_id)) {
        Some(entry) => Err(ReconciliationError::RoleTypeNotFound(entry.role_id.clone())),
        None => Ok(()),
    }
}

fn validate_workspaces(facts: &FactSet, project: &Project) -> Result<(), ReconciliationError> {
    let unassigned = facts
        .reports
        .iter()
        .filter(|f| f.payload.workspace_id.is_unassigned())
        .map(|f| (FactKind::Report, f.uuid))
        .chain(
            facts
                .costs
                .iter()
                .filter(|f| f.payload.workspace_id.is_unassigned())
                .map(|f| (FactKind::Cost, f.uuid)),
        )
        .chain(
            facts
                .billings
                .iter()
                .filter(|f| f.payload.workspace_id.is_unassigned())
                .map(|f| (FactKind::Billing, f.uuid)),
        )
        .next();

    match unassigned {
        None => Ok(()),
        Some(_) if project.workspace_ids.is_empty() => {
            Err(ReconciliationError::EmptyProjectWorkspaces(project.id))
        }
        Some((kind, fact)) => Err(ReconciliationError::MissingWorkspace { kind, fact }),
    }
}
