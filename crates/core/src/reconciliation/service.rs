//! Reconciliation orchestration.
//!
//! Two phases: [`ReconciliationService::load_preview`] reads inputs and
//! computes the preview without side effects, and
//! [`ReconciliationService::execute`] applies a preview one mutation at a
//! time. Reports, billings and costs run before any link so that every link
//! can be given real ids. Execution is not atomic: a failure leaves earlier
//! steps committed, and running reconciliation again picks them up as updates.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;

use futures::future::try_join_all;
use serde::Serialize;
use timebill_shared::config::ReconciliationConfig;
use timebill_shared::types::{
    BillingId, ContractorId, CostId, FactId, GeneratedReportId, LinkId, ProjectId, ReportId,
    WorkspaceId,
};
use tracing::{debug, error, info};

use super::error::ReconciliationError;
use super::ports::{MutationError, MutationService, ReconciliationDataSource};
use super::view::{ReconciliationInput, calculate_reconciliation_view};
use crate::facts::{FactKind, UuidFactory};
use crate::generated::GenericReport;
use crate::preview::{EntityRef, Preview, ReconciliationPreview};

/// Whether a step creates or updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationAction {
    Create,
    Update,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
        })
    }
}

/// One mutation of an execution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationStep {
    /// 1-based position in the run.
    pub index: usize,
    /// Entity kind touched.
    pub kind: FactKind,
    /// Create or update.
    pub action: MutationAction,
    /// Fact the step applies.
    pub fact: FactId,
}

impl fmt::Display for MutationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {} ({} {} for fact {})",
            self.index, self.action, self.kind, self.fact
        )
    }
}

/// Outcome of a successful execution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    /// Report id per report fact.
    pub reports: HashMap<FactId, ReportId>,
    /// Billing id per billing fact.
    pub billings: HashMap<FactId, BillingId>,
    /// Cost id per cost fact.
    pub costs: HashMap<FactId, CostId>,
    /// Link id per cost/report link fact.
    pub cost_report_links: HashMap<FactId, LinkId>,
    /// Link id per billing/report link fact.
    pub billing_report_links: HashMap<FactId, LinkId>,
    /// Entities created.
    pub created: usize,
    /// Entities updated.
    pub updated: usize,
}

impl ExecutionReport {
    /// Number of committed steps.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.created + self.updated
    }
}

/// Progress of an execution run.
struct Execution {
    report: ExecutionReport,
}

impl Execution {
    async fn step<T: fmt::Display>(
        &mut self,
        kind: FactKind,
        action: MutationAction,
        fact: FactId,
        mutation: impl Future<Output = Result<T, MutationError>>,
    ) -> Result<T, ReconciliationError> {
        let completed = self.report.steps();
        let step = MutationStep {
            index: completed + 1,
            kind,
            action,
            fact,
        };

        match mutation.await {
            Ok(id) => {
                match action {
                    MutationAction::Create => self.report.created += 1,
                    MutationAction::Update => self.report.updated += 1,
                }
                info!(step = step.index, %kind, %action, %fact, %id, "Applied mutation");
                Ok(id)
            }
            Err(source) => {
                error!(step = step.index, %kind, %action, %fact, completed, error = %source, "Mutation failed");
                Err(ReconciliationError::Mutation {
                    step,
                    completed,
                    source,
                })
            }
        }
    }
}

fn resolve<Id: Copy>(
    reference: EntityRef<Id>,
    created: &HashMap<FactId, Id>,
    kind: FactKind,
) -> Result<Id, ReconciliationError> {
    match reference {
        EntityRef::Existing(id) => Ok(id),
        EntityRef::Pending(fact) => created
            .get(&fact)
            .copied()
            .ok_or(ReconciliationError::UnresolvedReference { kind, fact }),
    }
}

const fn action_of<Id, C, U>(preview: &Preview<Id, C, U>) -> MutationAction {
    match preview {
        Preview::Create(_) => MutationAction::Create,
        Preview::Update(_) => MutationAction::Update,
    }
}

/// Loads reconciliation inputs and applies previews.
pub struct ReconciliationService<D, M, F> {
    data: D,
    mutations: M,
    ids: F,
    config: ReconciliationConfig,
}

impl<D, M, F> ReconciliationService<D, M, F>
where
    D: ReconciliationDataSource,
    M: MutationService,
    F: UuidFactory,
{
    /// Creates a service. `ids` generates the fact ids of every preview.
    pub fn new(data: D, mutations: M, ids: F, config: ReconciliationConfig) -> Self {
        Self {
            data,
            mutations,
            ids,
            config,
        }
    }

    /// The mutation service previews are executed through.
    pub const fn mutations(&self) -> &M {
        &self.mutations
    }

    /// Looks up the workspace of every contractor in `report` concurrently.
    ///
    /// Contractors without a configured workspace are left out.
    ///
    /// # Errors
    ///
    /// Returns [`ReconciliationError::DataSource`] if any lookup fails.
    pub async fn determine_contractor_workspaces(
        &self,
        report: &GenericReport,
        project: ProjectId,
    ) -> Result<HashMap<ContractorId, WorkspaceId>, ReconciliationError> {
        let contractors: BTreeSet<ContractorId> =
            report.time_entries.iter().map(|e| e.contractor_id).collect();

        let lookups = contractors.into_iter().map(|contractor| async move {
            let workspace = self.data.contractor_workspace(contractor, project).await?;
            Ok::<_, ReconciliationError>((contractor, workspace))
        });
        let found = try_join_all(lookups).await?;

        Ok(found
            .into_iter()
            .filter_map(|(contractor, workspace)| Some((contractor, workspace?)))
            .collect())
    }

    /// Fetches everything a preview is calculated from.
    ///
    /// # Errors
    ///
    /// Returns [`ReconciliationError::DataSource`] if any fetch fails.
    pub async fn load_input(
        &self,
        report_id: GeneratedReportId,
    ) -> Result<ReconciliationInput, ReconciliationError> {
        let generated = self.data.ensure_report(report_id).await?;
        let iteration = self.data.ensure_iteration(generated.project_iteration_id).await?;
        let project = self.data.ensure_project(iteration.project_id).await?;

        let (existing_reports, existing_billings, existing_costs) = futures::try_join!(
            self.data.ensure_reports(iteration.id),
            self.data.ensure_billings(iteration.id),
            self.data.ensure_costs(iteration.id),
        )?;
        let contractor_workspaces = self
            .determine_contractor_workspaces(&generated.data, project.id)
            .await?;
        let contractors: BTreeSet<ContractorId> = generated
            .data
            .time_entries
            .iter()
            .map(|e| e.contractor_id)
            .collect();
        let contractor_names = self
            .data
            .contractor_names(contractors.into_iter().collect())
            .await?;

        debug!(
            %report_id,
            entries = generated.data.time_entries.len(),
            existing_reports = existing_reports.len(),
            existing_billings = existing_billings.len(),
            existing_costs = existing_costs.len(),
            "Loaded reconciliation input"
        );

        Ok(ReconciliationInput {
            report: generated.data,
            existing_reports,
            existing_billings,
            existing_costs,
            iteration,
            project,
            contractor_workspaces,
            contractor_names,
        })
    }

    /// Loads inputs and calculates the preview for a generated report.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Self::load_input`] or of the preview calculation.
    pub async fn load_preview(
        &self,
        report_id: GeneratedReportId,
    ) -> Result<ReconciliationPreview, ReconciliationError> {
        let input = self.load_input(report_id).await?;
        calculate_reconciliation_view(&input, &self.ids, &self.config)
    }

    /// Applies a preview, one awaited mutation at a time.
    ///
    /// # Errors
    ///
    /// Returns [`ReconciliationError::Mutation`] on the first failed mutation;
    /// nothing after it runs and nothing before it is undone. Returns
    /// [`ReconciliationError::UnresolvedReference`] if a link points at a
    /// pending entity the preview never creates.
    pub async fn execute(
        &self,
        preview: &ReconciliationPreview,
    ) -> Result<ExecutionReport, ReconciliationError> {
        let summary = preview.summary();
        info!(steps = summary.total_steps(), "Executing reconciliation");
        let m = &self.mutations;
        let mut run = Execution {
            report: ExecutionReport::default(),
        };

        for p in &preview.reports {
            let action = action_of(p);
            let id = match p {
                Preview::Create(c) => {
                    run.step(FactKind::Report, action, c.fact_id, m.create_report(&c.payload))
                        .await?
                }
                Preview::Update(u) => {
                    run.step(FactKind::Report, action, u.fact_id, m.edit_report(u.id, &u.payload))
                        .await?
                }
            };
            run.report.reports.insert(p.fact_id(), id);
        }

        for p in &preview.billings {
            let action = action_of(p);
            let id = match p {
                Preview::Create(c) => {
                    run.step(FactKind::Billing, action, c.fact_id, m.create_billing(&c.payload))
                        .await?
                }
                Preview::Update(u) => {
                    run.step(FactKind::Billing, action, u.fact_id, m.edit_billing(u.id, &u.payload))
                        .await?
                }
            };
            run.report.billings.insert(p.fact_id(), id);
        }

        for p in &preview.costs {
            let action = action_of(p);
            let id = match p {
                Preview::Create(c) => {
                    run.step(FactKind::Cost, action, c.fact_id, m.create_cost(&c.payload))
                        .await?
                }
                Preview::Update(u) => {
                    run.step(FactKind::Cost, action, u.fact_id, m.edit_cost(u.id, &u.payload))
                        .await?
                }
            };
            run.report.costs.insert(p.fact_id(), id);
        }

        for p in &preview.cost_report_links {
            let kind = FactKind::LinkCostReport;
            let action = action_of(p);
            let id = match p {
                Preview::Create(c) => {
                    let cost = resolve(c.payload.cost, &run.report.costs, FactKind::Cost)?;
                    let report = resolve(c.payload.report, &run.report.reports, FactKind::Report)?;
                    let mutation = m.link_cost_and_report(cost, report, &c.payload.fields);
                    run.step(kind, action, c.fact_id, mutation).await?
                }
                Preview::Update(u) => {
                    let mutation = m.update_cost_report_link(u.id, &u.payload);
                    run.step(kind, action, u.fact_id, mutation).await?
                }
            };
            run.report.cost_report_links.insert(p.fact_id(), id);
        }

        for p in &preview.billing_report_links {
            let kind = FactKind::LinkBillingReport;
            let action = action_of(p);
            let id = match p {
                Preview::Create(c) => {
                    let billing = resolve(c.payload.billing, &run.report.billings, FactKind::Billing)?;
                    let report = resolve(c.payload.report, &run.report.reports, FactKind::Report)?;
                    let mutation = m.link_report_and_billing(billing, report, &c.payload.fields);
                    run.step(kind, action, c.fact_id, mutation).await?
                }
                Preview::Update(u) => {
                    let mutation = m.update_billing_report_link(u.id, &u.payload);
                    run.step(kind, action, u.fact_id, mutation).await?
                }
            };
            run.report.billing_report_links.insert(p.fact_id(), id);
        }

        info!(
            created = run.report.created,
            updated = run.report.updated,
            "Reconciliation executed"
        );
        Ok(run.report)
    }
}
