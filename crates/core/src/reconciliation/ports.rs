//! Collaborators reconciliation reads from and writes through.
//!
//! Persistence lives outside this crate; implementations wrap whatever store
//! or API holds reports, billings and costs.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use timebill_shared::types::{
    BillingId, ContractorId, CostId, GeneratedReportId, LinkId, ProjectId, ProjectIterationId,
    ReportId, WorkspaceId,
};

use crate::entities::{
    BillingPayload, BillingRecord, BillingReportLinkPayload, CostPayload, CostRecord,
    CostReportLinkPayload, Project, ProjectIteration, ReportPayload, ReportRecord,
};
use crate::generated::GeneratedReport;

/// Errors returned by a [`ReconciliationDataSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// The requested entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Requested id.
        id: String,
    },

    /// The store could not be reached or answered with an error.
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Errors returned by a [`MutationService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The store refused the change.
    #[error("Mutation rejected: {0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("Mutation service unavailable: {0}")]
    Unavailable(String),
}

/// Read access to everything a reconciliation preview needs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReconciliationDataSource: Send + Sync {
    /// Loads a generated report.
    async fn ensure_report(&self, id: GeneratedReportId)
    -> Result<GeneratedReport, DataSourceError>;

    /// Loads a project iteration.
    async fn ensure_iteration(
        &self,
        id: ProjectIterationId,
    ) -> Result<ProjectIteration, DataSourceError>;

    /// Loads a project.
    async fn ensure_project(&self, id: ProjectId) -> Result<Project, DataSourceError>;

    /// Reports already linked to costs or billings of the iteration, with their links.
    async fn ensure_reports(
        &self,
        iteration: ProjectIterationId,
    ) -> Result<Vec<ReportRecord>, DataSourceError>;

    /// Billings in the iteration's scope.
    async fn ensure_billings(
        &self,
        iteration: ProjectIterationId,
    ) -> Result<Vec<BillingRecord>, DataSourceError>;

    /// Costs in the iteration's scope.
    async fn ensure_costs(
        &self,
        iteration: ProjectIterationId,
    ) -> Result<Vec<CostRecord>, DataSourceError>;

    /// Workspace a contractor reports into for a project, if configured.
    async fn contractor_workspace(
        &self,
        contractor: ContractorId,
        project: ProjectId,
    ) -> Result<Option<WorkspaceId>, DataSourceError>;

    /// Display names of contractors. Unknown contractors are omitted.
    async fn contractor_names(
        &self,
        contractors: Vec<ContractorId>,
    ) -> Result<HashMap<ContractorId, String>, DataSourceError>;
}

/// Write access used when executing a preview.
///
/// Every call either commits and returns the entity id or fails; there is no
/// transaction spanning calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MutationService: Send + Sync {
    async fn create_report(&self, payload: &ReportPayload) -> Result<ReportId, MutationError>;

    async fn edit_report(
        &self,
        id: ReportId,
        payload: &ReportPayload,
    ) -> Result<ReportId, MutationError>;

    async fn create_billing(&self, payload: &BillingPayload) -> Result<BillingId, MutationError>;

    async fn edit_billing(
        &self,
        id: BillingId,
        payload: &BillingPayload,
    ) -> Result<BillingId, MutationError>;

    async fn create_cost(&self, payload: &CostPayload) -> Result<CostId, MutationError>;

    async fn edit_cost(&self, id: CostId, payload: &CostPayload) -> Result<CostId, MutationError>;

    async fn link_cost_and_report(
        &self,
        cost: CostId,
        report: ReportId,
        payload: &CostReportLinkPayload,
    ) -> Result<LinkId, MutationError>;

    async fn update_cost_report_link(
        &self,
        id: LinkId,
        payload: &CostReportLinkPayload,
    ) -> Result<LinkId, MutationError>;

    async fn link_report_and_billing(
        &self,
        billing: BillingId,
        report: ReportId,
        payload: &BillingReportLinkPayload,
    ) -> Result<LinkId, MutationError>;

    async fn update_billing_report_link(
        &self,
        id: LinkId,
        payload: &BillingReportLinkPayload,
    ) -> Result<LinkId, MutationError>;
}
