//! Fact-to-preview matching.
//!
//! Classifies every derived fact as a create or an update of an existing
//! entity. Reports are matched first; billings, costs and links build on the
//! report matches.

pub mod error;
pub mod links;
pub mod matching;
pub mod types;


use rust_decimal::Decimal;

pub use error::PreviewError;
pub use links::{convert_billing_link_facts_to_previews, convert_cost_link_facts_to_previews};
pub use matching::{
    MatchedReports, convert_billing_facts_to_previews, convert_cost_facts_to_previews,
    convert_report_facts_to_previews,
};
pub use types::{
    BillingPreview, BillingReportLinkDraft, BillingReportLinkPreview, CostPreview,
    CostReportLinkDraft, CostReportLinkPreview, EntityRef, FieldChange, KindSummary, Preview,
    PreviewSummary, ReconciliationPreview, ReportPreview, ToCreate, ToUpdate,
};

use crate::entities::{BillingRecord, CostRecord, ReportRecord};
use crate::facts::FactSet;

/// Persisted entities facts are matched against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingEntities<'a> {
    /// Reports in scope, with their links.
    pub reports: &'a [ReportRecord],
    /// Billings in scope.
    pub billings: &'a [BillingRecord],
    /// Costs in scope.
    pub costs: &'a [CostRecord],
}

/// Matches a fact set against existing entities.
///
/// # Errors
///
/// Returns [`PreviewError`] if a link fact references a fact missing from `facts`.
pub fn build_preview(
    facts: &FactSet,
    existing: ExistingEntities<'_>,
    tolerance: Decimal,
) -> Result<ReconciliationPreview, PreviewError> {
    let reports = convert_report_facts_to_previews(&facts.reports, existing.reports, tolerance);
    let matched = MatchedReports::new(&reports, existing.reports);
    let billings = convert_billing_facts_to_previews(&facts.billings, existing.billings, &matched);
    let costs = convert_cost_facts_to_previews(&facts.costs, existing.costs, &matched, tolerance);
    let cost_report_links = convert_cost_link_facts_to_previews(
        &facts.cost_report_links,
        &reports,
        &costs,
        &matched,
        tolerance,
    )?;
    let billing_report_links = convert_billing_link_facts_to_previews(
        &facts.billing_report_links,
        &reports,
        &billings,
        &matched,
        tolerance,
    )?;

    Ok(ReconciliationPreview {
        reports,
        billings,
        costs,
        cost_report_links,
        billing_report_links,
    })
}
