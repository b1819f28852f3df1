//! Matching link facts.
//!
//! Link facts name the facts they join by id, so each end resolves to the
//! preview derived from that fact: an existing entity when the preview is an
//! update, a pending one otherwise. Only when both ends already exist can the
//! link itself exist; among several existing links between the same two
//! entities the one whose amount is within tolerance wins.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use timebill_shared::types::{FactId, LinkId};
use tracing::debug;

use super::error::PreviewError;
use super::matching::MatchedReports;
use super::types::{
    BillingPreview, BillingReportLinkDraft, BillingReportLinkPreview, CostPreview,
    CostReportLinkDraft, CostReportLinkPreview, EntityRef, Preview, ReportPreview, ToCreate,
    ToUpdate,
};
use crate::currency::within_tolerance;
use crate::entities::{BillingReportLinkRecord, CostReportLinkRecord};
use crate::facts::{FactKind, LinkBillingReportFact, LinkCostReportFact};

fn refs<Id: Copy, C, U>(previews: &[Preview<Id, C, U>]) -> HashMap<FactId, EntityRef<Id>> {
    previews.iter().map(|p| (p.fact_id(), p.entity_ref())).collect()
}

fn resolve<Id: Copy>(
    refs: &HashMap<FactId, EntityRef<Id>>,
    kind: FactKind,
    fact: FactId,
) -> Result<EntityRef<Id>, PreviewError> {
    refs.get(&fact)
        .copied()
        .ok_or(PreviewError::UnresolvedFact { kind, fact })
}

/// Picks an unclaimed candidate, preferring one whose amount is within tolerance.
fn pick_link<'a, L>(
    candidates: impl Iterator<Item = &'a L>,
    claimed: &HashSet<LinkId>,
    id: impl Fn(&L) -> LinkId,
    amount: impl Fn(&L) -> Decimal,
    target: Decimal,
    tolerance: Decimal,
) -> Option<&'a L> {
    let free: Vec<&L> = candidates.filter(|l| !claimed.contains(&id(*l))).collect();
    free.iter()
        .find(|l| within_tolerance(amount(**l), target, tolerance))
        .or_else(|| free.first())
        .copied()
}

/// Classifies cost/report link facts.
///
/// # Errors
///
/// Returns [`PreviewError::UnresolvedFact`] when a link names a cost or
/// report fact without a preview.
pub fn convert_cost_link_facts_to_previews(
    facts: &[LinkCostReportFact],
    reports: &[ReportPreview],
    costs: &[CostPreview],
    matched: &MatchedReports<'_>,
    tolerance: Decimal,
) -> Result<Vec<CostReportLinkPreview>, PreviewError> {
    let report_refs = refs(reports);
    let cost_refs = refs(costs);
    let mut claimed = HashSet::new();
    let mut previews = Vec::with_capacity(facts.len());

    for fact in facts {
        let report = resolve(&report_refs, FactKind::Report, fact.linked_facts.report)?;
        let cost = resolve(&cost_refs, FactKind::Cost, fact.linked_facts.cost)?;

        let existing = match (report, cost) {
            (EntityRef::Existing(_), EntityRef::Existing(cost_id)) => matched
                .record(fact.linked_facts.report)
                .and_then(|record| {
                    pick_link(
                        record.cost_links.iter().filter(|l| l.cost_id == cost_id),
                        &claimed,
                        |l: &CostReportLinkRecord| l.id,
                        |l: &CostReportLinkRecord| l.fields.cost_amount,
                        fact.payload.cost_amount,
                        tolerance,
                    )
                }),
            _ => None,
        };

        let preview = match existing {
            Some(link) => {
                claimed.insert(link.id);
                debug!(fact = %fact.uuid, link_id = %link.id, "Cost link fact matches existing link");
                Preview::Update(ToUpdate {
                    fact_id: fact.uuid,
                    id: link.id,
                    payload: fact.payload.clone(),
                    old_values: link.fields.clone(),
                })
            }
            None => Preview::Create(ToCreate {
                fact_id: fact.uuid,
                payload: CostReportLinkDraft {
                    cost,
                    report,
                    fields: fact.payload.clone(),
                },
            }),
        };
        previews.push(preview);
    }

    Ok(previews)
}

/// Classifies billing/report link facts.
///
/// # Errors
///
/// Returns [`PreviewError::UnresolvedFact`] when a link names a billing or
/// report fact without a preview.
pub fn convert_billing_link_facts_to_previews(
    facts: &[LinkBillingReportFact],
    reports: &[ReportPreview],
    billings: &[BillingPreview],
    matched: &MatchedReports<'_>,
    tolerance: Decimal,
) -> Result<Vec<BillingReportLinkPreview>, PreviewError> {
    let report_refs = refs(reports);
    let billing_refs = refs(billings);
    let mut claimed = HashSet::new();
    let mut previews = Vec::with_capacity(facts.len());

    for fact in facts {
        let report = resolve(&report_refs, FactKind::Report, fact.linked_facts.report)?;
        let billing = resolve(&billing_refs, FactKind::Billing, fact.linked_facts.billing)?;

        let existing = match (report, billing) {
            (EntityRef::Existing(_), EntityRef::Existing(billing_id)) => matched
                .record(fact.linked_facts.report)
                .and_then(|record| {
                    pick_link(
                        record.billing_links.iter().filter(|l| l.billing_id == billing_id),
                        &claimed,
                        |l: &BillingReportLinkRecord| l.id,
                        |l: &BillingReportLinkRecord| l.fields.billing_amount,
                        fact.payload.billing_amount,
                        tolerance,
                    )
                }),
            _ => None,
        };

        let preview = match existing {
            Some(link) => {
                claimed.insert(link.id);
                debug!(fact = %fact.uuid, link_id = %link.id, "Billing link fact matches existing link");
                Preview::Update(ToUpdate {
                    fact_id: fact.uuid,
                    id: link.id,
                    payload: fact.payload.clone(),
                    old_values: link.fields.clone(),
                })
            }
            None => Preview::Create(ToCreate {
                fact_id: fact.uuid,
                payload: BillingReportLinkDraft {
                    billing,
                    report,
                    fields: fact.payload.clone(),
                },
            }),
        };
        previews.push(preview);
    }

    Ok(previews)
}
