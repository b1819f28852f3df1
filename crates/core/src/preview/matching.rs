//! Matching report, billing and cost facts against existing entities.
//!
//! Every matcher follows the same shape: for each fact, find an unclaimed
//! existing entity sharing the fact's natural key and emit an update, or emit
//! a create when there is none. An existing entity is claimed by the first
//! fact that matches it, so two facts never update the same entity.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use rust_decimal::Decimal;
use timebill_shared::types::{BillingId, CostId, FactId, ReportId};
use tracing::debug;

use super::types::{BillingPreview, CostPreview, Preview, ReportPreview, ToCreate, ToUpdate};
use crate::currency::within_tolerance;
use crate::entities::{BillingRecord, CostRecord, ReportPayload, ReportRecord};
use crate::facts::{BillingFact, CostFact, ReportFact};

/// Ids already matched by an earlier fact.
struct Claims<Id>(HashSet<Id>);

impl<Id: Copy + Eq + Hash> Claims<Id> {
    fn new() -> Self {
        Self(HashSet::new())
    }

    fn is_free(&self, id: Id) -> bool {
        !self.0.contains(&id)
    }

    fn claim(&mut self, id: Id) {
        self.0.insert(id);
    }
}

fn update_or_create<Id, P: Clone>(
    fact_id: FactId,
    payload: &P,
    found: Option<(Id, &P)>,
) -> Preview<Id, P> {
    match found {
        Some((id, old)) => Preview::Update(ToUpdate {
            fact_id,
            id,
            payload: payload.clone(),
            old_values: old.clone(),
        }),
        None => Preview::Create(ToCreate {
            fact_id,
            payload: payload.clone(),
        }),
    }
}

fn report_key_matches(fact: &ReportPayload, existing: &ReportPayload, tolerance: Decimal) -> bool {
    fact.contractor_id == existing.contractor_id
        && fact.currency == existing.currency
        && fact.period_start <= existing.period_end
        && existing.period_start <= fact.period_end
        && within_tolerance(fact.unit_price, existing.unit_price, tolerance)
}

/// Classifies report facts.
///
/// A report matches on contractor, currency, overlapping period and a unit
/// price within `tolerance`.
#[must_use]
pub fn convert_report_facts_to_previews(
    facts: &[ReportFact],
    existing: &[ReportRecord],
    tolerance: Decimal,
) -> Vec<ReportPreview> {
    let mut claims = Claims::new();

    facts
        .iter()
        .map(|fact| {
            let found = existing.iter().find(|record| {
                claims.is_free(record.id)
                    && report_key_matches(&fact.payload, &record.fields, tolerance)
            });
            if let Some(record) = found {
                claims.claim(record.id);
                debug!(fact = %fact.uuid, report_id = %record.id, "Report fact matches existing report");
            }
            update_or_create(fact.uuid, &fact.payload, found.map(|r| (r.id, &r.fields)))
        })
        .collect()
}

/// Existing reports matched by report facts, by fact id.
pub struct MatchedReports<'a> {
    by_fact: HashMap<FactId, &'a ReportRecord>,
}

impl<'a> MatchedReports<'a> {
    /// Indexes the report records that `previews` update.
    #[must_use]
    pub fn new(previews: &[ReportPreview], existing: &'a [ReportRecord]) -> Self {
        let by_id: HashMap<ReportId, &'a ReportRecord> =
            existing.iter().map(|r| (r.id, r)).collect();
        let by_fact = previews
            .iter()
            .filter_map(|p| {
                let record = by_id.get(&p.existing_id()?)?;
                Some((p.fact_id(), *record))
            })
            .collect();
        Self { by_fact }
    }

    /// Existing record the report fact was matched to.
    #[must_use]
    pub fn record(&self, fact: FactId) -> Option<&'a ReportRecord> {
        self.by_fact.get(&fact).copied()
    }

    fn billing_ids(&self, facts: &[FactId]) -> HashSet<BillingId> {
        facts
            .iter()
            .filter_map(|f| self.record(*f))
            .flat_map(|r| r.billing_links.iter().map(|l| l.billing_id))
            .collect()
    }

    fn cost_ids(&self, fact: FactId) -> HashSet<CostId> {
        self.record(fact)
            .into_iter()
            .flat_map(|r| r.cost_links.iter().map(|l| l.cost_id))
            .collect()
    }
}

/// Classifies billing facts.
///
/// A billing matches on client, workspace and currency. Billings already
/// linked to one of the fact's matched reports are preferred.
#[must_use]
pub fn convert_billing_facts_to_previews(
    facts: &[BillingFact],
    existing: &[BillingRecord],
    reports: &MatchedReports<'_>,
) -> Vec<BillingPreview> {
    let mut claims = Claims::new();

    facts
        .iter()
        .map(|fact| {
            let linked = reports.billing_ids(&fact.constraints.linked_to_reports);
            let candidates: Vec<&BillingRecord> = existing
                .iter()
                .filter(|record| {
                    claims.is_free(record.id)
                        && record.fields.client_id == fact.payload.client_id
                        && record.fields.workspace_id == fact.payload.workspace_id
                        && record.fields.currency == fact.payload.currency
                })
                .collect();
            let found = candidates
                .iter()
                .find(|r| linked.contains(&r.id))
                .or_else(|| candidates.first())
                .copied();
            if let Some(record) = found {
                claims.claim(record.id);
                debug!(fact = %fact.uuid, billing_id = %record.id, "Billing fact matches existing billing");
            }
            update_or_create(fact.uuid, &fact.payload, found.map(|r| (r.id, &r.fields)))
        })
        .collect()
}

/// Classifies cost facts.
///
/// A cost matches on contractor, currency and workspace. A cost already
/// linked to the matched report wins; otherwise the net value must be within
/// `tolerance`.
#[must_use]
pub fn convert_cost_facts_to_previews(
    facts: &[CostFact],
    existing: &[CostRecord],
    reports: &MatchedReports<'_>,
    tolerance: Decimal,
) -> Vec<CostPreview> {
    let mut claims = Claims::new();

    facts
        .iter()
        .map(|fact| {
            let linked = reports.cost_ids(fact.constraints.linked_to_report);
            let candidates: Vec<&CostRecord> = existing
                .iter()
                .filter(|record| {
                    claims.is_free(record.id)
                        && record.fields.contractor_id == fact.payload.contractor_id
                        && record.fields.currency == fact.payload.currency
                        && record.fields.workspace_id == fact.payload.workspace_id
                })
                .collect();
            let found = candidates
                .iter()
                .find(|r| linked.contains(&r.id))
                .or_else(|| {
                    candidates.iter().find(|r| {
                        within_tolerance(r.fields.net_value, fact.payload.net_value, tolerance)
                    })
                })
                .copied();
            if let Some(record) = found {
                claims.claim(record.id);
                debug!(fact = %fact.uuid, cost_id = %record.id, "Cost fact matches existing cost");
            }
            update_or_create(fact.uuid, &fact.payload, found.map(|r| (r.id, &r.fields)))
        })
        .collect()
}
