//! Preview types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use timebill_shared::types::{BillingId, CostId, FactId, LinkId, ReportId};

use crate::entities::{
    BillingPayload, BillingReportLinkPayload, CostPayload, CostReportLinkPayload, ReportPayload,
};

/// Reference to an entity that either exists or is created earlier in the same run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum EntityRef<Id> {
    /// Persisted entity.
    Existing(Id),
    /// Entity created from the fact with this id.
    Pending(FactId),
}

/// A fact with no persisted counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToCreate<P> {
    /// Originating fact.
    pub fact_id: FactId,
    /// Full creation payload.
    pub payload: P,
}

/// A fact matched to a persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToUpdate<Id, P> {
    /// Originating fact.
    pub fact_id: FactId,
    /// Matched entity.
    pub id: Id,
    /// Values the fact proposes.
    pub payload: P,
    /// Current values of the same fields.
    pub old_values: P,
}

/// One field that an update changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    /// Serialized field name.
    pub field: String,
    /// Current value.
    pub old: Value,
    /// Proposed value.
    pub new: Value,
}

impl<Id, P: Serialize> ToUpdate<Id, P> {
    /// Fields whose proposed value differs from the current one.
    ///
    /// Decimal strings compare numerically, so `"50"` and `"50.00"` are equal.
    ///
    /// # Errors
    ///
    /// Returns the serialization error when either side cannot be serialized
    /// or does not serialize to a JSON object.
    pub fn changes(&self) -> Result<Vec<FieldChange>, serde_json::Error> {
        let new = as_object(&self.payload)?;
        let old = as_object(&self.old_values)?;

        Ok(new
            .into_iter()
            .filter_map(|(field, new_value)| {
                let old_value = old.get(&field).cloned().unwrap_or(Value::Null);
                (!values_equal(&old_value, &new_value)).then(|| FieldChange {
                    field,
                    old: old_value,
                    new: new_value,
                })
            })
            .collect())
    }

    /// Returns true when applying the update would not change anything.
    ///
    /// An update whose changes cannot be computed is never a no-op.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes().is_ok_and(|changes| changes.is_empty())
    }
}

fn as_object<P: Serialize>(payload: &P) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(payload)? {
        Value::Object(fields) => Ok(fields),
        other => Err(serde::ser::Error::custom(format!(
            "expected a payload object, got {other}"
        ))),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => {
            x == y
                || matches!(
                    (Decimal::from_str(x), Decimal::from_str(y)),
                    (Ok(dx), Ok(dy)) if dx == dy
                )
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| values_equal(v, other)))
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(v, w)| values_equal(v, w))
        }
        _ => a == b,
    }
}

/// Create-or-update classification of one fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Preview<Id, C, U = C> {
    /// Create a new entity.
    Create(ToCreate<C>),
    /// Update an existing entity.
    Update(ToUpdate<Id, U>),
}

impl<Id: Copy, C, U> Preview<Id, C, U> {
    /// Originating fact.
    #[must_use]
    pub const fn fact_id(&self) -> FactId {
        match self {
            Self::Create(c) => c.fact_id,
            Self::Update(u) => u.fact_id,
        }
    }

    /// Matched entity, if any.
    #[must_use]
    pub const fn existing_id(&self) -> Option<Id> {
        match self {
            Self::Create(_) => None,
            Self::Update(u) => Some(u.id),
        }
    }

    /// Reference other previews use to point at this entity.
    #[must_use]
    pub const fn entity_ref(&self) -> EntityRef<Id> {
        match self {
            Self::Create(c) => EntityRef::Pending(c.fact_id),
            Self::Update(u) => EntityRef::Existing(u.id),
        }
    }

    /// Returns true for a creation.
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }
}

/// Creation payload of a cost/report link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReportLinkDraft {
    /// Linked cost.
    pub cost: EntityRef<CostId>,
    /// Linked report.
    pub report: EntityRef<ReportId>,
    /// Amounts and breakdown.
    #[serde(flatten)]
    pub fields: CostReportLinkPayload,
}

/// Creation payload of a billing/report link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingReportLinkDraft {
    /// Linked billing.
    pub billing: EntityRef<BillingId>,
    /// Linked report.
    pub report: EntityRef<ReportId>,
    /// Amounts and breakdown.
    #[serde(flatten)]
    pub fields: BillingReportLinkPayload,
}

/// Report create or update.
pub type ReportPreview = Preview<ReportId, ReportPayload>;
/// Billing create or update.
pub type BillingPreview = Preview<BillingId, BillingPayload>;
/// Cost create or update.
pub type CostPreview = Preview<CostId, CostPayload>;
/// Cost/report link create or update. Only creations carry the link ends.
pub type CostReportLinkPreview = Preview<LinkId, CostReportLinkDraft, CostReportLinkPayload>;
/// Billing/report link create or update. Only creations carry the link ends.
pub type BillingReportLinkPreview =
    Preview<LinkId, BillingReportLinkDraft, BillingReportLinkPayload>;

/// Create and update counts of one entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindSummary {
    /// Entities to create.
    pub create: usize,
    /// Entities to update.
    pub update: usize,
}

impl KindSummary {
    fn of<Id: Copy, C, U>(previews: &[Preview<Id, C, U>]) -> Self {
        let create = previews.iter().filter(|p| p.is_create()).count();
        Self {
            create,
            update: previews.len() - create,
        }
    }

    /// Total previews of this kind.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.create + self.update
    }
}

/// Per-kind counts of a [`ReconciliationPreview`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    /// Report counts.
    pub reports: KindSummary,
    /// Billing counts.
    pub billings: KindSummary,
    /// Cost counts.
    pub costs: KindSummary,
    /// Cost/report link counts.
    pub cost_report_links: KindSummary,
    /// Billing/report link counts.
    pub billing_report_links: KindSummary,
}

impl PreviewSummary {
    /// Number of mutations executing the preview performs.
    #[must_use]
    pub const fn total_steps(&self) -> usize {
        self.reports.total()
            + self.billings.total()
            + self.costs.total()
            + self.cost_report_links.total()
            + self.billing_report_links.total()
    }
}

/// Everything a reconciliation run would create or update.
///
/// Each list follows fact derivation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPreview {
    /// Reports.
    pub reports: Vec<ReportPreview>,
    /// Billings.
    pub billings: Vec<BillingPreview>,
    /// Costs.
    pub costs: Vec<CostPreview>,
    /// Cost/report links.
    pub cost_report_links: Vec<CostReportLinkPreview>,
    /// Billing/report links.
    pub billing_report_links: Vec<BillingReportLinkPreview>,
}

impl ReconciliationPreview {
    /// Create and update counts per kind.
    #[must_use]
    pub fn summary(&self) -> PreviewSummary {
        PreviewSummary {
            reports: KindSummary::of(&self.reports),
            billings: KindSummary::of(&self.billings),
            costs: KindSummary::of(&self.costs),
            cost_report_links: KindSummary::of(&self.cost_report_links),
            billing_report_links: KindSummary::of(&self.billing_report_links),
        }
    }

    /// Returns true when there is nothing to execute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
            && self.billings.is_empty()
            && self.costs.is_empty()
            && self.cost_report_links.is_empty()
            && self.billing_report_links.is_empty()
    }
}
