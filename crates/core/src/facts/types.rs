//! Fact types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use timebill_shared::types::{Currency, FactId};

use crate::entities::{
    BillingPayload, BillingReportLinkPayload, CostPayload, CostReportLinkPayload, ReportPayload,
};

/// Kind of a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FactKind {
    /// Contractor report.
    Report,
    /// Client billing.
    Billing,
    /// Contractor cost.
    Cost,
    /// Cost/report link.
    LinkCostReport,
    /// Billing/report link.
    LinkBillingReport,
}

impl std::fmt::Display for FactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Report => "report",
            Self::Billing => "billing",
            Self::Cost => "cost",
            Self::LinkCostReport => "linkCostReport",
            Self::LinkBillingReport => "linkBillingReport",
        };
        f.write_str(name)
    }
}

/// Billing side of a report, used to derive billings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingTerms {
    /// Billing currency.
    pub currency: Currency,
    /// Billing price per unit.
    pub unit_price: Decimal,
    /// Billed amount for the report.
    pub amount: Decimal,
}

/// Proposed contractor report for one contractor and rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFact {
    /// Fact id.
    pub uuid: FactId,
    /// Report payload.
    pub payload: ReportPayload,
    /// Billing side of the report.
    pub billing: BillingTerms,
    /// Signature of the rate the entries were grouped by.
    pub rate_signature: String,
}

/// Constraints of a cost fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostConstraints {
    /// Report fact the cost was derived alongside.
    pub linked_to_report: FactId,
}

/// Proposed contractor cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostFact {
    /// Fact id.
    pub uuid: FactId,
    /// Cost payload.
    pub payload: CostPayload,
    /// Dependencies.
    pub constraints: CostConstraints,
}

/// Constraints of a billing fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingConstraints {
    /// Report facts billed together.
    pub linked_to_reports: Vec<FactId>,
}

/// Proposed client billing for one workspace and currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingFact {
    /// Fact id.
    pub uuid: FactId,
    /// Billing payload.
    pub payload: BillingPayload,
    /// Dependencies.
    pub constraints: BillingConstraints,
}

/// Facts joined by a cost/report link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedCostReport {
    /// Cost fact.
    pub cost: FactId,
    /// Report fact.
    pub report: FactId,
}

/// Proposed cost/report link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCostReportFact {
    /// Fact id.
    pub uuid: FactId,
    /// Link payload; `cost_amount` always equals `report_amount`.
    pub payload: CostReportLinkPayload,
    /// Linked facts.
    pub linked_facts: LinkedCostReport,
}

/// Facts joined by a billing/report link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedBillingReport {
    /// Billing fact.
    pub billing: FactId,
    /// Report fact.
    pub report: FactId,
}

/// Proposed billing/report link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBillingReportFact {
    /// Fact id.
    pub uuid: FactId,
    /// Link payload.
    pub payload: BillingReportLinkPayload,
    /// Linked facts.
    pub linked_facts: LinkedBillingReport,
}

/// A derived, not yet persisted proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fact {
    /// Contractor report.
    Report(ReportFact),
    /// Client billing.
    Billing(BillingFact),
    /// Contractor cost.
    Cost(CostFact),
    /// Cost/report link.
    LinkCostReport(LinkCostReportFact),
    /// Billing/report link.
    LinkBillingReport(LinkBillingReportFact),
}

impl Fact {
    /// Returns the fact id.
    #[must_use]
    pub const fn uuid(&self) -> FactId {
        match self {
            Self::Report(f) => f.uuid,
            Self::Billing(f) => f.uuid,
            Self::Cost(f) => f.uuid,
            Self::LinkCostReport(f) => f.uuid,
            Self::LinkBillingReport(f) => f.uuid,
        }
    }

    /// Returns the fact kind.
    #[must_use]
    pub const fn kind(&self) -> FactKind {
        match self {
            Self::Report(_) => FactKind::Report,
            Self::Billing(_) => FactKind::Billing,
            Self::Cost(_) => FactKind::Cost,
            Self::LinkCostReport(_) => FactKind::LinkCostReport,
            Self::LinkBillingReport(_) => FactKind::LinkBillingReport,
        }
    }
}

/// Facts split by kind, preserving derivation order within each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactSet {
    /// Report facts.
    pub reports: Vec<ReportFact>,
    /// Billing facts.
    pub billings: Vec<BillingFact>,
    /// Cost facts.
    pub costs: Vec<CostFact>,
    /// Cost/report link facts.
    pub cost_report_links: Vec<LinkCostReportFact>,
    /// Billing/report link facts.
    pub billing_report_links: Vec<LinkBillingReportFact>,
}

impl FromIterator<Fact> for FactSet {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        let mut set = Self::default();
        for fact in iter {
            match fact {
                Fact::Report(f) => set.reports.push(f),
                Fact::Billing(f) => set.billings.push(f),
                Fact::Cost(f) => set.costs.push(f),
                Fact::LinkCostReport(f) => set.cost_report_links.push(f),
                Fact::LinkBillingReport(f) => set.billing_report_links.push(f),
            }
        }
        set
    }
}
