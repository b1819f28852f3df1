//! Persisted entities as seen by reconciliation.

use serde::{Deserialize, Serialize};
use timebill_shared::types::{BillingId, CostId, LinkId, ReportId};

use super::payloads::{
    BillingPayload, BillingReportLinkPayload, CostPayload, CostReportLinkPayload, ReportPayload,
};

/// Existing contractor report with its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    /// Report id.
    pub id: ReportId,
    /// Stored field values.
    #[serde(flatten)]
    pub fields: ReportPayload,
    /// Links to costs.
    #[serde(default)]
    pub cost_links: Vec<CostReportLinkRecord>,
    /// Links to billings.
    #[serde(default)]
    pub billing_links: Vec<BillingReportLinkRecord>,
}

/// Existing contractor cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRecord {
    /// Cost id.
    pub id: CostId,
    /// Stored field values.
    #[serde(flatten)]
    pub fields: CostPayload,
}

/// Existing client billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecord {
    /// Billing id.
    pub id: BillingId,
    /// Stored field values.
    #[serde(flatten)]
    pub fields: BillingPayload,
}

/// Existing cost/report link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReportLinkRecord {
    /// Link id.
    pub id: LinkId,
    /// Linked cost.
    pub cost_id: CostId,
    /// Linked report.
    pub report_id: ReportId,
    /// Stored field values.
    #[serde(flatten)]
    pub fields: CostReportLinkPayload,
}

/// Existing billing/report link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingReportLinkRecord {
    /// Link id.
    pub id: LinkId,
    /// Linked billing.
    pub billing_id: BillingId,
    /// Linked report.
    pub report_id: ReportId,
    /// Stored field values.
    #[serde(flatten)]
    pub fields: BillingReportLinkPayload,
}
