//! Creation/update payloads.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use timebill_shared::types::{
    ClientId, ContractorId, Currency, ProjectIterationId, WorkspaceId,
};

/// Contractor report payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    /// Reporting contractor.
    pub contractor_id: ContractorId,
    /// Client the work was done for.
    pub client_id: ClientId,
    /// Workspace the report is filed in.
    pub workspace_id: WorkspaceId,
    /// Iteration the report belongs to.
    pub project_iteration_id: ProjectIterationId,
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Report currency.
    pub currency: Currency,
    /// Net value.
    pub net_value: Decimal,
    /// Unit of `quantity`.
    pub unit: String,
    /// Quantity in `unit`.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Human-readable description.
    pub description: String,
}

/// Contractor cost payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostPayload {
    /// Contractor the cost is owed to.
    pub contractor_id: ContractorId,
    /// Workspace bearing the cost.
    pub workspace_id: WorkspaceId,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Cost currency.
    pub currency: Currency,
    /// Net value.
    pub net_value: Decimal,
    /// Gross value (equal to net; tax is not modeled).
    pub gross_value: Decimal,
    /// Human-readable description.
    pub description: String,
}

/// Client billing payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPayload {
    /// Billed client.
    pub client_id: ClientId,
    /// Issuing workspace.
    pub workspace_id: WorkspaceId,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Billing currency.
    pub currency: Currency,
    /// Total net.
    pub total_net: Decimal,
    /// Total gross (equal to net; tax is not modeled).
    pub total_gross: Decimal,
    /// Human-readable description.
    pub description: String,
}

/// How a cost/report link amount was computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReportBreakdown {
    /// Quantity.
    pub quantity: Decimal,
    /// Unit of quantity.
    pub unit: String,
    /// Report unit price.
    pub report_unit_price: Decimal,
    /// Cost unit price.
    pub cost_unit_price: Decimal,
    /// Report currency.
    pub report_currency: Currency,
    /// Cost currency.
    pub cost_currency: Currency,
    /// Cost-to-report exchange rate.
    pub exchange_rate: Decimal,
}

/// Link between a cost and a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReportLinkPayload {
    /// Amount taken from the cost.
    pub cost_amount: Decimal,
    /// Amount attributed to the report.
    pub report_amount: Decimal,
    /// Computation breakdown.
    pub breakdown: CostReportBreakdown,
    /// Human-readable description.
    pub description: String,
}

/// How a billing/report link amount was computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingReportBreakdown {
    /// Quantity.
    pub quantity: Decimal,
    /// Unit of quantity.
    pub unit: String,
    /// Report unit price.
    pub report_unit_price: Decimal,
    /// Billing unit price.
    pub billing_unit_price: Decimal,
    /// Report currency.
    pub report_currency: Currency,
    /// Billing currency.
    pub billing_currency: Currency,
    /// Report-to-billing exchange rate, informational.
    pub exchange_rate: Decimal,
}

/// Link between a billing and a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingReportLinkPayload {
    /// Amount billed for the report.
    pub billing_amount: Decimal,
    /// Report amount covered.
    pub report_amount: Decimal,
    /// Computation breakdown.
    pub breakdown: BillingReportBreakdown,
    /// Human-readable description.
    pub description: String,
}
