//! System-of-record entities touched by reconciliation.
//!
//! Payload types mirror the creation/update payloads of the mutation service
//! and carry every field (no partial payloads). Record types are persisted
//! entities as returned by data sources.

pub mod payloads;
pub mod project;
pub mod records;

pub use payloads::{
    BillingPayload, BillingReportBreakdown, BillingReportLinkPayload, CostPayload,
    CostReportBreakdown, CostReportLinkPayload, ReportPayload,
};
pub use project::{Project, ProjectIteration};
pub use records::{
    BillingRecord, BillingReportLinkRecord, CostRecord, CostReportLinkRecord, ReportRecord,
};
