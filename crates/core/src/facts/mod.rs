//! Fact derivation.
//!
//! Converts a generated report into a flat list of typed facts: proposed
//! reports, costs, billings and the links between them. Facts live for one
//! reconciliation run only; links refer to other facts by [`FactId`].
//!
//! [`FactId`]: timebill_shared::types::FactId

pub mod derive;
pub mod description;
pub mod ids;
pub mod types;

#[cfg(test)]
mod derive_props;

pub use derive::{DerivationContext, convert_generated_report_to_facts};
pub use ids::{FnMutUuids, RandomUuids, SequentialUuids, UuidFactory};
pub use types::{
    BillingConstraints, BillingFact, BillingTerms, CostConstraints, CostFact, Fact, FactKind,
    FactSet, LinkBillingReportFact, LinkCostReportFact, LinkedBillingReport, LinkedCostReport,
    ReportFact,
};
