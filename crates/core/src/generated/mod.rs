//! Generated time-tracking reports.
//!
//! A generated report is the raw input of reconciliation: time entries plus
//! the role, task, activity and project definitions they reference.

pub mod types;

pub use types::{
    Definition, GeneratedReport, GenericReport, ReportDefinitions, RoleRate, RoleType, TimeEntry,
};
