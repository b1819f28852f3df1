//! Property-based tests for rate matching.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use timebill_shared::types::{ContractorId, Currency};

use super::matching::{get_matching_rate, specificity};
use crate::generated::{RoleRate, RoleType, TimeEntry};

fn arb_filter() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof![Just("x".to_string()), Just("y".to_string())], 0..3)
}

fn arb_rate() -> impl Strategy<Value = RoleRate> {
    (arb_filter(), arb_filter(), arb_filter(), 1i64..500).prop_map(
        |(activity_types, task_types, project_ids, cost)| RoleRate {
            activity_types,
            task_types,
            project_ids,
            cost_rate: Decimal::from(cost),
            cost_currency: Currency::EUR,
            billing_rate: Decimal::from(cost * 2),
            billing_currency: Currency::EUR,
        },
    )
}

fn entry(activity: &str, task: &str, project: &str) -> TimeEntry {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
    TimeEntry {
        id: "e".to_string(),
        note: None,
        task_id: task.to_string(),
        activity_id: activity.to_string(),
        project_id: project.to_string(),
        role_id: "role".to_string(),
        contractor_id: ContractorId::new(1),
        start_at: start,
        end_at: start + chrono::Duration::hours(1),
    }
}

fn matches(rate: &RoleRate, entry: &TimeEntry) -> bool {
    let ok = |ids: &[String], id: &str| ids.is_empty() || ids.iter().any(|i| i == id);
    ok(&rate.activity_types, &entry.activity_id)
        && ok(&rate.task_types, &entry.task_id)
        && ok(&rate.project_ids, &entry.project_id)
}

proptest! {
    /// The chosen rate matches the entry, is maximally specific, and is the
    /// first rate with that specificity.
    #[test]
    fn prop_selected_rate_is_first_most_specific(
        rates in prop::collection::vec(arb_rate(), 0..8),
        activity in prop_oneof![Just("x"), Just("y")],
        task in prop_oneof![Just("x"), Just("y")],
    ) {
        let entry = entry(activity, task, "x");
        let roles = BTreeMap::from([(
            "role".to_string(),
            RoleType { name: "Role".to_string(), description: String::new(), rates },
        )]);

        let matching: Vec<&RoleRate> =
            roles["role"].rates.iter().filter(|r| matches(r, &entry)).collect();

        match get_matching_rate(&roles, &entry) {
            Ok(selected) => {
                let best = matching.iter().map(|r| specificity(r)).max().unwrap();
                let first_best = matching.iter().find(|r| specificity(r) == best).unwrap();
                prop_assert!(std::ptr::eq(selected, *first_best));
            }
            Err(_) => prop_assert!(matching.is_empty()),
        }
    }
}
