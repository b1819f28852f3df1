//! Rate matching and specificity.

use std::collections::BTreeMap;

use crate::generated::{RoleRate, RoleType, TimeEntry};

use super::error::RateError;

/// Returns the most specific rate of the entry's role that matches the entry.
///
/// A rate matches when each of its activity, task and project filters is
/// empty or contains the entry's id. Among matches, the rate with the most
/// non-empty filters wins; ties go to the earliest rate in the role's list.
///
/// # Errors
///
/// Returns `RoleTypeNotFound` if the role is not defined and `NoMatchingRate`
/// if no rate matches.
pub fn get_matching_rate<'a>(
    role_types: &'a BTreeMap<String, RoleType>,
    entry: &TimeEntry,
) -> Result<&'a RoleRate, RateError> {
    let role = role_types
        .get(&entry.role_id)
        .ok_or_else(|| RateError::RoleTypeNotFound(entry.role_id.clone()))?;

    let mut best: Option<&RoleRate> = None;
    for rate in role.rates.iter().filter(|rate| matches_entry(rate, entry)) {
        // Strictly greater keeps the first of equally specific rates.
        if best.is_none_or(|current| specificity(rate) > specificity(current)) {
            best = Some(rate);
        }
    }

    best.ok_or_else(|| RateError::NoMatchingRate {
        role_id: entry.role_id.clone(),
        activity_id: entry.activity_id.clone(),
        task_id: entry.task_id.clone(),
        project_id: entry.project_id.clone(),
    })
}

/// Number of non-wildcard filter dimensions (0 to 3).
#[must_use]
pub fn specificity(rate: &RoleRate) -> usize {
    [&rate.activity_types, &rate.task_types, &rate.project_ids]
        .iter()
        .filter(|ids| !ids.is_empty())
        .count()
}

/// Deterministic grouping key of a rate.
///
/// Built from the sorted filter id lists plus the cost rate and currency, so
/// equivalent rates produce the same key regardless of list order.
#[must_use]
pub fn rate_signature(rate: &RoleRate) -> String {
    format!(
        "activities:{}|tasks:{}|projects:{}|cost:{} {}",
        sorted_ids(&rate.activity_types),
        sorted_ids(&rate.task_types),
        sorted_ids(&rate.project_ids),
        rate.cost_rate.normalize(),
        rate.cost_currency,
    )
}

fn matches_entry(rate: &RoleRate, entry: &TimeEntry) -> bool {
    accepts(&rate.activity_types, &entry.activity_id)
        && accepts(&rate.task_types, &entry.task_id)
        && accepts(&rate.project_ids, &entry.project_id)
}

fn accepts(ids: &[String], id: &str) -> bool {
    ids.is_empty() || ids.iter().any(|candidate| candidate == id)
}

fn sorted_ids(ids: &[String]) -> String {
    let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use timebill_shared::types::{ContractorId, Currency};

    fn rate(activities: &[&str], tasks: &[&str], projects: &[&str], cost: Decimal) -> RoleRate {
        RoleRate {
            activity_types: activities.iter().map(ToString::to_string).collect(),
            task_types: tasks.iter().map(ToString::to_string).collect(),
            project_ids: projects.iter().map(ToString::to_string).collect(),
            cost_rate: cost,
            cost_currency: Currency::EUR,
            billing_rate: cost * dec!(2),
            billing_currency: Currency::EUR,
        }
    }

    fn roles(rates: Vec<RoleRate>) -> BTreeMap<String, RoleType> {
        BTreeMap::from([(
            "dev".to_string(),
            RoleType {
                name: "Developer".to_string(),
                description: String::new(),
                rates,
            },
        )])
    }

    fn entry(role: &str, activity: &str, task: &str, project: &str) -> TimeEntry {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        TimeEntry {
            id: "e1".to_string(),
            note: None,
            task_id: task.to_string(),
            activity_id: activity.to_string(),
            project_id: project.to_string(),
            role_id: role.to_string(),
            contractor_id: ContractorId::new(1),
            start_at: start,
            end_at: start + chrono::Duration::hours(1),
        }
    }

    #[test]
    fn test_most_specific_rate_wins() {
        let roles = roles(vec![
            rate(&[], &[], &[], dec!(30)),
            rate(&["dev"], &[], &[], dec!(40)),
            rate(&["dev"], &["feat"], &[], dec!(50)),
            rate(&["dev"], &["feat"], &["p1"], dec!(60)),
        ]);

        let result = get_matching_rate(&roles, &entry("dev", "dev", "feat", "p1")).unwrap();
        assert_eq!(result.cost_rate, dec!(60));
    }

    #[test]
    fn test_partial_match_falls_back_to_less_specific() {
        let roles = roles(vec![
            rate(&[], &[], &[], dec!(30)),
            rate(&["dev"], &["feat"], &["p1"], dec!(60)),
        ]);

        let result = get_matching_rate(&roles, &entry("dev", "dev", "feat", "p2")).unwrap();
        assert_eq!(result.cost_rate, dec!(30));
    }

    #[test]
    fn test_tie_goes_to_first_rate() {
        let roles = roles(vec![
            rate(&["dev"], &[], &[], dec!(40)),
            rate(&[], &["feat"], &[], dec!(45)),
        ]);

        let result = get_matching_rate(&roles, &entry("dev", "dev", "feat", "p1")).unwrap();
        assert_eq!(result.cost_rate, dec!(40));
    }

    #[test]
    fn test_unknown_role() {
        let roles = roles(vec![rate(&[], &[], &[], dec!(30))]);
        let err = get_matching_rate(&roles, &entry("qa", "dev", "feat", "p1")).unwrap_err();
        assert_eq!(err, RateError::RoleTypeNotFound("qa".to_string()));
    }

    #[test]
    fn test_no_matching_rate() {
        let roles = roles(vec![rate(&["design"], &[], &[], dec!(30))]);
        let err = get_matching_rate(&roles, &entry("dev", "dev", "feat", "p1")).unwrap_err();
        assert!(matches!(err, RateError::NoMatchingRate { ref activity_id, .. } if activity_id == "dev"));
    }

    #[test]
    fn test_specificity_counts_non_empty_filters() {
        assert_eq!(specificity(&rate(&[], &[], &[], dec!(1))), 0);
        assert_eq!(specificity(&rate(&["a"], &[], &["p"], dec!(1))), 2);
        assert_eq!(specificity(&rate(&["a"], &["t"], &["p"], dec!(1))), 3);
    }

    #[test]
    fn test_signature_ignores_id_order_and_scale() {
        let a = rate(&["b", "a"], &[], &["p2", "p1"], dec!(50));
        let b = rate(&["a", "b"], &[], &["p1", "p2"], dec!(50.00));
        assert_eq!(rate_signature(&a), rate_signature(&b));
        assert_eq!(
            rate_signature(&a),
            "activities:a,b|tasks:|projects:p1,p2|cost:50 EUR"
        );
    }

    #[test]
    fn test_signature_distinguishes_cost() {
        let a = rate(&["a"], &[], &[], dec!(50));
        let b = rate(&["a"], &[], &[], dec!(51));
        assert_ne!(rate_signature(&a), rate_signature(&b));
    }
}
