//! Property-based tests for fact derivation.
//!
//! - Cost links always carry equal cost and report amounts
//! - Billing totals equal the sum of their billed reports
//! - Derivation does not depend on time entry order, even when roles share
//!   cost terms but bill differently

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use timebill_shared::types::{ContractorId, Currency, WorkspaceId};

use crate::generated::{GenericReport, RoleType, TimeEntry};
use crate::test_support::{derive, derive_set, entry, project, rate, report_with_rates};

type EntrySpec = (i64, bool, bool, u32, i64);

/// Strategy for a time entry: contractor 1-3, one of two activities, one of
/// two roles, whole quarter hours up to 10h so hour sums stay exact.
fn arb_entry() -> impl Strategy<Value = EntrySpec> {
    (
        1i64..4,
        any::<bool>(),
        any::<bool>(),
        1u32..29,
        (1i64..41).prop_map(|q| q * 15),
    )
}

/// Developer and lead rates share cost terms per activity; the lead bills
/// coding in another currency and meetings at another price.
fn build_report(specs: &[EntrySpec]) -> GenericReport {
    let mut report = report_with_rates(vec![
        rate(&["coding"], dec!(47.5), Currency::EUR, dec!(66.666), Currency::EUR),
        rate(&["meeting"], dec!(33.333), Currency::EUR, dec!(120), Currency::PLN),
    ]);
    report.definitions.role_types.insert(
        "lead".to_string(),
        RoleType {
            name: "Lead".to_string(),
            description: String::new(),
            rates: vec![
                rate(&["coding"], dec!(47.5), Currency::EUR, dec!(90), Currency::USD),
                rate(&["meeting"], dec!(33.333), Currency::EUR, dec!(150), Currency::PLN),
            ],
        },
    );
    report.time_entries = specs
        .iter()
        .enumerate()
        .map(|(i, &(contractor, coding, lead, day, minutes))| {
            let activity = if coding { "coding" } else { "meeting" };
            let mut time_entry = entry(&format!("e{i}"), contractor, activity, day, minutes);
            if lead {
                time_entry.role_id = "lead".to_string();
            }
            time_entry
        })
        .collect::<Vec<TimeEntry>>();
    report
}

fn workspaces() -> HashMap<ContractorId, WorkspaceId> {
    HashMap::from([
        (ContractorId::new(1), WorkspaceId::new(100)),
        (ContractorId::new(2), WorkspaceId::new(200)),
    ])
}

proptest! {
    #[test]
    fn prop_cost_link_amounts_match(specs in prop::collection::vec(arb_entry(), 0..20)) {
        let facts = derive_set(&build_report(&specs), &project(&[100, 200]), &workspaces());

        prop_assert_eq!(facts.cost_report_links.len(), facts.reports.len());
        for (link, cost) in facts.cost_report_links.iter().zip(&facts.costs) {
            prop_assert_eq!(link.payload.cost_amount, link.payload.report_amount);
            prop_assert_eq!(link.payload.cost_amount, cost.payload.net_value);
        }
    }

    #[test]
    fn prop_billing_total_is_sum_of_reports(specs in prop::collection::vec(arb_entry(), 1..20)) {
        let facts = derive_set(&build_report(&specs), &project(&[100, 200]), &workspaces());
        let by_uuid: HashMap<_, _> = facts.reports.iter().map(|r| (r.uuid, r)).collect();

        let mut billed = HashSet::new();
        for billing in &facts.billings {
            let sum: Decimal = billing
                .constraints
                .linked_to_reports
                .iter()
                .map(|id| by_uuid[id].billing.amount)
                .sum();
            prop_assert_eq!(billing.payload.total_net, sum);
            for id in &billing.constraints.linked_to_reports {
                prop_assert_eq!(by_uuid[id].billing.currency, billing.payload.currency);
                prop_assert!(billed.insert(*id), "report billed twice");
            }
        }
        prop_assert_eq!(billed.len(), facts.reports.len());
    }

    #[test]
    fn prop_entry_order_is_irrelevant(
        specs in prop::collection::vec(arb_entry(), 0..12),
        rotate in 0usize..12,
    ) {
        let forward = derive(&build_report(&specs), &project(&[100, 200]), &workspaces());

        let mut shuffled = specs.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let by = rotate % shuffled.len();
            shuffled.rotate_left(by);
        }
        let backward = derive(&build_report(&shuffled), &project(&[100, 200]), &workspaces());

        prop_assert_eq!(forward, backward);
    }
}
