//! Generated report to facts conversion.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use timebill_shared::types::{ContractorId, Currency, WorkspaceId};
use tracing::{debug, warn};

use super::description::{
    WorkSummary, create_billing_description, create_cost_description, create_link_description,
    create_report_description,
};
use super::ids::UuidFactory;
use super::types::{
    BillingConstraints, BillingFact, BillingTerms, CostConstraints, CostFact, Fact,
    LinkBillingReportFact, LinkCostReportFact, LinkedBillingReport, LinkedCostReport, ReportFact,
};
use crate::currency::{ExchangeRateLookup, round2};
use crate::entities::{
    BillingPayload, BillingReportBreakdown, BillingReportLinkPayload, CostPayload,
    CostReportBreakdown, CostReportLinkPayload, Project, ProjectIteration, ReportPayload,
};
use crate::generated::GenericReport;
use crate::rates::{get_matching_rate, rate_signature};

/// Everything fact derivation reads besides the id factory.
#[derive(Clone, Copy)]
pub struct DerivationContext<'a> {
    /// Time entries and definitions.
    pub report: &'a GenericReport,
    /// Iteration being reconciled.
    pub iteration: &'a ProjectIteration,
    /// Project of the iteration.
    pub project: &'a Project,
    /// Workspace each contractor reports into.
    pub contractor_workspaces: &'a HashMap<ContractorId, WorkspaceId>,
    /// Contractor display names.
    pub contractor_names: &'a HashMap<ContractorId, String>,
    /// Unit stamped on quantities.
    pub unit: &'a str,
    /// Exchange rates stamped on link breakdowns.
    pub exchange_rates: &'a dyn ExchangeRateLookup,
}

impl DerivationContext<'_> {
    fn contractor_name(&self, id: ContractorId) -> String {
        self.contractor_names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Contractor #{id}"))
    }

    /// Contractor's workspace, else the project's first, else the `0` placeholder.
    fn workspace_for(&self, id: ContractorId) -> WorkspaceId {
        self.contractor_workspaces
            .get(&id)
            .copied()
            .or_else(|| self.project.default_workspace())
            .unwrap_or_default()
    }
}

/// Entries of one contractor at one cost rate and billing currency.
///
/// Entries of different roles can share a cost rate while billing at
/// different prices, so billed hours are kept per billing rate.
struct RateGroup<'a> {
    contractor_id: ContractorId,
    signature: String,
    cost_rate: Decimal,
    cost_currency: Currency,
    billing_currency: Currency,
    hours: Decimal,
    billed_hours: BTreeMap<Decimal, Decimal>,
    roles: BTreeSet<&'a str>,
}

impl RateGroup<'_> {
    fn billing(&self) -> BillingTerms {
        let exact: Decimal = self
            .billed_hours
            .iter()
            .map(|(rate, hours)| *hours * *rate)
            .sum();
        let unit_price = match self.billed_hours.keys().next() {
            Some(rate) if self.billed_hours.len() == 1 => *rate,
            _ => exact.checked_div(self.hours).unwrap_or(Decimal::ZERO),
        };
        BillingTerms {
            currency: self.billing_currency,
            unit_price: round2(unit_price),
            amount: round2(exact),
        }
    }
}

/// A derived report with the display data billings need.
struct DerivedReport {
    fact: ReportFact,
    contractor: String,
    roles: String,
}

impl DerivedReport {
    fn billing_summary<'a>(&'a self, unit: &'a str) -> WorkSummary<'a> {
        WorkSummary {
            contractor: &self.contractor,
            roles: &self.roles,
            quantity: self.fact.payload.quantity,
            unit,
            unit_price: self.fact.billing.unit_price,
            amount: self.fact.billing.amount,
            currency: self.fact.billing.currency,
        }
    }
}

/// Converts a generated report into facts.
///
/// Entries whose rate cannot be resolved are skipped with a warning. The
/// result lists, per contractor, cost rate and billing currency, a report, a
/// cost and their link, followed by, per workspace and billing currency, a
/// billing and one link per billed report.
pub fn convert_generated_report_to_facts(
    ctx: &DerivationContext<'_>,
    ids: &impl UuidFactory,
) -> Vec<Fact> {
    let groups = group_entries(ctx);
    debug!(groups = groups.len(), "Grouped time entries by contractor and rate");

    let mut facts = Vec::with_capacity(groups.len() * 5);
    let mut derived = Vec::with_capacity(groups.len());

    for group in groups.into_values() {
        let report = derive_report(ctx, ids, &group, &mut facts);
        derived.push(report);
    }

    derive_billings(ctx, ids, &derived, &mut facts);
    facts
}

type GroupKey = (ContractorId, String, Currency);

fn group_entries<'a>(ctx: &DerivationContext<'a>) -> BTreeMap<GroupKey, RateGroup<'a>> {
    let report: &'a GenericReport = ctx.report;
    let definitions = &report.definitions;
    let mut groups: BTreeMap<GroupKey, RateGroup<'a>> = BTreeMap::new();

    for entry in &report.time_entries {
        let rate = match get_matching_rate(&definitions.role_types, entry) {
            Ok(rate) => rate,
            Err(error) => {
                warn!(
                    entry_id = %entry.id,
                    role_id = %entry.role_id,
                    contractor_id = %entry.contractor_id,
                    %error,
                    "Skipping time entry without a matching rate"
                );
                continue;
            }
        };

        let signature = rate_signature(rate);
        let group = groups
            .entry((entry.contractor_id, signature.clone(), rate.billing_currency))
            .or_insert_with(|| RateGroup {
                contractor_id: entry.contractor_id,
                signature,
                cost_rate: rate.cost_rate.normalize(),
                cost_currency: rate.cost_currency,
                billing_currency: rate.billing_currency,
                hours: Decimal::ZERO,
                billed_hours: BTreeMap::new(),
                roles: BTreeSet::new(),
            });
        let hours = entry.duration_hours();
        group.hours += hours;
        *group.billed_hours.entry(rate.billing_rate).or_default() += hours;

        if let Some(role) = definitions.role_types.get(&entry.role_id) {
            group.roles.insert(&role.name);
        }
    }

    groups
}

fn derive_report(
    ctx: &DerivationContext<'_>,
    ids: &impl UuidFactory,
    group: &RateGroup<'_>,
    facts: &mut Vec<Fact>,
) -> DerivedReport {
    let iteration = ctx.iteration;
    let net_value = round2(group.hours * group.cost_rate);
    let quantity = round2(group.hours);
    let unit_price = round2(group.cost_rate);
    let billing = group.billing();
    let workspace_id = ctx.workspace_for(group.contractor_id);

    let contractor = ctx.contractor_name(group.contractor_id);
    let roles = group.roles.iter().copied().collect::<Vec<_>>().join(", ");
    let work = WorkSummary {
        contractor: &contractor,
        roles: &roles,
        quantity,
        unit: ctx.unit,
        unit_price,
        amount: net_value,
        currency: group.cost_currency,
    };

    let report_id = ids.next_fact_id();
    let cost_id = ids.next_fact_id();
    let link_id = ids.next_fact_id();

    let report = ReportFact {
        uuid: report_id,
        payload: ReportPayload {
            contractor_id: group.contractor_id,
            client_id: ctx.project.client_id,
            workspace_id,
            project_iteration_id: iteration.id,
            period_start: iteration.period_start,
            period_end: iteration.period_end,
            currency: group.cost_currency,
            net_value,
            unit: ctx.unit.to_string(),
            quantity,
            unit_price,
            description: create_report_description(
                &work,
                iteration.period_start,
                iteration.period_end,
            ),
        },
        billing,
        rate_signature: group.signature.clone(),
    };

    let cost = CostFact {
        uuid: cost_id,
        payload: CostPayload {
            contractor_id: group.contractor_id,
            workspace_id,
            invoice_date: iteration.period_end,
            currency: group.cost_currency,
            net_value,
            gross_value: net_value,
            description: create_cost_description(&work, iteration.period_start, iteration.period_end),
        },
        constraints: CostConstraints {
            linked_to_report: report_id,
        },
    };

    let link = LinkCostReportFact {
        uuid: link_id,
        payload: CostReportLinkPayload {
            cost_amount: net_value,
            report_amount: net_value,
            breakdown: CostReportBreakdown {
                quantity,
                unit: ctx.unit.to_string(),
                report_unit_price: unit_price,
                cost_unit_price: unit_price,
                report_currency: group.cost_currency,
                cost_currency: group.cost_currency,
                exchange_rate: ctx.exchange_rates.rate_or_parity(
                    group.cost_currency,
                    group.cost_currency,
                    iteration.period_end,
                ),
            },
            description: create_link_description(&work),
        },
        linked_facts: LinkedCostReport {
            cost: cost_id,
            report: report_id,
        },
    };

    facts.push(Fact::Report(report.clone()));
    facts.push(Fact::Cost(cost));
    facts.push(Fact::LinkCostReport(link));

    DerivedReport {
        fact: report,
        contractor,
        roles,
    }
}

fn derive_billings(
    ctx: &DerivationContext<'_>,
    ids: &impl UuidFactory,
    reports: &[DerivedReport],
    facts: &mut Vec<Fact>,
) {
    let iteration = ctx.iteration;
    let mut groups: BTreeMap<(WorkspaceId, Currency), Vec<&DerivedReport>> = BTreeMap::new();
    for report in reports {
        groups
            .entry((report.fact.payload.workspace_id, report.fact.billing.currency))
            .or_default()
            .push(report);
    }

    for ((workspace_id, currency), members) in groups {
        let total: Decimal = round2(members.iter().map(|r| r.fact.billing.amount).sum());
        let lines: Vec<WorkSummary<'_>> =
            members.iter().map(|r| r.billing_summary(ctx.unit)).collect();

        let billing_id = ids.next_fact_id();
        debug!(
            %workspace_id,
            %currency,
            reports = members.len(),
            %total,
            "Derived billing"
        );

        facts.push(Fact::Billing(BillingFact {
            uuid: billing_id,
            payload: BillingPayload {
                client_id: ctx.project.client_id,
                workspace_id,
                invoice_date: iteration.period_end,
                currency,
                total_net: total,
                total_gross: total,
                description: create_billing_description(
                    &lines,
                    total,
                    currency,
                    iteration.period_start,
                    iteration.period_end,
                ),
            },
            constraints: BillingConstraints {
                linked_to_reports: members.iter().map(|r| r.fact.uuid).collect(),
            },
        }));

        for (report, line) in members.iter().zip(&lines) {
            let payload = &report.fact.payload;
            facts.push(Fact::LinkBillingReport(LinkBillingReportFact {
                uuid: ids.next_fact_id(),
                payload: BillingReportLinkPayload {
                    billing_amount: report.fact.billing.amount,
                    report_amount: payload.net_value,
                    breakdown: BillingReportBreakdown {
                        quantity: payload.quantity,
                        unit: ctx.unit.to_string(),
                        report_unit_price: payload.unit_price,
                        billing_unit_price: report.fact.billing.unit_price,
                        report_currency: payload.currency,
                        billing_currency: currency,
                        exchange_rate: ctx.exchange_rates.rate_or_parity(
                            payload.currency,
                            currency,
                            iteration.period_end,
                        ),
                    },
                    description: create_link_description(line),
                },
                linked_facts: LinkedBillingReport {
                    billing: billing_id,
                    report: report.fact.uuid,
                },
            }));
        }
    }
}
