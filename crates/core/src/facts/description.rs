//! Human-readable fact descriptions.
//!
//! Output is byte-for-byte reproducible for the same inputs: amounts always
//! print with 2 decimals and lines are joined with `\n`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use timebill_shared::types::Currency;

use crate::currency::round2;

/// Work of one contractor at one rate.
#[derive(Debug, Clone, Copy)]
pub struct WorkSummary<'a> {
    /// Contractor display name.
    pub contractor: &'a str,
    /// Role names, comma separated.
    pub roles: &'a str,
    /// Quantity worked.
    pub quantity: Decimal,
    /// Unit of quantity.
    pub unit: &'a str,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Resulting amount.
    pub amount: Decimal,
    /// Currency of price and amount.
    pub currency: Currency,
}

impl WorkSummary<'_> {
    fn calculation(&self) -> String {
        format!(
            "{} {} x {} {cur} = {} {cur}",
            fmt2(self.quantity),
            self.unit,
            fmt2(self.unit_price),
            fmt2(self.amount),
            cur = self.currency,
        )
    }
}

/// Description of a contractor report.
#[must_use]
pub fn create_report_description(work: &WorkSummary<'_>, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} work by {}\n{}\nPeriod: {start} to {end}",
        work.roles,
        work.contractor,
        work.calculation(),
    )
}

/// Description of a contractor cost.
#[must_use]
pub fn create_cost_description(work: &WorkSummary<'_>, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "Cost of {} ({})\n{}\nPeriod: {start} to {end}",
        work.contractor,
        work.roles,
        work.calculation(),
    )
}

/// Description of a billing enumerating every billed report.
#[must_use]
pub fn create_billing_description(
    lines: &[WorkSummary<'_>],
    total: Decimal,
    currency: Currency,
    start: NaiveDate,
    end: NaiveDate,
) -> String {
    let mut out = format!("Billing for {start} to {end}");
    for line in lines {
        out.push_str(&format!(
            "\n- {} ({}): {}",
            line.contractor,
            line.roles,
            line.calculation()
        ));
    }
    out.push_str(&format!("\nTotal: {} {currency}", fmt2(total)));
    out
}

/// Description of a cost/report or billing/report link.
#[must_use]
pub fn create_link_description(work: &WorkSummary<'_>) -> String {
    format!("{}: {}", work.contractor, work.calculation())
}

fn fmt2(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}
