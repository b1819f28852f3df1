//! Monetary rounding.
//!
//! Amounts placed in payloads are always rounded to 2 decimal places with
//! midpoints rounded away from zero (`16.6665 -> 16.67`).

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Rounds to 2 decimal places, midpoint away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    round_money(value, 2)
}

/// Rounds to `decimal_places`, midpoint away from zero.
#[must_use]
pub fn round_money(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if `a` and `b` differ by at most `tolerance`.
#[must_use]
pub fn within_tolerance(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}
