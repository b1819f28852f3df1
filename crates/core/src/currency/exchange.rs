//! Exchange rate types and lookup.
//!
//! Cross-currency conversion between a cost and its report is not modeled;
//! the pipeline stamps the looked-up rate on link breakdowns for display only.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use timebill_shared::types::Currency;

/// Exchange rate between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: Currency,
    /// Target currency code.
    pub to_currency: Currency,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// Date this rate is effective.
    pub effective_date: NaiveDate,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        from_currency: Currency,
        to_currency: Currency,
        rate: Decimal,
        effective_date: NaiveDate,
    ) -> Self {
        Self {
            from_currency,
            to_currency,
            rate,
            effective_date,
        }
    }

    /// Returns the inverse rate, or `None` for a zero rate.
    #[must_use]
    pub fn inverse(&self) -> Option<Self> {
        if self.rate.is_zero() {
            return None;
        }
        Some(Self {
            from_currency: self.to_currency,
            to_currency: self.from_currency,
            rate: Decimal::ONE / self.rate,
            effective_date: self.effective_date,
        })
    }
}

/// Source of exchange rates.
pub trait ExchangeRateLookup {
    /// Returns the rate converting `from` into `to` on the given date.
    fn rate(&self, from: Currency, to: Currency, on: NaiveDate) -> Option<Decimal>;

    /// Like [`ExchangeRateLookup::rate`], with identical currencies at parity
    /// and unknown pairs defaulting to 1.
    fn rate_or_parity(&self, from: Currency, to: Currency, on: NaiveDate) -> Decimal {
        if from == to {
            return Decimal::ONE;
        }
        self.rate(from, to, on).unwrap_or(Decimal::ONE)
    }
}

/// Lookup that treats every pair as 1:1.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedParity;

impl ExchangeRateLookup for FixedParity {
    fn rate(&self, _from: Currency, _to: Currency, _on: NaiveDate) -> Option<Decimal> {
        Some(Decimal::ONE)
    }
}

/// In-memory rate table; uses the most recent rate effective on or before the date.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<(Currency, Currency), Vec<ExchangeRate>>,
}

impl RateTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rate and its inverse.
    pub fn insert(&mut self, rate: ExchangeRate) {
        if let Some(inverse) = rate.inverse() {
            self.push(inverse);
        }
        self.push(rate);
    }

    fn push(&mut self, rate: ExchangeRate) {
        let entry = self
            .rates
            .entry((rate.from_currency, rate.to_currency))
            .or_default();
        entry.push(rate);
        entry.sort_by_key(|r| r.effective_date);
    }
}

impl ExchangeRateLookup for RateTable {
    fn rate(&self, from: Currency, to: Currency, on: NaiveDate) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }
        self.rates
            .get(&(from, to))?
            .iter()
            .rev()
            .find(|r| r.effective_date <= on)
            .map(|r| r.rate)
    }
}
