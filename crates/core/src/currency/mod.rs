//! Currency rounding and exchange rates.

pub mod conversion;
pub mod exchange;

pub use conversion::{round2, round_money, within_tolerance};
pub use exchange::{ExchangeRate, ExchangeRateLookup, FixedParity, RateTable};
