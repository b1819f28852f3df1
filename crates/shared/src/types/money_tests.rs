use super::*;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_money_zero() {
    let money = Money::zero(Currency::EUR);
    assert_eq!(money.amount, Decimal::ZERO);
    assert!(money.is_zero());
    assert!(!money.is_negative());
}

#[test]
fn test_money_negative() {
    let money = Money::new(Decimal::new(-100, 2), Currency::USD);
    assert!(money.is_negative());
}

#[test]
fn test_currency_ordering_is_alphabetical() {
    let mut codes = vec![Currency::USD, Currency::EUR, Currency::PLN];
    codes.sort();
    assert_eq!(codes, vec![Currency::EUR, Currency::PLN, Currency::USD]);
}

#[test]
fn test_currency_error_message() {
    let err = Currency::from_str("XX").unwrap_err();
    assert_eq!(err.to_string(), "Unknown currency: XX");
}
