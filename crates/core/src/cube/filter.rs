//! Dimension filters.

use serde::{Deserialize, Serialize};

use super::types::CubeValue;

/// Condition on a single dimension value.
///
/// Ordering operators only hold between values of the same kind; text
/// operators compare against the value's display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operator", content = "value", rename_all = "camelCase")]
pub enum FilterCondition {
    Equals(CubeValue),
    NotEquals(CubeValue),
    In(Vec<CubeValue>),
    NotIn(Vec<CubeValue>),
    GreaterThan(CubeValue),
    GreaterThanOrEqual(CubeValue),
    LessThan(CubeValue),
    LessThanOrEqual(CubeValue),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
}

const fn same_kind(a: &CubeValue, b: &CubeValue) -> bool {
    matches!(
        (a, b),
        (CubeValue::Null, CubeValue::Null)
            | (CubeValue::Bool(_), CubeValue::Bool(_))
            | (CubeValue::Number(_), CubeValue::Number(_))
            | (CubeValue::Date(_), CubeValue::Date(_))
            | (CubeValue::Text(_), CubeValue::Text(_))
    )
}

impl FilterCondition {
    /// Returns true if `value` satisfies the condition.
    #[must_use]
    pub fn matches(&self, value: &CubeValue) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::NotEquals(expected) => value != expected,
            Self::In(options) => options.contains(value),
            Self::NotIn(options) => !options.contains(value),
            Self::GreaterThan(bound) => same_kind(value, bound) && value > bound,
            Self::GreaterThanOrEqual(bound) => same_kind(value, bound) && value >= bound,
            Self::LessThan(bound) => same_kind(value, bound) && value < bound,
            Self::LessThanOrEqual(bound) => same_kind(value, bound) && value <= bound,
            Self::Contains(needle) => !value.is_null() && value.to_string().contains(needle.as_str()),
            Self::StartsWith(prefix) => {
                !value.is_null() && value.to_string().starts_with(prefix.as_str())
            }
            Self::EndsWith(suffix) => !value.is_null() && value.to_string().ends_with(suffix.as_str()),
        }
    }
}

/// Filter on one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    /// Dimension id.
    pub dimension: String,
    /// Test the dimension value must pass.
    #[serde(flatten)]
    pub condition: FilterCondition,
}

impl DimensionFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(dimension: impl Into<String>, condition: FilterCondition) -> Self {
        Self {
            dimension: dimension.into(),
            condition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn num(n: rust_decimal::Decimal) -> CubeValue {
        CubeValue::Number(n)
    }

    #[rstest]
    #[case(FilterCondition::Equals(num(dec!(5))), num(dec!(5.00)), true)]
    #[case(FilterCondition::NotEquals(num(dec!(5))), num(dec!(6)), true)]
    #[case(FilterCondition::In(vec!["a".into(), "b".into()]), "b".into(), true)]
    #[case(FilterCondition::NotIn(vec!["a".into()]), "a".into(), false)]
    #[case(FilterCondition::GreaterThan(num(dec!(5))), num(dec!(5)), false)]
    #[case(FilterCondition::GreaterThanOrEqual(num(dec!(5))), num(dec!(5)), true)]
    #[case(FilterCondition::LessThan(num(dec!(5))), num(dec!(4.99)), true)]
    #[case(FilterCondition::LessThanOrEqual(num(dec!(5))), num(dec!(5.01)), false)]
    #[case(FilterCondition::GreaterThan(num(dec!(5))), "9".into(), false)]
    #[case(FilterCondition::Contains("nn".to_string()), "Ann Lee".into(), true)]
    #[case(FilterCondition::StartsWith("Bo".to_string()), "Bo Chen".into(), true)]
    #[case(FilterCondition::EndsWith("Lee".to_string()), "Bo Chen".into(), false)]
    #[case(FilterCondition::Contains(String::new()), CubeValue::Null, false)]
    fn test_condition_matches(
        #[case] condition: FilterCondition,
        #[case] value: CubeValue,
        #[case] expected: bool,
    ) {
        assert_eq!(condition.matches(&value), expected);
    }

    #[test]
    fn test_date_range() {
        let day = |d| CubeValue::Date(NaiveDate::from_ymd_opt(2024, 5, d).unwrap());
        let from = FilterCondition::GreaterThanOrEqual(day(10));
        let to = FilterCondition::LessThan(day(20));
        assert!(from.matches(&day(10)) && to.matches(&day(10)));
        assert!(!to.matches(&day(20)));
    }

    #[test]
    fn test_filter_json_shape() {
        let filter: DimensionFilter = serde_json::from_value(serde_json::json!({
            "dimension": "contractor",
            "operator": "in",
            "value": [{"type": "text", "value": "Ann Lee"}]
        }))
        .unwrap();
        assert_eq!(
            filter,
            DimensionFilter::new("contractor", FilterCondition::In(vec!["Ann Lee".into()]))
        );
    }
}
