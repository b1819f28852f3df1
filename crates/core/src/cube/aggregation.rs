//! Built-in measure aggregations.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AggregateFn, CubeValue, MeasureDescriptor};

/// Standard ways to fold a group's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aggregation {
    /// Sum of numeric values; 0 for an empty group.
    Sum,
    /// Number of items.
    Count,
    /// Mean of numeric values; null when there are none.
    Average,
    /// Smallest non-null value.
    Min,
    /// Largest non-null value.
    Max,
    /// Value of the first item.
    First,
    /// Value of the last item.
    Last,
    /// Number of distinct non-null values.
    DistinctCount,
}

impl Aggregation {
    /// Folds already extracted values.
    #[must_use]
    pub fn apply(self, values: &[CubeValue]) -> CubeValue {
        let numbers = || values.iter().filter_map(CubeValue::as_number);
        let present = || values.iter().filter(|v| !v.is_null());

        match self {
            Self::Sum => CubeValue::Number(numbers().sum()),
            Self::Count => CubeValue::Number(Decimal::from(values.len())),
            Self::Average => {
                let count = numbers().count();
                numbers()
                    .sum::<Decimal>()
                    .checked_div(Decimal::from(count))
                    .map_or(CubeValue::Null, CubeValue::Number)
            }
            Self::Min => present().min().cloned().unwrap_or(CubeValue::Null),
            Self::Max => present().max().cloned().unwrap_or(CubeValue::Null),
            Self::First => values.first().cloned().unwrap_or(CubeValue::Null),
            Self::Last => values.last().cloned().unwrap_or(CubeValue::Null),
            Self::DistinctCount => {
                let distinct: BTreeSet<&CubeValue> = present().collect();
                CubeValue::Number(Decimal::from(distinct.len()))
            }
        }
    }

    /// Aggregate function over items, reading each item's value with `value`.
    pub fn over<T: 'static>(
        self,
        value: impl Fn(&T) -> CubeValue + Send + Sync + 'static,
    ) -> AggregateFn<T> {
        Arc::new(move |items: &[&T]| {
            let values: Vec<CubeValue> = items.iter().map(|item| value(*item)).collect();
            self.apply(&values)
        })
    }
}

impl<T: 'static> MeasureDescriptor<T> {
    /// Creates a measure from a built-in aggregation.
    pub fn aggregated(
        id: impl Into<String>,
        name: impl Into<String>,
        aggregation: Aggregation,
        value: impl Fn(&T) -> CubeValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aggregate: aggregation.over(value),
        }
    }
}
