//! Cube data types.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filter::DimensionFilter;

/// A dimension value or an aggregated measure value.
///
/// Ordering compares within a variant; values of different variants order by
/// variant position (`Null` first).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum CubeValue {
    /// Missing value.
    Null,
    /// Flag.
    Bool(bool),
    /// Amount, count or other number.
    Number(Decimal),
    /// Calendar day.
    Date(NaiveDate),
    /// Free text.
    Text(String),
}

impl CubeValue {
    /// The decimal, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns true for [`CubeValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for CubeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", n.normalize()),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<Decimal> for CubeValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CubeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CubeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDate> for CubeValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<bool> for CubeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for CubeValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Extracts a dimension value from an item.
pub type ValueFn<T> = Arc<dyn Fn(&T) -> CubeValue + Send + Sync>;

/// Folds the items of a group into one measure value.
pub type AggregateFn<T> = Arc<dyn Fn(&[&T]) -> CubeValue + Send + Sync>;

/// A field items can be filtered and grouped by.
pub struct DimensionDescriptor<T> {
    /// Id used in paths, filters and breakdown rules.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Value of the dimension for one item.
    pub value: ValueFn<T>,
}

impl<T> DimensionDescriptor<T> {
    /// Creates a dimension reading its value with `value`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Fn(&T) -> CubeValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: Arc::new(value),
        }
    }
}

impl<T> Clone for DimensionDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> fmt::Debug for DimensionDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A value computed per group.
pub struct MeasureDescriptor<T> {
    /// Key of the measure in group and total maps.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Folds a group's items into the measure value.
    pub aggregate: AggregateFn<T>,
}

impl<T> MeasureDescriptor<T> {
    /// Creates a measure from an arbitrary aggregate function.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        aggregate: impl Fn(&[&T]) -> CubeValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aggregate: Arc::new(aggregate),
        }
    }
}

impl<T> Clone for MeasureDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            aggregate: Arc::clone(&self.aggregate),
        }
    }
}

impl<T> fmt::Debug for MeasureDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeasureDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Items plus the dimensions and measures defined over them.
#[derive(Debug, Clone)]
pub struct CubeDefinition<T> {
    /// Rows to slice.
    pub items: Vec<T>,
    /// Dimensions available to filters and breakdown rules.
    pub dimensions: Vec<DimensionDescriptor<T>>,
    /// Measures computed per group.
    pub measures: Vec<MeasureDescriptor<T>>,
}

impl<T> CubeDefinition<T> {
    /// Dimension with the given id.
    pub fn dimension(&self, id: &str) -> Option<&DimensionDescriptor<T>> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    /// Measure with the given id.
    pub fn measure(&self, id: &str) -> Option<&MeasureDescriptor<T>> {
        self.measures.iter().find(|m| m.id == id)
    }
}

/// How a cube is sliced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeOptions {
    /// Filters applied before grouping; all must hold.
    #[serde(default)]
    pub filters: Vec<DimensionFilter>,
    /// Child dimension per node path, or `None` to make the node a leaf.
    ///
    /// The empty path is the root. A node path joins `dimension:key`
    /// segments with `|`; a segment key of `*` matches any value.
    #[serde(default)]
    pub breakdown_map: BTreeMap<String, Option<String>>,
    /// Deepest group level, counting top-level groups as 1.
    pub max_depth: usize,
    /// Measures to compute; empty means all.
    #[serde(default)]
    pub measures: Vec<String>,
    /// Whether groups list the positions of their items.
    #[serde(default)]
    pub include_items: bool,
}

impl CubeOptions {
    /// Options grouping by `dimension` at the top level only.
    pub fn grouped_by(dimension: impl Into<String>, max_depth: usize) -> Self {
        Self {
            filters: Vec::new(),
            breakdown_map: BTreeMap::from([(String::new(), Some(dimension.into()))]),
            max_depth,
            measures: Vec::new(),
            include_items: false,
        }
    }
}

/// One node of the breakdown tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeGroup {
    /// Node path, `dimension:key` segments joined by `|`.
    pub path: String,
    /// Dimension this level is grouped by.
    pub dimension: String,
    /// Value shared by the group's items.
    pub value: CubeValue,
    /// Measure values by measure id.
    pub measures: BTreeMap<String, CubeValue>,
    /// Number of items in the group.
    pub item_count: usize,
    /// Dimension the children are grouped by.
    pub child_dimension: Option<String>,
    /// Sub-groups in order of first appearance; empty for a leaf.
    pub children: Vec<CubeGroup>,
    /// Positions of the group's items in the definition's item list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<usize>>,
}

/// Output of a cube calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeResult {
    /// Top-level groups in order of first appearance.
    pub groups: Vec<CubeGroup>,
    /// Measures over every filtered item.
    pub grand_totals: BTreeMap<String, CubeValue>,
    /// Items in the definition.
    pub total_items: usize,
    /// Items left after filtering.
    pub filtered_items: usize,
}
