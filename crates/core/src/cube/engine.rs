//! Hierarchical group-by over cube items.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::error::CubeError;
use super::filter::FilterCondition;
use super::types::{
    CubeDefinition, CubeGroup, CubeOptions, CubeResult, CubeValue, DimensionDescriptor,
    MeasureDescriptor,
};

/// Separator between node path segments.
pub const PATH_SEPARATOR: char = '|';
/// Segment key matching any value.
pub const WILDCARD: &str = "*";

/// Path of a child node below `parent`.
#[must_use]
pub fn node_path(parent: &str, dimension: &str, key: &str) -> String {
    if parent.is_empty() {
        format!("{dimension}:{key}")
    } else {
        format!("{parent}{PATH_SEPARATOR}{dimension}:{key}")
    }
}

/// Wildcard pattern of a node reached through `dimensions`, root first.
///
/// `["contractor", "project"]` becomes `"contractor:*|project:*"`. Built from
/// the dimension ids rather than the rendered path, since keys may contain
/// the separator.
#[must_use]
pub fn wildcard_pattern(dimensions: &[&str]) -> String {
    dimensions
        .iter()
        .map(|dimension| format!("{dimension}:{WILDCARD}"))
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string())
}

/// Filters, groups and aggregates the cube's items.
///
/// Groups appear in the order their first item appears. A node is broken
/// down by the rule stored under its exact path, else by the rule stored
/// under its wildcard pattern; without a rule, at `max_depth`, or when the
/// rule names a dimension already used above it, the node is a leaf.
///
/// # Errors
///
/// Returns [`CubeError::InvalidMaxDepth`] for a zero `max_depth`, and
/// [`CubeError::UnknownDimension`] or [`CubeError::UnknownMeasure`] when the
/// options reference something the definition lacks.
pub fn calculate_cube<T>(
    definition: &CubeDefinition<T>,
    options: &CubeOptions,
) -> Result<CubeResult, CubeError> {
    if options.max_depth == 0 {
        return Err(CubeError::InvalidMaxDepth(options.max_depth));
    }

    let measures: Vec<&MeasureDescriptor<T>> = if options.measures.is_empty() {
        definition.measures.iter().collect()
    } else {
        options
            .measures
            .iter()
            .map(|id| {
                definition
                    .measure(id)
                    .ok_or_else(|| CubeError::UnknownMeasure(id.clone()))
            })
            .collect::<Result<_, _>>()?
    };

    let filters: Vec<(&DimensionDescriptor<T>, &FilterCondition)> = options
        .filters
        .iter()
        .map(|f| {
            definition
                .dimension(&f.dimension)
                .map(|d| (d, &f.condition))
                .ok_or_else(|| CubeError::UnknownDimension(f.dimension.clone()))
        })
        .collect::<Result<_, _>>()?;

    if let Some(unknown) = options
        .breakdown_map
        .values()
        .flatten()
        .find(|id| definition.dimension(id).is_none())
    {
        return Err(CubeError::UnknownDimension(unknown.clone()));
    }

    let filtered: Vec<usize> = definition
        .items
        .iter()
        .enumerate()
        .filter(|(_, item)| filters.iter().all(|(d, c)| c.matches(&(d.value)(*item))))
        .map(|(i, _)| i)
        .collect();

    let breakdown = Breakdown {
        definition,
        options,
        measures,
    };
    let grand_totals = breakdown.aggregate(&filtered);
    let groups = breakdown
        .child_dimension("", &[])
        .map(|dimension| breakdown.group(&filtered, "", &[], dimension, 1))
        .unwrap_or_default();

    debug!(
        total = definition.items.len(),
        filtered = filtered.len(),
        groups = groups.len(),
        "Calculated cube"
    );

    Ok(CubeResult {
        groups,
        grand_totals,
        total_items: definition.items.len(),
        filtered_items: filtered.len(),
    })
}

struct Breakdown<'a, T> {
    definition: &'a CubeDefinition<T>,
    options: &'a CubeOptions,
    measures: Vec<&'a MeasureDescriptor<T>>,
}

impl<'a, T> Breakdown<'a, T> {
    fn child_dimension(&self, path: &str, used: &[&str]) -> Option<&'a DimensionDescriptor<T>> {
        let map = &self.options.breakdown_map;
        let rule = map
            .get(path)
            .or_else(|| map.get(&wildcard_pattern(used)))?;
        let id = rule.as_deref()?;
        if used.iter().any(|u| *u == id) {
            return None;
        }
        self.definition.dimension(id)
    }

    fn aggregate(&self, members: &[usize]) -> BTreeMap<String, CubeValue> {
        let items: Vec<&T> = members
            .iter()
            .filter_map(|&i| self.definition.items.get(i))
            .collect();
        self.measures
            .iter()
            .map(|m| (m.id.clone(), (m.aggregate)(&items)))
            .collect()
    }

    fn group(
        &self,
        members: &[usize],
        parent: &str,
        used: &[&str],
        dimension: &DimensionDescriptor<T>,
        depth: usize,
    ) -> Vec<CubeGroup> {
        let mut buckets: Vec<(CubeValue, Vec<usize>)> = Vec::new();
        let mut positions: HashMap<CubeValue, usize> = HashMap::new();
        for &i in members {
            let Some(item) = self.definition.items.get(i) else {
                continue;
            };
            let value = (dimension.value)(item);
            if let Some(&at) = positions.get(&value) {
                buckets[at].1.push(i);
            } else {
                positions.insert(value.clone(), buckets.len());
                buckets.push((value, vec![i]));
            }
        }

        let mut used_below = used.to_vec();
        used_below.push(dimension.id.as_str());

        buckets
            .into_iter()
            .map(|(value, items)| {
                let path = node_path(parent, &dimension.id, &value.to_string());
                let child = if depth < self.options.max_depth {
                    self.child_dimension(&path, &used_below)
                } else {
                    None
                };
                let children = child
                    .map(|d| self.group(&items, &path, &used_below, d, depth + 1))
                    .unwrap_or_default();

                CubeGroup {
                    measures: self.aggregate(&items),
                    item_count: items.len(),
                    child_dimension: child.map(|d| d.id.clone()),
                    children,
                    items: self.options.include_items.then_some(items),
                    dimension: dimension.id.clone(),
                    value,
                    path,
                }
            })
            .collect()
    }
}
