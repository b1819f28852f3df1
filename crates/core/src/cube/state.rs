//! Interactive cube state.

use std::collections::BTreeMap;

use timebill_shared::config::CubeConfig;

use super::engine::calculate_cube;
use super::error::CubeError;
use super::filter::DimensionFilter;
use super::types::{CubeDefinition, CubeOptions, CubeResult};

/// A cube definition plus the options a user is editing.
///
/// The last result is cached and reused until a mutation invalidates it.
#[derive(Debug, Clone)]
pub struct CubeState<T> {
    definition: CubeDefinition<T>,
    options: CubeOptions,
    initial_breakdown: BTreeMap<String, Option<String>>,
    cached: Option<CubeResult>,
}

impl<T> CubeState<T> {
    /// Creates a state. `options.breakdown_map` is what
    /// [`Self::reset_breakdown`] returns to.
    pub fn new(definition: CubeDefinition<T>, options: CubeOptions) -> Self {
        Self {
            definition,
            initial_breakdown: options.breakdown_map.clone(),
            options,
            cached: None,
        }
    }

    /// Creates a state grouped by `root_dimension`, with the configured max depth.
    pub fn from_config(
        definition: CubeDefinition<T>,
        root_dimension: impl Into<String>,
        config: &CubeConfig,
    ) -> Self {
        Self::new(
            definition,
            CubeOptions::grouped_by(root_dimension, config.max_depth),
        )
    }

    /// Items, dimensions and measures.
    pub const fn definition(&self) -> &CubeDefinition<T> {
        &self.definition
    }

    /// Current filters and breakdown.
    pub const fn options(&self) -> &CubeOptions {
        &self.options
    }

    /// Replaces the items, keeping dimensions, measures and options.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.definition.items = items;
        self.cached = None;
    }

    /// Adds a filter; all filters must hold.
    pub fn add_filter(&mut self, filter: DimensionFilter) {
        self.options.filters.push(filter);
        self.cached = None;
    }

    /// Removes every filter on `dimension`.
    pub fn remove_filters(&mut self, dimension: &str) {
        self.options.filters.retain(|f| f.dimension != dimension);
        self.cached = None;
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        self.options.filters.clear();
        self.cached = None;
    }

    /// Breaks the node at `path` (or every node matching a wildcard path)
    /// down by `dimension`.
    pub fn set_node_child_dimension(&mut self, path: impl Into<String>, dimension: impl Into<String>) {
        self.options
            .breakdown_map
            .insert(path.into(), Some(dimension.into()));
        self.cached = None;
    }

    /// Makes the node at `path` a leaf, overriding any wildcard rule.
    pub fn set_node_leaf(&mut self, path: impl Into<String>) {
        self.options.breakdown_map.insert(path.into(), None);
        self.cached = None;
    }

    /// Restores the breakdown the state was created with.
    pub fn reset_breakdown(&mut self) {
        self.options.breakdown_map.clone_from(&self.initial_breakdown);
        self.cached = None;
    }

    /// Sets the deepest group level.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.options.max_depth = max_depth;
        self.cached = None;
    }

    /// Sets whether groups list their item positions.
    pub fn set_include_items(&mut self, include_items: bool) {
        self.options.include_items = include_items;
        self.cached = None;
    }

    /// Calculates the cube, or returns the cached result.
    ///
    /// # Errors
    ///
    /// Returns any [`CubeError`] of [`calculate_cube`]; failures are not cached.
    pub fn calculate(&mut self) -> Result<&CubeResult, CubeError> {
        let result = match self.cached.take() {
            Some(result) => result,
            None => calculate_cube(&self.definition, &self.options)?,
        };
        Ok(self.cached.insert(result))
    }
}
