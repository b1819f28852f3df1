//! Cube aggregation engine.
//!
//! A generic hierarchical group-by over any item type: filter the items by
//! dimension values, group them level by level following a breakdown map,
//! and aggregate measures per group and over everything filtered.

pub mod aggregation;
pub mod engine;
pub mod error;
pub mod filter;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use aggregation::Aggregation;
pub use engine::{calculate_cube, node_path, wildcard_pattern};
pub use error::CubeError;
pub use filter::{DimensionFilter, FilterCondition};
pub use state::CubeState;
pub use types::{
    AggregateFn, CubeDefinition, CubeGroup, CubeOptions, CubeResult, CubeValue,
    DimensionDescriptor, MeasureDescriptor, ValueFn,
};
