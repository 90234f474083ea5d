//! GraphDB Cost - cost estimation for graph query representation graphs
//!
//! This crate estimates, for every construct of a parsed graph query, the
//! evaluation cost, the result cardinality and the filter selectivity. The
//! query optimizer uses these numbers to compare alternative query shapes.

pub mod config;
pub mod core;
pub mod query;
pub mod utils;
