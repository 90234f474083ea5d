// Query module for the cost estimator
//
// - `graph` - the query representation graph that estimation runs over
// - `optimizer` - cost models, statistics and the cost assigner

pub mod graph;
pub mod optimizer;
