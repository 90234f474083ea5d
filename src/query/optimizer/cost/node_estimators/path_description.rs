//! 路径描述估算器
//!
//! 路径描述只承担构造自动机片段的代价，搜索代价在执行路径搜索的节点上计算

use super::{iterated_triple, unsupported, NodeEstimator};
use crate::core::error::CostResult;
use crate::query::graph::{EdgeRole, NodeKind};
use crate::query::optimizer::cost::config::CostWeights;
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

/// 路径描述估算器
pub struct PathDescriptionEstimator<'a> {
    weights: &'a CostWeights,
}

impl<'a> PathDescriptionEstimator<'a> {
    pub fn new(weights: &'a CostWeights) -> Self {
        Self { weights }
    }

    fn own_cost(&self, node: &NodeHandle<'_>) -> CostResult<u64> {
        let transition = self.weights.transition_cost;
        let cost = match node.kind() {
            NodeKind::SimplePathDescription { .. }
            | NodeKind::EdgePathDescription { .. }
            | NodeKind::OptionalPathDescription => transition,
            NodeKind::SequentialPathDescription => {
                transition.saturating_mul(node.child_count(EdgeRole::IsSequenceElementOf) as u64)
            }
            NodeKind::AlternativePathDescription => {
                transition.saturating_mul(node.child_count(EdgeRole::IsAlternativePathOf) as u64)
            }
            NodeKind::IteratedPathDescription { reflexive } => {
                if *reflexive {
                    transition.saturating_mul(2)
                } else {
                    transition
                }
            }
            NodeKind::ExponentiatedPathDescription | NodeKind::TransposedPathDescription => {
                self.weights.nfa_construction_cost
            }
            NodeKind::IntermediateVertexPathDescription => transition.saturating_mul(2),
            _ => return Err(unsupported("PathDescriptionEstimator", node)),
        };
        Ok(cost)
    }
}

impl NodeEstimator for PathDescriptionEstimator<'_> {
    fn cost(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        iterated_triple(node, self.own_cost(node)?)
    }

    fn cardinality(&self, _node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<u64> {
        Ok(1)
    }
}
