//! 路径搜索估算器
//!
//! 路径存在判断以及前向、后向顶点集合在数据图上运行路径描述构造出的自动机。
//! 搜索代价与自动机的构造代价和边数的平方根成正比，
//! 另加确定化自动机每对状态之间转移的代价。

use super::{iterated_triple, round_to_u64, unsupported, NodeEstimator};
use crate::core::error::CostResult;
use crate::query::graph::{EdgeRole, NodeKind};
use crate::query::optimizer::cost::config::CostWeights;
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

/// 路径搜索估算器
pub struct PathSearchEstimator<'a> {
    weights: &'a CostWeights,
    dfa_states: u64,
}

impl<'a> PathSearchEstimator<'a> {
    /// 使用默认 DFA 状态数
    pub fn new(weights: &'a CostWeights) -> Self {
        Self::with_dfa_states(weights, weights.default_dfa_state_count)
    }

    /// 使用给定的 DFA 状态数，例如历史记录中的平均自动机规模
    pub fn with_dfa_states(weights: &'a CostWeights, dfa_states: u64) -> Self {
        Self { weights, dfa_states }
    }

    fn search_cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64> {
        let path = node.required_child(EdgeRole::IsPathOf)?.subtree_cost()?;
        let search = path as f64
            * self.weights.search_factor as f64
            * (summary.edge_count as f64).sqrt();
        let transitions = self
            .dfa_states
            .saturating_mul(self.dfa_states)
            .saturating_mul(self.weights.transition_cost);
        Ok(round_to_u64(search).saturating_add(transitions))
    }
}

impl NodeEstimator for PathSearchEstimator<'_> {
    fn cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        match node.kind() {
            NodeKind::PathExistence | NodeKind::ForwardVertexSet | NodeKind::BackwardVertexSet => {
                iterated_triple(node, self.search_cost(node, summary)?)
            }
            _ => Err(unsupported("PathSearchEstimator", node)),
        }
    }

    fn cardinality(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64> {
        match node.kind() {
            NodeKind::PathExistence => Ok(1),
            NodeKind::ForwardVertexSet | NodeKind::BackwardVertexSet => Ok(round_to_u64(
                summary.vertex_count as f64 * self.weights.path_existence_selectivity,
            )),
            _ => Err(unsupported("PathSearchEstimator", node)),
        }
    }

    fn selectivity(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<f64> {
        match node.kind() {
            NodeKind::PathExistence => Ok(self.weights.path_existence_selectivity),
            _ => Ok(1.0),
        }
    }
}
