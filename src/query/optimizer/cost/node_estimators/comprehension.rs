//! 推导式估算器

use super::{iterated_triple, unsupported, NodeEstimator};
use crate::core::error::CostResult;
use crate::query::graph::{EdgeRole, NodeKind};
use crate::query::optimizer::cost::config::CostWeights;
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

/// 推导式估算器
///
/// 结果规模取决于声明产生的变量组合，每个组合向结果加入一个元素
pub struct ComprehensionEstimator<'a> {
    weights: &'a CostWeights,
}

impl<'a> ComprehensionEstimator<'a> {
    pub fn new(weights: &'a CostWeights) -> Self {
        Self { weights }
    }
}

impl NodeEstimator for ComprehensionEstimator<'_> {
    fn cost(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        let add_cost = match node.kind() {
            NodeKind::SetComprehension => self.weights.add_to_set_cost,
            NodeKind::BagComprehension => self.weights.add_to_bag_cost,
            NodeKind::TableComprehension => self.weights.add_to_table_cost,
            _ => return Err(unsupported("ComprehensionEstimator", node)),
        };
        let own = add_cost.saturating_mul(node.estimated_cardinality()?);
        iterated_triple(node, own)
    }

    fn cardinality(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<u64> {
        node.required_child(EdgeRole::IsCompDeclOf)?
            .estimated_cardinality()
    }
}
