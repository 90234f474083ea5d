//! 图元素集合估算器
//!
//! 顶点集合、边集合与子图表达式需要扫描整个数据图，
//! 代价与数据图规模成正比，结果规模由类型限制的组合选择性缩减

use super::{iterated_triple, round_to_u64, unsupported, NodeEstimator};
use crate::core::error::CostResult;
use crate::query::graph::{EdgeRole, NodeKind};
use crate::query::optimizer::cost::config::CostWeights;
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

/// 图元素集合估算器
pub struct GraphElementEstimator<'a> {
    weights: &'a CostWeights,
}

impl<'a> GraphElementEstimator<'a> {
    pub fn new(weights: &'a CostWeights) -> Self {
        Self { weights }
    }

    /// 扫描的元素数量
    fn scanned_elements(node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64> {
        match node.kind() {
            NodeKind::VertexSetExpression => Ok(summary.vertex_count),
            NodeKind::EdgeSetExpression => Ok(summary.edge_count),
            NodeKind::SubgraphExpression => {
                Ok(summary.vertex_count.saturating_add(summary.edge_count))
            }
            _ => Err(unsupported("GraphElementEstimator", node)),
        }
    }
}

impl NodeEstimator for GraphElementEstimator<'_> {
    fn cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        let factor = match node.kind() {
            NodeKind::VertexSetExpression => self.weights.vertex_set_expression_cost_factor,
            NodeKind::EdgeSetExpression => self.weights.edge_set_expression_cost_factor,
            NodeKind::SubgraphExpression => self.weights.subgraph_expression_cost_factor,
            _ => return Err(unsupported("GraphElementEstimator", node)),
        };
        let own = Self::scanned_elements(node, summary)?.saturating_mul(factor);
        iterated_triple(node, own)
    }

    fn cardinality(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64> {
        let elements = Self::scanned_elements(node, summary)?;
        let selectivity = node.estimated_selectivity()?;
        Ok(round_to_u64(elements as f64 * selectivity))
    }

    fn selectivity(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<f64> {
        restriction_selectivity(node)
    }
}

/// 类型限制的组合选择性
///
/// 包含的类型取并集（选择性相加，不超过 1），排除的类型逐个取补相乘。
/// 没有包含类型时视为接受全部。
pub fn restriction_selectivity(node: &NodeHandle<'_>) -> CostResult<f64> {
    let mut included = None::<f64>;
    let mut excluded = 1.0f64;
    for restriction in node.children(EdgeRole::IsTypeRestrictionOf) {
        let selectivity = restriction.estimated_selectivity()?;
        match restriction.kind() {
            // 排除类型的选择性已经是补集
            NodeKind::TypeId { excluded: true, .. } => excluded *= selectivity,
            _ => *included.get_or_insert(0.0) += selectivity,
        }
    }
    Ok(included.map_or(1.0, |s| s.min(1.0)) * excluded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::query::graph::QueryGraphBuilder;
    use crate::query::optimizer::cost::handle::EvaluatorRegistry;
    use crate::query::optimizer::cost::{FunctionCatalog, StructuralCostModel};

    fn model() -> StructuralCostModel {
        StructuralCostModel::new(CostWeights::default(), Arc::new(FunctionCatalog::with_builtins()))
    }

    #[test]
    fn test_subgraph_scans_vertices_and_edges() {
        let weights = CostWeights::default();
        let mut builder = QueryGraphBuilder::new();
        let root = builder.add_node(NodeKind::SubgraphExpression);
        let graph = builder.build(root).expect("构建失败");
        let model = model();
        let registry = EvaluatorRegistry::new(&graph, &model, GraphSizeSummary::new(100, 300, 0, 0));

        let estimator = GraphElementEstimator::new(&weights);
        let root = registry.root();
        assert_eq!(estimator.cardinality(&root, registry.summary()), Ok(400));
        let triple = estimator.cost(&root, registry.summary()).expect("估算失败");
        assert_eq!(triple, CostTriple::new(800, 800, 800));
    }

    #[test]
    fn test_subgraph_restricted_by_type() {
        let weights = CostWeights::default();
        let mut builder = QueryGraphBuilder::new();
        let type_id = builder.add_node(NodeKind::TypeId {
            name: "Knows".into(),
            subtypes: false,
            excluded: false,
        });
        let root = builder.add_with(
            NodeKind::SubgraphExpression,
            &[(EdgeRole::IsTypeRestrictionOf, type_id)],
        );
        let graph = builder.build(root).expect("构建失败");
        let model = model();
        // 类型数 (6 + 4) / 2 = 5，选择性 0.2
        let registry = EvaluatorRegistry::new(&graph, &model, GraphSizeSummary::new(100, 300, 6, 4));

        let estimator = GraphElementEstimator::new(&weights);
        assert_eq!(estimator.cardinality(&registry.root(), registry.summary()), Ok(80));
    }

    #[test]
    fn test_edge_set_cost_factor() {
        let weights = CostWeights::default();
        let mut builder = QueryGraphBuilder::new();
        let root = builder.add_node(NodeKind::EdgeSetExpression);
        let graph = builder.build(root).expect("构建失败");
        let model = model();
        let registry = EvaluatorRegistry::new(&graph, &model, GraphSizeSummary::new(100, 300, 0, 0));

        let estimator = GraphElementEstimator::new(&weights);
        let triple = estimator.cost(&registry.root(), registry.summary()).expect("估算失败");
        assert_eq!(triple.own_cost, 900);
    }
}
