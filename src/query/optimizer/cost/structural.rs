//! 结构化代价模型
//!
//! 只依据查询图结构、数据图规模摘要和权重表估算代价，不使用任何历史信息。
//! 节点按类型族分派到 `node_estimators` 中对应的估算器。

use std::sync::Arc;

use crate::core::error::CostResult;
use crate::query::graph::NodeFamily;
use crate::query::optimizer::stats::GraphSizeSummary;

use super::config::CostWeights;
use super::estimate::CostTriple;
use super::functions::FunctionCatalog;
use super::handle::NodeHandle;
use super::model::{CostModel, CostModelKind};
use super::node_estimators::{
    ComprehensionEstimator, ConstructionEstimator, DeclarationEstimator, ExpressionEstimator,
    GraphElementEstimator, NodeEstimator, PathDescriptionEstimator, PathSearchEstimator,
};

/// 结构化代价模型
#[derive(Debug, Clone)]
pub struct StructuralCostModel {
    weights: CostWeights,
    functions: Arc<FunctionCatalog>,
}

impl StructuralCostModel {
    pub fn new(weights: CostWeights, functions: Arc<FunctionCatalog>) -> Self {
        Self { weights, functions }
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    pub fn functions(&self) -> &FunctionCatalog {
        &self.functions
    }

    /// 选择节点类型族对应的估算器并执行
    fn dispatch<T>(
        &self,
        node: &NodeHandle<'_>,
        estimate: impl FnOnce(&dyn NodeEstimator) -> CostResult<T>,
    ) -> CostResult<T> {
        let weights = &self.weights;
        match node.kind().family() {
            NodeFamily::PathDescription => estimate(&PathDescriptionEstimator::new(weights)),
            NodeFamily::Construction => estimate(&ConstructionEstimator::new(weights)),
            NodeFamily::Comprehension => estimate(&ComprehensionEstimator::new(weights)),
            NodeFamily::Declaration => estimate(&DeclarationEstimator::new(weights)),
            NodeFamily::Expression => {
                estimate(&ExpressionEstimator::new(weights, &self.functions))
            }
            NodeFamily::GraphElement => estimate(&GraphElementEstimator::new(weights)),
            NodeFamily::PathSearch => estimate(&PathSearchEstimator::new(weights)),
        }
    }
}

impl CostModel for StructuralCostModel {
    fn kind(&self) -> CostModelKind {
        CostModelKind::Structural
    }

    fn cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        self.dispatch(node, |estimator| estimator.cost(node, summary))
    }

    fn cardinality(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64> {
        self.dispatch(node, |estimator| estimator.cardinality(node, summary))
    }

    fn selectivity(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<f64> {
        self.dispatch(node, |estimator| estimator.selectivity(node, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::graph::{EdgeRole, LiteralValue, NodeKind, QueryGraph, QueryGraphBuilder};
    use crate::query::optimizer::cost::handle::EvaluatorRegistry;

    fn model() -> StructuralCostModel {
        StructuralCostModel::new(CostWeights::default(), Arc::new(FunctionCatalog::with_builtins()))
    }

    fn estimate(graph: &QueryGraph, summary: GraphSizeSummary) -> (CostTriple, u64) {
        let model = model();
        let registry = EvaluatorRegistry::new(graph, &model, summary);
        let triple = registry.estimate_all().expect("估算失败");
        let cardinality = registry.root().estimated_cardinality().expect("估算失败");
        (triple, cardinality)
    }

    fn int(builder: &mut QueryGraphBuilder, value: i64) -> crate::query::graph::NodeId {
        builder.add_node(NodeKind::Literal {
            value: LiteralValue::Int(value),
        })
    }

    #[test]
    fn test_vertex_set_without_restriction() {
        let mut builder = QueryGraphBuilder::new();
        let root = builder.add_node(NodeKind::VertexSetExpression);
        let graph = builder.build(root).expect("构建失败");

        let (triple, cardinality) = estimate(&graph, GraphSizeSummary::new(100, 0, 0, 0));
        assert_eq!(triple, CostTriple::new(300, 300, 300));
        assert_eq!(cardinality, 100);
    }

    #[test]
    fn test_list_range_with_literal_bounds() {
        let mut builder = QueryGraphBuilder::new();
        let first = int(&mut builder, 1);
        let last = int(&mut builder, 10);
        let root = builder.add_with(
            NodeKind::ListRangeConstruction,
            &[(EdgeRole::IsFirstValueOf, first), (EdgeRole::IsLastValueOf, last)],
        );
        let graph = builder.build(root).expect("构建失败");

        let (triple, cardinality) = estimate(&graph, GraphSizeSummary::default());
        assert_eq!(cardinality, 10);
        assert_eq!(triple.own_cost, 50);
        assert_eq!(triple.subtree_cost, 52);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let mut builder = QueryGraphBuilder::new();
        let first = int(&mut builder, 10);
        let last = int(&mut builder, 1);
        let root = builder.add_with(
            NodeKind::ListRangeConstruction,
            &[(EdgeRole::IsFirstValueOf, first), (EdgeRole::IsLastValueOf, last)],
        );
        let graph = builder.build(root).expect("构建失败");

        let (triple, cardinality) = estimate(&graph, GraphSizeSummary::default());
        assert_eq!(cardinality, 0);
        assert_eq!(triple.own_cost, 0);
    }

    #[test]
    fn test_sequential_path_charges_per_element() {
        let mut builder = QueryGraphBuilder::new();
        let a = builder.add_node(NodeKind::SimplePathDescription {
            direction: Default::default(),
        });
        let b = builder.add_node(NodeKind::EdgePathDescription {
            direction: Default::default(),
        });
        let root = builder.add_with(
            NodeKind::SequentialPathDescription,
            &[(EdgeRole::IsSequenceElementOf, a), (EdgeRole::IsSequenceElementOf, b)],
        );
        let graph = builder.build(root).expect("构建失败");

        let (triple, cardinality) = estimate(&graph, GraphSizeSummary::default());
        assert_eq!(triple, CostTriple::new(20, 20, 40));
        assert_eq!(cardinality, 1);
    }

    #[test]
    fn test_path_existence_cost() {
        let mut builder = QueryGraphBuilder::new();
        let start = builder.add_node(NodeKind::Variable { name: "v".into() });
        let target = builder.add_node(NodeKind::Variable { name: "w".into() });
        let path = builder.add_node(NodeKind::SimplePathDescription {
            direction: Default::default(),
        });
        let root = builder.add_with(
            NodeKind::PathExistence,
            &[
                (EdgeRole::IsStartExprOf, start),
                (EdgeRole::IsPathOf, path),
                (EdgeRole::IsTargetExprOf, target),
            ],
        );
        let graph = builder.build(root).expect("构建失败");

        // 10 * 5 * sqrt(100) + 15^2 * 10
        let (triple, _) = estimate(&graph, GraphSizeSummary::new(50, 100, 0, 0));
        assert_eq!(triple.own_cost, 500 + 2250);
        assert_eq!(triple.subtree_cost, 2750 + 10 + 1 + 1);
    }

    #[test]
    fn test_unknown_function_defaults() {
        let mut builder = QueryGraphBuilder::new();
        let arg = int(&mut builder, 3);
        let root = builder.add_with(
            NodeKind::FunctionApplication {
                function: "noSuchFunction".into(),
            },
            &[(EdgeRole::IsArgumentOf, arg)],
        );
        let graph = builder.build(root).expect("构建失败");
        let model = model();
        let registry = EvaluatorRegistry::new(&graph, &model, GraphSizeSummary::default());

        let handle = registry.root();
        assert_eq!(handle.estimated_cardinality(), Ok(1));
        assert_eq!(handle.estimated_selectivity(), Ok(1.0));
        assert_eq!(handle.own_cost(), Ok(model.weights().function_call_cost));
    }

    #[test]
    fn test_restricted_vertex_set() {
        let mut builder = QueryGraphBuilder::new();
        let person = builder.add_node(NodeKind::TypeId {
            name: "Person".into(),
            subtypes: false,
            excluded: false,
        });
        let city = builder.add_node(NodeKind::TypeId {
            name: "City".into(),
            subtypes: false,
            excluded: true,
        });
        let root = builder.add_with(
            NodeKind::VertexSetExpression,
            &[(EdgeRole::IsTypeRestrictionOf, person), (EdgeRole::IsTypeRestrictionOf, city)],
        );
        let graph = builder.build(root).expect("构建失败");

        // types_in_schema = 4: 1/4 * 3/4
        let (_, cardinality) = estimate(&graph, GraphSizeSummary::new(1600, 0, 4, 4));
        assert_eq!(cardinality, 300);
    }
}
