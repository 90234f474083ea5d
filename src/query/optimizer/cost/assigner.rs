//! 代价赋值器模块
//!
//! 为查询表示图中的所有节点计算代价，并汇总为一份报告
//!
//! ## 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use graphdb_cost::query::graph::{NodeKind, QueryGraphBuilder};
//! use graphdb_cost::query::optimizer::cost::{CostAssigner, CostWeights, FunctionCatalog, StructuralCostModel};
//! use graphdb_cost::query::optimizer::stats::GraphSizeSummary;
//!
//! let model = StructuralCostModel::new(CostWeights::default(), Arc::new(FunctionCatalog::with_builtins()));
//! let assigner = CostAssigner::new(Arc::new(model), GraphSizeSummary::new(100, 400, 4, 4));
//!
//! let mut builder = QueryGraphBuilder::new();
//! let root = builder.add_node(NodeKind::VertexSetExpression);
//! let graph = builder.build(root).unwrap();
//!
//! let report = assigner.estimate(&graph).unwrap();
//! assert_eq!(report.root.subtree_cost, 300);
//! ```
//!
//! ## 架构说明
//!
//! 每次估算各自创建 `EvaluatorRegistry`，记忆化缓存不会跨查询共享。
//! 代价模型与历史统计只读共享，因此多个查询可以并行估算。

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::core::error::CostResult;
use crate::query::graph::{NodeId, QueryGraph};
use crate::query::optimizer::stats::GraphSizeSummary;

use super::estimate::CostTriple;
use super::handle::EvaluatorRegistry;
use super::model::CostModel;

/// 单个节点的估算结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeEstimate {
    pub id: NodeId,
    pub kind: &'static str,
    pub logging_name: String,
    pub costs: CostTriple,
    pub cardinality: u64,
}

/// 一个查询的代价报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryCostReport {
    /// 根节点的代价三元组
    pub root: CostTriple,
    /// 按节点编号排列的估算结果
    pub nodes: Vec<NodeEstimate>,
}

impl QueryCostReport {
    pub fn node(&self, id: NodeId) -> Option<&NodeEstimate> {
        self.nodes.get(id.index())
    }

    /// 子树代价最高的节点
    pub fn most_expensive(&self) -> Option<&NodeEstimate> {
        self.nodes.iter().max_by_key(|n| n.costs.subtree_cost)
    }
}

/// 代价赋值器
#[derive(Debug, Clone)]
pub struct CostAssigner {
    model: Arc<dyn CostModel>,
    summary: GraphSizeSummary,
}

impl CostAssigner {
    pub fn new(model: Arc<dyn CostModel>, summary: GraphSizeSummary) -> Self {
        Self { model, summary }
    }

    pub fn model(&self) -> &dyn CostModel {
        self.model.as_ref()
    }

    pub fn summary(&self) -> &GraphSizeSummary {
        &self.summary
    }

    /// 估算一个查询中所有节点的代价
    pub fn estimate(&self, graph: &QueryGraph) -> CostResult<QueryCostReport> {
        let registry = EvaluatorRegistry::new(graph, self.model.as_ref(), self.summary);
        let root = registry.estimate_all()?;

        let mut nodes = Vec::with_capacity(graph.len());
        for node in graph.nodes() {
            let Some(handle) = registry.handle(node.id()) else {
                continue;
            };
            nodes.push(NodeEstimate {
                id: node.id(),
                kind: node.kind().name(),
                logging_name: handle.logging_name().to_string(),
                costs: handle.costs()?,
                cardinality: handle.estimated_cardinality()?,
            });
        }

        log::info!(
            "查询代价估算完成: {} 个节点, 子树代价 {}",
            graph.len(),
            root.subtree_cost
        );
        Ok(QueryCostReport { root, nodes })
    }

    /// 并行估算多个独立查询，结果与输入顺序一致
    pub fn estimate_batch(&self, graphs: &[QueryGraph]) -> Vec<CostResult<QueryCostReport>> {
        graphs.par_iter().map(|graph| self.estimate(graph)).collect()
    }
}
