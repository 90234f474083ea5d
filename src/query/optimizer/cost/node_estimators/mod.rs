//! 节点估算器模块
//!
//! 按节点类型族拆分的结构化估算规则，由 `StructuralCostModel` 分派

use crate::core::error::{CostError, CostResult};
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

pub mod comprehension;
pub mod construction;
pub mod declaration;
pub mod expression;
pub mod graph_element;
pub mod path_description;
pub mod path_search;

pub use comprehension::ComprehensionEstimator;
pub use construction::ConstructionEstimator;
pub use declaration::DeclarationEstimator;
pub use expression::ExpressionEstimator;
pub use graph_element::GraphElementEstimator;
pub use path_description::PathDescriptionEstimator;
pub use path_search::PathSearchEstimator;

/// 节点估算器 trait
///
/// 所有节点估算器都需要实现此 trait
pub trait NodeEstimator {
    /// 估算节点的代价三元组
    fn cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<CostTriple>;

    /// 估算节点的结果规模
    fn cardinality(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64>;

    /// 估算节点的选择性
    fn selectivity(&self, _node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<f64> {
        Ok(1.0)
    }
}

/// 标准组合：自身代价乘以变量组合数，加上所有子节点的子树代价
pub fn iterated_triple(node: &NodeHandle<'_>, own_cost: u64) -> CostResult<CostTriple> {
    Ok(CostTriple::compose(
        own_cost,
        node.variable_combinations()?,
        node.children_subtree_cost()?,
    ))
}

/// 估算器收到不属于自己的节点类型
pub fn unsupported(estimator: &'static str, node: &NodeHandle<'_>) -> CostError {
    CostError::UnsupportedNodeKind {
        estimator,
        kind: node.kind().name(),
    }
}

/// 浮点结果四舍五入为非负整数
pub fn round_to_u64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.round() as u64
    }
}
