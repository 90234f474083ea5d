//! 表达式估算器
//!
//! 条件、量词、函数应用、类型标识、变量、字面量与查询根节点

use super::{iterated_triple, unsupported, NodeEstimator};
use crate::core::error::{CostError, CostResult};
use crate::query::graph::{EdgeRole, NodeKind};
use crate::query::optimizer::cost::config::CostWeights;
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::functions::{FunctionCatalog, FunctionProfile};
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

/// 表达式估算器
pub struct ExpressionEstimator<'a> {
    weights: &'a CostWeights,
    functions: &'a FunctionCatalog,
}

impl<'a> ExpressionEstimator<'a> {
    pub fn new(weights: &'a CostWeights, functions: &'a FunctionCatalog) -> Self {
        Self { weights, functions }
    }

    /// 函数应用的目录规则与参数基数之和
    fn function_profile(&self, node: &NodeHandle<'_>, name: &str) -> CostResult<(Option<&'a FunctionProfile>, u64)> {
        let input_size = node
            .children(EdgeRole::IsArgumentOf)
            .try_fold(0u64, |acc, arg| {
                Ok::<_, CostError>(acc.saturating_add(arg.estimated_cardinality()?))
            })?;
        let profile = self.functions.lookup(name);
        if profile.is_none() {
            log::debug!("函数 {} 未在目录中注册，使用默认估算", name);
        }
        Ok((profile, input_size))
    }
}

impl NodeEstimator for ExpressionEstimator<'_> {
    fn cost(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        let own = match node.kind() {
            NodeKind::ConditionalExpression => self.weights.conditional_cost,
            NodeKind::QuantifiedExpression { .. } => self.weights.quantifier_cost,
            NodeKind::FunctionApplication { function } => {
                match self.function_profile(node, function)? {
                    (Some(profile), input_size) => profile.estimate_cost(input_size),
                    (None, _) => self.weights.function_call_cost,
                }
            }
            NodeKind::TypeId { .. } => self.weights.type_id_cost,
            NodeKind::Variable { .. } => self.weights.variable_lookup_cost,
            NodeKind::Literal { .. } => self.weights.literal_cost,
            // 查询根只求值一次
            NodeKind::QueryRoot => {
                return Ok(CostTriple::compose(
                    self.weights.query_root_cost,
                    1,
                    node.children_subtree_cost()?,
                ));
            }
            _ => return Err(unsupported("ExpressionEstimator", node)),
        };
        iterated_triple(node, own)
    }

    fn cardinality(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<u64> {
        match node.kind() {
            NodeKind::ConditionalExpression => {
                let mut max = 0u64;
                for role in [
                    EdgeRole::IsTrueExprOf,
                    EdgeRole::IsFalseExprOf,
                    EdgeRole::IsNullExprOf,
                ] {
                    if let Some(branch) = node.child(role) {
                        max = max.max(branch.estimated_cardinality()?);
                    }
                }
                Ok(max)
            }
            NodeKind::FunctionApplication { function } => {
                match self.function_profile(node, function)? {
                    (Some(profile), input_size) => Ok(profile.estimate_cardinality(input_size)),
                    (None, _) => Ok(1),
                }
            }
            NodeKind::QueryRoot => node
                .required_child(EdgeRole::IsQueryExprOf)?
                .estimated_cardinality(),
            NodeKind::QuantifiedExpression { .. }
            | NodeKind::TypeId { .. }
            | NodeKind::Variable { .. }
            | NodeKind::Literal { .. } => Ok(1),
            _ => Err(unsupported("ExpressionEstimator", node)),
        }
    }

    fn selectivity(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<f64> {
        match node.kind() {
            NodeKind::FunctionApplication { function } => Ok(self
                .functions
                .lookup(function)
                .map_or(1.0, |profile| profile.selectivity)),
            NodeKind::TypeId {
                subtypes, excluded, ..
            } => Ok(type_id_selectivity(*subtypes, *excluded, summary)),
            _ => Ok(1.0),
        }
    }
}

/// 类型标识的选择性
///
/// 精确匹配为 1/类型数；包含子类型时乘以平均子类数；排除时取补
pub fn type_id_selectivity(subtypes: bool, excluded: bool, summary: &GraphSizeSummary) -> f64 {
    let types = summary.types_in_schema();
    if types == 0 {
        return 1.0;
    }
    let matched = if subtypes {
        (summary.avg_subclasses() / types as f64).min(1.0)
    } else {
        1.0 / types as f64
    };
    if excluded {
        1.0 - matched
    } else {
        matched
    }
}
