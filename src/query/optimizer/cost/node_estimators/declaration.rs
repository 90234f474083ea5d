//! 声明与定义估算器
//!
//! 声明是变量组合的来源：简单声明为每个变量枚举类型表达式的所有取值，
//! 声明对所有简单声明取笛卡尔积，再由约束过滤。

use super::{iterated_triple, round_to_u64, unsupported, NodeEstimator};
use crate::core::error::{CostError, CostResult};
use crate::query::graph::{EdgeRole, NodeKind};
use crate::query::optimizer::cost::config::CostWeights;
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

/// 声明与定义估算器
pub struct DeclarationEstimator<'a> {
    weights: &'a CostWeights,
}

impl<'a> DeclarationEstimator<'a> {
    pub fn new(weights: &'a CostWeights) -> Self {
        Self { weights }
    }
}

impl NodeEstimator for DeclarationEstimator<'_> {
    fn cost(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        let own = match node.kind() {
            NodeKind::Declaration => node
                .defined_variable_combinations()?
                .saturating_mul(self.weights.declaration_cost_factor)
                .saturating_add(2),
            NodeKind::SimpleDeclaration => node
                .required_child(EdgeRole::IsTypeExprOf)?
                .estimated_cardinality()?
                .saturating_mul(node.child_count(EdgeRole::IsDeclaredVarOf) as u64),
            NodeKind::Definition => self.weights.definition_cost,
            NodeKind::LetExpression | NodeKind::WhereExpression => self
                .weights
                .definition_cost
                .saturating_mul(node.child_count(EdgeRole::IsDefinitionOf) as u64),
            _ => return Err(unsupported("DeclarationEstimator", node)),
        };
        iterated_triple(node, own)
    }

    fn cardinality(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<u64> {
        match node.kind() {
            NodeKind::Declaration => {
                let combinations = node.defined_variable_combinations()?;
                let selectivity = node
                    .children(EdgeRole::IsConstraintOf)
                    .try_fold(1.0f64, |acc, constraint| {
                        Ok::<_, CostError>(acc * constraint.estimated_selectivity()?)
                    })?;
                Ok(round_to_u64(combinations as f64 * selectivity))
            }
            NodeKind::SimpleDeclaration => node.defined_variable_combinations(),
            NodeKind::Definition => node
                .required_child(EdgeRole::IsExprOf)?
                .estimated_cardinality(),
            NodeKind::LetExpression | NodeKind::WhereExpression => node
                .required_child(EdgeRole::IsBoundExprOf)?
                .estimated_cardinality(),
            _ => Err(unsupported("DeclarationEstimator", node)),
        }
    }
}
