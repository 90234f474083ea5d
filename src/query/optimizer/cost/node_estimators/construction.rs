//! 值构造估算器
//!
//! 集合、多重集、列表、元组、记录、映射与列表范围的构造代价：
//! 每个元素的插入代价乘以结果规模

use super::{iterated_triple, unsupported, NodeEstimator};
use crate::core::error::CostResult;
use crate::query::graph::{EdgeRole, NodeKind};
use crate::query::optimizer::cost::config::CostWeights;
use crate::query::optimizer::cost::estimate::CostTriple;
use crate::query::optimizer::cost::handle::NodeHandle;
use crate::query::optimizer::stats::GraphSizeSummary;

/// 值构造估算器
pub struct ConstructionEstimator<'a> {
    weights: &'a CostWeights,
}

impl<'a> ConstructionEstimator<'a> {
    pub fn new(weights: &'a CostWeights) -> Self {
        Self { weights }
    }

    fn add_cost(&self, node: &NodeHandle<'_>) -> CostResult<u64> {
        let cost = match node.kind() {
            NodeKind::SetConstruction => self.weights.add_to_set_cost,
            NodeKind::BagConstruction => self.weights.add_to_bag_cost,
            NodeKind::ListConstruction | NodeKind::ListRangeConstruction => {
                self.weights.add_to_list_cost
            }
            NodeKind::TupleConstruction => self.weights.add_to_tuple_cost,
            NodeKind::RecordConstruction => self.weights.add_to_record_cost,
            NodeKind::MapConstruction => self.weights.add_to_map_cost,
            _ => return Err(unsupported("ConstructionEstimator", node)),
        };
        Ok(cost)
    }

    /// 列表范围的元素个数
    ///
    /// 两个边界都是整数字面量时精确计算，否则退化为默认范围大小
    fn range_size(&self, node: &NodeHandle<'_>) -> CostResult<u64> {
        let first = node.required_child(EdgeRole::IsFirstValueOf)?;
        let last = node.required_child(EdgeRole::IsLastValueOf)?;
        let bounds = match (first.kind(), last.kind()) {
            (NodeKind::Literal { value: start }, NodeKind::Literal { value: end }) => {
                start.as_int().zip(end.as_int())
            }
            _ => None,
        };

        let Some((start, end)) = bounds else {
            log::debug!(
                "列表范围 {} 的边界不是整数字面量，使用默认大小 {}",
                node.id(),
                self.weights.default_range_size
            );
            return Ok(self.weights.default_range_size);
        };
        if end < start {
            return Ok(0);
        }
        match end.checked_sub(start).and_then(|d| d.checked_add(1)) {
            Some(size) => Ok(size as u64),
            None => {
                log::debug!("列表范围 {} 的大小溢出，使用默认大小", node.id());
                Ok(self.weights.default_range_size)
            }
        }
    }
}

impl NodeEstimator for ConstructionEstimator<'_> {
    fn cost(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        let own = self
            .add_cost(node)?
            .saturating_mul(node.estimated_cardinality()?);
        iterated_triple(node, own)
    }

    fn cardinality(&self, node: &NodeHandle<'_>, _summary: &GraphSizeSummary) -> CostResult<u64> {
        match node.kind() {
            NodeKind::SetConstruction
            | NodeKind::BagConstruction
            | NodeKind::ListConstruction
            | NodeKind::TupleConstruction
            | NodeKind::RecordConstruction => Ok(node.child_count(EdgeRole::IsPartOf) as u64),
            NodeKind::MapConstruction => Ok(node.child_count(EdgeRole::IsKeyExprOf) as u64),
            NodeKind::ListRangeConstruction => self.range_size(node),
            _ => Err(unsupported("ConstructionEstimator", node)),
        }
    }
}
