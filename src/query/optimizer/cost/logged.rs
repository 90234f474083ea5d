//! 基于日志的代价模型
//!
//! 在结构化估算之上混合历史统计。对每个节点以日志名称查询历史记录：
//! - 基数：`round(l·w + d·(1-w))`，没有记录（l = 0）时使用结构化估算 d
//! - 选择性：`l·w + d·(1-w)`，l 不在 (0, 1] 内时使用结构化估算
//! - 路径搜索：有记录的平均自动机规模替代默认 DFA 状态数
//!
//! 信任因子 w = 0 时所有结果与结构化模型完全一致。

use std::fmt;
use std::sync::Arc;

use crate::core::error::{CostError, CostResult};
use crate::query::graph::NodeFamily;
use crate::query::optimizer::stats::{GraphSizeSummary, HistoricalStatistics};

use super::estimate::CostTriple;
use super::handle::NodeHandle;
use super::model::{CostModel, CostModelKind};
use super::node_estimators::{round_to_u64, NodeEstimator, PathSearchEstimator};
use super::structural::StructuralCostModel;

/// 基于日志的代价模型
#[derive(Clone)]
pub struct LoggedCostModel {
    structural: StructuralCostModel,
    history: Arc<dyn HistoricalStatistics>,
    trust_factor: f64,
}

impl LoggedCostModel {
    /// 创建模型，信任因子必须位于 [0, 1]
    pub fn new(
        structural: StructuralCostModel,
        history: Arc<dyn HistoricalStatistics>,
        trust_factor: f64,
    ) -> CostResult<Self> {
        if !(0.0..=1.0).contains(&trust_factor) {
            return Err(CostError::InvalidTrustFactor(trust_factor));
        }
        Ok(Self {
            structural,
            history,
            trust_factor,
        })
    }

    pub fn trust_factor(&self) -> f64 {
        self.trust_factor
    }

    pub fn structural(&self) -> &StructuralCostModel {
        &self.structural
    }

    fn blend(&self, logged: f64, derived: f64) -> f64 {
        logged * self.trust_factor + derived * (1.0 - self.trust_factor)
    }
}

impl fmt::Debug for LoggedCostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggedCostModel")
            .field("structural", &self.structural)
            .field("trust_factor", &self.trust_factor)
            .finish_non_exhaustive()
    }
}

impl CostModel for LoggedCostModel {
    fn kind(&self) -> CostModelKind {
        CostModelKind::Logged
    }

    fn cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        if self.trust_factor > 0.0 && node.kind().family() == NodeFamily::PathSearch {
            let states = self.history.average_automaton_size(node.logging_name());
            if states > 0.0 {
                log::debug!(
                    "节点 {} 使用历史自动机规模 {:.1}",
                    node.logging_name(),
                    states
                );
                return PathSearchEstimator::with_dfa_states(
                    self.structural.weights(),
                    round_to_u64(states),
                )
                .cost(node, summary);
            }
        }
        self.structural.cost(node, summary)
    }

    fn cardinality(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64> {
        let derived = self.structural.cardinality(node, summary)?;
        if self.trust_factor == 0.0 {
            return Ok(derived);
        }
        let logged = self.history.average_result_size(node.logging_name());
        if logged == 0.0 || logged.is_nan() {
            return Ok(derived);
        }
        Ok(round_to_u64(self.blend(logged, derived as f64)))
    }

    fn selectivity(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<f64> {
        let derived = self.structural.selectivity(node, summary)?;
        if self.trust_factor == 0.0 {
            return Ok(derived);
        }
        let logged = self.history.average_selectivity(node.logging_name());
        if !(logged > 0.0 && logged <= 1.0) {
            return Ok(derived);
        }
        Ok(self.blend(logged, derived))
    }
}
