//! 代价模型契约
//!
//! 优化器与具体估算策略之间的插件边界。每个代价模型对任意节点类型给出：
//! - 代价三元组
//! - 基数（结果规模）
//! - 选择性（过滤类节点保留的比例）
//!
//! 节点类型作为数据传入，由实现内部的 `match` 分派。

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::EstimatorConfig;
use crate::core::error::{CostError, CostResult};
use crate::query::optimizer::stats::{GraphSizeSummary, HistoricalStatistics};

use super::estimate::CostTriple;
use super::functions::FunctionCatalog;
use super::handle::NodeHandle;
use super::logged::LoggedCostModel;
use super::structural::StructuralCostModel;

/// 代价模型的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostModelKind {
    /// 纯公式估算
    #[default]
    Structural,
    /// 结构化估算与历史统计的加权混合
    Logged,
}

impl CostModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostModelKind::Structural => "structural",
            CostModelKind::Logged => "logged",
        }
    }
}

impl fmt::Display for CostModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "structural" | "default" => Ok(CostModelKind::Structural),
            "logged" | "log" => Ok(CostModelKind::Logged),
            other => Err(format!("未知的代价模型: {}", other)),
        }
    }
}

/// 代价模型 trait
///
/// 同一个实例服务于一次查询的所有节点，不持有任何与单个查询图相关的状态。
/// 规则通过 `NodeHandle` 获取子节点已经记忆化的估算结果，从不自行重算。
pub trait CostModel: Send + Sync + fmt::Debug {
    /// 模型种类
    fn kind(&self) -> CostModelKind;

    /// 估算节点的代价三元组
    fn cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<CostTriple>;

    /// 估算节点的结果规模
    fn cardinality(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64>;

    /// 估算节点的选择性，位于 [0, 1]
    fn selectivity(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<f64>;

    /// 两个模型是否为同一种策略，可以共享缓存的估算结果
    fn is_equivalent(&self, other: &dyn CostModel) -> bool {
        self.kind() == other.kind()
    }
}

/// 按配置创建代价模型
///
/// 基于日志的模型必须提供历史统计来源，信任因子越界时直接失败。
pub fn create_cost_model(
    config: &EstimatorConfig,
    functions: Arc<FunctionCatalog>,
    history: Option<Arc<dyn HistoricalStatistics>>,
) -> CostResult<Box<dyn CostModel>> {
    let structural = StructuralCostModel::new(config.weights, functions);
    let model: Box<dyn CostModel> = match config.model {
        CostModelKind::Structural => Box::new(structural),
        CostModelKind::Logged => {
            let history = history.ok_or(CostError::MissingStatisticsSource)?;
            Box::new(LoggedCostModel::new(structural, history, config.trust_factor)?)
        }
    };
    log::info!("已创建代价模型: {}", model.kind());
    Ok(model)
}
