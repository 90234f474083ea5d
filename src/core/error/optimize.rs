//! 代价估算错误类型
//!
//! 定义代价估算子系统相关的错误类型，包括：
//! - 配置错误（信任因子越界、缺少历史统计来源）
//! - 查询图结构错误（缺少必需的结构边、未知节点、环）
//! - 历史统计信息的读写错误
//!
//! 无法静态确定的子估算（例如非字面量的范围边界、未注册的函数）
//! 不属于错误，由各估算规则使用默认常量在本地恢复。

use thiserror::Error;

use crate::query::graph::{EdgeRole, NodeId};

/// 代价估算错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    /// 信任因子不在 [0, 1] 范围内
    #[error("信任因子必须位于 [0, 1] 区间: {0}")]
    InvalidTrustFactor(f64),

    /// 基于日志的代价模型缺少历史统计来源
    #[error("基于日志的代价模型需要历史统计来源")]
    MissingStatisticsSource,

    /// 节点缺少必需的结构边
    #[error("节点 {node} 缺少必需的结构边: {role}")]
    MissingStructuralEdge { node: NodeId, role: EdgeRole },

    /// 估算器收到不属于自己类型族的节点
    #[error("{estimator} 不支持节点类型: {kind}")]
    UnsupportedNodeKind {
        estimator: &'static str,
        kind: &'static str,
    },

    /// 引用了不存在的节点
    #[error("未知节点: {0}")]
    UnknownNode(NodeId),

    /// 查询图文档无法解析
    #[error("无效的查询图: {0}")]
    InvalidQueryGraph(String),

    /// 查询图中存在环
    #[error("查询图存在环，节点 {0} 可以到达自身")]
    CyclicQueryGraph(NodeId),

    /// 历史统计信息错误
    #[error("历史统计信息错误: {0}")]
    StatisticsError(String),
}

/// 代价估算结果类型
pub type CostResult<T> = Result<T, CostError>;

impl From<std::io::Error> for CostError {
    fn from(err: std::io::Error) -> Self {
        CostError::StatisticsError(err.to_string())
    }
}

impl From<serde_json::Error> for CostError {
    fn from(err: serde_json::Error) -> Self {
        CostError::StatisticsError(err.to_string())
    }
}
