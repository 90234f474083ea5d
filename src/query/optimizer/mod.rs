//! 查询优化器模块
//!
//! 提供查询优化所需的代价估算
//!
//! ## 模块结构
//!
//! - `stats` - 统计信息模块，数据图规模摘要与历史统计
//! - `cost` - 代价计算模块，估算查询构造的代价、基数和选择性
//!
//! ## 使用示例
//!
//! ```rust
//! use graphdb_cost::query::optimizer::{CostAssigner, GraphSizeSummary, StructuralCostModel};
//! use graphdb_cost::query::optimizer::cost::{CostWeights, FunctionCatalog};
//! use std::sync::Arc;
//!
//! // 创建结构化代价模型
//! let model = StructuralCostModel::new(CostWeights::default(), Arc::new(FunctionCatalog::with_builtins()));
//!
//! // 创建代价赋值器
//! let assigner = CostAssigner::new(Arc::new(model), GraphSizeSummary::new(1000, 5000, 10, 6));
//! assert_eq!(assigner.summary().types_in_schema(), 8);
//! ```

pub mod cost;
pub mod stats;

// 重新导出主要类型
pub use cost::{
    create_cost_model, CostAssigner, CostModel, CostModelKind, CostTriple, LoggedCostModel,
    QueryCostReport, StructuralCostModel,
};
pub use stats::{GraphSizeSummary, HistoricalStatistics, StatisticsLog};
