//! 代价计算模块
//!
//! 为查询表示图中的每个节点估算代价、结果规模和选择性
//!
//! ## 模块结构
//!
//! - `model` - 代价模型契约与模型工厂
//! - `structural` - 结构化代价模型
//! - `logged` - 混合历史统计的代价模型
//! - `node_estimators` - 按节点类型族拆分的估算规则
//! - `handle` - 节点句柄与记忆化的求值器注册表
//! - `config` - 代价模型权重配置
//! - `functions` - 函数目录
//! - `estimate` - 节点代价三元组
//! - `assigner` - 代价赋值器，为整个查询生成代价报告

pub mod assigner;
pub mod config;
pub mod estimate;
pub mod functions;
pub mod handle;
pub mod logged;
pub mod model;
pub mod node_estimators;
pub mod structural;

pub use assigner::{CostAssigner, NodeEstimate, QueryCostReport};
pub use config::CostWeights;
pub use estimate::CostTriple;
pub use functions::{FunctionCatalog, FunctionProfile, Growth};
pub use handle::{EvaluatorRegistry, NodeHandle};
pub use logged::LoggedCostModel;
pub use model::{create_cost_model, CostModel, CostModelKind};
pub use structural::StructuralCostModel;
