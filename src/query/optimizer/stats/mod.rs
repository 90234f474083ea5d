//! 统计信息模块
//!
//! 提供代价估算所需的两类统计信息
//!
//! ## 模块结构
//!
//! - `summary` - 数据图规模摘要，一次优化过程中固定不变
//! - `history` - 以日志名称为键的历史统计，供基于日志的代价模型使用

pub mod history;
pub mod summary;

pub use history::{HistoricalStatistics, LogEntry, RunningAverage, StatisticsLog};
pub use summary::{DataGraphStatistics, GraphSizeSummary, DEFAULT_SUBCLASS_FANOUT};
