//! 错误处理
//!
//! 代价估算子系统只有一类可传播的错误：`CostError`。
//! 配置加载沿用 `Box<dyn std::error::Error>`，见 `crate::config`。

pub mod optimize;

pub use optimize::{CostError, CostResult};
