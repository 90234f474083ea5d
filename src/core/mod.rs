pub mod error;
pub mod murmur;

// 错误和结果类型
pub use error::{CostError, CostResult};
