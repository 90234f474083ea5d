//! 节点代价估算结果
//!
//! 定义节点代价三元组，包含：
//! - 节点自身代价（单次求值，不包含子节点）
//! - 迭代代价（自身代价乘以外层声明强制的重复求值次数）
//! - 子树代价（迭代代价加上所有结构子节点的子树代价）
//!
//! 代价单位是抽象的"求值步数"，所有运算均为饱和运算。

use serde::{Deserialize, Serialize};

/// 节点代价三元组
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTriple {
    /// 节点自身代价（不包含子节点）
    pub own_cost: u64,
    /// 迭代代价（包含重复求值）
    pub iterated_cost: u64,
    /// 子树代价（包含所有子节点）
    pub subtree_cost: u64,
}

impl CostTriple {
    pub fn new(own_cost: u64, iterated_cost: u64, subtree_cost: u64) -> Self {
        Self {
            own_cost,
            iterated_cost,
            subtree_cost,
        }
    }

    /// 由自身代价、重复次数和子节点子树代价之和组合
    pub fn compose(own_cost: u64, iterations: u64, children_subtree_cost: u64) -> Self {
        let iterated_cost = own_cost.saturating_mul(iterations);
        Self {
            own_cost,
            iterated_cost,
            subtree_cost: iterated_cost.saturating_add(children_subtree_cost),
        }
    }
}
