//! 代价模型权重配置
//!
//! 结构化代价模型使用的可调常量。权重表是不可变的配置结构，
//! 在构造代价模型时传入，也可以从配置文件的 `[estimator.weights]` 段加载。
//!
//! ## 使用示例
//!
//! ```rust
//! use graphdb_cost::query::optimizer::cost::CostWeights;
//!
//! // 使用默认权重
//! let weights = CostWeights::default();
//! assert_eq!(weights.add_to_set_cost, 10);
//!
//! // 自定义权重
//! let custom = CostWeights::new()
//!     .with_transition_cost(4)
//!     .with_default_range_size(100);
//! assert_eq!(custom.default_range_size, 100);
//! ```

use serde::{Deserialize, Serialize};

/// 代价模型权重表
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// 向集合加入一个元素的代价（需要去重）
    pub add_to_set_cost: u64,
    /// 向多重集加入一个元素的代价
    pub add_to_bag_cost: u64,
    /// 向列表追加一个元素的代价
    pub add_to_list_cost: u64,
    /// 向元组加入一个分量的代价
    pub add_to_tuple_cost: u64,
    /// 向记录加入一个字段的代价
    pub add_to_record_cost: u64,
    /// 向映射加入一个条目的代价
    pub add_to_map_cost: u64,
    /// 向表格加入一行的代价
    pub add_to_table_cost: u64,

    /// 构造一个 NFA 片段的默认代价
    pub nfa_construction_cost: u64,
    /// 路径搜索自动机的默认 DFA 状态数
    pub default_dfa_state_count: u64,
    /// 每个自动机转移的代价
    pub transition_cost: u64,
    /// 路径搜索的搜索因子
    pub search_factor: u64,
    /// 路径存在判断的选择性
    pub path_existence_selectivity: f64,

    /// 声明每个变量组合的代价系数
    pub declaration_cost_factor: u64,
    /// 顶点集合表达式的每顶点代价
    pub vertex_set_expression_cost_factor: u64,
    /// 边集合表达式的每条边代价
    pub edge_set_expression_cost_factor: u64,
    /// 子图表达式的每元素代价
    pub subgraph_expression_cost_factor: u64,

    /// 无法静态确定的列表范围大小
    pub default_range_size: u64,

    /// 未注册函数的调用代价
    pub function_call_cost: u64,
    pub definition_cost: u64,
    pub conditional_cost: u64,
    pub quantifier_cost: u64,
    pub type_id_cost: u64,
    pub variable_lookup_cost: u64,
    pub literal_cost: u64,
    pub query_root_cost: u64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            add_to_set_cost: 10,
            add_to_bag_cost: 10,
            add_to_list_cost: 5,
            add_to_tuple_cost: 5,
            add_to_record_cost: 5,
            add_to_map_cost: 10,
            add_to_table_cost: 10,
            nfa_construction_cost: 20,
            default_dfa_state_count: 15,
            transition_cost: 10,
            search_factor: 5,
            path_existence_selectivity: 0.1,
            declaration_cost_factor: 5,
            vertex_set_expression_cost_factor: 3,
            edge_set_expression_cost_factor: 3,
            subgraph_expression_cost_factor: 2,
            default_range_size: 50,
            function_call_cost: 2,
            definition_cost: 1,
            conditional_cost: 1,
            quantifier_cost: 2,
            type_id_cost: 1,
            variable_lookup_cost: 1,
            literal_cost: 1,
            query_root_cost: 1,
        }
    }
}

impl CostWeights {
    /// 创建默认权重
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置转移代价
    pub fn with_transition_cost(mut self, cost: u64) -> Self {
        self.transition_cost = cost;
        self
    }

    /// 设置默认 DFA 状态数
    pub fn with_default_dfa_state_count(mut self, states: u64) -> Self {
        self.default_dfa_state_count = states;
        self
    }

    /// 设置声明代价系数
    pub fn with_declaration_cost_factor(mut self, factor: u64) -> Self {
        self.declaration_cost_factor = factor;
        self
    }

    /// 设置顶点集合表达式代价系数
    pub fn with_vertex_set_expression_cost_factor(mut self, factor: u64) -> Self {
        self.vertex_set_expression_cost_factor = factor;
        self
    }

    /// 设置默认范围大小
    pub fn with_default_range_size(mut self, size: u64) -> Self {
        self.default_range_size = size;
        self
    }

    /// 设置路径存在判断的选择性，越界值被截断到 [0, 1]
    pub fn with_path_existence_selectivity(mut self, selectivity: f64) -> Self {
        self.path_existence_selectivity = selectivity.clamp(0.0, 1.0);
        self
    }
}
