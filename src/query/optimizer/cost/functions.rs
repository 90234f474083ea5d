//! 函数目录
//!
//! 为函数应用节点提供每个函数自己的代价、基数和选择性估算规则。
//! 规则的输入是所有参数基数之和。

use std::collections::HashMap;

/// 随输入规模增长的估算规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Growth {
    /// 与输入无关的常量
    Constant(u64),
    /// 输入规模的线性倍数
    Linear(f64),
    /// 输入规模平方的倍数
    Quadratic(f64),
}

impl Growth {
    pub fn apply(&self, input_size: u64) -> u64 {
        let n = input_size as f64;
        match self {
            Growth::Constant(c) => *c,
            Growth::Linear(f) => (n * f).round() as u64,
            Growth::Quadratic(f) => (n * n * f).round() as u64,
        }
    }
}

/// 单个函数的估算规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionProfile {
    pub cost: Growth,
    pub cardinality: Growth,
    pub selectivity: f64,
}

impl FunctionProfile {
    pub fn new(cost: Growth, cardinality: Growth, selectivity: f64) -> Self {
        Self {
            cost,
            cardinality,
            selectivity: selectivity.clamp(0.0, 1.0),
        }
    }

    /// 谓词：常量代价，单个布尔结果
    pub fn predicate(cost: u64, selectivity: f64) -> Self {
        Self::new(Growth::Constant(cost), Growth::Constant(1), selectivity)
    }

    /// 聚合：线性代价，单个结果
    pub fn aggregate(cost_per_element: f64) -> Self {
        Self::new(Growth::Linear(cost_per_element), Growth::Constant(1), 1.0)
    }

    /// 集合运算：线性代价，结果规模与输入成比例
    pub fn collection(cost_per_element: f64, result_ratio: f64) -> Self {
        Self::new(
            Growth::Linear(cost_per_element),
            Growth::Linear(result_ratio),
            1.0,
        )
    }

    pub fn estimate_cost(&self, input_size: u64) -> u64 {
        self.cost.apply(input_size)
    }

    pub fn estimate_cardinality(&self, input_size: u64) -> u64 {
        self.cardinality.apply(input_size)
    }
}

/// 函数目录
#[derive(Debug, Clone, Default)]
pub struct FunctionCatalog {
    functions: HashMap<String, FunctionProfile>,
}

impl FunctionCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含常用内置函数的目录
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register("and", FunctionProfile::predicate(1, 0.5));
        catalog.register("or", FunctionProfile::predicate(1, 0.75));
        catalog.register("not", FunctionProfile::predicate(1, 0.5));
        catalog.register("equals", FunctionProfile::predicate(2, 0.1));
        catalog.register("nequals", FunctionProfile::predicate(2, 0.9));
        catalog.register("leThan", FunctionProfile::predicate(2, 0.333));
        catalog.register("grThan", FunctionProfile::predicate(2, 0.333));
        catalog.register(
            "contains",
            FunctionProfile::new(Growth::Linear(1.0), Growth::Constant(1), 0.5),
        );
        catalog.register("count", FunctionProfile::aggregate(1.0));
        catalog.register("sum", FunctionProfile::aggregate(1.0));
        catalog.register("avg", FunctionProfile::aggregate(1.0));
        catalog.register("max", FunctionProfile::aggregate(1.0));
        catalog.register("min", FunctionProfile::aggregate(1.0));
        catalog.register("union", FunctionProfile::collection(2.0, 1.0));
        catalog.register("intersection", FunctionProfile::collection(2.0, 0.5));
        catalog.register("concat", FunctionProfile::collection(1.0, 1.0));
        catalog.register(
            "degree",
            FunctionProfile::new(Growth::Linear(2.0), Growth::Constant(1), 1.0),
        );
        catalog.register(
            "isReachable",
            FunctionProfile::new(Growth::Quadratic(1.0), Growth::Constant(1), 0.1),
        );
        catalog
    }

    /// 注册或替换函数的估算规则
    pub fn register(&mut self, name: &str, profile: FunctionProfile) {
        self.functions.insert(name.to_string(), profile);
    }

    pub fn lookup(&self, name: &str) -> Option<&FunctionProfile> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
