//! 集成测试共享工具模块
//!
//! 提供测试查询图、代价模型和断言辅助函数，供所有集成测试使用

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;

use graphdb_cost::core::error::CostResult;
use graphdb_cost::query::graph::{
    EdgeRole, LiteralValue, NodeId, NodeKind, QueryGraph, QueryGraphBuilder,
};
use graphdb_cost::query::optimizer::cost::{
    CostModel, CostModelKind, CostTriple, CostWeights, FunctionCatalog, NodeHandle,
    StructuralCostModel,
};
use graphdb_cost::query::optimizer::stats::GraphSizeSummary;

/// 默认权重与内置函数目录的结构化模型
pub fn structural_model() -> StructuralCostModel {
    StructuralCostModel::new(CostWeights::default(), Arc::new(FunctionCatalog::with_builtins()))
}

/// 中等规模的数据图摘要
pub fn sample_summary() -> GraphSizeSummary {
    GraphSizeSummary::new(1000, 4000, 8, 4)
}

/// 记录每个节点代价规则被调用次数的模型
#[derive(Debug)]
pub struct CountingModel {
    inner: StructuralCostModel,
    calls: Mutex<Vec<usize>>,
    cardinality_calls: Mutex<Vec<usize>>,
}

fn bump(counter: &Mutex<Vec<usize>>, id: NodeId) {
    let mut calls = counter.lock();
    let index = id.index();
    if calls.len() <= index {
        calls.resize(index + 1, 0);
    }
    calls[index] += 1;
}

impl CountingModel {
    pub fn new(inner: StructuralCostModel) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            cardinality_calls: Mutex::new(Vec::new()),
        }
    }

    /// 代价规则的调用次数
    pub fn calls(&self, id: NodeId) -> usize {
        self.calls.lock().get(id.index()).copied().unwrap_or(0)
    }

    /// 基数规则的调用次数
    pub fn cardinality_calls(&self, id: NodeId) -> usize {
        self.cardinality_calls
            .lock()
            .get(id.index())
            .copied()
            .unwrap_or(0)
    }

    /// 所有节点基数规则的调用总数
    pub fn total_cardinality_calls(&self) -> usize {
        self.cardinality_calls.lock().iter().sum()
    }
}

impl CostModel for CountingModel {
    fn kind(&self) -> CostModelKind {
        self.inner.kind()
    }

    fn cost(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<CostTriple> {
        bump(&self.calls, node.id());
        self.inner.cost(node, summary)
    }

    fn cardinality(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<u64> {
        bump(&self.cardinality_calls, node.id());
        self.inner.cardinality(node, summary)
    }

    fn selectivity(&self, node: &NodeHandle<'_>, summary: &GraphSizeSummary) -> CostResult<f64> {
        self.inner.selectivity(node, summary)
    }
}

pub fn int(builder: &mut QueryGraphBuilder, value: i64) -> NodeId {
    builder.add_node(NodeKind::Literal {
        value: LiteralValue::Int(value),
    })
}

pub fn variable(builder: &mut QueryGraphBuilder, name: &str) -> NodeId {
    builder.add_node(NodeKind::Variable {
        name: name.to_string(),
    })
}

/// 由 n 个整数字面量组成的集合构造
pub fn literal_set(builder: &mut QueryGraphBuilder, n: i64) -> NodeId {
    let parts: Vec<_> = (0..n)
        .map(|i| (EdgeRole::IsPartOf, int(builder, i)))
        .collect();
    builder.add_with(NodeKind::SetConstruction, &parts)
}

/// 只包含一个变量的简单声明 `var : domain`
pub fn simple_declaration(builder: &mut QueryGraphBuilder, var: NodeId, domain: NodeId) -> NodeId {
    builder.add_with(
        NodeKind::SimpleDeclaration,
        &[(EdgeRole::IsDeclaredVarOf, var), (EdgeRole::IsTypeExprOf, domain)],
    )
}

/// 嵌套推导式
///
/// ```text
/// from y : {0, 1}
/// report bag(from x : {0, 1, 2} with equals(x, y) report x)
/// ```
///
/// 内层声明的约束引用外层变量 y，因此内层声明随 y 的每个取值重复求值。
pub struct NestedComprehension {
    pub graph: QueryGraph,
    pub x: NodeId,
    pub y: NodeId,
    pub inner_simple: NodeId,
    pub constraint: NodeId,
    pub inner_declaration: NodeId,
    pub inner_comprehension: NodeId,
    pub outer_comprehension: NodeId,
}

pub fn nested_comprehension() -> NestedComprehension {
    let mut builder = QueryGraphBuilder::new();

    let y_domain = literal_set(&mut builder, 2);
    let y = variable(&mut builder, "y");
    let outer_simple = simple_declaration(&mut builder, y, y_domain);
    let outer_declaration =
        builder.add_with(NodeKind::Declaration, &[(EdgeRole::IsSimpleDeclOf, outer_simple)]);

    let x_domain = literal_set(&mut builder, 3);
    let x = variable(&mut builder, "x");
    let inner_simple = simple_declaration(&mut builder, x, x_domain);
    let constraint = builder.add_with(
        NodeKind::FunctionApplication {
            function: "equals".to_string(),
        },
        &[(EdgeRole::IsArgumentOf, x), (EdgeRole::IsArgumentOf, y)],
    );
    let inner_declaration = builder.add_with(
        NodeKind::Declaration,
        &[
            (EdgeRole::IsSimpleDeclOf, inner_simple),
            (EdgeRole::IsConstraintOf, constraint),
        ],
    );
    let inner_comprehension = builder.add_with(
        NodeKind::BagComprehension,
        &[
            (EdgeRole::IsCompDeclOf, inner_declaration),
            (EdgeRole::IsCompResultDefOf, x),
        ],
    );
    let outer_comprehension = builder.add_with(
        NodeKind::SetComprehension,
        &[
            (EdgeRole::IsCompDeclOf, outer_declaration),
            (EdgeRole::IsCompResultDefOf, inner_comprehension),
        ],
    );

    let graph = builder.build(outer_comprehension).expect("构建测试查询图失败");
    NestedComprehension {
        graph,
        x,
        y,
        inner_simple,
        constraint,
        inner_declaration,
        inner_comprehension,
        outer_comprehension,
    }
}

/// 覆盖大部分节点类型族的查询
///
/// ```text
/// from v : V{Person, ^City}, w : V
/// with v -->{knows}+ w and degree(v) > 3
/// report let n := count(v -->* ) in if n then [1..10] else {v, w}
/// ```
pub fn complex_query() -> QueryGraph {
    let mut builder = QueryGraphBuilder::new();

    let person = builder.add_node(NodeKind::TypeId {
        name: "Person".to_string(),
        subtypes: true,
        excluded: false,
    });
    let city = builder.add_node(NodeKind::TypeId {
        name: "City".to_string(),
        subtypes: false,
        excluded: true,
    });
    let people = builder.add_with(
        NodeKind::VertexSetExpression,
        &[
            (EdgeRole::IsTypeRestrictionOf, person),
            (EdgeRole::IsTypeRestrictionOf, city),
        ],
    );
    let all_vertices = builder.add_node(NodeKind::VertexSetExpression);

    let v = variable(&mut builder, "v");
    let w = variable(&mut builder, "w");
    let v_decl = simple_declaration(&mut builder, v, people);
    let w_decl = simple_declaration(&mut builder, w, all_vertices);

    let knows = builder.add_node(NodeKind::TypeId {
        name: "knows".to_string(),
        subtypes: false,
        excluded: false,
    });
    let edge = builder.add_with(
        NodeKind::SimplePathDescription {
            direction: Default::default(),
        },
        &[(EdgeRole::IsTypeRestrictionOf, knows)],
    );
    let iterated = builder.add_with(
        NodeKind::IteratedPathDescription { reflexive: false },
        &[(EdgeRole::IsIteratedPathOf, edge)],
    );
    let reachable = builder.add_with(
        NodeKind::PathExistence,
        &[
            (EdgeRole::IsStartExprOf, v),
            (EdgeRole::IsPathOf, iterated),
            (EdgeRole::IsTargetExprOf, w),
        ],
    );
    let degree = builder.add_with(
        NodeKind::FunctionApplication {
            function: "degree".to_string(),
        },
        &[(EdgeRole::IsArgumentOf, v)],
    );
    let three = int(&mut builder, 3);
    let greater = builder.add_with(
        NodeKind::FunctionApplication {
            function: "grThan".to_string(),
        },
        &[(EdgeRole::IsArgumentOf, degree), (EdgeRole::IsArgumentOf, three)],
    );
    let both = builder.add_with(
        NodeKind::FunctionApplication {
            function: "and".to_string(),
        },
        &[(EdgeRole::IsArgumentOf, reachable), (EdgeRole::IsArgumentOf, greater)],
    );
    let declaration = builder.add_with(
        NodeKind::Declaration,
        &[
            (EdgeRole::IsSimpleDeclOf, v_decl),
            (EdgeRole::IsSimpleDeclOf, w_decl),
            (EdgeRole::IsConstraintOf, both),
        ],
    );

    let any_edge = builder.add_node(NodeKind::SimplePathDescription {
        direction: Default::default(),
    });
    let star = builder.add_with(
        NodeKind::IteratedPathDescription { reflexive: true },
        &[(EdgeRole::IsIteratedPathOf, any_edge)],
    );
    let forward = builder.add_with(
        NodeKind::ForwardVertexSet,
        &[(EdgeRole::IsStartExprOf, v), (EdgeRole::IsPathOf, star)],
    );
    let count = builder.add_with(
        NodeKind::FunctionApplication {
            function: "count".to_string(),
        },
        &[(EdgeRole::IsArgumentOf, forward)],
    );
    let n = variable(&mut builder, "n");
    let definition = builder.add_with(
        NodeKind::Definition,
        &[(EdgeRole::IsVarOf, n), (EdgeRole::IsExprOf, count)],
    );

    let one = int(&mut builder, 1);
    let ten = int(&mut builder, 10);
    let range = builder.add_with(
        NodeKind::ListRangeConstruction,
        &[(EdgeRole::IsFirstValueOf, one), (EdgeRole::IsLastValueOf, ten)],
    );
    let pair = builder.add_with(
        NodeKind::SetConstruction,
        &[(EdgeRole::IsPartOf, v), (EdgeRole::IsPartOf, w)],
    );
    let conditional = builder.add_with(
        NodeKind::ConditionalExpression,
        &[
            (EdgeRole::IsConditionOf, n),
            (EdgeRole::IsTrueExprOf, range),
            (EdgeRole::IsFalseExprOf, pair),
        ],
    );
    let let_expression = builder.add_with(
        NodeKind::LetExpression,
        &[
            (EdgeRole::IsDefinitionOf, definition),
            (EdgeRole::IsBoundExprOf, conditional),
        ],
    );

    let comprehension = builder.add_with(
        NodeKind::BagComprehension,
        &[
            (EdgeRole::IsCompDeclOf, declaration),
            (EdgeRole::IsCompResultDefOf, let_expression),
        ],
    );
    let root = builder.add_with(NodeKind::QueryRoot, &[(EdgeRole::IsQueryExprOf, comprehension)]);

    builder.build(root).expect("构建测试查询图失败")
}

/// 只有一个路径存在判断的查询：`v --> w`
pub fn path_existence_query() -> QueryGraph {
    let mut builder = QueryGraphBuilder::new();
    let v = variable(&mut builder, "v");
    let w = variable(&mut builder, "w");
    let path = builder.add_node(NodeKind::SimplePathDescription {
        direction: Default::default(),
    });
    let root = builder.add_with(
        NodeKind::PathExistence,
        &[
            (EdgeRole::IsStartExprOf, v),
            (EdgeRole::IsPathOf, path),
            (EdgeRole::IsTargetExprOf, w),
        ],
    );
    builder.build(root).expect("构建测试查询图失败")
}

/// 每层都把上一层作为两个参数的函数链：`union(prev, prev)`
///
/// 返回查询图和从底到顶的节点编号
pub fn shared_union_chain(depth: usize) -> (QueryGraph, Vec<NodeId>) {
    let mut builder = QueryGraphBuilder::new();
    let mut chain = vec![builder.add_node(NodeKind::VertexSetExpression)];
    for _ in 0..depth {
        let prev = chain[chain.len() - 1];
        let next = builder.add_with(
            NodeKind::FunctionApplication {
                function: "union".to_string(),
            },
            &[(EdgeRole::IsArgumentOf, prev), (EdgeRole::IsArgumentOf, prev)],
        );
        chain.push(next);
    }
    let root = chain[chain.len() - 1];
    let graph = builder.build(root).expect("构建测试查询图失败");
    (graph, chain)
}
