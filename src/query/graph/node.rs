//! 查询表示图的节点与结构边
//!
//! 节点类型是一个封闭集合，每种类型通过带角色的结构边连接到操作数。
//! 边由消费方（父节点）指向操作数（子节点），角色描述子节点在父节点中的身份。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 节点在查询图中的稠密索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 路径描述中边的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathDirection {
    #[default]
    Out,
    In,
    Any,
}

/// 量词
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantifier {
    Exists,
    ExistsExactly,
    ForAll,
}

/// 字面量值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl LiteralValue {
    /// 整数字面量的值
    pub fn as_int(&self) -> Option<i64> {
        match self {
            LiteralValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

/// 节点类型族，用于选择估算器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFamily {
    PathDescription,
    Construction,
    Comprehension,
    Declaration,
    Expression,
    GraphElement,
    PathSearch,
}

/// 查询构造的类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    // ==================== 路径描述 ====================
    SimplePathDescription {
        #[serde(default)]
        direction: PathDirection,
    },
    EdgePathDescription {
        #[serde(default)]
        direction: PathDirection,
    },
    SequentialPathDescription,
    AlternativePathDescription,
    OptionalPathDescription,
    IteratedPathDescription {
        #[serde(default)]
        reflexive: bool,
    },
    ExponentiatedPathDescription,
    TransposedPathDescription,
    IntermediateVertexPathDescription,

    // ==================== 值构造 ====================
    SetConstruction,
    BagConstruction,
    ListConstruction,
    TupleConstruction,
    RecordConstruction,
    MapConstruction,
    ListRangeConstruction,

    // ==================== 推导式 ====================
    SetComprehension,
    BagComprehension,
    TableComprehension,

    // ==================== 声明与定义 ====================
    Declaration,
    SimpleDeclaration,
    Definition,
    LetExpression,
    WhereExpression,

    // ==================== 表达式 ====================
    ConditionalExpression,
    QuantifiedExpression {
        quantifier: Quantifier,
    },
    FunctionApplication {
        function: String,
    },
    TypeId {
        name: String,
        #[serde(default)]
        subtypes: bool,
        #[serde(default)]
        excluded: bool,
    },
    Variable {
        name: String,
    },
    Literal {
        value: LiteralValue,
    },

    // ==================== 图元素集合 ====================
    VertexSetExpression,
    EdgeSetExpression,
    SubgraphExpression,

    // ==================== 路径搜索 ====================
    PathExistence,
    ForwardVertexSet,
    BackwardVertexSet,

    QueryRoot,
}

impl NodeKind {
    /// 类型名称，同时作为日志名称的前缀
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::SimplePathDescription { .. } => "SimplePathDescription",
            NodeKind::EdgePathDescription { .. } => "EdgePathDescription",
            NodeKind::SequentialPathDescription => "SequentialPathDescription",
            NodeKind::AlternativePathDescription => "AlternativePathDescription",
            NodeKind::OptionalPathDescription => "OptionalPathDescription",
            NodeKind::IteratedPathDescription { .. } => "IteratedPathDescription",
            NodeKind::ExponentiatedPathDescription => "ExponentiatedPathDescription",
            NodeKind::TransposedPathDescription => "TransposedPathDescription",
            NodeKind::IntermediateVertexPathDescription => "IntermediateVertexPathDescription",
            NodeKind::SetConstruction => "SetConstruction",
            NodeKind::BagConstruction => "BagConstruction",
            NodeKind::ListConstruction => "ListConstruction",
            NodeKind::TupleConstruction => "TupleConstruction",
            NodeKind::RecordConstruction => "RecordConstruction",
            NodeKind::MapConstruction => "MapConstruction",
            NodeKind::ListRangeConstruction => "ListRangeConstruction",
            NodeKind::SetComprehension => "SetComprehension",
            NodeKind::BagComprehension => "BagComprehension",
            NodeKind::TableComprehension => "TableComprehension",
            NodeKind::Declaration => "Declaration",
            NodeKind::SimpleDeclaration => "SimpleDeclaration",
            NodeKind::Definition => "Definition",
            NodeKind::LetExpression => "LetExpression",
            NodeKind::WhereExpression => "WhereExpression",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::QuantifiedExpression { .. } => "QuantifiedExpression",
            NodeKind::FunctionApplication { .. } => "FunctionApplication",
            NodeKind::TypeId { .. } => "TypeId",
            NodeKind::Variable { .. } => "Variable",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::VertexSetExpression => "VertexSetExpression",
            NodeKind::EdgeSetExpression => "EdgeSetExpression",
            NodeKind::SubgraphExpression => "SubgraphExpression",
            NodeKind::PathExistence => "PathExistence",
            NodeKind::ForwardVertexSet => "ForwardVertexSet",
            NodeKind::BackwardVertexSet => "BackwardVertexSet",
            NodeKind::QueryRoot => "QueryRoot",
        }
    }

    /// 节点所属的类型族
    pub fn family(&self) -> NodeFamily {
        match self {
            NodeKind::SimplePathDescription { .. }
            | NodeKind::EdgePathDescription { .. }
            | NodeKind::SequentialPathDescription
            | NodeKind::AlternativePathDescription
            | NodeKind::OptionalPathDescription
            | NodeKind::IteratedPathDescription { .. }
            | NodeKind::ExponentiatedPathDescription
            | NodeKind::TransposedPathDescription
            | NodeKind::IntermediateVertexPathDescription => NodeFamily::PathDescription,

            NodeKind::SetConstruction
            | NodeKind::BagConstruction
            | NodeKind::ListConstruction
            | NodeKind::TupleConstruction
            | NodeKind::RecordConstruction
            | NodeKind::MapConstruction
            | NodeKind::ListRangeConstruction => NodeFamily::Construction,

            NodeKind::SetComprehension
            | NodeKind::BagComprehension
            | NodeKind::TableComprehension => NodeFamily::Comprehension,

            NodeKind::Declaration
            | NodeKind::SimpleDeclaration
            | NodeKind::Definition
            | NodeKind::LetExpression
            | NodeKind::WhereExpression => NodeFamily::Declaration,

            NodeKind::ConditionalExpression
            | NodeKind::QuantifiedExpression { .. }
            | NodeKind::FunctionApplication { .. }
            | NodeKind::TypeId { .. }
            | NodeKind::Variable { .. }
            | NodeKind::Literal { .. }
            | NodeKind::QueryRoot => NodeFamily::Expression,

            NodeKind::VertexSetExpression
            | NodeKind::EdgeSetExpression
            | NodeKind::SubgraphExpression => NodeFamily::GraphElement,

            NodeKind::PathExistence
            | NodeKind::ForwardVertexSet
            | NodeKind::BackwardVertexSet => NodeFamily::PathSearch,
        }
    }

    /// 参与日志名称计算的负载部分，变量名被匿名化
    pub(crate) fn signature_payload(&self) -> Option<String> {
        match self {
            NodeKind::SimplePathDescription { direction }
            | NodeKind::EdgePathDescription { direction } => Some(format!("{:?}", direction)),
            NodeKind::IteratedPathDescription { reflexive } => {
                Some(if *reflexive { "*" } else { "+" }.to_string())
            }
            NodeKind::QuantifiedExpression { quantifier } => Some(format!("{:?}", quantifier)),
            NodeKind::FunctionApplication { function } => Some(function.clone()),
            NodeKind::TypeId { name, subtypes, excluded } => Some(format!(
                "{}{}{}",
                if *excluded { "^" } else { "" },
                name,
                if *subtypes { "" } else { "!" }
            )),
            NodeKind::Literal { value } => Some(format!("{:?}", value)),
            _ => None,
        }
    }
}

/// 结构边角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeRole {
    IsPartOf,
    IsKeyExprOf,
    IsValueExprOf,
    IsFirstValueOf,
    IsLastValueOf,
    IsArgumentOf,
    IsConstraintOf,
    IsTypeRestrictionOf,
    IsSimpleDeclOf,
    IsDeclaredVarOf,
    IsTypeExprOf,
    IsCompDeclOf,
    IsCompResultDefOf,
    IsColumnHeaderExprOf,
    IsRowHeaderExprOf,
    IsQuantifiedDeclOf,
    IsBoundExprOf,
    IsDefinitionOf,
    IsVarOf,
    IsExprOf,
    IsConditionOf,
    IsTrueExprOf,
    IsFalseExprOf,
    IsNullExprOf,
    IsStartExprOf,
    IsTargetExprOf,
    IsPathOf,
    IsSequenceElementOf,
    IsAlternativePathOf,
    IsOptionalPathOf,
    IsIteratedPathOf,
    IsExponentiatedPathOf,
    IsExponentOf,
    IsTransposedPathOf,
    IsSubPathOf,
    IsIntermediateVertexOf,
    IsEdgeExprOf,
    IsBoundVarOf,
    IsQueryExprOf,
}

impl EdgeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeRole::IsPartOf => "is-part-of",
            EdgeRole::IsKeyExprOf => "is-key-expr-of",
            EdgeRole::IsValueExprOf => "is-value-expr-of",
            EdgeRole::IsFirstValueOf => "is-first-value-of",
            EdgeRole::IsLastValueOf => "is-last-value-of",
            EdgeRole::IsArgumentOf => "is-argument-of",
            EdgeRole::IsConstraintOf => "is-constraint-of",
            EdgeRole::IsTypeRestrictionOf => "is-type-restriction-of",
            EdgeRole::IsSimpleDeclOf => "is-simple-decl-of",
            EdgeRole::IsDeclaredVarOf => "is-declared-var-of",
            EdgeRole::IsTypeExprOf => "is-type-expr-of",
            EdgeRole::IsCompDeclOf => "is-comp-decl-of",
            EdgeRole::IsCompResultDefOf => "is-comp-result-def-of",
            EdgeRole::IsColumnHeaderExprOf => "is-column-header-expr-of",
            EdgeRole::IsRowHeaderExprOf => "is-row-header-expr-of",
            EdgeRole::IsQuantifiedDeclOf => "is-quantified-decl-of",
            EdgeRole::IsBoundExprOf => "is-bound-expr-of",
            EdgeRole::IsDefinitionOf => "is-definition-of",
            EdgeRole::IsVarOf => "is-var-of",
            EdgeRole::IsExprOf => "is-expr-of",
            EdgeRole::IsConditionOf => "is-condition-of",
            EdgeRole::IsTrueExprOf => "is-true-expr-of",
            EdgeRole::IsFalseExprOf => "is-false-expr-of",
            EdgeRole::IsNullExprOf => "is-null-expr-of",
            EdgeRole::IsStartExprOf => "is-start-expr-of",
            EdgeRole::IsTargetExprOf => "is-target-expr-of",
            EdgeRole::IsPathOf => "is-path-of",
            EdgeRole::IsSequenceElementOf => "is-sequence-element-of",
            EdgeRole::IsAlternativePathOf => "is-alternative-path-of",
            EdgeRole::IsOptionalPathOf => "is-optional-path-of",
            EdgeRole::IsIteratedPathOf => "is-iterated-path-of",
            EdgeRole::IsExponentiatedPathOf => "is-exponentiated-path-of",
            EdgeRole::IsExponentOf => "is-exponent-of",
            EdgeRole::IsTransposedPathOf => "is-transposed-path-of",
            EdgeRole::IsSubPathOf => "is-sub-path-of",
            EdgeRole::IsIntermediateVertexOf => "is-intermediate-vertex-of",
            EdgeRole::IsEdgeExprOf => "is-edge-expr-of",
            EdgeRole::IsBoundVarOf => "is-bound-var-of",
            EdgeRole::IsQueryExprOf => "is-query-expr-of",
        }
    }

    /// 该角色的子节点是否为被声明（而非被求值）的变量
    pub fn binds_variable(&self) -> bool {
        matches!(self, EdgeRole::IsDeclaredVarOf | EdgeRole::IsVarOf | EdgeRole::IsBoundVarOf)
    }
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 带角色的有向结构边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralEdge {
    pub role: EdgeRole,
    pub target: NodeId,
}

/// 查询表示图中的一个节点
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    id: NodeId,
    kind: NodeKind,
    edges: Vec<StructuralEdge>,
}

impl QueryNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            edges: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// 按插入顺序排列的出边
    pub fn edges(&self) -> &[StructuralEdge] {
        &self.edges
    }

    pub(crate) fn push_edge(&mut self, role: EdgeRole, target: NodeId) {
        self.edges.push(StructuralEdge { role, target });
    }

    /// 指定角色的子节点
    pub fn children(&self, role: EdgeRole) -> impl Iterator<Item = NodeId> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.role == role)
            .map(|e| e.target)
    }

    /// 指定角色的子节点数量
    pub fn child_count(&self, role: EdgeRole) -> usize {
        self.children(role).count()
    }
}
