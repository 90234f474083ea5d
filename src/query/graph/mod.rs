//! 查询表示图
//!
//! 解析器产出的有向无环图，节点是类型化的查询构造，边是带角色的结构边。
//! 代价估算只读取图的形状，从不修改它。
//!
//! ## 使用示例
//!
//! ```rust
//! use graphdb_cost::query::graph::{EdgeRole, NodeKind, QueryGraphBuilder};
//!
//! let mut builder = QueryGraphBuilder::new();
//! let vset = builder.add_node(NodeKind::VertexSetExpression);
//! let root = builder.add_node(NodeKind::QueryRoot);
//! builder.connect(root, EdgeRole::IsQueryExprOf, vset);
//! let graph = builder.build(root).expect("查询图构建失败");
//! assert_eq!(graph.len(), 2);
//! ```

pub mod builder;
pub mod node;

pub use builder::{EdgeDocument, NodeDocument, QueryGraphBuilder, QueryGraphDocument};
pub use node::{
    EdgeRole, LiteralValue, NodeFamily, NodeId, NodeKind, PathDirection, Quantifier, QueryNode,
    StructuralEdge,
};

/// 查询表示图
///
/// 节点按 `NodeId` 稠密存放；构建时已校验无环并计算好拓扑序与父节点索引。
#[derive(Debug, Clone)]
pub struct QueryGraph {
    nodes: Vec<QueryNode>,
    parents: Vec<Vec<StructuralEdge>>,
    topological_order: Vec<NodeId>,
    root: NodeId,
}

impl QueryGraph {
    pub(crate) fn from_parts(
        nodes: Vec<QueryNode>,
        parents: Vec<Vec<StructuralEdge>>,
        topological_order: Vec<NodeId>,
        root: NodeId,
    ) -> Self {
        Self {
            nodes,
            parents,
            topological_order,
            root,
        }
    }

    /// 从 JSON 文档构建查询图
    pub fn from_json(json: &str) -> crate::core::error::CostResult<Self> {
        let document: QueryGraphDocument = serde_json::from_str(json)
            .map_err(|e| crate::core::error::CostError::InvalidQueryGraph(e.to_string()))?;
        document.into_graph()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&QueryNode> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[QueryNode] {
        &self.nodes
    }

    /// 指向该节点的结构边，`target` 为父节点
    pub fn parents(&self, id: NodeId) -> &[StructuralEdge] {
        self.parents.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 子节点先于父节点的拓扑序
    pub fn topological_order(&self) -> &[NodeId] {
        &self.topological_order
    }
}
