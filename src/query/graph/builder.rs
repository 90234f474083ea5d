//! 查询图构建器
//!
//! 节点在加入时获得稠密索引；`build` 校验边的目标、根节点以及无环性，
//! 并计算拓扑序。

use serde::{Deserialize, Serialize};

use crate::core::error::{CostError, CostResult};

use super::node::{EdgeRole, NodeId, NodeKind, QueryNode, StructuralEdge};
use super::QueryGraph;

/// 查询图构建器
#[derive(Debug, Default)]
pub struct QueryGraphBuilder {
    nodes: Vec<QueryNode>,
    dangling_parent: Option<NodeId>,
}

impl QueryGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一个节点并返回其索引
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(QueryNode::new(id, kind));
        id
    }

    /// 加入一个节点并同时连接其子节点
    pub fn add_with(&mut self, kind: NodeKind, children: &[(EdgeRole, NodeId)]) -> NodeId {
        let id = self.add_node(kind);
        for (role, child) in children {
            self.connect(id, *role, *child);
        }
        id
    }

    /// 添加一条从 `parent` 指向 `child` 的结构边
    ///
    /// 目标节点的合法性在 `build` 时统一校验。
    pub fn connect(&mut self, parent: NodeId, role: EdgeRole, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.push_edge(role, child);
        } else if self.dangling_parent.is_none() {
            self.dangling_parent = Some(parent);
        }
    }

    /// 校验并生成查询图
    pub fn build(self, root: NodeId) -> CostResult<QueryGraph> {
        if let Some(parent) = self.dangling_parent {
            return Err(CostError::UnknownNode(parent));
        }
        let len = self.nodes.len();
        if root.index() >= len {
            return Err(CostError::UnknownNode(root));
        }

        let mut parents: Vec<Vec<StructuralEdge>> = vec![Vec::new(); len];
        for node in &self.nodes {
            for edge in node.edges() {
                if edge.target.index() >= len {
                    return Err(CostError::UnknownNode(edge.target));
                }
                parents[edge.target.index()].push(StructuralEdge {
                    role: edge.role,
                    target: node.id(),
                });
            }
        }

        let order = topological_order(&self.nodes)?;
        Ok(QueryGraph::from_parts(self.nodes, parents, order, root))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// 后序深度优先遍历，子节点先于父节点输出
fn topological_order(nodes: &[QueryNode]) -> CostResult<Vec<NodeId>> {
    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::InProgress;
        stack.push((start, 0));

        while let Some((current, next_edge)) = stack.pop() {
            let edges = nodes[current].edges();
            if next_edge < edges.len() {
                stack.push((current, next_edge + 1));
                let child = edges[next_edge].target.index();
                match marks[child] {
                    Mark::Unvisited => {
                        marks[child] = Mark::InProgress;
                        stack.push((child, 0));
                    }
                    Mark::InProgress => return Err(CostError::CyclicQueryGraph(NodeId::new(child))),
                    Mark::Done => {}
                }
            } else {
                marks[current] = Mark::Done;
                order.push(NodeId::new(current));
            }
        }
    }

    Ok(order)
}

/// 查询图的 JSON 文档形式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryGraphDocument {
    /// 根节点在 `nodes` 中的下标
    pub root: usize,
    pub nodes: Vec<NodeDocument>,
}

/// 文档中的节点，下标即节点索引
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDocument {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

/// 文档中的结构边
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub role: EdgeRole,
    pub target: usize,
}

impl QueryGraphDocument {
    /// 下标越界（包括超出 32 位节点编号）的根或边目标在转换前被拒绝
    pub fn into_graph(self) -> CostResult<QueryGraph> {
        let node_count = self.nodes.len();
        let index = |value: usize, what: &str| -> CostResult<NodeId> {
            if value >= node_count {
                return Err(CostError::InvalidQueryGraph(format!(
                    "{} 下标 {} 超出节点数 {}",
                    what, value, node_count
                )));
            }
            Ok(NodeId::new(value))
        };
        let root = index(self.root, "根节点")?;

        let mut builder = QueryGraphBuilder::new();
        let ids: Vec<NodeId> = self
            .nodes
            .iter()
            .map(|n| builder.add_node(n.kind.clone()))
            .collect();
        for (id, node) in ids.iter().zip(&self.nodes) {
            for edge in &node.edges {
                builder.connect(*id, edge.role, index(edge.target, "边目标")?);
            }
        }
        builder.build(root)
    }
}
