//! 节点句柄与求值器注册表
//!
//! 注册表对应一次优化过程：绑定查询图、当前代价模型与数据图规模摘要，
//! 并为每个节点持有代价三元组、基数和选择性的记忆化单元（按 `NodeId` 稠密索引）。
//! 这些单元是整个代价估算子系统中唯一的可变状态。
//!
//! 句柄是 `(注册表, 节点)` 的轻量视图，提供：
//! - 按角色导航到子节点的句柄
//! - 计算或读取代价三元组
//! - 基数与选择性估算（首次请求时转发给当前代价模型）
//! - 变量组合数（与代价模型无关的结构计数）
//!
//! 共享子表达式被多个父节点请求时只计算一次。

use std::cell::Cell;
use std::collections::BTreeSet;

use crate::core::error::{CostError, CostResult};
use crate::core::murmur::{murmurhash64a, SIGNATURE_SEED};
use crate::query::graph::{EdgeRole, NodeId, NodeKind, QueryGraph, QueryNode};
use crate::query::optimizer::stats::GraphSizeSummary;

use super::estimate::CostTriple;
use super::model::CostModel;

/// 求值器注册表
///
/// 单线程使用；每次优化过程各自创建，缓存不会跨过程共享。
#[derive(Debug)]
pub struct EvaluatorRegistry<'a> {
    graph: &'a QueryGraph,
    model: &'a dyn CostModel,
    summary: GraphSizeSummary,
    costs: Vec<Cell<Option<CostTriple>>>,
    cardinalities: Vec<Cell<Option<u64>>>,
    selectivities: Vec<Cell<Option<f64>>>,
    free_variables: Vec<Vec<NodeId>>,
    logging_names: Vec<String>,
}

impl<'a> EvaluatorRegistry<'a> {
    /// 为一次优化过程创建注册表
    pub fn new(graph: &'a QueryGraph, model: &'a dyn CostModel, summary: GraphSizeSummary) -> Self {
        let free_variables = free_variables(graph);
        let logging_names = logging_names(graph);
        Self {
            graph,
            model,
            summary,
            costs: vec![Cell::new(None); graph.len()],
            cardinalities: vec![Cell::new(None); graph.len()],
            selectivities: vec![Cell::new(None); graph.len()],
            free_variables,
            logging_names,
        }
    }

    pub fn graph(&self) -> &'a QueryGraph {
        self.graph
    }

    pub fn model(&self) -> &'a dyn CostModel {
        self.model
    }

    pub fn summary(&self) -> &GraphSizeSummary {
        &self.summary
    }

    /// 获取节点句柄
    pub fn handle(&self, id: NodeId) -> Option<NodeHandle<'_>> {
        self.graph.node(id).map(|_| NodeHandle { registry: self, id })
    }

    /// 根节点句柄
    pub fn root(&self) -> NodeHandle<'_> {
        NodeHandle {
            registry: self,
            id: self.graph.root(),
        }
    }

    /// 节点已缓存的代价三元组
    pub fn cached(&self, id: NodeId) -> Option<CostTriple> {
        self.costs.get(id.index()).and_then(Cell::get)
    }

    /// 节点的日志名称
    pub fn logging_name(&self, id: NodeId) -> Option<&str> {
        self.logging_names.get(id.index()).map(String::as_str)
    }

    /// 按拓扑序（子节点优先）为所有节点计算代价，返回根节点的代价
    ///
    /// 递归深度因此被限制在一层，适合很深的查询。
    pub fn estimate_all(&self) -> CostResult<CostTriple> {
        for id in self.graph.topological_order() {
            let handle = NodeHandle { registry: self, id: *id };
            handle.costs()?;
        }
        self.root().costs()
    }
}

/// 节点句柄
#[derive(Debug, Clone, Copy)]
pub struct NodeHandle<'a> {
    registry: &'a EvaluatorRegistry<'a>,
    id: NodeId,
}

impl<'a> NodeHandle<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a QueryNode {
        &self.registry.graph.nodes()[self.id.index()]
    }

    pub fn kind(&self) -> &'a NodeKind {
        self.node().kind()
    }

    pub fn summary(&self) -> &'a GraphSizeSummary {
        &self.registry.summary
    }

    /// 稳定的日志名称，结构相同的查询片段共享同一名称
    pub fn logging_name(&self) -> &'a str {
        &self.registry.logging_names[self.id.index()]
    }

    fn at(&self, id: NodeId) -> NodeHandle<'a> {
        NodeHandle {
            registry: self.registry,
            id,
        }
    }

    /// 指定角色的第一个子节点
    pub fn child(&self, role: EdgeRole) -> Option<NodeHandle<'a>> {
        self.node().children(role).next().map(|id| self.at(id))
    }

    /// 指定角色的子节点，缺失时报告结构错误
    pub fn required_child(&self, role: EdgeRole) -> CostResult<NodeHandle<'a>> {
        self.child(role).ok_or(CostError::MissingStructuralEdge {
            node: self.id,
            role,
        })
    }

    /// 指定角色的所有子节点
    pub fn children(&self, role: EdgeRole) -> impl Iterator<Item = NodeHandle<'a>> + 'a {
        let this = *self;
        self.node().children(role).map(move |id| this.at(id))
    }

    /// 所有结构子节点及其角色
    pub fn all_children(&self) -> impl Iterator<Item = (EdgeRole, NodeHandle<'a>)> + 'a {
        let this = *self;
        self.node()
            .edges()
            .iter()
            .map(move |e| (e.role, this.at(e.target)))
    }

    pub fn child_count(&self, role: EdgeRole) -> usize {
        self.node().child_count(role)
    }

    /// 计算或读取代价三元组
    pub fn costs(&self) -> CostResult<CostTriple> {
        let cell = &self.registry.costs[self.id.index()];
        if let Some(triple) = cell.get() {
            return Ok(triple);
        }
        let triple = self.registry.model.cost(self, &self.registry.summary)?;
        log::debug!(
            "节点 {} ({}) 代价: own={} iterated={} subtree={}",
            self.id,
            self.kind().name(),
            triple.own_cost,
            triple.iterated_cost,
            triple.subtree_cost
        );
        cell.set(Some(triple));
        Ok(triple)
    }

    pub fn own_cost(&self) -> CostResult<u64> {
        Ok(self.costs()?.own_cost)
    }

    pub fn iterated_cost(&self) -> CostResult<u64> {
        Ok(self.costs()?.iterated_cost)
    }

    pub fn subtree_cost(&self) -> CostResult<u64> {
        Ok(self.costs()?.subtree_cost)
    }

    /// 所有结构子节点的子树代价之和
    pub fn children_subtree_cost(&self) -> CostResult<u64> {
        self.all_children()
            .try_fold(0u64, |acc, (_, child)| Ok(acc.saturating_add(child.subtree_cost()?)))
    }

    /// 估算结果规模
    pub fn estimated_cardinality(&self) -> CostResult<u64> {
        let cell = &self.registry.cardinalities[self.id.index()];
        if let Some(cardinality) = cell.get() {
            return Ok(cardinality);
        }
        let cardinality = self.registry.model.cardinality(self, &self.registry.summary)?;
        cell.set(Some(cardinality));
        Ok(cardinality)
    }

    /// 估算选择性，结果总是位于 [0, 1]
    pub fn estimated_selectivity(&self) -> CostResult<f64> {
        let cell = &self.registry.selectivities[self.id.index()];
        if let Some(selectivity) = cell.get() {
            return Ok(selectivity);
        }
        let selectivity = self.registry.model.selectivity(self, &self.registry.summary)?;
        let selectivity = if selectivity.is_nan() {
            1.0
        } else {
            selectivity.clamp(0.0, 1.0)
        };
        cell.set(Some(selectivity));
        Ok(selectivity)
    }

    /// 在该节点的子树中自由出现的变量
    pub fn free_variables(&self) -> &'a [NodeId] {
        &self.registry.free_variables[self.id.index()]
    }

    /// 节点被重复求值的次数：所有自由变量取值域大小的乘积
    pub fn variable_combinations(&self) -> CostResult<u64> {
        self.free_variables()
            .iter()
            .try_fold(1u64, |acc, var| Ok(acc.saturating_mul(self.at(*var).variable_domain()?)))
    }

    /// 变量的取值域大小
    ///
    /// 由简单声明引入的变量取其类型表达式的基数；由定义或外部绑定引入的变量为 1。
    fn variable_domain(&self) -> CostResult<u64> {
        let declaring = self
            .registry
            .graph
            .parents(self.id)
            .iter()
            .find(|e| e.role == EdgeRole::IsDeclaredVarOf);
        match declaring {
            Some(edge) => self
                .at(edge.target)
                .required_child(EdgeRole::IsTypeExprOf)?
                .estimated_cardinality(),
            None => Ok(1),
        }
    }

    /// 声明类节点定义的变量组合数
    pub fn defined_variable_combinations(&self) -> CostResult<u64> {
        match self.kind() {
            NodeKind::SimpleDeclaration => {
                let domain = self
                    .required_child(EdgeRole::IsTypeExprOf)?
                    .estimated_cardinality()?;
                let vars = self.child_count(EdgeRole::IsDeclaredVarOf) as u32;
                Ok(domain.checked_pow(vars).unwrap_or(u64::MAX))
            }
            NodeKind::Declaration => self
                .children(EdgeRole::IsSimpleDeclOf)
                .try_fold(1u64, |acc, simple| {
                    Ok(acc.saturating_mul(simple.defined_variable_combinations()?))
                }),
            NodeKind::SetComprehension
            | NodeKind::BagComprehension
            | NodeKind::TableComprehension => self
                .required_child(EdgeRole::IsCompDeclOf)?
                .defined_variable_combinations(),
            NodeKind::QuantifiedExpression { .. } => self
                .required_child(EdgeRole::IsQuantifiedDeclOf)?
                .defined_variable_combinations(),
            _ => Ok(1),
        }
    }
}

/// 沿拓扑序计算每个节点的自由变量
///
/// free(n) = (∪ free(子节点) ∪ {n，若 n 为变量}) − bound(n)，
/// bound(n) 为 n 的子树中被声明或定义的所有变量。
fn free_variables(graph: &QueryGraph) -> Vec<Vec<NodeId>> {
    let mut free: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); graph.len()];
    let mut bound: Vec<BTreeSet<NodeId>> = vec![BTreeSet::new(); graph.len()];

    for id in graph.topological_order() {
        let node = &graph.nodes()[id.index()];
        let mut node_free = BTreeSet::new();
        let mut node_bound = BTreeSet::new();

        if matches!(node.kind(), NodeKind::Variable { .. }) {
            node_free.insert(*id);
        }
        for edge in node.edges() {
            let child = edge.target.index();
            if edge.role.binds_variable() {
                node_bound.insert(edge.target);
            } else {
                node_free.extend(free[child].iter().copied());
            }
            node_bound.extend(bound[child].iter().copied());
        }
        node_free.retain(|v| !node_bound.contains(v));

        free[id.index()] = node_free;
        bound[id.index()] = node_bound;
    }

    free.into_iter().map(|s| s.into_iter().collect()).collect()
}

/// 沿拓扑序计算日志名称：类型名 + 结构签名的哈希
fn logging_names(graph: &QueryGraph) -> Vec<String> {
    let mut hashes = vec![0u64; graph.len()];
    let mut names = vec![String::new(); graph.len()];

    for id in graph.topological_order() {
        let node = &graph.nodes()[id.index()];
        let mut signature = String::from(node.kind().name());
        if let Some(payload) = node.kind().signature_payload() {
            signature.push('[');
            signature.push_str(&payload);
            signature.push(']');
        }
        for edge in node.edges() {
            signature.push_str(&format!(
                "|{}:{:016x}",
                edge.role.as_str(),
                hashes[edge.target.index()]
            ));
        }
        let hash = murmurhash64a(signature.as_bytes(), SIGNATURE_SEED);
        hashes[id.index()] = hash;
        names[id.index()] = format!("{}#{:016x}", node.kind().name(), hash);
    }

    names
}
