//! 数据图规模摘要
//!
//! 在一次优化过程中固定不变的数据图规模快照

use serde::{Deserialize, Serialize};

/// 子类平均扇出的默认值
pub const DEFAULT_SUBCLASS_FANOUT: f64 = 2.0;

/// 可提供规模统计的数据图
///
/// 由存储层实现；代价模型只在构造摘要时读取一次。
pub trait DataGraphStatistics {
    /// 顶点数量
    fn vertex_count(&self) -> u64;
    /// 边数量
    fn edge_count(&self) -> u64;
    /// 模式中的顶点类型数量
    fn vertex_type_count(&self) -> u64;
    /// 模式中的边类型数量
    fn edge_type_count(&self) -> u64;

    /// 顶点类型的平均子类数量
    fn avg_vertex_subclasses(&self) -> Option<f64> {
        None
    }

    /// 边类型的平均子类数量
    fn avg_edge_subclasses(&self) -> Option<f64> {
        None
    }
}

/// 数据图规模摘要
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphSizeSummary {
    pub vertex_count: u64,
    pub edge_count: u64,
    pub known_vertex_types: u64,
    pub known_edge_types: u64,
    #[serde(default = "default_fanout")]
    pub avg_vertex_subclasses: f64,
    #[serde(default = "default_fanout")]
    pub avg_edge_subclasses: f64,
}

fn default_fanout() -> f64 {
    DEFAULT_SUBCLASS_FANOUT
}

impl GraphSizeSummary {
    /// 从原始数字构造，子类扇出取默认值
    pub fn new(vertex_count: u64, edge_count: u64, known_vertex_types: u64, known_edge_types: u64) -> Self {
        Self {
            vertex_count,
            edge_count,
            known_vertex_types,
            known_edge_types,
            avg_vertex_subclasses: DEFAULT_SUBCLASS_FANOUT,
            avg_edge_subclasses: DEFAULT_SUBCLASS_FANOUT,
        }
    }

    /// 设置子类平均扇出
    pub fn with_subclass_averages(mut self, vertex: f64, edge: f64) -> Self {
        self.avg_vertex_subclasses = vertex.max(0.0);
        self.avg_edge_subclasses = edge.max(0.0);
        self
    }

    /// 读取当前数据图的规模
    pub fn from_graph<G: DataGraphStatistics + ?Sized>(graph: &G) -> Self {
        Self::new(
            graph.vertex_count(),
            graph.edge_count(),
            graph.vertex_type_count(),
            graph.edge_type_count(),
        )
        .with_subclass_averages(
            graph.avg_vertex_subclasses().unwrap_or(DEFAULT_SUBCLASS_FANOUT),
            graph.avg_edge_subclasses().unwrap_or(DEFAULT_SUBCLASS_FANOUT),
        )
    }

    /// 模式中的类型数量（顶点与边类型的平均值，四舍五入）
    pub fn types_in_schema(&self) -> u64 {
        ((self.known_vertex_types + self.known_edge_types) as f64 / 2.0).round() as u64
    }

    /// 子类平均扇出（顶点与边的平均值）
    pub fn avg_subclasses(&self) -> f64 {
        (self.avg_vertex_subclasses + self.avg_edge_subclasses) / 2.0
    }
}

impl Default for GraphSizeSummary {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}
