//! 有根稀疏化：把高带权入度顶点合并进根，约束后续割搜索空间。
//!
//! 阈值取 `T = (1 + U)·k`。带权入度达到 T 的非根顶点不可能落在
//! 权值小于 `k·U` 的小割的汇侧，于是把它的所有关联边端点改写为根：
//! 改写后端点重合的边（自环）丢弃，落在同一 `(from, to)` 键上的边
//! 合并为一条、权值求和。
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use crate::graph::digraph::{GraphError, WeightedDigraph};
use crate::graph::ids::VertexId;

/// 收缩产物：输出图（其 `contracted` 集已填充）加上合并轨迹。
#[derive(Debug, Clone)]
pub struct ContractionResult {
    pub graph: WeightedDigraph,
    /// 本次被合并进根的顶点，按编号升序。
    pub merged: Vec<VertexId>,
    pub threshold: f64,
}

/// Rebuilds `graph` with every vertex of weighted indegree >= `(1 + u_bound) * k`
/// (other than `root`) remapped onto the root.
///
/// The output keeps the input's vertex count; merged vertices remain as
/// isolated placeholder ids and are recorded in the output's contracted set,
/// together with any set inherited from an earlier contraction. When no
/// vertex meets the threshold the output is an edge-isomorphic copy.
pub fn contract(
    graph: &WeightedDigraph,
    root: VertexId,
    u_bound: f64,
    k: usize,
) -> Result<ContractionResult, GraphError> {
    graph.validate_vertex(root)?;
    let threshold = (1.0 + u_bound) * k as f64;

    let mut merged: Vec<VertexId> = Vec::new();
    let mut high_indegree: FxHashSet<VertexId> = FxHashSet::default();
    for v in graph.vertices() {
        if v != root && graph.weighted_indegree(v) >= threshold {
            merged.push(v);
            high_indegree.insert(v);
        }
    }
    log::debug!(
        "contracting {} of {} vertices at threshold {threshold} (root {root})",
        merged.len(),
        graph.vertex_count()
    );

    // 端点改写后的去重合并表；插入序迭代保证输出边序确定
    let mut combined: IndexMap<(VertexId, VertexId), f64> = IndexMap::new();
    for v in graph.vertices() {
        for edge in graph.adjacency(v) {
            let from = if high_indegree.contains(&edge.from) { root } else { edge.from };
            let to = if high_indegree.contains(&edge.to) { root } else { edge.to };
            if from == to {
                continue;
            }
            *combined.entry((from, to)).or_insert(0.0) += edge.weight;
        }
    }

    let mut out = WeightedDigraph::new(graph.vertex_count());
    for ((from, to), weight) in combined {
        out.add_edge(from, to, weight)?;
    }
    out.mark_contracted(graph.contracted_vertices().iter().copied());
    out.mark_contracted(merged.iter().copied());

    Ok(ContractionResult {
        graph: out,
        merged,
        threshold,
    })
}
