//! 带权有向图核心结构：边仓库、邻接表与入度缓存。
//!
//! 顶点以 `[0, V)` 区间内的整数标识，边允许平行边与自环（收缩后的
//! 自环由收缩步骤负责剔除）。每个顶点缓存入度与带权入度，
//! `add_edge` 时增量维护，收缩阈值判定因此为 O(1)。
use std::fmt;

use petgraph::Graph;
use petgraph::dot::{Config, Dot};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::graph::ids::{EdgeId, VertexId};
use crate::graph::index_vec::{Idx, IndexVec};

type AdjRow = SmallVec<[EdgeId; 4]>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {vertex} is not between 0 and {}", .bound.saturating_sub(1))]
    VertexOutOfRange { vertex: usize, bound: usize },
    #[error("edge weight is NaN")]
    NanWeight,
    #[error("edge weight {0} is negative")]
    NegativeWeight(f64),
}

/// 有向边，权值即流算法中的容量。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedDigraph {
    edges: IndexVec<EdgeId, Edge>,
    adj: IndexVec<VertexId, AdjRow>,
    indegree: IndexVec<VertexId, u32>,
    weighted_indegree: IndexVec<VertexId, f64>,
    /// 此前收缩步骤合并进根的顶点，原始图为空集。
    contracted: FxHashSet<VertexId>,
}

impl WeightedDigraph {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: IndexVec::new(),
            adj: IndexVec::from_elem(AdjRow::new(), vertex_count),
            indegree: IndexVec::from_elem(0, vertex_count),
            weighted_indegree: IndexVec::from_elem(0.0, vertex_count),
            contracted: FxHashSet::default(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn validate_vertex(&self, v: VertexId) -> Result<(), GraphError> {
        if v.index() >= self.vertex_count() {
            return Err(GraphError::VertexOutOfRange {
                vertex: v.index(),
                bound: self.vertex_count(),
            });
        }
        Ok(())
    }

    /// Appends a directed edge and updates the cached degrees of `to`.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> Result<EdgeId, GraphError> {
        self.validate_vertex(from)?;
        self.validate_vertex(to)?;
        if weight.is_nan() {
            return Err(GraphError::NanWeight);
        }
        if weight < 0.0 {
            return Err(GraphError::NegativeWeight(weight));
        }
        let id = self.edges.push(Edge { from, to, weight });
        self.adj[from].push(id);
        self.indegree[to] += 1;
        self.weighted_indegree[to] += weight;
        Ok(id)
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    /// Outgoing edges of `v`, in insertion order.
    pub fn adjacency(&self, v: VertexId) -> impl Iterator<Item = &Edge> {
        self.adj[v].iter().map(|id| &self.edges[*id])
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + use<> {
        (0..self.vertex_count()).map(VertexId::from_usize)
    }

    pub fn indegree(&self, v: VertexId) -> usize {
        self.indegree[v] as usize
    }

    pub fn weighted_indegree(&self, v: VertexId) -> f64 {
        self.weighted_indegree[v]
    }

    pub fn outdegree(&self, v: VertexId) -> usize {
        self.adj[v].len()
    }

    /// 全部边权的上界 U，空图返回 0。O(E) 扫描。
    pub fn max_edge_weight(&self) -> f64 {
        self.edges
            .iter()
            .fold(0.0_f64, |acc, e| if e.weight > acc { e.weight } else { acc })
    }

    pub fn contracted_vertices(&self) -> &FxHashSet<VertexId> {
        &self.contracted
    }

    pub fn is_contracted(&self, v: VertexId) -> bool {
        self.contracted.contains(&v)
    }

    /// 未被合并进根的顶点数（含根自身）。
    pub fn live_vertex_count(&self) -> usize {
        self.vertex_count() - self.contracted.len()
    }

    pub(crate) fn mark_contracted(&mut self, vertices: impl IntoIterator<Item = VertexId>) {
        self.contracted.extend(vertices);
    }

    /// Graphviz dot dump of the adjacency structure, weights as edge labels.
    pub fn to_dot(&self) -> String {
        let mut g: Graph<usize, f64> = Graph::new();
        let nodes: Vec<_> = (0..self.vertex_count()).map(|v| g.add_node(v)).collect();
        for e in self.edges.iter() {
            g.add_edge(nodes[e.from.index()], nodes[e.to.index()], e.weight);
        }
        format!("{:?}", Dot::with_config(&g, &[Config::GraphContentOnly]))
    }
}

impl fmt::Display for WeightedDigraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Number of Vertices: {}, Number of Edges: {}",
            self.vertex_count(),
            self.edge_count()
        )?;
        for v in self.vertices() {
            write!(f, "{}:", v)?;
            for e in self.adjacency(v) {
                write!(f, " {}->{} {:.2}", e.from, e.to, e.weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_updates_cached_degrees() {
        let mut g = WeightedDigraph::new(3);
        g.add_edge(VertexId::new(0), VertexId::new(2), 1.5).unwrap();
        g.add_edge(VertexId::new(1), VertexId::new(2), 2.0).unwrap();

        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.indegree(VertexId::new(2)), 2);
        assert_eq!(g.weighted_indegree(VertexId::new(2)), 3.5);
        assert_eq!(g.indegree(VertexId::new(0)), 0);
        assert_eq!(g.outdegree(VertexId::new(0)), 1);
    }

    #[test]
    fn add_edge_rejects_out_of_range_endpoint() {
        let mut g = WeightedDigraph::new(2);
        let err = g.add_edge(VertexId::new(0), VertexId::new(2), 1.0).unwrap_err();
        assert!(matches!(err, GraphError::VertexOutOfRange { vertex: 2, bound: 2 }));
    }

    #[test]
    fn add_edge_rejects_nan_and_negative_weight() {
        let mut g = WeightedDigraph::new(2);
        assert!(matches!(
            g.add_edge(VertexId::new(0), VertexId::new(1), f64::NAN),
            Err(GraphError::NanWeight)
        ));
        assert!(matches!(
            g.add_edge(VertexId::new(0), VertexId::new(1), -0.5),
            Err(GraphError::NegativeWeight(_))
        ));
    }

    #[test]
    fn adjacency_preserves_insertion_order() {
        let mut g = WeightedDigraph::new(4);
        g.add_edge(VertexId::new(0), VertexId::new(3), 1.0).unwrap();
        g.add_edge(VertexId::new(0), VertexId::new(1), 2.0).unwrap();
        g.add_edge(VertexId::new(0), VertexId::new(2), 3.0).unwrap();

        let order: Vec<u32> = g.adjacency(VertexId::new(0)).map(|e| e.to.raw()).collect();
        assert_eq!(order, vec![3, 1, 2]);
    }

    #[test]
    fn self_loops_and_parallel_edges_are_permitted_on_raw_graphs() {
        let mut g = WeightedDigraph::new(2);
        g.add_edge(VertexId::new(0), VertexId::new(0), 1.0).unwrap();
        g.add_edge(VertexId::new(0), VertexId::new(1), 2.0).unwrap();
        g.add_edge(VertexId::new(0), VertexId::new(1), 3.0).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.weighted_indegree(VertexId::new(1)), 5.0);
    }

    #[test]
    fn max_edge_weight_scans_all_edges() {
        let mut g = WeightedDigraph::new(3);
        assert_eq!(g.max_edge_weight(), 0.0);
        g.add_edge(VertexId::new(0), VertexId::new(1), 2.5).unwrap();
        g.add_edge(VertexId::new(1), VertexId::new(2), 7.25).unwrap();
        g.add_edge(VertexId::new(2), VertexId::new(0), 4.0).unwrap();
        assert_eq!(g.max_edge_weight(), 7.25);
    }

    #[test]
    fn zero_weight_edges_are_accepted() {
        let mut g = WeightedDigraph::new(2);
        g.add_edge(VertexId::new(0), VertexId::new(1), 0.0).unwrap();
        assert_eq!(g.weighted_indegree(VertexId::new(1)), 0.0);
        assert_eq!(g.indegree(VertexId::new(1)), 1);
    }
}
