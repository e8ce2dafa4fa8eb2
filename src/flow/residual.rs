//! 残量网络：按索引寻址的弧仓库，正反向槽位成对存放（`arc ^ 1`）。
//!
//! 每次最大流调用都从输入图新建一份，调用结束即丢弃；输入图本身
//! 从不被修改。自环不会进入网络。
use smallvec::SmallVec;

use crate::graph::digraph::WeightedDigraph;
use crate::graph::ids::VertexId;
use crate::graph::index_vec::Idx;

use super::RESIDUAL_EPS;

#[derive(Debug, Clone, Copy)]
struct ResidualArc {
    to: u32,
    /// 剩余可推送量，推流时与配对反向弧此消彼长。
    residual: f64,
}

#[derive(Debug)]
pub(crate) struct ResidualNetwork {
    vertex_count: usize,
    arcs: Vec<ResidualArc>,
    out: Vec<SmallVec<[u32; 4]>>,
}

impl ResidualNetwork {
    /// 正向弧取边权为初始残量，反向弧取 0。
    pub(crate) fn build(graph: &WeightedDigraph) -> Self {
        let vertex_count = graph.vertex_count();
        let mut net = Self {
            vertex_count,
            arcs: Vec::with_capacity(graph.edge_count() * 2),
            out: vec![SmallVec::new(); vertex_count],
        };
        for edge in graph.edges() {
            if edge.from == edge.to {
                continue;
            }
            let forward = net.arcs.len() as u32;
            net.arcs.push(ResidualArc {
                to: edge.to.raw(),
                residual: edge.weight,
            });
            net.arcs.push(ResidualArc {
                to: edge.from.raw(),
                residual: 0.0,
            });
            net.out[edge.from.index()].push(forward);
            net.out[edge.to.index()].push(forward ^ 1);
        }
        net
    }

    pub(crate) fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub(crate) fn arcs_from(&self, v: usize) -> &[u32] {
        &self.out[v]
    }

    pub(crate) fn head(&self, arc: u32) -> usize {
        self.arcs[arc as usize].to as usize
    }

    pub(crate) fn tail(&self, arc: u32) -> usize {
        self.head(arc ^ 1)
    }

    pub(crate) fn residual(&self, arc: u32) -> f64 {
        self.arcs[arc as usize].residual
    }

    /// Pushes `amount` along `arc`, crediting the paired reverse slot.
    pub(crate) fn push(&mut self, arc: u32, amount: f64) {
        self.arcs[arc as usize].residual -= amount;
        self.arcs[(arc ^ 1) as usize].residual += amount;
    }

    /// 终态下沿残量为正的弧自 `source` 可达的顶点集，显式栈遍历。
    pub(crate) fn reachable_from(&self, source: VertexId) -> Vec<bool> {
        let mut reachable = vec![false; self.vertex_count];
        let mut stack = vec![source.index()];
        reachable[source.index()] = true;
        while let Some(v) = stack.pop() {
            for &arc in &self.out[v] {
                let w = self.head(arc);
                if self.residual(arc) > RESIDUAL_EPS && !reachable[w] {
                    reachable[w] = true;
                    stack.push(w);
                }
            }
        }
        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vid(v: usize) -> VertexId {
        VertexId::from_usize(v)
    }

    #[test]
    fn build_pairs_forward_and_reverse_slots() {
        let mut g = WeightedDigraph::new(3);
        g.add_edge(vid(0), vid(1), 4.0).unwrap();
        g.add_edge(vid(1), vid(2), 2.0).unwrap();
        let net = ResidualNetwork::build(&g);

        assert_eq!(net.arcs.len(), 4);
        assert_eq!(net.head(0), 1);
        assert_eq!(net.tail(0), 0);
        assert_eq!(net.residual(0), 4.0);
        assert_eq!(net.residual(1), 0.0);
    }

    #[test]
    fn build_skips_self_loops() {
        let mut g = WeightedDigraph::new(2);
        g.add_edge(vid(0), vid(0), 3.0).unwrap();
        g.add_edge(vid(0), vid(1), 1.0).unwrap();
        let net = ResidualNetwork::build(&g);
        assert_eq!(net.arcs.len(), 2);
    }

    #[test]
    fn push_moves_residual_to_reverse_slot() {
        let mut g = WeightedDigraph::new(2);
        g.add_edge(vid(0), vid(1), 4.0).unwrap();
        let mut net = ResidualNetwork::build(&g);
        net.push(0, 2.5);
        assert_eq!(net.residual(0), 1.5);
        assert_eq!(net.residual(1), 2.5);
    }

    #[test]
    fn reachability_follows_positive_residuals_only() {
        let mut g = WeightedDigraph::new(3);
        g.add_edge(vid(0), vid(1), 1.0).unwrap();
        g.add_edge(vid(1), vid(2), 1.0).unwrap();
        let mut net = ResidualNetwork::build(&g);
        net.push(0, 1.0);

        let reachable = net.reachable_from(vid(0));
        assert!(reachable[0]);
        assert!(!reachable[1]);
        assert!(!reachable[2]);
    }
}
