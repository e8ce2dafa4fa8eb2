//! FIFO 预流推进（push-relabel）最大流。
use std::collections::{BTreeSet, VecDeque};

use crate::graph::digraph::WeightedDigraph;
use crate::graph::ids::VertexId;
use crate::graph::index_vec::Idx;

use super::residual::ResidualNetwork;
use super::{CutResult, FlowError, FlowOptions, FlowSolver, RESIDUAL_EPS};

/// 高度标号 + 顶点盈余的预流策略。终态下汇点累计的盈余即流值；
/// 汇侧取残量可达集的补集再去掉收缩占位顶点。
pub struct PushRelabel;

struct State {
    net: ResidualNetwork,
    height: Vec<usize>,
    excess: Vec<f64>,
    active: VecDeque<usize>,
    queued: Vec<bool>,
}

impl FlowSolver for PushRelabel {
    fn max_flow(
        &self,
        graph: &WeightedDigraph,
        source: VertexId,
        sink: VertexId,
        options: &FlowOptions,
    ) -> Result<CutResult, FlowError> {
        let vertex_count = graph.vertex_count();
        let mut state = State {
            net: ResidualNetwork::build(graph),
            height: vec![0; vertex_count],
            excess: vec![0.0; vertex_count],
            active: VecDeque::new(),
            queued: vec![false; vertex_count],
        };
        let s = source.index();
        let t = sink.index();

        // 初始化：源点高度取 V，源出弧全部饱和
        state.height[s] = vertex_count;
        for arc in state.net.arcs_from(s).to_vec() {
            let amount = state.net.residual(arc);
            if amount > RESIDUAL_EPS {
                let v = state.net.head(arc);
                state.net.push(arc, amount);
                state.excess[s] -= amount;
                state.excess[v] += amount;
            }
        }
        for v in 0..vertex_count {
            if v != s && v != t && state.excess[v] > RESIDUAL_EPS {
                state.enqueue(v);
            }
        }

        let mut rounds: u64 = 0;
        while let Some(u) = state.active.pop_front() {
            state.queued[u] = false;
            if let Some(max) = options.max_rounds {
                if rounds >= max {
                    return Err(FlowError::BudgetExhausted(rounds));
                }
            }
            rounds += 1;
            state.discharge(u, s, t);
        }

        let flow = state.excess[t];
        log::debug!(
            "push-relabel flow {} -> {}: value {flow} after {rounds} discharges",
            source,
            sink
        );

        let reachable = state.net.reachable_from(source);
        let sink_side: BTreeSet<VertexId> = (0..vertex_count)
            .map(VertexId::from_usize)
            .filter(|&v| !reachable[v.index()] && !graph.is_contracted(v))
            .collect();
        Ok(CutResult::new(flow, sink_side))
    }
}

impl State {
    fn enqueue(&mut self, v: usize) {
        if !self.queued[v] {
            self.queued[v] = true;
            self.active.push_back(v);
        }
    }

    /// 推空 u 的盈余：沿可行弧（高度恰好高一层）推流，推不动则重标号。
    fn discharge(&mut self, u: usize, s: usize, t: usize) {
        while self.excess[u] > RESIDUAL_EPS {
            for arc in self.net.arcs_from(u).to_vec() {
                if self.excess[u] <= RESIDUAL_EPS {
                    break;
                }
                let v = self.net.head(arc);
                let residual = self.net.residual(arc);
                if residual > RESIDUAL_EPS && self.height[u] == self.height[v] + 1 {
                    let amount = self.excess[u].min(residual);
                    self.net.push(arc, amount);
                    self.excess[u] -= amount;
                    self.excess[v] += amount;
                    if v != s && v != t && self.excess[v] > RESIDUAL_EPS {
                        self.enqueue(v);
                    }
                }
            }
            if self.excess[u] <= RESIDUAL_EPS {
                return;
            }
            match self.relabel_target(u) {
                Some(min_height) => self.height[u] = min_height + 1,
                // 盈余无处可去，只会发生在与源汇均不连通的部件上
                None => return,
            }
        }
    }

    fn relabel_target(&self, u: usize) -> Option<usize> {
        let mut min_height = None;
        for &arc in self.net.arcs_from(u) {
            if self.net.residual(arc) > RESIDUAL_EPS {
                let h = self.height[self.net.head(arc)];
                min_height = Some(min_height.map_or(h, |m: usize| m.min(h)));
            }
        }
        min_height
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{crossing_capacity, graph_from, vid};
    use super::super::{Algorithm, FlowOptions, max_flow};
    use crate::contract::contract;
    use std::collections::BTreeSet;

    #[test]
    fn matches_known_flow_on_layered_graph() {
        let graph = graph_from(
            6,
            &[
                (0, 1, 16.0),
                (0, 2, 13.0),
                (1, 2, 10.0),
                (2, 1, 4.0),
                (1, 3, 12.0),
                (3, 2, 9.0),
                (2, 4, 14.0),
                (4, 3, 7.0),
                (3, 5, 20.0),
                (4, 5, 4.0),
            ],
        );
        let cut = max_flow(&graph, vid(0), vid(5), Algorithm::PushRelabel, &FlowOptions::default())
            .unwrap();
        assert!((cut.value - 23.0).abs() < 1e-9);
        assert!((cut.value - crossing_capacity(&graph, &cut.sink)).abs() < 1e-9);
    }

    #[test]
    fn reports_min_cut_sink_side() {
        let graph = graph_from(4, &[(0, 1, 10.0), (1, 2, 1.0), (2, 3, 10.0)]);
        let cut = max_flow(&graph, vid(0), vid(3), Algorithm::PushRelabel, &FlowOptions::default())
            .unwrap();
        assert!((cut.value - 1.0).abs() < 1e-9);
        assert_eq!(cut.sink, BTreeSet::from([vid(2), vid(3)]));
    }

    #[test]
    fn contracted_placeholders_are_excluded_from_sink_side() {
        // 顶点 3 带权入度 22 >= (1+10)*2，收缩后成为孤立占位
        let mut graph = graph_from(
            4,
            &[(0, 1, 10.0), (1, 2, 1.0), (1, 3, 10.0), (0, 3, 10.0), (2, 3, 2.0)],
        );
        graph.add_edge(vid(3), vid(2), 1.0).unwrap();
        let contracted = contract(&graph, vid(0), 10.0, 2).unwrap().graph;
        assert!(contracted.is_contracted(vid(3)));

        let cut = max_flow(
            &contracted,
            vid(0),
            vid(2),
            Algorithm::PushRelabel,
            &FlowOptions::default(),
        )
        .unwrap();
        assert!(!cut.sink.contains(&vid(3)));
    }

    #[test]
    fn zero_capacity_edges_carry_no_flow() {
        let graph = graph_from(3, &[(0, 1, 0.0), (1, 2, 5.0)]);
        let cut = max_flow(&graph, vid(0), vid(2), Algorithm::PushRelabel, &FlowOptions::default())
            .unwrap();
        assert_eq!(cut.value, 0.0);
    }
}
