//! Edmonds–Karp 增广路最大流。
use std::collections::{BTreeSet, VecDeque};

use crate::graph::digraph::WeightedDigraph;
use crate::graph::ids::VertexId;
use crate::graph::index_vec::Idx;

use super::residual::ResidualNetwork;
use super::{CutResult, FlowError, FlowOptions, FlowSolver, RESIDUAL_EPS};

/// BFS 最短增广路策略（按边数最短）。
pub struct AugmentingPath;

impl FlowSolver for AugmentingPath {
    fn max_flow(
        &self,
        graph: &WeightedDigraph,
        source: VertexId,
        sink: VertexId,
        options: &FlowOptions,
    ) -> Result<CutResult, FlowError> {
        let mut net = ResidualNetwork::build(graph);
        let mut parent_arc = vec![u32::MAX; net.vertex_count()];
        let mut flow = 0.0;
        let mut rounds: u64 = 0;

        while bfs(&net, source.index(), sink.index(), &mut parent_arc) {
            if let Some(max) = options.max_rounds {
                if rounds >= max {
                    return Err(FlowError::BudgetExhausted(rounds));
                }
            }

            // 自汇点回溯求瓶颈容量
            let mut bottleneck = f64::INFINITY;
            let mut v = sink.index();
            while v != source.index() {
                let arc = parent_arc[v];
                bottleneck = bottleneck.min(net.residual(arc));
                v = net.tail(arc);
            }

            let mut v = sink.index();
            while v != source.index() {
                let arc = parent_arc[v];
                net.push(arc, bottleneck);
                v = net.tail(arc);
            }

            flow += bottleneck;
            rounds += 1;
        }

        log::debug!(
            "augmenting-path flow {} -> {}: value {flow} after {rounds} augmentations",
            source,
            sink
        );

        let reachable = net.reachable_from(source);
        let sink_side: BTreeSet<VertexId> = (0..net.vertex_count())
            .filter(|&v| !reachable[v])
            .map(VertexId::from_usize)
            .collect();
        Ok(CutResult::new(flow, sink_side))
    }
}

/// 残量图上按边数的最短路搜索，`parent_arc[v]` 记录进入 v 的弧。
fn bfs(net: &ResidualNetwork, source: usize, sink: usize, parent_arc: &mut [u32]) -> bool {
    let mut visited = vec![false; net.vertex_count()];
    let mut queue = VecDeque::new();
    queue.push_back(source);
    visited[source] = true;

    while let Some(u) = queue.pop_front() {
        for &arc in net.arcs_from(u) {
            let v = net.head(arc);
            if !visited[v] && net.residual(arc) > RESIDUAL_EPS {
                visited[v] = true;
                parent_arc[v] = arc;
                queue.push_back(v);
            }
        }
    }

    visited[sink]
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{crossing_capacity, graph_from, vid};
    use super::super::{Algorithm, FlowOptions, max_flow};
    use std::collections::BTreeSet;

    #[test]
    fn finds_shortest_path_flow_on_parallel_routes() {
        let graph = graph_from(4, &[(0, 1, 10.0), (0, 2, 5.0), (1, 3, 10.0), (2, 3, 5.0)]);
        let cut = max_flow(&graph, vid(0), vid(3), Algorithm::AugmentingPath, &FlowOptions::default())
            .unwrap();
        assert!((cut.value - 15.0).abs() < 1e-9);
        assert_eq!(cut.sink, BTreeSet::from([vid(3)]));
    }

    #[test]
    fn uses_reverse_arcs_to_reroute() {
        // 经典回推用例：先走 0->1->3 的话必须经反向弧改道
        let graph = graph_from(
            4,
            &[(0, 1, 1.0), (0, 2, 1.0), (1, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)],
        );
        let cut = max_flow(&graph, vid(0), vid(3), Algorithm::AugmentingPath, &FlowOptions::default())
            .unwrap();
        assert!((cut.value - 2.0).abs() < 1e-9);
        assert!((cut.value - crossing_capacity(&graph, &cut.sink)).abs() < 1e-9);
    }

    #[test]
    fn disconnected_sink_reports_zero_flow() {
        let graph = graph_from(4, &[(0, 1, 2.0), (3, 2, 2.0)]);
        let cut = max_flow(&graph, vid(0), vid(2), Algorithm::AugmentingPath, &FlowOptions::default())
            .unwrap();
        assert_eq!(cut.value, 0.0);
        assert_eq!(cut.sink, BTreeSet::from([vid(2), vid(3)]));
    }

    #[test]
    fn parallel_edges_accumulate_capacity() {
        let graph = graph_from(2, &[(0, 1, 1.0), (0, 1, 2.5)]);
        let cut = max_flow(&graph, vid(0), vid(1), Algorithm::AugmentingPath, &FlowOptions::default())
            .unwrap();
        assert!((cut.value - 3.5).abs() < 1e-9);
    }

    #[test]
    fn self_loop_on_source_is_ignored() {
        let graph = graph_from(3, &[(0, 0, 9.0), (0, 1, 1.0), (1, 2, 1.0)]);
        let cut = max_flow(&graph, vid(0), vid(2), Algorithm::AugmentingPath, &FlowOptions::default())
            .unwrap();
        assert!((cut.value - 1.0).abs() < 1e-9);
    }
}
