//! # 最大流 / 最小割求解器
//!
//! 两种策略实现同一契约：对同一输入，二者的流值必须一致（这被用作
//! 交叉校验不变量），当存在多个最小割时报告的割可以不同。
//!
//! * [`Algorithm::AugmentingPath`]：Edmonds–Karp 增广路，在残量网络上
//!   反复 BFS 最短增广路并推送瓶颈容量；
//! * [`Algorithm::PushRelabel`]：FIFO 预流推进，维护高度标号与顶点
//!   盈余，沿可行弧推流、必要时重标号。
//!
//! 求解在一张按调用新建的残量网络上进行，共享的输入图从不被修改，
//! 因此相互独立的调用之间不需要任何同步。
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::digraph::{GraphError, WeightedDigraph};
use crate::graph::ids::VertexId;

mod augmenting;
mod push_relabel;
pub(crate) mod residual;

pub use augmenting::AugmentingPath;
pub use push_relabel::PushRelabel;

/// 残量为正的判定阈值，保证每次增广至少推进 ε。
pub const RESIDUAL_EPS: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("source and sink are the same vertex {0}")]
    SourceIsSink(usize),
    #[error("max-flow budget exhausted after {0} rounds")]
    BudgetExhausted(u64),
}

/// Per-call resource bound; `max_rounds` counts augmentations or
/// discharges depending on the algorithm.
#[derive(Debug, Clone, Default)]
pub struct FlowOptions {
    pub max_rounds: Option<u64>,
}

/// 割值与汇侧顶点集。值为 `+∞` 表示该候选策略下没有有限割。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutResult {
    pub value: f64,
    pub sink: BTreeSet<VertexId>,
}

impl CutResult {
    pub fn new(value: f64, sink: BTreeSet<VertexId>) -> Self {
        Self { value, sink }
    }

    /// Sentinel for "no finite cut achievable under this strategy".
    pub fn unbounded() -> Self {
        Self {
            value: f64::INFINITY,
            sink: BTreeSet::new(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.value.is_infinite()
    }

    pub fn sink_size(&self) -> usize {
        self.sink.len()
    }
}

impl fmt::Display for CutResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            return write!(f, "no finite cut");
        }
        write!(f, "value {} with sink {{", self.value)?;
        for (i, v) in self.sink.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "}}")
    }
}

/// Strategy selector for [`max_flow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    AugmentingPath,
    PushRelabel,
}

impl Algorithm {
    pub fn solver(self) -> &'static dyn FlowSolver {
        match self {
            Algorithm::AugmentingPath => &AugmentingPath,
            Algorithm::PushRelabel => &PushRelabel,
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "augmenting" | "augmenting-path" => Ok(Algorithm::AugmentingPath),
            "push-relabel" | "preflow" => Ok(Algorithm::PushRelabel),
            other => Err(format!("unknown algorithm {other:?}")),
        }
    }
}

/// 最大流求解策略的公共契约。
pub trait FlowSolver {
    fn max_flow(
        &self,
        graph: &WeightedDigraph,
        source: VertexId,
        sink: VertexId,
        options: &FlowOptions,
    ) -> Result<CutResult, FlowError>;
}

/// Computes the max-flow value and a min-cut sink side from `source` to `sink`.
pub fn max_flow(
    graph: &WeightedDigraph,
    source: VertexId,
    sink: VertexId,
    algorithm: Algorithm,
    options: &FlowOptions,
) -> Result<CutResult, FlowError> {
    graph.validate_vertex(source)?;
    graph.validate_vertex(sink)?;
    if source == sink {
        return Err(FlowError::SourceIsSink(source.raw() as usize));
    }
    algorithm.solver().max_flow(graph, source, sink, options)
}


#[cfg(test)]
mod tests {
    use super::test_support::{crossing_capacity, graph_from, vid};
    use super::*;

    fn both(graph: &WeightedDigraph, s: usize, t: usize) -> (CutResult, CutResult) {
        let opts = FlowOptions::default();
        let a = max_flow(graph, vid(s), vid(t), Algorithm::AugmentingPath, &opts).unwrap();
        let b = max_flow(graph, vid(s), vid(t), Algorithm::PushRelabel, &opts).unwrap();
        (a, b)
    }

    #[test]
    fn algorithms_agree_on_flow_value() {
        let graphs = [
            graph_from(4, &[(0, 1, 10.0), (1, 2, 5.0), (2, 3, 5.0), (0, 3, 1.0)]),
            graph_from(
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
            ),
            graph_from(5, &[(0, 1, 2.5), (1, 4, 1.5), (0, 2, 3.0), (2, 3, 0.5), (3, 4, 4.0)]),
        ];
        let sinks = [3, 5, 4];
        for (graph, &t) in graphs.iter().zip(sinks.iter()) {
            let (a, b) = both(graph, 0, t);
            assert!((a.value - b.value).abs() < 1e-9, "{} vs {}", a.value, b.value);
        }
    }

    #[test]
    fn flow_value_matches_reported_cut_capacity() {
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
        let (a, _) = both(&graph, 0, 5);
        assert!((a.value - crossing_capacity(&graph, &a.sink)).abs() < 1e-9);
        assert!((a.value - 23.0).abs() < 1e-9);
    }

    #[test]
    fn chain_with_bypass_saturates_both_routes() {
        let graph = graph_from(4, &[(0, 1, 10.0), (1, 2, 5.0), (2, 3, 5.0), (0, 3, 1.0)]);
        let (a, b) = both(&graph, 0, 3);
        assert!((a.value - 6.0).abs() < 1e-9);
        assert_eq!(a.sink, BTreeSet::from([vid(3)]));
        assert!((b.value - 6.0).abs() < 1e-9);
    }

    #[test]
    fn single_bottleneck_edge_gives_unit_cut() {
        // 重环 1<->2 只能从 0->3 以外到达，最小割只含那条单位边
        let graph = graph_from(4, &[(0, 1, 10.0), (1, 2, 5.0), (2, 0, 5.0), (0, 3, 1.0)]);
        let (a, b) = both(&graph, 0, 3);
        assert!((a.value - 1.0).abs() < 1e-9);
        assert_eq!(a.sink, BTreeSet::from([vid(3)]));
        assert!((b.value - 1.0).abs() < 1e-9);
        assert_eq!(b.sink, BTreeSet::from([vid(3)]));
    }

    #[test]
    fn no_edges_from_source_yields_zero_and_full_sink() {
        let graph = graph_from(4, &[(1, 2, 3.0), (2, 3, 3.0)]);
        let (a, b) = both(&graph, 0, 3);
        for cut in [a, b] {
            assert_eq!(cut.value, 0.0);
            assert_eq!(cut.sink, BTreeSet::from([vid(1), vid(2), vid(3)]));
        }
    }

    #[test]
    fn source_equals_sink_is_rejected() {
        let graph = graph_from(2, &[(0, 1, 1.0)]);
        let err = max_flow(
            &graph,
            vid(0),
            vid(0),
            Algorithm::AugmentingPath,
            &FlowOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, FlowError::SourceIsSink(0)));
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let graph = graph_from(4, &[(0, 1, 10.0), (1, 2, 5.0), (2, 3, 5.0), (0, 3, 1.0)]);
        let opts = FlowOptions { max_rounds: Some(1) };
        let err = max_flow(&graph, vid(0), vid(3), Algorithm::AugmentingPath, &opts).unwrap_err();
        assert!(matches!(err, FlowError::BudgetExhausted(_)));
    }

    #[test]
    fn algorithm_parses_from_cli_names() {
        assert_eq!("augmenting".parse::<Algorithm>().unwrap(), Algorithm::AugmentingPath);
        assert_eq!("push-relabel".parse::<Algorithm>().unwrap(), Algorithm::PushRelabel);
        assert!("dinic".parse::<Algorithm>().is_err());
    }
}
