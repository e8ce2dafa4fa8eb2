//! 穷举式有根最小割：小图上的离线正确性基准。
//!
//! 枚举所有不含根的非空汇集合 `T`，割值取自 `V∖T` 进入 `T` 的边权
//! 之和，返回其中的最小者。代价为 O(2^V · E)，只用于核对启发式
//! 结果，不属于生产路径。
use std::collections::BTreeSet;

use thiserror::Error;

use crate::flow::CutResult;
use crate::graph::digraph::{GraphError, WeightedDigraph};
use crate::graph::ids::VertexId;
use crate::graph::index_vec::Idx;

/// 枚举上限：2^20 个子集以内。
pub const MAX_ORACLE_VERTICES: usize = 20;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("graph with {0} vertices is too large for exhaustive enumeration (limit {limit})", limit = MAX_ORACLE_VERTICES)]
    TooLarge(usize),
}

/// Exhaustive minimum rooted cut over every sink set not containing `root`.
pub fn brute_force_rooted_cut(
    graph: &WeightedDigraph,
    root: VertexId,
) -> Result<CutResult, OracleError> {
    graph.validate_vertex(root)?;
    let vertex_count = graph.vertex_count();
    if vertex_count > MAX_ORACLE_VERTICES {
        return Err(OracleError::TooLarge(vertex_count));
    }

    let root_bit = 1u32 << root.index();
    let mut best = CutResult::unbounded();
    for mask in 1u32..(1u32 << vertex_count) {
        if mask & root_bit != 0 {
            continue;
        }
        let mut value = 0.0;
        for edge in graph.edges() {
            let from_in = mask & (1 << edge.from.index()) != 0;
            let to_in = mask & (1 << edge.to.index()) != 0;
            if !from_in && to_in {
                value += edge.weight;
            }
        }
        if value < best.value {
            let sink: BTreeSet<VertexId> = (0..vertex_count)
                .filter(|v| mask & (1 << v) != 0)
                .map(VertexId::from_usize)
                .collect();
            best = CutResult::new(value, sink);
        }
    }
    Ok(best)
}
