//! 强连通分量：Gabow 双栈算法的显式栈实现，O(V+E)。
//!
//! 两顶点同分量当且仅当相互可达。分量编号按发现完成顺序分配，
//! 同一分量的成员列表按顶点编号升序。
use serde::{Deserialize, Serialize};

use crate::graph::digraph::WeightedDigraph;
use crate::graph::ids::{ComponentId, VertexId};
use crate::graph::index_vec::{Idx, IndexVec};

/// 顶点到分量编号的映射及其反向索引。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentMap {
    ids: IndexVec<VertexId, ComponentId>,
    members: Vec<Vec<VertexId>>,
}

impl ComponentMap {
    pub fn component_of(&self, v: VertexId) -> ComponentId {
        self.ids[v]
    }

    pub fn members_of(&self, id: ComponentId) -> &[VertexId] {
        &self.members[id.index()]
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn strongly_connected(&self, u: VertexId, v: VertexId) -> bool {
        self.ids[u] == self.ids[v]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComponentId, &[VertexId])> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, m)| (ComponentId::from_usize(i), m.as_slice()))
    }
}

/// Gabow's two-stack strongly-connected-components decomposition.
pub fn strongly_connected_components(graph: &WeightedDigraph) -> ComponentMap {
    let vertex_count = graph.vertex_count();
    let mut preorder = vec![usize::MAX; vertex_count];
    let mut assigned: Vec<Option<u32>> = vec![None; vertex_count];
    let mut pre = 0usize;
    let mut count = 0u32;
    let mut stack1: Vec<usize> = Vec::new();
    let mut stack2: Vec<usize> = Vec::new();
    // 邻接游标展开的 DFS 帧
    let mut frames: Vec<(usize, usize)> = Vec::new();

    let out: Vec<Vec<usize>> = (0..vertex_count)
        .map(|v| {
            graph
                .adjacency(VertexId::from_usize(v))
                .map(|e| e.to.index())
                .collect()
        })
        .collect();

    for start in 0..vertex_count {
        if preorder[start] != usize::MAX {
            continue;
        }
        preorder[start] = pre;
        pre += 1;
        stack1.push(start);
        stack2.push(start);
        frames.push((start, 0));

        while !frames.is_empty() {
            let top = frames.len() - 1;
            let (v, cursor) = frames[top];
            if cursor < out[v].len() {
                frames[top].1 = cursor + 1;
                let w = out[v][cursor];
                if preorder[w] == usize::MAX {
                    preorder[w] = pre;
                    pre += 1;
                    stack1.push(w);
                    stack2.push(w);
                    frames.push((w, 0));
                } else if assigned[w].is_none() {
                    while let Some(&top2) = stack2.last() {
                        if preorder[top2] > preorder[w] {
                            stack2.pop();
                        } else {
                            break;
                        }
                    }
                }
            } else {
                frames.pop();
                if stack2.last() == Some(&v) {
                    stack2.pop();
                    while let Some(w) = stack1.pop() {
                        assigned[w] = Some(count);
                        if w == v {
                            break;
                        }
                    }
                    count += 1;
                }
            }
        }
    }

    let mut members: Vec<Vec<VertexId>> = vec![Vec::new(); count as usize];
    let mut ids = IndexVec::new();
    for (v, id) in assigned.iter().enumerate() {
        // 遍历结束后每个顶点都已归入某个分量
        let id = id.unwrap_or(0);
        ids.push(ComponentId::new(id));
        members[id as usize].push(VertexId::from_usize(v));
    }

    ComponentMap { ids, members }
}
