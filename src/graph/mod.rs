//! # 带权有向图与 r-割搜索的基础容器
//!
//! 设有向图 `G = (V, E)`，`V = {0, …, n-1}`，每条边 `(u, v)` 携带非负
//! 权值 `w(u, v)`（即容量）。对任意划分 `(S, T)`（`r ∈ S`，`T ≠ ∅`），
//! 割值定义为 `Σ w(u, v)`，其中 `u ∈ S`、`v ∈ T`。本模块提供：
//!
//! * 边仓库 + 插入序邻接表的图存储，平行边与自环在原始图上合法；
//! * 每顶点入度与带权入度 `Σ_{(u,v)∈E} w(u,v)` 的 O(1) 缓存；
//! * 收缩步骤遗留的合并顶点集合，供下游把占位顶点排除出候选汇；
//! * 文本/JSON 装载与 Graphviz 导出。
pub mod digraph;
pub mod ids;
pub mod index_vec;
pub mod io;

pub use digraph::{Edge, GraphError, WeightedDigraph};
pub use ids::{ComponentId, EdgeId, VertexId};
pub use index_vec::{Idx, IndexVec};
pub use io::IoError;
