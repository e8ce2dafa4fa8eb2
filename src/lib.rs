//! # 有根连通度估计（rooted-cut）
//!
//! 对带权有向图 `G = (V, E)` 与指定根 `r`，估计把某非根目标区域与
//! 根在前向意义下分离所需的最小割权 `λ(r)`。做法与目标引理对齐：
//!
//! * **收缩**：带权入度达到 `(1 + U)·k` 的顶点不可能落在小割的汇侧，
//!   全部合并进根，`U` 为全图边权上界；
//! * **单点扫描**：对收缩图上每个活顶点求 `r → t` 最大流，以
//!   `值 < U·|汇侧|` 作为稀疏化证书；
//! * **SCC 扫描**：枚举收缩图的非平凡强连通分量，按进入分量的边权
//!   直接计值；
//! * **随机采样**：按几何尺寸带抽样补足中等规模的候选汇。
//!
//! 结果是概率性/启发式的证书而非精确全局最小割。采样由可注入种子
//! 的随机源驱动，固定种子时整个计算幂等。
//!
//! ## 示例
//!
//! ```rust
//! use rooted_cut::engine::RootedConnectivityEngine;
//! use rooted_cut::graph::{VertexId, WeightedDigraph};
//!
//! let mut graph = WeightedDigraph::new(4);
//! graph.add_edge(VertexId::new(0), VertexId::new(1), 10.0).unwrap();
//! graph.add_edge(VertexId::new(1), VertexId::new(2), 5.0).unwrap();
//! graph.add_edge(VertexId::new(2), VertexId::new(0), 5.0).unwrap();
//! graph.add_edge(VertexId::new(0), VertexId::new(3), 1.0).unwrap();
//!
//! let engine = RootedConnectivityEngine::default();
//! let cut = engine.rooted_min_cut(&graph, VertexId::new(0), 1, 2).unwrap();
//! assert!((cut.value - 1.0).abs() < 1e-9);
//! ```
pub mod contract;
pub mod engine;
pub mod flow;
pub mod graph;
pub mod oracle;
pub mod scc;

pub use contract::{ContractionResult, contract};
pub use engine::{EngineError, EngineOptions, RootedConnectivityEngine};
pub use flow::{Algorithm, CutResult, FlowError, FlowOptions, FlowSolver, max_flow};
pub use graph::{Edge, GraphError, IoError, VertexId, WeightedDigraph};
pub use oracle::{OracleError, brute_force_rooted_cut};
pub use scc::{ComponentMap, strongly_connected_components};
