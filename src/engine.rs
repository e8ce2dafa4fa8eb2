//! 有根连通度主流程：收缩 → 单点扫描 → SCC 扫描 → 分段随机采样。
//!
//! 对给定根 `r` 与尺寸界 `1 ≤ k1 ≤ k2 ≤ V`：
//!
//! 1. 取容量上界 `U = max_e w(e)`，以 `k2` 为参数收缩原图；
//! 2. 对收缩图上每个活顶点 `t` 求 `r → t` 最大流，汇侧为单点、或
//!    `值 < U·|汇侧|`（稀疏化证书）时作为候选；
//! 3. 对收缩图的每个不含根的非平凡强连通分量，按进入分量的边权
//!    之和直接计值，`|S| ≤ k2` 且 `值 < k2·U` 时作为候选，否则回退
//!    到最小的非平凡分量；
//! 4. 若候选值已达理论下界 1 则提前返回；
//! 5. 否则按几何尺寸带 `[2^i, 2^(i+1)]` 逐带均匀抽取 `⌊V/k1⌋` 个活
//!    顶点求流，仅接受汇侧规模落在当前带内（或单点）的结果；
//! 6. 返回三类候选中的最小者，同值时按扫描顺序优先。
//!
//! 各阶段彼此独立：某一策略没有产出（无合格分量、活顶点不足以
//! 采样、流预算耗尽）都以 `+∞` 哨兵参与取最小，绝不中断整体计算。
use std::collections::BTreeSet;

use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::contract::contract;
use crate::flow::{Algorithm, CutResult, FlowError, FlowOptions, max_flow};
use crate::graph::digraph::{GraphError, WeightedDigraph};
use crate::graph::ids::VertexId;
use crate::scc::strongly_connected_components;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("size bounds must satisfy 1 <= k1 <= k2 <= {vertices}, got k1={k1}, k2={k2}")]
    InvalidBounds { k1: usize, k2: usize, vertices: usize },
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
    #[error("flow error: {0}")]
    Flow(#[from] FlowError),
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// 各扫描阶段使用的最大流策略。
    pub algorithm: Algorithm,
    /// 采样趟的随机种子，固定种子的调用彼此幂等。
    pub seed: u64,
    pub flow: FlowOptions,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::AugmentingPath,
            seed: 0,
            flow: FlowOptions::default(),
        }
    }
}

/// 单次批量计算的编排器，调用之间不保留任何状态。
pub struct RootedConnectivityEngine {
    options: EngineOptions,
}

impl Default for RootedConnectivityEngine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl RootedConnectivityEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Estimates the minimum rooted cut from `root` under the size bounds
    /// `k1..=k2`, returning the best verified candidate.
    pub fn rooted_min_cut(
        &self,
        graph: &WeightedDigraph,
        root: VertexId,
        k1: usize,
        k2: usize,
    ) -> Result<CutResult, EngineError> {
        graph.validate_vertex(root)?;
        let vertex_count = graph.vertex_count();
        if k1 < 1 || k1 > k2 || k2 > vertex_count {
            return Err(EngineError::InvalidBounds {
                k1,
                k2,
                vertices: vertex_count,
            });
        }

        let u_bound = graph.max_edge_weight();
        let contraction = contract(graph, root, u_bound, k2)?;
        let contracted = &contraction.graph;
        log::info!(
            "rooted min cut from {root}: U = {u_bound}, contracted {} vertices at threshold {}",
            contraction.merged.len(),
            contraction.threshold
        );

        let singleton = self.singleton_pass(contracted, root, u_bound)?;
        let scc = self.scc_pass(contracted, root, k2, u_bound);
        let mut best = if scc.value < singleton.value { scc } else { singleton };

        // 已达理论下界，采样不可能更优
        if best.value == 1.0 {
            log::debug!("early exit at the theoretical minimum");
            return Ok(best);
        }

        let sampled = self.sampling_pass(contracted, root, k1, k2, vertex_count)?;
        if sampled.value < best.value {
            best = sampled;
        }
        Ok(best)
    }

    /// 逐个活顶点求流。汇侧先滤除收缩占位顶点再做证书判定。
    fn singleton_pass(
        &self,
        contracted: &WeightedDigraph,
        root: VertexId,
        u_bound: f64,
    ) -> Result<CutResult, EngineError> {
        let mut best = CutResult::unbounded();
        for t in contracted.vertices() {
            if t == root || contracted.is_contracted(t) {
                continue;
            }
            let Some(cut) = self.probe(contracted, root, t)? else {
                continue;
            };
            let sink = live_sink(contracted, &cut);
            let size = sink.len();
            let accepted = size == 1 || (size > 1 && cut.value < u_bound * size as f64);
            log::debug!(
                "singleton target {t}: value {}, sink size {size}, accepted {accepted}",
                cut.value
            );
            if accepted && cut.value < best.value {
                best = CutResult::new(cut.value, sink);
            }
        }
        Ok(best)
    }

    /// 非平凡强连通分量的直接割值：进入分量的边权之和。
    fn scc_pass(
        &self,
        contracted: &WeightedDigraph,
        root: VertexId,
        k2: usize,
        u_bound: f64,
    ) -> CutResult {
        let components = strongly_connected_components(contracted);
        log::debug!("contracted graph has {} strongly connected components", components.count());

        let mut best = CutResult::unbounded();
        let mut fallback = CutResult::unbounded();
        for (_, members) in components.iter() {
            if members.len() <= 1 {
                continue;
            }
            if members.contains(&root) {
                continue;
            }
            if members.iter().all(|&v| contracted.is_contracted(v)) {
                continue;
            }
            let member_set: FxHashSet<VertexId> = members.iter().copied().collect();
            let value: f64 = contracted
                .edges()
                .filter(|e| !member_set.contains(&e.from) && member_set.contains(&e.to))
                .map(|e| e.weight)
                .sum();
            let candidate = CutResult::new(value, members.iter().copied().collect());
            log::debug!(
                "scc candidate of size {}: direct cut value {value}",
                members.len()
            );
            if members.len() <= k2 && value < k2 as f64 * u_bound && value < best.value {
                best = candidate.clone();
            }
            if fallback.is_unbounded() || members.len() < fallback.sink_size() {
                fallback = candidate;
            }
        }

        if best.is_unbounded() {
            if !fallback.is_unbounded() {
                log::debug!("no component met the certificate; keeping the smallest one as a conservative candidate");
            }
            fallback
        } else {
            best
        }
    }

    /// 按几何尺寸带采样求流。活顶点不足 `k1` 时整趟跳过。
    fn sampling_pass(
        &self,
        contracted: &WeightedDigraph,
        root: VertexId,
        k1: usize,
        k2: usize,
        original_vertex_count: usize,
    ) -> Result<CutResult, EngineError> {
        if contracted.live_vertex_count() < k1 {
            log::warn!(
                "contracted graph has {} live vertices, fewer than k1 = {k1}; skipping the sampling pass",
                contracted.live_vertex_count()
            );
            return Ok(CutResult::unbounded());
        }

        let live: Vec<VertexId> = contracted
            .vertices()
            .filter(|&t| t != root && !contracted.is_contracted(t))
            .collect();
        let sample_size = original_vertex_count / k1;
        let mut rng = StdRng::seed_from_u64(self.options.seed);
        let mut best = CutResult::unbounded();

        for i in k1.ilog2()..=k2.ilog2() {
            let band_low = 1usize << i;
            let band_high = 1usize << (i + 1);
            let sample = draw_sample(&live, sample_size, &mut rng);
            log::debug!(
                "band [{band_low}, {band_high}]: sampled targets {}",
                sample.iter().sorted().join(", ")
            );
            for &t in &sample {
                let Some(cut) = self.probe(contracted, root, t)? else {
                    continue;
                };
                let sink = live_sink(contracted, &cut);
                let size = sink.len();
                let in_band = size == 1 || (band_low..=band_high).contains(&size);
                if in_band && cut.value < best.value {
                    best = CutResult::new(cut.value, sink);
                }
            }
        }
        Ok(best)
    }

    /// 单次最大流探测；预算耗尽按无产出处理而不是失败。
    fn probe(
        &self,
        contracted: &WeightedDigraph,
        root: VertexId,
        target: VertexId,
    ) -> Result<Option<CutResult>, EngineError> {
        match max_flow(contracted, root, target, self.options.algorithm, &self.options.flow) {
            Ok(cut) => Ok(Some(cut)),
            Err(FlowError::BudgetExhausted(rounds)) => {
                log::warn!("max-flow budget exhausted after {rounds} rounds probing target {target}");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// 候选汇侧：滤除收缩占位顶点（它们已不作为独立目标存在）。
fn live_sink(contracted: &WeightedDigraph, cut: &CutResult) -> BTreeSet<VertexId> {
    cut.sink
        .iter()
        .copied()
        .filter(|&v| !contracted.is_contracted(v))
        .collect()
}

/// 均匀无放回抽样：不足样本量时全取，否则洗牌截断。
fn draw_sample(live: &[VertexId], sample_size: usize, rng: &mut StdRng) -> Vec<VertexId> {
    if live.len() <= sample_size {
        return live.to_vec();
    }
    let mut pool = live.to_vec();
    pool.shuffle(rng);
    pool.truncate(sample_size);
    pool
}
