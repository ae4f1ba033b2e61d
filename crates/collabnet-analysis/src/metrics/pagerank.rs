//! Weighted PageRank by power iteration.
//!
//! # Algorithm
//!
//! ```text
//! PR(v) = (1 - d) / N
//!       + d * Σ PR(u) * w(u, v) / W(u)      for each u → v with W(u) > 0
//!       + d * Σ PR(u) / N                   for each dangling u (W(u) = 0)
//! ```
//!
//! where `d` is the damping factor and `W(u)` is the total outgoing edge
//! weight of `u`. Rank flows along edges in proportion to interaction
//! weight rather than uniformly over successors.
//!
//! # Dangling vertices
//!
//! A vertex with zero total out-weight spreads its whole damped mass over
//! **all** `N` vertices, itself included. Some reference implementations
//! only redistribute to non-dangling vertices; scores here will differ
//! from those on graphs with many sinks.
//!
//! Ranks start uniform at `1/N` and iteration stops once the L1 change
//! between rounds drops below the tolerance, or after `max_iter` rounds.

use std::collections::HashMap;

use collabnet_core::{Graph, GraphError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::VertexScores;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    pub damping: f64,
    /// Maximum number of iterations.
    /// Default: 20.
    pub max_iter: usize,
    /// Convergence threshold: stop when L1 norm of rank delta < tolerance.
    /// Default: 1e-6.
    pub tolerance: f64,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iter: 20,
            tolerance: 1e-6,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone)]
pub struct PageRankResult {
    /// PageRank scores: vertex → score.
    pub scores: VertexScores,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the L1 delta fell below the tolerance within `max_iter`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Power iteration
// ---------------------------------------------------------------------------

/// Compute weighted PageRank for every vertex.
///
/// An empty graph yields empty scores and `converged = true`.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph, config), fields(n = graph.vertex_count(), damping = config.damping))]
#[allow(clippy::cast_precision_loss)]
pub fn pagerank<G: Graph + ?Sized>(
    graph: &G,
    config: &PageRankConfig,
) -> Result<PageRankResult, GraphError> {
    let n = graph.vertex_count();
    if n == 0 {
        return Ok(PageRankResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
        });
    }

    // Outgoing (target, weight) lists and their weight totals, read once.
    let mut out_edges: Vec<Vec<(usize, f64)>> = Vec::with_capacity(n);
    let mut out_weight: Vec<f64> = Vec::with_capacity(n);
    for u in 0..n {
        let mut edges = Vec::new();
        for v in graph.successors(u)? {
            edges.push((v, graph.edge_weight(u, v)?));
        }
        out_weight.push(edges.iter().map(|&(_, w)| w).sum());
        out_edges.push(edges);
    }

    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        iterations += 1;

        // Dangling mass is the same for every vertex, so fold it into the base.
        let dangling: f64 = (0..n)
            .filter(|&u| out_weight[u] <= 0.0)
            .map(|u| config.damping * ranks[u] / n_f64)
            .sum();

        for r in &mut new_ranks {
            *r = base + dangling;
        }

        for u in 0..n {
            let total = out_weight[u];
            if total <= 0.0 {
                continue;
            }
            let mass = config.damping * ranks[u];
            for &(v, w) in &out_edges[u] {
                new_ranks[v] += mass * w / total;
            }
        }

        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);
        debug!(iteration = iterations, delta, "pagerank iteration");

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    Ok(PageRankResult {
        scores: ranks.into_iter().enumerate().collect(),
        iterations,
        converged,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
