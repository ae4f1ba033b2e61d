//! Closeness centrality with a reachability correction.
//!
//! # Algorithm
//!
//! For each source `s`, an unweighted BFS over outgoing edges yields the
//! number of reachable vertices `r` and the sum of their distances `D`:
//!
//! ```text
//! closeness(s) = (r / D) * (r / (N - 1))
//! ```
//!
//! The first factor is the classic inverse mean distance; the second scales
//! it by the fraction of the graph `s` can reach, so an identity that only
//! reaches a small cluster cannot look as central as one that reaches
//! everyone. Vertices that reach nothing score 0.
//!
//! Complexity: O(V * (V + E)).

use std::collections::VecDeque;

use collabnet_core::{Graph, GraphError};
use tracing::instrument;

use super::VertexScores;

/// Compute closeness centrality for every vertex.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph), fields(n = graph.vertex_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn closeness_centrality<G: Graph + ?Sized>(graph: &G) -> Result<VertexScores, GraphError> {
    let n = graph.vertex_count();
    let mut scores = VertexScores::with_capacity(n);

    for s in 0..n {
        let mut dist: Vec<Option<usize>> = vec![None; n];
        dist[s] = Some(0);
        let mut queue = VecDeque::from([s]);
        let mut reachable = 0_usize;
        let mut total_distance = 0_usize;

        while let Some(u) = queue.pop_front() {
            let du = dist[u].unwrap_or_default();
            for v in graph.successors(u)? {
                if dist[v].is_none() {
                    dist[v] = Some(du + 1);
                    reachable += 1;
                    total_distance += du + 1;
                    queue.push_back(v);
                }
            }
        }

        let score = if total_distance == 0 {
            0.0
        } else {
            let r = reachable as f64;
            (r / total_distance as f64) * (r / (n - 1) as f64)
        };
        scores.insert(s, score);
    }

    Ok(scores)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
