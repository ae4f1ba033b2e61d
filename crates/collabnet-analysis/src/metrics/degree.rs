//! Normalized degree centrality.
//!
//! `degree(v) = (in_degree(v) + out_degree(v)) / (N - 1)`.
//!
//! Because in- and out-edges are counted separately, an identity that both
//! sends to and receives from every other identity scores 2.0; values are
//! not clipped to `[0, 1]`.

use collabnet_core::{Graph, GraphError};
use tracing::instrument;

use super::VertexScores;

/// Compute normalized degree centrality for every vertex.
///
/// Returns an empty map for graphs with at most one vertex.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph), fields(n = graph.vertex_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality<G: Graph + ?Sized>(graph: &G) -> Result<VertexScores, GraphError> {
    let n = graph.vertex_count();
    let mut scores = VertexScores::with_capacity(n);
    if n <= 1 {
        return Ok(scores);
    }

    let denom = (n - 1) as f64;
    for v in 0..n {
        let degree = graph.in_degree(v)? + graph.out_degree(v)?;
        scores.insert(v, degree as f64 / denom);
    }
    Ok(scores)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
