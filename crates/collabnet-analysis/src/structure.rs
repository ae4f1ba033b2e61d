//! Structural cohesion metrics: density, clustering, degree assortativity.
//!
//! These are whole-graph scalars. Degenerate graphs (no vertices, a single
//! vertex, no edges) produce 0.0 rather than an error.

use std::collections::BTreeSet;

use collabnet_core::{Graph, GraphError};
use serde::Serialize;
use tracing::instrument;

// ---------------------------------------------------------------------------
// Density
// ---------------------------------------------------------------------------

/// `|E| / (N * (N - 1))` for a directed simple graph; 0.0 when `N <= 1`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn density<G: Graph + ?Sized>(graph: &G) -> f64 {
    let n = graph.vertex_count();
    if n < 2 {
        return 0.0_f64;
    }
    let max_edges = (n * (n - 1)) as f64;
    graph.edge_count() as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Clustering
// ---------------------------------------------------------------------------

/// Local clustering coefficient of `v`.
///
/// The neighborhood is the union of successors and predecessors without
/// `v` itself. With `k` neighbors, the coefficient is the number of ordered
/// neighbor pairs `(a, b)`, `a != b`, joined by an edge `a → b`, divided by
/// `k * (k - 1)`. Fewer than two neighbors gives 0.0.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfRange`] if `v` is not a vertex.
#[allow(clippy::cast_precision_loss)]
pub fn local_clustering<G: Graph + ?Sized>(graph: &G, v: usize) -> Result<f64, GraphError> {
    let mut neighborhood: BTreeSet<usize> = graph.successors(v)?.into_iter().collect();
    neighborhood.extend(graph.predecessors(v)?);
    neighborhood.remove(&v);

    let k = neighborhood.len();
    if k < 2 {
        return Ok(0.0);
    }

    let mut links = 0_usize;
    for &a in &neighborhood {
        for &b in &neighborhood {
            if a != b && graph.has_edge(a, b)? {
                links += 1;
            }
        }
    }

    Ok(links as f64 / (k * (k - 1)) as f64)
}

/// Mean of [`local_clustering`] over all vertices; 0.0 for an empty graph.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph), fields(n = graph.vertex_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn average_clustering<G: Graph + ?Sized>(graph: &G) -> Result<f64, GraphError> {
    let n = graph.vertex_count();
    if n == 0 {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for v in 0..n {
        total += local_clustering(graph, v)?;
    }
    Ok(total / n as f64)
}

// ---------------------------------------------------------------------------
// Assortativity
// ---------------------------------------------------------------------------

/// Whether high-degree identities tend to interact with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssortativityPattern {
    /// `r > 0`: hubs connect with hubs.
    Assortative,
    /// `r <= 0`: hubs connect with the periphery.
    Disassortative,
}

impl AssortativityPattern {
    /// Classify an assortativity coefficient.
    #[must_use]
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.0 {
            Self::Assortative
        } else {
            Self::Disassortative
        }
    }

    /// Human-readable summary.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Assortative => "assortative (hubs connect with hubs)",
            Self::Disassortative => "disassortative (hubs connect with the periphery)",
        }
    }
}

/// Degree assortativity: Pearson correlation of `(total_degree(u),
/// total_degree(v))` over every directed edge `u → v`.
///
/// Returns 0.0 when there are no edges or either degree sequence has zero
/// variance.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph), fields(n = graph.vertex_count(), m = graph.edge_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn assortativity<G: Graph + ?Sized>(graph: &G) -> Result<f64, GraphError> {
    let n = graph.vertex_count();
    let mut total_degree = Vec::with_capacity(n);
    for v in 0..n {
        total_degree.push((graph.in_degree(v)? + graph.out_degree(v)?) as f64);
    }

    let mut pairs = Vec::with_capacity(graph.edge_count());
    for u in 0..n {
        for v in graph.successors(u)? {
            pairs.push((total_degree[u], total_degree[v]));
        }
    }

    Ok(pearson(&pairs))
}

fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = pairs.len() as f64;

    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let numerator = count.mul_add(sum_xy, -(sum_x * sum_y));
    let var_x = count.mul_add(sum_x2, -(sum_x * sum_x));
    let var_y = count.mul_add(sum_y2, -(sum_y * sum_y));
    let denominator = (var_x * var_y).sqrt();

    if denominator.is_nan() || denominator <= 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
