//! Centrality metrics for the interaction graph.
//!
//! # Overview
//!
//! Each metric answers a different question about an identity's position
//! in the collaboration network:
//!
//! - **Degree centrality** (`degree`): How many distinct people does this
//!   identity interact with, relative to everyone else?
//! - **Closeness centrality** (`closeness`): How quickly can this identity
//!   reach the rest of the network along outgoing interactions?
//! - **PageRank** (`pagerank`): Who receives heavy interaction from other
//!   influential identities?
//! - **Betweenness centrality** (`betweenness`): Who sits on the shortest
//!   paths between others and acts as a broker?
//!
//! # Usage
//!
//! All metrics take any [`collabnet_core::Graph`] backend and return
//! [`VertexScores`] keyed by vertex index. Translate to logins with the
//! graph's [`collabnet_core::IdentityMap`].
//!
//! ```rust,ignore
//! use collabnet_analysis::metrics::{betweenness, closeness, degree, pagerank};
//!
//! let data: GraphData<SparseGraph> = /* build graph */;
//!
//! let dc = degree::degree_centrality(&data.graph)?;
//! let cc = closeness::closeness_centrality(&data.graph)?;
//! let pr = pagerank::pagerank(&data.graph, &PageRankConfig::default())?;
//! let bc = betweenness::betweenness_centrality(&data.graph)?;
//! ```

use std::collections::HashMap;

pub mod betweenness;
pub mod closeness;
pub mod degree;
pub mod pagerank;

/// Per-vertex metric values keyed by vertex index.
pub type VertexScores = HashMap<usize, f64>;

/// The `k` highest-scoring vertices, descending by score, ties broken by
/// ascending vertex index.
#[must_use]
pub fn top_k(scores: &VertexScores, k: usize) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().map(|(&v, &s)| (v, s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}
