//! Basic graph statistics for the interaction graph.
//!
//! # Statistics Provided
//!
//! - **vertex_count**: Number of identities.
//! - **edge_count**: Number of distinct directed interaction pairs.
//! - **density**: `edge_count / (vertex_count * (vertex_count - 1))`.
//!   Zero for graphs with 0 or 1 vertex.
//! - **weak_component_count**: Number of weakly connected components. A
//!   value greater than 1 means the network splits into groups with no
//!   interaction between them.
//! - **isolated_vertex_count**: Vertices with neither in- nor out-edges.
//! - **max_in_degree** / **max_out_degree**: Highest in/out degree.
//! - **is_connected**: Whether the graph is weakly connected.

use collabnet_core::{Graph, GraphError};
use serde::Serialize;
use tracing::instrument;

use crate::community::connected_components;
use crate::metrics::betweenness::symmetrize;
use crate::structure::density;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for an interaction graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of vertices (identities).
    pub vertex_count: usize,
    /// Number of directed edges.
    pub edge_count: usize,
    /// Graph density, from 0.0 (no edges) to 1.0 (all possible edges).
    pub density: f64,
    /// Number of weakly connected components.
    pub weak_component_count: usize,
    /// Number of vertices with no in-edges and no out-edges.
    pub isolated_vertex_count: usize,
    /// Maximum in-degree over all vertices.
    pub max_in_degree: usize,
    /// Maximum out-degree over all vertices.
    pub max_out_degree: usize,
    /// Whether every vertex is reachable from every other ignoring direction.
    pub is_connected: bool,
}

impl GraphStats {
    /// Compute statistics through the graph contract.
    ///
    /// # Errors
    ///
    /// Only propagates backend errors.
    #[instrument(skip(graph), fields(n = graph.vertex_count()))]
    pub fn compute<G: Graph + ?Sized>(graph: &G) -> Result<Self, GraphError> {
        let vertex_count = graph.vertex_count();

        let mut isolated_vertex_count = 0;
        let mut max_in_degree = 0;
        let mut max_out_degree = 0;
        for v in 0..vertex_count {
            let in_d = graph.in_degree(v)?;
            let out_d = graph.out_degree(v)?;
            if in_d == 0 && out_d == 0 {
                isolated_vertex_count += 1;
            }
            max_in_degree = max_in_degree.max(in_d);
            max_out_degree = max_out_degree.max(out_d);
        }

        Ok(Self {
            vertex_count,
            edge_count: graph.edge_count(),
            density: density(graph),
            weak_component_count: connected_components(&symmetrize(graph)?).len(),
            isolated_vertex_count,
            max_in_degree,
            max_out_degree,
            is_connected: graph.is_connected()?,
        })
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
