//! Graph construction from an aggregated edge list.
//!
//! ## Two-pass build
//!
//! 1. Collect every distinct login from the edge list and number them in
//!    lexicographic order ([`IdentityMap`]).
//! 2. Allocate a graph with that many vertices and insert one edge per
//!    aggregated `(source, target)` pair, carrying the summed weight.
//!
//! The resulting graph is read-mostly: analyses borrow it immutably.

#![allow(clippy::module_name_repetitions)]

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::edges::{EdgeList, RawEdge};
use crate::error::GraphError;
use crate::graph::Graph;
use crate::identity::IdentityMap;

/// A graph together with the identity map that names its vertices.
#[derive(Debug, Clone)]
pub struct GraphData<G> {
    /// The interaction graph. Vertex `i` is `identities.login(i)`.
    pub graph: G,
    /// Login ↔ vertex mapping used to build `graph`.
    pub identities: IdentityMap,
}

impl<G: Graph> GraphData<G> {
    /// Build the graph and identity map from an aggregated edge list.
    ///
    /// # Errors
    ///
    /// Only fails if the backend rejects an index the identity map issued,
    /// which would indicate a backend bug.
    #[instrument(skip(edges), fields(pairs = edges.len()))]
    pub fn from_edge_list(edges: &EdgeList) -> Result<Self, GraphError> {
        let identities = IdentityMap::from_logins(edges.logins());
        let mut graph = G::with_vertices(identities.len());

        for (source, target, agg) in edges.iter() {
            // Every endpoint came from `edges.logins()`, so both resolve.
            let (Some(u), Some(v)) = (identities.vertex(source), identities.vertex(target)) else {
                continue;
            };
            graph.set_edge_weight(u, v, agg.weight)?;
        }

        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "interaction graph built"
        );
        Ok(Self { graph, identities })
    }

    /// Aggregate raw interaction events, then build as
    /// [`GraphData::from_edge_list`] does.
    ///
    /// # Errors
    ///
    /// See [`GraphData::from_edge_list`].
    pub fn from_raw_edges(events: &[RawEdge]) -> Result<Self, GraphError> {
        Self::from_edge_list(&EdgeList::from_raw(events))
    }

    /// Load an edge-list CSV and build the graph from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_csv_file(path: &Path, has_header: bool) -> Result<(Self, EdgeList)> {
        let edges = EdgeList::read_csv_file(path, has_header)?;
        let data = Self::from_edge_list(&edges)
            .with_context(|| format!("Failed to build graph from {}", path.display()))?;
        Ok((data, edges))
    }

    /// Login of vertex `v`.
    #[must_use]
    pub fn login(&self, v: usize) -> Option<&str> {
        self.identities.login(v)
    }

    /// Vertex index of `login`.
    #[must_use]
    pub fn vertex(&self, login: &str) -> Option<usize> {
        self.identities.vertex(login)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
