//! The directed, edge-weighted simple graph contract and its backends.
//!
//! # Overview
//!
//! Vertices are dense integers `0..N`, fixed when the graph is created.
//! Edges are ordered pairs `(u, v)` with `u != v`, at most one per pair,
//! each carrying an `f64` weight. Presence of `(u, v)` says nothing about
//! `(v, u)`.
//!
//! Two interchangeable backends implement [`Graph`]:
//!
//! - [`SparseGraph`]: per-vertex ordered out/in maps. Memory `O(N + E)`.
//!   The default for collaboration graphs, where `E ≪ N²`.
//! - [`DenseGraph`]: an `N × N` cell matrix. `O(1)` edge lookup at `O(N²)`
//!   memory; degrees and neighbor scans are `O(N)`.
//!
//! Both must agree on every observable result. The backend-equivalence
//! property tests in `tests/backend_equivalence.rs` enforce this.
//!
//! # Validation
//!
//! Every operation that takes a vertex validates it first and returns
//! [`GraphError::VertexOutOfRange`] without touching state.

mod dense;
mod sparse;

use std::collections::VecDeque;

pub use dense::DenseGraph;
pub use sparse::SparseGraph;

use crate::error::GraphError;

/// Weight given to edges created through [`Graph::add_edge`].
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Weight every vertex starts with.
pub const DEFAULT_VERTEX_WEIGHT: f64 = 1.0;

/// Check that `vertex` is a valid index for a graph with `vertex_count`
/// vertices.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfRange`] when `vertex >= vertex_count`.
pub const fn check_vertex(vertex: usize, vertex_count: usize) -> Result<(), GraphError> {
    if vertex < vertex_count {
        Ok(())
    } else {
        Err(GraphError::VertexOutOfRange {
            vertex,
            vertex_count,
        })
    }
}

/// A directed, edge-weighted simple graph over vertices `0..N`.
///
/// Implementors provide storage; the relational predicates and the weak
/// connectivity check are derived from the required methods.
pub trait Graph {
    /// Create a graph with `vertex_count` isolated vertices and no edges.
    fn with_vertices(vertex_count: usize) -> Self
    where
        Self: Sized;

    /// Create a graph from a signed vertex count, as supplied by external
    /// callers.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NegativeVertexCount`] if `vertex_count < 0`.
    fn try_with_vertices(vertex_count: i64) -> Result<Self, GraphError>
    where
        Self: Sized,
    {
        usize::try_from(vertex_count)
            .map(Self::with_vertices)
            .map_err(|_| GraphError::NegativeVertexCount(vertex_count))
    }

    /// Number of vertices. Fixed for the graph's lifetime.
    fn vertex_count(&self) -> usize;

    /// Number of distinct ordered pairs currently joined by an edge.
    fn edge_count(&self) -> usize;

    /// Whether the edge `u → v` exists. Always `false` for `u == v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn has_edge(&self, u: usize, v: usize) -> Result<bool, GraphError>;

    /// Insert `u → v` with weight [`DEFAULT_EDGE_WEIGHT`].
    ///
    /// No-op when `u == v` or the edge already exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError>;

    /// Delete `u → v`. No-op when the edge is absent.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn remove_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError>;

    /// Set the weight of `u → v`, creating the edge if it is absent.
    ///
    /// No-op when `u == v`. Overwriting an existing edge leaves the edge
    /// count unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn set_edge_weight(&mut self, u: usize, v: usize, weight: f64) -> Result<(), GraphError>;

    /// Weight of the edge `u → v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex and
    /// [`GraphError::EdgeNotFound`] when the edge does not exist.
    fn edge_weight(&self, u: usize, v: usize) -> Result<f64, GraphError>;

    /// Number of edges entering `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn in_degree(&self, v: usize) -> Result<usize, GraphError>;

    /// Number of edges leaving `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn out_degree(&self, v: usize) -> Result<usize, GraphError>;

    /// Every `w` with an edge `v → w`, each exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn successors(&self, v: usize) -> Result<Vec<usize>, GraphError>;

    /// Every `w` with an edge `w → v`, each exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn predecessors(&self, v: usize) -> Result<Vec<usize>, GraphError>;

    /// Scalar weight attached to `v` (default [`DEFAULT_VERTEX_WEIGHT`]).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn vertex_weight(&self, v: usize) -> Result<f64, GraphError>;

    /// Overwrite the scalar weight attached to `v`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn set_vertex_weight(&mut self, v: usize, weight: f64) -> Result<(), GraphError>;

    // -----------------------------------------------------------------------
    // Derived predicates
    // -----------------------------------------------------------------------

    /// Validate a vertex against this graph's size.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn validate(&self, v: usize) -> Result<(), GraphError> {
        check_vertex(v, self.vertex_count())
    }

    /// `v` is a successor of `u`, i.e. `u → v` exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn is_successor(&self, u: usize, v: usize) -> Result<bool, GraphError> {
        self.has_edge(u, v)
    }

    /// `v` is a predecessor of `u`, i.e. `v → u` exists.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn is_predecessor(&self, u: usize, v: usize) -> Result<bool, GraphError> {
        self.has_edge(v, u)
    }

    /// The edges `u1 → v1` and `u2 → v2` both exist, share their source and
    /// point at different targets.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn is_divergent(&self, u1: usize, v1: usize, u2: usize, v2: usize) -> Result<bool, GraphError> {
        for v in [u1, v1, u2, v2] {
            self.validate(v)?;
        }
        Ok(u1 == u2 && v1 != v2 && self.has_edge(u1, v1)? && self.has_edge(u2, v2)?)
    }

    /// The edges `u1 → v1` and `u2 → v2` both exist, share their target and
    /// come from different sources.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn is_convergent(
        &self,
        u1: usize,
        v1: usize,
        u2: usize,
        v2: usize,
    ) -> Result<bool, GraphError> {
        for v in [u1, v1, u2, v2] {
            self.validate(v)?;
        }
        Ok(v1 == v2 && u1 != u2 && self.has_edge(u1, v1)? && self.has_edge(u2, v2)?)
    }

    /// The edge `u → v` exists and `x` is one of its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] for an invalid vertex.
    fn is_incident(&self, u: usize, v: usize, x: usize) -> Result<bool, GraphError> {
        self.validate(x)?;
        Ok(self.has_edge(u, v)? && (x == u || x == v))
    }

    /// No edges at all.
    fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Every ordered pair of distinct vertices is joined: `|E| = N(N-1)`.
    fn is_complete(&self) -> bool {
        let n = self.vertex_count();
        self.edge_count() == n * n.saturating_sub(1)
    }

    /// Weak connectivity: a single BFS from vertex 0 following both
    /// successor and predecessor links reaches every vertex.
    ///
    /// Graphs with at most one vertex are connected.
    ///
    /// # Errors
    ///
    /// Only propagates backend errors; all visited vertices are in range.
    fn is_connected(&self) -> Result<bool, GraphError> {
        let n = self.vertex_count();
        if n <= 1 {
            return Ok(true);
        }

        let mut visited = vec![false; n];
        let mut queue = VecDeque::from([0_usize]);
        visited[0] = true;
        let mut reached = 0_usize;

        while let Some(u) = queue.pop_front() {
            reached += 1;
            for w in self.successors(u)?.into_iter().chain(self.predecessors(u)?) {
                if !visited[w] {
                    visited[w] = true;
                    queue.push_back(w);
                }
            }
        }

        Ok(reached == n)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the same scenario against both backends.
    fn both(n: usize, f: impl Fn(&mut dyn Graph)) {
        f(&mut SparseGraph::with_vertices(n));
        f(&mut DenseGraph::with_vertices(n));
    }

    #[test]
    fn check_vertex_bounds() {
        assert!(check_vertex(0, 1).is_ok());
        assert_eq!(
            check_vertex(1, 1),
            Err(GraphError::VertexOutOfRange {
                vertex: 1,
                vertex_count: 1
            })
        );
        assert!(check_vertex(0, 0).is_err());
    }

    #[test]
    fn negative_vertex_count_rejected() {
        assert_eq!(
            SparseGraph::try_with_vertices(-1).err(),
            Some(GraphError::NegativeVertexCount(-1))
        );
        assert_eq!(
            DenseGraph::try_with_vertices(-5).err(),
            Some(GraphError::NegativeVertexCount(-5))
        );
        let g = SparseGraph::try_with_vertices(4).expect("non-negative count");
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn divergent_and_convergent_pairs() {
        both(4, |g| {
            g.add_edge(0, 1).expect("add");
            g.add_edge(0, 2).expect("add");
            g.add_edge(3, 2).expect("add");

            assert!(g.is_divergent(0, 1, 0, 2).expect("valid"));
            assert!(!g.is_divergent(0, 1, 0, 1).expect("valid"), "same target");
            assert!(!g.is_divergent(0, 1, 3, 2).expect("valid"), "different source");
            assert!(!g.is_divergent(0, 1, 0, 3).expect("valid"), "0 → 3 missing");

            assert!(g.is_convergent(0, 2, 3, 2).expect("valid"));
            assert!(!g.is_convergent(0, 2, 0, 2).expect("valid"), "same source");
            assert!(!g.is_convergent(0, 1, 3, 2).expect("valid"), "different target");
        });
    }

    #[test]
    fn incident_requires_edge_and_endpoint() {
        both(3, |g| {
            g.add_edge(0, 1).expect("add");
            assert!(g.is_incident(0, 1, 0).expect("valid"));
            assert!(g.is_incident(0, 1, 1).expect("valid"));
            assert!(!g.is_incident(0, 1, 2).expect("valid"));
            assert!(!g.is_incident(1, 0, 1).expect("valid"), "reverse edge absent");
            assert!(g.is_incident(0, 1, 9).is_err());
        });
    }

    #[test]
    fn predicates_validate_every_vertex() {
        both(2, |g| {
            assert!(g.is_divergent(0, 0, 0, 5).is_err());
            assert!(g.is_convergent(5, 0, 0, 0).is_err());
            assert!(g.is_successor(0, 2).is_err());
            assert!(g.is_predecessor(2, 0).is_err());
        });
    }

    #[test]
    fn successor_and_predecessor_relations() {
        both(2, |g| {
            g.add_edge(0, 1).expect("add");
            assert!(g.is_successor(0, 1).expect("valid"));
            assert!(!g.is_successor(1, 0).expect("valid"));
            assert!(g.is_predecessor(1, 0).expect("valid"));
            assert!(!g.is_predecessor(0, 1).expect("valid"));
        });
    }

    #[test]
    fn empty_and_complete() {
        both(3, |g| {
            assert!(g.is_empty());
            assert!(!g.is_complete());
            for u in 0..3 {
                for v in 0..3 {
                    g.add_edge(u, v).expect("add");
                }
            }
            assert_eq!(g.edge_count(), 6);
            assert!(g.is_complete());
            assert!(!g.is_empty());
        });
        assert!(SparseGraph::with_vertices(0).is_complete());
        assert!(DenseGraph::with_vertices(1).is_complete());
    }

    #[test]
    fn trivial_graphs_are_connected() {
        assert!(SparseGraph::with_vertices(0).is_connected().expect("ok"));
        assert!(DenseGraph::with_vertices(1).is_connected().expect("ok"));
    }

    #[test]
    fn weak_connectivity_ignores_direction() {
        both(3, |g| {
            // 1 → 0 ← 2: vertex 0 has no successors, reached only backwards.
            g.add_edge(1, 0).expect("add");
            assert!(!g.is_connected().expect("ok"), "2 is isolated");
            g.add_edge(2, 0).expect("add");
            assert!(g.is_connected().expect("ok"));
        });
    }

    #[test]
    fn disconnected_pairs() {
        both(4, |g| {
            g.add_edge(0, 1).expect("add");
            g.add_edge(2, 3).expect("add");
            assert!(!g.is_connected().expect("ok"));
        });
    }
}
