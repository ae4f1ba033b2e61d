//! Adjacency-list backend.

use std::collections::BTreeMap;

use super::{DEFAULT_EDGE_WEIGHT, DEFAULT_VERTEX_WEIGHT, Graph};
use crate::error::GraphError;

/// Adjacency-list graph: one ordered `target → weight` map per vertex for
/// outgoing edges, mirrored by one `source → weight` map for incoming
/// edges.
///
/// Neighbor enumeration is ascending by vertex index, which keeps every
/// downstream traversal deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseGraph {
    out_edges: Vec<BTreeMap<usize, f64>>,
    in_edges: Vec<BTreeMap<usize, f64>>,
    vertex_weights: Vec<f64>,
    edge_count: usize,
}

impl SparseGraph {
    fn check_pair(&self, u: usize, v: usize) -> Result<(), GraphError> {
        self.validate(u)?;
        self.validate(v)
    }
}

impl Graph for SparseGraph {
    fn with_vertices(vertex_count: usize) -> Self {
        Self {
            out_edges: vec![BTreeMap::new(); vertex_count],
            in_edges: vec![BTreeMap::new(); vertex_count],
            vertex_weights: vec![DEFAULT_VERTEX_WEIGHT; vertex_count],
            edge_count: 0,
        }
    }

    fn vertex_count(&self) -> usize {
        self.out_edges.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn has_edge(&self, u: usize, v: usize) -> Result<bool, GraphError> {
        self.check_pair(u, v)?;
        Ok(self.out_edges[u].contains_key(&v))
    }

    fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        self.check_pair(u, v)?;
        if u == v || self.out_edges[u].contains_key(&v) {
            return Ok(());
        }
        self.out_edges[u].insert(v, DEFAULT_EDGE_WEIGHT);
        self.in_edges[v].insert(u, DEFAULT_EDGE_WEIGHT);
        self.edge_count += 1;
        Ok(())
    }

    fn remove_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        self.check_pair(u, v)?;
        if self.out_edges[u].remove(&v).is_some() {
            self.in_edges[v].remove(&u);
            self.edge_count -= 1;
        }
        Ok(())
    }

    fn set_edge_weight(&mut self, u: usize, v: usize, weight: f64) -> Result<(), GraphError> {
        self.check_pair(u, v)?;
        if u == v {
            return Ok(());
        }
        if self.out_edges[u].insert(v, weight).is_none() {
            self.edge_count += 1;
        }
        self.in_edges[v].insert(u, weight);
        Ok(())
    }

    fn edge_weight(&self, u: usize, v: usize) -> Result<f64, GraphError> {
        self.check_pair(u, v)?;
        self.out_edges[u]
            .get(&v)
            .copied()
            .ok_or(GraphError::EdgeNotFound { from: u, to: v })
    }

    fn in_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.validate(v)?;
        Ok(self.in_edges[v].len())
    }

    fn out_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.validate(v)?;
        Ok(self.out_edges[v].len())
    }

    fn successors(&self, v: usize) -> Result<Vec<usize>, GraphError> {
        self.validate(v)?;
        Ok(self.out_edges[v].keys().copied().collect())
    }

    fn predecessors(&self, v: usize) -> Result<Vec<usize>, GraphError> {
        self.validate(v)?;
        Ok(self.in_edges[v].keys().copied().collect())
    }

    fn vertex_weight(&self, v: usize) -> Result<f64, GraphError> {
        self.validate(v)?;
        Ok(self.vertex_weights[v])
    }

    fn set_vertex_weight(&mut self, v: usize, weight: f64) -> Result<(), GraphError> {
        self.validate(v)?;
        self.vertex_weights[v] = weight;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_graph_has_no_edges() {
        let g = SparseGraph::with_vertices(5);
        assert_eq!(g.vertex_count(), 5);
        assert_eq!(g.edge_count(), 0);
        for v in 0..5 {
            assert_eq!(g.in_degree(v).expect("valid"), 0);
            assert_eq!(g.out_degree(v).expect("valid"), 0);
            assert_eq!(g.vertex_weight(v).expect("valid"), 1.0);
        }
    }

    #[test]
    fn add_edge_is_idempotent() {
        let mut g = SparseGraph::with_vertices(3);
        g.add_edge(0, 1).expect("add");
        g.add_edge(0, 1).expect("add again");
        assert_eq!(g.edge_count(), 1);
        assert!(g.has_edge(0, 1).expect("valid"));
        assert!(!g.has_edge(1, 0).expect("valid"), "directed");
        assert_eq!(g.edge_weight(0, 1).expect("exists"), DEFAULT_EDGE_WEIGHT);
    }

    #[test]
    fn self_loops_are_ignored() {
        let mut g = SparseGraph::with_vertices(2);
        g.add_edge(1, 1).expect("ignored");
        g.set_edge_weight(1, 1, 9.0).expect("ignored");
        assert_eq!(g.edge_count(), 0);
        assert!(!g.has_edge(1, 1).expect("valid"));
    }

    #[test]
    fn self_loop_on_invalid_vertex_still_errors() {
        let mut g = SparseGraph::with_vertices(2);
        assert!(g.add_edge(4, 4).is_err());
        assert!(g.set_edge_weight(4, 4, 1.0).is_err());
    }

    #[test]
    fn remove_restores_previous_state() {
        let mut g = SparseGraph::with_vertices(3);
        g.add_edge(2, 0).expect("add");
        g.remove_edge(2, 0).expect("remove");
        assert_eq!(g.edge_count(), 0);
        assert!(!g.has_edge(2, 0).expect("valid"));
        assert!(g.predecessors(0).expect("valid").is_empty());
        // Removing again is a no-op.
        g.remove_edge(2, 0).expect("remove absent");
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn set_weight_creates_then_overwrites() {
        let mut g = SparseGraph::with_vertices(2);
        g.set_edge_weight(0, 1, 3.5).expect("create");
        assert_eq!(g.edge_count(), 1);
        g.set_edge_weight(0, 1, 7.0).expect("overwrite");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(0, 1).expect("exists"), 7.0);
    }

    #[test]
    fn missing_edge_weight_is_an_error() {
        let g = SparseGraph::with_vertices(2);
        assert_eq!(
            g.edge_weight(0, 1),
            Err(GraphError::EdgeNotFound { from: 0, to: 1 })
        );
    }

    #[test]
    fn out_of_range_does_not_mutate() {
        let mut g = SparseGraph::with_vertices(2);
        assert!(g.add_edge(0, 2).is_err());
        assert!(g.set_edge_weight(3, 0, 1.0).is_err());
        assert!(g.remove_edge(0, 5).is_err());
        assert!(g.set_vertex_weight(2, 0.5).is_err());
        assert_eq!(g.edge_count(), 0);
        assert!(g.successors(0).expect("valid").is_empty());
    }

    #[test]
    fn neighbors_are_sorted_and_consistent() {
        let mut g = SparseGraph::with_vertices(4);
        g.add_edge(0, 3).expect("add");
        g.add_edge(0, 1).expect("add");
        g.add_edge(2, 1).expect("add");
        assert_eq!(g.successors(0).expect("valid"), vec![1, 3]);
        assert_eq!(g.predecessors(1).expect("valid"), vec![0, 2]);
        assert_eq!(g.in_degree(1).expect("valid"), 2);
        assert_eq!(g.out_degree(0).expect("valid"), 2);
    }

    #[test]
    fn vertex_weight_round_trip() {
        let mut g = SparseGraph::with_vertices(1);
        g.set_vertex_weight(0, 2.5).expect("valid");
        assert_eq!(g.vertex_weight(0).expect("valid"), 2.5);
    }
}
