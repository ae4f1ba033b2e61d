//! Adjacency-matrix backend.

use super::{DEFAULT_EDGE_WEIGHT, DEFAULT_VERTEX_WEIGHT, Graph};
use crate::error::GraphError;

/// Adjacency-matrix graph: a row-major `N × N` grid of optional weights,
/// `None` meaning "no edge".
///
/// Edge lookup is `O(1)`; degrees and neighbor enumeration scan a full row
/// or column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DenseGraph {
    cells: Vec<Option<f64>>,
    vertex_weights: Vec<f64>,
    edge_count: usize,
}

impl DenseGraph {
    const fn cell(&self, u: usize, v: usize) -> usize {
        u * self.vertex_weights.len() + v
    }

    fn check_pair(&self, u: usize, v: usize) -> Result<(), GraphError> {
        self.validate(u)?;
        self.validate(v)
    }

    fn row(&self, u: usize) -> &[Option<f64>] {
        let n = self.vertex_count();
        &self.cells[u * n..(u + 1) * n]
    }

    fn column(&self, v: usize) -> impl Iterator<Item = (usize, Option<f64>)> + '_ {
        (0..self.vertex_count()).map(move |u| (u, self.cells[self.cell(u, v)]))
    }
}

impl Graph for DenseGraph {
    fn with_vertices(vertex_count: usize) -> Self {
        Self {
            cells: vec![None; vertex_count * vertex_count],
            vertex_weights: vec![DEFAULT_VERTEX_WEIGHT; vertex_count],
            edge_count: 0,
        }
    }

    fn vertex_count(&self) -> usize {
        self.vertex_weights.len()
    }

    fn edge_count(&self) -> usize {
        self.edge_count
    }

    fn has_edge(&self, u: usize, v: usize) -> Result<bool, GraphError> {
        self.check_pair(u, v)?;
        Ok(self.cells[self.cell(u, v)].is_some())
    }

    fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        self.check_pair(u, v)?;
        let idx = self.cell(u, v);
        if u == v || self.cells[idx].is_some() {
            return Ok(());
        }
        self.cells[idx] = Some(DEFAULT_EDGE_WEIGHT);
        self.edge_count += 1;
        Ok(())
    }

    fn remove_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        self.check_pair(u, v)?;
        let idx = self.cell(u, v);
        if self.cells[idx].take().is_some() {
            self.edge_count -= 1;
        }
        Ok(())
    }

    fn set_edge_weight(&mut self, u: usize, v: usize, weight: f64) -> Result<(), GraphError> {
        self.check_pair(u, v)?;
        if u == v {
            return Ok(());
        }
        let idx = self.cell(u, v);
        if self.cells[idx].replace(weight).is_none() {
            self.edge_count += 1;
        }
        Ok(())
    }

    fn edge_weight(&self, u: usize, v: usize) -> Result<f64, GraphError> {
        self.check_pair(u, v)?;
        self.cells[self.cell(u, v)].ok_or(GraphError::EdgeNotFound { from: u, to: v })
    }

    fn in_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.validate(v)?;
        Ok(self.column(v).filter(|(_, w)| w.is_some()).count())
    }

    fn out_degree(&self, v: usize) -> Result<usize, GraphError> {
        self.validate(v)?;
        Ok(self.row(v).iter().filter(|w| w.is_some()).count())
    }

    fn successors(&self, v: usize) -> Result<Vec<usize>, GraphError> {
        self.validate(v)?;
        Ok(self
            .row(v)
            .iter()
            .enumerate()
            .filter_map(|(w, cell)| cell.map(|_| w))
            .collect())
    }

    fn predecessors(&self, v: usize) -> Result<Vec<usize>, GraphError> {
        self.validate(v)?;
        Ok(self
            .column(v)
            .filter_map(|(u, cell)| cell.map(|_| u))
            .collect())
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
    fn empty_matrix() {
        let g = DenseGraph::with_vertices(0);
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.has_edge(0, 0).is_err());
    }

    #[test]
    fn add_remove_round_trip() {
        let mut g = DenseGraph::with_vertices(3);
        g.add_edge(0, 2).expect("add");
        g.add_edge(0, 2).expect("add again");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.successors(0).expect("valid"), vec![2]);
        assert_eq!(g.predecessors(2).expect("valid"), vec![0]);

        g.remove_edge(0, 2).expect("remove");
        assert_eq!(g.edge_count(), 0);
        assert!(!g.has_edge(0, 2).expect("valid"));
    }

    #[test]
    fn self_loops_are_ignored() {
        let mut g = DenseGraph::with_vertices(2);
        g.add_edge(0, 0).expect("ignored");
        g.set_edge_weight(0, 0, 4.0).expect("ignored");
        assert_eq!(g.edge_count(), 0);
        assert!(!g.has_edge(0, 0).expect("valid"));
    }

    #[test]
    fn set_weight_counts_only_new_edges() {
        let mut g = DenseGraph::with_vertices(3);
        g.set_edge_weight(1, 2, 0.25).expect("create");
        g.set_edge_weight(1, 2, 0.75).expect("overwrite");
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edge_weight(1, 2).expect("exists"), 0.75);
        assert_eq!(
            g.edge_weight(2, 1),
            Err(GraphError::EdgeNotFound { from: 2, to: 1 })
        );
    }

    #[test]
    fn degrees_scan_rows_and_columns() {
        let mut g = DenseGraph::with_vertices(4);
        g.add_edge(0, 1).expect("add");
        g.add_edge(2, 1).expect("add");
        g.add_edge(1, 3).expect("add");
        assert_eq!(g.in_degree(1).expect("valid"), 2);
        assert_eq!(g.out_degree(1).expect("valid"), 1);
        assert_eq!(g.in_degree(0).expect("valid"), 0);
        assert!(g.in_degree(4).is_err());
    }

    #[test]
    fn rows_do_not_bleed_into_each_other() {
        // Cell (0, 2) and cell (1, 0) are adjacent in row-major storage.
        let mut g = DenseGraph::with_vertices(3);
        g.add_edge(0, 2).expect("add");
        assert!(g.successors(1).expect("valid").is_empty());
        assert_eq!(g.predecessors(0).expect("valid"), Vec::<usize>::new());
    }
}
