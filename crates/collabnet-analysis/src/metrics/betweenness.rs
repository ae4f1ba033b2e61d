//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a vertex lies on shortest
//! paths between other pairs of vertices. High-betweenness identities are
//! brokers: removing them would lengthen or cut communication between
//! parts of the network.
//!
//! # Algorithm
//!
//! Brandes' algorithm (2001) for unweighted graphs:
//!
//! 1. For each source vertex `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest first).
//! 3. Sum the dependency scores across all sources.
//!
//! Complexity: O(V * E).
//!
//! # Output
//!
//! Scores are **not** normalized. Callers can divide by `(n-1)*(n-2)` for
//! directed graphs.
//!
//! [`edge_betweenness`] runs the same accumulation over the symmetrized
//! adjacency and credits each dependency to the edge between a vertex and
//! its BFS predecessor instead of to the vertex. It drives Girvan–Newman.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use collabnet_core::{Graph, GraphError};
use tracing::instrument;

use super::VertexScores;

/// Undirected edge key, always `(low, high)`.
pub type UndirectedEdge = (usize, usize);

/// Compute directed, unweighted betweenness centrality for every vertex.
///
/// Isolated vertices and vertices on no shortest path score 0.0.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph), fields(n = graph.vertex_count()))]
pub fn betweenness_centrality<G: Graph + ?Sized>(graph: &G) -> Result<VertexScores, GraphError> {
    let n = graph.vertex_count();

    let mut adjacency: Vec<Vec<usize>> = Vec::with_capacity(n);
    for v in 0..n {
        adjacency.push(graph.successors(v)?);
    }

    // Vertex-indexed betweenness accumulator.
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in 0..n {
        let search = shortest_paths(s, n, |v| adjacency[v].iter().copied());

        let mut delta: Vec<f64> = vec![0.0; n];
        for &w in search.order.iter().rev() {
            for &v in &search.predecessors[w] {
                delta[v] += (search.sigma[v] / search.sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                cb[w] += delta[w];
            }
        }
    }

    Ok(cb.into_iter().enumerate().collect())
}

/// Compute edge betweenness over the graph's undirected projection.
///
/// Every directed edge `u → v` contributes the undirected edge
/// `(min(u, v), max(u, v))`.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph), fields(n = graph.vertex_count()))]
pub fn edge_betweenness<G: Graph + ?Sized>(
    graph: &G,
) -> Result<BTreeMap<UndirectedEdge, f64>, GraphError> {
    Ok(undirected_edge_betweenness(&symmetrize(graph)?))
}

/// Build the symmetrized neighbor sets of `graph`.
///
/// # Errors
///
/// Only propagates backend errors.
pub fn symmetrize<G: Graph + ?Sized>(graph: &G) -> Result<Vec<BTreeSet<usize>>, GraphError> {
    let n = graph.vertex_count();
    let mut adjacency = vec![BTreeSet::new(); n];
    for u in 0..n {
        for v in graph.successors(u)? {
            adjacency[u].insert(v);
            adjacency[v].insert(u);
        }
    }
    Ok(adjacency)
}

/// Edge betweenness over explicit undirected neighbor sets.
///
/// Each unordered pair is reached from both of its endpoints as a source,
/// so an edge's score counts both directions of travel. Every edge present
/// in `adjacency` has an entry, even when its score is 0.
#[must_use]
pub fn undirected_edge_betweenness(adjacency: &[BTreeSet<usize>]) -> BTreeMap<UndirectedEdge, f64> {
    let n = adjacency.len();
    let mut scores: BTreeMap<UndirectedEdge, f64> = BTreeMap::new();
    for (u, neighbors) in adjacency.iter().enumerate() {
        for &v in neighbors.range(u + 1..) {
            scores.insert((u, v), 0.0);
        }
    }

    for s in 0..n {
        let search = shortest_paths(s, n, |v| adjacency[v].iter().copied());

        let mut delta: Vec<f64> = vec![0.0; n];
        for &w in search.order.iter().rev() {
            for &v in &search.predecessors[w] {
                let c = (search.sigma[v] / search.sigma[w]) * (1.0 + delta[w]);
                if let Some(score) = scores.get_mut(&(v.min(w), v.max(w))) {
                    *score += c;
                }
                delta[v] += c;
            }
        }
    }

    scores
}

// ---------------------------------------------------------------------------
// Single-source BFS shared by both accumulations
// ---------------------------------------------------------------------------

struct ShortestPaths {
    /// Vertices in BFS discovery order, source first.
    order: Vec<usize>,
    /// `predecessors[w]`: vertices immediately preceding `w` on shortest paths.
    predecessors: Vec<Vec<usize>>,
    /// `sigma[t]`: number of shortest paths from the source to `t`.
    sigma: Vec<f64>,
}

fn shortest_paths<I>(s: usize, n: usize, neighbors: impl Fn(usize) -> I) -> ShortestPaths
where
    I: Iterator<Item = usize>,
{
    let mut order = Vec::with_capacity(n);
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma: Vec<f64> = vec![0.0; n];
    sigma[s] = 1.0;
    let mut dist: Vec<Option<usize>> = vec![None; n];
    dist[s] = Some(0);

    let mut queue = VecDeque::from([s]);
    while let Some(v) = queue.pop_front() {
        order.push(v);
        let dv = dist[v].unwrap_or_default();

        for w in neighbors(v) {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(dv + 1) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    ShortestPaths {
        order,
        predecessors,
        sigma,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use collabnet_core::{DenseGraph, SparseGraph};

    #[test]
    fn empty_graph() {
        assert!(betweenness_centrality(&SparseGraph::with_vertices(0)).expect("ok").is_empty());
        assert!(edge_betweenness(&SparseGraph::with_vertices(0)).expect("ok").is_empty());
    }

    #[test]
    fn directed_chain_middle_is_broker() {
        // 0 → 1 → 2: only the pair (0, 2) routes through 1.
        let mut g = SparseGraph::with_vertices(3);
        g.add_edge(0, 1).expect("add");
        g.add_edge(1, 2).expect("add");
        let bc = betweenness_centrality(&g).expect("ok");
        assert!(bc[&0].abs() < 1e-12);
        assert!((bc[&1] - 1.0).abs() < 1e-12);
        assert!(bc[&2].abs() < 1e-12);
    }

    #[test]
    fn diamond_splits_paths() {
        // 0 → 1 → 3, 0 → 2 → 3: two shortest paths 0 ⇝ 3, each middle gets 0.5.
        let mut g = DenseGraph::with_vertices(4);
        for (u, v) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            g.add_edge(u, v).expect("add");
        }
        let bc = betweenness_centrality(&g).expect("ok");
        assert!((bc[&1] - 0.5).abs() < 1e-12);
        assert!((bc[&2] - 0.5).abs() < 1e-12);
        assert!(bc[&0].abs() < 1e-12);
        assert!(bc[&3].abs() < 1e-12);
    }

    #[test]
    fn undirected_path_edge_scores() {
        // 0 - 1 - 2 (built from one-way edges, symmetrized).
        // Pairs using (0,1): {0,1}, {0,2} → 2 per direction → 4.
        // Pairs using (1,2): {1,2}, {0,2} → 4.
        let mut g = SparseGraph::with_vertices(3);
        g.add_edge(0, 1).expect("add");
        g.add_edge(2, 1).expect("add");
        let eb = edge_betweenness(&g).expect("ok");
        assert_eq!(eb.len(), 2);
        assert!((eb[&(0, 1)] - 4.0).abs() < 1e-12);
        assert!((eb[&(1, 2)] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn bridge_edge_dominates() {
        // Two triangles {0,1,2} and {3,4,5} joined by 2 - 3.
        let mut g = SparseGraph::with_vertices(6);
        for (u, v) in [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)] {
            g.add_edge(u, v).expect("add");
        }
        let eb = edge_betweenness(&g).expect("ok");
        let (&best, _) = eb
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .expect("non-empty");
        assert_eq!(best, (2, 3));
        // 3 × 3 pairs cross the bridge, counted from both sides.
        assert!((eb[&(2, 3)] - 18.0).abs() < 1e-12);
    }

    #[test]
    fn reciprocal_edges_collapse_to_one_key() {
        let mut g = DenseGraph::with_vertices(2);
        g.add_edge(0, 1).expect("add");
        g.add_edge(1, 0).expect("add");
        let adjacency = symmetrize(&g).expect("ok");
        assert_eq!(adjacency[0].len(), 1);
        assert_eq!(adjacency[1].len(), 1);
        let eb = undirected_edge_betweenness(&adjacency);
        assert_eq!(eb.len(), 1);
        assert!((eb[&(0, 1)] - 2.0).abs() < 1e-12);
    }
}
