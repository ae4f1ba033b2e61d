//! Girvan–Newman community detection and bridging ties.
//!
//! # Algorithm
//!
//! Starting from the symmetrized adjacency of the input graph (a private
//! copy, so the caller's graph is never touched), repeat up to
//! `max_splits` times:
//!
//! 1. Compute edge betweenness for every remaining undirected edge.
//! 2. Remove the edge with the highest score.
//!
//! Iteration stops early once no edges remain. The communities are the
//! connected components of whatever adjacency is left.
//!
//! # Tie-breaking
//!
//! Scores within [`SCORE_EPSILON`] of each other are treated as equal and
//! the lowest `(u, v)` pair wins. This makes the removal sequence, and so
//! the partition, reproducible across runs and backends.
//!
//! # Bridging ties
//!
//! [`bridging_ties`] walks the **original** directed graph and reports
//! every edge whose endpoints landed in different communities.

use std::collections::{BTreeSet, VecDeque};

use collabnet_core::{Graph, GraphError};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::metrics::betweenness::{UndirectedEdge, symmetrize, undirected_edge_betweenness};

/// Edge-betweenness scores closer than this are considered tied.
pub const SCORE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// A community partition of the vertex set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    /// Communities, each sorted ascending, ordered by their lowest member.
    pub communities: Vec<Vec<usize>>,
    /// `membership[v]`: index into `communities`, `None` if `v` is unassigned.
    pub membership: Vec<Option<usize>>,
    /// Edges removed by Girvan–Newman, in removal order, with their score.
    pub removed: Vec<(UndirectedEdge, f64)>,
}

impl Partition {
    /// Build a partition from explicit communities over `vertex_count`
    /// vertices. Vertices not listed are left unassigned; out-of-range
    /// members are ignored.
    #[must_use]
    pub fn from_communities(vertex_count: usize, communities: Vec<Vec<usize>>) -> Self {
        let mut membership = vec![None; vertex_count];
        for (id, members) in communities.iter().enumerate() {
            for &v in members {
                if let Some(slot) = membership.get_mut(v) {
                    *slot = Some(id);
                }
            }
        }
        Self {
            communities,
            membership,
            removed: Vec::new(),
        }
    }

    /// Number of communities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    /// Whether the partition has no communities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Community of `v`, if any.
    #[must_use]
    pub fn community_of(&self, v: usize) -> Option<usize> {
        self.membership.get(v).copied().flatten()
    }

    /// Community sizes in community order.
    #[must_use]
    pub fn sizes(&self) -> Vec<usize> {
        self.communities.iter().map(Vec::len).collect()
    }
}

// ---------------------------------------------------------------------------
// Girvan–Newman
// ---------------------------------------------------------------------------

/// Detect communities by removing up to `max_splits` highest-betweenness
/// edges.
///
/// With `max_splits = 0` the result is the weakly connected components of
/// `graph`.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph), fields(n = graph.vertex_count(), m = graph.edge_count()))]
pub fn girvan_newman<G: Graph + ?Sized>(
    graph: &G,
    max_splits: usize,
) -> Result<Partition, GraphError> {
    let mut adjacency = symmetrize(graph)?;
    let mut removed = Vec::new();

    for split in 0..max_splits {
        let scores = undirected_edge_betweenness(&adjacency);

        let mut best: Option<(UndirectedEdge, f64)> = None;
        for (&edge, &score) in &scores {
            match best {
                Some((_, top)) if score <= top + SCORE_EPSILON => {}
                _ => best = Some((edge, score)),
            }
        }

        let Some(((u, v), score)) = best else {
            debug!(split, "no edges left");
            break;
        };

        adjacency[u].remove(&v);
        adjacency[v].remove(&u);
        removed.push(((u, v), score));
        debug!(split, u, v, score, "removed edge");
    }

    let components = connected_components(&adjacency);
    let mut partition = Partition::from_communities(graph.vertex_count(), components);
    partition.removed = removed;
    debug!(communities = partition.len(), "girvan-newman done");
    Ok(partition)
}

/// Connected components of undirected neighbor sets, by BFS from each
/// unvisited vertex in ascending order. Members are sorted ascending.
#[must_use]
pub fn connected_components(adjacency: &[BTreeSet<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            component.push(u);
            for &v in &adjacency[u] {
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }

    components
}

// ---------------------------------------------------------------------------
// Bridging ties
// ---------------------------------------------------------------------------

/// A directed edge crossing between two communities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BridgingTie {
    pub source: usize,
    pub target: usize,
    pub source_community: usize,
    pub target_community: usize,
}

/// Every directed edge of `graph` whose endpoints belong to different
/// communities of `partition`. Vertices without a community are skipped.
///
/// Ties come out ordered by source, then successor order.
///
/// # Errors
///
/// Only propagates backend errors.
#[instrument(skip(graph, partition), fields(communities = partition.len()))]
pub fn bridging_ties<G: Graph + ?Sized>(
    graph: &G,
    partition: &Partition,
) -> Result<Vec<BridgingTie>, GraphError> {
    let mut ties = Vec::new();
    for u in 0..graph.vertex_count() {
        let Some(cu) = partition.community_of(u) else {
            continue;
        };
        for v in graph.successors(u)? {
            if let Some(cv) = partition.community_of(v)
                && cu != cv
            {
                ties.push(BridgingTie {
                    source: u,
                    target: v,
                    source_community: cu,
                    target_community: cv,
                });
            }
        }
    }
    Ok(ties)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
