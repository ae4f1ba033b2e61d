//! Full analysis of one interaction graph, translated back to logins.
//!
//! [`AnalysisReport::build`] runs every metric in one pass:
//!
//! 1. Graph statistics.
//! 2. Centrality rankings (PageRank, closeness, betweenness, degree).
//! 3. Cohesion (density, average clustering, assortativity).
//! 4. Girvan–Newman communities and the bridging ties between them.
//!
//! Vertex indices never leave this module; every identity in the report is
//! a login.

use anyhow::{Context, Result};
use collabnet_core::{Graph, GraphData, IdentityMap};
use serde::Serialize;
use tracing::{info, instrument};

use crate::community::{bridging_ties, girvan_newman};
use crate::config::AnalysisConfig;
use crate::metrics::{
    VertexScores, betweenness::betweenness_centrality, closeness::closeness_centrality,
    degree::degree_centrality, pagerank::pagerank, top_k,
};
use crate::stats::GraphStats;
use crate::structure::{AssortativityPattern, assortativity, average_clustering, density};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One entry in a centrality ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedIdentity {
    pub login: String,
    pub score: f64,
}

/// Top identities per centrality metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    pub pagerank: Vec<RankedIdentity>,
    pub closeness: Vec<RankedIdentity>,
    pub betweenness: Vec<RankedIdentity>,
    pub degree: Vec<RankedIdentity>,
}

/// PageRank run metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRankRun {
    pub iterations: usize,
    pub converged: bool,
}

/// Whole-graph cohesion scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cohesion {
    pub density: f64,
    pub average_clustering: f64,
    pub assortativity: f64,
    pub pattern: AssortativityPattern,
}

/// A bridging tie with both endpoints named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedBridge {
    pub source: String,
    pub target: String,
    pub source_community: usize,
    pub target_community: usize,
}

/// Community detection outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySummary {
    /// Split budget Girvan–Newman was given.
    pub max_splits: usize,
    /// Edges actually removed (fewer than `max_splits` if edges ran out).
    pub edges_removed: usize,
    pub count: usize,
    /// Member count per community, in community order.
    pub sizes: Vec<usize>,
    /// Members of each community as logins.
    pub members: Vec<Vec<String>>,
    pub bridging_ties: Vec<NamedBridge>,
}

/// Everything `cnet analyze` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub stats: GraphStats,
    pub top_k: usize,
    pub rankings: Rankings,
    pub pagerank: PageRankRun,
    pub cohesion: Cohesion,
    pub communities: CommunitySummary,
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

impl AnalysisReport {
    /// Run the full analysis over `data` with `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if any metric fails on the graph, or if a vertex has
    /// no login in the identity map.
    #[instrument(
        skip(data, config),
        fields(n = data.graph.vertex_count(), m = data.graph.edge_count())
    )]
    pub fn build<G: Graph>(data: &GraphData<G>, config: &AnalysisConfig) -> Result<Self> {
        let graph = &data.graph;
        let ids = &data.identities;
        let k = config.report.top_k;

        let stats = GraphStats::compute(graph).context("computing graph statistics")?;

        let pr = pagerank(graph, &config.pagerank).context("computing PageRank")?;
        let rankings = Rankings {
            pagerank: ranked(&pr.scores, k, ids)?,
            closeness: ranked(
                &closeness_centrality(graph).context("computing closeness")?,
                k,
                ids,
            )?,
            betweenness: ranked(
                &betweenness_centrality(graph).context("computing betweenness")?,
                k,
                ids,
            )?,
            degree: ranked(&degree_centrality(graph).context("computing degree")?, k, ids)?,
        };

        let r = assortativity(graph).context("computing assortativity")?;
        let cohesion = Cohesion {
            density: density(graph),
            average_clustering: average_clustering(graph).context("computing clustering")?,
            assortativity: r,
            pattern: AssortativityPattern::from_coefficient(r),
        };

        let max_splits = config.community.max_splits;
        let partition = girvan_newman(graph, max_splits).context("detecting communities")?;
        let ties = bridging_ties(graph, &partition).context("finding bridging ties")?;

        let members = partition
            .communities
            .iter()
            .map(|community| community.iter().map(|&v| login(ids, v)).collect())
            .collect::<Result<Vec<Vec<String>>>>()?;
        let bridging_ties = ties
            .iter()
            .map(|tie| {
                Ok(NamedBridge {
                    source: login(ids, tie.source)?,
                    target: login(ids, tie.target)?,
                    source_community: tie.source_community,
                    target_community: tie.target_community,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let communities = CommunitySummary {
            max_splits,
            edges_removed: partition.removed.len(),
            count: partition.len(),
            sizes: partition.sizes(),
            members,
            bridging_ties,
        };

        info!(
            communities = communities.count,
            bridges = communities.bridging_ties.len(),
            pagerank_iterations = pr.iterations,
            "analysis complete"
        );

        Ok(Self {
            stats,
            top_k: k,
            rankings,
            pagerank: PageRankRun {
                iterations: pr.iterations,
                converged: pr.converged,
            },
            cohesion,
            communities,
        })
    }
}

/// Top `k` of `scores` as logins. Identity maps assign vertices in login
/// order, so the index tie-break in [`top_k`] is a login tie-break.
fn ranked(scores: &VertexScores, k: usize, ids: &IdentityMap) -> Result<Vec<RankedIdentity>> {
    top_k(scores, k)
        .into_iter()
        .map(|(v, score)| {
            Ok(RankedIdentity {
                login: login(ids, v)?,
                score,
            })
        })
        .collect()
}

fn login(ids: &IdentityMap, v: usize) -> Result<String> {
    ids.login(v)
        .map(str::to_owned)
        .with_context(|| format!("vertex {v} has no login"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
