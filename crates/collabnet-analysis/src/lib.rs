#![forbid(unsafe_code)]
//! collabnet-analysis library.
//!
//! Network-science metrics over a [`collabnet_core::Graph`]:
//!
//! - [`metrics`]: degree, closeness, PageRank, and betweenness centrality.
//! - [`structure`]: density, average clustering, degree assortativity.
//! - [`stats`]: one-shot summary statistics.
//! - [`community`]: Girvan–Newman community detection and bridging ties.
//! - [`report`]: the full analysis, translated back to logins.
//!
//! # Conventions
//!
//! - **Purity**: every metric borrows the graph immutably and returns a
//!   fresh result. Community detection works on a private copy.
//! - **Errors**: metrics propagate [`collabnet_core::GraphError`]; config
//!   and report glue use `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod community;
pub mod config;
pub mod metrics;
pub mod report;
pub mod stats;
pub mod structure;

pub use community::{BridgingTie, Partition, bridging_ties, girvan_newman};
pub use config::{AnalysisConfig, Backend};
pub use metrics::{VertexScores, pagerank::PageRankConfig};
pub use report::AnalysisReport;
pub use stats::GraphStats;
pub use structure::AssortativityPattern;
