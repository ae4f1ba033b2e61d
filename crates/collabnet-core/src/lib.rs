#![forbid(unsafe_code)]
//! collabnet-core library.
//!
//! In-memory graph engine for repository collaboration networks: the
//! [`Graph`] contract with its sparse and dense backends, the login ↔ vertex
//! [`IdentityMap`], the aggregated edge-list interchange, and the GEXF
//! topology export.
//!
//! # Conventions
//!
//! - **Errors**: graph operations return [`GraphError`]; edge-list parsing
//!   returns [`EdgeListError`]; file-level glue uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod edges;
pub mod error;
pub mod export;
pub mod graph;
pub mod identity;
pub mod load;

pub use edges::{AggregatedEdge, EdgeList, InteractionKind, RawEdge};
pub use error::{EdgeListError, GraphError};
pub use graph::{DenseGraph, Graph, SparseGraph};
pub use identity::IdentityMap;
pub use load::GraphData;
