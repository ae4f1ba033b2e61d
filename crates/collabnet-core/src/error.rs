//! Error types for graph operations and edge-list parsing.

use std::io;

/// Errors raised by the [`crate::Graph`] contract.
///
/// Every variant is raised before any state is touched, so a failed call
/// leaves the graph exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A vertex index outside `[0, vertex_count)` was supplied.
    #[error("invalid vertex {vertex}: must be in [0, {vertex_count})")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },

    /// The weight of an edge that does not exist was requested.
    #[error("edge not found: {from} -> {to}")]
    EdgeNotFound { from: usize, to: usize },

    /// A graph was requested with a negative number of vertices.
    #[error("vertex count cannot be negative: {0}")]
    NegativeVertexCount(i64),
}

/// Errors raised while reading the CSV edge-list interchange format.
///
/// Line numbers are 1-based and count physical lines, header included.
#[derive(Debug, thiserror::Error)]
pub enum EdgeListError {
    /// Underlying reader failed.
    #[error("edge list I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record had fewer than the three mandatory columns.
    #[error("line {line}: expected at least 3 columns, found {found}")]
    MissingColumns { line: usize, found: usize },

    /// The weight column is not a finite number.
    #[error("line {line}: invalid weight {value:?}")]
    InvalidWeight { line: usize, value: String },

    /// The count column is not a non-negative integer.
    #[error("line {line}: invalid count {value:?}")]
    InvalidCount { line: usize, value: String },

    /// A `tag:count` entry in the tags column could not be parsed.
    #[error("line {line}: invalid tag entry {value:?}")]
    InvalidTag { line: usize, value: String },

    /// The CSV reader rejected the input (invalid UTF-8 and the like).
    #[error("line {line}: malformed CSV: {message}")]
    Malformed { line: usize, message: String },
}

impl From<csv::Error> for EdgeListError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, crate::edges::position_line);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            _ => Self::Malformed { line, message },
        }
    }
}
