//! Error types returned by the algorithms and the text format readers.

use std::io;

use crate::VertexId;

/// Precondition and resource failures reported by the algorithms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum GraphError {
    /// The graph has no vertices.
    #[error("graph has no vertices")]
    EmptyGraph,
    /// A vertex id passed to an algorithm is not present in the graph.
    #[error("vertex {0} is not in the graph")]
    NoSuchVertex(VertexId),
    /// `extract_min` was called on an empty priority queue.
    #[error("cannot extract from an empty priority queue")]
    QueueUnderflow,
    /// Recursive depth-first search went deeper than its configured limit.
    #[error("traversal depth exceeded {limit}; use the iterative variant")]
    TraversalDepthExceeded { limit: usize },
    /// A caller-supplied buffer does not match the matrix size.
    #[error("expected a vector of length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Errors that can occur while reading one of the graph text formats.  Line
/// numbers are 1-based.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The input ended before all announced lines were read.
    #[error("line {line}: unexpected end of input, expected {expected}")]
    MissingLine { line: usize, expected: &'static str },
    /// A line has the wrong number of tokens.
    #[error("line {line}: found {found} tokens, expected {expected}")]
    TokenCount {
        line: usize,
        found: usize,
        expected: &'static str,
    },
    /// A token could not be parsed as a number.
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
    /// The header line is well-formed but describes an unusable graph.
    #[error("line {line}: {reason}")]
    Header { line: usize, reason: String },
    /// A vertex id lies outside the range announced by the header, or is
    /// too large to be stored.
    #[error("line {line}: vertex {vertex} is out of range for {count} vertices")]
    VertexOutOfRange {
        line: usize,
        vertex: VertexId,
        count: usize,
    },
}

impl ParseError {
    /// The 1-based line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io(_) => None,
            ParseError::MissingLine { line, .. }
            | ParseError::TokenCount { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::Header { line, .. }
            | ParseError::VertexOutOfRange { line, .. } => Some(*line),
        }
    }
}
