//! Errors raised by the canonicalization layer.

use gsc_common::GraphStateError;
use thiserror::Error;

/// Failures while encoding a graph state or building an oracle input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonError {
    /// A partition scheme name other than `member` or `family`.
    #[error("unknown partition scheme {0:?}, choose from 'member' or 'family'")]
    UnknownPartition(String),

    /// An edge endpoint or colour member is not below the vertex count.
    #[error("vertex {vertex} out of range for a graph on {n} vertices")]
    VertexOutOfRange {
        /// Offending index.
        vertex: usize,
        /// Number of vertices of the coloured graph.
        n: usize,
    },

    /// An edge connects a vertex to itself.
    #[error("self-loop on vertex {0}")]
    SelfLoop(usize),

    /// The colour classes are not a partition of the vertex set.
    #[error("vertex {0} is not covered exactly once by the colouring")]
    MalformedColoring(usize),

    /// The graph state itself rejected a derived value.
    #[error(transparent)]
    GraphState(#[from] GraphStateError),
}

impl CanonError {
    /// Create an unknown partition error.
    pub fn unknown_partition(name: impl Into<String>) -> Self {
        Self::UnknownPartition(name.into())
    }
}
