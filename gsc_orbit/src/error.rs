//! Error types for local operations and orbit exploration.

use gsc_canon::CanonError;
use gsc_common::{GraphKind, Vertex};
use thiserror::Error;

/// Errors raised when a local operation cannot act on a graph state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    /// The operation is not defined for the graph's `(p, m)`.
    #[error("{op} does not apply to a {kind} graph")]
    Inapplicable {
        /// Operation label.
        op: String,
        /// Kind of the graph it was applied to.
        kind: GraphKind,
    },

    /// The vertex is not part of the graph.
    #[error("vertex {0} is not in the graph")]
    UnknownVertex(Vertex),

    /// A plain vertex was given where a `(family, member)` vertex is needed.
    #[error("{op} needs a (family, member) vertex, got {vertex}")]
    MalformedVertex {
        /// Operation label.
        op: String,
        /// Offending vertex.
        vertex: Vertex,
    },

    /// An operation parameter outside its valid range.
    #[error("parameter {value} of {op} must lie in [{min}, {max})")]
    ParameterOutOfRange {
        /// Operation label.
        op: String,
        /// Offending value.
        value: u32,
        /// Inclusive lower bound.
        min: u32,
        /// Exclusive upper bound.
        max: u32,
    },
}

/// Errors that stop an exploration before or while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExploreError {
    /// Orbits are only defined for connected `m = 1` seeds.
    #[error("seed graph must be connected")]
    Disconnected,

    /// An operation rejected its input.
    #[error("local operation failed: {0}")]
    Op(#[from] OpError),

    /// The canonical form could not be computed.
    #[error("canonicalization failed: {0}")]
    Canon(#[from] CanonError),
}
