//! Construction and validation errors for graph states.

use thiserror::Error;

use crate::{GraphKind, Vertex};

/// Errors raised while building or validating a [`crate::GraphState`].
///
/// All of these are deterministic functions of the input and recur
/// identically on retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphStateError {
    /// The supplied dimension base is not a prime number.
    #[error("graph state dimension must be prime, got p = {0}")]
    NotPrime(u32),

    /// A prime-power graph was requested with `m = 0`.
    #[error("prime power must be at least 1")]
    ZeroPower,

    /// An edge weight lies outside `[0, p)`.
    #[error("edge {u}-{v} has weight {weight}, weights must satisfy 0 <= w < {prime}")]
    WeightOutOfRange {
        /// First endpoint.
        u: Vertex,
        /// Second endpoint.
        v: Vertex,
        /// Offending weight.
        weight: u32,
        /// The graph's prime.
        prime: u32,
    },

    /// An edge connects a vertex to itself.
    #[error("self-loop on vertex {0}")]
    SelfLoop(Vertex),

    /// A vertex of the wrong shape for the graph kind, e.g. a plain vertex in
    /// a prime-power graph.
    #[error("vertex {vertex} does not fit a {kind} graph")]
    VertexKindMismatch {
        /// Offending vertex.
        vertex: Vertex,
        /// Kind of the graph it was offered to.
        kind: GraphKind,
    },

    /// A `(family, member)` vertex whose member index is not below `m`.
    #[error("vertex {vertex} has member index >= power {power}")]
    MemberOutOfRange {
        /// Offending vertex.
        vertex: Vertex,
        /// The graph's power.
        power: u32,
    },

    /// A relabeling mapped two vertices onto one.
    #[error("relabeling is not injective: {0} is hit twice")]
    NonInjectiveRelabel(Vertex),

    /// An operation is restricted to another kind of graph.
    #[error("operation requires a {expected} graph, got {actual}")]
    UnsupportedKind {
        /// Human-readable requirement, e.g. `"qubit"`.
        expected: &'static str,
        /// Kind of the graph that was supplied.
        actual: GraphKind,
    },
}
