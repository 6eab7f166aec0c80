//! Errors raised by the local-equivalence solver.

use gsc_common::GraphKind;
use thiserror::Error;

/// Reasons an equivalence test cannot be answered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquivError {
    /// Local-equivalence testing is only defined for qubit graph states.
    #[error("local equivalence needs qubit graph states, got a {0} graph")]
    NotQubit(GraphKind),

    /// The solution space is too large to enumerate.
    #[error("nullspace of dimension {dim} exceeds the limit of {max}")]
    BasisTooLarge {
        /// Dimension of the nullspace basis.
        dim: usize,
        /// Largest dimension that will be enumerated.
        max: usize,
    },
}
