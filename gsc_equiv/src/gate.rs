//! Single-qubit local Clifford gates, up to Pauli corrections.

use std::fmt;

use serde::Serialize;

/// One of the six single-qubit Clifford classes modulo Paulis. Each is a
/// distinct invertible 2x2 binary matrix `[[a, b], [c, d]]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Gate {
    /// Identity.
    I,
    /// Hadamard.
    H,
    /// Phase gate.
    S,
    /// `H` after `S`.
    HS,
    /// `S` after `H`.
    SH,
    /// `H` then `S` then `H`.
    HSH,
}

impl Gate {
    /// Every gate, in matrix search order.
    pub const ALL: [Self; 6] = [Self::I, Self::H, Self::S, Self::HS, Self::SH, Self::HSH];

    /// The `(a, b, c, d)` entries of the gate's binary matrix.
    #[must_use]
    pub const fn symplectic(self) -> [bool; 4] {
        match self {
            Self::I => [true, false, false, true],
            Self::H => [false, true, true, false],
            Self::S => [true, false, true, true],
            Self::HS => [true, true, true, false],
            Self::SH => [false, true, true, true],
            Self::HSH => [true, true, false, true],
        }
    }

    /// The gate with binary matrix `(a, b, c, d)`, or `None` when the matrix
    /// is singular.
    #[must_use]
    pub fn from_symplectic(block: [bool; 4]) -> Option<Self> {
        Self::ALL.into_iter().find(|gate| gate.symplectic() == block)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
