//! Local-Clifford equivalence of qubit graph states.
//!
//! [`are_lc_equiv`] reduces the question to a linear system over GF(2)
//! ([`gf2`]) and reports every witnessing assignment of [`Gate`]s.

mod config;
mod error;
mod gate;
pub mod gf2;
mod solver;

pub use crate::config::{EquivConfig, MAX_SPAN_DIM};
pub use crate::error::EquivError;
pub use crate::gate::Gate;
pub use crate::solver::{LcEquivalence, are_lc_equiv};
