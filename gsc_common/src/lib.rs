//! Shared graph-state model for the gsc workspace.
//!
//! A [`GraphState`] is an immutable weighted graph over a prime-power
//! alphabet. Every transformation in the workspace goes through
//! [`GraphState::modify`], which hands out a private copy, so values stored
//! elsewhere are never corrupted.

mod error;
mod graph_state;
mod kind;
mod vertex;

pub use crate::error::GraphStateError;
pub use crate::graph_state::{Editor, GraphState, WeightedEdge};
pub use crate::kind::{GraphKind, is_prime};
pub use crate::vertex::Vertex;
