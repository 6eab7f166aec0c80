//! Canonical forms of graph states.
//!
//! Graph states are encoded as vertex-coloured simple graphs ([`encoding`])
//! and handed to an injected [`CanonicalOracle`]. The [`CanonicalBridge`]
//! turns the oracle's answers into a [`CanonicalForm`] used as the
//! deduplication key of the orbit search, and into the representative vertex
//! of every automorphism orbit worth acting on.
//!
//! [`RefinementOracle`] is a self-contained oracle suitable for the small
//! graphs this workspace targets; other engines plug in through the trait.

mod bridge;
pub mod encoding;
mod error;
mod oracle;
mod refine;

pub use crate::bridge::{CanonicalBridge, CanonicalForm, RepresentativePartition};
pub use crate::encoding::Partition;
pub use crate::error::CanonError;
pub use crate::oracle::{Canonical, CanonicalOracle, Certificate, ColoredGraph};
pub use crate::refine::RefinementOracle;
