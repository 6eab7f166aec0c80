//! Orbit exploration of graph states under local operations.
//!
//! [`ops`] holds the local-operation library. [`OrbitExplorer`] runs a
//! deduplicated search from a seed graph state, keyed by the canonical forms
//! of [`gsc_canon`], and records every class it finds in a [`ClassGraph`].

mod class_graph;
mod config;
mod error;
mod explorer;
pub mod ops;
mod progress;

pub use crate::class_graph::{ClassEdge, ClassGraph, ClassNode, EdgeList, EdgeRecord, NodeRecord};
pub use crate::config::{ExploreConfig, SearchOrder};
pub use crate::error::{ExploreError, OpError};
pub use crate::explorer::{Exploration, OrbitExplorer};
pub use crate::ops::{LocalOp, apply_qubit_lcs, edge_lc};
pub use crate::progress::{Progress, ProgressSnapshot};
