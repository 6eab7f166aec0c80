//! Configuration for orbit exploration.
//!
//! Quick examples
//!
//! Full breadth-first orbit with provenance edges (the default):
//! ```ignore
//! use gsc_orbit::ExploreConfig;
//! let cfg = ExploreConfig::new();
//! ```
//!
//! Node-only search that gives up after 10 000 classes:
//! ```ignore
//! use gsc_orbit::ExploreConfig;
//! let cfg = ExploreConfig::new().with_save_edges(false).with_max_nodes(Some(10_000));
//! ```

use std::time::Duration;

use contracts::*;

/// Order in which discovered class-graph nodes are expanded. The final class
/// graph is the same either way; only discovery order differs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchOrder {
    /// Expand nodes in discovery order.
    #[default]
    BreadthFirst,
    /// Expand the most recently discovered node first.
    DepthFirst,
}

/// Exploration settings.
///
/// - save_edges: record which operations and vertex groups connect two
///   classes. Without it the class graph only holds nodes.
/// - max_nodes / time_budget: checked before each node is expanded. When one
///   runs out the search stops and reports an incomplete, but valid, class
///   graph.
/// - parallel: evaluate the (vertex, operation) candidates of a node on the
///   rayon pool. Only has an effect with the `rayon` feature.
/// - keep_leaves: also act on degree-1 vertices of `m = 1` graphs. Edge
///   multiplication does act on leaves when `p > 2`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExploreConfig {
    /// Record provenance edges.
    pub save_edges: bool,
    /// Node expansion order.
    pub order: SearchOrder,
    /// Stop once this many classes are known.
    pub max_nodes: Option<usize>,
    /// Stop once this much time has passed.
    pub time_budget: Option<Duration>,
    /// Evaluate candidates on the rayon pool.
    pub parallel: bool,
    /// Act on degree-1 vertices too.
    pub keep_leaves: bool,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            save_edges: true,
            order: SearchOrder::BreadthFirst,
            max_nodes: None,
            time_budget: None,
            parallel: false,
            keep_leaves: false,
        }
    }
}

impl ExploreConfig {
    /// Defaults: breadth-first, edges saved, no budgets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets [`Self::save_edges`].
    #[must_use]
    #[ensures(ret.save_edges == save_edges)]
    pub fn with_save_edges(mut self, save_edges: bool) -> Self {
        self.save_edges = save_edges;
        self
    }

    /// Sets [`Self::order`].
    #[must_use]
    #[ensures(ret.order == order)]
    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets [`Self::max_nodes`].
    #[must_use]
    #[ensures(ret.max_nodes == max_nodes)]
    pub fn with_max_nodes(mut self, max_nodes: Option<usize>) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Sets [`Self::time_budget`].
    #[must_use]
    #[ensures(ret.time_budget == time_budget)]
    pub fn with_time_budget(mut self, time_budget: Option<Duration>) -> Self {
        self.time_budget = time_budget;
        self
    }

    /// Sets [`Self::parallel`].
    #[must_use]
    #[ensures(ret.parallel == parallel)]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets [`Self::keep_leaves`].
    #[must_use]
    #[ensures(ret.keep_leaves == keep_leaves)]
    pub fn with_keep_leaves(mut self, keep_leaves: bool) -> Self {
        self.keep_leaves = keep_leaves;
        self
    }
}
