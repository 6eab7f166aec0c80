//! Deduplicated search over the local-operation orbit of a seed graph.

use std::collections::VecDeque;
use std::time::Instant;

use gsc_canon::{CanonicalBridge, CanonicalForm, CanonicalOracle};
use gsc_common::{GraphState, Vertex};
use tracing::{debug, error, info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::class_graph::{ClassGraph, GraphInvariants};
use crate::config::{ExploreConfig, SearchOrder};
use crate::ops::LocalOp;
use crate::progress::Progress;
use crate::ExploreError;

/// Result of an exploration. `complete` is false when a budget ran out
/// before the queue emptied; the class graph is valid either way.
#[derive(Clone, Debug)]
pub struct Exploration {
    /// Every class found, with provenance edges if saved.
    pub class_graph: ClassGraph,
    /// False when a budget stopped the search.
    pub complete: bool,
}

/// A non-trivial operation result waiting to be merged into the class graph.
struct Candidate<'a> {
    op: &'a LocalOp,
    equiv: Vec<Vertex>,
    state: GraphState,
    form: CanonicalForm,
}

/// Deduplicated search over the local-operation orbit of a seed graph state.
pub struct OrbitExplorer<'o, O: CanonicalOracle + ?Sized> {
    bridge: CanonicalBridge<'o, O>,
    config: ExploreConfig,
    progress: Progress,
}

impl<'o, O: CanonicalOracle + ?Sized> OrbitExplorer<'o, O> {
    /// Explorer canonicalizing with `oracle`.
    #[must_use]
    pub fn new(oracle: &'o O, config: ExploreConfig) -> Self {
        Self {
            bridge: CanonicalBridge::new(oracle).with_keep_leaves(config.keep_leaves),
            config,
            progress: Progress::new(),
        }
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &ExploreConfig {
        &self.config
    }

    /// Live counters of the running (or last) exploration.
    #[must_use]
    pub const fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Explores the orbit of `seed` under the operation set of its kind.
    ///
    /// # Errors
    /// Fails before any work for disconnected `m = 1` seeds, and if an
    /// operation or the canonicalization rejects a graph.
    ///
    /// # Panics
    /// If two graphs with different invariants share a canonical form, which
    /// means the oracle is broken.
    pub fn explore(&self, seed: GraphState) -> Result<Exploration, ExploreError> {
        if seed.power() == 1 && !seed.is_connected() {
            return Err(ExploreError::Disconnected);
        }

        let ops = LocalOp::family_for(seed.kind());
        info!(
            kind = %seed.kind(),
            vertices = seed.vertex_count(),
            ops = ops.len(),
            "exploring orbit"
        );

        let started = Instant::now();
        self.progress.reset();
        let form = self.bridge.canonical_form(&seed)?;
        let mut class_graph = ClassGraph::new(seed, form);
        self.progress.inc_discovered();

        let mut queue = VecDeque::from([0usize]);
        let mut complete = true;
        while !queue.is_empty() {
            if let Some(reason) = self.budget_exhausted(&class_graph, started) {
                warn!(
                    reason,
                    nodes = class_graph.len(),
                    pending = queue.len(),
                    "stopping exploration early"
                );
                complete = false;
                break;
            }
            let next = match self.config.order {
                SearchOrder::BreadthFirst => queue.pop_front(),
                SearchOrder::DepthFirst => queue.pop_back(),
            };
            let Some(label) = next else {
                break;
            };
            self.progress.inc_visited();

            let state = match class_graph.node(label) {
                Some(node) => node.state.clone(),
                None => continue,
            };
            for candidate in self.expand(&state, &ops)? {
                self.merge(&mut class_graph, &mut queue, label, candidate);
            }
            debug!(
                label,
                nodes = class_graph.len(),
                pending = queue.len(),
                "expanded class"
            );
        }

        info!(
            nodes = class_graph.len(),
            edges = class_graph.edge_count(),
            complete,
            elapsed = ?started.elapsed(),
            "exploration finished"
        );
        Ok(Exploration {
            class_graph,
            complete,
        })
    }

    fn budget_exhausted(&self, class_graph: &ClassGraph, started: Instant) -> Option<&'static str> {
        if self.config.max_nodes.is_some_and(|max| class_graph.len() >= max) {
            return Some("node budget");
        }
        if self.config.time_budget.is_some_and(|budget| started.elapsed() >= budget) {
            return Some("time budget");
        }
        None
    }

    /// Applies every operation at every representative of `state` and keeps
    /// the results that changed the edge set, in a fixed order.
    fn expand<'a>(
        &self,
        state: &GraphState,
        ops: &'a [LocalOp],
    ) -> Result<Vec<Candidate<'a>>, ExploreError> {
        let representatives = self.bridge.representatives(state)?;
        let pairs: Vec<(Vertex, Vec<Vertex>, &'a LocalOp)> = representatives
            .into_iter()
            .flat_map(|(rep, members)| ops.iter().map(move |op| (rep, members.clone(), op)))
            .collect();
        self.progress.inc_candidates(pairs.len() as u64);

        #[cfg(feature = "rayon")]
        let evaluated: Vec<Result<Option<Candidate<'a>>, ExploreError>> = if self.config.parallel {
            pairs.into_par_iter().map(|pair| self.evaluate(state, pair)).collect()
        } else {
            pairs.into_iter().map(|pair| self.evaluate(state, pair)).collect()
        };

        #[cfg(not(feature = "rayon"))]
        let evaluated: Vec<Result<Option<Candidate<'a>>, ExploreError>> =
            pairs.into_iter().map(|pair| self.evaluate(state, pair)).collect();

        evaluated
            .into_iter()
            .filter_map(Result::transpose)
            .collect()
    }

    fn evaluate<'a>(
        &self,
        state: &GraphState,
        (rep, members, op): (Vertex, Vec<Vertex>, &'a LocalOp),
    ) -> Result<Option<Candidate<'a>>, ExploreError> {
        let next = op.apply(state, rep)?;
        if next.same_edges(state) {
            self.progress.inc_trivial();
            return Ok(None);
        }
        let form = self.bridge.canonical_form(&next)?;
        Ok(Some(Candidate {
            op,
            equiv: members,
            state: next,
            form,
        }))
    }

    fn merge(
        &self,
        class_graph: &mut ClassGraph,
        queue: &mut VecDeque<usize>,
        source: usize,
        candidate: Candidate<'_>,
    ) {
        let Candidate {
            op,
            equiv,
            state,
            form,
        } = candidate;

        if let Some(existing) = class_graph.lookup(&form) {
            check_collision(class_graph, existing, &state);
            if self.config.save_edges {
                class_graph.link(source, existing, op.label(), &equiv);
            }
            return;
        }

        let label = class_graph.insert_node(state, form);
        self.progress.inc_discovered();
        if self.config.save_edges {
            class_graph.link(source, label, op.label(), &equiv);
        }
        queue.push_back(label);
    }
}

/// Two graphs with one canonical form must at least agree on their simple
/// invariants. Anything else is a broken oracle and must not be merged.
fn check_collision(class_graph: &ClassGraph, existing: usize, state: &GraphState) {
    let Some(node) = class_graph.node(existing) else {
        return;
    };
    let (known, found) = (GraphInvariants::of(&node.state), GraphInvariants::of(state));
    if known != found {
        error!(
            existing,
            known = %node.state,
            found = %state,
            "canonical form collision between non-isomorphic graphs"
        );
        panic!("canonical form collision with class {existing}: {known:?} vs {found:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsc_canon::{Canonical, Certificate, ColoredGraph};

    /// Claims every graph is the same and has no symmetry.
    struct ConstantOracle;

    impl CanonicalOracle for ConstantOracle {
        fn canonicalize(&self, graph: &ColoredGraph) -> Canonical {
            let n = graph.vertex_count();
            Canonical {
                certificate: Certificate(vec![0]),
                labeling: (0..n).collect(),
                orbits: (0..n).map(|v| vec![v]).collect(),
            }
        }
    }

    #[test]
    #[should_panic(expected = "canonical form collision")]
    fn colliding_forms_abort() {
        let seed = GraphState::qubit([(0u32, 1u32), (1, 2), (2, 3)]).unwrap();
        let _ = OrbitExplorer::new(&ConstantOracle, ExploreConfig::new()).explore(seed);
    }

    #[test]
    fn trivial_candidates_are_counted() {
        let seed = GraphState::qubit([(0u32, 1u32), (1, 2)]).unwrap();
        let explorer = OrbitExplorer::new(&gsc_canon::RefinementOracle, ExploreConfig::new());
        let result = explorer.explore(seed).unwrap();
        // The path and the triangle.
        assert_eq!(result.class_graph.len(), 2);
        let snapshot = explorer.progress().snapshot();
        assert_eq!(snapshot.visited, 2);
        assert_eq!(snapshot.trivial, 0);
    }
}
