//! From graph states to canonical forms and representative vertices.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use gxhash::GxHasher;
use gsc_common::{GraphKind, GraphState, GraphStateError, Vertex};
use serde::Serialize;
use tracing::debug;

use crate::CanonError;
use crate::encoding::{Encoding, Partition, Slot};
use crate::oracle::{CanonicalOracle, Certificate};

/// Fixed seed so that digests are reproducible from run to run.
const DIGEST_SEED: i64 = 0x243f_6a88_85a3_08d3;

/// Representative vertex of each automorphism orbit mapped to the sorted
/// orbit members.
pub type RepresentativePartition = BTreeMap<Vertex, Vec<Vertex>>;

/// Exact isomorphism-class key of a graph state.
///
/// Prime-power graphs with `m > 1` need both colourings: the member colouring
/// alone does not identify graphs that differ by a reordering of members
/// inside a family, and the family colouring alone loses member identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CanonicalForm {
    /// Certificate of the only colouring needed (`m = 1`).
    Single(Certificate),
    /// Certificates of both colourings of a prime-power graph.
    Pair {
        /// Certificate under the member colouring.
        member: Certificate,
        /// Certificate under the family colouring.
        family: Certificate,
    },
}

impl CanonicalForm {
    /// A 64-bit digest of the form for export. Deduplication uses the full
    /// form, never the digest.
    #[must_use]
    pub fn digest(&self) -> u64 {
        let mut hasher = GxHasher::with_seed(DIGEST_SEED);
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Encodes graph states for an injected [`CanonicalOracle`] and maps its
/// answers back onto graph-state vertices.
#[derive(Clone, Copy, Debug)]
pub struct CanonicalBridge<'o, O: CanonicalOracle + ?Sized> {
    oracle: &'o O,
    keep_leaves: bool,
}

impl<'o, O: CanonicalOracle + ?Sized> CanonicalBridge<'o, O> {
    /// Bridge over `oracle` that drops degree-1 representatives.
    #[must_use]
    pub const fn new(oracle: &'o O) -> Self {
        Self {
            oracle,
            keep_leaves: false,
        }
    }

    /// Keep degree-1 vertices among the representatives of `m = 1` graphs.
    #[must_use]
    pub const fn with_keep_leaves(mut self, keep_leaves: bool) -> Self {
        self.keep_leaves = keep_leaves;
        self
    }

    /// The wrapped oracle.
    #[must_use]
    pub const fn oracle(&self) -> &'o O {
        self.oracle
    }

    /// Isomorphism-invariant key of `state`.
    ///
    /// # Errors
    /// Fails only if `state` cannot be encoded.
    pub fn canonical_form(&self, state: &GraphState) -> Result<CanonicalForm, CanonError> {
        match state.kind() {
            GraphKind::Qubit | GraphKind::Prime { .. } => {
                let encoding = Encoding::encode(state, Partition::Member)?;
                Ok(CanonicalForm::Single(self.oracle.certificate(&encoding.graph)))
            },
            GraphKind::PrimePower { .. } => {
                let member = Encoding::encode(state, Partition::Member)?;
                let family = Encoding::encode(state, Partition::Family)?;
                Ok(CanonicalForm::Pair {
                    member: self.oracle.certificate(&member.graph),
                    family: self.oracle.certificate(&family.graph),
                })
            },
        }
    }

    /// [`CanonicalForm::digest`] of `state`.
    ///
    /// # Errors
    /// See [`CanonicalBridge::canonical_form`].
    pub fn digest(&self, state: &GraphState) -> Result<u64, CanonError> {
        Ok(self.canonical_form(state)?.digest())
    }

    /// Automorphism orbits of `state` that are worth acting on.
    ///
    /// For `m = 1` an orbit is dropped when its vertices have degree at most
    /// one (unless leaves are kept). For `m > 1` orbits are taken under the
    /// member colouring, restricted to member 0, and dropped when the family
    /// has no incident edge at all.
    ///
    /// # Errors
    /// Fails only if `state` cannot be encoded.
    pub fn representatives(
        &self,
        state: &GraphState,
    ) -> Result<RepresentativePartition, CanonError> {
        let encoding = Encoding::encode(state, Partition::Member)?;
        let orbits = self.oracle.orbits(&encoding.graph);

        let mut partition = RepresentativePartition::new();
        for orbit in orbits {
            let members: Vec<Vertex> = orbit
                .iter()
                .filter_map(|&index| match encoding.decode(index) {
                    (0, Slot::Vertex(v)) if v.member_index().unwrap_or(0) == 0 => Some(v),
                    _ => None,
                })
                .collect();
            let Some(&representative) = members.first() else {
                continue;
            };
            if self.acts_on(state, representative) {
                partition.insert(representative, members);
            }
        }
        debug!(
            vertices = state.vertex_count(),
            representatives = partition.len(),
            "computed representative partition"
        );
        Ok(partition)
    }

    fn acts_on(&self, state: &GraphState, vertex: Vertex) -> bool {
        match (state.kind(), vertex.family()) {
            (GraphKind::PrimePower { power, .. }, Some(family)) => {
                (0..power).any(|member| state.degree(Vertex::member(family, member)) > 0)
            },
            _ => self.keep_leaves || state.degree(vertex) > 1,
        }
    }

    /// An isomorphic copy of a qubit graph state whose vertex names follow
    /// the canonical labeling, so isomorphic inputs give edge-identical
    /// outputs.
    ///
    /// # Errors
    /// Fails for non-qubit graphs.
    pub fn canonical_relabel(&self, state: &GraphState) -> Result<GraphState, CanonError> {
        if !state.kind().is_qubit() {
            return Err(GraphStateError::UnsupportedKind {
                expected: "qubit",
                actual: state.kind(),
            }
            .into());
        }
        let encoding = Encoding::encode(state, Partition::Member)?;
        let labeling = self.oracle.canonicalize(&encoding.graph).labeling;
        let order: Vec<Vertex> = state.vertices().collect();
        let index: BTreeMap<Vertex, usize> = state.vertices().zip(0..).collect();
        state
            .relabel(|v| order[labeling[index[&v]]])
            .map_err(CanonError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RefinementOracle;

    fn path(n: u32) -> GraphState {
        GraphState::qubit((0..n - 1).map(|i| (i, i + 1))).unwrap()
    }

    #[test]
    fn path_representatives() {
        let bridge = CanonicalBridge::new(&RefinementOracle);
        let reps = bridge.representatives(&path(5)).unwrap();
        let expected = RepresentativePartition::from([
            (Vertex::plain(1), vec![Vertex::plain(1), Vertex::plain(3)]),
            (Vertex::plain(2), vec![Vertex::plain(2)]),
        ]);
        assert_eq!(reps, expected);
    }

    #[test]
    fn keep_leaves_includes_path_ends() {
        let bridge = CanonicalBridge::new(&RefinementOracle).with_keep_leaves(true);
        let reps = bridge.representatives(&path(4)).unwrap();
        assert_eq!(
            reps.keys().copied().collect::<Vec<_>>(),
            vec![Vertex::plain(0), Vertex::plain(1)]
        );
    }

    #[test]
    fn relabel_is_canonical() {
        let bridge = CanonicalBridge::new(&RefinementOracle);
        let a = path(5);
        let b = GraphState::qubit([(3u32, 0u32), (0, 4), (4, 1), (1, 2)]).unwrap();
        let ca = bridge.canonical_relabel(&a).unwrap();
        let cb = bridge.canonical_relabel(&b).unwrap();
        assert!(ca.same_edges(&cb));
        assert_eq!(bridge.canonical_form(&a), bridge.canonical_form(&b));
    }

    #[test]
    fn relabel_rejects_weighted_graphs() {
        let bridge = CanonicalBridge::new(&RefinementOracle);
        let g = GraphState::prime(3, [(0u32, 1u32, 2)]).unwrap();
        assert!(matches!(
            bridge.canonical_relabel(&g),
            Err(CanonError::GraphState(GraphStateError::UnsupportedKind { .. }))
        ));
    }

    #[test]
    fn digest_is_stable_for_equal_forms() {
        let bridge = CanonicalBridge::new(&RefinementOracle);
        let a = bridge.digest(&path(4)).unwrap();
        let b = bridge
            .digest(&GraphState::qubit([(2u32, 3u32), (3, 0), (0, 1)]).unwrap())
            .unwrap();
        assert_eq!(a, b);
    }
}
