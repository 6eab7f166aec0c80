//! The class graph built by the orbit explorer.
//!
//! Nodes are isomorphism classes of graph states, labeled `0, 1, ...` in
//! discovery order with the seed at 0. Edges record which operations, at
//! which vertex groups, lead from one class to another. The structure only
//! ever grows.

use gsc_canon::CanonicalForm;
use gsc_common::{GraphKind, GraphState, Vertex};
use gxhash::{HashMap, HashMapExt};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

/// Edge list of a class representative, normalized per dimension: weights
/// are dropped for `d = 2` and kept for `d > 2`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EdgeList {
    /// Unweighted edges of a qubit graph.
    Plain(Vec<(Vertex, Vertex)>),
    /// Edges with their weights, `d > 2`.
    Weighted(Vec<(Vertex, Vertex, u32)>),
}

impl EdgeList {
    /// Normalized edge list of `state`.
    #[must_use]
    pub fn of(state: &GraphState) -> Self {
        if state.kind() == GraphKind::Qubit {
            Self::Plain(state.edges().map(|(u, v, _)| (u, v)).collect())
        } else {
            Self::Weighted(state.edges().collect())
        }
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Plain(edges) => edges.len(),
            Self::Weighted(edges) => edges.len(),
        }
    }

    /// True for an edgeless representative.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One isomorphism class found by the explorer.
#[derive(Clone, Debug)]
pub struct ClassNode {
    /// Discovery index, 0 for the seed.
    pub label: usize,
    /// Representative: the first member of the class reached.
    pub state: GraphState,
    /// Deduplication key of the class.
    pub form: CanonicalForm,
    /// Exported digest of `form`.
    pub hash: u64,
    /// Edges of the representative.
    pub edges: EdgeList,
}

/// Operations connecting two classes, with the vertex group each was applied
/// to. `ops[i]` was applied at `equivs[i]`; labels never repeat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassEdge {
    /// Operation labels.
    pub ops: Vec<String>,
    /// Vertex group acted on by each operation.
    pub equivs: Vec<Vec<Vertex>>,
}

/// Plain node record for exporters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    /// Class label.
    pub label: usize,
    /// Edges of the representative.
    pub edges: EdgeList,
    /// Digest of the canonical form.
    pub hash: u64,
}

/// Plain edge record for exporters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeRecord {
    /// Lower class label.
    pub source: usize,
    /// Higher class label.
    pub target: usize,
    /// Operation labels.
    pub ops: Vec<String>,
    /// Vertex group acted on by each operation.
    pub equivs: Vec<Vec<Vertex>>,
}

/// Invariants compared whenever a canonical form lookup hits, to catch two
/// different classes sharing one form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GraphInvariants {
    vertices: usize,
    degrees: Vec<usize>,
    weights: Vec<u32>,
}

impl GraphInvariants {
    pub(crate) fn of(state: &GraphState) -> Self {
        Self {
            vertices: state.vertex_count(),
            degrees: state.vertices().map(|v| state.degree(v)).sorted_unstable().collect(),
            weights: state.edges().map(|(_, _, w)| w).sorted_unstable().collect(),
        }
    }
}

/// Classes discovered so far and the operations linking them.
#[derive(Clone, Debug)]
pub struct ClassGraph {
    nodes: Vec<ClassNode>,
    edges: IndexMap<(usize, usize), ClassEdge>,
    index: HashMap<CanonicalForm, usize>,
}

impl ClassGraph {
    pub(crate) fn new(seed: GraphState, form: CanonicalForm) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            edges: IndexMap::new(),
            index: HashMap::new(),
        };
        graph.insert_node(seed, form);
        graph
    }

    /// Registers a new class and returns its label. The form must not be
    /// indexed yet.
    pub(crate) fn insert_node(&mut self, state: GraphState, form: CanonicalForm) -> usize {
        let label = self.nodes.len();
        self.index.insert(form.clone(), label);
        self.nodes.push(ClassNode {
            label,
            edges: EdgeList::of(&state),
            hash: form.digest(),
            state,
            form,
        });
        label
    }

    /// Records that `op` at `equiv` connects `a` and `b`. Repeated labels on
    /// the same pair are ignored.
    pub(crate) fn link(&mut self, a: usize, b: usize, op: String, equiv: &[Vertex]) {
        let edge = self.edges.entry((a.min(b), a.max(b))).or_default();
        if !edge.ops.contains(&op) {
            edge.ops.push(op);
            edge.equivs.push(equiv.to_vec());
        }
    }

    /// Label of the class with canonical form `form`, if known.
    #[must_use]
    pub fn lookup(&self, form: &CanonicalForm) -> Option<usize> {
        self.index.get(form).copied()
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the seed is always node 0.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Class with label `label`.
    #[must_use]
    pub fn node(&self, label: usize) -> Option<&ClassNode> {
        self.nodes.get(label)
    }

    /// Classes in label order.
    pub fn nodes(&self) -> impl Iterator<Item = &ClassNode> {
        self.nodes.iter()
    }

    /// Edge between `a` and `b` in either orientation.
    #[must_use]
    pub fn edge(&self, a: usize, b: usize) -> Option<&ClassEdge> {
        self.edges.get(&(a.min(b), a.max(b)))
    }

    /// Edges keyed by `(low, high)` label pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&(usize, usize), &ClassEdge)> {
        self.edges.iter()
    }

    /// Number of class pairs linked by some operation.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Classes whose representative has the fewest edges.
    #[must_use]
    pub fn min_edge_representatives(&self) -> Vec<&ClassNode> {
        self.nodes.iter().min_set_by_key(|node| node.edges.len())
    }

    /// Classes whose representative has the most edges.
    #[must_use]
    pub fn max_edge_representatives(&self) -> Vec<&ClassNode> {
        self.nodes.iter().max_set_by_key(|node| node.edges.len())
    }

    /// Node records in label order.
    #[must_use]
    pub fn node_records(&self) -> Vec<NodeRecord> {
        self.nodes
            .iter()
            .map(|node| NodeRecord {
                label: node.label,
                edges: node.edges.clone(),
                hash: node.hash,
            })
            .collect()
    }

    /// Edge records in insertion order.
    #[must_use]
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.edges
            .iter()
            .map(|(&(source, target), edge)| EdgeRecord {
                source,
                target,
                ops: edge.ops.clone(),
                equivs: edge.equivs.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsc_canon::{CanonicalBridge, RefinementOracle};

    fn class_graph(seed: &GraphState) -> ClassGraph {
        let form = CanonicalBridge::new(&RefinementOracle)
            .canonical_form(seed)
            .unwrap();
        ClassGraph::new(seed.clone(), form)
    }

    #[test]
    fn seed_is_node_zero() {
        let seed = GraphState::qubit([(0u32, 1u32), (1, 2)]).unwrap();
        let graph = class_graph(&seed);
        assert_eq!(graph.len(), 1);
        let node = graph.node(0).unwrap();
        assert_eq!(graph.lookup(&node.form), Some(0));
        assert_eq!(
            node.edges,
            EdgeList::Plain(vec![
                (Vertex::plain(0), Vertex::plain(1)),
                (Vertex::plain(1), Vertex::plain(2))
            ])
        );
    }

    #[test]
    fn link_deduplicates_labels() {
        let seed = GraphState::qubit([(0u32, 1u32)]).unwrap();
        let mut graph = class_graph(&seed);
        let group = [Vertex::plain(1)];
        graph.link(3, 1, "LC".into(), &group);
        graph.link(1, 3, "LC".into(), &group);
        graph.link(1, 3, "EM2".into(), &group);
        let edge = graph.edge(3, 1).unwrap();
        assert_eq!(edge.ops, ["LC", "EM2"]);
        assert_eq!(edge.equivs.len(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_records()[0].source, 1);
    }

    #[test]
    fn weighted_edge_lists_keep_weights() {
        let g = GraphState::prime(3, [(0u32, 1u32, 2)]).unwrap();
        assert_eq!(
            EdgeList::of(&g),
            EdgeList::Weighted(vec![(Vertex::plain(0), Vertex::plain(1), 2)])
        );
    }

    #[test]
    fn invariants_see_weights() {
        let a = GraphState::prime(3, [(0u32, 1u32, 2)]).unwrap();
        let b = GraphState::prime(3, [(0u32, 1u32, 1)]).unwrap();
        assert_ne!(GraphInvariants::of(&a), GraphInvariants::of(&b));
    }
}
