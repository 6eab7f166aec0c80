//! Interface to a canonical-form / automorphism oracle.
//!
//! The oracle works on plain vertex-coloured simple graphs over `0..n`. The
//! bridge in [`crate::bridge`] is responsible for encoding graph states into
//! this shape and for mapping the results back.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::CanonError;

/// A simple undirected graph on `0..n` with an ordered list of colour
/// classes. Colour order is significant: two graphs are only isomorphic if
/// an isomorphism maps the i-th class onto the i-th class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColoredGraph {
    adjacency: Vec<Vec<usize>>,
    colors: Vec<Vec<usize>>,
}

impl ColoredGraph {
    /// Builds and validates a coloured graph. Duplicate edges are merged;
    /// empty colour classes are kept since they still take part in the
    /// certificate.
    ///
    /// # Errors
    /// Fails on out-of-range endpoints, self-loops, or colourings that are
    /// not a partition of `0..n`.
    pub fn new(
        n: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
        colors: Vec<Vec<usize>>,
    ) -> Result<Self, CanonError> {
        let mut rows = vec![BTreeSet::new(); n];
        for (u, v) in edges {
            for vertex in [u, v] {
                if vertex >= n {
                    return Err(CanonError::VertexOutOfRange { vertex, n });
                }
            }
            if u == v {
                return Err(CanonError::SelfLoop(u));
            }
            rows[u].insert(v);
            rows[v].insert(u);
        }

        let mut covered = vec![false; n];
        let mut colors = colors;
        for class in &mut colors {
            class.sort_unstable();
            for &vertex in class.iter() {
                if vertex >= n {
                    return Err(CanonError::VertexOutOfRange { vertex, n });
                }
                if covered[vertex] {
                    return Err(CanonError::MalformedColoring(vertex));
                }
                covered[vertex] = true;
            }
        }
        if let Some(vertex) = covered.iter().position(|&c| !c) {
            return Err(CanonError::MalformedColoring(vertex));
        }

        Ok(Self {
            adjacency: rows.into_iter().map(|row| row.into_iter().collect()).collect(),
            colors,
        })
    }

    /// A graph with every vertex in one colour class.
    ///
    /// # Errors
    /// Same as [`ColoredGraph::new`].
    pub fn uncolored(
        n: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, CanonError> {
        Self::new(n, edges, vec![(0..n).collect()])
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Sorted neighbours of `vertex`.
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.adjacency[vertex]
    }

    /// Colour classes, each sorted.
    #[must_use]
    pub fn colors(&self) -> &[Vec<usize>] {
        &self.colors
    }

    /// Edges `(u, v)` with `u < v`, ascending.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(u, row)| {
            row.iter().copied().filter(move |&v| u < v).map(move |v| (u, v))
        })
    }
}

/// An isomorphism-invariant fingerprint of a coloured graph. Two coloured
/// graphs have equal certificates iff they are isomorphic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Certificate(pub Vec<u32>);

/// Everything an oracle reports about one coloured graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canonical {
    /// Isomorphism-class certificate.
    pub certificate: Certificate,
    /// `labeling[v]` is the canonical position of vertex `v`.
    pub labeling: Vec<usize>,
    /// Automorphism orbits, each sorted, ordered by smallest member.
    pub orbits: Vec<Vec<usize>>,
}

impl Canonical {
    /// Orbit containing `vertex`.
    #[must_use]
    pub fn orbit_of(&self, vertex: usize) -> Option<&[usize]> {
        self.orbits
            .iter()
            .find(|orbit| orbit.binary_search(&vertex).is_ok())
            .map(Vec::as_slice)
    }
}

/// A canonical-form and automorphism-group engine.
///
/// Implementations must be deterministic and stateless across calls so the
/// explorer may call them from several threads.
pub trait CanonicalOracle: Send + Sync {
    /// Computes certificate, canonical labeling and orbits in one pass.
    fn canonicalize(&self, graph: &ColoredGraph) -> Canonical;

    /// Certificate only.
    fn certificate(&self, graph: &ColoredGraph) -> Certificate {
        self.canonicalize(graph).certificate
    }

    /// Automorphism orbits only.
    fn orbits(&self, graph: &ColoredGraph) -> Vec<Vec<usize>> {
        self.canonicalize(graph).orbits
    }
}
