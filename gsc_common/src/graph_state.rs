//! The immutable weighted graph-state value.

use contracts::*;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use crate::{GraphKind, GraphStateError, Vertex, is_prime};

/// `(u, v, weight)` with `u < v` and `1 <= weight < p`.
pub type WeightedEdge = (Vertex, Vertex, u32);

type Adjacency = BTreeMap<Vertex, BTreeMap<Vertex, u32>>;

/// A weighted graph over a prime-power alphabet.
///
/// Edges of weight zero are never stored. The value is logically immutable:
/// transformations go through [`GraphState::modify`], which edits a private
/// copy and returns it as a new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphState {
    kind: GraphKind,
    adjacency: Adjacency,
}

impl GraphState {
    /// Builds a simple (`d = 2`) graph state from an unweighted edge list.
    ///
    /// # Errors
    /// Fails on self-loops or non-plain vertices.
    pub fn qubit<V: Into<Vertex>>(
        edges: impl IntoIterator<Item = (V, V)>,
    ) -> Result<Self, GraphStateError> {
        Self::prime(2, edges.into_iter().map(|(u, v)| (u, v, 1)))
    }

    /// Builds a prime-dimensional graph state. `p = 2` yields a qubit graph.
    ///
    /// Edges of weight 0 are accepted and dropped.
    ///
    /// # Errors
    /// Fails if `prime` is not prime, a weight lies outside `[0, p)`, an
    /// edge is a self-loop, or a vertex is not plain.
    pub fn prime<V: Into<Vertex>>(
        prime: u32,
        edges: impl IntoIterator<Item = (V, V, u32)>,
    ) -> Result<Self, GraphStateError> {
        if !is_prime(prime) {
            return Err(GraphStateError::NotPrime(prime));
        }
        let kind = if prime == 2 {
            GraphKind::Qubit
        } else {
            GraphKind::Prime { prime }
        };

        let mut state = Self::empty(kind);
        for (u, v, w) in edges {
            state.insert_edge(u.into(), v.into(), w)?;
        }
        Ok(state)
    }

    /// Builds a prime-power graph state with `d = prime^power` from edges
    /// between `(family, member)` pairs.
    ///
    /// Every `(family, member)` combination of every family touched by an
    /// edge exists afterwards, even if no edge reaches it. With `power = 1`
    /// the members must all be 0 and vertices are flattened to plain ids.
    ///
    /// # Errors
    /// Fails on a non-prime base, `power = 0`, out-of-range weights or
    /// member indices, and self-loops.
    pub fn prime_power(
        prime: u32,
        power: u32,
        edges: impl IntoIterator<Item = ((u32, u32), (u32, u32), u32)>,
    ) -> Result<Self, GraphStateError> {
        if !is_prime(prime) {
            return Err(GraphStateError::NotPrime(prime));
        }
        if power == 0 {
            return Err(GraphStateError::ZeroPower);
        }
        if power == 1 {
            let flat = edges
                .into_iter()
                .map(|(u, v, w)| Ok((flatten_member(u)?, flatten_member(v)?, w)))
                .collect::<Result<Vec<_>, GraphStateError>>()?;
            return Self::prime(prime, flat);
        }

        let mut state = Self::empty(GraphKind::PrimePower {
            prime,
            power,
            families: 0,
        });
        for (u, v, w) in edges {
            state.insert_edge(Vertex::from(u), Vertex::from(v), w)?;
        }
        Ok(state.fill_families())
    }

    /// Returns a copy with extra (possibly isolated) vertices. For prime-power
    /// graphs the whole family of each new vertex is added.
    ///
    /// # Errors
    /// Fails if a vertex does not fit the graph kind.
    pub fn with_vertices<V: Into<Vertex>>(
        &self,
        vertices: impl IntoIterator<Item = V>,
    ) -> Result<Self, GraphStateError> {
        let mut state = self.clone();
        for v in vertices {
            state.insert_vertex(v.into())?;
        }
        Ok(state.fill_families())
    }

    fn empty(kind: GraphKind) -> Self {
        Self {
            kind,
            adjacency: BTreeMap::new(),
        }
    }

    fn check_vertex(&self, vertex: Vertex) -> Result<(), GraphStateError> {
        match (self.kind, vertex) {
            (GraphKind::Qubit | GraphKind::Prime { .. }, Vertex::Plain(_)) => Ok(()),
            (GraphKind::PrimePower { power, .. }, Vertex::Member { member, .. }) => {
                if member < power {
                    Ok(())
                } else {
                    Err(GraphStateError::MemberOutOfRange { vertex, power })
                }
            },
            (kind, vertex) => Err(GraphStateError::VertexKindMismatch { vertex, kind }),
        }
    }

    fn insert_vertex(&mut self, vertex: Vertex) -> Result<(), GraphStateError> {
        self.check_vertex(vertex)?;
        self.adjacency.entry(vertex).or_default();
        Ok(())
    }

    fn insert_edge(&mut self, u: Vertex, v: Vertex, weight: u32) -> Result<(), GraphStateError> {
        let prime = self.kind.prime();
        if weight >= prime {
            return Err(GraphStateError::WeightOutOfRange { u, v, weight, prime });
        }
        if u == v {
            return Err(GraphStateError::SelfLoop(u));
        }
        self.insert_vertex(u)?;
        self.insert_vertex(v)?;
        Editor {
            prime,
            adjacency: &mut self.adjacency,
        }
        .set_weight(u, v, weight);
        Ok(())
    }

    /// Adds every missing `(family, member)` vertex and refreshes the
    /// family count. No-op for `m = 1`.
    fn fill_families(mut self) -> Self {
        let GraphKind::PrimePower { prime, power, .. } = self.kind else {
            return self;
        };
        let families: BTreeSet<u32> = self.adjacency.keys().filter_map(Vertex::family).collect();
        for &family in &families {
            for member in 0..power {
                self.adjacency
                    .entry(Vertex::member(family, member))
                    .or_default();
            }
        }
        self.kind = GraphKind::PrimePower {
            prime,
            power,
            families: families.len(),
        };
        self
    }

    // ###############
    // Queries
    // ###############

    /// The graph's alphabet.
    #[must_use]
    pub const fn kind(&self) -> GraphKind {
        self.kind
    }

    /// The power `m` of `d = p^m`.
    #[must_use]
    pub const fn power(&self) -> u32 {
        self.kind.power()
    }

    /// Local dimension `d = p^m`.
    #[must_use]
    pub fn dimension(&self) -> u64 {
        self.kind.dimension()
    }

    /// Number of vertices, isolated ones included.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of non-zero edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeMap::len).sum::<usize>() / 2
    }

    /// Whether `vertex` belongs to the graph.
    #[must_use]
    pub fn contains(&self, vertex: Vertex) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.adjacency.keys().copied()
    }

    /// Edges `(u, v, w)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = WeightedEdge> + '_ {
        self.adjacency.iter().flat_map(|(&u, row)| {
            row.iter()
                .filter(move |&(&v, _)| u < v)
                .map(move |(&v, &w)| (u, v, w))
        })
    }

    /// Neighbours of `vertex` with the connecting weight. Empty for unknown
    /// vertices.
    pub fn neighbors(&self, vertex: Vertex) -> impl Iterator<Item = (Vertex, u32)> + '_ {
        self.adjacency
            .get(&vertex)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&v, &w)| (v, w)))
    }

    /// Number of neighbours, 0 for unknown vertices.
    #[must_use]
    pub fn degree(&self, vertex: Vertex) -> usize {
        self.adjacency.get(&vertex).map_or(0, BTreeMap::len)
    }

    /// Weight of `u-v`, 0 if there is no such edge.
    #[must_use]
    pub fn weight(&self, u: Vertex, v: Vertex) -> u32 {
        weight_in(&self.adjacency, u, v)
    }

    /// Whether `u` and `v` share a non-zero edge.
    #[must_use]
    pub fn has_edge(&self, u: Vertex, v: Vertex) -> bool {
        self.weight(u, v) != 0
    }

    /// Largest edge weight, 0 for an edgeless graph.
    #[must_use]
    pub fn max_weight(&self) -> u32 {
        self.edges().map(|(_, _, w)| w).max().unwrap_or(0)
    }

    /// Sorted family ids of a prime-power graph; empty otherwise.
    #[must_use]
    pub fn families(&self) -> Vec<u32> {
        self.adjacency
            .keys()
            .filter_map(Vertex::family)
            .dedup()
            .collect()
    }

    /// True when the weighted edge multisets of both graphs coincide.
    #[must_use]
    pub fn same_edges(&self, other: &Self) -> bool {
        self.edges().eq(other.edges())
    }

    /// Connectivity of the underlying simple graph. Graphs with at most one
    /// vertex count as connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.adjacency.keys().next() else {
            return true;
        };
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for (v, _) in self.neighbors(u) {
                if seen.insert(v) {
                    queue.push_back(v);
                }
            }
        }
        seen.len() == self.adjacency.len()
    }

    /// Weighted adjacency matrix under the ascending vertex ordering.
    #[must_use]
    pub fn adjacency_matrix(&self) -> (Vec<Vertex>, Vec<Vec<u32>>) {
        let order: Vec<Vertex> = self.vertices().collect();
        let matrix = order
            .iter()
            .map(|&u| order.iter().map(|&v| self.weight(u, v)).collect())
            .collect();
        (order, matrix)
    }

    // ###############
    // Transformations
    // ###############

    /// Copy-on-write primitive: runs `edit` against a private copy of the
    /// edge set and returns the result as a new graph state. The vertex set
    /// and kind are preserved.
    #[must_use]
    pub fn modify(&self, edit: impl FnOnce(&mut Editor<'_>)) -> Self {
        let mut adjacency = self.adjacency.clone();
        edit(&mut Editor {
            prime: self.kind.prime(),
            adjacency: &mut adjacency,
        });
        Self {
            kind: self.kind,
            adjacency,
        }
    }

    /// Renames vertices through `rename`, keeping weights.
    ///
    /// # Errors
    /// Fails if two vertices are mapped onto one, or if a renamed vertex does
    /// not fit the graph kind.
    pub fn relabel(&self, rename: impl Fn(Vertex) -> Vertex) -> Result<Self, GraphStateError> {
        let mut state = Self::empty(self.kind);
        for v in self.vertices() {
            let renamed = rename(v);
            if state.contains(renamed) {
                return Err(GraphStateError::NonInjectiveRelabel(renamed));
            }
            state.insert_vertex(renamed)?;
        }
        for (u, v, w) in self.edges() {
            state.insert_edge(rename(u), rename(v), w)?;
        }
        Ok(state.fill_families())
    }
}

impl fmt::Display for GraphState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges = self
            .edges()
            .map(|(u, v, w)| {
                if self.kind.is_qubit() {
                    format!("{u}-{v}")
                } else {
                    format!("{u}-{v}:{w}")
                }
            })
            .join(", ");
        write!(f, "{} [{}]", self.kind, edges)
    }
}

fn flatten_member((family, member): (u32, u32)) -> Result<Vertex, GraphStateError> {
    if member == 0 {
        Ok(Vertex::plain(family))
    } else {
        Err(GraphStateError::MemberOutOfRange {
            vertex: Vertex::member(family, member),
            power: 1,
        })
    }
}

fn weight_in(adjacency: &Adjacency, u: Vertex, v: Vertex) -> u32 {
    adjacency
        .get(&u)
        .and_then(|row| row.get(&v))
        .copied()
        .unwrap_or(0)
}

/// Mutable view over the edge set of a graph-state copy, handed out by
/// [`GraphState::modify`]. Arithmetic is modulo the graph's prime and zero
/// weights delete the edge.
pub struct Editor<'a> {
    prime: u32,
    adjacency: &'a mut Adjacency,
}

impl Editor<'_> {
    /// Modulus of the weights being edited.
    #[must_use]
    pub const fn prime(&self) -> u32 {
        self.prime
    }

    /// Whether `vertex` belongs to the graph.
    #[must_use]
    pub fn contains(&self, vertex: Vertex) -> bool {
        self.adjacency.contains_key(&vertex)
    }

    /// Current weight of `u-v`, 0 when absent.
    #[must_use]
    pub fn weight(&self, u: Vertex, v: Vertex) -> u32 {
        weight_in(&*self.adjacency, u, v)
    }

    /// Snapshot of the current neighbours of `vertex`.
    #[must_use]
    pub fn neighbors(&self, vertex: Vertex) -> Vec<(Vertex, u32)> {
        self.adjacency
            .get(&vertex)
            .map(|row| row.iter().map(|(&v, &w)| (v, w)).collect())
            .unwrap_or_default()
    }

    /// Sets `u-v` to `weight mod p`, removing the edge when that is 0.
    /// Unknown vertices are ignored.
    #[debug_requires(u != v, "self-loops are not graph-state edges")]
    pub fn set_weight(&mut self, u: Vertex, v: Vertex, weight: u32) {
        if !self.contains(u) || !self.contains(v) {
            return;
        }
        let weight = weight % self.prime;
        for (a, b) in [(u, v), (v, u)] {
            if let Some(row) = self.adjacency.get_mut(&a) {
                if weight == 0 {
                    row.remove(&b);
                } else {
                    row.insert(b, weight);
                }
            }
        }
    }

    /// `weight(u, v) += delta (mod p)`.
    pub fn add_weight(&mut self, u: Vertex, v: Vertex, delta: u64) {
        let prime = u64::from(self.prime);
        let sum = (u64::from(self.weight(u, v)) + delta % prime) % prime;
        // sum < prime <= u32::MAX
        self.set_weight(u, v, sum as u32);
    }

    /// `weight(u, v) *= factor (mod p)`.
    pub fn scale_weight(&mut self, u: Vertex, v: Vertex, factor: u32) {
        let prime = u64::from(self.prime);
        let product = u64::from(self.weight(u, v)) * u64::from(factor) % prime;
        self.set_weight(u, v, product as u32);
    }

    /// Deletes every edge for which `keep` returns false.
    pub fn retain_edges(&mut self, keep: impl Fn(Vertex, Vertex, u32) -> bool) {
        for (&u, row) in self.adjacency.iter_mut() {
            row.retain(|&v, &mut w| {
                let (a, b) = if u < v { (u, v) } else { (v, u) };
                keep(a, b, w)
            });
        }
    }
}
