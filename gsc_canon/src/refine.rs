//! A small individualization-refinement canonizer.
//!
//! The search tree is the usual one: refine the colour partition to an
//! equitable one, individualize each vertex of the first non-singleton cell
//! in turn and recurse. Every discrete partition is a leaf whose code is the
//! edge set relabeled by cell position; the largest code is canonical.
//!
//! Two leaves with equal codes yield an automorphism. Automorphisms are used
//! twice: children of a node that lie in one orbit of the point-wise
//! stabilizer of the node's prefix are explored once, and when an
//! automorphism maps a stored path onto the current one the search jumps
//! back to the node where the two paths diverge.
//!
//! Exact, but exponential in the worst case. It is sized for graphs of a few
//! dozen vertices.

use std::collections::BTreeMap;

use contracts::*;
use tracing::trace;

use crate::oracle::{Canonical, CanonicalOracle, Certificate, ColoredGraph};

type Cells = Vec<Vec<usize>>;

/// The bundled [`CanonicalOracle`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RefinementOracle;

impl RefinementOracle {
    /// Creates the oracle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CanonicalOracle for RefinementOracle {
    fn canonicalize(&self, graph: &ColoredGraph) -> Canonical {
        let n = graph.vertex_count();
        let cells: Cells = graph
            .colors()
            .iter()
            .filter(|class| !class.is_empty())
            .cloned()
            .collect();

        let mut search = Search {
            graph,
            first: None,
            best: None,
            generators: Vec::new(),
            leaves: 0,
        };
        let mut path = Vec::new();
        search.explore(&mut path, cells);
        trace!(
            n,
            leaves = search.leaves,
            generators = search.generators.len(),
            "refinement search finished"
        );

        let mut certificate = vec![n as u32, graph.colors().len() as u32];
        certificate.extend(graph.colors().iter().map(|class| class.len() as u32));
        let labeling = match search.best {
            Some(best) => {
                certificate.extend(best.code.iter().flat_map(|&(u, v)| [u as u32, v as u32]));
                best.position
            },
            // Only reachable for n = 0.
            None => Vec::new(),
        };

        let mut orbits = UnionFind::new(n);
        for gamma in &search.generators {
            for (v, &image) in gamma.iter().enumerate() {
                orbits.union(v, image);
            }
        }

        Canonical {
            certificate: Certificate(certificate),
            labeling,
            orbits: orbits.classes(),
        }
    }
}

/// A discrete partition reached by the search.
#[derive(Clone, Debug)]
struct Leaf {
    path: Vec<usize>,
    /// Vertex to cell position.
    position: Vec<usize>,
    /// Cell position to vertex.
    vertex_at: Vec<usize>,
    code: Vec<(usize, usize)>,
}

impl Leaf {
    fn new(graph: &ColoredGraph, path: &[usize], cells: &Cells) -> Self {
        let vertex_at: Vec<usize> = cells.iter().map(|cell| cell[0]).collect();
        let mut position = vec![0; vertex_at.len()];
        for (pos, &v) in vertex_at.iter().enumerate() {
            position[v] = pos;
        }
        let mut code: Vec<(usize, usize)> = graph
            .edges()
            .map(|(u, v)| {
                let (a, b) = (position[u], position[v]);
                (a.min(b), a.max(b))
            })
            .collect();
        code.sort_unstable();
        Self {
            path: path.to_vec(),
            position,
            vertex_at,
            code,
        }
    }

    /// The automorphism taking `self` to `other`; both must share a code.
    fn automorphism_to(&self, other: &Self) -> Vec<usize> {
        self.position.iter().map(|&pos| other.vertex_at[pos]).collect()
    }
}

struct Search<'g> {
    graph: &'g ColoredGraph,
    first: Option<Leaf>,
    best: Option<Leaf>,
    generators: Vec<Vec<usize>>,
    leaves: usize,
}

impl Search<'_> {
    /// Explores the subtree below `path`. Returns the depth to resume at when
    /// an automorphism made the rest of an ancestor's subtree redundant.
    fn explore(&mut self, path: &mut Vec<usize>, cells: Cells) -> Option<usize> {
        let cells = refine(self.graph, cells);
        let Some(target) = cells.iter().position(|cell| cell.len() > 1) else {
            return self.visit_leaf(path, &cells);
        };

        let depth = path.len();
        let mut explored: Vec<usize> = Vec::new();
        for &w in &cells[target] {
            let orbits = self.stabilizer_orbits(path);
            if explored.iter().any(|&u| orbits.same(u, w)) {
                continue;
            }
            explored.push(w);

            path.push(w);
            let jump = self.explore(path, individualize(&cells, target, w));
            path.pop();
            if let Some(level) = jump {
                if level < depth {
                    return Some(level);
                }
            }
        }
        None
    }

    fn visit_leaf(&mut self, path: &[usize], cells: &Cells) -> Option<usize> {
        self.leaves += 1;
        let leaf = Leaf::new(self.graph, path, cells);

        let Some(first) = &self.first else {
            self.first = Some(leaf.clone());
            self.best = Some(leaf);
            return None;
        };
        if leaf.code == first.code {
            let gamma = first.automorphism_to(&leaf);
            let jump = jump_level(first, &leaf, &gamma);
            self.add_generator(gamma);
            return jump;
        }

        let best = self.best.as_ref()?;
        match leaf.code.cmp(&best.code) {
            std::cmp::Ordering::Greater => {
                self.best = Some(leaf);
                None
            },
            std::cmp::Ordering::Equal => {
                let gamma = best.automorphism_to(&leaf);
                let jump = jump_level(best, &leaf, &gamma);
                self.add_generator(gamma);
                jump
            },
            std::cmp::Ordering::Less => None,
        }
    }

    fn add_generator(&mut self, gamma: Vec<usize>) {
        let identity = gamma.iter().enumerate().all(|(v, &image)| v == image);
        if !identity && !self.generators.contains(&gamma) {
            self.generators.push(gamma);
        }
    }

    /// Orbits of the group generated by the known automorphisms that fix
    /// every vertex of `prefix`.
    fn stabilizer_orbits(&self, prefix: &[usize]) -> UnionFind {
        let mut orbits = UnionFind::new(self.graph.vertex_count());
        for gamma in &self.generators {
            if prefix.iter().all(|&v| gamma[v] == v) {
                for (v, &image) in gamma.iter().enumerate() {
                    orbits.union(v, image);
                }
            }
        }
        orbits
    }
}

/// Depth of the node where `stored` and `current` diverge, provided `gamma`
/// maps the stored path onto the current one up to and including that
/// point. The subtree below `current`'s divergence child is then an image
/// of an already explored one.
fn jump_level(stored: &Leaf, current: &Leaf, gamma: &[usize]) -> Option<usize> {
    let common = stored
        .path
        .iter()
        .zip(&current.path)
        .take_while(|(a, b)| a == b)
        .count();
    let maps_path = stored
        .path
        .iter()
        .zip(&current.path)
        .take(common + 1)
        .all(|(&a, &b)| gamma[a] == b);
    (maps_path && common < current.path.len()).then_some(common)
}

/// Splits `cells[target]` into `[w]` followed by the rest of the cell.
#[debug_requires(cells[target].contains(&w))]
#[debug_ensures(ret.len() == cells.len() + 1)]
fn individualize(cells: &Cells, target: usize, w: usize) -> Cells {
    let mut next = Vec::with_capacity(cells.len() + 1);
    next.extend_from_slice(&cells[..target]);
    next.push(vec![w]);
    next.push(cells[target].iter().copied().filter(|&v| v != w).collect());
    next.extend_from_slice(&cells[target + 1..]);
    next
}

/// Coarsest equitable refinement of `cells`: every vertex of a cell has the
/// same number of neighbours in every cell. A cell that is split is replaced
/// in place by its pieces, ordered by ascending neighbour count, so the
/// result depends on the structure only and not on vertex names.
fn refine(graph: &ColoredGraph, mut cells: Cells) -> Cells {
    let n = graph.vertex_count();
    'restart: loop {
        for splitter in 0..cells.len() {
            let mut in_splitter = vec![false; n];
            for &v in &cells[splitter] {
                in_splitter[v] = true;
            }
            for i in 0..cells.len() {
                if cells[i].len() == 1 {
                    continue;
                }
                let mut pieces: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
                for &v in &cells[i] {
                    let count = graph
                        .neighbors(v)
                        .iter()
                        .filter(|&&u| in_splitter[u])
                        .count();
                    pieces.entry(count).or_default().push(v);
                }
                if pieces.len() > 1 {
                    cells.splice(i..=i, pieces.into_values());
                    continue 'restart;
                }
            }
        }
        return cells;
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&self, mut v: usize) -> usize {
        while self.parent[v] != v {
            v = self.parent[v];
        }
        v
    }

    fn same(&self, u: usize, v: usize) -> bool {
        self.find(u) == self.find(v)
    }

    /// Always keeps the smaller root, so roots are orbit minima.
    fn union(&mut self, u: usize, v: usize) {
        let (a, b) = (self.find(u), self.find(v));
        if a != b {
            let (low, high) = (a.min(b), a.max(b));
            self.parent[high] = low;
        }
    }

    fn classes(&self) -> Vec<Vec<usize>> {
        let mut classes: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for v in 0..self.parent.len() {
            classes.entry(self.find(v)).or_default().push(v);
        }
        classes.into_values().collect()
    }
}
