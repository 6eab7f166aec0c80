//! Local-Clifford equivalence of qubit graph states.
//!
//! Two graph states with adjacency matrices `A1`, `A2` on the same vertex
//! ordering are LC-equivalent iff there are per-vertex invertible binary
//! matrices `[[a_k, b_k], [c_k, d_k]]` with
//!
//! ```text
//! A1·diag(a) + A1·diag(c)·A2 + diag(b) + diag(d)·A2 = 0   (mod 2)
//! ```
//!
//! That is linear in the `4n` unknowns. The solver builds the system, takes
//! its nullspace, walks every vector of the span and keeps those whose `n`
//! blocks are all invertible. Each survivor is one witness, reported as a
//! gate per vertex.

use std::time::Instant;

use gsc_common::{GraphState, Vertex};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, warn};

use crate::gf2::{BitRow, Gf2Matrix, Span};
use crate::{EquivConfig, EquivError, Gate};

/// Bases this large are enumerated, but noisily.
const WARN_BASIS_DIM: usize = 20;

/// Outcome of an equivalence test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LcEquivalence {
    /// Whether some local Clifford maps the first graph to the second.
    pub equivalent: bool,
    /// Vertex order the witnesses refer to.
    pub vertices: Vec<Vertex>,
    /// Every gate assignment taking the first graph to the second, sorted.
    /// `None` exactly when the graphs are not equivalent.
    pub witnesses: Option<Vec<Vec<Gate>>>,
}

impl LcEquivalence {
    fn not_equivalent(vertices: Vec<Vertex>) -> Self {
        Self {
            equivalent: false,
            vertices,
            witnesses: None,
        }
    }

    fn from_witnesses(vertices: Vec<Vertex>, witnesses: Vec<Vec<Gate>>) -> Self {
        if witnesses.is_empty() {
            return Self::not_equivalent(vertices);
        }
        Self {
            equivalent: true,
            vertices,
            witnesses: Some(witnesses),
        }
    }
}

/// Decides whether `g2` is reachable from `g1` by local Clifford operations,
/// and if so returns every witness.
///
/// Graphs on different vertex sets are reported as not equivalent. Two
/// graphs without vertices are equivalent through the empty assignment.
///
/// # Errors
/// [`EquivError::NotQubit`] for non-qubit inputs and
/// [`EquivError::BasisTooLarge`] when the solution space exceeds the
/// configured limit.
pub fn are_lc_equiv(
    g1: &GraphState,
    g2: &GraphState,
    config: &EquivConfig,
) -> Result<LcEquivalence, EquivError> {
    for g in [g1, g2] {
        if !g.kind().is_qubit() {
            return Err(EquivError::NotQubit(g.kind()));
        }
    }

    let (vertices, a1) = g1.adjacency_matrix();
    let (other, a2) = g2.adjacency_matrix();
    if vertices != other {
        debug!(
            first = vertices.len(),
            second = other.len(),
            "vertex sets differ"
        );
        return Ok(LcEquivalence::not_equivalent(vertices));
    }
    if vertices.is_empty() {
        return Ok(LcEquivalence::from_witnesses(vertices, vec![Vec::new()]));
    }

    let mut system = congruence_system(&a1, &a2);
    system.dedup_rows();
    let basis = system.nullspace();
    debug!(
        vertices = vertices.len(),
        rows = system.row_count(),
        basis = basis.len(),
        "solved congruence system"
    );

    let limit = config.basis_limit();
    if basis.len() > limit {
        return Err(EquivError::BasisTooLarge {
            dim: basis.len(),
            max: limit,
        });
    }
    if basis.len() >= WARN_BASIS_DIM {
        warn!(
            basis = basis.len(),
            "enumerating a large solution space"
        );
    }

    let started = Instant::now();
    let witnesses: Vec<Vec<Gate>> = Span::new(&basis)
        .filter_map(|v| gates_of(&v, vertices.len()))
        .sorted_unstable()
        .collect();
    debug!(
        witnesses = witnesses.len(),
        elapsed = ?started.elapsed(),
        "enumerated solution space"
    );

    Ok(LcEquivalence::from_witnesses(vertices, witnesses))
}

/// Column of unknown `x` of vertex `k`, with `x` in `a, b, c, d` order.
const fn unknown(k: usize, x: usize) -> usize {
    4 * k + x
}

/// One row per matrix entry `(i, j)` of the congruence relation.
fn congruence_system(a1: &[Vec<u32>], a2: &[Vec<u32>]) -> Gf2Matrix {
    let n = a1.len();
    let mut system = Gf2Matrix::new(4 * n);
    for (i, j) in (0..n).cartesian_product(0..n) {
        let mut row = BitRow::zeros(4 * n);
        if a1[i][j] != 0 {
            row.flip(unknown(j, 0));
        }
        if i == j {
            row.flip(unknown(i, 1));
        }
        for k in (0..n).filter(|&k| a1[i][k] != 0 && a2[k][j] != 0) {
            row.flip(unknown(k, 2));
        }
        if a2[i][j] != 0 {
            row.flip(unknown(i, 3));
        }
        system.push_row(row);
    }
    system
}

/// Reads a solution vector as one gate per vertex, or `None` if some block
/// is not invertible.
fn gates_of(solution: &BitRow, n: usize) -> Option<Vec<Gate>> {
    (0..n)
        .map(|k| {
            Gate::from_symplectic([
                solution.get(unknown(k, 0)),
                solution.get(unknown(k, 1)),
                solution.get(unknown(k, 2)),
                solution.get(unknown(k, 3)),
            ])
        })
        .collect()
}
