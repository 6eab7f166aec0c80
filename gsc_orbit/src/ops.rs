//! Local operations on graph states.
//!
//! Every operation is a pure function: it validates that it applies to the
//! graph's `(p, m)`, then edits a private copy through
//! [`GraphState::modify`].

use std::fmt;

use gsc_common::{Editor, GraphKind, GraphState, Vertex};
use itertools::Itertools;

use crate::OpError;

/// One member of an operation family, applied at a representative vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocalOp {
    /// Qubit local complementation.
    QubitLc,
    /// Generalized local complementation with multiplier `a`.
    PrimeLc(u32),
    /// Edge multiplication by `b`.
    EdgeMul(u32),
    /// Controlled complementation with multiplier `a`, controlled by the
    /// representative member and targeting member `target` of its family.
    ControlledComp {
        /// Multiplier.
        a: u32,
        /// Target member index.
        target: u32,
    },
}

impl LocalOp {
    /// The operation set explored for graphs of `kind`.
    ///
    /// - qubit: `LC`
    /// - prime `p > 2`: `LC1 .. LC(p-1)`, then `EM2 .. EM(p-1)`
    /// - prime power `m > 1`: `CCa(c,t)` for every `a` in `1..p` and `t` in
    ///   `0..m`, then `EM2 .. EM(p-1)`
    #[must_use]
    pub fn family_for(kind: GraphKind) -> Vec<Self> {
        let edge_muls = |p: u32| (2..p).map(Self::EdgeMul);
        match kind {
            GraphKind::Qubit => vec![Self::QubitLc],
            GraphKind::Prime { prime } => (1..prime).map(Self::PrimeLc).chain(edge_muls(prime)).collect(),
            GraphKind::PrimePower { prime, power, .. } => (1..prime)
                .cartesian_product(0..power)
                .map(|(a, target)| Self::ControlledComp { a, target })
                .chain(edge_muls(prime))
                .collect(),
        }
    }

    /// Label recorded on class-graph edges, e.g. `LC`, `LC2`, `EM3` or
    /// `CC1(c,0)`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Applies the operation at `vertex`.
    ///
    /// # Errors
    /// See the individual operation functions.
    pub fn apply(&self, state: &GraphState, vertex: Vertex) -> Result<GraphState, OpError> {
        match *self {
            Self::QubitLc => qubit_lc(state, vertex),
            Self::PrimeLc(a) => prime_lc(state, vertex, a),
            Self::EdgeMul(b) => edge_mul(state, vertex, b),
            Self::ControlledComp { a, target } => controlled_comp(state, vertex, target, a),
        }
    }
}

impl fmt::Display for LocalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QubitLc => write!(f, "LC"),
            Self::PrimeLc(a) => write!(f, "LC{a}"),
            Self::EdgeMul(b) => write!(f, "EM{b}"),
            Self::ControlledComp { a, target } => write!(f, "CC{a}(c,{target})"),
        }
    }
}

// ###############
// Checks
// ###############

fn require_vertex(state: &GraphState, vertex: Vertex) -> Result<(), OpError> {
    if state.contains(vertex) {
        Ok(())
    } else {
        Err(OpError::UnknownVertex(vertex))
    }
}

fn require_param(op: LocalOp, value: u32, min: u32, max: u32) -> Result<(), OpError> {
    if (min..max).contains(&value) {
        Ok(())
    } else {
        Err(OpError::ParameterOutOfRange {
            op: op.label(),
            value,
            min,
            max,
        })
    }
}

fn inapplicable(op: LocalOp, state: &GraphState) -> OpError {
    OpError::Inapplicable {
        op: op.label(),
        kind: state.kind(),
    }
}

// ###############
// Operations
// ###############

/// `w(u, w) += a * w(v, u) * w(v, w)` for every pair of neighbours of `v`.
fn complement_at(editor: &mut Editor<'_>, v: Vertex, a: u32) {
    let neighbors = editor.neighbors(v);
    for ((u, wu), (w, ww)) in neighbors.iter().tuple_combinations() {
        let delta = u64::from(a) * u64::from(*wu) * u64::from(*ww);
        editor.add_weight(*u, *w, delta);
    }
}

/// Qubit local complementation: complements the edges among the neighbours
/// of `vertex`. Self-inverse.
///
/// # Errors
/// Fails for non-qubit graphs and unknown vertices.
pub fn qubit_lc(state: &GraphState, vertex: Vertex) -> Result<GraphState, OpError> {
    if !state.kind().is_qubit() {
        return Err(inapplicable(LocalOp::QubitLc, state));
    }
    require_vertex(state, vertex)?;
    Ok(state.modify(|editor| complement_at(editor, vertex, 1)))
}

/// Generalized local complementation for prime `p > 2`, `a` in `[1, p)`.
///
/// # Errors
/// Fails outside `p > 2, m = 1`, on unknown vertices, and on `a` out of range.
pub fn prime_lc(state: &GraphState, vertex: Vertex, a: u32) -> Result<GraphState, OpError> {
    let op = LocalOp::PrimeLc(a);
    let GraphKind::Prime { prime } = state.kind() else {
        return Err(inapplicable(op, state));
    };
    require_param(op, a, 1, prime)?;
    require_vertex(state, vertex)?;
    Ok(state.modify(|editor| complement_at(editor, vertex, a)))
}

/// Edge multiplication: scales every edge at `vertex` by `b` in `[2, p)`.
///
/// # Errors
/// Fails for `p = 2`, on unknown vertices, and on `b` out of range.
pub fn edge_mul(state: &GraphState, vertex: Vertex, b: u32) -> Result<GraphState, OpError> {
    let op = LocalOp::EdgeMul(b);
    let prime = state.kind().prime();
    if state.kind().is_qubit() || prime == 2 {
        return Err(inapplicable(op, state));
    }
    require_param(op, b, 2, prime)?;
    require_vertex(state, vertex)?;
    Ok(state.modify(|editor| {
        for (u, _) in editor.neighbors(vertex) {
            editor.scale_weight(vertex, u, b);
        }
    }))
}

/// Controlled complementation on a prime-power graph, controlled by the
/// member vertex `(n, c)`: sets the edge `(n, c)-(n, target)` to weight 1
/// when `c != target`, complements at `(n, c)` with multiplier `a`, then
/// deletes every edge inside a family.
///
/// # Errors
/// Fails for `m = 1` graphs, plain or unknown vertices, a target member
/// `>= m`, and `a` out of range.
pub fn controlled_comp(
    state: &GraphState,
    vertex: Vertex,
    target: u32,
    a: u32,
) -> Result<GraphState, OpError> {
    let op = LocalOp::ControlledComp { a, target };
    let GraphKind::PrimePower { prime, power, .. } = state.kind() else {
        return Err(inapplicable(op, state));
    };
    let Vertex::Member { family, member } = vertex else {
        return Err(OpError::MalformedVertex {
            op: op.label(),
            vertex,
        });
    };
    require_param(op, a, 1, prime)?;
    require_param(op, target, 0, power)?;
    require_vertex(state, vertex)?;

    Ok(state.modify(|editor| {
        if member != target {
            editor.set_weight(vertex, Vertex::member(family, target), 1);
        }
        complement_at(editor, vertex, a);
        editor.retain_edges(|u, w, _| u.family() != w.family());
    }))
}

/// Qubit local complementations at each vertex of `vertices` in order.
///
/// # Errors
/// See [`qubit_lc`].
pub fn apply_qubit_lcs(state: &GraphState, vertices: &[Vertex]) -> Result<GraphState, OpError> {
    vertices
        .iter()
        .try_fold(state.clone(), |current, &v| qubit_lc(&current, v))
}

/// Edge local complementation (pivot) along `u-v`: LC at `u`, `v`, `u`.
///
/// # Errors
/// See [`qubit_lc`].
pub fn edge_lc(state: &GraphState, u: Vertex, v: Vertex) -> Result<GraphState, OpError> {
    apply_qubit_lcs(state, &[u, v, u])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(v: u32) -> Vertex {
        Vertex::plain(v)
    }

    fn star(n: u32) -> GraphState {
        GraphState::qubit((1..n).map(|i| (0, i))).unwrap()
    }

    #[test]
    fn qubit_lc_on_star_gives_complete_graph() {
        let g = qubit_lc(&star(4), p(0)).unwrap();
        assert_eq!(g.edge_count(), 6);
        let back = qubit_lc(&g, p(0)).unwrap();
        assert!(back.same_edges(&star(4)));
    }

    #[test]
    fn qubit_lc_rejects_weighted_graph() {
        let g = GraphState::prime(3, [(0u32, 1u32, 1)]).unwrap();
        assert!(matches!(qubit_lc(&g, p(0)), Err(OpError::Inapplicable { .. })));
    }

    #[test]
    fn unknown_vertex() {
        assert_eq!(qubit_lc(&star(3), p(9)).unwrap_err(), OpError::UnknownVertex(p(9)));
    }

    #[test]
    fn prime_lc_arithmetic() {
        // 1 -(2)- 0 -(1)- 2, edge 1-2 of weight 1, p = 5
        let g = GraphState::prime(5, [(0u32, 1u32, 2), (0, 2, 1), (1, 2, 1)]).unwrap();
        let h = prime_lc(&g, p(0), 2).unwrap();
        // 1 + 2 * 2 * 1 = 5 = 0 mod 5
        assert!(!h.has_edge(p(1), p(2)));
        let k = prime_lc(&g, p(0), 1).unwrap();
        assert_eq!(k.weight(p(1), p(2)), 3);
        assert_eq!(k.weight(p(0), p(1)), 2);
    }

    #[test]
    fn prime_lc_parameter_range() {
        let g = GraphState::prime(3, [(0u32, 1u32, 1)]).unwrap();
        assert!(matches!(
            prime_lc(&g, p(0), 3),
            Err(OpError::ParameterOutOfRange { value: 3, min: 1, max: 3, .. })
        ));
    }

    #[test]
    fn edge_mul_scales_incident_edges() {
        let g = GraphState::prime(5, [(0u32, 1u32, 2), (0, 2, 3), (1, 2, 1)]).unwrap();
        let h = edge_mul(&g, p(0), 3).unwrap();
        assert_eq!(h.weight(p(0), p(1)), 1);
        assert_eq!(h.weight(p(0), p(2)), 4);
        assert_eq!(h.weight(p(1), p(2)), 1);
        assert!(matches!(edge_mul(&star(3), p(0), 2), Err(OpError::Inapplicable { .. })));
    }

    #[test]
    fn controlled_comp_removes_family_edges() {
        // (0,0)-(1,0) and (0,0)-(1,1), p = 3, m = 2
        let g = GraphState::prime_power(3, 2, [((0, 0), (1, 0), 1), ((0, 0), (1, 1), 2)]).unwrap();
        let h = controlled_comp(&g, Vertex::member(0, 0), 1, 1).unwrap();
        // the control-target edge is only used for the complementation
        assert!(!h.has_edge(Vertex::member(0, 0), Vertex::member(0, 1)));
        // (0,1) picked up edges to both neighbours of the control
        assert_eq!(h.weight(Vertex::member(0, 1), Vertex::member(1, 0)), 1);
        assert_eq!(h.weight(Vertex::member(0, 1), Vertex::member(1, 1)), 2);
        // the (1,0)-(1,1) edge lies inside family 1
        assert!(!h.has_edge(Vertex::member(1, 0), Vertex::member(1, 1)));
    }

    #[test]
    fn controlled_comp_needs_member_vertex() {
        let g = GraphState::prime_power(3, 2, [((0, 0), (1, 0), 1)]).unwrap();
        assert!(matches!(
            controlled_comp(&g, p(0), 0, 1),
            Err(OpError::MalformedVertex { .. })
        ));
        assert!(matches!(
            controlled_comp(&g, Vertex::member(0, 0), 2, 1),
            Err(OpError::ParameterOutOfRange { .. })
        ));
    }

    #[test]
    fn edge_lc_on_path_edge() {
        let g = GraphState::qubit([(0u32, 1u32), (1, 2), (2, 3)]).unwrap();
        let h = edge_lc(&g, p(1), p(2)).unwrap();
        // pivoting on the middle edge of a path closes it into a ring
        let expected = GraphState::qubit([(0u32, 2u32), (2, 1), (1, 3), (3, 0)]).unwrap();
        assert!(h.same_edges(&expected));
    }

    #[test]
    fn operation_sets() {
        assert_eq!(LocalOp::family_for(GraphKind::Qubit), vec![LocalOp::QubitLc]);
        let labels: Vec<String> = LocalOp::family_for(GraphKind::Prime { prime: 3 })
            .iter()
            .map(LocalOp::label)
            .collect();
        assert_eq!(labels, ["LC1", "LC2", "EM2"]);
        let labels: Vec<String> = LocalOp::family_for(GraphKind::PrimePower {
            prime: 3,
            power: 2,
            families: 2,
        })
        .iter()
        .map(LocalOp::label)
        .collect();
        assert_eq!(labels, ["CC1(c,0)", "CC1(c,1)", "CC2(c,0)", "CC2(c,1)", "EM2"]);
    }
}
