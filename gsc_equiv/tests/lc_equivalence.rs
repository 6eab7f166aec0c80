#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::sync::OnceLock;

use gsc_canon::RefinementOracle;
use gsc_common::{GraphState, Vertex};
use gsc_equiv::{EquivConfig, EquivError, Gate, LcEquivalence, are_lc_equiv};
use gsc_orbit::{ExploreConfig, OrbitExplorer, apply_qubit_lcs};
use lazy_static::lazy_static;
use quickcheck::{Arbitrary, Gen, quickcheck};
use rstest::rstest;

use Gate::{H, HS, HSH, I, S, SH};

lazy_static! {
    static ref PATH4: GraphState = GraphState::qubit([(0u32, 1u32), (1, 2), (2, 3)]).unwrap();
    static ref RING4: GraphState =
        GraphState::qubit([(0u32, 1u32), (1, 2), (2, 3), (3, 0)]).unwrap();
    static ref CROSSED4: GraphState =
        GraphState::qubit([(0u32, 2u32), (2, 1), (1, 3), (3, 0)]).unwrap();
}

fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn qubit(edges: &[(u32, u32)]) -> GraphState {
    GraphState::qubit(edges.iter().copied()).unwrap()
}

fn check(g1: &GraphState, g2: &GraphState) -> LcEquivalence {
    init_test_logger();
    are_lc_equiv(g1, g2, &EquivConfig::new()).unwrap()
}

#[test]
fn path_and_ring_are_not_equivalent() {
    let result = check(&PATH4, &RING4);
    assert!(!result.equivalent);
    assert_eq!(result.witnesses, None);
}

#[test]
fn path_and_crossed_ring_witnesses() {
    let result = check(&PATH4, &CROSSED4);
    assert!(result.equivalent);
    assert_eq!(result.vertices, (0..4).map(Vertex::plain).collect::<Vec<_>>());
    assert_eq!(
        result.witnesses,
        Some(vec![
            vec![I, H, H, I],
            vec![I, H, SH, S],
            vec![S, SH, H, I],
            vec![S, SH, SH, S],
        ])
    );
}

#[rstest]
#[case::single_edge(&[(0, 1)], &[(0, 1)], vec![
    vec![I, I], vec![H, H], vec![S, HSH], vec![HS, SH], vec![SH, HS], vec![HSH, S],
])]
#[case::path_and_triangle(&[(0, 1), (1, 2)], &[(0, 1), (1, 2), (0, 2)], vec![
    vec![SH, S, SH], vec![SH, HS, HSH], vec![HSH, S, HSH], vec![HSH, HS, SH],
])]
fn witness_tables(
    #[case] a: &[(u32, u32)],
    #[case] b: &[(u32, u32)],
    #[case] expected: Vec<Vec<Gate>>,
) {
    let result = check(&qubit(a), &qubit(b));
    assert_eq!(result.witnesses, Some(expected));
}

#[test]
fn three_path_stabilizer_degeneracy() {
    let g = qubit(&[(0, 1), (1, 2)]);
    let witnesses = check(&g, &g).witnesses.unwrap();
    assert_eq!(witnesses.len(), 4);
    assert!(witnesses.contains(&vec![I, I, I]));
}

#[test]
fn mismatched_vertex_sets_are_not_equivalent() {
    let result = check(&PATH4, &qubit(&[(0, 1), (1, 2), (2, 4)]));
    assert!(!result.equivalent);
    assert_eq!(result.witnesses, None);
}

#[test]
fn weighted_graphs_are_rejected() {
    let g = GraphState::prime(3, [(0u32, 1u32, 2)]).unwrap();
    let err = are_lc_equiv(&g, &g, &EquivConfig::new()).unwrap_err();
    assert!(matches!(err, EquivError::NotQubit(_)));
}

#[test]
fn basis_limit_is_enforced() {
    let config = EquivConfig::new().with_max_basis_dim(Some(2));
    let err = are_lc_equiv(&PATH4, &CROSSED4, &config).unwrap_err();
    assert_eq!(err, EquivError::BasisTooLarge { dim: 4, max: 2 });
}

#[test]
fn empty_graphs_are_equivalent() {
    let empty = GraphState::qubit(std::iter::empty::<(u32, u32)>()).unwrap();
    let result = check(&empty, &empty);
    assert!(result.equivalent);
    assert_eq!(result.witnesses, Some(vec![vec![]]));
}

#[rstest]
#[case::path5(&[(0, 1), (1, 2), (2, 3), (3, 4)])]
#[case::star4(&[(0, 1), (0, 2), (0, 3)])]
#[case::ring5(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)])]
fn orbit_members_are_equivalent(#[case] edges: &[(u32, u32)]) {
    let seed = qubit(edges);
    let result = OrbitExplorer::new(&RefinementOracle, ExploreConfig::new())
        .explore(seed.clone())
        .unwrap();
    for node in result.class_graph.nodes() {
        assert!(check(&seed, &node.state).equivalent, "class {}", node.label);
    }
}

/// A connected qubit graph on 3 to 7 vertices and a sequence of local
/// complementations to apply to it.
#[derive(Clone, Debug)]
struct LcWalk {
    graph: GraphState,
    steps: Vec<Vertex>,
}

impl Arbitrary for LcWalk {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = 3 + u32::arbitrary(g) % 5;
        let mut edges: Vec<(u32, u32)> = (1..n).map(|v| (u32::arbitrary(g) % v, v)).collect();
        for u in 0..n {
            for v in u + 1..n {
                if u8::arbitrary(g) % 3 == 0 {
                    edges.push((u, v));
                }
            }
        }
        let steps = (0..usize::arbitrary(g) % 6)
            .map(|_| Vertex::plain(u32::arbitrary(g) % n))
            .collect();
        Self {
            graph: GraphState::qubit(edges).unwrap(),
            steps,
        }
    }
}

quickcheck! {
    fn prop_local_complementation_preserves_equivalence(walk: LcWalk) -> bool {
        let target = apply_qubit_lcs(&walk.graph, &walk.steps).unwrap();
        check(&walk.graph, &target).equivalent
    }

    fn prop_identity_witnesses_self(walk: LcWalk) -> bool {
        let identity = vec![I; walk.graph.vertex_count()];
        check(&walk.graph, &walk.graph)
            .witnesses
            .is_some_and(|w| w.contains(&identity))
    }
}
