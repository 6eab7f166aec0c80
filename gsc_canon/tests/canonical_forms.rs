#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::sync::OnceLock;

use gsc_canon::{CanonicalBridge, CanonicalForm, RefinementOracle};
use gsc_common::{GraphState, Vertex};
use lazy_static::lazy_static;
use quickcheck::{Arbitrary, Gen, quickcheck};
use rstest::rstest;

lazy_static! {
    static ref BRIDGE: CanonicalBridge<'static, RefinementOracle> =
        CanonicalBridge::new(&RefinementOracle);
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

type MemberEdge = ((u32, u32), (u32, u32), u32);

fn ququart(edges: &[MemberEdge]) -> GraphState {
    GraphState::prime_power(2, 2, edges.iter().copied()).unwrap()
}

fn form(state: &GraphState) -> CanonicalForm {
    init_test_logger();
    BRIDGE.canonical_form(state).unwrap()
}

#[rstest]
// Two C-shaped ququart graphs
#[case(
    &[((0, 1), (1, 1), 1), ((1, 0), (0, 0), 1), ((0, 0), (0, 1), 1)],
    &[((0, 1), (1, 1), 1), ((1, 0), (0, 0), 1), ((1, 0), (1, 1), 1)],
    true
)]
// Upper and lower ququart bar
#[case(&[((1, 0), (0, 0), 1)], &[((0, 1), (1, 1), 1)], false)]
// Both ququart zigzags
#[case(
    &[((0, 1), (1, 1), 1), ((1, 0), (0, 0), 1), ((0, 0), (1, 1), 1)],
    &[((0, 1), (1, 1), 1), ((1, 0), (0, 0), 1), ((0, 1), (1, 0), 1)],
    true
)]
// Two-bar and rotated two-bar
#[case(
    &[((0, 1), (1, 1), 1), ((0, 0), (1, 0), 1)],
    &[((0, 0), (0, 1), 1), ((1, 0), (1, 1), 1)],
    false
)]
fn ququart_forms(#[case] a: &[MemberEdge], #[case] b: &[MemberEdge], #[case] equal: bool) {
    assert_eq!(form(&ququart(a)) == form(&ququart(b)), equal);
}

#[rstest]
#[case(&[(0, 1, 1), (1, 2, 2)], &[(2, 1, 1), (1, 0, 2)], true)]
#[case(&[(0, 1, 1), (1, 2, 2)], &[(0, 1, 1), (1, 2, 1)], false)]
#[case(&[(0, 1, 2), (1, 2, 2)], &[(0, 1, 1), (1, 2, 1)], false)]
#[case(&[(0, 1, 3), (1, 2, 4), (2, 0, 1)], &[(2, 0, 3), (0, 1, 4), (1, 2, 1)], true)]
fn weighted_forms(
    #[case] a: &[(u32, u32, u32)],
    #[case] b: &[(u32, u32, u32)],
    #[case] equal: bool,
) {
    let a = GraphState::prime(5, a.iter().copied()).unwrap();
    let b = GraphState::prime(5, b.iter().copied()).unwrap();
    assert_eq!(form(&a) == form(&b), equal);
}

#[test]
fn prime_power_forms_are_pairs() {
    let g = ququart(&[((0, 0), (1, 0), 1)]);
    assert!(matches!(form(&g), CanonicalForm::Pair { .. }));
}

#[test]
fn prime_power_representatives_use_member_zero() {
    // Symmetric bar between member 0 of both families, plus an isolated
    // third family.
    let g = ququart(&[((0, 0), (1, 0), 1)])
        .with_vertices([Vertex::member(2, 0)])
        .unwrap();
    let reps = BRIDGE.representatives(&g).unwrap();
    let expected = vec![Vertex::member(0, 0), Vertex::member(1, 0)];
    assert_eq!(reps.len(), 1);
    assert_eq!(reps.get(&Vertex::member(0, 0)), Some(&expected));
}

/// A connected qubit graph on 3 to 9 vertices and a relabeled copy.
#[derive(Clone, Debug)]
struct ConnectedPair {
    graph: GraphState,
    relabeled: GraphState,
}

impl Arbitrary for ConnectedPair {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = 3 + u32::arbitrary(g) % 7;
        let mut edges: Vec<(u32, u32)> = (1..n).map(|v| (u32::arbitrary(g) % v, v)).collect();
        for u in 0..n {
            for v in u + 1..n {
                if u8::arbitrary(g) % 4 == 0 {
                    edges.push((u, v));
                }
            }
        }
        let mut perm: Vec<u32> = (0..n).collect();
        for i in (1..perm.len()).rev() {
            perm.swap(i, usize::arbitrary(g) % (i + 1));
        }
        let graph = GraphState::qubit(edges.iter().copied()).unwrap();
        let relabeled =
            GraphState::qubit(edges.iter().map(|&(u, v)| (perm[u as usize], perm[v as usize])))
                .unwrap();
        Self { graph, relabeled }
    }
}

quickcheck! {
    fn prop_form_is_relabel_invariant(pair: ConnectedPair) -> bool {
        form(&pair.graph) == form(&pair.relabeled)
    }

    fn prop_canonical_relabel_agrees(pair: ConnectedPair) -> bool {
        let a = BRIDGE.canonical_relabel(&pair.graph).unwrap();
        let b = BRIDGE.canonical_relabel(&pair.relabeled).unwrap();
        a.same_edges(&b)
    }

    fn prop_orbit_members_have_equal_degree(pair: ConnectedPair) -> bool {
        let reps = BRIDGE.representatives(&pair.graph).unwrap();
        reps.iter().all(|(&rep, members)| {
            members.first() == Some(&rep)
                && members.iter().all(|&v| pair.graph.degree(v) == pair.graph.degree(rep))
        })
    }
}
