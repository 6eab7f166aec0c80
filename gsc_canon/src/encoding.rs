//! Encodings of graph states as vertex-coloured simple graphs.
//!
//! Weighted edges become layers: a weight `w` with `L` binary digits puts
//! the edge on every layer whose bit is set, and the copies of one vertex on
//! consecutive layers are joined by a vertical edge. A qubit graph is the
//! one-layer case. Prime-power graphs are coloured either by member index or
//! by family; the family colouring first adds one auxiliary vertex per family
//! tied to all of its members so that whole families can be exchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use gsc_common::{GraphKind, GraphState, Vertex};

use crate::CanonError;
use crate::oracle::ColoredGraph;

/// Colouring scheme for prime-power (`m > 1`) graphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Partition {
    /// One colour per member index, shared across families.
    Member,
    /// One colour for all members and one for the auxiliary family vertices.
    Family,
}

impl FromStr for Partition {
    type Err = CanonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "family" => Ok(Self::Family),
            other => Err(CanonError::unknown_partition(other)),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => write!(f, "member"),
            Self::Family => write!(f, "family"),
        }
    }
}

/// What a base (layer-independent) slot of an encoding stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// A graph-state vertex.
    Vertex(Vertex),
    /// The auxiliary vertex of a family in the family colouring.
    Family(u32),
}

/// A graph state encoded for the oracle. Encoded vertex `layer * slots.len()
/// + i` is the copy of `slots[i]` on `layer`.
#[derive(Clone, Debug)]
pub struct Encoding {
    /// The coloured graph handed to the oracle.
    pub graph: ColoredGraph,
    /// Number of weight layers.
    pub layers: usize,
    /// Base slots, in encoded order on every layer.
    pub slots: Vec<Slot>,
}

/// How the base colour classes are laid out over the layers.
#[derive(Clone, Copy)]
enum ColorOrder {
    /// For each layer, every base class.
    LayerMajor,
    /// For each base class, every layer.
    ClassMajor,
}

/// Number of binary layers needed for weights up to `max_weight`. An
/// edgeless graph still gets one layer.
#[must_use]
pub const fn layer_count(max_weight: u32) -> usize {
    if max_weight == 0 {
        1
    } else {
        (u32::BITS - max_weight.leading_zeros()) as usize
    }
}

impl Encoding {
    /// Encodes `state`. The partition only matters for prime-power graphs
    /// with `m > 1`; qubit and prime graphs use one colour per layer.
    ///
    /// # Errors
    /// Only fails if the encoding is internally inconsistent, which
    /// indicates a malformed graph state.
    pub fn encode(state: &GraphState, partition: Partition) -> Result<Self, CanonError> {
        let slots: Vec<Slot> = state.vertices().map(Slot::Vertex).collect();
        let index: BTreeMap<Vertex, usize> = state.vertices().zip(0..).collect();
        let mut edges: Vec<(usize, usize, u32)> = state
            .edges()
            .map(|(u, v, w)| (index[&u], index[&v], w))
            .collect();

        match (state.kind(), partition) {
            (GraphKind::Qubit | GraphKind::Prime { .. }, _) => {
                let all: Vec<Vec<usize>> = vec![(0..slots.len()).collect()];
                Self::layered(slots, &edges, &all, ColorOrder::LayerMajor)
            },
            (GraphKind::PrimePower { power, .. }, Partition::Member) => {
                let classes: Vec<Vec<usize>> = (0..power)
                    .map(|member| members_with_index(&slots, member))
                    .collect();
                Self::layered(slots, &edges, &classes, ColorOrder::LayerMajor)
            },
            (GraphKind::PrimePower { power, .. }, Partition::Family) => {
                let mut slots = slots;
                let members: Vec<usize> = (0..slots.len()).collect();
                let mut aux = Vec::new();
                for family in state.families() {
                    let slot = slots.len();
                    slots.push(Slot::Family(family));
                    aux.push(slot);
                    for member in 0..power {
                        edges.push((slot, index[&Vertex::member(family, member)], 1));
                    }
                }
                Self::layered(slots, &edges, &[members, aux], ColorOrder::ClassMajor)
            },
        }
    }

    fn layered(
        slots: Vec<Slot>,
        edges: &[(usize, usize, u32)],
        classes: &[Vec<usize>],
        order: ColorOrder,
    ) -> Result<Self, CanonError> {
        let base = slots.len();
        let layers = layer_count(edges.iter().map(|&(_, _, w)| w).max().unwrap_or(0));
        let at = |layer: usize, slot: usize| layer * base + slot;

        let vertical = (0..base)
            .flat_map(|slot| (1..layers).map(move |layer| (at(layer - 1, slot), at(layer, slot))));
        let horizontal = edges.iter().flat_map(|&(a, b, w)| {
            (0..layers)
                .filter(move |&layer| (w >> layer) & 1 == 1)
                .map(move |layer| (at(layer, a), at(layer, b)))
        });

        let colors: Vec<Vec<usize>> = match order {
            ColorOrder::LayerMajor => (0..layers)
                .flat_map(|layer| {
                    classes
                        .iter()
                        .map(move |class| class.iter().map(|&s| at(layer, s)).collect::<Vec<_>>())
                })
                .collect(),
            ColorOrder::ClassMajor => classes
                .iter()
                .flat_map(|class| {
                    (0..layers).map(move |layer| class.iter().map(|&s| at(layer, s)).collect::<Vec<_>>())
                })
                .collect(),
        };

        let graph = ColoredGraph::new(layers * base, vertical.chain(horizontal), colors)?;
        Ok(Self {
            graph,
            layers,
            slots,
        })
    }

    /// Layer and slot of encoded vertex `index`.
    #[must_use]
    pub fn decode(&self, index: usize) -> (usize, Slot) {
        let base = self.slots.len();
        (index / base, self.slots[index % base])
    }
}

fn members_with_index(slots: &[Slot], member: u32) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| matches!(slot, Slot::Vertex(v) if v.member_index() == Some(member)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_counts() {
        assert_eq!(layer_count(0), 1);
        assert_eq!(layer_count(1), 1);
        assert_eq!(layer_count(2), 2);
        assert_eq!(layer_count(3), 2);
        assert_eq!(layer_count(4), 3);
        assert_eq!(layer_count(6), 3);
    }

    #[test]
    fn partition_names() {
        assert_eq!("member".parse::<Partition>(), Ok(Partition::Member));
        assert_eq!("family".parse::<Partition>(), Ok(Partition::Family));
        assert_eq!(
            "colour".parse::<Partition>(),
            Err(CanonError::UnknownPartition("colour".into()))
        );
        assert_eq!(Partition::Family.to_string(), "family");
    }

    #[test]
    fn qubit_graph_is_one_layer() {
        let g = GraphState::qubit([(0u32, 1u32), (1, 2)]).unwrap();
        let enc = Encoding::encode(&g, Partition::Member).unwrap();
        assert_eq!(enc.layers, 1);
        assert_eq!(enc.graph.vertex_count(), 3);
        assert_eq!(enc.graph.colors(), &[vec![0, 1, 2]]);
        assert_eq!(enc.graph.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn prime_weights_land_on_bit_layers() {
        // weights 1 = 0b01 and 2 = 0b10 on a path 0-1-2
        let g = GraphState::prime(3, [(0u32, 1u32, 1), (1, 2, 2)]).unwrap();
        let enc = Encoding::encode(&g, Partition::Member).unwrap();
        assert_eq!(enc.layers, 2);
        assert_eq!(enc.graph.vertex_count(), 6);
        let edges: Vec<_> = enc.graph.edges().collect();
        assert_eq!(edges, vec![(0, 1), (0, 3), (1, 4), (2, 5), (4, 5)]);
        assert_eq!(enc.graph.colors(), &[vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(enc.decode(4), (1, Slot::Vertex(Vertex::plain(1))));
    }

    #[test]
    fn member_colouring_groups_member_indices() {
        let g = GraphState::prime_power(2, 2, [((0, 0), (1, 1), 1)]).unwrap();
        let enc = Encoding::encode(&g, Partition::Member).unwrap();
        // slots: (0,0) (0,1) (1,0) (1,1)
        assert_eq!(enc.graph.colors(), &[vec![0, 2], vec![1, 3]]);
    }

    #[test]
    fn family_colouring_adds_auxiliary_vertices() {
        let g = GraphState::prime_power(2, 2, [((0, 0), (1, 1), 1)]).unwrap();
        let enc = Encoding::encode(&g, Partition::Family).unwrap();
        assert_eq!(enc.slots.len(), 6);
        assert_eq!(enc.slots[4], Slot::Family(0));
        assert_eq!(enc.graph.colors(), &[vec![0, 1, 2, 3], vec![4, 5]]);
        assert_eq!(enc.graph.neighbors(4), &[0, 1]);
        assert_eq!(enc.graph.neighbors(5), &[2, 3]);
    }
}
