use std::iter::FusedIterator;
use std::slice;

use gridstar_core::{Coord, Dims};

/// The set of permitted movement directions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topology {
    /// Up, down, left and right.
    #[default]
    FourWay,
    /// The four orthogonal moves plus the four diagonals.
    EightWay,
}

/// Kind of a single step between adjacent cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Orthogonal,
    Diagonal,
}

// Emission order: up, down, left, right, then the diagonals.
const OFFSETS: [(Coord, Move); 8] = [
    (Coord::new(-1, 0), Move::Orthogonal),
    (Coord::new(1, 0), Move::Orthogonal),
    (Coord::new(0, -1), Move::Orthogonal),
    (Coord::new(0, 1), Move::Orthogonal),
    (Coord::new(-1, -1), Move::Diagonal),
    (Coord::new(-1, 1), Move::Diagonal),
    (Coord::new(1, -1), Move::Diagonal),
    (Coord::new(1, 1), Move::Diagonal),
];

impl Topology {
    /// Number of movement directions.
    #[inline]
    pub fn directions(self) -> usize {
        match self {
            Self::FourWay => 4,
            Self::EightWay => 8,
        }
    }

    /// Offsets and move kinds in emission order.
    #[inline]
    pub fn offsets(self) -> &'static [(Coord, Move)] {
        &OFFSETS[..self.directions()]
    }

    /// The move leading from `from` to `to`, if they are adjacent under this
    /// topology.
    pub fn step(self, from: Coord, to: Coord) -> Option<Move> {
        let d = to - from;
        self.offsets()
            .iter()
            .find(|(off, _)| *off == d)
            .map(|&(_, mv)| mv)
    }
}

/// Lazy iterator over the in-bounds neighbours of a cell.
///
/// Yields each neighbour together with the [`Move`] that reaches it, in the
/// fixed order of [`Topology::offsets`]. Blocked cells are not filtered here.
#[derive(Clone, Debug)]
pub struct Neighbors {
    origin: Coord,
    dims: Dims,
    offsets: slice::Iter<'static, (Coord, Move)>,
}

impl Neighbors {
    /// Neighbours of `origin` inside `dims` under `topology`.
    pub fn new(origin: Coord, dims: Dims, topology: Topology) -> Self {
        Self {
            origin,
            dims,
            offsets: topology.offsets().iter(),
        }
    }
}

impl Iterator for Neighbors {
    type Item = (Coord, Move);

    fn next(&mut self) -> Option<(Coord, Move)> {
        for &(off, mv) in self.offsets.by_ref() {
            let n = self.origin + off;
            if self.dims.contains(n) {
                return Some((n, mv));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.offsets.len()))
    }
}

impl FusedIterator for Neighbors {}
