//! Neighbour topologies.

use serde::{Deserialize, Serialize};

const HEX6: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];
const RECT4: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];
const RECT8: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Maximum number of neighbours any topology has.
pub const MAX_DIRECTIONS: usize = 8;

/// Adjacency rule for a board.
///
/// Hex boards use axial coordinates `(q, r)`; rectangular boards use
/// `(x, y)`. Directions are numbered so that `reverse(d)` is always
/// `(d + n/2) % n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    /// Six neighbours on an axial hex lattice.
    Hex6,
    /// Orthogonal neighbours only.
    Rect4,
    /// Orthogonal and diagonal neighbours.
    Rect8,
}

impl Topology {
    /// Coordinate offsets for each direction.
    #[must_use]
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Topology::Hex6 => &HEX6,
            Topology::Rect4 => &RECT4,
            Topology::Rect8 => &RECT8,
        }
    }

    /// Number of directions.
    #[must_use]
    pub fn directions(self) -> usize {
        self.offsets().len()
    }

    /// The opposite of direction `d`.
    #[must_use]
    pub fn reverse(self, d: usize) -> usize {
        let n = self.directions();
        (d + n / 2) % n
    }

    /// Direction whose offset is exactly `(dq, dr)`.
    #[must_use]
    pub fn find_direction(self, dq: i32, dr: i32) -> Option<usize> {
        self.offsets().iter().position(|&o| o == (dq, dr))
    }

    /// Step from `(q, r)` one cell in direction `d`.
    #[must_use]
    pub fn step(self, (q, r): (i32, i32), d: usize) -> (i32, i32) {
        let (dq, dr) = self.offsets()[d % self.directions()];
        (q + dq, r + dr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_counts() {
        assert_eq!(Topology::Hex6.directions(), 6);
        assert_eq!(Topology::Rect4.directions(), 4);
        assert_eq!(Topology::Rect8.directions(), 8);
    }

    #[test]
    fn test_reverse_cancels_offset() {
        for topo in [Topology::Hex6, Topology::Rect4, Topology::Rect8] {
            for d in 0..topo.directions() {
                let back = topo.step(topo.step((3, 3), d), topo.reverse(d));
                assert_eq!(back, (3, 3), "{topo:?} direction {d}");
            }
        }
    }

    #[test]
    fn test_find_direction() {
        assert_eq!(Topology::Hex6.find_direction(-1, 1), Some(4));
        assert_eq!(Topology::Hex6.find_direction(1, 1), None);
        assert_eq!(Topology::Rect8.find_direction(1, 1), Some(1));
        assert_eq!(Topology::Rect4.find_direction(1, 1), None);
    }
}
