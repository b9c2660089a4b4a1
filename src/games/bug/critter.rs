//! Critters: connected groups of same-colored stones, classified by shape.
//!
//! Two critters are the same kind when one can be rotated and/or
//! reflected onto the other. The canonical [`Shape`] is the smallest sorted
//! cell list over the twelve symmetries of the hex lattice, translated so
//! its minimum `q` and minimum `r` are zero.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::pieces::BugChip;
use crate::core::digest::mix64;
use crate::grid::{CellId, Grid};
use crate::pieces::Piece;

/// Canonical form of a critter's outline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shape(SmallVec<[(i8, i8); 8]>);

impl Shape {
    /// Canonicalize a set of axial positions.
    ///
    /// ```
    /// use board_engine::games::bug::Shape;
    ///
    /// let bar = Shape::canonical(&[(0, 0), (1, 0), (2, 0)]);
    /// let turned = Shape::canonical(&[(4, 1), (4, 2), (4, 3)]);
    /// let bent = Shape::canonical(&[(0, 0), (1, 0), (1, 1)]);
    /// assert_eq!(bar, turned);
    /// assert_ne!(bar, bent);
    /// ```
    #[must_use]
    pub fn canonical(positions: &[(i32, i32)]) -> Self {
        let mut best: Option<SmallVec<[(i8, i8); 8]>> = None;
        for reflect in [false, true] {
            for turns in 0..6 {
                let moved: SmallVec<[(i32, i32); 8]> = positions
                    .iter()
                    .map(|&(q, r)| {
                        let start = if reflect { (r, q) } else { (q, r) };
                        (0..turns).fold(start, |(q, r), _| (-r, q + r))
                    })
                    .collect();
                let min_q = moved.iter().map(|p| p.0).min().unwrap_or(0);
                let min_r = moved.iter().map(|p| p.1).min().unwrap_or(0);
                let mut cells: SmallVec<[(i8, i8); 8]> = moved
                    .iter()
                    .map(|&(q, r)| ((q - min_q) as i8, (r - min_r) as i8))
                    .collect();
                cells.sort_unstable();
                if best.as_ref().map_or(true, |b| cells < *b) {
                    best = Some(cells);
                }
            }
        }
        Shape(best.unwrap_or_default())
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalized cell offsets.
    #[must_use]
    pub fn offsets(&self) -> &[(i8, i8)] {
        &self.0
    }
}

/// One connected group of same-colored stones.
///
/// Stored by value: a critter recorded in a latent list stays valid only
/// while the board still holds exactly these cells as one group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Critter {
    chip: BugChip,
    cells: SmallVec<[CellId; 8]>,
    shape: Shape,
}

impl Critter {
    /// Build a critter from its member cells.
    pub fn new(grid: &Grid<BugChip>, chip: BugChip, cells: impl IntoIterator<Item = CellId>) -> Self {
        let mut cells: SmallVec<[CellId; 8]> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        let positions: SmallVec<[(i32, i32); 8]> = cells.iter().map(|&c| grid.cell(c).pos).collect();
        Self {
            chip,
            shape: Shape::canonical(&positions),
            cells,
        }
    }

    #[must_use]
    pub fn chip(&self) -> BugChip {
        self.chip
    }

    /// Member cells in id order.
    #[must_use]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.binary_search(&cell).is_ok()
    }

    /// Same shape regardless of color, position or orientation.
    #[must_use]
    pub fn same_kind(&self, other: &Critter) -> bool {
        self.shape == other.shape
    }

    /// True if `cell` is outside the critter and touches it.
    #[must_use]
    pub fn touches(&self, grid: &Grid<BugChip>, cell: CellId) -> bool {
        !self.contains(cell) && grid.neighbors(cell).any(|n| self.contains(n))
    }

    /// Cells adjacent to the critter, in id order.
    #[must_use]
    pub fn frontier(&self, grid: &Grid<BugChip>) -> SmallVec<[CellId; 16]> {
        let mut out: SmallVec<[CellId; 16]> = self
            .cells
            .iter()
            .flat_map(|&c| grid.neighbors(c))
            .filter(|&n| !self.contains(n))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub(crate) fn digest_item(&self) -> u64 {
        self.cells
            .iter()
            .fold(self.chip.digest_tag(), |acc, c| mix64(acc ^ (u64::from(c.0) + 1)))
    }
}

/// Every critter on a board, with a per-cell label.
///
/// Built without sweep marks so read-only callers (evaluators, legality
/// checks on a shared board) can use it.
#[derive(Clone, Debug)]
pub struct CritterMap {
    labels: Vec<Option<u32>>,
    critters: Vec<Critter>,
}

impl CritterMap {
    /// Label every occupied cell.
    #[must_use]
    pub fn build(grid: &Grid<BugChip>) -> Self {
        let mut labels: Vec<Option<u32>> = vec![None; grid.len()];
        let mut critters = Vec::new();
        for id in grid.ids() {
            if labels[id.index()].is_some() {
                continue;
            }
            let Some(chip) = grid.top(id) else {
                continue;
            };
            let label = critters.len() as u32;
            labels[id.index()] = Some(label);
            let mut members: SmallVec<[CellId; 8]> = smallvec![id];
            let mut next = 0;
            while next < members.len() {
                let cell = members[next];
                next += 1;
                for n in grid.neighbors(cell) {
                    if labels[n.index()].is_none() && grid.top(n) == Some(chip) {
                        labels[n.index()] = Some(label);
                        members.push(n);
                    }
                }
            }
            critters.push(Critter::new(grid, chip, members));
        }
        Self { labels, critters }
    }

    /// Label of the critter covering `cell`.
    #[must_use]
    pub fn label(&self, cell: CellId) -> Option<u32> {
        self.labels[cell.index()]
    }

    /// The critter covering `cell`.
    #[must_use]
    pub fn critter_at(&self, cell: CellId) -> Option<&Critter> {
        self.label(cell).map(|l| &self.critters[l as usize])
    }

    #[must_use]
    pub fn get(&self, label: u32) -> &Critter {
        &self.critters[label as usize]
    }

    /// All critters in discovery order.
    #[must_use]
    pub fn critters(&self) -> &[Critter] {
        &self.critters
    }

    /// Size of the largest critter of one color.
    #[must_use]
    pub fn largest(&self, chip: BugChip) -> usize {
        self.critters
            .iter()
            .filter(|c| c.chip == chip)
            .map(Critter::size)
            .max()
            .unwrap_or(0)
    }

    /// True if `critter` is still on the board with exactly these cells.
    #[must_use]
    pub fn is_current(&self, critter: &Critter) -> bool {
        critter
            .cells()
            .first()
            .and_then(|&c| self.critter_at(c))
            .is_some_and(|now| now == critter)
    }
}
