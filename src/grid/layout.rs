//! Grid construction, adjacency queries and sweep passes.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

use super::cell::{Cell, CellId, Coord};
use super::topology::Topology;
use crate::core::digest::mix64;
use crate::core::{EngineError, EngineResult};
use crate::pieces::Piece;

const LEVEL_STRIDE: u64 = 0xD6E8_FEB8_6659_FD93;

/// All cells of one board.
#[derive(Clone, Debug)]
pub struct Grid<P> {
    topology: Topology,
    cells: Vec<Cell<P>>,
    by_coord: FxHashMap<Coord, CellId>,
    by_pos: FxHashMap<(i32, i32), CellId>,
    salts: Vec<u64>,
    sweep_counter: u32,
}

impl<P: Piece> Grid<P> {
    /// Build a grid over the given lattice positions.
    ///
    /// Cells are numbered in `(q, r)` order so that ids do not depend on the
    /// order the caller lists positions in. A position `(q, r)` is named
    /// column `'A' + q`, row `r + 1`. Each cell gets a position salt drawn
    /// from `digest_seed`.
    pub fn new(
        topology: Topology,
        positions: impl IntoIterator<Item = (i32, i32)>,
        digest_seed: u64,
    ) -> Self {
        let mut positions: Vec<(i32, i32)> = positions.into_iter().collect();
        positions.sort_unstable();
        positions.dedup();

        let mut salts = ChaCha8Rng::seed_from_u64(digest_seed);
        let mut cells = Vec::with_capacity(positions.len());
        let mut by_coord = FxHashMap::default();
        let mut by_pos = FxHashMap::default();
        let mut salt_table = Vec::with_capacity(positions.len());

        for (i, &(q, r)) in positions.iter().enumerate() {
            let id = CellId(i as u16);
            let col = char::from(b'A' + q as u8);
            let coord = Coord::new(col, r + 1);
            cells.push(Cell::new(id, coord, (q, r)));
            by_coord.insert(coord, id);
            by_pos.insert((q, r), id);
            salt_table.push(salts.next_u64());
        }

        for cell in &mut cells {
            for d in 0..topology.directions() {
                cell.links[d] = by_pos.get(&topology.step(cell.pos, d)).copied();
            }
        }

        Self {
            topology,
            cells,
            by_coord,
            by_pos,
            salts: salt_table,
            sweep_counter: 0,
        }
    }

    /// Hexagonal board with `side` cells per edge.
    ///
    /// ```
    /// use board_engine::grid::{Coord, Grid};
    /// use board_engine::games::bug::BugChip;
    ///
    /// let grid: Grid<BugChip> = Grid::hexagon(4, 1);
    /// assert_eq!(grid.len(), 37);
    /// assert!(grid.find(Coord::new('D', 4)).is_some());
    /// ```
    #[must_use]
    pub fn hexagon(side: i32, digest_seed: u64) -> Self {
        let span = 2 * side - 1;
        let lo = side - 1;
        let hi = 3 * (side - 1);
        let positions = (0..span)
            .flat_map(|q| (0..span).map(move |r| (q, r)))
            .filter(|&(q, r)| q + r >= lo && q + r <= hi);
        Self::new(Topology::Hex6, positions, digest_seed)
    }

    /// Rectangular board of `cols` by `rows` cells.
    #[must_use]
    pub fn rectangle(cols: i32, rows: i32, topology: Topology, digest_seed: u64) -> Self {
        let positions = (0..cols).flat_map(|x| (0..rows).map(move |y| (x, y)));
        Self::new(topology, positions, digest_seed)
    }

    // === Lookup ===

    /// The adjacency rule of this grid.
    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a cell by id.
    #[inline]
    #[must_use]
    pub fn cell(&self, id: CellId) -> &Cell<P> {
        &self.cells[id.index()]
    }

    /// Get a mutable cell by id.
    #[inline]
    pub fn cell_mut(&mut self, id: CellId) -> &mut Cell<P> {
        &mut self.cells[id.index()]
    }

    /// Iterate over all cells.
    pub fn cells(&self) -> impl Iterator<Item = &Cell<P>> {
        self.cells.iter()
    }

    /// Iterate over all cell ids.
    pub fn ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len() as u16).map(CellId)
    }

    /// Iterate over the ids of non-empty cells.
    pub fn occupied(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().filter(|c| !c.is_empty()).map(|c| c.id)
    }

    /// Neighbour of `id` in direction `d`, or `None` off the board.
    #[inline]
    #[must_use]
    pub fn exit_to(&self, id: CellId, d: usize) -> Option<CellId> {
        let n = self.topology.directions();
        self.cells[id.index()].links[d % n]
    }

    /// All on-board neighbours of `id`.
    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = CellId> + '_ {
        let n = self.topology.directions();
        self.cells[id.index()].links[..n].iter().flatten().copied()
    }

    /// Direction from `from` to an adjacent `to`.
    #[must_use]
    pub fn direction_between(&self, from: CellId, to: CellId) -> Option<usize> {
        let n = self.topology.directions();
        self.cells[from.index()].links[..n]
            .iter()
            .position(|&l| l == Some(to))
    }

    /// Cell at a lattice position.
    #[must_use]
    pub fn at(&self, pos: (i32, i32)) -> Option<CellId> {
        self.by_pos.get(&pos).copied()
    }

    /// Cell with the given name.
    #[must_use]
    pub fn find(&self, coord: Coord) -> Option<CellId> {
        self.by_coord.get(&Coord::new(coord.col, coord.row)).copied()
    }

    /// Cell with the given name, or `NoSuchCell`.
    pub fn locate(&self, coord: Coord) -> EngineResult<CellId> {
        self.find(coord)
            .ok_or_else(|| EngineError::NoSuchCell(coord.to_string()))
    }

    /// Name of a cell.
    #[inline]
    #[must_use]
    pub fn coord(&self, id: CellId) -> Coord {
        self.cells[id.index()].coord
    }

    // === Contents ===

    /// Top piece of a cell.
    #[inline]
    #[must_use]
    pub fn top(&self, id: CellId) -> Option<P> {
        self.cells[id.index()].top()
    }

    /// Place a piece on top of a cell.
    pub fn push(&mut self, id: CellId, piece: P) {
        self.cells[id.index()].push(piece);
    }

    /// Remove the top piece of a cell.
    pub fn pop(&mut self, id: CellId) -> Option<P> {
        self.cells[id.index()].pop()
    }

    /// Clear every cell in place.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.sweep_counter = 0;
    }

    // === Sweeps ===

    /// Start a new traversal. Every cell is unmarked afterwards.
    pub fn begin_sweep(&mut self) -> u32 {
        if self.sweep_counter == u32::MAX {
            for cell in &mut self.cells {
                cell.sweep = 0;
            }
            self.sweep_counter = 0;
        }
        self.sweep_counter += 1;
        self.sweep_counter
    }

    /// Mark a cell in the current sweep. Returns `false` if it was already
    /// marked.
    pub fn mark(&mut self, id: CellId) -> bool {
        let counter = self.sweep_counter;
        let cell = &mut self.cells[id.index()];
        if cell.sweep == counter {
            false
        } else {
            cell.sweep = counter;
            true
        }
    }

    /// Check if a cell was marked in the current sweep.
    #[must_use]
    pub fn is_marked(&self, id: CellId) -> bool {
        self.sweep_counter != 0 && self.cells[id.index()].sweep == self.sweep_counter
    }

    // === Digest and comparison ===

    /// XOR of one contribution per stacked piece. Empty cells add nothing.
    #[must_use]
    pub fn digest_contents(&self) -> u64 {
        let mut v = 0;
        for (cell, &salt) in self.cells.iter().zip(&self.salts) {
            for (level, piece) in cell.contents().iter().enumerate() {
                let level_mix = mix64((level as u64 + 1).wrapping_mul(LEVEL_STRIDE));
                v ^= mix64(salt ^ piece.digest_tag() ^ level_mix);
            }
        }
        v
    }

    /// Compare contents cell by cell, ignoring sweep marks.
    #[must_use]
    pub fn same_contents(&self, other: &Self) -> bool {
        self.topology == other.topology
            && self.cells.len() == other.cells.len()
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.contents() == b.contents())
    }

    /// First cell whose contents differ from `other`.
    #[must_use]
    pub fn first_difference(&self, other: &Self) -> Option<Coord> {
        self.cells
            .iter()
            .zip(&other.cells)
            .find(|(a, b)| a.contents() != b.contents())
            .map(|(a, _)| a.coord)
    }
}
