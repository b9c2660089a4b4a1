//! Volcano board: cap slides, eruptions and nest scoring.
//!
//! Every cell starts with a nest (large, medium and small pyramid of one
//! color) and five cells also carry a black cap. A ply slides caps onto
//! neighbors without one. A slide whose uncovered stack can flow erupts in
//! the same direction, one piece per cell, until it runs dry, leaves the
//! board or meets another cap, and that ends the ply. Quiet slides, where
//! nothing can flow, reposition caps first; none may bring back a layout the
//! mover already stood on this turn. On `done` every cell along the flow
//! whose top two pyramids are the same size loses its top pyramid to the
//! mover.

use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::moves::{VolcanoAction, VolcanoMove};
use super::pieces::{Pyramid, PyramidColor, PyramidSize};
use super::state::VolcanoState;
use crate::cascade::{propagate, unwind, CaptureStack, Edit, Journal, PropagationRecord};
use crate::core::{
    Digester, EngineError, EngineResult, GameInit, GameRng, GameStatus, PlayerId, PlayerMap,
    ReplayMode, RevisionRange,
};
use crate::grid::{Cell, CellId, Coord, Grid, Topology};
use crate::moves::MoveSpec;
use crate::pieces::Piece;
use crate::record::RepetitionTable;
use crate::rules::{GameBoard, GameResult, RenderSnapshot, Spot};

/// Seed of the cell salts.
pub const VOLCANO_DIGEST_SEED: u64 = 64 * 1000;

const VOLCANO_STATE_SEED: u64 = !VOLCANO_DIGEST_SEED;

/// Supported rules revisions.
pub const VOLCANO_REVISIONS: RevisionRange = RevisionRange::new(100, 101);

const BOARD_SIZE: i32 = 5;

/// Capturing at least one pyramid of every nest color ends the game.
const COLORS_TO_WIN: usize = 5;

/// Random swaps used to scramble the `volcano-r` layout.
const SHUFFLE_SWAPS: usize = 999;

const CAP_CELLS: [(char, i32); 5] = [('B', 2), ('D', 2), ('C', 3), ('B', 4), ('D', 4)];

// ============================================================================
// Variations, rules and scoring
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolcanoVariation {
    /// Fixed Latin-square layout.
    Volcano,
    /// Layout scrambled from the init seed.
    VolcanoR,
}

impl VolcanoVariation {
    pub const ALL: [VolcanoVariation; 2] = [VolcanoVariation::Volcano, VolcanoVariation::VolcanoR];

    pub fn from_name(name: &str) -> EngineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::UnknownVariation(name.to_string()))
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            VolcanoVariation::Volcano => "volcano",
            VolcanoVariation::VolcanoR => "volcano-r",
        }
    }
}

/// Compatibility flags derived from a rules revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolcanoRules {
    /// Caps may slide without erupting before the ply's eruption
    /// (revision 101). Revision 100 records only ever erupt.
    pub quiet_slides: bool,
}

impl VolcanoRules {
    #[must_use]
    pub fn for_revision(revision: u32) -> Self {
        Self {
            quiet_slides: revision >= 101,
        }
    }
}

/// Breakdown of one seat's captured pyramids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Complete same-color nests.
    pub matched: u32,
    /// Mixed-color nests built from the leftovers.
    pub unmatched: u32,
    /// Pyramids in neither.
    pub other: u32,
    /// Nest colors with at least one capture.
    pub colors: usize,
}

impl Score {
    /// Seven per nest, five per mixed nest, one per loose pyramid.
    #[must_use]
    pub fn total(&self) -> u32 {
        7 * self.matched + 5 * self.unmatched + self.other
    }

    /// Score a pile of captured pyramids. Caps never count.
    pub fn of(pieces: impl IntoIterator<Item = Pyramid>) -> Self {
        let mut counts = [[0u32; 3]; 5];
        for p in pieces {
            if let Some(color) = PyramidColor::NEST_COLORS.iter().position(|&c| c == p.color) {
                counts[color][p.size as usize] += 1;
            }
        }
        let mut score = Score::default();
        let mut leftover = [0u32; 3];
        for row in counts {
            let nests = row.iter().copied().min().unwrap_or(0);
            score.matched += nests;
            if row.iter().any(|&n| n > 0) {
                score.colors += 1;
            }
            for (left, n) in leftover.iter_mut().zip(row) {
                *left += n - nests;
            }
        }
        score.unmatched = leftover.iter().copied().min().unwrap_or(0);
        score.other = leftover.iter().sum::<u32>() - 3 * score.unmatched;
        score
    }
}

// ============================================================================
// Sub-action bookkeeping and undo
// ============================================================================

/// A piece lifted off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Held {
    piece: Pyramid,
    source: CellId,
}

/// The eruption waiting for `done`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Eruption {
    from: CellId,
    to: CellId,
    flow: PropagationRecord,
}

impl Eruption {
    fn digest_item(&self) -> u64 {
        (u64::from(self.from.0) + 1) << 16 | (u64::from(self.to.0) + 1)
    }
}

/// Everything `unexecute` needs to put the board back.
#[derive(Clone, Debug)]
pub(crate) struct VolcanoUndo {
    state: VolcanoState,
    unresign: Option<VolcanoState>,
    whose_turn: PlayerId,
    move_number: u32,
    held: Option<Held>,
    eruption: Option<Eruption>,
    win: PlayerMap<bool>,
    ply_layouts: RepetitionTable,
    capture_depth: usize,
    flow: Option<PropagationRecord>,
    edits: SmallVec<[Edit<Pyramid>; 4]>,
}

fn capped(cell: &Cell<Pyramid>) -> bool {
    cell.top().is_some_and(Pyramid::is_cap)
}

/// Top two pyramids have the same size.
fn same_top_size(cell: &Cell<Pyramid>) -> bool {
    match (cell.top(), cell.below_top()) {
        (Some(a), Some(b)) => a.size == b.size,
        _ => false,
    }
}

// ============================================================================
// Board
// ============================================================================

/// A Volcano position with its state machine.
#[derive(Clone, Debug)]
pub struct VolcanoBoard {
    init: GameInit,
    variation: VolcanoVariation,
    revision: u32,
    rules: VolcanoRules,
    grid: Grid<Pyramid>,
    state: VolcanoState,
    unresign: Option<VolcanoState>,
    whose_turn: PlayerId,
    move_number: u32,
    held: Option<Held>,
    eruption: Option<Eruption>,
    captures: CaptureStack<Pyramid>,
    win: PlayerMap<bool>,
    /// Layouts the mover has stood on since the ply began.
    ply_layouts: RepetitionTable,
    journal: Journal<Pyramid>,
    /// Flow produced by the action being executed, moved into its undo.
    flow: Option<PropagationRecord>,
    animations: Vec<(Spot, Spot)>,
}

impl VolcanoBoard {
    /// Build a board from an init record such as `volcano-r 2 77 101`.
    pub fn new(init: &GameInit) -> EngineResult<Self> {
        let mut board = Self {
            init: init.clone(),
            variation: VolcanoVariation::from_name(&init.variation)?,
            revision: VOLCANO_REVISIONS.max,
            rules: VolcanoRules::for_revision(VOLCANO_REVISIONS.max),
            grid: Grid::rectangle(BOARD_SIZE, BOARD_SIZE, Topology::Rect8, VOLCANO_DIGEST_SEED),
            state: VolcanoState::Play,
            unresign: None,
            whose_turn: PlayerId::new(0),
            move_number: 0,
            held: None,
            eruption: None,
            captures: CaptureStack::new(2),
            win: PlayerMap::with_value(2, false),
            ply_layouts: RepetitionTable::new(),
            journal: Journal::new(),
            flow: None,
            animations: Vec::new(),
        };
        board.do_init(init)?;
        Ok(board)
    }

    // === Accessors ===

    #[must_use]
    pub fn grid(&self) -> &Grid<Pyramid> {
        &self.grid
    }

    #[must_use]
    pub fn variation(&self) -> VolcanoVariation {
        self.variation
    }

    #[must_use]
    pub fn revision(&self) -> u32 {
        self.revision
    }

    #[must_use]
    pub fn rules(&self) -> VolcanoRules {
        self.rules
    }

    #[must_use]
    pub fn captures(&self) -> &CaptureStack<Pyramid> {
        &self.captures
    }

    /// The piece currently held, if any.
    #[must_use]
    pub fn picked(&self) -> Option<Pyramid> {
        self.held.map(|h| h.piece)
    }

    /// Score of everything `player` has captured so far.
    #[must_use]
    pub fn score(&self, player: PlayerId) -> Score {
        Score::of(self.captures.captured_by(player))
    }

    /// Number of cap slides available to the side to move.
    pub fn slide_count(&mut self) -> usize {
        self.slides().len()
    }

    // === Layout ===

    fn lay_out(&mut self, variation: VolcanoVariation, seed: u64) -> EngineResult<()> {
        self.grid.reset();
        let ids: Vec<CellId> = self.grid.ids().collect();
        for &id in &ids {
            let (x, y) = self.grid.cell(id).pos;
            let color = PyramidColor::NEST_COLORS[(x + 2 * y).rem_euclid(5) as usize];
            for size in PyramidSize::ALL.into_iter().rev() {
                self.grid.push(id, Pyramid::new(color, size));
            }
        }
        for (col, row) in CAP_CELLS {
            let id = self.grid.locate(Coord::new(col, row))?;
            self.grid.push(id, Pyramid::CAP);
        }
        if variation == VolcanoVariation::VolcanoR {
            let mut rng = GameRng::new(seed).for_context("volcano-r");
            for _ in 0..SHUFFLE_SWAPS {
                let a = ids[rng.gen_range_usize(0..ids.len())];
                let b = ids[rng.gen_range_usize(0..ids.len())];
                if a != b && self.grid.cell(a).height() >= 2 && self.grid.cell(b).height() >= 2 {
                    self.swap_stacks(a, b);
                }
            }
        }
        Ok(())
    }

    fn swap_stacks(&mut self, a: CellId, b: CellId) {
        let left = self.grid.cell(a).contents().to_vec();
        let right = self.grid.cell(b).contents().to_vec();
        self.grid.cell_mut(a).clear();
        self.grid.cell_mut(b).clear();
        for p in right {
            self.grid.push(a, p);
        }
        for p in left {
            self.grid.push(b, p);
        }
    }

    // === Legality ===

    /// Something would flow out from under the cap on (or lifted from)
    /// `from`.
    fn lava_under(&self, from: CellId) -> bool {
        let height = self.grid.cell(from).height();
        if self.held.is_some_and(|h| h.source == from) {
            height >= 1
        } else {
            height >= 2
        }
    }

    /// Cells a cap from `from` may slide onto with an eruption.
    fn eruptions_from(&self, from: CellId) -> SmallVec<[CellId; 8]> {
        let mut out = SmallVec::new();
        if !self.lava_under(from) {
            return out;
        }
        for d in 0..self.grid.topology().directions() {
            let Some(to) = self.grid.exit_to(from, d) else {
                continue;
            };
            if capped(self.grid.cell(to)) {
                continue;
            }
            let beyond = self.grid.exit_to(to, d);
            if beyond.is_some_and(|b| !capped(self.grid.cell(b))) {
                out.push(to);
            }
        }
        out
    }

    /// Cells a cap from `from` may slide onto without erupting.
    fn quiet_from(&mut self, from: CellId) -> SmallVec<[CellId; 8]> {
        let mut out = SmallVec::new();
        if !self.rules.quiet_slides {
            return out;
        }
        let lava = self.lava_under(from);
        for d in 0..self.grid.topology().directions() {
            let Some(to) = self.grid.exit_to(from, d) else {
                continue;
            };
            if capped(self.grid.cell(to)) {
                continue;
            }
            let flows = lava
                && self
                    .grid
                    .exit_to(to, d)
                    .is_some_and(|b| !capped(self.grid.cell(b)));
            if flows {
                continue;
            }
            let layout = self.layout_after(from, to);
            if self.ply_layouts.count(layout) == 0 {
                out.push(to);
            }
        }
        out
    }

    /// Every destination for the cap on (or lifted from) `from`.
    fn destinations(&mut self, from: CellId) -> SmallVec<[CellId; 8]> {
        let mut out = self.eruptions_from(from);
        out.extend(self.quiet_from(from));
        out
    }

    /// Board layout once the cap on (or lifted from) `from` sits on `to`.
    fn layout_after(&mut self, from: CellId, to: CellId) -> u64 {
        let lifted = self.held.is_some_and(|h| h.source == from);
        if !lifted {
            self.grid.pop(from);
        }
        self.grid.push(to, Pyramid::CAP);
        let layout = self.grid.digest_contents();
        self.grid.pop(to);
        if !lifted {
            self.grid.push(from, Pyramid::CAP);
        }
        layout
    }

    fn cap_cells(&self) -> Vec<CellId> {
        self.grid
            .cells()
            .filter(|c| capped(c))
            .map(|c| c.id)
            .collect()
    }

    /// Every cap slide open to the side to move, eruptions first.
    fn slides(&mut self) -> Vec<(CellId, CellId)> {
        let caps = self.cap_cells();
        let mut out: Vec<(CellId, CellId)> = caps
            .iter()
            .flat_map(|&from| self.eruptions_from(from).into_iter().map(move |to| (from, to)))
            .collect();
        for &from in &caps {
            out.extend(self.quiet_from(from).into_iter().map(|to| (from, to)));
        }
        out
    }

    fn has_slide(&mut self) -> bool {
        let caps = self.cap_cells();
        caps.iter().any(|&c| !self.eruptions_from(c).is_empty())
            || caps.iter().any(|&c| !self.quiet_from(c).is_empty())
    }

    /// Forget the previous ply's layouts and stand on the current one.
    fn begin_ply(&mut self) {
        self.ply_layouts.clear();
        self.ply_layouts.record(self.grid.digest_contents());
    }

    // === State transitions ===

    fn set_state(&mut self, state: VolcanoState) {
        self.unresign = (state == VolcanoState::Resign).then_some(self.state);
        self.state = state;
        if !state.is_terminal() {
            self.win.fill(false);
        }
    }

    fn illegal(&self, action: VolcanoAction) -> EngineError {
        EngineError::illegal(action, self.state)
    }

    fn lift(&mut self, cell: CellId, action: VolcanoAction) -> EngineResult<()> {
        let piece = self
            .journal
            .pop(&mut self.grid, cell)
            .ok_or_else(|| self.illegal(action))?;
        self.held = Some(Held {
            piece,
            source: cell,
        });
        Ok(())
    }

    /// Put the held piece back where it came from.
    fn un_pick(&mut self) {
        if let Some(held) = self.held.take() {
            self.journal.push(&mut self.grid, held.source, held.piece);
        }
    }

    /// Drop the held cap on `to` and erupt the stack it came from, or
    /// settle for a quiet slide when nothing can flow.
    fn slide(&mut self, to: CellId, action: VolcanoAction, mode: ReplayMode) -> EngineResult<()> {
        let held = self.held.ok_or_else(|| self.illegal(action))?;
        let from = held.source;
        let direction = self
            .grid
            .direction_between(from, to)
            .ok_or_else(|| self.illegal(action))?;
        if !held.piece.is_cap() || capped(self.grid.cell(to)) {
            return Err(self.illegal(action));
        }
        self.held = None;
        self.journal.push(&mut self.grid, to, held.piece);
        self.grid.cell_mut(to).last_changed = Some(self.move_number);

        let flow = propagate(&mut self.grid, from, to, direction, capped);
        if flow.is_empty() {
            self.flow = Some(flow);
            return self.quiet_slide(from, to, action, mode);
        }
        if mode.animate() {
            let source = Spot::Cell(self.grid.coord(from));
            self.animations.push((source, Spot::Cell(self.grid.coord(to))));
            for &cell in &flow.path {
                self.animations.push((source, Spot::Cell(self.grid.coord(cell))));
            }
        }
        debug!(
            "volcano: {} erupts {} pieces from {}",
            self.whose_turn,
            flow.path.len(),
            self.grid.coord(from)
        );
        self.eruption = Some(Eruption {
            from,
            to,
            flow: flow.clone(),
        });
        self.flow = Some(flow);
        self.set_state(VolcanoState::Confirm);
        Ok(())
    }

    /// Finish a slide that erupted nothing. The ply goes on unless the
    /// mover is left without a slide.
    fn quiet_slide(
        &mut self,
        from: CellId,
        to: CellId,
        action: VolcanoAction,
        mode: ReplayMode,
    ) -> EngineResult<()> {
        if !self.rules.quiet_slides {
            return Err(self.illegal(action));
        }
        let layout = self.grid.digest_contents();
        if self.ply_layouts.count(layout) > 0 {
            return Err(self.illegal(action));
        }
        self.ply_layouts.record(layout);
        if mode.animate() {
            self.animations
                .push((Spot::Cell(self.grid.coord(from)), Spot::Cell(self.grid.coord(to))));
        }
        debug!(
            "volcano: {} slides a cap {} -> {}",
            self.whose_turn,
            self.grid.coord(from),
            self.grid.coord(to)
        );
        if !self.has_slide() {
            self.settle_scores();
        }
        Ok(())
    }

    /// Take back the pending eruption, leaving its cap in hand.
    fn un_erupt(&mut self, action: VolcanoAction) -> EngineResult<()> {
        let eruption = self.eruption.take().ok_or_else(|| self.illegal(action))?;
        for &cell in eruption.flow.path.iter().rev() {
            if let Some(piece) = self.journal.pop(&mut self.grid, cell) {
                self.journal.push(&mut self.grid, eruption.from, piece);
            }
        }
        let cap = self
            .journal
            .pop(&mut self.grid, eruption.to)
            .ok_or_else(|| self.illegal(action))?;
        self.held = Some(Held {
            piece: cap,
            source: eruption.from,
        });
        self.set_state(VolcanoState::Play);
        Ok(())
    }

    fn apply_action(&mut self, action: VolcanoAction, mode: ReplayMode) -> EngineResult<()> {
        match action {
            VolcanoAction::Done => {
                if !self.state.is_done_eligible() {
                    return Err(self.illegal(action));
                }
                self.do_done(mode)
            }
            VolcanoAction::Move { from, to } => {
                if self.state != VolcanoState::Play || self.held.is_some() {
                    return Err(self.illegal(action));
                }
                let from = self.grid.locate(from)?;
                let to = self.grid.locate(to)?;
                if !capped(self.grid.cell(from)) {
                    return Err(self.illegal(action));
                }
                self.lift(from, action)?;
                self.slide(to, action, mode)
            }
            VolcanoAction::PickB(coord) => {
                let cell = self.grid.locate(coord)?;
                match self.state {
                    VolcanoState::Confirm
                        if self.eruption.as_ref().is_some_and(|e| e.to == cell) =>
                    {
                        self.un_erupt(action)
                    }
                    VolcanoState::Play if self.held.is_none() && capped(self.grid.cell(cell)) => {
                        self.lift(cell, action)
                    }
                    VolcanoState::Puzzle if self.held.is_none() => self.lift(cell, action),
                    _ => Err(self.illegal(action)),
                }
            }
            VolcanoAction::DropB(coord) => {
                let cell = self.grid.locate(coord)?;
                let held = self.held.ok_or_else(|| self.illegal(action))?;
                if held.source == cell {
                    self.un_pick();
                    return Ok(());
                }
                match self.state {
                    VolcanoState::Play => self.slide(cell, action, mode),
                    VolcanoState::Puzzle => {
                        self.held = None;
                        self.journal.push(&mut self.grid, cell, held.piece);
                        Ok(())
                    }
                    _ => Err(self.illegal(action)),
                }
            }
            VolcanoAction::Start(player) => {
                if player.index() >= 2 {
                    return Err(self.illegal(action));
                }
                self.un_pick();
                self.eruption = None;
                self.whose_turn = player;
                self.set_state(VolcanoState::Play);
                self.begin_ply();
                Ok(())
            }
            VolcanoAction::Resign => {
                if matches!(self.state, VolcanoState::Gameover | VolcanoState::Puzzle) {
                    return Err(self.illegal(action));
                }
                let target = self.unresign.unwrap_or(VolcanoState::Resign);
                self.set_state(target);
                Ok(())
            }
            VolcanoAction::Edit => {
                self.un_pick();
                self.eruption = None;
                self.whose_turn = PlayerId::new(0);
                self.set_state(VolcanoState::Puzzle);
                Ok(())
            }
            VolcanoAction::GameOverOnTime => {
                self.win[self.whose_turn] = true;
                self.set_state(VolcanoState::Gameover);
                Ok(())
            }
        }
    }

    // === Cascade ===

    fn do_done(&mut self, mode: ReplayMode) -> EngineResult<()> {
        if self.state == VolcanoState::Resign {
            self.un_pick();
            self.eruption = None;
            let winner = self.whose_turn.next(2);
            self.win[winner] = true;
            self.set_state(VolcanoState::Gameover);
            return Ok(());
        }
        let eruption = self
            .eruption
            .take()
            .ok_or_else(|| EngineError::illegal("done without an eruption", self.state))?;

        let me = self.whose_turn;
        let grid = &self.grid;
        let hits: SmallVec<[CellId; 8]> = eruption
            .flow
            .path
            .iter()
            .copied()
            .filter(|&c| same_top_size(grid.cell(c)))
            .collect();
        let taken = self.captures.capture(&mut self.grid, me, hits.iter().copied());
        if taken > 0 {
            debug!("volcano: {me} captured {taken} pyramids");
            if mode.animate() {
                for &cell in &hits {
                    self.animations
                        .push((Spot::Cell(self.grid.coord(cell)), Spot::Reserve(me)));
                }
            }
        }
        self.finish_turn();
        Ok(())
    }

    /// End the game once the mover holds every nest color, otherwise pass
    /// the turn. A side left without any slide ends it as well.
    fn finish_turn(&mut self) {
        let me = self.whose_turn;
        if self.score(me).colors >= COLORS_TO_WIN {
            self.settle_scores();
            return;
        }
        self.move_number += 1;
        self.whose_turn = me.next(2);
        self.set_state(VolcanoState::Play);
        self.begin_ply();
        if !self.has_slide() {
            debug!("volcano: {} has no slide", self.whose_turn);
            self.settle_scores();
        }
    }

    /// Game over on points; equal totals are a draw.
    fn settle_scores(&mut self) {
        let me = self.whose_turn;
        let opponent = me.next(2);
        let (a, b) = (self.score(me).total(), self.score(opponent).total());
        debug!("volcano: game over, {me} scores {a} against {b}");
        self.win[me] = a > b;
        self.win[opponent] = b > a;
        self.set_state(VolcanoState::Gameover);
    }

    // === Undo ===

    fn undo_snapshot(&self) -> VolcanoUndo {
        VolcanoUndo {
            state: self.state,
            unresign: self.unresign,
            whose_turn: self.whose_turn,
            move_number: self.move_number,
            held: self.held,
            eruption: self.eruption.clone(),
            win: self.win.clone(),
            ply_layouts: self.ply_layouts.clone(),
            capture_depth: self.captures.depth(),
            flow: None,
            edits: SmallVec::new(),
        }
    }

    fn restore(&mut self, undo: &VolcanoUndo) {
        self.captures.unwind_to(&mut self.grid, undo.capture_depth);
        if let Some(flow) = &undo.flow {
            unwind(&mut self.grid, flow);
        }
        Journal::rollback(&mut self.grid, &undo.edits);
        self.state = undo.state;
        self.unresign = undo.unresign;
        self.whose_turn = undo.whose_turn;
        self.move_number = undo.move_number;
        self.held = undo.held;
        self.eruption = undo.eruption.clone();
        self.win = undo.win.clone();
        self.ply_layouts = undo.ply_layouts.clone();
    }
}

fn mismatch(what: &str) -> EngineError {
    EngineError::BoardMismatch(format!("{what} differs"))
}

impl GameBoard for VolcanoBoard {
    type Move = VolcanoMove;
    type State = VolcanoState;

    fn do_init(&mut self, init: &GameInit) -> EngineResult<()> {
        let variation = VolcanoVariation::from_name(&init.variation)?;
        let revision = VOLCANO_REVISIONS.resolve(init.revision)?;
        if init.players != 2 {
            return Err(EngineError::MalformedInit(init.to_string()));
        }
        self.lay_out(variation, init.seed)?;
        self.init = init.clone().with_revision(revision);
        self.variation = variation;
        self.revision = revision;
        self.rules = VolcanoRules::for_revision(revision);
        self.state = VolcanoState::Play;
        self.unresign = None;
        self.whose_turn = PlayerId::new(0);
        self.move_number = 0;
        self.held = None;
        self.eruption = None;
        self.captures.clear();
        self.win.fill(false);
        self.journal.take();
        self.flow = None;
        self.animations.clear();
        self.begin_ply();
        Ok(())
    }

    fn game_init(&self) -> &GameInit {
        &self.init
    }

    fn player_count(&self) -> usize {
        2
    }

    fn whose_turn(&self) -> PlayerId {
        self.whose_turn
    }

    fn state(&self) -> VolcanoState {
        self.state
    }

    fn move_number(&self) -> u32 {
        self.move_number
    }

    fn execute(&mut self, m: &mut VolcanoMove, mode: ReplayMode) -> EngineResult<()> {
        if mode.animate() {
            self.animations.clear();
        }
        self.journal.take();
        self.flow = None;
        let mut undo = Box::new(self.undo_snapshot());
        let outcome = self.apply_action(m.action, mode);
        undo.edits = self.journal.take();
        undo.flow = self.flow.take();
        if let Err(e) = outcome {
            self.restore(&undo);
            return Err(e);
        }
        m.undo = Some(undo);
        Ok(())
    }

    fn finalize_ply(&mut self, mode: ReplayMode) -> EngineResult<()> {
        if !self.state.is_done_eligible() {
            return Err(self.illegal(VolcanoAction::Done));
        }
        self.do_done(mode)
    }

    fn unexecute(&mut self, m: &VolcanoMove) -> EngineResult<()> {
        let undo = m
            .undo
            .as_deref()
            .ok_or_else(|| EngineError::CannotUnexecute(m.move_string()))?;
        self.restore(undo);
        Ok(())
    }

    fn legal_moves(&mut self) -> Vec<VolcanoMove> {
        let me = self.whose_turn;
        match self.state {
            VolcanoState::Play => match self.held {
                Some(held) => {
                    let mut targets = self.destinations(held.source);
                    if targets.is_empty() {
                        targets.push(held.source);
                    }
                    targets
                        .into_iter()
                        .map(|to| VolcanoMove::new(VolcanoAction::DropB(self.grid.coord(to)), me))
                        .collect()
                }
                None => self
                    .slides()
                    .into_iter()
                    .map(|(from, to)| {
                        VolcanoMove::slide(self.grid.coord(from), self.grid.coord(to), me)
                    })
                    .collect(),
            },
            VolcanoState::Confirm | VolcanoState::Resign => vec![VolcanoMove::done(me)],
            VolcanoState::Puzzle | VolcanoState::Gameover => Vec::new(),
        }
    }

    fn digest(&self) -> u64 {
        let mut d = Digester::new(VOLCANO_STATE_SEED);
        let mut v = self.grid.digest_contents();
        v ^= d.optional(self.held.map(|h| h.piece.digest_tag()));
        v ^= d.optional(self.held.map(|h| u64::from(h.source.0) + 1));
        v ^= d.optional(self.eruption.as_ref().map(Eruption::digest_item));
        v ^= d.scalar(u64::from(self.revision));
        v ^= d.scalar(self.state.ordinal());
        v ^= d.scalar(u64::from(self.whose_turn.0));
        v ^= d.sequence(self.captures.tallies().iter().map(|(_, &n)| u64::from(n)));
        v ^= d.sequence(self.captures.digest_items());
        if self.rules.quiet_slides {
            v ^= d.scalar(self.ply_layouts.len() as u64);
        }
        for (_, &won) in self.win.iter() {
            v ^= d.flag(won);
        }
        v
    }

    fn result(&self) -> Option<GameResult> {
        if !self.state.is_terminal() {
            return None;
        }
        let winners: Vec<PlayerId> = self
            .win
            .iter()
            .filter(|(_, won)| **won)
            .map(|(p, _)| p)
            .collect();
        Some(match winners.as_slice() {
            [] => GameResult::Draw,
            [p] => GameResult::Winner(*p),
            _ => GameResult::Winners(winners),
        })
    }

    fn same_board(&self, other: &Self) -> EngineResult<()> {
        if let Some(coord) = self.grid.first_difference(&other.grid) {
            return Err(EngineError::BoardMismatch(format!("cell {coord} differs")));
        }
        if !self.grid.same_contents(&other.grid) {
            return Err(mismatch("board shape"));
        }
        if self.revision != other.revision {
            return Err(mismatch("revision"));
        }
        if self.state != other.state || self.unresign != other.unresign {
            return Err(mismatch("state"));
        }
        if self.whose_turn != other.whose_turn {
            return Err(mismatch("side to move"));
        }
        if self.held != other.held {
            return Err(mismatch("picked piece"));
        }
        if self.eruption != other.eruption {
            return Err(mismatch("pending eruption"));
        }
        if self.ply_layouts != other.ply_layouts {
            return Err(mismatch("layouts of this ply"));
        }
        if self.captures.tallies() != other.captures.tallies()
            || self.captures.records() != other.captures.records()
        {
            return Err(mismatch("capture stack"));
        }
        let (expected, actual) = (self.digest(), other.digest());
        if expected != actual {
            return Err(EngineError::DigestMismatch { expected, actual });
        }
        Ok(())
    }

    fn parse_move(&self, text: &str) -> EngineResult<VolcanoMove> {
        VolcanoMove::parse(text, self.whose_turn)
    }

    fn snapshot(&mut self) -> RenderSnapshot {
        let destinations: Vec<CellId> = match (self.state, self.held) {
            (VolcanoState::Play, Some(held)) => self.destinations(held.source).into_vec(),
            (VolcanoState::Play, None) => {
                let mut caps: Vec<CellId> = self.slides().into_iter().map(|(from, _)| from).collect();
                caps.sort_unstable();
                caps.dedup();
                caps
            }
            (VolcanoState::Confirm, _) => self.eruption.iter().map(|e| e.to).collect(),
            _ => Vec::new(),
        };
        RenderSnapshot::capture(
            &self.grid,
            destinations,
            &self.animations,
            self.state,
            self.whose_turn,
        )
    }
}
