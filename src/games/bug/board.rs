//! Bug board: placement, capture by shape and the Grow sub-phase.
//!
//! A ply is `dropb` followed by `done`. On `done` every capture candidate
//! of the mover that touches an enemy critter of the same shape may eat it,
//! provided the capturer could then grow by one stone. Capturers become
//! growers and the mover stays on turn in `Grow` until no grower has a
//! legal extension left. A side that cannot place at the start of its turn
//! wins.

use im::Vector;
use log::debug;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::critter::{Critter, CritterMap};
use super::moves::{BugAction, BugMove};
use super::pieces::BugChip;
use super::state::BugState;
use crate::cascade::{collect_group, CaptureStack, Edit, Journal};
use crate::core::{
    Digester, EngineError, EngineResult, GameInit, GameStatus, PlayerId, PlayerMap, ReplayMode,
    RevisionRange,
};
use crate::grid::{CellId, Grid};
use crate::moves::MoveSpec;
use crate::pieces::Piece;
use crate::rules::{GameBoard, GameResult, RenderSnapshot, Spot};

/// Seed of the cell salts.
pub const BUG_DIGEST_SEED: u64 = 64 * 1000;

/// Seed of the non-cell digest salts.
const BUG_STATE_SEED: u64 = !BUG_DIGEST_SEED;

/// Supported rules revisions.
pub const BUG_REVISIONS: RevisionRange = RevisionRange::new(100, 101);

// ============================================================================
// Variations and rules
// ============================================================================

/// Board sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BugVariation {
    Bug3,
    Bug4,
    Bug5,
}

impl BugVariation {
    pub const ALL: [BugVariation; 3] = [BugVariation::Bug3, BugVariation::Bug4, BugVariation::Bug5];

    /// Resolve a variation name such as `bug-4`.
    pub fn from_name(name: &str) -> EngineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::UnknownVariation(name.to_string()))
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BugVariation::Bug3 => "bug-3",
            BugVariation::Bug4 => "bug-4",
            BugVariation::Bug5 => "bug-5",
        }
    }

    /// Cells per edge of the hexagonal board.
    #[must_use]
    pub fn side(self) -> i32 {
        match self {
            BugVariation::Bug3 => 3,
            BugVariation::Bug4 => 4,
            BugVariation::Bug5 => 5,
        }
    }
}

/// Compatibility flags derived from a rules revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugRules {
    /// Capture candidates carry over between plies for both sides
    /// (revision 101). Without it only the just-placed bug may capture.
    pub latent_captures: bool,
}

impl BugRules {
    #[must_use]
    pub fn for_revision(revision: u32) -> Self {
        Self {
            latent_captures: revision >= 101,
        }
    }
}

// ============================================================================
// Sub-action bookkeeping and undo
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Board(CellId),
    Reserve(BugChip),
}

impl Source {
    fn digest_item(self) -> u64 {
        match self {
            Source::Board(cell) => u64::from(cell.0) + 1,
            Source::Reserve(chip) => chip.digest_tag().rotate_left(7),
        }
    }
}

/// Picked stone, where it came from and where it went, each with the state
/// to return to if the step is taken back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Pending {
    picked: Option<BugChip>,
    source: Option<(Source, BugState)>,
    dest: Option<(CellId, BugState)>,
}

/// Everything `unexecute` needs to put the board back.
#[derive(Clone, Debug)]
pub(crate) struct BugUndo {
    state: BugState,
    unresign: Option<BugState>,
    whose_turn: PlayerId,
    move_number: u32,
    max_bug_size: usize,
    pending: Pending,
    win: PlayerMap<bool>,
    latent: PlayerMap<Vector<Critter>>,
    growers: Vector<Critter>,
    capture_depth: usize,
    edits: SmallVec<[Edit<BugChip>; 4]>,
}

// ============================================================================
// Board
// ============================================================================

/// A Bug position with its state machine.
#[derive(Clone, Debug)]
pub struct BugBoard {
    init: GameInit,
    variation: BugVariation,
    revision: u32,
    rules: BugRules,
    grid: Grid<BugChip>,
    state: BugState,
    unresign: Option<BugState>,
    whose_turn: PlayerId,
    move_number: u32,
    pending: Pending,
    captures: CaptureStack<BugChip>,
    max_bug_size: usize,
    latent: PlayerMap<Vector<Critter>>,
    growers: Vector<Critter>,
    win: PlayerMap<bool>,
    journal: Journal<BugChip>,
    animations: Vec<(Spot, Spot)>,
}

impl BugBoard {
    /// Build a board from an init record such as `bug-4 2 0 101`.
    pub fn new(init: &GameInit) -> EngineResult<Self> {
        let variation = BugVariation::from_name(&init.variation)?;
        let mut board = Self {
            init: init.clone(),
            variation,
            revision: BUG_REVISIONS.max,
            rules: BugRules::for_revision(BUG_REVISIONS.max),
            grid: Grid::hexagon(variation.side(), BUG_DIGEST_SEED),
            state: BugState::Play,
            unresign: None,
            whose_turn: PlayerId::new(0),
            move_number: 0,
            pending: Pending::default(),
            captures: CaptureStack::new(2),
            max_bug_size: 1,
            latent: PlayerMap::with_value(2, Vector::new()),
            growers: Vector::new(),
            win: PlayerMap::with_value(2, false),
            journal: Journal::new(),
            animations: Vec::new(),
        };
        board.do_init(init)?;
        Ok(board)
    }

    // === Accessors ===

    #[must_use]
    pub fn grid(&self) -> &Grid<BugChip> {
        &self.grid
    }

    #[must_use]
    pub fn variation(&self) -> BugVariation {
        self.variation
    }

    #[must_use]
    pub fn revision(&self) -> u32 {
        self.revision
    }

    #[must_use]
    pub fn rules(&self) -> BugRules {
        self.rules
    }

    /// Largest critter a placement may currently create.
    #[must_use]
    pub fn max_bug_size(&self) -> usize {
        self.max_bug_size
    }

    #[must_use]
    pub fn captures(&self) -> &CaptureStack<BugChip> {
        &self.captures
    }

    /// Capture candidates carried for a seat.
    #[must_use]
    pub fn latent(&self, player: PlayerId) -> &Vector<Critter> {
        &self.latent[player]
    }

    /// Bugs that still owe a growth placement.
    #[must_use]
    pub fn growers(&self) -> &Vector<Critter> {
        &self.growers
    }

    /// The stone currently held, if any.
    #[must_use]
    pub fn picked(&self) -> Option<BugChip> {
        self.pending.picked
    }

    /// Every critter on the board.
    #[must_use]
    pub fn critters(&self) -> CritterMap {
        CritterMap::build(&self.grid)
    }

    /// Number of cells where `player` could place right now, ignoring the
    /// current state.
    #[must_use]
    pub fn placement_count(&self, player: PlayerId) -> usize {
        self.placement_targets(player).len()
    }

    // === Legality ===

    /// A stone of `chip` on `cell` may not merge two own critters and may
    /// not extend an own critter already at the size limit. Designated
    /// cells count as empty.
    fn placement_legal(
        &self,
        map: &CritterMap,
        cell: CellId,
        chip: BugChip,
        designated: &FxHashSet<CellId>,
    ) -> bool {
        let mut joined: Option<u32> = None;
        for n in self.grid.neighbors(cell) {
            if designated.contains(&n) {
                continue;
            }
            let Some(label) = map.label(n) else {
                continue;
            };
            let critter = map.get(label);
            if critter.chip() != chip || joined == Some(label) {
                continue;
            }
            if joined.is_some() || critter.size() >= self.max_bug_size {
                return false;
            }
            joined = Some(label);
        }
        true
    }

    fn placement_targets(&self, player: PlayerId) -> Vec<CellId> {
        let map = CritterMap::build(&self.grid);
        let chip = BugChip::for_player(player);
        let none = FxHashSet::default();
        self.grid
            .cells()
            .filter(|c| c.is_empty())
            .map(|c| c.id)
            .filter(|&c| self.placement_legal(&map, c, chip, &none))
            .collect()
    }

    fn has_moves(&self, player: PlayerId) -> bool {
        let map = CritterMap::build(&self.grid);
        let chip = BugChip::for_player(player);
        let none = FxHashSet::default();
        self.grid
            .cells()
            .any(|c| c.is_empty() && self.placement_legal(&map, c.id, chip, &none))
    }

    /// Cells where some grower may legally extend.
    fn grow_targets(&self) -> Vec<CellId> {
        let map = CritterMap::build(&self.grid);
        let none = FxHashSet::default();
        let mut out = Vec::new();
        for grower in self.growers.iter() {
            for cell in grower.frontier(&self.grid) {
                if self.grid.cell(cell).is_empty()
                    && self.placement_legal(&map, cell, grower.chip(), &none)
                {
                    out.push(cell);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Could `bug` grow by one stone once the designated cells are cleared.
    fn can_grow(&self, map: &CritterMap, bug: &Critter, designated: &FxHashSet<CellId>) -> bool {
        bug.frontier(&self.grid).into_iter().any(|cell| {
            (self.grid.cell(cell).is_empty() || designated.contains(&cell))
                && self.placement_legal(map, cell, bug.chip(), designated)
        })
    }

    /// Enemy critters of the same shape touching `bug`.
    fn prey_of(&self, map: &CritterMap, bug: &Critter) -> SmallVec<[Critter; 4]> {
        let mut seen: SmallVec<[u32; 8]> = SmallVec::new();
        let mut prey = SmallVec::new();
        for cell in bug.frontier(&self.grid) {
            let Some(label) = map.label(cell) else {
                continue;
            };
            if seen.contains(&label) {
                continue;
            }
            seen.push(label);
            let other = map.get(label);
            if other.chip() != bug.chip() && other.same_kind(bug) {
                prey.push(other.clone());
            }
        }
        prey
    }

    /// The critter covering `cell`, found with a sweep pass.
    fn critter_at(&mut self, cell: CellId) -> Option<Critter> {
        let chip = self.grid.top(cell)?;
        let group = collect_group(&mut self.grid, cell, |c| c.top() == Some(chip));
        Some(Critter::new(&self.grid, chip, group))
    }

    // === State transitions ===

    fn set_state(&mut self, state: BugState) {
        self.unresign = (state == BugState::Resign).then_some(self.state);
        self.state = state;
        if !state.is_terminal() {
            self.win.fill(false);
        }
    }

    fn set_next_player(&mut self) {
        self.move_number += 1;
        self.whose_turn = self.whose_turn.next(2);
    }

    fn accept_placement(&mut self) {
        self.pending = Pending::default();
    }

    fn illegal(&self, action: BugAction) -> EngineError {
        EngineError::illegal(action, self.state)
    }

    fn pick_from_reserve(&mut self, chip: BugChip) {
        self.pending.picked = Some(chip);
        self.pending.source = Some((Source::Reserve(chip), self.state));
    }

    fn pick_from_board(&mut self, cell: CellId, action: BugAction) -> EngineResult<()> {
        let chip = self
            .journal
            .pop(&mut self.grid, cell)
            .ok_or_else(|| self.illegal(action))?;
        self.pending.picked = Some(chip);
        self.pending.source = Some((Source::Board(cell), self.state));
        Ok(())
    }

    /// Put the held stone back where it came from.
    fn un_pick(&mut self) {
        if let (Some(chip), Some((source, prior))) = (self.pending.picked, self.pending.source) {
            if let Source::Board(cell) = source {
                self.journal.push(&mut self.grid, cell, chip);
            }
            self.set_state(prior);
        }
        self.pending.picked = None;
        self.pending.source = None;
    }

    /// Lift the just-dropped stone back into the hand.
    fn un_drop(&mut self, action: BugAction) -> EngineResult<()> {
        let (cell, prior) = self.pending.dest.ok_or_else(|| self.illegal(action))?;
        let chip = self
            .journal
            .pop(&mut self.grid, cell)
            .ok_or_else(|| self.illegal(action))?;
        self.pending.dest = None;
        self.pending.picked = Some(chip);
        self.set_state(prior);
        Ok(())
    }

    fn drop_on(&mut self, cell: CellId, action: BugAction, animate: bool) -> EngineResult<()> {
        if !self.grid.cell(cell).is_empty() {
            return Err(self.illegal(action));
        }
        let chip = self.pending.picked.take().ok_or_else(|| self.illegal(action))?;
        self.journal.push(&mut self.grid, cell, chip);
        self.grid.cell_mut(cell).last_changed = Some(self.move_number);
        self.pending.dest = Some((cell, self.state));
        let size = self.critter_at(cell).map_or(1, |c| c.size());
        self.max_bug_size = self.max_bug_size.max(size);
        if animate {
            self.animations
                .push((Spot::Reserve(chip.owner()), Spot::Cell(self.grid.coord(cell))));
        }
        Ok(())
    }

    fn apply_action(&mut self, action: BugAction, mode: ReplayMode) -> EngineResult<()> {
        match action {
            BugAction::Done => {
                if !self.state.is_done_eligible() {
                    return Err(self.illegal(action));
                }
                self.do_done(mode)
            }
            BugAction::DropB(coord) => {
                let cell = self.grid.locate(coord)?;
                if !matches!(
                    self.state,
                    BugState::Play | BugState::Grow | BugState::Confirm | BugState::Puzzle
                ) {
                    return Err(self.illegal(action));
                }
                let mut implicit = false;
                if self.pending.source.is_none() {
                    self.pick_from_reserve(BugChip::for_player(self.whose_turn));
                    implicit = true;
                }
                if self.pending.picked.is_some()
                    && matches!(self.pending.source, Some((Source::Board(c), _)) if c == cell)
                {
                    self.un_pick();
                    return Ok(());
                }
                if self.pending.picked.is_none() {
                    self.un_drop(action)?;
                }
                self.drop_on(cell, action, implicit && mode.animate())?;
                match self.state {
                    BugState::Play | BugState::Grow => self.set_state(BugState::Confirm),
                    BugState::Puzzle => self.accept_placement(),
                    _ => {}
                }
                Ok(())
            }
            BugAction::PickB(coord) => {
                let cell = self.grid.locate(coord)?;
                if self.pending.dest.is_some_and(|(d, _)| d == cell) {
                    return self.un_drop(action);
                }
                if self.state != BugState::Puzzle || self.pending.picked.is_some() {
                    return Err(self.illegal(action));
                }
                self.pick_from_board(cell, action)
            }
            BugAction::Pick(chip) => {
                let own = chip == BugChip::for_player(self.whose_turn);
                let allowed = match self.state {
                    BugState::Puzzle => true,
                    BugState::Play | BugState::Grow => own,
                    _ => false,
                };
                if !allowed || self.pending.picked.is_some() || self.pending.source.is_some() {
                    return Err(self.illegal(action));
                }
                self.pick_from_reserve(chip);
                Ok(())
            }
            BugAction::Drop(chip) => match (self.pending.picked, self.pending.source) {
                (Some(held), Some((Source::Reserve(_), _))) if held == chip => {
                    self.un_pick();
                    Ok(())
                }
                (Some(held), Some((Source::Board(_), _))) if held == chip => {
                    // the stone is already off the board; it simply goes back in the box
                    self.accept_placement();
                    Ok(())
                }
                _ => Err(self.illegal(action)),
            },
            BugAction::Start(player) => {
                if player.index() >= 2 {
                    return Err(self.illegal(action));
                }
                self.un_pick();
                self.whose_turn = player;
                self.accept_placement();
                self.set_state(BugState::Play);
                Ok(())
            }
            BugAction::Resign => {
                if matches!(self.state, BugState::Gameover | BugState::Puzzle) {
                    return Err(self.illegal(action));
                }
                let target = self.unresign.unwrap_or(BugState::Resign);
                self.set_state(target);
                Ok(())
            }
            BugAction::Edit => {
                self.un_pick();
                self.accept_placement();
                self.set_state(BugState::Puzzle);
                Ok(())
            }
            BugAction::GameOverOnTime => {
                self.win[self.whose_turn] = true;
                self.set_state(BugState::Gameover);
                Ok(())
            }
        }
    }

    // === Cascade ===

    fn do_done(&mut self, mode: ReplayMode) -> EngineResult<()> {
        let dest = self.pending.dest.map(|(cell, _)| cell);
        self.accept_placement();

        if self.state == BugState::Resign {
            let winner = self.whose_turn.next(2);
            self.win[winner] = true;
            self.set_state(BugState::Gameover);
            return Ok(());
        }
        let Some(dest) = dest else {
            return Err(EngineError::illegal("done without a placement", self.state));
        };

        self.resolve_done(dest, mode);

        if self.state == BugState::Play && !self.has_moves(self.whose_turn) {
            debug!("bug: {} has no placement and wins", self.whose_turn);
            self.win[self.whose_turn] = true;
            self.set_state(BugState::Gameover);
        }
        Ok(())
    }

    /// Gather capture candidates after a placement on `dest`.
    fn resolve_done(&mut self, dest: CellId, mode: ReplayMode) {
        let me = self.whose_turn;
        let map = CritterMap::build(&self.grid);

        let grid = &self.grid;
        self.growers
            .retain(|g| map.is_current(g) && !g.touches(grid, dest));

        let mut candidates: Vec<Critter> = Vec::new();
        if self.rules.latent_captures {
            for player in PlayerId::all(2) {
                let kept: Vector<Critter> = self.latent[player]
                    .iter()
                    .filter(|c| map.is_current(c))
                    .cloned()
                    .collect();
                self.latent[player] = kept;
            }
            candidates.extend(self.latent[me].iter().cloned());
        }
        if let Some(placed) = self.critter_at(dest) {
            if !candidates.contains(&placed) {
                candidates.push(placed);
            }
        }

        self.resolve_captures(candidates, mode);
    }

    /// Capture with every candidate that can, then enter `Grow` or pass the
    /// turn.
    fn resolve_captures(&mut self, candidates: Vec<Critter>, mode: ReplayMode) {
        let me = self.whose_turn;
        let opp = me.next(2);
        let latent = self.rules.latent_captures;
        let map = CritterMap::build(&self.grid);

        let mut hunts: Vec<(Critter, SmallVec<[Critter; 4]>)> = Vec::new();
        let mut still_latent = Vector::new();
        for bug in candidates {
            let prey = self.prey_of(&map, &bug);
            if prey.is_empty() {
                continue;
            }
            if latent {
                for victim in &prey {
                    if !self.latent[opp].iter().any(|c| c == victim) {
                        self.latent[opp].push_back(victim.clone());
                    }
                }
                still_latent.push_back(bug.clone());
            }
            hunts.push((bug, prey));
        }
        if latent {
            self.latent[me] = still_latent;
        }

        if !hunts.is_empty() {
            let designated: FxHashSet<CellId> = hunts
                .iter()
                .flat_map(|(_, prey)| prey.iter().flat_map(|v| v.cells().iter().copied()))
                .collect();

            for (bug, prey) in hunts {
                self.max_bug_size = self.max_bug_size.max(bug.size() + 1);
                if latent && !self.can_grow(&map, &bug, &designated) {
                    continue;
                }
                let cells: SmallVec<[CellId; 16]> =
                    prey.iter().flat_map(|v| v.cells().iter().copied()).collect();
                let taken = self.captures.capture(&mut self.grid, me, cells.iter().copied());
                if taken > 0 && mode.animate() {
                    if let Some(record) = self.captures.records().last() {
                        for &(cell, _) in &record.cells {
                            self.animations
                                .push((Spot::Cell(self.grid.coord(cell)), Spot::Reserve(me)));
                        }
                    }
                }
                debug!("bug: {me} captured {taken} stones with a {}-cell bug", bug.size());

                self.latent[opp].retain(|c| !prey.contains(c));
                self.latent[me].retain(|c| *c != bug);
                if !self.growers.iter().any(|g| *g == bug) {
                    self.growers.push_back(bug);
                }
            }
        }

        if !self.growers.is_empty() && !self.grow_targets().is_empty() {
            self.set_state(BugState::Grow);
        } else {
            self.growers.clear();
            self.set_next_player();
            self.set_state(BugState::Play);
        }
    }

    // === Undo ===

    fn undo_snapshot(&self) -> BugUndo {
        BugUndo {
            state: self.state,
            unresign: self.unresign,
            whose_turn: self.whose_turn,
            move_number: self.move_number,
            max_bug_size: self.max_bug_size,
            pending: self.pending,
            win: self.win.clone(),
            latent: self.latent.clone(),
            growers: self.growers.clone(),
            capture_depth: self.captures.depth(),
            edits: SmallVec::new(),
        }
    }

    fn restore(&mut self, undo: &BugUndo) {
        self.captures.unwind_to(&mut self.grid, undo.capture_depth);
        Journal::rollback(&mut self.grid, &undo.edits);
        self.state = undo.state;
        self.unresign = undo.unresign;
        self.whose_turn = undo.whose_turn;
        self.move_number = undo.move_number;
        self.max_bug_size = undo.max_bug_size;
        self.pending = undo.pending;
        self.win = undo.win.clone();
        self.latent = undo.latent.clone();
        self.growers = undo.growers.clone();
    }
}

fn mismatch(what: &str) -> EngineError {
    EngineError::BoardMismatch(format!("{what} differs"))
}

impl GameBoard for BugBoard {
    type Move = BugMove;
    type State = BugState;

    fn do_init(&mut self, init: &GameInit) -> EngineResult<()> {
        let variation = BugVariation::from_name(&init.variation)?;
        let revision = BUG_REVISIONS.resolve(init.revision)?;
        if init.players != 2 {
            return Err(EngineError::MalformedInit(init.to_string()));
        }

        if variation == self.variation {
            self.grid.reset();
        } else {
            self.grid = Grid::hexagon(variation.side(), BUG_DIGEST_SEED);
        }
        self.init = init.clone().with_revision(revision);
        self.variation = variation;
        self.revision = revision;
        self.rules = BugRules::for_revision(revision);
        self.state = BugState::Play;
        self.unresign = None;
        self.whose_turn = PlayerId::new(0);
        self.move_number = 0;
        self.pending = Pending::default();
        self.captures.clear();
        self.max_bug_size = 1;
        self.latent.fill(Vector::new());
        self.growers.clear();
        self.win.fill(false);
        self.journal.take();
        self.animations.clear();
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

    fn state(&self) -> BugState {
        self.state
    }

    fn move_number(&self) -> u32 {
        self.move_number
    }

    fn execute(&mut self, m: &mut BugMove, mode: ReplayMode) -> EngineResult<()> {
        if mode.animate() {
            self.animations.clear();
        }
        self.journal.take();
        let mut undo = Box::new(self.undo_snapshot());
        let outcome = self.apply_action(m.action, mode);
        undo.edits = self.journal.take();
        if let Err(e) = outcome {
            self.restore(&undo);
            return Err(e);
        }
        m.undo = Some(undo);
        Ok(())
    }

    fn finalize_ply(&mut self, mode: ReplayMode) -> EngineResult<()> {
        if !self.state.is_done_eligible() {
            return Err(self.illegal(BugAction::Done));
        }
        self.do_done(mode)
    }

    fn unexecute(&mut self, m: &BugMove) -> EngineResult<()> {
        let undo = m
            .undo
            .as_deref()
            .ok_or_else(|| EngineError::CannotUnexecute(m.move_string()))?;
        self.restore(undo);
        Ok(())
    }

    fn legal_moves(&mut self) -> Vec<BugMove> {
        let me = self.whose_turn;
        let cells = match self.state {
            BugState::Play => self.placement_targets(me),
            BugState::Grow => self.grow_targets(),
            BugState::Confirm | BugState::Resign => return vec![BugMove::done(me)],
            BugState::Puzzle | BugState::Gameover => return Vec::new(),
        };
        cells
            .into_iter()
            .map(|c| BugMove::drop_at(self.grid.coord(c), me))
            .collect()
    }

    fn digest(&self) -> u64 {
        let mut d = Digester::new(BUG_STATE_SEED);
        let mut v = self.grid.digest_contents();
        v ^= d.optional(self.pending.picked.map(BugChip::digest_tag));
        v ^= d.optional(self.pending.source.map(|(s, _)| s.digest_item()));
        v ^= d.optional(self.pending.dest.map(|(c, _)| u64::from(c.0) + 1));
        v ^= d.scalar(u64::from(self.revision));
        v ^= d.scalar(self.state.ordinal());
        v ^= d.scalar(u64::from(self.whose_turn.0));
        v ^= d.sequence(self.captures.tallies().iter().map(|(_, &n)| u64::from(n)));
        v ^= d.sequence(self.captures.digest_items());
        v ^= d.scalar(self.max_bug_size as u64);
        for (_, list) in self.latent.iter() {
            v ^= d.unordered(list.iter().map(Critter::digest_item));
        }
        v ^= d.unordered(self.growers.iter().map(Critter::digest_item));
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
        if self.pending != other.pending {
            return Err(mismatch("picked stone"));
        }
        if self.captures.tallies() != other.captures.tallies()
            || self.captures.records() != other.captures.records()
        {
            return Err(mismatch("capture stack"));
        }
        if self.max_bug_size != other.max_bug_size {
            return Err(mismatch("max bug size"));
        }
        if PlayerId::all(2).any(|p| self.latent[p].len() != other.latent[p].len()) {
            return Err(mismatch("latent captures"));
        }
        if self.growers.len() != other.growers.len() {
            return Err(mismatch("growers"));
        }
        let (expected, actual) = (self.digest(), other.digest());
        if expected != actual {
            return Err(EngineError::DigestMismatch { expected, actual });
        }
        Ok(())
    }

    fn parse_move(&self, text: &str) -> EngineResult<BugMove> {
        BugMove::parse(text, self.whose_turn)
    }

    fn snapshot(&mut self) -> RenderSnapshot {
        let destinations = match self.state {
            BugState::Play => self.placement_targets(self.whose_turn),
            BugState::Grow => self.grow_targets(),
            BugState::Confirm => self.pending.dest.map(|(c, _)| c).into_iter().collect(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;

    fn board(variation: &str) -> BugBoard {
        BugBoard::new(&GameInit::latest(variation, 2, 0)).unwrap()
    }

    fn play(b: &mut BugBoard, text: &str) -> BugMove {
        let mut m = b.parse_move(text).unwrap();
        b.execute(&mut m, ReplayMode::Live).unwrap();
        m
    }

    #[test]
    fn test_initial_board() {
        let mut b = board("bug-3");
        assert_eq!(b.grid().len(), 19);
        assert_eq!(b.state(), BugState::Play);
        assert_eq!(b.whose_turn(), PlayerId::new(0));
        assert_eq!(b.max_bug_size(), 1);
        assert_eq!(b.legal_moves().len(), 19);
        assert_eq!(b.init_string(), "bug-3 2 0 101");
    }

    #[test]
    fn test_unknown_variation_and_revision() {
        assert!(matches!(
            BugBoard::new(&GameInit::latest("bug-9", 2, 0)),
            Err(EngineError::UnknownVariation(_))
        ));
        assert!(matches!(
            BugBoard::new(&GameInit::new("bug-3", 2, 0, 99)),
            Err(EngineError::UnsupportedRevision { .. })
        ));
        assert!(BugBoard::new(&GameInit::latest("bug-3", 3, 0)).is_err());
    }

    #[test]
    fn test_drop_then_done_passes_turn() {
        let mut b = board("bug-3");
        play(&mut b, "dropb C 3");
        assert_eq!(b.state(), BugState::Confirm);
        assert_eq!(b.legal_moves().len(), 1);
        play(&mut b, "done");
        assert_eq!(b.state(), BugState::Play);
        assert_eq!(b.whose_turn(), PlayerId::new(1));
        assert_eq!(b.move_number(), 1);
    }

    #[test]
    fn test_redrop_moves_the_stone() {
        let mut b = board("bug-3");
        play(&mut b, "dropb C 3");
        play(&mut b, "dropb D 3");
        let c3 = b.grid().locate(Coord::new('C', 3)).unwrap();
        let d3 = b.grid().locate(Coord::new('D', 3)).unwrap();
        assert!(b.grid().cell(c3).is_empty());
        assert_eq!(b.grid().top(d3), Some(BugChip::Black));
        assert_eq!(b.state(), BugState::Confirm);
    }

    #[test]
    fn test_pickb_of_dropped_stone_reverts_confirm() {
        let mut b = board("bug-3");
        let before = b.digest();
        play(&mut b, "dropb C 3");
        play(&mut b, "pickb C 3");
        assert_eq!(b.state(), BugState::Play);
        assert_eq!(b.picked(), Some(BugChip::Black));
        play(&mut b, "drop black");
        assert_eq!(b.picked(), None);
        assert_eq!(b.digest(), before);
    }

    #[test]
    fn test_own_stones_may_not_touch_at_size_one() {
        let mut b = board("bug-3");
        for text in ["dropb C 3", "done", "dropb A 3", "done"] {
            play(&mut b, text);
        }
        let moves = b.legal_moves();
        assert!(moves
            .iter()
            .all(|m| m.destination() != Some(Coord::new('D', 3))));
    }

    #[test]
    fn test_illegal_transition_leaves_board_untouched() {
        let mut b = board("bug-3");
        let before = b.digest();
        let mut done = b.parse_move("done").unwrap();
        let err = b.execute(&mut done, ReplayMode::Live).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(b.digest(), before);

        play(&mut b, "dropb C 3");
        let mut onto = b.parse_move("dropb C 3").unwrap();
        assert!(b.execute(&mut onto, ReplayMode::Live).is_ok());
    }

    #[test]
    fn test_resign_and_unresign() {
        let mut b = board("bug-3");
        play(&mut b, "dropb C 3");
        play(&mut b, "resign");
        assert_eq!(b.state(), BugState::Resign);
        play(&mut b, "resign");
        assert_eq!(b.state(), BugState::Confirm);
        play(&mut b, "resign");
        play(&mut b, "done");
        assert_eq!(b.result(), Some(GameResult::Winner(PlayerId::new(1))));
    }

    #[test]
    fn test_unexecute_restores_digest() {
        let mut b = board("bug-4");
        let before = b.digest();
        let mut m = b.parse_move("dropb D 4").unwrap();
        b.apply_ply(&mut m).unwrap();
        assert_ne!(b.digest(), before);
        b.unexecute(&m).unwrap();
        assert_eq!(b.digest(), before);
        assert!(b.same_board(&board("bug-4")).is_ok());
    }

    #[test]
    fn test_unexecute_without_snapshot_fails() {
        let mut b = board("bug-3");
        let m = b.parse_move("dropb C 3").unwrap();
        assert!(matches!(b.unexecute(&m), Err(EngineError::CannotUnexecute(_))));
    }

    #[test]
    fn test_animations_only_when_live() {
        let mut b = board("bug-3");
        let mut m = b.parse_move("dropb C 3").unwrap();
        b.execute(&mut m, ReplayMode::Replay).unwrap();
        assert!(b.snapshot().animations.is_empty());
        b.unexecute(&m).unwrap();
        b.execute(&mut m, ReplayMode::Live).unwrap();
        let snap = b.snapshot();
        assert_eq!(
            snap.animations,
            vec![(Spot::Reserve(PlayerId::new(0)), Spot::Cell(Coord::new('C', 3)))]
        );
        assert_eq!(snap.legal_destinations, vec![Coord::new('C', 3)]);
    }

    #[test]
    fn test_same_board_reports_differences() {
        let mut a = board("bug-3");
        let b = board("bug-3");
        play(&mut a, "dropb C 3");
        assert!(matches!(a.same_board(&b), Err(EngineError::BoardMismatch(_))));
    }

    #[test]
    fn test_do_init_resets_in_place() {
        let mut b = board("bug-3");
        play(&mut b, "dropb C 3");
        play(&mut b, "done");
        b.do_init(&GameInit::latest("bug-3", 2, 0)).unwrap();
        assert!(b.same_board(&board("bug-3")).is_ok());
        b.do_init(&GameInit::latest("bug-5", 2, 0)).unwrap();
        assert_eq!(b.grid().len(), 61);
    }

    #[test]
    fn test_digest_tells_winners_apart() {
        let a = board("bug-3");
        let mut first = a.clone();
        first.win[PlayerId::new(0)] = true;
        let mut second = a.clone();
        second.win[PlayerId::new(1)] = true;

        assert_ne!(a.digest(), first.digest());
        assert_ne!(first.digest(), second.digest());
        second.win[PlayerId::new(1)] = false;
        assert_eq!(a.digest(), second.digest());
    }
}
