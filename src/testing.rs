//! Take-away game used by the search unit tests.
//!
//! Players alternately remove 1..=3 stones from one pile; whoever takes the
//! last stone wins. Optionally, removing exactly `bonus` stones keeps the
//! turn, which exercises same-side-moves-again handling in the searchers.

use crate::core::{
    mix64, EngineError, EngineResult, GameInit, GameStatus, MoveParseError, PlayerId, ReplayMode,
};
use crate::moves::MoveSpec;
use crate::rules::{GameBoard, GameResult, RenderSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PileState {
    Play,
    Gameover,
}

impl GameStatus for PileState {
    fn is_done_eligible(self) -> bool {
        false
    }

    fn is_digest_eligible(self) -> bool {
        self == PileState::Play
    }

    fn is_terminal(self) -> bool {
        self == PileState::Gameover
    }

    fn is_puzzle(self) -> bool {
        false
    }

    fn ordinal(self) -> u64 {
        self as u64
    }

    fn description(self) -> &'static str {
        match self {
            PileState::Play => "play",
            PileState::Gameover => "gameover",
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Take {
    pub count: u8,
    pub player: PlayerId,
    undo: Option<(u8, PlayerId, PileState)>,
}

impl Take {
    pub(crate) fn new(count: u8, player: PlayerId) -> Self {
        Self {
            count,
            player,
            undo: None,
        }
    }
}

impl MoveSpec for Take {
    type Op = ();

    fn op(&self) {}

    fn player(&self) -> PlayerId {
        self.player
    }

    fn same_move(&self, other: &Self) -> bool {
        self.count == other.count && self.player == other.player
    }

    fn move_string(&self) -> String {
        format!("take {}", self.count)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PileBoard {
    init: GameInit,
    pub pile: u8,
    bonus: Option<u8>,
    turn: PlayerId,
    state: PileState,
    plies: u32,
}

impl PileBoard {
    pub(crate) fn new(pile: u8, bonus: Option<u8>) -> Self {
        Self {
            init: GameInit::latest("pile", 2, u64::from(pile)),
            pile,
            bonus,
            turn: PlayerId::new(0),
            state: PileState::Play,
            plies: 0,
        }
    }
}

/// Leaf heuristic: piles that are multiples of four are lost for the side
/// to move when no bonus rule applies.
pub(crate) fn pile_eval(board: &PileBoard, player: PlayerId) -> f64 {
    let base = if board.pile % 4 == 0 { -1.0 } else { 1.0 };
    let parity = f64::from(board.pile % 3) * 0.1;
    if player == board.turn {
        base + parity
    } else {
        -base - parity
    }
}

impl GameBoard for PileBoard {
    type Move = Take;
    type State = PileState;

    fn do_init(&mut self, init: &GameInit) -> EngineResult<()> {
        *self = Self::new(init.seed as u8, self.bonus);
        Ok(())
    }

    fn game_init(&self) -> &GameInit {
        &self.init
    }

    fn player_count(&self) -> usize {
        2
    }

    fn whose_turn(&self) -> PlayerId {
        self.turn
    }

    fn state(&self) -> PileState {
        self.state
    }

    fn move_number(&self) -> u32 {
        self.plies
    }

    fn execute(&mut self, m: &mut Take, _mode: ReplayMode) -> EngineResult<()> {
        if self.state != PileState::Play || m.count == 0 || m.count > self.pile {
            return Err(EngineError::illegal(m.count, self.state));
        }
        m.undo = Some((self.pile, self.turn, self.state));
        self.pile -= m.count;
        self.plies += 1;
        if self.pile == 0 {
            self.state = PileState::Gameover;
        } else if self.bonus != Some(m.count) {
            self.turn = self.turn.next(2);
        }
        Ok(())
    }

    fn finalize_ply(&mut self, _mode: ReplayMode) -> EngineResult<()> {
        Err(EngineError::illegal("done", self.state))
    }

    fn unexecute(&mut self, m: &Take) -> EngineResult<()> {
        let (pile, turn, state) = m
            .undo
            .ok_or_else(|| EngineError::CannotUnexecute(m.move_string()))?;
        self.pile = pile;
        self.turn = turn;
        self.state = state;
        self.plies -= 1;
        Ok(())
    }

    fn legal_moves(&mut self) -> Vec<Take> {
        if self.state.is_terminal() {
            return Vec::new();
        }
        (1..=self.pile.min(3))
            .map(|n| Take::new(n, self.turn))
            .collect()
    }

    fn digest(&self) -> u64 {
        mix64(u64::from(self.pile)) ^ mix64(100 + u64::from(self.turn.0)) ^ self.state.ordinal()
    }

    fn result(&self) -> Option<GameResult> {
        self.state
            .is_terminal()
            .then_some(GameResult::Winner(self.turn))
    }

    fn same_board(&self, other: &Self) -> EngineResult<()> {
        if self.digest() == other.digest() {
            Ok(())
        } else {
            Err(EngineError::DigestMismatch {
                expected: self.digest(),
                actual: other.digest(),
            })
        }
    }

    fn parse_move(&self, text: &str) -> EngineResult<Take> {
        let count = text
            .strip_prefix("take ")
            .and_then(|n| n.trim().parse().ok())
            .ok_or_else(|| MoveParseError::UnknownOpcode(text.to_string()))?;
        Ok(Take::new(count, self.turn))
    }

    fn snapshot(&mut self) -> RenderSnapshot {
        RenderSnapshot {
            cells: Vec::new(),
            legal_destinations: Vec::new(),
            animations: Vec::new(),
            state: self.state.description().to_string(),
            whose_turn: self.turn,
        }
    }
}
