//! Computer opponent.
//!
//! The robot never touches the live board. [`Robot::prepare_to_move`]
//! clones it and checks the copy with `same_board`; from then on the robot
//! owns its copy exclusively and searches on it. [`RobotWorker`] runs that
//! cycle on its own thread and hands the move back over a channel, and
//! [`AutoPlayer`] applies robot moves to a live board until the robot comes
//! back empty-handed, counting every position the game passes through.
//!
//! ## Example
//!
//! ```
//! use board_engine::core::GameInit;
//! use board_engine::games::bug::{BugBoard, BugEvaluator};
//! use board_engine::robot::{Robot, RobotConfig};
//! use board_engine::search::SearchConfig;
//!
//! let live = BugBoard::new(&GameInit::latest("bug-3", 2, 0)).unwrap();
//! let config = RobotConfig {
//!     search: SearchConfig::default().with_depth(2),
//!     ..RobotConfig::default()
//! };
//! let mut robot = Robot::new(config, BugEvaluator::default());
//! robot.prepare_to_move(&live).unwrap();
//! assert!(robot.select_move().unwrap().is_some());
//! ```

pub mod config;
pub mod worker;

pub use config::{RobotConfig, Strategy};
pub use worker::RobotWorker;

use log::{debug, info, warn};

use crate::core::{EngineResult, GameStatus, ReplayMode};
use crate::mcts::{GuidedSimulation, MCTSSearch};
use crate::moves::MoveSpec;
use crate::record::RepetitionTable;
use crate::rules::GameBoard;
use crate::search::{AlphaBeta, Evaluator};

/// A search-driven player with a private board copy.
pub struct Robot<B: GameBoard, E> {
    config: RobotConfig,
    evaluator: E,
    board: Option<B>,
}

impl<B, E> Robot<B, E>
where
    B: GameBoard,
    E: Evaluator<B> + Clone + 'static,
{
    pub fn new(config: RobotConfig, evaluator: E) -> Self {
        Self {
            config,
            evaluator,
            board: None,
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// The private copy taken by the last `prepare_to_move`.
    pub fn board(&self) -> Option<&B> {
        self.board.as_ref()
    }

    /// Take a private copy of `live` and check the copy against it.
    pub fn prepare_to_move(&mut self, live: &B) -> EngineResult<()> {
        let copy = live.clone();
        live.same_board(&copy)?;
        self.board = Some(copy);
        Ok(())
    }

    /// Search the private copy for the side to move.
    ///
    /// `Ok(None)` means no move: nothing prepared, the game is over, or the
    /// side to move has no legal move.
    pub fn select_move(&mut self) -> EngineResult<Option<B::Move>> {
        let Some(board) = self.board.as_mut() else {
            return Ok(None);
        };
        if board.is_over() {
            return Ok(None);
        }
        let chosen = match self.config.strategy {
            Strategy::AlphaBeta => {
                AlphaBeta::new(self.config.search.clone(), &self.evaluator)
                    .search(board)?
                    .best_move
            }
            Strategy::Mcts => {
                let simulation =
                    GuidedSimulation::new(self.evaluator.clone(), self.config.rollout_scale);
                let mut search =
                    MCTSSearch::new(self.config.mcts.clone()).with_simulation(simulation);
                let chosen = search.search(board)?;
                debug!(
                    "robot: mcts ran {} playouts ({:.0}/s, {:.0}% cut off)",
                    search.stats().playouts,
                    search.stats().playouts_per_second(),
                    search.stats().cut_off_share() * 100.0
                );
                chosen
            }
        };
        if let Some(m) = &chosen {
            info!(
                "robot: {} plays {} at move {}",
                board.whose_turn(),
                m.move_string(),
                board.move_number()
            );
        }
        Ok(chosen)
    }
}

/// Drives a live board with robot moves.
pub struct AutoPlayer<B: GameBoard, E> {
    robot: Robot<B, E>,
    enabled: bool,
    positions: RepetitionTable,
}

impl<B, E> AutoPlayer<B, E>
where
    B: GameBoard,
    E: Evaluator<B> + Clone + 'static,
{
    pub fn new(robot: Robot<B, E>) -> Self {
        Self {
            robot,
            enabled: true,
            positions: RepetitionTable::new(),
        }
    }

    /// False once the robot has failed to produce a move.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn robot(&self) -> &Robot<B, E> {
        &self.robot
    }

    /// Sightings of each digest-eligible position reached by [`step`](Self::step).
    pub fn positions(&self) -> &RepetitionTable {
        &self.positions
    }

    /// Play one robot ply on `live` and return its wire form.
    ///
    /// Returns `Ok(None)` and disables autoplay when the robot has no move.
    /// Board errors are fatal and propagate.
    pub fn step(&mut self, live: &mut B) -> EngineResult<Option<String>> {
        if !self.enabled || live.is_over() {
            return Ok(None);
        }
        self.robot.prepare_to_move(live)?;
        let Some(mut m) = self.robot.select_move()? else {
            warn!(
                "robot: no move for {} in {}, autoplay disabled",
                live.whose_turn(),
                live.state().description()
            );
            self.enabled = false;
            return Ok(None);
        };
        let text = m.move_string();
        live.execute(&mut m, ReplayMode::Live)?;
        self.observe(live);
        if live.state().is_done_eligible() {
            live.finalize_ply(ReplayMode::Live)?;
            self.observe(live);
        }
        Ok(Some(text))
    }

    fn observe(&mut self, live: &B) {
        if let Some(seen) = self.positions.observe(live).filter(|&n| n > 1) {
            debug!(
                "robot: position {:#018x} reached {seen} times",
                live.digest()
            );
        }
    }

    /// Play until the game ends, the robot runs dry or `max_plies` plies
    /// have been played. Returns the plies in order.
    pub fn play_out(&mut self, live: &mut B, max_plies: usize) -> EngineResult<Vec<String>> {
        let mut plies = Vec::new();
        while plies.len() < max_plies {
            match self.step(live)? {
                Some(text) => plies.push(text),
                None => break,
            }
        }
        Ok(plies)
    }
}
