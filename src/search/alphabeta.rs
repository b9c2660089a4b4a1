//! Negamax alpha-beta with iterative deepening.

use std::time::Instant;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::SearchConfig;
use super::evaluator::Evaluator;
use crate::core::{EngineError, EngineResult, GameRng, PlayerId};
use crate::moves::MoveSpec;
use crate::rules::{GameBoard, GameResult};

/// Base score of a proven win.
pub const VALUE_OF_WIN: f64 = 10_000.0;

/// Deepest ply the killer table tracks.
const MAX_PLY: usize = 64;

/// Nodes between wall-clock checks.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// Score of a win discovered `ply` plies below the root. Shallower wins
/// score higher; every win scores above [`VALUE_OF_WIN`].
#[must_use]
pub fn win_value(ply: u32) -> f64 {
    VALUE_OF_WIN + 1.0 / (1.0 + f64::from(ply))
}

/// True for a proven win (or, negated, a proven loss).
#[must_use]
pub fn is_win_value(value: f64) -> bool {
    value >= VALUE_OF_WIN
}

/// Counters collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlphaBetaStats {
    /// Beta cutoffs.
    pub beta_cutoffs: u64,
    /// Cutoffs produced by the first move tried.
    pub first_move_cutoffs: u64,
    /// Killer moves found in a node's move list.
    pub killer_hits: u64,
    /// Static evaluations.
    pub leaves: u64,
    /// Terminal positions reached.
    pub terminals: u64,
    /// Root moves eligible for the randomized choice.
    pub random_candidates: usize,
    /// Wall-clock time in microseconds.
    pub time_us: u64,
}

impl AlphaBetaStats {
    /// Share of cutoffs that came from the first move, in percent.
    #[must_use]
    pub fn first_move_cutoff_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }
}

/// Outcome of a search.
#[derive(Clone, Debug)]
pub struct SearchResult<M> {
    /// Chosen move, `None` when the side to move has no legal move.
    pub best_move: Option<M>,
    /// Value of the best move from the mover's point of view.
    pub value: f64,
    /// Deepest completed iteration.
    pub depth: u32,
    /// Nodes visited.
    pub nodes: u64,
    pub stats: AlphaBetaStats,
}

/// Per-iteration root outcome.
struct RootOutcome {
    best: Option<(usize, f64)>,
    /// `(index, value)` of root moves within the acceptable drop whose
    /// values are exact.
    candidates: Vec<(usize, f64)>,
    complete: bool,
}

/// Alpha-beta searcher.
///
/// The board is mutated during the search and restored before `search`
/// returns; a digest check at the end catches any unmatched
/// `execute`/`unexecute`.
pub struct AlphaBeta<'e, B: GameBoard, E: ?Sized> {
    config: SearchConfig,
    evaluator: &'e E,
    killers: Vec<SmallVec<[B::Move; 2]>>,
    nodes: u64,
    start: Instant,
    aborted: bool,
    rng: GameRng,
    stats: AlphaBetaStats,
}

impl<'e, B, E> AlphaBeta<'e, B, E>
where
    B: GameBoard,
    E: Evaluator<B> + ?Sized,
{
    /// Create a searcher.
    pub fn new(config: SearchConfig, evaluator: &'e E) -> Self {
        let rng = GameRng::new(config.seed).for_context("alphabeta");
        Self {
            config,
            evaluator,
            killers: vec![SmallVec::new(); MAX_PLY],
            nodes: 0,
            start: Instant::now(),
            aborted: false,
            rng,
            stats: AlphaBetaStats::default(),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search the position and return the chosen move.
    ///
    /// Running out of budget is not an error: the result of the last
    /// completed iteration is returned. Errors from the board are fatal and
    /// propagate.
    pub fn search(&mut self, board: &mut B) -> EngineResult<SearchResult<B::Move>> {
        self.reset();
        let digest_before = board.digest();

        let mut moves = board.legal_moves();
        if moves.is_empty() || board.is_over() {
            return Ok(self.finish(None, 0.0, 0));
        }

        let randomize = board.move_number() < self.config.random_plies;
        if moves.len() == 1 && !randomize {
            let value = self.evaluator.evaluate(board, board.whose_turn());
            return Ok(self.finish(moves.pop(), value, 0));
        }

        let max_depth = self.config.max_depth.max(1);
        let first_depth = if self.config.iterative_deepening { 1 } else { max_depth };

        let mut best: Option<(usize, f64, u32)> = None;
        let mut candidates: Vec<(usize, f64)> = Vec::new();

        for depth in first_depth..=max_depth {
            let outcome = self.search_root(board, &moves, depth, randomize)?;

            if !outcome.complete {
                // A partial first iteration is still better than nothing.
                if best.is_none() {
                    if let Some((i, v)) = outcome.best {
                        best = Some((i, v, depth));
                        candidates.clear();
                    }
                }
                debug!("depth {depth} aborted after {} nodes", self.nodes);
                break;
            }

            let Some((idx, value)) = outcome.best else {
                break;
            };
            debug!(
                "depth {depth}: best {} value {value:.3} nodes {}",
                moves[idx].move_string(),
                self.nodes
            );

            // Best move first for the next iteration; remap indices.
            moves[..=idx].rotate_right(1);
            let remap = |i: usize| match i.cmp(&idx) {
                std::cmp::Ordering::Less => i + 1,
                std::cmp::Ordering::Equal => 0,
                std::cmp::Ordering::Greater => i,
            };
            best = Some((0, value, depth));
            candidates = outcome
                .candidates
                .into_iter()
                .map(|(i, v)| (remap(i), v))
                .collect();

            if is_win_value(value.abs()) {
                break;
            }
            if self.config.good_enough.is_some_and(|g| value >= g) {
                debug!("good enough at depth {depth}");
                break;
            }
        }

        if board.digest() != digest_before {
            return Err(EngineError::DigestMismatch {
                expected: digest_before,
                actual: board.digest(),
            });
        }

        let Some((mut idx, mut value, depth)) = best else {
            return Ok(self.finish(None, 0.0, 0));
        };

        if randomize && candidates.len() > 1 {
            self.stats.random_candidates = candidates.len();
            let pick = self.rng.gen_range_usize(0..candidates.len());
            (idx, value) = candidates[pick];
            trace!("randomized choice among {} moves", candidates.len());
        }

        Ok(self.finish(Some(moves.swap_remove(idx)), value, depth))
    }

    fn reset(&mut self) {
        self.nodes = 0;
        self.aborted = false;
        self.start = Instant::now();
        self.stats = AlphaBetaStats::default();
        for slot in &mut self.killers {
            slot.clear();
        }
    }

    fn finish(&mut self, best_move: Option<B::Move>, value: f64, depth: u32) -> SearchResult<B::Move> {
        self.stats.time_us = self.start.elapsed().as_micros() as u64;
        SearchResult {
            best_move,
            value,
            depth,
            nodes: self.nodes,
            stats: self.stats.clone(),
        }
    }

    fn search_root(
        &mut self,
        board: &mut B,
        moves: &[B::Move],
        depth: u32,
        randomize: bool,
    ) -> EngineResult<RootOutcome> {
        let mover = board.whose_turn();
        let drop = self.config.acceptable_drop.max(0.0);
        let mut alpha = f64::NEG_INFINITY;
        let mut best: Option<(usize, f64)> = None;
        let mut scored: Vec<(usize, f64)> = Vec::new();

        for (i, m) in moves.iter().enumerate() {
            // While randomizing, keep every move within `drop` of the best
            // exact: the window floor trails the best by the drop.
            let window = match best {
                Some((_, b)) if randomize => b - drop,
                _ => alpha,
            };

            let mut mv = m.clone();
            board.apply_ply(&mut mv)?;
            let value = self.child_value(board, mover, depth - 1, 1, window, f64::INFINITY);
            board.unexecute(&mv)?;
            let value = value?;

            if self.aborted {
                return Ok(RootOutcome {
                    best,
                    candidates: Vec::new(),
                    complete: false,
                });
            }

            if value > window || best.is_none() {
                scored.push((i, value));
            }
            if best.map_or(true, |(_, b)| value > b) {
                best = Some((i, value));
            }
            alpha = alpha.max(value);
        }

        let candidates = match best {
            Some((_, b)) if randomize => scored.into_iter().filter(|&(_, v)| v >= b - drop).collect(),
            _ => Vec::new(),
        };

        Ok(RootOutcome {
            best,
            candidates,
            complete: true,
        })
    }

    /// Value of the position after a move by `mover`, from `mover`'s view.
    /// The sign flips only when the turn actually passed.
    fn child_value(
        &mut self,
        board: &mut B,
        mover: PlayerId,
        depth: u32,
        ply: u32,
        alpha: f64,
        beta: f64,
    ) -> EngineResult<f64> {
        if board.whose_turn() == mover {
            self.negamax(board, depth, ply, alpha, beta)
        } else {
            Ok(-self.negamax(board, depth, ply, -beta, -alpha)?)
        }
    }

    /// Fail-soft negamax from the side to move's point of view.
    fn negamax(
        &mut self,
        board: &mut B,
        depth: u32,
        ply: u32,
        mut alpha: f64,
        beta: f64,
    ) -> EngineResult<f64> {
        self.nodes += 1;
        if self.out_of_budget() {
            self.aborted = true;
            return Ok(0.0);
        }

        let me = board.whose_turn();
        if board.is_over() {
            self.stats.terminals += 1;
            return Ok(terminal_value(board.result().as_ref(), me, ply));
        }
        if depth == 0 {
            self.stats.leaves += 1;
            return Ok(self.evaluator.evaluate(board, me));
        }

        let mut moves = board.legal_moves();
        if moves.is_empty() {
            self.stats.leaves += 1;
            return Ok(self.evaluator.evaluate(board, me));
        }
        if self.config.killers {
            self.order_killers(&mut moves, ply);
        }

        let mut best = f64::NEG_INFINITY;
        for (i, mut mv) in moves.into_iter().enumerate() {
            board.apply_ply(&mut mv)?;
            let value = self.child_value(board, me, depth - 1, ply + 1, alpha, beta);
            board.unexecute(&mv)?;
            let value = value?;

            if self.aborted {
                return Ok(0.0);
            }

            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                if self.config.killers {
                    self.record_killer(mv, ply);
                }
                break;
            }
        }
        Ok(best)
    }

    fn out_of_budget(&self) -> bool {
        if self.config.node_limit.is_some_and(|limit| self.nodes >= limit) {
            return true;
        }
        match self.config.time_limit_ms {
            Some(ms) if self.nodes % TIME_CHECK_INTERVAL == 0 => {
                self.start.elapsed().as_millis() >= u128::from(ms)
            }
            _ => false,
        }
    }

    fn order_killers(&mut self, moves: &mut [B::Move], ply: u32) {
        let Some(killers) = self.killers.get(ply as usize) else {
            return;
        };
        let mut front = 0;
        for killer in killers.iter() {
            if let Some(pos) = moves[front..].iter().position(|m| m.same_move(killer)) {
                moves.swap(front, front + pos);
                front += 1;
                self.stats.killer_hits += 1;
            }
        }
    }

    fn record_killer(&mut self, mv: B::Move, ply: u32) {
        let Some(slot) = self.killers.get_mut(ply as usize) else {
            return;
        };
        if slot.first().is_some_and(|k| k.same_move(&mv)) {
            return;
        }
        if slot.len() == 2 {
            slot.pop();
        }
        slot.insert(0, mv);
    }
}

/// Score of a finished game for `me`, discovered at `ply`.
fn terminal_value(result: Option<&GameResult>, me: PlayerId, ply: u32) -> f64 {
    match result {
        Some(r) if r.is_winner(me) => win_value(ply),
        Some(GameResult::Draw) | None => 0.0,
        Some(_) => -win_value(ply),
    }
}

/// Unpruned reference search: the exact depth-limited value of the position
/// for the side to move, under the same sign and win conventions as
/// [`AlphaBeta`].
pub fn minimax_value<B, E>(board: &mut B, evaluator: &E, depth: u32) -> EngineResult<f64>
where
    B: GameBoard,
    E: Evaluator<B> + ?Sized,
{
    minimax_at(board, evaluator, depth, 0)
}

fn minimax_at<B, E>(board: &mut B, evaluator: &E, depth: u32, ply: u32) -> EngineResult<f64>
where
    B: GameBoard,
    E: Evaluator<B> + ?Sized,
{
    let me = board.whose_turn();
    if board.is_over() {
        return Ok(terminal_value(board.result().as_ref(), me, ply));
    }
    if depth == 0 {
        return Ok(evaluator.evaluate(board, me));
    }
    let moves = board.legal_moves();
    if moves.is_empty() {
        return Ok(evaluator.evaluate(board, me));
    }

    let mut best = f64::NEG_INFINITY;
    for mut mv in moves {
        board.apply_ply(&mut mv)?;
        let value = minimax_at(board, evaluator, depth - 1, ply + 1);
        let same_side = board.whose_turn() == me;
        board.unexecute(&mv)?;
        let value = value?;
        best = best.max(if same_side { value } else { -value });
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_values_prefer_short_wins() {
        assert!(win_value(1) > win_value(2));
        assert!(win_value(30) > VALUE_OF_WIN);
        assert!(is_win_value(win_value(5)));
        assert!(!is_win_value(9_999.0));
    }

    #[test]
    fn test_terminal_value_signs() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let won = GameResult::Winner(p0);
        assert_eq!(terminal_value(Some(&won), p0, 2), win_value(2));
        assert_eq!(terminal_value(Some(&won), p1, 2), -win_value(2));
        assert_eq!(terminal_value(Some(&GameResult::Draw), p0, 2), 0.0);
        assert_eq!(terminal_value(None, p0, 2), 0.0);
    }

    #[test]
    fn test_cutoff_rate() {
        let stats = AlphaBetaStats {
            beta_cutoffs: 4,
            first_move_cutoffs: 3,
            ..AlphaBetaStats::default()
        };
        assert!((stats.first_move_cutoff_rate() - 75.0).abs() < 1e-9);
        assert_eq!(AlphaBetaStats::default().first_move_cutoff_rate(), 0.0);
    }
}
