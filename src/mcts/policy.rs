//! MCTS policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which child to explore (UCB1, PUCT)
//! - `SimulationPolicy`: How to run rollouts (uniform random, or random with
//!   an evaluator scoring the cutoff position)

use crate::core::{EngineResult, GameRng, PlayerId, PlayerMap};
use crate::rules::{GameBoard, GameResult};
use crate::search::Evaluator;

use super::config::MCTSConfig;
use super::node::MCTSNode;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy<M>: Send + Sync {
    /// Select the best edge index from a node, maximizing `player`'s reward.
    fn select(&self, node: &MCTSNode<M>, player: PlayerId, config: &MCTSConfig) -> usize;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (high reward) with exploration (low visits).
/// Formula: Q(a) + c * sqrt(ln(N) / n(a))
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl<M> SelectionPolicy<M> for UCB1 {
    fn select(&self, node: &MCTSNode<M>, player: PlayerId, config: &MCTSConfig) -> usize {
        let ln_parent = (node.visits.max(1) as f64).ln();

        node.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                let exploitation = edge.mean_reward(player);
                let exploration = if edge.visits == 0 {
                    f64::INFINITY
                } else {
                    config.exploration_constant * (ln_parent / edge.visits as f64).sqrt()
                };
                (i, exploitation + exploration)
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map_or(0, |(i, _)| i)
    }
}

/// PUCT selection policy (Predictor + UCB for Trees).
///
/// Formula: Q(a) + c * P(a) * sqrt(N) / (1 + n(a))
#[derive(Clone, Debug, Default)]
pub struct PUCT;

impl<M> SelectionPolicy<M> for PUCT {
    fn select(&self, node: &MCTSNode<M>, player: PlayerId, config: &MCTSConfig) -> usize {
        let sqrt_parent = (node.visits.max(1) as f64).sqrt();

        node.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| {
                let q = edge.mean_reward(player);
                let u = config.exploration_constant * f64::from(edge.prior) * sqrt_parent
                    / (1.0 + edge.visits as f64);
                (i, q + u)
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map_or(0, |(i, _)| i)
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running simulations (rollouts) from a leaf node.
pub trait SimulationPolicy<B: GameBoard>: Send + Sync {
    /// Play out from `board` (which is consumed by the rollout) and return
    /// rewards per player in `[0, 1]`.
    fn simulate(
        &self,
        board: &mut B,
        rng: &mut GameRng,
        max_depth: u32,
    ) -> EngineResult<Rollout>;
}

/// Result of one rollout.
#[derive(Clone, Debug)]
pub struct Rollout {
    pub rewards: PlayerMap<f64>,
    /// True when the depth cutoff, not the end of the game, stopped it.
    pub cut_off: bool,
}

/// Play uniformly random legal moves until the game ends or `max_depth`
/// plies have been played. Returns `None` with the board at the cutoff.
fn random_playout<B: GameBoard>(
    board: &mut B,
    rng: &mut GameRng,
    max_depth: u32,
) -> EngineResult<Option<PlayerMap<f64>>> {
    let player_count = board.player_count();
    let mut depth = 0;

    loop {
        if board.is_over() {
            return Ok(Some(match board.result() {
                Some(result) => result_to_rewards(&result, player_count),
                None => PlayerMap::with_value(player_count, 0.5),
            }));
        }

        if max_depth > 0 && depth >= max_depth {
            return Ok(None);
        }

        let mut moves = board.legal_moves();
        if moves.is_empty() {
            // Stuck without a result - score as a draw
            return Ok(Some(PlayerMap::with_value(player_count, 0.5)));
        }

        let idx = rng.gen_range_usize(0..moves.len());
        let mut mv = moves.swap_remove(idx);
        board.apply_ply(&mut mv)?;

        depth += 1;
    }
}

/// Random simulation policy.
///
/// Plays random legal moves; a rollout cut off by depth scores as a draw.
#[derive(Clone, Debug, Default)]
pub struct RandomSimulation;

impl<B: GameBoard> SimulationPolicy<B> for RandomSimulation {
    fn simulate(&self, board: &mut B, rng: &mut GameRng, max_depth: u32) -> EngineResult<Rollout> {
        Ok(match random_playout(board, rng, max_depth)? {
            Some(rewards) => Rollout {
                rewards,
                cut_off: false,
            },
            None => Rollout {
                rewards: PlayerMap::with_value(board.player_count(), 0.5),
                cut_off: true,
            },
        })
    }
}

/// Random rollout whose cutoff position is scored by a static evaluator.
///
/// Each seat's evaluation is squashed into `[0, 1]` with a logistic of
/// width `scale`.
#[derive(Clone, Debug)]
pub struct GuidedSimulation<E> {
    evaluator: E,
    scale: f64,
}

impl<E> GuidedSimulation<E> {
    /// Create a guided policy; `scale` is the evaluation difference that
    /// maps to roughly a 73% reward.
    pub fn new(evaluator: E, scale: f64) -> Self {
        Self {
            evaluator,
            scale: scale.max(f64::EPSILON),
        }
    }
}

impl<B, E> SimulationPolicy<B> for GuidedSimulation<E>
where
    B: GameBoard,
    E: Evaluator<B>,
{
    fn simulate(&self, board: &mut B, rng: &mut GameRng, max_depth: u32) -> EngineResult<Rollout> {
        if let Some(rewards) = random_playout(board, rng, max_depth)? {
            return Ok(Rollout {
                rewards,
                cut_off: false,
            });
        }
        let rewards = PlayerMap::new(board.player_count(), |p| {
            let score = self.evaluator.evaluate(board, p);
            1.0 / (1.0 + (-score / self.scale).exp())
        });
        Ok(Rollout {
            rewards,
            cut_off: true,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert a game result to per-player rewards.
pub fn result_to_rewards(result: &GameResult, player_count: usize) -> PlayerMap<f64> {
    PlayerMap::new(player_count, |player| match result {
        GameResult::Draw => 0.5,
        _ if result.is_winner(player) => 1.0,
        _ => 0.0,
    })
}
