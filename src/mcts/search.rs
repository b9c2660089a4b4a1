//! Core MCTS search algorithm.
//!
//! Every iteration copies the root board, descends the tree with the
//! selection policy (each node maximizing the reward of its own side to
//! move), expands one new edge, runs a rollout and backpropagates the
//! per-seat rewards.

use std::time::Instant;

use log::debug;

use crate::core::{EngineResult, GameRng, PlayerId, PlayerMap};
use crate::moves::MoveSpec;
use crate::rules::GameBoard;

use super::config::MCTSConfig;
use super::node::{Edge, NodeId};
use super::policy::{result_to_rewards, RandomSimulation, SelectionPolicy, SimulationPolicy, UCB1};
use super::stats::PlayoutStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Generic over the board type. Owns the search tree and configuration.
pub struct MCTSSearch<B: GameBoard> {
    /// Search configuration.
    config: MCTSConfig,

    /// The search tree.
    tree: MCTSTree<B::Move>,

    /// RNG for expansion order and rollouts.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy<B::Move>>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy<B>>,

    stats: PlayoutStats,
}

impl<B: GameBoard> MCTSSearch<B> {
    /// Create a new MCTS search context.
    pub fn new(config: MCTSConfig) -> Self {
        let rng = GameRng::new(config.seed);

        Self {
            tree: MCTSTree::new(PlayerId::new(0), 2),
            config,
            rng,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomSimulation),
            stats: PlayoutStats::default(),
        }
    }

    /// Set a custom selection policy.
    #[must_use]
    pub fn with_selection<S: SelectionPolicy<B::Move> + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    #[must_use]
    pub fn with_simulation<S: SimulationPolicy<B> + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Search from `board` and return the chosen move for its side to move.
    ///
    /// Returns `Ok(None)` when there is no legal move. The board is only
    /// cloned, never mutated.
    pub fn search(&mut self, board: &B) -> EngineResult<Option<B::Move>> {
        let start = Instant::now();
        self.stats = PlayoutStats::default();
        self.tree = MCTSTree::with_capacity(
            board.whose_turn(),
            board.player_count(),
            self.config.max_nodes.min(4096),
        );

        let root = self.tree.root();
        self.expand_node(root, &mut board.clone());

        if self.tree.get(root).is_terminal() || self.tree.get(root).edges.is_empty() {
            return Ok(None);
        }

        // Check for single action (no choice)
        if self.tree.get(root).edges.len() == 1 {
            return Ok(Some(self.tree.get(root).edges[0].action.clone()));
        }

        for _ in 0..self.config.playouts {
            let mut sim = board.clone();
            self.iteration(&mut sim)?;
            self.stats.playouts += 1;

            if self.tree.len() >= self.config.max_nodes {
                break;
            }
            if self
                .config
                .time_limit_ms
                .is_some_and(|ms| start.elapsed().as_millis() >= u128::from(ms))
            {
                break;
            }
        }

        self.stats.elapsed = start.elapsed();
        let best = self.best_action();
        if let Some(m) = &best {
            let line: Vec<String> = self
                .tree
                .principal_variation()
                .into_iter()
                .map(|m| m.move_string())
                .collect();
            debug!(
                "mcts: {} after {} iterations ({} nodes), line [{}]",
                m.move_string(),
                self.stats.playouts,
                self.tree.len(),
                line.join(", ")
            );
        }
        Ok(best)
    }

    /// Single MCTS iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, board: &mut B) -> EngineResult<()> {
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.tree.root();

        // === SELECTION ===
        loop {
            let node = self.tree.get(current);

            if let Some(outcome) = &node.outcome {
                let rewards = outcome.clone();
                self.tree.backpropagate(&path, &rewards);
                self.stats.settled_playouts += 1;
                return Ok(());
            }

            if node.edges.is_empty() {
                // No legal moves without a result - score as a draw
                let rewards = PlayerMap::with_value(self.tree.player_count(), 0.5);
                self.tree.backpropagate(&path, &rewards);
                self.stats.settled_playouts += 1;
                return Ok(());
            }

            // === EXPANSION ===
            let unexpanded = node.unexpanded();
            if !unexpanded.is_empty() {
                let edge_idx = match unexpanded.len() {
                    1 => unexpanded[0],
                    n => unexpanded[self.rng.gen_range_usize(0..n)],
                };
                path.push((current, edge_idx));

                let mut mv = self.tree.get(current).edges[edge_idx].action.clone();
                board.apply_ply(&mut mv)?;
                self.expand_child(current, edge_idx, board);

                // === SIMULATION ===
                let mut sim_rng = self.rng.fork();
                let rollout =
                    self.simulation
                        .simulate(board, &mut sim_rng, self.config.rollout_depth)?;
                self.stats.record_rollout(rollout.cut_off);
                self.tree.backpropagate(&path, &rollout.rewards);
                return Ok(());
            }

            let edge_idx = self.selection.select(node, node.to_move, &self.config);
            path.push((current, edge_idx));

            let edge = &self.tree.get(current).edges[edge_idx];
            let Some(child) = edge.child else {
                return Ok(());
            };
            let mut mv = edge.action.clone();
            board.apply_ply(&mut mv)?;
            current = child;
        }
    }

    /// Expand a node with all legal moves.
    fn expand_node(&mut self, node_id: NodeId, board: &mut B) {
        let player_count = self.tree.player_count();

        if board.is_over() {
            let rewards = match board.result() {
                Some(result) => result_to_rewards(&result, player_count),
                None => PlayerMap::with_value(player_count, 0.5),
            };
            self.tree.get_mut(node_id).outcome = Some(rewards);
            return;
        }

        let moves = board.legal_moves();
        let node = self.tree.get_mut(node_id);
        for mv in moves {
            node.edges.push(Edge::new(mv, player_count));
        }

        self.stats.expansions += 1;
    }

    /// Link the child reached through `edge_idx` and expand it from `board`.
    fn expand_child(&mut self, parent_id: NodeId, edge_idx: usize, board: &mut B) -> NodeId {
        let child_id = self.tree.attach(parent_id, edge_idx, board.whose_turn());
        self.stats.reach(self.tree.get(child_id).depth);
        self.expand_node(child_id, board);
        child_id
    }

    /// Select the best move from the root.
    fn best_action(&mut self) -> Option<B::Move> {
        let root = self.tree.root_node();

        if self.config.temperature <= 0.0 {
            // Greedy: select most visited
            return root.most_visited().map(|e| e.action.clone());
        }

        let weights: Vec<f32> = root
            .edges
            .iter()
            .map(|e| (e.visits as f64).powf(1.0 / self.config.temperature) as f32)
            .collect();
        self.rng
            .choose_weighted(&weights)
            .map(|idx| root.edges[idx].action.clone())
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &PlayoutStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree<B::Move> {
        &self.tree
    }

    /// Root move visit counts.
    pub fn action_visits(&self) -> Vec<(B::Move, u32)> {
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| (e.action.clone(), e.visits))
            .collect()
    }

    /// Root move probabilities (visit share), summing to ~1.0.
    pub fn action_probabilities(&self) -> Vec<(B::Move, f64)> {
        let root = self.tree.root_node();
        let total: u32 = root.edges.iter().map(|e| e.visits).sum();

        if total == 0 {
            let uniform = 1.0 / root.edges.len().max(1) as f64;
            return root
                .edges
                .iter()
                .map(|e| (e.action.clone(), uniform))
                .collect();
        }

        root.edges
            .iter()
            .map(|e| (e.action.clone(), f64::from(e.visits) / f64::from(total)))
            .collect()
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts::policy::GuidedSimulation;
    use crate::testing::{pile_eval, PileBoard};

    #[test]
    fn test_search_returns_action() {
        let board = PileBoard::new(10, None);
        let mut search = MCTSSearch::new(MCTSConfig::default().with_playouts(100));
        let action = search.search(&board).unwrap();

        assert!(action.is_some());
        assert_eq!(board.pile, 10, "caller's board untouched");
    }

    #[test]
    fn test_search_stats() {
        let board = PileBoard::new(10, None);
        let mut search = MCTSSearch::new(MCTSConfig::default().with_playouts(50));
        search.search(&board).unwrap();

        let stats = search.stats();
        assert_eq!(stats.playouts, 50);
        assert!(stats.rollouts() > 0);
        assert!(stats.expansions > 0);
        assert!(stats.deepest_ply > 0);
    }

    #[test]
    fn test_search_deterministic() {
        let board = PileBoard::new(13, None);
        let config = MCTSConfig::default().with_seed(12345).with_playouts(200);

        let a = MCTSSearch::new(config.clone()).search(&board).unwrap();
        let b = MCTSSearch::new(config).search(&board).unwrap();

        assert!(a.unwrap().same_move(&b.unwrap()));
    }

    #[test]
    fn test_finds_winning_take() {
        // Taking 2 leaves a multiple of four
        let board = PileBoard::new(6, None);
        let mut search = MCTSSearch::new(MCTSConfig::default().with_playouts(2_000));
        let best = search.search(&board).unwrap().unwrap();
        assert_eq!(best.count, 2);
    }

    #[test]
    fn test_terminal_root_has_no_move() {
        let mut board = PileBoard::new(1, None);
        let mut take = board.legal_moves().remove(0);
        board.apply_ply(&mut take).unwrap();

        let mut search = MCTSSearch::new(MCTSConfig::default());
        assert!(search.search(&board).unwrap().is_none());
    }

    #[test]
    fn test_action_probabilities() {
        let board = PileBoard::new(10, None);
        let mut search = MCTSSearch::new(MCTSConfig::default().with_playouts(100));
        search.search(&board).unwrap();

        let sum: f64 = search.action_probabilities().iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_guided_simulation_and_time_budget() {
        let board = PileBoard::new(40, None);
        let config = MCTSConfig::default()
            .with_playouts(u32::MAX)
            .with_time_limit_ms(50)
            .with_rollout_depth(4);
        let mut search = MCTSSearch::new(config).with_simulation(GuidedSimulation::new(pile_eval, 1.0));
        assert!(search.search(&board).unwrap().is_some());
        assert!(search.stats().cut_off_rollouts > 0);
        assert!(search.stats().playouts < u32::MAX);
    }

    #[test]
    fn test_tree_growth() {
        let board = PileBoard::new(20, None);
        let mut search = MCTSSearch::new(MCTSConfig::default().with_playouts(200));
        search.search(&board).unwrap();

        let tree_stats = search.tree().stats();
        assert!(tree_stats.node_count > 1);
        assert!(tree_stats.max_depth > 0);
    }
}
