//! Counters kept by one Monte Carlo search.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a single call to [`MCTSSearch::search`](super::MCTSSearch::search)
/// did, reset at the start of every call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayoutStats {
    /// Descents from the root, one per copied board.
    pub playouts: u32,

    /// Nodes that received their move list.
    pub expansions: u32,

    /// Rollouts played to the end of the game.
    pub finished_rollouts: u32,

    /// Rollouts scored by the evaluator at the depth limit.
    pub cut_off_rollouts: u32,

    /// Playouts that stopped on a decided node without a rollout.
    pub settled_playouts: u32,

    /// Deepest ply below the root that got a node.
    pub deepest_ply: u16,

    pub elapsed: Duration,
}

impl PlayoutStats {
    pub(crate) fn record_rollout(&mut self, cut_off: bool) {
        if cut_off {
            self.cut_off_rollouts += 1;
        } else {
            self.finished_rollouts += 1;
        }
    }

    pub(crate) fn reach(&mut self, ply: u16) {
        self.deepest_ply = self.deepest_ply.max(ply);
    }

    #[must_use]
    pub fn rollouts(&self) -> u32 {
        self.finished_rollouts + self.cut_off_rollouts
    }

    /// Fraction of rollouts that never reached a result; zero before any.
    #[must_use]
    pub fn cut_off_share(&self) -> f64 {
        match self.rollouts() {
            0 => 0.0,
            n => f64::from(self.cut_off_rollouts) / f64::from(n),
        }
    }

    #[must_use]
    pub fn playouts_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            f64::from(self.playouts) / secs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollouts_split_by_ending() {
        let mut stats = PlayoutStats::default();
        stats.record_rollout(false);
        stats.record_rollout(true);
        stats.record_rollout(true);
        stats.record_rollout(false);

        assert_eq!(stats.finished_rollouts, 2);
        assert_eq!(stats.cut_off_rollouts, 2);
        assert_eq!(stats.rollouts(), 4);
        assert_eq!(stats.cut_off_share(), 0.5);
    }

    #[test]
    fn test_reach_keeps_the_deepest_ply() {
        let mut stats = PlayoutStats::default();
        for ply in [3, 7, 2] {
            stats.reach(ply);
        }
        assert_eq!(stats.deepest_ply, 7);
    }

    #[test]
    fn test_rates_before_any_work() {
        let stats = PlayoutStats::default();
        assert_eq!(stats.cut_off_share(), 0.0);
        assert_eq!(stats.playouts_per_second(), 0.0);
    }

    #[test]
    fn test_playouts_per_second() {
        let stats = PlayoutStats {
            playouts: 300,
            elapsed: Duration::from_millis(1_500),
            ..PlayoutStats::default()
        };
        assert!((stats.playouts_per_second() - 200.0).abs() < 1e-9);
    }
}
