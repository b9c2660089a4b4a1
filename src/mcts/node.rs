//! Search tree nodes and the edges between them.

use smallvec::SmallVec;

use crate::core::{PlayerId, PlayerMap};

/// Index of a node in its tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root is always the first node allocated.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One legal move out of a node, with its running statistics.
#[derive(Clone, Debug)]
pub struct Edge<M> {
    /// The move, without an undo snapshot.
    pub action: M,

    /// Node reached by this move once it has been expanded.
    pub child: Option<NodeId>,

    pub visits: u32,

    /// Summed rewards per seat over all visits.
    pub total_reward: PlayerMap<f64>,

    /// PUCT prior; uniform unless a caller supplies one.
    pub prior: f32,
}

impl<M> Edge<M> {
    pub fn new(action: M, player_count: usize) -> Self {
        Self::with_prior(action, player_count, 1.0)
    }

    pub fn with_prior(action: M, player_count: usize, prior: f32) -> Self {
        Self {
            action,
            child: None,
            visits: 0,
            total_reward: PlayerMap::with_value(player_count, 0.0),
            prior,
        }
    }

    /// Average reward `player` has collected through this move; zero before
    /// the first visit.
    #[must_use]
    pub fn mean_reward(&self, player: PlayerId) -> f64 {
        if self.visits == 0 {
            return 0.0;
        }
        self.total_reward[player] / f64::from(self.visits)
    }

    /// Count one visit and add its rewards.
    pub(crate) fn credit(&mut self, rewards: &PlayerMap<f64>) {
        self.visits += 1;
        for (player, reward) in rewards.iter() {
            self.total_reward[player] += reward;
        }
    }
}

/// A position in the search tree.
#[derive(Clone, Debug)]
pub struct MCTSNode<M> {
    /// Parent node and the index of the edge that leads here; `None` at the
    /// root.
    pub parent: Option<(NodeId, usize)>,

    /// Seat to move in this position.
    pub to_move: PlayerId,

    /// Plies below the root.
    pub depth: u16,

    pub visits: u32,

    /// Per-seat rewards of a finished game. Set exactly when the position
    /// is over.
    pub outcome: Option<PlayerMap<f64>>,

    /// One edge per legal move, in generation order.
    pub edges: SmallVec<[Edge<M>; 8]>,
}

impl<M> MCTSNode<M> {
    pub fn new(parent: Option<(NodeId, usize)>, to_move: PlayerId, depth: u16) -> Self {
        Self {
            parent,
            to_move,
            depth,
            visits: 0,
            outcome: None,
            edges: SmallVec::new(),
        }
    }

    pub fn root(to_move: PlayerId) -> Self {
        Self::new(None, to_move, 0)
    }

    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Indices of the edges that have no child yet.
    #[must_use]
    pub fn unexpanded(&self) -> SmallVec<[usize; 8]> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.child.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Every edge has a child. False for a node without edges.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        !self.edges.is_empty() && self.edges.iter().all(|e| e.child.is_some())
    }

    /// The edge visited most often; the earliest edge wins ties.
    #[must_use]
    pub fn most_visited(&self) -> Option<&Edge<M>> {
        self.edges
            .iter()
            .reduce(|best, e| if e.visits > best.visits { e } else { best })
    }
}
