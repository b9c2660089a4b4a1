//! Arena of search nodes.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. A search
//! builds a fresh tree per root position; nothing is ever freed
//! individually.

use super::node::{MCTSNode, NodeId};
use crate::core::{PlayerId, PlayerMap};

/// Arena-backed search tree, generic over the game's move type.
#[derive(Clone, Debug)]
pub struct MCTSTree<M> {
    nodes: Vec<MCTSNode<M>>,
    player_count: usize,
}

impl<M> MCTSTree<M> {
    pub fn new(root_player: PlayerId, player_count: usize) -> Self {
        Self::with_capacity(root_player, player_count, 1024)
    }

    pub fn with_capacity(root_player: PlayerId, player_count: usize, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root(root_player));
        Self {
            nodes,
            player_count,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode<M> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<M> {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode<M> {
        self.get(NodeId::ROOT)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Create the node reached through edge `edge` of `parent` and link it.
    pub fn attach(&mut self, parent: NodeId, edge: usize, to_move: PlayerId) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes
            .push(MCTSNode::new(Some((parent, edge)), to_move, depth));
        self.get_mut(parent).edges[edge].child = Some(id);
        id
    }

    /// Credit one iteration's rewards along `path`, a list of
    /// `(node, edge taken)` pairs from the root down.
    pub fn backpropagate(&mut self, path: &[(NodeId, usize)], rewards: &PlayerMap<f64>) {
        if path.is_empty() {
            // iterations that end at the root still count as root visits
            self.get_mut(NodeId::ROOT).visits += 1;
            return;
        }
        for &(id, edge) in path.iter().rev() {
            let node = self.get_mut(id);
            node.visits += 1;
            node.edges[edge].credit(rewards);
        }
    }

    /// The line of most-visited moves from the root, stopping at the first
    /// unexpanded edge.
    #[must_use]
    pub fn principal_variation(&self) -> Vec<&M> {
        let mut line = Vec::new();
        let mut node = self.root_node();
        while let Some(edge) = node.most_visited() {
            if edge.visits == 0 {
                break;
            }
            line.push(&edge.action);
            match edge.child {
                Some(child) => node = self.get(child),
                None => break,
            }
        }
        line
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        self.nodes.iter().fold(
            TreeStats {
                node_count: self.nodes.len(),
                ..TreeStats::default()
            },
            |mut s, node| {
                s.max_depth = s.max_depth.max(node.depth);
                s.terminal_count += usize::from(node.is_terminal());
                s.total_edges += node.edges.len();
                s.expanded_edges += node.edges.iter().filter(|e| e.child.is_some()).count();
                s
            },
        )
    }
}

/// Shape of a finished search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,
    pub terminal_count: usize,
    pub total_edges: usize,
    /// Edges that have a child node.
    pub expanded_edges: usize,
}

impl TreeStats {
    /// Average number of moves per node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.node_count == 0 {
            return 0.0;
        }
        self.total_edges as f64 / self.node_count as f64
    }

    /// Share of edges that were expanded.
    #[must_use]
    pub fn expansion_ratio(&self) -> f64 {
        if self.total_edges == 0 {
            return 0.0;
        }
        self.expanded_edges as f64 / self.total_edges as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts::node::Edge;

    type Tree = MCTSTree<&'static str>;

    fn seat(i: u8) -> PlayerId {
        PlayerId::new(i)
    }

    fn two_move_root() -> Tree {
        let mut tree = Tree::new(seat(0), 2);
        let root = tree.root();
        tree.get_mut(root).edges.push(Edge::new("dropb C 3", 2));
        tree.get_mut(root).edges.push(Edge::new("dropb D 3", 2));
        tree
    }

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = Tree::new(seat(1), 2);
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::ROOT);
        assert_eq!(tree.root_node().to_move, seat(1));
    }

    #[test]
    fn test_attach_links_child() {
        let mut tree = two_move_root();
        let child = tree.attach(tree.root(), 1, seat(1));

        assert_eq!(child, NodeId(1));
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).parent, Some((NodeId::ROOT, 1)));
        assert_eq!(tree.root_node().edges[1].child, Some(child));
        assert!(tree.root_node().edges[0].child.is_none());
    }

    #[test]
    fn test_backpropagate_credits_path() {
        let mut tree = two_move_root();
        let child = tree.attach(tree.root(), 0, seat(1));
        tree.get_mut(child).edges.push(Edge::new("done", 2));

        let mut rewards = PlayerMap::with_value(2, 0.0);
        rewards[seat(1)] = 1.0;
        tree.backpropagate(&[(NodeId::ROOT, 0), (child, 0)], &rewards);

        assert_eq!(tree.root_node().visits, 1);
        assert_eq!(tree.get(child).visits, 1);
        assert_eq!(tree.root_node().edges[0].mean_reward(seat(1)), 1.0);
        assert_eq!(tree.get(child).edges[0].visits, 1);

        tree.backpropagate(&[], &rewards);
        assert_eq!(tree.root_node().visits, 2);
    }

    #[test]
    fn test_principal_variation_follows_visits() {
        let mut tree = two_move_root();
        let child = tree.attach(tree.root(), 1, seat(1));
        tree.get_mut(child).edges.push(Edge::new("done", 2));
        let draw = PlayerMap::with_value(2, 0.5);
        tree.backpropagate(&[(NodeId::ROOT, 1), (child, 0)], &draw);
        tree.backpropagate(&[(NodeId::ROOT, 1)], &draw);

        assert_eq!(tree.principal_variation(), vec![&"dropb D 3", &"done"]);
    }

    #[test]
    fn test_stats() {
        let mut tree = two_move_root();
        let child = tree.attach(tree.root(), 0, seat(1));
        tree.get_mut(child).outcome = Some(PlayerMap::with_value(2, 0.5));

        let stats = tree.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.total_edges, 2);
        assert_eq!(stats.expanded_edges, 1);
        assert_eq!(stats.expansion_ratio(), 0.5);
        assert_eq!(stats.branching_factor(), 1.0);
    }
}
