//! MCTS tree node representation.
//!
//! Each node represents a game position reached by playing a move from the parent.
//! Nodes store playout statistics used for selection and move recommendation.

use engine_core::{GameError, GameState};
use rand::Rng;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Id for arena slot `index`, or `None` if it does not fit below the
    /// sentinel.
    pub fn from_index(index: usize) -> Option<NodeId> {
        u32::try_from(index)
            .ok()
            .filter(|&raw| raw != u32::MAX)
            .map(NodeId)
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct Node<G: GameState> {
    /// Parent node index (NONE for root)
    pub(crate) parent: NodeId,

    /// Move that led to this node from the parent (None for root)
    mv: Option<G::Move>,

    /// Game position at this node, fixed at construction
    position: G,

    /// Distance from the root (root is 0)
    pub(crate) depth: u32,

    /// Number of playouts folded into this node
    pub(crate) playout_count: u32,

    /// Sum of rewards folded into this node, each in [0, 1], seen by the
    /// player to move at this node.
    pub(crate) win_count: f64,

    /// Children in expansion order. Empty until the node is expanded.
    pub(crate) children: Vec<NodeId>,
}

impl<G: GameState> Node<G> {
    /// Create a new root node.
    pub fn new_root(position: G) -> Self {
        Self {
            parent: NodeId::NONE,
            mv: None,
            position,
            depth: 0,
            playout_count: 0,
            win_count: 0.0,
            children: Vec::new(),
        }
    }

    /// Create a new child node reached from `parent` by `mv`.
    pub fn new_child(parent: NodeId, mv: G::Move, position: G, depth: u32) -> Self {
        Self {
            parent,
            mv: Some(mv),
            position,
            depth,
            playout_count: 0,
            win_count: 0.0,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> NodeId {
        self.parent
    }

    /// Move that produced this node's position.
    pub fn mv(&self) -> Option<&G::Move> {
        self.mv.as_ref()
    }

    pub fn position(&self) -> &G {
        &self.position
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn playout_count(&self) -> u32 {
        self.playout_count
    }

    pub fn win_count(&self) -> f64 {
        self.win_count
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Leaf: not expanded yet, or terminal.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// False for terminal positions, which stay leaves forever.
    #[inline]
    pub fn is_expandable(&self) -> bool {
        self.position.is_expandable()
    }

    /// Raw win rate `win_count / playout_count` for the player to move here.
    /// Returns 0.0 if never played.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.playout_count == 0 {
            0.0
        } else {
            self.win_count / self.playout_count as f64
        }
    }

    /// Win rate seen by `player`.
    ///
    /// Statistics are kept for the player to move at this node; any other
    /// player is that player's opponent and sees the complement. Returns 0.0
    /// if never played.
    pub fn win_rate_for(&self, player: G::Player) -> f64 {
        if self.playout_count == 0 {
            0.0
        } else if self.position.player_to_move() == player {
            self.win_rate()
        } else {
            1.0 - self.win_rate()
        }
    }

    /// Fold one playout result into the statistics.
    #[inline]
    pub fn update_info(&mut self, reward: f64) {
        self.playout_count += 1;
        self.win_count += reward;
    }

    /// Random playout from this position, rewarded for the player to move here.
    pub fn playout<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, GameError> {
        self.position
            .rollout_reward(self.position.player_to_move(), rng)
    }
}
