//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices; each node keeps its parent index
//! for O(1) upward walks during backpropagation.

use engine_core::GameState;
use rand::Rng;

use crate::node::{Node, NodeId};
use crate::search::SearchError;
use crate::selection::SelectionFormula;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<G: GameState> {
    /// Arena storing all nodes
    nodes: Vec<Node<G>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<G: GameState> MctsTree<G> {
    /// Create a new tree holding only a root for `position`.
    pub fn new(position: G) -> Self {
        Self {
            nodes: vec![Node::new_root(position)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<G> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<G> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    ///
    /// Callers reserve room with [`Self::ensure_room`] first.
    fn allocate(&mut self, node: Node<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Fail unless `additional` more nodes still get valid ids.
    fn ensure_room(&self, additional: usize) -> Result<(), SearchError> {
        let last = self.nodes.len().checked_add(additional).map(|end| end - 1);
        if last.and_then(NodeId::from_index).is_none() {
            return Err(SearchError::TreeFull(self.nodes.len()));
        }
        Ok(())
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (should never be true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[Node<G>] {
        &self.nodes
    }

    /// Expand a leaf with one child per legal continuation of its position.
    ///
    /// Expansion is all-or-nothing and must happen at most once per node:
    /// expanding twice would duplicate the children. Returns the number of
    /// children added, 0 when the position has no continuations.
    pub fn expand(&mut self, node_id: NodeId) -> Result<usize, SearchError> {
        let node = self.get(node_id);
        debug_assert!(node.is_leaf(), "node {:?} expanded twice", node_id);

        let depth = node.depth + 1;
        let next_states = node.position().legal_next_states()?;
        let count = next_states.len();
        self.ensure_room(count)?;

        for (mv, position) in next_states {
            let child_id = self.allocate(Node::new_child(node_id, mv, position, depth));
            self.get_mut(node_id).children.push(child_id);
        }

        Ok(count)
    }

    /// Select one child of a node with `formula`, scored for `perspective`.
    ///
    /// Every child is scanned and the best score under the formula's
    /// direction is kept; the first child seen wins ties. Returns `None` if the
    /// node has no children.
    pub fn select_child<R: Rng + ?Sized>(
        &self,
        node_id: NodeId,
        formula: SelectionFormula,
        perspective: G::Player,
        total_playout: u64,
        exploration_constant: f64,
        rng: &mut R,
    ) -> Option<NodeId> {
        let direction = formula.direction();
        let mut best: Option<(NodeId, f64)> = None;

        for &child_id in &self.get(node_id).children {
            let score = formula.score(
                self.get(child_id),
                perspective,
                total_playout,
                exploration_constant,
                rng,
            );
            match best {
                Some((_, incumbent)) if !direction.prefers(score, incumbent) => {}
                _ => best = Some((child_id, score)),
            }
        }

        best.map(|(id, _)| id)
    }

    /// Backpropagate a reward from a leaf up to and including the root.
    ///
    /// `reward` is seen by the player to move at the leaf; it is flipped to
    /// `1 - reward` at each level (opponent's perspective).
    pub fn backpropagate(&mut self, leaf_id: NodeId, reward: f64) {
        let mut current_id = leaf_id;
        let mut current_reward = reward;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.update_info(current_reward);

            current_reward = 1.0 - current_reward;
            current_id = node.parent;
        }
    }

    /// Node IDs from `node_id` up to the root, inclusive.
    pub fn path_to_root(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = node_id;
        while current.is_some() {
            path.push(current);
            current = self.get(current).parent;
        }
        path
    }

    /// Per-child statistics of a node, in expansion order.
    pub fn child_stats(&self, node_id: NodeId) -> Vec<ChildStats<G::Move>> {
        let node = self.get(node_id);
        let mover = node.position().player_to_move();

        node.children
            .iter()
            .filter_map(|&id| {
                let child = self.get(id);
                child.mv().map(|mv| ChildStats {
                    mv: mv.clone(),
                    playout_count: child.playout_count,
                    win_count: child.win_count,
                    win_rate: child.win_rate_for(mover),
                })
            })
            .collect()
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_playouts: root.playout_count,
            root_win_rate: root.win_rate(),
            max_depth: self.nodes.iter().map(|n| n.depth).max().unwrap_or(0),
        }
    }
}

/// Statistics of one child, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<M> {
    /// Move leading to the child
    pub mv: M,
    pub playout_count: u32,
    pub win_count: f64,
    /// Win rate for the player who plays `mv`
    pub win_rate: f64,
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_playouts: u32,
    pub root_win_rate: f64,
    pub max_depth: u32,
}
