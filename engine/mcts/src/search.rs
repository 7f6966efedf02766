//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Descend from the root with the configured formula to a leaf
//! 2. Expansion: Expand the leaf once it has enough playouts, then step into
//!    one of its new children. A finished leaf past the threshold aborts the
//!    iteration instead
//! 3. Simulation: Random playout from the chosen leaf
//! 4. Backpropagation: Update statistics along the path, flipping the reward
//!    at every ply

use engine_core::{GameError, GameState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::selection::SelectionFormula;
use crate::tree::{ChildStats, MctsTree};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Unknown selection formula: {0}")]
    InvalidSelectionFormula(String),

    #[error("Node {0:?} has no children to select from")]
    EmptyChildSet(NodeId),

    #[error("Search root has not been set")]
    RootNotSet,

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Node arena is full at {0} nodes")]
    TreeFull(usize),
}

/// What a single iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterationOutcome {
    /// A playout ran from a leaf at `depth` and `reward` was backpropagated.
    Simulated { reward: f64, depth: u32 },
    /// The iteration stopped before simulating; no statistics changed.
    Aborted,
}

/// Iteration counts of a [`SearchTree::run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationCounts {
    pub simulated: u32,
    pub aborted: u32,
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// Recommended move
    pub mv: M,

    /// Win rate of the recommended move for the player making it
    pub win_rate: f64,

    /// Playouts through the recommended move
    pub playouts: u32,

    /// Iterations that simulated or aborted
    pub iterations: IterationCounts,

    /// Statistics of every root child, in expansion order
    pub children: Vec<ChildStats<M>>,
}

/// MCTS search state for one decision.
///
/// Owns the tree, the running playout total and the random source used by
/// rollouts and by the UCT lottery between unvisited children.
pub struct SearchTree<G: GameState, R: Rng = ChaCha20Rng> {
    config: MctsConfig,
    tree: Option<MctsTree<G>>,
    total_playout: u64,
    rng: R,
}

impl<G: GameState> SearchTree<G, ChaCha20Rng> {
    /// Create a search seeded from system entropy.
    pub fn new(config: MctsConfig) -> Self {
        Self::with_rng(config, ChaCha20Rng::from_entropy())
    }
}

impl<G: GameState, R: Rng> SearchTree<G, R> {
    /// Create a search drawing randomness from `rng`.
    pub fn with_rng(config: MctsConfig, rng: R) -> Self {
        Self {
            config,
            tree: None,
            total_playout: 0,
            rng,
        }
    }

    /// Set the formula used to descend the tree.
    pub fn configure(&mut self, selection: SelectionFormula) {
        self.config.selection = selection;
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Replace any previous tree with a fresh one rooted at `position`.
    ///
    /// The root is expanded immediately. A terminal root gets no children and
    /// every later iteration aborts.
    pub fn set_root(&mut self, position: G) -> Result<(), SearchError> {
        let mut tree = MctsTree::new(position);
        let children = tree.expand(tree.root())?;

        debug!(children, "Search root set");

        self.tree = Some(tree);
        self.total_playout = 0;
        Ok(())
    }

    /// Run one select / expand / simulate / backpropagate step.
    pub fn run_iteration(&mut self) -> Result<IterationOutcome, SearchError> {
        let Self {
            config,
            tree,
            total_playout,
            rng,
        } = self;
        let tree = tree.as_mut().ok_or(SearchError::RootNotSet)?;

        let root = tree.root();
        if tree.get(root).is_leaf() {
            debug!("Root has no children, iteration aborted");
            return Ok(IterationOutcome::Aborted);
        }

        // Selection
        let mut current = root;
        while !tree.get(current).is_leaf() {
            current = descend(tree, current, config, *total_playout, rng)?;
        }

        // Expansion
        let leaf = tree.get(current);
        if leaf.playout_count > config.expansion_threshold {
            if !leaf.is_expandable() {
                debug!(node = current.0, "Terminal leaf past threshold, iteration aborted");
                return Ok(IterationOutcome::Aborted);
            }
            if tree.expand(current)? == 0 {
                debug!(node = current.0, "Expansion yielded no children, iteration aborted");
                return Ok(IterationOutcome::Aborted);
            }
            current = descend(tree, current, config, *total_playout, rng)?;
        }

        // Simulation
        *total_playout += 1;
        let leaf = tree.get(current);
        let depth = leaf.depth;
        let reward = leaf.playout(rng)?;

        // Backpropagation
        tree.backpropagate(current, reward);

        trace!(
            leaf = current.0,
            depth,
            reward,
            total_playout = *total_playout,
            "MCTS iteration complete"
        );

        Ok(IterationOutcome::Simulated { reward, depth })
    }

    /// Run `iterations` iterations, stopping at the first error.
    pub fn run(&mut self, iterations: u32) -> Result<IterationCounts, SearchError> {
        let mut counts = IterationCounts::default();
        for _ in 0..iterations {
            match self.run_iteration()? {
                IterationOutcome::Simulated { .. } => counts.simulated += 1,
                IterationOutcome::Aborted => counts.aborted += 1,
            }
        }
        Ok(counts)
    }

    /// Move of the root child with the best win rate for the root's mover.
    pub fn recommend_move(&mut self) -> Result<G::Move, SearchError> {
        let child = self.recommended_child()?;
        let tree = self.tree.as_ref().ok_or(SearchError::RootNotSet)?;
        tree.get(child)
            .mv()
            .cloned()
            .ok_or(SearchError::NoLegalMoves)
    }

    /// Statistics of every root child, in expansion order.
    pub fn root_stats(&self) -> Result<Vec<ChildStats<G::Move>>, SearchError> {
        let tree = self.tree.as_ref().ok_or(SearchError::RootNotSet)?;
        Ok(tree.child_stats(tree.root()))
    }

    /// The current tree, if a root has been set.
    pub fn tree(&self) -> Option<&MctsTree<G>> {
        self.tree.as_ref()
    }

    /// Playouts simulated since the root was set.
    pub fn total_playout(&self) -> u64 {
        self.total_playout
    }

    fn recommended_child(&mut self) -> Result<NodeId, SearchError> {
        let tree = self.tree.as_ref().ok_or(SearchError::RootNotSet)?;
        let root = tree.get(tree.root());
        if root.is_leaf() {
            return Err(SearchError::NoLegalMoves);
        }

        let mover = root.position().player_to_move();
        let child = tree
            .select_child(
                tree.root(),
                SelectionFormula::WinRate,
                mover,
                self.total_playout,
                self.config.exploration_constant,
                &mut self.rng,
            )
            .ok_or(SearchError::EmptyChildSet(tree.root()))?;

        debug!(
            child = child.0,
            playouts = tree.get(child).playout_count,
            win_rate = tree.get(child).win_rate_for(mover),
            "Move recommended"
        );

        Ok(child)
    }
}

/// Step from `node_id` into one child, scored for the player to move there.
fn descend<G: GameState, R: Rng + ?Sized>(
    tree: &MctsTree<G>,
    node_id: NodeId,
    config: &MctsConfig,
    total_playout: u64,
    rng: &mut R,
) -> Result<NodeId, SearchError> {
    let mover = tree.get(node_id).position().player_to_move();
    tree.select_child(
        node_id,
        config.selection,
        mover,
        total_playout,
        config.exploration_constant,
        rng,
    )
    .ok_or(SearchError::EmptyChildSet(node_id))
}

/// Convenience function to think about a single position.
///
/// Builds a fresh tree for `position`, runs `config.iterations` iterations
/// and recommends a move.
pub fn think<G, R>(
    position: G,
    config: &MctsConfig,
    rng: &mut R,
) -> Result<SearchResult<G::Move>, SearchError>
where
    G: GameState,
    R: Rng + ?Sized,
{
    let mut search = SearchTree::with_rng(config.clone(), rng);
    search.set_root(position)?;
    let iterations = search.run(config.iterations)?;

    let child_id = search.recommended_child()?;
    let tree = search.tree().ok_or(SearchError::RootNotSet)?;
    let root_mover = tree.get(tree.root()).position().player_to_move();
    let child = tree.get(child_id);

    Ok(SearchResult {
        mv: child.mv().cloned().ok_or(SearchError::NoLegalMoves)?,
        win_rate: child.win_rate_for(root_mover),
        playouts: child.playout_count,
        iterations,
        children: tree.child_stats(tree.root()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Outcome;
    use games_tictactoe::{Board, Move, Piece, Position};

    fn seeded(config: MctsConfig, seed: u64) -> SearchTree<Position> {
        SearchTree::with_rng(config, ChaCha20Rng::seed_from_u64(seed))
    }

    fn position(width: usize, height: usize, encoded: &str, to_move: Piece) -> Position {
        Position::from_board(Board::parse(width, height, encoded).unwrap(), to_move)
    }

    /// X O _
    /// X O _
    /// _ _ _   written x-major, X to move and (2, 0) wins.
    fn x_wins_at_two_zero() -> Position {
        position(3, 3, "XONXONNNN", Piece::X)
    }

    /// A chain game: the root has one continuation, which claims to be
    /// unfinished yet offers no moves.
    #[derive(Debug, Clone)]
    struct Cliff {
        depth: u8,
        rollout_ok: bool,
    }

    impl GameState for Cliff {
        type Player = u8;
        type Move = u8;

        fn player_to_move(&self) -> u8 {
            self.depth % 2
        }

        fn outcome(&self) -> Option<Outcome<u8>> {
            None
        }

        fn legal_next_states(&self) -> Result<Vec<(u8, Self)>, GameError> {
            if self.depth == 0 {
                Ok(vec![(
                    0,
                    Cliff {
                        depth: 1,
                        rollout_ok: self.rollout_ok,
                    },
                )])
            } else {
                Ok(Vec::new())
            }
        }

        fn rollout_reward<R: Rng + ?Sized>(
            &self,
            _perspective: u8,
            _rng: &mut R,
        ) -> Result<f64, GameError> {
            if self.rollout_ok {
                Ok(0.5)
            } else {
                Err(GameError::NoLegalMoves)
            }
        }
    }

    fn cliff(rollout_ok: bool) -> Cliff {
        Cliff {
            depth: 0,
            rollout_ok,
        }
    }

    #[test]
    fn test_single_iteration_on_two_by_two() {
        let mut search = seeded(MctsConfig::default(), 1);
        search.set_root(Position::new(2, 2, Piece::O).unwrap()).unwrap();

        let outcome = search.run_iteration().unwrap();
        assert!(matches!(outcome, IterationOutcome::Simulated { depth: 1, .. }));
        assert_eq!(search.total_playout(), 1);

        let tree = search.tree().unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.children().len(), 4);
        assert_eq!(root.playout_count(), 1);

        let visited: Vec<u32> = root
            .children()
            .iter()
            .map(|&id| tree.get(id).playout_count())
            .collect();
        assert_eq!(visited.iter().filter(|&&n| n == 1).count(), 1);
        assert_eq!(visited.iter().filter(|&&n| n == 0).count(), 3);
    }

    #[test]
    fn test_finds_forced_win() {
        let mut search = seeded(MctsConfig::default(), 42);
        search.set_root(x_wins_at_two_zero()).unwrap();

        let counts = search.run(1000).unwrap();
        assert_eq!(counts.simulated + counts.aborted, 1000);
        // The finished child keeps winning selection once it passes the threshold
        assert!(counts.aborted > 0);
        assert_eq!(search.total_playout(), counts.simulated as u64);

        let winning = Move {
            x: 2,
            y: 0,
            piece: Piece::X,
        };
        assert_eq!(search.recommend_move().unwrap(), winning);

        let tree = search.tree().unwrap();
        let child = tree
            .get(tree.root())
            .children()
            .iter()
            .map(|&id| tree.get(id))
            .find(|node| node.mv() == Some(&winning))
            .unwrap();

        // O is to move at the child and has already lost
        assert!(child.playout_count() > 0);
        assert_eq!(child.win_rate(), 0.0);
        assert_eq!(child.win_rate_for(Piece::X), 1.0);
    }

    #[test]
    fn test_draw_root_aborts_cleanly() {
        let mut search = seeded(MctsConfig::default(), 7);
        search
            .set_root(position(3, 3, "XOOOXXXOO", Piece::X))
            .unwrap();

        for _ in 0..20 {
            assert_eq!(search.run_iteration().unwrap(), IterationOutcome::Aborted);
        }

        let tree = search.tree().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(tree.root()).playout_count(), 0);
        assert_eq!(search.total_playout(), 0);
        assert!(matches!(
            search.recommend_move(),
            Err(SearchError::NoLegalMoves)
        ));
    }

    #[test]
    fn test_draw_leaf_past_threshold_aborts() {
        let config = MctsConfig::default().with_expansion_threshold(0);
        let mut search = seeded(config, 11);
        // Only (2, 2) is free and filling it draws
        search
            .set_root(position(3, 3, "XOXXOOOXN", Piece::X))
            .unwrap();

        let tree = search.tree().unwrap();
        let child = tree.get(tree.root()).children()[0];
        assert_eq!(tree.get(child).position().outcome(), Some(Outcome::Draw));

        assert_eq!(
            search.run_iteration().unwrap(),
            IterationOutcome::Simulated {
                reward: 0.5,
                depth: 1
            }
        );
        for _ in 0..4 {
            assert_eq!(search.run_iteration().unwrap(), IterationOutcome::Aborted);
        }

        let tree = search.tree().unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(tree.root()).playout_count(), 1);
        assert_eq!(tree.get(child).playout_count(), 1);
        assert!(tree.get(child).is_leaf());
        assert_eq!(search.total_playout(), 1);
    }

    #[test]
    fn test_unvisited_children_are_tried_first() {
        let mut search = seeded(MctsConfig::default(), 3);
        search.set_root(Position::new(3, 3, Piece::X).unwrap()).unwrap();
        search.run(9).unwrap();

        let tree = search.tree().unwrap();
        // Nothing passed the threshold, so nothing grew below the root
        assert_eq!(tree.len(), 10);
        for &id in tree.get(tree.root()).children() {
            assert_eq!(tree.get(id).playout_count(), 1);
        }
    }

    #[test]
    fn test_expansion_is_gated_by_threshold() {
        let config = MctsConfig::default().with_expansion_threshold(3);
        let mut search = seeded(config, 9);
        search.set_root(Position::new(3, 3, Piece::O).unwrap()).unwrap();
        search.run(400).unwrap();

        let tree = search.tree().unwrap();
        assert!(tree.stats().max_depth > 1);

        for (index, node) in tree.arena().iter().enumerate() {
            if node.is_root() || node.is_leaf() {
                continue;
            }
            // Expanded once it passed the threshold, then the same playout
            // continued into a child
            let below: u32 = node
                .children()
                .iter()
                .map(|&id| tree.get(id).playout_count())
                .sum();
            assert_eq!(
                node.playout_count(),
                3 + 1 + below,
                "node {index} expanded off-threshold"
            );
        }
    }

    #[test]
    fn test_tree_invariants_after_search() {
        let mut search = seeded(MctsConfig::for_testing(), 21);
        search.set_root(Position::new(3, 3, Piece::X).unwrap()).unwrap();
        let counts = search.run(600).unwrap();

        let tree = search.tree().unwrap();
        let root = tree.get(tree.root());
        assert_eq!(root.playout_count(), counts.simulated);
        assert_eq!(search.total_playout(), counts.simulated as u64);

        let root_children: u32 = root
            .children()
            .iter()
            .map(|&id| tree.get(id).playout_count())
            .sum();
        assert_eq!(root.playout_count(), root_children);

        for (index, node) in tree.arena().iter().enumerate() {
            let id = NodeId(index as u32);

            // Tree shape
            if !node.is_root() {
                let parent = tree.get(node.parent());
                assert_eq!(parent.children().iter().filter(|&&c| c == id).count(), 1);
                assert_eq!(node.depth(), parent.depth() + 1);
            }
            let path = tree.path_to_root(id);
            assert_eq!(path.len() as u32, node.depth() + 1);

            // Reward bounds
            if node.playout_count() > 0 {
                let rate = node.win_rate();
                assert!((0.0..=1.0).contains(&rate));
            }

            // Terminal immutability
            if !node.is_expandable() {
                assert!(node.is_leaf());
            }
        }
    }

    #[test]
    fn test_expansion_without_children_aborts() {
        let config = MctsConfig::default().with_expansion_threshold(0);
        let mut search = SearchTree::with_rng(config, ChaCha20Rng::seed_from_u64(0));
        search.set_root(cliff(true)).unwrap();

        assert_eq!(
            search.run_iteration().unwrap(),
            IterationOutcome::Simulated {
                reward: 0.5,
                depth: 1
            }
        );
        assert_eq!(search.run_iteration().unwrap(), IterationOutcome::Aborted);

        let tree = search.tree().unwrap();
        assert_eq!(tree.get(tree.root()).playout_count(), 1);
        assert_eq!(search.total_playout(), 1);
    }

    #[test]
    fn test_rollout_errors_propagate() {
        let mut search = SearchTree::with_rng(MctsConfig::default(), ChaCha20Rng::seed_from_u64(0));
        search.set_root(cliff(false)).unwrap();

        let err = search.run_iteration().unwrap_err();
        assert!(matches!(err, SearchError::Game(GameError::NoLegalMoves)));
    }

    #[test]
    fn test_requires_root() {
        let mut search: SearchTree<Position> = seeded(MctsConfig::default(), 0);

        assert!(matches!(search.run_iteration(), Err(SearchError::RootNotSet)));
        assert!(matches!(search.recommend_move(), Err(SearchError::RootNotSet)));
        assert!(matches!(search.root_stats(), Err(SearchError::RootNotSet)));
        assert!(search.tree().is_none());
    }

    #[test]
    fn test_set_root_discards_previous_tree() {
        let mut search = seeded(MctsConfig::for_testing(), 5);
        search.set_root(Position::new(3, 3, Piece::X).unwrap()).unwrap();
        search.run(50).unwrap();

        search.set_root(Position::new(2, 2, Piece::O).unwrap()).unwrap();
        assert_eq!(search.total_playout(), 0);
        assert_eq!(search.tree().unwrap().len(), 5);
    }

    #[test]
    fn test_configure_selection() {
        let mut search = seeded(MctsConfig::default(), 0);
        search.configure(SelectionFormula::WinRate);
        assert_eq!(search.config().selection, SelectionFormula::WinRate);

        // A win-rate descent still completes iterations
        search.set_root(Position::new(3, 3, Piece::O).unwrap()).unwrap();
        let counts = search.run(30).unwrap();
        assert_eq!(counts.simulated + counts.aborted, 30);
        assert!(counts.simulated > 0);
    }

    #[test]
    fn test_think() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let config = MctsConfig::default().with_iterations(500);

        let result = think(x_wins_at_two_zero(), &config, &mut rng).unwrap();

        assert_eq!((result.mv.x, result.mv.y), (2, 0));
        assert_eq!(result.win_rate, 1.0);
        assert_eq!(result.iterations.simulated + result.iterations.aborted, 500);
        assert_eq!(result.children.len(), 5);
        let total: u32 = result.children.iter().map(|c| c.playout_count).sum();
        assert_eq!(total, result.iterations.simulated);
    }

    #[test]
    fn test_think_on_finished_game() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let finished = position(3, 3, "OOONXNXNN", Piece::X);

        let err = think(finished, &MctsConfig::for_testing(), &mut rng).unwrap_err();
        assert!(matches!(err, SearchError::NoLegalMoves));
    }
}
