//! Monte Carlo Tree Search (MCTS) with UCT selection and random rollouts.
//!
//! This crate provides a game-agnostic MCTS implementation that works with any
//! game implementing the `engine-core` [`GameState`](engine_core::GameState)
//! trait.
//!
//! # Overview
//!
//! MCTS is a search algorithm that builds a search tree by running iterations.
//! Each iteration consists of four phases:
//!
//! 1. **Selection**: Descend from the root using UCT (Upper Confidence bound
//!    applied to Trees) to balance exploration and exploitation
//! 2. **Expansion**: Once a leaf has more playouts than the expansion
//!    threshold, add one child per legal continuation and step into one
//! 3. **Simulation**: Play the leaf's position out with uniformly random moves
//! 4. **Backpropagation**: Update playout counts and win counts along the path
//!    from leaf to root, flipping the reward at every ply
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::{Piece, Position};
//! use mcts::{think, MctsConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let position = Position::new(3, 3, Piece::X).unwrap();
//! let config = MctsConfig::for_testing();
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//!
//! let result = think(position, &config, &mut rng).unwrap();
//! println!("Best move: {}", result.mv);
//! println!("Win rate: {:.3}", result.win_rate);
//! ```
//!
//! For step-by-step control, drive a [`SearchTree`] directly:
//! `set_root`, then `run_iteration` as often as the budget allows, then
//! `recommend_move`.
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `iterations`: Iterations per `think` call (default: 10000)
//! - `exploration_constant`: UCT exploration constant (default: 1.414)
//! - `expansion_threshold`: Playouts a leaf must exceed before expanding (default: 10)
//! - `selection`: Formula used while descending (default: UCT)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         SearchTree                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  MctsTree   │  │  GameState  │  │         Rng         │  │
//! │  │  (arena)    │  │ (game sim)  │  │ (rollouts, UCT lot) │  │
//! │  └──────┬──────┘  └──────┬──────┘  └──────────┬──────────┘  │
//! │         │                │                    │             │
//! │         ▼                ▼                    ▼             │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              select → expand → simulate →            │   │
//! │  │                     backpropagate                    │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod node;
pub mod search;
pub mod selection;
pub mod tree;

// Re-export main types
pub use config::{MctsConfig, DEFAULT_EXPANSION_THRESHOLD, DEFAULT_EXPLORATION_CONSTANT};
pub use node::{Node, NodeId};
pub use search::{
    think, IterationCounts, IterationOutcome, SearchError, SearchResult, SearchTree,
};
pub use selection::{Direction, SelectionFormula};
pub use tree::{ChildStats, MctsTree, TreeStats};
