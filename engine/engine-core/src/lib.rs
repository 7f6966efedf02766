//! Core traits and types for the Ponder search engine
//!
//! This crate provides the contract between the search core and a concrete game:
//! - `GameState`: Typed trait every searchable position implements
//! - `Outcome`: Terminal result of a game (winner or draw)
//! - `GameError`: Failures a game reports to the search, propagated unchanged

pub mod game_utils;
pub mod typed;

// Re-export main types for convenience
pub use game_utils::{reward_for, DRAW_REWARD, LOSS_REWARD, WIN_REWARD};
pub use typed::{GameError, GameState, Outcome};
