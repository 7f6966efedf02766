//! Default configuration values loaded from config.defaults.toml.
//!
//! This module embeds the shared TOML file at compile time, so the binary
//! and the documented defaults can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    game: GameDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    iterations: u32,
    exploration_constant: f64,
    expansion_threshold: u32,
    selection_formula: String,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GameDefaults {
    board_width: usize,
    board_height: usize,
    first_player: String,
    human_piece: String,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// MCTS
pub fn iterations() -> u32 {
    DEFAULTS.mcts.iterations
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}
pub fn expansion_threshold() -> u32 {
    DEFAULTS.mcts.expansion_threshold
}
pub fn selection_formula() -> &'static str {
    &DEFAULTS.mcts.selection_formula
}
pub fn seed() -> Option<u64> {
    DEFAULTS.mcts.seed
}

// Game
pub fn board_width() -> usize {
    DEFAULTS.game.board_width
}
pub fn board_height() -> usize {
    DEFAULTS.game.board_height
}
pub fn first_player() -> &'static str {
    &DEFAULTS.game.first_player
}
pub fn human_piece() -> &'static str {
    &DEFAULTS.game.human_piece
}
