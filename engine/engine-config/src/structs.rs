//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_exploration_constant() -> f64 {
    defaults::exploration_constant()
}
fn d_expansion_threshold() -> u32 {
    defaults::expansion_threshold()
}
fn d_selection_formula() -> String {
    defaults::selection_formula().into()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}
fn d_board_width() -> usize {
    defaults::board_width()
}
fn d_board_height() -> usize {
    defaults::board_height()
}
fn d_first_player() -> String {
    defaults::first_player().into()
}
fn d_human_piece() -> String {
    defaults::human_piece().into()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub game: GameConfig,
}

/// Settings shared by every binary
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
        }
    }
}

/// Search parameters for the AI player
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_exploration_constant")]
    pub exploration_constant: f64,
    #[serde(default = "d_expansion_threshold")]
    pub expansion_threshold: u32,
    /// `uct` or `win_rate`
    #[serde(default = "d_selection_formula")]
    pub selection_formula: String,
    /// Fixed RNG seed; entropy-seeded when unset
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            exploration_constant: defaults::exploration_constant(),
            expansion_threshold: defaults::expansion_threshold(),
            selection_formula: defaults::selection_formula().into(),
            seed: defaults::seed(),
        }
    }
}

/// Board and player setup for interactive games
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GameConfig {
    #[serde(default = "d_board_width")]
    pub board_width: usize,
    #[serde(default = "d_board_height")]
    pub board_height: usize,
    #[serde(default = "d_first_player")]
    pub first_player: String,
    #[serde(default = "d_human_piece")]
    pub human_piece: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: defaults::board_width(),
            board_height: defaults::board_height(),
            first_player: defaults::first_player().into(),
            human_piece: defaults::human_piece().into(),
        }
    }
}
