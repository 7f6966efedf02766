//! Configuration for the ponder binary
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use games_tictactoe::Piece;
use mcts::{MctsConfig, SelectionFormula};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.iterations
}

fn default_exploration_constant() -> f64 {
    CENTRAL_CONFIG.mcts.exploration_constant
}

fn default_expansion_threshold() -> u32 {
    CENTRAL_CONFIG.mcts.expansion_threshold
}

fn default_selection() -> String {
    CENTRAL_CONFIG.mcts.selection_formula.clone()
}

fn default_board_width() -> usize {
    CENTRAL_CONFIG.game.board_width
}

fn default_board_height() -> usize {
    CENTRAL_CONFIG.game.board_height
}

fn default_human() -> String {
    CENTRAL_CONFIG.game.human_piece.clone()
}

fn default_first() -> String {
    CENTRAL_CONFIG.game.first_player.clone()
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "ponder")]
#[command(about = "Play tic-tac-toe against a Monte Carlo Tree Search AI")]
#[command(
    long_about = "Play N x M tic-tac-toe against an AI that thinks with Monte Carlo
Tree Search, or analyze a single position with --analyze.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// MCTS iterations per AI move
    #[arg(long, default_value_t = default_iterations())]
    pub iterations: u32,

    /// UCT exploration constant
    #[arg(long, default_value_t = default_exploration_constant())]
    pub exploration_constant: f64,

    /// Playouts a leaf must exceed before it is expanded
    #[arg(long, default_value_t = default_expansion_threshold())]
    pub expansion_threshold: u32,

    /// Formula used while descending the tree (uct, win_rate)
    #[arg(long, default_value_t = default_selection())]
    pub selection: String,

    /// Board width (x axis, at least 2)
    #[arg(long, default_value_t = default_board_width())]
    pub board_width: usize,

    /// Board height (y axis, at least 2)
    #[arg(long, default_value_t = default_board_height())]
    pub board_height: usize,

    /// Piece played by the human (O or X)
    #[arg(long, default_value_t = default_human())]
    pub human: String,

    /// Piece that moves first (O or X)
    #[arg(long, default_value_t = default_first())]
    pub first: String,

    /// RNG seed for reproducible AI play (default: config file, else entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Analyze a board string (x-major, O/X/N per cell) instead of playing
    #[arg(long, value_name = "BOARD")]
    pub analyze: Option<String>,

    /// Print per-move search statistics after each AI move
    #[arg(long)]
    pub show_stats: bool,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(anyhow!("iterations must be greater than 0"));
        }

        if self.board_width < 2 || self.board_height < 2 {
            return Err(anyhow!(
                "board must be at least 2x2, got {}x{}",
                self.board_width,
                self.board_height
            ));
        }

        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(anyhow!(
                "exploration_constant must be a non-negative number, got {}",
                self.exploration_constant
            ));
        }

        self.human_piece()?;
        self.first_piece()?;
        self.selection_formula()?;

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        Ok(())
    }

    pub fn human_piece(&self) -> Result<Piece> {
        self.human
            .parse()
            .with_context(|| format!("invalid human piece '{}'", self.human))
    }

    pub fn first_piece(&self) -> Result<Piece> {
        self.first
            .parse()
            .with_context(|| format!("invalid first player '{}'", self.first))
    }

    pub fn selection_formula(&self) -> Result<SelectionFormula> {
        Ok(self.selection.parse()?)
    }

    /// Seed from the command line, falling back to the config file.
    pub fn seed(&self) -> Option<u64> {
        self.seed.or(CENTRAL_CONFIG.mcts.seed)
    }

    /// Search parameters for the engine.
    pub fn mcts_config(&self) -> Result<MctsConfig> {
        Ok(MctsConfig::default()
            .with_iterations(self.iterations)
            .with_exploration_constant(self.exploration_constant)
            .with_expansion_threshold(self.expansion_threshold)
            .with_selection(self.selection_formula()?))
    }
}
