//! ponder - console tic-tac-toe against a Monte Carlo Tree Search AI
//!
//! Two modes:
//! 1. Interactive play: alternate turns with the AI on stdin/stdout
//! 2. Analysis (`--analyze <BOARD>`): search one position and print the
//!    statistics of every candidate move

use anyhow::Result;
use clap::Parser;
use games_tictactoe::Position;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::io;
use tracing::info;

mod analyze;
mod config;
mod session;

use crate::config::Config;
use crate::session::Session;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();

    // Validate configuration
    config.validate()?;

    // Initialize tracing
    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let search = config.mcts_config()?;
    let first = config.first_piece()?;
    let mut rng = match config.seed() {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };

    info!(
        iterations = search.iterations,
        expansion_threshold = search.expansion_threshold,
        selection = %search.selection,
        width = config.board_width,
        height = config.board_height,
        "Search configured"
    );

    if let Some(board) = &config.analyze {
        let mut stdout = io::stdout().lock();
        return analyze::analyze(
            &mut stdout,
            board,
            config.board_width,
            config.board_height,
            first,
            &search,
            &mut rng,
        );
    }

    let position = Position::new(config.board_width, config.board_height, first)?;
    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    Session::new(stdin, stdout, rng, config.human_piece()?, search)
        .with_stats(config.show_stats)
        .play(position)?;

    Ok(())
}
