//! One-shot position analysis.

use anyhow::Result;
use engine_core::GameState;
use games_tictactoe::{Board, Piece, Position};
use mcts::{think, MctsConfig};
use rand::Rng;
use std::io::Write;
use tracing::info;

use crate::session::{end_message, write_child_stats};

/// Side to move on `board` when `first` opened the game.
pub fn side_to_move(board: &Board, first: Piece) -> Piece {
    if board.pieces_placed() % 2 == 0 {
        first
    } else {
        first.next()
    }
}

/// Search `encoded` once and report every root child plus the recommendation.
pub fn analyze<W: Write, R: Rng + ?Sized>(
    out: &mut W,
    encoded: &str,
    width: usize,
    height: usize,
    first: Piece,
    search: &MctsConfig,
    rng: &mut R,
) -> Result<()> {
    let board = Board::parse(width, height, encoded)?;
    let to_move = side_to_move(&board, first);
    let position = Position::from_board(board, to_move);

    write!(out, "{}", position.board().render())?;
    if let Some(outcome) = position.outcome() {
        writeln!(out, "{}", end_message(&outcome))?;
        return Ok(());
    }
    writeln!(out, "{} to move, {} iterations", position.to_move(), search.iterations)?;

    let result = think(position, search, rng)?;
    write_child_stats(out, &result.children)?;
    writeln!(out, "Recommended: {}", result.mv)?;

    info!(
        mv = %result.mv,
        win_rate = result.win_rate,
        simulated = result.iterations.simulated,
        "Analysis complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_side_to_move() {
        let empty = Board::new(3, 3).unwrap();
        assert_eq!(side_to_move(&empty, Piece::X), Piece::X);

        let one = Board::parse(3, 3, "NNNNXNNNN").unwrap();
        assert_eq!(side_to_move(&one, Piece::X), Piece::O);
        assert_eq!(side_to_move(&one, Piece::O), Piece::X);
    }

    #[test]
    fn test_analyze_finds_winning_move() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut out = Vec::new();
        let search = MctsConfig::default().with_iterations(500);

        // X X _ / O O _ / _ _ _ with X to move
        analyze(&mut out, "XONXONNNN", 3, 3, Piece::X, &search, &mut rng).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("X to move, 500 iterations"));
        assert_eq!(text.matches("playouts:").count(), 5);
        assert!(text.trim_end().ends_with("Recommended: (2, 0), X"));
    }

    #[test]
    fn test_analyze_finished_board() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut out = Vec::new();

        analyze(
            &mut out,
            "OOONXNXNN",
            3,
            3,
            Piece::O,
            &MctsConfig::for_testing(),
            &mut rng,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Winner: O\n"));
    }

    #[test]
    fn test_analyze_rejects_bad_board() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let mut out = Vec::new();

        let err = analyze(&mut out, "XX", 3, 3, Piece::X, &MctsConfig::for_testing(), &mut rng)
            .unwrap_err();
        assert!(err.downcast_ref::<engine_core::GameError>().is_some());
    }
}
