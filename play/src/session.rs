//! Interactive human-vs-AI game loop.
//!
//! The session reads moves from any `BufRead` and writes the board, the moves
//! and the final result to any `Write`, so games can be scripted in tests.

use anyhow::{bail, Result};
use engine_core::{GameState, Outcome};
use games_tictactoe::{Move, Piece, Position};
use mcts::{think, ChildStats, MctsConfig};
use rand::Rng;
use std::io::{BufRead, Write};
use tracing::{debug, info};

pub const MOVE_PROMPT: &str = "What's your move? x y: ";

/// One game between a human on `input` and the MCTS AI.
pub struct Session<I, O, R> {
    input: I,
    output: O,
    rng: R,
    human: Piece,
    search: MctsConfig,
    show_stats: bool,
}

impl<I: BufRead, O: Write, R: Rng> Session<I, O, R> {
    pub fn new(input: I, output: O, rng: R, human: Piece, search: MctsConfig) -> Self {
        Self {
            input,
            output,
            rng,
            human,
            search,
            show_stats: false,
        }
    }

    /// Print per-move search statistics after each AI move.
    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    /// Alternate turns from `position` until the game ends.
    pub fn play(&mut self, mut position: Position) -> Result<Outcome<Piece>> {
        write!(self.output, "{}", position.board().render())?;

        loop {
            if let Some(outcome) = position.outcome() {
                writeln!(self.output, "{}", end_message(&outcome))?;
                info!(?outcome, moves = position.board().pieces_placed(), "Game over");
                return Ok(outcome);
            }

            let (who, mv) = if position.to_move() == self.human {
                ("You", self.human_move(&position)?)
            } else {
                ("AI", self.ai_move(&position)?)
            };

            position = position.play(mv.x, mv.y)?;
            writeln!(self.output, "{who}: {mv}")?;
            write!(self.output, "{}", position.board().render())?;
        }
    }

    /// Prompt until the human names an empty cell on the board.
    fn human_move(&mut self, position: &Position) -> Result<Move> {
        let mut line = String::new();
        loop {
            write!(self.output, "{MOVE_PROMPT}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                bail!("input closed before the game ended");
            }

            match parse_coordinates(&line) {
                Some((x, y)) if matches!(position.board().cell(x, y), Ok(None)) => {
                    return Ok(Move {
                        x,
                        y,
                        piece: self.human,
                    });
                }
                _ => debug!(input = line.trim(), "Rejected move input"),
            }
        }
    }

    fn ai_move(&mut self, position: &Position) -> Result<Move> {
        let result = think(position.clone(), &self.search, &mut self.rng)?;

        info!(
            mv = %result.mv,
            win_rate = result.win_rate,
            playouts = result.playouts,
            "AI move chosen"
        );
        if self.show_stats {
            write_child_stats(&mut self.output, &result.children)?;
        }

        Ok(result.mv)
    }
}

/// Parse `"x y"` into a coordinate pair.
pub fn parse_coordinates(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((x, y))
}

pub fn end_message(outcome: &Outcome<Piece>) -> String {
    match outcome {
        Outcome::Winner(piece) => format!("Winner: {piece}"),
        Outcome::Draw => "Draw game".to_string(),
    }
}

/// One line per root child: move, playouts, wins and win rate for the mover.
pub fn write_child_stats<W: Write + ?Sized>(
    out: &mut W,
    children: &[ChildStats<Move>],
) -> Result<()> {
    for child in children {
        writeln!(
            out,
            "{:<12} playouts: {:>7}  wins: {:>9.1}  win rate: {:.3}",
            child.mv.to_string(),
            child.playout_count,
            child.playout_count as f64 * child.win_rate,
            child.win_rate
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::io::Cursor;

    fn session<'a>(
        input: &'a str,
        output: &'a mut Vec<u8>,
        human: Piece,
    ) -> Session<Cursor<&'a str>, &'a mut Vec<u8>, ChaCha20Rng> {
        let search = MctsConfig::for_testing().with_iterations(300);
        Session::new(
            Cursor::new(input),
            output,
            ChaCha20Rng::seed_from_u64(17),
            human,
            search,
        )
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(parse_coordinates("1 2\n"), Some((1, 2)));
        assert_eq!(parse_coordinates("  0\t0 "), Some((0, 0)));
        assert_eq!(parse_coordinates("1"), None);
        assert_eq!(parse_coordinates("1 2 3"), None);
        assert_eq!(parse_coordinates("a b"), None);
        assert_eq!(parse_coordinates("-1 0"), None);
    }

    #[test]
    fn test_end_message() {
        assert_eq!(end_message(&Outcome::Winner(Piece::X)), "Winner: X");
        assert_eq!(end_message(&Outcome::Draw), "Draw game");
    }

    #[test]
    fn test_human_moving_first_on_two_by_two_wins() {
        // Any second O completes a line; occupied cells are re-prompted
        let input = "0 0\n0 1\n1 0\n";
        let mut output = Vec::new();
        let outcome = session(input, &mut output, Piece::O)
            .play(Position::new(2, 2, Piece::O).unwrap())
            .unwrap();

        assert_eq!(outcome, Outcome::Winner(Piece::O));
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("| | |\n| | |\n"));
        assert!(text.contains("You: (0, 0), O"));
        assert!(text.contains("AI: "));
        assert!(text.trim_end().ends_with("Winner: O"));
    }

    #[test]
    fn test_ai_moving_first_on_two_by_two_wins() {
        let input = "0 0\n0 1\n1 0\n1 1\n";
        let mut output = Vec::new();
        let outcome = session(input, &mut output, Piece::O)
            .play(Position::new(2, 2, Piece::X).unwrap())
            .unwrap();

        assert_eq!(outcome, Outcome::Winner(Piece::X));
        let text = String::from_utf8(output).unwrap();
        assert!(text.trim_end().ends_with("Winner: X"));
    }

    #[test]
    fn test_bad_input_is_reprompted() {
        let input = "hello\n7 7\n0\n0 0\n1 1\n0 1\n1 0\n";
        let mut output = Vec::new();
        session(input, &mut output, Piece::O)
            .play(Position::new(2, 2, Piece::O).unwrap())
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        // Three rejected lines, then the accepted first move
        assert!(text.matches(MOVE_PROMPT).count() >= 4);
        assert!(text.contains("You: (0, 0), O"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut output = Vec::new();
        let err = session("", &mut output, Piece::O)
            .play(Position::new(3, 3, Piece::O).unwrap())
            .unwrap_err();

        assert!(err.to_string().contains("input closed"));
    }

    #[test]
    fn test_finished_position_reports_immediately() {
        let board = games_tictactoe::Board::parse(3, 3, "XOOOXXXOO").unwrap();
        let mut output = Vec::new();
        let outcome = session("", &mut output, Piece::O)
            .play(Position::from_board(board, Piece::X))
            .unwrap();

        assert_eq!(outcome, Outcome::Draw);
        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("Draw game\n"));
    }

    #[test]
    fn test_show_stats_prints_children() {
        let mut output = Vec::new();
        session("0 0\n0 1\n1 0\n1 1\n", &mut output, Piece::O)
            .with_stats(true)
            .play(Position::new(2, 2, Piece::X).unwrap())
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("playouts:"));
        assert!(text.contains("win rate:"));
    }
}
