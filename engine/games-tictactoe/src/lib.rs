//! TicTacToe game implementation for the Ponder engine
//!
//! This crate provides N x M tic-tac-toe (both sides at least 2) implementing the
//! `GameState` trait, so the search core can think about any position.
//!
//! # Usage
//!
//! ```rust
//! use games_tictactoe::{Piece, Position};
//! use engine_core::GameState;
//!
//! let position = Position::new(3, 3, Piece::X).unwrap();
//! assert_eq!(position.legal_next_states().unwrap().len(), 9);
//!
//! let position = position.play(1, 1).unwrap();
//! assert_eq!(position.player_to_move(), Piece::O);
//! ```

use std::fmt;
use std::str::FromStr;

use engine_core::{GameError, GameState, Outcome};

/// A player's mark on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    O,
    X,
}

impl Piece {
    /// Turn order is O, X, O, ...
    pub const ORDER: [Piece; 2] = [Piece::O, Piece::X];

    /// The player who moves after this one.
    pub fn next(self) -> Piece {
        match self {
            Piece::O => Piece::X,
            Piece::X => Piece::O,
        }
    }

    fn as_char(self) -> char {
        match self {
            Piece::O => 'O',
            Piece::X => 'X',
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Piece {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "O" | "o" => Ok(Piece::O),
            "X" | "x" => Ok(Piece::X),
            other => Err(GameError::InvalidEncoding(format!(
                "unknown piece '{}', expected O or X",
                other
            ))),
        }
    }
}

/// Character used for an empty cell in board strings.
pub const EMPTY_CELL: char = 'N';

/// A placement: `piece` put at column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub x: usize,
    pub y: usize,
    pub piece: Piece,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}), {}", self.x, self.y, self.piece)
    }
}

/// Rectangular tic-tac-toe board
///
/// Cells are stored x-major: cell `(x, y)` lives at index `x * height + y`,
/// which is also the character order of the board string encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<Piece>>,
}

impl Board {
    /// Create an empty board. Both dimensions must be at least 2.
    pub fn new(width: usize, height: usize) -> Result<Self, GameError> {
        if width < 2 || height < 2 {
            return Err(GameError::InvalidBoardSize { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width * height],
        })
    }

    /// Decode a board string such as `"ONNNXNNNN"`.
    ///
    /// The string holds one character per cell in x-major order:
    /// `O`, `X`, or `N` for an empty cell.
    pub fn parse(width: usize, height: usize, encoded: &str) -> Result<Self, GameError> {
        let mut board = Self::new(width, height)?;

        let chars: Vec<char> = encoded.trim().chars().collect();
        if chars.len() != board.cells.len() {
            return Err(GameError::InvalidEncoding(format!(
                "expected {} cells for a {}x{} board, got {}",
                board.cells.len(),
                width,
                height,
                chars.len()
            )));
        }

        for (slot, ch) in board.cells.iter_mut().zip(chars) {
            *slot = match ch {
                'O' => Some(Piece::O),
                'X' => Some(Piece::X),
                EMPTY_CELL => None,
                other => {
                    return Err(GameError::InvalidEncoding(format!(
                        "invalid cell character '{}'",
                        other
                    )))
                }
            };
        }

        Ok(board)
    }

    /// Encode the board as a string (inverse of [`Board::parse`]).
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.map_or(EMPTY_CELL, Piece::as_char))
            .collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), GameError> {
        if x >= self.width || y >= self.height {
            return Err(GameError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Content of cell `(x, y)`.
    pub fn cell(&self, x: usize, y: usize) -> Result<Option<Piece>, GameError> {
        self.check_bounds(x, y)?;
        Ok(self.cells[self.index(x, y)])
    }

    /// Put `piece` on an empty cell.
    pub fn place(&mut self, x: usize, y: usize, piece: Piece) -> Result<(), GameError> {
        self.check_bounds(x, y)?;
        let idx = self.index(x, y);
        if self.cells[idx].is_some() {
            return Err(GameError::CellOccupied { x, y });
        }
        self.cells[idx] = Some(piece);
        Ok(())
    }

    /// Empty cells in x-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let height = self.height;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(move |(idx, _)| (idx / height, idx % height))
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Number of pieces on the board.
    pub fn pieces_placed(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// The piece owning a complete line, if any.
    ///
    /// Lines are whole columns, whole rows and, on square boards only, the two
    /// main diagonals.
    pub fn winner(&self) -> Option<Piece> {
        let (w, h) = (self.width as isize, self.height as isize);

        if w == h {
            if let Some(piece) = self.line_owner((0, 0), (1, 1), self.width) {
                return Some(piece);
            }
            if let Some(piece) = self.line_owner((w - 1, 0), (-1, 1), self.width) {
                return Some(piece);
            }
        }

        // Columns
        for x in 0..w {
            if let Some(piece) = self.line_owner((x, 0), (0, 1), self.height) {
                return Some(piece);
            }
        }

        // Rows
        for y in 0..h {
            if let Some(piece) = self.line_owner((0, y), (1, 0), self.width) {
                return Some(piece);
            }
        }

        None
    }

    /// Owner of the straight line of `len` cells starting at `start`, if one
    /// piece type fills it.
    fn line_owner(&self, start: (isize, isize), step: (isize, isize), len: usize) -> Option<Piece> {
        let at = |i: isize| {
            let x = (start.0 + step.0 * i) as usize;
            let y = (start.1 + step.1 * i) as usize;
            self.cells[self.index(x, y)]
        };

        let first = at(0)?;
        (1..len as isize)
            .all(|i| at(i) == Some(first))
            .then_some(first)
    }

    /// Draw the board as `|O| |X|` rows, one text line per y.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                out.push('|');
                out.push(self.cells[self.index(x, y)].map_or(' ', Piece::as_char));
            }
            out.push_str("|\n");
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A tic-tac-toe position: board, player to move, and the move that led here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    to_move: Piece,
    last_move: Option<Move>,
}

impl Position {
    /// Empty `width` x `height` board with `first` to move.
    pub fn new(width: usize, height: usize, first: Piece) -> Result<Self, GameError> {
        Ok(Self::from_board(Board::new(width, height)?, first))
    }

    /// Wrap an existing board. `last_move` is unknown and left empty.
    pub fn from_board(board: Board, to_move: Piece) -> Self {
        Self {
            board,
            to_move,
            last_move: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Piece {
        self.to_move
    }

    /// The move that produced this position, if known.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Winner of the game so far.
    pub fn winner(&self) -> Option<Piece> {
        self.board.winner()
    }

    /// True once somebody won or the board is full.
    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Place the mover's piece at `(x, y)` and pass the turn.
    pub fn play(&self, x: usize, y: usize) -> Result<Position, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }

        let mut board = self.board.clone();
        board.place(x, y, self.to_move)?;

        Ok(Position {
            board,
            to_move: self.to_move.next(),
            last_move: Some(Move {
                x,
                y,
                piece: self.to_move,
            }),
        })
    }
}

impl GameState for Position {
    type Player = Piece;
    type Move = Move;

    fn player_to_move(&self) -> Piece {
        self.to_move
    }

    fn outcome(&self) -> Option<Outcome<Piece>> {
        if let Some(piece) = self.board.winner() {
            Some(Outcome::Winner(piece))
        } else if self.board.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    fn legal_next_states(&self) -> Result<Vec<(Move, Position)>, GameError> {
        if self.is_over() {
            return Ok(Vec::new());
        }

        self.board
            .empty_cells()
            .map(|(x, y)| {
                let next = self.play(x, y)?;
                let mv = Move {
                    x,
                    y,
                    piece: self.to_move,
                };
                Ok((mv, next))
            })
            .collect()
    }
}
