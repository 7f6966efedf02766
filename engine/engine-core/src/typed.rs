//! Typed GameState trait consumed by the search core
//!
//! A game exposes its positions through this trait: who moves, whether the game
//! is over, which positions follow, and how a random playout from here ends.
//! The search never inspects a board directly.

use rand::Rng;

use crate::game_utils::reward_for;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<P> {
    /// The given player completed a winning pattern.
    Winner(P),
    /// No legal moves remain and nobody won.
    Draw,
}

impl<P: PartialEq> Outcome<P> {
    /// Reward of this outcome for `perspective` (1.0 win, 0.5 draw, 0.0 loss).
    pub fn reward_for(&self, perspective: P) -> f64 {
        reward_for(self, perspective)
    }
}

/// Main trait for searchable game positions
///
/// Implementations are immutable snapshots: producing a continuation returns a
/// new value and leaves `self` untouched, which lets the search store one
/// position per tree node.
///
/// # Type Parameters
///
/// * `Player` - Identifies one of the two alternating sides
/// * `Move` - The placement that produced a position, reported back to callers
///
/// # Example
///
/// ```rust
/// # use engine_core::{GameError, GameState, Outcome};
/// /// First player to bring the counter to 3 wins.
/// #[derive(Debug, Clone)]
/// struct Race {
///     counter: u8,
///     to_move: u8,
/// }
///
/// impl GameState for Race {
///     type Player = u8;
///     type Move = u8;
///
///     fn player_to_move(&self) -> u8 {
///         self.to_move
///     }
///
///     fn outcome(&self) -> Option<Outcome<u8>> {
///         (self.counter >= 3).then(|| Outcome::Winner(3 - self.to_move))
///     }
///
///     fn legal_next_states(&self) -> Result<Vec<(u8, Self)>, GameError> {
///         if self.outcome().is_some() {
///             return Ok(Vec::new());
///         }
///         Ok((1..=2)
///             .map(|step| {
///                 let next = Race { counter: self.counter + step, to_move: 3 - self.to_move };
///                 (step, next)
///             })
///             .collect())
///     }
/// }
///
/// let start = Race { counter: 0, to_move: 1 };
/// assert!(start.is_expandable());
/// assert_eq!(start.legal_next_states().unwrap().len(), 2);
/// ```
pub trait GameState: Clone + std::fmt::Debug {
    /// One of the two alternating sides.
    type Player: Copy + Eq + std::fmt::Debug;

    /// The placement that produced a position from its predecessor.
    type Move: Clone + PartialEq + std::fmt::Debug;

    /// The player whose turn it is in this position.
    fn player_to_move(&self) -> Self::Player;

    /// Terminal result, or `None` while the game is still running.
    fn outcome(&self) -> Option<Outcome<Self::Player>>;

    /// Every position reachable in one ply, paired with the move producing it.
    ///
    /// Returns an empty list iff no legal moves remain.
    fn legal_next_states(&self) -> Result<Vec<(Self::Move, Self)>, GameError>;

    /// True unless the position is terminal (a winner exists or the board is full).
    fn is_expandable(&self) -> bool {
        self.outcome().is_none()
    }

    /// Play uniformly random legal moves to the end of the game.
    ///
    /// # Returns
    ///
    /// `1.0`, `0.5` or `0.0` for a win, draw or loss of `perspective`.
    fn rollout_reward<R: Rng + ?Sized>(
        &self,
        perspective: Self::Player,
        rng: &mut R,
    ) -> Result<f64, GameError> {
        let mut current = self.clone();
        loop {
            if let Some(outcome) = current.outcome() {
                return Ok(outcome.reward_for(perspective));
            }

            let mut next_states = current.legal_next_states()?;
            if next_states.is_empty() {
                return Err(GameError::NoLegalMoves);
            }

            let pick = rng.gen_range(0..next_states.len());
            current = next_states.swap_remove(pick).1;
        }
    }
}

/// Error type for game rule violations and malformed positions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Board must be at least 2x2, got {width}x{height}")]
    InvalidBoardSize { width: usize, height: usize },
    #[error("Coordinate ({x}, {y}) is outside the {width}x{height} board")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("Cell ({x}, {y}) is already occupied")]
    CellOccupied { x: usize, y: usize },
    #[error("Game is already over")]
    GameOver,
    #[error("Invalid board encoding: {0}")]
    InvalidEncoding(String),
    #[error("Position is not terminal but has no legal moves")]
    NoLegalMoves,
}
