//! Shared utilities for two-player game implementations
//!
//! This module provides the reward scale used by rollouts so every game reports
//! results on the same [0, 1] range.

use crate::typed::Outcome;

/// Reward for a won game.
pub const WIN_REWARD: f64 = 1.0;
/// Reward for a drawn game.
pub const DRAW_REWARD: f64 = 0.5;
/// Reward for a lost game.
pub const LOSS_REWARD: f64 = 0.0;

/// Calculate the reward of a finished two-player zero-sum game.
///
/// # Arguments
/// * `outcome` - How the game ended
/// * `perspective` - The player the reward is reported for
///
/// # Returns
/// * `1.0` if `perspective` won
/// * `0.5` for draws
/// * `0.0` if `perspective` lost
///
/// # Example
/// ```
/// use engine_core::{reward_for, Outcome};
///
/// assert_eq!(reward_for(&Outcome::Winner('X'), 'X'), 1.0);
/// assert_eq!(reward_for(&Outcome::Winner('X'), 'O'), 0.0);
/// assert_eq!(reward_for(&Outcome::<char>::Draw, 'O'), 0.5);
/// ```
#[inline]
pub fn reward_for<P: PartialEq>(outcome: &Outcome<P>, perspective: P) -> f64 {
    match outcome {
        Outcome::Winner(winner) if *winner == perspective => WIN_REWARD,
        Outcome::Winner(_) => LOSS_REWARD,
        Outcome::Draw => DRAW_REWARD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_is_zero_sum() {
        let outcome = Outcome::Winner(1u8);
        assert_eq!(reward_for(&outcome, 1) + reward_for(&outcome, 2), 1.0);

        let draw = Outcome::<u8>::Draw;
        assert_eq!(reward_for(&draw, 1) + reward_for(&draw, 2), 1.0);
    }
}
