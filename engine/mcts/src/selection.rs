//! Child selection formulas.
//!
//! Each formula pairs a scoring rule with the direction in which scores are
//! compared, so the comparison can never drift apart from the formula.
//!
//! Scores are always computed for an explicit player: the statistics stored in
//! a node describe the outlook of the player to move at that node, and
//! [`Node::win_rate_for`] converts them before any formula looks at them.

use std::fmt;
use std::str::FromStr;

use engine_core::GameState;
use rand::Rng;

use crate::node::Node;
use crate::search::SearchError;

/// Which end of the score range wins a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// Strict comparison: a candidate only replaces the incumbent when it is
    /// strictly better, so the first child seen wins ties.
    #[inline]
    pub fn prefers(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Maximize => candidate > incumbent,
            Direction::Minimize => candidate < incumbent,
        }
    }
}

/// Formula used to pick one child of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionFormula {
    /// Upper Confidence bound applied to Trees, used while searching.
    #[default]
    Uct,
    /// Observed win rate, used to recommend a move once the search is done.
    WinRate,
}

impl SelectionFormula {
    /// Comparison direction paired with this formula.
    pub fn direction(self) -> Direction {
        match self {
            SelectionFormula::Uct => Direction::Maximize,
            SelectionFormula::WinRate => Direction::Minimize,
        }
    }

    /// Score `child` on behalf of `perspective`.
    ///
    /// * `Uct`: `w/n + c * sqrt(ln(N) / n)` where `w/n` is the child's win
    ///   rate for `perspective` and `N` is the tree-wide playout count. An
    ///   unvisited child scores `c * N^2 + U` with `U` uniform in [0, 1); the
    ///   oversized value forces every child to be tried once, and `U` draws
    ///   lots between several unvisited children.
    /// * `WinRate`: win rate of the side opposing `perspective` (0 when
    ///   unplayed), to be minimized. `perspective` is the root's mover, so in
    ///   an alternating game this is the child's raw `w/n`.
    pub fn score<G, R>(
        self,
        child: &Node<G>,
        perspective: G::Player,
        total_playout: u64,
        exploration_constant: f64,
        rng: &mut R,
    ) -> f64
    where
        G: GameState,
        R: Rng + ?Sized,
    {
        match self {
            SelectionFormula::Uct => {
                if child.playout_count == 0 {
                    let total = total_playout as f64;
                    exploration_constant * total * total + rng.gen::<f64>()
                } else {
                    let exploitation = child.win_rate_for(perspective);
                    let exploration = exploration_constant
                        * ((total_playout as f64).ln() / child.playout_count as f64).sqrt();
                    exploitation + exploration
                }
            }
            SelectionFormula::WinRate => {
                if child.playout_count == 0 {
                    0.0
                } else {
                    1.0 - child.win_rate_for(perspective)
                }
            }
        }
    }

    fn tag(self) -> &'static str {
        match self {
            SelectionFormula::Uct => "uct",
            SelectionFormula::WinRate => "win_rate",
        }
    }
}

impl fmt::Display for SelectionFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SelectionFormula {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uct" => Ok(SelectionFormula::Uct),
            "win_rate" | "winrate" | "win-rate" => Ok(SelectionFormula::WinRate),
            _ => Err(SearchError::InvalidSelectionFormula(s.to_string())),
        }
    }
}
