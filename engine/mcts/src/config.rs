//! MCTS configuration parameters.

use crate::selection::SelectionFormula;

/// Exploration constant for the UCT formula (approximately sqrt(2)).
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = 1.414;

/// Playouts a leaf must exceed before the search expands it.
pub const DEFAULT_EXPANSION_THRESHOLD: u32 = 10;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of iterations `think` runs per decision.
    pub iterations: u32,

    /// Exploration constant `c` in the UCT bonus `c * sqrt(ln(N) / n)`.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub exploration_constant: f64,

    /// A leaf is only expanded once its playout count exceeds this value.
    /// Bounds tree growth relative to the simulation budget.
    pub expansion_threshold: u32,

    /// Formula used to descend the tree during the search.
    pub selection: SelectionFormula,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            expansion_threshold: DEFAULT_EXPANSION_THRESHOLD,
            selection: SelectionFormula::Uct,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing: few iterations, eager expansion.
    pub fn for_testing() -> Self {
        Self {
            iterations: 200,
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            expansion_threshold: 2,
            selection: SelectionFormula::Uct,
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the UCT exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set the expansion threshold.
    pub fn with_expansion_threshold(mut self, threshold: u32) -> Self {
        self.expansion_threshold = threshold;
        self
    }

    /// Builder pattern: set the search selection formula.
    pub fn with_selection(mut self, selection: SelectionFormula) -> Self {
        self.selection = selection;
        self
    }
}
