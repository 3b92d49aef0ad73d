//! MCTS search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Counters recorded by one MCTS search.
///
/// Every iteration ends in exactly one way: at a finished battle, at the
/// static horizon, or by expanding a child and rolling out from it, so
/// `terminal_visits + horizon_visits + simulations == iterations`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations run from the root.
    pub iterations: u32,

    /// Children added to the tree.
    pub nodes_expanded: u32,

    /// Random rollouts, one per expansion.
    pub simulations: u32,

    /// Iterations that ended on a won or lost battle inside the tree.
    pub terminal_visits: u32,

    /// Iterations scored statically against the root evaluation.
    pub horizon_visits: u32,

    /// Turns played across all rollouts.
    pub rollout_turns: u64,

    /// Rollouts stopped early because a draw fell into missing outcome mass.
    pub truncated_rollouts: u32,

    /// Deepest node visited.
    pub max_depth: u32,

    /// Wall-clock search time in microseconds.
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.iterations) / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Mean number of turns played per rollout.
    #[must_use]
    pub fn avg_rollout_length(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.rollout_turns as f64 / f64::from(self.simulations)
        }
    }
}

/// Shape of a search tree, for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u32,

    /// Nodes holding a finished battle.
    pub terminal_count: usize,

    /// Legal move pairs summed over all nodes.
    pub total_edges: usize,

    /// Move pairs with an expanded child.
    pub expanded_edges: usize,
}

impl TreeStats {
    /// Get the branching factor (average move pairs per node).
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            self.total_edges as f64 / self.node_count as f64
        }
    }

    /// Get the expansion ratio (expanded edges / total edges).
    #[must_use]
    pub fn expansion_ratio(&self) -> f64 {
        if self.total_edges == 0 {
            0.0
        } else {
            self.expanded_edges as f64 / self.total_edges as f64
        }
    }
}
