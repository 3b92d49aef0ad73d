//! MCTS configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Aggregation, BannedMoves, ProbabilityCheck};

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MCTSConfig {
    /// Iteration target. The search stops once this many iterations have
    /// run and `min_time` has elapsed.
    pub max_iterations: u32,

    /// Wall-clock floor: cheap iterations keep running until this elapses.
    pub min_time: Duration,

    /// Wall-clock ceiling: the search stops here even short of
    /// `max_iterations`.
    pub max_time: Duration,

    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Depth at which tree nodes and rollouts fall back to comparing the
    /// static evaluation against the root's.
    pub max_tree_depth: u32,

    /// Moves excluded from enumeration, in the tree and in rollouts.
    pub banned: BannedMoves,

    /// Oracle probability validation.
    pub probability_check: ProbabilityCheck,

    /// Combination of per-instantiation results.
    pub aggregation: Aggregation,

    /// Random seed for the search RNG.
    /// Same seed produces deterministic searches.
    pub seed: u64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            max_iterations: 2500,
            min_time: Duration::from_secs(5),
            max_time: Duration::from_secs(15),
            exploration_constant: std::f64::consts::SQRT_2,
            max_tree_depth: 20,
            banned: BannedMoves::mcts_default(),
            probability_check: ProbabilityCheck::default(),
            aggregation: Aggregation::SampleOne,
            seed: 42,
        }
    }
}

impl MCTSConfig {
    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with custom max tree depth.
    #[must_use]
    pub fn with_max_tree_depth(mut self, depth: u32) -> Self {
        self.max_tree_depth = depth;
        self
    }

    /// Create a new config with a pure iteration budget: no time floor and
    /// a generous ceiling.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self.min_time = Duration::ZERO;
        self.max_time = Duration::from_secs(60);
        self
    }

    /// Create a new config with custom time bounds.
    #[must_use]
    pub fn with_time_bounds(mut self, min_time: Duration, max_time: Duration) -> Self {
        self.min_time = min_time;
        self.max_time = max_time;
        self
    }

    /// Create a new config with custom banned moves.
    #[must_use]
    pub fn with_banned(mut self, banned: BannedMoves) -> Self {
        self.banned = banned;
        self
    }

    /// Create a new config with custom probability validation.
    #[must_use]
    pub fn with_probability_check(mut self, check: ProbabilityCheck) -> Self {
        self.probability_check = check;
        self
    }

    /// Create a new config with custom aggregation.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MCTSConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.max_iterations, 2500);
        assert_eq!(config.min_time, Duration::from_secs(5));
        assert_eq!(config.max_time, Duration::from_secs(15));
        assert_eq!(config.max_tree_depth, 20);
        assert_eq!(config.aggregation, Aggregation::SampleOne);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MCTSConfig::default()
            .with_exploration(2.0)
            .with_seed(123)
            .with_max_tree_depth(5)
            .with_iterations(50);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.seed, 123);
        assert_eq!(config.max_tree_depth, 5);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.min_time, Duration::ZERO);
    }

    #[test]
    fn test_serialization() {
        let config = MCTSConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MCTSConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
