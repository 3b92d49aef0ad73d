//! Expectiminimax configuration parameters.

use serde::{Deserialize, Serialize};

use crate::core::{Aggregation, BannedMoves, ProbabilityCheck};

/// Expectiminimax configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExpectiminimaxConfig {
    /// Search depth in plies (move pairs). Keep in low single digits:
    /// cost grows as (pairs x outcomes)^depth.
    pub depth: u32,

    /// Moves excluded from enumeration.
    pub banned: BannedMoves,

    /// Oracle probability validation.
    pub probability_check: ProbabilityCheck,

    /// Combination of per-instantiation results.
    pub aggregation: Aggregation,

    /// Seed for instantiation sampling.
    pub seed: u64,
}

impl Default for ExpectiminimaxConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            banned: BannedMoves::expectiminimax_default(),
            probability_check: ProbabilityCheck::default(),
            aggregation: Aggregation::PluralityVote,
            seed: 42,
        }
    }
}

impl ExpectiminimaxConfig {
    /// Create a new config with custom depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
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

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
