//! Configuration shared by both search algorithms.
//!
//! - `BannedMoves`: moves removed from enumeration per side
//! - `ProbabilityCheck`: how strictly oracle outcome mass is validated
//! - `Aggregation`: how per-instantiation decisions are combined
//!
//! Algorithm-specific settings live in `ExpectiminimaxConfig` and `MCTSConfig`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::moves::MoveId;

/// Moves that force a follow-up, merge two actions into one turn, or replace
/// an action with a forced one. They break the one-pair-per-ply model, so
/// searches exclude them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannedMoves {
    /// Excluded from the searching side's options.
    pub self_banned: BTreeSet<MoveId>,

    /// Excluded from the opponent's options.
    pub opp_banned: BTreeSet<MoveId>,
}

impl BannedMoves {
    /// No bans on either side.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from two lists of move ids.
    pub fn new<A, B>(self_banned: A, opp_banned: B) -> Self
    where
        A: IntoIterator,
        A::Item: Into<MoveId>,
        B: IntoIterator,
        B::Item: Into<MoveId>,
    {
        Self {
            self_banned: self_banned.into_iter().map(Into::into).collect(),
            opp_banned: opp_banned.into_iter().map(Into::into).collect(),
        }
    }

    /// Expectiminimax bans: self-side pivots and lock-in moves only.
    #[must_use]
    pub fn expectiminimax_default() -> Self {
        Self::new(
            ["voltswitch", "uturn", "outrage", "petaldance", "partingshot"],
            std::iter::empty::<&str>(),
        )
    }

    /// MCTS bans. The opponent may still use lock-in moves.
    #[must_use]
    pub fn mcts_default() -> Self {
        Self::new(
            [
                "voltswitch",
                "uturn",
                "outrage",
                "petaldance",
                "partingshot",
                "flipturn",
                "teleport",
            ],
            ["voltswitch", "uturn", "partingshot", "flipturn", "teleport"],
        )
    }
}

/// Validation of the probability mass returned by the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityCheck {
    /// Reject outcome lists whose mass is outside `1 ± tolerance`.
    /// When false, masses are consumed as reported.
    pub strict: bool,

    /// Allowed floating drift around 1.0.
    pub tolerance: f64,
}

impl Default for ProbabilityCheck {
    fn default() -> Self {
        Self {
            strict: true,
            tolerance: 1e-6,
        }
    }
}

impl ProbabilityCheck {
    /// Accept any non-empty outcome list.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            strict: false,
            ..Self::default()
        }
    }

    /// Check if a total mass passes this check.
    #[must_use]
    pub fn accepts(&self, total: f64) -> bool {
        !self.strict || (total - 1.0).abs() <= self.tolerance
    }
}

/// How decisions over several hidden-information instantiations are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Search every instantiation; the most frequent self move wins,
    /// ties broken by first encounter.
    PluralityVote,
    /// Search one instantiation drawn uniformly at random.
    SampleOne,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bans() {
        let emm = BannedMoves::expectiminimax_default();
        assert!(emm.self_banned.contains(&MoveId::new("uturn")));
        assert!(emm.opp_banned.is_empty());

        let mcts = BannedMoves::mcts_default();
        assert!(mcts.self_banned.contains(&MoveId::new("outrage")));
        assert!(!mcts.opp_banned.contains(&MoveId::new("outrage")));
        assert!(mcts.opp_banned.contains(&MoveId::new("teleport")));
    }

    #[test]
    fn test_probability_check() {
        let strict = ProbabilityCheck::default();
        assert!(strict.accepts(1.0));
        assert!(strict.accepts(1.0 + 1e-9));
        assert!(!strict.accepts(0.5));

        let lenient = ProbabilityCheck::lenient();
        assert!(lenient.accepts(0.5));
    }

    #[test]
    fn test_serialization() {
        let bans = BannedMoves::mcts_default();
        let json = serde_json::to_string(&bans).unwrap();
        let deserialized: BannedMoves = serde_json::from_str(&json).unwrap();
        assert_eq!(bans, deserialized);

        let json = serde_json::to_string(&Aggregation::SampleOne).unwrap();
        assert_eq!(json, "\"SampleOne\"");
    }
}
