//! Error types for search and rules collaborators.

use thiserror::Error;

use super::moves::MoveId;

/// Failure reported by a transition oracle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesError {
    #[error("unknown move '{0}'")]
    UnknownMove(MoveId),

    #[error("transition rejected: {0}")]
    Rejected(String),
}

/// Errors that abort a single search or decision.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("no legal non-banned moves: {self_moves} for self, {opp_moves} for opponent")]
    ExhaustedOptions { self_moves: usize, opp_moves: usize },

    #[error("inconsistent oracle: {outcomes} outcomes with total probability {total}")]
    OracleInconsistency { total: f64, outcomes: usize },

    #[error("rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("both actives fainted but no switch is available")]
    NoForcedSwitch,

    #[error("no battle instantiations to search")]
    NoWorlds,

    #[error("search produced no move (finished battle or zero depth)")]
    Undecided,
}
