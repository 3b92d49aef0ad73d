//! Core types: move ids, the battle-state contract, RNG, configuration, errors.
//!
//! Everything here is independent of a particular search algorithm.

pub mod config;
pub mod error;
pub mod moves;
pub mod rng;
pub mod state;

pub use config::{Aggregation, BannedMoves, ProbabilityCheck};
pub use error::{RulesError, SearchError};
pub use moves::{MoveId, MovePair, SWITCH_PREFIX};
pub use rng::SearchRng;
pub use state::{BattleState, BattleStatus, LegalOptions};
