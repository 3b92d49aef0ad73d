//! Exhaustive bounded-depth expectiminimax search.
//!
//! ## Usage
//!
//! ```rust
//! use battle_search::battle::{Battle, Creature, ScoringEvaluator, Side};
//! use battle_search::expectiminimax::{expectiminimax, ExpectiminimaxConfig};
//! use battle_search::games::duel::DuelEngine;
//!
//! let battle = Battle::new(
//!     Side::new(Creature::new("pikachu", 100).with_moves(["tackle", "hydropump"])),
//!     Side::new(Creature::new("eevee", 100).with_moves(["tackle"])),
//! );
//! let engine = DuelEngine::standard();
//! let config = ExpectiminimaxConfig::default().with_depth(1);
//!
//! let result = expectiminimax(&battle, &engine, &ScoringEvaluator, &config).unwrap();
//! assert!(result.best_move.is_some());
//! ```

pub mod config;
pub mod search;

pub use config::ExpectiminimaxConfig;
pub use search::{expectiminimax, select_best_pair, Evaluation, Expectiminimax};
