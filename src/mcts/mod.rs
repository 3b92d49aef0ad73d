//! Monte Carlo Tree Search over simultaneous move pairs.
//!
//! ## Overview
//!
//! - **Lazy expansion**: each visit to a leaf expands one random unexpanded
//!   move pair through its most likely outcome, then rolls out from it
//! - **UCB1 selection** once every move pair at a node has a child
//! - **Static horizon**: past the depth limit, or once nothing is left to
//!   simulate, a visit is a win when the evaluation is no worse than the
//!   root's
//! - **Anytime budget**: an iteration target guarded by a time floor, and a
//!   time ceiling
//!
//! ## Usage
//!
//! ```rust
//! use battle_search::battle::ScoringEvaluator;
//! use battle_search::games::duel::DuelBuilder;
//! use battle_search::mcts::{MCTSConfig, MCTSSearch};
//!
//! let (engine, battle) = DuelBuilder::new().opponent_hp(20).build();
//! let config = MCTSConfig::default().with_iterations(200);
//! let mut search = MCTSSearch::new(engine, ScoringEvaluator, config);
//!
//! let choice = search.search(&battle).unwrap();
//! println!("{choice} after {} iterations", search.stats().iterations);
//!
//! for (pair, visits) in search.action_visits() {
//!     println!("{pair}: {visits}");
//! }
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;

// Re-export main types
pub use config::MCTSConfig;
pub use node::{Expansion, MCTSNode};
pub use policy::{simulation_ongoing, RandomRollout, UCB1};
pub use search::MCTSSearch;
pub use stats::{SearchStats, TreeStats};
