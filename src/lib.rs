//! # battle-search
//!
//! Move selection for two-player simultaneous-move stochastic battles.
//!
//! ## Design Principles
//!
//! 1. **Rules Stay Outside**: The searches only see a battle through the
//!    `BattleState` contract, a `TransitionOracle` that lists the chance
//!    outcomes of a move pair, and a static `Evaluator`.
//!
//! 2. **Simultaneous Turns**: Every ply is a `MovePair`, one move per side.
//!    The opponent is modeled as picking its worst-case reply to each
//!    self move.
//!
//! 3. **Reproducible**: Move pairs are enumerated in a fixed order and all
//!    randomness flows through a seeded `SearchRng`.
//!
//! ## Architecture
//!
//! - **Expectiminimax**: full expectation over every chance outcome, to a
//!   small fixed depth.
//!
//! - **MCTS**: anytime tree search with UCB1 selection, lazy expansion and
//!   random rollouts, bounded by iterations and wall-clock time.
//!
//! - **Hidden Information**: callers pass several plausible instantiations
//!   of the battle; an aggregation policy turns per-world decisions into
//!   one move.
//!
//! ## Modules
//!
//! - `core`: Move ids, the state contract, RNG, configuration, errors
//! - `rules`: Transition oracle and evaluator contracts
//! - `enumerate`: Legal, non-banned move pairs
//! - `expectiminimax`: Bounded-depth expected-value search
//! - `mcts`: Monte Carlo Tree Search
//! - `aggregate`: Combining decisions across instantiations
//! - `policy`: Decision policies and the `BattleBot`
//! - `battle`: Reference battle snapshot and evaluator
//! - `games`: Concrete rules oracles

pub mod core;
pub mod rules;
pub mod enumerate;
pub mod expectiminimax;
pub mod mcts;
pub mod aggregate;
pub mod policy;
pub mod battle;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Aggregation, BannedMoves, BattleState, BattleStatus, LegalOptions, MoveId, MovePair,
    ProbabilityCheck, RulesError, SearchError, SearchRng,
};

pub use crate::rules::{Evaluator, Outcome, TransitionOracle};

pub use crate::enumerate::enumerate_move_pairs;

pub use crate::expectiminimax::{expectiminimax, Evaluation, Expectiminimax, ExpectiminimaxConfig};

pub use crate::mcts::{MCTSConfig, MCTSNode, MCTSSearch, SearchStats, TreeStats};

pub use crate::aggregate::{aggregate, plurality_vote};

pub use crate::policy::{BattleBot, DecisionPolicy, ExpectiminimaxPolicy, MctsPolicy, RandomPolicy};
