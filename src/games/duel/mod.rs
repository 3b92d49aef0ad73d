//! Duel: a small creature battle for exercising the searches.
//!
//! - Damage moves with fixed damage and an accuracy roll
//! - An attack-boosting move whose stages scale later damage
//! - Switches to revealed reserves, resolved before any attack
//! - Speed decides attack order; a knocked-out creature does not act

mod game;

pub use game::{DuelBuilder, DuelEngine, MoveData};
