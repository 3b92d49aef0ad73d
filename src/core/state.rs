//! The battle-state contract consumed by the search algorithms.
//!
//! The searches never look inside a state. They only ask whether the battle
//! is over, which moves each side may choose, and two HP-based queries used
//! by the MCTS horizon checks. Copies are made with `Clone`, which must
//! produce an independent value: sibling branches mutate their own copies.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::moves::MoveId;

/// Result of `BattleState::battle_status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStatus {
    /// Battle continues.
    Ongoing,
    /// The searching side has won.
    SelfWon,
    /// The opponent has won.
    OppWon,
}

impl BattleStatus {
    /// Check if the battle has ended.
    #[must_use]
    pub fn is_finished(self) -> bool {
        self != BattleStatus::Ongoing
    }
}

/// Legal moves for both sides at one state.
///
/// May contain duplicates; consumers treat each side as a set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegalOptions {
    /// Moves available to the searching side.
    pub self_moves: SmallVec<[MoveId; 9]>,

    /// Moves available to the opponent.
    pub opp_moves: SmallVec<[MoveId; 9]>,
}

impl LegalOptions {
    /// Build options from any iterables of move ids.
    pub fn new<A, B>(self_moves: A, opp_moves: B) -> Self
    where
        A: IntoIterator,
        A::Item: Into<MoveId>,
        B: IntoIterator,
        B::Item: Into<MoveId>,
    {
        Self {
            self_moves: self_moves.into_iter().map(Into::into).collect(),
            opp_moves: opp_moves.into_iter().map(Into::into).collect(),
        }
    }
}

/// Full-information battle snapshot as seen by the search.
///
/// ## Implementation Notes
///
/// - `clone` must deep-copy: no shared mutable substructure
/// - `legal_options`: return an empty side if that side cannot act
/// - `opponent_remaining_hp`: active plus every revealed reserve
pub trait BattleState: Clone {
    /// Whether the battle is finished and who won.
    fn battle_status(&self) -> BattleStatus;

    /// Legal moves for both sides.
    fn legal_options(&self) -> LegalOptions;

    /// Opponent HP summed over the active creature and all revealed reserves.
    fn opponent_remaining_hp(&self) -> i64;

    /// Both sides' active creatures are knocked out at the same time.
    fn both_actives_fainted(&self) -> bool;
}
