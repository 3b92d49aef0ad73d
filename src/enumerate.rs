//! Move enumeration: every legal, non-banned move pair at a state.

use std::collections::BTreeSet;

use crate::core::{BannedMoves, BattleState, MoveId, MovePair};

/// Cross product of both sides' legal, non-banned moves.
///
/// Each side is deduplicated and ordered lexically by move id, and pairs are
/// produced self-move-major. Both searches rely on this order for
/// reproducible tie-breaking.
///
/// Returns an empty list when either side has no remaining option.
///
/// ```
/// use battle_search::battle::{Battle, Creature, Side};
/// use battle_search::core::{BannedMoves, MovePair};
/// use battle_search::enumerate_move_pairs;
///
/// let user = Side::new(Creature::new("a", 100).with_moves(["tackle", "uturn"]));
/// let opponent = Side::new(Creature::new("b", 100).with_moves(["growl"]));
/// let battle = Battle::new(user, opponent);
///
/// let pairs = enumerate_move_pairs(&battle, &BannedMoves::expectiminimax_default());
/// assert_eq!(pairs, vec![MovePair::new("tackle", "growl")]);
/// ```
pub fn enumerate_move_pairs<S: BattleState>(state: &S, banned: &BannedMoves) -> Vec<MovePair> {
    let options = state.legal_options();

    let self_moves = allowed(options.self_moves, &banned.self_banned);
    let opp_moves = allowed(options.opp_moves, &banned.opp_banned);

    let mut pairs = Vec::with_capacity(self_moves.len() * opp_moves.len());
    for self_move in &self_moves {
        for opp_move in &opp_moves {
            pairs.push(MovePair {
                self_move: self_move.clone(),
                opp_move: opp_move.clone(),
            });
        }
    }
    pairs
}

/// Per-side option counts after bans, for error reporting.
pub(crate) fn option_counts<S: BattleState>(state: &S, banned: &BannedMoves) -> (usize, usize) {
    let options = state.legal_options();
    (
        allowed(options.self_moves, &banned.self_banned).len(),
        allowed(options.opp_moves, &banned.opp_banned).len(),
    )
}

fn allowed(
    moves: impl IntoIterator<Item = MoveId>,
    banned: &BTreeSet<MoveId>,
) -> BTreeSet<MoveId> {
    moves.into_iter().filter(|m| !banned.contains(m)).collect()
}
