//! Multi-world aggregation.
//!
//! When the opponent's side is partly hidden, the caller builds several
//! plausible full-information battles. These helpers turn per-battle
//! decisions into one move.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{Aggregation, MoveId, SearchError, SearchRng};

/// Most frequent move. Ties go to the move encountered first.
#[must_use]
pub fn plurality_vote<I>(votes: I) -> Option<MoveId>
where
    I: IntoIterator<Item = MoveId>,
{
    let mut index: FxHashMap<MoveId, usize> = FxHashMap::default();
    let mut tally: Vec<(MoveId, u32)> = Vec::new();

    for vote in votes {
        match index.get(&vote) {
            Some(&i) => tally[i].1 += 1,
            None => {
                index.insert(vote.clone(), tally.len());
                tally.push((vote, 1));
            }
        }
    }

    let mut best: Option<(MoveId, u32)> = None;
    for (id, count) in tally {
        match best {
            Some((_, max)) if count <= max => {}
            _ => best = Some((id, count)),
        }
    }
    best.map(|(id, _)| id)
}

/// Decide over `worlds` with `decide`, combining per-world moves by
/// `aggregation`.
///
/// `PluralityVote` calls `decide` once per world; `SampleOne` calls it once
/// on a world drawn from `rng`. The first error from `decide` aborts.
pub fn aggregate<S, F>(
    worlds: &[S],
    aggregation: Aggregation,
    rng: &mut SearchRng,
    mut decide: F,
) -> Result<MoveId, SearchError>
where
    F: FnMut(&S) -> Result<MoveId, SearchError>,
{
    match aggregation {
        Aggregation::PluralityVote => {
            let votes = worlds.iter().map(&mut decide).collect::<Result<Vec<_>, _>>()?;
            let choice = plurality_vote(votes).ok_or(SearchError::NoWorlds)?;
            debug!(worlds = worlds.len(), choice = %choice, "plurality vote");
            Ok(choice)
        }
        Aggregation::SampleOne => {
            let world = rng.choose(worlds).ok_or(SearchError::NoWorlds)?;
            decide(world)
        }
    }
}
