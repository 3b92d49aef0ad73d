//! Bounded-depth expectiminimax over simultaneous move pairs.
//!
//! Chance nodes take the full probability-weighted expectation over every
//! oracle outcome. Decision nodes model the simultaneous turn as the
//! opponent picking, for each self move, whichever reply minimizes the
//! self value; the self move with the largest such minimum is chosen.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::{BattleState, BattleStatus, MoveId, MovePair, SearchError};
use crate::enumerate::{enumerate_move_pairs, option_counts};
use crate::rules::{checked_transitions, Evaluator, TransitionOracle};

use super::config::ExpectiminimaxConfig;

/// Value of a searched state and the self move achieving it.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Adversarial expected value, `±inf` for decided battles.
    pub value: f64,

    /// Best self move, `None` at finished battles and depth-zero leaves.
    pub best_move: Option<MoveId>,
}

impl Evaluation {
    fn leaf(value: f64) -> Self {
        Self {
            value,
            best_move: None,
        }
    }
}

/// Expectiminimax search context.
///
/// Borrows the rules collaborators and configuration; counts visited
/// nodes for diagnostics.
pub struct Expectiminimax<'a, O, V> {
    oracle: &'a O,
    evaluator: &'a V,
    config: &'a ExpectiminimaxConfig,
    nodes_visited: u64,
}

impl<'a, O, V> Expectiminimax<'a, O, V> {
    /// Create a search context.
    pub fn new(oracle: &'a O, evaluator: &'a V, config: &'a ExpectiminimaxConfig) -> Self {
        Self {
            oracle,
            evaluator,
            config,
            nodes_visited: 0,
        }
    }

    /// Nodes visited by searches run through this context.
    #[must_use]
    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited
    }

    /// Search `state` to the configured depth.
    pub fn search<S>(&mut self, state: &S) -> Result<Evaluation, SearchError>
    where
        S: BattleState,
        O: TransitionOracle<S>,
        V: Evaluator<S>,
    {
        let before = self.nodes_visited;
        let result = self.search_depth(state, self.config.depth)?;

        debug!(
            value = result.value,
            best_move = ?result.best_move,
            depth = self.config.depth,
            nodes = self.nodes_visited - before,
            "expectiminimax search finished"
        );

        Ok(result)
    }

    /// Search `state` with `depth` plies remaining.
    pub fn search_depth<S>(&mut self, state: &S, depth: u32) -> Result<Evaluation, SearchError>
    where
        S: BattleState,
        O: TransitionOracle<S>,
        V: Evaluator<S>,
    {
        self.nodes_visited += 1;

        // Decided battles are never diluted by the depth cutoff.
        match state.battle_status() {
            BattleStatus::SelfWon => return Ok(Evaluation::leaf(f64::INFINITY)),
            BattleStatus::OppWon => return Ok(Evaluation::leaf(f64::NEG_INFINITY)),
            BattleStatus::Ongoing => {}
        }

        if depth == 0 {
            return Ok(Evaluation::leaf(self.evaluator.evaluate(state)));
        }

        let pairs = enumerate_move_pairs(state, &self.config.banned);
        if pairs.is_empty() {
            let (self_moves, opp_moves) = option_counts(state, &self.config.banned);
            return Err(SearchError::ExhaustedOptions {
                self_moves,
                opp_moves,
            });
        }

        let mut values = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let outcomes =
                checked_transitions(self.oracle, state, &pair, &self.config.probability_check)?;

            let mut expected = 0.0;
            for outcome in outcomes {
                // 0 * inf is NaN
                if outcome.probability <= 0.0 {
                    continue;
                }
                let child = self.search_depth(&outcome.state, depth - 1)?;
                expected += outcome.probability * child.value;
            }
            values.push((pair, expected));
        }

        let (value, best_move) = select_best_pair(&values).ok_or(SearchError::Undecided)?;
        Ok(Evaluation {
            value,
            best_move: Some(best_move),
        })
    }
}

/// Run a single expectiminimax search.
pub fn expectiminimax<S, O, V>(
    state: &S,
    oracle: &O,
    evaluator: &V,
    config: &ExpectiminimaxConfig,
) -> Result<Evaluation, SearchError>
where
    S: BattleState,
    O: TransitionOracle<S>,
    V: Evaluator<S>,
{
    Expectiminimax::new(oracle, evaluator, config).search(state)
}

/// Max over self moves of the min over opponent replies.
///
/// Self moves are compared in first-encounter order; a later move replaces
/// the current best only with a strictly greater minimum.
#[must_use]
pub fn select_best_pair(values: &[(MovePair, f64)]) -> Option<(f64, MoveId)> {
    let mut minimums: Vec<(&MoveId, f64)> = Vec::new();
    let mut index: FxHashMap<&MoveId, usize> = FxHashMap::default();

    for (pair, value) in values {
        match index.get(&pair.self_move) {
            Some(&i) => {
                if *value < minimums[i].1 {
                    minimums[i].1 = *value;
                }
            }
            None => {
                index.insert(&pair.self_move, minimums.len());
                minimums.push((&pair.self_move, *value));
            }
        }
    }

    let mut rest = minimums.into_iter();
    let mut best = rest.next()?;
    for (self_move, minimum) in rest {
        // NaN never compares greater, so it never displaces the current best.
        if minimum > best.1 {
            best = (self_move, minimum);
        }
    }

    Some((best.1, best.0.clone()))
}
