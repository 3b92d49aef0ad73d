//! MCTS policies for selection and simulation.
//!
//! - `UCB1`: how to choose which expanded child to descend into
//! - `RandomRollout`: uniformly random playout to the horizon

use tracing::trace;

use crate::core::{BattleState, SearchError};
use crate::enumerate::enumerate_move_pairs;
use crate::rules::{checked_transitions, sample_outcome, Evaluator, TransitionOracle};

use super::node::MCTSNode;
use super::search::IterationContext;

// =============================================================================
// Selection Policy
// =============================================================================

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Balances exploitation (win rate) with exploration (low visits).
/// Formula: w/n + c * sqrt(ln(N) / n)
#[derive(Clone, Copy, Debug, Default)]
pub struct UCB1;

impl UCB1 {
    /// Score of a child visited `child_total` times with `child_wins` wins
    /// under a parent visited `parent_total` times.
    ///
    /// Both totals must be positive: children are only selected after their
    /// expansion rollout has counted one visit.
    #[must_use]
    pub fn score(parent_total: u32, child_wins: u32, child_total: u32, exploration: f64) -> f64 {
        debug_assert!(parent_total > 0 && child_total > 0);
        let child_total = f64::from(child_total);
        let exploitation = f64::from(child_wins) / child_total;
        let exploration = exploration * (f64::from(parent_total).ln() / child_total).sqrt();
        exploitation + exploration
    }

    /// Index of the highest-scoring child. Ties keep the first.
    #[must_use]
    pub fn select<'a, S: 'a>(
        parent_total: u32,
        children: impl IntoIterator<Item = &'a MCTSNode<S>>,
        exploration: f64,
    ) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, child) in children.into_iter().enumerate() {
            let score = Self::score(parent_total, child.wins, child.total, exploration);
            match best {
                Some((_, max)) if score <= max => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Whether a playout from `state` can still produce useful information.
///
/// False once the battle is decided or the opponent's known HP is gone
/// (nothing about its unrevealed creatures can be simulated).
#[must_use]
pub fn simulation_ongoing<S: BattleState>(state: &S) -> bool {
    !state.battle_status().is_finished() && state.opponent_remaining_hp() > 0
}

/// Random simulation policy.
///
/// Plays uniformly random legal move pairs, sampling one oracle outcome per
/// turn, until the simulation stops being useful or the depth limit is hit.
/// Scores a win when the final evaluation is no worse than the root's.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomRollout;

impl RandomRollout {
    /// Run a playout from `state` starting at tree depth `depth`.
    pub(crate) fn simulate<S, O, V>(
        state: &S,
        depth: u32,
        ctx: &mut IterationContext<'_, O, V>,
    ) -> Result<bool, SearchError>
    where
        S: BattleState,
        O: TransitionOracle<S>,
        V: Evaluator<S>,
    {
        let mut state = state.clone();
        let mut depth = depth;

        while simulation_ongoing(&state) && depth < ctx.config.max_tree_depth {
            let pairs = enumerate_move_pairs(&state, &ctx.config.banned);
            let Some(pair) = ctx.rng.choose(&pairs) else {
                // Forced or stuck position: score it as it stands.
                break;
            };

            let mut outcomes =
                checked_transitions(ctx.oracle, &state, pair, &ctx.config.probability_check)?;
            match sample_outcome(&outcomes, ctx.rng) {
                Some(i) => state = outcomes.swap_remove(i).state,
                // Draw fell into missing mass: keep the prior state and stop.
                None => {
                    ctx.stats.truncated_rollouts += 1;
                    break;
                }
            }
            ctx.stats.rollout_turns += 1;

            depth += 1;
        }

        let win = ctx.starting_eval <= ctx.evaluator.evaluate(&state);
        trace!(depth, win, "rollout finished");
        Ok(win)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::{Battle, Creature, Side};
    use crate::core::BannedMoves;
    use crate::games::duel::DuelBuilder;

    fn node(wins: u32, total: u32) -> MCTSNode<Battle> {
        let (_, battle) = DuelBuilder::new().build();
        let mut node = MCTSNode::new(battle, 1, &BannedMoves::none());
        node.wins = wins;
        node.total = total;
        node
    }

    #[test]
    fn test_ucb1_score() {
        let c = std::f64::consts::SQRT_2;
        let score = UCB1::score(10, 3, 4, c);
        let expected = 0.75 + c * (10f64.ln() / 4.0).sqrt();
        assert!((score - expected).abs() < 1e-12);

        // ln(1) = 0: pure exploitation.
        assert_eq!(UCB1::score(1, 1, 1, c), 1.0);
    }

    #[test]
    fn test_ucb1_prefers_less_visited() {
        let children = vec![node(50, 100), node(5, 10)];
        assert_eq!(UCB1::select(110, &children, std::f64::consts::SQRT_2), Some(1));
    }

    #[test]
    fn test_ucb1_exploitation_only() {
        let children = vec![node(2, 10), node(8, 10), node(8, 10)];
        assert_eq!(UCB1::select(30, &children, 0.0), Some(1));
        let empty: Vec<MCTSNode<Battle>> = Vec::new();
        assert_eq!(UCB1::select(30, &empty, 0.0), None);
    }

    #[test]
    fn test_simulation_ongoing() {
        let (_, mut battle) = DuelBuilder::new().build();
        assert!(simulation_ongoing(&battle));

        // Opponent's known HP gone but one creature unrevealed.
        battle.opponent.active.hp = 0;
        battle.opponent.team_size = 2;
        assert!(!simulation_ongoing(&battle));

        let finished = Battle::new(
            Side::new(Creature::new("a", 0)),
            Side::new(Creature::new("b", 50)),
        );
        assert!(!simulation_ongoing(&finished));
    }
}
