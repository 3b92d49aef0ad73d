//! Core MCTS search algorithm.
//!
//! Anytime search over simultaneous move pairs. Every iteration walks from
//! the root, expands at most one child and rolls out from it; the search
//! stops on an iteration target (after a time floor) or a time ceiling.

use std::time::Instant;

use tracing::{debug, trace};

use crate::core::{BattleState, MoveId, MovePair, SearchError, SearchRng};
use crate::enumerate::option_counts;
use crate::rules::{Evaluator, TransitionOracle};

use super::config::MCTSConfig;
use super::node::MCTSNode;
use super::stats::{SearchStats, TreeStats};

/// Borrowed search state threaded through one iteration.
pub(crate) struct IterationContext<'a, O, V> {
    pub(crate) oracle: &'a O,
    pub(crate) evaluator: &'a V,
    pub(crate) config: &'a MCTSConfig,
    pub(crate) rng: &'a mut SearchRng,
    pub(crate) stats: &'a mut SearchStats,
    /// Root evaluation every static comparison is made against.
    pub(crate) starting_eval: f64,
}

/// Main MCTS search context.
///
/// Owns the transition oracle, the evaluator, the configuration and the
/// tree of the last search.
pub struct MCTSSearch<S, O, V> {
    /// Transition oracle.
    oracle: O,

    /// Static evaluator.
    evaluator: V,

    /// Search configuration.
    config: MCTSConfig,

    /// RNG for expansion picks, rollouts and forced switches.
    rng: SearchRng,

    /// Tree of the last completed search.
    root: Option<MCTSNode<S>>,

    /// Search statistics.
    stats: SearchStats,
}

impl<S, O, V> MCTSSearch<S, O, V>
where
    S: BattleState,
    O: TransitionOracle<S>,
    V: Evaluator<S>,
{
    /// Create a new MCTS search context, seeded from the config.
    pub fn new(oracle: O, evaluator: V, config: MCTSConfig) -> Self {
        let rng = SearchRng::new(config.seed);

        Self {
            oracle,
            evaluator,
            config,
            rng,
            root: None,
            stats: SearchStats::default(),
        }
    }

    /// Replace the RNG, e.g. with a fork of a caller's stream.
    #[must_use]
    pub fn with_rng(mut self, rng: SearchRng) -> Self {
        self.rng = rng;
        self
    }

    /// Choose the searching side's move for `state`.
    ///
    /// With both actives knocked out this picks a random switch without
    /// building a tree. Otherwise it runs iterations until the budget in
    /// the config is spent and returns the self move of the most-played
    /// root child.
    pub fn search(&mut self, state: &S) -> Result<MoveId, SearchError> {
        let start = Instant::now();
        self.stats.reset();
        self.root = None;

        if state.both_actives_fainted() {
            return self.forced_switch(state);
        }

        let mut root = MCTSNode::new(state.clone(), 0, &self.config.banned);
        if root.move_pairs().is_empty() {
            let (self_moves, opp_moves) = option_counts(state, &self.config.banned);
            return Err(SearchError::ExhaustedOptions {
                self_moves,
                opp_moves,
            });
        }

        let starting_eval = self.evaluator.evaluate(state);
        let mut ctx = IterationContext {
            oracle: &self.oracle,
            evaluator: &self.evaluator,
            config: &self.config,
            rng: &mut self.rng,
            stats: &mut self.stats,
            starting_eval,
        };

        loop {
            let elapsed = start.elapsed();
            let iterations = ctx.stats.iterations;
            if iterations > 0
                && (elapsed >= ctx.config.max_time
                    || (iterations >= ctx.config.max_iterations
                        && elapsed >= ctx.config.min_time))
            {
                break;
            }

            let win = root.run_iteration(&mut ctx)?;
            ctx.stats.iterations += 1;
            trace!(iteration = iterations, win, "mcts iteration");
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        let best = root
            .most_played_move()
            .cloned()
            .ok_or(SearchError::ExhaustedOptions {
                self_moves: 0,
                opp_moves: 0,
            })?;

        debug!(
            best = %best,
            iterations = self.stats.iterations,
            nodes = self.stats.nodes_expanded,
            terminal = self.stats.terminal_visits,
            horizon = self.stats.horizon_visits,
            truncated = self.stats.truncated_rollouts,
            avg_rollout = self.stats.avg_rollout_length(),
            per_second = self.stats.iterations_per_second(),
            elapsed_us = self.stats.time_us,
            "mcts search finished"
        );

        self.root = Some(root);
        Ok(best.self_move)
    }

    /// Uniformly random switch for the searching side.
    fn forced_switch(&mut self, state: &S) -> Result<MoveId, SearchError> {
        let switches: Vec<MoveId> = state
            .legal_options()
            .self_moves
            .into_iter()
            .filter(MoveId::is_switch)
            .collect();

        let choice = self
            .rng
            .choose(&switches)
            .cloned()
            .ok_or(SearchError::NoForcedSwitch)?;

        debug!(choice = %choice, "both actives fainted, forced switch");
        Ok(choice)
    }

    /// Move pair of the most-played root child from the last search.
    #[must_use]
    pub fn best_pair(&self) -> Option<&MovePair> {
        self.root.as_ref().and_then(MCTSNode::most_played_move)
    }

    /// Root of the last search tree. `None` before any search and after a
    /// forced switch.
    #[must_use]
    pub fn root(&self) -> Option<&MCTSNode<S>> {
        self.root.as_ref()
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Shape of the last search tree.
    #[must_use]
    pub fn tree_stats(&self) -> TreeStats {
        self.root
            .as_ref()
            .map(MCTSNode::tree_stats)
            .unwrap_or_default()
    }

    /// Visit counts of the root children, in move-pair order.
    pub fn action_visits(&self) -> Vec<(MovePair, u32)> {
        self.root
            .iter()
            .flat_map(|root| root.children())
            .map(|(pair, child)| (pair.clone(), child.total))
            .collect()
    }

    /// Get the oracle reference.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::battle::{Battle, ScoringEvaluator};
    use crate::core::{BannedMoves, BattleStatus};
    use crate::games::duel::{DuelBuilder, DuelEngine};
    use crate::mcts::node::Expansion;

    fn search(
        engine: DuelEngine,
        config: MCTSConfig,
    ) -> MCTSSearch<Battle, DuelEngine, ScoringEvaluator> {
        MCTSSearch::new(engine, ScoringEvaluator, config)
    }

    /// Every node: wins never exceed visits, children never outnumber them.
    fn assert_visit_invariants(node: &MCTSNode<Battle>) {
        assert!(node.wins <= node.total);
        let child_total: u32 = node.children().values().map(|c| c.total).sum();
        assert!(child_total <= node.total);
        assert!(node.children().len() <= node.move_pairs().len());
        if node.status() == BattleStatus::OppWon {
            assert_eq!(node.wins, 0);
        }
        for child in node.children().values() {
            assert_eq!(child.depth(), node.depth() + 1);
            assert_visit_invariants(child);
        }
    }

    #[test]
    fn test_single_pair_returns_sole_move() {
        let (engine, battle) = DuelBuilder::new()
            .user_moves(["tackle"])
            .opponent_moves(["growl"])
            .build();
        let mut mcts = search(engine, MCTSConfig::default().with_iterations(10));

        let choice = mcts.search(&battle).unwrap();
        assert_eq!(choice, MoveId::new("tackle"));

        let root = mcts.root().unwrap();
        assert_eq!(root.total, 10);
        assert_eq!(root.expansion(), Expansion::Internal);
        assert_eq!(mcts.action_visits(), vec![(MovePair::new("tackle", "growl"), 10)]);
    }

    #[test]
    fn test_leaves_expand_before_selection() {
        let (engine, battle) = DuelBuilder::new()
            .user_moves(["tackle", "growl"])
            .opponent_moves(["tackle"])
            .build();

        // Two iterations expand both pairs, one visit each.
        let mut mcts = search(engine.clone(), MCTSConfig::default().with_iterations(2));
        mcts.search(&battle).unwrap();
        let root = mcts.root().unwrap();
        assert_eq!(root.expansion(), Expansion::Internal);
        assert_eq!(root.children().len(), 2);
        assert!(root.children().values().all(|c| c.total == 1));

        let mut mcts = search(engine, MCTSConfig::default().with_iterations(50));
        mcts.search(&battle).unwrap();
        let root = mcts.root().unwrap();
        assert_eq!(root.total, 50);
        assert_eq!(mcts.stats().iterations, 50);
        let visits: u32 = mcts.action_visits().iter().map(|(_, v)| v).sum();
        assert_eq!(visits, 50);
        assert_visit_invariants(root);
    }

    #[test]
    fn test_finds_knockout() {
        let (engine, battle) = DuelBuilder::new()
            .user_hp(20)
            .opponent_hp(20)
            .user_moves(["tackle", "growl"])
            .opponent_moves(["tackle"])
            .build();
        let mut mcts = search(engine, MCTSConfig::default().with_iterations(200));

        assert_eq!(mcts.search(&battle).unwrap(), MoveId::new("tackle"));
        assert_eq!(mcts.best_pair(), Some(&MovePair::new("tackle", "tackle")));

        let tree = mcts.tree_stats();
        assert_eq!(tree.node_count, 3);
        assert_eq!(tree.terminal_count, 2);

        // Both children are finished battles: two expansions, then every
        // visit stops at a terminal child.
        let stats = mcts.stats();
        assert_eq!(stats.simulations, 2);
        assert_eq!(stats.terminal_visits, 198);
        assert_eq!(stats.horizon_visits, 0);
        assert_eq!(stats.rollout_turns, 0);
    }

    #[test]
    fn test_visit_invariants_deep_tree() {
        let (engine, battle) = DuelBuilder::new().reserves(1).build();
        let config = MCTSConfig::default()
            .with_iterations(300)
            .with_max_tree_depth(6)
            .with_seed(9);
        let mut mcts = search(engine, config);
        mcts.search(&battle).unwrap();

        let root = mcts.root().unwrap();
        assert_eq!(root.total, 300);
        assert_visit_invariants(root);
        assert!(mcts.tree_stats().max_depth <= 6);
        assert!(mcts.stats().simulations > 0);
        assert_eq!(mcts.stats().nodes_expanded as usize + 1, mcts.tree_stats().node_count);
    }

    #[test]
    fn test_forced_switch() {
        let (engine, mut battle) = DuelBuilder::new().reserves(1).build();
        battle.user.active.hp = 0;
        battle.opponent.active.hp = 0;

        let mut mcts = search(engine, MCTSConfig::default().with_iterations(10));
        assert_eq!(mcts.search(&battle).unwrap(), MoveId::new("switch user1"));
        assert!(mcts.root().is_none());
        assert_eq!(mcts.stats().iterations, 0);
    }

    #[test]
    fn test_forced_switch_without_reserves() {
        let (engine, mut battle) = DuelBuilder::new().build();
        battle.user.active.hp = 0;
        battle.opponent.active.hp = 0;

        let mut mcts = search(engine, MCTSConfig::default());
        assert_eq!(mcts.search(&battle), Err(SearchError::NoForcedSwitch));
    }

    #[test]
    fn test_exhausted_root() {
        let (engine, battle) = DuelBuilder::new().user_moves(["uturn"]).build();
        let mut mcts = search(engine, MCTSConfig::default().with_iterations(10));

        assert_eq!(
            mcts.search(&battle),
            Err(SearchError::ExhaustedOptions {
                self_moves: 0,
                opp_moves: 4
            })
        );

        // Lifting the ban makes the move available again.
        let (engine, battle) = DuelBuilder::new().user_moves(["uturn"]).build();
        let config = MCTSConfig::default()
            .with_iterations(10)
            .with_banned(BannedMoves::none());
        let mut mcts = search(engine, config);
        assert_eq!(mcts.search(&battle).unwrap(), MoveId::new("uturn"));
    }

    #[test]
    fn test_at_least_one_iteration() {
        let (engine, battle) = DuelBuilder::new().build();
        let mut mcts = search(engine, MCTSConfig::default().with_iterations(0));

        mcts.search(&battle).unwrap();
        assert_eq!(mcts.stats().iterations, 1);
        assert_eq!(mcts.root().unwrap().children().len(), 1);
    }

    #[test]
    fn test_time_ceiling() {
        let (engine, battle) = DuelBuilder::new().build();
        let config = MCTSConfig {
            max_iterations: u32::MAX,
            ..MCTSConfig::default()
        }
        .with_time_bounds(Duration::ZERO, Duration::from_millis(20));
        let mut mcts = search(engine, config);

        mcts.search(&battle).unwrap();
        assert!(mcts.stats().iterations >= 1);
        assert!(mcts.stats().time_us >= 20_000);
    }

    #[test]
    fn test_search_deterministic() {
        let (engine, battle) = DuelBuilder::new().reserves(2).build();
        let config = MCTSConfig::default().with_iterations(150).with_seed(12345);

        let mut search1 = search(engine.clone(), config.clone());
        let mut search2 = search(engine, config);

        assert_eq!(search1.search(&battle), search2.search(&battle));
        assert_eq!(search1.action_visits(), search2.action_visits());
    }

    #[test]
    fn test_search_resets_between_calls() {
        let (engine, battle) = DuelBuilder::new().build();
        let mut mcts = search(engine, MCTSConfig::default().with_iterations(40));

        mcts.search(&battle).unwrap();
        mcts.search(&battle).unwrap();
        assert_eq!(mcts.stats().iterations, 40);
        assert_eq!(mcts.root().unwrap().total, 40);
    }
}
