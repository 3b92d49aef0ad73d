//! MCTS node structure.
//!
//! Each node owns its battle state and its expanded children, keyed by the
//! move pair that led to them. Children are expanded lazily, one per visit,
//! until every legal move pair has a child.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{BannedMoves, BattleState, BattleStatus, MovePair, SearchError};
use crate::enumerate::enumerate_move_pairs;
use crate::rules::{checked_transitions, most_likely, Evaluator, TransitionOracle};

use super::policy::{simulation_ongoing, RandomRollout, UCB1};
use super::search::IterationContext;
use super::stats::TreeStats;

/// Expansion state of a node.
///
/// `Leaf` until every legal move pair has a child, then `Internal` for good.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expansion {
    /// Some move pairs still lack a child.
    Leaf,
    /// Fully expanded; visits descend by UCB1.
    Internal,
}

/// A node in the MCTS tree.
#[derive(Clone, Debug)]
pub struct MCTSNode<S> {
    /// Visits scored as wins for the searching side.
    pub wins: u32,

    /// Total visits to this node.
    pub total: u32,

    state: S,
    status: BattleStatus,
    expansion: Expansion,

    /// Depth in tree (root = 0).
    depth: u32,

    /// Legal move pairs at this node, in enumeration order.
    move_pairs: Vec<MovePair>,

    children: BTreeMap<MovePair, MCTSNode<S>>,
}

impl<S: BattleState> MCTSNode<S> {
    /// Create an unvisited node for `state`.
    ///
    /// Finished battles get no move pairs.
    pub fn new(state: S, depth: u32, banned: &BannedMoves) -> Self {
        let status = state.battle_status();
        let move_pairs = if status.is_finished() {
            Vec::new()
        } else {
            enumerate_move_pairs(&state, banned)
        };

        Self {
            wins: 0,
            total: 0,
            state,
            status,
            expansion: Expansion::Leaf,
            depth,
            move_pairs,
            children: BTreeMap::new(),
        }
    }

    /// The battle state this node represents.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Terminal status captured at construction.
    #[must_use]
    pub fn status(&self) -> BattleStatus {
        self.status
    }

    #[must_use]
    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[must_use]
    pub fn move_pairs(&self) -> &[MovePair] {
        &self.move_pairs
    }

    /// Expanded children in move-pair order.
    #[must_use]
    pub fn children(&self) -> &BTreeMap<MovePair, MCTSNode<S>> {
        &self.children
    }

    #[must_use]
    pub fn child(&self, pair: &MovePair) -> Option<&MCTSNode<S>> {
        self.children.get(pair)
    }

    /// Move pair of the most-visited child. Ties keep the first in
    /// move-pair order.
    #[must_use]
    pub fn most_played_move(&self) -> Option<&MovePair> {
        let mut best: Option<(&MovePair, u32)> = None;
        for (pair, child) in &self.children {
            match best {
                Some((_, total)) if child.total <= total => {}
                _ => best = Some((pair, child.total)),
            }
        }
        best.map(|(pair, _)| pair)
    }

    /// Shape of the subtree rooted here.
    #[must_use]
    pub fn tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.collect_stats(&mut stats);
        stats
    }

    fn collect_stats(&self, stats: &mut TreeStats) {
        stats.node_count += 1;
        stats.max_depth = stats.max_depth.max(self.depth);
        if self.status.is_finished() {
            stats.terminal_count += 1;
        }
        stats.total_edges += self.move_pairs.len();
        stats.expanded_edges += self.children.len();

        for child in self.children.values() {
            child.collect_stats(stats);
        }
    }

    /// One visit: select, expand, simulate and backpropagate.
    ///
    /// Returns whether the visit scored as a win. Counters of every node on
    /// the visited path are updated on the way back up.
    pub(crate) fn run_iteration<O, V>(
        &mut self,
        ctx: &mut IterationContext<'_, O, V>,
    ) -> Result<bool, SearchError>
    where
        O: TransitionOracle<S>,
        V: Evaluator<S>,
    {
        self.total += 1;
        ctx.stats.max_depth = ctx.stats.max_depth.max(self.depth);

        match self.status {
            BattleStatus::SelfWon => {
                ctx.stats.terminal_visits += 1;
                self.wins += 1;
                return Ok(true);
            }
            BattleStatus::OppWon => {
                ctx.stats.terminal_visits += 1;
                return Ok(false);
            }
            BattleStatus::Ongoing => {}
        }

        // Past the horizon: score against the root's evaluation.
        if !simulation_ongoing(&self.state)
            || self.depth >= ctx.config.max_tree_depth
            || self.move_pairs.is_empty()
        {
            ctx.stats.horizon_visits += 1;
            let win = ctx.starting_eval <= ctx.evaluator.evaluate(&self.state);
            if win {
                self.wins += 1;
            }
            return Ok(win);
        }

        let win = match self.expansion {
            Expansion::Leaf => self.expand(ctx)?,
            Expansion::Internal => self.descend(ctx)?,
        };

        if win {
            self.wins += 1;
        }
        Ok(win)
    }

    /// Expand one random unexpanded move pair and roll out from the child.
    fn expand<O, V>(&mut self, ctx: &mut IterationContext<'_, O, V>) -> Result<bool, SearchError>
    where
        O: TransitionOracle<S>,
        V: Evaluator<S>,
    {
        let pair = {
            let unexpanded: Vec<&MovePair> = self
                .move_pairs
                .iter()
                .filter(|pair| !self.children.contains_key(*pair))
                .collect();
            ctx.rng.choose(&unexpanded).map(|pair| (*pair).clone())
        };
        let Some(pair) = pair else {
            self.expansion = Expansion::Internal;
            return self.descend(ctx);
        };

        let mut outcomes =
            checked_transitions(ctx.oracle, &self.state, &pair, &ctx.config.probability_check)?;
        let index = most_likely(&outcomes).ok_or(SearchError::OracleInconsistency {
            total: 0.0,
            outcomes: 0,
        })?;
        let state = outcomes.swap_remove(index).state;

        let mut child = MCTSNode::new(state, self.depth + 1, &ctx.config.banned);
        ctx.stats.nodes_expanded += 1;
        ctx.stats.max_depth = ctx.stats.max_depth.max(child.depth);

        let win = RandomRollout::simulate(&child.state, child.depth, ctx)?;
        ctx.stats.simulations += 1;

        child.total += 1;
        if win {
            child.wins += 1;
        }
        self.children.insert(pair, child);

        if self.children.len() == self.move_pairs.len() {
            self.expansion = Expansion::Internal;
        }

        Ok(win)
    }

    /// Recurse into the child with the best UCB1 score.
    fn descend<O, V>(&mut self, ctx: &mut IterationContext<'_, O, V>) -> Result<bool, SearchError>
    where
        O: TransitionOracle<S>,
        V: Evaluator<S>,
    {
        let selected = UCB1::select(
            self.total,
            self.children.values(),
            ctx.config.exploration_constant,
        );
        let child = selected
            .and_then(|i| self.children.values_mut().nth(i))
            .ok_or(SearchError::ExhaustedOptions {
                self_moves: 0,
                opp_moves: 0,
            })?;

        child.run_iteration(ctx)
    }
}
