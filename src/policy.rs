//! Decision policies and the battle bot that holds one.
//!
//! A policy turns one or more plausible instantiations of the current
//! battle into the searching side's move. Policies are pluggable:
//!
//! - `ExpectiminimaxPolicy`: exhaustive bounded-depth search per world
//! - `MctsPolicy`: anytime tree search
//! - `RandomPolicy`: a uniformly random legal move
//!
//! `BattleBot` holds a boxed policy and falls back to a random move when
//! the search fails, so a turn always gets a move while any is legal.

use tracing::warn;

use crate::aggregate::aggregate;
use crate::core::{BattleState, MoveId, SearchError, SearchRng};
use crate::expectiminimax::{expectiminimax, ExpectiminimaxConfig};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::rules::{Evaluator, TransitionOracle};

/// Strategy for choosing the searching side's move.
pub trait DecisionPolicy<S> {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Choose a move given the plausible instantiations of the battle.
    fn choose_move(&mut self, worlds: &[S]) -> Result<MoveId, SearchError>;
}

// =============================================================================
// Expectiminimax
// =============================================================================

/// Expectiminimax per world, combined by the configured aggregation.
pub struct ExpectiminimaxPolicy<O, V> {
    oracle: O,
    evaluator: V,
    config: ExpectiminimaxConfig,
    rng: SearchRng,
}

impl<O, V> ExpectiminimaxPolicy<O, V> {
    pub fn new(oracle: O, evaluator: V, config: ExpectiminimaxConfig) -> Self {
        let rng = SearchRng::new(config.seed);
        Self {
            oracle,
            evaluator,
            config,
            rng,
        }
    }

    pub fn config(&self) -> &ExpectiminimaxConfig {
        &self.config
    }
}

impl<S, O, V> DecisionPolicy<S> for ExpectiminimaxPolicy<O, V>
where
    S: BattleState,
    O: TransitionOracle<S>,
    V: Evaluator<S>,
{
    fn name(&self) -> &'static str {
        "expectiminimax"
    }

    fn choose_move(&mut self, worlds: &[S]) -> Result<MoveId, SearchError> {
        let Self {
            oracle,
            evaluator,
            config,
            rng,
        } = self;

        aggregate(worlds, config.aggregation, rng, |world| {
            expectiminimax(world, &*oracle, &*evaluator, &*config)?
                .best_move
                .ok_or(SearchError::Undecided)
        })
    }
}

// =============================================================================
// MCTS
// =============================================================================

/// MCTS over the world(s) picked by the configured aggregation.
pub struct MctsPolicy<S, O, V> {
    search: MCTSSearch<S, O, V>,
    rng: SearchRng,
}

impl<S, O, V> MctsPolicy<S, O, V>
where
    S: BattleState,
    O: TransitionOracle<S>,
    V: Evaluator<S>,
{
    /// World sampling and the search itself draw from separate streams of
    /// the configured seed.
    pub fn new(oracle: O, evaluator: V, config: MCTSConfig) -> Self {
        let mut rng = SearchRng::new(config.seed);
        let search_rng = rng.fork();
        Self {
            search: MCTSSearch::new(oracle, evaluator, config).with_rng(search_rng),
            rng,
        }
    }

    /// The underlying search, for statistics of the last decision.
    pub fn search(&self) -> &MCTSSearch<S, O, V> {
        &self.search
    }
}

impl<S, O, V> DecisionPolicy<S> for MctsPolicy<S, O, V>
where
    S: BattleState,
    O: TransitionOracle<S>,
    V: Evaluator<S>,
{
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn choose_move(&mut self, worlds: &[S]) -> Result<MoveId, SearchError> {
        let aggregation = self.search.config().aggregation;
        let Self { search, rng } = self;
        aggregate(worlds, aggregation, rng, |world| search.search(world))
    }
}

// =============================================================================
// Random
// =============================================================================

/// Uniformly random legal move in the first world. Bans are not applied.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: SearchRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SearchRng::new(seed),
        }
    }

    pub fn from_rng(rng: SearchRng) -> Self {
        Self { rng }
    }
}

impl<S: BattleState> DecisionPolicy<S> for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_move(&mut self, worlds: &[S]) -> Result<MoveId, SearchError> {
        let world = worlds.first().ok_or(SearchError::NoWorlds)?;
        let options = world.legal_options();

        self.rng
            .choose(&options.self_moves)
            .cloned()
            .ok_or(SearchError::ExhaustedOptions {
                self_moves: 0,
                opp_moves: options.opp_moves.len(),
            })
    }
}

// =============================================================================
// Battle bot
// =============================================================================

/// A battle participant that delegates its decisions to a policy.
pub struct BattleBot<S> {
    policy: Box<dyn DecisionPolicy<S>>,
    fallback: RandomPolicy,
}

impl<S: BattleState> BattleBot<S> {
    /// Create a bot; `seed` drives the random fallback.
    pub fn new<P>(policy: P, seed: u64) -> Self
    where
        P: DecisionPolicy<S> + 'static,
    {
        Self {
            policy: Box::new(policy),
            fallback: RandomPolicy::new(seed),
        }
    }

    /// Swap the decision policy between turns.
    pub fn set_policy<P>(&mut self, policy: P)
    where
        P: DecisionPolicy<S> + 'static,
    {
        self.policy = Box::new(policy);
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Choose this turn's move.
    ///
    /// Search failures fall back to a random legal move; only a missing
    /// world or a side with no options at all is reported.
    pub fn find_best_move(&mut self, worlds: &[S]) -> Result<MoveId, SearchError> {
        match self.policy.choose_move(worlds) {
            Ok(choice) => Ok(choice),
            Err(SearchError::NoWorlds) => Err(SearchError::NoWorlds),
            Err(error) => {
                warn!(
                    policy = self.policy.name(),
                    %error,
                    "search failed, falling back to a random move"
                );
                self.fallback.choose_move(worlds)
            }
        }
    }
}
