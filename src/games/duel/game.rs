//! Duel rules implementation.

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::battle::{Battle, Creature, Side, MAX_BOOST};
use crate::core::{MoveId, RulesError};
use crate::rules::{Outcome, TransitionOracle};

/// Effect of a non-switch move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveData {
    /// HP removed from the opposing active creature on a hit.
    pub damage: i64,

    /// Hit chance in `[0, 1]`.
    pub accuracy: f64,

    /// Attack stages gained by the user on a hit.
    pub attack_boost: i8,
}

impl MoveData {
    /// A damaging move.
    pub fn attack(damage: i64, accuracy: f64) -> Self {
        Self {
            damage,
            accuracy,
            attack_boost: 0,
        }
    }

    /// A move that always raises the user's attack.
    pub fn boost(stages: i8) -> Self {
        Self {
            damage: 0,
            accuracy: 1.0,
            attack_boost: stages,
        }
    }

    /// A move with no modeled effect.
    pub fn status() -> Self {
        Self::attack(0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Actor {
    User,
    Opponent,
}

/// Stat multiplier for a boost stage: (2 + s) / 2 upward, 2 / (2 - s) downward.
fn stage_multiplier(stage: i8) -> f64 {
    let stage = f64::from(stage.clamp(-MAX_BOOST, MAX_BOOST));
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

fn effective_speed(creature: &Creature) -> f64 {
    creature.speed as f64 * stage_multiplier(creature.boosts.speed)
}

/// Transition oracle for the duel game.
///
/// A turn resolves switches first (user, then opponent), then the
/// remaining moves in speed order, the user winning speed ties. A creature
/// knocked out earlier in the turn does not act. Every move that can miss
/// splits each outcome into a hit and a miss branch.
#[derive(Clone, Debug, Default)]
pub struct DuelEngine {
    moves: FxHashMap<MoveId, MoveData>,
}

impl DuelEngine {
    /// An engine that knows no moves.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard move list.
    pub fn standard() -> Self {
        Self::new()
            .with_move("tackle", MoveData::attack(20, 1.0))
            .with_move("thunderbolt", MoveData::attack(45, 1.0))
            .with_move("hydropump", MoveData::attack(55, 0.8))
            .with_move("swordsdance", MoveData::boost(2))
            .with_move("growl", MoveData::status())
            .with_move("uturn", MoveData::attack(35, 1.0))
            .with_move("voltswitch", MoveData::attack(35, 1.0))
    }

    /// Add or replace a move.
    #[must_use]
    pub fn with_move(mut self, id: impl Into<MoveId>, data: MoveData) -> Self {
        self.moves.insert(id.into(), data);
        self
    }

    /// Look up a move.
    #[must_use]
    pub fn move_data(&self, id: &MoveId) -> Option<&MoveData> {
        self.moves.get(id)
    }

    /// Apply a switch, or return the move's data for the attack phase.
    fn prepare(
        &self,
        side: &mut Side,
        id: &MoveId,
    ) -> Result<Option<MoveData>, RulesError> {
        if let Some(target) = id.switch_target() {
            if side.switch_to(target) {
                return Ok(None);
            }
            return Err(RulesError::UnknownMove(id.clone()));
        }

        self.moves
            .get(id)
            .copied()
            .map(Some)
            .ok_or_else(|| RulesError::UnknownMove(id.clone()))
    }

    fn resolve(
        outcome: Outcome<Battle>,
        actor: Actor,
        data: MoveData,
    ) -> SmallVec<[Outcome<Battle>; 2]> {
        let attacker_alive = match actor {
            Actor::User => outcome.state.user.active.is_alive(),
            Actor::Opponent => outcome.state.opponent.active.is_alive(),
        };
        if !attacker_alive {
            return smallvec![outcome];
        }

        let accuracy = data.accuracy.clamp(0.0, 1.0);
        if accuracy <= 0.0 {
            return smallvec![outcome];
        }
        if accuracy >= 1.0 {
            let mut hit = outcome;
            apply_hit(&mut hit.state, actor, data);
            return smallvec![hit];
        }

        let mut hit = Outcome::new(outcome.state.clone(), outcome.probability * accuracy);
        apply_hit(&mut hit.state, actor, data);
        let miss = Outcome::new(outcome.state, outcome.probability * (1.0 - accuracy));
        smallvec![hit, miss]
    }
}

fn apply_hit(battle: &mut Battle, actor: Actor, data: MoveData) {
    let (attacker, defender) = match actor {
        Actor::User => (&mut battle.user, &mut battle.opponent),
        Actor::Opponent => (&mut battle.opponent, &mut battle.user),
    };

    if data.damage > 0 {
        let damage =
            (data.damage as f64 * stage_multiplier(attacker.active.boosts.attack)).round() as i64;
        defender.active.hp = (defender.active.hp - damage).max(0);
    }

    if data.attack_boost != 0 {
        let boosts = &mut attacker.active.boosts;
        boosts.attack = (boosts.attack + data.attack_boost).clamp(-MAX_BOOST, MAX_BOOST);
    }
}

impl TransitionOracle<Battle> for DuelEngine {
    fn transitions(
        &self,
        state: &Battle,
        self_move: &MoveId,
        opp_move: &MoveId,
    ) -> Result<Vec<Outcome<Battle>>, RulesError> {
        let mut base = state.clone();

        let user_action = self.prepare(&mut base.user, self_move)?;
        let opp_action = self.prepare(&mut base.opponent, opp_move)?;

        let user_first = effective_speed(&base.user.active) >= effective_speed(&base.opponent.active);
        let ordered: SmallVec<[(Actor, Option<MoveData>); 2]> = if user_first {
            smallvec![(Actor::User, user_action), (Actor::Opponent, opp_action)]
        } else {
            smallvec![(Actor::Opponent, opp_action), (Actor::User, user_action)]
        };

        let mut outcomes = vec![Outcome::certain(base)];
        for (actor, data) in ordered {
            let Some(data) = data else { continue };
            outcomes = outcomes
                .into_iter()
                .flat_map(|outcome| Self::resolve(outcome, actor, data))
                .filter(|outcome| outcome.probability > 0.0)
                .collect();
        }

        Ok(outcomes)
    }
}

/// Builder for a duel engine and starting battle.
pub struct DuelBuilder {
    user_hp: i64,
    opponent_hp: i64,
    user_moves: Vec<MoveId>,
    opponent_moves: Vec<MoveId>,
    reserves: usize,
    opponent_team_size: Option<usize>,
}

impl Default for DuelBuilder {
    fn default() -> Self {
        Self {
            user_hp: 100,
            opponent_hp: 100,
            user_moves: ["tackle", "thunderbolt", "hydropump", "swordsdance"]
                .into_iter()
                .map(MoveId::new)
                .collect(),
            opponent_moves: ["tackle", "thunderbolt", "hydropump", "growl"]
                .into_iter()
                .map(MoveId::new)
                .collect(),
            reserves: 0,
            opponent_team_size: None,
        }
    }
}

impl DuelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_hp(mut self, hp: i64) -> Self {
        self.user_hp = hp;
        self
    }

    pub fn opponent_hp(mut self, hp: i64) -> Self {
        self.opponent_hp = hp;
        self
    }

    pub fn user_moves<I>(mut self, moves: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MoveId>,
    {
        self.user_moves = moves.into_iter().map(Into::into).collect();
        self
    }

    pub fn opponent_moves<I>(mut self, moves: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MoveId>,
    {
        self.opponent_moves = moves.into_iter().map(Into::into).collect();
        self
    }

    /// Revealed reserves per side.
    pub fn reserves(mut self, count: usize) -> Self {
        self.reserves = count;
        self
    }

    /// Opponent team size, leaving the rest unrevealed.
    pub fn opponent_team_size(mut self, size: usize) -> Self {
        self.opponent_team_size = Some(size);
        self
    }

    /// Build the standard engine and the starting battle.
    pub fn build(self) -> (DuelEngine, Battle) {
        let mut user = Side::new(
            Creature::new("user0", self.user_hp)
                .with_speed(110)
                .with_moves(self.user_moves.clone()),
        );
        let mut opponent = Side::new(
            Creature::new("opp0", self.opponent_hp)
                .with_speed(90)
                .with_moves(self.opponent_moves.clone()),
        );

        for i in 1..=self.reserves {
            user = user.with_reserve(
                Creature::new(format!("user{i}"), 100).with_moves(self.user_moves.clone()),
            );
            opponent = opponent.with_reserve(
                Creature::new(format!("opp{i}"), 100).with_moves(self.opponent_moves.clone()),
            );
        }

        if let Some(size) = self.opponent_team_size {
            opponent = opponent.with_team_size(size);
        }

        (DuelEngine::standard(), Battle::new(user, opponent))
    }
}
