//! Static evaluation of a battle snapshot.
//!
//! Score = sum of own creature scores - sum of opponent creature scores,
//! adjusted for side conditions and for opponent creatures that are alive
//! but not yet revealed.

use crate::rules::Evaluator;

use super::{Battle, Boosts, Creature, SideCondition, Status, VolatileStatus, MAX_BOOST};

/// Scoring weights.
pub struct Scoring;

impl Scoring {
    pub const ALIVE_STATIC: f64 = 65.0;
    pub const HP: f64 = 200.0;

    pub const ATTACK_BOOST: f64 = 12.0;
    pub const DEFENSE_BOOST: f64 = 12.0;
    pub const SPECIAL_ATTACK_BOOST: f64 = 12.0;
    pub const SPECIAL_DEFENSE_BOOST: f64 = 12.0;
    pub const SPEED_BOOST: f64 = 24.0;
    pub const ACCURACY_BOOST: f64 = 3.0;
    pub const EVASION_BOOST: f64 = 3.0;

    /// Multiplier per boost stage, -6 through +6.
    pub const BOOST_DIMINISHING_RETURNS: [f64; 13] = [
        -3.3, -3.15, -3.0, -2.5, -2.0, -1.0, 0.0, 1.0, 2.0, 2.5, 3.0, 3.15, 3.3,
    ];

    /// Diminishing-returns multiplier for a boost stage, clamped to ±6.
    #[must_use]
    pub fn boost_multiplier(stage: i8) -> f64 {
        let clamped = stage.clamp(-MAX_BOOST, MAX_BOOST);
        Self::BOOST_DIMINISHING_RETURNS[(clamped + MAX_BOOST) as usize]
    }

    #[must_use]
    pub fn status(status: Status, burn_multiplier: f64) -> f64 {
        match status {
            Status::Frozen => -30.0,
            Status::Sleep => -25.0,
            Status::Paralyzed => -20.0,
            Status::Toxic => -25.0,
            Status::Poison => -8.0,
            Status::Burn => -30.0 * burn_multiplier,
        }
    }

    #[must_use]
    pub fn volatile_status(volatile: VolatileStatus) -> f64 {
        match volatile {
            VolatileStatus::LeechSeed => -20.0,
            VolatileStatus::Substitute => 25.0,
            VolatileStatus::Confusion => -20.0,
            VolatileStatus::Taunt => 0.0,
        }
    }

    /// Flat value per layer of a side condition.
    #[must_use]
    pub fn static_side_condition(condition: SideCondition) -> Option<f64> {
        match condition {
            SideCondition::Reflect => Some(20.0),
            SideCondition::LightScreen => Some(20.0),
            SideCondition::AuroraVeil => Some(30.0),
            SideCondition::Safeguard => Some(5.0),
            SideCondition::Tailwind => Some(8.0),
            SideCondition::StickyWeb => Some(-24.0),
            _ => None,
        }
    }

    /// Value per layer per alive creature that will take the hazard.
    #[must_use]
    pub fn per_creature_side_condition(condition: SideCondition) -> Option<f64> {
        match condition {
            SideCondition::StealthRock => Some(-10.0),
            SideCondition::Spikes => Some(-5.0),
            SideCondition::ToxicSpikes => Some(-5.0),
            _ => None,
        }
    }
}

fn boost_score(boosts: &Boosts) -> f64 {
    Scoring::boost_multiplier(boosts.attack) * Scoring::ATTACK_BOOST
        + Scoring::boost_multiplier(boosts.defense) * Scoring::DEFENSE_BOOST
        + Scoring::boost_multiplier(boosts.special_attack) * Scoring::SPECIAL_ATTACK_BOOST
        + Scoring::boost_multiplier(boosts.special_defense) * Scoring::SPECIAL_DEFENSE_BOOST
        + Scoring::boost_multiplier(boosts.speed) * Scoring::SPEED_BOOST
        + Scoring::boost_multiplier(boosts.accuracy) * Scoring::ACCURACY_BOOST
        + Scoring::boost_multiplier(boosts.evasion) * Scoring::EVASION_BOOST
}

/// Score of one creature, rounded half-to-even. Fainted creatures score 0.
#[must_use]
pub fn evaluate_creature(creature: &Creature) -> f64 {
    if !creature.is_alive() {
        return 0.0;
    }

    let mut score = Scoring::ALIVE_STATIC;
    score += Scoring::HP * creature.hp_fraction();
    score += boost_score(&creature.boosts);

    if let Some(status) = creature.status {
        score += Scoring::status(status, creature.burn_multiplier);
    }
    for volatile in &creature.volatile_status {
        score += Scoring::volatile_status(*volatile);
    }

    score.round_ties_even()
}

fn side_condition_score(
    conditions: &im::OrdMap<SideCondition, u32>,
    alive_creatures: usize,
) -> f64 {
    conditions
        .iter()
        .map(|(&condition, &count)| {
            let count = f64::from(count);
            if let Some(value) = Scoring::static_side_condition(condition) {
                count * value
            } else if let Some(value) = Scoring::per_creature_side_condition(condition) {
                count * value * alive_creatures as f64
            } else {
                0.0
            }
        })
        .sum()
}

/// The reference evaluator for [`Battle`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ScoringEvaluator;

impl Evaluator<Battle> for ScoringEvaluator {
    fn evaluate(&self, battle: &Battle) -> f64 {
        let user = &battle.user;
        let opponent = &battle.opponent;

        let user_alive_reserves = user.alive_reserves();
        // Unrevealed opponent creatures are assumed alive.
        let opponent_alive_reserves = opponent.alive_reserves() + opponent.unrevealed();

        let mut score = evaluate_creature(&user.active);
        score += user.reserve.values().map(evaluate_creature).sum::<f64>();

        score -= evaluate_creature(&opponent.active);
        score -= opponent.reserve.values().map(evaluate_creature).sum::<f64>();
        score -= Scoring::ALIVE_STATIC * opponent_alive_reserves as f64;

        score += side_condition_score(&user.side_conditions, user_alive_reserves);
        score -= side_condition_score(&opponent.side_conditions, opponent_alive_reserves);

        score.trunc()
    }
}
