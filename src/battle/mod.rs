//! Reference full-information battle snapshot.
//!
//! One instantiation of a creature battle: each side has an active creature,
//! a map of revealed reserves and a set of side conditions. Reserves and
//! conditions use `im` persistent maps so search copies stay cheap.
//!
//! `team_size` records how many creatures a side really has. For the
//! opponent, creatures beyond the revealed ones are unrevealed and still
//! count as alive.

mod evaluate;

pub use evaluate::{evaluate_creature, Scoring, ScoringEvaluator};

use im::{OrdMap, OrdSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{BattleState, BattleStatus, LegalOptions, MoveId};

/// Lowest and highest boost stage.
pub const MAX_BOOST: i8 = 6;

/// Stat stage changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Boosts {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

/// Non-volatile status conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Burn,
    Frozen,
    Sleep,
    Paralyzed,
    Toxic,
    Poison,
}

/// Volatile status conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VolatileStatus {
    LeechSeed,
    Substitute,
    Confusion,
    Taunt,
}

/// Conditions attached to one side of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SideCondition {
    Reflect,
    LightScreen,
    AuroraVeil,
    Safeguard,
    Tailwind,
    StickyWeb,
    StealthRock,
    Spikes,
    ToxicSpikes,
}

/// A single creature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub name: String,
    pub hp: i64,
    pub max_hp: i64,
    pub speed: i64,
    pub boosts: Boosts,
    pub status: Option<Status>,
    /// Scales the burn penalty (abilities that ignore burn set this to 0).
    pub burn_multiplier: f64,
    pub volatile_status: OrdSet<VolatileStatus>,
    pub moves: SmallVec<[MoveId; 4]>,
}

impl Creature {
    /// Create a healthy creature at full HP with no moves.
    pub fn new(name: impl Into<String>, hp: i64) -> Self {
        Self {
            name: name.into(),
            hp,
            max_hp: hp,
            speed: 100,
            boosts: Boosts::default(),
            status: None,
            burn_multiplier: 1.0,
            volatile_status: OrdSet::new(),
            moves: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_max_hp(mut self, max_hp: i64) -> Self {
        self.max_hp = max_hp;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: i64) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_boosts(mut self, boosts: Boosts) -> Self {
        self.boosts = boosts;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_volatile(mut self, volatile: VolatileStatus) -> Self {
        self.volatile_status.insert(volatile);
        self
    }

    #[must_use]
    pub fn with_moves<I>(mut self, moves: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<MoveId>,
    {
        self.moves = moves.into_iter().map(Into::into).collect();
        self
    }

    /// Check if this creature can still fight.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Remaining hp over max hp. A creature without a positive max hp
    /// counts as full.
    #[must_use]
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            1.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }
}

/// One side of the battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub active: Creature,
    pub reserve: OrdMap<String, Creature>,
    pub side_conditions: OrdMap<SideCondition, u32>,
    pub team_size: usize,
}

impl Side {
    /// A side whose whole team is the given active creature.
    pub fn new(active: Creature) -> Self {
        Self {
            active,
            reserve: OrdMap::new(),
            side_conditions: OrdMap::new(),
            team_size: 1,
        }
    }

    /// Add a revealed reserve creature. Grows the team if needed.
    #[must_use]
    pub fn with_reserve(mut self, creature: Creature) -> Self {
        self.reserve.insert(creature.name.clone(), creature);
        self.team_size = self.team_size.max(self.revealed());
        self
    }

    /// Declare the real team size; extra creatures are unrevealed.
    #[must_use]
    pub fn with_team_size(mut self, team_size: usize) -> Self {
        self.team_size = team_size.max(self.revealed());
        self
    }

    #[must_use]
    pub fn with_side_condition(mut self, condition: SideCondition, count: u32) -> Self {
        self.side_conditions.insert(condition, count);
        self
    }

    /// Active plus revealed reserves.
    #[must_use]
    pub fn revealed(&self) -> usize {
        self.reserve.len() + 1
    }

    /// Creatures not yet seen.
    #[must_use]
    pub fn unrevealed(&self) -> usize {
        self.team_size.saturating_sub(self.revealed())
    }

    /// Alive revealed reserves.
    #[must_use]
    pub fn alive_reserves(&self) -> usize {
        self.reserve.values().filter(|c| c.is_alive()).count()
    }

    /// HP over the active creature and revealed reserves.
    #[must_use]
    pub fn total_hp(&self) -> i64 {
        self.active.hp + self.reserve.values().map(|c| c.hp).sum::<i64>()
    }

    /// Every known creature is down and nothing is left unrevealed.
    #[must_use]
    pub fn is_wiped(&self) -> bool {
        !self.active.is_alive() && self.alive_reserves() == 0 && self.unrevealed() == 0
    }

    /// Moves this side may choose: the active creature's moves while it
    /// stands, plus a switch to every alive reserve.
    #[must_use]
    pub fn options(&self) -> SmallVec<[MoveId; 9]> {
        let mut options: SmallVec<[MoveId; 9]> = SmallVec::new();
        if self.active.is_alive() {
            options.extend(self.active.moves.iter().cloned());
        }
        options.extend(
            self.reserve
                .values()
                .filter(|c| c.is_alive())
                .map(|c| MoveId::switch_to(&c.name)),
        );
        options
    }

    /// Swap the active creature with the named reserve.
    ///
    /// Returns false if no such reserve exists.
    pub fn switch_to(&mut self, name: &str) -> bool {
        match self.reserve.remove(name) {
            Some(incoming) => {
                let mut outgoing = std::mem::replace(&mut self.active, incoming);
                outgoing.boosts = Boosts::default();
                outgoing.volatile_status = OrdSet::new();
                self.reserve.insert(outgoing.name.clone(), outgoing);
                true
            }
            None => false,
        }
    }
}

/// A full-information battle from the searching side's point of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Battle {
    /// The searching side.
    pub user: Side,
    pub opponent: Side,
}

impl Battle {
    pub fn new(user: Side, opponent: Side) -> Self {
        Self { user, opponent }
    }

    /// The same battle seen from the other side.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            user: self.opponent.clone(),
            opponent: self.user.clone(),
        }
    }
}

impl BattleState for Battle {
    /// A user wipe is checked first, so a double knockout counts as a loss.
    fn battle_status(&self) -> BattleStatus {
        if self.user.is_wiped() {
            BattleStatus::OppWon
        } else if self.opponent.is_wiped() {
            BattleStatus::SelfWon
        } else {
            BattleStatus::Ongoing
        }
    }

    fn legal_options(&self) -> LegalOptions {
        LegalOptions {
            self_moves: self.user.options(),
            opp_moves: self.opponent.options(),
        }
    }

    fn opponent_remaining_hp(&self) -> i64 {
        self.opponent.total_hp()
    }

    fn both_actives_fainted(&self) -> bool {
        !self.user.active.is_alive() && !self.opponent.active.is_alive()
    }
}
