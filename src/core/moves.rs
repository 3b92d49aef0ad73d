//! Move representation: stable move identifiers and simultaneous move pairs.
//!
//! Move identifiers are the strings the rules layer uses ("tackle",
//! "switch pikachu", ...). They are hashable and totally ordered so they can
//! key maps in both search algorithms, and the lexical order doubles as the
//! deterministic iteration order for tie-breaking.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix shared by every switch-type move id, separator included.
pub const SWITCH_PREFIX: &str = "switch ";

/// A single side's move identifier.
///
/// ## Example
///
/// ```
/// use battle_search::core::MoveId;
///
/// let tackle = MoveId::new("tackle");
/// let switch = MoveId::switch_to("pikachu");
///
/// assert!(!tackle.is_switch());
/// assert!(switch.is_switch());
/// assert_eq!(switch.as_str(), "switch pikachu");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveId(String);

impl MoveId {
    /// Create a move id from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create the switch move that brings `creature` in.
    #[must_use]
    pub fn switch_to(creature: &str) -> Self {
        Self(format!("{SWITCH_PREFIX}{creature}"))
    }

    /// The raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Is this a switch-type move?
    #[must_use]
    pub fn is_switch(&self) -> bool {
        self.0.starts_with(SWITCH_PREFIX)
    }

    /// Name of the creature a switch move brings in.
    #[must_use]
    pub fn switch_target(&self) -> Option<&str> {
        self.0
            .strip_prefix(SWITCH_PREFIX)
            .filter(|name| !name.is_empty())
    }
}

impl From<&str> for MoveId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MoveId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One action per side for a single simultaneous-resolution turn.
///
/// Ordered by the self move first, then the opponent move.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MovePair {
    /// The searching side's move.
    pub self_move: MoveId,

    /// The opponent's move.
    pub opp_move: MoveId,
}

impl MovePair {
    /// Create a move pair.
    #[must_use]
    pub fn new(self_move: impl Into<MoveId>, opp_move: impl Into<MoveId>) -> Self {
        Self {
            self_move: self_move.into(),
            opp_move: opp_move.into(),
        }
    }
}

impl fmt::Display for MovePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.self_move, self.opp_move)
    }
}
