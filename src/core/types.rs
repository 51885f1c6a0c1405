//! Strongly-typed wrappers for match concepts
//!
//! Sides, roles and difficulty are closed enums instead of loose strings so
//! the engine can never confuse "the player" with "the top fighter".

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two competitors in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human (or human-seat) competitor
    Player,
    /// The computer opponent
    Ai,
}

impl Side {
    /// Both sides, player first
    pub const BOTH: [Side; 2] = [Side::Player, Side::Ai];

    /// The other side
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Second-person phrasing used in narratives ("You gain" / "Opponent gains")
    pub fn subject(self, player_verb: &str, ai_verb: &str) -> String {
        match self {
            Side::Player => format!("You {player_verb}"),
            Side::Ai => format!("Opponent {ai_verb}"),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Ai => write!(f, "ai"),
        }
    }
}

/// Role of a side within the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Top,
    Bottom,
}

impl Role {
    pub fn from_is_top(is_top: bool) -> Role {
        if is_top {
            Role::Top
        } else {
            Role::Bottom
        }
    }

    pub fn is_top(self) -> bool {
        self == Role::Top
    }

    pub fn inverse(self) -> Role {
        match self {
            Role::Top => Role::Bottom,
            Role::Bottom => Role::Top,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Top => write!(f, "top"),
            Role::Bottom => write!(f, "bottom"),
        }
    }
}

/// AI difficulty preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Chance, in percent, that the AI picks from its top-scored options
    pub fn optimal_weight_percent(self) -> u32 {
        match self {
            Difficulty::Easy => 40,
            Difficulty::Medium => 65,
            Difficulty::Hard => 85,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!(
                "invalid difficulty '{s}' (expected: easy, medium, hard)"
            )),
        }
    }
}

/// A value held once per side
///
/// Indexable by [`Side`], so `scores[Side::Ai] += 2` reads like the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerSide<T> {
    pub player: T,
    pub ai: T,
}

impl<T> PerSide<T> {
    pub fn new(player: T, ai: T) -> Self {
        PerSide { player, ai }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Ai => &self.ai,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        self.get_mut(side)
    }
}
