//! Main match state structure

use crate::catalog::{Category, PositionId, TechniqueId};
use crate::core::{Difficulty, PerSide, Role, Side, TokenTable};
use crate::game::{MatchPhase, Resolution};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum control points a side can accumulate
pub const MAX_CONTROL: u8 = 2;

/// A locked selection: category plus technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub category: Category,
    pub technique: TechniqueId,
}

impl Action {
    pub fn new(category: Category, technique: TechniqueId) -> Self {
        Action {
            category,
            technique,
        }
    }
}

/// Why the match ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEndReason {
    /// Dominant submission with the named technique
    Submission { technique: TechniqueId, name: String },
    /// Reached the points threshold
    Points,
    /// Turn cap reached, higher score
    TimeScore,
    /// Turn cap reached, scores level, more advantages
    TimeAdvantages,
    /// Turn cap reached with everything level, decided at random
    RefereeDecision,
}

impl MatchEndReason {
    /// Whether the result was decided by a coin-flip
    pub fn is_random_decision(&self) -> bool {
        matches!(self, MatchEndReason::RefereeDecision)
    }

    /// Short stable key, used for statistics
    pub fn label(&self) -> &'static str {
        match self {
            MatchEndReason::Submission { .. } => "submission",
            MatchEndReason::Points => "points",
            MatchEndReason::TimeScore => "time_score",
            MatchEndReason::TimeAdvantages => "time_advantages",
            MatchEndReason::RefereeDecision => "referee_decision",
        }
    }
}

impl fmt::Display for MatchEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchEndReason::Submission { name, .. } => write!(f, "Submission by {name}!"),
            MatchEndReason::Points => write!(f, "Points victory!"),
            MatchEndReason::TimeScore => write!(f, "Time! Decided on points."),
            MatchEndReason::TimeAdvantages => write!(f, "Time! Points level, decided on advantages."),
            MatchEndReason::RefereeDecision => {
                write!(f, "Time! Dead even, the referee's decision is a coin toss.")
            }
        }
    }
}

/// Complete state of one match
///
/// Owned by the [`MatchController`](crate::game::MatchController) and mutated
/// in place by its operations. Everything here is plain data so the
/// presentation layer can render it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub phase: MatchPhase,

    /// Completed-turn counter (1 during the first turn)
    pub turn_number: u32,

    pub position: PositionId,

    /// Whether the player currently holds the top role
    pub player_is_top: bool,

    pub scores: PerSide<u32>,
    pub advantages: PerSide<u32>,
    pub tokens: TokenTable,

    /// Control tug-of-war, each side in `0..=MAX_CONTROL`
    pub control: PerSide<u8>,

    /// Locked selections, set from ActionLocked through Resolution
    pub player_action: Option<Action>,
    pub ai_action: Option<Action>,

    /// Most recent resolution, kept for display
    pub last_resolution: Option<Resolution>,

    pub match_winner: Option<Side>,
    pub match_end_reason: Option<MatchEndReason>,

    pub ai_difficulty: Difficulty,
}

impl MatchState {
    /// Fresh state awaiting a match start
    pub fn new(ai_difficulty: Difficulty) -> Self {
        MatchState {
            phase: MatchPhase::MatchStart,
            turn_number: 0,
            position: PositionId::INITIAL,
            player_is_top: true,
            scores: PerSide::default(),
            advantages: PerSide::default(),
            tokens: TokenTable::default(),
            control: PerSide::default(),
            player_action: None,
            ai_action: None,
            last_resolution: None,
            match_winner: None,
            match_end_reason: None,
            ai_difficulty,
        }
    }

    /// Move to the next phase of the state machine
    pub(crate) fn advance_phase(&mut self, to: MatchPhase) {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal phase transition {:?} -> {:?}",
            self.phase,
            to
        );
        self.phase = to;
    }

    /// Role held by `side` in the current position
    pub fn role_of(&self, side: Side) -> Role {
        let player_role = Role::from_is_top(self.player_is_top);
        match side {
            Side::Player => player_role,
            Side::Ai => player_role.inverse(),
        }
    }

    /// The side currently on top
    pub fn top_side(&self) -> Side {
        if self.player_is_top {
            Side::Player
        } else {
            Side::Ai
        }
    }

    /// Locked selection for `side`
    pub fn action(&self, side: Side) -> Option<Action> {
        match side {
            Side::Player => self.player_action,
            Side::Ai => self.ai_action,
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = MatchState::new(Difficulty::Hard);
        assert_eq!(state.phase, MatchPhase::MatchStart);
        assert_eq!(state.turn_number, 0);
        assert_eq!(state.position, PositionId::StandingNeutral);
        assert_eq!(state.ai_difficulty, Difficulty::Hard);
        assert!(state.last_resolution.is_none());
        assert!(state.match_winner.is_none());
    }

    #[test]
    fn test_roles_are_inverse() {
        let mut state = MatchState::new(Difficulty::Medium);
        state.player_is_top = false;
        assert_eq!(state.role_of(Side::Player), Role::Bottom);
        assert_eq!(state.role_of(Side::Ai), Role::Top);
        assert_eq!(state.top_side(), Side::Ai);
    }

    #[test]
    fn test_end_reason_text() {
        let reason = MatchEndReason::Submission {
            technique: TechniqueId::Armbar,
            name: "Armbar".to_string(),
        };
        assert_eq!(reason.to_string(), "Submission by Armbar!");
        assert!(MatchEndReason::RefereeDecision.is_random_decision());
        assert!(!MatchEndReason::Points.is_random_decision());
    }

    #[test]
    fn test_state_serializes() {
        let state = MatchState::new(Difficulty::Easy);
        let json = serde_json::to_string(&state).unwrap();
        let back: MatchState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ai_difficulty, Difficulty::Easy);
        assert_eq!(back.phase, MatchPhase::MatchStart);
    }
}
