//! Match phases

use serde::{Deserialize, Serialize};

/// Phase of the match state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    MatchStart,
    TurnStart,
    ActionSelection,
    ActionLocked,
    Resolution,
    TurnEnd,
    MatchEnd,
}

impl MatchPhase {
    /// Whether `to` directly follows this phase
    ///
    /// The sequence is linear apart from the TurnEnd -> TurnStart loop and
    /// Resolution branching to either TurnEnd or MatchEnd. MatchEnd only
    /// leaves through a fresh match start.
    pub fn can_transition_to(self, to: MatchPhase) -> bool {
        use MatchPhase::*;
        matches!(
            (self, to),
            (MatchStart, TurnStart)
                | (TurnStart, ActionSelection)
                | (ActionSelection, ActionLocked)
                | (ActionLocked, Resolution)
                | (Resolution, TurnEnd)
                | (Resolution, MatchEnd)
                | (TurnEnd, TurnStart)
                | (MatchEnd, TurnStart)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == MatchPhase::MatchEnd
    }
}
