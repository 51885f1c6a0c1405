//! Closed identifier sets for the static catalog
//!
//! Every position, category, token and technique is an enum variant, so a
//! typo in a lookup is a compile error rather than a runtime miss.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named grappling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionId {
    StandingNeutral,
    ClosedGuard,
    OpenGuard,
    HalfGuard,
    KneeShield,
    SideControl,
    Mount,
    BackControl,
    Turtle,
    FrontHeadlock,
}

impl PositionId {
    pub const ALL: [PositionId; 10] = [
        PositionId::StandingNeutral,
        PositionId::ClosedGuard,
        PositionId::OpenGuard,
        PositionId::HalfGuard,
        PositionId::KneeShield,
        PositionId::SideControl,
        PositionId::Mount,
        PositionId::BackControl,
        PositionId::Turtle,
        PositionId::FrontHeadlock,
    ];

    /// Every match starts here
    pub const INITIAL: PositionId = PositionId::StandingNeutral;
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Tactical class of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Attack,
    Control,
    Defense,
    Reversal,
}

impl Category {
    /// Display order of the four action buttons
    pub const ALL: [Category; 4] = [
        Category::Attack,
        Category::Control,
        Category::Defense,
        Category::Reversal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Attack => "Attack",
            Category::Control => "Control",
            Category::Defense => "Defense",
            Category::Reversal => "Reversal",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Attack => "⚔️",
            Category::Control => "🔒",
            Category::Defense => "🛡️",
            Category::Reversal => "🔄",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Category::Attack => "Pass, submit, advance",
            Category::Control => "Build grips and pressure",
            Category::Defense => "Frame, recover, survive",
            Category::Reversal => "Sweep or escape",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Positional advantage marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    PostureBroken,
    InsidePosition,
    ArmIsolated,
    BalanceCompromised,
    LegIsolated,
    HeadControlled,
    Seatbelt,
}

impl TokenKind {
    pub const ALL: [TokenKind; 7] = [
        TokenKind::PostureBroken,
        TokenKind::InsidePosition,
        TokenKind::ArmIsolated,
        TokenKind::BalanceCompromised,
        TokenKind::LegIsolated,
        TokenKind::HeadControlled,
        TokenKind::Seatbelt,
    ];

    /// Candidates for the bonus token awarded on a dominant win
    pub const BONUS_POOL: [TokenKind; 5] = [
        TokenKind::PostureBroken,
        TokenKind::InsidePosition,
        TokenKind::ArmIsolated,
        TokenKind::BalanceCompromised,
        TokenKind::LegIsolated,
    ];
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A specific move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueId {
    // Attacks
    Takedown,
    GuardPull,
    SnapDown,
    GuardBreak,
    KneeCutPass,
    TorreandoPass,
    MountTransition,
    BackTake,
    Americana,
    Kimura,
    CrossCollarChoke,
    RearNakedChoke,
    Armbar,
    Triangle,
    Guillotine,
    DarceChoke,
    EzekielChoke,
    AnkleLock,
    // Control
    Crossface,
    ChestPressure,
    SeatbeltGrip,
    HeadControl,
    CollarTie,
    PostureBreak,
    UnderhookControl,
    WristControl,
    LegLace,
    KneeShieldFrame,
    BodyLock,
    // Defense
    FrameAndShrimp,
    GuardRecovery,
    PostureUp,
    HandFighting,
    Bridge,
    TurtleUp,
    Sprawl,
    ShellGuard,
    // Reversal
    ScissorSweep,
    HipBumpSweep,
    ElbowEscape,
    TrapAndRoll,
    GranbyRoll,
    TechnicalStandup,
    BackEscape,
    OldSchoolSweep,
    SitOut,
    KneeShieldRecover,
    HeadlockEscape,
}

impl fmt::Display for TechniqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
