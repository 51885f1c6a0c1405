//! Built-in position graph and technique tables

use super::{
    Category, CatalogFile, Initiative, MoveList, Position, PositionId, Risk, Technique,
    TechniqueId, TokenInfo, TokenKind, Transition,
};
use crate::core::Role;

use Category::{Attack, Control, Defense, Reversal};
use PositionId as P;
use TechniqueId as T;
use TokenKind as K;

fn position(
    id: PositionId,
    name: &str,
    control: u8,
    initiative: Initiative,
    auto_clear_tokens: &[TokenKind],
) -> Position {
    Position {
        id,
        name: name.to_string(),
        control,
        initiative,
        auto_clear_tokens: auto_clear_tokens.to_vec(),
    }
}

fn tech(id: TechniqueId, name: &str, category: Category, modifier: i32) -> Technique {
    Technique {
        id,
        name: name.to_string(),
        category,
        modifier,
        is_submission: false,
        transition: None,
        scoring_points: 0,
        token_reward: None,
        token_remove: None,
        risk: Risk::Safe,
        required_tokens: Vec::new(),
    }
}

impl Technique {
    fn submission(mut self) -> Self {
        self.is_submission = true;
        self
    }

    fn to(mut self, position: PositionId, user_becomes_top: bool, points: u32) -> Self {
        self.transition = Some(Transition {
            position,
            user_becomes_top,
        });
        self.scoring_points = points;
        self
    }

    fn rewards(mut self, token: TokenKind) -> Self {
        self.token_reward = Some(token);
        self
    }

    fn removes(mut self, token: TokenKind) -> Self {
        self.token_remove = Some(token);
        self
    }

    fn requires(mut self, tokens: &[TokenKind]) -> Self {
        self.required_tokens = tokens.to_vec();
        self
    }

    fn risky(mut self) -> Self {
        self.risk = Risk::Risky;
        self
    }
}

fn positions() -> Vec<Position> {
    use Initiative::{Bottom, Neutral, Top};
    vec![
        position(
            P::StandingNeutral,
            "Standing Neutral",
            0,
            Neutral,
            &[K::PostureBroken, K::LegIsolated, K::Seatbelt],
        ),
        position(P::ClosedGuard, "Closed Guard", 1, Bottom, &[K::Seatbelt, K::BalanceCompromised]),
        position(P::OpenGuard, "Open Guard", 0, Bottom, &[K::Seatbelt]),
        position(P::HalfGuard, "Half Guard", 1, Top, &[K::Seatbelt]),
        position(P::KneeShield, "Knee Shield Half Guard", 0, Bottom, &[K::BalanceCompromised]),
        position(P::SideControl, "Side Control", 2, Top, &[K::PostureBroken, K::LegIsolated]),
        position(P::Mount, "Mount", 2, Top, &[K::PostureBroken, K::LegIsolated]),
        position(P::BackControl, "Back Control", 2, Top, &[K::PostureBroken, K::LegIsolated, K::InsidePosition]),
        position(P::Turtle, "Turtle", 1, Top, &[K::InsidePosition]),
        position(P::FrontHeadlock, "Front Headlock", 1, Top, &[K::Seatbelt]),
    ]
}

fn techniques() -> Vec<Technique> {
    vec![
        // Attacks
        tech(T::Takedown, "Takedown", Attack, 2).to(P::SideControl, true, 2),
        tech(T::GuardPull, "Guard Pull", Attack, 1).to(P::ClosedGuard, false, 0),
        tech(T::SnapDown, "Snap Down", Attack, 1).to(P::FrontHeadlock, true, 0),
        tech(T::GuardBreak, "Guard Break", Attack, 1).to(P::OpenGuard, true, 0),
        tech(T::KneeCutPass, "Knee Cut Pass", Attack, 2).to(P::SideControl, true, 3),
        tech(T::TorreandoPass, "Torreando Pass", Attack, 1).to(P::SideControl, true, 3).risky(),
        tech(T::MountTransition, "Mount Transition", Attack, 1).to(P::Mount, true, 4),
        tech(T::BackTake, "Back Take", Attack, 1).to(P::BackControl, true, 4).risky(),
        tech(T::Americana, "Americana", Attack, 1).submission().requires(&[K::ArmIsolated]),
        tech(T::Kimura, "Kimura", Attack, 1).submission().requires(&[K::ArmIsolated]),
        tech(T::CrossCollarChoke, "Cross Collar Choke", Attack, 1)
            .submission()
            .requires(&[K::PostureBroken]),
        tech(T::RearNakedChoke, "Rear Naked Choke", Attack, 2)
            .submission()
            .requires(&[K::Seatbelt]),
        tech(T::Armbar, "Armbar", Attack, 1).submission().risky().requires(&[K::ArmIsolated]),
        tech(T::Triangle, "Triangle", Attack, 1).submission().risky().requires(&[K::PostureBroken]),
        tech(T::Guillotine, "Guillotine", Attack, 1)
            .submission()
            .risky()
            .requires(&[K::HeadControlled]),
        tech(T::DarceChoke, "D'Arce Choke", Attack, 1)
            .submission()
            .requires(&[K::HeadControlled]),
        tech(T::EzekielChoke, "Ezekiel Choke", Attack, 0)
            .submission()
            .requires(&[K::InsidePosition]),
        tech(T::AnkleLock, "Ankle Lock", Attack, 0).submission().risky().requires(&[K::LegIsolated]),
        // Control
        tech(T::Crossface, "Crossface", Control, 1).rewards(K::HeadControlled),
        tech(T::ChestPressure, "Chest Pressure", Control, 1).rewards(K::BalanceCompromised),
        tech(T::SeatbeltGrip, "Seatbelt Grip", Control, 1).rewards(K::Seatbelt),
        tech(T::HeadControl, "Head Control", Control, 1).rewards(K::HeadControlled),
        tech(T::CollarTie, "Collar Tie", Control, 1).rewards(K::InsidePosition),
        tech(T::PostureBreak, "Posture Break", Control, 1).rewards(K::PostureBroken),
        tech(T::UnderhookControl, "Underhook Control", Control, 1).rewards(K::InsidePosition),
        tech(T::WristControl, "Wrist Control", Control, 1).rewards(K::ArmIsolated),
        tech(T::LegLace, "Leg Lace", Control, 0).rewards(K::LegIsolated),
        tech(T::KneeShieldFrame, "Knee Shield Frame", Control, 1).removes(K::InsidePosition),
        tech(T::BodyLock, "Body Lock", Control, 1).rewards(K::BalanceCompromised),
        // Defense
        tech(T::FrameAndShrimp, "Frame & Shrimp", Defense, 1).removes(K::HeadControlled),
        tech(T::GuardRecovery, "Guard Recovery", Defense, 1).to(P::ClosedGuard, false, 0),
        tech(T::PostureUp, "Posture Up", Defense, 1).removes(K::PostureBroken),
        tech(T::HandFighting, "Hand Fighting", Defense, 1).removes(K::ArmIsolated),
        tech(T::Bridge, "Bridge", Defense, 0).removes(K::BalanceCompromised),
        tech(T::TurtleUp, "Turtle Up", Defense, 0).to(P::Turtle, false, 0),
        tech(T::Sprawl, "Sprawl", Defense, 2).removes(K::InsidePosition),
        tech(T::ShellGuard, "Shell Guard", Defense, 1).removes(K::Seatbelt),
        // Reversal
        tech(T::ScissorSweep, "Scissor Sweep", Reversal, 1).to(P::Mount, true, 2),
        tech(T::HipBumpSweep, "Hip Bump Sweep", Reversal, 1).to(P::Mount, true, 2).risky(),
        tech(T::ElbowEscape, "Elbow Escape", Reversal, 1).to(P::HalfGuard, false, 0),
        tech(T::TrapAndRoll, "Trap & Roll", Reversal, 1)
            .to(P::ClosedGuard, true, 2)
            .requires(&[K::ArmIsolated]),
        tech(T::GranbyRoll, "Granby Roll", Reversal, 0).to(P::OpenGuard, false, 0).risky(),
        tech(T::TechnicalStandup, "Technical Stand-up", Reversal, 1).to(P::StandingNeutral, true, 0),
        tech(T::BackEscape, "Back Escape", Reversal, 0).to(P::HalfGuard, false, 0),
        tech(T::OldSchoolSweep, "Old School Sweep", Reversal, 1).to(P::HalfGuard, true, 2),
        tech(T::SitOut, "Sit Out", Reversal, 1).to(P::StandingNeutral, true, 0),
        tech(T::KneeShieldRecover, "Knee Shield Recovery", Reversal, 1).to(P::KneeShield, false, 0),
        tech(T::HeadlockEscape, "Headlock Escape", Reversal, 1).to(P::StandingNeutral, true, 0),
    ]
}

fn tokens() -> Vec<TokenInfo> {
    [
        (K::PostureBroken, "Posture Broken", "🙇"),
        (K::InsidePosition, "Inside Position", "🎯"),
        (K::ArmIsolated, "Arm Isolated", "💪"),
        (K::BalanceCompromised, "Balance Compromised", "⚖️"),
        (K::LegIsolated, "Leg Isolated", "🦵"),
        (K::HeadControlled, "Head Controlled", "✋"),
        (K::Seatbelt, "Seatbelt", "🔗"),
    ]
    .into_iter()
    .map(|(kind, name, icon)| TokenInfo {
        kind,
        name: name.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

fn moves() -> Vec<MoveList> {
    let standing = vec![
        T::Takedown,
        T::GuardPull,
        T::SnapDown,
        T::Guillotine,
        T::CollarTie,
        T::UnderhookControl,
        T::Sprawl,
        T::HandFighting,
    ];

    let table: Vec<(PositionId, Role, Vec<TechniqueId>)> = vec![
        (P::StandingNeutral, Role::Top, standing.clone()),
        (P::StandingNeutral, Role::Bottom, standing),
        (
            P::ClosedGuard,
            Role::Top,
            vec![T::GuardBreak, T::EzekielChoke, T::WristControl, T::BodyLock, T::PostureUp, T::HandFighting],
        ),
        (
            P::ClosedGuard,
            Role::Bottom,
            vec![
                T::CrossCollarChoke,
                T::Armbar,
                T::Triangle,
                T::Kimura,
                T::PostureBreak,
                T::WristControl,
                T::HandFighting,
                T::ScissorSweep,
                T::HipBumpSweep,
            ],
        ),
        (
            P::OpenGuard,
            Role::Top,
            vec![T::KneeCutPass, T::TorreandoPass, T::LegLace, T::WristControl, T::PostureUp, T::HandFighting],
        ),
        (
            P::OpenGuard,
            Role::Bottom,
            vec![T::Triangle, T::AnkleLock, T::CollarTie, T::KneeShieldFrame, T::GuardRecovery, T::TechnicalStandup],
        ),
        (
            P::HalfGuard,
            Role::Top,
            vec![T::KneeCutPass, T::Kimura, T::Crossface, T::UnderhookControl, T::HandFighting],
        ),
        (
            P::HalfGuard,
            Role::Bottom,
            vec![
                T::Kimura,
                T::UnderhookControl,
                T::KneeShieldFrame,
                T::FrameAndShrimp,
                T::GuardRecovery,
                T::OldSchoolSweep,
            ],
        ),
        (
            P::KneeShield,
            Role::Top,
            vec![T::KneeCutPass, T::Crossface, T::WristControl, T::PostureUp],
        ),
        (
            P::KneeShield,
            Role::Bottom,
            vec![T::Kimura, T::KneeShieldFrame, T::CollarTie, T::GuardRecovery, T::OldSchoolSweep, T::TechnicalStandup],
        ),
        (
            P::SideControl,
            Role::Top,
            vec![T::MountTransition, T::Americana, T::Kimura, T::Crossface, T::ChestPressure],
        ),
        (
            P::SideControl,
            Role::Bottom,
            vec![T::FrameAndShrimp, T::TurtleUp, T::Bridge, T::KneeShieldRecover, T::GranbyRoll],
        ),
        (
            P::Mount,
            Role::Top,
            vec![
                T::Americana,
                T::Armbar,
                T::EzekielChoke,
                T::CrossCollarChoke,
                T::ChestPressure,
                T::HeadControl,
                T::WristControl,
            ],
        ),
        (
            P::Mount,
            Role::Bottom,
            vec![T::Bridge, T::FrameAndShrimp, T::HandFighting, T::ElbowEscape, T::TrapAndRoll],
        ),
        (
            P::BackControl,
            Role::Top,
            vec![T::RearNakedChoke, T::Armbar, T::SeatbeltGrip, T::BodyLock, T::WristControl],
        ),
        (
            P::BackControl,
            Role::Bottom,
            vec![T::HandFighting, T::ShellGuard, T::BackEscape],
        ),
        (
            P::Turtle,
            Role::Top,
            vec![T::BackTake, T::SeatbeltGrip, T::BodyLock, T::HeadControl],
        ),
        (
            P::Turtle,
            Role::Bottom,
            vec![T::ShellGuard, T::HandFighting, T::GranbyRoll, T::SitOut],
        ),
        (
            P::FrontHeadlock,
            Role::Top,
            vec![T::DarceChoke, T::Guillotine, T::BackTake, T::HeadControl, T::ChestPressure],
        ),
        (
            P::FrontHeadlock,
            Role::Bottom,
            vec![T::HandFighting, T::PostureUp, T::HeadlockEscape, T::SitOut],
        ),
    ];

    table
        .into_iter()
        .map(|(position, role, techniques)| MoveList {
            position,
            role,
            techniques,
        })
        .collect()
}

/// The full built-in catalog in its on-disk layout
pub(super) fn catalog_file() -> CatalogFile {
    CatalogFile {
        positions: positions(),
        techniques: techniques(),
        tokens: tokens(),
        moves: moves(),
    }
}
