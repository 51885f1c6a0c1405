//! End-to-end scenarios driven through the public state machine
//!
//! Every random draw is scripted so each test can state the exact dice and
//! the exact outcome. Draw order: the opening top/bottom coin, then per turn
//! the player's die before the AI's.

use bjj_engine::catalog::{Catalog, Category, PositionId, TechniqueId, TokenKind};
use bjj_engine::core::{Difficulty, PerSide, Side};
use bjj_engine::game::{
    Action, MatchController, MatchEndReason, MatchLogger, MatchPhase, OutcomeTier,
    ScoreBreakdown, ScriptedRandom, VerbosityLevel, TURN_CAP,
};
use similar_asserts::assert_eq;
use std::sync::Arc;

/// Controller whose random source replays `draws`, with the match already started
fn scripted(draws: impl IntoIterator<Item = u32>) -> MatchController {
    scripted_with(Catalog::builtin(), draws)
}

fn scripted_with(catalog: Catalog, draws: impl IntoIterator<Item = u32>) -> MatchController {
    let mut controller = MatchController::new(
        Arc::new(catalog),
        Difficulty::Medium,
        Box::new(ScriptedRandom::new(draws)),
    )
    .with_logger(MatchLogger::capturing(VerbosityLevel::Verbose));
    controller.start_match();
    controller.start_turn();
    controller
}

fn action(category: Category, technique: TechniqueId) -> Action {
    Action::new(category, technique)
}

#[test]
fn test_major_exchange_without_transition() {
    // coin: player on top; dice 4 then 3
    let mut ctl = scripted([1, 4, 3]);
    assert!(ctl.state().player_is_top);

    ctl.lock_actions(
        action(Category::Defense, TechniqueId::Sprawl),
        action(Category::Attack, TechniqueId::Takedown),
    );
    let resolution = ctl.resolve_and_advance().unwrap();

    // 0 + 1 + 2 + 0 + 4 = 7 against 0 - 1 + 2 + 0 + 3 = 4
    assert_eq!(resolution.player_score.total, 7);
    assert_eq!(resolution.ai_score.total, 4);
    assert_eq!(resolution.margin, 3);
    assert_eq!(resolution.tier, OutcomeTier::Major);
    assert_eq!(resolution.winner, Some(Side::Player));
    assert!(resolution.position_change.is_none());

    let state = ctl.state();
    assert_eq!(state.advantages, PerSide::new(1, 0));
    assert_eq!(state.scores, PerSide::new(0, 0));
    assert_eq!(state.position, PositionId::StandingNeutral);
    assert_eq!(state.phase, MatchPhase::TurnEnd);
    assert!(resolution.narratives.iter().any(|n| n.starts_with("Near miss!")));
}

#[test]
fn test_major_exchange_from_plain_modifiers() {
    // Two mirrored attacks with modifiers 3 and 1 and no transition
    let mut data = Catalog::builtin().to_file_data();
    for technique in &mut data.techniques {
        match technique.id {
            TechniqueId::Takedown => technique.modifier = 3,
            TechniqueId::SnapDown => technique.modifier = 1,
            _ => continue,
        }
        technique.transition = None;
        technique.token_reward = None;
        technique.token_remove = None;
    }
    let catalog = Catalog::from_file_data(data).unwrap();
    let mut ctl = scripted_with(catalog, [1, 4, 3]);

    ctl.lock_actions(
        action(Category::Attack, TechniqueId::Takedown),
        action(Category::Attack, TechniqueId::SnapDown),
    );
    let resolution = ctl.resolve_and_advance().unwrap();

    assert_eq!(resolution.player_score, ScoreBreakdown::new(0, 0, 3, 0, 4));
    assert_eq!(resolution.ai_score, ScoreBreakdown::new(0, 0, 1, 0, 3));
    assert_eq!(resolution.player_score.total, 7);
    assert_eq!(resolution.ai_score.total, 4);
    assert_eq!(resolution.margin, 3);
    assert_eq!(resolution.tier, OutcomeTier::Major);
    assert_eq!(resolution.winner, Some(Side::Player));
    assert!(resolution.position_change.is_none());
    assert_eq!(resolution.advantages_awarded, 1);
    assert!(resolution.tokens_gained.is_empty());

    let state = ctl.state();
    assert_eq!(state.advantages, PerSide::new(1, 0));
    assert_eq!(state.scores, PerSide::new(0, 0));
    assert_eq!(state.position, PositionId::StandingNeutral);
}

#[test]
fn test_stalemate_exchange() {
    // 0 + 0 + 1 + 0 + 3 = 4 on both sides
    let mut ctl = scripted([0, 3, 3]);
    let before = ctl.state().clone();

    ctl.lock_actions(
        action(Category::Control, TechniqueId::CollarTie),
        action(Category::Control, TechniqueId::UnderhookControl),
    );
    let resolution = ctl.resolve_and_advance().unwrap();

    assert!(resolution.is_draw());
    assert_eq!(resolution.winner, None);
    assert_eq!(resolution.margin, 0);
    assert!(resolution.narratives[0].contains("Stalemate"));

    let after = ctl.state();
    assert_eq!(after.scores, before.scores);
    assert_eq!(after.advantages, before.advantages);
    assert_eq!(after.control, before.control);
    assert_eq!(after.tokens, before.tokens);
    assert_eq!(after.position, before.position);
    assert_eq!(after.player_is_top, before.player_is_top);
    assert!(after.match_winner.is_none());
}

#[test]
fn test_dominant_submission_ends_the_match() {
    // player on top in mount holding an isolated arm; dice 6 then 1
    let mut ctl = scripted([1, 6, 1]);
    ctl.state_mut().position = PositionId::Mount;
    ctl.state_mut().tokens.add(Side::Player, TokenKind::ArmIsolated);

    ctl.lock_actions(
        action(Category::Attack, TechniqueId::Armbar),
        action(Category::Defense, TechniqueId::HandFighting),
    );
    let resolution = ctl.resolve_and_advance().unwrap();

    // 0 - 1 + 1 + 1 + 6 = 7 against 0 + 1 + 1 + 0 + 1 = 3
    assert_eq!(resolution.margin, 4);
    assert_eq!(resolution.tier, OutcomeTier::Dominant);
    assert!(resolution.submission);
    assert_eq!(resolution.points_awarded, 0);
    assert!(resolution.tokens_gained.is_empty());
    assert!(resolution.tokens_lost.is_empty());

    let state = ctl.state();
    assert_eq!(state.phase, MatchPhase::MatchEnd);
    assert_eq!(state.match_winner, Some(Side::Player));
    assert!(matches!(
        state.match_end_reason,
        Some(MatchEndReason::Submission { technique: TechniqueId::Armbar, .. })
    ));
    assert_eq!(state.scores, PerSide::new(0, 0));
    assert_eq!(state.tokens[Side::Player].as_slice(), &[TokenKind::ArmIsolated]);
}

#[test]
fn test_time_expiry_all_level_goes_to_referee() {
    // coin, a stalemate (3 vs 3), then the referee's coin: 0 = opponent
    let mut ctl = scripted([1, 3, 3, 0]);
    ctl.state_mut().turn_number = TURN_CAP;
    ctl.state_mut().scores = PerSide::new(4, 4);
    ctl.state_mut().advantages = PerSide::new(2, 2);

    ctl.lock_actions(
        action(Category::Control, TechniqueId::CollarTie),
        action(Category::Control, TechniqueId::UnderhookControl),
    );
    let resolution = ctl.resolve_and_advance().unwrap();
    assert!(resolution.is_draw());

    let state = ctl.state();
    assert_eq!(state.phase, MatchPhase::MatchEnd);
    assert_eq!(state.match_end_reason, Some(MatchEndReason::RefereeDecision));
    assert_eq!(state.match_winner, Some(Side::Ai));
}

#[test]
fn test_time_expiry_prefers_advantages() {
    let mut ctl = scripted([1, 3, 3]);
    ctl.state_mut().turn_number = TURN_CAP;
    ctl.state_mut().scores = PerSide::new(2, 2);
    ctl.state_mut().advantages = PerSide::new(1, 3);

    ctl.lock_actions(
        action(Category::Control, TechniqueId::CollarTie),
        action(Category::Control, TechniqueId::UnderhookControl),
    );
    ctl.resolve_and_advance().unwrap();

    assert_eq!(ctl.state().match_winner, Some(Side::Ai));
    assert_eq!(
        ctl.state().match_end_reason,
        Some(MatchEndReason::TimeAdvantages)
    );
}

#[test]
fn test_verbose_log_shows_breakdowns() {
    let mut ctl = scripted([1, 4, 3]);
    ctl.lock_actions(
        action(Category::Defense, TechniqueId::Sprawl),
        action(Category::Attack, TechniqueId::Takedown),
    );
    ctl.resolve_and_advance().unwrap();

    let verbose = ctl.logger().messages_at(VerbosityLevel::Verbose);
    assert!(verbose
        .iter()
        .any(|m| m.contains("Ctrl: 0 · Match: +1 · Tech: +2 · Tok: +0 · Die: 4 = 7")));

    // breakdowns are hidden at normal verbosity
    let normal = ctl.logger().messages_at(VerbosityLevel::Normal);
    assert!(!normal.iter().any(|m| m.contains("Ctrl:")));
}
