//! Match state machine
//!
//! [`MatchController`] owns the [`MatchState`], the catalog handle, the
//! match's single random source and its logger. Each public operation is
//! one edge of the phase graph:
//!
//! ```text
//! MatchStart -start_match-> TurnStart -start_turn-> ActionSelection
//!   -lock_actions-> ActionLocked -resolve_and_advance-> Resolution
//!   -> TurnEnd -next_turn-> TurnStart ...
//!   -> MatchEnd
//! ```

use crate::catalog::{Catalog, Category, Technique};
use crate::core::{Difficulty, Role, Side};
use crate::game::ai;
use crate::game::controller::MatchStateView;
use crate::game::logger::MatchLogger;
use crate::game::resolution::{resolve, Resolution};
use crate::game::rng::{self, RandomSource};
use crate::game::state::{Action, MatchEndReason, MatchState};
use crate::game::{MatchPhase, VerbosityLevel};
use crate::{BjjError, Result};
use std::cmp::Ordering;
use std::sync::Arc;

/// Score that ends the match immediately
pub const POINTS_TO_WIN: u32 = 12;

/// Turn after which the match goes to a decision
pub const TURN_CAP: u32 = 20;

/// Drives one match through its phases
pub struct MatchController {
    state: MatchState,
    catalog: Arc<Catalog>,
    rng: Box<dyn RandomSource>,
    logger: MatchLogger,
}

impl MatchController {
    /// Controller over a fresh state in phase MatchStart
    pub fn new(catalog: Arc<Catalog>, difficulty: Difficulty, rng: Box<dyn RandomSource>) -> Self {
        MatchController {
            state: MatchState::new(difficulty),
            catalog,
            rng,
            logger: MatchLogger::new(),
        }
    }

    /// Controller with a seeded ChaCha random source
    pub fn with_seed(catalog: Arc<Catalog>, difficulty: Difficulty, seed: u64) -> Self {
        Self::new(catalog, difficulty, rng::seeded(seed))
    }

    pub fn with_logger(mut self, logger: MatchLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Direct state access for scenario setup
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn logger(&self) -> &MatchLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut MatchLogger {
        &mut self.logger
    }

    /// Change the AI difficulty for the next match
    ///
    /// Only allowed before the first start or after a match has ended; the
    /// difficulty is fixed while a match is running.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        match self.state.phase {
            MatchPhase::MatchStart | MatchPhase::MatchEnd => {
                self.state.ai_difficulty = difficulty;
                Ok(())
            }
            phase => Err(BjjError::InvalidInput(format!(
                "cannot change difficulty during {phase:?}"
            ))),
        }
    }

    /// Reset everything and open turn 1
    ///
    /// Top/bottom is decided by one coin flip from the match's random source.
    pub fn start_match(&mut self) {
        self.state = MatchState::new(self.state.ai_difficulty);
        self.state.player_is_top = self.rng.coin_flip();
        self.state.turn_number = 1;
        self.state.advance_phase(MatchPhase::TurnStart);

        log_if_verbose!(
            self.logger,
            "Match start vs {} opponent, you start on {}",
            self.state.ai_difficulty,
            self.state.role_of(Side::Player)
        );
    }

    /// Clear both pending selections and open action selection
    pub fn start_turn(&mut self) {
        self.state.player_action = None;
        self.state.ai_action = None;
        self.state.advance_phase(MatchPhase::ActionSelection);

        log_if_verbose!(
            self.logger,
            "=== Turn {} · {:?} · player {} ===",
            self.state.turn_number,
            self.state.position,
            self.state.role_of(Side::Player)
        );
    }

    /// Store both selections verbatim
    ///
    /// No legality check: callers pick from the catalog-filtered options.
    pub fn lock_actions(&mut self, player: Action, ai: Action) {
        self.state.player_action = Some(player);
        self.state.ai_action = Some(ai);
        self.state.advance_phase(MatchPhase::ActionLocked);
    }

    /// Resolve the locked actions and decide whether the match goes on
    ///
    /// Termination is checked in priority order: submission, points
    /// threshold (player first), then the turn cap decision.
    ///
    /// On error the state is left untouched in ActionLocked, so the same
    /// turn can be resolved again.
    pub fn resolve_and_advance(&mut self) -> Result<Resolution> {
        let mut next = self.state.clone();
        next.advance_phase(MatchPhase::Resolution);
        let resolution = resolve(&mut next, &self.catalog, self.rng.as_mut())?;
        let submission = self.submission_ending(&resolution)?;

        self.state = next;
        self.log_resolution(&resolution);
        self.state.last_resolution = Some(resolution.clone());
        // Selections only live through the resolution phase
        self.state.player_action = None;
        self.state.ai_action = None;

        match submission.or_else(|| self.check_termination()) {
            Some((winner, reason)) => {
                self.logger.minimal(&format!(
                    "{} {} {}-{}",
                    reason,
                    winner.subject("win", "wins"),
                    self.state.scores[Side::Player],
                    self.state.scores[Side::Ai]
                ));
                self.state.match_winner = Some(winner);
                self.state.match_end_reason = Some(reason);
                self.state.advance_phase(MatchPhase::MatchEnd);
            }
            None => self.state.advance_phase(MatchPhase::TurnEnd),
        }

        Ok(resolution)
    }

    /// Bump the turn counter and loop back to TurnStart
    pub fn next_turn(&mut self) {
        self.state.turn_number += 1;
        self.state.advance_phase(MatchPhase::TurnStart);
    }

    fn submission_ending(&self, resolution: &Resolution) -> Result<Option<(Side, MatchEndReason)>> {
        if !resolution.submission {
            return Ok(None);
        }
        match (resolution.winner, resolution.winning_technique) {
            (Some(winner), Some(technique)) => {
                let name = self.catalog.technique(technique)?.name.clone();
                Ok(Some((winner, MatchEndReason::Submission { technique, name })))
            }
            _ => Ok(None),
        }
    }

    /// Points threshold (player first), then the turn cap
    fn check_termination(&mut self) -> Option<(Side, MatchEndReason)> {
        for side in Side::BOTH {
            if self.state.scores[side] >= POINTS_TO_WIN {
                return Some((side, MatchEndReason::Points));
            }
        }

        if self.state.turn_number >= TURN_CAP {
            return Some(self.decide_on_time());
        }

        None
    }

    /// Score, then advantages, then a coin flip
    fn decide_on_time(&mut self) -> (Side, MatchEndReason) {
        let leader = |values: [u32; 2]| match values[0].cmp(&values[1]) {
            Ordering::Greater => Some(Side::Player),
            Ordering::Less => Some(Side::Ai),
            Ordering::Equal => None,
        };

        let scores = [self.state.scores[Side::Player], self.state.scores[Side::Ai]];
        if let Some(side) = leader(scores) {
            return (side, MatchEndReason::TimeScore);
        }
        let advantages = [
            self.state.advantages[Side::Player],
            self.state.advantages[Side::Ai],
        ];
        if let Some(side) = leader(advantages) {
            return (side, MatchEndReason::TimeAdvantages);
        }
        let winner = if self.rng.coin_flip() {
            Side::Player
        } else {
            Side::Ai
        };
        (winner, MatchEndReason::RefereeDecision)
    }

    fn log_resolution(&self, resolution: &Resolution) {
        if self.logger.verbosity() >= VerbosityLevel::Verbose || self.logger.is_capturing() {
            self.logger
                .verbose(&format!("You:      {}", resolution.player_score.describe()));
            self.logger
                .verbose(&format!("Opponent: {}", resolution.ai_score.describe()));
        }
        if !resolution.is_draw() {
            log_if_verbose!(
                self.logger,
                "{} (margin {})",
                resolution.tier.label(),
                resolution.margin
            );
        }
        for line in &resolution.narratives {
            self.logger.narrative(line);
        }
    }

    /// The AI's selection at the match difficulty
    pub fn ai_select_action(&mut self) -> Result<Action> {
        self.select_action_for(Side::Ai, self.state.ai_difficulty)
    }

    /// Heuristic selection for any side, drawing from the match's random source
    pub fn select_action_for(&mut self, side: Side, difficulty: Difficulty) -> Result<Action> {
        if self.logger.verbosity() >= VerbosityLevel::Verbose || self.logger.is_capturing() {
            for option in ai::ranked_options(&self.state, &self.catalog, side)? {
                self.logger.verbose(&format!(
                    "  {side} option {} = {:.1}",
                    option.action.technique, option.score
                ));
            }
        }
        ai::select_action(&self.state, &self.catalog, side, difficulty, self.rng.as_mut())
    }

    pub fn player_role(&self) -> Role {
        self.state.role_of(Side::Player)
    }

    pub fn ai_role(&self) -> Role {
        self.state.role_of(Side::Ai)
    }

    /// Categories the player may pick from in the current position
    pub fn player_categories(&self) -> Result<Vec<Category>> {
        self.catalog
            .available_categories(self.state.position, self.player_role())
    }

    /// The player's techniques in `category`, locked ones included
    pub fn player_techniques(&self, category: Category) -> Result<Vec<&Technique>> {
        self.catalog
            .techniques_for(self.state.position, self.player_role(), category)
    }

    /// Whether the player's tokens meet `technique`'s requirement
    pub fn player_can_use(&self, technique: &Technique) -> bool {
        technique.usable_with(&self.state.tokens[Side::Player])
    }

    /// Read-only view from one seat
    pub fn view(&self, side: Side) -> MatchStateView<'_> {
        MatchStateView::new(&self.state, &self.catalog, side)
    }

    /// A view plus the random source, borrowed together for controllers
    pub fn view_and_rng(&mut self, side: Side) -> (MatchStateView<'_>, &mut dyn RandomSource) {
        (
            MatchStateView::new(&self.state, &self.catalog, side),
            self.rng.as_mut(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PositionId, TechniqueId, TokenKind};
    use crate::core::PerSide;
    use crate::game::rng::ScriptedRandom;

    fn controller(script: &[u32]) -> MatchController {
        MatchController::new(
            Arc::new(Catalog::builtin()),
            Difficulty::Medium,
            Box::new(ScriptedRandom::new(script.to_vec())),
        )
        .with_logger(MatchLogger::capturing(VerbosityLevel::Verbose))
    }

    fn collar_ties() -> (Action, Action) {
        (
            Action::new(Category::Control, TechniqueId::CollarTie),
            Action::new(Category::Control, TechniqueId::UnderhookControl),
        )
    }

    #[test]
    fn test_start_match_resets_everything() {
        let mut ctl = controller(&[1]);
        ctl.state_mut().scores = PerSide::new(5, 3);
        ctl.state_mut().tokens.add(Side::Ai, TokenKind::Seatbelt);
        ctl.state_mut().position = PositionId::Mount;

        ctl.start_match();

        let state = ctl.state();
        assert_eq!(state.phase, MatchPhase::TurnStart);
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.scores, PerSide::new(0, 0));
        assert!(state.tokens[Side::Ai].is_empty());
        assert_eq!(state.position, PositionId::StandingNeutral);
        // coin flip of 1 puts the player on top
        assert!(state.player_is_top);
        assert_eq!(ctl.player_role(), Role::Top);
        assert_eq!(ctl.ai_role(), Role::Bottom);
    }

    #[test]
    fn test_turn_cycle() {
        let mut ctl = controller(&[0, 4, 4]);
        ctl.start_match();
        ctl.start_turn();
        assert_eq!(ctl.state().phase, MatchPhase::ActionSelection);
        assert!(ctl.state().player_action.is_none());

        let (player, ai) = collar_ties();
        ctl.lock_actions(player, ai);
        assert_eq!(ctl.state().phase, MatchPhase::ActionLocked);
        assert_eq!(ctl.state().action(Side::Ai), Some(ai));

        let resolution = ctl.resolve_and_advance().unwrap();
        assert!(resolution.is_draw());
        assert_eq!(ctl.state().phase, MatchPhase::TurnEnd);
        assert_eq!(ctl.state().last_resolution.as_ref(), Some(&resolution));
        assert!(ctl.state().action(Side::Player).is_none());

        ctl.next_turn();
        assert_eq!(ctl.state().turn_number, 2);
        assert_eq!(ctl.state().phase, MatchPhase::TurnStart);
    }

    #[test]
    fn test_points_threshold_ends_match() {
        // coin flip, then dice 3 v 3
        let mut ctl = controller(&[1, 3, 3]);
        ctl.start_match();
        ctl.state_mut().scores[Side::Player] = 10;
        ctl.start_turn();
        ctl.lock_actions(
            Action::new(Category::Attack, TechniqueId::Takedown),
            Action::new(Category::Control, TechniqueId::CollarTie),
        );

        let resolution = ctl.resolve_and_advance().unwrap();

        assert_eq!(resolution.points_awarded, 2);
        assert_eq!(ctl.state().phase, MatchPhase::MatchEnd);
        assert_eq!(ctl.state().match_winner, Some(Side::Player));
        assert_eq!(ctl.state().match_end_reason, Some(MatchEndReason::Points));
    }

    #[test]
    fn test_time_cap_decided_on_advantages() {
        let mut ctl = controller(&[1, 4, 4]);
        ctl.start_match();
        ctl.state_mut().turn_number = TURN_CAP;
        ctl.state_mut().scores = PerSide::new(2, 2);
        ctl.state_mut().advantages = PerSide::new(0, 1);
        ctl.start_turn();
        let (player, ai) = collar_ties();
        ctl.lock_actions(player, ai);

        ctl.resolve_and_advance().unwrap();

        assert_eq!(ctl.state().match_winner, Some(Side::Ai));
        assert_eq!(
            ctl.state().match_end_reason,
            Some(MatchEndReason::TimeAdvantages)
        );
    }

    #[test]
    fn test_time_cap_decided_on_score() {
        let mut ctl = controller(&[1, 4, 4]);
        ctl.start_match();
        ctl.state_mut().turn_number = TURN_CAP + 3;
        ctl.state_mut().scores = PerSide::new(4, 2);
        ctl.state_mut().advantages = PerSide::new(0, 5);
        ctl.start_turn();
        let (player, ai) = collar_ties();
        ctl.lock_actions(player, ai);

        ctl.resolve_and_advance().unwrap();

        assert_eq!(ctl.state().match_winner, Some(Side::Player));
        assert_eq!(ctl.state().match_end_reason, Some(MatchEndReason::TimeScore));
    }

    #[test]
    fn test_restart_after_match_end() {
        let mut ctl = controller(&[1, 3, 3, 0]);
        ctl.start_match();
        ctl.state_mut().scores[Side::Ai] = 12;
        ctl.start_turn();
        let (player, ai) = collar_ties();
        ctl.lock_actions(player, ai);
        ctl.resolve_and_advance().unwrap();
        assert!(ctl.state().is_over());
        assert_eq!(ctl.state().match_winner, Some(Side::Ai));

        ctl.start_match();
        assert_eq!(ctl.state().phase, MatchPhase::TurnStart);
        assert!(ctl.state().match_winner.is_none());
        assert!(ctl.state().match_end_reason.is_none());
        assert!(ctl.state().last_resolution.is_none());
        assert!(!ctl.state().player_is_top);
    }

    #[test]
    fn test_difficulty_set_before_start_survives_restart() {
        let mut ctl = controller(&[1, 1]);
        ctl.set_difficulty(Difficulty::Hard).unwrap();
        ctl.start_match();
        assert_eq!(ctl.state().ai_difficulty, Difficulty::Hard);
        ctl.start_match();
        assert_eq!(ctl.state().ai_difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_is_fixed_during_a_match() {
        let mut ctl = MatchController::new(
            Arc::new(Catalog::builtin()),
            Difficulty::Easy,
            Box::new(ScriptedRandom::new([1, 3, 3])),
        );
        ctl.start_match();
        let err = ctl.set_difficulty(Difficulty::Hard).unwrap_err();
        assert!(matches!(err, BjjError::InvalidInput(_)));
        ctl.start_turn();
        assert!(ctl.set_difficulty(Difficulty::Hard).is_err());
        assert_eq!(ctl.state().ai_difficulty, Difficulty::Easy);

        // allowed again once the match is over
        ctl.state_mut().scores[Side::Ai] = POINTS_TO_WIN;
        let (player, ai) = collar_ties();
        ctl.lock_actions(player, ai);
        ctl.resolve_and_advance().unwrap();
        assert!(ctl.state().is_over());
        ctl.set_difficulty(Difficulty::Hard).unwrap();
        assert_eq!(ctl.state().ai_difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_failed_resolution_keeps_the_turn_locked() {
        // the locked technique is missing from the loaded catalog
        let mut data = Catalog::builtin().to_file_data();
        data.techniques.retain(|t| t.id != TechniqueId::UnderhookControl);
        data.moves
            .iter_mut()
            .for_each(|m| m.techniques.retain(|&t| t != TechniqueId::UnderhookControl));
        let catalog = Catalog::from_file_data(data).unwrap();
        let mut ctl = MatchController::new(
            Arc::new(catalog),
            Difficulty::Medium,
            Box::new(ScriptedRandom::new([1, 3, 3])),
        );
        ctl.start_match();
        ctl.start_turn();
        let (player, ai) = collar_ties();
        ctl.lock_actions(player, ai);
        let before = ctl.state().clone();

        let err = ctl.resolve_and_advance().unwrap_err();

        assert!(err.is_data_integrity());
        let after = ctl.state();
        assert_eq!(after.phase, MatchPhase::ActionLocked);
        assert_eq!(after.action(Side::Player), before.action(Side::Player));
        assert_eq!(after.action(Side::Ai), Some(ai));
        assert_eq!(after.control, before.control);
        assert_eq!(after.tokens, before.tokens);
        assert!(after.last_resolution.is_none());
    }

    #[test]
    fn test_player_queries() {
        let mut ctl = controller(&[1]);
        ctl.start_match();

        let categories = ctl.player_categories().unwrap();
        assert_eq!(
            categories,
            vec![Category::Attack, Category::Control, Category::Defense]
        );
        let attacks = ctl.player_techniques(Category::Attack).unwrap();
        let guillotine = attacks
            .iter()
            .find(|t| t.id == TechniqueId::Guillotine)
            .unwrap();
        assert!(!ctl.player_can_use(guillotine));
    }

    #[test]
    fn test_ai_selection_logs_options() {
        let mut ctl = controller(&[1, 0, 0]);
        ctl.start_match();
        ctl.start_turn();
        let action = ctl.ai_select_action().unwrap();
        assert_eq!(action.technique, TechniqueId::CollarTie);
        assert!(ctl
            .logger()
            .logs()
            .iter()
            .any(|e| e.message.contains("ai option CollarTie")));
    }
}
