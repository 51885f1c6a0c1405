//! Match loop
//!
//! Drives a [`MatchController`] turn by turn: the player seat's controller
//! and the AI module each choose, both choices are locked, the turn is
//! resolved, and the loop continues until the state machine reaches MatchEnd.

use crate::core::{PerSide, Side};
use crate::game::controller::PlayerController;
use crate::game::match_controller::MatchController;
use crate::game::state::MatchEndReason;
use crate::game::MatchPhase;
use crate::{BjjError, Result};
use serde::Serialize;

/// Verbosity level for match output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// No output
    Silent = 0,
    /// Only the match outcome
    Minimal = 1,
    /// Turn headers, selections and narratives (default)
    #[default]
    Normal = 2,
    /// Score breakdowns and AI option scores
    Verbose = 3,
}

/// Result of running a match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// None if the run stopped before the match ended
    pub winner: Option<Side>,
    pub turns_played: u32,
    pub end_reason: Option<MatchEndReason>,
    pub scores: PerSide<u32>,
    pub advantages: PerSide<u32>,
}

impl MatchResult {
    pub fn is_finished(&self) -> bool {
        self.end_reason.is_some()
    }
}

/// Turn loop over a borrowed controller
pub struct MatchRunner<'a> {
    pub controller: &'a mut MatchController,
    turns_played: u32,
}

impl<'a> MatchRunner<'a> {
    pub fn new(controller: &'a mut MatchController) -> Self {
        MatchRunner {
            controller,
            turns_played: 0,
        }
    }

    /// Set the logger's verbosity
    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.controller.logger_mut().set_verbosity(verbosity);
        self
    }

    /// Play until the match ends
    pub fn run_match(&mut self, player: &mut dyn PlayerController) -> Result<MatchResult> {
        loop {
            if let Some(result) = self.run_turn_once(player)? {
                let view = self.controller.view(Side::Player);
                player.on_match_end(&view, &result);
                return Ok(result);
            }
        }
    }

    /// Play at most `turns` turns
    ///
    /// Returns an unfinished result (no winner, no end reason) if the match
    /// is still going afterwards.
    pub fn run_turns(
        &mut self,
        player: &mut dyn PlayerController,
        turns: u32,
    ) -> Result<MatchResult> {
        for _ in 0..turns {
            if let Some(result) = self.run_turn_once(player)? {
                return Ok(result);
            }
        }
        Ok(self.snapshot_result())
    }

    /// Play one full turn; Some once the match has ended
    ///
    /// A turn that failed part way resumes where it stopped: selection is
    /// asked again from ActionSelection, and a locked turn goes straight to
    /// resolution.
    pub fn run_turn_once(&mut self, player: &mut dyn PlayerController) -> Result<Option<MatchResult>> {
        match self.controller.state().phase {
            MatchPhase::MatchStart | MatchPhase::MatchEnd => {
                self.controller.start_match();
                self.turns_played = 0;
                self.controller.start_turn();
            }
            MatchPhase::TurnEnd => {
                self.controller.next_turn();
                self.controller.start_turn();
            }
            MatchPhase::TurnStart => self.controller.start_turn(),
            MatchPhase::ActionSelection | MatchPhase::ActionLocked | MatchPhase::Resolution => {}
        }

        if self.controller.state().phase == MatchPhase::ActionSelection {
            self.select_and_lock(player)?;
        }

        let resolution = self.controller.resolve_and_advance()?;
        self.turns_played += 1;

        let view = self.controller.view(Side::Player);
        player.on_resolution(&view, &resolution);

        if self.controller.state().is_over() {
            Ok(Some(self.snapshot_result()))
        } else {
            Ok(None)
        }
    }

    fn select_and_lock(&mut self, player: &mut dyn PlayerController) -> Result<()> {
        let options = self.controller.view(Side::Player).selectable_options()?;
        if options.is_empty() {
            // Same fatal condition the opponent's selection reports
            let position = self.controller.state().position;
            let role = self.controller.player_role();
            let categories = self.controller.catalog().available_categories(position, role)?;
            return Err(if categories.is_empty() {
                BjjError::NoLegalCategories { position, role }
            } else {
                BjjError::NoUsableTechniques { position, role }
            });
        }
        let player_action = {
            let (view, rng) = self.controller.view_and_rng(Side::Player);
            player.choose_action(&view, &options, rng)?
        }
        .ok_or_else(|| {
            BjjError::InvalidInput(format!("{} made no selection", player.name()))
        })?;
        let ai_action = self.controller.ai_select_action()?;

        let logger = self.controller.logger();
        let name_of = |id| {
            self.controller
                .catalog()
                .technique(id)
                .map(|t| t.name.clone())
        };
        logger.controller_choice(player.name(), &name_of(player_action.technique)?);
        logger.controller_choice("opponent", &name_of(ai_action.technique)?);

        self.controller.lock_actions(player_action, ai_action);
        Ok(())
    }

    fn snapshot_result(&self) -> MatchResult {
        let state = self.controller.state();
        MatchResult {
            winner: state.match_winner,
            turns_played: self.turns_played,
            end_reason: state.match_end_reason.clone(),
            scores: state.scores,
            advantages: state.advantages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, PositionId};
    use crate::core::{Difficulty, Role};
    use crate::game::controller::{ActionOption, MatchStateView};
    use crate::game::rng::{RandomSource, ScriptedRandom};
    use crate::game::state::Action;
    use crate::game::{FixedScriptController, HeuristicController, MatchLogger};
    use std::sync::Arc;

    fn quiet_controller(seed: u64) -> MatchController {
        MatchController::with_seed(Arc::new(Catalog::builtin()), Difficulty::Medium, seed)
            .with_logger(MatchLogger::capturing(VerbosityLevel::Normal))
    }

    #[test]
    fn test_match_runs_to_completion() {
        let mut ctl = quiet_controller(42);
        let mut player = HeuristicController::new(Difficulty::Medium);

        let result = MatchRunner::new(&mut ctl).run_match(&mut player).unwrap();

        assert!(result.is_finished());
        assert!(result.winner.is_some());
        assert!(result.turns_played >= 1);
        assert!(result.turns_played <= crate::game::TURN_CAP);
        assert_eq!(ctl.state().phase, MatchPhase::MatchEnd);
    }

    #[test]
    fn test_run_turns_stops_early() {
        let mut ctl = quiet_controller(7);
        let mut player = FixedScriptController::new(vec![]);

        let result = MatchRunner::new(&mut ctl)
            .run_turns(&mut player, 1)
            .unwrap();

        // nothing can finish a match on the opening turn
        assert!(!result.is_finished());
        assert_eq!(result.turns_played, 1);
        assert!(result.winner.is_none());
        assert_eq!(ctl.state().phase, MatchPhase::TurnEnd);
    }

    #[test]
    fn test_selections_are_logged() {
        let mut ctl = quiet_controller(3);
        let mut player = FixedScriptController::new(vec![0]);

        MatchRunner::new(&mut ctl).run_turns(&mut player, 1).unwrap();

        let choices = ctl
            .logger()
            .logs()
            .iter()
            .filter(|e| e.category.as_deref() == Some("controller_choice"))
            .count();
        assert_eq!(choices, 2);
    }

    /// Gives up on its first turn, then takes the first option
    struct GivesUpOnce {
        calls: usize,
    }

    impl PlayerController for GivesUpOnce {
        fn name(&self) -> &str {
            "gives-up-once"
        }

        fn choose_action(
            &mut self,
            _view: &MatchStateView,
            options: &[ActionOption],
            _rng: &mut dyn RandomSource,
        ) -> Result<Option<Action>> {
            self.calls += 1;
            if self.calls == 1 {
                return Ok(None);
            }
            Ok(options.first().map(|o| o.action))
        }
    }

    #[test]
    fn test_interrupted_turn_resumes() {
        let mut ctl = quiet_controller(11);
        let mut player = GivesUpOnce { calls: 0 };
        let mut runner = MatchRunner::new(&mut ctl);

        let err = runner.run_turn_once(&mut player).unwrap_err();
        assert!(matches!(err, BjjError::InvalidInput(_)));
        assert_eq!(runner.controller.state().phase, MatchPhase::ActionSelection);
        assert_eq!(runner.controller.state().turn_number, 1);

        let outcome = runner.run_turn_once(&mut player).unwrap();
        assert!(outcome.is_none());
        assert_eq!(player.calls, 2);
        assert_eq!(runner.controller.state().phase, MatchPhase::TurnEnd);
        assert_eq!(runner.controller.state().turn_number, 1);

        let result = runner.run_turns(&mut player, 1).unwrap();
        assert_eq!(result.turns_played, 2);
        assert_eq!(runner.controller.state().turn_number, 2);
    }

    #[test]
    fn test_controller_errors_keep_their_kind() {
        // nothing for the player seat when standing on top
        let mut data = Catalog::builtin().to_file_data();
        data.moves
            .retain(|m| !(m.position == PositionId::StandingNeutral && m.role == Role::Top));
        let catalog = Catalog::from_file_data(data).unwrap();
        // coin: player on top
        let mut ctl = MatchController::new(
            Arc::new(catalog),
            Difficulty::Medium,
            Box::new(ScriptedRandom::new([1])),
        );
        let mut player = HeuristicController::new(Difficulty::Medium);

        let err = MatchRunner::new(&mut ctl)
            .run_turn_once(&mut player)
            .unwrap_err();

        assert!(matches!(
            err,
            BjjError::NoLegalCategories { role: Role::Top, .. }
        ));
        assert!(err.is_data_integrity());
        assert_eq!(ctl.state().phase, MatchPhase::ActionSelection);
    }

    #[test]
    fn test_verbosity_is_applied() {
        let mut ctl = quiet_controller(1);
        let runner = MatchRunner::new(&mut ctl).with_verbosity(VerbosityLevel::Silent);
        assert_eq!(runner.controller.logger().verbosity(), VerbosityLevel::Silent);
    }
}
