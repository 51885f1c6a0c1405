//! Fixed script controller for deterministic testing
//!
//! Follows a predetermined sequence of option indices. Once the script is
//! exhausted it defaults to the first option (index 0).

use crate::game::controller::{ActionOption, MatchStateView, PlayerController};
use crate::game::rng::RandomSource;
use crate::game::state::Action;
use crate::Result;

/// A controller that follows a fixed script of choices
///
/// Out-of-range indices also fall back to option 0.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FixedScriptController {
    script: Vec<usize>,
    /// Current position in the script
    pub current_index: usize,
}

impl FixedScriptController {
    /// # Example
    /// ```
    /// use bjj_engine::game::FixedScriptController;
    ///
    /// // Chooses options 2, 0, 1, then 0 forever
    /// let controller = FixedScriptController::new(vec![2, 0, 1]);
    /// assert!(!controller.is_exhausted());
    /// ```
    pub fn new(script: Vec<usize>) -> Self {
        FixedScriptController {
            script,
            current_index: 0,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.script.len()
    }

    fn next_choice(&mut self) -> usize {
        match self.script.get(self.current_index) {
            Some(&choice) => {
                self.current_index += 1;
                choice
            }
            None => 0,
        }
    }
}

impl PlayerController for FixedScriptController {
    fn name(&self) -> &str {
        "script"
    }

    fn choose_action(
        &mut self,
        _view: &MatchStateView,
        options: &[ActionOption],
        _rng: &mut dyn RandomSource,
    ) -> Result<Option<Action>> {
        if options.is_empty() {
            return Ok(None);
        }
        let choice = self.next_choice();
        let option = options.get(choice).unwrap_or(&options[0]);
        Ok(Some(option.action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, TechniqueId};
    use crate::core::{Difficulty, Side};
    use crate::game::rng::ScriptedRandom;
    use crate::game::MatchState;

    #[test]
    fn test_follows_script_then_defaults() {
        let catalog = Catalog::builtin();
        let state = MatchState::new(Difficulty::Medium);
        let view = MatchStateView::new(&state, &catalog, Side::Player);
        // Takedown, Guard Pull, Snap Down, Collar Tie, ...
        let options = view.selectable_options().unwrap();
        let mut rng = ScriptedRandom::default();

        let mut controller = FixedScriptController::new(vec![1, 3, 99]);
        let picks: Vec<TechniqueId> = (0..4)
            .map(|_| {
                controller
                    .choose_action(&view, &options, &mut rng)
                    .unwrap()
                    .unwrap()
                    .technique
            })
            .collect();

        assert_eq!(
            picks,
            vec![
                TechniqueId::GuardPull,
                TechniqueId::CollarTie,
                TechniqueId::Takedown,
                TechniqueId::Takedown
            ]
        );
        assert!(controller.is_exhausted());
    }

    #[test]
    fn test_empty_options_does_not_consume() {
        let catalog = Catalog::builtin();
        let state = MatchState::new(Difficulty::Medium);
        let view = MatchStateView::new(&state, &catalog, Side::Player);
        let mut rng = ScriptedRandom::default();
        let mut controller = FixedScriptController::new(vec![2]);

        assert!(controller.choose_action(&view, &[], &mut rng).unwrap().is_none());
        assert_eq!(controller.current_index, 0);
    }
}
