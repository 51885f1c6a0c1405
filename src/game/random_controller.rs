//! Random controller for testing and baseline play
//!
//! Picks uniformly among the offered options. Serves as a baseline for the
//! heuristic controller in tournaments.

use crate::game::controller::{ActionOption, MatchStateView, PlayerController};
use crate::game::rng::RandomSource;
use crate::game::state::Action;
use crate::Result;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// A controller that makes random choices with its own RNG
///
/// The RNG is separate from the match's random source, so swapping this
/// controller in does not shift the dice.
pub struct RandomController {
    rng: Box<dyn RngCore + Send>,
}

impl RandomController {
    pub fn new() -> Self {
        RandomController {
            rng: Box::new(Xoshiro256PlusPlus::from_entropy()),
        }
    }

    /// Seeded RNG for deterministic runs
    pub fn with_seed(seed: u64) -> Self {
        RandomController {
            rng: Box::new(Xoshiro256PlusPlus::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController for RandomController {
    fn name(&self) -> &str {
        "random"
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
        let index = self.rng.gen_range(0..options.len());
        Ok(Some(options[index].action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::core::{Difficulty, Side};
    use crate::game::rng::ScriptedRandom;
    use crate::game::MatchState;

    #[test]
    fn test_choose_from_empty_options() {
        let catalog = Catalog::builtin();
        let state = MatchState::new(Difficulty::Medium);
        let view = MatchStateView::new(&state, &catalog, Side::Player);
        let mut controller = RandomController::with_seed(42);
        let mut rng = ScriptedRandom::default();
        assert_eq!(controller.choose_action(&view, &[], &mut rng).unwrap(), None);
    }

    #[test]
    fn test_choice_is_offered_and_seeded() {
        let catalog = Catalog::builtin();
        let state = MatchState::new(Difficulty::Medium);
        let view = MatchStateView::new(&state, &catalog, Side::Player);
        let options = view.selectable_options().unwrap();

        let mut first = RandomController::with_seed(42);
        let mut second = RandomController::with_seed(42);
        let mut rng = ScriptedRandom::default();
        for _ in 0..10 {
            let a = first.choose_action(&view, &options, &mut rng).unwrap().unwrap();
            let b = second.choose_action(&view, &options, &mut rng).unwrap().unwrap();
            assert_eq!(a, b);
            assert!(options.iter().any(|o| o.action == a));
        }
        // the match source is never touched
        assert_eq!(rng.draws(), 0);
    }
}
