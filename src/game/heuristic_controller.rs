//! Heuristic controller for the player seat
//!
//! Plays the player side with the same scored-and-weighted selection the
//! computer opponent uses, at its own difficulty. Used for simulated matches
//! and tournaments.

use crate::core::Difficulty;
use crate::game::ai;
use crate::game::controller::{ActionOption, MatchStateView, PlayerController};
use crate::game::rng::RandomSource;
use crate::game::state::Action;
use crate::Result;

/// A controller that chooses with the positional heuristic
///
/// It owns no RNG: draws come from the match's random source so a seeded
/// match replays exactly.
#[derive(Debug, Clone)]
pub struct HeuristicController {
    difficulty: Difficulty,
    name: String,
}

impl HeuristicController {
    pub fn new(difficulty: Difficulty) -> Self {
        HeuristicController {
            difficulty,
            name: format!("heuristic-{}", difficulty.label().to_lowercase()),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

impl PlayerController for HeuristicController {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(
        &mut self,
        view: &MatchStateView,
        options: &[ActionOption],
        rng: &mut dyn RandomSource,
    ) -> Result<Option<Action>> {
        if options.is_empty() {
            return Ok(None);
        }
        ai::select_action(
            view.state(),
            view.catalog(),
            view.side(),
            self.difficulty,
            rng,
        )
        .map(Some)
    }
}
