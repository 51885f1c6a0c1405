//! Player controller trait and match state view
//!
//! The runner asks a [`PlayerController`] for the player seat's selection
//! each turn. Controllers inspect a read-only [`MatchStateView`] and pick one
//! of the offered [`ActionOption`]s. The view also produces the plain-data
//! hints a front end needs (button states, technique descriptions, outcome
//! lines) without exposing anything mutable.

use crate::catalog::{Catalog, Category, Initiative, Technique};
use crate::core::{Role, Side};
use crate::game::resolution::Resolution;
use crate::game::rng::RandomSource;
use crate::game::state::{Action, MatchState};
use crate::game::MatchResult;
use crate::Result;
use serde::Serialize;

/// How a category button should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ButtonState {
    /// The natural choice for the current role
    Optimal,
    Neutral,
    /// Every technique in the category is risky
    Risky,
    /// Nothing in this category for the current role
    Disabled,
}

/// A category as offered to one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub category: Category,
    pub state: ButtonState,
}

impl CategoryOption {
    pub fn is_available(&self) -> bool {
        self.state != ButtonState::Disabled
    }
}

/// A selectable (category, technique) pair with display data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOption {
    pub action: Action,
    pub name: String,
    pub description: String,
    /// Whether the side's tokens meet the technique's requirement
    pub usable: bool,
}

/// Read-only view of a match from one side's seat
pub struct MatchStateView<'a> {
    state: &'a MatchState,
    catalog: &'a Catalog,
    side: Side,
}

impl<'a> MatchStateView<'a> {
    pub fn new(state: &'a MatchState, catalog: &'a Catalog, side: Side) -> Self {
        MatchStateView {
            state,
            catalog,
            side,
        }
    }

    pub fn state(&self) -> &'a MatchState {
        self.state
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn role(&self) -> Role {
        self.state.role_of(self.side)
    }

    pub fn score(&self) -> u32 {
        self.state.scores[self.side]
    }

    pub fn opponent_score(&self) -> u32 {
        self.state.scores[self.side.opponent()]
    }

    /// Whether this side's tokens allow `technique`
    pub fn can_use(&self, technique: &Technique) -> bool {
        technique.usable_with(&self.state.tokens[self.side])
    }

    /// Categories with at least one technique for this side
    pub fn categories(&self) -> Result<Vec<Category>> {
        self.catalog
            .available_categories(self.state.position, self.role())
    }

    /// All four categories with their button state
    pub fn category_options(&self) -> Result<Vec<CategoryOption>> {
        let role = self.role();
        let optimal = match role {
            Role::Top => Category::Attack,
            Role::Bottom => Category::Reversal,
        };

        let mut options = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let techniques = self
                .catalog
                .techniques_for(self.state.position, role, category)?;
            let state = if techniques.is_empty() {
                ButtonState::Disabled
            } else if category == optimal {
                ButtonState::Optimal
            } else if techniques.iter().all(|t| t.is_risky()) {
                ButtonState::Risky
            } else {
                ButtonState::Neutral
            };
            options.push(CategoryOption { category, state });
        }
        Ok(options)
    }

    /// Techniques in one category, locked ones included
    pub fn technique_options(&self, category: Category) -> Result<Vec<ActionOption>> {
        let techniques = self
            .catalog
            .techniques_for(self.state.position, self.role(), category)?;
        techniques
            .into_iter()
            .map(|technique| {
                Ok(ActionOption {
                    action: Action::new(category, technique.id),
                    name: technique.name.clone(),
                    description: self.describe_technique(technique)?,
                    usable: self.can_use(technique),
                })
            })
            .collect()
    }

    /// Everything this side may lock in this turn
    ///
    /// Usable techniques across every category. If the side's tokens unlock
    /// nothing, every legal technique is offered instead, minus those whose
    /// reward the side already holds.
    pub fn selectable_options(&self) -> Result<Vec<ActionOption>> {
        let mut all = Vec::new();
        for category in self.categories()? {
            all.extend(self.technique_options(category)?);
        }

        if all.iter().any(|o| o.usable) {
            all.retain(|o| o.usable);
            return Ok(all);
        }

        let held = &self.state.tokens[self.side];
        let mut fallback = Vec::with_capacity(all.len());
        for option in all {
            let technique = self.catalog.technique(option.action.technique)?;
            if !technique.token_reward.is_some_and(|t| held.contains(t)) {
                fallback.push(option);
            }
        }
        Ok(fallback)
    }

    /// One-line summary of what a technique does
    pub fn describe_technique(&self, technique: &Technique) -> Result<String> {
        let mut parts = Vec::new();
        if technique.is_submission {
            parts.push("Submission attempt".to_string());
        }
        if let Some(transition) = technique.transition {
            parts.push(format!("→ {}", self.catalog.position(transition.position)?.name));
        }
        if let Some(reward) = technique.token_reward {
            parts.push(format!("Earns: {}", self.catalog.token_name(reward)?));
        }
        if let Some(remove) = technique.token_remove {
            parts.push(format!("Removes opp: {}", self.catalog.token_name(remove)?));
        }
        if technique.is_risky() {
            parts.push("Risky".to_string());
        }
        if parts.is_empty() {
            parts.push("Maintain position".to_string());
        }
        Ok(parts.join(" · "))
    }

    /// Initiative badge text
    pub fn initiative_text(&self) -> Result<&'static str> {
        if self.role().is_top() {
            return Ok("You: Top Position");
        }
        let position = self.catalog.position(self.state.position)?;
        Ok(if position.initiative == Initiative::Neutral {
            "Neutral"
        } else {
            "You: Bottom Position"
        })
    }

    /// Headline for a resolved exchange from this side's seat
    pub fn outcome_text(&self, resolution: &Resolution) -> Result<String> {
        let Some(winner) = resolution.winner else {
            return Ok("Even exchange!".to_string());
        };
        let subject = if winner == self.side {
            "You win"
        } else {
            "Opponent wins"
        };
        match resolution.winning_technique {
            Some(id) if resolution.submission => {
                Ok(format!("{subject} by {}!", self.catalog.technique(id)?.name))
            }
            _ => Ok(format!(
                "{subject} the exchange! (margin: {})",
                resolution.margin
            )),
        }
    }

    /// Tier label for a resolved exchange
    pub fn tier_text(&self, resolution: &Resolution) -> &'static str {
        if resolution.is_draw() {
            "Stalemate"
        } else {
            resolution.tier.label()
        }
    }

    /// Score line, this side first
    pub fn scoreboard(&self) -> String {
        let own = self.side;
        let opp = own.opponent();
        format!(
            "You {} ({} adv) · Opponent {} ({} adv)",
            self.state.scores[own],
            self.state.advantages[own],
            self.state.scores[opp],
            self.state.advantages[opp]
        )
    }
}

/// Player seat controller
///
/// Implement this trait to drive the player side from a UI, a script or an
/// automated policy. The runner calls it once per turn.
pub trait PlayerController {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Choose one of `options`
    ///
    /// `rng` is the match's shared random source; controllers that draw from
    /// it stay reproducible under a seed. `Ok(None)` means there is nothing
    /// to choose or input ran out; errors from the catalog or the input
    /// stream are returned as they are.
    fn choose_action(
        &mut self,
        view: &MatchStateView,
        options: &[ActionOption],
        rng: &mut dyn RandomSource,
    ) -> Result<Option<Action>>;

    /// Called after every resolution
    fn on_resolution(&mut self, _view: &MatchStateView, _resolution: &Resolution) {}

    /// Called once when the match ends
    fn on_match_end(&mut self, _view: &MatchStateView, _result: &MatchResult) {}
}
