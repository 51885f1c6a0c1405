//! Computer opponent action selection
//!
//! Every legal, token-usable (category, technique) pair is scored with an
//! additive positional heuristic. A difficulty-weighted roll then decides
//! whether to pick from the near-best options or from everything else, so
//! easier opponents make visibly worse choices without ever playing illegally.
//!
//! Nothing here is tied to [`Side::Ai`]: the same selection drives the player
//! seat in simulated matches.

use crate::catalog::{Catalog, Category, Technique};
use crate::core::{Difficulty, Side};
use crate::game::rng::RandomSource;
use crate::game::state::{Action, MatchState, MAX_CONTROL};
use crate::{BjjError, Result};

/// A candidate action and its heuristic score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredOption {
    pub action: Action,
    pub score: f64,
}

/// Heuristic value of `technique` for `side` in the current state
pub fn score_option(state: &MatchState, side: Side, technique: &Technique) -> f64 {
    let opponent = side.opponent();
    let own_tokens = &state.tokens[side];
    let own_control = state.control[side];
    let opp_control = f64::from(state.control[opponent]);
    let on_bottom = !state.role_of(side).is_top();

    let mut score = f64::from(technique.modifier);

    if technique.is_submission {
        score += 3.0;
        if technique.usable_with(own_tokens) {
            score += 4.0;
        }
    }

    if let Some(transition) = technique.transition {
        if technique.scoring_points > 0 {
            score += 1.5 * f64::from(technique.scoring_points);
        }
        // Escapes matter more the harder the opponent is holding us down
        if !transition.user_becomes_top && on_bottom {
            score += 2.0 * opp_control;
        }
    }

    if technique.token_reward.is_some() && !own_tokens.is_full() {
        score += 3.0;
    }

    if technique.token_remove.is_some() && !state.tokens[opponent].is_empty() {
        score += 2.0;
    }

    if technique.is_risky() {
        score -= 1.0;
    }

    match technique.category {
        Category::Control => {
            if opp_control > 0.0 {
                score += 2.0 * opp_control;
            } else if own_control < MAX_CONTROL {
                score += 2.0;
            }
        }
        Category::Defense if state.control[opponent] >= MAX_CONTROL => score += 2.0,
        Category::Reversal => score += opp_control,
        _ => {}
    }

    score.max(0.0)
}

/// Every legal option for `side` that its tokens allow, scored
///
/// Fails when the catalog offers the side's role nothing at all in the
/// current position. An empty list means techniques exist but none is usable.
pub fn candidate_options(
    state: &MatchState,
    catalog: &Catalog,
    side: Side,
) -> Result<Vec<ScoredOption>> {
    let role = state.role_of(side);
    let categories = catalog.available_categories(state.position, role)?;
    if categories.is_empty() {
        return Err(BjjError::NoLegalCategories {
            position: state.position,
            role,
        });
    }

    let mut options = Vec::new();
    for category in categories {
        for technique in catalog.techniques_for(state.position, role, category)? {
            if !technique.usable_with(&state.tokens[side]) {
                continue;
            }
            options.push(ScoredOption {
                action: Action::new(category, technique.id),
                score: score_option(state, side, technique),
            });
        }
    }
    Ok(options)
}

/// Token-ignoring fallback, skipping rewards the side already holds
fn fallback_options(state: &MatchState, catalog: &Catalog, side: Side) -> Result<Vec<ScoredOption>> {
    let role = state.role_of(side);
    let held = &state.tokens[side];

    let mut options = Vec::new();
    for category in catalog.available_categories(state.position, role)? {
        for technique in catalog.techniques_for(state.position, role, category)? {
            if technique.token_reward.is_some_and(|t| held.contains(t)) {
                continue;
            }
            options.push(ScoredOption {
                action: Action::new(category, technique.id),
                score: 1.0,
            });
        }
    }
    Ok(options)
}

/// Scored options `side` will choose from, best first
///
/// This is the usable set when it is non-empty, otherwise the fallback set.
pub fn ranked_options(state: &MatchState, catalog: &Catalog, side: Side) -> Result<Vec<ScoredOption>> {
    let mut options = candidate_options(state, catalog, side)?;
    if options.is_empty() {
        options = fallback_options(state, catalog, side)?;
    }
    if options.is_empty() {
        return Err(BjjError::NoUsableTechniques {
            position: state.position,
            role: state.role_of(side),
        });
    }

    options.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(options)
}

/// Difficulty-weighted pick from ranked options
///
/// Draws one percent roll and then one index. `ranked` must be non-empty
/// and sorted best first.
pub fn pick_weighted(
    ranked: &[ScoredOption],
    difficulty: Difficulty,
    rng: &mut dyn RandomSource,
) -> Option<Action> {
    let best = ranked.first()?.score;
    let split = ranked
        .iter()
        .position(|o| o.score < best - 1.0)
        .unwrap_or(ranked.len());
    let (top_tier, rest) = ranked.split_at(split);

    let pool = if rng.roll_percent() < difficulty.optimal_weight_percent() || rest.is_empty() {
        top_tier
    } else {
        rest
    };
    Some(pool[rng.pick_index(pool.len())].action)
}

/// Choose an action for `side`
pub fn select_action(
    state: &MatchState,
    catalog: &Catalog,
    side: Side,
    difficulty: Difficulty,
    rng: &mut dyn RandomSource,
) -> Result<Action> {
    let ranked = ranked_options(state, catalog, side)?;
    pick_weighted(&ranked, difficulty, rng).ok_or(BjjError::NoUsableTechniques {
        position: state.position,
        role: state.role_of(side),
    })
}
