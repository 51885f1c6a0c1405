//! Turn resolution: scoring, outcome tiers and state effects
//!
//! Both locked actions are scored as
//! `control + matchup + technique modifier + held tokens + d6`.
//! The higher total wins the exchange; the margin decides how much the win
//! is worth. Every mutation applied to the [`MatchState`] is mirrored in the
//! returned [`Resolution`] so the presentation layer never has to diff state.

use crate::catalog::{matchup_modifier, Catalog, Category, PositionId, Technique, TechniqueId, TokenKind};
use crate::core::{Side, TokenChange};
use crate::game::rng::RandomSource;
use crate::game::state::{MatchState, MAX_CONTROL};
use crate::{BjjError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The five summed terms of one side's turn total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub control: i32,
    pub matchup: i32,
    pub technique: i32,
    pub tokens: i32,
    pub die: i32,
    pub total: i32,
}

impl ScoreBreakdown {
    pub fn new(control: i32, matchup: i32, technique: i32, tokens: i32, die: i32) -> Self {
        ScoreBreakdown {
            control,
            matchup,
            technique,
            tokens,
            die,
            total: control + matchup + technique + tokens + die,
        }
    }

    /// One-line breakdown for display
    pub fn describe(&self) -> String {
        format!(
            "Ctrl: {} · Match: {:+} · Tech: {:+} · Tok: +{} · Die: {} = {}",
            self.control, self.matchup, self.technique, self.tokens, self.die, self.total
        )
    }
}

/// Outcome classification by margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutcomeTier {
    /// Margin 0-1
    Minor,
    /// Margin 2-3
    Major,
    /// Margin 4+
    Dominant,
}

impl OutcomeTier {
    pub fn label(self) -> &'static str {
        match self {
            OutcomeTier::Minor => "Minor Exchange",
            OutcomeTier::Major => "Major Exchange",
            OutcomeTier::Dominant => "Dominant Exchange",
        }
    }
}

/// Classify a margin into its tier
pub fn classify_tier(margin: u32) -> OutcomeTier {
    match margin {
        0..=1 => OutcomeTier::Minor,
        2..=3 => OutcomeTier::Major,
        _ => OutcomeTier::Dominant,
    }
}

/// A position move caused by the winning technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    pub from: PositionId,
    pub to: PositionId,
    pub player_is_top: bool,
}

/// Direction of a control shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlShiftKind {
    /// The loser's control was reduced
    Strip,
    /// The winner's control was increased
    Build,
}

/// A single control point moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlShift {
    /// Side whose counter changed
    pub side: Side,
    pub kind: ControlShiftKind,
    /// Counter value after the shift
    pub new_value: u8,
}

/// Everything one turn did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub player_score: ScoreBreakdown,
    pub ai_score: ScoreBreakdown,
    pub margin: u32,
    pub tier: OutcomeTier,
    /// None on a draw
    pub winner: Option<Side>,
    pub loser: Option<Side>,
    pub winning_technique: Option<TechniqueId>,
    pub points_awarded: u32,
    pub advantages_awarded: u32,
    pub tokens_gained: Vec<TokenChange>,
    pub tokens_lost: Vec<TokenChange>,
    pub position_change: Option<PositionChange>,
    pub control_shift: Option<ControlShift>,
    pub submission: bool,
    pub narratives: Vec<String>,
}

impl Resolution {
    fn new(player_score: ScoreBreakdown, ai_score: ScoreBreakdown) -> Self {
        let margin = player_score.total.abs_diff(ai_score.total);
        Resolution {
            player_score,
            ai_score,
            margin,
            tier: classify_tier(margin),
            winner: None,
            loser: None,
            winning_technique: None,
            points_awarded: 0,
            advantages_awarded: 0,
            tokens_gained: Vec::new(),
            tokens_lost: Vec::new(),
            position_change: None,
            control_shift: None,
            submission: false,
            narratives: Vec::new(),
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    pub fn score(&self, side: Side) -> &ScoreBreakdown {
        match side {
            Side::Player => &self.player_score,
            Side::Ai => &self.ai_score,
        }
    }
}

/// Score one side's locked action, rolling its die
pub fn calculate_score(
    state: &MatchState,
    catalog: &Catalog,
    side: Side,
    rng: &mut dyn RandomSource,
) -> Result<ScoreBreakdown> {
    let action = locked_action(state, side)?;
    let opponent = locked_action(state, side.opponent())?;
    let technique = catalog.technique(action.technique)?;

    Ok(ScoreBreakdown::new(
        i32::from(state.control[side]),
        matchup_modifier(action.category, opponent.category),
        technique.modifier,
        state.tokens[side].len() as i32,
        rng.roll_die() as i32,
    ))
}

fn locked_action(state: &MatchState, side: Side) -> Result<crate::game::Action> {
    state
        .action(side)
        .ok_or_else(|| BjjError::InvalidInput(format!("no action locked for {side}")))
}

/// Resolve the locked actions and apply every effect to `state`
///
/// The player's die is rolled before the AI's. A margin of zero is a true
/// no-op: nothing in `state` changes.
pub fn resolve(
    state: &mut MatchState,
    catalog: &Catalog,
    rng: &mut dyn RandomSource,
) -> Result<Resolution> {
    let player_score = calculate_score(state, catalog, Side::Player, rng)?;
    let ai_score = calculate_score(state, catalog, Side::Ai, rng)?;
    let mut resolution = Resolution::new(player_score, ai_score);

    if resolution.margin == 0 {
        resolution
            .narratives
            .push("Stalemate! Neither fighter gives an inch.".to_string());
        return Ok(resolution);
    }

    let winner = if player_score.total > ai_score.total {
        Side::Player
    } else {
        Side::Ai
    };
    let loser = winner.opponent();
    let action = locked_action(state, winner)?;
    let technique = catalog.technique(action.technique)?;
    let tier = resolution.tier;

    resolution.winner = Some(winner);
    resolution.loser = Some(loser);
    resolution.winning_technique = Some(technique.id);

    if technique.is_submission && tier == OutcomeTier::Dominant {
        resolution.submission = true;
        resolution
            .narratives
            .push(format!("{} locked in! Submission!", technique.name));
        return Ok(resolution);
    }

    apply_control_shift(state, &mut resolution, winner, action.category);

    if tier != OutcomeTier::Minor {
        apply_token_economy(state, catalog, rng, &mut resolution, winner, technique)?;
    }

    apply_transition_and_scoring(state, catalog, &mut resolution, winner, technique)?;

    Ok(resolution)
}

/// Control wins strip a point from the loser first, otherwise build one
fn apply_control_shift(
    state: &mut MatchState,
    resolution: &mut Resolution,
    winner: Side,
    category: Category,
) {
    if category != Category::Control {
        return;
    }
    let loser = winner.opponent();

    let shift = if state.control[loser] >= 1 {
        state.control[loser] -= 1;
        resolution.narratives.push(format!(
            "{} a control point.",
            winner.subject("strip", "strips")
        ));
        ControlShift {
            side: loser,
            kind: ControlShiftKind::Strip,
            new_value: state.control[loser],
        }
    } else if state.control[winner] < MAX_CONTROL {
        state.control[winner] += 1;
        resolution.narratives.push(format!(
            "{} a control point.",
            winner.subject("build", "builds")
        ));
        ControlShift {
            side: winner,
            kind: ControlShiftKind::Build,
            new_value: state.control[winner],
        }
    } else {
        return;
    };

    resolution.control_shift = Some(shift);
}

/// Token gains and losses for Major and Dominant wins
fn apply_token_economy(
    state: &mut MatchState,
    catalog: &Catalog,
    rng: &mut dyn RandomSource,
    resolution: &mut Resolution,
    winner: Side,
    technique: &Technique,
) -> Result<()> {
    let loser = winner.opponent();
    let dominant = resolution.tier == OutcomeTier::Dominant;

    if let Some(reward) = technique.token_reward {
        if state.tokens.add(winner, reward) {
            record_gain(catalog, resolution, winner, reward)?;
        }
    }

    if dominant && technique.token_reward.is_none() && !state.tokens[winner].is_full() {
        let candidates: SmallVec<[TokenKind; 5]> = TokenKind::BONUS_POOL
            .iter()
            .copied()
            .filter(|&t| !state.tokens[winner].contains(t))
            .collect();
        if !candidates.is_empty() {
            let bonus = candidates[rng.pick_index(candidates.len())];
            if state.tokens.add(winner, bonus) {
                record_gain(catalog, resolution, winner, bonus)?;
            }
        }
    }

    if let Some(strip) = technique.token_remove {
        if state.tokens.remove(loser, strip) {
            record_loss(catalog, resolution, loser, strip)?;
        }
    }

    if dominant {
        if let Some(oldest) = state.tokens[loser].oldest() {
            state.tokens.remove(loser, oldest);
            record_loss(catalog, resolution, loser, oldest)?;
        }
    }

    Ok(())
}

/// Position change plus the IBJJF-style points/advantage split
fn apply_transition_and_scoring(
    state: &mut MatchState,
    catalog: &Catalog,
    resolution: &mut Resolution,
    winner: Side,
    technique: &Technique,
) -> Result<()> {
    let clean = resolution.tier != OutcomeTier::Minor;

    let Some(transition) = technique.transition else {
        if clean {
            award_advantage(state, resolution, winner, "Near miss!");
        } else {
            resolution.narratives.push(
                "A tense exchange: neither fighter gains much ground.".to_string(),
            );
        }
        return Ok(());
    };

    let destination = catalog.position(transition.position)?;
    let from = state.position;
    state.position = transition.position;
    state.player_is_top = match winner {
        Side::Player => transition.user_becomes_top,
        Side::Ai => !transition.user_becomes_top,
    };
    resolution.position_change = Some(PositionChange {
        from,
        to: transition.position,
        player_is_top: state.player_is_top,
    });
    resolution
        .narratives
        .push(format!("Transition to {}!", destination.name));

    for cleared in state.tokens.auto_clear(&destination.auto_clear_tokens) {
        resolution.narratives.push(format!(
            "{} {} in the new position.",
            cleared.side.subject("lose", "loses"),
            catalog.token_name(cleared.token)?
        ));
        resolution.tokens_lost.push(cleared);
    }

    if technique.scoring_points > 0 {
        if clean {
            let points = technique.scoring_points;
            state.scores[winner] += points;
            resolution.points_awarded = points;
            resolution.narratives.push(format!(
                "{} {} point{}!",
                winner.subject("score", "scores"),
                points,
                if points == 1 { "" } else { "s" }
            ));
        } else {
            award_advantage(state, resolution, winner, "Not quite clean.");
        }
    }

    Ok(())
}

fn award_advantage(state: &mut MatchState, resolution: &mut Resolution, side: Side, lead: &str) {
    state.advantages[side] += 1;
    resolution.advantages_awarded = 1;
    resolution.narratives.push(format!(
        "{lead} {} an advantage.",
        side.subject("earn", "earns")
    ));
}

fn record_gain(
    catalog: &Catalog,
    resolution: &mut Resolution,
    side: Side,
    token: TokenKind,
) -> Result<()> {
    resolution.narratives.push(format!(
        "{} {}!",
        side.subject("gain", "gains"),
        catalog.token_name(token)?
    ));
    resolution.tokens_gained.push(TokenChange { side, token });
    Ok(())
}

fn record_loss(
    catalog: &Catalog,
    resolution: &mut Resolution,
    side: Side,
    token: TokenKind,
) -> Result<()> {
    resolution.narratives.push(format!(
        "{} {}!",
        side.subject("lose", "loses"),
        catalog.token_name(token)?
    ));
    resolution.tokens_lost.push(TokenChange { side, token });
    Ok(())
}
