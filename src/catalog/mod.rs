//! Static catalog of positions, techniques and tokens
//!
//! The catalog is read-only once built. It is either the built-in table set
//! ([`Catalog::builtin`]) or a JSON override loaded from disk. Every lookup
//! returns a [`Result`] so a gap in a hand-written catalog surfaces as
//! [`BjjError::MissingCatalogEntry`] instead of a panic.

mod builtin;
pub mod ids;

pub use ids::{Category, PositionId, TechniqueId, TokenKind};

use crate::core::{Role, TokenSet};
use crate::{BjjError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which fighter naturally holds the initiative in a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initiative {
    Top,
    Bottom,
    Neutral,
}

/// A position record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    /// How much the top fighter controls the bottom one (display only)
    pub control: u8,
    pub initiative: Initiative,
    /// Tokens stripped from both sides when the match moves here
    #[serde(default)]
    pub auto_clear_tokens: Vec<TokenKind>,
}

/// Risk rating of a technique
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Risk {
    #[default]
    Safe,
    Risky,
}

/// Where a technique takes the match when it wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub position: PositionId,
    /// Role of the technique's user after the transition
    pub user_becomes_top: bool,
}

/// A technique definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technique {
    pub id: TechniqueId,
    pub name: String,
    pub category: Category,
    pub modifier: i32,
    #[serde(default)]
    pub is_submission: bool,
    #[serde(default)]
    pub transition: Option<Transition>,
    /// Points scored when the transition lands cleanly
    #[serde(default)]
    pub scoring_points: u32,
    #[serde(default)]
    pub token_reward: Option<TokenKind>,
    #[serde(default)]
    pub token_remove: Option<TokenKind>,
    #[serde(default)]
    pub risk: Risk,
    #[serde(default)]
    pub required_tokens: Vec<TokenKind>,
}

impl Technique {
    pub fn is_risky(&self) -> bool {
        self.risk == Risk::Risky
    }

    /// Whether a side holding `tokens` may use this technique
    pub fn usable_with(&self, tokens: &TokenSet) -> bool {
        tokens.satisfies(&self.required_tokens)
    }
}

/// Display metadata for a token kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub kind: TokenKind,
    pub name: String,
    pub icon: String,
}

/// Techniques offered to one role in one position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveList {
    pub position: PositionId,
    pub role: Role,
    pub techniques: Vec<TechniqueId>,
}

/// On-disk catalog layout (plain lists, JSON friendly)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub positions: Vec<Position>,
    pub techniques: Vec<Technique>,
    pub tokens: Vec<TokenInfo>,
    pub moves: Vec<MoveList>,
}

/// Matchup modifier for `category` facing `opponent`
///
/// +1 when the category counters the opponent's, -1 when it is countered,
/// 0 for mirrors and neutral pairs.
pub fn matchup_modifier(category: Category, opponent: Category) -> i32 {
    if beats(category, opponent) {
        1
    } else if beats(opponent, category) {
        -1
    } else {
        0
    }
}

fn beats(a: Category, b: Category) -> bool {
    use Category::*;
    matches!(
        (a, b),
        (Attack, Control)
            | (Control, Defense)
            | (Control, Reversal)
            | (Defense, Attack)
            | (Reversal, Attack)
            | (Reversal, Defense)
    )
}

/// Read-only registry of everything the engine looks up
#[derive(Debug, Clone)]
pub struct Catalog {
    positions: FxHashMap<PositionId, Position>,
    techniques: FxHashMap<TechniqueId, Technique>,
    tokens: FxHashMap<TokenKind, TokenInfo>,
    moves: FxHashMap<(PositionId, Role), Vec<TechniqueId>>,
}

impl Catalog {
    /// The built-in catalog
    pub fn builtin() -> Self {
        // The built-in tables are covered by test_builtin_is_consistent
        Catalog::index(builtin::catalog_file())
    }

    /// Build a catalog from its on-disk layout, checking every reference
    pub fn from_file_data(file: CatalogFile) -> Result<Self> {
        let catalog = Catalog::index(file);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a JSON catalog
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| BjjError::SerializationError(e.to_string()))?;
        Catalog::from_file_data(file)
    }

    /// Load a JSON catalog from disk
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Catalog::from_json_str(&json)
    }

    /// Export to the on-disk layout, sorted for stable output
    pub fn to_file_data(&self) -> CatalogFile {
        let mut positions: Vec<Position> = self.positions.values().cloned().collect();
        positions.sort_by_key(|p| p.id);
        let mut techniques: Vec<Technique> = self.techniques.values().cloned().collect();
        techniques.sort_by_key(|t| t.id);
        let mut tokens: Vec<TokenInfo> = self.tokens.values().cloned().collect();
        tokens.sort_by_key(|t| t.kind);
        let mut moves: Vec<MoveList> = self
            .moves
            .iter()
            .map(|(&(position, role), techniques)| MoveList {
                position,
                role,
                techniques: techniques.clone(),
            })
            .collect();
        moves.sort_by_key(|m| (m.position, m.role == Role::Bottom));
        CatalogFile {
            positions,
            techniques,
            tokens,
            moves,
        }
    }

    fn index(file: CatalogFile) -> Self {
        Catalog {
            positions: file.positions.into_iter().map(|p| (p.id, p)).collect(),
            techniques: file.techniques.into_iter().map(|t| (t.id, t)).collect(),
            tokens: file.tokens.into_iter().map(|t| (t.kind, t)).collect(),
            moves: file
                .moves
                .into_iter()
                .map(|m| ((m.position, m.role), m.techniques))
                .collect(),
        }
    }

    /// Check that every reference in the catalog resolves
    pub fn validate(&self) -> Result<()> {
        for position in self.positions.values() {
            for &token in &position.auto_clear_tokens {
                self.token_info(token)?;
            }
        }
        for technique in self.techniques.values() {
            if let Some(transition) = technique.transition {
                self.position(transition.position)?;
            }
            let referenced = technique
                .token_reward
                .iter()
                .chain(technique.token_remove.iter())
                .chain(technique.required_tokens.iter());
            for &token in referenced {
                self.token_info(token)?;
            }
        }
        for (&(position, role), techniques) in &self.moves {
            self.position(position)?;
            for &id in techniques {
                self.technique(id).map_err(|_| {
                    BjjError::MissingCatalogEntry(format!(
                        "technique {id} listed for {position} ({role})"
                    ))
                })?;
            }
        }
        Ok(())
    }

    pub fn position(&self, id: PositionId) -> Result<&Position> {
        self.positions
            .get(&id)
            .ok_or_else(|| BjjError::MissingCatalogEntry(format!("position {id}")))
    }

    pub fn technique(&self, id: TechniqueId) -> Result<&Technique> {
        self.techniques
            .get(&id)
            .ok_or_else(|| BjjError::MissingCatalogEntry(format!("technique {id}")))
    }

    pub fn token_info(&self, kind: TokenKind) -> Result<&TokenInfo> {
        self.tokens
            .get(&kind)
            .ok_or_else(|| BjjError::MissingCatalogEntry(format!("token {kind}")))
    }

    /// Display name of a token
    pub fn token_name(&self, kind: TokenKind) -> Result<&str> {
        Ok(self.token_info(kind)?.name.as_str())
    }

    /// Techniques offered to `role` at `position` in `category`, in table order
    pub fn techniques_for(
        &self,
        position: PositionId,
        role: Role,
        category: Category,
    ) -> Result<Vec<&Technique>> {
        let Some(ids) = self.moves.get(&(position, role)) else {
            return Ok(Vec::new());
        };
        let mut techniques = Vec::with_capacity(ids.len());
        for &id in ids {
            let technique = self.technique(id)?;
            if technique.category == category {
                techniques.push(technique);
            }
        }
        Ok(techniques)
    }

    /// Categories with at least one technique for `role` at `position`
    pub fn available_categories(&self, position: PositionId, role: Role) -> Result<Vec<Category>> {
        let mut categories = Vec::new();
        for category in Category::ALL {
            if !self.techniques_for(position, role, category)?.is_empty() {
                categories.push(category);
            }
        }
        Ok(categories)
    }
}
