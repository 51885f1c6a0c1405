//! Token markers held by each side
//!
//! A side holds at most [`MAX_TOKENS`] distinct tokens. Insertion order is
//! kept because a dominant loss strips the oldest one.

use crate::catalog::TokenKind;
use crate::core::{PerSide, Side};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Maximum number of tokens one side can hold
pub const MAX_TOKENS: usize = 2;

/// Bounded, duplicate-free, insertion-ordered token set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    tokens: SmallVec<[TokenKind; MAX_TOKENS]>,
}

impl TokenSet {
    pub fn new() -> Self {
        TokenSet {
            tokens: SmallVec::new(),
        }
    }

    /// Add a token. Refused if already held or the set is full.
    pub fn add(&mut self, token: TokenKind) -> bool {
        if self.contains(token) || self.is_full() {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Remove a token. Refused if absent.
    pub fn remove(&mut self, token: TokenKind) -> bool {
        if let Some(pos) = self.tokens.iter().position(|&t| t == token) {
            // Order-preserving remove keeps "oldest" meaningful
            self.tokens.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, token: TokenKind) -> bool {
        self.tokens.contains(&token)
    }

    /// The earliest-added token still held
    pub fn oldest(&self) -> Option<TokenKind> {
        self.tokens.first().copied()
    }

    pub fn is_full(&self) -> bool {
        self.tokens.len() >= MAX_TOKENS
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True when every required token is held
    pub fn satisfies(&self, required: &[TokenKind]) -> bool {
        required.iter().all(|&t| self.contains(t))
    }

    pub fn iter(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().copied()
    }

    pub fn as_slice(&self) -> &[TokenKind] {
        &self.tokens
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }
}

/// A token gained or lost by one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenChange {
    pub side: Side,
    pub token: TokenKind,
}

/// Both sides' token sets
pub type TokenTable = PerSide<TokenSet>;

impl PerSide<TokenSet> {
    pub fn add(&mut self, side: Side, token: TokenKind) -> bool {
        self[side].add(token)
    }

    pub fn remove(&mut self, side: Side, token: TokenKind) -> bool {
        self[side].remove(token)
    }

    /// Strip every listed token from both sides, ignoring absence
    ///
    /// Returns the removals that actually happened, player first.
    pub fn auto_clear(&mut self, clear_list: &[TokenKind]) -> Vec<TokenChange> {
        let mut removed = Vec::new();
        for &token in clear_list {
            for side in Side::BOTH {
                if self.remove(side, token) {
                    removed.push(TokenChange { side, token });
                }
            }
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_twice_is_refused() {
        let mut set = TokenSet::new();
        assert!(set.add(TokenKind::ArmIsolated));
        assert!(!set.add(TokenKind::ArmIsolated));
        assert_eq!(set.as_slice(), &[TokenKind::ArmIsolated]);
    }

    #[test]
    fn test_capacity_is_two() {
        let mut set = TokenSet::new();
        assert!(set.add(TokenKind::ArmIsolated));
        assert!(set.add(TokenKind::PostureBroken));
        assert!(set.is_full());
        assert!(!set.add(TokenKind::Seatbelt));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_absent_fails() {
        let mut set = TokenSet::new();
        assert!(!set.remove(TokenKind::LegIsolated));
        set.add(TokenKind::LegIsolated);
        assert!(set.remove(TokenKind::LegIsolated));
        assert!(set.is_empty());
    }

    #[test]
    fn test_oldest_follows_insertion_order() {
        let mut set = TokenSet::new();
        set.add(TokenKind::Seatbelt);
        set.add(TokenKind::HeadControlled);
        assert_eq!(set.oldest(), Some(TokenKind::Seatbelt));
        set.remove(TokenKind::Seatbelt);
        assert_eq!(set.oldest(), Some(TokenKind::HeadControlled));
    }

    #[test]
    fn test_satisfies() {
        let mut set = TokenSet::new();
        assert!(set.satisfies(&[]));
        assert!(!set.satisfies(&[TokenKind::ArmIsolated]));
        set.add(TokenKind::ArmIsolated);
        assert!(set.satisfies(&[TokenKind::ArmIsolated]));
    }

    #[test]
    fn test_auto_clear_both_sides() {
        let mut table = TokenTable::default();
        table.add(Side::Player, TokenKind::Seatbelt);
        table.add(Side::Ai, TokenKind::Seatbelt);
        table.add(Side::Ai, TokenKind::ArmIsolated);

        let removed = table.auto_clear(&[TokenKind::Seatbelt, TokenKind::LegIsolated]);

        assert_eq!(
            removed,
            vec![
                TokenChange { side: Side::Player, token: TokenKind::Seatbelt },
                TokenChange { side: Side::Ai, token: TokenKind::Seatbelt },
            ]
        );
        assert!(table[Side::Player].is_empty());
        assert_eq!(table[Side::Ai].as_slice(), &[TokenKind::ArmIsolated]);
    }
}
