//! Core match types shared by the engine and the AI

pub mod tokens;
pub mod types;

pub use tokens::{TokenChange, TokenSet, TokenTable, MAX_TOKENS};
pub use types::{Difficulty, PerSide, Role, Side};
