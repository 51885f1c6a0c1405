//! BJJ match engine
//!
//! A turn-based grappling match between a player seat and a computer
//! opponent. Both sides secretly lock a (category, technique) pair each turn;
//! the engine resolves them simultaneously into points, advantages, position
//! changes, token swings and, eventually, a winner.

pub mod catalog;
pub mod core;
pub mod error;
pub mod game;
pub mod tournament;

pub use error::{BjjError, Result};
