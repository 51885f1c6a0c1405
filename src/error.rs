//! Error types for the BJJ match engine

use crate::catalog::PositionId;
use crate::core::Role;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BjjError {
    /// The catalog offers a role nothing to do in a position
    #[error("No legal categories at {position} as {role}")]
    NoLegalCategories { position: PositionId, role: Role },

    /// Nothing selectable even after ignoring token requirements
    #[error("No usable techniques at {position} as {role}")]
    NoUsableTechniques { position: PositionId, role: Role },

    #[error("Catalog entry missing: {0}")]
    MissingCatalogEntry(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BjjError {
    /// Faults caused by gaps in the static catalog rather than by the caller
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            BjjError::NoLegalCategories { .. }
                | BjjError::NoUsableTechniques { .. }
                | BjjError::MissingCatalogEntry(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BjjError>;
