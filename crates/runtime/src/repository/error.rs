//! Error types raised by repository implementations.

use pet_core::PetId;
use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("pet {pet} not found")]
    PetNotFound { pet: PetId },

    #[error("storage unavailable")]
    Unavailable,
}

impl RepositoryError {
    /// Stored data exists but cannot be decoded.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Json(_) | Self::CorruptedData(_))
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
