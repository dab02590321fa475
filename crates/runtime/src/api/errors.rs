//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and catalog loading
//! so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use pet_core::{ActivityError, ErrorSeverity, PetError, PetId};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("activity '{name}' not found in catalog")]
    ActivityNotFound { name: String },

    #[error("pet {pet} not found")]
    PetNotFound { pet: PetId },

    #[error("runtime requires activity, scene and achievement catalogs")]
    MissingCatalogs,

    #[error("failed to load catalogs: {0}")]
    Catalog(String),

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ActivityError> for RuntimeError {
    fn from(error: ActivityError) -> Self {
        match error {
            ActivityError::NotFound { name } => Self::ActivityNotFound { name },
        }
    }
}

impl PetError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ActivityNotFound { .. } | Self::PetNotFound { .. } => ErrorSeverity::Validation,
            Self::MissingCatalogs | Self::Catalog(_) => ErrorSeverity::Fatal,
            Self::Repository(_) => ErrorSeverity::Recoverable,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActivityNotFound { .. } => "RUNTIME_ACTIVITY_NOT_FOUND",
            Self::PetNotFound { .. } => "RUNTIME_PET_NOT_FOUND",
            Self::MissingCatalogs => "RUNTIME_MISSING_CATALOGS",
            Self::Catalog(_) => "RUNTIME_CATALOG",
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::Repository(_) => "RUNTIME_REPOSITORY",
        }
    }
}
