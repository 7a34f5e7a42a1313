//! Unified error types surfaced by the engine API.
//!
//! Every variant is terminal to the current command only. The display text is
//! what the issuing user sees as a notification.
use anim_core::TargetingError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "This command depends on a visual effects playback service. Make sure it is installed and enabled"
    )]
    PlaybackUnavailable,

    #[error(
        "This command depends on at least one animation library. Make sure at least one is installed."
    )]
    EmptyCatalog,

    #[error("Must provide animation name")]
    MissingAssetName,

    #[error("Unable to find animation for '{pattern}'")]
    NoMatch { pattern: String },

    #[error("Start offset must be less than 1 (got {offset})")]
    InvalidStartOffset { offset: f64 },

    #[error(transparent)]
    Targeting(#[from] TargetingError),

    #[error("dispatch task join failed")]
    DispatchJoin(#[source] tokio::task::JoinError),
}

/// Coarse classification of [`EngineError`]s.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A collaborator or the catalog is missing; nothing was attempted.
    Precondition,
    /// The command could not be resolved to assets or entities.
    Resolution,
    /// A spawned dispatch task failed.
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::PlaybackUnavailable | EngineError::EmptyCatalog => ErrorKind::Precondition,
            EngineError::MissingAssetName
            | EngineError::NoMatch { .. }
            | EngineError::InvalidStartOffset { .. }
            | EngineError::Targeting(_) => ErrorKind::Resolution,
            EngineError::DispatchJoin(_) => ErrorKind::Internal,
        }
    }
}
