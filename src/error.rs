//! Error types
//!
//! `DrawError` covers the engine; every variant aborts the current run.
//! `StoreError` covers settings/history files.

use thiserror::Error;

use crate::sim::EntrantId;

/// Errors raised by the draw engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    /// A level number was referenced that has no entry in the level map
    #[error("level {0} is not present in the level map")]
    MissingLevel(u32),

    /// An entrant was removed from a level it does not belong to
    #[error("entrant {entrant} is not a member of level {level}")]
    NotInLevel { entrant: EntrantId, level: u32 },

    /// Every entrant was excluded by the past-winners set
    #[error("no entrants participate in this draw")]
    EmptyPool,

    /// Preset values that can never produce a run
    #[error("invalid preset: {0}")]
    InvalidPreset(String),

    /// More winners wanted than there are participants
    #[error("preset wants {wanted} winners but only {available} entrants participate")]
    NotEnoughEntrants { wanted: usize, available: usize },

    /// A run is already in progress on this scene
    #[error("a draw is already running")]
    AlreadyActive,
}

/// Errors raised while loading or saving settings and history
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
