//! Errors surfaced by the AI crate and the `tactics` binary.

use std::io;

use monster_tactics_core::TacticsError;
use thiserror::Error;

/// Why a typed player command was rejected. The board is untouched and the
/// player is asked again, so this never becomes an [`AiError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unrecognized command: {0:?}")]
    Malformed(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("no {kind} of yours at {at}")]
    NoSuchPiece { kind: String, at: String },

    #[error("illegal move to {to}")]
    IllegalMove { to: String },

    #[error("ability could not be used")]
    AbilityRejected,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("report serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Rules(#[from] TacticsError),
}

pub type AiResult<T> = Result<T, AiError>;
