//! Error types for the drill engine.

use thiserror::Error;

use crate::variant::VariantId;

/// Failures reported by the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("invalid position '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },
    #[error("move '{mv}' is not legal in '{fen}'")]
    IllegalMove { fen: String, mv: String },
    #[error("cannot play '{token}' at ply {ply}: {reason}")]
    InvalidSan {
        token: String,
        ply: usize,
        reason: String,
    },
}

/// Errors raised by a [`TrainingSession`](crate::TrainingSession).
///
/// `CorruptVariant` is fatal: the session was never built. The remaining
/// variants mean the caller asked for something out of order; log them and
/// reset the round.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("variant {variant} ('{pgn}') cannot be replayed: {source}")]
    CorruptVariant {
        variant: VariantId,
        pgn: String,
        #[source]
        source: RulesError,
    },
    #[error("no next move available at '{position}' (ply {ply})")]
    NoApplicableMove { position: String, ply: usize },
    #[error("cannot complete: no variant is known at '{position}'")]
    UnknownPosition { position: String },
    #[error("cannot complete: {count} variants share '{position}', one is a prefix of another")]
    AmbiguousCompletion { position: String, count: usize },
    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl SessionError {
    /// True for errors caused by calling the session out of order.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            SessionError::NoApplicableMove { .. }
                | SessionError::UnknownPosition { .. }
                | SessionError::AmbiguousCompletion { .. }
        )
    }
}
