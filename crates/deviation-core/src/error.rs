//! Error types for PGN decoding and deviation detection.

use thiserror::Error;

/// Failures of the PGN codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PgnError {
    #[error("PGN contains no game")]
    Empty,

    #[error("Invalid FEN header {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("Unplayable move {san} at ply {ply}: {reason}")]
    IllegalMove {
        ply: usize,
        san: String,
        reason: String,
    },

    #[error("PGN read error: {0}")]
    Io(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviationError {
    /// The actual game contains a move that cannot be played in its own
    /// tracked position. The game is corrupt and must not be compared.
    #[error("Malformed move sequence at ply {ply}: {detail}")]
    MalformedSequence { ply: usize, detail: String },

    #[error("Player {player:?} not found (White: {white:?}, Black: {black:?})")]
    PlayerNotFound {
        player: String,
        white: String,
        black: String,
    },

    #[error(transparent)]
    Pgn(#[from] PgnError),
}

pub type Result<T, E = DeviationError> = std::result::Result<T, E>;
