use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move};

/// Value PGN uses for an unknown tag.
pub const UNKNOWN_TAG: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub eco: Option<String>,
    pub link: Option<String>,
    pub fen: Option<String>,
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            white: UNKNOWN_TAG.to_string(),
            black: UNKNOWN_TAG.to_string(),
            result: "*".to_string(),
            event: None,
            site: None,
            date: None,
            eco: None,
            link: None,
            fen: None,
        }
    }
}

impl GameMetadata {
    pub fn players(white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            white: white.into(),
            black: black.into(),
            ..Self::default()
        }
    }
}

/// One parsed game: headers, starting position and the mainline.
#[derive(Debug, Clone)]
pub struct Game {
    metadata: GameMetadata,
    start: Chess,
    moves: Vec<Move>,
}

impl Game {
    pub fn new(metadata: GameMetadata, start: Chess, moves: Vec<Move>) -> Self {
        Self {
            metadata,
            start,
            moves,
        }
    }

    pub fn metadata(&self) -> &GameMetadata {
        &self.metadata
    }

    pub fn start(&self) -> &Chess {
        &self.start
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }
}
