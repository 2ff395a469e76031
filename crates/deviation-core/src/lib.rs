//! Opening-deviation core.
//!
//! Finds the first ply where a played game leaves a prepared reference line,
//! optionally across every chapter of a study and gated on the side a named
//! player had. Pure and synchronous: no I/O, no shared state, so independent
//! comparisons can run on as many threads as the caller likes.

pub mod aligner;
pub mod color;
pub mod deviation;
pub mod error;
pub mod game;
pub mod pgn;
pub mod rules;
pub mod side;
pub mod study;

pub use aligner::{align, align_moves};
pub use color::{filter, resolve_color, resolve_side};
pub use deviation::{Arrow, ArrowColor, Deviation, DeviationResult};
pub use error::{DeviationError, PgnError};
pub use game::{Game, GameMetadata};
pub use pgn::{parse_game, parse_games, parse_games_lenient, UnreadGame};
pub use rules::{RulesEngine, StandardRules};
pub use side::Side;
pub use study::{match_by_color, match_study, ChapterMatch, ChapterSource, Study};
