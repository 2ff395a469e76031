//! Which side a player had, and whether a deviation was theirs.

use crate::deviation::Deviation;
use crate::error::{DeviationError, Result};
use crate::game::{Game, GameMetadata};
use crate::side::Side;

/// Side `player` played in the game described by `metadata`.
///
/// Exact, case-sensitive match against the White and Black tags.
pub fn resolve_side(metadata: &GameMetadata, player: &str) -> Result<Side> {
    if metadata.white == player {
        Ok(Side::White)
    } else if metadata.black == player {
        Ok(Side::Black)
    } else {
        Err(DeviationError::PlayerNotFound {
            player: player.to_string(),
            white: metadata.white.clone(),
            black: metadata.black.clone(),
        })
    }
}

pub fn resolve_color(game: &Game, player: &str) -> Result<Side> {
    resolve_side(game.metadata(), player)
}

/// Keep `deviation` only if the tracked side was the one that left the line.
pub fn filter<P, M>(deviation: Option<Deviation<P, M>>, tracked: Side) -> Option<Deviation<P, M>> {
    deviation.filter(|d| d.side() == tracked)
}
