//! Matching a played game against every chapter of a repertoire study.

use tracing::debug;

use crate::aligner::align;
use crate::color::{filter, resolve_color};
use crate::deviation::Deviation;
use crate::error::{PgnError, Result};
use crate::game::Game;
use crate::pgn::parse_games;
use crate::side::Side;

/// An ordered set of reference lines, one game per chapter.
#[derive(Debug, Clone, Default)]
pub struct Study {
    chapters: Vec<Game>,
}

impl Study {
    pub fn new(chapters: Vec<Game>) -> Self {
        Self { chapters }
    }

    /// Parse a multi-chapter study export.
    pub fn from_pgn(pgn: &str) -> Result<Self, PgnError> {
        Ok(Self::new(parse_games(pgn)?))
    }

    pub fn chapters(&self) -> &[Game] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

/// The first chapter whose line the tracked player left.
#[derive(Debug, Clone)]
pub struct ChapterMatch {
    /// Zero-based chapter index.
    pub chapter: usize,
    pub deviation: Deviation,
}

/// Where reference chapters come from: one set for both colours, or a White
/// repertoire and a Black repertoire.
#[derive(Debug, Clone, Copy)]
pub enum ChapterSource<'a> {
    Combined(&'a [Game]),
    ByColor {
        white: &'a [Game],
        black: &'a [Game],
    },
}

impl<'a> ChapterSource<'a> {
    pub fn chapters_for(&self, side: Side) -> &'a [Game] {
        match *self {
            ChapterSource::Combined(chapters) => chapters,
            ChapterSource::ByColor { white, .. } if side == Side::White => white,
            ChapterSource::ByColor { black, .. } => black,
        }
    }

    /// Resolve `player`'s side in `actual`, then scan that side's chapters in
    /// order. The first chapter where `player` (not the opponent) deviated
    /// wins; later chapters are never examined.
    pub fn find_deviation(&self, actual: &Game, player: &str) -> Result<Option<ChapterMatch>> {
        let tracked = resolve_color(actual, player)?;
        let chapters = self.chapters_for(tracked);

        for (chapter, reference) in chapters.iter().enumerate() {
            match filter(align(reference, actual)?, tracked) {
                Some(deviation) => {
                    debug!(chapter, player, "chapter reported a deviation");
                    return Ok(Some(ChapterMatch { chapter, deviation }));
                }
                None => debug!(chapter, player, "no deviation by tracked player"),
            }
        }

        Ok(None)
    }
}

pub fn match_study(chapters: &[Game], actual: &Game, player: &str) -> Result<Option<ChapterMatch>> {
    ChapterSource::Combined(chapters).find_deviation(actual, player)
}

/// Like [`match_study`], with the repertoire picked by the colour `player`
/// had in `actual`.
pub fn match_by_color(
    white: &[Game],
    black: &[Game],
    actual: &Game,
    player: &str,
) -> Result<Option<ChapterMatch>> {
    ChapterSource::ByColor { white, black }.find_deviation(actual, player)
}
