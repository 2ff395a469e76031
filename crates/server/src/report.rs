//! Presentation of deviation checks: JSON for the API, text for the CLI.

use deviation_core::{Arrow, ChapterMatch, ChapterSource, Game, GameMetadata, Side, UnreadGame};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviationReport {
    pub move_number: u32,
    pub side: Side,
    pub deviating_move: String,
    pub reference_move: String,
    /// e.g. "6.Qc2" or "8...a5"
    pub deviating_move_numbered: String,
    pub reference_move_numbered: String,
    /// 1-based chapter of the study the game was matched against.
    pub chapter: usize,
    /// Board before the deviating move.
    pub fen: String,
    pub arrows: Vec<Arrow>,
}

impl From<&ChapterMatch> for DeviationReport {
    fn from(m: &ChapterMatch) -> Self {
        let result = &m.deviation.result;
        Self {
            move_number: result.whole_move_number,
            side: result.side,
            deviating_move: result.deviation_san.clone(),
            reference_move: result.reference_san.clone(),
            deviating_move_numbered: result.numbered_deviation(),
            reference_move_numbered: result.numbered_reference(),
            chapter: m.chapter + 1,
            fen: m.deviation.fen(),
            arrows: m.deviation.arrows(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReport {
    pub white: String,
    pub black: String,
    pub date: Option<String>,
    pub site: Option<String>,
    pub deviation: Option<DeviationReport>,
    /// Why this game could not be compared.
    pub error: Option<String>,
}

impl GameReport {
    /// Human-readable lines, as printed by `check-deviation`.
    pub fn lines(&self) -> Vec<String> {
        match (&self.deviation, &self.error) {
            (_, Some(error)) => vec![format!("Could not compare this game: {error}")],
            (Some(d), None) => vec![
                format!("Deviating move: {}", d.deviating_move_numbered),
                format!("Reference move: {}", d.reference_move_numbered),
            ],
            (None, None) => vec!["No deviation found in this game.".to_string()],
        }
    }
}

/// Run the matcher for one game. Failures are recorded on the report so one
/// bad game doesn't sink a batch.
pub fn report_game(source: &ChapterSource<'_>, game: &Game, player: &str) -> GameReport {
    let meta = game.metadata();
    let (deviation, error) = match source.find_deviation(game, player) {
        Ok(found) => (found.as_ref().map(DeviationReport::from), None),
        Err(e) => {
            tracing::warn!("Skipping {} vs {}: {}", meta.white, meta.black, e);
            (None, Some(e.to_string()))
        }
    };

    headers_report(meta, deviation, error)
}

/// Report for a game that never got as far as the matcher.
pub fn report_unread(unread: &UnreadGame) -> GameReport {
    let meta = &unread.metadata;
    tracing::warn!("Skipping {} vs {}: {}", meta.white, meta.black, unread.error);
    headers_report(meta, None, Some(format!("Could not read PGN: {}", unread.error)))
}

fn headers_report(
    meta: &GameMetadata,
    deviation: Option<DeviationReport>,
    error: Option<String>,
) -> GameReport {
    GameReport {
        white: meta.white.clone(),
        black: meta.black.clone(),
        date: meta.date.clone(),
        site: meta.site.clone().or_else(|| meta.link.clone()),
        deviation,
        error,
    }
}

/// One report per entry of a leniently parsed batch, in order.
pub fn report_games(
    source: &ChapterSource<'_>,
    games: &[Result<Game, UnreadGame>],
    player: &str,
) -> Vec<GameReport> {
    games
        .iter()
        .map(|parsed| match parsed {
            Ok(game) => report_game(source, game, player),
            Err(unread) => report_unread(unread),
        })
        .collect()
}
