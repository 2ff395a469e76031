//! PGN codec: PGN text in, [`Game`] values out.
//!
//! Built on pgn-reader's streaming visitor. Only the mainline is kept:
//! variations are skipped, comments and NAGs ignored. Every SAN token is
//! resolved against the running board, so a parsed game only ever holds
//! moves that were legal where they were played.

use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Move, Position};

use crate::error::PgnError;
use crate::game::{Game, GameMetadata};

/// Mainline state while the movetext is read.
struct Mainline {
    metadata: GameMetadata,
    start: Chess,
    board: Chess,
    moves: Vec<Move>,
}

/// A game in a batch that could not be read, with whatever headers were
/// seen before the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadGame {
    pub metadata: GameMetadata,
    pub error: PgnError,
}

struct GameBuilder;

impl Visitor for GameBuilder {
    type Tags = GameMetadata;
    type Movetext = Mainline;
    type Output = Result<Game, UnreadGame>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, GameMetadata> {
        ControlFlow::Continue(GameMetadata::default())
    }

    fn tag(
        &mut self,
        tags: &mut GameMetadata,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value = value.decode_utf8_lossy().into_owned();
        match name {
            b"White" => tags.white = value,
            b"Black" => tags.black = value,
            b"Result" => tags.result = value,
            b"Event" => tags.event = Some(value),
            b"Site" => tags.site = Some(value),
            b"Date" | b"UTCDate" if tags.date.is_none() => tags.date = Some(value),
            b"ECO" => tags.eco = Some(value),
            b"Link" => tags.link = Some(value),
            b"FEN" => tags.fen = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameMetadata) -> ControlFlow<Self::Output, Mainline> {
        let start = match tags.fen.as_deref() {
            Some(fen) => match starting_position(fen) {
                Ok(pos) => pos,
                Err(error) => {
                    return ControlFlow::Break(Err(UnreadGame {
                        metadata: tags,
                        error,
                    }))
                }
            },
            None => Chess::default(),
        };

        ControlFlow::Continue(Mainline {
            metadata: tags,
            board: start.clone(),
            start,
            moves: Vec::new(),
        })
    }

    fn san(&mut self, state: &mut Mainline, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        let ply = state.moves.len() + 1;
        let unplayable = |metadata: &GameMetadata, reason: String| UnreadGame {
            metadata: metadata.clone(),
            error: PgnError::IllegalMove {
                ply,
                san: san_plus.to_string(),
                reason,
            },
        };
        let mv = match san_plus.san.to_move(&state.board) {
            Ok(mv) => mv,
            Err(e) => return ControlFlow::Break(Err(unplayable(&state.metadata, e.to_string()))),
        };

        match state.board.clone().play(mv.clone()) {
            Ok(next) => {
                state.board = next;
                state.moves.push(mv);
                ControlFlow::Continue(())
            }
            Err(e) => ControlFlow::Break(Err(unplayable(&state.metadata, e.to_string()))),
        }
    }

    fn begin_variation(&mut self, _state: &mut Mainline) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, state: Mainline) -> Self::Output {
        Ok(Game::new(state.metadata, state.start, state.moves))
    }
}

fn starting_position(fen: &str) -> Result<Chess, PgnError> {
    let invalid = |reason: String| PgnError::InvalidFen {
        fen: fen.to_string(),
        reason,
    };
    let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    parsed
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{e}")))
}

/// Parse the first game of a PGN string.
pub fn parse_game(pgn: &str) -> Result<Game, PgnError> {
    let mut reader = Reader::new(pgn.as_bytes());
    match reader.read_game(&mut GameBuilder) {
        Ok(Some(game)) => game.map_err(|unread| unread.error),
        Ok(None) => Err(PgnError::Empty),
        Err(e) => Err(PgnError::Io(e.to_string())),
    }
}

/// Parse every game of a multi-game PGN string, in order.
///
/// Blank input yields an empty list. The first malformed game fails the whole
/// batch.
pub fn parse_games(pgn: &str) -> Result<Vec<Game>, PgnError> {
    let mut reader = Reader::new(pgn.as_bytes());
    let mut games = Vec::new();
    while let Some(game) = reader
        .read_game(&mut GameBuilder)
        .map_err(|e| PgnError::Io(e.to_string()))?
    {
        games.push(game.map_err(|unread| unread.error)?);
    }
    Ok(games)
}

/// Parse every game of a multi-game PGN string, keeping going past games
/// that cannot be read. Each entry is either the game or why it failed.
///
/// Only a failure of the reader itself fails the call.
pub fn parse_games_lenient(pgn: &str) -> Result<Vec<Result<Game, UnreadGame>>, PgnError> {
    let mut reader = Reader::new(pgn.as_bytes());
    let mut games = Vec::new();
    while let Some(game) = reader
        .read_game(&mut GameBuilder)
        .map_err(|e| PgnError::Io(e.to_string()))?
    {
        games.push(game);
    }
    Ok(games)
}
