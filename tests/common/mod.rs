#![allow(dead_code)]

use deviation_core::{parse_game, parse_games, Game};

/// Queen's Gambit Declined exchange line kept in a White repertoire.
pub const QGD_REFERENCE: &str = r#"[Event "Repertoire: QGD Exchange"]
[White "?"]
[Black "?"]
[Result "*"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Nf3 Be7 5. cxd5 exd5 6. Bf4 c6 7. Qc2 *
"#;

pub const QGD_GAME: &str = r#"[Event "Rated Rapid game"]
[Site "https://lichess.org/qgd00001"]
[Date "2024.03.02"]
[White "HarpSeal"]
[Black "rayrey784"]
[Result "1-0"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Nf3 Be7 5. cxd5 exd5 6. Qc2 O-O 7. Bg5 1-0
"#;

/// Same players, but Black leaves the line first with 4...c6.
pub const QGD_OPPONENT_FIRST: &str = r#"[White "HarpSeal"]
[Black "rayrey784"]
[Result "1-0"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Nf3 c6 5. Qc2 1-0
"#;

/// Sicilian study: a c3 chapter, then an Open Sicilian chapter.
pub const SICILIAN_STUDY: &str = r#"[Event "Sicilian: Alapin"]
[White "?"]
[Black "?"]
[Result "*"]

1. e4 c5 2. c3 d5 *


[Event "Sicilian: Accelerated Dragon"]
[White "?"]
[Black "?"]
[Result "*"]

1. e4 c5 2. Nf3 Nc6 3. d4 cxd4 4. Nxd4 g6 5. Nc3 Bg7 6. Be3 Nf6 7. Be2 O-O 8. O-O Re8 *
"#;

pub const SICILIAN_GAME: &str = r#"[White "opponent"]
[Black "Jrjrjr4"]
[Result "0-1"]

1. e4 c5 2. Nf3 Nc6 3. d4 cxd4 4. Nxd4 g6 5. Nc3 Bg7 6. Be3 Nf6 7. Be2 O-O 8. O-O a5 0-1
"#;

pub fn game(pgn: &str) -> Game {
    parse_game(pgn).unwrap_or_else(|e| panic!("fixture does not parse: {e}"))
}

pub fn chapters(pgn: &str) -> Vec<Game> {
    parse_games(pgn).unwrap_or_else(|e| panic!("fixture does not parse: {e}"))
}
