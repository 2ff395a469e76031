use std::sync::LazyLock;

use axum::{Extension, Json};
use deviation_core::{parse_games_lenient, ChapterSource, Game, Study, UnreadGame};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::clients::lichess::{extract_study_id, LichessClient};
use crate::config::Config;
use crate::error::AppError;
use crate::report::{report_games, GameReport};

static LICHESS_USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,29}$").expect("valid regex"));

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecentRequest {
    pub username: String,
    /// White repertoire, or the only repertoire when no Black study is given.
    pub white_study_url: String,
    pub black_study_url: Option<String>,
    pub max_games: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparePgnRequest {
    pub username: String,
    pub games_pgn: String,
    pub reference_pgn: String,
    pub black_reference_pgn: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeviationsResponse {
    pub username: String,
    pub games: Vec<GameReport>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn study_id(url: &str) -> Result<&str, AppError> {
    extract_study_id(url)
        .ok_or_else(|| AppError::BadRequest(format!("Not a Lichess study URL: {url}")))
}

/// A reference study with no chapters would report every game as in book.
fn require_chapters(study: Study, what: &str) -> Result<Study, AppError> {
    if study.is_empty() {
        return Err(AppError::BadRequest(format!("{what} has no chapters")));
    }
    Ok(study)
}

fn compare(
    username: &str,
    games: &[Result<Game, UnreadGame>],
    white: &Study,
    black: Option<&Study>,
) -> DeviationsResponse {
    let source = match black {
        Some(black) => ChapterSource::ByColor {
            white: white.chapters(),
            black: black.chapters(),
        },
        None => ChapterSource::Combined(white.chapters()),
    };

    let reports = report_games(&source, games, username);
    let found = reports.iter().filter(|r| r.deviation.is_some()).count();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    tracing::info!(
        "Compared {} games for {}: {} deviations, {} not comparable",
        reports.len(),
        username,
        found,
        failed
    );

    DeviationsResponse {
        username: username.to_string(),
        games: reports,
    }
}

/// POST /api/deviations
/// Fetch the user's recent Lichess games and their repertoire studies, then
/// report where each game first left the repertoire.
pub async fn check_recent_games(
    Extension(config): Extension<Config>,
    Extension(client): Extension<LichessClient>,
    Json(req): Json<CheckRecentRequest>,
) -> Result<Json<DeviationsResponse>, AppError> {
    let username = req.username.trim();
    if !LICHESS_USERNAME_RE.is_match(username) {
        return Err(AppError::BadRequest("Invalid Lichess username".into()));
    }

    let max_games = req.max_games.unwrap_or(config.default_max_games);
    if max_games == 0 || max_games > config.max_games_limit {
        return Err(AppError::BadRequest(format!(
            "maxGames must be between 1 and {}",
            config.max_games_limit
        )));
    }

    let white_id = non_empty(Some(req.white_study_url.as_str()))
        .ok_or_else(|| AppError::BadRequest("A study URL is required".into()))
        .and_then(study_id)?;
    let black_id = non_empty(req.black_study_url.as_deref())
        .map(study_id)
        .transpose()?;

    let (games_pgn, white_pgn, black_pgn) = tokio::try_join!(
        client.fetch_recent_games(username, max_games),
        client.fetch_study(white_id),
        async {
            match black_id {
                Some(id) => client.fetch_study(id).await.map(Some),
                None => Ok(None),
            }
        },
    )?;

    let games = parse_games_lenient(&games_pgn)?;
    let white = require_chapters(Study::from_pgn(&white_pgn)?, &format!("Study {white_id}"))?;
    let black = match (black_id, black_pgn) {
        (Some(id), Some(pgn)) => Some(require_chapters(
            Study::from_pgn(&pgn)?,
            &format!("Study {id}"),
        )?),
        _ => None,
    };

    Ok(Json(compare(username, &games, &white, black.as_ref())))
}

/// POST /api/deviations/pgn
/// Same comparison over PGN text supplied by the caller.
pub async fn compare_pgn(
    Json(req): Json<ComparePgnRequest>,
) -> Result<Json<DeviationsResponse>, AppError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::BadRequest("Username is required".into()));
    }

    let games = parse_games_lenient(&req.games_pgn)?;
    let white = require_chapters(Study::from_pgn(&req.reference_pgn)?, "Reference PGN")?;
    let black = match non_empty(req.black_reference_pgn.as_deref()) {
        Some(pgn) => Some(require_chapters(Study::from_pgn(pgn)?, "Black reference PGN")?),
        None => None,
    };

    Ok(Json(compare(username, &games, &white, black.as_ref())))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::clients::lichess::LichessClient;
    use crate::config::{Config, FetchConfig};

    const RECENT_GAMES: &str = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/abcd1234"]
[White "Jrjrjr4"]
[Black "someone"]
[Result "1-0"]

1. d4 d5 2. Nf3 Nf6 1-0


[Event "Rated Blitz game"]
[Site "https://lichess.org/efgh5678"]
[White "someone"]
[Black "Jrjrjr4"]
[Result "0-1"]

1. e4 c5 2. Nf3 Nc6 3. d4 0-1
"#;

    const WHITE_STUDY: &str = r#"[Event "White rep: London"]
[White "?"]
[Black "?"]

1. d4 d5 2. Bf4 *
"#;

    const BLACK_STUDY: &str = r#"[Event "Black rep: Najdorf"]
[White "?"]
[Black "?"]

1. e4 c5 2. Nf3 d6 *
"#;

    fn offline_app(base_url: &str) -> Router {
        let fetch = FetchConfig {
            base_url: base_url.to_string(),
            retries: 0,
            timeout: Duration::from_secs(5),
            ..FetchConfig::default()
        };
        let client = LichessClient::new(fetch.clone()).unwrap();
        crate::app(Config { fetch, ..Config::default() }, client)
    }

    /// Stands in for lichess.org.
    async fn fake_lichess() -> String {
        let app = Router::new()
            .route("/api/games/user/{name}", get(|| async { RECENT_GAMES }))
            .route(
                "/api/study/{file}",
                get(|axum::extract::Path(file): axum::extract::Path<String>| async move {
                    if file.starts_with("white") {
                        (StatusCode::OK, WHITE_STUDY)
                    } else if file.starts_with("black") {
                        (StatusCode::OK, BLACK_STUDY)
                    } else if file.starts_with("empty") {
                        (StatusCode::OK, "\n")
                    } else {
                        (StatusCode::NOT_FOUND, "")
                    }
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_compare_pgn_by_color() {
        let (status, body) = post_json(
            offline_app("http://127.0.0.1:9"),
            "/api/deviations/pgn",
            json!({
                "username": "Jrjrjr4",
                "gamesPgn": RECENT_GAMES,
                "referencePgn": WHITE_STUDY,
                "blackReferencePgn": BLACK_STUDY,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let games = body["games"].as_array().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0]["deviation"]["deviatingMoveNumbered"], "2.Nf3");
        assert_eq!(games[0]["deviation"]["referenceMoveNumbered"], "2.Bf4");
        assert_eq!(games[1]["deviation"]["deviatingMoveNumbered"], "2...Nc6");
        assert_eq!(games[1]["deviation"]["referenceMoveNumbered"], "2...d6");
    }

    #[tokio::test]
    async fn test_compare_pgn_reports_unknown_player_per_game() {
        let (status, body) = post_json(
            offline_app("http://127.0.0.1:9"),
            "/api/deviations/pgn",
            json!({
                "username": "nobody",
                "gamesPgn": RECENT_GAMES,
                "referencePgn": WHITE_STUDY,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        for game in body["games"].as_array().unwrap() {
            assert!(game["deviation"].is_null());
            assert!(game["error"].as_str().unwrap().contains("nobody"));
        }
    }

    #[tokio::test]
    async fn test_compare_pgn_keeps_games_after_unreadable_one() {
        let games_pgn = r#"[Event "Rated Crazyhouse game"]
[White "Jrjrjr4"]
[Black "someone"]
[Variant "Crazyhouse"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6 4. Nxe5 Nxe5 5. P@e6 1-0


[Event "Rated Blitz game"]
[White "Jrjrjr4"]
[Black "other"]

1. d4 d5 2. c4 *
"#;
        let (status, body) = post_json(
            offline_app("http://127.0.0.1:9"),
            "/api/deviations/pgn",
            json!({
                "username": "Jrjrjr4",
                "gamesPgn": games_pgn,
                "referencePgn": WHITE_STUDY,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let games = body["games"].as_array().unwrap();
        assert_eq!(games.len(), 2);
        assert!(games[0]["deviation"].is_null());
        assert!(games[0]["error"].as_str().unwrap().contains("ply 9"));
        assert_eq!(games[1]["black"], "other");
        assert_eq!(games[1]["deviation"]["deviatingMoveNumbered"], "2.c4");
        assert_eq!(games[1]["deviation"]["referenceMoveNumbered"], "2.Bf4");
        assert!(games[1]["error"].is_null());
    }

    #[tokio::test]
    async fn test_compare_pgn_rejects_empty_reference() {
        let (status, body) = post_json(
            offline_app("http://127.0.0.1:9"),
            "/api/deviations/pgn",
            json!({
                "username": "Jrjrjr4",
                "gamesPgn": RECENT_GAMES,
                "referencePgn": "   ",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Reference PGN has no chapters");
    }

    #[tokio::test]
    async fn test_check_recent_games_validation() {
        let app = offline_app("http://127.0.0.1:9");

        let (status, _) = post_json(
            app.clone(),
            "/api/deviations",
            json!({ "username": "bad name!", "whiteStudyUrl": "https://lichess.org/study/white1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            app.clone(),
            "/api/deviations",
            json!({ "username": "Jrjrjr4", "whiteStudyUrl": "https://example.com" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json(
            app,
            "/api/deviations",
            json!({
                "username": "Jrjrjr4",
                "whiteStudyUrl": "https://lichess.org/study/white1",
                "maxGames": 0,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_check_recent_games_against_fake_lichess() {
        let base = fake_lichess().await;
        let (status, body) = post_json(
            offline_app(&base),
            "/api/deviations",
            json!({
                "username": "Jrjrjr4",
                "whiteStudyUrl": "https://lichess.org/study/white1/chapter1",
                "blackStudyUrl": "https://lichess.org/study/black1",
                "maxGames": 2,
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "Jrjrjr4");
        let games = body["games"].as_array().unwrap();
        assert_eq!(games[0]["site"], "https://lichess.org/abcd1234");
        assert_eq!(games[0]["deviation"]["side"], "White");
        assert_eq!(games[1]["deviation"]["side"], "Black");
    }

    #[tokio::test]
    async fn test_check_recent_games_missing_study() {
        let base = fake_lichess().await;
        let (status, body) = post_json(
            offline_app(&base),
            "/api/deviations",
            json!({
                "username": "Jrjrjr4",
                "whiteStudyUrl": "https://lichess.org/study/gone42",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Study gone42 not found on Lichess");
    }

    #[tokio::test]
    async fn test_check_recent_games_rejects_empty_study() {
        let base = fake_lichess().await;
        let (status, body) = post_json(
            offline_app(&base),
            "/api/deviations",
            json!({
                "username": "Jrjrjr4",
                "whiteStudyUrl": "https://lichess.org/study/white1",
                "blackStudyUrl": "https://lichess.org/study/empty1",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Study empty1 has no chapters");
    }
}
