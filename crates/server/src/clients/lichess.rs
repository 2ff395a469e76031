use std::sync::LazyLock;

use regex::Regex;
use reqwest::{header::ACCEPT, Client, StatusCode};

use crate::config::FetchConfig;

/// Status codes worth another attempt.
const RETRY_STATUSES: [StatusCode; 3] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::GATEWAY_TIMEOUT,
];

static STUDY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"lichess\.org/study/([a-zA-Z0-9]+)").expect("valid regex"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Not a Lichess study URL: {0}")]
    InvalidStudyUrl(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Study id from a study or chapter URL:
/// `https://lichess.org/study/RKEBYTWL/muR4Kgyc` → `RKEBYTWL`.
pub fn extract_study_id(url: &str) -> Option<&str> {
    STUDY_ID_RE
        .captures(url)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

#[derive(Clone)]
pub struct LichessClient {
    client: Client,
    config: FetchConfig,
}

impl LichessClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("OpeningDeviation/1.0")
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// PGN of the user's most recent games, newest first.
    pub async fn fetch_recent_games(
        &self,
        username: &str,
        max_games: usize,
    ) -> Result<String, FetchError> {
        let url = format!("{}/api/games/user/{}", self.config.base_url, username);
        tracing::info!("Fetching {} games for {}", max_games, username);

        let pgn = self
            .get_pgn(&url, &[("max", max_games.to_string())], &format!("User {username}"))
            .await?;

        tracing::info!("Fetched games for {} ({} bytes)", username, pgn.len());
        Ok(pgn)
    }

    /// PGN export of every chapter of a study.
    pub async fn fetch_study(&self, study_id: &str) -> Result<String, FetchError> {
        let url = format!("{}/api/study/{}.pgn", self.config.base_url, study_id);
        tracing::info!("Fetching study {}", study_id);

        let params = [
            ("clocks", "false".to_string()),
            ("comments", "false".to_string()),
            ("variations", "false".to_string()),
        ];
        self.get_pgn(&url, &params, &format!("Study {study_id}"))
            .await
    }

    pub async fn fetch_study_url(&self, study_url: &str) -> Result<String, FetchError> {
        let study_id = extract_study_id(study_url)
            .ok_or_else(|| FetchError::InvalidStudyUrl(study_url.to_string()))?;
        self.fetch_study(study_id).await
    }

    /// GET a PGN body, retrying transport failures and 500/502/504 with backoff.
    async fn get_pgn(
        &self,
        url: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<String, FetchError> {
        let mut attempt = 0u32;

        loop {
            let mut request = self
                .client
                .get(url)
                .query(params)
                .header(ACCEPT, "application/x-chess-pgn");
            if let Some(token) = &self.config.api_token {
                request = request.bearer_auth(token);
            }

            let outcome = request.send().await;
            let retryable = match &outcome {
                Ok(resp) => RETRY_STATUSES.contains(&resp.status()),
                Err(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            };

            if retryable && attempt < self.config.retries {
                attempt += 1;
                let delay = self.config.backoff(attempt);
                tracing::warn!(
                    "Request to {url} failed, retry {attempt}/{} in {:.1}s",
                    self.config.retries,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let resp = outcome?;
            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Err(FetchError::NotFound(what.to_string()));
            }
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            return Ok(resp.text().await?);
        }
    }
}
