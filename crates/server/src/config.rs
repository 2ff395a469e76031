use std::env;
use std::time::Duration;

/// Settings for talking to Lichess. Passed into the client explicitly.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    /// Retries after the first attempt.
    pub retries: u32,
    pub backoff_factor: f64,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://lichess.org".to_string(),
            api_token: None,
            retries: 3,
            backoff_factor: 1.5,
            timeout: Duration::from_secs(10),
        }
    }
}

impl FetchConfig {
    /// Sleep before retry number `attempt` (1-based): factor * 2^(attempt - 1).
    /// Saturates at `Duration::MAX`; a negative or NaN factor means no sleep.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16) as i32;
        let secs = self.backoff_factor * 2f64.powi(exp);
        if secs.is_nan() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub fetch: FetchConfig,
    pub default_max_games: usize,
    pub max_games_limit: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = FetchConfig::default();
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            fetch: FetchConfig {
                base_url: env::var("LICHESS_BASE_URL")
                    .map(|v| v.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.base_url),
                api_token: env::var("LICHESS_API_TOKEN").ok().filter(|t| !t.is_empty()),
                retries: env::var("FETCH_RETRIES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.retries),
                backoff_factor: env::var("FETCH_BACKOFF_FACTOR")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.backoff_factor),
                timeout: env::var("FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            },
            default_max_games: env::var("DEFAULT_MAX_GAMES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            max_games_limit: env::var("MAX_GAMES_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            fetch: FetchConfig::default(),
            default_max_games: 5,
            max_games_limit: 50,
        }
    }
}
