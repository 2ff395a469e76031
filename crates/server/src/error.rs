use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use deviation_core::{DeviationError, PgnError};
use serde_json::json;

use crate::clients::lichess::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::NotFound(what) => AppError::NotFound(format!("{what} not found on Lichess")),
            FetchError::InvalidStudyUrl(url) => {
                AppError::BadRequest(format!("Not a Lichess study URL: {url}"))
            }
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<PgnError> for AppError {
    fn from(e: PgnError) -> Self {
        AppError::Unprocessable(format!("Could not read PGN: {e}"))
    }
}

impl From<DeviationError> for AppError {
    fn from(e: DeviationError) -> Self {
        match e {
            DeviationError::PlayerNotFound { .. } => AppError::NotFound(e.to_string()),
            DeviationError::MalformedSequence { .. } | DeviationError::Pgn(_) => {
                AppError::Unprocessable(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "detail": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found: AppError = DeviationError::PlayerNotFound {
            player: "x".into(),
            white: "a".into(),
            black: "b".into(),
        }
        .into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let bad_pgn: AppError = PgnError::Empty.into();
        assert_eq!(bad_pgn.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let upstream: AppError = FetchError::Status(503).into();
        assert_eq!(upstream.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
