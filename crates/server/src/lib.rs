pub mod clients;
pub mod config;
pub mod error;
pub mod report;
pub mod routes;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::clients::lichess::LichessClient;
use crate::config::Config;

/// The HTTP application with all routes and shared state attached.
pub fn app(config: Config, client: LichessClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/deviations", post(routes::deviations::check_recent_games))
        .route("/api/deviations/pgn", post(routes::deviations::compare_pgn))
        .layer(Extension(config))
        .layer(Extension(client))
        .layer(cors)
}
