use server::clients::lichess::LichessClient;
use server::config::Config;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Lichess at {} (retries: {}, timeout: {:?})",
        config.fetch.base_url,
        config.fetch.retries,
        config.fetch.timeout
    );

    let client = LichessClient::new(config.fetch.clone())?;
    let addr = format!("{}:{}", config.host, config.port);
    let app = server::app(config, client);

    tracing::info!("Starting server on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
