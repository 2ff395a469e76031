//! HTTP tests against a server bound to a local port.

mod common;

use common::*;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use server::clients::lichess::LichessClient;
use server::config::{Config, FetchConfig};

/// Start the app on an ephemeral port. Lichess points at a closed port so
/// nothing leaves the machine.
async fn spawn_app() -> String {
    let fetch = FetchConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        retries: 0,
        ..FetchConfig::default()
    };
    let client = LichessClient::new(fetch.clone()).unwrap();
    let app = server::app(Config { fetch, ..Config::default() }, client);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app().await;
    let resp = Client::new().get(format!("{base}/health")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_compare_pgn_over_http() {
    let base = spawn_app().await;
    let resp = Client::new()
        .post(format!("{base}/api/deviations/pgn"))
        .json(&json!({
            "username": "HarpSeal",
            "gamesPgn": QGD_GAME,
            "referencePgn": QGD_REFERENCE,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let report = &body["games"][0];
    assert_eq!(report["site"], "https://lichess.org/qgd00001");
    assert_eq!(report["deviation"]["moveNumber"], 6);
    assert_eq!(report["deviation"]["deviatingMove"], "Qc2");
    assert_eq!(report["deviation"]["referenceMove"], "Bf4");
    assert_eq!(
        report["deviation"]["fen"],
        "rnbqk2r/ppp1bppp/5n2/3p4/3P4/2N2N2/PP2PPPP/R1BQKB1R w KQkq - 0 6"
    );
}

#[tokio::test]
async fn test_lichess_unreachable_is_bad_gateway() {
    let base = spawn_app().await;
    let resp = Client::new()
        .post(format!("{base}/api/deviations"))
        .json(&json!({
            "username": "HarpSeal",
            "whiteStudyUrl": "https://lichess.org/study/RKEBYTWL",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().is_some());
}
