//! Integration tests for the synchronization client against stub backends.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use omnisight_console::models::ConnectionState;
use omnisight_console::{Error, SyncClient};
use serde_json::json;
use std::net::SocketAddr;

/// Serve `router` on an ephemeral port, returning its base URL.
async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr: SocketAddr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

fn healthy_router() -> Router {
    Router::new()
        .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route(
            "/api/status",
            get(|| async {
                Json(json!({
                    "status": "operational",
                    "mode": "live",
                    "version": "2.3.1",
                    "uptime_seconds": 512,
                    "fps": 28.4,
                    "latency_ms": 41.0,
                    "camera_id": "cam-live-01",
                    "modules": {}
                }))
            }),
        )
        .route(
            "/api/tracks",
            get(|| async {
                Json(json!({
                    "tracks": [{
                        "id": "900",
                        "x": 0.4, "y": 0.6,
                        "vx": 0.0, "vy": 0.0,
                        "confidence": 0.95,
                        "threat_score": 0.2,
                        "behaviors": [],
                        "history": []
                    }]
                }))
            }),
        )
        .route(
            "/api/config",
            get(|| async { Json(omnisight_console::config::SystemConfig::default()) })
                .post(|| async { Json(json!({"status": "ok"})) }),
        )
}

#[tokio::test]
async fn test_healthy_backend_serves_live_data() {
    let base = spawn_backend(healthy_router()).await;
    let client = SyncClient::new(&base, "ws://127.0.0.1:9");

    assert_eq!(client.check_health().await, ConnectionState::Live);

    let status = client.get_status().await;
    assert_eq!(status.mode.as_deref(), Some("live"));
    assert_eq!(status.camera_id, "cam-live-01");

    let tracks = client.get_tracks().await;
    assert_eq!(tracks.tracks.len(), 1);
    assert_eq!(tracks.tracks[0].id, "900");

    assert_eq!(client.state().await, ConnectionState::Live);
    client.shutdown();
}

#[tokio::test]
async fn test_unreachable_backend_serves_synthetic_everywhere() {
    // Port 9 (discard) refuses connections immediately
    let client = SyncClient::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
    client.check_health().await;

    let status = client.get_status().await;
    assert_eq!(status.mode.as_deref(), Some("synthetic"));

    let tracks = client.get_tracks().await;
    assert!(!tracks.tracks.is_empty());

    let events = client.get_events().await;
    assert!(!events.events.is_empty());

    let heatmap = client.get_heatmap(60).await;
    assert!(heatmap.grid.is_well_formed());

    assert_eq!(client.state().await, ConnectionState::OfflineSynthetic);
    client.shutdown();
}

#[tokio::test]
async fn test_live_read_failure_degrades_to_synthetic() {
    // Backend that passes the probe but fails every data route
    let router = Router::new()
        .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route(
            "/api/tracks",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let base = spawn_backend(router).await;
    let client = SyncClient::new(&base, "ws://127.0.0.1:9");
    assert_eq!(client.check_health().await, ConnectionState::Live);

    // The failed read resolves with synthetic data and flips the state
    let tracks = client.get_tracks().await;
    assert!(!tracks.tracks.is_empty());
    assert_eq!(client.state().await, ConnectionState::OfflineSynthetic);

    // Subsequent reads stay on the catalog without touching the network
    let status = client.get_status().await;
    assert_eq!(status.mode.as_deref(), Some("synthetic"));
    client.shutdown();
}

#[tokio::test]
async fn test_rejected_config_write_surfaces_without_degrading_reads() {
    // Backend healthy on GET, rejecting only the config write
    let router = Router::new()
        .route("/api/health", get(|| async { Json(json!({"status": "ok"})) }))
        .route(
            "/api/config",
            get(|| async { Json(omnisight_console::config::SystemConfig::default()) })
                .post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "write failed") }),
        );
    let base = spawn_backend(router).await;
    let client = SyncClient::new(&base, "ws://127.0.0.1:9");
    assert_eq!(client.check_health().await, ConnectionState::Live);

    let cfg = omnisight_console::config::SystemConfig::default();
    let err = client.update_config(&cfg).await.unwrap_err();
    assert!(matches!(err, Error::WriteRejected(_)), "got {:?}", err);

    // The backend answered, so the connection stays live and reads are real
    assert_eq!(client.state().await, ConnectionState::Live);
    let fetched = client.get_config().await;
    assert!(fetched.validate().is_ok());
    client.shutdown();
}

#[tokio::test]
async fn test_accepted_config_write_returns_ack() {
    let base = spawn_backend(healthy_router()).await;
    let client = SyncClient::new(&base, "ws://127.0.0.1:9");
    assert_eq!(client.check_health().await, ConnectionState::Live);

    let cfg = omnisight_console::config::SystemConfig::default();
    let ack = client.update_config(&cfg).await.expect("write accepted");
    assert_eq!(ack.status, "ok");
    client.shutdown();
}
