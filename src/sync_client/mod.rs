//! Synchronization client
//!
//! ## Responsibilities
//!
//! - Uniform, always-succeeding data-access surface over an unreliable
//!   backend (one typed fetch per data domain)
//! - Availability probing and the live/offline decision
//! - Fallback to the synthetic catalog on any read failure
//! - Push-channel and polling-fallback wiring for callers
//!
//! Read failures never propagate: the client flips to
//! [`ConnectionState::OfflineSynthetic`] and serves canned data. Config
//! writes are the exception — a failed save must surface so no operator
//! edit is silently lost.

pub mod types;

use crate::config::SystemConfig;
use crate::error::{Error, Result};
use crate::models::ConnectionState;
use crate::synthetic;
use crate::transport::push_channel::{self, PushChannel, PushHandler};
use crate::transport::Http;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use types::*;

/// Path probed for availability
const HEALTH_PATH: &str = "/api/health";

/// Client for one backend
///
/// Owns its [`ConnectionState`]; multiple consoles hold independent
/// clients. Must be constructed inside a tokio runtime (the availability
/// probe is spawned at construction). All data methods are usable
/// immediately — they serve synthetic data until the probe succeeds.
pub struct SyncClient {
    http: Http,
    ws_url: String,
    state: Arc<RwLock<ConnectionState>>,
    probe: Mutex<Option<tokio::task::JoinHandle<()>>>,
    channel: Mutex<Option<PushChannel>>,
}

impl SyncClient {
    /// `base_url` for request/response calls, `ws_url` for the push channel
    /// (for example `http://cam:8080` and `ws://cam:8081`).
    pub fn new(base_url: impl Into<String>, ws_url: impl Into<String>) -> Self {
        let http = Http::new(base_url);
        let state = Arc::new(RwLock::new(ConnectionState::Probing));

        let probe_http = http.clone();
        let probe_state = state.clone();
        let probe = tokio::spawn(async move {
            let next = match probe_http.get_json::<serde_json::Value>(HEALTH_PATH).await {
                Ok(_) => ConnectionState::Live,
                Err(e) => {
                    tracing::info!(error = %e, "availability probe failed, entering synthetic mode");
                    ConnectionState::OfflineSynthetic
                }
            };
            let mut s = probe_state.write().await;
            // A data call may have decided the state while the probe was
            // in flight; only the initial transition belongs to the probe
            if *s == ConnectionState::Probing {
                *s = next;
            }
        });

        Self {
            http,
            ws_url: ws_url.into().trim_end_matches('/').to_string(),
            state,
            probe: Mutex::new(Some(probe)),
            channel: Mutex::new(None),
        }
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    /// True when reads are served from the synthetic catalog.
    pub async fn is_synthetic(&self) -> bool {
        self.state().await.is_synthetic()
    }

    /// Re-issue the availability probe. Unlike the constructor's probe this
    /// may return an offline client to `Live`.
    pub async fn check_health(&self) -> ConnectionState {
        let next = match self.http.get_json::<serde_json::Value>(HEALTH_PATH).await {
            Ok(_) => ConnectionState::Live,
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                ConnectionState::OfflineSynthetic
            }
        };
        *self.state.write().await = next;
        next
    }

    /// Record that the caller fell back to polling after push-channel
    /// exhaustion. Request/response calls keep live semantics.
    pub async fn mark_degraded(&self) {
        let mut s = self.state.write().await;
        if *s == ConnectionState::Live {
            *s = ConnectionState::DegradedPolling;
        }
    }

    /// Undo [`mark_degraded`](Self::mark_degraded) after the caller
    /// reopened a push channel.
    pub async fn restore_live(&self) {
        let mut s = self.state.write().await;
        if *s == ConnectionState::DegradedPolling {
            *s = ConnectionState::Live;
        }
    }

    fn from_catalog<T: DeserializeOwned>(path: &str, fallback: fn() -> T) -> T {
        match serde_json::from_value(synthetic::payload_for(path)) {
            Ok(v) => v,
            Err(e) => {
                // Catalog/envelope mismatch is a bug; the typed builder
                // keeps the read path infallible regardless
                tracing::error!(path, error = %e, "synthetic payload did not decode");
                fallback()
            }
        }
    }

    /// Read-path fetch: checks the connection flag at call entry, issues
    /// the real request when live, and falls back to the catalog on any
    /// failure. Never returns an error.
    async fn fetch<T: DeserializeOwned>(&self, path: &str, fallback: fn() -> T) -> T {
        let entry = *self.state.read().await;
        if matches!(
            entry,
            ConnectionState::Probing | ConnectionState::OfflineSynthetic
        ) {
            return Self::from_catalog(path, fallback);
        }

        match self.http.get_json::<T>(path).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(path, error = %e, "read failed, serving synthetic data");
                *self.state.write().await = ConnectionState::OfflineSynthetic;
                Self::from_catalog(path, fallback)
            }
        }
    }

    // ---- data domains -------------------------------------------------

    pub async fn get_status(&self) -> StatusResponse {
        self.fetch("/api/status", synthetic::status).await
    }

    pub async fn get_statistics(&self) -> StatisticsResponse {
        self.fetch("/api/statistics", synthetic::statistics).await
    }

    pub async fn get_tracks(&self) -> TracksResponse {
        self.fetch("/api/tracks", synthetic::tracks).await
    }

    pub async fn get_events(&self) -> EventsResponse {
        self.fetch("/api/events", synthetic::events).await
    }

    pub async fn get_cameras(&self) -> CamerasResponse {
        self.fetch("/api/cameras", synthetic::cameras).await
    }

    /// `time_range_secs` bounds how far back threat contributions count.
    pub async fn get_heatmap(&self, time_range_secs: u32) -> HeatmapResponse {
        let path = format!("/api/heatmap?timeRange={}", time_range_secs);
        self.fetch(&path, synthetic::heatmap).await
    }

    pub async fn get_timelines(&self) -> TimelinesResponse {
        self.fetch("/api/timelines", synthetic::timelines).await
    }

    pub async fn get_swarm_network(&self) -> SwarmNetworkResponse {
        self.fetch("/api/swarm/network", synthetic::swarm_network)
            .await
    }

    pub async fn get_detections(&self) -> DetectionsResponse {
        self.fetch("/api/perception/detections", synthetic::detections)
            .await
    }

    pub async fn get_interventions(&self) -> InterventionsResponse {
        self.fetch("/api/interventions", synthetic::interventions)
            .await
    }

    pub async fn get_config(&self) -> SystemConfig {
        self.fetch("/api/config", synthetic::config).await
    }

    /// Save the full config object.
    ///
    /// Write failures always surface: [`Error::InvalidConfig`] before the
    /// request, [`Error::WriteRejected`] on a non-2xx response,
    /// [`Error::Unreachable`] when the backend is down or already known to
    /// be offline. While the probe is still in flight the write is
    /// attempted for real — a save is an explicit operator action.
    pub async fn update_config(&self, config: &SystemConfig) -> Result<ConfigAck> {
        config.validate()?;

        if self.state.read().await.is_synthetic() {
            return Err(Error::Unreachable(
                "backend offline; config not saved".to_string(),
            ));
        }

        match self.http.post_json("/api/config", config).await {
            Ok(ack) => Ok(ack),
            Err(e) => {
                // A rejected write means the backend answered; only a
                // transport failure flips the connection state
                if matches!(e, Error::Unreachable(_)) {
                    *self.state.write().await = ConnectionState::OfflineSynthetic;
                }
                Err(e)
            }
        }
    }

    // ---- push channel -------------------------------------------------

    /// Open the event push channel at `<ws_url>/ws/events`, replacing any
    /// channel opened earlier by this client.
    pub fn connect_events(&self, handler: Arc<dyn PushHandler>) {
        let url = format!("{}/ws/events", self.ws_url);
        let channel = push_channel::connect(url, handler);
        if let Ok(mut slot) = self.channel.lock() {
            *slot = Some(channel);
        }
    }

    /// Close the push channel if one is open. Idempotent.
    pub fn close_events(&self) {
        if let Ok(mut slot) = self.channel.lock() {
            *slot = None; // Drop closes the channel
        }
    }

    /// Tear down: closes any open push channel and cancels the pending
    /// availability probe.
    pub fn shutdown(&self) {
        self.close_events();
        if let Ok(mut probe) = self.probe.lock() {
            if let Some(handle) = probe.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for SyncClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConnectionState;

    #[tokio::test]
    async fn test_reads_resolve_before_probe_settles() {
        // Probe against an unreachable port takes up to the full timeout;
        // reads issued immediately must come back synthetic, not block
        let client = SyncClient::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        let status = client.get_status().await;
        assert_eq!(status.mode.as_deref(), Some("synthetic"));
        client.shutdown();
    }

    #[tokio::test]
    async fn test_failed_probe_enters_synthetic_mode() {
        let client = SyncClient::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        assert_eq!(client.check_health().await, ConnectionState::OfflineSynthetic);
        assert!(client.is_synthetic().await);
        client.shutdown();
    }

    #[tokio::test]
    async fn test_degraded_polling_transitions() {
        let client = SyncClient::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        // Degrade only applies to a live client
        client.mark_degraded().await;
        assert_ne!(client.state().await, ConnectionState::DegradedPolling);

        *client.state.write().await = ConnectionState::Live;
        client.mark_degraded().await;
        assert_eq!(client.state().await, ConnectionState::DegradedPolling);
        client.restore_live().await;
        assert_eq!(client.state().await, ConnectionState::Live);
        client.shutdown();
    }

    #[tokio::test]
    async fn test_offline_write_surfaces_error() {
        let client = SyncClient::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        client.check_health().await;
        let err = client
            .update_config(&SystemConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unreachable(_)));
        client.shutdown();
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_network() {
        let client = SyncClient::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        let mut cfg = SystemConfig::default();
        cfg.timeline.num_timelines = 99;
        let err = client.update_config(&cfg).await.unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        client.shutdown();
    }
}
