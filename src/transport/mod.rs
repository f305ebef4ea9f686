//! Transport primitives
//!
//! ## Responsibilities
//!
//! - Bounded request/response primitive over one shared HTTP client
//! - Push-channel factory with reconnect backoff ([`push_channel`])
//! - Cooperative polling fallback loop ([`poller`])
//!
//! Every data request carries the same 2s bound as the availability probe
//! so a hanging call can never stall a view's refresh cycle.

pub mod poller;
pub mod push_channel;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Total and connect timeout applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Typed request primitive bound to one base address
#[derive(Debug, Clone)]
pub struct Http {
    client: reqwest::Client,
    base_url: String,
}

impl Http {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Unreachable(format!(
                "HTTP {} on GET {}",
                status.as_u16(),
                path
            )));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::MalformedResponse(format!("GET {}: {}", path, e)))
    }

    /// POST a JSON body to `path` and decode the JSON response.
    ///
    /// Non-2xx statuses map to [`Error::WriteRejected`]; the caller decides
    /// whether transport failures surface or fall back.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::WriteRejected(format!(
                "HTTP {} on POST {}: {}",
                status.as_u16(),
                path,
                detail
            )));
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| Error::MalformedResponse(format!("POST {}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let http = Http::new("http://localhost:8080/");
        assert_eq!(http.url("/api/status"), "http://localhost:8080/api/status");
    }

    #[tokio::test]
    async fn test_unreachable_maps_to_error() {
        // Port 9 (discard) is never listening in test environments
        let http = Http::new("http://127.0.0.1:9");
        let err = http
            .get_json::<serde_json::Value>("/api/status")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Unreachable(_)));
    }
}
