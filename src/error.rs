//! Error handling for the OMNISIGHT console

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
///
/// Read-path failures (`Unreachable`, `MalformedResponse`) are absorbed by
/// the [`SyncClient`](crate::sync_client::SyncClient) and converted to
/// synthetic data; they only reach callers on write paths and on the push
/// channel's error callback.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Backend could not be reached (network error, timeout, non-2xx)
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Payload could not be parsed into the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Push channel exceeded its reconnect budget
    #[error("Push channel exhausted after {attempts} reconnect attempts")]
    ChannelExhausted { attempts: u32 },

    /// Config save rejected by the backend
    #[error("Config write rejected: {0}")]
    WriteRejected(String),

    /// Config value outside its allowed domain
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Unreachable(e.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}
