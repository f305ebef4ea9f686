//! OMNISIGHT Console Library
//!
//! Client-side core for the OMNISIGHT monitoring console: keeps the UI
//! usably live against an unreliable camera-analytics backend and turns
//! domain snapshots into deterministic 2-D geometry.
//!
//! ## Architecture
//!
//! 1. Transport - bounded HTTP requests, push channel, polling fallback
//! 2. SyncClient - typed per-domain fetches, probe, synthetic fallback
//! 3. Synthetic - canned responses served while the backend is down
//! 4. Render - topology / heatmap / timeline geometry + hit-testing
//!
//! ## Design Principles
//!
//! - Reads never fail: connectivity loss degrades to labeled synthetic
//!   data, not blank screens
//! - Config writes always surface failures: no operator edit is lost
//!   silently
//! - Rendering is pure: `(entities, canvas size) -> draw commands`, so
//!   geometry is unit-testable without a surface

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod sync_client;
pub mod synthetic;
pub mod transport;

pub use error::{Error, Result};
pub use models::ConnectionState;
pub use sync_client::SyncClient;
