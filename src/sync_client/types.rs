//! Response envelopes per data domain
//!
//! Shapes follow the backend's REST surface. Everything is defaulted so a
//! partially-populated payload from an older backend still decodes.

use crate::models::{Camera, Event, GridStatistics, Intervention, ThreatGrid, Timeline, Track};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Per-module status block inside [`StatusResponse`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleStatus {
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// GET /api/status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    /// "synthetic" when served from the fallback catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub uptime_seconds: u64,
    #[serde(default)]
    pub fps: f64,
    #[serde(default)]
    pub latency_ms: f64,
    #[serde(default)]
    pub camera_id: String,
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleStatus>,
}

/// GET /api/statistics
///
/// The statistics surface is backend-defined and changes between releases;
/// kept as an open map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsResponse {
    #[serde(flatten)]
    pub values: BTreeMap<String, Value>,
}

/// GET /api/tracks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TracksResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// GET /api/events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Aggregate network statistics inside [`CamerasResponse`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkStatistics {
    #[serde(default)]
    pub health: f64,
    #[serde(default)]
    pub messages_per_sec: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// GET /api/cameras
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CamerasResponse {
    #[serde(default)]
    pub cameras: Vec<Camera>,
    #[serde(default)]
    pub statistics: NetworkStatistics,
}

/// GET /api/heatmap?timeRange=N
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeatmapResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub grid: ThreatGrid,
    #[serde(default)]
    pub statistics: GridStatistics,
}

/// GET /api/timelines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelinesResponse {
    #[serde(default)]
    pub timelines: Vec<Timeline>,
}

/// GET /api/swarm/network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwarmNetworkResponse {
    #[serde(default)]
    pub topology: String,
    #[serde(default)]
    pub cameras: Vec<Camera>,
    #[serde(default)]
    pub total_cameras: u32,
    #[serde(default)]
    pub active_connections: u32,
    #[serde(default)]
    pub health_score: f64,
}

/// Axis-aligned bounding box in frame pixels
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One raw perception detection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "class", default)]
    pub class_name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub bbox: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<u64>,
}

/// GET /api/perception/detections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub frame_number: u64,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

/// GET /api/interventions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterventionsResponse {
    #[serde(default)]
    pub interventions: Vec<Intervention>,
}

/// POST /api/config acknowledgement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigAck {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
