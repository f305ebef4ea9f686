//! Shared domain models for the OMNISIGHT console
//!
//! Every entity here is a transient view-model snapshot: rebuilt on each
//! synchronization tick, never mutated in place. Values arriving from the
//! backend are clamped into their declared domains before rendering.

use serde::{Deserialize, Serialize};

/// Clamp a scalar into the unit interval. NaN collapses to 0.
pub fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ============================================================
// Connection State
// ============================================================

/// Connection state of one [`SyncClient`](crate::sync_client::SyncClient)
///
/// Owned by a single client instance; multiple consoles hold independent
/// clients with independent states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// Initial availability probe still in flight
    Probing,
    /// Backend reachable, request/response and push channel usable
    Live,
    /// Push channel exhausted, caller fell back to polling
    DegradedPolling,
    /// Backend unreachable, all reads served from the synthetic catalog
    OfflineSynthetic,
}

impl ConnectionState {
    /// True when reads must be served from the synthetic catalog.
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::OfflineSynthetic)
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Probing => write!(f, "probing"),
            Self::Live => write!(f, "live"),
            Self::DegradedPolling => write!(f, "degraded_polling"),
            Self::OfflineSynthetic => write!(f, "offline_synthetic"),
        }
    }
}

// ============================================================
// Camera
// ============================================================

/// Camera operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Online,
    Offline,
    Warning,
    #[serde(other)]
    Unknown,
}

impl Default for CameraStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for CameraStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online => write!(f, "online"),
            Self::Offline => write!(f, "offline"),
            Self::Warning => write!(f, "warning"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One camera in the swarm network
///
/// `neighbors` holds the ids of cameras with overlapping field of view.
/// The adjacency is undirected in intent but may be one-sided in raw data;
/// consumers must tolerate edges listed on only one endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub status: CameraStatus,
    /// Field-of-view angle in degrees
    #[serde(default)]
    pub fov_angle: f64,
    /// Orientation in degrees (0 = east, counterclockwise negative on canvas)
    #[serde(default)]
    pub orientation: f64,
    #[serde(default)]
    pub neighbors: Vec<String>,
    #[serde(default)]
    pub fps: f64,
    #[serde(default)]
    pub latency_ms: f64,
    #[serde(default)]
    pub active_tracks: u32,
    #[serde(default)]
    pub events_detected: u64,
}

impl Camera {
    /// Neighbor ids with any self-reference filtered out.
    pub fn neighbors(&self) -> impl Iterator<Item = &str> {
        let own = self.id.as_str();
        self.neighbors
            .iter()
            .map(String::as_str)
            .filter(move |n| *n != own)
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

// ============================================================
// Severity
// ============================================================

/// Event severity
///
/// Wire format is either a lowercase string ("low".."critical") or a 0-4
/// ordinal; both deserialize here. `None` is ordinal 0 (the color ramp and
/// the ordinal scale both carry five levels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Ordinal on the 0-4 scale; strictly monotonic with threat level.
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Inverse of [`ordinal`](Self::ordinal); out-of-range clamps to Critical.
    pub fn from_ordinal(n: i64) -> Self {
        match n {
            i64::MIN..=0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Low
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" => Self::None,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            // Unknown tags default to the lowest actionable level
            _ => Self::Low,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(i64),
            Text(String),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Num(n) => Severity::from_ordinal(n),
            Repr::Text(s) => Severity::from(s.as_str()),
        })
    }
}

// ============================================================
// Event
// ============================================================

/// Event type vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Loitering,
    Theft,
    Assault,
    Vandalism,
    Trespassing,
    SuspiciousBehavior,
    Collision,
    Fall,
    AbandonedObject,
    CrowdFormation,
    #[serde(other)]
    Unknown,
}

impl Default for EventType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl EventType {
    /// Display glyph; unknown tags fall back to a generic warning.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Loitering => "🚶",
            Self::Theft => "🏃",
            Self::Assault => "⚔️",
            Self::Vandalism => "🔨",
            Self::Trespassing => "🚫",
            Self::SuspiciousBehavior => "👁️",
            Self::Collision => "💥",
            Self::Fall => "🤕",
            Self::AbandonedObject => "📦",
            Self::CrowdFormation => "👥",
            Self::Unknown => "⚠️",
        }
    }
}

/// Intervention type vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    AlertSecurity,
    ActivateSpeaker,
    IncreaseLighting,
    PositionGuard,
    LockDoor,
    NotifyPolice,
    DisplayWarning,
    #[serde(other)]
    Unknown,
}

impl Default for InterventionType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl InterventionType {
    /// Display glyph; unknown tags fall back to a generic shield.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::AlertSecurity => "🚨",
            Self::ActivateSpeaker => "📢",
            Self::IncreaseLighting => "💡",
            Self::PositionGuard => "💂",
            Self::LockDoor => "🔒",
            Self::NotifyPolice => "🚔",
            Self::DisplayWarning => "⚠️",
            Self::Unknown => "🛡️",
        }
    }
}

/// 2-D location, coordinate space documented per call site
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

/// Detected or predicted security event
///
/// `timestamp_ms` may lie in the future for predicted events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub probability: f64,
    /// Unix epoch milliseconds
    #[serde(default)]
    pub timestamp_ms: i64,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub involved_tracks: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_intervention: Option<InterventionType>,
}

impl Event {
    /// Probability clamped to [0,1] for rendering.
    pub fn probability(&self) -> f64 {
        clamp_unit(self.probability)
    }
}

// ============================================================
// Track
// ============================================================

/// A tracked moving object
///
/// Position space depends on the producing endpoint; the heatmap overlay
/// expects frame-normalized 0..1 coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub threat_score: f64,
    #[serde(default)]
    pub behaviors: Vec<String>,
    /// Past positions, oldest first
    #[serde(default)]
    pub history: Vec<Location>,
}

impl Track {
    /// Threat score clamped to [0,1] for rendering.
    pub fn threat(&self) -> f64 {
        clamp_unit(self.threat_score)
    }
}

// ============================================================
// Timeline
// ============================================================

/// A recommended mitigating action tied to a predicted event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intervention {
    #[serde(rename = "type", default)]
    pub intervention_type: InterventionType,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub effectiveness: f64,
    #[serde(default)]
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prevented_event: Option<PreventedEvent>,
    /// Recommended moment of action, unix epoch milliseconds
    #[serde(default)]
    pub timestamp_ms: i64,
}

/// The event an intervention is predicted to prevent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreventedEvent {
    #[serde(rename = "type", default)]
    pub event_type: EventType,
    #[serde(default)]
    pub severity: Severity,
}

/// One candidate future
///
/// Probabilities across a timeline set are independent hypotheses and need
/// not sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub interventions: Vec<Intervention>,
    #[serde(default)]
    pub horizon_seconds: f64,
}

impl Timeline {
    /// Highest event severity, or `None` for an empty timeline.
    pub fn overall_severity(&self) -> Severity {
        self.events
            .iter()
            .map(|e| e.severity)
            .max()
            .unwrap_or(Severity::None)
    }

    /// Probability clamped to [0,1] for rendering.
    pub fn probability(&self) -> f64 {
        clamp_unit(self.probability)
    }
}

// ============================================================
// Threat Grid
// ============================================================

/// Regular 2-D grid of threat intensity, row-major
///
/// `values.len()` should equal `width * height` but malformed payloads do
/// occur; all access is bounds-checked so a short or long vector degrades
/// to empty cells instead of indexing out of range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreatGrid {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub values: Vec<f64>,
}

impl ThreatGrid {
    /// Cell value clamped to [0,1]; `None` for out-of-range coordinates or
    /// cells missing from a malformed values vector.
    pub fn cell(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y * self.width + x).map(|v| clamp_unit(*v))
    }

    pub fn is_well_formed(&self) -> bool {
        self.values.len() == self.width * self.height
    }
}

/// A concentrated-threat cell cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub threat: f64,
    #[serde(default)]
    pub event_count: u32,
    #[serde(default)]
    pub track_count: u32,
}

/// Derived statistics for a [`ThreatGrid`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridStatistics {
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
    #[serde(default)]
    pub hotspot_count: u32,
    #[serde(default)]
    pub average_threat: f64,
    #[serde(default)]
    pub max_threat: f64,
    #[serde(default)]
    pub safe_zone_count: u32,
}

// ============================================================
// Push Messages
// ============================================================

/// Inbound push-channel message
///
/// Tagged by `type` with the payload under `data`. Unrecognized type tags
/// deserialize to `Unknown` and are dropped by consumers rather than
/// erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum PushMessage {
    Event(Event),
    #[serde(other)]
    Unknown,
}
