//! Live configuration schema
//!
//! The backend owns the schema; the console edits and saves it as a whole
//! object. Recognized option groups are typed with range validation, while
//! unrecognized keys are preserved round-trip through flattened maps so a
//! newer backend's settings survive an edit/save cycle.

use crate::error::{Error, Result};
use crate::models::Severity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Swarm privacy level for inter-camera sharing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    Metadata,
    Features,
    Full,
}

impl Default for PrivacyLevel {
    fn default() -> Self {
        Self::Metadata
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceptionConfig {
    /// Target frame rate, 1-60
    pub fps: u32,
    /// Detection cutoff, 0-1
    pub confidence_threshold: f64,
    /// 1-500
    pub max_tracks: u32,
    pub enable_behavior: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            confidence_threshold: 0.5,
            max_tracks: 50,
            enable_behavior: true,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Seconds, 10-300
    pub prediction_horizon: u32,
    /// 1-10
    pub num_timelines: u32,
    /// 100-5000
    pub update_interval_ms: u32,
    /// 0-1
    pub min_event_probability: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            prediction_horizon: 300,
            num_timelines: 3,
            update_interval_ms: 1000,
            min_event_probability: 0.3,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    pub privacy_level: PrivacyLevel,
    pub enable_federated_learning: bool,
    /// 0.5-1
    pub consensus_threshold: f64,
    /// host:port
    pub mqtt_broker: String,
    pub enable_track_handoff: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            privacy_level: PrivacyLevel::Metadata,
            enable_federated_learning: false,
            consensus_threshold: 0.66,
            mqtt_broker: "localhost:1883".to_string(),
            enable_track_handoff: true,
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionConfig {
    pub auto_execute: bool,
    pub min_severity: Severity,
    pub notification_email: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            auto_execute: false,
            min_severity: Severity::High,
            notification_email: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 1-365
    pub event_retention_days: u32,
    pub enable_video_recording: bool,
    /// 1-1000
    pub max_storage_gb: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            event_retention_days: 30,
            enable_video_recording: false,
            max_storage_gb: 100,
            extra: BTreeMap::new(),
        }
    }
}

/// Full live configuration object, saved as a whole on POST
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default)]
    pub perception: PerceptionConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub swarm: SwarmConfig,
    #[serde(default)]
    pub intervention: InterventionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn check_range<T: PartialOrd + std::fmt::Display>(
    key: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(Error::InvalidConfig(format!(
            "{} = {} outside [{}, {}]",
            key, value, min, max
        )));
    }
    Ok(())
}

impl SystemConfig {
    /// Validate every recognized option against its declared domain,
    /// naming the offending key on failure.
    pub fn validate(&self) -> Result<()> {
        check_range("perception.fps", self.perception.fps, 1, 60)?;
        check_range(
            "perception.confidence_threshold",
            self.perception.confidence_threshold,
            0.0,
            1.0,
        )?;
        check_range("perception.max_tracks", self.perception.max_tracks, 1, 500)?;
        check_range(
            "timeline.prediction_horizon",
            self.timeline.prediction_horizon,
            10,
            300,
        )?;
        check_range("timeline.num_timelines", self.timeline.num_timelines, 1, 10)?;
        check_range(
            "timeline.update_interval_ms",
            self.timeline.update_interval_ms,
            100,
            5000,
        )?;
        check_range(
            "timeline.min_event_probability",
            self.timeline.min_event_probability,
            0.0,
            1.0,
        )?;
        check_range(
            "swarm.consensus_threshold",
            self.swarm.consensus_threshold,
            0.5,
            1.0,
        )?;
        if self.swarm.mqtt_broker.is_empty() || !self.swarm.mqtt_broker.contains(':') {
            return Err(Error::InvalidConfig(format!(
                "swarm.mqtt_broker = \"{}\" is not host:port",
                self.swarm.mqtt_broker
            )));
        }
        check_range(
            "storage.event_retention_days",
            self.storage.event_retention_days,
            1,
            365,
        )?;
        check_range("storage.max_storage_gb", self.storage.max_storage_gb, 1, 1000)?;
        Ok(())
    }
}
