//! Synthetic data catalog
//!
//! ## Responsibilities
//!
//! - Plausible canned responses for every domain endpoint
//! - Longest-matching-prefix lookup over an ordered path table
//!
//! Consulted by the sync client only after it has decided the backend is
//! unreachable. Every payload carries `"mode": "synthetic"` (directly or in
//! the statistics map) so views can label demo data. Payload content
//! mirrors the live backend's shapes; cell values and timestamps are
//! regenerated per call so the console still looks alive.

use crate::config::SystemConfig;
use crate::models::{
    Camera, CameraStatus, Event, EventType, GridStatistics, Hotspot, Intervention,
    InterventionType, Location, PreventedEvent, Severity, ThreatGrid, Timeline, Track,
};
use crate::sync_client::types::{
    BoundingBox, CamerasResponse, ConfigAck, Detection, DetectionsResponse, EventsResponse,
    HeatmapResponse, InterventionsResponse, ModuleStatus, NetworkStatistics, StatisticsResponse,
    StatusResponse, SwarmNetworkResponse, TimelinesResponse, TracksResponse,
};
use chrono::Utc;
use rand::Rng;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Marker value used in synthetic payloads
pub const SYNTHETIC_MODE: &str = "synthetic";

const HEATMAP_GRID_SIZE: usize = 20;

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn status() -> StatusResponse {
    let mut modules = BTreeMap::new();
    for name in ["perception", "timeline", "swarm"] {
        modules.insert(
            name.to_string(),
            ModuleStatus {
                status: "active".to_string(),
                extra: BTreeMap::new(),
            },
        );
    }
    StatusResponse {
        status: "active".to_string(),
        mode: Some(SYNTHETIC_MODE.to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: 3600,
        fps: 24.5,
        latency_ms: 12.3,
        camera_id: "P3285-LVE".to_string(),
        modules,
    }
}

pub fn statistics() -> StatisticsResponse {
    let mut values = BTreeMap::new();
    values.insert("mode".to_string(), json!(SYNTHETIC_MODE));
    values.insert("active_tracks".to_string(), json!(2));
    values.insert("events_last_hour".to_string(), json!(7));
    values.insert("cameras_online".to_string(), json!(4));
    values.insert("average_fps".to_string(), json!(24.5));
    StatisticsResponse { values }
}

pub fn tracks() -> TracksResponse {
    TracksResponse {
        tracks: vec![
            Track {
                id: "42".to_string(),
                x: 0.31,
                y: 0.44,
                vx: 0.01,
                vy: -0.02,
                confidence: 0.95,
                threat_score: 0.62,
                behaviors: vec!["loitering".to_string()],
                history: vec![
                    Location { x: 0.28, y: 0.50 },
                    Location { x: 0.29, y: 0.47 },
                    Location { x: 0.31, y: 0.44 },
                ],
            },
            Track {
                id: "17".to_string(),
                x: 0.71,
                y: 0.33,
                vx: -0.03,
                vy: 0.0,
                confidence: 0.88,
                threat_score: 0.18,
                behaviors: vec![],
                history: vec![Location { x: 0.78, y: 0.33 }, Location { x: 0.71, y: 0.33 }],
            },
        ],
    }
}

pub fn events() -> EventsResponse {
    let now = now_ms();
    EventsResponse {
        events: vec![
            Event {
                id: "1".to_string(),
                event_type: EventType::Loitering,
                severity: Severity::Medium,
                probability: 0.78,
                timestamp_ms: now - 300_000,
                location: Location { x: 0.23, y: 0.25 },
                involved_tracks: vec!["42".to_string()],
                description: "Person in restricted area for extended period".to_string(),
                recommended_intervention: Some(InterventionType::AlertSecurity),
            },
            Event {
                id: "2".to_string(),
                event_type: EventType::AbandonedObject,
                severity: Severity::High,
                probability: 0.85,
                timestamp_ms: now - 180_000,
                location: Location { x: 0.34, y: 0.38 },
                involved_tracks: vec![],
                description: "Unattended object detected".to_string(),
                recommended_intervention: Some(InterventionType::DisplayWarning),
            },
            Event {
                id: "3".to_string(),
                event_type: EventType::Trespassing,
                severity: Severity::High,
                probability: 0.92,
                timestamp_ms: now - 60_000,
                location: Location { x: 0.63, y: 0.52 },
                involved_tracks: vec!["17".to_string()],
                description: "Object crossed security perimeter".to_string(),
                recommended_intervention: Some(InterventionType::NotifyPolice),
            },
        ],
    }
}

fn camera_fleet() -> Vec<Camera> {
    let ids = [
        "P3285-LVE",
        "Q1656-LE",
        "M3085-V",
        "P1465-LE",
        "Q6135-LE",
        "M4308-PLE",
    ];
    let statuses = [
        CameraStatus::Online,
        CameraStatus::Online,
        CameraStatus::Warning,
        CameraStatus::Online,
        CameraStatus::Offline,
        CameraStatus::Online,
    ];
    let n = ids.len();
    ids.iter()
        .enumerate()
        .map(|(i, id)| Camera {
            id: (*id).to_string(),
            name: format!("Camera {}", i + 1),
            ip: format!("192.168.1.{}", 100 + i),
            status: statuses[i],
            fov_angle: 110.0,
            orientation: (i as f64) * 60.0,
            // Ring adjacency: field of view overlaps each side neighbor
            neighbors: vec![
                ids[(i + n - 1) % n].to_string(),
                ids[(i + 1) % n].to_string(),
            ],
            fps: 24.0,
            latency_ms: 12.0 + i as f64,
            active_tracks: (i as u32) % 3,
            events_detected: 10 + i as u64 * 3,
        })
        .collect()
}

pub fn cameras() -> CamerasResponse {
    let cameras = camera_fleet();
    let online = cameras
        .iter()
        .filter(|c| c.status == CameraStatus::Online)
        .count();
    let mut extra = BTreeMap::new();
    extra.insert("mode".to_string(), json!(SYNTHETIC_MODE));
    CamerasResponse {
        statistics: NetworkStatistics {
            health: online as f64 / cameras.len() as f64,
            messages_per_sec: 42.0,
            extra,
        },
        cameras,
    }
}

pub fn swarm_network() -> SwarmNetworkResponse {
    let cameras = camera_fleet();
    let online = cameras
        .iter()
        .filter(|c| c.status == CameraStatus::Online)
        .count();
    SwarmNetworkResponse {
        topology: "mesh".to_string(),
        total_cameras: cameras.len() as u32,
        active_connections: cameras.iter().map(|c| c.neighbors.len() as u32).sum::<u32>() / 2,
        health_score: online as f64 / cameras.len() as f64,
        cameras,
    }
}

pub fn heatmap() -> HeatmapResponse {
    let mut rng = rand::thread_rng();
    let size = HEATMAP_GRID_SIZE;
    let mut values = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            // Two persistent hotspots: bottom-left and top-right corners
            let v = if x < 5 && y > 15 {
                rng.gen_range(0.2..1.0)
            } else if x > 15 && y < 5 {
                rng.gen_range(0.1..0.7)
            } else {
                rng.gen_range(0.0..0.3)
            };
            values.push(v);
        }
    }
    let grid = ThreatGrid {
        width: size,
        height: size,
        values,
    };
    HeatmapResponse {
        timestamp: Some(Utc::now().to_rfc3339()),
        statistics: grid_statistics(&grid),
        grid,
    }
}

fn grid_statistics(grid: &ThreatGrid) -> GridStatistics {
    let mut hotspots: Vec<Hotspot> = Vec::new();
    let mut sum = 0.0;
    let mut max = 0.0f64;
    let mut safe = 0u32;
    let mut hot = 0u32;
    for y in 0..grid.height {
        for x in 0..grid.width {
            let Some(v) = grid.cell(x, y) else { continue };
            sum += v;
            max = max.max(v);
            if v < 0.33 {
                safe += 1;
            }
            if v >= 0.66 {
                hot += 1;
                hotspots.push(Hotspot {
                    x: x as f64 / grid.width as f64,
                    y: y as f64 / grid.height as f64,
                    threat: v,
                    event_count: (v * 10.0) as u32,
                    track_count: 0,
                });
            }
        }
    }
    hotspots.sort_by(|a, b| b.threat.total_cmp(&a.threat));
    hotspots.truncate(5);
    let cells = (grid.width * grid.height).max(1) as f64;
    GridStatistics {
        hotspots,
        hotspot_count: hot,
        average_threat: sum / cells,
        max_threat: max,
        safe_zone_count: safe,
    }
}

pub fn config() -> SystemConfig {
    SystemConfig::default()
}

pub fn config_ack() -> ConfigAck {
    ConfigAck {
        status: "ok".to_string(),
        message: Some(SYNTHETIC_MODE.to_string()),
    }
}

pub fn timelines() -> TimelinesResponse {
    let now = now_ms();
    let event = |id: &str, t: EventType, sev: Severity, p: f64, offset_s: i64, x: f64, y: f64| Event {
        id: id.to_string(),
        event_type: t,
        severity: sev,
        probability: p,
        timestamp_ms: now + offset_s * 1000,
        location: Location { x, y },
        involved_tracks: vec![],
        description: String::new(),
        recommended_intervention: None,
    };
    TimelinesResponse {
        timelines: vec![
            Timeline {
                id: "A".to_string(),
                probability: 0.65,
                events: vec![event(
                    "a1",
                    EventType::Loitering,
                    Severity::Medium,
                    0.72,
                    120,
                    0.23,
                    0.25,
                )],
                interventions: vec![Intervention {
                    intervention_type: InterventionType::AlertSecurity,
                    recommendation: "Dispatch guard to north entrance".to_string(),
                    effectiveness: 0.85,
                    cost: 0.3,
                    prevented_event: Some(PreventedEvent {
                        event_type: EventType::Loitering,
                        severity: Severity::Medium,
                    }),
                    timestamp_ms: now + 90_000,
                }],
                horizon_seconds: 300.0,
            },
            Timeline {
                id: "B".to_string(),
                probability: 0.25,
                events: vec![event(
                    "b1",
                    EventType::Trespassing,
                    Severity::High,
                    0.68,
                    180,
                    0.55,
                    0.46,
                )],
                interventions: vec![Intervention {
                    intervention_type: InterventionType::LockDoor,
                    recommendation: "Lock perimeter gate B".to_string(),
                    effectiveness: 0.9,
                    cost: 0.1,
                    prevented_event: Some(PreventedEvent {
                        event_type: EventType::Trespassing,
                        severity: Severity::High,
                    }),
                    timestamp_ms: now + 150_000,
                }],
                horizon_seconds: 300.0,
            },
            Timeline {
                id: "C".to_string(),
                probability: 0.10,
                events: vec![event(
                    "c1",
                    EventType::CrowdFormation,
                    Severity::Low,
                    0.55,
                    240,
                    0.31,
                    0.31,
                )],
                interventions: vec![Intervention {
                    intervention_type: InterventionType::IncreaseLighting,
                    recommendation: "Raise lighting in plaza zone".to_string(),
                    effectiveness: 0.6,
                    cost: 0.05,
                    prevented_event: Some(PreventedEvent {
                        event_type: EventType::CrowdFormation,
                        severity: Severity::Low,
                    }),
                    timestamp_ms: now + 200_000,
                }],
                horizon_seconds: 300.0,
            },
        ],
    }
}

pub fn interventions() -> InterventionsResponse {
    InterventionsResponse {
        interventions: timelines()
            .timelines
            .into_iter()
            .flat_map(|t| t.interventions)
            .collect(),
    }
}

pub fn detections() -> DetectionsResponse {
    DetectionsResponse {
        timestamp: Some(Utc::now().to_rfc3339()),
        frame_number: 1234,
        detections: vec![
            Detection {
                id: 1,
                class_name: "person".to_string(),
                confidence: 0.95,
                bbox: BoundingBox {
                    x: 120.0,
                    y: 80.0,
                    width: 60.0,
                    height: 140.0,
                },
                track_id: Some(42),
            },
            Detection {
                id: 2,
                class_name: "vehicle".to_string(),
                confidence: 0.88,
                bbox: BoundingBox {
                    x: 300.0,
                    y: 200.0,
                    width: 120.0,
                    height: 80.0,
                },
                track_id: Some(17),
            },
        ],
    }
}

fn health() -> Value {
    json!({ "status": "ok", "mode": SYNTHETIC_MODE })
}

/// Placeholder for paths with no catalog entry
pub fn placeholder() -> Value {
    json!({ "status": "ok", "mode": SYNTHETIC_MODE })
}

fn to_value<T: serde::Serialize>(v: T) -> Value {
    serde_json::to_value(v).unwrap_or_else(|_| placeholder())
}

/// The path table, in declaration order. Lookup sorts by descending prefix
/// length so the longest prefix deterministically wins (for example
/// `/api/statistics` before `/api/stats`, `/api/timeline/predictions`
/// before `/api/timelines` never shadow each other).
fn table() -> Vec<(&'static str, fn() -> Value)> {
    vec![
        ("/api/health", || health()),
        ("/api/status", || to_value(status())),
        ("/api/statistics", || to_value(statistics())),
        ("/api/stats", || to_value(statistics())),
        ("/api/tracks", || to_value(tracks())),
        ("/api/events", || to_value(events())),
        ("/api/cameras", || to_value(cameras())),
        ("/api/heatmap", || to_value(heatmap())),
        ("/api/config", || to_value(config())),
        ("/api/timelines", || to_value(timelines())),
        ("/api/timeline/predictions", || to_value(timelines())),
        ("/api/swarm/network", || to_value(swarm_network())),
        ("/api/swarm/cameras", || to_value(swarm_network())),
        ("/api/perception/detections", || to_value(detections())),
        ("/api/interventions", || to_value(interventions())),
    ]
}

/// Look up the canned payload for a request path (query string ignored
/// by prefix matching). Unmatched paths get a generic placeholder rather
/// than failing.
pub fn payload_for(path: &str) -> Value {
    let mut entries = table();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    for (prefix, build) in entries {
        if path.starts_with(prefix) {
            return build();
        }
    }
    placeholder()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        let v = payload_for("/api/statistics");
        assert!(v.get("active_tracks").is_some());
        let v = payload_for("/api/stats");
        assert!(v.get("active_tracks").is_some());
        let v = payload_for("/api/timeline/predictions");
        assert!(v.get("timelines").is_some());
        let v = payload_for("/api/swarm/network");
        assert_eq!(v["topology"], "mesh");
    }

    #[test]
    fn test_query_string_ignored() {
        let v = payload_for("/api/heatmap?timeRange=60");
        assert!(v.get("grid").is_some());
    }

    #[test]
    fn test_unmatched_path_gets_placeholder() {
        let v = payload_for("/api/does/not/exist");
        assert_eq!(v["mode"], SYNTHETIC_MODE);
        assert_eq!(v["status"], "ok");
    }

    #[test]
    fn test_heatmap_grid_well_formed() {
        let h = heatmap();
        assert!(h.grid.is_well_formed());
        assert_eq!(h.grid.values.len(), 400);
        assert!(h.statistics.max_threat <= 1.0);
        assert!(h.statistics.average_threat > 0.0);
        // The two seeded corners always produce hotspots
        assert!(h.statistics.hotspot_count > 0);
    }

    #[test]
    fn test_payloads_decode_into_typed_envelopes() {
        use crate::sync_client::types::*;
        serde_json::from_value::<StatusResponse>(payload_for("/api/status")).unwrap();
        serde_json::from_value::<TracksResponse>(payload_for("/api/tracks")).unwrap();
        serde_json::from_value::<EventsResponse>(payload_for("/api/events")).unwrap();
        serde_json::from_value::<CamerasResponse>(payload_for("/api/cameras")).unwrap();
        serde_json::from_value::<HeatmapResponse>(payload_for("/api/heatmap")).unwrap();
        serde_json::from_value::<TimelinesResponse>(payload_for("/api/timelines")).unwrap();
        serde_json::from_value::<SwarmNetworkResponse>(payload_for("/api/swarm/network")).unwrap();
        serde_json::from_value::<DetectionsResponse>(payload_for("/api/perception/detections"))
            .unwrap();
        serde_json::from_value::<InterventionsResponse>(payload_for("/api/interventions")).unwrap();
        serde_json::from_value::<crate::config::SystemConfig>(payload_for("/api/config")).unwrap();
    }

    #[test]
    fn test_camera_fleet_adjacency_is_ring() {
        let fleet = camera_fleet();
        for cam in &fleet {
            assert_eq!(cam.neighbors().count(), 2);
            for n in cam.neighbors() {
                assert!(fleet.iter().any(|c| c.id == n), "dangling neighbor {}", n);
            }
        }
    }
}
