//! Timeline axis view
//!
//! Positions predicted events and interventions along a horizontal time
//! axis as percentages of a horizon window. Items outside the window clamp
//! to the axis edges so operators still see overflow markers at the
//! boundary instead of items silently disappearing.

use crate::models::{Severity, Timeline};

/// Horizontal position along the axis in percent.
///
/// `(timestamp − now) / horizon`, clamped to [0, 100]. A non-positive
/// horizon collapses everything to the left edge.
pub fn axis_position(timestamp_ms: i64, now_ms: i64, horizon_secs: f64) -> f64 {
    if horizon_secs <= 0.0 {
        return 0.0;
    }
    let time_until_secs = (timestamp_ms - now_ms) as f64 / 1000.0;
    ((time_until_secs / horizon_secs) * 100.0).clamp(0.0, 100.0)
}

/// Tick labels for the axis scale: five marks from NOW to the horizon.
pub fn axis_ticks(horizon_secs: f64) -> [f64; 5] {
    let mut ticks = [0.0; 5];
    for (i, tick) in ticks.iter_mut().enumerate() {
        *tick = (horizon_secs * i as f64 / 4.0).round();
    }
    ticks
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Event,
    Intervention,
}

/// One positioned marker on the axis
#[derive(Debug, Clone)]
pub struct AxisMarker {
    pub kind: MarkerKind,
    /// Percent along the axis, 0 = now, 100 = horizon
    pub position_pct: f64,
    /// Kind badge: warning triangle for events, shield for interventions
    pub badge: &'static str,
    /// Type-specific glyph from the fixed lookup tables
    pub glyph: &'static str,
    pub severity: Severity,
    pub label: String,
    /// Seconds until the item, negative when already past
    pub time_until_secs: f64,
}

/// Project one timeline's events and interventions onto the axis.
pub fn render(timeline: &Timeline, horizon_secs: f64, now_ms: i64) -> Vec<AxisMarker> {
    let mut markers = Vec::with_capacity(timeline.events.len() + timeline.interventions.len());

    for event in &timeline.events {
        markers.push(AxisMarker {
            kind: MarkerKind::Event,
            position_pct: axis_position(event.timestamp_ms, now_ms, horizon_secs),
            badge: "⚠️",
            glyph: event.event_type.icon(),
            severity: event.severity,
            label: if event.description.is_empty() {
                format!("{:?}", event.event_type)
            } else {
                event.description.clone()
            },
            time_until_secs: (event.timestamp_ms - now_ms) as f64 / 1000.0,
        });
    }

    for intervention in &timeline.interventions {
        markers.push(AxisMarker {
            kind: MarkerKind::Intervention,
            position_pct: axis_position(intervention.timestamp_ms, now_ms, horizon_secs),
            badge: "🛡️",
            glyph: intervention.intervention_type.icon(),
            severity: intervention
                .prevented_event
                .as_ref()
                .map(|p| p.severity)
                .unwrap_or(Severity::None),
            label: intervention.recommendation.clone(),
            time_until_secs: (intervention.timestamp_ms - now_ms) as f64 / 1000.0,
        });
    }

    markers
}
