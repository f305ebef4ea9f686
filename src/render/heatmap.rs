//! Threat heatmap view
//!
//! Partitions the canvas into grid cells colored by threat band, then
//! overlays event markers and track dots. Tracks and events arrive in
//! frame-normalized 0..1 coordinates and are denormalized here. Malformed
//! grids (values shorter or longer than width×height) degrade to empty
//! cells; nothing indexes out of range.

use super::{palette, severity_color, threat_color, CanvasSize, ColorStop, DrawCommand, Point, TextAlign};
use crate::models::{clamp_unit, Event, ThreatGrid, Track};

/// Track labels appear above this threat score
pub const LABEL_THRESHOLD: f64 = 0.5;
/// Event glow radius in pixels
const GLOW_RADIUS: f64 = 30.0;

/// One heatmap frame to render
#[derive(Debug, Clone, Copy)]
pub struct HeatmapFrame<'a> {
    pub grid: &'a ThreatGrid,
    pub tracks: &'a [Track],
    pub events: &'a [Event],
    pub show_tracks: bool,
    pub show_events: bool,
}

/// Render the heatmap frame.
pub fn render(frame: &HeatmapFrame<'_>, size: CanvasSize) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear {
        color: palette::BACKGROUND,
    }];

    draw_grid_lines(&mut commands, size);
    draw_cells(&mut commands, frame.grid, size);

    if frame.show_events {
        for event in frame.events {
            draw_event_marker(&mut commands, event, size);
        }
    }
    if frame.show_tracks {
        for track in frame.tracks {
            draw_track_marker(&mut commands, track, size);
        }
    }

    draw_legend(&mut commands, size);
    commands
}

fn draw_grid_lines(commands: &mut Vec<DrawCommand>, size: CanvasSize) {
    for i in 0..=10 {
        let x = size.width * i as f64 / 10.0;
        commands.push(DrawCommand::Line {
            from: Point::new(x, 0.0),
            to: Point::new(x, size.height),
            width: 1.0,
            color: palette::GRID_LINE,
            dashed: false,
        });
        let y = size.height * i as f64 / 10.0;
        commands.push(DrawCommand::Line {
            from: Point::new(0.0, y),
            to: Point::new(size.width, y),
            width: 1.0,
            color: palette::GRID_LINE,
            dashed: false,
        });
    }
}

fn draw_cells(commands: &mut Vec<DrawCommand>, grid: &ThreatGrid, size: CanvasSize) {
    if grid.width == 0 || grid.height == 0 {
        return;
    }
    let cell_w = size.width / grid.width as f64;
    let cell_h = size.height / grid.height as f64;

    for y in 0..grid.height {
        for x in 0..grid.width {
            // cell() is bounds-checked; malformed grids yield None
            let Some(value) = grid.cell(x, y) else { continue };
            if value <= 0.0 {
                continue;
            }
            commands.push(DrawCommand::Rect {
                origin: Point::new(x as f64 * cell_w, y as f64 * cell_h),
                width: cell_w,
                height: cell_h,
                color: threat_color(value, 1.0),
                filled: true,
                line_width: 0.0,
            });
        }
    }
}

fn draw_event_marker(commands: &mut Vec<DrawCommand>, event: &Event, size: CanvasSize) {
    let at = Point::new(
        clamp_unit(event.location.x) * size.width,
        clamp_unit(event.location.y) * size.height,
    );
    let ordinal = event.severity.ordinal();

    commands.push(DrawCommand::RadialGlow {
        center: at,
        radius: GLOW_RADIUS,
        stops: vec![
            ColorStop {
                offset: 0.0,
                color: severity_color(ordinal, 0.6),
            },
            ColorStop {
                offset: 1.0,
                color: severity_color(ordinal, 0.0),
            },
        ],
    });
    commands.push(DrawCommand::Circle {
        center: at,
        radius: 8.0,
        color: severity_color(ordinal, 1.0),
        filled: true,
        line_width: 0.0,
    });
    commands.push(DrawCommand::Circle {
        center: at,
        radius: 8.0,
        color: palette::WHITE,
        filled: false,
        line_width: 2.0,
    });
    commands.push(DrawCommand::Text {
        at,
        content: event.event_type.icon().to_string(),
        color: palette::WHITE,
        size_px: 12.0,
        align: TextAlign::Center,
        bold: false,
    });
}

fn draw_track_marker(commands: &mut Vec<DrawCommand>, track: &Track, size: CanvasSize) {
    let at = Point::new(
        clamp_unit(track.x) * size.width,
        clamp_unit(track.y) * size.height,
    );
    let threat = track.threat();

    if track.history.len() > 1 {
        commands.push(DrawCommand::Polyline {
            points: track
                .history
                .iter()
                .map(|p| Point::new(clamp_unit(p.x) * size.width, clamp_unit(p.y) * size.height))
                .collect(),
            width: 2.0,
            color: threat_color(threat, 0.3),
        });
    }

    commands.push(DrawCommand::Circle {
        center: at,
        radius: 6.0,
        color: threat_color(threat, 0.8),
        filled: true,
        line_width: 0.0,
    });

    if threat > LABEL_THRESHOLD {
        commands.push(DrawCommand::Text {
            at: Point::new(at.x, at.y - 12.0),
            content: format!("#{}", track.id),
            color: palette::WHITE,
            size_px: 10.0,
            align: TextAlign::Center,
            bold: true,
        });
    }
}

fn draw_legend(commands: &mut Vec<DrawCommand>, size: CanvasSize) {
    let width = 200.0;
    let height = 100.0;
    let origin = Point::new(size.width - width - 20.0, 20.0);

    commands.push(DrawCommand::Rect {
        origin,
        width,
        height,
        color: palette::PANEL,
        filled: true,
        line_width: 0.0,
    });
    commands.push(DrawCommand::Rect {
        origin,
        width,
        height,
        color: palette::PANEL_BORDER,
        filled: false,
        line_width: 2.0,
    });
    commands.push(DrawCommand::Text {
        at: Point::new(origin.x + 10.0, origin.y + 20.0),
        content: "Threat Level".to_string(),
        color: palette::TEXT,
        size_px: 12.0,
        align: TextAlign::Left,
        bold: true,
    });

    let bar = Point::new(origin.x + 10.0, origin.y + 30.0);
    commands.push(DrawCommand::GradientRect {
        origin: bar,
        width: 180.0,
        height: 20.0,
        stops: vec![
            ColorStop {
                offset: 0.0,
                color: palette::GREEN,
            },
            ColorStop {
                offset: 0.33,
                color: palette::AMBER,
            },
            ColorStop {
                offset: 0.66,
                color: palette::RED,
            },
            ColorStop {
                offset: 1.0,
                color: palette::DARK_RED,
            },
        ],
    });

    for (content, x, align) in [
        ("Low".to_string(), bar.x, TextAlign::Left),
        ("Medium".to_string(), bar.x + 90.0, TextAlign::Center),
        ("Critical".to_string(), bar.x + 180.0, TextAlign::Right),
    ] {
        commands.push(DrawCommand::Text {
            at: Point::new(x, bar.y + 35.0),
            content,
            color: palette::TEXT_MUTED,
            size_px: 10.0,
            align,
            bold: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, Location, Severity};

    const SIZE: CanvasSize = CanvasSize::new(800.0, 600.0);

    fn empty_frame(grid: &ThreatGrid) -> HeatmapFrame<'_> {
        HeatmapFrame {
            grid,
            tracks: &[],
            events: &[],
            show_tracks: true,
            show_events: true,
        }
    }

    fn cell_count(commands: &[DrawCommand]) -> usize {
        commands
            .iter()
            .filter(|c| {
                matches!(c, DrawCommand::Rect { filled: true, width, .. }
                    if *width < 100.0)
            })
            .count()
    }

    #[test]
    fn test_malformed_grid_degrades_without_panic() {
        // Values vector shorter than width*height
        let short = ThreatGrid {
            width: 10,
            height: 10,
            values: vec![0.9; 25],
        };
        let commands = render(&empty_frame(&short), SIZE);
        assert_eq!(cell_count(&commands), 25);

        // Longer than width*height: extras never rendered
        let long = ThreatGrid {
            width: 2,
            height: 2,
            values: vec![0.9; 50],
        };
        let commands = render(&empty_frame(&long), SIZE);
        assert_eq!(cell_count(&commands), 4);

        // Zero-sized grid renders no cells at all
        let empty = ThreatGrid {
            width: 0,
            height: 0,
            values: vec![0.9; 8],
        };
        let commands = render(&empty_frame(&empty), SIZE);
        assert_eq!(cell_count(&commands), 0);
    }

    #[test]
    fn test_zero_cells_skipped() {
        let grid = ThreatGrid {
            width: 2,
            height: 2,
            values: vec![0.0, 0.5, 0.0, 0.7],
        };
        let commands = render(&empty_frame(&grid), SIZE);
        assert_eq!(cell_count(&commands), 2);
    }

    #[test]
    fn test_toggles_hide_overlays() {
        let grid = ThreatGrid::default();
        let tracks = vec![Track {
            id: "7".to_string(),
            x: 0.5,
            y: 0.5,
            vx: 0.0,
            vy: 0.0,
            confidence: 0.9,
            threat_score: 0.9,
            behaviors: vec![],
            history: vec![],
        }];
        let events = vec![Event {
            id: "e".to_string(),
            event_type: EventType::Theft,
            severity: Severity::High,
            probability: 0.8,
            timestamp_ms: 0,
            location: Location { x: 0.2, y: 0.2 },
            involved_tracks: vec![],
            description: String::new(),
            recommended_intervention: None,
        }];
        let on = render(
            &HeatmapFrame {
                grid: &grid,
                tracks: &tracks,
                events: &events,
                show_tracks: true,
                show_events: true,
            },
            SIZE,
        );
        let off = render(
            &HeatmapFrame {
                grid: &grid,
                tracks: &tracks,
                events: &events,
                show_tracks: false,
                show_events: false,
            },
            SIZE,
        );
        assert!(on.len() > off.len());
        assert!(!off.iter().any(|c| matches!(c, DrawCommand::RadialGlow { .. })));
    }

    #[test]
    fn test_track_label_only_above_threshold() {
        let grid = ThreatGrid::default();
        let mut track = Track {
            id: "42".to_string(),
            x: 0.5,
            y: 0.5,
            vx: 0.0,
            vy: 0.0,
            confidence: 1.0,
            threat_score: 0.4,
            behaviors: vec![],
            history: vec![],
        };
        let has_label = |tracks: &[Track]| {
            render(
                &HeatmapFrame {
                    grid: &grid,
                    tracks,
                    events: &[],
                    show_tracks: true,
                    show_events: false,
                },
                SIZE,
            )
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { content, .. } if content == "#42"))
        };
        assert!(!has_label(std::slice::from_ref(&track)));
        track.threat_score = 0.8;
        assert!(has_label(std::slice::from_ref(&track)));
    }

    #[test]
    fn test_legend_drawn_last_and_anchored() {
        let grid = ThreatGrid::default();
        let commands = render(&empty_frame(&grid), SIZE);
        let gradient_idx = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::GradientRect { .. }))
            .expect("legend gradient bar");
        // Nothing but legend text after the gradient bar
        assert!(commands[gradient_idx..]
            .iter()
            .skip(1)
            .all(|c| matches!(c, DrawCommand::Text { .. })));
    }
}
