//! Camera-network topology view
//!
//! Cameras sit evenly on a circle (index 0 at 12 o'clock, clockwise).
//! Edges come from field-of-view adjacency and may be listed on only one
//! endpoint; an edge renders "active" only while both endpoints are
//! online — derived at draw time, never stored.

use super::{palette, CanvasSize, Color, DrawCommand, Point, TextAlign};
use crate::models::{Camera, CameraStatus};

/// Click-to-camera matching radius in pixels
pub const HIT_RADIUS: f64 = 20.0;
/// Node disc diameter in pixels
pub const NODE_SIZE: f64 = 40.0;
/// Field-of-view wedge length in pixels
const FOV_LENGTH: f64 = 80.0;
/// Layout circle radius as a fraction of the smaller canvas dimension
const LAYOUT_RADIUS_FRACTION: f64 = 0.35;

fn status_color(status: CameraStatus) -> Color {
    match status {
        CameraStatus::Online => palette::GREEN,
        CameraStatus::Offline => palette::GRAY,
        CameraStatus::Warning => palette::AMBER,
        CameraStatus::Unknown => palette::INDIGO,
    }
}

/// Circular layout: camera `idx` of `count` at angle
/// `idx/count * 2π − π/2` on a circle of radius `0.35 * min(w, h)`.
pub fn layout_positions(count: usize, size: CanvasSize) -> Vec<Point> {
    let center = size.center();
    let radius = size.width.min(size.height) * LAYOUT_RADIUS_FRACTION;
    (0..count)
        .map(|idx| {
            let angle =
                (idx as f64 / count as f64) * 2.0 * std::f64::consts::PI - std::f64::consts::FRAC_PI_2;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Render the topology frame.
pub fn render(cameras: &[Camera], selected: Option<&str>, size: CanvasSize) -> Vec<DrawCommand> {
    let mut commands = vec![DrawCommand::Clear {
        color: palette::BACKGROUND,
    }];

    let positions = layout_positions(cameras.len(), size);

    // Edges first so nodes draw over them
    for (idx, camera) in cameras.iter().enumerate() {
        for neighbor_id in camera.neighbors() {
            let Some(neighbor_idx) = cameras.iter().position(|c| c.id == neighbor_id) else {
                continue; // dangling id in raw data
            };
            let active = camera.status == CameraStatus::Online
                && cameras[neighbor_idx].status == CameraStatus::Online;
            commands.push(DrawCommand::Line {
                from: positions[idx],
                to: positions[neighbor_idx],
                width: if active { 2.0 } else { 1.0 },
                color: if active {
                    palette::GREEN.with_alpha(0.4)
                } else {
                    palette::INDIGO.with_alpha(0.2)
                },
                dashed: !active,
            });
        }
    }

    for (idx, camera) in cameras.iter().enumerate() {
        let is_selected = selected == Some(camera.id.as_str());
        draw_camera(&mut commands, positions[idx], camera, is_selected);
    }

    draw_legend(&mut commands, size);
    commands
}

fn draw_camera(commands: &mut Vec<DrawCommand>, at: Point, camera: &Camera, selected: bool) {
    // FOV wedge only for the selected camera
    if selected && camera.fov_angle > 0.0 {
        let half_fov = camera.fov_angle.to_radians() / 2.0;
        let orientation = camera.orientation.to_radians();
        commands.push(DrawCommand::Wedge {
            center: at,
            radius: FOV_LENGTH,
            start_angle: orientation - half_fov,
            end_angle: orientation + half_fov,
            color: palette::INDIGO.with_alpha(0.2),
        });
    }

    if selected {
        commands.push(DrawCommand::Circle {
            center: at,
            radius: NODE_SIZE / 2.0 + 5.0,
            color: palette::INDIGO,
            filled: false,
            line_width: 3.0,
        });
    }

    commands.push(DrawCommand::Circle {
        center: at,
        radius: NODE_SIZE / 2.0,
        color: status_color(camera.status),
        filled: true,
        line_width: 0.0,
    });
    commands.push(DrawCommand::Circle {
        center: at,
        radius: NODE_SIZE / 2.0,
        color: palette::GRID_LINE,
        filled: false,
        line_width: 2.0,
    });

    commands.push(DrawCommand::Text {
        at: Point::new(at.x, at.y + NODE_SIZE / 2.0 + 15.0),
        content: camera.display_name().to_string(),
        color: palette::TEXT,
        size_px: 12.0,
        align: TextAlign::Center,
        bold: true,
    });

    // Status pip at the upper-right of the disc
    commands.push(DrawCommand::Circle {
        center: Point::new(at.x + NODE_SIZE / 3.0, at.y - NODE_SIZE / 3.0),
        radius: 6.0,
        color: status_color(camera.status),
        filled: true,
        line_width: 0.0,
    });
}

fn draw_legend(commands: &mut Vec<DrawCommand>, size: CanvasSize) {
    let origin = Point::new(20.0, size.height - 120.0);
    commands.push(DrawCommand::Rect {
        origin,
        width: 180.0,
        height: 100.0,
        color: palette::PANEL,
        filled: true,
        line_width: 0.0,
    });
    commands.push(DrawCommand::Rect {
        origin,
        width: 180.0,
        height: 100.0,
        color: palette::PANEL_BORDER,
        filled: false,
        line_width: 2.0,
    });
    commands.push(DrawCommand::Text {
        at: Point::new(origin.x + 10.0, origin.y + 20.0),
        content: "Status Legend".to_string(),
        color: palette::TEXT,
        size_px: 12.0,
        align: TextAlign::Left,
        bold: true,
    });

    let entries = [
        ("Online", palette::GREEN),
        ("Offline", palette::GRAY),
        ("Warning", palette::AMBER),
    ];
    for (idx, (label, color)) in entries.iter().enumerate() {
        let y = origin.y + 40.0 + idx as f64 * 20.0;
        commands.push(DrawCommand::Circle {
            center: Point::new(origin.x + 15.0, y),
            radius: 5.0,
            color: *color,
            filled: true,
            line_width: 0.0,
        });
        commands.push(DrawCommand::Text {
            at: Point::new(origin.x + 30.0, y + 4.0),
            content: (*label).to_string(),
            color: palette::TEXT,
            size_px: 11.0,
            align: TextAlign::Left,
            bold: false,
        });
    }
}

/// Inverse of [`layout_positions`]: the first camera whose center lies
/// within [`HIT_RADIUS`] of `click`. No match means the selection is left
/// unchanged by the caller.
pub fn hit_test<'a>(cameras: &'a [Camera], size: CanvasSize, click: Point) -> Option<&'a Camera> {
    let positions = layout_positions(cameras.len(), size);
    cameras
        .iter()
        .zip(positions)
        .find(|(_, pos)| click.distance_to(*pos) < HIT_RADIUS)
        .map(|(camera, _)| camera)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(id: &str, status: CameraStatus, neighbors: &[&str]) -> Camera {
        Camera {
            id: id.to_string(),
            name: String::new(),
            ip: String::new(),
            status,
            fov_angle: 90.0,
            orientation: 0.0,
            neighbors: neighbors.iter().map(|s| (*s).to_string()).collect(),
            fps: 0.0,
            latency_ms: 0.0,
            active_tracks: 0,
            events_detected: 0,
        }
    }

    const SIZE: CanvasSize = CanvasSize::new(700.0, 600.0);

    #[test]
    fn test_layout_equally_spaced_first_at_top() {
        for n in [1usize, 2, 3, 5, 8, 16] {
            let positions = layout_positions(n, SIZE);
            assert_eq!(positions.len(), n);
            let center = SIZE.center();
            let radius = 600.0 * 0.35;

            // Camera 0 at -π/2: straight up from center
            assert!((positions[0].x - center.x).abs() < 1e-9);
            assert!((positions[0].y - (center.y - radius)).abs() < 1e-9);

            // All on the circle, successive angular gaps equal 2π/n
            for (i, p) in positions.iter().enumerate() {
                let d = p.distance_to(center);
                assert!((d - radius).abs() < 1e-9, "camera {} off circle", i);
            }
            let step = 2.0 * std::f64::consts::PI / n as f64;
            for i in 1..n {
                let a0 = (positions[i - 1].y - center.y).atan2(positions[i - 1].x - center.x);
                let a1 = (positions[i].y - center.y).atan2(positions[i].x - center.x);
                let mut gap = a1 - a0;
                while gap < 0.0 {
                    gap += 2.0 * std::f64::consts::PI;
                }
                assert!((gap - step).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_hit_test_inverts_layout() {
        let cameras: Vec<Camera> = (0..6)
            .map(|i| camera(&format!("cam-{}", i), CameraStatus::Online, &[]))
            .collect();
        let positions = layout_positions(cameras.len(), SIZE);
        for (i, pos) in positions.iter().enumerate() {
            let hit = hit_test(&cameras, SIZE, *pos).expect("center click must hit");
            assert_eq!(hit.id, format!("cam-{}", i));
        }
    }

    #[test]
    fn test_center_click_hits_nothing() {
        let cameras: Vec<Camera> = (0..5)
            .map(|i| camera(&format!("cam-{}", i), CameraStatus::Online, &[]))
            .collect();
        assert!(hit_test(&cameras, SIZE, SIZE.center()).is_none());
    }

    #[test]
    fn test_edge_active_only_when_both_online() {
        let combos = [
            (CameraStatus::Online, CameraStatus::Online, true),
            (CameraStatus::Online, CameraStatus::Offline, false),
            (CameraStatus::Warning, CameraStatus::Online, false),
            (CameraStatus::Offline, CameraStatus::Offline, false),
        ];
        for (a, b, expect_active) in combos {
            let cameras = vec![camera("a", a, &["b"]), camera("b", b, &[])];
            let commands = render(&cameras, None, SIZE);
            let edge = commands
                .iter()
                .find_map(|c| match c {
                    DrawCommand::Line { dashed, .. } => Some(*dashed),
                    _ => None,
                })
                .expect("one edge expected");
            assert_eq!(edge, !expect_active, "{:?}/{:?}", a, b);
        }
    }

    #[test]
    fn test_one_sided_adjacency_tolerated() {
        // Edge listed on one endpoint only, plus a dangling id
        let cameras = vec![
            camera("a", CameraStatus::Online, &["b", "ghost"]),
            camera("b", CameraStatus::Online, &[]),
        ];
        let commands = render(&cameras, None, SIZE);
        let edges = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(edges, 1);
    }

    #[test]
    fn test_fov_wedge_only_for_selected() {
        let cameras = vec![
            camera("a", CameraStatus::Online, &[]),
            camera("b", CameraStatus::Online, &[]),
        ];
        let wedges = |cmds: &[DrawCommand]| {
            cmds.iter()
                .filter(|c| matches!(c, DrawCommand::Wedge { .. }))
                .count()
        };
        assert_eq!(wedges(&render(&cameras, None, SIZE)), 0);
        assert_eq!(wedges(&render(&cameras, Some("a"), SIZE)), 1);
    }

    #[test]
    fn test_render_clears_first() {
        let cameras = vec![camera("a", CameraStatus::Online, &[])];
        let commands = render(&cameras, None, SIZE);
        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
    }
}
