//! Spatial rendering engine
//!
//! ## Responsibilities
//!
//! - Pure geometry: `(entities, canvas size) -> Vec<DrawCommand>`
//! - Inverse hit-testing (pixel -> entity) for click interaction
//!
//! No drawing surface appears anywhere in this module tree; a view layer
//! replays the command list onto whatever canvas it owns. Every render is
//! a full clear-and-redraw from the given snapshot — no drawing state is
//! retained between calls.

pub mod heatmap;
pub mod timeline;
pub mod topology;

use serde::Serialize;

/// RGBA color, alpha in [0,1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// Console color scheme
pub mod palette {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0x0a, 0x0a, 0x1e);
    pub const PANEL: Color = Color::rgba(0x1a, 0x1a, 0x3e, 0.9);
    pub const PANEL_BORDER: Color = Color::rgb(0x3a, 0x3a, 0x5e);
    pub const GRID_LINE: Color = Color::rgb(0x2a, 0x2a, 0x4e);
    pub const TEXT: Color = Color::rgb(0xe0, 0xe0, 0xe0);
    pub const TEXT_MUTED: Color = Color::rgb(0xa0, 0xa0, 0xa0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    pub const GREEN: Color = Color::rgb(0x10, 0xb9, 0x81);
    pub const AMBER: Color = Color::rgb(0xf5, 0x9e, 0x0b);
    pub const RED: Color = Color::rgb(0xef, 0x44, 0x44);
    pub const DARK_RED: Color = Color::rgb(0x99, 0x1b, 0x1b);
    pub const GRAY: Color = Color::rgb(0x6b, 0x72, 0x80);
    pub const INDIGO: Color = Color::rgb(0x63, 0x66, 0xf1);
}

/// Threat magnitude to banded color: <0.33 green, <0.66 amber, else red.
pub fn threat_color(value: f64, alpha: f64) -> Color {
    let value = crate::models::clamp_unit(value);
    let base = if value < 0.33 {
        palette::GREEN
    } else if value < 0.66 {
        palette::AMBER
    } else {
        palette::RED
    };
    base.with_alpha(alpha)
}

/// Severity ordinal (0-4) to the fixed five-level ramp; out-of-range
/// ordinals use level 1 like the unknown default.
pub fn severity_color(ordinal: u8, alpha: f64) -> Color {
    let base = match ordinal {
        0 => palette::INDIGO,
        1 => palette::GREEN,
        2 => palette::AMBER,
        3 => palette::RED,
        4 => palette::DARK_RED,
        _ => palette::GREEN,
    };
    base.with_alpha(alpha)
}

/// Canvas-space point, pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Target surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One color stop of a gradient fill, offset in [0,1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// A single deterministic drawing instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
        dashed: bool,
    },
    Polyline {
        points: Vec<Point>,
        width: f64,
        color: Color,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
        filled: bool,
        line_width: f64,
    },
    /// Pie wedge from `start_angle` to `end_angle` (radians, clockwise
    /// from the positive x axis as canvas coordinates go)
    Wedge {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    },
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: Color,
        filled: bool,
        line_width: f64,
    },
    /// Horizontal linear gradient across the rect
    GradientRect {
        origin: Point,
        width: f64,
        height: f64,
        stops: Vec<ColorStop>,
    },
    /// Radial gradient from `center` out to `radius`
    RadialGlow {
        center: Point,
        radius: f64,
        stops: Vec<ColorStop>,
    },
    Text {
        at: Point,
        content: String,
        color: Color,
        size_px: f64,
        align: TextAlign,
        bold: bool,
    },
}
