//! Immediate-mode drawing surface.
//!
//! All coordinates are logical (world) units. Strokes are cosmetic: one
//! device pixel wide whatever the zoom, like a zero-width pen.

use kurbo::{Affine, Point, Rect};
use peniko::Color;
use rtls_core::FloorplanImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

pub trait Painter {
    fn stroke_line(&mut self, from: Point, to: Point, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, style: LineStyle);

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `image` with `transform` mapping image pixels to logical units.
    fn draw_image(&mut self, image: &FloorplanImage, transform: Affine);

    /// Text with its top-left corner at `anchor`. Glyphs keep a fixed pixel
    /// size, like the strokes.
    fn draw_label(&mut self, anchor: Point, text: &str, color: Color);
}

/// A recorded drawing command.
#[derive(Debug, Clone)]
pub enum DrawCmd {
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
        style: LineStyle,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    Image {
        width: u32,
        height: u32,
        transform: Affine,
    },
    Label {
        anchor: Point,
        text: String,
        color: Color,
    },
}

/// Painter that records commands instead of rasterizing them.
///
/// Useful for headless hosts, snapshotting a frame, and tests.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub commands: Vec<DrawCmd>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Painter for DisplayList {
    fn stroke_line(&mut self, from: Point, to: Point, color: Color) {
        self.commands.push(DrawCmd::Line { from, to, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, style: LineStyle) {
        self.commands.push(DrawCmd::Rect { rect, color, style });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::FillRect { rect, color });
    }

    fn draw_image(&mut self, image: &FloorplanImage, transform: Affine) {
        self.commands.push(DrawCmd::Image {
            width: image.width(),
            height: image.height(),
            transform,
        });
    }

    fn draw_label(&mut self, anchor: Point, text: &str, color: Color) {
        self.commands.push(DrawCmd::Label {
            anchor,
            text: text.to_string(),
            color,
        });
    }
}
