//! Background decorations: floorplan, grid crosses, origin marker.
//!
//! Called every repaint with the logical rect being redrawn; the layers are
//! drawn bottom-up in that order and only when enabled in [`ViewSettings`].

use crate::painter::Painter;
use kurbo::{Affine, Point, Rect};
use peniko::Color;
use rtls_core::ViewSettings;

/// Half-length of each arm of a grid cross, in logical units.
pub const GRID_MARK_ARM: f64 = 0.025;
/// Radius of the origin marker.
pub const ORIGIN_RADIUS: f64 = 0.05;
/// Grids denser than this are skipped rather than drawn.
pub const MAX_GRID_MARKS: usize = 250_000;

pub fn paint_background(painter: &mut dyn Painter, settings: &ViewSettings, rect: Rect) {
    if settings.show_floorplan() {
        draw_floorplan(painter, settings);
    }
    if settings.show_grid() {
        draw_grid(painter, settings, rect);
    }
    if settings.show_origin() {
        draw_origin(painter);
    }
}

pub fn draw_origin(painter: &mut dyn Painter) {
    painter.stroke_circle(Point::ORIGIN, ORIGIN_RADIUS, Color::from_rgb8(255, 0, 0));
}

pub fn draw_grid(painter: &mut dyn Painter, settings: &ViewSettings, rect: Rect) {
    let color = Color::from_rgb8(211, 211, 211);
    for p in grid_marks(rect, settings.grid_width(), settings.grid_height()) {
        painter.stroke_line(
            Point::new(p.x, p.y - GRID_MARK_ARM),
            Point::new(p.x, p.y + GRID_MARK_ARM),
            color,
        );
        painter.stroke_line(
            Point::new(p.x - GRID_MARK_ARM, p.y),
            Point::new(p.x + GRID_MARK_ARM, p.y),
            color,
        );
    }
}

pub fn draw_floorplan(painter: &mut dyn Painter, settings: &ViewSettings) {
    let Some(image) = settings.floorplan() else {
        return;
    };
    let placement = floorplan_placement(settings.floorplan_transform(), image.height());
    painter.draw_image(image, placement);

    let outline = Rect::new(0.0, 0.0, image.width() as f64, image.height() as f64);
    let corners = [
        Point::new(outline.x0, outline.y0),
        Point::new(outline.x1, outline.y0),
        Point::new(outline.x1, outline.y1),
        Point::new(outline.x0, outline.y1),
    ]
    .map(|p| placement * p);
    let black = Color::from_rgb8(0, 0, 0);
    for i in 0..corners.len() {
        painter.stroke_line(corners[i], corners[(i + 1) % corners.len()], black);
    }
}

/// Image-pixel → logical transform for a floorplan `height` pixels tall.
///
/// Bitmaps are stored top row first; the floor plane has y pointing the
/// other way, so the image is flipped vertically about its bottom edge
/// before the user's transform is applied.
pub fn floorplan_placement(transform: Affine, height: u32) -> Affine {
    transform * Affine::scale_non_uniform(1.0, -1.0) * Affine::translate((0.0, -(height as f64)))
}

/// Centres of the grid crosses that fall inside `rect` (grown by one arm so
/// crosses straddling the edge are kept).
pub fn grid_marks(rect: Rect, width: f64, height: f64) -> Vec<Point> {
    if !(width > 0.0 && height > 0.0) {
        return Vec::new();
    }
    let area = rect.abs().inflate(GRID_MARK_ARM, GRID_MARK_ARM);
    let left = width * (area.x0 / width).ceil();
    let top = height * (area.y0 / height).ceil();
    let cols = ((area.x1 - left) / width).ceil().max(0.0);
    let rows = ((area.y1 - top) / height).ceil().max(0.0);

    if !(cols * rows).is_finite() || cols * rows > MAX_GRID_MARKS as f64 {
        log::warn!("grid {width}x{height} too dense for {area:?}, skipping");
        return Vec::new();
    }

    let (cols, rows) = (cols as usize, rows as usize);
    let mut marks = Vec::with_capacity(cols * rows);
    for i in 0..cols {
        let x = left + i as f64 * width;
        if x >= area.x1 {
            break;
        }
        for j in 0..rows {
            let y = top + j as f64 * height;
            if y >= area.y1 {
                break;
            }
            marks.push(Point::new(x, y));
        }
    }
    marks
}
