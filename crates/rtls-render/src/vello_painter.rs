//! [`Painter`] backed by a Vello scene.
//!
//! Geometry is mapped to device pixels before stroking so every stroke stays
//! one pixel wide regardless of zoom and rotation. The caller presents the
//! scene via wgpu.
//!
//! Vello does not lay out text, so labels are collected in device pixels for
//! the host's text renderer to draw on top.

use crate::painter::{LineStyle, Painter};
use kurbo::{Affine, Circle, Line, Point, Rect, Shape, Stroke};
use peniko::{Blob, Color, Fill, Image, ImageFormat};
use rtls_core::FloorplanImage;
use std::sync::Arc;
use vello::Scene;

const TOLERANCE: f64 = 0.1;

/// A label positioned in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceLabel {
    pub anchor: Point,
    pub text: String,
    pub color: Color,
}

pub struct VelloPainter<'a> {
    scene: &'a mut Scene,
    /// Logical → device pixels.
    transform: Affine,
    labels: Vec<DeviceLabel>,
}

impl<'a> VelloPainter<'a> {
    pub fn new(scene: &'a mut Scene, transform: Affine) -> Self {
        Self {
            scene,
            transform,
            labels: Vec::new(),
        }
    }

    /// Labels painted so far, in paint order.
    pub fn take_labels(&mut self) -> Vec<DeviceLabel> {
        std::mem::take(&mut self.labels)
    }

    fn stroke_shape(&mut self, shape: &impl Shape, color: Color, style: LineStyle) {
        let path = self.transform * shape.to_path(TOLERANCE);
        let stroke = match style {
            LineStyle::Solid => Stroke::new(1.0),
            LineStyle::Dashed => Stroke::new(1.0).with_dashes(0.0, [4.0, 4.0]),
        };
        self.scene.stroke(&stroke, Affine::IDENTITY, color, None, &path);
    }
}

impl Painter for VelloPainter<'_> {
    fn stroke_line(&mut self, from: Point, to: Point, color: Color) {
        self.stroke_shape(&Line::new(from, to), color, LineStyle::Solid);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, style: LineStyle) {
        self.stroke_shape(&rect, color, style);
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.stroke_shape(&Circle::new(center, radius), color, LineStyle::Solid);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.scene.fill(Fill::NonZero, self.transform, color, None, &rect);
    }

    fn draw_image(&mut self, image: &FloorplanImage, transform: Affine) {
        let data: Arc<dyn AsRef<[u8]> + Send + Sync> = image.rgba().clone();
        let image = Image::new(Blob::new(data), ImageFormat::Rgba8, image.width(), image.height());
        self.scene.draw_image(&image, self.transform * transform);
    }

    fn draw_label(&mut self, anchor: Point, text: &str, color: Color) {
        self.labels.push(DeviceLabel {
            anchor: self.transform * anchor,
            text: text.to_string(),
            color,
        });
    }
}
