//! Viewport mapper: logical visible rectangle ↔ widget pixels.
//!
//! The view always frames exactly one logical rectangle (the *visible rect*).
//! Pan, zoom and centering are expressed as edits of that rectangle; the
//! pixel projection is re-fitted after every edit so the whole rectangle is
//! shown with its aspect ratio preserved, then rotated about the widget
//! centre by the accumulated view rotation.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use smallvec::SmallVec;

/// Smallest visible width/height in logical units.
pub const MIN_EXTENT: f64 = 1.0;
/// Largest visible width/height in logical units.
pub const MAX_EXTENT: f64 = 1500.0;
/// Zoom-out applied after framing a rectangle, so its contents get a margin.
pub const CENTER_ZOOM_OUT: f64 = 1.206 * 1.2;

/// Visible rect a fresh view starts with: origin (-1, -1), 6 x 6 units.
pub const INITIAL_VISIBLE_RECT: Rect = Rect::new(-1.0, -1.0, 5.0, 5.0);

/// Logical extent of the scene the view can move around in.
pub const SCENE_BOUNDS: Rect = Rect::new(-1500.0, -1500.0, 1500.0, 1500.0);

/// Notifications raised outward for coordinate, zoom and rotation readouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewEvent {
    VisibleRectChanged(Rect),
    /// Resulting visible height, rounded to 2 decimals.
    ScaleChanged(f64),
    /// Accumulated rotation in degrees, rounded to 2 decimals. Positive is
    /// clockwise on screen.
    RotationChanged(f64),
    SizeChanged(Size),
}

#[derive(Debug, Clone)]
pub struct Viewport {
    visible: Rect,
    size: Size,
    /// Degrees, positive is clockwise on screen.
    rotation: f64,
    world_to_view: Affine,
    view_to_world: Affine,
    events: SmallVec<[ViewEvent; 4]>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::new(800.0, 600.0))
    }
}

impl Viewport {
    /// Create a viewport of `size` pixels framing [`INITIAL_VISIBLE_RECT`].
    pub fn new(size: Size) -> Self {
        let mut vp = Self {
            visible: INITIAL_VISIBLE_RECT,
            size,
            rotation: 0.0,
            world_to_view: Affine::IDENTITY,
            view_to_world: Affine::IDENTITY,
            events: SmallVec::new(),
        };
        vp.refit();
        vp
    }

    pub fn visible_rect(&self) -> Rect {
        self.visible
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn scene_bounds(&self) -> Rect {
        SCENE_BOUNDS
    }

    /// Replace the visible rect, re-fit the projection and raise
    /// [`ViewEvent::VisibleRectChanged`].
    ///
    /// A zero width or height is coerced to 1 (keeping the origin) and the
    /// extents are clamped to `[MIN_EXTENT, MAX_EXTENT]` about the centre.
    /// Non-finite rectangles are ignored.
    pub fn set_visible_rect(&mut self, rect: Rect) {
        if !rect.is_finite() {
            log::warn!("ignoring non-finite visible rect {rect:?}");
            return;
        }
        self.visible = sanitize(rect);
        self.refit();
        self.events.push(ViewEvent::VisibleRectChanged(self.visible));
    }

    /// Shift the visible rect by a logical offset.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.set_visible_rect(self.visible + Vec2::new(dx, dy));
    }

    /// Scale the visible rect about `center` (defaults to the rect's centre).
    ///
    /// Width and height become `clamp(w * sx)` / `clamp(h * sy)`; the offset
    /// of `center` from the top-left corner scales by the same ratio, so
    /// `center` stays put. Raises [`ViewEvent::ScaleChanged`] with the new
    /// height, then [`ViewEvent::VisibleRectChanged`].
    pub fn scale(&mut self, sx: f64, sy: f64, center: Option<Point>) {
        let old = self.visible;
        let center = center.unwrap_or_else(|| old.center());
        if !(sx.is_finite() && sy.is_finite() && center.is_finite()) {
            log::warn!("ignoring non-finite scale ({sx}, {sy}) about {center:?}");
            return;
        }
        let diff = center - old.origin();

        let width = (old.width() * sx).clamp(MIN_EXTENT, MAX_EXTENT);
        let height = (old.height() * sy).clamp(MIN_EXTENT, MAX_EXTENT);
        let rx = width / old.width();
        let ry = height / old.height();

        let origin = Point::new(
            old.x0 + diff.x - diff.x * rx,
            old.y0 + diff.y - diff.y * ry,
        );
        log::trace!("scale by ({sx}, {sy}) about {center:?}: {width} x {height}");

        self.events.push(ViewEvent::ScaleChanged(round2(height)));
        self.set_visible_rect(Rect::from_origin_size(origin, (width, height)));
    }

    /// Move the visible rect's centre to `(x, y)` without changing its size.
    pub fn center_at(&mut self, x: f64, y: f64) {
        let size = self.visible.size();
        self.set_visible_rect(Rect::from_center_size((x, y), size));
    }

    /// Frame `rect` with a margin: degenerate extents become 1, the rect
    /// becomes the visible rect, then [`CENTER_ZOOM_OUT`] is applied about
    /// its centre.
    pub fn center_on_rect(&mut self, rect: Rect) {
        let mut rect = rect.abs();
        if rect.width() == 0.0 {
            rect.x1 = rect.x0 + 1.0;
        }
        if rect.height() == 0.0 {
            rect.y1 = rect.y0 + 1.0;
        }
        self.set_visible_rect(rect);
        let center = self.visible.center();
        self.scale(CENTER_ZOOM_OUT, CENTER_ZOOM_OUT, Some(center));
    }

    /// Change the widget size in pixels and re-fit.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.refit();
        self.events.push(ViewEvent::SizeChanged(size));
    }

    /// Rotate the projection by `degrees` about the widget centre.
    pub fn rotate_by(&mut self, degrees: f64) {
        self.rotation += degrees;
        self.refit();
    }

    /// Undo the whole accumulated rotation in one step.
    pub fn reset_rotation(&mut self) {
        let total = self.rotation;
        self.rotate_by(-total);
    }

    /// Pixels per logical unit along the visible rect's limiting axis.
    pub fn fit_scale(&self) -> f64 {
        fit_scale(self.visible, self.size)
    }

    /// Bounding box, in logical units, of everything the widget shows.
    /// Larger than the visible rect when the aspect ratios differ or the
    /// view is rotated.
    pub fn exposed_rect(&self) -> Rect {
        let widget = Rect::from_origin_size(Point::ORIGIN, self.size);
        self.view_to_world.transform_rect_bbox(widget)
    }

    pub fn world_to_view(&self) -> Affine {
        self.world_to_view
    }

    pub fn world_to_view_point(&self, pt: Point) -> Point {
        self.world_to_view * pt
    }

    pub fn view_to_world_point(&self, pt: Point) -> Point {
        self.view_to_world * pt
    }

    /// Map a pixel displacement into a logical displacement.
    pub fn view_to_world_vec(&self, delta: Vec2) -> Vec2 {
        self.view_to_world * delta.to_point() - self.view_to_world * Point::ORIGIN
    }

    /// Drain queued notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events).into_vec()
    }

    /// Raise [`ViewEvent::RotationChanged`] with the current rotation.
    pub fn notify_rotation(&mut self) {
        self.events.push(ViewEvent::RotationChanged(round2(self.rotation)));
    }

    fn refit(&mut self) {
        let scale = fit_scale(self.visible, self.size);
        let view_center = Vec2::new(self.size.width / 2.0, self.size.height / 2.0);
        self.world_to_view = Affine::translate(view_center)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(scale)
            * Affine::translate(-self.visible.center().to_vec2());
        self.view_to_world = self.world_to_view.inverse();
    }
}

/// Pixels per logical unit that fit `visible` into `size` keeping aspect.
fn fit_scale(visible: Rect, size: Size) -> f64 {
    if size.width <= 0.0 || size.height <= 0.0 {
        return 1.0;
    }
    (size.width / visible.width()).min(size.height / visible.height())
}

fn sanitize(rect: Rect) -> Rect {
    let mut rect = rect.abs();
    // Zero extents would make the centre/ratio math non-finite.
    if rect.width() == 0.0 {
        rect.x1 = rect.x0 + 1.0;
    }
    if rect.height() == 0.0 {
        rect.y1 = rect.y0 + 1.0;
    }
    let width = rect.width().clamp(MIN_EXTENT, MAX_EXTENT);
    let height = rect.height().clamp(MIN_EXTENT, MAX_EXTENT);
    if width != rect.width() || height != rect.height() {
        rect = Rect::from_center_size(rect.center(), (width, height));
    }
    rect
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
