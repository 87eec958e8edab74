//! Tool system for pointer gestures.
//!
//! A tool is attached to one [`GraphicsView`](crate::view::GraphicsView) at
//! a time. The view hands it scene positions plus a [`ToolContext`] lending
//! the viewport and scene for the duration of the call; a tool finishes by
//! calling [`ToolContext::finish`], after which the view detaches it.
//!
//! | Tool | Cursor | Gesture |
//! |------|--------|---------|
//! | Pan | open hand | drag moves the view opposite to the pointer |
//! | Zoom | size-all | drag away from the press point, up zooms in |
//! | RubberBand | cross | drag a rectangle, release selects |

use kurbo::{Point, Rect};
use rtls_core::{Scene, Viewport};
use rtls_render::{Color, LineStyle, Painter};

/// Pointer glyph requested by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Arrow,
    Cross,
    OpenHand,
    ClosedHand,
    SizeAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Pan,
    Zoom,
    RubberBand,
}

impl ToolKind {
    pub fn from_name(name: &str) -> Result<Self, String> {
        match name {
            "pan" => Ok(Self::Pan),
            "zoom" => Ok(Self::Zoom),
            "rubberband" => Ok(Self::RubberBand),
            other => Err(format!("unknown tool `{other}`")),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Zoom => "zoom",
            Self::RubberBand => "rubberband",
        }
    }
}

/// Instantiate a fresh, idle tool of `kind`.
pub fn create_tool(kind: ToolKind) -> Box<dyn Tool> {
    match kind {
        ToolKind::Pan => Box::new(PanTool::new()),
        ToolKind::Zoom => Box::new(ZoomTool::new()),
        ToolKind::RubberBand => Box::new(RubberBandTool::new()),
    }
}

/// What a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub viewport: &'a mut Viewport,
    pub scene: &'a mut dyn Scene,
    finished: bool,
}

impl<'a> ToolContext<'a> {
    pub fn new(viewport: &'a mut Viewport, scene: &'a mut dyn Scene) -> Self {
        Self {
            viewport,
            scene,
            finished: false,
        }
    }

    /// Raise the tool's completion signal.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// A pointer-gesture strategy. Positions are in scene units.
pub trait Tool {
    fn kind(&self) -> Option<ToolKind> {
        None
    }

    fn cursor(&self) -> CursorShape {
        CursorShape::Arrow
    }

    /// Begin a gesture. Returning `true` claims the press and every move and
    /// release up to the next press.
    fn press(&mut self, _pos: Point, _cx: &mut ToolContext<'_>) -> bool {
        false
    }

    fn motion(&mut self, _pos: Point, _cx: &mut ToolContext<'_>) {}

    fn release(&mut self, _pos: Point, _cx: &mut ToolContext<'_>) {}

    /// Press and release without a claimed gesture in between.
    fn click(&mut self, _pos: Point, _cx: &mut ToolContext<'_>) {}

    /// Overlay painted on every repaint while attached.
    fn draw(&self, _painter: &mut dyn Painter, _visible: Rect, _cursor: Point) {}

    /// Abort the current gesture.
    fn cancel(&mut self, cx: &mut ToolContext<'_>) {
        cx.finish();
    }
}

// ─── Pan Tool ────────────────────────────────────────────────────────────

/// Drag-to-pan. The grabbed scene point stays under the pointer.
#[derive(Debug, Default)]
pub struct PanTool {
    grab: Option<Point>,
}

impl PanTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PanTool {
    fn kind(&self) -> Option<ToolKind> {
        Some(ToolKind::Pan)
    }

    fn cursor(&self) -> CursorShape {
        CursorShape::OpenHand
    }

    fn press(&mut self, pos: Point, _cx: &mut ToolContext<'_>) -> bool {
        self.grab = Some(pos);
        true
    }

    fn motion(&mut self, pos: Point, cx: &mut ToolContext<'_>) {
        if let Some(grab) = self.grab {
            let delta = pos - grab;
            // After this the pointer maps back onto `grab`.
            cx.viewport.translate(-delta.x, -delta.y);
        }
    }

    fn release(&mut self, _pos: Point, cx: &mut ToolContext<'_>) {
        self.grab = None;
        cx.finish();
    }
}

// ─── Zoom Tool ───────────────────────────────────────────────────────────

/// Pixels the pointer must travel before zooming starts.
pub const ZOOM_DEAD_ZONE: f64 = 10.0;
/// Scale gained per pixel beyond the dead zone.
pub const ZOOM_RATE: f64 = 0.01;

/// Drag-to-zoom about the press point. Distances are measured in pixels so
/// the gesture feels the same at every zoom level.
#[derive(Debug, Default)]
pub struct ZoomTool {
    center: Option<Point>,
}

impl ZoomTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom factor for a pointer `offset` (pixels) from the centre, or
    /// `None` inside the dead zone. Dragging up zooms in.
    pub fn factor(dx: f64, dy: f64) -> Option<f64> {
        let distance = dx.hypot(dy);
        if distance <= ZOOM_DEAD_ZONE {
            return None;
        }
        let scale = 1.0 + (distance - ZOOM_DEAD_ZONE) * ZOOM_RATE;
        Some(if dy < 0.0 { 1.0 / scale } else { scale })
    }
}

impl Tool for ZoomTool {
    fn kind(&self) -> Option<ToolKind> {
        Some(ToolKind::Zoom)
    }

    fn cursor(&self) -> CursorShape {
        CursorShape::SizeAll
    }

    fn press(&mut self, pos: Point, _cx: &mut ToolContext<'_>) -> bool {
        self.center = Some(pos);
        true
    }

    fn motion(&mut self, pos: Point, cx: &mut ToolContext<'_>) {
        let Some(center) = self.center else {
            return;
        };
        let to_px = |p: Point| cx.viewport.world_to_view_point(p);
        let offset = to_px(pos) - to_px(center);
        if let Some(s) = Self::factor(offset.x, offset.y) {
            cx.viewport.scale(s, s, Some(center));
            self.center = Some(pos);
        }
    }

    fn release(&mut self, _pos: Point, cx: &mut ToolContext<'_>) {
        self.center = None;
        cx.finish();
    }
}

// ─── Rubber Band Tool ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RubberBandTool {
    /// `(start, current)` while dragging.
    band: Option<(Point, Point)>,
}

impl RubberBandTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live selection rectangle, normalized.
    pub fn rect(&self) -> Option<Rect> {
        self.band.map(|(start, current)| Rect::from_points(start, current))
    }
}

impl Tool for RubberBandTool {
    fn kind(&self) -> Option<ToolKind> {
        Some(ToolKind::RubberBand)
    }

    fn cursor(&self) -> CursorShape {
        CursorShape::Cross
    }

    fn press(&mut self, pos: Point, _cx: &mut ToolContext<'_>) -> bool {
        self.band = Some((pos, pos));
        true
    }

    fn motion(&mut self, pos: Point, cx: &mut ToolContext<'_>) {
        if let Some((_, current)) = self.band.as_mut() {
            *current = pos;
            cx.scene.request_repaint();
        }
    }

    fn release(&mut self, pos: Point, cx: &mut ToolContext<'_>) {
        let Some((start, _)) = self.band.take() else {
            return;
        };
        let rect = Rect::from_points(start, pos);
        let n = cx.scene.select_intersecting(rect);
        log::debug!("rubber band {rect:?} selected {n} item(s)");
        cx.finish();
    }

    fn draw(&self, painter: &mut dyn Painter, _visible: Rect, _cursor: Point) {
        if let Some(rect) = self.rect() {
            painter.stroke_rect(rect, Color::from_rgb8(0, 0, 255), LineStyle::Dashed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rtls_core::{ItemScene, Size};
    use rtls_render::{DisplayList, DrawCmd};

    fn viewport() -> Viewport {
        let mut vp = Viewport::new(Size::new(100.0, 100.0));
        vp.set_visible_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        vp.take_events();
        vp
    }

    #[test]
    fn names_round_trip() {
        for kind in [ToolKind::Pan, ToolKind::Zoom, ToolKind::RubberBand] {
            assert_eq!(ToolKind::from_name(kind.name()), Ok(kind));
            assert_eq!(create_tool(kind).kind(), Some(kind));
        }
        assert!(ToolKind::from_name("lasso").is_err());
    }

    #[test]
    fn pan_moves_view_against_pointer() {
        let mut vp = viewport();
        let mut scene = ItemScene::new();
        let mut tool = PanTool::new();
        let mut cx = ToolContext::new(&mut vp, &mut scene);

        assert!(tool.press(Point::new(5.0, 5.0), &mut cx));
        tool.motion(Point::new(7.0, 4.0), &mut cx);
        assert_eq!(cx.viewport.visible_rect(), Rect::new(-2.0, 1.0, 8.0, 11.0));
        assert!(!cx.is_finished());

        tool.release(Point::new(7.0, 4.0), &mut cx);
        assert!(cx.is_finished());
    }

    #[test]
    fn zoom_dead_zone_and_direction() {
        assert_eq!(ZoomTool::factor(3.0, 4.0), None);
        assert_eq!(ZoomTool::factor(0.0, 10.0), None);
        let down = ZoomTool::factor(0.0, 20.0).unwrap();
        assert!((down - 1.1).abs() < 1e-12);
        let up = ZoomTool::factor(0.0, -20.0).unwrap();
        assert!((up - 1.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn zoom_drag_up_zooms_in_about_center() {
        let mut vp = viewport();
        let mut scene = ItemScene::new();
        let mut tool = ZoomTool::new();
        let mut cx = ToolContext::new(&mut vp, &mut scene);

        let center = Point::new(5.0, 5.0);
        tool.press(center, &mut cx);
        // 3 units at 10 px/unit is 30 px straight up.
        tool.motion(Point::new(5.0, 2.0), &mut cx);
        let r = cx.viewport.visible_rect();
        assert!(r.height() < 10.0);
        assert!((r.center().y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn rubber_band_selects_and_finishes() {
        let mut vp = viewport();
        let mut scene = ItemScene::new();
        scene.add_anchor(1, Point::new(2.0, 2.0));
        scene.add_anchor(2, Point::new(20.0, 20.0));
        let mut tool = RubberBandTool::new();
        let mut cx = ToolContext::new(&mut vp, &mut scene);

        tool.press(Point::new(3.0, 3.0), &mut cx);
        tool.motion(Point::new(0.0, 0.0), &mut cx);
        assert_eq!(tool.rect(), Some(Rect::new(0.0, 0.0, 3.0, 3.0)));
        tool.release(Point::new(0.0, 0.0), &mut cx);
        assert!(cx.is_finished());
        assert_eq!(tool.rect(), None);

        assert_eq!(scene.selected().len(), 1);
    }

    #[test]
    fn rubber_band_overlay_only_while_dragging() {
        let mut vp = viewport();
        let mut scene = ItemScene::new();
        let mut tool = RubberBandTool::new();
        let mut list = DisplayList::new();
        let visible = vp.visible_rect();

        tool.draw(&mut list, visible, Point::ORIGIN);
        assert!(list.is_empty());

        let mut cx = ToolContext::new(&mut vp, &mut scene);
        tool.press(Point::new(1.0, 1.0), &mut cx);
        tool.motion(Point::new(4.0, 2.0), &mut cx);
        tool.draw(&mut list, visible, Point::new(4.0, 2.0));
        assert!(matches!(
            list.commands[..],
            [DrawCmd::Rect {
                style: LineStyle::Dashed,
                ..
            }]
        ));
    }

    #[test]
    fn default_cancel_finishes() {
        let mut vp = viewport();
        let mut scene = ItemScene::new();
        let mut cx = ToolContext::new(&mut vp, &mut scene);
        let mut tool = ZoomTool::new();
        tool.cancel(&mut cx);
        assert!(cx.is_finished());
    }
}
