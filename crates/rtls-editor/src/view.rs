//! The scene view: routes pointer, wheel and keyboard input between the
//! attached tool, ordinary scene interaction and built-in pan/rotate
//! gestures.
//!
//! Dispatch is a small state machine over [`MouseContext`]. A press decides
//! who owns the gesture; moves and the release go to that owner; the release
//! always returns the view to [`MouseContext::Default`].

use crate::input::{Buttons, ContextMenuReason, InputEvent, Modifiers, PointerButton};
use crate::shortcuts::{ShortcutMap, ViewAction};
use crate::tools::{CursorShape, RubberBandTool, Tool, ToolContext, ToolKind, create_tool};
use kurbo::{Point, Size, Vec2};
use rtls_core::{ItemScene, Scene, SettingsChange, ViewEvent, ViewSettings, Viewport};
use rtls_render::{Painter, paint_background, paint_geofence, paint_items};

/// Angle changes at or above this many degrees between two samples are
/// treated as a wrap through 0°/360° and dropped.
pub const ROTATION_WRAP_GUARD: f64 = 350.0;

/// Wheel delta of one notch, used for keyboard zoom.
pub const WHEEL_STEP: f64 = 120.0;

/// Who receives pointer moves and the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseContext {
    #[default]
    Default,
    Panning,
    SceneDefault,
    ToolActive,
}

/// Identifies one attachment of a tool. Completion requests carrying an
/// older handle are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolHandle(u64);

struct AttachedTool {
    handle: ToolHandle,
    tool: Box<dyn Tool>,
}

/// State of one press-drag-release session.
#[derive(Debug, Clone, Copy)]
struct Gesture {
    button: Option<PointerButton>,
    /// Widget centre in pixels at press time.
    center_point: Point,
    start_point: Point,
    /// Last pointer position while panning.
    last_mouse: Option<Point>,
    last_angle: f64,
    first_move: bool,
}

impl Default for Gesture {
    fn default() -> Self {
        Self {
            button: None,
            center_point: Point::ORIGIN,
            start_point: Point::ORIGIN,
            last_mouse: None,
            last_angle: 0.0,
            first_move: true,
        }
    }
}

/// Interactive view over a [`Scene`].
///
/// Owns the viewport, the display settings, the scene and at most one
/// attached tool. Input positions are widget pixels.
pub struct GraphicsView<S: Scene> {
    viewport: Viewport,
    settings: ViewSettings,
    scene: S,
    tool: Option<AttachedTool>,
    next_handle: u64,
    context: MouseContext,
    gesture: Gesture,
    ignore_context_menu: bool,
    /// Last known pointer position in pixels.
    pointer: Option<Point>,
}

impl<S: Scene> GraphicsView<S> {
    pub fn new(scene: S, size: Size) -> Self {
        Self {
            viewport: Viewport::new(size),
            settings: ViewSettings::default(),
            scene,
            tool: None,
            next_handle: 0,
            context: MouseContext::Default,
            gesture: Gesture::default(),
            ignore_context_menu: false,
            pointer: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn context(&self) -> MouseContext {
        self.context
    }

    /// Accumulated rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.viewport.rotation()
    }

    pub fn tool(&self) -> Option<&dyn Tool> {
        self.tool.as_ref().map(|t| t.tool.as_ref())
    }

    pub fn tool_handle(&self) -> Option<ToolHandle> {
        self.tool.as_ref().map(|t| t.handle)
    }

    pub fn cursor(&self) -> CursorShape {
        if self.context == MouseContext::Panning {
            return CursorShape::ClosedHand;
        }
        self.tool().map_or(CursorShape::Arrow, |t| t.cursor())
    }

    // ─── Tool lifecycle ──────────────────────────────────────────────────

    /// Attach `tool`, replacing the current one. The previous tool is
    /// cancelled with its completion disconnected, so it is never detached
    /// twice and receives nothing afterwards.
    pub fn set_tool(&mut self, tool: Option<Box<dyn Tool>>) -> Option<ToolHandle> {
        if let Some(mut old) = self.tool.take() {
            log::debug!("replacing tool {:?}", old.tool.kind());
            let mut cx = ToolContext::new(&mut self.viewport, &mut self.scene);
            old.tool.cancel(&mut cx);
        }
        let tool = tool?;
        self.next_handle += 1;
        let handle = ToolHandle(self.next_handle);
        log::debug!("attached tool {:?} as {handle:?}", tool.kind());
        self.tool = Some(AttachedTool { handle, tool });
        Some(handle)
    }

    /// Completion signal of the tool attached as `handle`. Detaches it if it
    /// is still the attached one; stale handles are ignored.
    pub fn complete_tool(&mut self, handle: ToolHandle) -> bool {
        if self.tool_handle() != Some(handle) {
            log::trace!("ignoring stale completion from {handle:?}");
            return false;
        }
        self.tool = None;
        if self.context == MouseContext::ToolActive {
            self.context = MouseContext::Default;
        }
        true
    }

    /// Cancel the attached tool, if any.
    pub fn cancel_tool(&mut self) {
        self.with_tool(|tool, cx| tool.cancel(cx));
    }

    /// Run `f` against the attached tool, then honour its completion.
    fn with_tool<R>(
        &mut self,
        f: impl FnOnce(&mut dyn Tool, &mut ToolContext<'_>) -> R,
    ) -> Option<R> {
        let attached = self.tool.as_mut()?;
        let handle = attached.handle;
        let mut cx = ToolContext::new(&mut self.viewport, &mut self.scene);
        let result = f(attached.tool.as_mut(), &mut cx);
        if cx.is_finished() {
            self.complete_tool(handle);
        }
        Some(result)
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    pub fn press(&mut self, pos: Point, button: PointerButton, modifiers: Modifiers) {
        self.pointer = Some(pos);
        self.context = MouseContext::Default;
        let scene_pos = self.viewport.view_to_world_point(pos);

        let mut accepted = false;
        if self.tool.is_some() {
            if self.with_tool(|t, cx| t.press(scene_pos, cx)) == Some(true) {
                accepted = true;
                self.enter_tool_context();
            }
        } else if self.scene.press(scene_pos, button) {
            accepted = true;
            self.context = MouseContext::SceneDefault;
        }

        self.gesture.button = Some(button);
        self.gesture.center_point = self.widget_center();
        self.gesture.start_point = pos;

        if !accepted {
            if button == PointerButton::Left && modifiers.command() {
                self.set_tool(Some(Box::new(RubberBandTool::new())));
                if self.with_tool(|t, cx| t.press(scene_pos, cx)) == Some(true) {
                    accepted = true;
                    self.enter_tool_context();
                }
            } else if button == PointerButton::Left {
                self.gesture.last_mouse = Some(pos);
                accepted = true;
            } else if button == PointerButton::Right && self.tool.is_some() {
                self.cancel_tool();
                accepted = true;
            }
        }

        if button == PointerButton::Right {
            self.ignore_context_menu = accepted && self.context != MouseContext::SceneDefault;
        }
    }

    pub fn motion(&mut self, pos: Point, buttons: Buttons) {
        self.pointer = Some(pos);
        if self.tool.is_some() {
            // The overlay may follow the pointer.
            self.scene.request_repaint();
        }
        let scene_pos = self.viewport.view_to_world_point(pos);

        match self.context {
            MouseContext::ToolActive => {
                self.with_tool(|t, cx| t.motion(scene_pos, cx));
            }
            MouseContext::SceneDefault => self.scene.drag(scene_pos),
            MouseContext::Panning => {
                if self.gesture.button == Some(PointerButton::Left) {
                    let last = self.gesture.last_mouse.unwrap_or(pos);
                    self.gesture.last_mouse = Some(pos);
                    let delta = self.viewport.view_to_world_vec(pos - last);
                    self.viewport.translate(-delta.x, -delta.y);
                }
            }
            MouseContext::Default => {
                if buttons.left {
                    self.context = MouseContext::Panning;
                } else if buttons.right {
                    self.rotate_gesture(pos);
                }
            }
        }
    }

    pub fn release(&mut self, pos: Point, button: PointerButton) {
        self.pointer = Some(pos);
        self.gesture.first_move = true;
        let scene_pos = self.viewport.view_to_world_point(pos);

        match self.context {
            MouseContext::ToolActive => {
                self.with_tool(|t, cx| t.release(scene_pos, cx));
            }
            MouseContext::SceneDefault => self.scene.release(scene_pos),
            MouseContext::Panning => self.gesture.last_mouse = None,
            MouseContext::Default => {
                if button == PointerButton::Left {
                    if self.tool.is_some() {
                        self.with_tool(|t, cx| t.click(scene_pos, cx));
                    } else {
                        self.scene.clear_selection();
                    }
                }
            }
        }
        self.context = MouseContext::Default;
    }

    /// Zoom at the pointer. `delta` is in eighths of a degree.
    pub fn wheel(&mut self, pos: Point, delta: f64) {
        self.pointer = Some(pos);
        let s = wheel_factor(delta);
        let center = self.viewport.view_to_world_point(pos);
        self.viewport.scale(s, s, Some(center));
    }

    /// Whether the host should open a context menu. A mouse-triggered menu
    /// right after a consumed right press is suppressed once.
    pub fn context_menu(&mut self, reason: ContextMenuReason) -> bool {
        if self.ignore_context_menu && reason == ContextMenuReason::Mouse {
            self.ignore_context_menu = false;
            return false;
        }
        true
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Apply the shortcut bound to `key`. Returns whether one was bound.
    pub fn key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let Some(action) = ShortcutMap::resolve(
            key,
            modifiers.ctrl,
            modifiers.shift,
            modifiers.alt,
            modifiers.meta,
        ) else {
            return false;
        };
        log::debug!("shortcut {key:?} -> {action:?}");
        self.apply(action);
        true
    }

    pub fn apply(&mut self, action: ViewAction) {
        match action {
            ViewAction::CancelTool => self.cancel_tool(),
            ViewAction::ZoomIn => self.zoom_step(WHEEL_STEP),
            ViewAction::ZoomOut => self.zoom_step(-WHEEL_STEP),
            ViewAction::CenterOnAnchors => self.center_on_anchors(),
            ViewAction::ResetRotation => self.reset_rotation(),
            ViewAction::ToolPan => {
                self.set_tool(Some(create_tool(ToolKind::Pan)));
            }
            ViewAction::ToolZoom => {
                self.set_tool(Some(create_tool(ToolKind::Zoom)));
            }
            ViewAction::ToolRubberBand => {
                self.set_tool(Some(create_tool(ToolKind::RubberBand)));
            }
        }
    }

    fn zoom_step(&mut self, delta: f64) {
        let s = wheel_factor(delta);
        self.viewport.scale(s, s, None);
    }

    // ─── View operations ─────────────────────────────────────────────────

    pub fn resize(&mut self, size: Size) {
        self.viewport.resize(size);
    }

    /// Undo the accumulated rotation in one step.
    pub fn reset_rotation(&mut self) {
        self.viewport.reset_rotation();
        self.viewport.notify_rotation();
        self.scene.request_repaint();
    }

    /// Frame every anchor with a margin. No-op without anchors.
    pub fn center_on_anchors(&mut self) {
        match self.scene.anchor_bounds() {
            Some(bounds) => self.viewport.center_on_rect(bounds),
            None => log::debug!("no anchors to centre on"),
        }
    }

    /// Mutate the display settings. Any resulting change requests a repaint.
    pub fn update_settings(&mut self, f: impl FnOnce(&mut ViewSettings)) -> Vec<SettingsChange> {
        f(&mut self.settings);
        let changes = self.settings.take_changes();
        if !changes.is_empty() {
            self.scene.request_repaint();
        }
        changes
    }

    /// Drain viewport notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<ViewEvent> {
        self.viewport.take_events()
    }

    /// Dispatch one normalized input event.
    pub fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.press(Point::new(*x, *y), *button, *modifiers),
            InputEvent::PointerMove { x, y, buttons, .. } => {
                self.motion(Point::new(*x, *y), *buttons)
            }
            InputEvent::PointerUp { x, y, button, .. } => self.release(Point::new(*x, *y), *button),
            InputEvent::Wheel { x, y, delta } => self.wheel(Point::new(*x, *y), *delta),
            InputEvent::Key { key, modifiers } => {
                self.key(key, *modifiers);
            }
            InputEvent::Resize { width, height } => self.resize(Size::new(*width, *height)),
            InputEvent::ContextMenu { reason } => {
                self.context_menu(*reason);
            }
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Paint floorplan, grid and origin under everything the widget shows.
    /// `painter` works in scene units.
    pub fn draw_background(&self, painter: &mut dyn Painter) {
        paint_background(painter, &self.settings, self.viewport.exposed_rect());
    }

    /// Paint the attached tool's overlay.
    pub fn draw_foreground(&self, painter: &mut dyn Painter) {
        if let Some(tool) = self.tool() {
            let cursor = self
                .pointer
                .map(|p| self.viewport.view_to_world_point(p))
                .unwrap_or_else(|| self.viewport.visible_rect().center());
            tool.draw(painter, self.viewport.visible_rect(), cursor);
        }
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn enter_tool_context(&mut self) {
        // The press itself may have finished the tool.
        if self.tool.is_some() {
            self.context = MouseContext::ToolActive;
        }
    }

    fn widget_center(&self) -> Point {
        let size = self.viewport.size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    /// Right-drag rotation about the widget centre.
    fn rotate_gesture(&mut self, pos: Point) {
        let g = &mut self.gesture;
        let begin = g.start_point - g.center_point;
        let end = pos - g.center_point;
        let angle = angle_to(begin, end);
        let delta = angle - g.last_angle;

        if !g.first_move && delta != 0.0 && delta.abs() < ROTATION_WRAP_GUARD {
            self.viewport.rotate_by(delta);
        }
        g.last_angle = angle;
        g.first_move = false;

        self.scene.request_repaint();
        self.viewport.notify_rotation();
    }
}

impl GraphicsView<ItemScene> {
    /// Paint one frame: background, geofence rings, items, then the tool
    /// overlay.
    pub fn paint(&self, painter: &mut dyn Painter) {
        self.draw_background(painter);
        paint_geofence(painter, &self.settings, &self.scene);
        paint_items(painter, &self.scene);
        self.draw_foreground(painter);
    }
}

/// Map a wheel delta to a scale factor; positive deltas zoom in.
pub fn wheel_factor(delta: f64) -> f64 {
    2.0 - 2f64.powf(delta / 360.0)
}

/// Screen angle of `v` in degrees, clockwise from +x, in `[0, 360)`.
///
/// Clockwise drags therefore report positive `RotationChanged` values and
/// turn the scene with the pointer. Toolkits measuring counter-clockwise
/// (Qt's `QLineF::angleTo`) report the opposite sign for the same drag.
fn screen_angle(v: Vec2) -> f64 {
    v.y.atan2(v.x).to_degrees().rem_euclid(360.0)
}

/// Clockwise angle from `from` to `to`, in `[0, 360)`.
fn angle_to(from: Vec2, to: Vec2) -> f64 {
    (screen_angle(to) - screen_angle(from)).rem_euclid(360.0)
}
