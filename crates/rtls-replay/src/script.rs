//! Replay scripts: a widget size, the items to place, and the input to feed.
//!
//! ```json
//! {
//!   "size": [800, 600],
//!   "settings": { "show_grid": false, "geofence_mode": true, "zones": [{ "radius": 3 }] },
//!   "scene": { "show_labels": true, "history_len": 10 },
//!   "items": [
//!     { "kind": "anchor", "address": "0x1", "x": 0, "y": 0 },
//!     { "kind": "tag", "address": "0xbeef", "x": 2, "y": 1, "r95": 0.4, "label": "cart" }
//!   ],
//!   "events": [
//!     { "type": "key", "key": "a" },
//!     { "type": "wheel", "x": 400, "y": 300, "delta": 120 }
//!   ]
//! }
//! ```

use rtls_core::id::parse_hex_address;
use rtls_core::{ItemKind, ItemScene, Point, Rect, Size, ViewEvent, ViewSettings};
use rtls_editor::{GraphicsView, InputEvent};
use rtls_render::DisplayList;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub size: [f64; 2],
    #[serde(default)]
    pub settings: Option<ViewSettings>,
    #[serde(default)]
    pub scene: SceneOptions,
    #[serde(default)]
    pub items: Vec<ScriptItem>,
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

/// Tag presentation, applied before any item is placed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    pub tag_size: Option<f64>,
    pub history_len: Option<usize>,
    pub show_history: Option<bool>,
    pub show_labels: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScriptItem {
    Anchor {
        address: String,
        x: f64,
        y: f64,
    },
    /// One location update; repeat to build up history.
    Tag {
        address: String,
        x: f64,
        y: f64,
        #[serde(default)]
        r95: Option<f64>,
        #[serde(default)]
        label: Option<String>,
    },
}

/// Something the view reported while replaying.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    VisibleRectChanged { rect: [f64; 4] },
    ScaleChanged { value: f64 },
    RotationChanged { angle: f64 },
    SizeChanged { width: f64, height: f64 },
    /// Answer to a context-menu request.
    ContextMenu { shown: bool },
}

impl From<ViewEvent> for Notification {
    fn from(event: ViewEvent) -> Self {
        match event {
            ViewEvent::VisibleRectChanged(r) => Self::VisibleRectChanged { rect: rect_array(r) },
            ViewEvent::ScaleChanged(value) => Self::ScaleChanged { value },
            ViewEvent::RotationChanged(angle) => Self::RotationChanged { angle },
            ViewEvent::SizeChanged(size) => Self::SizeChanged {
                width: size.width,
                height: size.height,
            },
        }
    }
}

/// Final state after a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub notifications: Vec<Notification>,
    pub visible_rect: [f64; 4],
    pub rotation: f64,
    pub tool: Option<&'static str>,
    pub selected: Vec<String>,
    pub moved: Vec<String>,
    /// Label of every tag, in paint order.
    pub labels: Vec<String>,
    /// Draw commands in the last frame.
    pub draw_commands: usize,
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("invalid script: {e}"))
    }

    /// Build the scene and view the script starts from.
    pub fn build(&self) -> Result<GraphicsView<ItemScene>, String> {
        let mut scene = ItemScene::new();
        let options = &self.scene;
        if let Some(size) = options.tag_size {
            scene.set_tag_size(size);
        }
        if let Some(len) = options.history_len {
            scene.set_history_len(len);
        }
        if let Some(show) = options.show_history {
            scene.set_show_history(show);
        }
        scene.set_show_labels(options.show_labels);

        for item in &self.items {
            match item {
                ScriptItem::Anchor { address, x, y } => {
                    scene.add_anchor(parse_hex_address(address)?, Point::new(*x, *y));
                }
                ScriptItem::Tag {
                    address,
                    x,
                    y,
                    r95,
                    label,
                } => {
                    let address = parse_hex_address(address)?;
                    scene.update_tag(address, Point::new(*x, *y));
                    if r95.is_some() {
                        scene.set_tag_r95(address, *r95);
                    }
                    if let Some(label) = label {
                        scene.set_tag_label(address, label);
                    }
                }
            }
        }
        let [width, height] = self.size;
        let mut view = GraphicsView::new(scene, Size::new(width, height));
        if let Some(settings) = &self.settings {
            view.update_settings(|s| s.apply(settings));
        }
        Ok(view)
    }

    /// Feed every event and collect what the view reported.
    pub fn replay(&self) -> Result<Report, String> {
        let mut view = self.build()?;
        let mut notifications: Vec<Notification> =
            view.take_events().into_iter().map(Notification::from).collect();

        for event in &self.events {
            log::debug!("replaying {event:?}");
            if let InputEvent::ContextMenu { reason } = event {
                let shown = view.context_menu(*reason);
                notifications.push(Notification::ContextMenu { shown });
            } else {
                view.handle(event);
            }
            notifications.extend(view.take_events().into_iter().map(Notification::from));
        }

        let mut frame = DisplayList::new();
        view.paint(&mut frame);

        let moved = view.scene_mut().take_moved();
        let scene = view.scene();
        Ok(Report {
            notifications,
            visible_rect: rect_array(view.viewport().visible_rect()),
            rotation: view.rotation(),
            tool: view.tool().and_then(|t| t.kind()).map(|k| k.name()),
            selected: scene.selected().iter().map(ToString::to_string).collect(),
            moved: moved.iter().map(ToString::to_string).collect(),
            labels: scene
                .items()
                .iter()
                .filter(|i| i.kind == ItemKind::Tag)
                .filter_map(|i| i.id.address())
                .map(|a| scene.tag_label(a))
                .collect(),
            draw_commands: frame.len(),
        })
    }
}

fn rect_array(r: Rect) -> [f64; 4] {
    [r.x0, r.y0, r.x1, r.y1]
}
