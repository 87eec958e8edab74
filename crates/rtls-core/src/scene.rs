//! Scene contract consumed by the view, and an in-memory RTLS scene.
//!
//! The view never walks items itself. It asks the hosting scene to select
//! by rectangle, clear the selection, repaint, and to handle ordinary item
//! interaction (press/drag/release) when no tool claims a gesture.

use crate::id::{ItemId, default_tag_label};
use crate::tracking::{DEFAULT_HISTORY_LEN, DEFAULT_TAG_SIZE, TagTrack, centroid};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Side length of an anchor marker in logical units.
pub const ANCHOR_SIZE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// What the hosting scene provides to the view.
pub trait Scene {
    /// Select every selectable item intersecting `rect`; returns how many.
    fn select_intersecting(&mut self, rect: Rect) -> usize;

    fn clear_selection(&mut self);

    /// Mark the scene dirty.
    fn request_repaint(&mut self);

    /// Ordinary item interaction. Returns `true` when the scene takes the
    /// press, in which case it also receives the following drags and release.
    fn press(&mut self, _pos: Point, _button: PointerButton) -> bool {
        false
    }

    fn drag(&mut self, _pos: Point) {}

    fn release(&mut self, _pos: Point) {}

    /// Region "centre on anchors" should frame, if the scene has anchors.
    fn anchor_bounds(&self) -> Option<Rect> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Tag,
    Anchor,
    /// Decorations such as labels or zone circles.
    Marker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub bounds: Rect,
    pub selectable: bool,
    pub movable: bool,
    pub selected: bool,
    pub visible: bool,
}

impl SceneItem {
    pub fn new(id: ItemId, kind: ItemKind, bounds: Rect) -> Self {
        Self {
            id,
            kind,
            bounds,
            selectable: true,
            movable: false,
            selected: false,
            visible: true,
        }
    }

    pub fn position(&self) -> Point {
        self.bounds.center()
    }

    /// Closed-interval overlap; touching edges count.
    pub fn intersects(&self, rect: Rect) -> bool {
        let b = self.bounds;
        b.x0 <= rect.x1 && rect.x0 <= b.x1 && b.y0 <= rect.y1 && rect.y0 <= b.y1
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    id: ItemId,
    last: Point,
}

/// Tags and anchors laid out on the floor plane.
///
/// Items are painted in insertion order, so the last matching item is the
/// topmost for hit testing. Anchors are movable so the operator can drag them
/// into place; tags follow location updates only.
#[derive(Debug, Default)]
pub struct ItemScene {
    items: Vec<SceneItem>,
    tracks: HashMap<ItemId, TagTrack>,
    tag_size: Option<f64>,
    history_len: Option<usize>,
    show_history: Option<bool>,
    labels: HashMap<ItemId, String>,
    show_labels: bool,
    drag: Option<DragState>,
    moved: Vec<ItemId>,
    dirty: bool,
}

impl ItemScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut SceneItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Insert or replace an item with the same id.
    pub fn insert(&mut self, item: SceneItem) {
        if let Some(existing) = self.item_mut(item.id) {
            *existing = item;
        } else {
            self.items.push(item);
        }
        self.dirty = true;
    }

    pub fn remove(&mut self, id: ItemId) -> Option<SceneItem> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        self.tracks.remove(&id);
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
        self.dirty = true;
        Some(self.items.remove(idx))
    }

    pub fn tag_size(&self) -> f64 {
        self.tag_size.unwrap_or(DEFAULT_TAG_SIZE)
    }

    /// Resize every tag marker about its current position.
    pub fn set_tag_size(&mut self, size: f64) {
        if !(size.is_finite() && size > 0.0) {
            log::warn!("ignoring tag size {size}");
            return;
        }
        self.tag_size = Some(size);
        for item in self.items.iter_mut().filter(|i| i.kind == ItemKind::Tag) {
            item.bounds = Rect::from_center_size(item.bounds.center(), (size, size));
        }
        self.dirty = true;
    }

    pub fn history_len(&self) -> usize {
        self.history_len.unwrap_or(DEFAULT_HISTORY_LEN)
    }

    pub fn set_history_len(&mut self, len: usize) {
        self.history_len = Some(len);
        for track in self.tracks.values_mut() {
            track.set_capacity(len);
        }
        self.dirty = true;
    }

    /// Whether tag trails are drawn; on unless turned off.
    pub fn show_history(&self) -> bool {
        self.show_history.unwrap_or(true)
    }

    pub fn set_show_history(&mut self, show: bool) {
        self.show_history = Some(show);
        for track in self.tracks.values_mut() {
            track.set_show_history(show);
        }
        self.dirty = true;
    }

    /// Label shown next to the tag: the configured one, or `Tag XXXX`.
    pub fn tag_label(&self, address: u64) -> String {
        self.labels
            .get(&ItemId::tag(address))
            .cloned()
            .unwrap_or_else(|| default_tag_label(address))
    }

    /// Configure a tag's label; an empty label restores the default.
    pub fn set_tag_label(&mut self, address: u64, label: &str) {
        let id = ItemId::tag(address);
        let label = label.trim();
        if label.is_empty() {
            self.labels.remove(&id);
        } else {
            self.labels.insert(id, label.to_string());
        }
        self.dirty = true;
    }

    pub fn show_labels(&self) -> bool {
        self.show_labels
    }

    pub fn set_show_labels(&mut self, show: bool) {
        if self.show_labels != show {
            self.show_labels = show;
            self.dirty = true;
        }
    }

    pub fn add_anchor(&mut self, address: u64, pos: Point) -> ItemId {
        let id = ItemId::anchor(address);
        let mut item = SceneItem::new(
            id,
            ItemKind::Anchor,
            Rect::from_center_size(pos, (ANCHOR_SIZE, ANCHOR_SIZE)),
        );
        item.movable = true;
        self.insert(item);
        id
    }

    /// Move a tag to its latest location, creating it on first sight.
    pub fn update_tag(&mut self, address: u64, pos: Point) -> ItemId {
        let id = ItemId::tag(address);
        let size = self.tag_size();
        let bounds = Rect::from_center_size(pos, (size, size));
        match self.item_mut(id) {
            Some(item) => item.bounds = bounds,
            None => {
                log::debug!("new tag {id}");
                self.items.push(SceneItem::new(id, ItemKind::Tag, bounds));
            }
        }
        let (len, show) = (self.history_len(), self.show_history());
        self.tracks
            .entry(id)
            .or_insert_with(|| {
                let mut track = TagTrack::new(len);
                track.set_show_history(show);
                track
            })
            .push(pos);
        self.dirty = true;
        id
    }

    pub fn set_tag_r95(&mut self, address: u64, radius: Option<f64>) {
        if let Some(track) = self.tracks.get_mut(&ItemId::tag(address)) {
            track.set_r95(radius);
            self.dirty = true;
        }
    }

    pub fn track(&self, id: ItemId) -> Option<&TagTrack> {
        self.tracks.get(&id)
    }

    /// Anchor positions, in insertion order.
    pub fn anchor_positions(&self) -> Vec<Point> {
        self.items
            .iter()
            .filter(|i| i.kind == ItemKind::Anchor && i.visible)
            .map(SceneItem::position)
            .collect()
    }

    /// Centre of gravity of the visible anchors.
    pub fn anchor_centroid(&self) -> Option<Point> {
        centroid(&self.anchor_positions())
    }

    /// Topmost visible item containing `pos`.
    pub fn hit_test(&self, pos: Point) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|i| i.visible && i.bounds.contains(pos))
            .map(|i| i.id)
    }

    /// Visible selectable items intersecting `rect`, in paint order.
    pub fn hit_test_rect(&self, rect: Rect) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|i| i.visible && i.selectable && i.intersects(rect))
            .map(|i| i.id)
            .collect()
    }

    pub fn selected(&self) -> Vec<ItemId> {
        self.items
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.id)
            .collect()
    }

    /// Items moved by dragging since the last call.
    pub fn take_moved(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.moved)
    }

    /// Returns whether a repaint was requested since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Scene for ItemScene {
    fn select_intersecting(&mut self, rect: Rect) -> usize {
        let hits = self.hit_test_rect(rect.abs());
        for item in &mut self.items {
            if hits.contains(&item.id) {
                item.selected = true;
            }
        }
        if !hits.is_empty() {
            self.dirty = true;
        }
        hits.len()
    }

    fn clear_selection(&mut self) {
        for item in &mut self.items {
            item.selected = false;
        }
        self.dirty = true;
    }

    fn request_repaint(&mut self) {
        self.dirty = true;
    }

    fn press(&mut self, pos: Point, button: PointerButton) -> bool {
        if button != PointerButton::Left {
            return false;
        }
        let Some(id) = self.hit_test(pos) else {
            return false;
        };
        let Some(item) = self.item(id) else {
            return false;
        };
        let (selectable, movable) = (item.selectable, item.movable);
        if !selectable && !movable {
            return false;
        }
        if selectable {
            for item in &mut self.items {
                item.selected = item.id == id;
            }
        }
        if movable {
            self.drag = Some(DragState { id, last: pos });
        }
        self.dirty = true;
        true
    }

    fn drag(&mut self, pos: Point) {
        let Some(state) = self.drag else {
            return;
        };
        let delta: Vec2 = pos - state.last;
        if let Some(item) = self.item_mut(state.id) {
            item.bounds = item.bounds + delta;
            if !self.moved.contains(&state.id) {
                self.moved.push(state.id);
            }
            self.dirty = true;
        }
        self.drag = Some(DragState { last: pos, ..state });
    }

    fn release(&mut self, pos: Point) {
        self.drag(pos);
        self.drag = None;
    }

    /// Smallest rectangle containing every visible anchor position.
    fn anchor_bounds(&self) -> Option<Rect> {
        let positions = self.anchor_positions();
        let (first, rest) = positions.split_first()?;
        Some(
            rest.iter()
                .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
        )
    }
}
