//! Scene items → drawing commands.
//!
//! Anchors are outlined squares, tags are filled squares with their history
//! trail and R95 circle underneath and an optional label beside them.
//! Selected items get a dashed highlight. Geofence rings sit under all items.

use crate::painter::{LineStyle, Painter};
use kurbo::Point;
use peniko::Color;
use rtls_core::{ItemKind, ItemScene, SceneItem, ViewSettings};

/// Radius of one history trail dot, relative to the tag size.
const TRAIL_DOT_RATIO: f64 = 0.25;

/// Geofence rings around the anchors' centre of gravity, when geofencing
/// is on. Zones with a zero radius are skipped.
pub fn paint_geofence(painter: &mut dyn Painter, settings: &ViewSettings, scene: &ItemScene) {
    if !settings.geofence_mode() {
        return;
    }
    let Some(center) = scene.anchor_centroid() else {
        return;
    };
    for zone in settings.zones().iter().filter(|z| z.radius > 0.0) {
        let color = if zone.alarm {
            Color::from_rgb8(220, 0, 0)
        } else {
            Color::from_rgb8(0, 160, 60)
        };
        painter.stroke_circle(center, zone.radius, color);
    }
}

pub fn paint_items(painter: &mut dyn Painter, scene: &ItemScene) {
    for item in scene.items().iter().filter(|i| i.visible) {
        match item.kind {
            ItemKind::Anchor => paint_anchor(painter, item),
            ItemKind::Tag => paint_tag(painter, scene, item),
            ItemKind::Marker => {
                painter.stroke_rect(item.bounds, Color::from_rgb8(128, 128, 128), LineStyle::Solid)
            }
        }
        if item.selected {
            painter.stroke_rect(
                item.bounds.inflate(0.05, 0.05),
                Color::from_rgb8(0, 120, 215),
                LineStyle::Dashed,
            );
        }
    }
}

fn paint_anchor(painter: &mut dyn Painter, item: &SceneItem) {
    painter.stroke_rect(item.bounds, Color::from_rgb8(0, 0, 0), LineStyle::Solid);
}

fn paint_tag(painter: &mut dyn Painter, scene: &ItemScene, item: &SceneItem) {
    let color = Color::from_rgb8(230, 120, 30);
    if let Some(track) = scene.track(item.id) {
        if track.show_history() {
            let radius = scene.tag_size() * TRAIL_DOT_RATIO;
            // the newest sample is the tag itself
            let older = track.len().saturating_sub(1);
            for p in track.history().take(older) {
                painter.stroke_circle(p, radius, color);
            }
        }
        if let Some(r95) = track.r95() {
            painter.stroke_circle(item.position(), r95, Color::from_rgb8(200, 0, 0));
        }
    }
    painter.fill_rect(item.bounds, color);
    if scene.show_labels() {
        if let Some(address) = item.id.address() {
            let corner = Point::new(item.bounds.x1, item.bounds.y0);
            painter.draw_label(corner, &scene.tag_label(address), Color::from_rgb8(0, 0, 0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painter::{DisplayList, DrawCmd};
    use kurbo::Rect;
    use pretty_assertions::assert_eq;
    use rtls_core::Scene;

    #[test]
    fn tag_draws_trail_r95_and_body() {
        let mut scene = ItemScene::new();
        for x in 0..3 {
            scene.update_tag(7, Point::new(x as f64, 0.0));
        }
        scene.set_tag_r95(7, Some(0.8));

        let mut list = DisplayList::new();
        paint_items(&mut list, &scene);
        let circles = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { .. }))
            .count();
        // two older trail dots plus the R95 circle
        assert_eq!(circles, 3);
        assert!(matches!(list.commands.last(), Some(DrawCmd::FillRect { .. })));
    }

    #[test]
    fn selection_adds_dashed_highlight() {
        let mut scene = ItemScene::new();
        scene.add_anchor(1, Point::new(0.0, 0.0));
        scene.select_intersecting(Rect::new(-1.0, -1.0, 1.0, 1.0));

        let mut list = DisplayList::new();
        paint_items(&mut list, &scene);
        assert_eq!(list.len(), 2);
        assert!(matches!(
            list.commands[1],
            DrawCmd::Rect {
                style: LineStyle::Dashed,
                ..
            }
        ));
    }

    #[test]
    fn labels_follow_the_toggle() {
        let mut scene = ItemScene::new();
        scene.update_tag(0xbeef, Point::new(1.0, 1.0));
        scene.set_tag_label(0xbeef, "cart");

        let mut list = DisplayList::new();
        paint_items(&mut list, &scene);
        assert!(!list.commands.iter().any(|c| matches!(c, DrawCmd::Label { .. })));

        scene.set_show_labels(true);
        let mut list = DisplayList::new();
        paint_items(&mut list, &scene);
        match list.commands.last() {
            Some(DrawCmd::Label { text, anchor, .. }) => {
                assert_eq!(text, "cart");
                assert!(anchor.distance(Point::new(1.15, 0.85)) < 1e-9, "{anchor:?}");
            }
            other => panic!("expected a label, got {other:?}"),
        }
    }

    #[test]
    fn geofence_rings_surround_the_anchor_centroid() {
        let mut scene = ItemScene::new();
        scene.add_anchor(1, Point::new(0.0, 0.0));
        scene.add_anchor(2, Point::new(4.0, 0.0));
        scene.add_anchor(3, Point::new(2.0, 3.0));
        let mut settings = ViewSettings::default();
        settings.set_zone(1, 2.0, false).unwrap();
        settings.set_zone(2, 0.0, true).unwrap();

        let mut list = DisplayList::new();
        paint_geofence(&mut list, &settings, &scene);
        assert!(list.is_empty());

        settings.set_geofence_mode(true);
        settings.set_zone(2, 5.0, true).unwrap();
        paint_geofence(&mut list, &settings, &scene);
        let rings: Vec<(Point, f64)> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect();
        assert_eq!(rings.len(), 2);
        assert!(rings[0].0.distance(Point::new(2.0, 1.0)) < 1e-9);
        assert_eq!((rings[0].1, rings[1].1), (2.0, 5.0));
    }

    #[test]
    fn geofence_needs_anchors() {
        let mut settings = ViewSettings::default();
        settings.set_geofence_mode(true);
        settings.set_zone(1, 2.0, false).unwrap();
        let mut list = DisplayList::new();
        paint_geofence(&mut list, &settings, &ItemScene::new());
        assert!(list.is_empty());
    }
}
