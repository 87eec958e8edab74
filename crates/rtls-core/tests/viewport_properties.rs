//! Integration tests: viewport bounds and framing across many inputs.

use pretty_assertions::assert_eq;
use rtls_core::viewport::{CENTER_ZOOM_OUT, MAX_EXTENT, MIN_EXTENT};
use rtls_core::{ItemScene, Point, Rect, Scene, Size, ViewEvent, Viewport};

fn in_bounds(r: Rect) -> bool {
    let extent = MIN_EXTENT..=MAX_EXTENT;
    extent.contains(&r.width()) && extent.contains(&r.height())
}

#[test]
fn any_sequence_of_scales_stays_bounded() {
    let mut vp = Viewport::new(Size::new(1024.0, 768.0));
    let factors = [0.0001, 3.0, 10000.0, 0.9, 1.1, 0.0, -2.0, 1e300, 0.5];
    let centers = [
        None,
        Some(Point::new(-40.0, 12.0)),
        Some(Point::new(1e4, -1e4)),
    ];
    for (i, f) in factors.iter().enumerate() {
        vp.scale(*f, *f, centers[i % centers.len()]);
        assert!(in_bounds(vp.visible_rect()), "after factor {f}: {:?}", vp.visible_rect());
        assert!(vp.world_to_view().as_coeffs().iter().all(|c| c.is_finite()));
    }
}

#[test]
fn anisotropic_scale_clamps_each_axis() {
    let mut vp = Viewport::default();
    vp.set_visible_rect(Rect::new(0.0, 0.0, 100.0, 100.0));
    vp.scale(100.0, 0.001, None);
    let r = vp.visible_rect();
    assert_eq!(r.width(), MAX_EXTENT);
    assert_eq!(r.height(), MIN_EXTENT);
}

#[test]
fn centering_on_anchors_frames_them_with_margin() {
    let mut scene = ItemScene::new();
    scene.add_anchor(0x1, Point::new(0.0, 0.0));
    scene.add_anchor(0x2, Point::new(10.0, 0.0));
    scene.add_anchor(0x3, Point::new(10.0, 5.0));

    let mut vp = Viewport::default();
    let bounds = scene.anchor_bounds().unwrap();
    vp.center_on_rect(bounds);

    let r = vp.visible_rect();
    assert!((r.width() - 10.0 * CENTER_ZOOM_OUT).abs() < 1e-9);
    assert!((r.height() - 5.0 * CENTER_ZOOM_OUT).abs() < 1e-9);
    assert!(r.contains(Point::new(0.0, 0.0)) && r.contains(Point::new(10.0, 5.0)));
}

#[test]
fn every_mutation_reports_the_stored_rect() {
    let mut vp = Viewport::default();
    vp.take_events();
    vp.translate(2.0, -3.0);
    vp.center_at(0.0, 0.0);
    let events = vp.take_events();
    assert_eq!(events.len(), 2);
    for event in events {
        match event {
            ViewEvent::VisibleRectChanged(r) => assert!(in_bounds(r)),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(vp.visible_rect().center(), Point::new(0.0, 0.0));
}
