//! Display settings: grid, origin marker, floorplan image and geofence zones.
//!
//! Setters only queue a [`SettingsChange`] when the value actually differs,
//! and geometry of a hidden layer (grid spacing while the grid is off,
//! floorplan image while the floorplan is off, zone radii outside geofencing
//! mode) never queues one.

use kurbo::Affine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which background layer needs repainting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsChange {
    Grid,
    Origin,
    Floorplan,
    Geofence,
}

/// Largest accepted geofence radius in logical units.
pub const MAX_ZONE_RADIUS: f64 = 1000.0;

/// One geofence ring, drawn around the anchors' centre of gravity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeofenceZone {
    pub radius: f64,
    /// Drawn in the alarm colour.
    pub alarm: bool,
}

/// An RGBA8 floorplan bitmap, shared cheaply between settings and painters.
#[derive(Debug, Clone)]
pub struct FloorplanImage {
    width: u32,
    height: u32,
    rgba: Arc<Vec<u8>>,
}

impl FloorplanImage {
    /// Wrap a tightly packed RGBA8 buffer of `width * height` pixels.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, String> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 {
            return Err(format!("floorplan image is empty ({width}x{height})"));
        }
        if rgba.len() != expected {
            return Err(format!(
                "floorplan buffer holds {} bytes, {width}x{height} RGBA needs {expected}",
                rgba.len()
            ));
        }
        Ok(Self {
            width,
            height,
            rgba: Arc::new(rgba),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &Arc<Vec<u8>> {
        &self.rgba
    }
}

impl PartialEq for FloorplanImage {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && (Arc::ptr_eq(&self.rgba, &other.rgba) || self.rgba == other.rgba)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    show_grid: bool,
    show_origin: bool,
    show_floorplan: bool,
    grid_width: f64,
    grid_height: f64,
    floorplan_path: Option<String>,
    geofence_mode: bool,
    zones: [GeofenceZone; 2],
    #[serde(skip)]
    floorplan: Option<FloorplanImage>,
    /// Maps floorplan pixels into logical units.
    #[serde(skip)]
    floorplan_transform: Affine,
    #[serde(skip)]
    changes: Vec<SettingsChange>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_origin: true,
            show_floorplan: false,
            grid_width: 1.0,
            grid_height: 1.0,
            floorplan_path: None,
            geofence_mode: false,
            zones: [GeofenceZone::default(); 2],
            floorplan: None,
            floorplan_transform: Affine::IDENTITY,
            changes: Vec::new(),
        }
    }
}

impl ViewSettings {
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn show_origin(&self) -> bool {
        self.show_origin
    }

    pub fn show_floorplan(&self) -> bool {
        self.show_floorplan
    }

    pub fn grid_width(&self) -> f64 {
        self.grid_width
    }

    pub fn grid_height(&self) -> f64 {
        self.grid_height
    }

    pub fn floorplan(&self) -> Option<&FloorplanImage> {
        self.floorplan.as_ref()
    }

    pub fn floorplan_transform(&self) -> Affine {
        self.floorplan_transform
    }

    pub fn floorplan_path(&self) -> Option<&str> {
        self.floorplan_path.as_deref()
    }

    pub fn geofence_mode(&self) -> bool {
        self.geofence_mode
    }

    /// Zone 1 or 2.
    pub fn zone(&self, zone: usize) -> Option<GeofenceZone> {
        zone.checked_sub(1).and_then(|i| self.zones.get(i)).copied()
    }

    pub fn zones(&self) -> &[GeofenceZone] {
        &self.zones
    }

    pub fn set_show_grid(&mut self, show: bool) {
        if self.show_grid != show {
            self.show_grid = show;
            self.changes.push(SettingsChange::Grid);
        }
    }

    pub fn set_show_origin(&mut self, show: bool) {
        if self.show_origin != show {
            self.show_origin = show;
            self.changes.push(SettingsChange::Origin);
        }
    }

    pub fn set_show_floorplan(&mut self, show: bool) {
        if self.show_floorplan != show {
            self.show_floorplan = show;
            self.changes.push(SettingsChange::Floorplan);
        }
    }

    pub fn set_grid_width(&mut self, width: f64) {
        if self.grid_width != width {
            self.grid_width = width;
            self.grid_changed();
        }
    }

    pub fn set_grid_height(&mut self, height: f64) {
        if self.grid_height != height {
            self.grid_height = height;
            self.grid_changed();
        }
    }

    /// Replace (or clear, with `None`) the floorplan bitmap.
    pub fn set_floorplan(&mut self, image: Option<FloorplanImage>) {
        if self.floorplan != image {
            self.floorplan = image;
            self.floorplan_changed();
        }
    }

    pub fn set_floorplan_transform(&mut self, transform: Affine) {
        if self.floorplan_transform != transform {
            self.floorplan_transform = transform;
            self.floorplan_changed();
        }
    }

    pub fn set_geofence_mode(&mut self, on: bool) {
        if self.geofence_mode != on {
            self.geofence_mode = on;
            self.changes.push(SettingsChange::Geofence);
        }
    }

    /// Configure zone 1 or 2. The radius is clamped to
    /// `[0, MAX_ZONE_RADIUS]`.
    pub fn set_zone(&mut self, zone: usize, radius: f64, alarm: bool) -> Result<(), String> {
        if radius.is_nan() {
            return Err(format!("zone {zone} radius is not a number"));
        }
        let slot = zone
            .checked_sub(1)
            .and_then(|i| self.zones.get_mut(i))
            .ok_or_else(|| format!("no geofence zone {zone}, expected 1 or 2"))?;
        let next = GeofenceZone {
            radius: radius.clamp(0.0, MAX_ZONE_RADIUS),
            alarm,
        };
        if *slot != next {
            *slot = next;
            if self.geofence_mode {
                self.changes.push(SettingsChange::Geofence);
            }
        }
        Ok(())
    }

    /// Remember where the floorplan was loaded from, for persistence.
    pub fn set_floorplan_path(&mut self, path: Option<String>) {
        self.floorplan_path = path;
    }

    /// Copy the persisted fields of `other` through the setters, so only
    /// real differences are reported.
    pub fn apply(&mut self, other: &ViewSettings) {
        self.set_show_grid(other.show_grid);
        self.set_show_origin(other.show_origin);
        self.set_show_floorplan(other.show_floorplan);
        self.set_grid_width(other.grid_width);
        self.set_grid_height(other.grid_height);
        self.set_floorplan_path(other.floorplan_path.clone());
        self.set_geofence_mode(other.geofence_mode);
        for (i, zone) in other.zones.iter().enumerate() {
            if let Err(e) = self.set_zone(i + 1, zone.radius, zone.alarm) {
                log::warn!("{e}");
            }
        }
    }

    /// Drain queued change notifications.
    pub fn take_changes(&mut self) -> Vec<SettingsChange> {
        std::mem::take(&mut self.changes)
    }

    fn grid_changed(&mut self) {
        if self.show_grid {
            self.changes.push(SettingsChange::Grid);
        }
    }

    fn floorplan_changed(&mut self) {
        if self.show_floorplan {
            self.changes.push(SettingsChange::Floorplan);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_dashboard() {
        let s = ViewSettings::default();
        assert!(s.show_grid());
        assert!(s.show_origin());
        assert!(!s.show_floorplan());
        assert_eq!((s.grid_width(), s.grid_height()), (1.0, 1.0));
        assert_eq!(s.floorplan_transform(), Affine::IDENTITY);
    }

    #[test]
    fn unchanged_values_do_not_notify() {
        let mut s = ViewSettings::default();
        s.set_show_grid(true);
        s.set_show_origin(true);
        s.set_show_floorplan(false);
        s.set_grid_width(1.0);
        assert!(s.take_changes().is_empty());
    }

    #[test]
    fn toggles_notify_once_each() {
        let mut s = ViewSettings::default();
        s.set_show_grid(false);
        s.set_show_origin(false);
        s.set_show_floorplan(true);
        assert_eq!(
            s.take_changes(),
            vec![
                SettingsChange::Grid,
                SettingsChange::Origin,
                SettingsChange::Floorplan
            ]
        );
        assert!(s.take_changes().is_empty());
    }

    #[test]
    fn hidden_layers_do_not_notify_geometry_changes() {
        let mut s = ViewSettings::default();
        s.set_show_grid(false);
        s.take_changes();

        s.set_grid_width(0.5);
        s.set_floorplan_transform(Affine::scale(0.01));
        assert!(s.take_changes().is_empty());
        assert_eq!(s.grid_width(), 0.5);

        s.set_show_floorplan(true);
        s.set_floorplan(Some(FloorplanImage::new(1, 1, vec![0; 4]).unwrap()));
        assert_eq!(
            s.take_changes(),
            vec![SettingsChange::Floorplan, SettingsChange::Floorplan]
        );
    }

    #[test]
    fn zones_notify_only_in_geofencing_mode() {
        let mut s = ViewSettings::default();
        s.set_zone(1, 2.5, false).unwrap();
        assert!(s.take_changes().is_empty());
        assert_eq!(
            s.zone(1),
            Some(GeofenceZone {
                radius: 2.5,
                alarm: false
            })
        );

        s.set_geofence_mode(true);
        s.set_zone(2, 5000.0, true).unwrap();
        s.set_zone(2, 5000.0, true).unwrap();
        assert_eq!(
            s.take_changes(),
            vec![SettingsChange::Geofence, SettingsChange::Geofence]
        );
        assert_eq!(s.zone(2).map(|z| z.radius), Some(MAX_ZONE_RADIUS));
        assert_eq!(s.zone(0), None);
        assert_eq!(s.zone(3), None);
    }

    #[test]
    fn bad_zones_are_rejected() {
        let mut s = ViewSettings::default();
        assert!(s.set_zone(3, 1.0, false).is_err());
        assert!(s.set_zone(0, 1.0, false).is_err());
        assert!(s.set_zone(1, f64::NAN, false).is_err());
        s.set_zone(1, -4.0, false).unwrap();
        assert_eq!(s.zone(1).map(|z| z.radius), Some(0.0));
    }

    #[test]
    fn floorplan_buffer_is_validated() {
        let err = FloorplanImage::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(err.contains("needs 16"), "{err}");
        assert!(FloorplanImage::new(0, 3, Vec::new()).is_err());
    }

    #[test]
    fn serde_keeps_flags_and_spacing() {
        let mut s = ViewSettings::default();
        s.set_grid_width(2.5);
        s.set_show_origin(false);
        s.set_floorplan_path(Some("floor1.png".to_string()));
        let json = serde_json::to_string(&s).unwrap();
        let back: ViewSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.grid_width(), 2.5);
        assert!(!back.show_origin());
        assert_eq!(back.floorplan_path(), Some("floor1.png"));
        assert!(back.floorplan().is_none());
    }

    #[test]
    fn partial_config_applies_only_differences() {
        let loaded: ViewSettings = serde_json::from_str(
            r#"{"show_grid": false, "geofence_mode": true, "zones": [{"radius": 3}, {}]}"#,
        )
        .unwrap();
        assert_eq!(loaded.grid_width(), 1.0);

        let mut s = ViewSettings::default();
        s.apply(&loaded);
        assert_eq!(
            s.take_changes(),
            vec![SettingsChange::Grid, SettingsChange::Geofence, SettingsChange::Geofence]
        );
        assert_eq!(s.zone(1).map(|z| z.radius), Some(3.0));
        s.apply(&loaded);
        assert!(s.take_changes().is_empty());
    }
}
