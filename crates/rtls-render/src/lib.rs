pub mod background;
pub mod items;
pub mod painter;
pub mod vello_painter;

pub use background::{draw_floorplan, draw_grid, draw_origin, paint_background};
pub use items::{paint_geofence, paint_items};
pub use painter::{DisplayList, DrawCmd, LineStyle, Painter};
pub use vello_painter::{DeviceLabel, VelloPainter};

// Re-export the color type so tools can pick stroke colors without a direct dependency
pub use peniko::Color;
