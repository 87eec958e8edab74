pub mod id;
pub mod scene;
pub mod settings;
pub mod tracking;
pub mod viewport;

pub use id::ItemId;
pub use scene::{ItemKind, ItemScene, PointerButton, Scene, SceneItem};
pub use settings::{FloorplanImage, GeofenceZone, SettingsChange, ViewSettings};
pub use tracking::TagTrack;
pub use viewport::{ViewEvent, Viewport};

// Re-export kurbo geometry so downstream crates agree on one version
pub use kurbo::{Affine, Point, Rect, Size, Vec2};
