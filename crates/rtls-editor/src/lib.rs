pub mod input;
pub mod shortcuts;
pub mod tools;
pub mod view;

pub use input::{Buttons, ContextMenuReason, InputEvent, Modifiers};
pub use shortcuts::{ShortcutMap, ViewAction};
pub use tools::{CursorShape, Tool, ToolContext, ToolKind, create_tool};
pub use view::{GraphicsView, MouseContext, ToolHandle};
