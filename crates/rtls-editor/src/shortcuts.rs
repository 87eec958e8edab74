//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ViewAction`s. `key` values follow
//! `KeyboardEvent.key` naming (`"Escape"`, `"+"`, `"a"`).

/// Actions that keyboard shortcuts can trigger on the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    // ── Tool switching ──
    ToolPan,
    ToolZoom,
    ToolRubberBand,
    /// Cancel the attached tool.
    CancelTool,

    // ── View ──
    ZoomIn,
    ZoomOut,
    CenterOnAnchors,
    ResetRotation,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action, or `None` if the combo is unbound.
    ///
    /// Command-modified keys are left to the host (copy, quit, ...) except
    /// zoom, which also answers to ⌘+/⌘-.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ViewAction> {
        let cmd = ctrl || meta;

        if key == "Escape" {
            return Some(ViewAction::CancelTool);
        }

        match key {
            "=" | "+" => return Some(ViewAction::ZoomIn),
            "-" => return Some(ViewAction::ZoomOut),
            _ => {}
        }

        if cmd || alt {
            return None;
        }

        match key {
            "a" | "A" => Some(ViewAction::CenterOnAnchors),
            "r" | "R" => Some(ViewAction::ResetRotation),
            "p" | "P" => Some(ViewAction::ToolPan),
            "z" | "Z" => Some(ViewAction::ToolZoom),
            "b" | "B" => Some(ViewAction::ToolRubberBand),
            _ => None,
        }
    }
}
