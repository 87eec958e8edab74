//! Input abstraction layer.
//!
//! Normalizes the host toolkit's pointer, wheel, keyboard and resize events
//! into a unified `InputEvent` enum consumed by the view. Pointer positions
//! are widget pixels with the origin at the top-left corner.

use serde::{Deserialize, Serialize};

pub use rtls_core::PointerButton;

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Buttons held down during a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Buttons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl Buttons {
    pub const NONE: Self = Self {
        left: false,
        right: false,
        middle: false,
    };
}

/// Why the host wants to open a context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextMenuReason {
    Mouse,
    Keyboard,
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },

    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        buttons: Buttons,
        #[serde(default)]
        modifiers: Modifiers,
    },

    PointerUp {
        x: f64,
        y: f64,
        button: PointerButton,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Wheel rotation in eighths of a degree; one notch is 120.
    Wheel { x: f64, y: f64, delta: f64 },

    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },

    /// Widget resized to `width` x `height` pixels.
    Resize { width: f64, height: f64 },

    ContextMenu { reason: ContextMenuReason },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scripted_events_parse_with_defaults() {
        let json = r#"[
            {"type": "pointer_down", "x": 10, "y": 20, "button": "left", "modifiers": {"ctrl": true}},
            {"type": "pointer_move", "x": 15, "y": 25, "buttons": {"left": true}},
            {"type": "wheel", "x": 0, "y": 0, "delta": -120},
            {"type": "key", "key": "Escape"}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(
            events[0],
            InputEvent::PointerDown {
                x: 10.0,
                y: 20.0,
                button: PointerButton::Left,
                modifiers: Modifiers::CTRL,
            }
        );
        assert_eq!(
            events[1],
            InputEvent::PointerMove {
                x: 15.0,
                y: 25.0,
                buttons: Buttons {
                    left: true,
                    ..Buttons::NONE
                },
                modifiers: Modifiers::NONE,
            }
        );
        assert_eq!(
            events[2],
            InputEvent::Wheel {
                x: 0.0,
                y: 0.0,
                delta: -120.0
            }
        );
        assert_eq!(
            events[3],
            InputEvent::Key {
                key: "Escape".to_string(),
                modifiers: Modifiers::NONE,
            }
        );
    }

    #[test]
    fn command_is_ctrl_or_meta() {
        assert!(Modifiers::CTRL.command());
        assert!(
            Modifiers {
                meta: true,
                ..Modifiers::NONE
            }
            .command()
        );
        assert!(!Modifiers::NONE.command());
    }
}
