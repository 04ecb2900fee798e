//! Toolkit-agnostic input events.
//!
//! The windowing toolkit owns the real event types; it forwards the fields
//! the editor cares about through these structs, fed synchronously into the
//! controller.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Modifier-key state, either carried on a pointer event or tracked from
/// key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Union of two modifier states.
    pub fn or(self, other: Self) -> Self {
        Self {
            ctrl: self.ctrl || other.ctrl,
            shift: self.shift || other.shift,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Control,
    Shift,
}

/// A pointer press or double-click with its screen position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub position: Vec2,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerDown(PointerInput),
    PointerMove { position: Vec2 },
    PointerUp { button: PointerButton },
    DoubleClick(PointerInput),
    KeyDown(Key),
    KeyUp(Key),
}
