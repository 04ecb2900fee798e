//! Interaction layer of the arbor editor.
//!
//! Ties the curve model, picking engine, and buffer reconciliation to an
//! external tree generator:
//! - [`input`] - toolkit-agnostic pointer/keyboard events
//! - [`camera::OrbitCamera`] - orbit/pan/zoom camera and screen-ray
//!   unprojection
//! - [`scene::Scene`] - the entity list and authoritative selection value
//! - [`controller::InteractionController`] - gesture routing, branch
//!   selection, and parameter plumbing
//! - [`curve_panel::CurvePanel`] - the radius-response curve editing surface
//! - [`notify`] - the two outward-facing notifications and redraw requests
//!
//! Everything here is single-threaded and event-driven: each input event is
//! processed to completion, including any synchronous remesh it triggers,
//! before the next one is looked at.

pub mod camera;
pub mod controller;
pub mod curve_panel;
pub mod input;
pub mod notify;
pub mod scene;

pub use camera::{CameraAction, OrbitCamera};
pub use controller::{EditorError, InteractionController};
pub use curve_panel::CurvePanel;
pub use input::{InputEvent, Key, Modifiers, PointerButton, PointerInput};
pub use notify::{Notification, NotificationQueue};
pub use scene::{Scene, Selection};
