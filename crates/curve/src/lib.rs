//! Piecewise cubic Bezier path model for arbor.
//!
//! This crate provides the curve data the rest of the editor manipulates:
//! - [`path::CurvePath`] - an ordered control-point sequence with editing operations
//! - [`path::ControlPoint`] - a position plus its topological role in the sequence
//! - [`editor::CurveEditor`] - the drag/insert/remove gesture state machine
//!
//! Paths are chains of cubic segments sharing their joining terminal points.
//! Continuity across a shared terminal is deliberately not enforced; each
//! segment is independently controlled.

pub mod editor;
pub mod path;

pub use editor::{CurveConfig, CurveEditor, GestureOutcome, GestureState};
pub use path::{ControlPoint, ControlRole, CurveError, CurvePath};
