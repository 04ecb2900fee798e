//! Drag-gesture state machine for direct curve manipulation.
//!
//! The editor is fed press/move/release/double-click events already mapped
//! into the curve's screen projection and mutates a [`CurvePath`] in place:
//! - press near a control point grabs it for dragging
//! - press near the curve itself inserts a point there and drags it
//! - press far from everything is a no-op
//! - double-click on an interior terminal removes its segment
//!
//! Path endpoints are special-cased while dragging: they re-parameterize
//! along the response axis only.

use glam::{Vec2, Vec3};
use tracing::debug;

use crate::path::{ControlRole, CurvePath};

/// Gesture tolerances, in the projected space the editor operates in.
#[derive(Debug, Clone)]
pub struct CurveConfig {
    /// Pick radius around a control point (default: 0.025).
    pub point_tolerance: f32,
    /// Pick distance from the sampled curve for implicit insertion
    /// (default: 0.02).
    pub curve_tolerance: f32,
    /// Samples taken along the curve when scanning for insertion hits
    /// (default: 64).
    pub curve_samples: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            point_tolerance: 0.025,
            curve_tolerance: 0.02,
            curve_samples: 64,
        }
    }
}

/// Where the gesture machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// A pointer press grabbed the control point at this index; moves
    /// reposition it until release.
    Dragging { point: usize },
}

/// What an event did to the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The event hit nothing; the path is unchanged.
    Ignored,
    /// An existing control point was grabbed for dragging.
    PointGrabbed(usize),
    /// A point was inserted on the curve and grabbed for dragging.
    PointInserted(usize),
    /// The dragged point moved.
    PointMoved(usize),
    /// An interior terminal and its segment were removed.
    PointRemoved(usize),
    /// An active drag ended.
    DragFinished,
}

/// The curve editing state machine: Idle -> Dragging(point) -> Idle.
#[derive(Debug, Default)]
pub struct CurveEditor {
    state: GestureState,
    config: CurveConfig,
}

impl CurveEditor {
    pub fn new(config: CurveConfig) -> Self {
        Self {
            state: GestureState::Idle,
            config,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Pointer press at `pos`: grab a control point, or insert one on the
    /// curve and grab it, or do nothing.
    pub fn on_press<P, U>(
        &mut self,
        path: &mut CurvePath,
        pos: Vec2,
        project: P,
        unproject: U,
    ) -> GestureOutcome
    where
        P: Fn(Vec3) -> Vec2,
        U: Fn(Vec2) -> Vec3,
    {
        if let Some(point) = path.hit_test(pos, self.config.point_tolerance, &project) {
            debug!(point, "grabbed control point");
            self.state = GestureState::Dragging { point };
            return GestureOutcome::PointGrabbed(point);
        }

        if let Some(t) = self.curve_hit(path, pos, &project) {
            let segments = path.segment_count();
            if segments == 0 {
                return GestureOutcome::Ignored;
            }
            let segment = ((t * segments as f32) as usize).min(segments - 1);
            let Ok(terminal) = path.insert_segment(3 * segment, unproject(pos)) else {
                return GestureOutcome::Ignored;
            };
            debug!(terminal, "inserted control point on curve");
            self.state = GestureState::Dragging { point: terminal };
            return GestureOutcome::PointInserted(terminal);
        }

        GestureOutcome::Ignored
    }

    /// Pointer move: reposition the dragged point, if any. Endpoint
    /// terminals re-parameterize along the response axis only.
    pub fn on_move<U>(&mut self, path: &mut CurvePath, pos: Vec2, unproject: U) -> GestureOutcome
    where
        U: Fn(Vec2) -> Vec3,
    {
        let GestureState::Dragging { point } = self.state else {
            return GestureOutcome::Ignored;
        };
        let target = unproject(pos);
        if path.is_endpoint(point) {
            path.move_terminal_endpoint(point == 0, target.y);
        } else if path.move_control_point(point, target).is_err() {
            // The path shrank under us; drop the stale drag.
            self.state = GestureState::Idle;
            return GestureOutcome::Ignored;
        }
        GestureOutcome::PointMoved(point)
    }

    /// Pointer release: end an active drag.
    pub fn on_release(&mut self) -> GestureOutcome {
        if self.is_dragging() {
            self.state = GestureState::Idle;
            GestureOutcome::DragFinished
        } else {
            GestureOutcome::Ignored
        }
    }

    /// Double-click: remove the segment joined at an interior terminal.
    pub fn on_double_click<P>(
        &mut self,
        path: &mut CurvePath,
        pos: Vec2,
        project: P,
    ) -> GestureOutcome
    where
        P: Fn(Vec3) -> Vec2,
    {
        self.state = GestureState::Idle;
        let Some(point) = path.hit_test(pos, self.config.point_tolerance, &project) else {
            return GestureOutcome::Ignored;
        };
        if path.role(point) != Some(ControlRole::Terminal) || path.is_endpoint(point) {
            return GestureOutcome::Ignored;
        }
        if path.remove_segment(point).is_err() {
            return GestureOutcome::Ignored;
        }
        debug!(point, "removed interior terminal");
        GestureOutcome::PointRemoved(point)
    }

    /// Nearest sampled curve parameter within tolerance of `pos`.
    fn curve_hit<P>(&self, path: &CurvePath, pos: Vec2, project: P) -> Option<f32>
    where
        P: Fn(Vec3) -> Vec2,
    {
        let samples = self.config.curve_samples.max(2);
        let mut best: Option<(f32, f32)> = None;
        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let d = project(path.point_at(t)).distance(pos);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, t));
            }
        }
        best.and_then(|(d, t)| (d <= self.config.curve_tolerance).then_some(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(p: Vec3) -> Vec2 {
        Vec2::new(p.x, p.y)
    }

    fn unproject(p: Vec2) -> Vec3 {
        Vec3::new(p.x, p.y, 0.0)
    }

    fn ramp() -> CurvePath {
        CurvePath::single_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn test_press_drag_release_moves_point() {
        let mut path = ramp();
        let mut editor = CurveEditor::default();

        let grab = editor.on_press(&mut path, Vec2::new(1.0 / 3.0, 2.0 / 3.0), project, unproject);
        assert_eq!(grab, GestureOutcome::PointGrabbed(1));
        assert!(editor.is_dragging());

        let target = Vec2::new(0.2, 0.9);
        assert_eq!(
            editor.on_move(&mut path, target, unproject),
            GestureOutcome::PointMoved(1)
        );
        assert_eq!(path.points()[1].position, Vec3::new(0.2, 0.9, 0.0));

        assert_eq!(editor.on_release(), GestureOutcome::DragFinished);
        assert_eq!(editor.state(), GestureState::Idle);
    }

    #[test]
    fn test_press_on_curve_inserts_and_drags() {
        let mut path = ramp();
        let mut editor = CurveEditor::default();

        // The straight-chord ramp passes through (0.5, 0.5).
        let outcome = editor.on_press(&mut path, Vec2::new(0.5, 0.5), project, unproject);
        assert_eq!(outcome, GestureOutcome::PointInserted(3));
        assert_eq!(path.len(), 7);
        assert_eq!(path.segment_count(), 2);
        assert!(editor.is_dragging());

        editor.on_move(&mut path, Vec2::new(0.5, 0.8), unproject);
        assert_eq!(path.points()[3].position, Vec3::new(0.5, 0.8, 0.0));
    }

    #[test]
    fn test_press_far_from_curve_is_a_no_op() {
        let mut path = ramp();
        let before = path.points().to_vec();
        let mut editor = CurveEditor::default();

        let outcome = editor.on_press(&mut path, Vec2::new(0.9, 0.9), project, unproject);
        assert_eq!(outcome, GestureOutcome::Ignored);
        assert_eq!(editor.state(), GestureState::Idle);
        assert_eq!(path.points(), before.as_slice());
        assert_eq!(editor.on_release(), GestureOutcome::Ignored);
    }

    #[test]
    fn test_double_click_removes_interior_terminal() {
        let mut path = ramp();
        let mut editor = CurveEditor::default();
        editor.on_press(&mut path, Vec2::new(0.5, 0.5), project, unproject);
        editor.on_release();
        assert_eq!(path.segment_count(), 2);

        let outcome = editor.on_double_click(&mut path, Vec2::new(0.5, 0.5), project);
        assert_eq!(outcome, GestureOutcome::PointRemoved(3));
        assert_eq!(path.segment_count(), 1);
        assert_eq!(editor.state(), GestureState::Idle);
    }

    #[test]
    fn test_double_click_spares_endpoints_and_handles() {
        let mut path = ramp();
        let mut editor = CurveEditor::default();
        assert_eq!(
            editor.on_double_click(&mut path, Vec2::new(0.0, 1.0), project),
            GestureOutcome::Ignored
        );
        assert_eq!(
            editor.on_double_click(&mut path, Vec2::new(1.0 / 3.0, 2.0 / 3.0), project),
            GestureOutcome::Ignored
        );
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_endpoint_drag_is_single_axis() {
        let mut path = ramp();
        let mut editor = CurveEditor::default();
        editor.on_press(&mut path, Vec2::new(0.0, 1.0), project, unproject);
        editor.on_move(&mut path, Vec2::new(0.4, 0.3), unproject);
        // x stays pinned; only the response value follows the pointer.
        assert_eq!(path.points()[0].position.x, 0.0);
        assert_eq!(path.points()[0].position.y, 0.3);
    }
}
