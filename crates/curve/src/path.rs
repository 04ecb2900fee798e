//! Control-point sequences for piecewise cubic Bezier paths.
//!
//! A path is an ordered sequence of control points in which cubic segments
//! share their joining terminal point, so a path with `k` segments always
//! holds `1 + 3k` points. The first and last points are terminal; the two
//! handles adjacent to the path endpoints are outer anchors, every other
//! handle is an inner anchor.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Errors raised by structurally illegal path operations.
///
/// These indicate caller bugs and are surfaced immediately rather than
/// silently clamped.
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    #[error("{0} control points do not form a chain of cubic segments")]
    InvalidTopology(usize),
    #[error("index {0} is out of range or not valid for this operation")]
    InvalidIndex(usize),
}

/// Topological role of a control point within the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ControlRole {
    /// A segment endpoint, shared between adjacent segments.
    Terminal = 0,
    /// End-tangent anchor adjacent to a path endpoint.
    Outer = 1,
    /// Tangent anchor interior to the path.
    Inner = 2,
}

impl ControlRole {
    /// The role the point at `index` holds in a canonical sequence of
    /// `len` points.
    pub fn canonical(index: usize, len: usize) -> Self {
        if index % 3 == 0 {
            ControlRole::Terminal
        } else if index == 1 || index + 2 == len {
            ControlRole::Outer
        } else {
            ControlRole::Inner
        }
    }
}

/// A single control point: position plus topological role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Vec3,
    pub role: ControlRole,
}

impl ControlPoint {
    pub fn new(position: Vec3, role: ControlRole) -> Self {
        Self { position, role }
    }
}

/// An editable piecewise cubic Bezier path.
///
/// The sequence is owned exclusively by this struct; mutation happens only
/// through the editing operations below, each of which re-establishes the
/// `len == 1 + 3 * segment_count` invariant before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    points: Vec<ControlPoint>,
}

impl CurvePath {
    /// Build a one-segment path from two terminals, with handles placed at
    /// the third points of the chord.
    pub fn single_segment(start: Vec3, end: Vec3) -> Self {
        let points = vec![
            ControlPoint::new(start, ControlRole::Terminal),
            ControlPoint::new(start.lerp(end, 1.0 / 3.0), ControlRole::Outer),
            ControlPoint::new(start.lerp(end, 2.0 / 3.0), ControlRole::Outer),
            ControlPoint::new(end, ControlRole::Terminal),
        ];
        Self { points }
    }

    /// Build a path from raw positions, assigning canonical roles.
    pub fn from_positions(positions: &[Vec3]) -> Result<Self, CurveError> {
        check_sequence_length(positions.len())?;
        let len = positions.len();
        let points = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| ControlPoint::new(p, ControlRole::canonical(i, len)))
            .collect();
        Ok(Self { points })
    }

    /// Build a path from an already-canonical control-point sequence.
    pub fn from_control_points(points: Vec<ControlPoint>) -> Result<Self, CurveError> {
        let mut path = Self { points: Vec::new() };
        path.set_path(points)?;
        Ok(path)
    }

    /// Replace the sequence wholesale.
    ///
    /// Fails with [`CurveError::InvalidTopology`] if the point count is not
    /// `1 + 3k` or the roles do not follow the canonical pattern.
    pub fn set_path(&mut self, points: Vec<ControlPoint>) -> Result<(), CurveError> {
        check_sequence_length(points.len())?;
        let len = points.len();
        for (i, p) in points.iter().enumerate() {
            if p.role != ControlRole::canonical(i, len) {
                return Err(CurveError::InvalidTopology(len));
            }
        }
        self.points = points;
        Ok(())
    }

    /// The canonical control-point sequence.
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        (self.points.len().max(1) - 1) / 3
    }

    /// Role of the point at `index`.
    pub fn role(&self, index: usize) -> Option<ControlRole> {
        self.points.get(index).map(|p| p.role)
    }

    /// Whether `index` names the first or last point of the path.
    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || index + 1 == self.points.len()
    }

    /// Evaluate the piecewise curve at `t` in `[0, 1]`.
    ///
    /// `t` maps linearly onto the segment index, with the remainder as the
    /// local Bezier parameter. Out-of-range `t` clamps to the path ends.
    pub fn point_at(&self, t: f32) -> Vec3 {
        let segments = self.segment_count();
        if segments == 0 {
            return self.points[0].position;
        }
        let scaled = t.clamp(0.0, 1.0) * segments as f32;
        let segment = (scaled as usize).min(segments - 1);
        let local = scaled - segment as f32;
        let p = &self.points[3 * segment..3 * segment + 4];
        cubic_bezier(
            local,
            p[0].position,
            p[1].position,
            p[2].position,
            p[3].position,
        )
    }

    /// Index of the nearest control point within `tolerance` of `pos`, under
    /// the caller-supplied screen projection, or `None`. Ties break to the
    /// smallest index.
    pub fn hit_test<F>(&self, pos: Vec2, tolerance: f32, project: F) -> Option<usize>
    where
        F: Fn(Vec3) -> Vec2,
    {
        let mut best: Option<(f32, usize)> = None;
        for (i, p) in self.points.iter().enumerate() {
            let d = project(p.position).distance(pos);
            if d <= tolerance && best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, i));
            }
        }
        best.map(|(_, i)| i)
    }

    /// Split the path after the terminal at `after_index`, inserting a new
    /// terminal at `position` together with the two handles of the segment
    /// it creates. Returns the index of the new terminal.
    ///
    /// Fails with [`CurveError::InvalidIndex`] if `after_index` is not a
    /// terminal or is the last terminal; appending past the end is not an
    /// insertion.
    pub fn insert_segment(&mut self, after_index: usize, position: Vec3) -> Result<usize, CurveError> {
        if after_index % 3 != 0 || after_index + 1 >= self.points.len() {
            return Err(CurveError::InvalidIndex(after_index));
        }
        let anchor = self.points[after_index].position;
        // Roles are reassigned below once the sequence has its final shape.
        let inserted = [
            ControlPoint::new(anchor.lerp(position, 1.0 / 3.0), ControlRole::Inner),
            ControlPoint::new(anchor.lerp(position, 2.0 / 3.0), ControlRole::Inner),
            ControlPoint::new(position, ControlRole::Terminal),
        ];
        self.points
            .splice(after_index + 1..after_index + 1, inserted);
        self.reassign_roles();
        Ok(after_index + 3)
    }

    /// Remove the segment ending at the interior terminal `terminal_index`,
    /// deleting the terminal and the two handles before it and re-joining
    /// the neighbors.
    ///
    /// Fails with [`CurveError::InvalidIndex`] for endpoint terminals (the
    /// path ends cannot be removed), non-terminal indices, and out-of-range
    /// indices.
    pub fn remove_segment(&mut self, terminal_index: usize) -> Result<(), CurveError> {
        if terminal_index % 3 != 0
            || terminal_index == 0
            || terminal_index + 1 >= self.points.len()
        {
            return Err(CurveError::InvalidIndex(terminal_index));
        }
        self.points.drain(terminal_index - 2..=terminal_index);
        self.reassign_roles();
        Ok(())
    }

    /// Reposition a single control point. Terminal moves do not drag the
    /// adjacent handles; no smoothness is enforced.
    pub fn move_control_point(&mut self, index: usize, position: Vec3) -> Result<(), CurveError> {
        let len = self.points.len();
        let point = self
            .points
            .get_mut(index)
            .ok_or(CurveError::InvalidIndex(index))?;
        point.position = position;
        debug_assert_eq!(point.role, ControlRole::canonical(index, len));
        Ok(())
    }

    /// Re-parameterize a path endpoint along the response axis only, for
    /// curves standing in for a 1D response function. All other terminals
    /// are unaffected.
    pub fn move_terminal_endpoint(&mut self, is_start: bool, parameter: f32) {
        let index = if is_start { 0 } else { self.points.len() - 1 };
        self.points[index].position.y = parameter;
    }

    fn reassign_roles(&mut self) {
        let len = self.points.len();
        for (i, p) in self.points.iter_mut().enumerate() {
            p.role = ControlRole::canonical(i, len);
        }
        debug_assert!(check_sequence_length(len).is_ok());
    }
}

fn check_sequence_length(len: usize) -> Result<(), CurveError> {
    if len == 0 || (len - 1) % 3 != 0 {
        return Err(CurveError::InvalidTopology(len));
    }
    Ok(())
}

/// Cubic Bernstein evaluation.
fn cubic_bezier(t: f32, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn ramp() -> CurvePath {
        CurvePath::single_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn test_single_segment_topology() {
        let path = ramp();
        assert_eq!(path.len(), 4);
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.role(0), Some(ControlRole::Terminal));
        assert_eq!(path.role(1), Some(ControlRole::Outer));
        assert_eq!(path.role(2), Some(ControlRole::Outer));
        assert_eq!(path.role(3), Some(ControlRole::Terminal));
    }

    #[test]
    fn test_set_path_round_trip() {
        let mut path = ramp();
        let canonical = path.points().to_vec();
        path.set_path(canonical.clone()).unwrap();
        assert_eq!(path.points(), canonical.as_slice());
    }

    #[test]
    fn test_set_path_rejects_bad_length() {
        let mut path = ramp();
        let mut points = path.points().to_vec();
        points.pop();
        assert!(matches!(
            path.set_path(points),
            Err(CurveError::InvalidTopology(3))
        ));
    }

    #[test]
    fn test_set_path_rejects_bad_roles() {
        let mut path = ramp();
        let mut points = path.points().to_vec();
        points[0].role = ControlRole::Inner;
        assert!(matches!(
            path.set_path(points),
            Err(CurveError::InvalidTopology(4))
        ));
    }

    #[test]
    fn test_insert_segment_grows_by_one_segment() {
        let mut path = ramp();
        let mid = Vec3::new(0.5, 0.5, 0.0);
        let terminal = path.insert_segment(0, mid).unwrap();
        assert_eq!(terminal, 3);
        assert_eq!(path.len(), 7);
        assert_eq!(path.segment_count(), 2);
        assert_eq!(path.points()[3].position, mid);
        // Interior handles demoted from outer to inner by the split.
        assert_eq!(path.role(2), Some(ControlRole::Inner));
        assert_eq!(path.role(4), Some(ControlRole::Inner));
        assert_eq!(path.role(5), Some(ControlRole::Outer));
    }

    #[test]
    fn test_insert_then_remove_restores_sequence() {
        let mut path = ramp();
        let before = path.points().to_vec();
        let terminal = path
            .insert_segment(0, Vec3::new(0.4, 0.6, 0.0))
            .unwrap();
        path.remove_segment(terminal).unwrap();
        assert_eq!(path.points(), before.as_slice());
    }

    #[test]
    fn test_insert_rejects_last_terminal_and_handles() {
        let mut path = ramp();
        assert!(matches!(
            path.insert_segment(3, Vec3::ZERO),
            Err(CurveError::InvalidIndex(3))
        ));
        assert!(matches!(
            path.insert_segment(1, Vec3::ZERO),
            Err(CurveError::InvalidIndex(1))
        ));
    }

    #[test]
    fn test_remove_rejects_endpoints_and_out_of_range() {
        let mut path = ramp();
        path.insert_segment(0, Vec3::new(0.5, 0.5, 0.0)).unwrap();
        assert!(matches!(
            path.remove_segment(0),
            Err(CurveError::InvalidIndex(0))
        ));
        assert!(matches!(
            path.remove_segment(6),
            Err(CurveError::InvalidIndex(6))
        ));
        assert!(matches!(
            path.remove_segment(9),
            Err(CurveError::InvalidIndex(9))
        ));
    }

    #[test]
    fn test_invariant_holds_after_every_edit() {
        let mut path = ramp();
        for step in 0..4 {
            let t = path.insert_segment(0, Vec3::new(0.1 * step as f32, 0.5, 0.0));
            let t = t.unwrap();
            assert_eq!(path.len(), 1 + 3 * path.segment_count());
            assert_eq!(path.role(t), Some(ControlRole::Terminal));
        }
        while path.segment_count() > 1 {
            path.remove_segment(3).unwrap();
            assert_eq!(path.len(), 1 + 3 * path.segment_count());
        }
    }

    #[test]
    fn test_point_at_clamps_and_interpolates() {
        let path = ramp();
        let start = path.points()[0].position;
        let end = path.points()[3].position;
        assert!(path.point_at(-1.0).distance(start) < EPSILON);
        assert!(path.point_at(0.0).distance(start) < EPSILON);
        assert!(path.point_at(1.0).distance(end) < EPSILON);
        assert!(path.point_at(2.0).distance(end) < EPSILON);
        // Straight-chord handles keep the midpoint on the chord.
        let mid = path.point_at(0.5);
        assert!(mid.distance(start.lerp(end, 0.5)) < EPSILON);
    }

    #[test]
    fn test_point_at_maps_t_linearly_onto_segments() {
        let mut path = ramp();
        let mid = Vec3::new(0.5, 0.5, 0.0);
        path.insert_segment(0, mid).unwrap();
        // t = 0.5 is the shared terminal between the two segments.
        assert!(path.point_at(0.5).distance(mid) < EPSILON);
    }

    #[test]
    fn test_hit_test_tolerance_and_tie_break() {
        let path = ramp();
        let project = |p: Vec3| Vec2::new(p.x, p.y);
        let hit = path.hit_test(Vec2::new(0.0, 1.0), 0.05, project);
        assert_eq!(hit, Some(0));
        assert_eq!(path.hit_test(Vec2::new(5.0, 5.0), 0.05, project), None);

        // Two coincident points: the smaller index wins.
        let mut stacked = ramp();
        let p0 = stacked.points()[0].position;
        stacked.move_control_point(1, p0).unwrap();
        assert_eq!(stacked.hit_test(Vec2::new(p0.x, p0.y), 0.05, project), Some(0));
    }

    #[test]
    fn test_terminal_move_leaves_handles_alone() {
        let mut path = ramp();
        let handles = [path.points()[1].position, path.points()[2].position];
        path.move_control_point(0, Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(path.points()[1].position, handles[0]);
        assert_eq!(path.points()[2].position, handles[1]);
    }

    #[test]
    fn test_move_terminal_endpoint_is_single_axis() {
        let mut path = ramp();
        let before = path.points()[0].position;
        path.move_terminal_endpoint(true, 0.25);
        let after = path.points()[0].position;
        assert_eq!(after.x, before.x);
        assert_eq!(after.z, before.z);
        assert_eq!(after.y, 0.25);

        let last = path.len() - 1;
        path.move_terminal_endpoint(false, 0.75);
        assert_eq!(path.points()[last].position.y, 0.75);
        // Interior terminals untouched by endpoint drags.
        let mut long = ramp();
        long.insert_segment(0, Vec3::new(0.5, 0.5, 0.0)).unwrap();
        let interior = long.points()[3].position;
        long.move_terminal_endpoint(false, 0.1);
        assert_eq!(long.points()[3].position, interior);
    }
}
