//! The radius-response curve editing surface.
//!
//! Owns one named [`CurvePath`] together with the gesture machine that edits
//! it, and keeps a small display entity current: background rulings, the
//! control polygon, and the sampled curve polyline, each in its own render
//! range. Every edit emits the canonical control-point sequence as a
//! [`Notification::CurveChanged`] for the host to forward to the generator.
//!
//! The panel maps pointer positions between its pixel rectangle and the
//! curve's unit square; the path itself never learns about pixels.

use glam::{Vec2, Vec3};

use curve::{ControlPoint, CurveConfig, CurveEditor, CurveError, CurvePath, GestureOutcome};
use geometry::{Entity, GeometryBuffer, RenderRange, Topology, Vertex};

use crate::notify::{Notification, NotificationQueue};

/// Number of polyline samples used to display the curve.
const CURVE_SAMPLES: usize = 64;
/// Rulings per axis in the background.
const RULINGS: usize = 10;

const BACKGROUND_COLOR: Vec3 = Vec3::new(0.3, 0.3, 0.3);
const HANDLE_COLOR: Vec3 = Vec3::new(0.6, 0.6, 0.6);
const CURVE_COLOR: Vec3 = Vec3::new(0.9, 0.9, 0.9);

/// A curve editing panel of fixed pixel size.
#[derive(Debug)]
pub struct CurvePanel {
    name: String,
    path: CurvePath,
    editor: CurveEditor,
    entity: Entity,
    size: Vec2,
    enabled: bool,
    notifications: NotificationQueue,
}

impl CurvePanel {
    /// A panel editing the default response ramp: full value at the start,
    /// zero at the end.
    pub fn new(name: impl Into<String>, size: Vec2) -> Self {
        let path = CurvePath::single_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let config = CurveConfig {
            // Pixel-space tolerances; the projection closures below map
            // curve space onto the panel rectangle.
            point_tolerance: 8.0,
            curve_tolerance: 6.0,
            curve_samples: CURVE_SAMPLES,
        };
        let mut panel = Self {
            name: name.into(),
            path,
            editor: CurveEditor::new(config),
            entity: Entity::new(GeometryBuffer::from_data(Vec::new(), Vec::new())),
            size,
            enabled: true,
            notifications: NotificationQueue::default(),
        };
        panel.rebuild_geometry();
        panel
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The canonical control-point sequence being edited.
    pub fn points(&self) -> &[ControlPoint] {
        self.path.points()
    }

    /// The display geometry: rulings, control polygon, curve polyline.
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.editor.on_release();
        }
    }

    /// Replace the edited curve wholesale, e.g. when the host switches the
    /// panel to another branch's response curve. Does not notify.
    pub fn set_curve(
        &mut self,
        points: Vec<ControlPoint>,
        name: impl Into<String>,
    ) -> Result<(), CurveError> {
        self.path.set_path(points)?;
        self.name = name.into();
        self.rebuild_geometry();
        Ok(())
    }

    pub fn on_pointer_down(&mut self, position: Vec2) {
        if !self.enabled {
            return;
        }
        let (project, unproject) = mappings(self.size);
        let outcome = self
            .editor
            .on_press(&mut self.path, position, project, unproject);
        self.after_edit(outcome);
    }

    pub fn on_pointer_move(&mut self, position: Vec2) {
        if !self.enabled {
            return;
        }
        let (_, unproject) = mappings(self.size);
        let outcome = self.editor.on_move(&mut self.path, position, unproject);
        self.after_edit(outcome);
    }

    pub fn on_pointer_up(&mut self) {
        if !self.enabled {
            return;
        }
        self.editor.on_release();
    }

    pub fn on_double_click(&mut self, position: Vec2) {
        if !self.enabled {
            return;
        }
        let (project, _) = mappings(self.size);
        let outcome = self.editor.on_double_click(&mut self.path, position, project);
        self.after_edit(outcome);
    }

    /// Drain notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.take()
    }

    fn after_edit(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::PointGrabbed(_) => {}
            GestureOutcome::PointInserted(_)
            | GestureOutcome::PointMoved(_)
            | GestureOutcome::PointRemoved(_) => {
                self.rebuild_geometry();
                self.notifications.push(Notification::CurveChanged {
                    name: self.name.clone(),
                    points: self.path.points().to_vec(),
                });
                self.notifications.request_redraw();
            }
            GestureOutcome::Ignored | GestureOutcome::DragFinished => {}
        }
    }

    /// Rebuild the display entity from the current path. The entity loses
    /// its backend handle; the host reloads it on the next paint.
    fn rebuild_geometry(&mut self) {
        let (project, _) = mappings(self.size);
        let mut vertices = Vec::new();

        // Background rulings, a line list over the panel rectangle.
        for i in 0..=RULINGS {
            let f = i as f32 / RULINGS as f32;
            let x = f * self.size.x;
            let y = f * self.size.y;
            vertices.push(ruling(Vec2::new(x, 0.0)));
            vertices.push(ruling(Vec2::new(x, self.size.y)));
            vertices.push(ruling(Vec2::new(0.0, y)));
            vertices.push(ruling(Vec2::new(self.size.x, y)));
        }
        let background = [0, vertices.len()];

        // Control polygon as line segments between consecutive points.
        let controls_start = vertices.len();
        let points = self.path.points();
        for pair in points.windows(2) {
            for p in pair {
                let screen = project(p.position);
                vertices.push(Vertex::new(screen.extend(0.0), HANDLE_COLOR));
            }
        }
        let controls = [controls_start, vertices.len()];

        // Sampled curve polyline.
        let curve_start = vertices.len();
        for i in 0..=CURVE_SAMPLES {
            let t = i as f32 / CURVE_SAMPLES as f32;
            let screen = project(self.path.point_at(t));
            vertices.push(Vertex::new(screen.extend(0.0), CURVE_COLOR));
        }
        let curve = [curve_start, vertices.len()];

        self.entity = Entity::with_ranges(
            GeometryBuffer::from_data(vertices, Vec::new()),
            vec![
                RenderRange::spanning(Topology::Lines, background, [0, 0]),
                RenderRange::spanning(Topology::Lines, controls, [0, 0]),
                RenderRange::spanning(Topology::LineStrip, curve, [0, 0]),
            ],
        );
    }
}

/// Curve-space <-> panel-pixel mappings. The curve lives in the unit square
/// with the response axis pointing up; pixels have y down.
fn mappings(size: Vec2) -> (impl Fn(Vec3) -> Vec2, impl Fn(Vec2) -> Vec3) {
    let project = move |p: Vec3| Vec2::new(p.x * size.x, (1.0 - p.y) * size.y);
    let unproject = move |p: Vec2| {
        Vec3::new(
            (p.x / size.x).clamp(0.0, 1.0),
            (1.0 - p.y / size.y).clamp(0.0, 1.0),
            0.0,
        )
    };
    (project, unproject)
}

fn ruling(position: Vec2) -> Vertex {
    Vertex::new(position.extend(0.0), BACKGROUND_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(200.0, 100.0);

    fn curve_changed(notifications: &[Notification]) -> Option<&[ControlPoint]> {
        notifications.iter().rev().find_map(|n| match n {
            Notification::CurveChanged { points, .. } => Some(points.as_slice()),
            _ => None,
        })
    }

    #[test]
    fn test_display_geometry_has_three_ranges() {
        let panel = CurvePanel::new("radius", SIZE);
        let entity = panel.entity();
        assert_eq!(entity.ranges.len(), 3);
        assert_eq!(entity.ranges[0].topology, Topology::Lines);
        assert_eq!(entity.ranges[2].topology, Topology::LineStrip);
        // Curve polyline has one vertex per sample.
        let curve = entity.ranges[2].vertices;
        assert_eq!(curve[1] - curve[0], CURVE_SAMPLES + 1);
        assert_eq!(entity.buffer.used_vertices(), curve[1]);
    }

    #[test]
    fn test_dragging_a_point_emits_the_canonical_sequence() {
        let mut panel = CurvePanel::new("radius", SIZE);
        // The start terminal (0, 1) sits at the top-left pixel corner.
        panel.on_pointer_down(Vec2::new(0.0, 0.0));
        panel.on_pointer_move(Vec2::new(0.0, 50.0));
        panel.on_pointer_up();

        let drained = panel.take_notifications();
        let points = curve_changed(&drained).expect("drag emits a curve change");
        assert_eq!(points.len(), 4);
        assert!((points[0].position.y - 0.5).abs() < 1e-4);
        // Endpoint drags stay on the response axis.
        assert_eq!(points[0].position.x, 0.0);
    }

    #[test]
    fn test_press_on_curve_inserts_a_segment() {
        let mut panel = CurvePanel::new("radius", SIZE);
        // The default ramp crosses the panel center.
        panel.on_pointer_down(Vec2::new(100.0, 50.0));
        let drained = panel.take_notifications();
        let points = curve_changed(&drained).expect("insertion emits a curve change");
        assert_eq!(points.len(), 7);
        assert_eq!(panel.points().len(), 7);
    }

    #[test]
    fn test_double_click_removes_the_inserted_terminal() {
        let mut panel = CurvePanel::new("radius", SIZE);
        panel.on_pointer_down(Vec2::new(100.0, 50.0));
        panel.on_pointer_up();
        panel.take_notifications();

        panel.on_double_click(Vec2::new(100.0, 50.0));
        let drained = panel.take_notifications();
        let points = curve_changed(&drained).expect("removal emits a curve change");
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_disabled_panel_ignores_input() {
        let mut panel = CurvePanel::new("radius", SIZE);
        panel.set_enabled(false);
        panel.on_pointer_down(Vec2::new(100.0, 50.0));
        panel.on_pointer_move(Vec2::new(120.0, 50.0));
        assert_eq!(panel.points().len(), 4);
        assert!(panel.take_notifications().is_empty());
    }

    #[test]
    fn test_set_curve_validates_topology() {
        let mut panel = CurvePanel::new("radius", SIZE);
        let mut points = panel.points().to_vec();
        assert!(panel.set_curve(points.clone(), "other").is_ok());
        assert_eq!(panel.name(), "other");

        points.pop();
        assert!(panel.set_curve(points, "broken").is_err());
        // A rejected sequence leaves the panel untouched.
        assert_eq!(panel.points().len(), 4);
        assert_eq!(panel.name(), "other");
    }
}
