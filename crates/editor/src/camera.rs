//! Orbit camera and screen-ray unprojection.
//!
//! Controls follow the usual 3D-editor scheme:
//! - middle drag: orbit around the target
//! - Shift + middle drag: pan
//! - Ctrl + middle drag: zoom
//!
//! Picking gets its rays from [`OrbitCamera::ray_at`], which unprojects a
//! screen position through the inverse view-projection.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use picking::Ray;

/// Drag mode of an active middle-button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    Orbit,
    Pan,
    Zoom,
}

/// Perspective camera orbiting a target point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle (yaw) in radians.
    pub yaw: f32,
    /// Vertical angle (pitch) in radians.
    pub pitch: f32,
    /// Orbit sensitivity (radians per pixel).
    pub orbit_sensitivity: f32,
    /// Pan sensitivity (units per pixel, scaled by distance).
    pub pan_sensitivity: f32,
    /// Zoom sensitivity (distance fraction per pixel).
    pub zoom_sensitivity: f32,
    min_distance: f32,
    max_distance: f32,
    width: f32,
    height: f32,
    fovy: f32,
    near: f32,
    far: f32,
    action: Option<(CameraAction, Vec2)>,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 8.66,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 0.615,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 0.002,
            zoom_sensitivity: 0.01,
            min_distance: 0.5,
            max_distance: 200.0,
            width: 800.0,
            height: 600.0,
            fovy: 45f32.to_radians(),
            near: 0.1,
            far: 100.0,
            action: None,
        }
    }
}

impl OrbitCamera {
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Camera position from the orbit parameters.
    pub fn position(&self) -> Vec3 {
        let horizontal = self.distance * self.pitch.cos();
        let offset = Vec3::new(
            horizontal * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            horizontal * self.yaw.cos(),
        );
        self.target + offset
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy, self.width / self.height, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Begin a drag gesture at the given cursor position.
    pub fn begin_action(&mut self, action: CameraAction, cursor: Vec2) {
        self.action = Some((action, cursor));
    }

    pub fn end_action(&mut self) {
        self.action = None;
    }

    pub fn action(&self) -> Option<CameraAction> {
        self.action.map(|(action, _)| action)
    }

    /// Apply a cursor move to the active gesture. Returns whether the view
    /// changed.
    pub fn drag_to(&mut self, cursor: Vec2) -> bool {
        let Some((action, last)) = self.action else {
            return false;
        };
        let delta = cursor - last;
        self.action = Some((action, cursor));
        match action {
            CameraAction::Orbit => {
                self.yaw -= delta.x * self.orbit_sensitivity;
                self.pitch = (self.pitch + delta.y * self.orbit_sensitivity)
                    .clamp(-1.54, 1.54);
            }
            CameraAction::Pan => {
                let forward = (self.target - self.position()).normalize();
                let right = forward.cross(Vec3::Y).normalize();
                let up = right.cross(forward);
                let scale = self.pan_sensitivity * self.distance;
                self.target += (-delta.x * right + delta.y * up) * scale;
            }
            CameraAction::Zoom => {
                self.distance = (self.distance * (1.0 + delta.y * self.zoom_sensitivity))
                    .clamp(self.min_distance, self.max_distance);
            }
        }
        true
    }

    /// World-space picking ray through a screen position.
    pub fn ray_at(&self, screen: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * screen.x / self.width - 1.0,
            1.0 - 2.0 * screen.y / self.height,
        );
        let inverse = self.view_projection().inverse();
        let near = inverse * ndc.extend(0.0).extend(1.0);
        let far = inverse * ndc.extend(1.0).extend(1.0);
        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;
        Ray::new(self.position(), far - near)
    }
}
