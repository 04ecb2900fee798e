//! The interaction controller: gestures in, remeshes and notifications out.
//!
//! Routes pointer/keyboard events to the camera and the picking engine,
//! applies branch-scoped parameter changes to the generator, and runs buffer
//! reconciliation after every structural change. All of it is synchronous:
//! one event is processed to completion before the next is looked at.

use glam::{Vec2, Vec3};
use tracing::{debug, trace};

use curve::ControlPoint;
use geometry::{
    BufferSync, Entity, RenderBackend, RenderRange, SyncConfig, SyncError, Topology, primitives,
};
use picking::{pick_branch, pick_entity};
use treegen::{Param, TreeEngine};

use crate::camera::{CameraAction, OrbitCamera};
use crate::input::{InputEvent, Key, Modifiers, PointerButton, PointerInput};
use crate::notify::{Notification, NotificationQueue};
use crate::scene::Scene;

/// Index of the wireframe overlay range on the structure entity; range 0 is
/// the solid mesh kept sized by reconciliation.
const OVERLAY_RANGE: usize = 1;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A branch-scoped operation ran with no branch selected. Expected
    /// during normal use; the controller entry points absorb it silently.
    #[error("no branch is selected")]
    NoSelection,
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Owns the scene, camera, generator, and render backend, and sequences
/// them in response to gestures and parameter changes.
#[derive(Debug)]
pub struct InteractionController<E, B> {
    engine: E,
    backend: B,
    scene: Scene,
    camera: OrbitCamera,
    sync: BufferSync,
    notifications: NotificationQueue,
    modifiers: Modifiers,
    structure: usize,
    grid: usize,
}

impl<E: TreeEngine, B: RenderBackend> InteractionController<E, B> {
    /// Set up the scene (structure entity plus ground grid) and run the
    /// initial generation.
    pub fn new(engine: E, backend: B, config: SyncConfig) -> Result<Self, EditorError> {
        let sync = BufferSync::new(config);
        let mut scene = Scene::new();

        // The structure comes first so entity picking favors it over the
        // grid, whose flat bounding box covers the whole ground plane.
        let structure_entity = Entity::with_ranges(
            sync.create_buffer(),
            vec![
                RenderRange::spanning(Topology::Triangles, [0, 0], [0, 0]),
                RenderRange::hidden(Topology::Triangles),
            ],
        );
        let structure = scene.add(structure_entity);
        let grid = scene.add(primitives::create_grid(
            5,
            Vec3::splat(0.46),
            Vec3::splat(0.41),
        ));

        let mut controller = Self {
            engine,
            backend,
            scene,
            camera: OrbitCamera::default(),
            sync,
            notifications: NotificationQueue::default(),
            modifiers: Modifiers::default(),
            structure,
            grid,
        };
        controller.load_grid();
        controller.remesh()?;
        Ok(controller)
    }

    /// Feed one input event through the controller.
    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(input) => self.pointer_down(input),
            InputEvent::PointerMove { position } => {
                if self.camera.drag_to(position) {
                    self.notifications.request_redraw();
                }
            }
            InputEvent::PointerUp { .. } => self.camera.end_action(),
            InputEvent::DoubleClick(_) => {}
            InputEvent::KeyDown(Key::Control) => self.modifiers.ctrl = true,
            InputEvent::KeyDown(Key::Shift) => self.modifiers.shift = true,
            InputEvent::KeyUp(Key::Control) => self.modifiers.ctrl = false,
            InputEvent::KeyUp(Key::Shift) => self.modifiers.shift = false,
        }
    }

    fn pointer_down(&mut self, input: PointerInput) {
        match input.button {
            PointerButton::Middle => {
                let modifiers = self.modifiers.or(input.modifiers);
                let action = if modifiers.ctrl && !modifiers.shift {
                    CameraAction::Zoom
                } else if modifiers.shift && !modifiers.ctrl {
                    CameraAction::Pan
                } else {
                    CameraAction::Orbit
                };
                self.camera.begin_action(action, input.position);
            }
            PointerButton::Right => self.select_branch(input.position),
            PointerButton::Left => {}
        }
    }

    /// Resolve a screen position to an entity and branch selection and move
    /// the wireframe overlay there.
    pub fn select_branch(&mut self, position: Vec2) {
        self.clear_wireframe();

        let ray = self.camera.ray_at(position);
        let entity = pick_entity(&ray, self.scene.entities());
        self.scene.selection_mut().set_entity(entity);

        let branch = match entity {
            Some(_) => pick_branch(&ray, &self.engine),
            None => None,
        };
        self.scene.selection_mut().set_branch(branch);
        debug!(?entity, ?branch, "selection changed");

        if branch.is_some() {
            self.update_wireframe();
        }
        self.notifications
            .push(Notification::SelectionChanged { branch });
        self.notifications.request_redraw();
    }

    /// Base radius of the selected branch.
    pub fn set_radius(&mut self, radius: f32) -> Result<(), EditorError> {
        self.apply_branch_parameter(Param::Radius(radius))
    }

    /// Ring resolution of the selected branch.
    pub fn set_resolution(&mut self, resolution: u32) -> Result<(), EditorError> {
        self.apply_branch_parameter(Param::Resolution(resolution))
    }

    /// Cross-section count of the selected branch.
    pub fn set_cross_sections(&mut self, sections: u32) -> Result<(), EditorError> {
        self.apply_branch_parameter(Param::CrossSections(sections))
    }

    /// Radius response curve of the selected branch, as the canonical
    /// control-point sequence emitted by the curve model.
    pub fn set_radius_curve(&mut self, points: Vec<ControlPoint>) -> Result<(), EditorError> {
        self.apply_branch_parameter(Param::RadiusCurve(points))
    }

    /// The selected branch, or [`EditorError::NoSelection`].
    pub fn require_selection(&self) -> Result<usize, EditorError> {
        self.scene
            .selection()
            .branch()
            .ok_or(EditorError::NoSelection)
    }

    fn apply_branch_parameter(&mut self, param: Param) -> Result<(), EditorError> {
        let branch = match self.require_selection() {
            Ok(branch) => branch,
            Err(EditorError::NoSelection) => {
                trace!("branch-scoped parameter with no selection, ignoring");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        self.engine.set_parameter(branch, param);
        self.remesh()
    }

    /// Regenerate the structure mesh and reconcile the buffers, then
    /// refresh the overlay to the selected branch.
    fn remesh(&mut self) -> Result<(), EditorError> {
        let engine = &mut self.engine;
        let entity = self.scene.entity_mut(self.structure);
        self.sync
            .reconcile(entity, |v, i| engine.generate_mesh(v, i), &mut self.backend)?;
        self.update_wireframe();
        self.notifications.request_redraw();
        Ok(())
    }

    fn update_wireframe(&mut self) {
        let selection = self.scene.selection();
        let (Some(entity_index), Some(branch)) = (selection.entity(), selection.branch()) else {
            return;
        };
        if entity_index != self.structure {
            return;
        }
        let indices = self.engine.branch_index_range(branch);
        let entity = self.scene.entity_mut(self.structure);
        let vertices = [0, entity.buffer.used_vertices()];
        entity.ranges[OVERLAY_RANGE] =
            RenderRange::spanning(Topology::Triangles, vertices, indices);
        if let Some(handle) = entity.handle {
            self.backend
                .set_range_extent(handle, OVERLAY_RANGE, vertices, indices);
            self.backend.set_range_visible(handle, OVERLAY_RANGE, true);
        }
    }

    fn clear_wireframe(&mut self) {
        let entity = self.scene.entity_mut(self.structure);
        entity.ranges[OVERLAY_RANGE] = RenderRange::hidden(Topology::Triangles);
        if let Some(handle) = entity.handle {
            self.backend.set_range_visible(handle, OVERLAY_RANGE, false);
        }
    }

    fn load_grid(&mut self) {
        let entity = self.scene.entity_mut(self.grid);
        let handle = self
            .backend
            .load_buffer(entity.buffer.vertices(), entity.buffer.indices());
        entity.handle = Some(handle);
    }

    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.camera.set_window_size(width, height);
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Drain notifications queued since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.take()
    }
}
