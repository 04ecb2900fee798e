//! Reconciliation of regenerated meshes with fixed-capacity GPU buffers.
//!
//! The mesh generator's output size depends on its parameters and is not
//! known before generation runs. Reconciliation keeps the buffers consistent
//! without reallocating on every edit:
//! 1. generate into the existing capacity
//! 2. on overflow, grow by a fixed increment and retry until the mesh fits
//! 3. on success, shrink only past a hysteresis window (capacity above a
//!    floor and usage well below capacity)
//! 4. a capacity change forces a full reload; otherwise only the used
//!    sub-ranges are re-uploaded
//!
//! A generator that cannot converge leaves the previous buffer contents
//! displayed; nothing partial is ever uploaded.

use tracing::{debug, trace, warn};

use crate::backend::RenderBackend;
use crate::buffer::{GeometryBuffer, Vertex};
use crate::entity::Entity;

/// Outcome of one generation attempt, reported by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshStatus {
    /// The mesh fit; these are the element counts actually written.
    Success {
        used_vertices: usize,
        used_indices: usize,
    },
    /// The mesh did not fit in the provided capacity.
    Overflow,
    /// The generator could not converge with the current parameters.
    Failed,
}

/// What reconciliation did to the GPU side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Capacity changed (or the entity was never loaded): full reload.
    Reloaded,
    /// Capacity unchanged: sub-range update only.
    Updated,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The generator failed or never fit within the growth budget. Previous
    /// buffer contents are left in place and on screen.
    #[error("mesh generation failed; previous buffer contents retained")]
    GenerationFailed,
}

/// Reconciliation thresholds. Values are configurable and should not be
/// treated as magic numbers.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Capacity given to freshly created structure buffers (default: 8000).
    pub initial_capacity: usize,
    /// Elements added to both capacities per overflow retry (default: 1000).
    pub growth_increment: usize,
    /// Never shrink a capacity at or below this floor (default: 8000).
    pub shrink_floor: usize,
    /// Shrink only when usage is more than this far below capacity
    /// (default: 2000).
    pub shrink_margin: usize,
    /// Growth retries before giving up on an ever-overflowing generator
    /// (default: 1024).
    pub max_growth_steps: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 8000,
            growth_increment: 1000,
            shrink_floor: 8000,
            shrink_margin: 2000,
            max_growth_steps: 1024,
        }
    }
}

/// Keeps an entity's buffers consistent with a regenerating mesh source.
#[derive(Debug, Default)]
pub struct BufferSync {
    pub config: SyncConfig,
}

impl BufferSync {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// A structure buffer at the configured initial capacity.
    pub fn create_buffer(&self) -> GeometryBuffer {
        GeometryBuffer::with_capacity(self.config.initial_capacity, self.config.initial_capacity)
    }

    /// Regenerate the entity's mesh and bring the GPU side up to date.
    ///
    /// `generate` writes into the provided storage and reports whether the
    /// mesh fit. By convention range 0 is the primary range and is resized
    /// to the new extent; overlay ranges are the caller's to refresh.
    pub fn reconcile<F>(
        &self,
        entity: &mut Entity,
        mut generate: F,
        backend: &mut dyn RenderBackend,
    ) -> Result<SyncOutcome, SyncError>
    where
        F: FnMut(&mut [Vertex], &mut [u32]) -> MeshStatus,
    {
        let mut growth_steps = 0;
        let mut grew = false;
        let (used_vertices, used_indices) = loop {
            let (vertices, indices) = entity.buffer.storage_mut();
            match generate(vertices, indices) {
                MeshStatus::Success {
                    used_vertices,
                    used_indices,
                } => break (used_vertices, used_indices),
                MeshStatus::Overflow => {
                    growth_steps += 1;
                    if growth_steps > self.config.max_growth_steps {
                        warn!(
                            steps = growth_steps - 1,
                            "generator still overflowing after growth budget"
                        );
                        return Err(SyncError::GenerationFailed);
                    }
                    trace!(
                        vertex_capacity = entity.buffer.vertex_capacity(),
                        "overflow, growing buffers"
                    );
                    entity.buffer.grow(self.config.growth_increment);
                    grew = true;
                }
                MeshStatus::Failed => {
                    warn!("generation failed; keeping previous buffer contents");
                    return Err(SyncError::GenerationFailed);
                }
            }
        };

        let vertex_capacity = entity.buffer.vertex_capacity();
        let index_capacity = entity.buffer.index_capacity();
        let shrink = !grew
            && vertex_capacity > self.config.shrink_floor
            && index_capacity > self.config.shrink_floor
            && used_vertices + self.config.shrink_margin < vertex_capacity
            && used_indices + self.config.shrink_margin < index_capacity;
        if shrink {
            entity.buffer.resize_capacity(
                used_vertices + self.config.growth_increment,
                used_indices + self.config.growth_increment,
            );
        }
        entity.buffer.set_extent(used_vertices, used_indices);

        let outcome = match entity.handle {
            Some(handle) if !grew && !shrink => {
                trace!(used_vertices, used_indices, "sub-range update");
                backend.update_vertices(handle, 0, entity.buffer.used_vertex_slice());
                backend.update_indices(handle, 0, entity.buffer.used_index_slice());
                SyncOutcome::Updated
            }
            _ => {
                debug!(
                    used_vertices,
                    used_indices,
                    vertex_capacity = entity.buffer.vertex_capacity(),
                    grew,
                    shrink,
                    "full buffer reload"
                );
                let handle =
                    backend.load_buffer(entity.buffer.vertices(), entity.buffer.indices());
                entity.handle = Some(handle);
                SyncOutcome::Reloaded
            }
        };
        if let (Some(handle), Some(range)) = (entity.handle, entity.ranges.first_mut()) {
            range.vertices = [0, used_vertices];
            range.indices = [0, used_indices];
            backend.set_range_extent(handle, 0, range.vertices, range.indices);
        }
        Ok(outcome)
    }
}
