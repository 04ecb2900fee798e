//! Geometry storage and GPU-buffer reconciliation for arbor.
//!
//! This crate owns the renderable side of the editor:
//! - [`buffer::GeometryBuffer`] - interleaved vertex/index arrays with a
//!   logical extent distinct from allocated capacity
//! - [`entity::Entity`] - a buffer plus its independently toggleable render
//!   ranges (solid mesh, wireframe overlay, line work)
//! - [`sync::BufferSync`] - keeps GPU-resident buffers consistent with a
//!   generator whose output size is unknown ahead of time
//! - [`backend::RenderBackend`] - the upload seam to the actual renderer
//! - [`primitives`] - built-in display geometry (ground grid)
//!
//! The reconciliation layer is the only mutator of buffer storage; everything
//! else sees extent/capacity queries and read-only slices.

pub mod backend;
pub mod buffer;
pub mod entity;
pub mod primitives;
pub mod sync;

pub use backend::{BackendCall, BufferHandle, RecordingBackend, RenderBackend};
pub use buffer::{GeometryBuffer, Vertex};
pub use entity::{Entity, RenderRange, Topology};
pub use sync::{BufferSync, MeshStatus, SyncConfig, SyncError, SyncOutcome};
