//! Renderable entities: one geometry buffer plus its render ranges.

use serde::{Deserialize, Serialize};

use crate::backend::BufferHandle;
use crate::buffer::GeometryBuffer;

/// Primitive topology a render range is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Topology {
    Lines = 0,
    LineLoop = 1,
    LineStrip = 2,
    Triangles = 3,
}

/// A sub-range of an entity's buffer drawn with one topology.
///
/// `vertices` and `indices` are `[start, end)` element ranges into the
/// buffer's logical extent; non-indexed topologies draw the vertex range,
/// indexed ones the index range. Ranges toggle independently, which is how
/// the wireframe overlay appears over the solid mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRange {
    pub topology: Topology,
    pub visible: bool,
    pub vertices: [usize; 2],
    pub indices: [usize; 2],
}

impl RenderRange {
    /// An empty, hidden range of the given topology.
    pub fn hidden(topology: Topology) -> Self {
        Self {
            topology,
            visible: false,
            vertices: [0, 0],
            indices: [0, 0],
        }
    }

    /// A visible range spanning the given element ranges.
    pub fn spanning(topology: Topology, vertices: [usize; 2], indices: [usize; 2]) -> Self {
        Self {
            topology,
            visible: true,
            vertices,
            indices,
        }
    }
}

/// A renderable object: owned buffer, render ranges, GPU handle.
///
/// Entities are created once at scene setup and live for the whole edit
/// session; their buffer contents mutate in place. By convention range 0 is
/// the primary (solid or line-work) range that reconciliation keeps sized to
/// the buffer extent; overlay ranges follow it.
#[derive(Debug)]
pub struct Entity {
    pub buffer: GeometryBuffer,
    pub ranges: Vec<RenderRange>,
    /// Backend handle, set by the first reload.
    pub handle: Option<BufferHandle>,
}

impl Entity {
    pub fn new(buffer: GeometryBuffer) -> Self {
        Self {
            buffer,
            ranges: Vec::new(),
            handle: None,
        }
    }

    pub fn with_ranges(buffer: GeometryBuffer, ranges: Vec<RenderRange>) -> Self {
        Self {
            buffer,
            ranges,
            handle: None,
        }
    }
}
