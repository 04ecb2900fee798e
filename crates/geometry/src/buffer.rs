//! Owned vertex/index storage with capacity distinct from logical extent.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved vertex attributes: position + normal, fixed six-float stride.
///
/// The layout is GPU-ready; whole buffers upload directly via bytemuck.
/// Line-work ranges reuse the normal slot for per-vertex color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Growable vertex/index arrays plus the logical extent actually in use.
///
/// Capacity is the allocated array length; the logical extent is the prefix
/// holding meaningful data. The GPU-side buffer mirrors capacity after any
/// reload, so capacity changes are deliberately rare (see [`crate::sync`]).
/// Storage mutation is crate-internal; the reconciliation layer is the only
/// writer.
#[derive(Debug, Clone)]
pub struct GeometryBuffer {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    used_vertices: usize,
    used_indices: usize,
}

impl GeometryBuffer {
    /// Zero-filled storage of the given capacities with an empty extent.
    pub fn with_capacity(vertex_capacity: usize, index_capacity: usize) -> Self {
        Self {
            vertices: vec![Vertex::default(); vertex_capacity],
            indices: vec![0; index_capacity],
            used_vertices: 0,
            used_indices: 0,
        }
    }

    /// Storage holding exactly `vertices` and `indices`, fully in use.
    pub fn from_data(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let used_vertices = vertices.len();
        let used_indices = indices.len();
        Self {
            vertices,
            indices,
            used_vertices,
            used_indices,
        }
    }

    pub fn vertex_capacity(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_capacity(&self) -> usize {
        self.indices.len()
    }

    pub fn used_vertices(&self) -> usize {
        self.used_vertices
    }

    pub fn used_indices(&self) -> usize {
        self.used_indices
    }

    /// Full-capacity vertex storage, as uploaded on a reload.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Full-capacity index storage, as uploaded on a reload.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The in-use vertex prefix.
    pub fn used_vertex_slice(&self) -> &[Vertex] {
        &self.vertices[..self.used_vertices]
    }

    /// The in-use index prefix.
    pub fn used_index_slice(&self) -> &[u32] {
        &self.indices[..self.used_indices]
    }

    /// Mutable access to the full storage for a generation pass.
    pub(crate) fn storage_mut(&mut self) -> (&mut [Vertex], &mut [u32]) {
        (&mut self.vertices, &mut self.indices)
    }

    /// Grow both capacities by `increment` elements.
    pub(crate) fn grow(&mut self, increment: usize) {
        self.vertices
            .resize(self.vertices.len() + increment, Vertex::default());
        self.indices.resize(self.indices.len() + increment, 0);
    }

    /// Reallocate to the given capacities, truncating or zero-extending.
    pub(crate) fn resize_capacity(&mut self, vertex_capacity: usize, index_capacity: usize) {
        self.vertices.resize(vertex_capacity, Vertex::default());
        self.indices.resize(index_capacity, 0);
        self.used_vertices = self.used_vertices.min(vertex_capacity);
        self.used_indices = self.used_indices.min(index_capacity);
    }

    /// Mark the in-use prefix. The extent can never exceed capacity.
    pub(crate) fn set_extent(&mut self, used_vertices: usize, used_indices: usize) {
        debug_assert!(used_vertices <= self.vertices.len());
        debug_assert!(used_indices <= self.indices.len());
        self.used_vertices = used_vertices.min(self.vertices.len());
        self.used_indices = used_indices.min(self.indices.len());
    }
}
