//! The upload seam between buffer reconciliation and the actual renderer.
//!
//! The editor core never talks to a GPU API directly; it drives this trait.
//! A real implementation wraps the rendering toolkit, while
//! [`RecordingBackend`] records the call stream for tests and headless runs.

use crate::buffer::Vertex;

/// Handle to GPU-side buffer storage issued by the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// GPU-side operations the reconciliation layer needs.
///
/// `load_buffer` allocates storage mirroring the full capacity slices it is
/// given; sub-range updates touch only the in-use prefix. Range calls mirror
/// the entity's render-range state to the drawing side.
pub trait RenderBackend {
    fn load_buffer(&mut self, vertices: &[Vertex], indices: &[u32]) -> BufferHandle;
    fn update_vertices(&mut self, handle: BufferHandle, offset: usize, data: &[Vertex]);
    fn update_indices(&mut self, handle: BufferHandle, offset: usize, data: &[u32]);
    fn set_range_extent(
        &mut self,
        handle: BufferHandle,
        range: usize,
        vertices: [usize; 2],
        indices: [usize; 2],
    );
    fn set_range_visible(&mut self, handle: BufferHandle, range: usize, visible: bool);
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Load {
        handle: BufferHandle,
        vertex_count: usize,
        index_count: usize,
    },
    UpdateVertices {
        handle: BufferHandle,
        offset: usize,
        len: usize,
    },
    UpdateIndices {
        handle: BufferHandle,
        offset: usize,
        len: usize,
    },
    SetRangeExtent {
        handle: BufferHandle,
        range: usize,
        vertices: [usize; 2],
        indices: [usize; 2],
    },
    SetRangeVisible {
        handle: BufferHandle,
        range: usize,
        visible: bool,
    },
}

/// Backend double that records every call it receives.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
    next_handle: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of full reloads seen so far.
    pub fn load_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Load { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn load_buffer(&mut self, vertices: &[Vertex], indices: &[u32]) -> BufferHandle {
        let handle = BufferHandle(self.next_handle);
        self.next_handle += 1;
        self.calls.push(BackendCall::Load {
            handle,
            vertex_count: vertices.len(),
            index_count: indices.len(),
        });
        handle
    }

    fn update_vertices(&mut self, handle: BufferHandle, offset: usize, data: &[Vertex]) {
        self.calls.push(BackendCall::UpdateVertices {
            handle,
            offset,
            len: data.len(),
        });
    }

    fn update_indices(&mut self, handle: BufferHandle, offset: usize, data: &[u32]) {
        self.calls.push(BackendCall::UpdateIndices {
            handle,
            offset,
            len: data.len(),
        });
    }

    fn set_range_extent(
        &mut self,
        handle: BufferHandle,
        range: usize,
        vertices: [usize; 2],
        indices: [usize; 2],
    ) {
        self.calls.push(BackendCall::SetRangeExtent {
            handle,
            range,
            vertices,
            indices,
        });
    }

    fn set_range_visible(&mut self, handle: BufferHandle, range: usize, visible: bool) {
        self.calls.push(BackendCall::SetRangeVisible {
            handle,
            range,
            visible,
        });
    }
}
