//! Built-in display geometry.

use glam::Vec3;

use crate::buffer::{GeometryBuffer, Vertex};
use crate::entity::{Entity, RenderRange, Topology};

/// Build the ground-plane grid entity.
///
/// A line list covering `[-half_extent, half_extent]` on the ground plane,
/// one unit apart, with the two lines through the origin picked out in
/// `section_color`. Line color rides in the vertex normal slot.
pub fn create_grid(half_extent: i32, color: Vec3, section_color: Vec3) -> Entity {
    let mut vertices = Vec::with_capacity((half_extent as usize * 2 + 1) * 4);
    let extent = half_extent as f32;
    for i in -half_extent..=half_extent {
        let line_color = if i == 0 { section_color } else { color };
        let offset = i as f32;
        vertices.push(Vertex::new(Vec3::new(-extent, 0.0, offset), line_color));
        vertices.push(Vertex::new(Vec3::new(extent, 0.0, offset), line_color));
        vertices.push(Vertex::new(Vec3::new(offset, 0.0, -extent), line_color));
        vertices.push(Vertex::new(Vec3::new(offset, 0.0, extent), line_color));
    }

    let count = vertices.len();
    let buffer = GeometryBuffer::from_data(vertices, Vec::new());
    Entity::with_ranges(
        buffer,
        vec![RenderRange::spanning(Topology::Lines, [0, count], [0, 0])],
    )
}
