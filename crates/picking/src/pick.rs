//! Entity and branch picking.

use geometry::Entity;
use tracing::trace;

use crate::aabb::{Aabb, Ray};

/// Per-branch bounding volumes of a generated structure.
///
/// Implemented by the mesh generator. Engines that know their branch count
/// report it through [`BranchBounds::branch_count`]; engines that cannot
/// are scanned until they return an x-degenerate box, the legacy
/// end-of-hierarchy marker.
pub trait BranchBounds {
    /// Number of branches, when the engine can report one.
    fn branch_count(&self) -> Option<usize> {
        None
    }

    /// Bounding box of the branch at `index`. Past the last branch this
    /// must return an x-degenerate box if [`BranchBounds::branch_count`]
    /// is `None`.
    fn branch_bounding_box(&self, index: usize) -> Aabb;
}

/// Pick the first entity whose geometry the ray touches.
///
/// For each entity, in list order, every render range gets a bounding box
/// over its vertex positions and is slab-tested. The first entity with any
/// intersecting range wins; this is deliberately first-in-order rather than
/// nearest-hit, so an occluded object earlier in the list can shadow a
/// nearer one.
pub fn pick_entity(ray: &Ray, entities: &[Entity]) -> Option<usize> {
    for (index, entity) in entities.iter().enumerate() {
        let vertices = entity.buffer.used_vertex_slice();
        for range in &entity.ranges {
            let Some(span) = vertices.get(range.vertices[0]..range.vertices[1]) else {
                continue;
            };
            let aabb = Aabb::from_points(span.iter().map(|v| v.position()));
            if aabb.is_some_and(|aabb| aabb.intersect(ray).is_some()) {
                trace!(index, "entity pick hit");
                return Some(index);
            }
        }
    }
    trace!("entity pick missed");
    None
}

/// Pick the first branch whose bounding box the ray touches.
///
/// With a counted engine the scan is bounded; otherwise branches are
/// enumerated until the x-degenerate end marker appears.
pub fn pick_branch(ray: &Ray, bounds: &dyn BranchBounds) -> Option<usize> {
    if let Some(count) = bounds.branch_count() {
        for index in 0..count {
            if bounds.branch_bounding_box(index).intersect(ray).is_some() {
                trace!(index, "branch pick hit");
                return Some(index);
            }
        }
        return None;
    }

    let mut index = 0;
    loop {
        let aabb = bounds.branch_bounding_box(index);
        if aabb.is_degenerate_x() {
            return None;
        }
        if aabb.intersect(ray).is_some() {
            trace!(index, "branch pick hit");
            return Some(index);
        }
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::{Entity, GeometryBuffer, RenderRange, Topology, Vertex};
    use glam::Vec3;

    fn box_entity(center: Vec3, half: f32) -> Entity {
        let corners = [
            center + Vec3::splat(-half),
            center + Vec3::splat(half),
        ];
        let vertices = corners
            .iter()
            .map(|&p| Vertex::new(p, Vec3::Y))
            .collect::<Vec<_>>();
        let count = vertices.len();
        Entity::with_ranges(
            GeometryBuffer::from_data(vertices, vec![0, 1, 0]),
            vec![RenderRange::spanning(Topology::Triangles, [0, count], [0, 3])],
        )
    }

    struct BoxList {
        boxes: Vec<Aabb>,
        counted: bool,
    }

    impl BranchBounds for BoxList {
        fn branch_count(&self) -> Option<usize> {
            self.counted.then_some(self.boxes.len())
        }

        fn branch_bounding_box(&self, index: usize) -> Aabb {
            self.boxes
                .get(index)
                .copied()
                .unwrap_or(Aabb::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0)))
        }
    }

    fn branch_boxes(counted: bool) -> BoxList {
        BoxList {
            boxes: vec![
                Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0)),
                Aabb::new(Vec3::new(4.0, 0.0, -1.0), Vec3::new(6.0, 2.0, 1.0)),
            ],
            counted,
        }
    }

    #[test]
    fn test_entity_pick_hits_first_in_order() {
        let entities = [box_entity(Vec3::ZERO, 1.0), box_entity(Vec3::ZERO, 2.0)];
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        // Both entities contain the ray; list order decides.
        assert_eq!(pick_entity(&ray, &entities), Some(0));
    }

    #[test]
    fn test_entity_pick_misses_everything() {
        let entities = [box_entity(Vec3::ZERO, 1.0)];
        let ray = Ray::new(Vec3::new(10.0, 10.0, 10.0), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(pick_entity(&ray, &entities), None);
    }

    #[test]
    fn test_entity_pick_skips_empty_ranges() {
        let mut entity = box_entity(Vec3::ZERO, 1.0);
        entity.ranges.insert(0, RenderRange::hidden(Topology::Lines));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(pick_entity(&ray, &[entity]), Some(0));
    }

    #[test]
    fn test_branch_pick_with_count() {
        let bounds = branch_boxes(true);
        let down = Vec3::new(0.0, -1.0, 0.0);
        let first = Ray::new(Vec3::new(0.0, 5.0, 0.0), down);
        let second = Ray::new(Vec3::new(5.0, 5.0, 0.0), down);
        let miss = Ray::new(Vec3::new(20.0, 5.0, 0.0), down);
        assert_eq!(pick_branch(&first, &bounds), Some(0));
        assert_eq!(pick_branch(&second, &bounds), Some(1));
        assert_eq!(pick_branch(&miss, &bounds), None);
    }

    #[test]
    fn test_branch_pick_sentinel_scan() {
        let bounds = branch_boxes(false);
        let down = Vec3::new(0.0, -1.0, 0.0);
        let second = Ray::new(Vec3::new(5.0, 5.0, 0.0), down);
        let miss = Ray::new(Vec3::new(20.0, 5.0, 0.0), down);
        // The scan walks past branch 1 and stops at the degenerate box.
        assert_eq!(pick_branch(&second, &bounds), Some(1));
        assert_eq!(pick_branch(&miss, &bounds), None);
    }
}
