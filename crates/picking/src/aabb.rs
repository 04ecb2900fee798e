//! Rays and axis-aligned bounding boxes.

use glam::Vec3;

/// A picking ray in world space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    /// Normalized direction.
    pub dir: Vec3,
}

impl Ray {
    /// Build a ray, normalizing the direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that grows to fit the points fed to it.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// The box around a set of points, or `None` for an empty set.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut any = false;
        let mut aabb = Self::empty();
        for p in points {
            aabb.include_point(p);
            any = true;
        }
        any.then_some(aabb)
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether the box is flat along x. Generators use an x-degenerate box
    /// as the end-of-hierarchy marker when they cannot report a branch
    /// count (see [`crate::pick::BranchBounds`]).
    pub fn is_degenerate_x(&self) -> bool {
        self.min.x == self.max.x
    }

    /// Slab-test the ray against this box.
    ///
    /// Returns the entry distance along the ray, or `None` for a miss.
    /// A ray starting inside the box hits at distance zero.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.dir.recip();
        let to_min = (self.min - ray.origin) * inv;
        let to_max = (self.max - ray.origin) * inv;
        let t_near = to_min.min(to_max).max_element();
        let t_far = to_min.max(to_max).min_element();
        let t_entry = t_near.max(0.0);
        (t_entry <= t_far).then_some(t_entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_ray_through_center_hits() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let t = unit_box().intersect(&ray);
        assert_eq!(t, Some(4.0));
    }

    #[test]
    fn test_ray_past_the_box_misses() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(unit_box().intersect(&ray), None);
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(unit_box().intersect(&ray), None);
    }

    #[test]
    fn test_origin_inside_box_is_a_zero_distance_hit() {
        // An explicit Some(0.0), distinguishable from a miss.
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(unit_box().intersect(&ray), Some(0.0));
    }

    #[test]
    fn test_axis_parallel_ray_inside_slab() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(unit_box().intersect(&ray).is_some());
    }

    #[test]
    fn test_from_points_and_degeneracy() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
        let aabb = Aabb::from_points([Vec3::ZERO, Vec3::new(2.0, -1.0, 3.0)]).unwrap();
        assert_eq!(aabb.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 0.0, 3.0));
        assert!(!aabb.is_degenerate_x());
        assert!(Aabb::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 1.0)).is_degenerate_x());
        assert_eq!(aabb.center(), Vec3::new(1.0, -0.5, 1.5));
    }
}
