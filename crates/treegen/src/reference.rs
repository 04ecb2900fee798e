//! Deterministic reference implementation of the generator contract.
//!
//! Builds a trunk plus one ring of child branches, each extruded as
//! cross-section rings around its axis. Output depends only on the stored
//! parameters, so repeated generations are bit-identical. The mesh is
//! intentionally simple; what matters is honoring the contract: capacity
//! checks before any write, per-branch index ranges, bounding boxes, and
//! the branch-count capability.

use curve::{ControlPoint, CurvePath};
use geometry::{MeshStatus, Vertex};
use glam::Vec3;
use picking::{Aabb, BranchBounds};
use tracing::debug;

use crate::{Param, TreeEngine};

/// Per-branch generation parameters.
#[derive(Debug, Clone)]
struct BranchParams {
    radius: f32,
    resolution: u32,
    cross_sections: u32,
    radius_curve: Option<CurvePath>,
}

impl Default for BranchParams {
    fn default() -> Self {
        Self {
            radius: 0.2,
            resolution: 8,
            cross_sections: 4,
            radius_curve: None,
        }
    }
}

/// Axis a branch is extruded along.
#[derive(Debug, Clone, Copy)]
struct BranchAxis {
    origin: Vec3,
    direction: Vec3,
    length: f32,
}

/// Small deterministic tree engine for tests and demos.
#[derive(Debug)]
pub struct ReferenceEngine {
    axes: Vec<BranchAxis>,
    params: Vec<BranchParams>,
    index_ranges: Vec<[usize; 2]>,
    bounds: Vec<Aabb>,
    counted: bool,
}

impl ReferenceEngine {
    /// A trunk plus `children` first-level branches sprouting from it.
    pub fn new(children: usize) -> Self {
        let mut axes = vec![BranchAxis {
            origin: Vec3::ZERO,
            direction: Vec3::Y,
            length: 4.0,
        }];
        for i in 0..children {
            // Spread children around the trunk at a fixed angular step so
            // the structure is a pure function of the child index.
            let angle = i as f32 * 2.4;
            let direction =
                Vec3::new(angle.cos() * 0.7, 0.6, angle.sin() * 0.7).normalize();
            axes.push(BranchAxis {
                origin: Vec3::new(0.0, 1.0 + i as f32 * 0.8, 0.0),
                direction,
                length: 2.0,
            });
        }
        let params = vec![BranchParams::default(); axes.len()];
        Self {
            axes,
            params,
            index_ranges: Vec::new(),
            bounds: Vec::new(),
            counted: true,
        }
    }

    /// Disable the branch-count capability, forcing callers onto the
    /// degenerate-box sentinel scan.
    pub fn without_count(mut self) -> Self {
        self.counted = false;
        self
    }

    pub fn branch_total(&self) -> usize {
        self.axes.len()
    }

    fn required_sizes(&self) -> Option<(usize, usize)> {
        let mut vertices = 0usize;
        let mut indices = 0usize;
        for p in &self.params {
            if p.resolution < 3 || p.cross_sections < 2 || !p.radius.is_finite() {
                return None;
            }
            let ring = p.resolution as usize;
            let sections = p.cross_sections as usize;
            vertices += ring * sections;
            indices += 6 * ring * (sections - 1);
        }
        Some((vertices, indices))
    }

    fn ring_radius(params: &BranchParams, t: f32) -> f32 {
        let factor = params
            .radius_curve
            .as_ref()
            .map(|curve| curve.point_at(t).y)
            .unwrap_or(1.0);
        (params.radius * factor).max(0.0)
    }
}

impl BranchBounds for ReferenceEngine {
    fn branch_count(&self) -> Option<usize> {
        self.counted.then(|| self.bounds.len())
    }

    fn branch_bounding_box(&self, index: usize) -> Aabb {
        self.bounds
            .get(index)
            .copied()
            // x-degenerate marker past the last branch.
            .unwrap_or(Aabb::new(Vec3::ZERO, Vec3::ZERO))
    }
}

impl TreeEngine for ReferenceEngine {
    fn generate_mesh(&mut self, vertices: &mut [Vertex], indices: &mut [u32]) -> MeshStatus {
        let Some((need_vertices, need_indices)) = self.required_sizes() else {
            debug!("degenerate parameters, refusing to generate");
            return MeshStatus::Failed;
        };
        if vertices.len() < need_vertices || indices.len() < need_indices {
            return MeshStatus::Overflow;
        }

        self.index_ranges.clear();
        self.bounds.clear();
        let mut vertex_cursor = 0usize;
        let mut index_cursor = 0usize;

        for (axis, params) in self.axes.iter().zip(&self.params) {
            let ring = params.resolution as usize;
            let sections = params.cross_sections as usize;
            let base = vertex_cursor;
            let index_start = index_cursor;
            let mut aabb = Aabb::empty();

            // Orthonormal frame around the branch axis.
            let side = if axis.direction.cross(Vec3::Y).length_squared() > 1e-6 {
                axis.direction.cross(Vec3::Y).normalize()
            } else {
                Vec3::X
            };
            let up = axis.direction.cross(side).normalize();

            for s in 0..sections {
                let t = s as f32 / (sections - 1) as f32;
                let center = axis.origin + axis.direction * (axis.length * t);
                let radius = Self::ring_radius(params, t);
                for j in 0..ring {
                    let theta = j as f32 / ring as f32 * std::f32::consts::TAU;
                    let offset = side * theta.cos() + up * theta.sin();
                    let position = center + offset * radius;
                    vertices[vertex_cursor] = Vertex::new(position, offset);
                    aabb.include_point(position);
                    vertex_cursor += 1;
                }
            }

            for s in 0..sections - 1 {
                for j in 0..ring {
                    let next = (j + 1) % ring;
                    let a = (base + s * ring + j) as u32;
                    let b = (base + s * ring + next) as u32;
                    let c = (base + (s + 1) * ring + j) as u32;
                    let d = (base + (s + 1) * ring + next) as u32;
                    indices[index_cursor..index_cursor + 6].copy_from_slice(&[a, b, c, b, d, c]);
                    index_cursor += 6;
                }
            }

            self.index_ranges.push([index_start, index_cursor]);
            self.bounds.push(aabb);
        }

        debug_assert_eq!(vertex_cursor, need_vertices);
        debug_assert_eq!(index_cursor, need_indices);
        MeshStatus::Success {
            used_vertices: vertex_cursor,
            used_indices: index_cursor,
        }
    }

    fn branch_index_range(&self, branch: usize) -> [usize; 2] {
        self.index_ranges.get(branch).copied().unwrap_or([0, 0])
    }

    fn set_parameter(&mut self, branch: usize, param: Param) {
        let Some(params) = self.params.get_mut(branch) else {
            debug!(branch, "parameter for unknown branch ignored");
            return;
        };
        match param {
            Param::Radius(radius) => params.radius = radius,
            Param::Resolution(resolution) => params.resolution = resolution,
            Param::CrossSections(sections) => params.cross_sections = sections,
            Param::RadiusCurve(points) => match CurvePath::from_control_points(points) {
                Ok(curve) => params.radius_curve = Some(curve),
                Err(err) => debug!(%err, "radius curve rejected"),
            },
        }
    }
}

/// Radius response helper shared with editor tests: a straight ramp from
/// full radius at the base to zero at the tip.
pub fn taper_ramp() -> Vec<ControlPoint> {
    CurvePath::single_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0))
        .points()
        .to_vec()
}
