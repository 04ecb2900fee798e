//! Generator contract for procedural branching structures.
//!
//! The editor core never generates meshes itself; it drives a [`TreeEngine`]:
//! - capacity-bounded remeshing ([`TreeEngine::generate_mesh`]), deterministic
//!   for a given parameter state and never writing past the provided storage
//! - per-branch parameters ([`TreeEngine::set_parameter`])
//! - per-branch index sub-ranges for overlay rendering
//! - per-branch bounding boxes for picking, via the
//!   [`picking::BranchBounds`] supertrait
//!
//! [`reference::ReferenceEngine`] is a small deterministic implementation
//! used by tests and demos in place of the production generator.

pub mod reference;

use curve::ControlPoint;
use geometry::{MeshStatus, Vertex};
use picking::BranchBounds;
use serde::{Deserialize, Serialize};

/// A branch-scoped generator parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Param {
    /// Base radius of the branch cross-section.
    Radius(f32),
    /// Vertices per cross-section ring.
    Resolution(u32),
    /// Cross-section rings along the branch.
    CrossSections(u32),
    /// Radius response over branch length, as the canonical control-point
    /// sequence emitted by the curve model.
    RadiusCurve(Vec<ControlPoint>),
}

/// The mesh generator the editor core drives.
pub trait TreeEngine: BranchBounds {
    /// Regenerate the mesh into the provided storage.
    ///
    /// Deterministic given the current parameter state. Implementations must
    /// not write past the given capacities; a mesh that does not fit reports
    /// [`MeshStatus::Overflow`] instead.
    fn generate_mesh(&mut self, vertices: &mut [Vertex], indices: &mut [u32]) -> MeshStatus;

    /// Index-buffer sub-range `[start, end)` owned by a branch, valid after
    /// the last successful generation.
    fn branch_index_range(&self, branch: usize) -> [usize; 2];

    /// Store a parameter on the given branch; takes effect at the next
    /// generation.
    fn set_parameter(&mut self, branch: usize, param: Param);
}
