//! Ray-based picking for arbor.
//!
//! Resolves screen-space picks against two kinds of targets:
//! - whole entities, via bounding boxes built over their render ranges
//! - branches inside a generated structure, via per-branch bounding boxes
//!   queried from the generator
//!
//! The engine is stateless: every query takes the ray and the candidates
//! explicitly and returns indices to the caller, which owns the
//! authoritative selection value.

pub mod aabb;
pub mod pick;

pub use aabb::{Aabb, Ray};
pub use pick::{BranchBounds, pick_branch, pick_entity};
