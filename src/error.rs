//! Error types for the geometry pipeline.
//!
//! Every failure is caller misconfiguration: the pipeline is deterministic for
//! valid input, so nothing here is retryable.

use thiserror::Error;

use crate::skeleton::BranchRole;

/// Top-level error returned by sampling, frame transport, meshing and scatter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid curve: {0}")]
    InvalidCurve(#[from] InvalidCurve),
    #[error("invalid mesh parameters: {0}")]
    InvalidMeshParams(#[from] InvalidMeshParams),
    #[error("degenerate geometry: none of the {samples} curve samples has a usable tangent")]
    DegenerateGeometry { samples: usize },
    #[error("invalid scatter parameters: {0}")]
    InvalidScatterParams(#[from] InvalidScatterParams),
    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(#[from] InvalidSkeleton),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidCurve {
    #[error("need at least 2 distinct control points, found {distinct}")]
    TooFewPoints { distinct: usize },
    #[error("control point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("segment count must be at least 1")]
    NoSegments,
    #[error("{frames} frames supplied for {samples} curve samples")]
    FrameCountMismatch { samples: usize, frames: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidMeshParams {
    #[error("radial segment count must be at least 3, got {0}")]
    TooFewRadialSegments(u32),
    #[error("tube needs at least one length segment")]
    NoLengthSegments,
    #[error("radius {radius} at t = {t} is not positive")]
    NonPositiveRadius { t: f32, radius: f32 },
    #[error("base thickness must be positive and finite, got {0}")]
    NonPositiveThickness(f32),
    #[error("taper must lie in (0, 1], got {0}")]
    TaperOutOfRange(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidScatterParams {
    #[error("count range is inverted: {min} > {max}")]
    InvertedCount { min: u32, max: u32 },
    #[error("jitter half-extents must be finite and non-negative, got {0}")]
    BadJitter(bevy::math::Vec3),
    #[error("scale range [{min}, {max}] must be positive, finite and ordered")]
    BadScale { min: f32, max: f32 },
    #[error("rotation range on axis {axis} is inverted or not finite")]
    BadRotation { axis: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidSkeleton {
    #[error("branch {index} ({role:?}) is invalid: {source}")]
    Branch {
        index: usize,
        role: BranchRole,
        source: InvalidMeshParams,
    },
    #[error("{inner:?} {measure} {inner_value} is not below {outer:?} {measure} {outer_value}")]
    HierarchyViolation {
        outer: BranchRole,
        inner: BranchRole,
        measure: &'static str,
        outer_value: f32,
        inner_value: f32,
    },
}
