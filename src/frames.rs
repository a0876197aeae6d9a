//! Rotation-minimizing frames along a sampled curve.
//!
//! The normal is chosen once at the start of the curve and then carried along
//! by the smallest rotation that maps each tangent onto the next one (parallel
//! transport). Recomputing the normal from a fixed "up" vector at each sample
//! would flip the ring orientation wherever the curve passes through vertical,
//! which shows up as a pinched, twisted tube.

use bevy::prelude::*;

use crate::curve::SampledCurve;
use crate::error::{GeometryError, InvalidCurve};

/// Segments shorter than this (squared) carry no usable direction.
const MIN_SEGMENT_LENGTH_SQ: f32 = 1e-12;

/// |cos| above which the tangent counts as parallel to world up (~8°).
const UP_PARALLEL_THRESHOLD: f32 = 0.99;

/// Orthonormal, right-handed frame: `binormal == tangent.cross(normal)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent: Vec3,
    pub normal: Vec3,
    pub binormal: Vec3,
}

impl Frame {
    /// Starting frame for `tangent` (must be unit length).
    pub fn initial(tangent: Vec3) -> Self {
        let reference = if tangent.dot(Vec3::Y).abs() > UP_PARALLEL_THRESHOLD {
            Vec3::X
        } else {
            Vec3::Y
        };
        let normal = (reference - tangent * tangent.dot(reference)).normalize();
        Self::orthonormalized(tangent, normal)
    }

    /// Rotates this frame onto `tangent` by the minimal arc between the two
    /// tangents.
    pub fn transported(&self, tangent: Vec3) -> Self {
        let bend = robust_rotation_arc(self.tangent, tangent);
        Self::orthonormalized(tangent, bend * self.normal)
    }

    /// Point on the unit circle around the tangent at `angle`, measured from
    /// the normal towards the binormal.
    pub fn radial(&self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        self.normal * cos + self.binormal * sin
    }

    fn orthonormalized(tangent: Vec3, normal: Vec3) -> Self {
        // Strip drift along the tangent; fall back to any perpendicular if the
        // rotated normal collapsed onto it.
        let normal = (normal - tangent * tangent.dot(normal))
            .try_normalize()
            .unwrap_or_else(|| tangent.any_orthonormal_vector());
        let binormal = tangent.cross(normal).normalize();
        Self {
            tangent,
            normal,
            binormal,
        }
    }
}

/// Computes one frame per sample of `curve`.
///
/// The tangent at sample `i` points towards sample `i + 1`; the last sample
/// and every sample that starts a near-zero segment reuse the previous frame
/// unchanged. Samples before the first usable segment take its frame.
pub fn compute_frames(curve: &SampledCurve) -> Result<Vec<Frame>, GeometryError> {
    let points = curve.points();
    if points.len() < 2 {
        return Err(InvalidCurve::TooFewPoints {
            distinct: points.len(),
        }
        .into());
    }

    let directions: Vec<Option<Vec3>> = points
        .windows(2)
        .map(|w| {
            let d = w[1] - w[0];
            (d.length_squared() > MIN_SEGMENT_LENGTH_SQ).then(|| d.normalize())
        })
        .collect();

    let (first_valid, first_tangent) = directions
        .iter()
        .enumerate()
        .find_map(|(i, d)| d.map(|t| (i, t)))
        .ok_or(GeometryError::DegenerateGeometry {
            samples: points.len(),
        })?;

    let mut frames = Vec::with_capacity(points.len());
    let mut current = Frame::initial(first_tangent);

    for i in 0..points.len() {
        if i > first_valid {
            if let Some(Some(tangent)) = directions.get(i) {
                current = current.transported(*tangent);
            }
        }
        frames.push(current);
    }

    Ok(frames)
}

/// Shortest rotation from `from` to `to` (both unit length), stable for
/// parallel and anti-parallel inputs.
fn robust_rotation_arc(from: Vec3, to: Vec3) -> Quat {
    const DOT_THRESHOLD: f32 = 0.9999;
    let dot = from.dot(to);
    if dot < -DOT_THRESHOLD {
        // Fold-back: any axis perpendicular to `from` gives a valid half turn.
        let axis = if from.x.abs() < 0.8 {
            Vec3::X.cross(from).normalize()
        } else {
            Vec3::Y.cross(from).normalize()
        };
        return Quat::from_axis_angle(axis, std::f32::consts::PI);
    } else if dot > DOT_THRESHOLD {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(from, to)
}
