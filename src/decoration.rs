//! Flat geometry for the decorations placed by the scatter generator.
//!
//! Petals and leaves share one outline: a lens bounded by two quadratic
//! Béziers running from the base at the origin to a tip on +Y and back. The
//! shapes lie in the XY plane facing +Z; the renderer is expected to draw
//! them double-sided.

use std::f32::consts::TAU;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::mesh::MeshBuffers;

/// Line segments per Bézier edge of an outline.
const CURVE_SEGMENTS: u32 = 12;

/// Lens-shaped outline, `length` tall along +Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensShape {
    /// Horizontal offset of the Bézier control points; the lens is half as
    /// wide on each side.
    pub width: f32,
    pub length: f32,
}

impl LensShape {
    pub const PETAL: LensShape = LensShape {
        width: 0.03,
        length: 0.08,
    };
    pub const LEAF: LensShape = LensShape {
        width: 0.02,
        length: 0.06,
    };

    /// Closed outline, counter-clockwise seen from +Z, without repeating the
    /// start point.
    pub fn outline(&self) -> Vec<Vec2> {
        let base = Vec2::ZERO;
        let tip = Vec2::new(0.0, self.length);
        let mid = self.length * 0.5;
        let mut out = Vec::with_capacity(2 * CURVE_SEGMENTS as usize);
        out.push(base);
        // Right edge up to the tip, then the left edge back down.
        for i in 1..=CURVE_SEGMENTS {
            out.push(quadratic(base, Vec2::new(self.width, mid), tip, i));
        }
        for i in 1..CURVE_SEGMENTS {
            out.push(quadratic(tip, Vec2::new(-self.width, mid), base, i));
        }
        out
    }

    /// Fan around the outline's centroid. Lenses are convex, so the fan
    /// never overlaps itself.
    pub fn mesh(&self) -> MeshBuffers {
        polygon_fan(&self.outline(), 0.0)
    }
}

fn quadratic(p0: Vec2, control: Vec2, p1: Vec2, step: u32) -> Vec2 {
    let t = step as f32 / CURVE_SEGMENTS as f32;
    let s = 1.0 - t;
    p0 * (s * s) + control * (2.0 * s * t) + p1 * (t * t)
}

/// Triangulates a convex polygon in the XY plane at height `z` as a fan
/// around its centroid. UVs are the XY positions.
fn polygon_fan(outline: &[Vec2], z: f32) -> MeshBuffers {
    let n = outline.len();
    let mut data = MeshBuffers::with_capacity(n + 1, n * 3);
    let centroid = outline.iter().copied().sum::<Vec2>() / n.max(1) as f32;

    for p in std::iter::once(centroid).chain(outline.iter().copied()) {
        data.positions.push(p.extend(z));
        data.normals.push(Vec3::Z);
        data.uvs.push(p.to_array());
    }
    for i in 0..n as u32 {
        data.indices.extend([0, 1 + i, 1 + (i + 1) % n as u32]);
    }
    data
}

/// Five petals with a disc at the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlossomShape {
    pub petal: LensShape,
    pub petals: u32,
    pub center_radius: f32,
    pub center_segments: u32,
    /// Lift of the centre disc above the petals, avoiding z-fighting.
    pub center_offset: f32,
}

impl Default for BlossomShape {
    fn default() -> Self {
        Self {
            petal: LensShape::PETAL,
            petals: 5,
            center_radius: 0.015,
            center_segments: 12,
            center_offset: 0.005,
        }
    }
}

impl BlossomShape {
    /// Petals rotated evenly about +Z, followed by the centre disc.
    pub fn mesh(&self) -> MeshBuffers {
        let petal = self.petal.mesh();
        let mut data = MeshBuffers::default();
        for i in 0..self.petals {
            let angle = i as f32 * TAU / self.petals as f32;
            let rotation = Transform::from_rotation(Quat::from_rotation_z(angle));
            data.append_transformed(&petal, &rotation);
        }

        let segments = self.center_segments.max(3);
        let disc: Vec<Vec2> = (0..segments)
            .map(|i| Vec2::from_angle(i as f32 * TAU / segments as f32) * self.center_radius)
            .collect();
        let center = polygon_fan(&disc, self.center_offset);
        data.append_transformed(&center, &Transform::IDENTITY);
        data
    }
}
