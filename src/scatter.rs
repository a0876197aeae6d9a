//! Clustered scatter of decorative elements around anchor points.
//!
//! Each anchor receives a random number of placements, jittered inside an
//! axis-aligned box around it. Randomness always comes from the caller, so a
//! seeded generator reproduces a tree exactly. The generator knows nothing
//! about blossoms or leaves: dense tip clusters and sparse mid-branch clusters
//! are just two calls with different [`ScatterParams`].

use std::f32::consts::PI;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, InvalidScatterParams};

/// A point decorations cluster around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterAnchor {
    pub position: Vec3,
    /// Identifies the branch tip or midpoint this anchor belongs to.
    #[serde(default)]
    pub cluster: u32,
}

impl ScatterAnchor {
    pub fn new(position: Vec3, cluster: u32) -> Self {
        Self { position, cluster }
    }

    /// Anchors numbered by their position in `positions`.
    pub fn from_positions(positions: impl IntoIterator<Item = Vec3>) -> Vec<Self> {
        positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| Self::new(p, i as u32))
            .collect()
    }
}

/// One decoration instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlacement {
    pub position: Vec3,
    pub scale: f32,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Time offset for the consumer's idle animation.
    pub phase: f32,
    /// Cluster of the anchor this placement was generated from.
    pub cluster: u32,
}

impl ScatterPlacement {
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn transform(&self) -> Transform {
        Transform {
            translation: self.position,
            rotation: self.quat(),
            scale: Vec3::splat(self.scale),
        }
    }
}

/// Inclusive `[min, max]` bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: Copy> Bounds<T> {
    pub const fn fixed(value: T) -> Self {
        Self {
            min: value,
            max: value,
        }
    }
}

impl Bounds<f32> {
    /// `[-half, half]`.
    pub const fn symmetric(half: f32) -> Self {
        Self::new(-half, half)
    }

    /// Ordered, with a span small enough to sample. rand scales the span up
    /// slightly before drawing, so it must stay well clear of `f32::MAX`.
    fn is_valid(&self) -> bool {
        self.min <= self.max && ((self.max - self.min) * 2.0).is_finite()
    }

    fn contains(&self, value: f32) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Per-axis rotation ranges in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationBounds {
    pub x: Bounds<f32>,
    pub y: Bounds<f32>,
    pub z: Bounds<f32>,
}

impl RotationBounds {
    /// Free spin about +Y, at most `tilt` radians of lean on the other axes.
    pub const fn upright(tilt: f32) -> Self {
        Self {
            x: Bounds::symmetric(tilt),
            y: Bounds::symmetric(PI),
            z: Bounds::symmetric(tilt),
        }
    }

    pub fn contains(&self, rotation: Vec3) -> bool {
        self.x.contains(rotation.x) && self.y.contains(rotation.y) && self.z.contains(rotation.z)
    }
}

impl Default for RotationBounds {
    fn default() -> Self {
        Self::upright(0.0)
    }
}

/// Phase spacing between anchors and between placements of one anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseSeeds {
    pub per_anchor: f32,
    pub per_placement: f32,
}

impl PhaseSeeds {
    pub const fn new(per_anchor: f32, per_placement: f32) -> Self {
        Self {
            per_anchor,
            per_placement,
        }
    }

    pub fn phase(&self, anchor_index: usize, placement_index: usize) -> f32 {
        anchor_index as f32 * self.per_anchor + placement_index as f32 * self.per_placement
    }
}

/// Shape of one scatter tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterParams {
    /// Placements per anchor, inclusive.
    pub count: Bounds<u32>,
    /// Half-extents of the jitter box around each anchor.
    pub jitter: Vec3,
    pub scale: Bounds<f32>,
    pub rotation: RotationBounds,
    pub phase: PhaseSeeds,
}

impl ScatterParams {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.count.min > self.count.max {
            return Err(InvalidScatterParams::InvertedCount {
                min: self.count.min,
                max: self.count.max,
            }
            .into());
        }
        let jitter_ok = self
            .jitter
            .to_array()
            .into_iter()
            .all(|half| half >= 0.0 && Bounds::symmetric(half).is_valid());
        if !jitter_ok {
            return Err(InvalidScatterParams::BadJitter(self.jitter).into());
        }
        if !self.scale.is_valid() || self.scale.min <= 0.0 {
            return Err(InvalidScatterParams::BadScale {
                min: self.scale.min,
                max: self.scale.max,
            }
            .into());
        }
        for (axis, bounds) in [
            ('x', self.rotation.x),
            ('y', self.rotation.y),
            ('z', self.rotation.z),
        ] {
            if !bounds.is_valid() {
                return Err(InvalidScatterParams::BadRotation { axis }.into());
            }
        }
        Ok(())
    }

    /// Whether `placement` could have been produced for `anchor` by these
    /// params (phase aside).
    pub fn admits(&self, anchor: &ScatterAnchor, placement: &ScatterPlacement) -> bool {
        const SLACK: f32 = 1e-5;
        let offset = (placement.position - anchor.position).abs();
        offset.cmple(self.jitter + SLACK).all()
            && self.scale.contains(placement.scale)
            && self.rotation.contains(placement.rotation)
    }

    fn placements_for<R: Rng + ?Sized>(
        &self,
        anchor_index: usize,
        anchor: &ScatterAnchor,
        rng: &mut R,
        out: &mut Vec<ScatterPlacement>,
    ) {
        let count = rng.random_range(self.count.min..=self.count.max) as usize;
        out.reserve(count);
        for j in 0..count {
            let jitter = Vec3::new(
                draw(rng, Bounds::symmetric(self.jitter.x)),
                draw(rng, Bounds::symmetric(self.jitter.y)),
                draw(rng, Bounds::symmetric(self.jitter.z)),
            );
            let scale = draw(rng, self.scale);
            let rotation = Vec3::new(
                draw(rng, self.rotation.x),
                draw(rng, self.rotation.y),
                draw(rng, self.rotation.z),
            );
            out.push(ScatterPlacement {
                position: anchor.position + jitter,
                scale,
                rotation,
                phase: self.phase.phase(anchor_index, j),
                cluster: anchor.cluster,
            });
        }
    }
}

/// Uniform draw from `bounds`; float rounding can land just past `max`.
fn draw<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds<f32>) -> f32 {
    rng.random_range(bounds.min..=bounds.max).clamp(bounds.min, bounds.max)
}

/// Scatters placements around `anchors`, visiting them in order and drawing
/// everything from the single stream `rng`.
///
/// Per placement the draws are: jitter x, y, z, scale, rotation x, y, z.
pub fn generate<R: Rng + ?Sized>(
    anchors: &[ScatterAnchor],
    params: &ScatterParams,
    rng: &mut R,
) -> Result<Vec<ScatterPlacement>, GeometryError> {
    params.validate()?;
    let mut out = Vec::new();
    for (i, anchor) in anchors.iter().enumerate() {
        params.placements_for(i, anchor, rng, &mut out);
    }
    Ok(out)
}

/// Like [`generate`], but every anchor draws from its own ChaCha stream
/// (`stream = anchor index`) keyed by `seed`, so anchors can be processed on
/// the rayon pool without changing the result.
#[cfg(feature = "parallel")]
pub fn generate_par(
    anchors: &[ScatterAnchor],
    params: &ScatterParams,
    seed: u64,
) -> Result<Vec<ScatterPlacement>, GeometryError> {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rayon::prelude::*;

    params.validate()?;
    let per_anchor: Vec<Vec<ScatterPlacement>> = anchors
        .par_iter()
        .enumerate()
        .map(|(i, anchor)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(i as u64);
            let mut out = Vec::new();
            params.placements_for(i, anchor, &mut rng, &mut out);
            out
        })
        .collect();
    Ok(per_anchor.into_iter().flatten().collect())
}
