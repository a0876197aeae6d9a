//! Catmull-Rom resampling of sparse control polylines.
//!
//! Branches are authored as a handful of control points. [`CurveSampler`]
//! turns them into a dense, uniformly parameterized [`SampledCurve`] that
//! passes through every control point and ends exactly on the first and last
//! one. Curves are always open: the missing neighbours at the two ends are
//! extrapolated by reflecting the adjacent control point.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, InvalidCurve};

/// Squared distance under which two consecutive control points are merged.
const DUPLICATE_EPSILON_SQ: f32 = 1e-12;

/// Knot intervals shorter than this are replaced by a neighbouring interval.
const KNOT_EPSILON: f32 = 1e-4;

/// How knot spacing is derived from control point distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveType {
    /// Equal knot spacing, tension 0.5.
    Uniform,
    /// Knot spacing `|d|^0.5`. Never cusps or self-intersects within a span.
    #[default]
    Centripetal,
    /// Knot spacing `|d|`.
    Chordal,
}

/// An ordered list of 3D points densely sampled along a curve.
///
/// Sample `i` sits at parameter `t = i / segments()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    points: Vec<Vec3>,
}

impl SampledCurve {
    /// Wraps pre-sampled positions, e.g. from an external tool or a test.
    pub fn from_points(points: Vec<Vec3>) -> Result<Self, GeometryError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(InvalidCurve::NonFinitePoint { index }.into());
        }
        if points.len() < 2 {
            return Err(InvalidCurve::TooFewPoints {
                distinct: points.len(),
            }
            .into());
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of spans between samples (`len() - 1`).
    pub fn segments(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Parameter value of sample `index`.
    pub fn t_at(&self, index: usize) -> f32 {
        index as f32 / self.segments().max(1) as f32
    }

    pub fn first(&self) -> Vec3 {
        self.points[0]
    }

    pub fn last(&self) -> Vec3 {
        self.points[self.points.len() - 1]
    }

    /// Sum of the straight-line distances between consecutive samples.
    pub fn arc_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CurveSampler {
    curve_type: CurveType,
}

impl CurveSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    /// Samples `segments + 1` points at uniform parameter steps over the whole
    /// curve through `control_points`.
    pub fn sample(
        &self,
        control_points: &[Vec3],
        segments: u32,
    ) -> Result<SampledCurve, GeometryError> {
        if segments < 1 {
            return Err(InvalidCurve::NoSegments.into());
        }
        if let Some(index) = control_points.iter().position(|p| !p.is_finite()) {
            return Err(InvalidCurve::NonFinitePoint { index }.into());
        }

        let points = dedup_consecutive(control_points);
        if points.len() < 2 {
            return Err(InvalidCurve::TooFewPoints {
                distinct: points.len(),
            }
            .into());
        }

        let samples = (0..=segments)
            .map(|i| self.point_at(&points, i as f32 / segments as f32))
            .collect();

        Ok(SampledCurve { points: samples })
    }

    /// Evaluates the curve at `t` in `[0, 1]`. `points` must hold at least 2
    /// entries with no consecutive duplicates.
    fn point_at(&self, points: &[Vec3], t: f32) -> Vec3 {
        let n = points.len();
        let p = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut span = p.floor() as usize;
        let mut weight = p - span as f32;

        if span >= n - 1 {
            span = n - 2;
            weight = 1.0;
        }

        let p1 = points[span];
        let p2 = points[span + 1];
        let p0 = if span > 0 {
            points[span - 1]
        } else {
            // Reflect the second point through the first.
            p1 * 2.0 - p2
        };
        let p3 = if span + 2 < n {
            points[span + 2]
        } else {
            p2 * 2.0 - p1
        };

        let (m1, m2) = match self.curve_type {
            CurveType::Uniform => ((p2 - p0) * 0.5, (p3 - p1) * 0.5),
            CurveType::Centripetal => nonuniform_tangents(p0, p1, p2, p3, 0.25),
            CurveType::Chordal => nonuniform_tangents(p0, p1, p2, p3, 0.5),
        };

        hermite(p1, p2, m1, m2, weight)
    }
}

/// Drops points that coincide with their predecessor, always keeping the
/// final control point so the curve still ends there.
fn dedup_consecutive(points: &[Vec3]) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last_mut() {
            Some(last) if last.distance_squared(p) <= DUPLICATE_EPSILON_SQ => *last = p,
            _ => out.push(p),
        }
    }
    out
}

/// Hermite tangents (scaled to the middle span) for a non-uniform
/// Catmull-Rom segment. `power` is applied to the squared distance, so 0.25
/// is centripetal and 0.5 is chordal.
fn nonuniform_tangents(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, power: f32) -> (Vec3, Vec3) {
    let mut dt0 = p0.distance_squared(p1).powf(power);
    let mut dt1 = p1.distance_squared(p2).powf(power);
    let mut dt2 = p2.distance_squared(p3).powf(power);

    if dt1 < KNOT_EPSILON {
        dt1 = 1.0;
    }
    if dt0 < KNOT_EPSILON {
        dt0 = dt1;
    }
    if dt2 < KNOT_EPSILON {
        dt2 = dt1;
    }

    let m1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
    let m2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;

    (m1 * dt1, m2 * dt1)
}

fn hermite(p1: Vec3, p2: Vec3, m1: Vec3, m2: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let c2 = p1 * -3.0 + p2 * 3.0 - m1 * 2.0 - m2;
    let c3 = p1 * 2.0 - p2 * 2.0 + m1 + m2;
    p1 + m1 * t + c2 * t2 + c3 * t3
}
