//! Tapered tube extrusion along a sampled curve.
//!
//! One ring of `radial_segments + 1` vertices is emitted per curve sample
//! (the first column is duplicated at the end so `u` can run from 0 to 1
//! without wrapping), then consecutive rings are stitched with two triangles
//! per quad.

use bevy::log::debug;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{CurveSampler, CurveType, SampledCurve};
use crate::error::{GeometryError, InvalidCurve, InvalidMeshParams};
use crate::frames::{Frame, compute_frames};
use crate::mesh::MeshBuffers;
use crate::profile::RadiusProfile;

/// A triangulated tube around one branch curve.
///
/// Vertex `(i, j)` (ring `i`, column `j`) lives at index
/// `i * (radial_segments + 1) + j`.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeMesh {
    buffers: MeshBuffers,
    length_segments: u32,
    radial_segments: u32,
}

impl TubeMesh {
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    pub fn into_buffers(self) -> MeshBuffers {
        self.buffers
    }

    pub fn length_segments(&self) -> u32 {
        self.length_segments
    }

    pub fn radial_segments(&self) -> u32 {
        self.radial_segments
    }

    pub fn ring_len(&self) -> usize {
        self.radial_segments as usize + 1
    }

    /// Vertices of ring `i`, seam column included, or `None` past the last
    /// ring.
    pub fn ring(&self, i: usize) -> Option<&[Vec3]> {
        let len = self.ring_len();
        self.buffers.positions.get(i * len..(i + 1) * len)
    }

    pub fn vertex_count(&self) -> usize {
        self.buffers.vertex_count()
    }

    pub fn index_count(&self) -> usize {
        self.buffers.indices.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.buffers.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.buffers.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.buffers.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.buffers.indices
    }

    pub fn to_mesh(&self) -> Mesh {
        self.buffers.to_mesh()
    }
}

impl From<TubeMesh> for Mesh {
    fn from(tube: TubeMesh) -> Self {
        tube.to_mesh()
    }
}

pub struct TubeMeshBuilder {
    radial_segments: u32,
}

impl Default for TubeMeshBuilder {
    fn default() -> Self {
        Self { radial_segments: 8 }
    }
}

impl TubeMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices around each ring (excluding the seam duplicate). Values below
    /// 3 are rejected by [`build`](Self::build).
    pub fn with_radial_segments(mut self, radial_segments: u32) -> Self {
        self.radial_segments = radial_segments;
        self
    }

    /// Extrudes a ring of radius `profile.radius_at(t)` around every sample of
    /// `curve`, oriented by the matching entry of `frames`.
    pub fn build(
        &self,
        curve: &SampledCurve,
        frames: &[Frame],
        profile: &impl RadiusProfile,
    ) -> Result<TubeMesh, GeometryError> {
        let res = self.radial_segments;
        if res < 3 {
            return Err(InvalidMeshParams::TooFewRadialSegments(res).into());
        }
        if curve.segments() < 1 {
            return Err(InvalidMeshParams::NoLengthSegments.into());
        }
        if frames.len() != curve.len() {
            return Err(InvalidCurve::FrameCountMismatch {
                samples: curve.len(),
                frames: frames.len(),
            }
            .into());
        }

        let radii = (0..curve.len())
            .map(|i| {
                let t = curve.t_at(i);
                let radius = profile.radius_at(t);
                if radius.is_finite() && radius > 0.0 {
                    Ok(radius)
                } else {
                    Err(InvalidMeshParams::NonPositiveRadius { t, radius })
                }
            })
            .collect::<Result<Vec<f32>, _>>()?;

        let ring_len = res as usize + 1;
        let segments = curve.segments();
        let mut data =
            MeshBuffers::with_capacity(curve.len() * ring_len, segments * res as usize * 6);

        for (i, (&center, frame)) in curve.points().iter().zip(frames).enumerate() {
            Self::add_ring(&mut data, center, frame, radii[i], curve.t_at(i), res);
        }

        for i in 0..segments {
            let bottom = (i * ring_len) as u32;
            Self::connect_rings(&mut data, bottom, bottom + ring_len as u32, res);
        }

        data.compute_area_weighted_normals();
        Self::weld_seam_normals(&mut data, ring_len);

        debug!(
            "built tube: {} rings x {} columns, {} triangles",
            curve.len(),
            ring_len,
            data.triangle_count()
        );

        Ok(TubeMesh {
            buffers: data,
            length_segments: segments as u32,
            radial_segments: res,
        })
    }

    fn add_ring(
        data: &mut MeshBuffers,
        center: Vec3,
        frame: &Frame,
        radius: f32,
        v: f32,
        res: u32,
    ) {
        for j in 0..=res {
            let u = j as f32 / res as f32;
            let theta = u * std::f32::consts::TAU;
            data.positions.push(center + frame.radial(theta) * radius);
            data.uvs.push([u, v]);
        }
    }

    /// Two triangles per quad, counter-clockwise seen from outside the tube.
    fn connect_rings(data: &mut MeshBuffers, bottom_start: u32, top_start: u32, res: u32) {
        for j in 0..res {
            let bottom_curr = bottom_start + j;
            let bottom_next = bottom_start + j + 1;
            let top_curr = top_start + j;
            let top_next = top_start + j + 1;

            data.indices.push(bottom_curr);
            data.indices.push(bottom_next);
            data.indices.push(top_curr);

            data.indices.push(bottom_next);
            data.indices.push(top_next);
            data.indices.push(top_curr);
        }
    }

    /// The first and last column of each ring share positions but not
    /// triangles; give both the combined normal so the seam is invisible.
    fn weld_seam_normals(data: &mut MeshBuffers, ring_len: usize) {
        for ring_start in (0..data.normals.len()).step_by(ring_len) {
            let first = ring_start;
            let last = ring_start + ring_len - 1;
            let shared = (data.normals[first] + data.normals[last]).normalize_or_zero();
            data.normals[first] = shared;
            data.normals[last] = shared;
        }
    }
}

/// Resolution and curve style shared by every branch of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TubeSettings {
    /// Spans along each branch; each branch gets `length_segments + 1` rings.
    pub length_segments: u32,
    pub radial_segments: u32,
    pub curve_type: CurveType,
}

impl Default for TubeSettings {
    fn default() -> Self {
        Self {
            length_segments: 32,
            radial_segments: 8,
            curve_type: CurveType::Centripetal,
        }
    }
}

impl TubeSettings {
    /// Runs the full pipeline for one control polyline: sample, transport
    /// frames, extrude.
    pub fn build_tube(
        &self,
        control_points: &[Vec3],
        profile: &impl RadiusProfile,
    ) -> Result<TubeMesh, GeometryError> {
        let curve = CurveSampler::new()
            .with_curve_type(self.curve_type)
            .sample(control_points, self.length_segments)?;
        let frames = compute_frames(&curve)?;
        TubeMeshBuilder::new()
            .with_radial_segments(self.radial_segments)
            .build(&curve, &frames, profile)
    }
}
