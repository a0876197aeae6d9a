//! Branch skeleton configuration.
//!
//! A tree is a flat list of [`BranchSpec`] records, each tagged with its
//! [`BranchRole`]. There is no parent/child structure: branches simply start
//! where their parent passes, which is enough for rendering and lets the table
//! come from JSON, a generator, or a test fixture.

use bevy::log::{debug, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, InvalidSkeleton};
use crate::profile::LinearTaper;
use crate::scatter::ScatterAnchor;
use crate::tube::{TubeMesh, TubeSettings};

/// Structural tier of a branch, from heaviest to lightest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchRole {
    Trunk,
    Primary,
    Secondary,
    Tertiary,
}

impl BranchRole {
    pub const ALL: &'static [BranchRole] = &[
        BranchRole::Trunk,
        BranchRole::Primary,
        BranchRole::Secondary,
        BranchRole::Tertiary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BranchRole::Trunk => "trunk",
            BranchRole::Primary => "primary",
            BranchRole::Secondary => "secondary",
            BranchRole::Tertiary => "tertiary",
        }
    }
}

/// One branch: a control polyline plus its radius profile parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSpec {
    pub role: BranchRole,
    pub points: Vec<Vec3>,
    /// Radius at the root of the branch.
    pub thickness: f32,
    /// Tip radius as a fraction of `thickness`, in `(0, 1]`.
    pub taper: f32,
}

impl BranchSpec {
    pub fn new(role: BranchRole, points: Vec<Vec3>, thickness: f32, taper: f32) -> Self {
        Self {
            role,
            points,
            thickness,
            taper,
        }
    }

    pub fn profile(&self) -> Result<LinearTaper, GeometryError> {
        LinearTaper::new(self.thickness, self.taper)
    }

    pub fn tip_radius(&self) -> f32 {
        self.thickness * self.taper
    }

    pub fn tip(&self) -> Option<Vec3> {
        self.points.last().copied()
    }

    /// Middle control point (the later one for even counts).
    pub fn midpoint(&self) -> Option<Vec3> {
        self.points.get(self.points.len() / 2).copied()
    }

    pub fn build(&self, settings: &TubeSettings) -> Result<TubeMesh, GeometryError> {
        settings.build_tube(&self.points, &self.profile()?)
    }
}

/// Generated tube for one entry of a [`TreeSkeleton`].
#[derive(Debug, Clone, PartialEq)]
pub struct BranchMesh {
    /// Position of the source record in [`TreeSkeleton::branches`].
    pub index: usize,
    pub role: BranchRole,
    pub mesh: TubeMesh,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeSkeleton {
    pub branches: Vec<BranchSpec>,
}

impl TreeSkeleton {
    pub fn new(branches: Vec<BranchSpec>) -> Self {
        Self { branches }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn with_role(&self, role: BranchRole) -> impl Iterator<Item = &BranchSpec> + '_ {
        self.branches.iter().filter(move |b| b.role == role)
    }

    /// Checks every radius profile and the structural hierarchy: for each
    /// pair of consecutive populated tiers, every branch of the lighter tier
    /// must have a smaller base thickness and a smaller tip radius than every
    /// branch of the heavier tier.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (index, branch) in self.branches.iter().enumerate() {
            if let Err(GeometryError::InvalidMeshParams(source)) = branch.profile() {
                return Err(InvalidSkeleton::Branch {
                    index,
                    role: branch.role,
                    source,
                }
                .into());
            }
        }

        let populated: Vec<BranchRole> = BranchRole::ALL
            .iter()
            .copied()
            .filter(|role| self.with_role(*role).next().is_some())
            .collect();

        for pair in populated.windows(2) {
            let (outer, inner) = (pair[0], pair[1]);
            self.check_decreasing(outer, inner, "thickness", |b| b.thickness)?;
            self.check_decreasing(outer, inner, "tip radius", BranchSpec::tip_radius)?;
        }
        Ok(())
    }

    fn check_decreasing(
        &self,
        outer: BranchRole,
        inner: BranchRole,
        measure: &'static str,
        value: impl Fn(&BranchSpec) -> f32,
    ) -> Result<(), GeometryError> {
        let outer_value = self.with_role(outer).map(&value).fold(f32::INFINITY, f32::min);
        let inner_value = self.with_role(inner).map(&value).fold(0.0, f32::max);
        if inner_value < outer_value {
            Ok(())
        } else {
            Err(InvalidSkeleton::HierarchyViolation {
                outer,
                inner,
                measure,
                outer_value,
                inner_value,
            }
            .into())
        }
    }

    /// Builds every branch, stopping at the first malformed one.
    pub fn build_meshes(&self, settings: &TubeSettings) -> Result<Vec<BranchMesh>, GeometryError> {
        let meshes = self
            .branches
            .iter()
            .enumerate()
            .map(|(index, branch)| Self::build_branch(index, branch, settings))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("built {} branch meshes", meshes.len());
        Ok(meshes)
    }

    /// Builds every branch, logging and skipping the ones that fail.
    pub fn build_meshes_lenient(&self, settings: &TubeSettings) -> Vec<BranchMesh> {
        self.branches
            .iter()
            .enumerate()
            .filter_map(|(index, branch)| match Self::build_branch(index, branch, settings) {
                Ok(mesh) => Some(mesh),
                Err(err) => {
                    warn!("skipping {} branch {index}: {err}", branch.role.name());
                    None
                }
            })
            .collect()
    }

    /// Same output as [`build_meshes`](Self::build_meshes), with branches built
    /// on the rayon thread pool.
    #[cfg(feature = "parallel")]
    pub fn build_meshes_par(
        &self,
        settings: &TubeSettings,
    ) -> Result<Vec<BranchMesh>, GeometryError> {
        use rayon::prelude::*;

        self.branches
            .par_iter()
            .enumerate()
            .map(|(index, branch)| Self::build_branch(index, branch, settings))
            .collect()
    }

    fn build_branch(
        index: usize,
        branch: &BranchSpec,
        settings: &TubeSettings,
    ) -> Result<BranchMesh, GeometryError> {
        Ok(BranchMesh {
            index,
            role: branch.role,
            mesh: branch.build(settings)?,
        })
    }

    /// One anchor at the tip of every branch of `role`; the cluster id is the
    /// branch index.
    pub fn tip_anchors(&self, role: BranchRole) -> Vec<ScatterAnchor> {
        self.anchors_by(role, BranchSpec::tip)
    }

    /// One anchor at the middle control point of every branch of `role`.
    pub fn mid_anchors(&self, role: BranchRole) -> Vec<ScatterAnchor> {
        self.anchors_by(role, BranchSpec::midpoint)
    }

    fn anchors_by(
        &self,
        role: BranchRole,
        pick: impl Fn(&BranchSpec) -> Option<Vec3>,
    ) -> Vec<ScatterAnchor> {
        self.branches
            .iter()
            .enumerate()
            .filter(|(_, b)| b.role == role)
            .filter_map(|(i, b)| pick(b).map(|p| ScatterAnchor::new(p, i as u32)))
            .collect()
    }
}
