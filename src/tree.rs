//! Whole-tree assembly: skeleton meshes plus every scatter layer.

use bevy::log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decoration::{BlossomShape, LensShape};
use crate::error::GeometryError;
use crate::mesh::MeshBuffers;
use crate::preset;
use crate::scatter::{self, ScatterAnchor, ScatterParams, ScatterPlacement};
use crate::skeleton::{BranchMesh, TreeSkeleton};
use crate::tube::TubeSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse tree config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] GeometryError),
}

/// What a scatter layer places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationKind {
    Blossom,
    Leaf,
}

impl DecorationKind {
    /// Mesh to instance at every placement of this kind.
    pub fn mesh(&self) -> MeshBuffers {
        match self {
            DecorationKind::Blossom => BlossomShape::default().mesh(),
            DecorationKind::Leaf => LensShape::LEAF.mesh(),
        }
    }
}

/// One scatter pass: a set of anchors and the tier parameters used for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterLayer {
    pub name: String,
    pub kind: DecorationKind,
    pub anchors: Vec<ScatterAnchor>,
    pub params: ScatterParams,
}

impl ScatterLayer {
    pub fn new(
        name: impl Into<String>,
        kind: DecorationKind,
        anchors: Vec<ScatterAnchor>,
        params: ScatterParams,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            anchors,
            params,
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<ScatterPlacement>, GeometryError> {
        scatter::generate(&self.anchors, &self.params, rng)
    }
}

/// Everything needed to produce one tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default)]
    pub tube: TubeSettings,
    pub skeleton: TreeSkeleton,
    #[serde(default)]
    pub layers: Vec<ScatterLayer>,
}

impl Default for TreeConfig {
    /// The peach-blossom bonsai.
    fn default() -> Self {
        Self {
            tube: TubeSettings::default(),
            skeleton: preset::skeleton(),
            layers: vec![
                ScatterLayer::new(
                    "tip_blossoms",
                    DecorationKind::Blossom,
                    preset::branch_end_anchors(),
                    preset::TIP_BLOSSOMS,
                ),
                ScatterLayer::new(
                    "mid_blossoms",
                    DecorationKind::Blossom,
                    preset::mid_branch_anchors(),
                    preset::MID_BLOSSOMS,
                ),
                ScatterLayer::new(
                    "leaves",
                    DecorationKind::Leaf,
                    preset::leaf_anchors(),
                    preset::LEAVES,
                ),
            ],
        }
    }
}

impl TreeConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        self.skeleton.validate()?;
        for layer in &self.layers {
            layer.params.validate()?;
        }
        Ok(())
    }

    /// Validates, builds every branch mesh, then scatters each layer in order
    /// from `rng`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TreeGeometry, GeometryError> {
        self.validate()?;
        let branches = self.skeleton.build_meshes(&self.tube)?;
        let layers = self
            .layers
            .iter()
            .map(|layer| {
                Ok(LayerPlacements {
                    name: layer.name.clone(),
                    kind: layer.kind,
                    placements: layer.generate(rng)?,
                })
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;

        debug!(
            "generated tree: {} branches, {} placements",
            branches.len(),
            layers.iter().map(|l| l.placements.len()).sum::<usize>()
        );
        Ok(TreeGeometry { branches, layers })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerPlacements {
    pub name: String,
    pub kind: DecorationKind,
    pub placements: Vec<ScatterPlacement>,
}

/// Output of [`TreeConfig::generate`], ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeGeometry {
    pub branches: Vec<BranchMesh>,
    pub layers: Vec<LayerPlacements>,
}

impl TreeGeometry {
    pub fn placements_of(&self, kind: DecorationKind) -> impl Iterator<Item = &ScatterPlacement> {
        self.layers
            .iter()
            .filter(move |l| l.kind == kind)
            .flat_map(|l| l.placements.iter())
    }

    pub fn total_vertices(&self) -> usize {
        self.branches.iter().map(|b| b.mesh.vertex_count()).sum()
    }
}
