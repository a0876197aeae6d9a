//! Procedural ornamental tree geometry for Bevy.
//!
//! This crate turns a handful of hand-authored control polylines into tapered
//! branch meshes, and scatters blossoms and leaves around anchor points on the
//! resulting skeleton.
//!
//! # Features
//!
//! - **Curve sampling**: Catmull-Rom resampling of sparse control points via
//!   [`CurveSampler`] (uniform, centripetal or chordal).
//! - **Frame transport**: twist-free rotation-minimizing frames via
//!   [`compute_frames`].
//! - **Tube meshing**: tapered tubes with UVs and area-weighted normals via
//!   [`TubeMeshBuilder`], convertible into a Bevy [`Mesh`](bevy::prelude::Mesh).
//! - **Skeletons**: flat, JSON-loadable branch tables via [`TreeSkeleton`].
//! - **Scatter**: seeded, clustered placements via [`scatter::generate`].
//! - **Decorations**: flat blossom and leaf meshes via [`decoration`].
//! - **Presets**: the peach-blossom bonsai via [`preset`] and
//!   [`TreeConfig::default`].
//!
//! # Feature Flags
//!
//! - `parallel` (default): rayon-backed [`TreeSkeleton::build_meshes_par`] and
//!   [`scatter::generate_par`].
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_bonsai::{DecorationKind, TreeConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! fn spawn_tree(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut materials: ResMut<Assets<StandardMaterial>>,
//! ) {
//!     let mut rng = ChaCha8Rng::seed_from_u64(7);
//!     let tree = TreeConfig::default().generate(&mut rng).unwrap();
//!
//!     let bark = materials.add(Color::srgb(0.36, 0.25, 0.22));
//!     for branch in &tree.branches {
//!         commands.spawn((
//!             Mesh3d(meshes.add(branch.mesh.to_mesh())),
//!             MeshMaterial3d(bark.clone()),
//!         ));
//!     }
//!
//!     let blossom = meshes.add(DecorationKind::Blossom.mesh().to_mesh());
//!     let petal = materials.add(Color::srgb(1.0, 0.71, 0.76));
//!     for placement in tree.placements_of(DecorationKind::Blossom) {
//!         commands.spawn((
//!             Mesh3d(blossom.clone()),
//!             MeshMaterial3d(petal.clone()),
//!             placement.transform(),
//!         ));
//!     }
//! }
//! ```

pub mod curve;
pub mod decoration;
pub mod error;
pub mod frames;
pub mod mesh;
pub mod preset;
pub mod profile;
pub mod scatter;
pub mod skeleton;
pub mod tree;
pub mod tube;

pub use curve::{CurveSampler, CurveType, SampledCurve};
pub use error::GeometryError;
pub use frames::{Frame, compute_frames};
pub use mesh::MeshBuffers;
pub use profile::{LinearTaper, RadiusProfile};
pub use scatter::{ScatterAnchor, ScatterParams, ScatterPlacement};
pub use skeleton::{BranchMesh, BranchRole, BranchSpec, TreeSkeleton};
pub use tree::{ConfigError, DecorationKind, TreeConfig, TreeGeometry};
pub use tube::{TubeMesh, TubeMeshBuilder, TubeSettings};

/// Re-exports of the rand crates used for seeding, for version compatibility.
pub use rand;
pub use rand_chacha;
