//! The peach-blossom bonsai: an S-shaped trunk, five primary limbs and two
//! finer tiers, dressed with blossoms at the branch ends, sparser blossoms
//! along the limbs, and a few leaves.
//!
//! Everything here is plain data feeding the generic pipeline; the same tree
//! can be loaded from JSON via [`TreeConfig`](crate::tree::TreeConfig).

use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;

use crate::scatter::{Bounds, PhaseSeeds, RotationBounds, ScatterAnchor, ScatterParams};
use crate::skeleton::{BranchRole, BranchSpec, TreeSkeleton};

pub const TRUNK_THICKNESS: f32 = 0.1;
pub const TRUNK_TAPER: f32 = 0.45;
pub const PRIMARY_THICKNESS: f32 = 0.045;
pub const PRIMARY_TAPER: f32 = 0.35;
pub const SECONDARY_THICKNESS: f32 = 0.025;
pub const SECONDARY_TAPER: f32 = 0.4;
pub const TERTIARY_THICKNESS: f32 = 0.012;
pub const TERTIARY_TAPER: f32 = 0.5;

const TRUNK: &[[f32; 3]] = &[
    [0.0, -0.1, 0.0],
    [0.1, 0.3, 0.05],
    [-0.1, 0.6, 0.0],
    [0.15, 0.9, 0.05],
    [0.0, 1.2, 0.0],
];

const PRIMARY: &[&[[f32; 3]]] = &[
    // right
    &[[0.0, 1.0, 0.0], [0.3, 1.3, 0.1], [0.7, 1.5, 0.15], [1.1, 1.6, 0.1]],
    // left
    &[[0.0, 1.1, 0.0], [-0.25, 1.4, -0.1], [-0.6, 1.7, -0.05], [-0.95, 1.85, 0.0]],
    // leader
    &[[0.0, 1.2, 0.0], [0.1, 1.6, 0.05], [0.05, 2.0, 0.0], [0.0, 2.4, 0.0]],
    // front right
    &[[0.7, 1.5, 0.15], [0.9, 1.3, 0.35], [1.15, 1.2, 0.45]],
    // back left
    &[[-0.6, 1.7, -0.05], [-0.75, 2.0, -0.25], [-0.85, 2.25, -0.35]],
];

const SECONDARY: &[[[f32; 3]; 3]] = &[
    [[1.1, 1.6, 0.1], [1.3, 1.4, 0.2], [1.5, 1.25, 0.15]],
    [[1.1, 1.6, 0.1], [1.25, 1.75, 0.0], [1.35, 1.9, -0.1]],
    [[0.7, 1.5, 0.15], [0.85, 1.7, 0.25], [0.95, 1.9, 0.3]],
    [[-0.95, 1.85, 0.0], [-1.1, 1.7, 0.15], [-1.25, 1.55, 0.1]],
    [[-0.95, 1.85, 0.0], [-1.05, 2.05, 0.1], [-1.15, 2.2, 0.05]],
    [[-0.6, 1.7, -0.05], [-0.7, 1.55, 0.1], [-0.85, 1.4, 0.15]],
    [[0.05, 2.0, 0.0], [0.25, 2.15, 0.1], [0.45, 2.25, 0.15]],
    [[0.05, 2.0, 0.0], [-0.2, 2.2, -0.1], [-0.4, 2.35, -0.15]],
    [[0.0, 2.4, 0.0], [0.15, 2.55, 0.1], [0.25, 2.7, 0.05]],
    [[0.0, 2.4, 0.0], [-0.15, 2.6, -0.05], [-0.25, 2.75, 0.0]],
    [[0.3, 1.3, 0.1], [0.5, 1.15, 0.25], [0.7, 1.0, 0.35]],
    [[-0.25, 1.4, -0.1], [-0.45, 1.25, -0.2], [-0.65, 1.1, -0.15]],
    [[0.1, 1.6, 0.05], [0.35, 1.75, -0.1], [0.55, 1.85, -0.2]],
];

const TERTIARY: &[[[f32; 3]; 3]] = &[
    [[1.5, 1.25, 0.15], [1.6, 1.15, 0.25], [1.7, 1.05, 0.3]],
    [[1.35, 1.9, -0.1], [1.45, 2.0, -0.05], [1.55, 2.1, 0.0]],
    [[-1.25, 1.55, 0.1], [-1.35, 1.45, 0.2], [-1.45, 1.35, 0.25]],
    [[-1.15, 2.2, 0.05], [-1.25, 2.3, 0.15], [-1.3, 2.4, 0.2]],
    [[0.45, 2.25, 0.15], [0.55, 2.35, 0.2], [0.6, 2.45, 0.25]],
    [[-0.4, 2.35, -0.15], [-0.5, 2.45, -0.2], [-0.55, 2.55, -0.25]],
    [[0.25, 2.7, 0.05], [0.3, 2.8, 0.1], [0.32, 2.9, 0.08]],
    [[-0.25, 2.75, 0.0], [-0.3, 2.85, 0.05], [-0.28, 2.95, 0.02]],
    [[0.95, 1.9, 0.3], [1.05, 2.0, 0.35], [1.1, 2.1, 0.4]],
    [[-0.85, 2.25, -0.35], [-0.95, 2.35, -0.4], [-1.0, 2.45, -0.45]],
    [[0.7, 1.0, 0.35], [0.8, 0.9, 0.4], [0.9, 0.85, 0.45]],
    [[-0.65, 1.1, -0.15], [-0.75, 1.0, -0.2], [-0.85, 0.95, -0.25]],
];

/// Dense blossom clusters: every tertiary tip plus six secondary tips.
const BRANCH_ENDS: &[[f32; 3]] = &[
    [1.7, 1.05, 0.3],
    [1.55, 2.1, 0.0],
    [1.1, 2.1, 0.4],
    [-1.45, 1.35, 0.25],
    [-1.3, 2.4, 0.2],
    [-1.0, 2.45, -0.45],
    [0.6, 2.45, 0.25],
    [-0.55, 2.55, -0.25],
    [0.32, 2.9, 0.08],
    [-0.28, 2.95, 0.02],
    [0.9, 0.85, 0.45],
    [-0.85, 0.95, -0.25],
    [1.5, 1.25, 0.15],
    [-1.25, 1.55, 0.1],
    [0.95, 1.9, 0.3],
    [-0.85, 2.25, -0.35],
    [0.55, 1.85, -0.2],
    [-0.7, 1.55, 0.1],
];

/// Sparse clusters at the forks of the primary limbs.
const MID_POINTS: &[[f32; 3]] = &[
    [1.1, 1.6, 0.1],
    [-0.95, 1.85, 0.0],
    [0.05, 2.0, 0.0],
    [0.0, 2.4, 0.0],
    [0.7, 1.5, 0.15],
    [-0.6, 1.7, -0.05],
    [0.45, 2.25, 0.15],
    [-0.4, 2.35, -0.15],
    [0.3, 1.3, 0.1],
    [-0.25, 1.4, -0.1],
    [0.1, 1.6, 0.05],
];

/// Slightly inboard of the blossom clusters.
const LEAF_POINTS: &[[f32; 3]] = &[
    [1.6, 1.1, 0.28],
    [1.5, 2.05, -0.05],
    [1.05, 2.05, 0.38],
    [-1.4, 1.4, 0.22],
    [-1.25, 2.35, 0.18],
    [-0.95, 2.4, -0.42],
    [0.55, 2.4, 0.22],
    [-0.5, 2.5, -0.22],
    [0.28, 2.85, 0.08],
    [-0.25, 2.9, 0.03],
    [0.85, 0.88, 0.42],
    [-0.8, 0.98, -0.22],
    [1.45, 1.2, 0.18],
    [-1.2, 1.5, 0.12],
    [0.9, 1.85, 0.32],
    [-0.8, 2.2, -0.32],
    [0.5, 1.8, -0.18],
    [-0.65, 1.5, 0.12],
];

fn polyline(points: &[[f32; 3]]) -> Vec<Vec3> {
    points.iter().copied().map(Vec3::from_array).collect()
}

pub fn trunk_points() -> Vec<Vec3> {
    polyline(TRUNK)
}

pub fn skeleton() -> TreeSkeleton {
    let mut branches = vec![BranchSpec::new(
        BranchRole::Trunk,
        trunk_points(),
        TRUNK_THICKNESS,
        TRUNK_TAPER,
    )];
    branches.extend(PRIMARY.iter().map(|pts| {
        BranchSpec::new(BranchRole::Primary, polyline(pts), PRIMARY_THICKNESS, PRIMARY_TAPER)
    }));
    branches.extend(SECONDARY.iter().map(|pts| {
        BranchSpec::new(
            BranchRole::Secondary,
            polyline(pts),
            SECONDARY_THICKNESS,
            SECONDARY_TAPER,
        )
    }));
    branches.extend(TERTIARY.iter().map(|pts| {
        BranchSpec::new(
            BranchRole::Tertiary,
            polyline(pts),
            TERTIARY_THICKNESS,
            TERTIARY_TAPER,
        )
    }));
    TreeSkeleton::new(branches)
}

pub fn branch_end_anchors() -> Vec<ScatterAnchor> {
    ScatterAnchor::from_positions(BRANCH_ENDS.iter().copied().map(Vec3::from_array))
}

pub fn mid_branch_anchors() -> Vec<ScatterAnchor> {
    ScatterAnchor::from_positions(MID_POINTS.iter().copied().map(Vec3::from_array))
}

pub fn leaf_anchors() -> Vec<ScatterAnchor> {
    ScatterAnchor::from_positions(LEAF_POINTS.iter().copied().map(Vec3::from_array))
}

/// Dense tier at branch ends: 8–13 blossoms each.
pub const TIP_BLOSSOMS: ScatterParams = ScatterParams {
    count: Bounds::new(8, 13),
    jitter: Vec3::new(0.125, 0.1, 0.125),
    scale: Bounds::new(0.7, 1.2),
    rotation: RotationBounds::upright(0.4),
    phase: PhaseSeeds::new(0.3, 0.15),
};

/// Sparse tier along the limbs: 5–8 smaller blossoms, yaw in `[0, 2π]`.
pub const MID_BLOSSOMS: ScatterParams = ScatterParams {
    count: Bounds::new(5, 8),
    jitter: Vec3::new(0.1, 0.075, 0.1),
    scale: Bounds::new(0.6, 1.0),
    rotation: RotationBounds {
        x: Bounds::symmetric(0.3),
        y: Bounds::new(0.0, TAU),
        z: Bounds::symmetric(0.3),
    },
    phase: PhaseSeeds::new(0.2, 0.1),
};

/// 2–4 leaves per point. Leaves are not animated, so their phase is zero.
pub const LEAVES: ScatterParams = ScatterParams {
    count: Bounds::new(2, 4),
    jitter: Vec3::new(0.05, 0.04, 0.05),
    scale: Bounds::fixed(1.0),
    rotation: RotationBounds {
        x: Bounds::new(0.0, 0.5),
        y: Bounds::new(0.0, TAU),
        z: Bounds::symmetric(FRAC_PI_2),
    },
    phase: PhaseSeeds::new(0.0, 0.0),
};
