use bevy::prelude::*;
use bevy_bonsai::error::{InvalidMeshParams, InvalidSkeleton};
use bevy_bonsai::preset;
use bevy_bonsai::{
    BranchRole, BranchSpec, GeometryError, RadiusProfile, TreeSkeleton, TubeSettings,
};

fn synthetic_skeleton() -> TreeSkeleton {
    TreeSkeleton::new(vec![
        BranchSpec::new(BranchRole::Trunk, vec![Vec3::ZERO, Vec3::Y], 0.2, 0.5),
        BranchSpec::new(
            BranchRole::Primary,
            vec![Vec3::Y * 0.8, Vec3::new(0.5, 1.2, 0.0), Vec3::new(1.0, 1.3, 0.0)],
            0.08,
            0.5,
        ),
    ])
}

#[test]
fn test_preset_composition() {
    let skeleton = preset::skeleton();
    assert_eq!(skeleton.with_role(BranchRole::Trunk).count(), 1);
    assert_eq!(skeleton.with_role(BranchRole::Primary).count(), 5);
    assert_eq!(skeleton.with_role(BranchRole::Secondary).count(), 13);
    assert_eq!(skeleton.with_role(BranchRole::Tertiary).count(), 12);
    assert_eq!(skeleton.len(), 31);
    skeleton.validate().expect("Preset skeleton should be valid");
}

#[test]
fn test_preset_radii_decrease_by_tier() {
    let skeleton = preset::skeleton();
    let mut previous: Option<(f32, f32)> = None;
    for role in BranchRole::ALL {
        let branch = skeleton.with_role(*role).next().unwrap();
        let profile = branch.profile().unwrap();
        let (base, tip) = (profile.radius_at(0.0), profile.radius_at(1.0));
        assert!(base > tip, "{role:?} should taper");
        if let Some((prev_base, prev_tip)) = previous {
            assert!(base < prev_base, "{role:?} base should be thinner");
            assert!(tip < prev_tip, "{role:?} tip should be thinner");
        }
        previous = Some((base, tip));
    }
}

#[test]
fn test_radius_profile_is_monotonic() {
    for branch in &preset::skeleton().branches {
        let profile = branch.profile().unwrap();
        let mut last = f32::INFINITY;
        for i in 0..=100 {
            let r = profile.radius_at(i as f32 / 100.0);
            assert!(r > 0.0);
            assert!(r <= last, "Radius increased along {:?}", branch.role);
            last = r;
        }
    }
}

#[test]
fn test_build_all_preset_meshes() {
    let settings = TubeSettings::default();
    let meshes = preset::skeleton().build_meshes(&settings).unwrap();
    assert_eq!(meshes.len(), 31);
    for (i, m) in meshes.iter().enumerate() {
        assert_eq!(m.index, i);
        assert_eq!(m.mesh.vertex_count(), 33 * 9);
        assert_eq!(m.mesh.index_count(), 32 * 8 * 6);
    }
    assert_eq!(meshes[0].role, BranchRole::Trunk);
    assert_eq!(meshes[30].role, BranchRole::Tertiary);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_build_matches_sequential() {
    let settings = TubeSettings {
        length_segments: 12,
        radial_segments: 5,
        ..default()
    };
    let skeleton = preset::skeleton();
    let sequential = skeleton.build_meshes(&settings).unwrap();
    let parallel = skeleton.build_meshes_par(&settings).unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_malformed_branch_fails_fast_or_is_skipped() {
    let mut skeleton = synthetic_skeleton();
    skeleton.branches.push(BranchSpec::new(
        BranchRole::Secondary,
        vec![Vec3::ONE, Vec3::ONE],
        0.02,
        0.5,
    ));
    skeleton.branches.push(BranchSpec::new(
        BranchRole::Secondary,
        vec![Vec3::ONE, Vec3::new(1.0, 1.5, 1.0)],
        0.02,
        0.5,
    ));
    let settings = TubeSettings::default();

    assert!(matches!(
        skeleton.build_meshes(&settings),
        Err(GeometryError::InvalidCurve(_))
    ));

    let built = skeleton.build_meshes_lenient(&settings);
    let indices: Vec<usize> = built.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 1, 3]);
}

#[test]
fn test_bad_taper_is_reported_per_branch() {
    let mut skeleton = synthetic_skeleton();
    skeleton.branches[1].taper = 1.5;
    assert_eq!(
        skeleton.validate(),
        Err(GeometryError::InvalidSkeleton(InvalidSkeleton::Branch {
            index: 1,
            role: BranchRole::Primary,
            source: InvalidMeshParams::TaperOutOfRange(1.5),
        }))
    );
}

#[test]
fn test_hierarchy_violation() {
    let mut skeleton = synthetic_skeleton();
    skeleton.branches[1].thickness = 0.3;
    match skeleton.validate() {
        Err(GeometryError::InvalidSkeleton(InvalidSkeleton::HierarchyViolation {
            outer,
            inner,
            measure,
            ..
        })) => {
            assert_eq!(outer, BranchRole::Trunk);
            assert_eq!(inner, BranchRole::Primary);
            assert_eq!(measure, "thickness");
        }
        other => panic!("Expected hierarchy violation, got {other:?}"),
    }
}

#[test]
fn test_hierarchy_skips_missing_tiers() {
    // Trunk straight to tertiary is fine as long as it gets thinner.
    let skeleton = TreeSkeleton::new(vec![
        BranchSpec::new(BranchRole::Trunk, vec![Vec3::ZERO, Vec3::Y], 0.1, 0.5),
        BranchSpec::new(BranchRole::Tertiary, vec![Vec3::Y, Vec3::ONE], 0.01, 0.5),
    ]);
    assert_eq!(skeleton.validate(), Ok(()));
}

#[test]
fn test_json_round_trip_drives_pipeline() {
    let json = r#"{
        "branches": [
            { "role": "trunk", "points": [[0, 0, 0], [0, 0.5, 0.1], [0, 1, 0]], "thickness": 0.1, "taper": 0.5 },
            { "role": "primary", "points": [[0, 0.8, 0], [0.4, 1.1, 0]], "thickness": 0.04, "taper": 0.4 }
        ]
    }"#;
    let skeleton = TreeSkeleton::from_json(json).unwrap();
    assert_eq!(skeleton.len(), 2);
    assert_eq!(skeleton.branches[0].role, BranchRole::Trunk);
    assert_eq!(skeleton.branches[1].points[1], Vec3::new(0.4, 1.1, 0.0));
    skeleton.validate().unwrap();

    let meshes = skeleton
        .build_meshes(&TubeSettings {
            length_segments: 4,
            radial_segments: 3,
            ..default()
        })
        .unwrap();
    assert_eq!(meshes[1].mesh.vertex_count(), 5 * 4);
}

#[test]
fn test_anchor_derivation() {
    let skeleton = preset::skeleton();
    let tips = skeleton.tip_anchors(BranchRole::Tertiary);
    assert_eq!(tips.len(), 12);
    // First tertiary branch is entry 19 (1 trunk + 5 primary + 13 secondary).
    assert_eq!(tips[0].cluster, 19);
    assert_eq!(tips[0].position, Vec3::new(1.7, 1.05, 0.3));

    let mids = skeleton.mid_anchors(BranchRole::Primary);
    assert_eq!(mids.len(), 5);
    // 4-point branch: the middle anchor is the third control point.
    assert_eq!(mids[0].position, Vec3::new(0.7, 1.5, 0.15));
}
