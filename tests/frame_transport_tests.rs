use std::f32::consts::TAU;

use bevy::prelude::*;
use bevy_bonsai::preset;
use bevy_bonsai::{CurveSampler, Frame, SampledCurve, compute_frames};

fn assert_orthonormal(frames: &[Frame]) {
    for (i, f) in frames.iter().enumerate() {
        assert!((f.tangent.length() - 1.0).abs() < 1e-5, "Tangent {i} not unit");
        assert!((f.normal.length() - 1.0).abs() < 1e-5, "Normal {i} not unit");
        assert!((f.binormal.length() - 1.0).abs() < 1e-5, "Binormal {i} not unit");
        assert!(f.tangent.dot(f.normal).abs() < 1e-5, "T.N != 0 at {i}");
        assert!(f.tangent.dot(f.binormal).abs() < 1e-5, "T.B != 0 at {i}");
        assert!(f.normal.dot(f.binormal).abs() < 1e-5, "N.B != 0 at {i}");
        assert!(
            f.tangent.cross(f.normal).distance(f.binormal) < 1e-5,
            "Frame {i} is not right-handed"
        );
    }
}

fn helix(samples: usize) -> SampledCurve {
    let points = (0..samples)
        .map(|i| {
            let a = i as f32 / (samples - 1) as f32 * 2.0 * TAU;
            Vec3::new(a.cos(), i as f32 * 0.05, a.sin())
        })
        .collect();
    SampledCurve::from_points(points).unwrap()
}

#[test]
fn test_frames_match_curve_length() {
    let curve = CurveSampler::new()
        .sample(&preset::trunk_points(), 32)
        .unwrap();
    let frames = compute_frames(&curve).unwrap();
    assert_eq!(frames.len(), curve.len());
    assert_orthonormal(&frames);
}

#[test]
fn test_tangent_follows_finite_difference() {
    let curve = CurveSampler::new()
        .sample(&preset::trunk_points(), 32)
        .unwrap();
    let frames = compute_frames(&curve).unwrap();
    let pts = curve.points();

    for i in 0..pts.len() - 1 {
        let expected = (pts[i + 1] - pts[i]).normalize();
        assert!(
            frames[i].tangent.distance(expected) < 1e-5,
            "Tangent {i} does not point at the next sample"
        );
    }
    // The last sample reuses the previous tangent.
    let n = frames.len();
    assert_eq!(frames[n - 1], frames[n - 2]);
}

#[test]
fn test_turning_angle_matches_curve() {
    let curve = helix(80);
    let frames = compute_frames(&curve).unwrap();
    let pts = curve.points();

    for i in 1..pts.len() - 1 {
        let d0 = (pts[i] - pts[i - 1]).normalize();
        let d1 = (pts[i + 1] - pts[i]).normalize();
        let curve_turn = d0.angle_between(d1);
        let frame_turn = frames[i - 1].tangent.angle_between(frames[i].tangent);
        assert!(
            (curve_turn - frame_turn).abs() < 1e-3,
            "Sample {i}: frame turned {frame_turn}, curve turned {curve_turn}"
        );
    }
}

#[test]
fn test_helix_frames_do_not_flip() {
    let curve = helix(120);
    let frames = compute_frames(&curve).unwrap();
    assert_orthonormal(&frames);
    for w in frames.windows(2) {
        assert!(
            w[0].normal.dot(w[1].normal) > 0.9,
            "Normal flipped between consecutive frames"
        );
    }
}

#[test]
fn test_transport_is_rotation_minimizing() {
    // Between consecutive frames the normal must not spin about the tangent:
    // its change lies entirely in the plane spanned by the two tangents, so
    // the binormal component of the normal's motion is second order.
    let curve = helix(400);
    let frames = compute_frames(&curve).unwrap();
    for (i, w) in frames.windows(2).enumerate() {
        let twist = (w[1].normal - w[0].normal).dot(w[0].binormal);
        assert!(twist.abs() < 1e-3, "Frame {i} twists by {twist}");
    }
}

#[test]
fn test_passing_through_vertical_stays_continuous() {
    // Horizontal, then straight up, then horizontal again: a fixed world-up
    // reference breaks down exactly where the tangent becomes vertical.
    let control = [
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.1, 1.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::new(0.0, 2.0, 1.0),
    ];
    let curve = CurveSampler::new().sample(&control, 64).unwrap();
    let frames = compute_frames(&curve).unwrap();
    assert_orthonormal(&frames);

    for (i, w) in frames.windows(2).enumerate() {
        let turn = w[0].tangent.angle_between(w[1].tangent);
        let normal_turn = w[0].normal.angle_between(w[1].normal);
        assert!(
            normal_turn <= turn + 1e-3,
            "Normal {i} rotated {normal_turn} while tangent only turned {turn}"
        );
    }
}

#[test]
fn test_initial_frame_for_vertical_start() {
    let curve = SampledCurve::from_points(vec![Vec3::ZERO, Vec3::Y]).unwrap();
    let frames = compute_frames(&curve).unwrap();
    assert!(frames[0].normal.distance(Vec3::X) < 1e-6);
    assert!(frames[0].binormal.distance(-Vec3::Z) < 1e-6);
}

#[test]
fn test_initial_frame_prefers_world_up() {
    let curve = SampledCurve::from_points(vec![Vec3::ZERO, Vec3::X]).unwrap();
    let frames = compute_frames(&curve).unwrap();
    assert!(frames[0].normal.distance(Vec3::Y) < 1e-6);
    assert!(frames[0].binormal.distance(Vec3::Z) < 1e-6);
}
