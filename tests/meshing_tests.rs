use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;
use bevy_bonsai::preset;
use bevy_bonsai::{
    LinearTaper, RadiusProfile, SampledCurve, TubeMesh, TubeMeshBuilder, TubeSettings,
    compute_frames,
};

fn straight_tube(radial_segments: u32, radius: f32) -> (SampledCurve, TubeMesh) {
    let curve = SampledCurve::from_points(vec![Vec3::ZERO, Vec3::Y, Vec3::Y * 2.0]).unwrap();
    let frames = compute_frames(&curve).unwrap();
    let tube = TubeMeshBuilder::new()
        .with_radial_segments(radial_segments)
        .build(&curve, &frames, &|_t: f32| radius)
        .unwrap();
    (curve, tube)
}

#[test]
fn test_mesh_generation_basics() {
    let (_, tube) = straight_tube(8, 0.1);
    let mesh = tube.to_mesh();

    assert_eq!(mesh.primitive_topology(), PrimitiveTopology::TriangleList);

    let positions = mesh
        .attribute(Mesh::ATTRIBUTE_POSITION)
        .expect("Mesh missing positions");
    let normals = mesh
        .attribute(Mesh::ATTRIBUTE_NORMAL)
        .expect("Mesh missing normals");
    let uvs = mesh
        .attribute(Mesh::ATTRIBUTE_UV_0)
        .expect("Mesh missing UVs");

    // 3 rings * (8 radial + 1 seam duplicate) = 27 verts
    assert_eq!(positions.len(), 27);
    assert_eq!(normals.len(), 27);
    assert_eq!(uvs.len(), 27);

    // 2 segments * 8 quads * 6 indices = 96
    let indices = mesh.indices().expect("Mesh missing indices");
    assert_eq!(indices.len(), 96);
}

#[test]
fn test_flat_buffers_match_counts() {
    let (_, tube) = straight_tube(6, 0.2);
    let buffers = tube.buffers();
    assert_eq!(buffers.positions_flat().len(), tube.vertex_count() * 3);
    assert_eq!(buffers.uvs_flat().len(), tube.vertex_count() * 2);
    assert_eq!(buffers.normals_flat().len(), tube.vertex_count() * 3);
    assert!(
        tube.indices()
            .iter()
            .all(|&i| (i as usize) < tube.vertex_count()),
        "Index out of range"
    );
}

#[test]
fn test_s_trunk_scenario() {
    let settings = TubeSettings {
        length_segments: 32,
        radial_segments: 8,
        ..default()
    };
    let profile = LinearTaper::new(0.1, 0.45).unwrap();
    let tube = settings
        .build_tube(&preset::trunk_points(), &profile)
        .unwrap();

    assert_eq!(tube.vertex_count(), 297, "(32 + 1) * (8 + 1) vertices");
    assert_eq!(tube.index_count(), 1536, "32 * 8 * 6 indices");
    assert_eq!(tube.length_segments(), 32);
    assert_eq!(tube.radial_segments(), 8);
}

#[test]
fn test_vertices_sit_at_profile_radius() {
    let settings = TubeSettings::default();
    let profile = LinearTaper::new(0.1, 0.45).unwrap();
    let points = preset::trunk_points();

    let curve = bevy_bonsai::CurveSampler::new()
        .with_curve_type(settings.curve_type)
        .sample(&points, settings.length_segments)
        .unwrap();
    let frames = compute_frames(&curve).unwrap();
    let tube = TubeMeshBuilder::new()
        .with_radial_segments(settings.radial_segments)
        .build(&curve, &frames, &profile)
        .unwrap();

    for (i, center) in curve.points().iter().enumerate() {
        let expected = profile.radius_at(curve.t_at(i));
        for vertex in tube.ring(i).unwrap() {
            let d = vertex.distance(*center);
            assert!(
                (d - expected).abs() < 1e-4,
                "Ring {i}: vertex at distance {d}, expected {expected}"
            );
            assert!(d <= 0.1 + 1e-4, "Vertex farther than base thickness");
        }
    }
}

#[test]
fn test_ring_past_the_end_is_none() {
    let (curve, tube) = straight_tube(6, 0.1);
    let last = curve.len() - 1;
    assert_eq!(tube.ring(last).map(<[Vec3]>::len), Some(7));
    assert!(tube.ring(last + 1).is_none());
    assert!(tube.ring(usize::MAX / 2).is_none());
}

#[test]
fn test_seam_column_duplicates_first_column() {
    let (_, tube) = straight_tube(8, 0.1);
    for i in 0..3 {
        let ring = tube.ring(i).unwrap();
        assert!(
            ring[0].distance(ring[8]) < 1e-5,
            "Seam vertex of ring {i} should coincide with the first vertex"
        );
    }
}

#[test]
fn test_triangles_face_outward() {
    let (curve, tube) = straight_tube(8, 0.1);
    let ring_len = tube.ring_len() as u32;
    let positions = tube.positions();

    for tri in tube.indices().chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| positions[i as usize]);
        let face = (b - a).cross(c - a);
        let ring = (tri[0] / ring_len) as usize;
        let axis = (curve.points()[ring] + curve.points()[ring + 1]) * 0.5;
        let outward = (a + b + c) / 3.0 - axis;
        assert!(
            face.dot(outward) > 0.0,
            "Triangle {tri:?} winds inward"
        );
    }
}

#[test]
fn test_normals_point_away_from_axis() {
    let settings = TubeSettings::default();
    let profile = LinearTaper::new(0.1, 0.45).unwrap();
    let curve = bevy_bonsai::CurveSampler::new()
        .sample(&preset::trunk_points(), settings.length_segments)
        .unwrap();
    let frames = compute_frames(&curve).unwrap();
    let tube = TubeMeshBuilder::new()
        .build(&curve, &frames, &profile)
        .unwrap();

    let ring_len = tube.ring_len();
    for (v, (position, normal)) in tube.positions().iter().zip(tube.normals()).enumerate() {
        let center = curve.points()[v / ring_len];
        assert!(
            (normal.length() - 1.0).abs() < 1e-4,
            "Normal {v} is not unit length"
        );
        assert!(
            normal.dot(*position - center) > 0.0,
            "Normal {v} points into the tube"
        );
    }
}

#[test]
fn test_seam_normals_are_shared() {
    let (_, tube) = straight_tube(8, 0.1);
    let normals = tube.normals();
    for i in 0..3 {
        let first = normals[i * 9];
        let last = normals[i * 9 + 8];
        assert!(first.distance(last) < 1e-6, "Seam normals differ on ring {i}");
    }
    // On a straight cylinder the first column's normal is the radial direction.
    assert!(normals[9].distance(Vec3::X) < 1e-4, "Got {}", normals[9]);
}

#[test]
fn test_into_bevy_mesh() {
    let (_, tube) = straight_tube(5, 0.05);
    let vertex_count = tube.vertex_count();
    let mesh: Mesh = tube.into();
    assert_eq!(mesh.count_vertices(), vertex_count);
}
