//! End-to-end encoding tests: mesh -> split -> payload -> container

use std::path::Path;

use glam::{Vec2, Vec3};
use voyage_common::{
    build, encode, inspect, size_for, split, write_payload, ContainerSize, MemoryWriter,
    MeshInput, Polygon, DEFAULT_MAX_SIDE,
};

fn unit_triangle() -> MeshInput {
    MeshInput {
        vertices: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        normals: vec![Vec3::Z; 3],
        polygons: vec![Polygon::triangle(
            [0, 1, 2],
            0,
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        )],
        material_count: 1,
    }
}

/// 4×4 grid of quads with a UV seam down the middle column of vertices.
fn seamed_grid() -> MeshInput {
    const SIDE: u32 = 5;
    let mut vertices = Vec::new();
    for y in 0..SIDE {
        for x in 0..SIDE {
            vertices.push(Vec3::new(x as f32, y as f32, 0.0));
        }
    }
    let uv_of = |x: u32, y: u32, left_island: bool| {
        // Column 2 belongs to both islands with different U
        let u = if x == 2 && !left_island { 0.6 } else { x as f32 * 0.25 };
        Vec2::new(u, y as f32 * 0.25)
    };

    let mut polygons = Vec::new();
    for y in 0..SIDE - 1 {
        for x in 0..SIDE - 1 {
            let left_island = x < 2;
            let corners = [(x, y), (x + 1, y), (x + 1, y + 1), (x, y + 1)];
            let index = |(cx, cy): (u32, u32)| cy * SIDE + cx;
            let uv = |(cx, cy): (u32, u32)| uv_of(cx, cy, left_island);
            let material = (x + y) % 2;
            polygons.push(Polygon::triangle(
                [index(corners[0]), index(corners[1]), index(corners[2])],
                material,
                [uv(corners[0]), uv(corners[1]), uv(corners[2])],
            ));
            polygons.push(Polygon::triangle(
                [index(corners[0]), index(corners[2]), index(corners[3])],
                material,
                [uv(corners[0]), uv(corners[2]), uv(corners[3])],
            ));
        }
    }

    MeshInput {
        normals: vec![Vec3::Z; vertices.len()],
        vertices,
        polygons,
        material_count: 2,
    }
}

#[test]
fn test_single_triangle_payload() {
    let split_mesh = split(&unit_triangle());
    assert_eq!(split_mesh.vertex_count(), 3);
    assert_eq!(split_mesh.index_count(), 3);

    let payload = build(&split_mesh);
    assert_eq!(payload.len(), 108);
    assert_eq!(size_for(payload.len(), DEFAULT_MAX_SIDE).unwrap(), ContainerSize::square(8));
}

#[test]
fn test_header_constants() {
    let (payload, _) = encode(&unit_triangle());
    let slots = payload.as_slice();

    assert_eq!(slots[0], voyage_common::formats::VOYAGE_MAGIC_A as f32);
    assert_eq!(slots[1], voyage_common::formats::VOYAGE_MAGIC_B as f32);
    assert_eq!(slots[2].to_bits(), f32::INFINITY.to_bits());
    assert_eq!(slots[3].to_bits(), f32::NAN.to_bits());
    assert_eq!(slots[4], 3.0);
}

#[test]
fn test_seam_duplicates_column() {
    let mesh = seamed_grid();
    let out = split(&mesh);

    // The 5 vertices of column 2 get a second UV
    assert_eq!(out.vertex_count(), mesh.vertices.len() + 5);
    assert_eq!(out.stats.duplicated_vertices, 5);
    assert_eq!(out.vertices.len(), out.normals.len());
    assert_eq!(out.vertices.len(), out.uvs.len());
    for submesh in &out.submeshes {
        assert_eq!(submesh.len() % 3, 0);
        assert!(submesh.iter().all(|&i| (i as usize) < out.vertex_count()));
    }
    assert_eq!(out.index_count(), 32 * 3);
}

#[test]
fn test_encode_is_deterministic() {
    let mesh = seamed_grid();
    let (first, _) = encode(&mesh);
    let (second, _) = encode(&mesh);
    assert_eq!(first.as_bytes(), second.as_bytes());
    assert_eq!(first.to_le_bytes(), second.to_le_bytes());
}

#[test]
fn test_container_roundtrip_inspection() {
    let mesh = seamed_grid();
    let (payload, _) = encode(&mesh);
    let mut writer = MemoryWriter::default();

    let size = write_payload(&payload, DEFAULT_MAX_SIDE, &mut writer, Path::new("grid.exr"))
        .unwrap();
    let (_, _, pixels) = &writer.written[0];
    assert_eq!(pixels.len(), size.capacity());

    let summary = inspect(pixels).unwrap();
    assert_eq!(summary.header.vertex_count, 30);
    assert_eq!(summary.header.submesh_count, 2);
    assert_eq!(summary.payload_len(), payload.len());
    let total: u32 = summary.submeshes.iter().map(|s| s.count).sum();
    assert_eq!(total, summary.header.index_count);
    assert_eq!(summary.submeshes[1].start, summary.submeshes[0].count);
}
