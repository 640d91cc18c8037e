//! glTF/GLB mesh source

use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use std::path::Path;
use voyage_common::{MeshInput, Polygon};

/// Load one mesh of a glTF/GLB file as a [`MeshInput`].
///
/// All triangle-list primitives of the mesh are merged. Each distinct glTF
/// material (including "no material") becomes one material slot, numbered in
/// order of first appearance. V is flipped so UVs use a bottom-left origin
/// like OBJ sources.
pub fn load_gltf(input: &Path, mesh_index: usize) -> Result<MeshInput> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let mesh_count = document.meshes().count();
    let mesh = document.meshes().nth(mesh_index).with_context(|| {
        format!(
            "Mesh {} not found in glTF ({} meshes available)",
            mesh_index, mesh_count
        )
    })?;

    let mut out = MeshInput::default();
    let mut material_slots: HashMap<Option<usize>, u32> = HashMap::new();

    for (primitive_index, primitive) in mesh.primitives().enumerate() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(
                "Skipping primitive {} of mesh {}: mode {:?} is not a triangle list",
                primitive_index,
                mesh_index,
                primitive.mode()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        // Positions (required)
        let Some(positions) = reader.read_positions() else {
            tracing::warn!("Skipping primitive {}: no positions", primitive_index);
            continue;
        };
        let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();

        // Normals (optional)
        let normals: Option<Vec<Vec3>> = reader
            .read_normals()
            .map(|iter| iter.map(Vec3::from_array).collect());

        // UVs (optional)
        let uvs: Option<Vec<Vec2>> = reader
            .read_tex_coords(0)
            .map(|iter| iter.into_f32().map(|[u, v]| Vec2::new(u, 1.0 - v)).collect());

        // Indices (optional)
        let indices: Vec<u32> = reader
            .read_indices()
            .map(|iter| iter.into_u32().collect())
            .unwrap_or_else(|| (0..positions.len() as u32).collect());

        let next_slot = material_slots.len() as u32;
        let material = *material_slots
            .entry(primitive.material().index())
            .or_insert(next_slot);

        let base = out.vertices.len() as u32;
        let vertex_count = positions.len();
        out.vertices.extend(positions);
        out.normals.extend((0..vertex_count).map(|i| {
            normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .unwrap_or(Vec3::Y)
        }));

        let uv_at = |i: u32| {
            uvs.as_ref()
                .and_then(|u| u.get(i as usize).copied())
                .unwrap_or(Vec2::ZERO)
        };
        for (triangle_index, tri) in indices.chunks_exact(3).enumerate() {
            if tri.iter().any(|&i| i as usize >= vertex_count) {
                tracing::warn!(
                    "Skipping triangle {} of primitive {}: indices {:?} exceed {} vertices",
                    triangle_index,
                    primitive_index,
                    tri,
                    vertex_count
                );
                continue;
            }
            out.polygons.push(Polygon::triangle(
                [base + tri[0], base + tri[1], base + tri[2]],
                material,
                [uv_at(tri[0]), uv_at(tri[1]), uv_at(tri[2])],
            ));
        }
    }

    if out.vertices.is_empty() {
        bail!("No triangle geometry found in glTF mesh {}", mesh_index);
    }

    out.material_count = material_slots.len() as u32;
    Ok(out)
}
