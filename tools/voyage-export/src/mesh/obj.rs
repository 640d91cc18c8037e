//! OBJ mesh source

use anyhow::{bail, Context, Result};
use glam::{Vec2, Vec3};
use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use voyage_common::{MeshInput, Polygon};

/// Corner reference parsed from a face: (position, texcoord, normal)
type Corner = (usize, Option<usize>, Option<usize>);

/// Load an OBJ file as a [`MeshInput`]
pub fn load_obj(input: &Path) -> Result<MeshInput> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    parse_obj(BufReader::new(file)).with_context(|| format!("Failed to parse OBJ: {:?}", input))
}

/// Parse OBJ text.
///
/// Faces are fan-triangulated. Materials are numbered in order of their first
/// `usemtl`; faces before any `usemtl` share one implicit material.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<MeshInput> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut tex_coords: Vec<Vec2> = Vec::new();
    let mut normals_raw: Vec<Vec3> = Vec::new();

    let mut faces: Vec<(Vec<Corner>, u32)> = Vec::new();
    let mut materials: HashMap<String, u32> = HashMap::new();
    let mut material_count = 0u32;
    let mut current_material: Option<u32> = None;
    let mut default_material: Option<u32> = None;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "v" if parts.len() >= 4 => positions.push(parse_vec3(&parts[1..4])),
            "vt" if parts.len() >= 3 => {
                let u: f32 = parts[1].parse().unwrap_or(0.0);
                let v: f32 = parts[2].parse().unwrap_or(0.0);
                tex_coords.push(Vec2::new(u, v));
            }
            "vn" if parts.len() >= 4 => normals_raw.push(parse_vec3(&parts[1..4])),
            "usemtl" => {
                let name = parts.get(1).copied().unwrap_or_default().to_string();
                let slot = *materials.entry(name).or_insert_with(|| {
                    material_count += 1;
                    material_count - 1
                });
                current_material = Some(slot);
            }
            "f" if parts.len() >= 4 => {
                let corners: Option<Vec<Corner>> = parts[1..]
                    .iter()
                    .map(|v| {
                        parse_obj_vertex(v, positions.len(), tex_coords.len(), normals_raw.len())
                    })
                    .collect();

                let Some(corners) = corners else {
                    tracing::warn!(
                        "Skipping face on line {}: invalid vertex reference",
                        line_number + 1
                    );
                    continue;
                };

                let material = match current_material {
                    Some(slot) => slot,
                    None => *default_material.get_or_insert_with(|| {
                        material_count += 1;
                        material_count - 1
                    }),
                };
                faces.push((corners, material));
            }
            _ => {}
        }
    }

    if positions.is_empty() {
        bail!("No vertices found in OBJ file");
    }

    let normals = vertex_normals(&positions, &normals_raw, &faces);

    let mut polygons = Vec::new();
    for (corners, material) in &faces {
        // Triangulate (fan triangulation for convex polygons)
        for i in 1..corners.len() - 1 {
            let fan = [corners[0], corners[i], corners[i + 1]];
            polygons.push(Polygon {
                vertex_indices: fan.iter().map(|&(vi, _, _)| vi as u32).collect(),
                material_index: *material,
                corner_uvs: fan
                    .iter()
                    .map(|&(_, vti, _)| vti.map(|t| tex_coords[t]).unwrap_or(Vec2::ZERO))
                    .collect(),
            });
        }
    }

    Ok(MeshInput {
        vertices: positions,
        normals,
        polygons,
        material_count,
    })
}

/// One normal per position.
///
/// Sums every `vn` referenced for a position; positions never referenced with
/// a `vn` use area-weighted face normals instead.
fn vertex_normals(
    positions: &[Vec3],
    normals_raw: &[Vec3],
    faces: &[(Vec<Corner>, u32)],
) -> Vec<Vec3> {
    let mut authored = vec![Vec3::ZERO; positions.len()];
    let mut computed = vec![Vec3::ZERO; positions.len()];

    for (corners, _) in faces {
        for &(vi, _, vni) in corners {
            if let Some(ni) = vni {
                authored[vi] += normals_raw[ni];
            }
        }
        for i in 1..corners.len() - 1 {
            let (a, b, c) = (corners[0].0, corners[i].0, corners[i + 1].0);
            let face_normal = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
            computed[a] += face_normal;
            computed[b] += face_normal;
            computed[c] += face_normal;
        }
    }

    authored
        .into_iter()
        .zip(computed)
        .map(|(authored, computed)| {
            authored
                .try_normalize()
                .or_else(|| computed.try_normalize())
                .unwrap_or(Vec3::Y)
        })
        .collect()
}

fn parse_vec3(parts: &[&str]) -> Vec3 {
    let x: f32 = parts[0].parse().unwrap_or(0.0);
    let y: f32 = parts[1].parse().unwrap_or(0.0);
    let z: f32 = parts[2].parse().unwrap_or(0.0);
    Vec3::new(x, y, z)
}

/// Resolve a 1-based or negative (relative) OBJ index against `len` elements
fn resolve_index(s: &str, len: usize) -> Option<usize> {
    let index: i64 = s.parse().ok()?;
    let resolved = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };
    (resolved >= 0 && (resolved as usize) < len).then_some(resolved as usize)
}

/// Parse OBJ vertex reference: "v", "v/vt", "v/vt/vn", or "v//vn"
///
/// The position must resolve; missing or dangling texcoord and normal
/// references are dropped.
fn parse_obj_vertex(
    s: &str,
    position_count: usize,
    tex_coord_count: usize,
    normal_count: usize,
) -> Option<Corner> {
    let parts: Vec<&str> = s.split('/').collect();

    let vi = resolve_index(parts.first()?, position_count)?;

    let vti = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .and_then(|s| resolve_index(s, tex_coord_count));

    let vni = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .and_then(|s| resolve_index(s, normal_count));

    Some((vi, vti, vni))
}
