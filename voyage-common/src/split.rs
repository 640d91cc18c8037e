//! Vertex splitting
//!
//! Source meshes attach UVs to polygon corners, so one vertex can be used with
//! several UVs (typically along UV seams). The Voyage format stores a single UV
//! per vertex index, so every extra UV seen for a vertex gets its own copy of
//! that vertex.
//!
//! UVs are compared with exact float equality. Two UVs that differ only in the
//! last bit produce two vertices; no tolerance is applied.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use crate::mesh::{MeshInput, Polygon, SplitMesh, SplitStats};

/// UVs already resolved for one original vertex, with the index each one maps to.
type SeenUvs = SmallVec<[(Vec2, u32); 2]>;

/// Working state for one [`split`] call.
struct Splitter {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    seen: Vec<SeenUvs>,
    duplicated: usize,
}

impl Splitter {
    fn new(vertices: &[Vec3], normals: &[Vec3]) -> Self {
        let count = vertices.len();
        Self {
            vertices: vertices.to_vec(),
            normals: normals.to_vec(),
            uvs: vec![Vec2::ZERO; count],
            seen: vec![SeenUvs::new(); count],
            duplicated: 0,
        }
    }

    /// Map one polygon corner to its final vertex index.
    fn resolve_corner(&mut self, vertex_index: u32, uv: Vec2) -> u32 {
        let original = vertex_index as usize;
        let entry = &mut self.seen[original];

        if entry.is_empty() {
            entry.push((uv, vertex_index));
            self.uvs[original] = uv;
            return vertex_index;
        }

        if let Some(&(_, resolved)) = entry.iter().find(|(seen_uv, _)| *seen_uv == uv) {
            return resolved;
        }

        let new_index = self.vertices.len() as u32;
        entry.push((uv, new_index));
        self.vertices.push(self.vertices[original]);
        self.normals.push(self.normals[original]);
        self.uvs.push(uv);
        self.duplicated += 1;
        new_index
    }
}

/// Whether a polygon can be encoded. Everything else is counted and skipped.
fn is_encodable(polygon: &Polygon, material_count: u32, vertex_count: usize) -> bool {
    polygon.material_index < material_count
        && polygon.corner_count() == 3
        && polygon.corner_uvs.len() == 3
        && polygon
            .vertex_indices
            .iter()
            .all(|&index| (index as usize) < vertex_count)
}

/// Split vertices so that each final vertex index carries exactly one UV.
///
/// Triangles are grouped per material and their winding is reversed, which
/// compensates for the mirroring axis conversion applied by mesh sources.
/// Polygons with an out-of-range material, a corner count other than three or
/// dangling vertex indices are skipped and counted in
/// [`SplitStats::discarded_polygons`].
pub fn split(mesh: &MeshInput) -> SplitMesh {
    // Normals and positions share one index space; anything past the shorter
    // of the two has no complete attribute set.
    let vertex_count = mesh.vertices.len().min(mesh.normals.len());
    let mut splitter = Splitter::new(
        &mesh.vertices[..vertex_count],
        &mesh.normals[..vertex_count],
    );
    let mut submeshes: Vec<Vec<u32>> = vec![Vec::new(); mesh.material_count as usize];
    let mut discarded = 0;

    for polygon in &mesh.polygons {
        if !is_encodable(polygon, mesh.material_count, vertex_count) {
            discarded += 1;
            continue;
        }

        let mut resolved = [0u32; 3];
        for (slot, (&vertex_index, &uv)) in resolved
            .iter_mut()
            .zip(polygon.vertex_indices.iter().zip(&polygon.corner_uvs))
        {
            *slot = splitter.resolve_corner(vertex_index, uv);
        }
        resolved.reverse();

        submeshes[polygon.material_index as usize].extend_from_slice(&resolved);
    }

    if discarded > 0 {
        tracing::warn!(
            "Skipped {} of {} polygons (material out of range, not a triangle, or bad vertex index)",
            discarded,
            mesh.polygons.len()
        );
    }
    if vertex_count != mesh.vertices.len() || vertex_count != mesh.normals.len() {
        tracing::warn!(
            "Mesh has {} vertices but {} normals, using the first {}",
            mesh.vertices.len(),
            mesh.normals.len(),
            vertex_count
        );
    }

    SplitMesh {
        vertices: splitter.vertices,
        normals: splitter.normals,
        uvs: splitter.uvs,
        submeshes,
        stats: SplitStats {
            discarded_polygons: discarded,
            duplicated_vertices: splitter.duplicated,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh(right_uvs: [Vec2; 3]) -> MeshInput {
        // Two triangles sharing the edge 1-2
        MeshInput {
            vertices: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            polygons: vec![
                Polygon::triangle(
                    [0, 1, 2],
                    0,
                    [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
                ),
                Polygon::triangle([1, 3, 2], 0, right_uvs),
            ],
            material_count: 1,
        }
    }

    fn assert_invariants(out: &SplitMesh) {
        assert_eq!(out.vertices.len(), out.normals.len());
        assert_eq!(out.vertices.len(), out.uvs.len());
        for submesh in &out.submeshes {
            assert_eq!(submesh.len() % 3, 0);
            assert!(submesh.iter().all(|&i| (i as usize) < out.vertices.len()));
        }
    }

    #[test]
    fn test_single_triangle_no_duplication() {
        let mesh = MeshInput {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            polygons: vec![Polygon::triangle(
                [0, 1, 2],
                0,
                [Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
            )],
            material_count: 1,
        };

        let out = split(&mesh);
        assert_invariants(&out);
        assert_eq!(out.vertices.len(), 3);
        assert_eq!(out.index_count(), 3);
        assert_eq!(out.uvs[1], Vec2::new(1.0, 0.0));
        assert_eq!(out.stats, SplitStats::default());
    }

    #[test]
    fn test_consistent_shared_uvs_keep_vertex_count() {
        let out = split(&quad_mesh([
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]));
        assert_invariants(&out);
        assert_eq!(out.vertices.len(), 4);
        assert_eq!(out.submeshes[0], vec![2, 1, 0, 2, 3, 1]);
    }

    #[test]
    fn test_seam_vertex_duplicated_once() {
        // Vertex 1 is used with (1, 0) by the first triangle and (0.5, 0) by the second
        let out = split(&quad_mesh([
            Vec2::new(0.5, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]));
        assert_invariants(&out);
        assert_eq!(out.vertices.len(), 5);
        assert_eq!(out.stats.duplicated_vertices, 1);
        assert_eq!(out.vertices[4], out.vertices[1]);
        assert_eq!(out.normals[4], out.normals[1]);
        assert_eq!(out.uvs[4], Vec2::new(0.5, 0.0));
        assert_eq!(out.uvs[1], Vec2::new(1.0, 0.0));
        assert_eq!(out.submeshes[0][3..], [2, 3, 4]);
    }

    #[test]
    fn test_repeated_seam_uv_reuses_duplicate() {
        let mut mesh = quad_mesh([
            Vec2::new(0.5, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]);
        mesh.polygons.push(mesh.polygons[1].clone());

        let out = split(&mesh);
        assert_eq!(out.vertices.len(), 5);
        assert_eq!(out.submeshes[0][6..], [2, 3, 4]);
    }

    #[test]
    fn test_winding_reversed() {
        let mesh = MeshInput {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            polygons: vec![Polygon::triangle([0, 1, 2], 0, [Vec2::ZERO, Vec2::X, Vec2::Y])],
            material_count: 1,
        };
        assert_eq!(split(&mesh).submeshes[0], vec![2, 1, 0]);
    }

    #[test]
    fn test_near_equal_uvs_are_distinct() {
        let nudged = f32::from_bits(1.0f32.to_bits() - 1);
        let out = split(&quad_mesh([
            Vec2::new(nudged, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]));
        assert_eq!(out.vertices.len(), 5);
    }

    #[test]
    fn test_polygons_grouped_by_material() {
        let mut mesh = quad_mesh([Vec2::X, Vec2::ONE, Vec2::Y]);
        mesh.material_count = 3;
        mesh.polygons[0].material_index = 2;

        let out = split(&mesh);
        assert_invariants(&out);
        assert_eq!(out.submeshes.len(), 3);
        assert_eq!(out.submeshes[0].len(), 3);
        assert!(out.submeshes[1].is_empty());
        assert_eq!(out.submeshes[2], vec![2, 1, 0]);
    }

    #[test]
    fn test_out_of_range_material_discarded() {
        let mut mesh = quad_mesh([Vec2::X, Vec2::ONE, Vec2::Y]);
        mesh.polygons[1].material_index = 1;

        let out = split(&mesh);
        assert_invariants(&out);
        assert_eq!(out.index_count(), 3);
        assert_eq!(out.stats.discarded_polygons, 1);
    }

    #[test]
    fn test_malformed_polygons_counted() {
        let mut mesh = quad_mesh([Vec2::X, Vec2::ONE, Vec2::Y]);
        mesh.polygons.push(Polygon {
            vertex_indices: vec![0, 1, 2, 3],
            material_index: 0,
            corner_uvs: vec![Vec2::ZERO; 4],
        });
        mesh.polygons.push(Polygon::triangle([0, 1, 9], 0, [Vec2::ZERO; 3]));
        mesh.polygons.push(Polygon {
            vertex_indices: vec![0, 1, 2],
            material_index: 0,
            corner_uvs: vec![Vec2::ZERO],
        });
        mesh.polygons.push(Polygon {
            vertex_indices: Vec::new(),
            material_index: 0,
            corner_uvs: Vec::new(),
        });

        let out = split(&mesh);
        assert_invariants(&out);
        assert_eq!(out.stats.discarded_polygons, 4);
        assert_eq!(out.index_count(), 6);
    }

    #[test]
    fn test_empty_inputs() {
        let out = split(&MeshInput::default());
        assert_invariants(&out);
        assert!(out.vertices.is_empty());
        assert!(out.submeshes.is_empty());

        let no_materials = MeshInput {
            material_count: 0,
            ..quad_mesh([Vec2::X, Vec2::ONE, Vec2::Y])
        };
        let out = split(&no_materials);
        assert_eq!(out.vertices.len(), 4);
        assert_eq!(out.stats.discarded_polygons, 2);
    }

    #[test]
    fn test_short_normals_truncate_vertices() {
        let mut mesh = quad_mesh([Vec2::X, Vec2::ONE, Vec2::Y]);
        mesh.normals.truncate(3);

        let out = split(&mesh);
        assert_invariants(&out);
        assert_eq!(out.vertices.len(), 3);
        assert_eq!(out.stats.discarded_polygons, 1);
    }
}
