//! Mesh data handed to the encoder and produced by the splitter.
//!
//! The encoder never reaches into a modeling application. Mesh sources build a
//! [`MeshInput`] value and pass it in; everything downstream is plain data.

use glam::{Vec2, Vec3};

/// One polygon of the source mesh.
///
/// Corners are expected to be triangulated (three of them) by the mesh source.
/// `corner_uvs[i]` is the texture coordinate used by the corner referencing
/// `vertex_indices[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertex_indices: Vec<u32>,
    pub material_index: u32,
    pub corner_uvs: Vec<Vec2>,
}

impl Polygon {
    pub fn triangle(vertex_indices: [u32; 3], material_index: u32, corner_uvs: [Vec2; 3]) -> Self {
        Self {
            vertex_indices: vertex_indices.to_vec(),
            material_index,
            corner_uvs: corner_uvs.to_vec(),
        }
    }

    /// Number of corners (loops) in this polygon
    pub fn corner_count(&self) -> usize {
        self.vertex_indices.len()
    }
}

/// Mesh as supplied by a mesh source.
///
/// `vertices` and `normals` share one index space: `normals[i]` is the normal
/// of `vertices[i]`. Valid material indices are `0..material_count`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshInput {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub polygons: Vec<Polygon>,
    pub material_count: u32,
}

/// Counters for input the splitter tolerated instead of rejecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    /// Polygons skipped (material out of range, not a triangle, bad indices)
    pub discarded_polygons: usize,
    /// Vertices appended because a corner used a UV not yet seen for its vertex
    pub duplicated_vertices: usize,
}

/// Mesh with exactly one position, normal and UV per vertex index.
///
/// `submeshes[m]` holds the triangle-list indices of material `m`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitMesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub submeshes: Vec<Vec<u32>>,
    pub stats: SplitStats,
}

impl SplitMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total number of indices across all submeshes
    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(Vec::len).sum()
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }
}
