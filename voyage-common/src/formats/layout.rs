//! Payload layout and builder
//!
//! # Layout (version 3, offsets in float slots)
//! ```text
//! 0:            header (64 slots)
//! 64:           vertices   V × (x, y, z, 0)
//! 64 + 4V:      normals    V × (nx, ny, nz, 0)
//! 64 + 8V:      uvs        V × (u, v, 0, 0)
//! 64 + 12V:     indices    I × index, zero padded to a multiple of 4
//! ... + pad(I): submeshes  S × (start, count, 0, 0)
//! ```
//!
//! Attribute entries use a 4-slot stride so each one lines up with one RGBA
//! pixel. Indices are tightly packed across submesh boundaries; submesh
//! `start` offsets count positions in that unpadded index stream.

use super::{FormatVersion, VoyageHeader};
use crate::mesh::SplitMesh;

/// Slots per vertex, normal, uv and submesh entry
pub const ENTRY_STRIDE: usize = 4;

/// Round up to the next multiple of [`ENTRY_STRIDE`]
pub fn align4(count: usize) -> usize {
    count.div_ceil(ENTRY_STRIDE) * ENTRY_STRIDE
}

/// Block offsets of one payload, in float slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLayout {
    pub version: FormatVersion,
    pub vertex_offset: usize,
    pub normal_offset: usize,
    pub uv_offset: usize,
    pub index_offset: usize,
    pub submesh_offset: usize,
    pub total_len: usize,
}

impl PayloadLayout {
    pub fn new(
        version: FormatVersion,
        vertex_count: usize,
        index_count: usize,
        submesh_count: usize,
    ) -> Self {
        match version {
            FormatVersion::V3 => {
                let vertex_offset = VoyageHeader::SLOTS;
                let normal_offset = vertex_offset + vertex_count * ENTRY_STRIDE;
                let uv_offset = normal_offset + vertex_count * ENTRY_STRIDE;
                let index_offset = uv_offset + vertex_count * ENTRY_STRIDE;
                let submesh_offset = index_offset + align4(index_count);
                let total_len = submesh_offset + submesh_count * ENTRY_STRIDE;
                Self {
                    version,
                    vertex_offset,
                    normal_offset,
                    uv_offset,
                    index_offset,
                    submesh_offset,
                    total_len,
                }
            }
        }
    }

    pub fn for_header(header: &VoyageHeader) -> Self {
        Self::new(
            header.version,
            header.vertex_count as usize,
            header.index_count as usize,
            header.submesh_count as usize,
        )
    }
}

/// Flat float stream ready to be copied into a container
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedPayload {
    data: Vec<f32>,
}

impl EncodedPayload {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw bytes in native byte order
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Bytes in the on-disk (little-endian) byte order
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }
}

/// Lay out a split mesh as a version 3 payload.
///
/// Never fails; an empty mesh produces a header-only payload with zero counts.
pub fn build(mesh: &SplitMesh) -> EncodedPayload {
    let vertex_count = mesh.vertex_count();
    let index_count = mesh.index_count();
    let submesh_count = mesh.submesh_count();

    let header = VoyageHeader::new(
        vertex_count as u32,
        index_count as u32,
        submesh_count as u32,
    );
    let layout = PayloadLayout::for_header(&header);

    let mut data = Vec::with_capacity(layout.total_len);
    data.extend_from_slice(&header.to_slots());

    for v in &mesh.vertices {
        data.extend_from_slice(&[v.x, v.y, v.z, 0.0]);
    }
    for n in &mesh.normals {
        data.extend_from_slice(&[n.x, n.y, n.z, 0.0]);
    }
    for uv in &mesh.uvs {
        data.extend_from_slice(&[uv.x, uv.y, 0.0, 0.0]);
    }

    for submesh in &mesh.submeshes {
        data.extend(submesh.iter().map(|&index| index as f32));
    }
    data.resize(layout.submesh_offset, 0.0);

    let mut start = 0usize;
    for submesh in &mesh.submeshes {
        data.extend_from_slice(&[start as f32, submesh.len() as f32, 0.0, 0.0]);
        start += submesh.len();
    }

    debug_assert_eq!(data.len(), layout.total_len);
    EncodedPayload { data }
}
