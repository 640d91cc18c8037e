//! Voyage payload header (64 float slots)
//!
//! # Layout
//! ```text
//! slot 0:  magic A      0x00564f59 ("VOY")
//! slot 1:  magic B      0x00454741 ("AGE")
//! slot 2:  +infinity    transport self-test
//! slot 3:  NaN          transport self-test
//! slot 4:  format version
//! slot 5-7: reserved (0)
//! slot 8:  vertex count
//! slot 9:  normal count (= vertex count)
//! slot 10: uv count (= vertex count)
//! slot 11: index count (all submeshes)
//! slot 12: submesh count
//! slot 13-63: reserved (0)
//! ```
//!
//! Counts are stored as floats. Every count that fits in the largest container
//! is below 2^24 and therefore exact.

use super::{FormatError, FormatVersion};

/// First magic word, "VOY" in little-endian ASCII
pub const VOYAGE_MAGIC_A: u32 = 0x0056_4f59;
/// Second magic word, "AGE" in little-endian ASCII
pub const VOYAGE_MAGIC_B: u32 = 0x0045_4741;

const SLOT_MAGIC_A: usize = 0;
const SLOT_MAGIC_B: usize = 1;
const SLOT_INFINITY: usize = 2;
const SLOT_NAN: usize = 3;
const SLOT_VERSION: usize = 4;
const SLOT_VERTICES: usize = 8;
const SLOT_NORMALS: usize = 9;
const SLOT_UVS: usize = 10;
const SLOT_INDICES: usize = 11;
const SLOT_SUBMESHES: usize = 12;

/// Decoded header counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoyageHeader {
    pub version: FormatVersion,
    pub vertex_count: u32,
    pub normal_count: u32,
    pub uv_count: u32,
    pub index_count: u32,
    pub submesh_count: u32,
}

impl VoyageHeader {
    /// Header size in float slots
    pub const SLOTS: usize = 64;
    /// Header size in bytes
    pub const SIZE: usize = Self::SLOTS * 4;

    pub fn new(vertex_count: u32, index_count: u32, submesh_count: u32) -> Self {
        Self {
            version: FormatVersion::CURRENT,
            vertex_count,
            normal_count: vertex_count,
            uv_count: vertex_count,
            index_count,
            submesh_count,
        }
    }

    /// Write the header slots
    pub fn to_slots(&self) -> [f32; Self::SLOTS] {
        let mut slots = [0.0f32; Self::SLOTS];
        slots[SLOT_MAGIC_A] = VOYAGE_MAGIC_A as f32;
        slots[SLOT_MAGIC_B] = VOYAGE_MAGIC_B as f32;
        slots[SLOT_INFINITY] = f32::INFINITY;
        slots[SLOT_NAN] = f32::NAN;
        slots[SLOT_VERSION] = self.version.number() as f32;
        slots[SLOT_VERTICES] = self.vertex_count as f32;
        slots[SLOT_NORMALS] = self.normal_count as f32;
        slots[SLOT_UVS] = self.uv_count as f32;
        slots[SLOT_INDICES] = self.index_count as f32;
        slots[SLOT_SUBMESHES] = self.submesh_count as f32;
        slots
    }

    /// Read and check a header from the start of a float stream
    pub fn from_slots(slots: &[f32]) -> Result<Self, FormatError> {
        if slots.len() < Self::SLOTS {
            return Err(FormatError::HeaderTooShort(slots.len()));
        }

        let magic = (slots[SLOT_MAGIC_A], slots[SLOT_MAGIC_B]);
        if magic != (VOYAGE_MAGIC_A as f32, VOYAGE_MAGIC_B as f32) {
            return Err(FormatError::BadMagic(magic.0, magic.1));
        }

        if slots[SLOT_INFINITY] != f32::INFINITY {
            return Err(FormatError::SentinelMismatch {
                slot: SLOT_INFINITY,
                found: slots[SLOT_INFINITY].to_bits(),
            });
        }
        if !slots[SLOT_NAN].is_nan() {
            return Err(FormatError::SentinelMismatch {
                slot: SLOT_NAN,
                found: slots[SLOT_NAN].to_bits(),
            });
        }

        let version = FormatVersion::from_slot(slots[SLOT_VERSION])?;
        let header = Self {
            version,
            vertex_count: read_count(slots, SLOT_VERTICES)?,
            normal_count: read_count(slots, SLOT_NORMALS)?,
            uv_count: read_count(slots, SLOT_UVS)?,
            index_count: read_count(slots, SLOT_INDICES)?,
            submesh_count: read_count(slots, SLOT_SUBMESHES)?,
        };

        if header.normal_count != header.vertex_count || header.uv_count != header.vertex_count {
            return Err(FormatError::CountMismatch {
                vertices: header.vertex_count,
                normals: header.normal_count,
                uvs: header.uv_count,
            });
        }

        Ok(header)
    }
}

fn read_count(slots: &[f32], slot: usize) -> Result<u32, FormatError> {
    let value = slots[slot];
    if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f32 {
        Ok(value as u32)
    } else {
        Err(FormatError::InvalidCount { slot, value })
    }
}
