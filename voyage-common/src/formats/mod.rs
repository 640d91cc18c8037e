//! Voyage mesh format
//!
//! A flat stream of little-endian f32 values: a 64-slot header followed by
//! vertex, normal, UV, index and submesh blocks. The stream is meant to be
//! carried as the RGBA channels of a float image (see [`crate::container`]).
//!
//! The header's version slot selects the block layout. Readers go through
//! [`FormatVersion`] and [`PayloadLayout`] instead of hard-coding offsets.

mod header;
mod layout;
mod summary;

pub use header::*;
pub use layout::*;
pub use summary::*;

/// File extension of written containers
pub const VOYAGE_CONTAINER_EXT: &str = "exr";

/// Layout revisions understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVersion {
    /// Header + vertex/normal/uv blocks + padded indices + submesh table
    V3,
}

impl FormatVersion {
    /// Version written by [`build`]
    pub const CURRENT: Self = Self::V3;

    pub fn number(self) -> u32 {
        match self {
            Self::V3 => 3,
        }
    }

    /// Dispatch on the raw version slot
    pub fn from_slot(value: f32) -> Result<Self, FormatError> {
        match value {
            v if v == 3.0 => Ok(Self::V3),
            other => Err(FormatError::UnsupportedVersion(other)),
        }
    }
}

/// Errors raised when reading a Voyage stream back
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    /// Fewer than 64 slots available
    #[error("stream holds {0} floats, the header needs 64")]
    HeaderTooShort(usize),

    /// Magic words do not spell VOY/AGE
    #[error("bad magic words ({0}, {1}), not a Voyage payload")]
    BadMagic(f32, f32),

    /// A sentinel slot did not survive transport unchanged
    #[error("sentinel slot {slot} was altered in transport (bits {found:#010x})")]
    SentinelMismatch { slot: usize, found: u32 },

    #[error("unsupported format version {0}")]
    UnsupportedVersion(f32),

    /// A count slot does not hold a non-negative integer
    #[error("slot {slot} holds {value}, expected a count")]
    InvalidCount { slot: usize, value: f32 },

    #[error("attribute counts disagree: {vertices} vertices, {normals} normals, {uvs} uvs")]
    CountMismatch { vertices: u32, normals: u32, uvs: u32 },

    /// Stream ends before the last block
    #[error("stream holds {found} floats, the layout needs {needed}")]
    Truncated { needed: usize, found: usize },
}
