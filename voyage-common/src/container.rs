//! Float image container
//!
//! A payload is stored as the RGBA channels of a square, power-of-two float
//! image. The image itself is produced by a [`FloatImageWriter`]; this module
//! only picks the size and fills the buffer.

use std::io;
use std::path::{Path, PathBuf};

use crate::formats::EncodedPayload;

/// Channels per pixel (R, G, B, A)
pub const CHANNEL_COUNT: usize = 4;

/// Largest side length used unless the caller asks for less
pub const DEFAULT_MAX_SIDE: u32 = 2048;

/// Errors raised while storing a payload
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// No square image up to `max_side` holds the payload
    #[error("payload of {payload_len} floats does not fit in a {max_side}x{max_side} RGBA image")]
    CapacityExceeded { payload_len: usize, max_side: u32 },

    /// The image writer failed to persist the buffer
    #[error("failed to write container: {0}")]
    Io(#[from] io::Error),
}

/// Dimensions of a container image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerSize {
    pub width: u32,
    pub height: u32,
}

impl ContainerSize {
    pub fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Number of float channels in the image
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize * CHANNEL_COUNT
    }
}

/// Smallest power-of-two square whose channel count is strictly greater than
/// `payload_len`.
///
/// A payload filling an image exactly moves up to the next size.
pub fn size_for(payload_len: usize, max_side: u32) -> Result<ContainerSize, ContainerError> {
    let mut side: u64 = 1;
    while side <= max_side as u64 {
        if side * side * CHANNEL_COUNT as u64 > payload_len as u64 {
            return Ok(ContainerSize::square(side as u32));
        }
        side <<= 1;
    }
    Err(ContainerError::CapacityExceeded {
        payload_len,
        max_side,
    })
}

/// Image writer used to persist containers.
///
/// Implementations must store 32-bit float channels losslessly; any
/// quantization corrupts counts and indices.
pub trait FloatImageWriter {
    /// Zero-filled RGBA buffer for an image of `size`
    fn allocate(&mut self, size: ContainerSize) -> Vec<f32> {
        vec![0.0; size.capacity()]
    }

    /// Persist `pixels` (row-major, top-left origin, RGBA) to `destination`
    fn persist(&mut self, size: ContainerSize, pixels: Vec<f32>, destination: &Path)
        -> io::Result<()>;
}

/// Size a container for `payload`, fill it, and hand it to `writer`.
///
/// Channels past the payload stay zero. Returns the chosen size.
pub fn write_payload<W: FloatImageWriter + ?Sized>(
    payload: &EncodedPayload,
    max_side: u32,
    writer: &mut W,
    destination: &Path,
) -> Result<ContainerSize, ContainerError> {
    let size = size_for(payload.len(), max_side)?;
    tracing::debug!(
        "Container {}x{} ({} channels) for {} payload floats",
        size.width,
        size.height,
        size.capacity(),
        payload.len()
    );

    let mut pixels = writer.allocate(size);
    if pixels.len() != size.capacity() {
        return Err(ContainerError::Io(io::Error::other(format!(
            "writer allocated {} channels, expected {}",
            pixels.len(),
            size.capacity()
        ))));
    }
    pixels[..payload.len()].copy_from_slice(payload.as_slice());

    writer.persist(size, pixels, destination)?;
    Ok(size)
}

/// Writer that keeps containers in memory
#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub written: Vec<(PathBuf, ContainerSize, Vec<f32>)>,
}

impl FloatImageWriter for MemoryWriter {
    fn persist(
        &mut self,
        size: ContainerSize,
        pixels: Vec<f32>,
        destination: &Path,
    ) -> io::Result<()> {
        self.written.push((destination.to_path_buf(), size, pixels));
        Ok(())
    }
}
