//! OpenEXR container writer and reader

use anyhow::{Context, Result};
use image::{ImageError, ImageFormat, Rgba32FImage};
use std::io;
use std::path::Path;
use voyage_common::{ContainerSize, FloatImageWriter};

/// Writes containers as 32-bit float RGBA OpenEXR files.
///
/// EXR keeps full f32 precision (no half floats, no lossy codecs), so counts,
/// indices, infinity and NaN survive unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExrWriter;

impl FloatImageWriter for ExrWriter {
    fn persist(
        &mut self,
        size: ContainerSize,
        pixels: Vec<f32>,
        destination: &Path,
    ) -> io::Result<()> {
        let image = Rgba32FImage::from_raw(size.width, size.height, pixels).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("pixel buffer does not match {}x{} RGBA", size.width, size.height),
            )
        })?;

        image
            .save_with_format(destination, ImageFormat::OpenExr)
            .map_err(|e| match e {
                ImageError::IoError(err) => err,
                other => io::Error::other(other),
            })
    }
}

/// Read an EXR container back as its flat RGBA float stream
pub fn read_exr_stream(path: &Path) -> Result<(ContainerSize, Vec<f32>)> {
    let image = image::open(path).with_context(|| format!("Failed to load EXR: {:?}", path))?;
    let size = ContainerSize {
        width: image.width(),
        height: image.height(),
    };
    Ok((size, image.into_rgba32f().into_raw()))
}
