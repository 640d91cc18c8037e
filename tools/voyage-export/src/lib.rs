//! voyage-export library
//!
//! Loads meshes from OBJ/glTF files, encodes them with `voyage-common` and
//! stores the payload in an OpenEXR container.

pub mod container;
pub mod manifest;
pub mod mesh;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use voyage_common::{build, split, write_payload, ContainerSize, SplitStats, DEFAULT_MAX_SIDE};

pub use container::{read_exr_stream, ExrWriter};
pub use mesh::AxisConversion;

/// Per-export settings
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub axis: AxisConversion,
    /// Largest container side to try
    pub max_side: u32,
    /// Mesh index inside glTF files
    pub gltf_mesh: usize,
    /// Also write the raw payload (little-endian f32) here
    pub raw_output: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            axis: AxisConversion::default(),
            max_side: DEFAULT_MAX_SIDE,
            gltf_mesh: 0,
            raw_output: None,
        }
    }
}

/// Summary of one export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub source_vertices: usize,
    pub vertex_count: usize,
    pub index_count: usize,
    pub submesh_count: usize,
    pub stats: SplitStats,
    /// Payload length in floats
    pub payload_len: usize,
    pub container: ContainerSize,
}

/// Encode a mesh file into an EXR container
pub fn export_mesh(input: &Path, output: &Path, options: &ExportOptions) -> Result<ExportReport> {
    let mut mesh = mesh::load_mesh(input, options.gltf_mesh)?;
    options.axis.apply(&mut mesh);

    let split_mesh = split(&mesh);
    let payload = build(&split_mesh);

    if let Some(raw) = &options.raw_output {
        std::fs::write(raw, payload.to_le_bytes())
            .with_context(|| format!("Failed to write raw payload: {:?}", raw))?;
    }

    let container = write_payload(&payload, options.max_side, &mut ExrWriter, output)
        .with_context(|| format!("Failed to store {:?} in {:?}", input, output))?;

    let report = ExportReport {
        source_vertices: mesh.vertices.len(),
        vertex_count: split_mesh.vertex_count(),
        index_count: split_mesh.index_count(),
        submesh_count: split_mesh.submesh_count(),
        stats: split_mesh.stats,
        payload_len: payload.len(),
        container,
    };

    tracing::info!(
        "Encoded mesh: {} vertices ({} split), {} indices, {} submeshes, {} floats in {}x{}",
        report.vertex_count,
        report.stats.duplicated_vertices,
        report.index_count,
        report.submesh_count,
        report.payload_len,
        container.width,
        container.height
    );

    Ok(report)
}
