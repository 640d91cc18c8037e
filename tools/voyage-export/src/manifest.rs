//! Manifest parsing and build orchestration
//!
//! Parses voyage.toml and exports every listed mesh.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use voyage_common::{formats::VOYAGE_CONTAINER_EXT, DEFAULT_MAX_SIDE};

use crate::mesh::{AxisConversion, SourceFormat};
use crate::{export_mesh, ExportOptions, ExportReport};

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub meshes: BTreeMap<String, MeshEntry>,
    /// Directory relative source paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exported/")
}

/// Settings applied to meshes that do not override them
#[derive(Debug, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub axis: AxisConversion,
    #[serde(default = "default_max_side")]
    pub max_side: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            axis: AxisConversion::default(),
            max_side: default_max_side(),
        }
    }
}

fn default_max_side() -> u32 {
    DEFAULT_MAX_SIDE
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MeshEntry {
    Simple(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default)]
        axis: Option<AxisConversion>,
        #[serde(default)]
        max_side: Option<u32>,
        /// Mesh index inside glTF files
        #[serde(default)]
        mesh: Option<usize>,
    },
}

impl MeshEntry {
    pub fn path(&self) -> &Path {
        match self {
            MeshEntry::Simple(p) => p,
            MeshEntry::Detailed { path, .. } => path,
        }
    }

    /// Export options for this entry, falling back to the manifest defaults
    pub fn options(&self, defaults: &Defaults) -> ExportOptions {
        let mut options = ExportOptions {
            axis: defaults.axis,
            max_side: defaults.max_side,
            ..ExportOptions::default()
        };
        if let MeshEntry::Detailed {
            axis,
            max_side,
            mesh,
            ..
        } = self
        {
            options.axis = axis.unwrap_or(options.axis);
            options.max_side = max_side.unwrap_or(options.max_side);
            options.gltf_mesh = mesh.unwrap_or(0);
        }
        options
    }
}

/// Problems found by [`validate`]
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("mesh '{name}' source not found: {path:?}")]
    SourceMissing { name: String, path: PathBuf },

    #[error("mesh '{name}' has unsupported format: {path:?} (use .obj, .gltf, or .glb)")]
    UnsupportedFormat { name: String, path: PathBuf },

    #[error("{context}: max_side {value} must be a power of two between 1 and 2048")]
    InvalidMaxSide { context: String, value: u32 },
}

impl Manifest {
    /// Source path of an entry, resolved against the manifest directory
    pub fn source_path(&self, entry: &MeshEntry) -> PathBuf {
        self.base_dir.join(entry.path())
    }

    /// Output directory, resolved against the manifest directory
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output.dir)
    }
}

/// Parse manifest text. Relative paths resolve against `base_dir`.
pub fn parse_manifest(content: &str, base_dir: &Path) -> Result<Manifest> {
    let mut manifest: Manifest = toml::from_str(content)?;
    manifest.base_dir = base_dir.to_path_buf();
    Ok(manifest)
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    parse_manifest(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

fn check_max_side(context: &str, value: u32) -> Result<(), ManifestError> {
    if value.is_power_of_two() && value <= DEFAULT_MAX_SIDE {
        Ok(())
    } else {
        Err(ManifestError::InvalidMaxSide {
            context: context.to_string(),
            value,
        })
    }
}

/// Validate a manifest without building
pub fn validate(manifest: &Manifest) -> Result<(), ManifestError> {
    check_max_side("defaults", manifest.defaults.max_side)?;

    for (name, entry) in &manifest.meshes {
        let path = manifest.source_path(entry);
        if SourceFormat::from_path(&path).is_none() {
            return Err(ManifestError::UnsupportedFormat {
                name: name.clone(),
                path,
            });
        }
        if !path.exists() {
            return Err(ManifestError::SourceMissing {
                name: name.clone(),
                path,
            });
        }
        let options = entry.options(&manifest.defaults);
        check_max_side(&format!("mesh '{}'", name), options.max_side)?;
    }
    Ok(())
}

/// Build all meshes from a manifest
pub fn build_all(
    manifest: &Manifest,
    output_override: Option<&Path>,
) -> Result<Vec<(String, ExportReport)>> {
    validate(manifest)?;

    let output_dir = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest.output_dir());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut reports = Vec::with_capacity(manifest.meshes.len());
    for (name, entry) in &manifest.meshes {
        let output = output_dir.join(format!("{}.{}", name, VOYAGE_CONTAINER_EXT));
        tracing::info!("Encoding mesh: {} -> {:?}", name, output);

        let report = export_mesh(
            &manifest.source_path(entry),
            &output,
            &entry.options(&manifest.defaults),
        )
        .with_context(|| format!("Failed to export mesh '{}'", name))?;
        reports.push((name.clone(), report));
    }

    Ok(reports)
}
