//! Mesh sources (OBJ/glTF -> MeshInput)

mod axis;
mod gltf;
mod obj;

use anyhow::Result;
use std::path::Path;
use voyage_common::MeshInput;

pub use axis::AxisConversion;
pub use self::gltf::load_gltf;
pub use obj::{load_obj, parse_obj};

/// Supported mesh source formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Obj,
    Gltf,
}

impl SourceFormat {
    /// Detect format by extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "gltf" | "glb" => Some(Self::Gltf),
            _ => None,
        }
    }
}

/// Load a mesh file. `gltf_mesh` selects the mesh inside glTF files.
pub fn load_mesh(input: &Path, gltf_mesh: usize) -> Result<MeshInput> {
    match SourceFormat::from_path(input) {
        Some(SourceFormat::Obj) => load_obj(input),
        Some(SourceFormat::Gltf) => load_gltf(input, gltf_mesh),
        None => anyhow::bail!(
            "Unsupported mesh format: {:?} (use .obj, .gltf, or .glb)",
            input
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_detection() {
        assert_eq!(SourceFormat::from_path(Path::new("a.OBJ")), Some(SourceFormat::Obj));
        assert_eq!(SourceFormat::from_path(Path::new("a.glb")), Some(SourceFormat::Gltf));
        assert_eq!(SourceFormat::from_path(Path::new("a.gltf")), Some(SourceFormat::Gltf));
        assert_eq!(SourceFormat::from_path(Path::new("a.fbx")), None);
        assert_eq!(SourceFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = load_mesh(Path::new("model.fbx"), 0).unwrap_err();
        assert!(err.to_string().contains("Unsupported mesh format"));
    }
}
