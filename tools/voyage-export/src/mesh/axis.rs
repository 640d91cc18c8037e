//! Axis conversion applied to loaded meshes
//!
//! Every conversion here mirrors the mesh. The encoder reverses triangle
//! winding, which restores outward-facing triangles after the mirror.

use glam::Vec3;
use serde::Deserialize;
use voyage_common::MeshInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AxisConversion {
    /// Negate X (right-handed to left-handed, same up axis)
    #[default]
    MirrorX,
    /// Swap Y and Z (Z-up right-handed to Y-up left-handed)
    ZUpToYUp,
    /// Keep coordinates as authored
    #[serde(rename = "none")]
    #[value(name = "none")]
    Identity,
}

impl AxisConversion {
    pub fn convert(self, v: Vec3) -> Vec3 {
        match self {
            Self::MirrorX => Vec3::new(-v.x, v.y, v.z),
            Self::ZUpToYUp => Vec3::new(v.x, v.z, v.y),
            Self::Identity => v,
        }
    }

    /// Convert positions and normals in place
    pub fn apply(self, mesh: &mut MeshInput) {
        if self == Self::Identity {
            return;
        }
        for v in mesh.vertices.iter_mut().chain(mesh.normals.iter_mut()) {
            *v = self.convert(*v);
        }
    }
}
