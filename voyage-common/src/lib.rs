//! Voyage mesh encoding
//!
//! Turns a polygon mesh into a self-describing float stream and stores it in
//! the pixels of a float image, so meshes can travel through pipelines that
//! only accept textures.
//!
//! # Modules
//!
//! - [`mesh`] - Input mesh and split mesh types
//! - [`split`] - Per-corner UV to per-vertex UV splitting
//! - [`formats`] - Voyage binary layout (header, blocks, inspection)
//! - [`container`] - Square float image sizing and writer interface
//!
//! Encoding is `split` → `build` → `write_payload`. The first two steps are
//! pure; only the writer touches the outside world.

pub mod container;
pub mod formats;
pub mod mesh;
pub mod split;

pub use container::{
    size_for, write_payload, ContainerError, ContainerSize, FloatImageWriter, MemoryWriter,
    CHANNEL_COUNT, DEFAULT_MAX_SIDE,
};
pub use formats::{
    build, inspect, EncodedPayload, FormatError, FormatVersion, PayloadLayout, PayloadSummary,
    SubmeshRange, VoyageHeader,
};
pub use mesh::{MeshInput, Polygon, SplitMesh, SplitStats};
pub use split::split;

/// Split and lay out a mesh in one step
pub fn encode(mesh: &MeshInput) -> (EncodedPayload, SplitStats) {
    let split_mesh = split(mesh);
    let payload = build(&split_mesh);
    (payload, split_mesh.stats)
}
