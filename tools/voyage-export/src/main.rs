//! voyage-export - Voyage mesh export tool
//!
//! Encodes meshes (OBJ, glTF, GLB) into float OpenEXR containers that carry
//! the Voyage mesh payload in their pixels.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use voyage_common::{formats::VOYAGE_CONTAINER_EXT, inspect, DEFAULT_MAX_SIDE};

// Use modules from library
use voyage_export::{export_mesh, manifest, read_exr_stream, AxisConversion, ExportOptions};

#[derive(Parser)]
#[command(name = "voyage-export")]
#[command(about = "Voyage mesh to EXR export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build meshes from a manifest file
    Build {
        /// Path to voyage.toml manifest
        #[arg(default_value = "voyage.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without building
    Check {
        /// Path to voyage.toml manifest
        #[arg(default_value = "voyage.toml")]
        manifest: PathBuf,
    },

    /// Encode a single mesh file
    Mesh {
        /// Input mesh file (glTF/GLB/OBJ)
        input: PathBuf,

        /// Output .exr file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Axis conversion applied before encoding
        #[arg(short, long, value_enum, default_value_t = AxisConversion::MirrorX)]
        axis: AxisConversion,

        /// Largest container side (power of two)
        #[arg(long, default_value_t = DEFAULT_MAX_SIDE)]
        max_side: u32,

        /// Mesh index inside glTF files
        #[arg(short, long, default_value_t = 0)]
        mesh: usize,

        /// Also write the raw payload (little-endian f32) to this file
        #[arg(long)]
        raw: Option<PathBuf>,
    },

    /// Check the header of an encoded EXR container
    Inspect {
        /// Input .exr file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { manifest, output } => {
            tracing::info!("Building meshes from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let reports = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} meshes encoded", reports.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh {
            input,
            output,
            axis,
            max_side,
            mesh,
            raw,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension(VOYAGE_CONTAINER_EXT));
            tracing::info!("Encoding {:?} -> {:?}", input, output);

            let options = ExportOptions {
                axis,
                max_side,
                gltf_mesh: mesh,
                raw_output: raw,
            };
            export_mesh(&input, &output, &options)?;
            tracing::info!("Done!");
        }

        Commands::Inspect { input } => {
            let (size, stream) = read_exr_stream(&input)?;
            let summary = inspect(&stream)?;
            let header = &summary.header;

            tracing::info!("{:?}: {}x{} container", input, size.width, size.height);
            tracing::info!(
                "  version {}, {} vertices, {} indices, {} submeshes",
                header.version.number(),
                header.vertex_count,
                header.index_count,
                header.submesh_count
            );
            tracing::info!(
                "  payload {} of {} floats",
                summary.payload_len(),
                size.capacity()
            );
            for (i, submesh) in summary.submeshes.iter().enumerate() {
                tracing::info!(
                    "  [{}] start {}, {} indices",
                    i,
                    submesh.start,
                    submesh.count
                );
            }
        }
    }

    Ok(())
}
