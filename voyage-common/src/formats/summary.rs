//! Header and submesh table inspection
//!
//! Checks a float stream read back from a container without rebuilding the
//! mesh: header sentinels, counts, stream length and the submesh table.

use super::{FormatError, PayloadLayout, VoyageHeader, ENTRY_STRIDE};

/// One submesh table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmeshRange {
    /// Offset into the unpadded index stream
    pub start: u32,
    pub count: u32,
}

/// What a valid stream declares about itself
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadSummary {
    pub header: VoyageHeader,
    pub layout: PayloadLayout,
    pub submeshes: Vec<SubmeshRange>,
}

impl PayloadSummary {
    pub fn payload_len(&self) -> usize {
        self.layout.total_len
    }
}

/// Validate a Voyage stream (a payload, or a whole container channel stream
/// with trailing zeros).
pub fn inspect(stream: &[f32]) -> Result<PayloadSummary, FormatError> {
    let header = VoyageHeader::from_slots(stream)?;
    let layout = PayloadLayout::for_header(&header);

    if stream.len() < layout.total_len {
        return Err(FormatError::Truncated {
            needed: layout.total_len,
            found: stream.len(),
        });
    }

    let submeshes = stream[layout.submesh_offset..layout.total_len]
        .chunks_exact(ENTRY_STRIDE)
        .map(|entry| SubmeshRange {
            start: entry[0] as u32,
            count: entry[1] as u32,
        })
        .collect();

    Ok(PayloadSummary {
        header,
        layout,
        submeshes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::build;
    use crate::mesh::SplitMesh;
    use glam::{Vec2, Vec3};

    fn payload() -> Vec<f32> {
        let mesh = SplitMesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            uvs: vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            submeshes: vec![vec![2, 1, 0], vec![0, 1, 2]],
            ..Default::default()
        };
        build(&mesh).into_inner()
    }

    #[test]
    fn test_inspect_payload() {
        let summary = inspect(&payload()).unwrap();
        assert_eq!(summary.header.vertex_count, 3);
        assert_eq!(summary.header.index_count, 6);
        assert_eq!(
            summary.submeshes,
            vec![
                SubmeshRange { start: 0, count: 3 },
                SubmeshRange { start: 3, count: 3 }
            ]
        );
    }

    #[test]
    fn test_trailing_zeros_ignored() {
        let mut stream = payload();
        let len = stream.len();
        stream.resize(256, 0.0);
        assert_eq!(inspect(&stream).unwrap().payload_len(), len);
    }

    #[test]
    fn test_truncated_stream() {
        let mut stream = payload();
        stream.pop();
        assert!(matches!(
            inspect(&stream),
            Err(FormatError::Truncated { .. })
        ));
    }
}
