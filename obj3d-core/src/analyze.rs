//! First pass: size the model without storing any of it
use std::io::BufRead;

use crate::error::Result;
use crate::parse::{classify, for_each_line, LineKind};

/// Structural counts of a geometry stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts {
    pub vertices: usize,
    pub normals: usize,
    pub tex_coords: usize,
    /// Triangles after fan triangulation of every face
    pub triangles: usize,
    /// The last `mtllib` filename declared, if any
    pub material_library: Option<String>,
}

/// Triangles a face with `corners` references produces
pub fn fan_triangles(corners: usize) -> usize {
    corners.saturating_sub(2)
}

/// Count vertices, normals, texture coordinates and post-triangulation
/// triangles. Numbers are not validated here, only line kinds and token
/// counts, so malformed content still counts.
pub fn analyze<R: BufRead>(reader: R) -> Result<Counts> {
    let mut counts = Counts::default();

    for_each_line(reader, |line| {
        let (kind, rest) = classify(line.text);
        match kind {
            LineKind::Vertex => counts.vertices += 1,
            LineKind::TexCoord => counts.tex_coords += 1,
            LineKind::Normal => counts.normals += 1,
            LineKind::Face => counts.triangles += fan_triangles(rest.split_whitespace().count()),
            LineKind::MaterialLib => {
                if !rest.is_empty() {
                    counts.material_library = Some(rest.to_string());
                }
            }
            LineKind::UseMaterial
            | LineKind::Group
            | LineKind::Smoothing
            | LineKind::Object
            | LineKind::Comment => {}
            LineKind::Unknown => {
                tracing::debug!("Ignoring line {}: {}", line.number, line.text)
            }
        }
        Ok(())
    })?;

    tracing::info!(
        "Analyzed: {} vertices, {} normals, {} tex coords, {} triangles",
        counts.vertices,
        counts.normals,
        counts.tex_coords,
        counts.triangles
    );

    Ok(counts)
}
