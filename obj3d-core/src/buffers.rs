//! Exactly-sized render buffers
//!
//! Allocated once from [`Counts`] and never resized. The decoder fills them
//! slot by slot; a write past the end means the two passes disagreed.
use nalgebra::Point3;

use crate::analyze::Counts;
use crate::error::{BufferKind, Error, Result};
use crate::geometry::Tuple3;

/// Flat buffers handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    /// `x, y, z` per vertex
    positions: Vec<f32>,
    /// `x, y, z` per normal
    normals: Vec<f32>,
    /// Three 0-based vertex indices per triangle
    indices: Vec<u32>,
    /// Per-triangle texture coordinate indices, when the face had any
    tex_indices: Vec<Option<[u32; 3]>>,
    /// Per-triangle normal indices, when the face had any
    normal_indices: Vec<Option<[u32; 3]>>,
    tex_coords: Vec<Tuple3>,
}

/// Allocate buffers sized for `counts`
pub fn allocate(counts: &Counts) -> MeshBuffers {
    MeshBuffers::allocate(counts)
}

impl MeshBuffers {
    pub fn allocate(counts: &Counts) -> Self {
        tracing::debug!(
            "Allocating {} position floats, {} normal floats, {} indices",
            counts.vertices * 3,
            counts.normals * 3,
            counts.triangles * 3
        );

        Self {
            positions: vec![0.0; counts.vertices * 3],
            normals: vec![0.0; counts.normals * 3],
            indices: vec![0; counts.triangles * 3],
            tex_indices: vec![None; counts.triangles],
            normal_indices: vec![None; counts.triangles],
            tex_coords: Vec::with_capacity(counts.tex_coords),
        }
    }

    pub fn vertex_capacity(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn normal_capacity(&self) -> usize {
        self.normals.len() / 3
    }

    pub fn triangle_capacity(&self) -> usize {
        self.tex_indices.len()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn tex_coords(&self) -> &[Tuple3] {
        &self.tex_coords
    }

    pub fn tex_indices(&self) -> &[Option<[u32; 3]>] {
        &self.tex_indices
    }

    pub fn normal_indices(&self) -> &[Option<[u32; 3]>] {
        &self.normal_indices
    }

    pub fn position(&self, index: usize) -> Option<Point3<f32>> {
        self.positions
            .get(index * 3..index * 3 + 3)
            .map(|p| Point3::new(p[0], p[1], p[2]))
    }

    pub fn normal(&self, index: usize) -> Option<Tuple3> {
        self.normals
            .get(index * 3..index * 3 + 3)
            .map(|n| Tuple3::new(n[0], n[1], n[2]))
    }

    pub fn triangle(&self, ordinal: usize) -> Option<[u32; 3]> {
        self.indices
            .get(ordinal * 3..ordinal * 3 + 3)
            .map(|t| [t[0], t[1], t[2]])
    }

    pub(crate) fn write_position(&mut self, slot: usize, value: [f32; 3]) -> Result<()> {
        write_triple(&mut self.positions, slot, value, BufferKind::Positions)
    }

    pub(crate) fn write_normal(&mut self, slot: usize, value: [f32; 3]) -> Result<()> {
        write_triple(&mut self.normals, slot, value, BufferKind::Normals)
    }

    pub(crate) fn write_triangle(
        &mut self,
        ordinal: usize,
        vertices: [u32; 3],
        tex: Option<[u32; 3]>,
        normals: Option<[u32; 3]>,
    ) -> Result<()> {
        if ordinal >= self.triangle_capacity() {
            return Err(Error::CapacityExceeded {
                buffer: BufferKind::Triangles,
                capacity: self.triangle_capacity(),
            });
        }

        self.indices[ordinal * 3..ordinal * 3 + 3].copy_from_slice(&vertices);
        self.tex_indices[ordinal] = tex;
        self.normal_indices[ordinal] = normals;
        Ok(())
    }

    pub(crate) fn push_tex_coord(&mut self, value: Tuple3) {
        self.tex_coords.push(value);
    }
}

fn write_triple(buffer: &mut [f32], slot: usize, value: [f32; 3], kind: BufferKind) -> Result<()> {
    match buffer.get_mut(slot * 3..slot * 3 + 3) {
        Some(dst) => {
            dst.copy_from_slice(&value);
            Ok(())
        }
        None => Err(Error::CapacityExceeded {
            buffer: kind,
            capacity: buffer.len() / 3,
        }),
    }
}
