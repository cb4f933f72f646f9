//! Transform baking and buffer concatenation.
//!
//! ## Layout of a merged buffer
//!
//! Sources are appended in the order given.  For source `k` with `n_k`
//! vertices the merged arrays look like
//!
//! ```text
//! positions: [ src0 (world) | src1 (world) | ... ]
//! normals:   [ src0 or 0s   | src1 or 0s   | ... ]   present if any source has them
//! uvs:       [ src0 or 0s   | src1 or 0s   | ... ]   present if any source has them
//! indices:   [ i0 + 0       | i1 + n_0     | i2 + n_0 + n_1 | ... ]
//! ```
//!
//! Non-indexed sources contribute `0..n_k`, so the result is always indexed.

use glam::{Mat3, Mat4, Vec3};
use tessera_core::{normal_matrix, GeometryBuffer};

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::error::MergeError;

/// One source's attributes after its world matrix has been applied.
struct Baked {
    positions: Vec<f32>,
    normals: Option<Vec<f32>>,
}

fn bake(buffer: &GeometryBuffer, world: &Mat4) -> Baked {
    let positions = buffer
        .positions()
        .chunks_exact(3)
        .flat_map(|p| world.transform_point3(Vec3::from_slice(p)).to_array())
        .collect();
    let normals = buffer.normals().map(|normals| {
        let nm: Mat3 = normal_matrix(world);
        normals
            .chunks_exact(3)
            .flat_map(|n| (nm * Vec3::from_slice(n)).normalize_or_zero().to_array())
            .collect()
    });
    Baked { positions, normals }
}

/// Concatenates geometry buffers after baking each source's transform.
#[derive(Debug, Clone, Copy)]
pub struct GeometryMerger {
    max_vertices: usize,
}

impl Default for GeometryMerger {
    fn default() -> Self {
        Self::new(u32::MAX)
    }
}

impl GeometryMerger {
    /// `max_vertices` caps the merged vertex count; it can never exceed what
    /// a `u32` index can address.
    pub fn new(max_vertices: u32) -> Self {
        Self {
            max_vertices: max_vertices as usize,
        }
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    /// Bakes and concatenates `sources` into one indexed buffer.
    ///
    /// Nothing is produced if the merged vertex count would exceed the limit.
    pub fn merge(&self, sources: &[(&GeometryBuffer, Mat4)]) -> Result<GeometryBuffer, MergeError> {
        if sources.is_empty() {
            return Err(MergeError::NoSources);
        }

        let vertices: usize = sources.iter().map(|(b, _)| b.vertex_count()).sum();
        if vertices > self.max_vertices {
            return Err(MergeError::IndexOverflow {
                vertices,
                limit: self.max_vertices,
            });
        }
        let indices_len: usize = sources.iter().map(|(b, _)| b.index_count()).sum();
        let any_normals = sources.iter().any(|(b, _)| b.has_normals());
        let any_uvs = sources.iter().any(|(b, _)| b.has_uvs());

        #[cfg(not(target_arch = "wasm32"))]
        let baked: Vec<Baked> = sources.par_iter().map(|(b, m)| bake(b, m)).collect();
        #[cfg(target_arch = "wasm32")]
        let baked: Vec<Baked> = sources.iter().map(|(b, m)| bake(b, m)).collect();

        let mut positions = Vec::with_capacity(vertices * 3);
        let mut normals = any_normals.then(|| Vec::with_capacity(vertices * 3));
        let mut uvs = any_uvs.then(|| Vec::with_capacity(vertices * 2));
        let mut indices = Vec::with_capacity(indices_len);

        let mut base = 0u32;
        for ((buffer, _), baked) in sources.iter().zip(baked) {
            let n = buffer.vertex_count();
            positions.extend_from_slice(&baked.positions);
            if let Some(out) = normals.as_mut() {
                match &baked.normals {
                    Some(src) => out.extend_from_slice(src),
                    None => out.resize(out.len() + n * 3, 0.0),
                }
            }
            if let Some(out) = uvs.as_mut() {
                match buffer.uvs() {
                    Some(src) => out.extend_from_slice(src),
                    None => out.resize(out.len() + n * 2, 0.0),
                }
            }
            indices.extend(buffer.resolved_indices().iter().map(|i| i + base));
            // fits: `vertices <= max_vertices <= u32::MAX`
            base += n as u32;
        }

        Ok(GeometryBuffer::new(positions, normals, uvs, Some(indices))?)
    }
}
