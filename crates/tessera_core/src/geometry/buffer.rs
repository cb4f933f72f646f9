//! Immutable vertex/index storage.
//!
//! A `GeometryBuffer` is validated once on construction and never mutated
//! afterwards; every transformation (merging, UV remapping) produces a new
//! buffer.  Attribute arrays are kept flat (`3` floats per position/normal,
//! `2` per uv) so they can be handed to an upload path without reshaping.

use std::borrow::Cow;

use glam::{Vec2, Vec3};

use super::{Aabb, Vertex};
use crate::error::GeometryError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffer {
    positions: Vec<f32>,
    normals: Option<Vec<f32>>,
    uvs: Option<Vec<f32>>,
    indices: Option<Vec<u32>>,
}

impl GeometryBuffer {
    /// Validates and wraps the given attribute arrays.
    ///
    /// Fails if `positions` is not made of triples, if an optional attribute
    /// does not have exactly one entry per vertex, or if an index points past
    /// the last vertex.
    pub fn new(
        positions: Vec<f32>,
        normals: Option<Vec<f32>>,
        uvs: Option<Vec<f32>>,
        indices: Option<Vec<u32>>,
    ) -> Result<Self, GeometryError> {
        if positions.len() % 3 != 0 {
            return Err(GeometryError::PositionsNotTriples {
                len: positions.len(),
            });
        }
        let vertex_count = positions.len() / 3;
        if vertex_count > u32::MAX as usize {
            return Err(GeometryError::TooManyVertices {
                count: vertex_count,
            });
        }
        check_len("normal", normals.as_deref(), vertex_count * 3)?;
        check_len("uv", uvs.as_deref(), vertex_count * 2)?;
        if let Some(&index) = indices
            .as_deref()
            .and_then(|idx| idx.iter().find(|&&i| i as usize >= vertex_count))
        {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            indices,
        })
    }

    /// Position-only, non-indexed buffer.
    pub fn from_positions(positions: Vec<f32>) -> Result<Self, GeometryError> {
        Self::new(positions, None, None, None)
    }

    // ── Raw attribute access ───────────────────────────────────────────────

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    pub fn uvs(&self) -> Option<&[f32]> {
        self.uvs.as_deref()
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    // ── Counts ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of indices drawn: the index array length, or the vertex count
    /// for a non-indexed buffer.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.vertex_count(), |idx| idx.len())
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    // ── Derived views ──────────────────────────────────────────────────────

    /// Position of vertex `i`.  Panics if `i >= vertex_count()`.
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// The index array, or `0..vertex_count` for a non-indexed buffer.
    pub fn resolved_indices(&self) -> Cow<'_, [u32]> {
        match &self.indices {
            Some(idx) => Cow::Borrowed(idx),
            None => Cow::Owned((0..self.vertex_count() as u32).collect()),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.chunks_exact(3).map(Vec3::from_slice))
    }

    /// Flattens the attribute arrays into one [`Vertex`] per vertex.
    pub fn interleaved(&self) -> Vec<Vertex> {
        (0..self.vertex_count())
            .map(|i| Vertex {
                position: [
                    self.positions[i * 3],
                    self.positions[i * 3 + 1],
                    self.positions[i * 3 + 2],
                ],
                normal: self
                    .normals
                    .as_ref()
                    .map_or([0.0; 3], |n| [n[i * 3], n[i * 3 + 1], n[i * 3 + 2]]),
                uv: self
                    .uvs
                    .as_ref()
                    .map_or([0.0; 2], |uv| [uv[i * 2], uv[i * 2 + 1]]),
            })
            .collect()
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn index_bytes(&self) -> Option<&[u8]> {
        self.indices.as_deref().map(|idx| bytemuck::cast_slice(idx))
    }

    /// CPU-side footprint of all attribute and index arrays in bytes.
    pub fn byte_size(&self) -> usize {
        let floats = self.positions.len()
            + self.normals.as_ref().map_or(0, Vec::len)
            + self.uvs.as_ref().map_or(0, Vec::len);
        floats * std::mem::size_of::<f32>()
            + self.indices.as_ref().map_or(0, Vec::len) * std::mem::size_of::<u32>()
    }

    /// Copy of this buffer with every uv passed through `remap`.
    ///
    /// Used to point a mesh at its rectangle inside a texture atlas.  A buffer
    /// without uvs is returned unchanged.
    pub fn map_uvs(&self, remap: impl Fn(Vec2) -> Vec2) -> GeometryBuffer {
        let uvs = self.uvs.as_ref().map(|uvs| {
            uvs.chunks_exact(2)
                .flat_map(|uv| remap(Vec2::from_slice(uv)).to_array())
                .collect()
        });
        GeometryBuffer {
            uvs,
            ..self.clone()
        }
    }
}

fn check_len(
    attribute: &'static str,
    data: Option<&[f32]>,
    expected: usize,
) -> Result<(), GeometryError> {
    match data {
        Some(d) if d.len() != expected => Err(GeometryError::AttributeLength {
            attribute,
            expected,
            actual: d.len(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> GeometryBuffer {
        GeometryBuffer::new(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
            Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
            Some(vec![0, 1, 2]),
        )
        .unwrap()
    }

    #[test]
    fn rejects_ragged_positions() {
        assert_eq!(
            GeometryBuffer::from_positions(vec![0.0; 4]),
            Err(GeometryError::PositionsNotTriples { len: 4 })
        );
    }

    #[test]
    fn rejects_mismatched_attributes() {
        let err = GeometryBuffer::new(vec![0.0; 6], None, Some(vec![0.0; 2]), None).unwrap_err();
        assert_eq!(
            err,
            GeometryError::AttributeLength {
                attribute: "uv",
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_out_of_range_index() {
        let err = GeometryBuffer::new(vec![0.0; 6], None, None, Some(vec![0, 2])).unwrap_err();
        assert_eq!(
            err,
            GeometryError::IndexOutOfRange {
                index: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn counts() {
        let g = tri();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.index_count(), 3);
        assert_eq!(g.triangle_count(), 1);
        let flat = GeometryBuffer::from_positions(vec![0.0; 18]).unwrap();
        assert_eq!(flat.index_count(), 6);
        assert_eq!(&*flat.resolved_indices(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn interleaved_zero_fills_missing_attributes() {
        let g = GeometryBuffer::from_positions(vec![1.0, 2.0, 3.0]).unwrap();
        let v = g.interleaved();
        assert_eq!(v[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(v[0].normal, [0.0; 3]);
        assert_eq!(v[0].uv, [0.0; 2]);
    }

    #[test]
    fn map_uvs_leaves_input_untouched() {
        let g = tri();
        let shifted = g.map_uvs(|uv| uv * 0.5 + Vec2::splat(0.25));
        assert_eq!(g.uvs().unwrap()[2], 1.0);
        assert_eq!(shifted.uvs().unwrap()[2], 0.75);
        assert_eq!(shifted.positions(), g.positions());
    }

    #[test]
    fn byte_views() {
        let g = tri();
        assert_eq!(g.position_bytes().len(), 36);
        assert_eq!(g.index_bytes().map(<[u8]>::len), Some(12));
        assert_eq!(g.byte_size(), (9 + 9 + 6) * 4 + 3 * 4);
    }
}
