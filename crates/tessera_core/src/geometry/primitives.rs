//! Built-in primitives used by tests and the demo scene.
//!
//! The cube uses 24 unique vertices (4 per face, so every face keeps its own
//! normal and uvs) and 36 indices (2 triangles per face × 6 faces).

use super::GeometryBuffer;
use crate::error::GeometryError;

/// Axis-aligned cube of edge length `size` centred at the origin.
pub fn cube(size: f32) -> GeometryBuffer {
    let h = size * 0.5;

    // (normal, tangent u, tangent v) per face; corners are centre ± u ± v
    #[rustfmt::skip]
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([ 0.0,  0.0,  1.0], [ 1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // front  (z+)
        ([ 0.0,  0.0, -1.0], [-1.0, 0.0,  0.0], [0.0, 1.0,  0.0]), // back   (z-)
        ([-1.0,  0.0,  0.0], [ 0.0, 0.0,  1.0], [0.0, 1.0,  0.0]), // left   (x-)
        ([ 1.0,  0.0,  0.0], [ 0.0, 0.0, -1.0], [0.0, 1.0,  0.0]), // right  (x+)
        ([ 0.0,  1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0, -1.0]), // top    (y+)
        ([ 0.0, -1.0,  0.0], [ 1.0, 0.0,  0.0], [0.0, 0.0,  1.0]), // bottom (y-)
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut positions = Vec::with_capacity(24 * 3);
    let mut normals = Vec::with_capacity(24 * 3);
    let mut uvs = Vec::with_capacity(24 * 2);
    let mut indices = Vec::with_capacity(36);

    for (face, (n, u, v)) in FACES.iter().enumerate() {
        for &(su, sv) in &CORNERS {
            for axis in 0..3 {
                positions.push((n[axis] + su * u[axis] + sv * v[axis]) * h);
            }
            normals.extend_from_slice(n);
            uvs.extend_from_slice(&[(su + 1.0) * 0.5, (1.0 - sv) * 0.5]);
        }
        let base = (face * 4) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    built(GeometryBuffer::new(positions, Some(normals), Some(uvs), Some(indices)))
}

/// Indexed quad of `width × height` on the XY plane facing +Z.
pub fn quad(width: f32, height: f32) -> GeometryBuffer {
    let (hw, hh) = (width * 0.5, height * 0.5);
    #[rustfmt::skip]
    let positions = vec![
        -hw, -hh, 0.0,
         hw, -hh, 0.0,
         hw,  hh, 0.0,
        -hw,  hh, 0.0,
    ];
    let normals = [0.0f32, 0.0, 1.0].repeat(4);
    let uvs = vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
    built(GeometryBuffer::new(
        positions,
        Some(normals),
        Some(uvs),
        Some(vec![0, 1, 2, 0, 2, 3]),
    ))
}

/// Non-indexed, position-only unit triangle.
pub fn triangle() -> GeometryBuffer {
    built(GeometryBuffer::from_positions(vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0,
    ]))
}

/// Unwraps generator output.  The attribute arrays above are fixed, so an
/// error is a bug in this file: debug builds panic, release builds log it and
/// fall back to an empty buffer.
fn built(result: Result<GeometryBuffer, GeometryError>) -> GeometryBuffer {
    debug_assert!(result.is_ok(), "invalid primitive data: {result:?}");
    result.unwrap_or_else(|err| {
        log::error!("primitive generator produced invalid data: {err}");
        GeometryBuffer::default()
    })
}
