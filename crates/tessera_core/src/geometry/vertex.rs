/// Interleaved vertex used when a buffer is flattened for GPU upload.
///
/// Attributes that a [`GeometryBuffer`](super::GeometryBuffer) lacks are
/// written as zeros, so the layout is the same for every buffer.  We derive
/// `Pod`/`Zeroable` so that a slice can be reinterpreted as bytes with
/// `bytemuck`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Unit normal, or zero when the source had none.
    pub normal: [f32; 3],
    /// Texture coordinate, or zero when the source had none.
    pub uv: [f32; 2],
}

impl Vertex {
    /// Byte distance between consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
    /// Byte offset of `position`.
    pub const POSITION_OFFSET: usize = 0;
    /// Byte offset of `normal`.
    pub const NORMAL_OFFSET: usize = std::mem::size_of::<[f32; 3]>();
    /// Byte offset of `uv`.
    pub const UV_OFFSET: usize = 2 * std::mem::size_of::<[f32; 3]>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 32);
        assert_eq!(Vertex::NORMAL_OFFSET, 12);
        assert_eq!(Vertex::UV_OFFSET, 24);
    }

    #[test]
    fn casts_to_bytes() {
        let v = [Vertex {
            position: [1.0, 2.0, 3.0],
            ..Default::default()
        }];
        let bytes: &[u8] = bytemuck::cast_slice(&v);
        assert_eq!(bytes.len(), Vertex::STRIDE);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }
}
