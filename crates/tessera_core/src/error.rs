use thiserror::Error;

/// Reasons a [`GeometryBuffer`](crate::geometry::GeometryBuffer) refuses to
/// be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("position array length {len} is not a multiple of 3")]
    PositionsNotTriples { len: usize },
    #[error("{attribute} array has {actual} floats, expected {expected}")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("{count} vertices cannot be addressed by u32 indices")]
    TooManyVertices { count: usize },
}
