use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextureError {
    #[error("texture must have non-zero size, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("pixel buffer has {actual} bytes, expected {expected} for RGBA8")]
    PixelLength { expected: usize, actual: usize },
}
