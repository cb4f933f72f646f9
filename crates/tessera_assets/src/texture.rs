//! Source textures for atlas packing.

use image::{Rgba, RgbaImage};
use tessera_core::TextureId;

use crate::error::TextureError;

/// An RGBA8 image with a stable identity.
#[derive(Debug, Clone)]
pub struct TextureImage {
    id: TextureId,
    image: RgbaImage,
}

impl TextureImage {
    /// Wraps `width × height` tightly packed RGBA8 pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::PixelLength {
                expected,
                actual: pixels.len(),
            });
        }
        let image = RgbaImage::from_raw(width, height, pixels).ok_or(TextureError::PixelLength {
            expected,
            actual: 0,
        })?;
        Self::from_image(image)
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize { width, height });
        }
        Ok(Self {
            id: TextureId::fresh(),
            image,
        })
    }

    /// Texture filled with one colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, TextureError> {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Bytes this texture occupies as a standalone GPU texture, where most
    /// drivers round each dimension up to a power of two.
    pub fn gpu_footprint(&self) -> u64 {
        self.width().next_power_of_two() as u64 * self.height().next_power_of_two() as u64 * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_pixel_length() {
        assert_eq!(
            TextureImage::new(2, 2, vec![0; 15]).unwrap_err(),
            TextureError::PixelLength {
                expected: 16,
                actual: 15
            }
        );
        assert!(TextureImage::new(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn rejects_zero_size() {
        assert_eq!(
            TextureImage::solid(0, 4, [0; 4]).unwrap_err(),
            TextureError::ZeroSize {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn footprint_rounds_to_power_of_two() {
        let t = TextureImage::solid(100, 60, [255; 4]).unwrap();
        assert_eq!(t.area(), 6000);
        assert_eq!(t.gpu_footprint(), 128 * 64 * 4);
    }

    #[test]
    fn each_texture_has_its_own_id() {
        let a = TextureImage::solid(1, 1, [0; 4]).unwrap();
        let b = TextureImage::solid(1, 1, [0; 4]).unwrap();
        assert_ne!(a.id(), b.id());
    }
}
