//! Reference images: the optional RGBA raster behind the grid.
//!
//! A reference is both the faint underlay shown while painting and the
//! source for auto-conversion. It is never modified once loaded.

use std::path::Path;

use image::RgbaImage;

use crate::error::GridError;

/// A decoded, read-only RGBA raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    image: RgbaImage,
}

impl ReferenceImage {
    /// Wrap raw RGBA bytes (4 per pixel, row-major) as handed over by a
    /// browser canvas or another decoder.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, GridError> {
        let expected = width as usize * height as usize * 4;
        let actual = pixels.len();
        if width == 0 || height == 0 || actual != expected {
            return Err(GridError::InvalidPixelBuffer { width, height, expected, actual });
        }
        match RgbaImage::from_raw(width, height, pixels) {
            Some(image) => Ok(Self { image }),
            None => Err(GridError::InvalidPixelBuffer { width, height, expected, actual }),
        }
    }

    /// Decode an encoded image (PNG, JPEG, GIF, BMP, WebP) from memory.
    pub fn decode(bytes: &[u8]) -> Result<Self, GridError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_image(image)
    }

    /// Decode an image file from disk.
    pub fn open(path: &Path) -> Result<Self, GridError> {
        let image = image::open(path)?.to_rgba8();
        Self::from_image(image)
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, GridError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(GridError::InvalidPixelBuffer {
                width: image.width(),
                height: image.height(),
                expected: 0,
                actual: 0,
            });
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}
