//! Decoded raster images as a [`SourceImage`].
//!
//! Feature-gated behind `png` together with the `image` dependency. PNG, JPEG
//! and WebP sources decode; anything else, or a decode error, becomes
//! [`DotError::LoadFailure`] naming the source.

use dotscape_core::error::DotError;
use dotscape_core::{Raster, SourceImage};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::Path;

/// An RGBA image decoded from a file or a byte buffer.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pixels: RgbaImage,
    name: String,
    readable: bool,
}

impl DecodedImage {
    /// Decodes the image at `path`.
    pub fn open(path: &Path) -> Result<Self, DotError> {
        let name = path.display().to_string();
        let decoded = image::open(path).map_err(|e| DotError::LoadFailure {
            source_name: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
            name,
            readable: true,
        })
    }

    /// Decodes an in-memory encoded image, guessing its format.
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self, DotError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| DotError::LoadFailure {
            source_name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pixels: decoded.to_rgba8(),
            name: name.to_string(),
            readable: true,
        })
    }

    /// Marks the image as drawable but not readable, the way a host treats
    /// an image from a foreign origin.
    pub fn without_readback(mut self) -> Self {
        self.readable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SourceImage for DecodedImage {
    fn natural_size(&self) -> (usize, usize) {
        (self.pixels.width() as usize, self.pixels.height() as usize)
    }

    /// Triangle-filtered resample to `width x height`.
    fn rasterize(&self, width: usize, height: usize) -> Result<Raster, DotError> {
        let w = u32::try_from(width).map_err(|_| DotError::InvalidDimensions)?;
        let h = u32::try_from(height).map_err(|_| DotError::InvalidDimensions)?;
        Raster::check_size(width, height)?;
        let resized = if self.pixels.dimensions() == (w, h) {
            self.pixels.clone()
        } else {
            imageops::resize(&self.pixels, w, h, FilterType::Triangle)
        };
        Raster::from_rgba(width, height, resized.into_raw())
    }

    fn readable(&self) -> bool {
        self.readable
    }
}
