//! The source image seam.
//!
//! The sampler never decodes files. It talks to a [`SourceImage`], which
//! knows its natural size and can render itself at any size. Pixel readback
//! may be forbidden (an image from a foreign origin, say). Such an image can
//! still be drawn by the host, just not sampled.

use crate::error::DotError;
use crate::raster::Raster;

/// A loaded raster image the sampler can fit and read.
pub trait SourceImage {
    /// Natural `(width, height)` in pixels.
    fn natural_size(&self) -> (usize, usize);

    /// Renders the image scaled to exactly `width x height`.
    fn rasterize(&self, width: usize, height: usize) -> Result<Raster, DotError>;

    /// Whether pixel data may be read back for sampling.
    fn readable(&self) -> bool {
        true
    }
}

impl SourceImage for Raster {
    fn natural_size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    fn rasterize(&self, width: usize, height: usize) -> Result<Raster, DotError> {
        if width == self.width() && height == self.height() {
            return Ok(self.clone());
        }
        self.resized_nearest(width, height)
    }
}
