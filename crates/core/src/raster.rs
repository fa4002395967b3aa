//! Row-major RGBA8 pixel buffer with edge-clamped access.
//!
//! A [`Raster`] holds the fitted source image the sampler reads from, and is
//! also what a host surface blits when pixelation is unavailable. Unlike a
//! toroidal grid, out-of-range coordinates clamp to the nearest edge pixel:
//! neighborhood reads at the border reuse the border.

use crate::color::{luminance, Rgb8};
use crate::error::DotError;

/// Largest raster area accepted, in pixels (8192 x 8192).
pub const MAX_PIXELS: usize = 1 << 26;

/// An RGBA8 image with `width * height * 4` bytes in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Raster {
    /// Checks `width x height` without allocating: both non-zero and at most
    /// [`MAX_PIXELS`] pixels.
    pub fn check_size(width: usize, height: usize) -> Result<(), DotError> {
        byte_len(width, height).map(|_| ())
    }

    /// Creates a fully transparent black raster.
    ///
    /// Returns `DotError::InvalidDimensions` if either dimension is zero or
    /// the area exceeds [`MAX_PIXELS`].
    pub fn new(width: usize, height: usize) -> Result<Self, DotError> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Creates a raster filled with one opaque-or-not color.
    pub fn filled(width: usize, height: usize, color: Rgb8, alpha: u8) -> Result<Self, DotError> {
        let len = byte_len(width, height)?;
        let data = [color.r, color.g, color.b, alpha]
            .into_iter()
            .cycle()
            .take(len)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps an existing RGBA8 buffer, validating its length.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DotError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(DotError::Surface(format!(
                "RGBA buffer of {} bytes does not match {width}x{height} ({expected} bytes)",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw RGBA bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the raster, returning its RGBA bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of `(x, y)` after clamping both coordinates to the edges.
    fn offset(&self, x: isize, y: isize) -> usize {
        let xi = x.clamp(0, self.width as isize - 1) as usize;
        let yi = y.clamp(0, self.height as isize - 1) as usize;
        (yi * self.width + xi) * 4
    }

    /// RGBA at `(x, y)`, edge-clamped.
    pub fn pixel(&self, x: isize, y: isize) -> [u8; 4] {
        let o = self.offset(x, y);
        [self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]]
    }

    /// Writes RGBA at `(x, y)`. Out-of-range writes are ignored.
    pub fn put_pixel(&mut self, x: isize, y: isize, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let o = (y as usize * self.width + x as usize) * 4;
        self.data[o..o + 4].copy_from_slice(&rgba);
    }

    /// Rec. 709 luminance of the edge-clamped pixel at `(x, y)`, in [0, 255].
    pub fn luminance_at(&self, x: isize, y: isize) -> f64 {
        let [r, g, b, _] = self.pixel(x, y);
        luminance(r as f64, g as f64, b as f64)
    }

    /// Nearest-neighbor resample to `width x height` (minimum 1x1 each).
    pub fn resized_nearest(&self, width: usize, height: usize) -> Result<Raster, DotError> {
        let mut out = Raster::new(width.max(1), height.max(1))?;
        let (ow, oh) = (out.width, out.height);
        for y in 0..oh {
            let sy = (y * self.height) / oh;
            for x in 0..ow {
                let sx = (x * self.width) / ow;
                let src = self.pixel(sx as isize, sy as isize);
                out.put_pixel(x as isize, y as isize, src);
            }
        }
        Ok(out)
    }
}

fn byte_len(width: usize, height: usize) -> Result<usize, DotError> {
    if width == 0 || height == 0 {
        return Err(DotError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .filter(|&n| n <= MAX_PIXELS)
        .map(|n| n * 4)
        .ok_or(DotError::InvalidDimensions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(Raster::new(0, 4).is_err());
        assert!(Raster::new(4, 0).is_err());
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        assert!(Raster::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn size_above_pixel_cap_is_rejected_without_allocating() {
        assert!(Raster::check_size(8192, 8192).is_ok());
        assert!(matches!(
            Raster::check_size(8193, 8192),
            Err(DotError::InvalidDimensions)
        ));
        assert!(matches!(
            Raster::new(2000, 20_000_000),
            Err(DotError::InvalidDimensions)
        ));
    }

    #[test]
    fn filled_sets_every_pixel() {
        let r = Raster::filled(3, 2, Rgb8::new(1, 2, 3), 200).unwrap();
        assert_eq!(r.data().len(), 3 * 2 * 4);
        assert!(r.data().chunks_exact(4).all(|p| p == [1, 2, 3, 200]));
    }

    #[test]
    fn from_rgba_validates_length() {
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(Raster::from_rgba(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn pixel_clamps_to_edges() {
        let mut r = Raster::new(2, 2).unwrap();
        r.put_pixel(0, 0, [10, 0, 0, 255]);
        r.put_pixel(1, 1, [20, 0, 0, 255]);
        assert_eq!(r.pixel(-5, -5)[0], 10);
        assert_eq!(r.pixel(9, 9)[0], 20);
    }

    #[test]
    fn put_pixel_out_of_range_is_ignored() {
        let mut r = Raster::new(2, 2).unwrap();
        r.put_pixel(-1, 0, [255; 4]);
        r.put_pixel(2, 0, [255; 4]);
        assert!(r.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn luminance_at_white_is_255() {
        let r = Raster::filled(2, 2, Rgb8::WHITE, 255).unwrap();
        assert!((r.luminance_at(0, 0) - 255.0).abs() < 1e-9);
    }

    #[test]
    fn resized_nearest_upscales_by_repetition() {
        let mut r = Raster::new(2, 1).unwrap();
        r.put_pixel(0, 0, [255, 0, 0, 255]);
        r.put_pixel(1, 0, [0, 0, 255, 255]);
        let up = r.resized_nearest(4, 2).unwrap();
        assert_eq!(up.width(), 4);
        assert_eq!(up.height(), 2);
        assert_eq!(up.pixel(0, 1), [255, 0, 0, 255]);
        assert_eq!(up.pixel(1, 0), [255, 0, 0, 255]);
        assert_eq!(up.pixel(2, 0), [0, 0, 255, 255]);
        assert_eq!(up.pixel(3, 1), [0, 0, 255, 255]);
    }

    #[test]
    fn resized_nearest_never_produces_empty_raster() {
        let r = Raster::filled(4, 4, Rgb8::WHITE, 255).unwrap();
        let down = r.resized_nearest(0, 0).unwrap();
        assert_eq!((down.width(), down.height()), (1, 1));
    }
}
