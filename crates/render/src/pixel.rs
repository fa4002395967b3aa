//! CPU implementation of [`Surface`] over an RGBA8 [`Raster`].
//!
//! Always available (no feature gate) so the offline driver and tests can
//! paint without pulling in the `image` crate.
//!
//! Coverage is by pixel center: a pixel is inside a shape when its center
//! `(x + 0.5, y + 0.5)` is. Drawing composites straight-alpha colors with the
//! source-over operator.

use dotscape_core::error::DotError;
use dotscape_core::{Raster, Rgb8, Surface};
use glam::DVec2;
use std::ops::Range;

/// A surface that rasterizes draw calls into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    raster: Raster,
}

impl PixelSurface {
    /// Creates a transparent surface.
    ///
    /// Returns `DotError::InvalidDimensions` if either dimension is zero.
    pub fn new(width: usize, height: usize) -> Result<Self, DotError> {
        Ok(Self {
            raster: Raster::new(width, height)?,
        })
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn into_raster(self) -> Raster {
        self.raster
    }

    fn blend_at(&mut self, x: usize, y: usize, color: Rgb8, alpha: f64) {
        let (xi, yi) = (x as isize, y as isize);
        let dst = self.raster.pixel(xi, yi);
        self.raster.put_pixel(xi, yi, source_over(dst, color, alpha));
    }
}

/// Composites `color` at `alpha` over the straight-alpha pixel `dst`.
fn source_over(dst: [u8; 4], color: Rgb8, alpha: f64) -> [u8; 4] {
    let sa = alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| {
        let v = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(color.r, dst[0]),
        channel(color.g, dst[1]),
        channel(color.b, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Pixel indices along one axis whose centers fall in `[start, start + len)`,
/// clipped to `0..limit`.
fn span(start: f64, len: f64, limit: usize) -> Range<usize> {
    let lo = (start - 0.5).ceil().max(0.0);
    let hi = (start + len - 0.5).ceil().min(limit as f64);
    if hi > lo {
        lo as usize..hi as usize
    } else {
        0..0
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (usize, usize) {
        (self.raster.width(), self.raster.height())
    }

    fn resize(&mut self, width: usize, height: usize) -> Result<(), DotError> {
        self.raster = Raster::new(width, height)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DotError> {
        self.raster.data_mut().fill(0);
        Ok(())
    }

    fn fill(&mut self, color: Rgb8) -> Result<(), DotError> {
        for px in self.raster.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
        Ok(())
    }

    fn fill_rect(
        &mut self,
        origin: DVec2,
        size: DVec2,
        color: Rgb8,
        alpha: f64,
    ) -> Result<(), DotError> {
        let (w, h) = self.size();
        let cols = span(origin.x, size.x, w);
        for y in span(origin.y, size.y, h) {
            for x in cols.clone() {
                self.blend_at(x, y, color, alpha);
            }
        }
        Ok(())
    }

    fn fill_circle(
        &mut self,
        center: DVec2,
        radius: f64,
        color: Rgb8,
        alpha: f64,
    ) -> Result<(), DotError> {
        if radius.is_nan() || radius <= 0.0 {
            return Ok(());
        }
        let (w, h) = self.size();
        let r2 = radius * radius;
        let cols = span(center.x - radius, 2.0 * radius + 1.0, w);
        for y in span(center.y - radius, 2.0 * radius + 1.0, h) {
            for x in cols.clone() {
                let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if p.distance_squared(center) <= r2 {
                    self.blend_at(x, y, color, alpha);
                }
            }
        }
        Ok(())
    }

    fn blit(&mut self, raster: &Raster, x: i64, y: i64) -> Result<(), DotError> {
        let (w, h) = self.size();
        for sy in 0..raster.height() {
            let dy = y + sy as i64;
            if dy < 0 || dy >= h as i64 {
                continue;
            }
            for sx in 0..raster.width() {
                let dx = x + sx as i64;
                if dx < 0 || dx >= w as i64 {
                    continue;
                }
                let [r, g, b, a] = raster.pixel(sx as isize, sy as isize);
                self.blend_at(
                    dx as usize,
                    dy as usize,
                    Rgb8::new(r, g, b),
                    a as f64 / 255.0,
                );
            }
        }
        Ok(())
    }
}
