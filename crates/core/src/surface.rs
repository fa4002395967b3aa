//! The host drawing surface seam.
//!
//! The driver issues a handful of immediate-mode 2D calls per frame against a
//! [`Surface`]. Implementations decide what a call means: the render crate
//! rasterizes into an RGBA buffer, tests record the calls.

use crate::color::{Background, Rgb8};
use crate::config::DotShape;
use crate::error::DotError;
use crate::raster::Raster;
use glam::DVec2;

/// A 2D drawing target sized in destination pixels.
pub trait Surface {
    /// Current `(width, height)`.
    fn size(&self) -> (usize, usize);

    /// Resizes the surface. Contents afterwards are unspecified.
    fn resize(&mut self, width: usize, height: usize) -> Result<(), DotError>;

    /// Clears every pixel to transparent.
    fn clear(&mut self) -> Result<(), DotError>;

    /// Fills every pixel with an opaque color.
    fn fill(&mut self, color: Rgb8) -> Result<(), DotError>;

    /// Fills an axis-aligned rectangle, blending with `alpha` in [0, 1].
    fn fill_rect(
        &mut self,
        origin: DVec2,
        size: DVec2,
        color: Rgb8,
        alpha: f64,
    ) -> Result<(), DotError>;

    /// Fills a disc, blending with `alpha` in [0, 1].
    fn fill_circle(
        &mut self,
        center: DVec2,
        radius: f64,
        color: Rgb8,
        alpha: f64,
    ) -> Result<(), DotError>;

    /// Copies `raster` with its top-left at `(x, y)`, alpha-composited.
    fn blit(&mut self, raster: &Raster, x: i64, y: i64) -> Result<(), DotError>;
}

/// Paints the per-frame background: solid fill, or clear when transparent.
pub fn paint_background<S: Surface + ?Sized>(
    surface: &mut S,
    background: Background,
) -> Result<(), DotError> {
    match background {
        Background::Transparent => surface.clear(),
        Background::Solid(color) => surface.fill(color),
    }
}

/// Paints one dot of side/diameter `size` centered on `center`.
pub fn paint_dot<S: Surface + ?Sized>(
    surface: &mut S,
    shape: DotShape,
    center: DVec2,
    size: f64,
    color: Rgb8,
    alpha: f64,
) -> Result<(), DotError> {
    match shape {
        DotShape::Circle => surface.fill_circle(center, size / 2.0, color, alpha),
        DotShape::Square => surface.fill_rect(
            center - DVec2::splat(size / 2.0),
            DVec2::splat(size),
            color,
            alpha,
        ),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{DrawCall, RecordingSurface};
    use super::*;

    #[test]
    fn transparent_background_clears() {
        let mut s = RecordingSurface::new(4, 4);
        paint_background(&mut s, Background::Transparent).unwrap();
        assert_eq!(s.calls, vec![DrawCall::Clear]);
    }

    #[test]
    fn solid_background_fills() {
        let mut s = RecordingSurface::new(4, 4);
        paint_background(&mut s, Background::Solid(Rgb8::WHITE)).unwrap();
        assert_eq!(s.calls, vec![DrawCall::Fill(Rgb8::WHITE)]);
    }

    #[test]
    fn square_dot_is_centered() {
        let mut s = RecordingSurface::new(10, 10);
        paint_dot(&mut s, DotShape::Square, DVec2::new(5.0, 5.0), 2.0, Rgb8::WHITE, 0.5).unwrap();
        assert_eq!(
            s.calls,
            vec![DrawCall::Rect {
                origin: DVec2::new(4.0, 4.0),
                size: DVec2::new(2.0, 2.0),
                color: Rgb8::WHITE,
                alpha: 0.5,
            }]
        );
    }

    #[test]
    fn circle_dot_uses_half_size_radius() {
        let mut s = RecordingSurface::new(10, 10);
        paint_dot(&mut s, DotShape::Circle, DVec2::new(5.0, 5.0), 3.0, Rgb8::BLACK, 1.0).unwrap();
        assert_eq!(
            s.calls,
            vec![DrawCall::Circle {
                center: DVec2::new(5.0, 5.0),
                radius: 1.5,
                color: Rgb8::BLACK,
                alpha: 1.0,
            }]
        );
    }

    #[test]
    fn surface_is_object_safe() {
        let mut boxed: Box<dyn Surface> = Box::new(RecordingSurface::new(3, 2));
        assert_eq!(boxed.size(), (3, 2));
        paint_background(boxed.as_mut(), Background::Transparent).unwrap();
    }
}
