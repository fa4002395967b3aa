//! Fit-mode geometry: where the source image lands on the destination.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// How the source image is scaled into the padded destination box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Scale uniformly until the inner box is fully covered (may overflow).
    #[default]
    Cover,
    /// Scale uniformly until the image fits entirely inside the inner box.
    Contain,
    /// Stretch to exactly the inner box.
    Fill,
    /// Native size, unscaled.
    #[serde(rename = "none")]
    Native,
}

/// Integer rectangle in destination-surface pixels.
///
/// `x`/`y` may be negative when a `cover` fit overflows the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub fn new(x: i64, y: i64, w: usize, h: usize) -> Self {
        Self { x, y, w, h }
    }

    /// Top-left corner as a float vector.
    pub fn origin(&self) -> DVec2 {
        DVec2::new(self.x as f64, self.y as f64)
    }

    /// True if `p` lies inside the rectangle, edges inclusive.
    pub fn contains(&self, p: DVec2) -> bool {
        let x0 = self.x as f64;
        let y0 = self.y as f64;
        p.x >= x0 && p.x <= x0 + self.w as f64 && p.y >= y0 && p.y <= y0 + self.h as f64
    }
}

/// Computes the fitted image box inside a `dest_w x dest_h` surface.
///
/// The inner box is the destination minus `padding` on every side, never
/// smaller than 1x1. The fitted box is centered on the whole destination
/// (not the inner box), with the offset rounded down. A zero natural
/// dimension falls back to the destination dimension.
pub fn fit_box(
    natural_w: usize,
    natural_h: usize,
    dest_w: usize,
    dest_h: usize,
    padding: usize,
    mode: FitMode,
) -> Rect {
    let inner_w = inner_extent(dest_w, padding);
    let inner_h = inner_extent(dest_h, padding);
    let iw = if natural_w == 0 { dest_w.max(1) } else { natural_w } as f64;
    let ih = if natural_h == 0 { dest_h.max(1) } else { natural_h } as f64;

    let (fitted_w, fitted_h) = match mode {
        FitMode::Cover => {
            let scale = (inner_w / iw).max(inner_h / ih);
            ((iw * scale).ceil(), (ih * scale).ceil())
        }
        FitMode::Contain => {
            let scale = (inner_w / iw).min(inner_h / ih);
            ((iw * scale).ceil(), (ih * scale).ceil())
        }
        FitMode::Fill => (inner_w, inner_h),
        FitMode::Native => (iw, ih),
    };

    let x = ((dest_w as f64 - fitted_w) / 2.0).floor() as i64;
    let y = ((dest_h as f64 - fitted_h) / 2.0).floor() as i64;
    Rect::new(x, y, fitted_w as usize, fitted_h as usize)
}

fn inner_extent(dest: usize, padding: usize) -> f64 {
    (dest as f64 - 2.0 * padding as f64).max(1.0)
}
