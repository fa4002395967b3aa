//! Image → sample-point reduction.
//!
//! [`sample`] fits the source into the destination, rasterizes it once at the
//! fitted size, and walks it on a `cell_size` grid. Each cell yields one
//! [`SamplePoint`] with a representative color, alpha, a contrast-driven
//! dropout flag, and a jitter seed. Everything is a pure function of the
//! inputs: two runs with identical arguments give identical sets.

use crate::color::Rgb8;
use crate::config::PixelateConfig;
use crate::error::DotError;
use crate::geometry::{fit_box, Rect};
use crate::hash::{hash_cell, DROPOUT_SALT, SEED_SALT};
use crate::raster::Raster;
use crate::source::SourceImage;
use glam::DVec2;
use log::debug;

/// One grid cell's representative dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Top-left of the cell in destination-surface coordinates.
    pub position: DVec2,
    pub color: Rgb8,
    /// Coverage in [0, 1].
    pub alpha: f64,
    /// Thinned out; never drawn.
    pub dropped: bool,
    /// Stable per-point value in [0, 1) used only for jitter phase.
    pub seed: f64,
}

impl SamplePoint {
    /// True if the point is painted at all.
    pub fn visible(&self) -> bool {
        !self.dropped && self.alpha > 0.0
    }
}

/// The immutable result of one sampling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    points: Vec<SamplePoint>,
    draw_box: Rect,
    cell_size: usize,
    columns: usize,
    rows: usize,
}

impl SampleSet {
    /// All points in row-major grid order, dropped ones included.
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Points that will be painted.
    pub fn visible(&self) -> impl Iterator<Item = &SamplePoint> {
        self.points.iter().filter(|p| p.visible())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Where the fitted image sits on the destination surface.
    pub fn draw_box(&self) -> Rect {
        self.draw_box
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    /// Grid dimensions `(columns, rows)`.
    pub fn grid(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    /// Base draw position of a point: the center of its cell.
    pub fn anchor(&self, point: &SamplePoint) -> DVec2 {
        point.position + DVec2::splat(self.cell_size as f64 / 2.0)
    }
}

/// Samples `image` into a `dest_width x dest_height` surface.
///
/// # Errors
///
/// - `InvalidDimensions` if either destination dimension is zero, or the
///   fitted image would exceed [`MAX_PIXELS`](crate::raster::MAX_PIXELS).
/// - `InvalidConfig` if `config` fails validation.
/// - `ReadbackBlocked` if the image forbids pixel readback; callers fall back
///   to drawing the image itself.
pub fn sample(
    image: &dyn SourceImage,
    dest_width: usize,
    dest_height: usize,
    config: &PixelateConfig,
) -> Result<SampleSet, DotError> {
    if dest_width == 0 || dest_height == 0 {
        return Err(DotError::InvalidDimensions);
    }
    config.validate()?;

    let (natural_w, natural_h) = image.natural_size();
    let draw_box = fit_box(
        natural_w,
        natural_h,
        dest_width,
        dest_height,
        config.padding,
        config.fit,
    );
    if !image.readable() {
        return Err(DotError::ReadbackBlocked);
    }

    Raster::check_size(draw_box.w.max(1), draw_box.h.max(1))?;
        let raster = image.rasterize(draw_box.w.max(1), draw_box.h.max(1))?;
    let (w, h) = (raster.width(), raster.height());
    let cell = config.cell_size;
    let half = cell / 2;
    let tint = config.tint.filter(|_| config.tint_strength > 0.0);
    let origin = draw_box.origin();

    let columns = w.div_ceil(cell);
    let rows = h.div_ceil(cell);
    let mut points = Vec::with_capacity(columns * rows);

    for yy in (0..h).step_by(cell) {
        let cy = (yy + half).min(h - 1);
        for xx in (0..w).step_by(cell) {
            let cx = (xx + half).min(w - 1);

            let (mut color, alpha) = if config.sample_average {
                average_3x3(&raster, cx, cy)
            } else {
                let [r, g, b, a] = raster.pixel(cx as isize, cy as isize);
                (Rgb8::new(r, g, b), a as f64 / 255.0)
            };

            if config.grayscale {
                color = color.grayscale();
            } else if let Some(tint) = tint {
                color = color.mix(tint, config.tint_strength);
            }

            let p_drop = dropout_probability(&raster, cx, cy, config.dropout_strength);
            let dropped = hash_cell(cx as u32, cy as u32, DROPOUT_SALT) < p_drop;
            let seed = hash_cell(cx as u32, cy as u32, SEED_SALT);

            points.push(SamplePoint {
                position: DVec2::new(xx as f64, yy as f64) + origin,
                color,
                alpha,
                dropped,
                seed,
            });
        }
    }

    debug!(
        "sampled {} points ({} dropped) from {natural_w}x{natural_h} into box {draw_box:?}",
        points.len(),
        points.iter().filter(|p| p.dropped).count()
    );

    Ok(SampleSet {
        points,
        draw_box,
        cell_size: cell,
        columns,
        rows,
    })
}

/// Mean color (rounded) and alpha of the 3x3 neighborhood, edge-clamped.
fn average_3x3(raster: &Raster, cx: usize, cy: usize) -> (Rgb8, f64) {
    let mut sum = [0.0_f64; 4];
    for oy in -1..=1 {
        for ox in -1..=1 {
            let px = raster.pixel(cx as isize + ox, cy as isize + oy);
            for (acc, &channel) in sum.iter_mut().zip(px.iter()) {
                *acc += channel as f64;
            }
        }
    }
    let mean = |i: usize| (sum[i] / 9.0).round() as u8;
    (
        Rgb8::new(mean(0), mean(1), mean(2)),
        sum[3] / 9.0 / 255.0,
    )
}

/// Probability that the cell centered at `(cx, cy)` is thinned out.
///
/// Flat regions (low luminance gradient) approach `strength`; strong edges
/// approach zero.
fn dropout_probability(raster: &Raster, cx: usize, cy: usize, strength: f64) -> f64 {
    let (x, y) = (cx as isize, cy as isize);
    let center = raster.luminance_at(x, y);
    let left = raster.luminance_at(x - 1, y);
    let right = raster.luminance_at(x + 1, y);
    let up = raster.luminance_at(x, y - 1);
    let down = raster.luminance_at(x, y + 1);

    let gradient = (right - left).abs()
        + (down - up).abs()
        + (center - (left + right + up + down) / 4.0).abs();
    let normalized = (gradient / 255.0).clamp(0.0, 1.0);
    ((1.0 - normalized) * strength).clamp(0.0, 1.0)
}
