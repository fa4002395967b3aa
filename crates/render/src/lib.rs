#![deny(unsafe_code)]
//! CPU rendering for dotscape: a pixel-buffer [`Surface`](dotscape_core::Surface),
//! a virtual-clock frame host, image decoding and PNG snapshots.
//!
//! This crate sits between `dotscape-core` (which knows nothing about files
//! or pixels) and the CLI. [`render_still`] and [`animate`] run a
//! [`FrameDriver`] end to end without a window.

pub mod offline;
pub mod path;
pub mod pixel;

#[cfg(feature = "png")]
pub mod image_source;
#[cfg(feature = "png")]
pub mod snapshot;

use dotscape_core::error::DotError;
use dotscape_core::{
    DriverState, FrameDriver, PixelateConfig, PointerEvent, Raster, SourceImage, TickOutcome,
};
use log::debug;

pub use offline::OfflineHost;
pub use path::PointerPath;
pub use pixel::PixelSurface;

/// A driver painting into memory on a virtual clock.
pub type OfflineDriver = FrameDriver<PixelSurface, OfflineHost>;

/// Result of a static render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Still {
    pub raster: Raster,
    /// `Ready`, or `Degraded` when the image could not be sampled.
    pub state: DriverState,
    /// Dots painted; zero when degraded.
    pub dots: usize,
}

/// Summary of an [`animate`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationReport {
    pub frames_written: usize,
    /// Driver state before disposal.
    pub state: DriverState,
    /// Dots painted in the last written frame.
    pub last_dots: usize,
}

/// Builds an offline driver on a fresh `width x height` surface, with the
/// host clock ticking at the config's frame interval.
pub fn offline_driver(
    config: &PixelateConfig,
    width: usize,
    height: usize,
) -> Result<OfflineDriver, DotError> {
    let host = OfflineHost::new(config.frame_interval_ms());
    FrameDriver::new(config.clone(), PixelSurface::new(width, height)?, host)
}

/// Paints `image` once, without animation.
pub fn render_still(
    image: Box<dyn SourceImage>,
    config: &PixelateConfig,
    width: usize,
    height: usize,
) -> Result<Still, DotError> {
    let still = PixelateConfig {
        interactive: false,
        ..config.clone()
    };
    let mut driver = offline_driver(&still, width, height)?;
    driver.load(Ok(image))?;
    Ok(Still {
        raster: driver.surface().raster().clone(),
        state: driver.state(),
        dots: driver.samples().map_or(0, |s| s.visible().count()),
    })
}

/// Animates `image` with the pointer following `path`, handing each painted
/// frame to `sink` with its index.
///
/// A non-interactive config or a degraded image yields exactly one frame.
pub fn animate<F>(
    image: Box<dyn SourceImage>,
    config: &PixelateConfig,
    width: usize,
    height: usize,
    frames: usize,
    path: PointerPath,
    mut sink: F,
) -> Result<AnimationReport, DotError>
where
    F: FnMut(usize, &Raster) -> Result<(), DotError>,
{
    let mut driver = offline_driver(config, width, height)?;
    driver.load(Ok(image))?;

    if driver.state() != DriverState::Animating {
        sink(0, driver.surface().raster())?;
        return Ok(AnimationReport {
            frames_written: 1,
            state: driver.state(),
            last_dots: driver.samples().map_or(0, |s| s.visible().count()),
        });
    }

    driver.on_pointer(PointerEvent::Enter);
    let mut written = 0;
    let mut last_dots = 0;
    // Throttled or failed ticks cost a frame slot; bound the retries.
    let budget = frames.saturating_mul(4);
    for _ in 0..budget {
        if written == frames {
            break;
        }
        let Some(now) = driver.host_mut().next_frame() else {
            break;
        };
        let t = if frames > 1 {
            written as f64 / (frames - 1) as f64
        } else {
            0.0
        };
        driver.on_pointer(path.event_at(t, width, height));
        match driver.on_frame(now) {
            TickOutcome::Drawn(dots) => {
                sink(written, driver.surface().raster())?;
                written += 1;
                last_dots = dots;
            }
            TickOutcome::Throttled | TickOutcome::Failed => {}
            TickOutcome::Inactive => break,
        }
    }
    debug!("animation wrote {written} of {frames} frames");

    let state = driver.state();
    driver.dispose();
    Ok(AnimationReport {
        frames_written: written,
        state,
        last_dots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotscape_core::Rgb8;

    const RED: Rgb8 = Rgb8::new(255, 0, 0);

    fn red_config() -> PixelateConfig {
        PixelateConfig {
            cell_size: 10,
            padding: 0,
            tint: None,
            sample_average: false,
            dropout_strength: 0.0,
            ..PixelateConfig::default()
        }
    }

    fn red_image() -> Box<dyn SourceImage> {
        Box::new(Raster::filled(10, 10, RED, 255).unwrap())
    }

    struct ForeignImage;

    impl SourceImage for ForeignImage {
        fn natural_size(&self) -> (usize, usize) {
            (4, 4)
        }

        fn rasterize(&self, width: usize, height: usize) -> Result<Raster, DotError> {
            Raster::filled(width, height, Rgb8::WHITE, 255)
        }

        fn readable(&self) -> bool {
            false
        }
    }

    #[test]
    fn still_red_grid() {
        let still = render_still(red_image(), &red_config(), 30, 30).unwrap();
        assert_eq!(still.state, DriverState::Ready);
        assert_eq!(still.dots, 9);
        // Dot interiors are red, the one-pixel gutters keep the background.
        assert_eq!(still.raster.pixel(4, 4), [255, 0, 0, 255]);
        assert_eq!(still.raster.pixel(24, 14), [255, 0, 0, 255]);
        assert_eq!(still.raster.pixel(9, 9), [0, 0, 0, 255]);
    }

    #[test]
    fn still_is_idempotent() {
        let a = render_still(red_image(), &red_config(), 30, 30).unwrap();
        let b = render_still(red_image(), &red_config(), 30, 30).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn still_ignores_interactive_flag() {
        let interactive = render_still(red_image(), &red_config(), 30, 30).unwrap();
        let fixed = PixelateConfig {
            interactive: false,
            ..red_config()
        };
        let static_run = render_still(red_image(), &fixed, 30, 30).unwrap();
        assert_eq!(interactive.raster, static_run.raster);
    }

    #[test]
    fn still_degrades_to_plain_image() {
        let config = PixelateConfig {
            padding: 5,
            ..red_config()
        };
        let still = render_still(Box::new(ForeignImage), &config, 30, 30).unwrap();
        assert_eq!(still.state, DriverState::Degraded);
        assert_eq!(still.dots, 0);
        assert_eq!(still.raster.pixel(15, 15), [255, 255, 255, 255]);
        assert_eq!(still.raster.pixel(2, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            render_still(red_image(), &red_config(), 0, 10),
            Err(DotError::InvalidDimensions)
        ));
    }

    #[test]
    fn animate_writes_requested_frames() {
        let mut indices = Vec::new();
        let report = animate(
            red_image(),
            &red_config(),
            30,
            30,
            6,
            PointerPath::Orbit,
            |i, raster| {
                assert_eq!((raster.width(), raster.height()), (30, 30));
                indices.push(i);
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(report.frames_written, 6);
        assert_eq!(report.state, DriverState::Animating);
        assert_eq!(report.last_dots, 9);
        assert_eq!(indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn animate_is_deterministic() {
        let run = || {
            let mut frames = Vec::new();
            animate(
                red_image(),
                &red_config(),
                30,
                30,
                4,
                PointerPath::Sweep,
                |_, raster| {
                    frames.push(raster.clone());
                    Ok(())
                },
            )
            .unwrap();
            frames
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn animate_static_config_writes_one_frame() {
        let config = PixelateConfig {
            interactive: false,
            ..red_config()
        };
        let mut count = 0;
        let report = animate(red_image(), &config, 30, 30, 10, PointerPath::Center, |_, _| {
            count += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(report.state, DriverState::Ready);
    }

    #[test]
    fn animate_stops_on_sink_error() {
        let result = animate(
            red_image(),
            &red_config(),
            30,
            30,
            5,
            PointerPath::Orbit,
            |i, _| {
                if i == 2 {
                    Err(DotError::Io("disk full".into()))
                } else {
                    Ok(())
                }
            },
        );
        assert!(matches!(result, Err(DotError::Io(_))));
    }

    #[test]
    fn offline_clock_is_never_throttled_at_default_fps() {
        let mut driver = offline_driver(&PixelateConfig::default(), 30, 30).unwrap();
        driver.load(Ok(red_image())).unwrap();
        assert_eq!(driver.state(), DriverState::Animating);
        for i in 0..120 {
            let now = driver.host_mut().next_frame().unwrap();
            let outcome = driver.on_frame(now);
            assert!(
                matches!(outcome, TickOutcome::Drawn(_)),
                "tick {i} at {now} ms: {outcome:?}"
            );
        }
    }

    #[test]
    fn pointer_motion_changes_frames() {
        let config = PixelateConfig {
            distortion_strength: 20.0,
            follow_speed: 1.0,
            ..red_config()
        };
        let mut frames = Vec::new();
        animate(red_image(), &config, 30, 30, 8, PointerPath::Center, |_, r| {
            frames.push(r.clone());
            Ok(())
        })
        .unwrap();
        let still = render_still(red_image(), &config, 30, 30).unwrap();
        assert!(frames.iter().any(|f| *f != still.raster));
    }
}
