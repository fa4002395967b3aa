//! The frame driver: owns the sample set and the animation loop.
//!
//! Lifecycle:
//!
//! ```text
//! Idle --load--> Sampling --> Ready (static) --> Disposed
//!                    |          |
//!                    |          +--interactive--> Animating --> Disposed
//!                    +--readback blocked--> Degraded --> Disposed
//! ```
//!
//! The driver is single-threaded and never blocks. The host calls
//! [`FrameDriver::on_frame`] for each frame it was asked for and
//! [`FrameDriver::on_pointer`] for pointer events while listeners are
//! attached. Sampling replaces the whole set at once; a tick never sees a
//! half-built set.

use crate::config::PixelateConfig;
use crate::error::DotError;
use crate::force::ForceField;
use crate::geometry::fit_box;
use crate::host::{FrameHost, FrameId};
use crate::pointer::{PointerEvent, PointerTracker};
use crate::raster::Raster;
use crate::sampler::{sample, SampleSet};
use crate::source::SourceImage;
use crate::surface::{paint_background, paint_dot, Surface};
use glam::DVec2;
use log::{debug, warn};

/// Rounding allowance when comparing frame spacing against the interval.
const FRAME_SLACK_MS: f64 = 1e-6;

/// Where the driver is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No image yet, or the last load failed.
    Idle,
    Sampling,
    /// Sample set built and painted once; no loop running.
    Ready,
    Animating,
    /// Readback was blocked; the plain image was painted instead.
    Degraded,
    Disposed,
}

/// What a call to [`FrameDriver::on_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not animating; nothing drawn, nothing scheduled.
    Inactive,
    /// Too soon after the last accepted frame; rescheduled only.
    Throttled,
    /// Painted this many dots and rescheduled.
    Drawn(usize),
    /// Painting failed part-way; the error was logged and the loop goes on.
    Failed,
}

/// Drives one pixelated surface.
pub struct FrameDriver<S: Surface, H: FrameHost> {
    config: PixelateConfig,
    surface: S,
    host: H,
    state: DriverState,
    image: Option<Box<dyn SourceImage>>,
    samples: Option<SampleSet>,
    pointer: PointerTracker,
    pending_frame: Option<FrameId>,
    listening: bool,
    last_frame_ms: Option<f64>,
}

impl<S: Surface, H: FrameHost> FrameDriver<S, H> {
    /// Creates an idle driver.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `config` fails validation.
    pub fn new(config: PixelateConfig, surface: S, host: H) -> Result<Self, DotError> {
        config.validate()?;
        Ok(Self {
            config,
            surface,
            host,
            state: DriverState::Idle,
            image: None,
            samples: None,
            pointer: PointerTracker::default(),
            pending_frame: None,
            listening: false,
            last_frame_ms: None,
        })
    }

    /// Hands the driver the outcome of an image load.
    ///
    /// A successful load samples and paints (or starts animating). A failed
    /// load is logged, leaves the driver `Idle`, and is returned to the
    /// caller.
    pub fn load(
        &mut self,
        loaded: Result<Box<dyn SourceImage>, DotError>,
    ) -> Result<(), DotError> {
        if self.state == DriverState::Disposed {
            debug!("ignoring image load on a disposed driver");
            return Ok(());
        }
        match loaded {
            Ok(image) => {
                self.image = Some(image);
                self.rebuild()
            }
            Err(err) => {
                warn!("image load failed: {err}");
                self.stop_animation();
                self.image = None;
                self.samples = None;
                self.transition(DriverState::Idle);
                Err(err)
            }
        }
    }

    /// Reports a new host surface size.
    ///
    /// Ignored unless the config is `responsive`; otherwise the surface is
    /// resized and the image re-sampled.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), DotError> {
        if self.state == DriverState::Disposed {
            return Ok(());
        }
        if !self.config.responsive {
            debug!("ignoring resize to {width}x{height}: not responsive");
            return Ok(());
        }
        if self.surface.size() == (width, height) {
            return Ok(());
        }
        self.surface.resize(width, height)?;
        self.rebuild()
    }

    /// Replaces the configuration.
    ///
    /// The sample set is rebuilt when a sampling field changed; otherwise
    /// only the static/animated mode is re-applied.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `config` fails validation. The old config is kept.
    pub fn set_config(&mut self, config: PixelateConfig) -> Result<(), DotError> {
        config.validate()?;
        if self.state == DriverState::Disposed {
            return Ok(());
        }
        let resample = self.config.sampling_differs(&config);
        self.config = config;
        match self.state {
            DriverState::Idle | DriverState::Disposed => Ok(()),
            DriverState::Degraded => self.rebuild(),
            _ if resample => self.rebuild(),
            _ => {
                self.apply_mode();
                Ok(())
            }
        }
    }

    /// Routes a pointer event. Only targets change; nothing is drawn.
    ///
    /// Events are dropped unless listeners are attached, i.e. while
    /// animating.
    pub fn on_pointer(&mut self, event: PointerEvent) {
        if !self.listening {
            return;
        }
        self.pointer.handle(event, self.config.fade_on_leave);
    }

    /// Runs one animation tick at host time `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64) -> TickOutcome {
        if self.state != DriverState::Animating {
            return TickOutcome::Inactive;
        }
        self.pending_frame = None;

        if let Some(last) = self.last_frame_ms {
            if now_ms - last + FRAME_SLACK_MS < self.config.frame_interval_ms() {
                self.schedule();
                return TickOutcome::Throttled;
            }
        }
        self.last_frame_ms = Some(now_ms);

        self.pointer.advance(
            self.config.follow_speed,
            self.config.fade_on_leave,
            self.config.fade_speed,
        );

        let outcome = match self.paint(Some(now_ms)) {
            Ok(drawn) => TickOutcome::Drawn(drawn),
            Err(err) => {
                warn!("frame at {now_ms:.1}ms failed: {err}");
                TickOutcome::Failed
            }
        };
        self.schedule();
        outcome
    }

    /// Repaints a settled surface: the static dots when `Ready`, the plain
    /// image when `Degraded`. Other states are left to the loop.
    pub fn redraw(&mut self) -> Result<(), DotError> {
        match self.state {
            DriverState::Ready => self.paint(None).map(|_| ()),
            DriverState::Degraded => self.paint_fallback(),
            _ => Ok(()),
        }
    }

    /// Detaches listeners, cancels the pending frame, and drops the image.
    ///
    /// After this returns no call has any visible effect. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == DriverState::Disposed {
            return;
        }
        self.stop_animation();
        self.image = None;
        self.samples = None;
        self.transition(DriverState::Disposed);
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &PixelateConfig {
        &self.config
    }

    /// The current sample set, if sampling succeeded.
    pub fn samples(&self) -> Option<&SampleSet> {
        self.samples.as_ref()
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn rebuild(&mut self) -> Result<(), DotError> {
        if self.image.is_none() {
            return Ok(());
        }
        self.transition(DriverState::Sampling);
        let (width, height) = self.surface.size();
        let sampled = match self.image.as_deref() {
            Some(image) => sample(image, width, height, &self.config),
            None => return Ok(()),
        };

        match sampled {
            Ok(set) => {
                debug!(
                    "sampled {} points ({} visible) on a {:?} grid",
                    set.len(),
                    set.visible().count(),
                    set.grid()
                );
                self.samples = Some(set);
                self.transition(DriverState::Ready);
                self.apply_mode();
                Ok(())
            }
            Err(DotError::ReadbackBlocked) => {
                warn!("pixel readback blocked; drawing the image without pixelation");
                self.samples = None;
                self.stop_animation();
                self.transition(DriverState::Degraded);
                if let Err(err) = self.paint_fallback() {
                    warn!("fallback paint failed: {err}");
                }
                Ok(())
            }
            Err(err) => {
                self.samples = None;
                self.stop_animation();
                self.transition(DriverState::Idle);
                Err(err)
            }
        }
    }

    /// Starts or stops the loop to match `config.interactive`.
    fn apply_mode(&mut self) {
        if self.samples.is_none() {
            return;
        }
        if self.config.interactive {
            self.start_animation();
        } else {
            self.stop_animation();
            self.transition(DriverState::Ready);
            if let Err(err) = self.paint(None) {
                warn!("static paint failed: {err}");
            }
        }
    }

    fn start_animation(&mut self) {
        if !self.listening {
            self.host.attach_pointer();
            self.listening = true;
        }
        if self.pending_frame.is_none() {
            self.schedule();
        }
        self.transition(DriverState::Animating);
    }

    fn stop_animation(&mut self) {
        if self.listening {
            self.host.detach_pointer();
            self.listening = false;
        }
        if let Some(id) = self.pending_frame.take() {
            self.host.cancel_frame(id);
        }
    }

    fn schedule(&mut self) {
        self.pending_frame = Some(self.host.request_frame());
    }

    /// Paints background and dots. With `now_ms` the dots are displaced by
    /// the force field; without it they sit at their anchors.
    fn paint(&mut self, now_ms: Option<f64>) -> Result<usize, DotError> {
        let Some(set) = &self.samples else {
            return Ok(0);
        };
        paint_background(&mut self.surface, self.config.background)?;

        let motion = now_ms.map(|now| {
            let field = ForceField::from_config(&self.config, set.draw_box());
            (field, field.phase_at(now / 1000.0))
        });
        let pointer = self.pointer.smoothed();
        let activity = self.pointer.activity();
        let dot = self.config.dot_size();

        let mut drawn = 0;
        for point in set.visible() {
            let anchor = set.anchor(point);
            let offset = match &motion {
                Some((field, phase)) => field.displace(anchor, point.seed, pointer, activity, *phase),
                None => DVec2::ZERO,
            };
            paint_dot(
                &mut self.surface,
                self.config.shape,
                anchor + offset,
                dot,
                point.color,
                point.alpha,
            )?;
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Background plus the un-pixelated image in its fitted box.
    fn paint_fallback(&mut self) -> Result<(), DotError> {
        paint_background(&mut self.surface, self.config.background)?;
        let Some(image) = self.image.as_deref() else {
            return Ok(());
        };
        let (width, height) = self.surface.size();
        let (natural_w, natural_h) = image.natural_size();
        let draw_box = fit_box(
            natural_w,
            natural_h,
            width,
            height,
            self.config.padding,
            self.config.fit,
        );
        Raster::check_size(draw_box.w.max(1), draw_box.h.max(1))?;
        let raster = image.rasterize(draw_box.w.max(1), draw_box.h.max(1))?;
        self.surface.blit(&raster, draw_box.x, draw_box.y)
    }

    fn transition(&mut self, next: DriverState) {
        if self.state != next {
            debug!("driver {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

impl<S: Surface, H: FrameHost> Drop for FrameDriver<S, H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
