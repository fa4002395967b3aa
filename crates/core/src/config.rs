//! Renderer configuration: defaults, presets, JSON loading, validation.
//!
//! Every field is optional in JSON; missing keys take the preset's value.
//! Out-of-range values are rejected with [`DotError::InvalidConfig`] naming
//! the field, never clamped.

use crate::color::{Background, Rgb8};
use crate::error::DotError;
use crate::force::DistortionMode;
use crate::geometry::FitMode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Shape painted for each sample point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DotShape {
    Circle,
    #[default]
    Square,
}

/// Full configuration of one pixelated surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PixelateConfig {
    /// Grid stride in surface pixels.
    pub cell_size: usize,
    /// Dot size as a fraction of the cell.
    pub dot_scale: f64,
    pub shape: DotShape,
    pub background: Background,
    pub grayscale: bool,
    pub fit: FitMode,
    /// Gutter on every side of the destination before fitting.
    pub padding: usize,
    /// Strength of contrast-driven thinning, 0 disables dropout.
    pub dropout_strength: f64,
    /// When false the surface is painted once and never animated.
    pub interactive: bool,
    /// Maximum per-dot pointer displacement in pixels.
    pub distortion_strength: f64,
    pub distortion_radius: f64,
    pub distortion_mode: DistortionMode,
    /// Per-frame fraction of the remaining distance the smoothed pointer covers.
    pub follow_speed: f64,
    /// Average the 3x3 neighborhood of each cell center.
    pub sample_average: bool,
    pub tint: Option<Rgb8>,
    pub tint_strength: f64,
    pub max_fps: f64,
    pub jitter_strength: f64,
    pub jitter_speed: f64,
    pub fade_on_leave: bool,
    pub fade_speed: f64,
    /// Only distort while the pointer is over the fitted image box.
    pub clamp_to_image: bool,
    /// Re-sample when the host surface is resized.
    pub responsive: bool,
}

impl Default for PixelateConfig {
    fn default() -> Self {
        Self {
            cell_size: 3,
            dot_scale: 0.9,
            shape: DotShape::Square,
            background: Background::Solid(Rgb8::BLACK),
            grayscale: false,
            fit: FitMode::Cover,
            padding: 24,
            dropout_strength: 0.4,
            interactive: true,
            distortion_strength: 3.0,
            distortion_radius: 80.0,
            distortion_mode: DistortionMode::Swirl,
            follow_speed: 0.2,
            sample_average: true,
            tint: Some(Rgb8::WHITE),
            tint_strength: 0.2,
            max_fps: 60.0,
            jitter_strength: 4.0,
            jitter_speed: 4.0,
            fade_on_leave: true,
            fade_speed: 0.1,
            clamp_to_image: true,
            responsive: false,
        }
    }
}

impl PixelateConfig {
    /// Defaults for a framed dashboard tile: wide gutter, round dots on a
    /// transparent background, light dropout, and stronger motion.
    ///
    /// The tint is left unset so the theme can pick one.
    pub fn tile() -> Self {
        Self {
            padding: 72,
            shape: DotShape::Circle,
            background: Background::Transparent,
            dropout_strength: 0.1,
            distortion_strength: 10.0,
            jitter_strength: 5.0,
            tint: None,
            tint_strength: 0.1,
            ..Self::default()
        }
    }

    /// Looks up a preset by name (`"canvas"` or `"tile"`).
    pub fn preset(name: &str) -> Result<Self, DotError> {
        match name {
            "canvas" => Ok(Self::default()),
            "tile" => Ok(Self::tile()),
            other => Err(DotError::invalid_config(
                "preset",
                format!("unknown preset '{other}', expected canvas or tile"),
            )),
        }
    }

    /// Builds a config from a (possibly partial) JSON object over the defaults.
    pub fn from_json(params: &Value) -> Result<Self, DotError> {
        Self::default().with_overrides(params)
    }

    /// Overlays the keys of a JSON object on `self`, then validates.
    ///
    /// Unknown keys and wrongly typed values are `InvalidConfig` errors.
    pub fn with_overrides(&self, params: &Value) -> Result<Self, DotError> {
        let overrides = match params {
            Value::Null => return self.clone().validated(),
            Value::Object(map) => map,
            other => {
                return Err(DotError::invalid_config(
                    "params",
                    format!("expected a JSON object, got {other}"),
                ))
            }
        };
        let mut merged = serde_json::to_value(self)
            .map_err(|e| DotError::invalid_config("params", e.to_string()))?;
        if let Value::Object(base) = &mut merged {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        let config: PixelateConfig = serde_json::from_value(merged)
            .map_err(|e| DotError::invalid_config("params", e.to_string()))?;
        config.validated()
    }

    /// Validates and returns `self`.
    pub fn validated(self) -> Result<Self, DotError> {
        self.validate()?;
        Ok(self)
    }

    /// Checks every numeric field against its allowed range.
    pub fn validate(&self) -> Result<(), DotError> {
        if self.cell_size < 1 {
            return Err(DotError::invalid_config(
                "cell_size",
                format!("must be >= 1, got {}", self.cell_size),
            ));
        }
        if !(self.dot_scale.is_finite() && self.dot_scale > 0.0 && self.dot_scale <= 1.0) {
            return Err(DotError::invalid_config(
                "dot_scale",
                format!("must be in (0, 1], got {}", self.dot_scale),
            ));
        }
        check_unit("dropout_strength", self.dropout_strength)?;
        check_non_negative("distortion_strength", self.distortion_strength)?;
        check_positive("distortion_radius", self.distortion_radius)?;
        check_unit("follow_speed", self.follow_speed)?;
        check_unit("tint_strength", self.tint_strength)?;
        check_positive("max_fps", self.max_fps)?;
        check_non_negative("jitter_strength", self.jitter_strength)?;
        check_non_negative("jitter_speed", self.jitter_speed)?;
        check_unit("fade_speed", self.fade_speed)?;
        Ok(())
    }

    /// Side of a painted dot: `max(1, floor(cell_size * dot_scale))`.
    pub fn dot_size(&self) -> f64 {
        (self.cell_size as f64 * self.dot_scale).floor().max(1.0)
    }

    /// Minimum milliseconds between two accepted frames.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.max_fps
    }

    /// True if the fields that shape the sample set differ from `other`.
    ///
    /// Animation-only fields (distortion, jitter, smoothing, fps) can change
    /// without re-sampling.
    pub fn sampling_differs(&self, other: &PixelateConfig) -> bool {
        self.cell_size != other.cell_size
            || self.fit != other.fit
            || self.padding != other.padding
            || self.sample_average != other.sample_average
            || self.grayscale != other.grayscale
            || self.tint != other.tint
            || self.tint_strength != other.tint_strength
            || self.dropout_strength != other.dropout_strength
    }

    /// Schema describing every field: type, default, range, and description.
    pub fn param_schema() -> Value {
        let d = Self::default();
        json!({
            "cell_size": {"type": "integer", "default": d.cell_size, "min": 1,
                "description": "Grid stride in pixels used for sampling and spacing"},
            "dot_scale": {"type": "number", "default": d.dot_scale, "min": 0.0, "max": 1.0,
                "description": "Dot size as a fraction of the cell size"},
            "shape": {"type": "string", "default": d.shape, "enum": ["circle", "square"],
                "description": "Shape of each dot"},
            "background": {"type": "string", "default": d.background,
                "description": "Background color, or \"transparent\" to clear each frame"},
            "grayscale": {"type": "boolean", "default": d.grayscale,
                "description": "Collapse sampled colors to luminance (tint is then skipped)"},
            "fit": {"type": "string", "default": d.fit,
                "enum": ["cover", "contain", "fill", "none"],
                "description": "How the image is sized inside the padded box"},
            "padding": {"type": "integer", "default": d.padding, "min": 0,
                "description": "Gutter in pixels on every side of the surface"},
            "dropout_strength": {"type": "number", "default": d.dropout_strength, "min": 0.0, "max": 1.0,
                "description": "How aggressively low-contrast dots are thinned out"},
            "interactive": {"type": "boolean", "default": d.interactive,
                "description": "Animate with pointer distortion; false draws once"},
            "distortion_strength": {"type": "number", "default": d.distortion_strength, "min": 0.0,
                "description": "Maximum per-dot offset in pixels"},
            "distortion_radius": {"type": "number", "default": d.distortion_radius, "min": 0.0,
                "exclusive_min": true,
                "description": "Radius in pixels around the pointer that affects dots"},
            "distortion_mode": {"type": "string", "default": d.distortion_mode,
                "enum": ["repel", "attract", "swirl"],
                "description": "Distortion style"},
            "follow_speed": {"type": "number", "default": d.follow_speed, "min": 0.0, "max": 1.0,
                "description": "How fast the rendered pointer chases the real one"},
            "sample_average": {"type": "boolean", "default": d.sample_average,
                "description": "Average the 3x3 neighborhood of each cell"},
            "tint": {"type": ["string", "null"], "default": d.tint,
                "description": "Tint color (#rgb, #rrggbb or rgb(r, g, b))"},
            "tint_strength": {"type": "number", "default": d.tint_strength, "min": 0.0, "max": 1.0,
                "description": "How strongly the tint is mixed in"},
            "max_fps": {"type": "number", "default": d.max_fps, "min": 0.0, "exclusive_min": true,
                "description": "Animation frame rate cap"},
            "jitter_strength": {"type": "number", "default": d.jitter_strength, "min": 0.0,
                "description": "Jitter magnitude in pixels for dots under influence"},
            "jitter_speed": {"type": "number", "default": d.jitter_speed, "min": 0.0,
                "description": "Speed factor of the jitter motion"},
            "fade_on_leave": {"type": "boolean", "default": d.fade_on_leave,
                "description": "Fade influence out after the pointer leaves"},
            "fade_speed": {"type": "number", "default": d.fade_speed, "min": 0.0, "max": 1.0,
                "description": "Per-frame smoothing rate of the fade"},
            "clamp_to_image": {"type": "boolean", "default": d.clamp_to_image,
                "description": "Only distort while the pointer is over the fitted image"},
            "responsive": {"type": "boolean", "default": d.responsive,
                "description": "Re-sample when the surface is resized"}
        })
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), DotError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DotError::invalid_config(
            field,
            format!("must be in [0, 1], got {value}"),
        ))
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), DotError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DotError::invalid_config(
            field,
            format!("must be >= 0, got {value}"),
        ))
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), DotError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(DotError::invalid_config(
            field,
            format!("must be > 0, got {value}"),
        ))
    }
}
