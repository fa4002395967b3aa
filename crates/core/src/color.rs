//! 8-bit RGB colors as sampled from source images.
//!
//! Sample points carry [`Rgb8`] colors straight from the raster. Conversions
//! here are the only color math the sampler needs: Rec. 709 luminance,
//! grayscale collapse, and linear blending toward a tint. Colors serialize as
//! hex strings so configuration files stay human-readable.

use crate::error::DotError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rec. 709 luma weights applied to raw (gamma-encoded) channel values.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `"#rgb"`, `"#rrggbb"` (case insensitive, `#` optional) or
    /// `"rgb(r, g, b)"`.
    ///
    /// Returns `DotError::InvalidColor` for anything else, including channel
    /// values above 255.
    pub fn parse(input: &str) -> Result<Rgb8, DotError> {
        let trimmed = input.trim();
        if let Some(args) = strip_prefix_ignore_case(trimmed, "rgb(") {
            return Self::from_rgb_function(trimmed, args);
        }
        Self::from_hex(trimmed)
    }

    /// Parses a 3- or 6-digit hex color with optional leading `#`.
    pub fn from_hex(hex: &str) -> Result<Rgb8, DotError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DotError::InvalidColor(format!("invalid hex color '{hex}'")));
        }
        let channel = |digits: &str, name: &str| {
            u8::from_str_radix(digits, 16)
                .map_err(|e| DotError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        match hex.len() {
            3 => {
                let expand = |i: usize| hex[i..=i].repeat(2);
                Ok(Rgb8 {
                    r: channel(&expand(0), "red")?,
                    g: channel(&expand(1), "green")?,
                    b: channel(&expand(2), "blue")?,
                })
            }
            6 => Ok(Rgb8 {
                r: channel(&hex[0..2], "red")?,
                g: channel(&hex[2..4], "green")?,
                b: channel(&hex[4..6], "blue")?,
            }),
            n => Err(DotError::InvalidColor(format!(
                "expected 3 or 6 hex digits, got {n}"
            ))),
        }
    }

    fn from_rgb_function(input: &str, args: &str) -> Result<Rgb8, DotError> {
        let inner = args
            .strip_suffix(')')
            .ok_or_else(|| DotError::InvalidColor(format!("unterminated rgb() in '{input}'")))?;
        let channels = inner
            .split(',')
            .map(|part| {
                part.trim().parse::<u8>().map_err(|e| {
                    DotError::InvalidColor(format!("invalid rgb() channel '{}': {e}", part.trim()))
                })
            })
            .collect::<Result<Vec<u8>, DotError>>()?;
        match channels.as_slice() {
            [r, g, b] => Ok(Rgb8::new(*r, *g, *b)),
            other => Err(DotError::InvalidColor(format!(
                "rgb() expects 3 channels, got {}",
                other.len()
            ))),
        }
    }

    /// Formats the color as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Rec. 709 luminance in [0, 255] (unrounded).
    pub fn luminance(self) -> f64 {
        luminance(self.r as f64, self.g as f64, self.b as f64)
    }

    /// Collapses the color to gray using its rounded luminance.
    pub fn grayscale(self) -> Rgb8 {
        let l = self.luminance().round() as u8;
        Rgb8::new(l, l, l)
    }

    /// Linear blend toward `tint` by `strength` in [0, 1], rounded per channel.
    ///
    /// `strength` is clamped; 0 returns `self`, 1 returns `tint`.
    pub fn mix(self, tint: Rgb8, strength: f64) -> Rgb8 {
        let k = strength.clamp(0.0, 1.0);
        let blend = |a: u8, b: u8| (a as f64 * (1.0 - k) + b as f64 * k).round() as u8;
        Rgb8 {
            r: blend(self.r, tint.r),
            g: blend(self.g, tint.g),
            b: blend(self.b, tint.b),
        }
    }
}

/// `input` with `prefix` removed, matching ASCII case-insensitively.
fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &input[prefix.len()..])
}

/// Rec. 709 luminance of raw channel values.
pub fn luminance(r: f64, g: f64, b: f64) -> f64 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

impl Serialize for Rgb8 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb8::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Per-frame background treatment of the destination surface.
///
/// Serializes as `"transparent"` or a hex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Transparent,
    Solid(Rgb8),
}

impl Background {
    pub fn parse(input: &str) -> Result<Background, DotError> {
        if input.trim().eq_ignore_ascii_case("transparent") {
            Ok(Background::Transparent)
        } else {
            Rgb8::parse(input).map(Background::Solid)
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Rgb8::BLACK)
    }
}

impl Serialize for Background {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Background::Transparent => serializer.serialize_str("transparent"),
            Background::Solid(c) => serializer.serialize_str(&c.to_hex()),
        }
    }
}

impl<'de> Deserialize<'de> for Background {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Background::parse(&s).map_err(serde::de::Error::custom)
    }
}
