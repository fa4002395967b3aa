//! Light/dark theme context for framed tiles.
//!
//! The theme only picks two things: which source image a tile shows when it
//! offers per-theme variants, and the tint used when none is configured.

use crate::color::Rgb8;
use crate::config::PixelateConfig;
use crate::error::DotError;
use serde::{Deserialize, Serialize};

/// Color scheme of the surrounding page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(input: &str) -> Result<Theme, DotError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(DotError::invalid_config(
                "theme",
                format!("unknown theme '{other}', expected light or dark"),
            )),
        }
    }

    /// Tint used when a tile has none: white on dark, black on light.
    pub fn default_tint(self) -> Rgb8 {
        match self {
            Theme::Dark => Rgb8::WHITE,
            Theme::Light => Rgb8::BLACK,
        }
    }

    /// Returns `config` with the theme tint filled in if it has none.
    pub fn apply(self, config: &PixelateConfig) -> PixelateConfig {
        let mut themed = config.clone();
        if themed.tint.is_none() {
            themed.tint = Some(self.default_tint());
        }
        themed
    }
}

/// Holder of the current theme with an explicit init/update contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeContext {
    theme: Theme,
}

impl ThemeContext {
    /// Initializes from a stored preference, falling back to light when the
    /// value is missing or unrecognized.
    pub fn init(stored: Option<&str>) -> Self {
        let theme = stored
            .and_then(|s| Theme::parse(s).ok())
            .unwrap_or_default();
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets the theme. Returns true if it changed, so dependents know to
    /// rebuild.
    pub fn update(&mut self, theme: Theme) -> bool {
        let changed = self.theme != theme;
        self.theme = theme;
        changed
    }
}

/// Source paths a tile may offer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSources {
    /// Used regardless of theme when set.
    pub src: Option<String>,
    pub src_dark: Option<String>,
    pub src_light: Option<String>,
}

impl TileSources {
    /// Picks the source for `theme`: explicit `src`, then the theme's own
    /// variant, then the other variant.
    pub fn resolve(&self, theme: Theme) -> Option<&str> {
        if let Some(src) = &self.src {
            return Some(src);
        }
        let (preferred, other) = match theme {
            Theme::Dark => (&self.src_dark, &self.src_light),
            Theme::Light => (&self.src_light, &self.src_dark),
        };
        preferred.as_deref().or(other.as_deref())
    }
}
