//! Error types for the dotscape core.

use thiserror::Error;

/// Errors produced while configuring, sampling, or painting.
#[derive(Debug, Error)]
pub enum DotError {
    /// Width or height was zero, or the area too large, when creating a
    /// raster or surface.
    #[error("invalid dimensions: width and height must be non-zero and within the pixel limit")]
    InvalidDimensions,

    /// A configuration field was out of range. Configuration is rejected,
    /// never clamped.
    #[error("invalid config '{field}': {reason}")]
    InvalidConfig { field: String, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The source image could not be loaded or decoded.
    #[error("failed to load image '{source_name}': {reason}")]
    LoadFailure { source_name: String, reason: String },

    /// Pixel data of the source image may not be read back.
    #[error("pixel readback blocked for source image")]
    ReadbackBlocked,

    /// A draw call against the host surface failed.
    #[error("surface error: {0}")]
    Surface(String),

    /// File I/O failed (snapshot writing).
    #[error("I/O error: {0}")]
    Io(String),
}

impl DotError {
    /// Shorthand for building a [`DotError::InvalidConfig`].
    pub fn invalid_config(field: &str, reason: impl Into<String>) -> Self {
        DotError::InvalidConfig {
            field: field.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = DotError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_config_includes_field_and_reason() {
        let err = DotError::invalid_config("cell_size", "must be >= 1, got 0");
        let msg = err.to_string();
        assert!(msg.contains("cell_size"), "missing field in: {msg}");
        assert!(msg.contains("got 0"), "missing reason in: {msg}");
    }

    #[test]
    fn load_failure_includes_source_and_reason() {
        let err = DotError::LoadFailure {
            source_name: "portrait.png".into(),
            reason: "no such file".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("portrait.png"), "missing source in: {msg}");
        assert!(msg.contains("no such file"), "missing reason in: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = DotError::InvalidColor("bad hex".into()).to_string();
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn readback_blocked_mentions_readback() {
        let msg = DotError::ReadbackBlocked.to_string();
        assert!(msg.contains("readback"), "got: {msg}");
    }

    #[test]
    fn dot_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DotError>();
    }

    #[test]
    fn dot_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<DotError>();
    }
}
