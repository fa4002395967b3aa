//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: render error (sampling, surface, bad dimensions)
//! - 11: I/O error (image load, snapshot write, frame directory)
//! - 12: input error (bad config, params, theme, preset, missing source)
//! - 13: serialization error

use dotscape_core::DotError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A rendering error from the core or render crates.
    Render(DotError),
    /// An I/O error (image load, PNG write).
    Io(String),
    /// A user input error (bad JSON, out-of-range config, unknown name).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<DotError> for CliError {
    fn from(e: DotError) -> Self {
        match e {
            DotError::Io(msg) => CliError::Io(msg),
            DotError::LoadFailure { .. } => CliError::Io(e.to_string()),
            DotError::InvalidConfig { .. } | DotError::InvalidColor(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
