#![deny(unsafe_code)]
//! Core of the dotscape renderer.
//!
//! Reduces a raster image to a grid of colored sample points ([`sampler`]),
//! displaces them around a smoothed pointer ([`force`]), and paints them once
//! per frame through host-provided seams ([`surface::Surface`],
//! [`host::FrameHost`]) under the control of a [`driver::FrameDriver`].
//!
//! This crate does no I/O. Image decoding, CPU rasterization and PNG output
//! live in `dotscape-render`.

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod force;
pub mod geometry;
pub mod hash;
pub mod host;
pub mod pointer;
pub mod raster;
pub mod sampler;
pub mod source;
pub mod surface;
pub mod theme;

pub use color::{Background, Rgb8};
pub use config::{DotShape, PixelateConfig};
pub use driver::{DriverState, FrameDriver, TickOutcome};
pub use error::DotError;
pub use force::{DistortionMode, ForceField};
pub use geometry::{FitMode, Rect};
pub use host::{FrameHost, FrameId};
pub use pointer::{PointerEvent, PointerTracker};
pub use raster::Raster;
pub use sampler::{sample, SamplePoint, SampleSet};
pub use source::SourceImage;
pub use surface::Surface;
pub use theme::{Theme, ThemeContext, TileSources};
