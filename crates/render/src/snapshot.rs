//! PNG output of a painted [`Raster`].
//!
//! Feature-gated behind `png` (default on) so the CPU surface and offline
//! host can be used without the `image` crate.

use dotscape_core::error::DotError;
use dotscape_core::Raster;
use std::path::Path;

/// Writes a raster as an RGBA PNG.
///
/// Returns `DotError::InvalidDimensions` if the dimensions overflow `u32`,
/// or `DotError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), DotError> {
    let w = u32::try_from(raster.width()).map_err(|_| DotError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| DotError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.data().to_vec())
        .ok_or_else(|| DotError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| DotError::Io(format!("{}: {e}", path.display())))
}
