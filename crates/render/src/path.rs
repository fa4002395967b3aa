//! Scripted pointer motion for offline animation.

use dotscape_core::error::DotError;
use dotscape_core::PointerEvent;
use glam::DVec2;
use std::f64::consts::TAU;

const PATH_NAMES: &[&str] = &["orbit", "sweep", "center"];

/// A pointer trajectory over normalized time `t` in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPath {
    /// One full circle around the surface center, radius 30% of the short side.
    Orbit,
    /// Left to right along the horizontal midline.
    Sweep,
    /// Parked at the surface center.
    Center,
}

impl PointerPath {
    pub fn from_name(name: &str) -> Result<Self, DotError> {
        match name {
            "orbit" => Ok(PointerPath::Orbit),
            "sweep" => Ok(PointerPath::Sweep),
            "center" => Ok(PointerPath::Center),
            other => Err(DotError::invalid_config(
                "path",
                format!("unknown pointer path '{other}', expected one of {}", PATH_NAMES.join(", ")),
            )),
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        PATH_NAMES
    }

    /// Pointer position at `t` on a `width x height` surface.
    pub fn position(self, t: f64, width: usize, height: usize) -> DVec2 {
        let size = DVec2::new(width as f64, height as f64);
        let center = size / 2.0;
        let t = t.clamp(0.0, 1.0);
        match self {
            PointerPath::Orbit => {
                let radius = 0.3 * size.min_element();
                center + DVec2::from_angle(t * TAU) * radius
            }
            PointerPath::Sweep => DVec2::new(size.x * t, center.y),
            PointerPath::Center => center,
        }
    }

    /// The move event at `t`.
    pub fn event_at(self, t: f64, width: usize, height: usize) -> PointerEvent {
        PointerEvent::Move(self.position(t, width, height))
    }
}
