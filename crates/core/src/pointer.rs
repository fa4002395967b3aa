//! Pointer events and the smoothed engagement state they drive.
//!
//! Events only move *targets*. The animated values (smoothed pointer position
//! and activity) chase those targets once per accepted frame in
//! [`PointerTracker::advance`].

use crate::force::OFF_SURFACE;
use glam::DVec2;

/// A pointer event in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(DVec2),
    Enter,
    Leave,
}

/// Target and smoothed pointer position plus engagement level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    target: DVec2,
    smoothed: DVec2,
    inside: bool,
    activity_target: f64,
    activity: f64,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self {
            target: OFF_SURFACE,
            smoothed: OFF_SURFACE,
            inside: false,
            activity_target: 0.0,
            activity: 0.0,
        }
    }
}

impl PointerTracker {
    /// Applies an event to the targets.
    ///
    /// On leave with `fade_on_leave` the activity target drops to zero and the
    /// position is kept, so the effect eases out where the pointer left.
    /// Without fading the target jumps off-surface instead.
    pub fn handle(&mut self, event: PointerEvent, fade_on_leave: bool) {
        match event {
            PointerEvent::Move(p) => {
                self.target = p;
                self.inside = true;
                self.activity_target = 1.0;
            }
            PointerEvent::Enter => {
                self.inside = true;
                self.activity_target = 1.0;
            }
            PointerEvent::Leave => {
                self.inside = false;
                if fade_on_leave {
                    self.activity_target = 0.0;
                } else {
                    self.target = OFF_SURFACE;
                }
            }
        }
    }

    /// Moves the smoothed values one frame toward their targets.
    ///
    /// The pointer covers `follow_speed` of the remaining distance. Activity
    /// eases by `fade_speed` when fading, otherwise snaps to 1 inside and 0
    /// outside.
    pub fn advance(&mut self, follow_speed: f64, fade_on_leave: bool, fade_speed: f64) {
        self.smoothed += (self.target - self.smoothed) * follow_speed;
        self.activity = if fade_on_leave {
            self.activity + (self.activity_target - self.activity) * fade_speed
        } else if self.inside {
            1.0
        } else {
            0.0
        };
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }

    pub fn smoothed(&self) -> DVec2 {
        self.smoothed
    }

    pub fn inside(&self) -> bool {
        self.inside
    }

    /// Current engagement, clamped to [0, 1].
    pub fn activity(&self) -> f64 {
        self.activity.clamp(0.0, 1.0)
    }
}
