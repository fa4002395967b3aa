//! Pointer-driven displacement field.
//!
//! Each frame every surviving sample point is offset by a Gaussian-weighted
//! force centered on the smoothed pointer, in one of three modes, plus a
//! per-point "breathing" jitter. Influence is `falloff * activity`; below
//! [`INFLUENCE_EPSILON`] the point is left exactly at its base position.
//!
//! All functions here are pure: same inputs produce the same output.

use crate::config::PixelateConfig;
use crate::geometry::Rect;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Influence at or below this is treated as zero.
pub const INFLUENCE_EPSILON: f64 = 0.0005;
/// Multiplier turning a point seed in [0, 1) into a jitter phase offset.
pub const JITTER_PHASE_SCALE: f64 = 43_758.5453;
/// Extra phase factor on the y axis so x/y jitter decorrelate.
pub const JITTER_Y_FACTOR: f64 = 1.13;
/// Radians of swirl per pixel of strength at full influence.
pub const SWIRL_ANGLE_SCALE: f64 = 0.05;
/// Guards the normalization of the pointer offset at zero distance.
const DIRECTION_EPSILON: f64 = 1e-4;
/// Pointer position that is far enough away to have no influence.
pub const OFF_SURFACE: DVec2 = DVec2::new(-9999.0, -9999.0);

/// How points react to the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistortionMode {
    /// Push away from the pointer.
    Repel,
    /// Pull toward the pointer.
    Attract,
    /// Rotate around the pointer.
    #[default]
    Swirl,
}

/// Parameters of the displacement field for one sample set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceField {
    pub mode: DistortionMode,
    pub strength: f64,
    pub radius: f64,
    pub jitter_strength: f64,
    pub jitter_speed: f64,
    /// When set, influence is zero while the pointer is outside this box.
    pub clamp_box: Option<Rect>,
}

impl ForceField {
    /// Builds the field from a config and the fitted image box.
    pub fn from_config(config: &PixelateConfig, draw_box: Rect) -> Self {
        Self {
            mode: config.distortion_mode,
            strength: config.distortion_strength,
            radius: config.distortion_radius,
            jitter_strength: config.jitter_strength,
            jitter_speed: config.jitter_speed,
            clamp_box: config.clamp_to_image.then_some(draw_box),
        }
    }

    /// Standard deviation of the Gaussian falloff: `max(1, radius / 2)`.
    pub fn sigma(&self) -> f64 {
        (self.radius * 0.5).max(1.0)
    }

    /// Jitter phase at `seconds` of wall-clock time.
    pub fn phase_at(&self, seconds: f64) -> f64 {
        seconds * self.jitter_speed
    }

    /// Influence of `pointer` on a point at `point`, in [0, 1].
    pub fn influence(&self, point: DVec2, pointer: DVec2, activity: f64) -> f64 {
        if let Some(bounds) = self.clamp_box {
            if !bounds.contains(pointer) {
                return 0.0;
            }
        }
        let sigma = self.sigma();
        let dist2 = point.distance_squared(pointer);
        let falloff = (-dist2 / (2.0 * sigma * sigma)).exp();
        falloff * activity.clamp(0.0, 1.0)
    }

    /// Displacement `(dx, dy)` of a point with jitter `seed` for this frame.
    ///
    /// Exactly zero when the influence is negligible.
    pub fn displace(
        &self,
        point: DVec2,
        seed: f64,
        pointer: DVec2,
        activity: f64,
        phase: f64,
    ) -> DVec2 {
        let influence = self.influence(point, pointer, activity);
        if influence <= INFLUENCE_EPSILON {
            return DVec2::ZERO;
        }

        let offset = point - pointer;
        let mut displacement = match self.mode {
            DistortionMode::Repel => {
                offset / (offset.length() + DIRECTION_EPSILON) * self.strength * influence
            }
            DistortionMode::Attract => {
                -offset / (offset.length() + DIRECTION_EPSILON) * self.strength * influence
            }
            DistortionMode::Swirl => {
                let angle = self.strength * SWIRL_ANGLE_SCALE * influence;
                let rotated = DVec2::from_angle(angle).rotate(offset);
                pointer + rotated - point
            }
        };

        if self.jitter_strength > 0.0 {
            let k = seed * JITTER_PHASE_SCALE;
            let amplitude = self.jitter_strength * influence;
            displacement += DVec2::new(
                (phase + k).sin() * amplitude,
                (phase + k * JITTER_Y_FACTOR).cos() * amplitude,
            );
        }
        displacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(mode: DistortionMode) -> ForceField {
        ForceField {
            mode,
            strength: 10.0,
            radius: 80.0,
            jitter_strength: 0.0,
            jitter_speed: 4.0,
            clamp_box: None,
        }
    }

    #[test]
    fn zero_activity_gives_exact_zero() {
        for mode in [DistortionMode::Repel, DistortionMode::Attract, DistortionMode::Swirl] {
            let f = ForceField {
                jitter_strength: 5.0,
                ..field(mode)
            };
            let d = f.displace(DVec2::new(10.0, 10.0), 0.3, DVec2::new(12.0, 9.0), 0.0, 1.7);
            assert_eq!(d, DVec2::ZERO, "mode {mode:?}");
        }
    }

    #[test]
    fn far_pointer_gives_exact_zero() {
        let f = ForceField {
            jitter_strength: 5.0,
            ..field(DistortionMode::Repel)
        };
        let d = f.displace(DVec2::new(100.0, 100.0), 0.5, OFF_SURFACE, 1.0, 3.0);
        assert_eq!(d, DVec2::ZERO);
    }

    #[test]
    fn repel_pushes_away_from_pointer() {
        let f = field(DistortionMode::Repel);
        let d = f.displace(DVec2::new(110.0, 100.0), 0.0, DVec2::new(100.0, 100.0), 1.0, 0.0);
        assert!(d.x > 0.0, "expected +x push, got {d:?}");
        assert!(d.y.abs() < 1e-12);
    }

    #[test]
    fn attract_is_mirror_of_repel() {
        let p = DVec2::new(90.0, 130.0);
        let pointer = DVec2::new(100.0, 100.0);
        let repel = field(DistortionMode::Repel).displace(p, 0.0, pointer, 1.0, 0.0);
        let attract = field(DistortionMode::Attract).displace(p, 0.0, pointer, 1.0, 0.0);
        assert!((repel + attract).length() < 1e-12);
    }

    #[test]
    fn swirl_preserves_distance_to_pointer() {
        let f = field(DistortionMode::Swirl);
        let p = DVec2::new(120.0, 95.0);
        let pointer = DVec2::new(100.0, 100.0);
        let d = f.displace(p, 0.0, pointer, 1.0, 0.0);
        assert!(d.length() > 0.0);
        let before = p.distance(pointer);
        let after = (p + d).distance(pointer);
        assert!((before - after).abs() < 1e-9, "{before} vs {after}");
    }

    #[test]
    fn swirl_rotates_counter_clockwise_in_surface_space() {
        let f = field(DistortionMode::Swirl);
        let pointer = DVec2::new(0.0, 0.0);
        let d = f.displace(DVec2::new(10.0, 0.0), 0.0, pointer, 1.0, 0.0);
        assert!(d.y > 0.0, "positive angle should rotate +x toward +y, got {d:?}");
    }

    #[test]
    fn influence_at_pointer_equals_activity() {
        let f = field(DistortionMode::Repel);
        let p = DVec2::new(50.0, 50.0);
        assert!((f.influence(p, p, 0.7) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn influence_falls_off_smoothly_with_distance() {
        let f = field(DistortionMode::Repel);
        let pointer = DVec2::ZERO;
        let near = f.influence(DVec2::new(10.0, 0.0), pointer, 1.0);
        let mid = f.influence(DVec2::new(40.0, 0.0), pointer, 1.0);
        let far = f.influence(DVec2::new(120.0, 0.0), pointer, 1.0);
        assert!(near > mid && mid > far && far > 0.0);
        // one sigma away: exp(-1/2)
        assert!((mid - (-0.5_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn sigma_has_floor_of_one() {
        let f = ForceField {
            radius: 0.5,
            ..field(DistortionMode::Repel)
        };
        assert!((f.sigma() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_box_disables_influence_outside_image() {
        let f = ForceField {
            clamp_box: Some(Rect::new(0, 0, 50, 50)),
            ..field(DistortionMode::Repel)
        };
        let p = DVec2::new(48.0, 25.0);
        assert_eq!(f.displace(p, 0.0, DVec2::new(55.0, 25.0), 1.0, 0.0), DVec2::ZERO);
        assert_ne!(f.displace(p, 0.0, DVec2::new(50.0, 25.0), 1.0, 0.0), DVec2::ZERO);
    }

    #[test]
    fn jitter_depends_on_seed_and_phase() {
        let f = ForceField {
            strength: 0.0,
            jitter_strength: 4.0,
            ..field(DistortionMode::Repel)
        };
        let p = DVec2::new(5.0, 5.0);
        let a = f.displace(p, 0.1, p, 1.0, 0.0);
        let b = f.displace(p, 0.2, p, 1.0, 0.0);
        let c = f.displace(p, 0.1, p, 1.0, 1.0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.x.abs() <= 4.0 && a.y.abs() <= 4.0);
    }

    #[test]
    fn from_config_copies_fields_and_clamp_policy() {
        let cfg = PixelateConfig {
            clamp_to_image: false,
            ..PixelateConfig::default()
        };
        let f = ForceField::from_config(&cfg, Rect::new(1, 2, 3, 4));
        assert!(f.clamp_box.is_none());
        assert_eq!(f.mode, cfg.distortion_mode);
        let clamped = ForceField::from_config(&PixelateConfig::default(), Rect::new(1, 2, 3, 4));
        assert_eq!(clamped.clamp_box, Some(Rect::new(1, 2, 3, 4)));
    }

    #[test]
    fn phase_scales_seconds_by_jitter_speed() {
        assert!((field(DistortionMode::Swirl).phase_at(2.5) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn distortion_mode_serde_is_snake_case() {
        assert_eq!(serde_json::to_string(&DistortionMode::Attract).unwrap(), "\"attract\"");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn push_mode() -> impl Strategy<Value = DistortionMode> {
            prop_oneof![Just(DistortionMode::Repel), Just(DistortionMode::Attract)]
        }

        proptest! {
            #[test]
            fn push_displacement_bounded_by_strength_plus_jitter(
                mode in push_mode(),
                strength in 0.0_f64..50.0,
                jitter in 0.0_f64..20.0,
                px in -200.0_f64..200.0, py in -200.0_f64..200.0,
                qx in -200.0_f64..200.0, qy in -200.0_f64..200.0,
                seed in 0.0_f64..1.0,
                activity in 0.0_f64..=1.0,
                phase in 0.0_f64..1000.0,
            ) {
                let f = ForceField {
                    mode,
                    strength,
                    radius: 80.0,
                    jitter_strength: jitter,
                    jitter_speed: 1.0,
                    clamp_box: None,
                };
                let d = f.displace(DVec2::new(px, py), seed, DVec2::new(qx, qy), activity, phase);
                let bound = strength + jitter + 1e-9;
                prop_assert!(d.x.abs() <= bound && d.y.abs() <= bound, "{d:?} exceeds {bound}");
            }

            #[test]
            fn influence_in_unit_interval(
                px in -500.0_f64..500.0, py in -500.0_f64..500.0,
                activity in -1.0_f64..2.0,
                radius in 0.1_f64..400.0,
            ) {
                let f = ForceField { radius, ..field(DistortionMode::Swirl) };
                let i = f.influence(DVec2::new(px, py), DVec2::ZERO, activity);
                prop_assert!((0.0..=1.0).contains(&i));
            }
        }
    }
}
