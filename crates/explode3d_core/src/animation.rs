//! Explode/assemble easing and auto-rotation
//!
//! Both drivers are split into a pure step over plain values and an `apply`
//! that writes the result into an [`Assembly`]. The pure halves are what the
//! tests exercise; the scene only ever calls `apply`.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assembly::Assembly;
use crate::part::Part;

/// Fraction of the rest offset travelled when exploded
pub const DEFAULT_EXPLOSION_SCALE: f32 = 0.7;
/// Fraction of the remaining distance covered per tick
pub const DEFAULT_SMOOTHING: f32 = 0.1;
/// Auto-rotation per tick (radians)
pub const DEFAULT_YAW_STEP: f32 = 0.005;

/// Layout the animator eases toward
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplodeMode {
    #[default]
    Assembled,
    Exploded,
}

impl ExplodeMode {
    pub fn from_flag(exploded: bool) -> Self {
        if exploded {
            ExplodeMode::Exploded
        } else {
            ExplodeMode::Assembled
        }
    }

    pub fn is_exploded(self) -> bool {
        self == ExplodeMode::Exploded
    }
}

/// User-controlled view flags, read every tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: ExplodeMode,
    pub rotate_enabled: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: ExplodeMode::Assembled,
            rotate_enabled: true,
        }
    }
}

impl ViewState {
    pub fn new(exploded: bool, rotate_enabled: bool) -> Self {
        Self {
            mode: ExplodeMode::from_flag(exploded),
            rotate_enabled,
        }
    }

    /// 1.0 when exploded, 0.0 when assembled
    pub fn explode_factor(&self) -> f32 {
        if self.mode.is_exploded() {
            1.0
        } else {
            0.0
        }
    }
}

/// Tunables for both drivers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub explosion_scale: f32,
    pub smoothing: f32,
    pub yaw_step: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            explosion_scale: DEFAULT_EXPLOSION_SCALE,
            smoothing: DEFAULT_SMOOTHING,
            yaw_step: DEFAULT_YAW_STEP,
        }
    }
}

/// Eases part displacements toward `rest_offset * k`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplodeAnimator {
    explosion_scale: f32,
    smoothing: f32,
}

impl Default for ExplodeAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplodeAnimator {
    pub fn new() -> Self {
        Self {
            explosion_scale: DEFAULT_EXPLOSION_SCALE,
            smoothing: DEFAULT_SMOOTHING,
        }
    }

    pub fn from_settings(settings: &AnimationSettings) -> Self {
        Self::new()
            .with_explosion_scale(settings.explosion_scale)
            .with_smoothing(settings.smoothing)
    }

    /// Builder: set k; non-finite values keep the default
    pub fn with_explosion_scale(mut self, scale: f32) -> Self {
        self.explosion_scale = if scale.is_finite() {
            scale
        } else {
            log::warn!("Ignoring explosion scale {}, using {}", scale, DEFAULT_EXPLOSION_SCALE);
            DEFAULT_EXPLOSION_SCALE
        };
        self
    }

    /// Builder: set the per-tick smoothing constant, clamped to (0, 1]
    ///
    /// NaN and infinities fall back to [`DEFAULT_SMOOTHING`].
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = if smoothing.is_finite() {
            smoothing.clamp(f32::EPSILON, 1.0)
        } else {
            log::warn!("Ignoring smoothing {}, using {}", smoothing, DEFAULT_SMOOTHING);
            DEFAULT_SMOOTHING
        };
        self
    }

    pub fn explosion_scale(&self) -> f32 {
        self.explosion_scale
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Target displacement of a part in `mode`; `None` for static parts
    pub fn target_for(&self, part: &Part, mode: ExplodeMode) -> Option<Vec3> {
        if part.is_static() {
            return None;
        }
        let k = if mode.is_exploded() { self.explosion_scale } else { 0.0 };
        part.rest_offset().map(|offset| offset * k)
    }

    /// One easing step: `current + (target - current) * alpha`
    pub fn step(current: Vec3, target: Vec3, alpha: f32) -> Vec3 {
        current + (target - current) * alpha
    }

    /// Displacements after one tick, in part order; static parts keep theirs
    pub fn next_displacements(&self, parts: &[Part], mode: ExplodeMode) -> Vec<Vec3> {
        parts
            .iter()
            .map(|part| match self.target_for(part, mode) {
                Some(target) => Self::step(part.displacement(), target, self.smoothing),
                None => part.displacement(),
            })
            .collect()
    }

    /// Advance every moving part by one tick; returns whether anything moved
    pub fn apply(&self, assembly: &mut Assembly, mode: ExplodeMode) -> bool {
        let next = self.next_displacements(assembly.parts(), mode);
        assembly.apply_displacements(&next)
    }

    /// True when every moving part is within `epsilon` of its target
    pub fn is_settled(&self, assembly: &Assembly, mode: ExplodeMode, epsilon: f32) -> bool {
        assembly.parts().iter().all(|part| {
            self.target_for(part, mode)
                .map_or(true, |target| part.displacement().distance(target) <= epsilon)
        })
    }
}

/// Advances whole-assembly yaw while auto-rotation is enabled
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationDriver {
    yaw_step: f32,
}

impl Default for RotationDriver {
    fn default() -> Self {
        Self::new(DEFAULT_YAW_STEP)
    }
}

impl RotationDriver {
    /// Non-finite steps fall back to the default
    pub fn new(yaw_step: f32) -> Self {
        let yaw_step = if yaw_step.is_finite() { yaw_step } else { DEFAULT_YAW_STEP };
        Self { yaw_step }
    }

    pub fn yaw_step(&self) -> f32 {
        self.yaw_step
    }

    /// Yaw after one tick, wrapped to [0, 2π); unchanged when disabled
    pub fn next_yaw(&self, yaw: f32, enabled: bool) -> f32 {
        if enabled {
            (yaw + self.yaw_step).rem_euclid(TAU)
        } else {
            yaw
        }
    }

    /// Rotate the assembly by one tick; returns whether the yaw changed
    pub fn apply(&self, assembly: &mut Assembly, enabled: bool) -> bool {
        let before = assembly.yaw();
        assembly.set_yaw(self.next_yaw(before, enabled));
        assembly.yaw() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::material::Material;
    use std::sync::Arc;

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
        a.distance(b) < eps
    }

    fn assembly() -> Assembly {
        let geometry = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
        let material = Arc::new(Material::default());
        Assembly::new(
            "test",
            vec![
                Part::new(geometry.clone(), material.clone()).with_name("rack"),
                Part::new(geometry.clone(), material.clone()).exploding(Vec3::new(0.0, 0.0, 1.8)),
                Part::new(geometry, material).at(Vec3::X).exploding(Vec3::new(-1.5, 0.0, 0.0)),
            ],
        )
    }

    #[test]
    fn test_targets() {
        let a = assembly();
        let animator = ExplodeAnimator::new();
        assert_eq!(animator.target_for(&a.parts()[0], ExplodeMode::Exploded), None);
        let target = animator.target_for(&a.parts()[1], ExplodeMode::Exploded).unwrap();
        assert!(approx_eq(target, Vec3::new(0.0, 0.0, 1.26), 1e-6));
        assert_eq!(animator.target_for(&a.parts()[1], ExplodeMode::Assembled), Some(Vec3::ZERO));
    }

    #[test]
    fn test_single_step_is_eased() {
        let next = ExplodeAnimator::step(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.26), 0.1);
        assert!(approx_eq(next, Vec3::new(0.0, 0.0, 0.126), 1e-6));
    }

    #[test]
    fn test_converges_after_bounded_ticks() {
        let mut a = assembly();
        let animator = ExplodeAnimator::new();
        // 0.9^120 * 1.26 is well under 1e-3
        for _ in 0..120 {
            animator.apply(&mut a, ExplodeMode::Exploded);
        }
        assert!(animator.is_settled(&a, ExplodeMode::Exploded, EPSILON));
        assert!(approx_eq(a.parts()[2].displacement(), Vec3::new(-1.05, 0.0, 0.0), EPSILON));
        // placement untouched
        assert_eq!(a.parts()[2].placement.position, Vec3::X);

        for _ in 0..120 {
            animator.apply(&mut a, ExplodeMode::Assembled);
        }
        assert!(a.is_assembled(EPSILON));
    }

    #[test]
    fn test_not_settled_after_one_tick() {
        let mut a = assembly();
        let animator = ExplodeAnimator::new();
        assert!(animator.apply(&mut a, ExplodeMode::Exploded));
        assert!(!animator.is_settled(&a, ExplodeMode::Exploded, EPSILON));
    }

    #[test]
    fn test_static_part_never_moves() {
        let mut a = assembly();
        let animator = ExplodeAnimator::new();
        for _ in 0..50 {
            animator.apply(&mut a, ExplodeMode::Exploded);
        }
        assert_eq!(a.parts()[0].displacement(), Vec3::ZERO);
    }

    #[test]
    fn test_next_displacements_is_pure() {
        let a = assembly();
        let animator = ExplodeAnimator::new();
        let first = animator.next_displacements(a.parts(), ExplodeMode::Exploded);
        let second = animator.next_displacements(a.parts(), ExplodeMode::Exploded);
        assert_eq!(first, second);
        assert_eq!(a.displacements(), vec![Vec3::ZERO; 3]);
    }

    #[test]
    fn test_settings() {
        let settings = AnimationSettings {
            explosion_scale: 0.5,
            smoothing: 2.0,
            yaw_step: 0.01,
        };
        let animator = ExplodeAnimator::from_settings(&settings);
        assert_eq!(animator.explosion_scale(), 0.5);
        assert_eq!(animator.smoothing(), 1.0);
    }

    #[test]
    fn test_non_finite_settings_use_defaults() {
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let animator = ExplodeAnimator::new().with_smoothing(bad).with_explosion_scale(bad);
            assert_eq!(animator.smoothing(), DEFAULT_SMOOTHING);
            assert_eq!(animator.explosion_scale(), DEFAULT_EXPLOSION_SCALE);
            assert_eq!(RotationDriver::new(bad).yaw_step(), DEFAULT_YAW_STEP);
        }

        // still converges with a rejected smoothing constant
        let mut a = assembly();
        let animator = ExplodeAnimator::new().with_smoothing(f32::NAN);
        for _ in 0..120 {
            animator.apply(&mut a, ExplodeMode::Exploded);
        }
        assert!(a.parts().iter().all(|p| p.displacement().is_finite()));
        assert!(animator.is_settled(&a, ExplodeMode::Exploded, EPSILON));
    }

    #[test]
    fn test_rotation_accumulates_and_freezes() {
        let driver = RotationDriver::default();
        let mut a = assembly();
        for _ in 0..10 {
            driver.apply(&mut a, true);
        }
        let yaw = a.yaw();
        assert!((yaw - 0.05).abs() < 1e-5);

        assert!(!driver.apply(&mut a, false));
        assert_eq!(a.yaw(), yaw);

        driver.apply(&mut a, true);
        assert!((a.yaw() - (yaw + 0.005)).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_wraps() {
        let driver = RotationDriver::new(0.5);
        let next = driver.next_yaw(TAU - 0.25, true);
        assert!((next - 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_view_state() {
        let state = ViewState::new(true, false);
        assert_eq!(state.mode, ExplodeMode::Exploded);
        assert_eq!(state.explode_factor(), 1.0);
        assert!(ViewState::default().rotate_enabled);
        assert_eq!(ViewState::default().explode_factor(), 0.0);
    }
}
