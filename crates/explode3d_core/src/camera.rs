//! Perspective orbit camera and light rig
//!
//! The camera orbits a target point. Its projection is cached and only
//! recomputed when the viewport aspect actually changes, so repeated resize
//! events with the same dimensions are free.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::material::Color;

const MIN_POLAR: f32 = 0.01;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 100.0;

/// Default viewpoint and lens
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec3::new(6.0, 4.0, 9.0),
            target: Vec3::ZERO,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Perspective camera looking at a target
#[derive(Clone, Debug)]
pub struct Camera {
    settings: CameraSettings,
    eye: Vec3,
    target: Vec3,
    viewport: (u32, u32),
    projection: Mat4,
    projection_revision: u64,
}

impl Camera {
    /// Camera at the default viewpoint for a `width` x `height` viewport
    pub fn new(settings: CameraSettings, width: u32, height: u32) -> Self {
        let viewport = (width.max(1), height.max(1));
        let mut camera = Self {
            settings,
            eye: settings.position,
            target: settings.target,
            viewport,
            projection: Mat4::IDENTITY,
            projection_revision: 0,
        };
        camera.rebuild_projection();
        camera
    }

    /// Update the viewport; returns whether the projection changed
    ///
    /// Zero-sized viewports (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if (width, height) == self.viewport {
            return false;
        }
        let old_aspect = self.aspect();
        self.viewport = (width, height);
        if self.aspect() == old_aspect {
            return false;
        }
        self.rebuild_projection();
        true
    }

    /// Back to the default viewpoint
    pub fn reset(&mut self) {
        self.eye = self.settings.position;
        self.target = self.settings.target;
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.0 as f32 / self.viewport.1 as f32
    }

    /// Incremented every time the projection is recomputed
    pub fn projection_revision(&self) -> u64 {
        self.projection_revision
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Orbit around the target by spherical angle deltas (radians)
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        let offset = self.eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) + delta_azimuth;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + delta_polar).clamp(MIN_POLAR, PI - MIN_POLAR);
        self.eye = self.target + spherical(radius, polar, azimuth);
    }

    /// Scale the distance to the target (factor < 1 moves closer)
    pub fn zoom(&mut self, factor: f32) {
        let offset = self.eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON || factor <= 0.0 {
            return;
        }
        let new_radius = (radius * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.eye = self.target + offset * (new_radius / radius);
    }

    fn rebuild_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.settings.fov_y_degrees.to_radians(),
            self.aspect(),
            self.settings.near,
            self.settings.far,
        );
        self.projection_revision += 1;
    }
}

fn spherical(radius: f32, polar: f32, azimuth: f32) -> Vec3 {
    let ring = radius * polar.sin();
    Vec3::new(ring * azimuth.sin(), radius * polar.cos(), ring * azimuth.cos())
}

/// A light shining from `position` toward the origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector from the surface toward the light
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

/// Scene lighting and backdrop
#[derive(Clone, Debug, PartialEq)]
pub struct LightRig {
    pub background: Color,
    pub exposure: f32,
    pub ambient: f32,
    pub sky: Color,
    pub ground: Color,
    pub hemisphere_intensity: f32,
    pub directional: Vec<DirectionalLight>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0x0a0a0a),
            exposure: 2.8,
            ambient: 0.8,
            sky: Color::from_hex(0xeeeeee),
            ground: Color::from_hex(0xaaaaaa),
            hemisphere_intensity: 1.5,
            directional: vec![
                DirectionalLight {
                    position: Vec3::new(10.0, 15.0, 10.0),
                    color: Color::WHITE,
                    intensity: 3.0,
                },
                DirectionalLight {
                    position: Vec3::new(-10.0, 5.0, -10.0),
                    color: Color::WHITE,
                    intensity: 2.0,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_default_viewpoint() {
        let camera = Camera::new(CameraSettings::default(), 800, 600);
        assert_eq!(camera.eye(), Vec3::new(6.0, 4.0, 9.0));
        assert_eq!(camera.target(), Vec3::ZERO);
        assert_eq!(camera.projection_revision(), 1);
    }

    #[test]
    fn test_resize_same_dimensions_is_noop() {
        let mut camera = Camera::new(CameraSettings::default(), 800, 600);
        assert!(camera.resize(1024, 512));
        let projection = camera.projection();
        let revision = camera.projection_revision();
        assert!(!camera.resize(1024, 512));
        assert_eq!(camera.projection(), projection);
        assert_eq!(camera.projection_revision(), revision);
    }

    #[test]
    fn test_resize_same_aspect_keeps_projection() {
        let mut camera = Camera::new(CameraSettings::default(), 800, 600);
        assert!(!camera.resize(1600, 1200));
        assert_eq!(camera.viewport(), (1600, 1200));
        assert_eq!(camera.projection_revision(), 1);
    }

    #[test]
    fn test_resize_zero_ignored() {
        let mut camera = Camera::new(CameraSettings::default(), 800, 600);
        assert!(!camera.resize(0, 600));
        assert_eq!(camera.viewport(), (800, 600));
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::new(CameraSettings::default(), 800, 600);
        let distance = camera.eye().distance(camera.target());
        camera.orbit(0.7, -0.3);
        assert!((camera.eye().distance(camera.target()) - distance).abs() < EPSILON);
        camera.reset();
        assert_eq!(camera.eye(), Vec3::new(6.0, 4.0, 9.0));
    }

    #[test]
    fn test_orbit_clamps_at_pole() {
        let mut camera = Camera::new(CameraSettings::default(), 800, 600);
        camera.orbit(0.0, -10.0);
        let offset = (camera.eye() - camera.target()).normalize();
        assert!(offset.y < 1.0);
        assert!(offset.y > 0.99);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = Camera::new(CameraSettings::default(), 800, 600);
        camera.zoom(0.001);
        assert!((camera.eye().length() - MIN_DISTANCE).abs() < EPSILON);
        camera.zoom(1e6);
        assert!((camera.eye().length() - MAX_DISTANCE).abs() < 1e-2);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new(CameraSettings::default(), 800, 600);
        let clip = camera.view_projection() * glam::Vec4::W;
        assert!((clip.x / clip.w).abs() < EPSILON);
        assert!((clip.y / clip.w).abs() < EPSILON);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_light_rig_defaults() {
        let rig = LightRig::default();
        assert_eq!(rig.directional.len(), 2);
        assert_eq!(rig.exposure, 2.8);
        assert!((rig.directional[0].direction().length() - 1.0).abs() < EPSILON);
    }
}
