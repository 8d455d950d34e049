//! Orbit controller for inspecting an assembly
//!
//! Controls:
//! - Left mouse drag: orbit around the target
//! - Scroll wheel: zoom toward / away from the target
//!
//! With damping enabled, each update applies a fraction of the pending
//! motion and keeps the rest, so the camera glides to a stop.

use explode3d_core::Camera;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pending motion below this is dropped
const SETTLE_EPSILON: f32 = 1e-5;

/// Pixels per scroll line for touchpad (pixel) deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Orbit controller for handling input
pub struct OrbitController {
    // Mouse state
    dragging: bool,

    // Motion not yet applied to the camera
    pending_azimuth: f32,
    pending_polar: f32,
    /// Natural log of the pending zoom factor
    pending_zoom: f32,

    // Configuration
    /// Radians per pixel of drag
    pub rotate_speed: f32,
    /// Log zoom per scroll line
    pub zoom_speed: f32,
    /// Fraction of pending motion applied per update (0-1]
    pub damping_factor: f32,
    pub damping_enabled: bool,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            dragging: false,

            pending_azimuth: 0.0,
            pending_polar: 0.0,
            pending_zoom: 0.0,

            rotate_speed: 0.005,
            zoom_speed: 0.1,
            damping_factor: 0.05,
            damping_enabled: true,
        }
    }

    /// Process mouse button input; returns true if the button is used
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        match button {
            MouseButton::Left => {
                self.dragging = state == ElementState::Pressed;
                true
            }
            _ => false,
        }
    }

    /// Process mouse movement (raw device delta in pixels)
    ///
    /// Only accumulates while dragging. Dragging right swings the camera
    /// left around the target; dragging down raises it.
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if !self.dragging {
            return;
        }
        self.pending_azimuth -= delta_x as f32 * self.rotate_speed;
        self.pending_polar -= delta_y as f32 * self.rotate_speed;
    }

    /// Process scroll input; scrolling up zooms in
    pub fn process_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
        };
        self.pending_zoom -= lines * self.zoom_speed;
    }

    /// Apply pending motion to the camera; returns true if it moved
    pub fn update<C: OrbitControl>(&mut self, camera: &mut C) -> bool {
        if !self.is_moving() {
            return false;
        }

        let fraction = if self.damping_enabled {
            self.damping_factor.clamp(f32::EPSILON, 1.0)
        } else {
            1.0
        };

        let azimuth = self.pending_azimuth * fraction;
        let polar = self.pending_polar * fraction;
        let zoom = self.pending_zoom * fraction;

        if azimuth != 0.0 || polar != 0.0 {
            camera.orbit(azimuth, polar);
        }
        if zoom != 0.0 {
            camera.zoom(zoom.exp());
        }

        self.pending_azimuth = settle(self.pending_azimuth - azimuth);
        self.pending_polar = settle(self.pending_polar - polar);
        self.pending_zoom = settle(self.pending_zoom - zoom);
        true
    }

    /// Drop all pending motion (used when the camera is reset)
    pub fn reset(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
        self.pending_zoom = 0.0;
    }

    /// Check if there is motion left to apply
    pub fn is_moving(&self) -> bool {
        self.pending_azimuth != 0.0 || self.pending_polar != 0.0 || self.pending_zoom != 0.0
    }

    /// Check if a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Builder: set orbit speed in radians per pixel
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Builder: set zoom speed per scroll line
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set damping factor (fraction applied per update)
    pub fn with_damping_factor(mut self, factor: f32) -> Self {
        self.damping_factor = factor;
        self
    }

    /// Builder: enable or disable damping
    pub fn with_damping(mut self, enabled: bool) -> Self {
        self.damping_enabled = enabled;
        self
    }
}

fn settle(value: f32) -> f32 {
    if value.abs() < SETTLE_EPSILON {
        0.0
    } else {
        value
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait OrbitControl {
    fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32);
    fn zoom(&mut self, factor: f32);
}

impl OrbitControl for Camera {
    fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        Camera::orbit(self, delta_azimuth, delta_polar);
    }

    fn zoom(&mut self, factor: f32) {
        Camera::zoom(self, factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explode3d_core::CameraSettings;

    #[derive(Default)]
    struct RecordingCamera {
        azimuth: f32,
        polar: f32,
        scale: f32,
    }

    impl OrbitControl for RecordingCamera {
        fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
            self.azimuth += delta_azimuth;
            self.polar += delta_polar;
        }

        fn zoom(&mut self, factor: f32) {
            if self.scale == 0.0 {
                self.scale = 1.0;
            }
            self.scale *= factor;
        }
    }

    fn drag(controller: &mut OrbitController, dx: f64, dy: f64) {
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_motion(dx, dy);
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
    }

    #[test]
    fn test_motion_ignored_without_drag() {
        let mut controller = OrbitController::new();
        controller.process_mouse_motion(100.0, 50.0);
        assert!(!controller.is_moving());

        let mut camera = RecordingCamera::default();
        assert!(!controller.update(&mut camera));
    }

    #[test]
    fn test_undamped_applies_everything_at_once() {
        let mut controller = OrbitController::new().with_damping(false);
        drag(&mut controller, 100.0, -20.0);

        let mut camera = RecordingCamera::default();
        assert!(controller.update(&mut camera));
        assert!((camera.azimuth + 0.5).abs() < 1e-6);
        assert!((camera.polar - 0.1).abs() < 1e-6);
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_damped_motion_converges_to_total() {
        let mut controller = OrbitController::new();
        drag(&mut controller, 100.0, 0.0);

        let mut camera = RecordingCamera::default();
        controller.update(&mut camera);
        // first update applies only the damping fraction
        assert!((camera.azimuth + 0.5 * 0.05).abs() < 1e-6);

        let mut updates = 1;
        while controller.update(&mut camera) {
            updates += 1;
            assert!(updates < 1000, "damping never settled");
        }
        assert!((camera.azimuth + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_scroll_up_zooms_in() {
        let mut controller = OrbitController::new().with_damping(false);
        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));

        let mut camera = RecordingCamera::default();
        controller.update(&mut camera);
        assert!(camera.scale < 1.0);
        assert!((camera.scale - (-0.2f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn test_reset_drops_pending_motion() {
        let mut controller = OrbitController::new();
        drag(&mut controller, 30.0, 30.0);
        controller.process_scroll(MouseScrollDelta::LineDelta(0.0, -1.0));
        assert!(controller.is_moving());

        controller.reset();
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_drives_core_camera() {
        let mut camera = Camera::new(CameraSettings::default(), 800, 600);
        let start = camera.eye();
        let radius = (start - camera.target()).length();

        let mut controller = OrbitController::new().with_damping(false);
        drag(&mut controller, 200.0, 0.0);
        controller.update(&mut camera);

        let eye = camera.eye();
        assert!((eye - start).length() > 0.1);
        // orbiting keeps the distance and the height
        assert!(((eye - camera.target()).length() - radius).abs() < 1e-3);
        assert!((eye.y - start.y).abs() < 1e-3);
    }

    #[test]
    fn test_builders() {
        let controller = OrbitController::new()
            .with_rotate_speed(0.01)
            .with_zoom_speed(0.2)
            .with_damping_factor(0.1)
            .with_damping(false);
        assert_eq!(controller.rotate_speed, 0.01);
        assert_eq!(controller.zoom_speed, 0.2);
        assert_eq!(controller.damping_factor, 0.1);
        assert!(!controller.damping_enabled);
    }
}
