//! The viewer scene: one attached assembly, camera and lights
//!
//! The scene owns the single assembly slot. Attaching drops the previous
//! assembly outright, so no part of it survives a swap. Every tick runs the
//! rotation driver and then the explode animator against the current
//! [`ViewState`].

use crate::animation::{AnimationSettings, ExplodeAnimator, RotationDriver, ViewState};
use crate::assembly::{Assembly, DirtyFlags};
use crate::camera::{Camera, CameraSettings, LightRig};

pub struct ViewerScene {
    camera: Camera,
    lights: LightRig,
    assembly: Option<Assembly>,
    generation: u64,
    animator: ExplodeAnimator,
    rotation: RotationDriver,
}

impl ViewerScene {
    /// Scene with default animation tunables
    pub fn new(camera: Camera, lights: LightRig) -> Self {
        Self::with_animation(camera, lights, &AnimationSettings::default())
    }

    pub fn with_animation(camera: Camera, lights: LightRig, animation: &AnimationSettings) -> Self {
        Self {
            camera,
            lights,
            assembly: None,
            generation: 0,
            animator: ExplodeAnimator::from_settings(animation),
            rotation: RotationDriver::new(animation.yaw_step),
        }
    }

    /// Headless scene with default camera and lights
    pub fn headless(width: u32, height: u32) -> Self {
        Self::new(Camera::new(CameraSettings::default(), width, height), LightRig::default())
    }

    /// Attach `assembly` at the origin in its assembled pose; returns the previous one
    pub fn attach(&mut self, mut assembly: Assembly) -> Option<Assembly> {
        assembly.reset_pose();
        assembly.mark_dirty(DirtyFlags::ALL);
        self.generation += 1;
        log::info!(
            "Attached assembly '{}' ({} parts, {} meshes)",
            assembly.id(),
            assembly.part_count(),
            assembly.mesh_count()
        );
        self.assembly.replace(assembly)
    }

    /// Remove the attached assembly
    pub fn detach(&mut self) -> Option<Assembly> {
        let previous = self.assembly.take();
        if previous.is_some() {
            self.generation += 1;
        }
        previous
    }

    pub fn current_assembly(&self) -> Option<&Assembly> {
        self.assembly.as_ref()
    }

    pub fn current_assembly_mut(&mut self) -> Option<&mut Assembly> {
        self.assembly.as_mut()
    }

    /// Bumped on every attach and detach; lets renderers spot a swap
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Advance animation by one tick; returns whether anything moved
    pub fn tick(&mut self, view: &ViewState) -> bool {
        let Some(assembly) = self.assembly.as_mut() else {
            return false;
        };
        let rotated = self.rotation.apply(assembly, view.rotate_enabled);
        let moved = self.animator.apply(assembly, view.mode);
        rotated || moved
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
        log::debug!("Camera reset to default viewpoint");
    }

    /// Returns whether the projection changed
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let changed = self.camera.resize(width, height);
        if changed {
            log::debug!("Viewport resized to {}x{}", width, height);
        }
        changed
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn animator(&self) -> &ExplodeAnimator {
        &self.animator
    }

    pub fn rotation(&self) -> &RotationDriver {
        &self.rotation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ExplodeMode;
    use crate::geometry::Geometry;
    use crate::material::Material;
    use crate::part::Part;
    use glam::Vec3;
    use std::sync::Arc;

    fn assembly(id: &str, parts: usize) -> Assembly {
        let geometry = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
        let material = Arc::new(Material::default());
        let parts = (0..parts)
            .map(|i| Part::new(geometry.clone(), material.clone()).exploding(Vec3::new(i as f32 + 1.0, 0.0, 0.0)))
            .collect();
        Assembly::new(id, parts)
    }

    #[test]
    fn test_attach_replaces() {
        let mut scene = ViewerScene::headless(800, 600);
        assert!(scene.current_assembly().is_none());
        assert!(scene.attach(assembly("a", 3)).is_none());
        let previous = scene.attach(assembly("b", 5)).unwrap();
        assert_eq!(previous.id(), "a");
        assert_eq!(scene.current_assembly().map(|a| a.part_count()), Some(5));
        assert_eq!(scene.generation(), 2);
    }

    #[test]
    fn test_attach_resets_pose() {
        let mut scene = ViewerScene::headless(800, 600);
        let mut a = assembly("a", 2);
        a.apply_displacements(&[Vec3::X, Vec3::Y]);
        a.set_yaw(1.0);
        scene.attach(a);
        let attached = scene.current_assembly().unwrap();
        assert!(attached.is_assembled(0.0));
        assert_eq!(attached.yaw(), 0.0);
    }

    #[test]
    fn test_tick_without_assembly() {
        let mut scene = ViewerScene::headless(800, 600);
        assert!(!scene.tick(&ViewState::default()));
    }

    #[test]
    fn test_tick_moves_and_rotates() {
        let mut scene = ViewerScene::headless(800, 600);
        scene.attach(assembly("a", 1));
        let view = ViewState {
            mode: ExplodeMode::Exploded,
            rotate_enabled: true,
        };
        assert!(scene.tick(&view));
        let a = scene.current_assembly().unwrap();
        assert!(a.yaw() > 0.0);
        assert!((a.parts()[0].displacement().x - 0.07).abs() < 1e-6);
    }

    #[test]
    fn test_detach() {
        let mut scene = ViewerScene::headless(800, 600);
        scene.attach(assembly("a", 1));
        assert!(scene.detach().is_some());
        assert!(scene.detach().is_none());
        assert_eq!(scene.generation(), 2);
    }

    #[test]
    fn test_resize_before_attach() {
        let mut scene = ViewerScene::headless(800, 600);
        assert!(scene.resize(1280, 720));
        assert!(!scene.resize(1280, 720));
    }

    #[test]
    fn test_reset_camera_independent_of_assembly() {
        let mut scene = ViewerScene::headless(800, 600);
        scene.camera_mut().orbit(1.0, 0.2);
        scene.reset_camera();
        assert_eq!(scene.camera().eye(), Vec3::new(6.0, 4.0, 9.0));
    }
}
