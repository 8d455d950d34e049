//! Integration tests for the assembly/animation pipeline
//!
//! These tests drive the registry, scene and animators together without a GPU:
//! 1. Every built-in assembly attaches with its declared part count
//! 2. Explode and assemble converge within a bounded number of ticks
//! 3. Toggling auto-rotation never resets the accumulated yaw
//! 4. Swapping mid-explosion starts the new assembly from its assembled pose

use explode3d_core::models::declared_part_count;
use explode3d_core::{
    AssemblyRegistry, AssemblySource, ExplodeMode, FlatTextures, ProceduralTextures, ViewState, ViewerScene,
};

const EPSILON: f32 = 1e-3;
const SETTLE_TICKS: usize = 150;

fn registry() -> AssemblyRegistry {
    AssemblyRegistry::with_builtin_models(Box::new(FlatTextures))
}

fn exploded(rotate: bool) -> ViewState {
    ViewState {
        mode: ExplodeMode::Exploded,
        rotate_enabled: rotate,
    }
}

// ==================== Attach Tests ====================

#[test]
fn test_every_assembly_attaches_with_declared_count() {
    let mut registry = registry();
    let mut scene = ViewerScene::headless(800, 600);
    let ids: Vec<String> = registry.ids().map(str::to_string).collect();
    assert_eq!(ids.len(), 5);

    for id in &ids {
        let assembly = registry.build(id).expect("built-in id should build");
        scene.attach(assembly);
        let attached = scene.current_assembly().expect("assembly should be attached");
        assert_eq!(attached.id(), id);
        assert_eq!(Some(attached.part_count()), declared_part_count(id));
    }
}

#[test]
fn test_swap_releases_previous_parts() {
    let mut registry = registry();
    let mut scene = ViewerScene::headless(800, 600);

    scene.attach(registry.build("sarj").unwrap());
    let previous = scene.attach(registry.build("wpa").unwrap()).expect("previous assembly returned");
    assert_eq!(previous.id(), "sarj");
    // dropping the returned assembly is the last owner of its parts
    let mesh = previous.parts()[0].meshes[0].geometry.clone();
    drop(previous);
    assert_eq!(std::sync::Arc::strong_count(&mesh), 1);

    assert_eq!(scene.current_assembly().unwrap().part_count(), 22);
}

#[test]
fn test_unknown_id_leaves_scene_untouched() {
    let mut registry = registry();
    let mut scene = ViewerScene::headless(800, 600);
    scene.attach(registry.build("pump").unwrap());

    assert!(registry.build("iss").is_err());
    assert_eq!(scene.current_assembly().unwrap().id(), "pump");
}

// ==================== Animation Tests ====================

#[test]
fn test_explode_then_assemble_converges() {
    let mut registry = registry();
    let mut scene = ViewerScene::headless(800, 600);
    scene.attach(registry.build("cmg").unwrap());
    let k = scene.animator().explosion_scale();

    for _ in 0..SETTLE_TICKS {
        scene.tick(&exploded(false));
    }
    let assembly = scene.current_assembly().unwrap();
    for part in assembly.parts() {
        match part.rest_offset() {
            Some(offset) if !part.is_static() => {
                assert!(part.displacement().distance(offset * k) < EPSILON, "part {}", part.id);
            }
            _ => assert_eq!(part.displacement().length(), 0.0),
        }
    }

    let assembled = ViewState {
        mode: ExplodeMode::Assembled,
        rotate_enabled: false,
    };
    for _ in 0..SETTLE_TICKS {
        scene.tick(&assembled);
    }
    assert!(scene.current_assembly().unwrap().is_assembled(EPSILON));
}

#[test]
fn test_rotation_toggle_keeps_yaw() {
    let mut registry = registry();
    let mut scene = ViewerScene::headless(800, 600);
    scene.attach(registry.build("ogs").unwrap());

    for _ in 0..40 {
        scene.tick(&exploded(true));
    }
    let yaw = scene.current_assembly().unwrap().yaw();
    assert!(yaw > 0.0);

    for _ in 0..40 {
        scene.tick(&exploded(false));
    }
    assert_eq!(scene.current_assembly().unwrap().yaw(), yaw);

    scene.tick(&exploded(true));
    let resumed = scene.current_assembly().unwrap().yaw();
    assert!((resumed - (yaw + scene.rotation().yaw_step())).abs() < 1e-5);
}

#[test]
fn test_swap_mid_explosion_starts_assembled() {
    let mut registry = registry();
    let mut scene = ViewerScene::headless(800, 600);
    scene.attach(registry.build("sarj").unwrap());
    for _ in 0..30 {
        scene.tick(&exploded(true));
    }
    assert!(!scene.current_assembly().unwrap().is_assembled(EPSILON));

    scene.attach(registry.build("pump").unwrap());
    let fresh = scene.current_assembly().unwrap();
    assert!(fresh.is_assembled(0.0));
    assert_eq!(fresh.yaw(), 0.0);

    // the first tick eases from zero, it does not jump
    scene.tick(&exploded(true));
    let animator = *scene.animator();
    let fresh = scene.current_assembly().unwrap();
    for part in fresh.moving_parts() {
        let target = animator.target_for(part, ExplodeMode::Exploded).unwrap();
        assert!(part.displacement().distance(target * animator.smoothing()) < 1e-5);
    }
}

// ==================== Texture Tests ====================

#[test]
fn test_seeded_textures_are_reproducible() {
    let mut first = AssemblyRegistry::with_builtin_models(Box::new(ProceduralTextures::seeded(7)));
    let mut second = AssemblyRegistry::with_builtin_models(Box::new(ProceduralTextures::seeded(7)));
    let a = first.build("wpa").unwrap();
    let b = second.build("wpa").unwrap();

    let pixels = |assembly: &explode3d_core::Assembly| {
        assembly.parts()[1].meshes[0]
            .material
            .surface
            .as_ref()
            .map(|s| s.pixels.as_bytes().to_vec())
    };
    assert!(pixels(&a).is_some());
    assert_eq!(pixels(&a), pixels(&b));
}
