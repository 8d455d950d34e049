//! Integration tests reading exported assets back with a standard glTF reader
//!
//! 1. Every built-in assembly exports to a GLB the reader accepts
//! 2. Part nodes sit at their assembled placement even mid-explosion
//! 3. Mesh buffers round-trip with positions, normals and indices intact

use explode3d_core::{
    AssemblyRegistry, AssemblySource, ExplodeMode, FlatTextures, ViewState, ViewerScene,
};
use explode3d_export::AssetExporter;

fn registry() -> AssemblyRegistry {
    AssemblyRegistry::with_builtin_models(Box::new(FlatTextures))
}

fn approx_eq(a: [f32; 3], b: [f32; 3]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
}

#[test]
fn test_every_builtin_exports_valid_glb() {
    let mut registry = registry();
    let ids: Vec<String> = registry.ids().map(str::to_string).collect();
    for id in ids {
        let assembly = registry.build(&id).unwrap();
        let bytes = AssetExporter::new().export_assembly(&assembly).unwrap();
        let (doc, buffers, _images) = gltf::import_slice(&bytes).unwrap_or_else(|e| panic!("{}: {}", id, e));

        let scene = doc.default_scene().expect("default scene");
        let roots: Vec<_> = scene.nodes().collect();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].name(), Some(id.as_str()));
        assert_eq!(roots[0].children().count(), assembly.part_count());
        assert_eq!(buffers.len(), 1);
    }
}

#[test]
fn test_export_mid_explosion_is_assembled() {
    let mut registry = registry();
    let mut scene = ViewerScene::headless(800, 600);
    scene.attach(registry.build("wpa").unwrap());
    let view = ViewState {
        mode: ExplodeMode::Exploded,
        rotate_enabled: true,
    };
    for _ in 0..25 {
        scene.tick(&view);
    }
    let live = scene.current_assembly().unwrap();
    assert!(!live.is_assembled(1e-3));

    let bytes = AssetExporter::new().export(Some(live)).unwrap();
    let (doc, _buffers, _images) = gltf::import_slice(&bytes).unwrap();
    let root = doc.default_scene().unwrap().nodes().next().unwrap();
    let (root_translation, root_rotation, _) = root.transform().decomposed();
    assert_eq!(root_translation, [0.0, 0.0, 0.0]);
    assert_eq!(root_rotation, [0.0, 0.0, 0.0, 1.0]);

    for (part, node) in live.parts().iter().zip(root.children()) {
        let (translation, _, _) = node.transform().decomposed();
        assert!(
            approx_eq(translation, part.placement.position.to_array()),
            "part {} exported at {:?}",
            part.id,
            translation
        );
    }
}

#[test]
fn test_mesh_buffers_round_trip() {
    let mut registry = registry();
    let assembly = registry.build("pump").unwrap();
    let bytes = AssetExporter::new().export_assembly(&assembly).unwrap();
    let (doc, buffers, _images) = gltf::import_slice(&bytes).unwrap();

    let housing = &assembly.parts()[0].meshes[0].geometry;
    let mesh = doc.meshes().next().unwrap();
    let primitive = mesh.primitives().next().unwrap();
    assert_eq!(primitive.mode(), gltf::mesh::Mode::Triangles);

    let reader = primitive.reader(|buffer| Some(&*buffers[buffer.index()]));
    let positions: Vec<[f32; 3]> = reader.read_positions().unwrap().collect();
    let normals: Vec<[f32; 3]> = reader.read_normals().unwrap().collect();
    let indices: Vec<u32> = reader.read_indices().unwrap().into_u32().collect();
    assert_eq!(positions, housing.mesh().positions);
    assert_eq!(normals.len(), positions.len());
    assert_eq!(indices, housing.mesh().indices);

    let material = primitive.material();
    let pbr = material.pbr_metallic_roughness();
    assert!((pbr.metallic_factor() - 0.85).abs() < 1e-6);
    assert!((pbr.roughness_factor() - 0.25).abs() < 1e-6);
}

#[test]
fn test_transparent_materials_blend() {
    let mut registry = registry();
    let assembly = registry.build("ogs").unwrap();
    let bytes = AssetExporter::new().export_assembly(&assembly).unwrap();
    let (doc, _buffers, _images) = gltf::import_slice(&bytes).unwrap();
    let frame = doc.materials().next().unwrap();
    assert_eq!(frame.alpha_mode(), gltf::material::AlphaMode::Blend);
    assert!((frame.pbr_metallic_roughness().base_color_factor()[3] - 0.1).abs() < 1e-6);
}
