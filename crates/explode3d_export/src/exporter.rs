//! Assembly to GLB
//!
//! The exporter never reads the live animation state. It takes an assembled
//! snapshot of the assembly and writes that: a root node named after the
//! assembly, one node per part at its placement, and one child node per mesh.
//! Geometry and materials shared through `Arc` are written once.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use explode3d_core::{Assembly, Geometry, Material, Part, Transform3D, Vec3};
use gltf_json as json;
use json::validation::Checked::Valid;
use json::validation::USize64;

use crate::error::ExportError;
use crate::glb;

const GENERATOR: &str = concat!("explode3d ", env!("CARGO_PKG_VERSION"));

/// File name for an exported asset, `<name>_3d_model.glb`
pub fn asset_file_name(name: &str) -> String {
    format!("{}_3d_model.glb", name)
}

/// Turns an assembly into the bytes of one asset file
pub trait AssetEncoder {
    fn encode(&self, assembly: &Assembly) -> Result<Vec<u8>, ExportError>;
}

fn push<T>(items: &mut Vec<T>, item: T) -> json::Index<T> {
    items.push(item);
    json::Index::new(items.len() as u32 - 1)
}

/// Accessors of one written geometry
#[derive(Clone, Copy)]
struct GeometryAccessors {
    position: json::Index<json::Accessor>,
    normal: json::Index<json::Accessor>,
    indices: json::Index<json::Accessor>,
}

/// Serializes assemblies as binary glTF
#[derive(Clone, Debug, Default)]
pub struct AssetExporter {
    generator: Option<String>,
}

impl AssetExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: override the `asset.generator` string
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    /// Export the attached assembly, if any
    pub fn export(&self, assembly: Option<&Assembly>) -> Result<Vec<u8>, ExportError> {
        let assembly = assembly.ok_or(ExportError::NoAssembly)?;
        self.export_assembly(assembly)
    }

    /// Export an assembly in its assembled pose
    pub fn export_assembly(&self, assembly: &Assembly) -> Result<Vec<u8>, ExportError> {
        let snapshot = assembly.assembled_snapshot();
        let mut writer = DocumentWriter::default();
        writer.root.asset.generator = Some(self.generator.clone().unwrap_or_else(|| GENERATOR.to_string()));
        writer.write_assembly(&snapshot);

        let (root, bin) = writer.finish();
        let bytes = glb::to_glb(&root, bin)?;
        log::info!(
            "Exported '{}': {} nodes, {} meshes, {} bytes",
            snapshot.id(),
            root.nodes.len(),
            root.meshes.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

impl AssetEncoder for AssetExporter {
    fn encode(&self, assembly: &Assembly) -> Result<Vec<u8>, ExportError> {
        self.export_assembly(assembly)
    }
}

#[derive(Default)]
struct DocumentWriter {
    root: json::Root,
    bin: Vec<u8>,
    geometries: HashMap<*const Geometry, GeometryAccessors>,
    materials: HashMap<*const Material, json::Index<json::Material>>,
    meshes: HashMap<(*const Geometry, *const Material), json::Index<json::Mesh>>,
}

impl DocumentWriter {
    fn write_assembly(&mut self, assembly: &Assembly) {
        let root = push(
            &mut self.root.nodes,
            json::Node {
                name: Some(assembly.id().to_string()),
                ..Default::default()
            },
        );
        let children = assembly.parts().iter().map(|part| self.write_part(part)).collect();
        self.root.nodes[root.value()].children = Some(children);
        let scene = push(
            &mut self.root.scenes,
            json::Scene {
                extensions: Default::default(),
                extras: Default::default(),
                name: Some(assembly.id().to_string()),
                nodes: vec![root],
            },
        );
        self.root.scene = Some(scene);
    }

    fn write_part(&mut self, part: &Part) -> json::Index<json::Node> {
        let children: Vec<_> = part
            .meshes
            .iter()
            .map(|mesh| {
                let mut child = json::Node {
                    mesh: Some(self.mesh_index(&mesh.geometry, &mesh.material)),
                    ..Default::default()
                };
                apply_transform(&mut child, &mesh.local);
                push(&mut self.root.nodes, child)
            })
            .collect();
        let mut node = json::Node {
            name: Some(part.display_name.clone().unwrap_or_else(|| format!("part_{}", part.id))),
            children: (!children.is_empty()).then_some(children),
            ..Default::default()
        };
        apply_transform(&mut node, &part.live_transform());
        push(&mut self.root.nodes, node)
    }

    fn mesh_index(&mut self, geometry: &Arc<Geometry>, material: &Arc<Material>) -> json::Index<json::Mesh> {
        let key = (Arc::as_ptr(geometry), Arc::as_ptr(material));
        if let Some(&index) = self.meshes.get(&key) {
            return index;
        }
        let accessors = self.geometry_accessors(geometry);
        let material = self.material_index(material);
        let primitive = json::mesh::Primitive {
            attributes: BTreeMap::from([
                (Valid(json::mesh::Semantic::Positions), accessors.position),
                (Valid(json::mesh::Semantic::Normals), accessors.normal),
            ]),
            extensions: Default::default(),
            extras: Default::default(),
            indices: Some(accessors.indices),
            material: Some(material),
            mode: Valid(json::mesh::Mode::Triangles),
            targets: None,
        };
        let index = push(
            &mut self.root.meshes,
            json::Mesh {
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                primitives: vec![primitive],
                weights: None,
            },
        );
        self.meshes.insert(key, index);
        index
    }

    fn geometry_accessors(&mut self, geometry: &Arc<Geometry>) -> GeometryAccessors {
        let key = Arc::as_ptr(geometry);
        if let Some(&accessors) = self.geometries.get(&key) {
            return accessors;
        }
        let mesh = geometry.mesh();
        let (min, max) = mesh.bounds();

        let view = self.push_view(bytemuck::cast_slice(&mesh.positions), json::buffer::Target::ArrayBuffer);
        let position = self.push_accessor(view, mesh.vertex_count(), json::accessor::ComponentType::F32, json::accessor::Type::Vec3, Some((min, max)));
        let view = self.push_view(bytemuck::cast_slice(&mesh.normals), json::buffer::Target::ArrayBuffer);
        let normal = self.push_accessor(view, mesh.normals.len(), json::accessor::ComponentType::F32, json::accessor::Type::Vec3, None);
        let view = self.push_view(bytemuck::cast_slice(&mesh.indices), json::buffer::Target::ElementArrayBuffer);
        let indices = self.push_accessor(view, mesh.indices.len(), json::accessor::ComponentType::U32, json::accessor::Type::Scalar, None);

        let accessors = GeometryAccessors { position, normal, indices };
        self.geometries.insert(key, accessors);
        accessors
    }

    fn material_index(&mut self, material: &Arc<Material>) -> json::Index<json::Material> {
        let key = Arc::as_ptr(material);
        if let Some(&index) = self.materials.get(&key) {
            return index;
        }
        let index = push(&mut self.root.materials, material_json(material));
        self.materials.insert(key, index);
        index
    }

    fn push_view(&mut self, bytes: &[u8], target: json::buffer::Target) -> json::Index<json::buffer::View> {
        // every element type is 4 bytes wide, offsets stay aligned
        let byte_offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        push(
            &mut self.root.buffer_views,
            json::buffer::View {
                buffer: json::Index::new(0),
                byte_length: USize64::from(bytes.len()),
                byte_offset: Some(USize64::from(byte_offset)),
                byte_stride: None,
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                target: Some(Valid(target)),
            },
        )
    }

    fn push_accessor(
        &mut self,
        view: json::Index<json::buffer::View>,
        count: usize,
        component: json::accessor::ComponentType,
        kind: json::accessor::Type,
        bounds: Option<(Vec3, Vec3)>,
    ) -> json::Index<json::Accessor> {
        let (min, max) = match bounds {
            Some((min, max)) => (
                Some(json::Value::from(min.to_array().to_vec())),
                Some(json::Value::from(max.to_array().to_vec())),
            ),
            None => (None, None),
        };
        push(
            &mut self.root.accessors,
            json::Accessor {
                buffer_view: Some(view),
                byte_offset: None,
                count: USize64::from(count),
                component_type: Valid(json::accessor::GenericComponentType(component)),
                extensions: Default::default(),
                extras: Default::default(),
                type_: Valid(kind),
                min,
                max,
                name: None,
                normalized: false,
                sparse: None,
            },
        )
    }

    fn finish(mut self) -> (json::Root, Vec<u8>) {
        if !self.bin.is_empty() {
            self.root.buffers.push(json::Buffer {
                byte_length: USize64::from(self.bin.len()),
                extensions: Default::default(),
                extras: Default::default(),
                name: None,
                uri: None,
            });
        }
        (self.root, self.bin)
    }
}

fn apply_transform(node: &mut json::Node, transform: &Transform3D) {
    if transform.position != Vec3::ZERO {
        node.translation = Some(transform.position.to_array());
    }
    if !transform.rotation.is_near_identity() {
        node.rotation = Some(json::scene::UnitQuaternion(transform.rotation.normalize().to_array()));
    }
    if transform.scale != Vec3::ONE {
        node.scale = Some(transform.scale.to_array());
    }
}

fn material_json(material: &Material) -> json::Material {
    let [r, g, b] = material.base_color.to_linear();
    let emissive = material.emission().map(|c| c.clamp(0.0, 1.0));
    let alpha_mode = if material.transparent {
        json::material::AlphaMode::Blend
    } else {
        json::material::AlphaMode::Opaque
    };
    json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor([r, g, b, material.alpha()]),
            metallic_factor: json::material::StrengthFactor(material.metalness),
            roughness_factor: json::material::StrengthFactor(material.roughness),
            ..Default::default()
        },
        emissive_factor: json::material::EmissiveFactor(emissive),
        alpha_mode: Valid(alpha_mode),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembly() -> Assembly {
        let geometry = Arc::new(Geometry::cuboid(1.0, 2.0, 3.0));
        let opaque = Arc::new(Material::new(0x4A5568).with_pbr(0.9, 0.2));
        let glass = Arc::new(Material::new(0x90CDF4).with_opacity(0.8).with_emissive(0xffffff, 4.0));
        Assembly::new(
            "sample",
            vec![
                Part::new(geometry.clone(), opaque.clone()).with_name("frame"),
                Part::new(geometry.clone(), opaque).at(Vec3::X).exploding(Vec3::new(0.0, 2.0, 0.0)),
                Part::new(geometry, glass).at(Vec3::Z).exploding(Vec3::new(0.0, 0.0, 1.0)),
            ],
        )
    }

    fn document_json(bytes: &[u8]) -> serde_json::Value {
        let glb = gltf::binary::Glb::from_slice(bytes).unwrap();
        serde_json::from_slice(&glb.json).unwrap()
    }

    #[test]
    fn test_no_assembly() {
        let err = AssetExporter::new().export(None).unwrap_err();
        assert!(matches!(err, ExportError::NoAssembly));
    }

    #[test]
    fn test_shared_geometry_written_once() {
        let json = document_json(&AssetExporter::new().export_assembly(&assembly()).unwrap());
        // one geometry -> three accessors, two materials -> two meshes
        assert_eq!(json["accessors"].as_array().unwrap().len(), 3);
        assert_eq!(json["materials"].as_array().unwrap().len(), 2);
        assert_eq!(json["meshes"].as_array().unwrap().len(), 2);
        // root + 3 parts + 3 mesh nodes
        assert_eq!(json["nodes"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_material_mapping() {
        let json = document_json(&AssetExporter::new().export_assembly(&assembly()).unwrap());
        let glass = &json["materials"][1];
        assert_eq!(glass["alphaMode"], "BLEND");
        assert_eq!(glass["emissiveFactor"][0], 1.0);
        let alpha = glass["pbrMetallicRoughness"]["baseColorFactor"][3].as_f64().unwrap();
        assert!((alpha - 0.8).abs() < 1e-6);
        assert_ne!(json["materials"][0]["alphaMode"], "BLEND");
    }

    #[test]
    fn test_export_ignores_displacement() {
        let mut live = assembly();
        live.apply_displacements(&[Vec3::ZERO, Vec3::new(0.0, 1.4, 0.0), Vec3::new(0.0, 0.0, 0.7)]);
        live.set_yaw(0.8);

        let exporter = AssetExporter::new();
        let moved = exporter.export_assembly(&live).unwrap();
        let assembled = exporter.export_assembly(&assembly()).unwrap();
        assert_eq!(moved, assembled);
        // the live assembly is not touched
        assert_eq!(live.yaw(), 0.8);
        assert!(!live.is_assembled(1e-3));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(asset_file_name("sarj"), "sarj_3d_model.glb");
    }

    #[test]
    fn test_generator() {
        let bytes = AssetExporter::new().with_generator("test").export_assembly(&assembly()).unwrap();
        assert_eq!(document_json(&bytes)["asset"]["generator"], "test");

        let bytes = AssetExporter::new().export_assembly(&assembly()).unwrap();
        let json = document_json(&bytes);
        assert!(json["asset"]["generator"].as_str().unwrap().starts_with("explode3d "));
        assert_eq!(json["asset"]["version"], "2.0");
    }

    #[test]
    fn test_encoder_matches_export() {
        let exporter = AssetExporter::new();
        let encoder: &dyn AssetEncoder = &exporter;
        assert_eq!(encoder.encode(&assembly()).unwrap(), exporter.export_assembly(&assembly()).unwrap());
    }

    #[test]
    fn test_node_transforms() {
        let json = document_json(&AssetExporter::new().export_assembly(&assembly()).unwrap());
        let nodes = json["nodes"].as_array().unwrap();
        let frame = nodes.iter().find(|n| n["name"] == "frame").unwrap();
        // identity placement leaves the TRS fields out
        assert!(frame.get("translation").is_none());
        assert!(frame.get("rotation").is_none());
        let moved = nodes.iter().find(|n| n["name"] == "part_1").unwrap();
        assert_eq!(moved["translation"], serde_json::json!([1.0, 0.0, 0.0]));
    }
}
