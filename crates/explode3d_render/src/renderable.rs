//! Renderable geometry - bridges Assembly to GPU buffers
//!
//! Every mesh of every part is flattened into world space on the CPU:
//! world yaw, then the part's live transform, then the mesh's local
//! transform. Materials are baked per vertex, so a whole assembly draws
//! with one vertex buffer and one index buffer.
//!
//! Surface detail is baked per vertex too. Each vertex takes the box-filtered
//! mean of a window of the detail tile, so speckle and weave read as a tint
//! at mesh resolution rather than as texel-sharp pattern.

use explode3d_core::{Assembly, Camera, Color, LightRig, Material, Part, PartMesh, PixelBuffer, Transform3D, Vec3};

use crate::pipeline::{RenderUniforms, Vertex3D};

/// Fraction of a surface tile averaged into one vertex color
const FOOTPRINT_DIVISOR: u32 = 8;
const FOOTPRINT_SAMPLES: u32 = 8;

/// Vertex range produced by one mesh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MeshSpan {
    part: usize,
    mesh: usize,
    first_vertex: usize,
}

/// GPU-ready geometry for one assembly
pub struct RenderableAssembly {
    /// World-space vertices with materials baked in
    pub vertices: Vec<Vertex3D>,
    /// Triangle indices, opaque triangles first
    pub indices: Vec<u32>,
    opaque_index_count: usize,
    spans: Vec<MeshSpan>,
}

impl RenderableAssembly {
    /// Flatten an assembly in its current pose
    pub fn from_assembly(assembly: &Assembly) -> Self {
        let mut result = Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            opaque_index_count: 0,
            spans: Vec::new(),
        };
        let world = assembly.world_transform();

        // Two passes keep every transparent triangle after the opaque ones
        for transparent in [false, true] {
            for (part_index, part) in assembly.parts().iter().enumerate() {
                let part_transform = part.live_transform();
                for (mesh_index, mesh) in part.meshes.iter().enumerate() {
                    if mesh.material.transparent != transparent {
                        continue;
                    }
                    result.spans.push(MeshSpan {
                        part: part_index,
                        mesh: mesh_index,
                        first_vertex: result.vertices.len(),
                    });
                    result.push_mesh(&world, &part_transform, mesh);
                }
            }
            if !transparent {
                result.opaque_index_count = result.indices.len();
            }
        }

        result
    }

    fn push_mesh(&mut self, world: &Transform3D, part: &Transform3D, mesh: &PartMesh) {
        let data = mesh.geometry.mesh();
        let base = self.vertices.len() as u32;
        let material = &mesh.material;
        let emissive = material.emission();

        for (position, normal) in data.positions.iter().zip(&data.normals) {
            let local = Vec3::from(*position);
            let color = vertex_color(material, local);
            self.vertices.push(Vertex3D {
                position: world_point(world, part, &mesh.local, local).to_array(),
                normal: world_normal(world, part, &mesh.local, Vec3::from(*normal)).to_array(),
                color,
                emissive,
                metalness: material.metalness,
                roughness: material.roughness,
                _padding: [0.0; 3],
            });
        }
        self.indices.extend(data.indices.iter().map(|i| base + i));
    }

    /// Recompute positions and normals after the assembly moved
    ///
    /// The assembly must have the same parts and meshes it was built from;
    /// returns false and changes nothing otherwise.
    pub fn update_transforms(&mut self, assembly: &Assembly) -> bool {
        let parts = assembly.parts();
        let matches = self.spans.iter().all(|span| {
            parts
                .get(span.part)
                .and_then(|p| p.meshes.get(span.mesh))
                .is_some()
        }) && self.spans.len() == assembly.mesh_count();
        if !matches {
            return false;
        }

        let world = assembly.world_transform();
        let mut part_cache: Option<(usize, Transform3D)> = None;
        for span in &self.spans {
            let part: &Part = &parts[span.part];
            let part_transform = match part_cache {
                Some((index, transform)) if index == span.part => transform,
                _ => {
                    let transform = part.live_transform();
                    part_cache = Some((span.part, transform));
                    transform
                }
            };
            let mesh = &part.meshes[span.mesh];
            let data = mesh.geometry.mesh();
            let targets = &mut self.vertices[span.first_vertex..span.first_vertex + data.positions.len()];
            for ((vertex, position), normal) in targets.iter_mut().zip(&data.positions).zip(&data.normals) {
                vertex.position = world_point(&world, &part_transform, &mesh.local, Vec3::from(*position)).to_array();
                vertex.normal = world_normal(&world, &part_transform, &mesh.local, Vec3::from(*normal)).to_array();
            }
        }
        true
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Indices drawn by the opaque pass; the rest are transparent
    #[inline]
    pub fn opaque_index_count(&self) -> usize {
        self.opaque_index_count
    }
}

fn world_point(world: &Transform3D, part: &Transform3D, local: &Transform3D, p: Vec3) -> Vec3 {
    world.transform_point(part.transform_point(local.transform_point(p)))
}

fn world_normal(world: &Transform3D, part: &Transform3D, local: &Transform3D, n: Vec3) -> Vec3 {
    world.transform_normal(part.transform_normal(local.transform_normal(n)))
}

/// Linear RGBA for one vertex, tinted by the material's surface detail
///
/// Surfaces have no texture coordinates, so the tile is projected along
/// the mesh's local axes.
fn vertex_color(material: &Material, local: Vec3) -> [f32; 4] {
    let [r, g, b] = material.base_color.to_linear();
    let tint = match &material.surface {
        Some(surface) => box_filter(&surface.pixels, (local.x + local.z).rem_euclid(1.0), local.y.rem_euclid(1.0)),
        None => [1.0; 3],
    };
    [r * tint[0], g * tint[1], b * tint[2], material.alpha()]
}

/// Mean linear color of the texel window centered on (u, v)
///
/// The window spans `1 / FOOTPRINT_DIVISOR` of the tile on each axis and
/// wraps at the edges. At most `FOOTPRINT_SAMPLES` texels per axis are read.
fn box_filter(pixels: &PixelBuffer, u: f32, v: f32) -> [f32; 3] {
    let (width, height) = (pixels.width(), pixels.height());
    if width == 0 || height == 0 {
        return [1.0; 3];
    }
    let axis = |coord: f32, size: u32| {
        let footprint = (size / FOOTPRINT_DIVISOR).max(1);
        let stride = (footprint / FOOTPRINT_SAMPLES).max(1);
        let center = ((coord * size as f32) as u32).min(size - 1);
        let start = center + size - footprint / 2;
        (0..footprint).step_by(stride as usize).map(move |i| (start + i) % size)
    };

    let mut sum = [0.0f32; 3];
    let mut count = 0u32;
    for y in axis(v, height) {
        for x in axis(u, width) {
            if let Some([tr, tg, tb, _]) = pixels.get(x, y) {
                let texel = Color::new(tr as f32 / 255.0, tg as f32 / 255.0, tb as f32 / 255.0).to_linear();
                for c in 0..3 {
                    sum[c] += texel[c];
                }
                count += 1;
            }
        }
    }
    if count == 0 {
        return [1.0; 3];
    }
    sum.map(|c| c / count as f32)
}

/// Floor grid drawn as a line list
pub struct GridLines {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
    pub height: f32,
}

impl Default for GridLines {
    fn default() -> Self {
        Self {
            size: 10.0,
            divisions: 20,
            center_color: Color::from_hex(0x2d3748),
            line_color: Color::from_hex(0x1a202c),
            height: -0.01,
        }
    }
}

impl GridLines {
    /// Line-list vertices, two per line; the center lines use `center_color`
    pub fn vertices(&self) -> Vec<Vertex3D> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions.max(1) as f32;
        let center = self.divisions / 2;
        let mut vertices = Vec::with_capacity((self.divisions as usize + 1) * 4);

        for i in 0..=self.divisions {
            let offset = -half + i as f32 * step;
            let color = if i == center && self.divisions % 2 == 0 {
                self.center_color
            } else {
                self.line_color
            };
            let line = [
                Vec3::new(-half, self.height, offset),
                Vec3::new(half, self.height, offset),
                Vec3::new(offset, self.height, -half),
                Vec3::new(offset, self.height, half),
            ];
            vertices.extend(line.iter().map(|p| line_vertex(*p, color)));
        }
        vertices
    }
}

fn line_vertex(position: Vec3, color: Color) -> Vertex3D {
    // unlit: black base, line color as emission
    Vertex3D {
        position: position.to_array(),
        normal: [0.0, 1.0, 0.0],
        color: [0.0, 0.0, 0.0, 1.0],
        emissive: color.to_linear(),
        metalness: 0.0,
        roughness: 1.0,
        _padding: [0.0; 3],
    }
}

/// Build the uniform block for a camera and light rig
///
/// The first directional light is the key light, the second the fill;
/// additional lights are ignored.
pub fn scene_uniforms(camera: &Camera, lights: &LightRig) -> RenderUniforms {
    let eye = camera.eye();
    let light_slot = |index: usize| -> [f32; 4] {
        lights
            .directional
            .get(index)
            .map(|l| l.direction().extend(l.intensity * luminance(l.color)).to_array())
            .unwrap_or([0.0, 1.0, 0.0, 0.0])
    };

    RenderUniforms {
        view_projection: camera.view_projection().to_cols_array_2d(),
        camera: eye.extend(lights.exposure).to_array(),
        sky: Vec3::from(lights.sky.to_linear()).extend(lights.hemisphere_intensity).to_array(),
        ground: Vec3::from(lights.ground.to_linear()).extend(lights.ambient).to_array(),
        key_light: light_slot(0),
        fill_light: light_slot(1),
    }
}

fn luminance(color: Color) -> f32 {
    let [r, g, b] = color.to_linear();
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Background color for the render pass clear
pub fn clear_color(lights: &LightRig) -> wgpu::Color {
    let [r, g, b] = lights.background.to_linear();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: 1.0,
    }
}
