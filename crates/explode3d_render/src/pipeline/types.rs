//! GPU-compatible data types for the mesh pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};

/// A world-space vertex with its material baked in
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex3D {
    /// Position in world space
    pub position: [f32; 3],
    /// Surface normal for lighting
    pub normal: [f32; 3],
    /// Linear RGBA base color
    pub color: [f32; 4],
    /// Linear emitted radiance
    pub emissive: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// Padding to 64 bytes
    pub _padding: [f32; 3],
}

impl Default for Vertex3D {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            normal: [0.0, 1.0, 0.0],
            color: [1.0; 4],
            emissive: [0.0; 3],
            metalness: 0.0,
            roughness: 1.0,
            _padding: [0.0; 3],
        }
    }
}

/// Render uniforms for the mesh pass
/// Layout: 144 bytes total (must match mesh.wgsl Uniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct RenderUniforms {
    /// Projection * view (64 bytes)
    pub view_projection: [[f32; 4]; 4],
    /// Eye position (xyz) and exposure (w)
    pub camera: [f32; 4],
    /// Hemisphere sky color (xyz) and intensity (w)
    pub sky: [f32; 4],
    /// Hemisphere ground color (xyz) and ambient intensity (w)
    pub ground: [f32; 4],
    /// Key light direction toward the light (xyz) and intensity (w)
    pub key_light: [f32; 4],
    /// Fill light direction toward the light (xyz) and intensity (w)
    pub fill_light: [f32; 4],
}

impl Default for RenderUniforms {
    fn default() -> Self {
        Self {
            view_projection: glam::Mat4::IDENTITY.to_cols_array_2d(),
            camera: [6.0, 4.0, 9.0, 1.0],
            sky: [1.0, 1.0, 1.0, 1.0],
            ground: [0.5, 0.5, 0.5, 0.5],
            key_light: [0.0, 1.0, 0.0, 1.0],
            fill_light: [0.0, -1.0, 0.0, 0.0],
        }
    }
}
