//! Rendering pipeline components
//!
//! A single mesh pipeline draws the floor grid and the flattened assembly.

pub mod types;
pub mod mesh_pipeline;

pub use types::{RenderUniforms, Vertex3D};
pub use mesh_pipeline::{GpuLines, GpuMesh, MeshPipeline};
