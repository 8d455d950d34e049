//! Rendering for the explode3d viewer
//!
//! This crate provides the wgpu-based pipeline that draws an attached
//! assembly with its light rig.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`pipeline::MeshPipeline`] - lit mesh rendering with a transparent pass
//! - [`renderable::RenderableAssembly`] - flattens an Assembly into GPU buffers

pub mod context;
pub mod pipeline;
pub mod renderable;

pub use context::{ContextError, RenderContext};
pub use renderable::{clear_color, scene_uniforms, GridLines, RenderableAssembly};
