//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Mesh pipeline and floor grid
//! - Keeping GPU buffers in sync with the attached assembly

use std::sync::Arc;
use winit::window::Window;
use explode3d_core::{DirtyFlags, ViewerScene};
use explode3d_render::{
    context::{ContextError, RenderContext},
    pipeline::{GpuLines, GpuMesh, MeshPipeline},
    clear_color, scene_uniforms, GridLines, RenderableAssembly,
};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: MeshPipeline,
    grid: Option<GpuLines>,
    /// CPU copy of the attached assembly's vertices
    renderable: Option<RenderableAssembly>,
    mesh: Option<GpuMesh>,
    /// Scene generation the buffers were built for
    generation: Option<u64>,
}

impl RenderSystem {
    /// Create render system from window and config
    pub fn new(window: Arc<Window>, vsync: bool, show_grid: bool) -> Result<Self, ContextError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let mut pipeline = MeshPipeline::new(&context.device, context.config.format);
        pipeline.ensure_depth_texture(
            &context.device,
            context.size.width,
            context.size.height,
        );

        let grid = show_grid.then(|| GpuLines::new(&context.device, &GridLines::default().vertices()));

        Ok(Self {
            context,
            pipeline,
            grid,
            renderable: None,
            mesh: None,
            generation: None,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.ensure_depth_texture(&self.context.device, width, height);
    }

    /// Bring GPU buffers up to date with the scene
    ///
    /// A new attachment (or a topology change) rebuilds both buffers; moved
    /// parts only rewrite vertices.
    fn sync_geometry(&mut self, scene: &mut ViewerScene) {
        let generation = scene.generation();
        let Some(assembly) = scene.current_assembly_mut() else {
            self.renderable = None;
            self.mesh = None;
            self.generation = Some(generation);
            return;
        };

        let rebuild = self.generation != Some(generation)
            || assembly.dirty().contains(DirtyFlags::TOPOLOGY)
            || self.renderable.is_none();

        if rebuild {
            let renderable = RenderableAssembly::from_assembly(assembly);
            self.mesh = Some(GpuMesh::new(
                &self.context.device,
                &renderable.vertices,
                &renderable.indices,
                renderable.opaque_index_count() as u32,
            ));
            log::info!(
                "Uploaded '{}': {} vertices, {} indices",
                assembly.id(),
                renderable.vertex_count(),
                renderable.index_count()
            );
            self.renderable = Some(renderable);
            self.generation = Some(generation);
        } else if assembly.dirty().contains(DirtyFlags::TRANSFORM) {
            if let (Some(renderable), Some(mesh)) = (&mut self.renderable, &self.mesh) {
                if renderable.update_transforms(assembly) {
                    mesh.update_vertices(&self.context.queue, &renderable.vertices);
                }
            }
        }
        assembly.clear_dirty();
    }

    /// Render a single frame
    pub fn render_frame(&mut self, scene: &mut ViewerScene) -> Result<(), RenderError> {
        self.sync_geometry(scene);

        let uniforms = scene_uniforms(scene.camera(), scene.lights());
        self.pipeline.update_uniforms(&self.context.queue, &uniforms);

        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.pipeline.render(
            &mut encoder,
            &view,
            self.mesh.as_ref(),
            self.grid.as_ref(),
            clear_color(scene.lights()),
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}
