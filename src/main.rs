//! explode3d - exploded-view viewer for hardware assemblies
//!
//! Opens a window on the built-in assemblies. Drag to orbit, scroll to zoom,
//! 1-9 or arrows to switch assembly, E explode, T rotate, R reset camera,
//! X export GLB, F fullscreen, Esc quit.

use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use explode3d::config::AppConfig;
use explode3d::input::{InputAction, InputMapper};
use explode3d::systems::{DirectorySink, FrameClock, RenderError, RenderSystem, WindowSystem};
use explode3d::Viewer;
use explode3d_core::Catalog;
use explode3d_input::OrbitController;

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    viewer: Viewer,
    catalog: Catalog,
    /// Position in the catalog of the selected assembly
    selected: usize,
    controller: OrbitController,
    clock: FrameClock,
    sink: DirectorySink,
    window: Option<WindowSystem>,
    renderer: Option<RenderSystem>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let catalog = match &config.viewer.catalog_path {
            Some(path) => Catalog::load(path).unwrap_or_else(|e| {
                log::warn!("Failed to load catalog {}: {}. Using built-in.", path.display(), e);
                Catalog::builtin()
            }),
            None => Catalog::builtin(),
        };

        let viewer = Viewer::from_config(&config);
        for id in catalog.ids() {
            if !explode3d_core::AssemblySource::contains(viewer.source(), id) {
                log::warn!("Catalog entry '{}' has no registered model", id);
            }
        }

        let selected = catalog.position(&config.viewer.initial_assembly).unwrap_or(0);

        let controller = OrbitController::new()
            .with_rotate_speed(config.camera.rotate_speed)
            .with_zoom_speed(config.camera.zoom_speed)
            .with_damping_factor(config.camera.orbit_damping);

        let clock = FrameClock::new(
            config.animation.tick_rate,
            config.animation.max_ticks_per_frame,
        );
        let sink = DirectorySink::new(&config.export.output_dir);

        Self {
            config,
            viewer,
            catalog,
            selected,
            controller,
            clock,
            sink,
            window: None,
            renderer: None,
        }
    }

    fn selected_id(&self) -> String {
        self.catalog
            .iter()
            .nth(self.selected)
            .map(|info| info.id.clone())
            .unwrap_or_else(|| self.config.viewer.initial_assembly.clone())
    }

    /// Load the catalog entry at `index`, keeping the current view flags
    fn select(&mut self, index: usize) {
        if index >= self.catalog.len() {
            log::debug!("No catalog entry {}", index + 1);
            return;
        }
        self.selected = index;
        let id = self.selected_id();
        let view = self.viewer.view_state();
        // errors are logged by the viewer
        let _ = self
            .viewer
            .load_assembly(&id, view.mode.is_exploded(), view.rotate_enabled, false);
        self.update_title();
    }

    fn cycle(&mut self, forward: bool) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        let next = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
        self.select(next);
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            let info = self.viewer.current_id().and_then(|id| self.catalog.get(id));
            window.update_title(info, &self.viewer.view_state());
        }
    }

    fn handle_action(&mut self, action: InputAction, event_loop: &ActiveEventLoop) {
        match action {
            InputAction::SelectAssembly(index) => self.select(index),
            InputAction::NextAssembly => self.cycle(true),
            InputAction::PreviousAssembly => self.cycle(false),
            InputAction::ToggleExplode => {
                let exploded = !self.viewer.view_state().mode.is_exploded();
                self.viewer.set_explode_state(exploded);
                self.update_title();
            }
            InputAction::ToggleRotate => {
                let rotating = !self.viewer.view_state().rotate_enabled;
                self.viewer.set_rotate_state(rotating);
                self.update_title();
            }
            InputAction::ResetCamera => {
                self.controller.reset();
                let _ = self.viewer.reset_camera();
            }
            InputAction::Export => {
                let name = self.viewer.current_id().unwrap_or("model").to_string();
                if let Ok(path) = self.viewer.export_asset(&name, &mut self.sink) {
                    log::info!("Exported {}", path.display());
                }
            }
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::Exit => event_loop.exit(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let ticks = self.clock.advance_to(Instant::now());
        for _ in 0..ticks {
            if self.viewer.tick().is_err() {
                break;
            }
        }

        let (Some(renderer), Some(scene)) = (&mut self.renderer, self.viewer.scene_mut()) else {
            return;
        };
        self.controller.update(scene.camera_mut());

        match renderer.render_frame(scene) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => log::debug!("Surface lost, reconfigured"),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match RenderSystem::new(
            window.window().clone(),
            self.config.window.vsync,
            self.config.rendering.show_grid,
        ) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize GPU: {}", e);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = renderer.size();
        self.viewer.init(width, height);

        let id = self.selected_id();
        let view = self.viewer.view_state();
        let _ = self
            .viewer
            .load_assembly(&id, view.mode.is_exploded(), view.rotate_enabled, false);

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(renderer);
        self.update_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(physical_size.width, physical_size.height);
                }
                let _ = self.viewer.resize(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(action, event_loop);
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.controller.process_mouse_button(button, state);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.controller.process_scroll(delta);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.controller.process_mouse_motion(delta.0, delta.1);
        }
    }
}

fn main() {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting explode3d");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
