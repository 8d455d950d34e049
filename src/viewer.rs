//! The viewer context
//!
//! [`Viewer`] owns everything one viewer surface needs: the assembly source,
//! the scene (once initialized), the explode/rotate view state and the
//! exporter. Every public operation goes through it; there is no global
//! state, so independent viewers can coexist.
//!
//! Failures are absorbed: each operation logs its error where it happens
//! and leaves the scene consistent. The returned `Result` is informational.

use std::path::PathBuf;

use explode3d_core::{
    AnimationSettings, AssemblyRegistry, AssemblySource, Camera, CameraSettings, ExplodeMode,
    LightRig, ViewState, ViewerScene,
};
use explode3d_export::{asset_file_name, AssetEncoder, AssetExporter, ExportError};

use crate::config::AppConfig;
use crate::error::ViewerError;
use crate::systems::AssetSink;

/// Log an error at its level and hand it back
fn absorb(err: ViewerError) -> ViewerError {
    log::log!(err.log_level(), "{}", err);
    err
}

/// One viewer surface and its state
pub struct Viewer<S: AssemblySource = AssemblyRegistry, E: AssetEncoder = AssetExporter> {
    source: S,
    scene: Option<ViewerScene>,
    view: ViewState,
    camera: CameraSettings,
    lights: LightRig,
    animation: AnimationSettings,
    exporter: E,
}

impl Viewer<AssemblyRegistry> {
    /// Viewer over the built-in assemblies, configured from `config`
    pub fn from_config(config: &AppConfig) -> Self {
        Viewer::new(AssemblyRegistry::builtin(config.textures.seed))
            .with_camera(config.camera.to_settings())
            .with_lights(config.rendering.light_rig())
            .with_animation(config.animation.to_settings())
            .with_view_state(ViewState::new(config.viewer.exploded, config.viewer.rotating))
    }
}

impl<S: AssemblySource> Viewer<S> {
    /// Uninitialized viewer with default camera, lights and animation
    pub fn new(source: S) -> Self {
        Self {
            source,
            scene: None,
            view: ViewState::default(),
            camera: CameraSettings::default(),
            lights: LightRig::default(),
            animation: AnimationSettings::default(),
            exporter: AssetExporter::new(),
        }
    }
}

impl<S: AssemblySource, E: AssetEncoder> Viewer<S, E> {
    /// Builder: encode exports with `exporter` instead of the GLB writer
    pub fn with_exporter<F: AssetEncoder>(self, exporter: F) -> Viewer<S, F> {
        Viewer {
            source: self.source,
            scene: self.scene,
            view: self.view,
            camera: self.camera,
            lights: self.lights,
            animation: self.animation,
            exporter,
        }
    }

    /// Builder: camera used when the scene is created
    pub fn with_camera(mut self, camera: CameraSettings) -> Self {
        self.camera = camera;
        self
    }

    /// Builder: light rig used when the scene is created
    pub fn with_lights(mut self, lights: LightRig) -> Self {
        self.lights = lights;
        self
    }

    /// Builder: animation tunables used when the scene is created
    pub fn with_animation(mut self, animation: AnimationSettings) -> Self {
        self.animation = animation;
        self
    }

    /// Builder: initial explode/rotate state
    pub fn with_view_state(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    /// Create the scene for a `width` x `height` surface
    ///
    /// Returns false, and changes nothing, if already initialized.
    pub fn init(&mut self, width: u32, height: u32) -> bool {
        if self.scene.is_some() {
            log::debug!("Viewer already initialized, ignoring init");
            return false;
        }
        let camera = Camera::new(self.camera, width, height);
        self.scene = Some(ViewerScene::with_animation(camera, self.lights.clone(), &self.animation));
        log::info!("Viewer initialized ({}x{})", width, height);
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.scene.is_some()
    }

    /// Build `id` and attach it, replacing the current assembly
    ///
    /// The explode and rotate flags are applied even when `id` is unknown;
    /// the attached assembly is then left untouched.
    pub fn load_assembly(
        &mut self,
        id: &str,
        exploded: bool,
        rotating: bool,
        reset_camera: bool,
    ) -> Result<(), ViewerError> {
        let Some(scene) = self.scene.as_mut() else {
            return Err(absorb(ViewerError::NotInitialized));
        };

        self.view = ViewState::new(exploded, rotating);

        let assembly = self.source.build(id).map_err(|e| absorb(e.into()))?;
        scene.attach(assembly);
        if reset_camera {
            scene.reset_camera();
        }
        Ok(())
    }

    /// Select assembled or exploded view; parts ease there on later ticks
    pub fn set_explode_state(&mut self, exploded: bool) {
        self.view.mode = ExplodeMode::from_flag(exploded);
        log::debug!("Explode state: {:?}", self.view.mode);
    }

    /// Start or stop auto-rotation; the accumulated angle is kept
    pub fn set_rotate_state(&mut self, rotating: bool) {
        self.view.rotate_enabled = rotating;
        log::debug!("Auto-rotate: {}", rotating);
    }

    /// Restore the default viewpoint
    pub fn reset_camera(&mut self) -> Result<(), ViewerError> {
        let scene = self.scene.as_mut().ok_or_else(|| absorb(ViewerError::NotInitialized))?;
        scene.reset_camera();
        Ok(())
    }

    /// Resize the surface; returns whether the projection changed
    pub fn resize(&mut self, width: u32, height: u32) -> Result<bool, ViewerError> {
        let scene = self.scene.as_mut().ok_or_else(|| absorb(ViewerError::NotInitialized))?;
        Ok(scene.resize(width, height))
    }

    /// Run one animation tick; returns whether anything moved
    pub fn tick(&mut self) -> Result<bool, ViewerError> {
        let view = self.view;
        let scene = self.scene.as_mut().ok_or_else(|| absorb(ViewerError::NotInitialized))?;
        Ok(scene.tick(&view))
    }

    /// Export the attached assembly in its assembled pose
    ///
    /// The asset is stored as `<name>_3d_model.glb`. The sink is only
    /// called once the whole asset has been produced.
    pub fn export_asset<K: AssetSink + ?Sized>(
        &self,
        name: &str,
        sink: &mut K,
    ) -> Result<PathBuf, ViewerError> {
        let bytes = self
            .scene
            .as_ref()
            .and_then(ViewerScene::current_assembly)
            .ok_or(ExportError::NoAssembly)
            .and_then(|assembly| self.exporter.encode(assembly))
            .map_err(|e| absorb(e.into()))?;
        let file_name = asset_file_name(name);
        sink.store(&file_name, &bytes).map_err(|e| absorb(e.into()))
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn scene(&self) -> Option<&ViewerScene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut ViewerScene> {
        self.scene.as_mut()
    }

    /// Id of the attached assembly
    pub fn current_id(&self) -> Option<&str> {
        self.scene
            .as_ref()
            .and_then(ViewerScene::current_assembly)
            .map(|a| a.id())
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
