//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`E3D_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use explode3d_core::{AnimationSettings, CameraSettings, Color, DirectionalLight, LightRig, Vec3};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Explode/rotate animation configuration
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Surface texture configuration
    #[serde(default)]
    pub textures: TextureConfig,
    /// Startup state of the viewer
    #[serde(default)]
    pub viewer: ViewerConfig,
    /// Asset export configuration
    #[serde(default)]
    pub export: ExportConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`E3D_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // E3D_ANIMATION__EXPLOSION_SCALE=0.5 -> animation.explosion_scale = 0.5
        figment = figment.merge(Env::prefixed("E3D_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title prefix
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "explode3d".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Default eye position [x, y, z]
    pub position: [f32; 3],
    /// Point the camera orbits around
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Fraction of pending orbit motion applied per frame
    pub orbit_damping: f32,
    /// Orbit radians per pixel of drag
    pub rotate_speed: f32,
    /// Log zoom per scroll line
    pub zoom_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [6.0, 4.0, 9.0],
            target: [0.0, 0.0, 0.0],
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            orbit_damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

impl CameraConfig {
    pub fn to_settings(&self) -> CameraSettings {
        CameraSettings {
            position: Vec3::from(self.position),
            target: Vec3::from(self.target),
            fov_y_degrees: self.fov,
            near: self.near,
            far: self.far,
        }
    }
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Fraction of each part's rest offset reached when exploded
    pub explosion_scale: f32,
    /// Easing factor per tick (0-1]
    pub smoothing: f32,
    /// Auto-rotation per tick in radians
    pub yaw_step: f32,
    /// Animation ticks per second
    pub tick_rate: f32,
    /// Upper bound on ticks run for one frame
    pub max_ticks_per_frame: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        let settings = AnimationSettings::default();
        Self {
            explosion_scale: settings.explosion_scale,
            smoothing: settings.smoothing,
            yaw_step: settings.yaw_step,
            tick_rate: 60.0,
            max_ticks_per_frame: 4,
        }
    }
}

impl AnimationConfig {
    pub fn to_settings(&self) -> AnimationSettings {
        AnimationSettings {
            explosion_scale: self.explosion_scale,
            smoothing: self.smoothing,
            yaw_step: self.yaw_step,
        }
    }
}

/// A directional light shining toward the origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightConfig {
    pub position: [f32; 3],
    #[serde(default = "white")]
    pub color: String,
    pub intensity: f32,
}

fn white() -> String {
    "#ffffff".to_string()
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color as `#RRGGBB`
    pub background_color: String,
    /// Tone mapping exposure
    pub exposure: f32,
    /// Ambient light strength
    pub ambient: f32,
    /// Hemisphere light sky color
    pub sky_color: String,
    /// Hemisphere light ground color
    pub ground_color: String,
    pub hemisphere_intensity: f32,
    pub key_light: LightConfig,
    pub fill_light: LightConfig,
    /// Draw the floor grid
    pub show_grid: bool,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: "#0a0a0a".to_string(),
            exposure: 2.8,
            ambient: 0.8,
            sky_color: "#eeeeee".to_string(),
            ground_color: "#aaaaaa".to_string(),
            hemisphere_intensity: 1.5,
            key_light: LightConfig {
                position: [10.0, 15.0, 10.0],
                color: white(),
                intensity: 3.0,
            },
            fill_light: LightConfig {
                position: [-10.0, 5.0, -10.0],
                color: white(),
                intensity: 2.0,
            },
            show_grid: true,
        }
    }
}

impl RenderingConfig {
    /// Build the light rig; unparseable colors fall back to the defaults
    pub fn light_rig(&self) -> LightRig {
        let defaults = LightRig::default();
        let light = |config: &LightConfig| DirectionalLight {
            position: Vec3::from(config.position),
            color: parse_color(&config.color, Color::WHITE),
            intensity: config.intensity,
        };
        LightRig {
            background: parse_color(&self.background_color, defaults.background),
            exposure: self.exposure,
            ambient: self.ambient,
            sky: parse_color(&self.sky_color, defaults.sky),
            ground: parse_color(&self.ground_color, defaults.ground),
            hemisphere_intensity: self.hemisphere_intensity,
            directional: vec![light(&self.key_light), light(&self.fill_light)],
        }
    }
}

fn parse_color(value: &str, fallback: Color) -> Color {
    Color::parse_hex(value).unwrap_or_else(|| {
        log::warn!("Invalid color '{}' in config, using default", value);
        fallback
    })
}

/// Texture configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Seed for procedural surface textures; random when absent
    pub seed: Option<u64>,
}

/// Viewer startup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Assembly loaded at startup
    pub initial_assembly: String,
    /// Start exploded
    pub exploded: bool,
    /// Start with auto-rotation on
    pub rotating: bool,
    /// Alternate catalog file (RON); the built-in catalog when absent
    pub catalog_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_assembly: "sarj".to_string(),
            exploded: false,
            rotating: true,
            catalog_path: None,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported GLB files are written to
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    source: figment::Error,
}

impl From<figment::Error> for ConfigError {
    fn from(source: figment::Error) -> Self {
        ConfigError { source }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.source)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.animation.explosion_scale, 0.7);
        assert_eq!(config.animation.smoothing, 0.1);
        assert_eq!(config.animation.yaw_step, 0.005);
        assert_eq!(config.viewer.initial_assembly, "sarj");
        assert!(!config.viewer.exploded);
        assert!(config.viewer.rotating);
        assert_eq!(config.textures.seed, None);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("explosion_scale"));
        assert!(toml.contains("[rendering.key_light]"));
    }

    #[test]
    fn test_camera_settings_conversion() {
        let settings = CameraConfig::default().to_settings();
        assert_eq!(settings, CameraSettings::default());
    }

    #[test]
    fn test_light_rig_matches_builtin_defaults() {
        let rig = RenderingConfig::default().light_rig();
        let expected = LightRig::default();
        assert_eq!(rig.exposure, expected.exposure);
        assert_eq!(rig.ambient, expected.ambient);
        assert_eq!(rig.hemisphere_intensity, expected.hemisphere_intensity);
        assert_eq!(rig.background, expected.background);
        assert_eq!(rig.directional, expected.directional);
    }

    #[test]
    fn test_invalid_color_falls_back() {
        let config = RenderingConfig {
            background_color: "not a color".to_string(),
            ..RenderingConfig::default()
        };
        assert_eq!(config.light_rig().background, Color::from_hex(0x0a0a0a));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str("[animation]\nexplosion_scale = 0.5\n").unwrap();
        assert_eq!(config.animation.explosion_scale, 0.5);
        assert_eq!(config.animation.smoothing, 0.1);
        assert_eq!(config.window.height, 720);
    }
}
