//! Core types for the explode3d viewer
//!
//! This crate holds everything that runs without a GPU:
//! - [`Part`] and [`Assembly`]: typed part records with explosion offsets
//! - [`AssemblyRegistry`]: id to builder mapping with the built-in models
//! - [`ExplodeAnimator`] and [`RotationDriver`]: per-tick pure step functions
//! - [`ViewerScene`]: the single attached assembly plus camera and lights
//! - [`Catalog`]: descriptive assembly data loaded from RON

mod transform;
pub mod geometry;
pub mod material;
pub mod texture;
pub mod part;
pub mod assembly;
pub mod registry;
pub mod models;
pub mod catalog;
pub mod animation;
pub mod camera;
pub mod viewer_scene;

pub use transform::Transform3D;
pub use geometry::{Geometry, MeshData, Primitive};
pub use material::{Color, Material, SurfaceTexture};
pub use texture::{FlatTextures, PixelBuffer, ProceduralTextures, SurfaceDetail, TextureProvider};
pub use part::{Part, PartMesh, PartMotion};
pub use assembly::{Assembly, DirtyFlags};
pub use registry::{AssemblyBuilder, AssemblyRegistry, AssemblySource, BuildFn, RegistryError};
pub use catalog::{AssemblyInfo, Catalog, CatalogError, ComponentInfo};
pub use animation::{AnimationSettings, ExplodeAnimator, ExplodeMode, RotationDriver, ViewState};
pub use camera::{Camera, CameraSettings, DirectionalLight, LightRig};
pub use viewer_scene::ViewerScene;

// Re-export math types for convenience
pub use glam::{Mat4, Quat, Vec3};
