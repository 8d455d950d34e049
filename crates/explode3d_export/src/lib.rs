//! Asset export for explode3d
//!
//! Writes an assembly, always in its assembled pose, as a binary glTF 2.0
//! (GLB) container that standard 3D tools can open. The document is built
//! with `gltf_json` and framed by `gltf::binary`.

pub mod glb;
mod error;
mod exporter;

pub use error::ExportError;
pub use exporter::{asset_file_name, AssetEncoder, AssetExporter};
pub use gltf_json as json;
