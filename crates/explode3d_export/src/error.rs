//! Export error types

use std::fmt;

/// Error producing an asset
#[derive(Debug)]
pub enum ExportError {
    /// Export requested with no assembly attached
    NoAssembly,
    /// The glTF document could not be serialized
    Serialization(serde_json::Error),
    /// The GLB container could not be written
    Container(gltf::Error),
    /// The container would exceed the 4 GiB GLB limit
    BufferTooLarge(usize),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NoAssembly => write!(f, "No assembly to export"),
            ExportError::Serialization(e) => write!(f, "Serialization error: {}", e),
            ExportError::Container(e) => write!(f, "GLB error: {}", e),
            ExportError::BufferTooLarge(len) => write!(f, "Asset too large for GLB: {} bytes", len),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Serialization(e) => Some(e),
            ExportError::Container(e) => Some(e),
            ExportError::NoAssembly | ExportError::BufferTooLarge(_) => None,
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialization(e)
    }
}

impl From<gltf::Error> for ExportError {
    fn from(e: gltf::Error) -> Self {
        ExportError::Container(e)
    }
}
