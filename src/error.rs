//! Errors surfaced by the viewer operations
//!
//! None of these are fatal. The [`Viewer`](crate::viewer::Viewer) logs each
//! one where it is absorbed and leaves the scene in a consistent state.

use std::fmt;
use std::io;

use explode3d_core::RegistryError;
use explode3d_export::ExportError;

#[derive(Debug)]
pub enum ViewerError {
    /// No builder is registered for the requested assembly id
    NotFound(String),
    /// Operation invoked before `init`
    NotInitialized,
    /// Export requested with no assembly attached
    ExportUnavailable,
    /// The export pipeline failed to produce an asset
    Serialization(String),
    /// The exported asset could not be stored
    Storage(io::Error),
}

impl ViewerError {
    /// Level the error is logged at when absorbed
    pub fn log_level(&self) -> log::Level {
        match self {
            ViewerError::NotFound(_) | ViewerError::NotInitialized => log::Level::Warn,
            ViewerError::ExportUnavailable
            | ViewerError::Serialization(_)
            | ViewerError::Storage(_) => log::Level::Error,
        }
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::NotFound(id) => write!(f, "Assembly not found: {}", id),
            ViewerError::NotInitialized => write!(f, "Viewer not initialized"),
            ViewerError::ExportUnavailable => write!(f, "No assembly loaded to export"),
            ViewerError::Serialization(msg) => write!(f, "Export failed: {}", msg),
            ViewerError::Storage(e) => write!(f, "Failed to save export: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for ViewerError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotFound(id) => ViewerError::NotFound(id),
        }
    }
}

impl From<ExportError> for ViewerError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::NoAssembly => ViewerError::ExportUnavailable,
            other => ViewerError::Serialization(other.to_string()),
        }
    }
}

impl From<io::Error> for ViewerError {
    fn from(e: io::Error) -> Self {
        ViewerError::Storage(e)
    }
}
