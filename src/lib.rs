//! explode3d - exploded-view viewer for hardware assemblies
//!
//! The application crate: configuration, the [`viewer::Viewer`] context that
//! carries the public operations, keyboard mapping, and the systems the
//! windowed binary is built from.

pub mod config;
pub mod error;
pub mod input;
pub mod systems;
pub mod viewer;

pub use config::AppConfig;
pub use error::ViewerError;
pub use viewer::Viewer;
