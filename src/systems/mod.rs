//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod export_sink;
mod frame_clock;
mod render;
mod window;

pub use export_sink::{AssetSink, DirectorySink, MemorySink};
pub use frame_clock::FrameClock;
pub use render::{RenderError, RenderSystem};
pub use window::{format_title, WindowError, WindowSystem};
