//! Input handling for the explode3d viewer
//!
//! Orbit-style camera control: drag to orbit around the target, scroll to
//! zoom, with damped motion that keeps easing after the input stops.

mod orbit_controller;

pub use orbit_controller::{OrbitControl, OrbitController};
