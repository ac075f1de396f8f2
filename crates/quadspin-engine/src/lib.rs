//! quadspin engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the demo scene:
//! window and event loop, wgpu device and surface, frame timing, logging.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod render;
