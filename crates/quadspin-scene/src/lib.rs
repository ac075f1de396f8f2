//! Spinning-square demo scene.
//!
//! Split into pure pieces (`math`, `geometry`, `animation`, `viewport`,
//! `lifecycle`) and GPU-owning pieces (`shader`, `mesh`, `square`).
//! `SpinningSquare` implements the engine's `App` contract.

pub mod animation;
pub mod assets;
pub mod config;
pub mod geometry;
pub mod lifecycle;
pub mod math;
pub mod mesh;
pub mod shader;
pub mod square;
pub mod viewport;

pub use config::SceneConfig;
pub use lifecycle::{FrameParams, SceneState};
pub use square::SpinningSquare;
