//! Shader program wrapper.
//!
//! A program is a vertex + fragment WGSL pair, compiled (parsed and
//! validated) per stage, linked by checking the stage interfaces against each
//! other and against the vertex buffers, then turned into a render pipeline.
//! Uniforms are addressed by name through the layout reflected from the
//! uniform block at `@group(0) @binding(0)`.

mod error;
mod interface;
mod program;
mod uniforms;

pub use error::{ShaderError, Stage};
pub use interface::{CompiledStage, link};
pub use program::ShaderProgram;
pub use uniforms::{UniformBlock, UniformKind, UniformLayout, UniformSlot};

/// Entry point the vertex stage must export.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point the fragment stage must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";
