//! Renderer-facing handles.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into the
//! frame's encoder through a `RenderTarget`. The runtime clears the target
//! before any renderer runs, so renderer passes load the existing contents.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
