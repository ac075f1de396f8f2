use super::ctx::{FrameCtx, InitCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the scene.
///
/// Call order: `on_init` once after the GPU context exists, `on_frame` once
/// per redraw, `on_exit` once before the GPU context is dropped.
pub trait App {
    /// Called once the window and GPU context are ready.
    ///
    /// An error here is fatal: the runtime logs it and leaves the event loop.
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()>;

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called when the window is closing, while GPU objects are still alive.
    fn on_exit(&mut self) {}
}
