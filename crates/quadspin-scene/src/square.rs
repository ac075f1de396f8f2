use anyhow::{Context, Result};

use quadspin_engine::core::{App, AppControl, FrameCtx, InitCtx, WindowCtx};
use quadspin_engine::device::Gpu;
use quadspin_engine::render::{RenderCtx, RenderTarget};

use crate::animation::Animation;
use crate::assets;
use crate::config::SceneConfig;
use crate::geometry::{QuadGeometry, SQUARE};
use crate::lifecycle::{FrameParams, SceneCore, SceneState};
use crate::mesh::QuadMesh;
use crate::shader::ShaderProgram;

/// Aspect-ratio uniform (`width / height`).
pub const U_ASPECT_RATIO: &str = "u_aspectRatio";

/// Model-matrix uniform (`mat3x3<f32>`).
pub const U_MODEL: &str = "u_model";

/// A colored square spinning at a constant angular speed.
///
/// Owns the shader program, the mesh, and the animation. Driven by the
/// engine runtime through [`App`]: `run` on init, one frame per redraw,
/// `stop` on exit.
pub struct SpinningSquare {
    config: SceneConfig,
    geometry: QuadGeometry,
    core: SceneCore,
    program: Option<ShaderProgram>,
    mesh: Option<QuadMesh>,
}

impl SpinningSquare {
    pub fn new(config: SceneConfig) -> Self {
        let core = SceneCore::new(Animation::new(config.degrees_per_second));
        Self {
            config,
            geometry: SQUARE,
            core,
            program: None,
            mesh: None,
        }
    }

    #[inline]
    pub fn state(&self) -> SceneState {
        self.core.state()
    }

    /// Builds the program, sizes the surface, uploads the quad, and starts
    /// the animation.
    ///
    /// Shader problems are logged and leave the scene running with nothing
    /// but the background; a surface with no usable size is an error.
    pub fn run(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        self.core.begin_init()?;
        log::info!("spinning square: initializing");

        let sources = assets::load_shader_sources(&self.config);
        let mut program = ShaderProgram::new(ctx.gpu.surface_format());
        if let Err(err) = program.load_shaders(
            ctx.gpu.device(),
            &sources.vertex,
            &sources.fragment,
            &QuadMesh::vertex_layouts(),
        ) {
            log::error!("{err}");
        }
        self.program = Some(program);

        self.on_canvas_resized(&ctx.window, ctx.gpu);
        ctx.clear(self.config.clear_color);

        self.mesh = Some(QuadMesh::upload(ctx.gpu.device(), &self.geometry));

        self.core
            .finish_init()
            .context("could not generate a viewport")?;

        log::info!("spinning square: running");
        Ok(())
    }

    /// Stops the animation and releases the program and the mesh.
    ///
    /// Frames already scheduled see the stopped state and draw nothing.
    pub fn stop(&mut self) {
        if !self.core.stop() {
            return;
        }

        if let Some(mut program) = self.program.take() {
            program.destroy();
        }
        if let Some(mesh) = self.mesh.take() {
            mesh.release();
        }

        log::info!("spinning square: stopped");
    }

    /// Resizes the backing surface if the window's client area changed size.
    ///
    /// Cheap to call every frame; returns `true` when a resize happened.
    pub fn on_canvas_resized(&mut self, window: &WindowCtx<'_>, gpu: &mut Gpu<'_>) -> bool {
        if !self.core.sync_viewport(window.client_size()) {
            return false;
        }

        let size = self.core.viewport().size();
        gpu.resize(size);
        log::debug!("surface resized to {}x{}", size.width, size.height);
        true
    }

    /// Advances the animation by `dt` seconds.
    ///
    /// `None` means nothing should be drawn this frame.
    pub fn step(&mut self, dt: f32) -> Option<FrameParams> {
        self.core.step(dt)
    }

    fn frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.core.is_running() {
            return AppControl::Continue;
        }

        self.on_canvas_resized(&ctx.window, ctx.gpu);

        let Some(params) = self.step(ctx.time.dt) else {
            return AppControl::Continue;
        };

        let program = self.program.as_mut();
        let mesh = self.mesh.as_ref();

        ctx.render(self.config.clear_color, |rctx, target| {
            if let (Some(program), Some(mesh)) = (program, mesh) {
                draw_square(rctx, target, program, mesh, &params);
            }
        })
    }
}

fn draw_square(
    rctx: &RenderCtx<'_>,
    target: &mut RenderTarget<'_>,
    program: &mut ShaderProgram,
    mesh: &QuadMesh,
    params: &FrameParams,
) {
    // No program: the frame stays at the clear color.
    if !program.is_linked() {
        return;
    }

    program.set_uniform_1f(rctx.queue, U_ASPECT_RATIO, params.aspect_ratio);
    program.set_uniform_matrix3fv(rctx.queue, U_MODEL, &params.model);

    let mut rpass = target.begin_load_pass("quadspin square pass");
    if !program.use_program(&mut rpass) {
        return;
    }
    mesh.bind(&mut rpass);
    rpass.draw_indexed(0..mesh.index_count(), 0, 0..1);
}

impl App for SpinningSquare {
    fn on_init(&mut self, ctx: &mut InitCtx<'_, '_>) -> Result<()> {
        self.run(ctx)
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.frame(ctx)
    }

    fn on_exit(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scene_is_uninitialized_and_owns_nothing() {
        let square = SpinningSquare::new(SceneConfig::default());
        assert_eq!(square.state(), SceneState::Uninitialized);
        assert!(square.program.is_none());
        assert!(square.mesh.is_none());
    }

    #[test]
    fn stop_before_run_is_harmless() {
        let mut square = SpinningSquare::new(SceneConfig::default());
        square.stop();
        square.stop();
        assert_eq!(square.state(), SceneState::Stopped);
        assert!(square.step(0.016).is_none());
    }

    #[test]
    fn configured_speed_reaches_animation() {
        let config = SceneConfig {
            degrees_per_second: 90.0,
            ..SceneConfig::default()
        };
        let square = SpinningSquare::new(config);
        assert_eq!(square.core.animation().degrees_per_second(), 90.0);
    }

    #[test]
    fn uniform_names_match_bundled_shader() {
        let vs = include_str!("../assets/shaders/spinning-square/basic.vert.wgsl");
        assert!(vs.contains(U_ASPECT_RATIO));
        assert!(vs.contains(U_MODEL));
    }
}
