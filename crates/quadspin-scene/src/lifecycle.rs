//! GPU-free half of the scene: state machine, animation, viewport.

use anyhow::Result;
use winit::dpi::PhysicalSize;

use crate::animation::Animation;
use crate::math::{Mat3, rotate_2d};
use crate::viewport::Viewport;

/// Scene lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneState {
    Uninitialized,
    Initializing,
    Running,
    Stopped,
}

/// Everything a frame needs to draw the quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameParams {
    pub angle: f32,
    pub aspect_ratio: f32,
    pub model: Mat3,
}

/// State machine plus per-frame update, independent of any GPU context.
#[derive(Debug, Clone)]
pub struct SceneCore {
    state: SceneState,
    animation: Animation,
    viewport: Viewport,
}

impl SceneCore {
    pub fn new(animation: Animation) -> Self {
        Self {
            state: SceneState::Uninitialized,
            animation,
            viewport: Viewport::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> SceneState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == SceneState::Running
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// `Uninitialized -> Initializing`.
    pub fn begin_init(&mut self) -> Result<()> {
        anyhow::ensure!(
            self.state == SceneState::Uninitialized,
            "scene cannot start from {:?}",
            self.state
        );
        self.state = SceneState::Initializing;
        Ok(())
    }

    /// `Initializing -> Running`. Fails if there is no usable viewport yet.
    pub fn finish_init(&mut self) -> Result<()> {
        anyhow::ensure!(
            self.state == SceneState::Initializing,
            "scene cannot finish setup from {:?}",
            self.state
        );
        anyhow::ensure!(
            self.viewport.is_drawable(),
            "could not compute a viewport from a {}x{} surface",
            self.viewport.width,
            self.viewport.height
        );
        self.state = SceneState::Running;
        Ok(())
    }

    /// Adopts the client size; `true` means the backing surface must follow.
    pub fn sync_viewport(&mut self, client: PhysicalSize<u32>) -> bool {
        self.viewport.sync_to(client)
    }

    /// One animation step.
    ///
    /// Returns `None` when the scene isn't running (nothing may be drawn) or
    /// the viewport is degenerate (minimized window).
    pub fn step(&mut self, dt: f32) -> Option<FrameParams> {
        if !self.is_running() {
            return None;
        }

        let angle = self.animation.step(dt);
        let aspect_ratio = self.viewport.aspect_ratio()?;

        Some(FrameParams {
            angle,
            aspect_ratio,
            model: rotate_2d(angle),
        })
    }

    /// Moves to `Stopped`.
    ///
    /// Returns `true` exactly once, on the first stop after setup began:
    /// that caller owns releasing the GPU resources.
    pub fn stop(&mut self) -> bool {
        let previous = std::mem::replace(&mut self.state, SceneState::Stopped);
        matches!(previous, SceneState::Initializing | SceneState::Running)
    }
}

impl Default for SceneCore {
    fn default() -> Self {
        Self::new(Animation::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use quadspin_engine::window::RuntimeConfig;

    use super::*;

    fn running(width: u32, height: u32) -> SceneCore {
        let mut core = SceneCore::default();
        core.begin_init().unwrap();
        core.sync_viewport(PhysicalSize::new(width, height));
        core.finish_init().unwrap();
        core
    }

    #[test]
    fn lifecycle_runs_in_order() {
        let mut core = SceneCore::default();
        assert_eq!(core.state(), SceneState::Uninitialized);

        core.begin_init().unwrap();
        assert_eq!(core.state(), SceneState::Initializing);

        core.sync_viewport(PhysicalSize::new(800, 600));
        core.finish_init().unwrap();
        assert_eq!(core.state(), SceneState::Running);

        assert!(core.stop());
        assert_eq!(core.state(), SceneState::Stopped);
    }

    #[test]
    fn run_twice_is_rejected() {
        let mut core = running(800, 600);
        assert!(core.begin_init().is_err());
        assert!(core.is_running());
    }

    #[test]
    fn zero_viewport_is_fatal() {
        let mut core = SceneCore::default();
        core.begin_init().unwrap();
        assert!(core.finish_init().is_err());
        assert_eq!(core.state(), SceneState::Initializing);
    }

    #[test]
    fn no_frames_before_running() {
        let mut core = SceneCore::default();
        assert!(core.step(0.016).is_none());
        core.begin_init().unwrap();
        assert!(core.step(0.016).is_none());
    }

    #[test]
    fn stop_prevents_further_frames() {
        let mut core = running(800, 600);
        assert!(core.step(0.016).is_some());

        core.stop();
        for _ in 0..3 {
            assert!(core.step(0.016).is_none());
        }
    }

    #[test]
    fn stop_releases_once() {
        let mut core = running(800, 600);
        assert!(core.stop());
        assert!(!core.stop());
    }

    #[test]
    fn stop_before_setup_owns_nothing() {
        let mut core = SceneCore::default();
        assert!(!core.stop());
        assert!(core.begin_init().is_err());
    }

    #[test]
    fn step_reports_aspect_and_model() {
        let mut core = running(800, 400);
        let params = core.step(1.0).unwrap();
        assert!((params.angle - 50.0).abs() < 1e-4);
        assert_eq!(params.aspect_ratio, 2.0);
        assert!(params.model.approx_eq(&rotate_2d(params.angle), 1e-6));
    }

    #[test]
    fn wrap_scenario_from_350() {
        let mut core = SceneCore::new(Animation::default().with_angle(350.0));
        core.begin_init().unwrap();
        core.sync_viewport(PhysicalSize::new(800, 600));
        core.finish_init().unwrap();

        let params = core.step(0.5).unwrap();
        assert_eq!(params.angle, 0.0);
        assert!(params.model.approx_eq(&Mat3::IDENTITY, 1e-6));
    }

    #[test]
    fn minimized_window_skips_draw_but_keeps_animating() {
        let mut core = running(800, 600);
        core.sync_viewport(PhysicalSize::new(0, 0));
        assert!(core.step(1.0).is_none());
        assert!((core.animation().angle() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn resize_reaches_frame_only_after_sync() {
        let mut core = running(800, 600);
        let before = core.step(0.0).unwrap();
        assert!((before.aspect_ratio - 800.0 / 600.0).abs() < 1e-6);

        assert!(core.sync_viewport(PhysicalSize::new(400, 100)));
        let after = core.step(0.0).unwrap();
        assert_eq!(after.aspect_ratio, 4.0);
    }

    #[test]
    fn one_second_between_frames_turns_fifty_degrees() {
        let mut core = running(800, 600);
        let mut clock = RuntimeConfig::default().frame_clock();
        let start = Instant::now();
        clock.tick_at(start);

        let ft = clock.tick_at(start + Duration::from_secs(1));
        let params = core.step(ft.dt).unwrap();
        assert!((params.angle - 50.0).abs() < 1e-4, "{}", params.angle);
    }
}
