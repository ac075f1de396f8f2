use quadspin_engine::device::GpuInit;
use quadspin_engine::logging::{init_logging, LoggingConfig};
use quadspin_engine::window::{Runtime, RuntimeConfig};
use quadspin_scene::{SceneConfig, SpinningSquare};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let scene_config = SceneConfig::from_env();
    log::info!("assets from {}", scene_config.asset_root.display());

    let runtime_config = RuntimeConfig {
        title: "Spinning Square".to_string(),
        ..RuntimeConfig::default()
    };

    // Colors are authored for a non-sRGB canvas; don't let the surface re-encode them.
    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    Runtime::run(runtime_config, gpu_init, SpinningSquare::new(scene_config))
}
