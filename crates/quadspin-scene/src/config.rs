use std::path::{Path, PathBuf};

use quadspin_engine::paint::Color;

use crate::animation::DEFAULT_DEGREES_PER_SECOND;

/// Environment variable overriding `SceneConfig::asset_root`.
pub const ASSET_ROOT_ENV: &str = "QUADSPIN_ASSET_ROOT";

/// Scene configuration.
///
/// Shader paths are relative to `asset_root`.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub asset_root: PathBuf,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub clear_color: Color,
    pub degrees_per_second: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            vertex_shader: PathBuf::from("assets/shaders/spinning-square/basic.vert.wgsl"),
            fragment_shader: PathBuf::from("assets/shaders/spinning-square/basic.frag.wgsl"),
            clear_color: Color::rgba(0.23, 0.58, 0.57, 1.0),
            degrees_per_second: DEFAULT_DEGREES_PER_SECOND,
        }
    }
}

impl SceneConfig {
    /// Defaults, with `asset_root` taken from `QUADSPIN_ASSET_ROOT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSET_ROOT_ENV).filter(|v| !v.is_empty()) {
            config.asset_root = PathBuf::from(root);
        }
        config
    }

    pub fn with_asset_root(mut self, root: impl AsRef<Path>) -> Self {
        self.asset_root = root.as_ref().to_path_buf();
        self
    }

    pub fn vertex_shader_path(&self) -> PathBuf {
        self.asset_root.join(&self.vertex_shader)
    }

    pub fn fragment_shader_path(&self) -> PathBuf {
        self.asset_root.join(&self.fragment_shader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_background_color() {
        assert_eq!(SceneConfig::default().clear_color, Color::rgba(0.23, 0.58, 0.57, 1.0));
    }

    #[test]
    fn shader_paths_are_relative_to_asset_root() {
        let config = SceneConfig::default().with_asset_root("/srv/demo");
        assert_eq!(
            config.vertex_shader_path(),
            Path::new("/srv/demo/assets/shaders/spinning-square/basic.vert.wgsl")
        );
        assert_eq!(
            config.fragment_shader_path(),
            Path::new("/srv/demo/assets/shaders/spinning-square/basic.frag.wgsl")
        );
    }
}
