use std::path::Path;

use anyhow::{Context, Result};

use crate::config::SceneConfig;

/// Text of the two shader stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

/// Reads both shader files named by `config`.
///
/// A file that can't be read is logged and comes back empty; building a
/// program from it then fails with a compile error instead of aborting setup.
pub fn load_shader_sources(config: &SceneConfig) -> ShaderSources {
    ShaderSources {
        vertex: read_or_log(&config.vertex_shader_path()),
        fragment: read_or_log(&config.fragment_shader_path()),
    }
}

fn read_or_log(path: &Path) -> String {
    match read_source(path) {
        Ok(text) => text,
        Err(err) => {
            log::error!("{err:#}");
            String::new()
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader source {}", path.display()))?;
    log::debug!("loaded {} ({} bytes)", path.display(), text.len());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sources_load() {
        let sources = load_shader_sources(&SceneConfig::default());
        assert!(sources.vertex.contains("fn vs_main"));
        assert!(sources.fragment.contains("fn fs_main"));
    }

    #[test]
    fn missing_files_come_back_empty() {
        let config = SceneConfig::default().with_asset_root("/nonexistent/quadspin-assets");
        assert_eq!(load_shader_sources(&config), ShaderSources::default());
    }

    #[test]
    fn read_error_names_the_file() {
        let err = read_source(Path::new("/nonexistent/basic.vert.wgsl")).unwrap_err();
        assert!(format!("{err:#}").contains("basic.vert.wgsl"));
    }
}
