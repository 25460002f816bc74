use inkpost_engine::{ObserverOptions, RenderOptions, RootMargin};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderOptions,
    pub viewer: ViewerConfig,
}

/// Settings for the terminal viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Width of the TOC sidebar in columns.
    pub toc_width: u16,
    /// Scroll-spy margins, as percentages of the viewport height.
    pub spy_top_margin_percent: i32,
    pub spy_bottom_margin_percent: i32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let margin = RootMargin::default();
        Self {
            toc_width: 32,
            spy_top_margin_percent: margin.top,
            spy_bottom_margin_percent: margin.bottom,
        }
    }
}

impl ViewerConfig {
    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            root_margin: RootMargin {
                top: self.spy_top_margin_percent,
                bottom: self.spy_bottom_margin_percent,
            },
            ..ObserverOptions::default()
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/inkpost");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Expands `~` in a user supplied config location.
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        PathBuf::from(shellexpand::tilde(&path_str).as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpost_engine::EngineKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/inkpost/config.toml"));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/posts/inkpost.toml"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("posts/inkpost.toml"));
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path.toml");
        assert_eq!(Config::expand_path(&path), path);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.min_toc_headings, 1);
        assert_eq!(config.viewer.spy_bottom_margin_percent, -70);
    }

    #[test]
    fn test_partial_tables() {
        let config_content = r#"
[render]
engine = "pulldown"
min_toc_headings = 2

[render.blocks]
tables = false

[viewer]
toc_width = 40
"#;
        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(config.render.engine, EngineKind::Pulldown);
        assert_eq!(config.render.min_toc_headings, 2);
        assert!(config.render.strikethrough);
        assert!(!config.render.blocks.tables);
        assert!(config.render.blocks.headings);
        assert_eq!(config.viewer.toc_width, 40);
        assert_eq!(config.viewer.spy_top_margin_percent, 0);
    }

    #[test]
    fn test_observer_options_from_viewer() {
        let viewer = ViewerConfig {
            spy_top_margin_percent: -5,
            spy_bottom_margin_percent: -60,
            ..ViewerConfig::default()
        };
        let options = viewer.observer_options();
        assert_eq!(options.root_margin.to_string(), "-5% 0px -60% 0px");
        assert_eq!(options.threshold, 0.0);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[render\nengine = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_unknown_engine_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[render]\nengine = \"markdown-it\"\n").unwrap();

        assert!(matches!(
            Config::load_from_path(&config_file),
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::default();
        test_config.render.engine = EngineKind::Pulldown;
        test_config.render.blocks.lists = false;
        test_config.viewer.toc_width = 24;

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
