//! Configuration module for charopt.
//!
//! Handles loading configuration from a TOML file and applying
//! command-line overrides.

pub mod file;

use crate::config::file::{FanOutMode, FileConfig};
use charopt_core::options::{CatalogSource, OptionsParser};
use charopt_core::{FanOut, SettingsCache};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file read when no path is given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "./charopt.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub overrides_dir: Option<PathBuf>,
    pub enabled_modules: Vec<String>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub overrides_dir: Option<PathBuf>,
    pub enabled_modules: Vec<String>,
    pub fan_out: FanOut,
    pub wait_timeout: Duration,
}

/// The cache type the application works with.
pub type OptionsCache = SettingsCache<CatalogSource, OptionsParser>;

impl LoadedConfig {
    /// Compose the settings cache from this configuration.
    pub fn build_cache(&self) -> OptionsCache {
        SettingsCache::with_fan_out(
            CatalogSource::new(self.overrides_dir.clone()),
            OptionsParser::new(self.enabled_modules.iter().cloned()),
            self.fan_out,
        )
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    overrides: CliOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    ///
    /// With no explicit path, [`DEFAULT_CONFIG_PATH`] is read when present
    /// and built-in defaults are used otherwise.
    pub fn new(config_path: Option<PathBuf>, overrides: CliOverrides) -> Self {
        Self {
            config_path,
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, if any
    /// 2. Resolve relative paths against the config file's directory
    /// 3. Apply CLI overrides
    /// 4. Validate the configuration
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let (mut file_config, base_dir) = match self.resolve_path() {
            Some(path) => {
                let content =
                    std::fs::read_to_string(&path).map_err(|source| ConfigError::IoError {
                        path: path.clone(),
                        source,
                    })?;
                let base_dir = path.parent().map(Path::to_path_buf);
                tracing::debug!("Read configuration from {:?}", path);
                (toml::from_str::<FileConfig>(&content)?, base_dir)
            }
            None => {
                tracing::debug!("No configuration file found, using defaults");
                (FileConfig::default(), None)
            }
        };

        if let (Some(dir), Some(base)) = (&file_config.catalog.overrides_dir, &base_dir) {
            if dir.is_relative() {
                file_config.catalog.overrides_dir = Some(base.join(dir));
            }
        }

        // CLI overrides
        if let Some(dir) = &self.overrides.overrides_dir {
            file_config.catalog.overrides_dir = Some(dir.clone());
        }
        for module in &self.overrides.enabled_modules {
            if !file_config.catalog.enabled_modules.contains(module) {
                file_config.catalog.enabled_modules.push(module.clone());
            }
        }

        self.validate(&file_config)?;

        Ok(LoadedConfig {
            overrides_dir: file_config.catalog.overrides_dir,
            enabled_modules: file_config.catalog.enabled_modules,
            fan_out: match file_config.cache.fan_out {
                FanOutMode::Parallel => FanOut::Parallel,
                FanOutMode::Sequential => FanOut::Sequential,
            },
            wait_timeout: Duration::from_secs(file_config.cache.wait_timeout_secs),
        })
    }

    fn resolve_path(&self) -> Option<PathBuf> {
        match &self.config_path {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                default.is_file().then_some(default)
            }
        }
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.cache.wait_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "cache.wait_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if config
            .catalog
            .enabled_modules
            .iter()
            .any(|module| module.trim().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "catalog.enabled_modules must not contain empty names".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("charopt.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_relative_overrides_dir_resolves_against_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[catalog]\noverrides_dir = \"settings\"\n\n[cache]\nfan_out = \"sequential\"\n",
        );

        let loaded = ConfigLoader::new(Some(path), CliOverrides::default())
            .load()
            .unwrap();

        assert_eq!(loaded.overrides_dir, Some(dir.path().join("settings")));
        assert_eq!(loaded.fan_out, FanOut::Sequential);
        assert_eq!(loaded.wait_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[catalog]\noverrides_dir = \"/srv/settings\"\nenabled_modules = [\"run-faster\"]\n",
        );
        let overrides = CliOverrides {
            overrides_dir: Some(PathBuf::from("/tmp/house")),
            enabled_modules: vec!["run-faster".to_string(), "chrome-flesh".to_string()],
        };

        let loaded = ConfigLoader::new(Some(path), overrides).load().unwrap();

        assert_eq!(loaded.overrides_dir, Some(PathBuf::from("/tmp/house")));
        assert_eq!(loaded.enabled_modules, vec!["run-faster", "chrome-flesh"]);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new(
            Some(dir.path().join("absent.toml")),
            CliOverrides::default(),
        )
        .load();
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[cache]\nwait_timeout_secs = 0\n");
        let result = ConfigLoader::new(Some(path), CliOverrides::default()).load();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_rejects_blank_module() {
        let overrides = CliOverrides {
            overrides_dir: None,
            enabled_modules: vec!["  ".to_string()],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "");
        let result = ConfigLoader::new(Some(path), overrides).load();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
