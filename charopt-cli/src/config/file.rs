//! TOML file configuration structures.
//!
//! These structs directly map to the `charopt.toml` file format.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Where character options come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory of `*.toml` override files. Relative paths are resolved
    /// against the directory containing the config file.
    #[serde(default)]
    pub overrides_dir: Option<PathBuf>,
    /// Optional modules whose options should be loaded.
    #[serde(default)]
    pub enabled_modules: Vec<String>,
}

/// Cache population settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether descriptors are parsed concurrently or one at a time.
    #[serde(default)]
    pub fan_out: FanOutMode,
    /// How long to wait for the cache before giving up.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            fan_out: FanOutMode::default(),
            wait_timeout_secs: default_wait_timeout_secs(),
        }
    }
}

fn default_wait_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOutMode {
    #[default]
    Parallel,
    Sequential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[catalog]
overrides_dir = "./settings"
enabled_modules = ["run-faster", "chrome-flesh"]

[cache]
fan_out = "sequential"
wait_timeout_secs = 5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.catalog.overrides_dir,
            Some(PathBuf::from("./settings"))
        );
        assert_eq!(config.catalog.enabled_modules.len(), 2);
        assert_eq!(config.cache.fan_out, FanOutMode::Sequential);
        assert_eq!(config.cache.wait_timeout_secs, 5);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.catalog.overrides_dir.is_none());
        assert!(config.catalog.enabled_modules.is_empty());
        assert_eq!(config.cache.fan_out, FanOutMode::Parallel);
        assert_eq!(config.cache.wait_timeout_secs, 30);
    }
}
