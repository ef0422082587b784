use crate::models::Platform;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the config file location when set
pub const CONFIG_PATH_ENV: &str = "POSTDECK_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub overview: OverviewConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImportConfig {
    pub header_rows: usize,
    pub default_platforms: Vec<Platform>,
    pub default_post_platform: Platform,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            header_rows: 3,
            default_platforms: vec![Platform::Instagram, Platform::Facebook],
            default_post_platform: Platform::Instagram,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::state::default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OverviewConfig {
    pub upcoming_limit: usize,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self { upcoming_limit: 5 }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let proj_dirs = ProjectDirs::from("com", "postdeck", "postdeck")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.import.header_rows, 3);
        assert_eq!(config.import.default_platforms, vec![Platform::Instagram, Platform::Facebook]);
        assert_eq!(config.import.default_post_platform, Platform::Instagram);
        assert_eq!(config.overview.upcoming_limit, 5);
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn test_config_save_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.import.header_rows = 1;
        config.import.default_platforms = vec![Platform::LinkedIn];
        config.storage.data_dir = Some(temp_dir.path().join("data"));
        config.save_to(&config_path)?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[import]\nheader_rows = 0\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.import.header_rows, 0);
        assert_eq!(loaded.import.default_post_platform, Platform::Instagram);
        assert_eq!(loaded.overview, OverviewConfig::default());
        Ok(())
    }

    #[test]
    fn test_invalid_platform_is_rejected() -> Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[import]\ndefault_post_platform = \"Myspace\"\n")?;
        assert!(Config::load_from(&config_path).is_err());
        Ok(())
    }
}
