//! Configuration for docpreview
//!
//! Resolution order for the config file: `--config`, `DOCPREVIEW_CONFIG`
//! (both handled by clap), then `<config dir>/docpreview/config.toml`.
//! A missing file means defaults. A present file must parse and pass
//! [`validate`] before any preview is built from it.

pub mod schema;

pub use schema::{Config, ToolsConfig};

use crate::error::{PreviewError, PreviewResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Accepted values of `general.log_format`
pub const LOG_FORMATS: &[&str] = &["text", "json"];

/// Locates, loads and writes the docpreview config file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the platform config file
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager for an explicit config file
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Manager for the file named on the command line, if any
    pub fn from_cli(path: Option<PathBuf>) -> Self {
        path.map_or_else(Self::new, Self::with_path)
    }

    /// `<config dir>/docpreview/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docpreview")
            .join("config.toml")
    }

    /// `<cache dir>/docpreview`, or under the temp dir when the platform
    /// has no cache dir
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("docpreview")
    }

    /// Preview cache directory in effect for `config`
    pub fn cache_dir(config: &Config) -> PathBuf {
        config
            .cache
            .dir
            .clone()
            .unwrap_or_else(Self::default_cache_dir)
    }

    /// Load the config file, then apply the `--cache-dir` override
    pub fn load_with_cache_dir(&self, cache_dir: Option<PathBuf>) -> PreviewResult<Config> {
        let mut config = self.load()?;
        if cache_dir.is_some() {
            config.cache.dir = cache_dir;
        }
        Ok(config)
    }

    /// Load the config file, using defaults if it does not exist
    pub fn load(&self) -> PreviewResult<Config> {
        if !self.config_path.exists() {
            debug!("No config at {}, using defaults", self.config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.config_path).map_err(|e| {
            PreviewError::io(format!("reading config from {}", self.config_path.display()), e)
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| self.invalid(e.to_string()))?;
        validate(&config).map_err(|reason| self.invalid(reason))?;

        debug!("Loaded config from {}", self.config_path.display());
        Ok(config)
    }

    /// Write `config`, creating the parent directory
    pub fn save(&self, config: &Config) -> PreviewResult<()> {
        validate(config).map_err(|reason| self.invalid(reason))?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| PreviewError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            PreviewError::io(format!("writing config to {}", self.config_path.display()), e)
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn invalid(&self, reason: String) -> PreviewError {
        PreviewError::ConfigInvalid {
            path: self.config_path.clone(),
            reason,
        }
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject values no preview could be built with
pub fn validate(config: &Config) -> Result<(), String> {
    if !LOG_FORMATS.contains(&config.general.log_format.as_str()) {
        return Err(format!(
            "general.log_format must be one of {}, got {:?}",
            LOG_FORMATS.join(", "),
            config.general.log_format
        ));
    }
    if config.jpeg.default_height == 0 {
        return Err("jpeg.default_height must be at least 1".to_string());
    }
    if config.tools.render_dpi == 0 {
        return Err("tools.render_dpi must be at least 1".to_string());
    }

    let tools = &config.tools;
    for (key, command) in [
        ("libreoffice", &tools.libreoffice),
        ("pdftoppm", &tools.pdftoppm),
        ("pdftotext", &tools.pdftotext),
        ("pdfinfo", &tools.pdfinfo),
        ("pdfseparate", &tools.pdfseparate),
    ] {
        if command.trim().is_empty() {
            return Err(format!("tools.{key} must name a command"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn reason_for(content: &str) -> String {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, content).unwrap();

        match ConfigManager::with_path(path.clone()).load() {
            Err(PreviewError::ConfigInvalid {
                path: reported,
                reason,
            }) => {
                assert_eq!(reported, path);
                reason
            }
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().unwrap();
        assert_eq!(config.jpeg.default_height, 256);
        assert_eq!(config.general.log_format, "text");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.tools.render_dpi = 300;
        config.cache.dir = Some(temp.path().join("cache"));

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.tools.render_dpi, 300);
        assert_eq!(ConfigManager::cache_dir(&loaded), temp.path().join("cache"));
    }

    #[test]
    fn invalid_file_reports_path() {
        let reason = reason_for("[jpeg]\ndefault_height = \"tall\"\n");
        assert!(!reason.is_empty());
    }

    #[test]
    fn zero_height_is_rejected() {
        let reason = reason_for("[jpeg]\ndefault_height = 0\n");
        assert!(reason.contains("jpeg.default_height"));
    }

    #[test]
    fn zero_dpi_is_rejected() {
        let reason = reason_for("[tools]\nrender_dpi = 0\n");
        assert!(reason.contains("tools.render_dpi"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let reason = reason_for("[general]\nlog_format = \"xml\"\n");
        assert!(reason.contains("text, json"));
    }

    #[test]
    fn blank_tool_is_rejected() {
        let reason = reason_for("[tools]\npdftoppm = \"  \"\n");
        assert!(reason.contains("tools.pdftoppm"));
    }

    #[test]
    fn save_refuses_invalid_config() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));
        let mut config = Config::default();
        config.jpeg.default_height = 0;

        assert!(matches!(
            manager.save(&config),
            Err(PreviewError::ConfigInvalid { .. })
        ));
        assert!(!manager.path().exists());
    }

    #[test]
    fn cache_dir_override_wins() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[cache]\ndir = \"/srv/previews\"\n").unwrap();
        let manager = ConfigManager::with_path(path);

        let config = manager.load_with_cache_dir(None).unwrap();
        assert_eq!(ConfigManager::cache_dir(&config), PathBuf::from("/srv/previews"));

        let config = manager
            .load_with_cache_dir(Some(temp.path().join("override")))
            .unwrap();
        assert_eq!(ConfigManager::cache_dir(&config), temp.path().join("override"));
    }

    #[test]
    fn from_cli_prefers_explicit_path() {
        let explicit = ConfigManager::from_cli(Some(PathBuf::from("/etc/docpreview.toml")));
        assert_eq!(explicit.path(), Path::new("/etc/docpreview.toml"));
        assert_eq!(
            ConfigManager::from_cli(None).path(),
            ConfigManager::default_config_path()
        );
    }

    #[test]
    fn default_cache_dir_is_named() {
        assert!(ConfigManager::default_cache_dir().ends_with("docpreview"));
    }
}
