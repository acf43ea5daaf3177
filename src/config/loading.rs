//! Configuration loading functions.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::error::ConfigError;
use super::types::ReportConfig;

/// Project-level config file names, in search order.
pub const CONFIG_FILE_NAMES: [&str; 4] = [
    ".license-report.yaml",
    ".license-report.yml",
    ".license-report.json",
    ".license-report.toml",
];

impl ReportConfig {
    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config: Self = match ext.as_str() {
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseYaml {
                    path: path.to_path_buf(),
                    source: e,
                })?
            }
            "json" => serde_json::from_str(&content).map_err(|e| ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: e,
            })?,
            "toml" => toml::from_str(&content).map_err(|e| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: e,
            })?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    extension: ext,
                });
            }
        };

        config.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Check values serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jobs == Some(0) {
            return Err(ConfigError::Invalid(
                "jobs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from the project directory or global config.
    ///
    /// Search order:
    /// 1. `.license-report.{yaml,yml,json,toml}` in project root
    /// 2. `~/.config/license-report/config.yaml`
    /// 3. Default configuration
    ///
    /// Unreadable or invalid files are skipped with a warning.
    pub fn load(project_root: Option<&Path>) -> Self {
        if let Some(root) = project_root {
            for filename in &CONFIG_FILE_NAMES {
                let path = root.join(filename);
                if !path.exists() {
                    continue;
                }
                match Self::from_file(&path) {
                    Ok(config) => return config,
                    Err(e) => warn!(error = %e, "Skipping project configuration"),
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let global_config = config_dir.join("license-report").join("config.yaml");
            if global_config.exists() {
                match Self::from_file(&global_config) {
                    Ok(config) => return config,
                    Err(e) => warn!(error = %e, "Skipping global configuration"),
                }
            }
        }

        Self::default()
    }
}
