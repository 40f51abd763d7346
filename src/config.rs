//! Dashboard Configuration
//! Dataset locations and column names, with an optional JSON override file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional override file, looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where the datasets live and which columns carry meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub day_path: PathBuf,
    pub hour_path: PathBuf,
    pub date_column: String,
    pub category_columns: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            day_path: PathBuf::from("data/day.csv"),
            hour_path: PathBuf::from("data/hour.csv"),
            date_column: "dteday".to_string(),
            category_columns: vec![
                "season".to_string(),
                "workingday".to_string(),
                "weathersit".to_string(),
            ],
        }
    }
}

impl DashboardConfig {
    /// Load the config at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No {} found, using default dataset paths", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!(
            "Loaded config from {}: day={}, hour={}",
            path.display(),
            config.day_path.display(),
            config.hour_path.display()
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "day_path": "/srv/bikes/day.csv" }"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.day_path, PathBuf::from("/srv/bikes/day.csv"));
        assert_eq!(config.hour_path, PathBuf::from("data/hour.csv"));
        assert_eq!(config.date_column, "dteday");
        assert_eq!(config.category_columns.len(), 3);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
