//! Scan engine configuration
//!
//! Loaded from JSON; every field is optional.
//!
//! ```json
//! {"max_versions": 3, "row_limit": 100, "log_scans": false}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigResult};
use crate::observability::{Event, Logger};

/// Defaults applied by a `Scanner` to every scan it opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Newest versions returned per column (default: 1)
    #[serde(default = "default_max_versions")]
    pub max_versions: usize,

    /// Rows delivered before a scan stops on its own (default: unlimited)
    #[serde(default)]
    pub row_limit: Option<u64>,

    /// Write scan lifecycle events to the log (default: true)
    #[serde(default = "default_log_scans")]
    pub log_scans: bool,
}

fn default_max_versions() -> usize {
    1
}

fn default_log_scans() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_versions: default_max_versions(),
            row_limit: None,
            log_scans: default_log_scans(),
        }
    }
}

impl ScanConfig {
    /// Config with scan logging turned off
    pub fn quiet() -> Self {
        Self {
            log_scans: false,
            ..Default::default()
        }
    }

    /// Parses and validates a JSON config
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: ScanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        if config.log_scans {
            let shown = path.display().to_string();
            Logger::event(Event::ConfigLoaded, &[("path", shown.as_str())]);
        }
        Ok(config)
    }

    /// Checks the values serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_versions == 0 {
            return Err(ConfigError::Invalid(
                "max_versions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ScanConfig::default();
        assert_eq!(config.max_versions, 1);
        assert_eq!(config.row_limit, None);
        assert!(config.log_scans);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ScanConfig::from_json_str(r#"{"row_limit": 10}"#).unwrap();
        assert_eq!(config.row_limit, Some(10));
        assert_eq!(config.max_versions, 1);
        assert!(config.log_scans);
    }

    #[test]
    fn test_zero_versions_rejected() {
        let err = ScanConfig::from_json_str(r#"{"max_versions": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ScanConfig::from_json_str("{max_versions").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_versions": 3, "log_scans": false}}"#).unwrap();

        let config = ScanConfig::load(file.path()).unwrap();
        assert_eq!(config.max_versions, 3);
        assert!(!config.log_scans);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScanConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.json"));
    }
}
