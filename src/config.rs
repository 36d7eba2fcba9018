//! Application settings, read from a JSON file.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::source::Latency;
use crate::view::DEFAULT_PAGE_SIZE;

fn default_page_size() -> NonZeroUsize {
    DEFAULT_PAGE_SIZE
}

fn default_sample_size() -> usize {
    100
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Settings for the table and its simulated record source.
///
/// Every field is optional in the file; missing ones fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,
    /// Number of synthetic users produced per load.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default)]
    pub latency: Latency,
    /// Where CSV exports are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Fixed RNG seed for reproducible sample data.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sample_size: default_sample_size(),
            latency: Latency::default(),
            export_dir: default_export_dir(),
            log_file: None,
            seed: None,
        }
    }
}

impl TableConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: TableConfig =
            serde_json::from_str(r#"{"page_size": 10, "latency": {"load_ms": 0}}"#).unwrap();
        assert_eq!(cfg.page_size.get(), 10);
        assert_eq!(cfg.sample_size, 100);
        assert_eq!(cfg.latency.load_ms, 0);
        assert_eq!(cfg.latency.save_ms, 500);
        assert_eq!(cfg.export_dir, PathBuf::from("."));
    }

    #[test]
    fn test_zero_page_size_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("roster.json");
        fs::write(&path, r#"{"page_size": 0}"#).unwrap();
        assert!(matches!(
            TableConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = TableConfig::load_or_default(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(cfg, TableConfig::default());
    }

    #[test]
    fn test_missing_file_is_io_error_on_strict_load() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            TableConfig::load(&tmp.path().join("absent.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("roster.json");
        let cfg = TableConfig {
            seed: Some(9),
            log_file: Some(tmp.path().join("roster.log")),
            ..Default::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();
        assert_eq!(TableConfig::load(&path).unwrap(), cfg);
    }
}
