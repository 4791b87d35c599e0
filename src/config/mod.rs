//! Configuration for reaching the controller and storing ranges.
//!
//! Values come from three layers, highest first: CLI flags (or their
//! environment variables), the TOML config file, built-in defaults.

mod path;

pub use path::{app_config_dir, default_config_path, default_ranges_path, home_dir, resolve_path};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PanelError, Result};
use crate::transport::DEFAULT_BASE_URL;

/// Contents of `config.toml`.
///
/// ```toml
/// base_url = "http://192.168.1.46:5000"
/// timeout_secs = 5
/// ranges_path = "group_ranges.json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub ranges_path: Option<PathBuf>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PanelError::ConfigParse(e.to_string()))
    }

    /// Load a config file.
    ///
    /// With `required == false` a missing file is an empty config.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "Loaded config file");
                let mut config = Self::parse(&text)?;
                if let (Some(ranges), Some(dir)) = (&config.ranges_path, path.parent()) {
                    config.ranges_path = Some(resolve_path(ranges, dir)?);
                }
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "No config file");
                Ok(Self::default())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PanelError::ConfigNotFound {
                path: path.display().to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub ranges_path: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    pub ranges_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<PathBuf>,
}

impl Settings {
    /// Merge overrides, the config file and defaults.
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let (config_path, required) = match overrides.config {
            Some(path) => (Some(path), true),
            None => (default_config_path().ok(), false),
        };
        let file = match &config_path {
            Some(path) => ConfigFile::load(path, required)?,
            None => ConfigFile::default(),
        };
        Self::merge(overrides.base_url, overrides.timeout_secs, overrides.ranges_path, file, config_path)
    }

    fn merge(
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        ranges_path: Option<PathBuf>,
        file: ConfigFile,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let ranges_path = match ranges_path.or(file.ranges_path) {
            Some(path) => path,
            None => default_ranges_path()?,
        };
        Ok(Self {
            base_url: base_url
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout_secs: timeout_secs.or(file.timeout_secs).filter(|&secs| secs > 0),
            ranges_path,
            config_path,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
