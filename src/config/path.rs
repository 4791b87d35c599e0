//! Path helpers for the config file and the range store.
//!
//! Supports absolute paths, paths relative to the config file, and "~" home
//! directory expansion.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{PanelError, Result};

/// Resolve a path named in a config file.
///
/// Resolution rules:
/// 1. Paths starting with `~`: expanded to home directory
/// 2. Absolute paths: used as-is
/// 3. Relative paths: resolved relative to the config file's directory
pub fn resolve_path(path: &Path, config_dir: &Path) -> Result<PathBuf> {
    trace!(
        path = %path.display(),
        config_dir = %config_dir.display(),
        "Resolving path"
    );

    let path_str = path.to_string_lossy();

    if path_str == "~" || path_str.starts_with("~/") {
        let home = home_dir()?;
        let rest = path_str.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(
            original = %path.display(),
            resolved = %resolved.display(),
            "Expanded home directory path"
        );
        return Ok(resolved);
    }

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    Ok(config_dir.join(path))
}

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| PanelError::ConfigParse("Could not determine home directory".to_string()))
}

/// Per-user directory for this tool, e.g. `~/.config/dotstar`.
pub fn app_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("dotstar"))
        .ok_or_else(|| {
            PanelError::ConfigParse("Could not determine configuration directory".to_string())
        })
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_config_dir()?.join("config.toml"))
}

pub fn default_ranges_path() -> Result<PathBuf> {
    Ok(app_config_dir()?.join("group_ranges.json"))
}
