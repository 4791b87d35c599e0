//! Local persistence of per-group LED ranges.
//!
//! The whole collection lives in one JSON file shaped
//! `{label: {from, to}}`. Every save overwrites the file; concurrent
//! writers are not coordinated and the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::error::{PanelError, Result, ResultExt};
use crate::model::{DisplayGroup, RangeMap, default_ranges};

/// File-backed store for the range map.
#[derive(Debug, Clone)]
pub struct RangeStore {
    path: PathBuf,
}

impl RangeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored ranges, falling back to the defaults.
    ///
    /// A missing or unreadable file yields the defaults; a file lacking a
    /// group gets that group's default. Labels that are not
    /// range-configurable groups are dropped.
    pub fn load(&self) -> RangeMap {
        let mut ranges = default_ranges();

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored ranges, using defaults");
                return ranges;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read stored ranges");
                return ranges;
            }
        };

        match serde_json::from_str::<RangeMap>(&text) {
            Ok(stored) => {
                for (label, range) in stored {
                    match DisplayGroup::from_label(&label) {
                        Some(group) if group.is_range_configurable() => {
                            trace!(%label, %range, "Loaded stored range");
                            ranges.insert(label, range);
                        }
                        _ => debug!(%label, "Ignoring stored range for unknown group"),
                    }
                }
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Stored ranges are malformed, using defaults");
            }
        }
        ranges
    }

    /// Overwrite the store with the whole collection.
    pub fn save(&self, ranges: &RangeMap) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(ranges)?;
        fs::write(&self.path, json).map_err(|e| {
            PanelError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), groups = ranges.len(), "Saved ranges");
        Ok(())
    }
}
