//! Display groups and the user's group selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{PanelError, Result};

/// A named subset of LEDs the user can target as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DisplayGroup {
    #[serde(rename = "Shelf Top")]
    ShelfTop,
    #[serde(rename = "Shelf Left")]
    ShelfLeft,
    #[serde(rename = "Shelf Right")]
    ShelfRight,
    #[serde(rename = "Photon Ring")]
    PhotonRing,
}

impl DisplayGroup {
    /// All groups in panel order.
    pub const ALL: [Self; 4] = [
        Self::ShelfTop,
        Self::ShelfLeft,
        Self::ShelfRight,
        Self::PhotonRing,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ShelfTop => "Shelf Top",
            Self::ShelfLeft => "Shelf Left",
            Self::ShelfRight => "Shelf Right",
            Self::PhotonRing => "Photon Ring",
        }
    }

    /// Identifier the controller expects in place of the label.
    pub const fn backend_id(self) -> &'static str {
        match self {
            Self::ShelfTop => "group1",
            Self::ShelfLeft => "group2",
            Self::ShelfRight => "group3",
            Self::PhotonRing => "photon_ring",
        }
    }

    const fn alias(self) -> &'static str {
        match self {
            Self::ShelfTop => "top",
            Self::ShelfLeft => "left",
            Self::ShelfRight => "right",
            Self::PhotonRing => "ring",
        }
    }

    /// Only the shelf segments have an LED index range; the ring is driven separately.
    pub const fn is_range_configurable(self) -> bool {
        !matches!(self, Self::PhotonRing)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == label)
    }
}

impl fmt::Display for DisplayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DisplayGroup {
    type Err = PanelError;

    /// Accepts the label, the backend id or the short alias, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|g| {
                [g.label(), g.backend_id(), g.alias()]
                    .iter()
                    .any(|name| name.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| PanelError::UnknownGroup {
                name: s.to_string(),
            })
    }
}

/// Translate a display label to its backend identifier.
///
/// Unrecognized labels pass through unchanged.
pub fn backend_id_for_label(label: &str) -> String {
    DisplayGroup::from_label(label).map_or_else(|| label.to_string(), |g| g.backend_id().to_string())
}

/// Set of selected group labels.
///
/// Labels are unique; insertion order is kept only so request bodies are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSelection {
    labels: Vec<String>,
}

impl GroupSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the label if absent, remove it if present. Returns true if now selected.
    pub fn toggle(&mut self, label: &str) -> bool {
        if let Some(pos) = self.labels.iter().position(|l| l == label) {
            self.labels.remove(pos);
            trace!(label, "Group deselected");
            false
        } else {
            self.labels.push(label.to_string());
            trace!(label, "Group selected");
            true
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Backend identifiers for the selection, translated at request-build time.
    pub fn backend_ids(&self) -> Vec<String> {
        self.labels.iter().map(|l| backend_id_for_label(l)).collect()
    }
}
