//! LED index ranges for the range-configurable groups.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::group::DisplayGroup;
use crate::error::{PanelError, Result};

/// Start/end physical LED indices of a group.
///
/// `None` is an empty input field. `from <= to` is expected but not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedRange {
    #[serde(default, deserialize_with = "lenient_index")]
    pub from: Option<i64>,
    #[serde(default, deserialize_with = "lenient_index")]
    pub to: Option<i64>,
}

impl LedRange {
    pub const fn new(from: i64, to: i64) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Factory layout of the shelf strip. `None` for groups without a range.
    pub const fn default_for(group: DisplayGroup) -> Option<Self> {
        match group {
            DisplayGroup::ShelfTop => Some(Self::new(0, 108)),
            DisplayGroup::ShelfLeft => Some(Self::new(109, 130)),
            DisplayGroup::ShelfRight => Some(Self::new(131, 152)),
            DisplayGroup::PhotonRing => None,
        }
    }

    /// Both bounds, or the name of the first missing one.
    pub const fn bounds(&self) -> std::result::Result<(i64, i64), &'static str> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Ok((from, to)),
            (None, _) => Err("start"),
            (_, None) => Err("end"),
        }
    }

    pub const fn set(&mut self, field: RangeField, value: Option<i64>) {
        match field {
            RangeField::From => self.from = value,
            RangeField::To => self.to = value,
        }
    }
}

impl fmt::Display for LedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<i64>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
        write!(f, "{} - {}", show(self.from), show(self.to))
    }
}

/// Stored indices may be numbers or edited text: accept `5`, `"5"` and `""`.
fn lenient_index<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
        Null,
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Null) => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) => parse_index(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a range input field. Empty input is `None`.
pub fn parse_index(text: &str) -> Result<Option<i64>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| PanelError::InvalidRangeValue {
            value: text.to_string(),
        })
}

/// Which end of a range an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeField {
    From,
    To,
}

impl FromStr for RangeField {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "from" | "start" => Ok(Self::From),
            "to" | "end" => Ok(Self::To),
            other => Err(PanelError::Other(format!(
                "Unknown range field '{other}': expected from or to"
            ))),
        }
    }
}

/// Ranges keyed by group label, the shape kept in the range store.
pub type RangeMap = BTreeMap<String, LedRange>;

/// Defaults for every range-configurable group.
pub fn default_ranges() -> RangeMap {
    DisplayGroup::ALL
        .into_iter()
        .filter_map(|g| LedRange::default_for(g).map(|r| (g.label().to_string(), r)))
        .collect()
}
