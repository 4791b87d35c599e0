//! Outbound controller commands and the pure functions that build them.
//!
//! Builders return `None` where the panel must not send anything, e.g. when
//! no group is selected.

use std::fmt;

use serde::Serialize;
use serde_json::{Value, json};

use crate::model::{DisplayGroup, EffectKind, EffectParams, EffectSettings, GroupSelection, Rgb, Speed};

/// HTTP method of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// One request to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetColor {
        groups: Vec<String>,
        color: Rgb,
    },
    StartEffect {
        groups: Vec<String>,
        effect: EffectKind,
        speed: Speed,
        params: EffectParams,
    },
    StopGroups {
        groups: Vec<String>,
    },
    StopAll,
    UpdateRange {
        group: DisplayGroup,
        start: i64,
        end: i64,
    },
    FetchFavorites,
    ReplaceFavorites {
        favorites: Vec<Rgb>,
    },
}

impl Command {
    pub const fn method(&self) -> Method {
        match self {
            Self::FetchFavorites => Method::Get,
            _ => Method::Post,
        }
    }

    pub const fn path(&self) -> &'static str {
        match self {
            Self::SetColor { .. } => "/set_color",
            Self::StartEffect { .. } => "/start_effect",
            Self::StopGroups { .. } => "/off",
            Self::StopAll => "/off_all",
            Self::UpdateRange { .. } => "/update_group_range",
            Self::FetchFavorites | Self::ReplaceFavorites { .. } => "/favorites",
        }
    }

    /// Reads or replaces the controller's favorites list.
    pub const fn touches_favorites(&self) -> bool {
        matches!(self, Self::FetchFavorites | Self::ReplaceFavorites { .. })
    }

    /// Short action name for logs and output.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetColor { .. } => "set_color",
            Self::StartEffect { .. } => "start_effect",
            Self::StopGroups { .. } => "stop_groups",
            Self::StopAll => "stop_all",
            Self::UpdateRange { .. } => "update_range",
            Self::FetchFavorites => "fetch_favorites",
            Self::ReplaceFavorites { .. } => "replace_favorites",
        }
    }

    /// JSON request body. `None` for GET.
    pub fn body(&self) -> Option<Value> {
        let body = match self {
            Self::SetColor { groups, color } => json!({ "groups": groups, "color": color }),
            Self::StartEffect {
                groups,
                effect,
                speed,
                params,
            } => {
                let mut body = json!({ "groups": groups, "effect": effect, "speed": speed });
                if let (Some(base), Ok(Value::Object(extra))) =
                    (body.as_object_mut(), serde_json::to_value(params))
                {
                    base.extend(extra);
                }
                body
            }
            Self::StopGroups { groups } => json!({ "groups": groups }),
            Self::StopAll => json!({}),
            Self::UpdateRange { group, start, end } => {
                json!({ "group": group.backend_id(), "start": start, "end": end })
            }
            Self::FetchFavorites => return None,
            Self::ReplaceFavorites { favorites } => json!(favorites),
        };
        Some(body)
    }
}

/// Serializable view of a command, used for dry runs and robot output.
#[derive(Debug, Clone, Serialize)]
pub struct CommandPreview {
    pub action: &'static str,
    pub method: Method,
    pub path: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl From<&Command> for CommandPreview {
    fn from(command: &Command) -> Self {
        Self {
            action: command.name(),
            method: command.method(),
            path: command.path(),
            body: command.body(),
        }
    }
}

pub fn set_color(selection: &GroupSelection, color: Rgb) -> Option<Command> {
    if selection.is_empty() {
        return None;
    }
    Some(Command::SetColor {
        groups: selection.backend_ids(),
        color,
    })
}

pub fn start_effect(selection: &GroupSelection, settings: &EffectSettings) -> Option<Command> {
    if selection.is_empty() {
        return None;
    }
    Some(Command::StartEffect {
        groups: selection.backend_ids(),
        effect: settings.effect,
        speed: settings.speed,
        params: settings.params(),
    })
}

pub fn stop_selected(selection: &GroupSelection) -> Option<Command> {
    if selection.is_empty() {
        return None;
    }
    Some(Command::StopGroups {
        groups: selection.backend_ids(),
    })
}

/// Always sent, regardless of selection.
pub const fn stop_all() -> Command {
    Command::StopAll
}

pub const fn update_range(group: DisplayGroup, start: i64, end: i64) -> Command {
    Command::UpdateRange { group, start, end }
}

pub fn replace_favorites(favorites: Vec<Rgb>) -> Command {
    Command::ReplaceFavorites { favorites }
}
