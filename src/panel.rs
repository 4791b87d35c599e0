//! Control panel view-model.
//!
//! [`ControlPanel`] owns all UI state and is driven from a single task.
//! Each user action that talks to the controller is dispatched as its own
//! spawned task; results come back over a channel as [`Completion`]s and
//! are applied by [`ControlPanel::next_completion`] in whatever order they
//! arrive. Tasks never touch panel state themselves.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::{PanelError, Result};
use crate::model::{
    DisplayGroup, EffectKind, EffectParams, EffectSettings, GroupSelection, LedRange, RangeField,
    RangeMap, Rgb, parse_index,
};
use crate::request::{self, Command};
use crate::storage::RangeStore;
use crate::transport::Transport;

/// Identifies one dispatched request in logs and completions.
pub type RequestId = u64;

pub const RANGE_MISSING_MESSAGE: &str = "Please enter both start and end values.";
pub const RANGE_FAILED_MESSAGE: &str = "Error updating group range.";

/// Collapsible panel sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Power,
    Solid,
    Effects,
    GroupConfig,
}

impl Section {
    pub const ALL: [Self; 4] = [Self::Power, Self::Solid, Self::Effects, Self::GroupConfig];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Power => "Power",
            Self::Solid => "Solid Color",
            Self::Effects => "Effects",
            Self::GroupConfig => "Group Ranges",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Section {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "power" => Ok(Self::Power),
            "solid" | "color" => Ok(Self::Solid),
            "effects" | "effect" => Ok(Self::Effects),
            "ranges" | "groups" | "group_config" | "group-config" => Ok(Self::GroupConfig),
            other => Err(PanelError::Other(format!("Unknown section: {other}"))),
        }
    }
}

/// Result of a dispatched command, delivered back to the panel.
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub command: Command,
    pub outcome: Result<Value>,
}

/// What applying a completion did, for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct Settled {
    pub id: RequestId,
    pub action: &'static str,
    pub path: &'static str,
    pub ok: bool,
    /// Set for range updates, whose outcome is shown per group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<DisplayGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Snapshot of the panel for display.
#[derive(Debug, Clone, Serialize)]
pub struct PanelStatus {
    pub selected: Vec<String>,
    pub color: String,
    pub effect: EffectKind,
    pub speed: String,
    pub effect_params: EffectParams,
    pub favorites: Vec<String>,
    pub ranges: RangeMap,
    pub range_messages: BTreeMap<String, String>,
    pub sections: BTreeMap<Section, bool>,
    pub in_flight: usize,
}

/// The panel's state container.
pub struct ControlPanel<T: Transport> {
    transport: Arc<T>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    next_id: RequestId,
    in_flight: usize,

    selection: GroupSelection,
    color: Rgb,
    effect: EffectSettings,
    favorites: Vec<Rgb>,
    /// Set by the first successful fetch; edits before that would wipe the controller's list.
    favorites_loaded: bool,
    /// Fetches and pushes to `/favorites` not yet applied.
    favorites_pending: usize,
    ranges: RangeMap,
    range_messages: BTreeMap<DisplayGroup, String>,
    sections: BTreeMap<Section, bool>,
    store: RangeStore,
}

impl<T: Transport> ControlPanel<T> {
    /// Create a panel with ranges loaded from `store`.
    ///
    /// Favorites start empty; call [`Self::fetch_favorites`] to load them.
    pub fn new(transport: Arc<T>, store: RangeStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let ranges = store.load();
        Self {
            transport,
            tx,
            rx,
            next_id: 1,
            in_flight: 0,
            selection: GroupSelection::new(),
            color: Rgb::WHITE,
            effect: EffectSettings::default(),
            favorites: Vec::new(),
            favorites_loaded: false,
            favorites_pending: 0,
            ranges,
            range_messages: BTreeMap::new(),
            sections: Section::ALL.into_iter().map(|s| (s, true)).collect(),
            store,
        }
    }

    // === Dispatch ===

    /// Send `command` on its own task. Returns its request id.
    pub fn dispatch(&mut self, command: Command) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        self.in_flight += 1;

        debug!(
            id,
            action = command.name(),
            method = %command.method(),
            path = command.path(),
            "Dispatching request"
        );

        if command.touches_favorites() {
            self.favorites_pending += 1;
        }

        let transport = Arc::clone(&self.transport);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = transport.send(&command).await;
            // The receiver lives as long as the panel; a send error means it is gone.
            let _ = tx.send(Completion {
                id,
                command,
                outcome,
            });
        });
        id
    }

    /// Number of dispatched requests whose completion has not been applied.
    pub const fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wait for the next completion and apply it. `None` if nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Settled> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(self.apply(completion))
    }

    /// Apply completions until nothing is in flight.
    pub async fn settle(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Some(done) = self.next_completion().await {
            settled.push(done);
        }
        settled
    }

    /// Apply a completion to panel state.
    pub fn apply(&mut self, completion: Completion) -> Settled {
        let Completion {
            id,
            command,
            outcome,
        } = completion;
        let action = command.name();
        let path = command.path();
        let group = match &command {
            Command::UpdateRange { group, .. } => Some(*group),
            _ => None,
        };
        if command.touches_favorites() {
            self.favorites_pending = self.favorites_pending.saturating_sub(1);
        }

        let error = match (command, outcome) {
            (Command::FetchFavorites, Ok(reply)) => match parse_favorites(&reply) {
                Some(favorites) => {
                    info!(id, count = favorites.len(), "Favorites loaded");
                    self.favorites = favorites;
                    self.favorites_loaded = true;
                    None
                }
                None => Some(format!("Unexpected favorites payload: {reply}")),
            },
            (Command::ReplaceFavorites { favorites }, Ok(reply)) => {
                // Adopt what the controller says it stored; fall back to what was pushed.
                let accepted = reply
                    .get("favorites")
                    .and_then(parse_favorites)
                    .unwrap_or(favorites);
                info!(id, count = accepted.len(), "Favorites updated");
                self.favorites = accepted;
                None
            }
            (Command::UpdateRange { group, .. }, Ok(reply)) => match parse_range_reply(&reply) {
                Some((start, end)) => {
                    info!(id, group = %group, start, end, "Group range updated");
                    self.range_messages
                        .insert(group, format!("Updated {}: {start} - {end}", group.label()));
                    None
                }
                None => {
                    self.range_messages
                        .insert(group, RANGE_FAILED_MESSAGE.to_string());
                    Some(format!("Unexpected range payload: {reply}"))
                }
            },
            (Command::UpdateRange { group, .. }, Err(e)) => {
                self.range_messages
                    .insert(group, RANGE_FAILED_MESSAGE.to_string());
                Some(e.to_string())
            }
            (_, Ok(_)) => None,
            (_, Err(e)) => Some(e.to_string()),
        };

        if let Some(error) = &error {
            warn!(id, action, path, %error, "Request failed");
        } else {
            debug!(id, action, path, "Request completed");
        }

        Settled {
            id,
            action,
            path,
            ok: error.is_none(),
            group,
            error,
        }
    }

    // === Group selection ===

    /// Toggle a group label. Returns true if it is now selected.
    pub fn toggle_group(&mut self, label: &str) -> bool {
        self.selection.toggle(label)
    }

    pub const fn selection(&self) -> &GroupSelection {
        &self.selection
    }

    // === Solid color ===

    pub fn set_color(&mut self, hex: &str) -> Result<()> {
        self.color = Rgb::from_hex(hex)?;
        Ok(())
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Send the active color to the selected groups. No-op without a selection.
    pub fn send_color(&mut self) -> Option<RequestId> {
        let command = request::set_color(&self.selection, self.color)?;
        Some(self.dispatch(command))
    }

    // === Effects ===

    pub const fn effect_settings(&self) -> &EffectSettings {
        &self.effect
    }

    pub const fn effect_settings_mut(&mut self) -> &mut EffectSettings {
        &mut self.effect
    }

    pub fn set_effect(&mut self, effect: EffectKind) {
        self.effect.effect = effect;
    }

    /// Start the chosen effect on the selected groups. No-op without a selection.
    pub fn start_effect(&mut self) -> Option<RequestId> {
        let command = request::start_effect(&self.selection, &self.effect)?;
        Some(self.dispatch(command))
    }

    // === Stop ===

    /// Stop effects on the selected groups. No-op without a selection.
    pub fn stop_selected(&mut self) -> Option<RequestId> {
        let command = request::stop_selected(&self.selection)?;
        Some(self.dispatch(command))
    }

    /// Reset every group on the controller, whatever is selected.
    pub fn stop_all(&mut self) -> RequestId {
        self.dispatch(request::stop_all())
    }

    // === Favorites ===

    pub fn favorites(&self) -> &[Rgb] {
        &self.favorites
    }

    /// True once a fetch has succeeded.
    pub const fn favorites_loaded(&self) -> bool {
        self.favorites_loaded
    }

    pub fn fetch_favorites(&mut self) -> RequestId {
        self.dispatch(Command::FetchFavorites)
    }

    /// Push the favorites plus the active color.
    ///
    /// The local list changes only once the controller accepts it.
    pub fn add_favorite(&mut self) -> Result<RequestId> {
        self.ensure_favorites_editable()?;
        let mut updated = self.favorites.clone();
        updated.push(self.color);
        Ok(self.dispatch(request::replace_favorites(updated)))
    }

    /// Push the favorites without the entry at `index`.
    pub fn remove_favorite(&mut self, index: usize) -> Result<RequestId> {
        self.ensure_favorites_editable()?;
        if index >= self.favorites.len() {
            return Err(PanelError::FavoriteIndex {
                index,
                len: self.favorites.len(),
            });
        }
        let mut updated = self.favorites.clone();
        updated.remove(index);
        Ok(self.dispatch(request::replace_favorites(updated)))
    }

    /// Each push replaces the whole list, so it must start from the
    /// controller's list with no other favorites request outstanding.
    fn ensure_favorites_editable(&self) -> Result<()> {
        if self.favorites_pending > 0 {
            return Err(PanelError::FavoritesBusy {
                pending: self.favorites_pending,
            });
        }
        if !self.favorites_loaded {
            return Err(PanelError::FavoritesNotLoaded);
        }
        Ok(())
    }

    /// Copy a favorite into the active color.
    pub fn select_favorite(&mut self, index: usize) -> Result<Rgb> {
        let favorite = *self.favorites.get(index).ok_or(PanelError::FavoriteIndex {
            index,
            len: self.favorites.len(),
        })?;
        self.color = favorite;
        Ok(favorite)
    }

    // === LED ranges ===

    pub const fn ranges(&self) -> &RangeMap {
        &self.ranges
    }

    pub fn range(&self, group: DisplayGroup) -> Option<LedRange> {
        self.ranges
            .get(group.label())
            .copied()
            .or_else(|| LedRange::default_for(group))
    }

    pub fn range_message(&self, group: DisplayGroup) -> Option<&str> {
        self.range_messages.get(&group).map(String::as_str)
    }

    /// Edit one end of a group's range from input text and persist all ranges.
    pub fn edit_range(&mut self, group: DisplayGroup, field: RangeField, text: &str) -> Result<()> {
        let mut range = self.configurable_range(group)?;
        range.set(field, parse_index(text)?);
        // Only keep the edit once it is on disk.
        let mut ranges = self.ranges.clone();
        ranges.insert(group.label().to_string(), range);
        self.store.save(&ranges)?;
        self.ranges = ranges;
        Ok(())
    }

    /// Send a group's stored range to the controller.
    ///
    /// With an empty field the inline message is set and nothing is sent.
    pub fn update_range(&mut self, group: DisplayGroup) -> Result<Option<RequestId>> {
        let range = self.configurable_range(group)?;
        match range.bounds() {
            Ok((start, end)) => Ok(Some(self.dispatch(request::update_range(group, start, end)))),
            Err(field) => {
                debug!(group = %group, field, "Range update skipped, field is empty");
                self.range_messages
                    .insert(group, RANGE_MISSING_MESSAGE.to_string());
                Ok(None)
            }
        }
    }

    fn configurable_range(&self, group: DisplayGroup) -> Result<LedRange> {
        if !group.is_range_configurable() {
            return Err(PanelError::NotRangeConfigurable {
                group: group.label().to_string(),
            });
        }
        self.range(group)
            .ok_or_else(|| PanelError::NotRangeConfigurable {
                group: group.label().to_string(),
            })
    }

    // === Sections ===

    /// Flip a section's visibility. Returns true if it is now visible.
    pub fn toggle_section(&mut self, section: Section) -> bool {
        let visible = self.sections.entry(section).or_insert(true);
        *visible = !*visible;
        *visible
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.sections.get(&section).copied().unwrap_or(true)
    }

    pub fn status(&self) -> PanelStatus {
        PanelStatus {
            selected: self.selection.labels().to_vec(),
            color: self.color.to_hex(),
            effect: self.effect.effect,
            speed: self.effect.speed.formatted(),
            effect_params: self.effect.params(),
            favorites: self.favorites.iter().map(|c| c.to_hex()).collect(),
            ranges: self.ranges.clone(),
            range_messages: self
                .range_messages
                .iter()
                .map(|(g, m)| (g.label().to_string(), m.clone()))
                .collect(),
            sections: self.sections.clone(),
            in_flight: self.in_flight,
        }
    }
}

fn parse_favorites(value: &Value) -> Option<Vec<Rgb>> {
    serde_json::from_value(value.clone()).ok()
}

fn parse_range_reply(value: &Value) -> Option<(i64, i64)> {
    let range = value.get("range")?.as_array()?;
    match range.as_slice() {
        [start, end] => Some((start.as_i64()?, end.as_i64()?)),
        _ => None,
    }
}
