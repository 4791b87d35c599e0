//! Mock controller for testing without a device on the network.
//!
//! Records every command it receives and answers the way the real
//! controller does: favorites are kept in memory, range updates echo the
//! accepted range, everything else returns a status object.
//!
//! # Example
//!
//! ```rust,ignore
//! use dotstar::transport::mock::{MockController, MockReply};
//!
//! let mock = MockController::new().with_favorites(vec![Rgb(255, 0, 0)]);
//! mock.script("/update_group_range", MockReply::Status(400, "Invalid range values".into()));
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, trace};

use super::Transport;
use crate::error::{PanelError, Result};
use crate::model::Rgb;
use crate::request::Command;

/// A scripted answer for the next command sent to a path.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Success with this JSON body.
    Json(Value),
    /// Non-success status with a controller error message.
    Status(u16, String),
    /// Connection failure.
    Unreachable,
}

/// Mock controller that records commands for later assertion.
#[derive(Debug, Default)]
pub struct MockController {
    sent: Mutex<Vec<Command>>,
    favorites: Mutex<Vec<Rgb>>,
    scripted: Mutex<HashMap<&'static str, VecDeque<MockReply>>>,
    delays: Mutex<HashMap<&'static str, Duration>>,
}

impl MockController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the controller's stored favorites.
    #[must_use]
    pub fn with_favorites(self, favorites: Vec<Rgb>) -> Self {
        *self.favorites.lock().expect("favorites lock poisoned") = favorites;
        self
    }

    /// Hold every reply for `path` back by `delay`.
    #[must_use]
    pub fn with_delay(self, path: &'static str, delay: Duration) -> Self {
        self.delays
            .lock()
            .expect("delays lock poisoned")
            .insert(path, delay);
        self
    }

    /// Queue a reply for the next command sent to `path`.
    pub fn script(&self, path: &'static str, reply: MockReply) {
        debug!(path, ?reply, "Scripting mock reply");
        self.scripted
            .lock()
            .expect("scripted lock poisoned")
            .entry(path)
            .or_default()
            .push_back(reply);
    }

    /// Favorites as the controller currently stores them.
    pub fn stored_favorites(&self) -> Vec<Rgb> {
        self.favorites.lock().expect("favorites lock poisoned").clone()
    }

    /// All commands received so far, in arrival order.
    pub fn sent(&self) -> Vec<Command> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("sent lock poisoned").len()
    }

    /// Commands received for one path.
    pub fn sent_to(&self, path: &str) -> Vec<Command> {
        self.sent()
            .into_iter()
            .filter(|c| c.path() == path)
            .collect()
    }

    pub fn clear_sent(&self) {
        self.sent.lock().expect("sent lock poisoned").clear();
    }

    /// Assert the exact sequence of commands received.
    ///
    /// # Panics
    ///
    /// Panics if the recorded commands differ from `expected`.
    pub fn assert_sent(&self, expected: &[Command]) {
        assert_eq!(self.sent(), expected, "mock controller received different commands");
    }

    /// Assert that no command reached the controller.
    ///
    /// # Panics
    ///
    /// Panics if any command was recorded.
    pub fn assert_nothing_sent(&self) {
        let sent = self.sent();
        assert!(sent.is_empty(), "expected no commands, got {sent:?}");
    }

    fn next_scripted(&self, path: &'static str) -> Option<MockReply> {
        self.scripted
            .lock()
            .expect("scripted lock poisoned")
            .get_mut(path)
            .and_then(VecDeque::pop_front)
    }

    /// What the real controller answers for a successful command.
    fn default_reply(&self, command: &Command) -> Value {
        match command {
            Command::SetColor { groups, color } => {
                json!({ "status": "color set", "groups": groups, "color": color })
            }
            Command::StartEffect { groups, effect, .. } => {
                json!({ "status": "effect started", "effect": effect, "groups": groups })
            }
            Command::StopGroups { groups } => json!({ "status": "turned off", "groups": groups }),
            Command::StopAll => json!({ "status": "all lights turned off" }),
            Command::UpdateRange { group, start, end } => json!({
                "status": "updated",
                "group": group.backend_id(),
                "range": [start, end],
            }),
            Command::FetchFavorites => json!(self.stored_favorites()),
            Command::ReplaceFavorites { favorites } => {
                *self.favorites.lock().expect("favorites lock poisoned") = favorites.clone();
                json!({ "status": "updated", "favorites": favorites })
            }
        }
    }

    fn respond(&self, command: &Command) -> Result<Value> {
        let path = command.path();
        trace!(action = command.name(), path, "Mock received command");
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push(command.clone());

        match self.next_scripted(path) {
            None => Ok(self.default_reply(command)),
            Some(MockReply::Json(value)) => Ok(value),
            Some(MockReply::Status(status, message)) => Err(PanelError::Status {
                path: path.to_string(),
                status,
                message,
            }),
            Some(MockReply::Unreachable) => Err(PanelError::Transport {
                path: path.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

impl Transport for MockController {
    fn send(&self, command: &Command) -> impl Future<Output = Result<Value>> + Send {
        let delay = self
            .delays
            .lock()
            .expect("delays lock poisoned")
            .get(command.path())
            .copied();
        let outcome = self.respond(command);

        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            outcome
        }
    }
}
