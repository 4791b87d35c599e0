//! Error types for control panel operations.

use thiserror::Error;

/// Primary error type for control panel operations.
#[derive(Error, Debug)]
pub enum PanelError {
    // Input errors
    #[error("Invalid color '{input}': expected 6 hex digits (e.g. ff9329)")]
    InvalidColor { input: String },

    #[error("Unknown group: {name}")]
    UnknownGroup { name: String },

    #[error("Unknown effect: {name}")]
    UnknownEffect { name: String },

    #[error("Group '{group}' has no configurable LED range")]
    NotRangeConfigurable { group: String },

    #[error("Invalid range value '{value}': expected an integer")]
    InvalidRangeValue { value: String },

    #[error("Range for '{group}' is missing its {field} value")]
    MissingRangeField { group: String, field: &'static str },

    #[error("No favorite at index {index} ({len} saved)")]
    FavoriteIndex { index: usize, len: usize },

    #[error("Favorites have not been loaded from the controller")]
    FavoritesNotLoaded,

    #[error("Favorites are busy: {pending} request(s) still in flight")]
    FavoritesBusy { pending: usize },

    // Controller errors
    #[error("Request to {path} failed: {reason}")]
    Transport { path: String, reason: String },

    #[error("Controller rejected {path} with status {status}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from {path}: {reason}")]
    InvalidResponse { path: String, reason: String },

    #[error("{failed} of {total} request(s) failed")]
    RequestsFailed { failed: usize, total: usize },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Range store error: {0}")]
    Storage(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl PanelError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidColor { .. }
                | Self::UnknownGroup { .. }
                | Self::UnknownEffect { .. }
                | Self::NotRangeConfigurable { .. }
                | Self::InvalidRangeValue { .. }
                | Self::MissingRangeField { .. }
                | Self::FavoriteIndex { .. }
                | Self::FavoritesNotLoaded
                | Self::FavoritesBusy { .. }
                | Self::Transport { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidColor { .. } => Some("Use a hex color such as ff9329 or #ff9329"),
            Self::UnknownGroup { .. } => Some("Run: dotstar groups"),
            Self::UnknownEffect { .. } => Some("Run: dotstar effects"),
            Self::NotRangeConfigurable { .. } => {
                Some("Only Shelf Top, Shelf Left and Shelf Right have LED ranges")
            }
            Self::MissingRangeField { .. } => Some("Please enter both start and end values."),
            Self::FavoriteIndex { .. } => Some("Run: dotstar favorites list"),
            Self::FavoritesNotLoaded => Some("Run: fav refresh"),
            Self::FavoritesBusy { .. } => Some("Wait for the pending favorites request, then retry"),
            Self::Transport { .. } => {
                Some("Check that the controller is reachable, or pass --url / DOTSTAR_URL")
            }
            Self::ConfigNotFound { .. } => Some("Create the file or drop --config"),
            Self::RequestsFailed { .. } => Some("Run with -v to see request logs"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using PanelError.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| PanelError::Other(format!("{}: {e}", f().into())))
    }
}
