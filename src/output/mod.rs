//! Output mode abstraction for robot and human output.

use console::Term;
use serde::Serialize;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::PanelError;
use crate::model::{DisplayGroup, EffectKind, RangeMap, Rgb};
use crate::panel::{PanelStatus, Settled};
use crate::request::CommandPreview;

pub mod human;
pub mod robot;

pub use human::HumanOutput;
pub use robot::RobotOutput;

/// Build metadata shown by `dotstar version`.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_sha: &'static str,
    pub git_dirty: bool,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
    pub target: &'static str,
}

/// JSON formatting options for robot mode.
#[derive(Debug, Clone, Copy)]
pub enum RobotFormat {
    /// Pretty-printed JSON (default for --robot).
    Json,
    /// Single-line JSON (--format=json-compact).
    JsonCompact,
}

/// Determines how command output is rendered.
#[derive(Debug)]
pub enum OutputMode {
    /// JSON output for agents and scripting.
    Robot(RobotFormat),
    /// Styled terminal output for human users.
    Human(Term),
}

impl OutputMode {
    /// Create OutputMode from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.use_json() {
            let format = if cli.use_compact_json() {
                RobotFormat::JsonCompact
            } else {
                RobotFormat::Json
            };
            Self::Robot(format)
        } else {
            if cli.no_color {
                console::set_colors_enabled(false);
            }
            Self::Human(Term::stdout())
        }
    }

    /// Convert into the appropriate Output implementation.
    pub fn into_output(self) -> Box<dyn Output> {
        match self {
            Self::Robot(format) => Box::new(RobotOutput::new(format)),
            Self::Human(term) => Box::new(HumanOutput::new(term)),
        }
    }
}

/// Trait for all output operations.
///
/// Commands call these methods without knowing the output mode.
pub trait Output {
    // Basic messages
    fn success(&self, message: &str);
    fn error(&self, error: &PanelError);
    fn warning(&self, message: &str);
    fn info(&self, message: &str);

    // Requests
    /// Results of dispatched requests once they settled.
    fn request_results(&self, results: &[Settled]);
    /// An action that sends nothing, e.g. no group selected.
    fn not_sent(&self, action: &str, reason: &str);
    /// Dry-run view of a request.
    fn command_preview(&self, preview: &CommandPreview);

    // Panel state
    fn favorites(&self, favorites: &[Rgb]);
    fn ranges(&self, ranges: &RangeMap);
    fn range_status(&self, group: DisplayGroup, message: &str, ok: bool);
    fn panel_status(&self, status: &PanelStatus);

    // Catalogs
    fn groups(&self, groups: &[DisplayGroup]);
    fn effects(&self, effects: &[EffectKind]);

    // Metadata
    fn settings(&self, settings: &Settings);
    fn version_info(&self, info: &VersionInfo);
}
