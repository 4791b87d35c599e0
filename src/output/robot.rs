//! Robot mode JSON output implementation.

use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument, trace};

use crate::config::Settings;
use crate::error::PanelError;
use crate::model::{DisplayGroup, EffectKind, RangeMap, Rgb};
use crate::panel::{PanelStatus, Settled};
use crate::request::CommandPreview;

use super::{Output, RobotFormat, VersionInfo};

/// JSON output implementation for agents and scripting.
pub struct RobotOutput {
    format: RobotFormat,
}

impl RobotOutput {
    #[instrument]
    pub fn new(format: RobotFormat) -> Self {
        debug!(?format, "Creating RobotOutput");
        Self { format }
    }

    fn render<T: Serialize + ?Sized>(&self, data: &T) -> String {
        match self.format {
            RobotFormat::Json => serde_json::to_string_pretty(data),
            RobotFormat::JsonCompact => serde_json::to_string(data),
        }
        .expect("serialization failed")
    }

    /// Output any serializable data as JSON to stdout.
    fn output_json<T: Serialize + ?Sized>(&self, data: &T) {
        let json = self.render(data);
        trace!(json_len = json.len(), "JSON serialized");
        println!("{json}");
    }
}

impl Output for RobotOutput {
    fn success(&self, message: &str) {
        self.output_json(&json!({ "success": true, "message": message }));
    }

    #[instrument(skip(self))]
    fn error(&self, error: &PanelError) {
        debug!(error = %error, "Robot: error");
        let json = serde_json::to_string_pretty(&json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        }))
        .expect("serialization failed");
        eprintln!("{json}");
    }

    fn warning(&self, message: &str) {
        self.output_json(&json!({ "warning": true, "message": message }));
    }

    fn info(&self, message: &str) {
        self.output_json(&json!({ "info": true, "message": message }));
    }

    #[instrument(skip(self, results), fields(count = results.len()))]
    fn request_results(&self, results: &[Settled]) {
        let ok = results.iter().all(|r| r.ok);
        self.output_json(&json!({ "ok": ok, "requests": results }));
    }

    fn not_sent(&self, action: &str, reason: &str) {
        self.output_json(&json!({ "action": action, "sent": false, "reason": reason }));
    }

    fn command_preview(&self, preview: &CommandPreview) {
        self.output_json(&json!({ "dry_run": true, "request": preview }));
    }

    fn favorites(&self, favorites: &[Rgb]) {
        let entries: Vec<_> = favorites
            .iter()
            .enumerate()
            .map(|(index, rgb)| json!({ "index": index, "rgb": rgb, "hex": rgb.to_hex() }))
            .collect();
        self.output_json(&entries);
    }

    fn ranges(&self, ranges: &RangeMap) {
        self.output_json(ranges);
    }

    fn range_status(&self, group: DisplayGroup, message: &str, ok: bool) {
        self.output_json(&json!({
            "group": group.label(),
            "backend_id": group.backend_id(),
            "ok": ok,
            "message": message,
        }));
    }

    fn panel_status(&self, status: &PanelStatus) {
        self.output_json(status);
    }

    fn groups(&self, groups: &[DisplayGroup]) {
        let entries: Vec<_> = groups
            .iter()
            .map(|g| {
                json!({
                    "label": g.label(),
                    "backend_id": g.backend_id(),
                    "range_configurable": g.is_range_configurable(),
                })
            })
            .collect();
        self.output_json(&entries);
    }

    fn effects(&self, effects: &[EffectKind]) {
        let entries: Vec<_> = effects
            .iter()
            .map(|e| json!({ "name": e.as_str(), "parameters": e.param_shape().fields() }))
            .collect();
        self.output_json(&entries);
    }

    fn settings(&self, settings: &Settings) {
        self.output_json(settings);
    }

    fn version_info(&self, info: &VersionInfo) {
        self.output_json(info);
    }
}
