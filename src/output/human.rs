//! Human-friendly output implementation using `console`.

use console::Term;
use tracing::{debug, instrument, trace};

use crate::config::Settings;
use crate::error::PanelError;
use crate::model::{DisplayGroup, EffectKind, RangeMap, Rgb};
use crate::panel::{PanelStatus, Section, Settled};
use crate::request::CommandPreview;
use crate::theme::PanelTheme;

use super::{Output, VersionInfo};

/// Styled terminal output implementation for human users.
pub struct HumanOutput {
    term: Term,
    theme: PanelTheme,
}

impl HumanOutput {
    pub fn new(term: Term) -> Self {
        debug!("Creating HumanOutput");
        Self {
            term,
            theme: PanelTheme::default(),
        }
    }

    // Terminal write errors (closed pipe) are not worth failing a command over.
    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn tagged(&self, tag: &str, style: &console::Style, message: &str) {
        self.line(&format!("{} {message}", style.apply_to(tag)));
    }

    fn header(&self, title: &str) {
        self.line(&self.theme.header.apply_to(title).to_string());
    }

    fn field(&self, label: &str, value: &str) {
        self.line(&format!(
            "  {}: {}",
            self.theme.label.apply_to(label),
            self.theme.value.apply_to(value)
        ));
    }

    fn swatch(&self, color: Rgb) -> String {
        format!("{} {}", PanelTheme::swatch(color).apply_to("██"), color.to_hex())
    }

    fn favorite_lines(&self, favorites: &[Rgb]) {
        if favorites.is_empty() {
            self.line(&format!("  {}", self.theme.muted.apply_to("(no favorites)")));
        }
        for (index, color) in favorites.iter().enumerate() {
            self.line(&format!(
                "  [{}] {}",
                self.theme.index.apply_to(index),
                self.swatch(*color)
            ));
        }
    }

    fn range_lines(&self, ranges: &RangeMap) {
        for (label, range) in ranges {
            self.field(label, &range.to_string());
        }
    }
}

impl Output for HumanOutput {
    fn success(&self, message: &str) {
        self.tagged("[OK]", &self.theme.success, message);
    }

    #[instrument(skip(self))]
    fn error(&self, error: &PanelError) {
        debug!(
            error = %error,
            recoverable = error.is_user_recoverable(),
            "Outputting error"
        );
        let term = Term::stderr();
        let _ = term.write_line(&format!(
            "{} {error}",
            self.theme.error.apply_to("[ERR]")
        ));
        if let Some(suggestion) = error.suggestion() {
            trace!(suggestion, "Adding suggestion");
            let _ = term.write_line(&format!(
                "      {}",
                self.theme.muted.apply_to(suggestion)
            ));
        }
    }

    fn warning(&self, message: &str) {
        self.tagged("[WARN]", &self.theme.warning, message);
    }

    fn info(&self, message: &str) {
        self.tagged("[INFO]", &self.theme.accent, message);
    }

    #[instrument(skip(self, results), fields(count = results.len()))]
    fn request_results(&self, results: &[Settled]) {
        for result in results {
            match &result.error {
                None => self.success(&format!("{} ({})", result.action, result.path)),
                // Already logged by the panel; keep the summary to one line.
                Some(error) => self.warning(&format!("{} failed: {error}", result.action)),
            }
        }
    }

    fn not_sent(&self, action: &str, reason: &str) {
        self.info(&format!("{action}: nothing sent ({reason})"));
    }

    fn command_preview(&self, preview: &CommandPreview) {
        self.header("DRY RUN");
        self.field("Action", preview.action);
        self.field("Request", &format!("{} {}", preview.method, preview.path));
        if let Some(body) = &preview.body {
            let body = serde_json::to_string(body).unwrap_or_default();
            self.field("Body", &body);
        }
    }

    fn favorites(&self, favorites: &[Rgb]) {
        self.header("Favorites");
        self.favorite_lines(favorites);
    }

    fn ranges(&self, ranges: &RangeMap) {
        self.header("Group Ranges");
        self.range_lines(ranges);
    }

    fn range_status(&self, group: DisplayGroup, message: &str, ok: bool) {
        if ok {
            self.success(message);
        } else {
            self.tagged("[ERR]", &self.theme.error, &format!("{}: {message}", group.label()));
        }
    }

    fn panel_status(&self, status: &PanelStatus) {
        let visible = |section: Section| status.sections.get(&section).copied().unwrap_or(true);
        let collapsed = |section: Section| {
            self.line(&format!(
                "{} {}",
                self.theme.muted.apply_to("▸"),
                self.theme.muted.apply_to(section.title())
            ));
        };

        if visible(Section::Power) {
            self.header(Section::Power.title());
            self.field("Requests in flight", &status.in_flight.to_string());
        } else {
            collapsed(Section::Power);
        }

        if visible(Section::Solid) {
            self.header(Section::Solid.title());
            let groups: Vec<String> = DisplayGroup::ALL
                .iter()
                .map(|g| {
                    if status.selected.iter().any(|s| s == g.label()) {
                        self.theme.group_selected.apply_to(format!("[x] {g}")).to_string()
                    } else {
                        self.theme.group.apply_to(format!("[ ] {g}")).to_string()
                    }
                })
                .collect();
            self.line(&format!("  {}", groups.join("  ")));
            if let Ok(color) = Rgb::from_hex(&status.color) {
                self.field("Color", &self.swatch(color));
            }
            let favorites: Vec<Rgb> = status
                .favorites
                .iter()
                .filter_map(|hex| Rgb::from_hex(hex).ok())
                .collect();
            self.line(&format!("  {}:", self.theme.label.apply_to("Favorites")));
            self.favorite_lines(&favorites);
        } else {
            collapsed(Section::Solid);
        }

        if visible(Section::Effects) {
            self.header(Section::Effects.title());
            self.field("Effect", status.effect.as_str());
            self.field("Speed", &format!("{} sec", status.speed));
            if let Ok(serde_json::Value::Object(params)) = serde_json::to_value(&status.effect_params) {
                for (name, value) in params {
                    self.field(&name, &value.to_string());
                }
            }
        } else {
            collapsed(Section::Effects);
        }

        if visible(Section::GroupConfig) {
            self.header(Section::GroupConfig.title());
            for (label, range) in &status.ranges {
                match status.range_messages.get(label) {
                    Some(message) => self.field(
                        label,
                        &format!("{range}  {}", self.theme.muted.apply_to(message)),
                    ),
                    None => self.field(label, &range.to_string()),
                }
            }
        } else {
            collapsed(Section::GroupConfig);
        }
    }

    fn groups(&self, groups: &[DisplayGroup]) {
        self.header("Display Groups");
        for group in groups {
            let note = if group.is_range_configurable() { "" } else { "  (no range)" };
            self.field(group.label(), &format!("{}{note}", group.backend_id()));
        }
    }

    fn effects(&self, effects: &[EffectKind]) {
        self.header("Effects");
        for effect in effects {
            let fields = effect.param_shape().fields();
            let params = if fields.is_empty() {
                "speed".to_string()
            } else {
                format!("speed, {}", fields.join(", "))
            };
            self.field(effect.as_str(), &params);
        }
    }

    fn settings(&self, settings: &Settings) {
        self.header("Configuration");
        self.field("Controller", &settings.base_url);
        let timeout = settings
            .timeout_secs
            .map_or_else(|| "transport default".to_string(), |secs| format!("{secs}s"));
        self.field("Timeout", &timeout);
        self.field("Ranges", &settings.ranges_path.display().to_string());
        let config = settings
            .config_path
            .as_ref()
            .map_or_else(|| "(none)".to_string(), |path| path.display().to_string());
        self.field("Config file", &config);
    }

    fn version_info(&self, info: &VersionInfo) {
        self.line(&format!(
            "{} {}",
            self.theme.accent.apply_to("dotstar"),
            info.version
        ));
        let dirty = if info.git_dirty { " (dirty)" } else { "" };
        self.field("git", &format!("{}{dirty}", info.git_sha));
        self.field("built", info.build_timestamp);
        self.field("rustc", info.rustc_version);
        self.field("target", info.target);
    }
}
