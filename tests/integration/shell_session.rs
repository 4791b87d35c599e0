//! Integration tests for scripted interactive sessions.

use std::cell::RefCell;
use std::sync::Arc;

use tempfile::TempDir;

use dotstar::config::Settings;
use dotstar::error::PanelError;
use dotstar::model::{DisplayGroup, EffectKind, RangeMap, Rgb};
use dotstar::output::{Output, VersionInfo};
use dotstar::panel::{ControlPanel, PanelStatus, Settled};
use dotstar::request::{Command, CommandPreview};
use dotstar::shell;
use dotstar::storage::RangeStore;
use dotstar::transport::mock::{MockController, MockReply};

/// Output that records one line per call.
#[derive(Default)]
struct RecordingOutput {
    lines: RefCell<Vec<String>>,
}

impl RecordingOutput {
    fn push(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }

    fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }
}

impl Output for RecordingOutput {
    fn success(&self, message: &str) {
        self.push(format!("success: {message}"));
    }

    fn error(&self, error: &PanelError) {
        self.push(format!("error: {error}"));
    }

    fn warning(&self, message: &str) {
        self.push(format!("warning: {message}"));
    }

    fn info(&self, message: &str) {
        self.push(format!("info: {message}"));
    }

    fn request_results(&self, results: &[Settled]) {
        for result in results {
            self.push(format!("request: {} ok={}", result.action, result.ok));
        }
    }

    fn not_sent(&self, action: &str, reason: &str) {
        self.push(format!("not sent: {action} ({reason})"));
    }

    fn command_preview(&self, preview: &CommandPreview) {
        self.push(format!("preview: {}", preview.path));
    }

    fn favorites(&self, favorites: &[Rgb]) {
        let hex: Vec<String> = favorites.iter().map(|c| c.to_hex()).collect();
        self.push(format!("favorites: {}", hex.join(",")));
    }

    fn ranges(&self, ranges: &RangeMap) {
        self.push(format!("ranges: {}", ranges.len()));
    }

    fn range_status(&self, group: DisplayGroup, message: &str, ok: bool) {
        self.push(format!("range {}: {message} ok={ok}", group.label()));
    }

    fn panel_status(&self, status: &PanelStatus) {
        self.push(format!(
            "status: color={} effect={} selected={}",
            status.color,
            status.effect.as_str(),
            status.selected.join(",")
        ));
    }

    fn groups(&self, groups: &[DisplayGroup]) {
        self.push(format!("groups: {}", groups.len()));
    }

    fn effects(&self, effects: &[EffectKind]) {
        self.push(format!("effects: {}", effects.len()));
    }

    fn settings(&self, settings: &Settings) {
        self.push(format!("settings: {}", settings.base_url));
    }

    fn version_info(&self, info: &VersionInfo) {
        self.push(format!("version: {}", info.version));
    }
}

async fn run_session(
    mock: MockController,
    script: &str,
) -> (ControlPanel<MockController>, Arc<MockController>, RecordingOutput, TempDir) {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(mock);
    let store = RangeStore::new(dir.path().join("group_ranges.json"));
    let mut panel = ControlPanel::new(Arc::clone(&mock), store);
    let output = RecordingOutput::default();

    shell::run(&mut panel, &output, script.as_bytes()).await.unwrap();
    (panel, mock, output, dir)
}

#[tokio::test]
async fn test_session_sends_color_and_effect() {
    let script = "\
select top
select Shelf Left
color ff9329
send
effect pulsate
param pulsate_min 40
start
quit
";
    let (panel, mock, output, _dir) = run_session(MockController::new(), script).await;

    assert_eq!(panel.in_flight(), 0);
    assert_eq!(mock.sent_to("/favorites"), [Command::FetchFavorites]);
    assert_eq!(
        mock.sent_to("/set_color"),
        [Command::SetColor {
            groups: vec!["group1".to_string(), "group2".to_string()],
            color: Rgb(255, 147, 41),
        }]
    );
    let effect = mock.sent_to("/start_effect");
    assert_eq!(effect[0].body().unwrap()["pulsate_min"], 40);
    assert!(output.contains("request: set_color ok=true"));
    assert!(output.contains("request: start_effect ok=true"));
}

#[tokio::test]
async fn test_session_without_selection_explains_no_op() {
    let (_panel, mock, output, _dir) = run_session(MockController::new(), "send\noff\n").await;

    assert!(mock.sent_to("/set_color").is_empty());
    assert!(mock.sent_to("/off").is_empty());
    assert!(output.contains("not sent: set_color (no group selected)"));
    assert!(output.contains("not sent: stop_groups (no group selected)"));
}

#[tokio::test]
async fn test_session_reports_bad_lines_and_continues() {
    let script = "\
color purple
dance
select attic
off-all
";
    let (_panel, mock, output, _dir) = run_session(MockController::new(), script).await;

    let errors = output.lines().iter().filter(|l| l.starts_with("error:")).count();
    assert_eq!(errors, 3);
    assert_eq!(mock.sent_to("/off_all"), [Command::StopAll]);
}

#[tokio::test]
async fn test_session_range_messages() {
    let script = "\
range left from
range update left
range right to 150
range update right
";
    let (panel, _mock, output, _dir) = run_session(MockController::new(), script).await;

    assert!(output.contains("range Shelf Left: Please enter both start and end values. ok=false"));
    assert!(output.contains("range Shelf Right: Updated Shelf Right: 131 - 150 ok=true"));
    assert_eq!(
        panel.range_message(DisplayGroup::ShelfRight),
        Some("Updated Shelf Right: 131 - 150")
    );
}

#[tokio::test]
async fn test_session_favorites_round_trip() {
    let mock = MockController::new().with_favorites(vec![Rgb(255, 0, 0)]);
    let script = "\
color 0000ff
fav add
";
    let (panel, mock, output, _dir) = run_session(mock, script).await;

    assert!(output.contains("favorites: #ff0000"));
    assert_eq!(panel.favorites(), [Rgb(255, 0, 0), Rgb(0, 0, 255)]);
    assert_eq!(mock.stored_favorites(), [Rgb(255, 0, 0), Rgb(0, 0, 255)]);
}

#[tokio::test]
async fn test_session_add_after_failed_fetch_is_refused() {
    let mock = MockController::new().with_favorites(vec![Rgb(1, 1, 1), Rgb(2, 2, 2)]);
    mock.script("/favorites", MockReply::Unreachable);
    let script = "\
color 00ff00
fav add
";
    let (panel, mock, output, _dir) = run_session(mock, script).await;

    assert!(output.contains("request: fetch_favorites ok=false"));
    assert!(output.contains("error: Favorites have not been loaded from the controller"));
    assert!(panel.favorites().is_empty());
    assert_eq!(mock.stored_favorites(), [Rgb(1, 1, 1), Rgb(2, 2, 2)]);
    assert_eq!(mock.sent_to("/favorites"), [Command::FetchFavorites]);
}
