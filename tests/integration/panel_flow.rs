//! Integration tests for selection, color, effect and stop requests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use dotstar::model::{DisplayGroup, EffectKind, Rgb};
use dotstar::panel::ControlPanel;
use dotstar::request::Command;
use dotstar::storage::RangeStore;
use dotstar::transport::mock::{MockController, MockReply};

fn panel_with(mock: MockController) -> (ControlPanel<MockController>, Arc<MockController>, TempDir) {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(mock);
    let store = RangeStore::new(dir.path().join("group_ranges.json"));
    (ControlPanel::new(Arc::clone(&mock), store), mock, dir)
}

fn panel() -> (ControlPanel<MockController>, Arc<MockController>, TempDir) {
    panel_with(MockController::new())
}

// ===== No-op guarantees =====

#[tokio::test]
async fn test_empty_selection_sends_nothing() {
    let (mut panel, mock, _dir) = panel();

    assert_eq!(panel.send_color(), None);
    assert_eq!(panel.start_effect(), None);
    assert_eq!(panel.stop_selected(), None);

    assert_eq!(panel.in_flight(), 0);
    assert!(panel.settle().await.is_empty());
    mock.assert_nothing_sent();
}

#[tokio::test]
async fn test_double_toggle_leaves_nothing_to_send() {
    let (mut panel, mock, _dir) = panel();

    assert!(panel.toggle_group("Shelf Top"));
    assert!(!panel.toggle_group("Shelf Top"));
    assert!(panel.selection().is_empty());

    assert_eq!(panel.send_color(), None);
    mock.assert_nothing_sent();
}

// ===== Solid color =====

#[tokio::test]
async fn test_send_color_to_two_shelves() {
    let (mut panel, mock, _dir) = panel();
    panel.toggle_group("Shelf Top");
    panel.toggle_group("Shelf Left");
    panel.set_color("#ff9329").unwrap();

    assert!(panel.send_color().is_some());
    let settled = panel.settle().await;

    assert_eq!(settled.len(), 1);
    assert!(settled[0].ok);
    mock.assert_sent(&[Command::SetColor {
        groups: vec!["group1".to_string(), "group2".to_string()],
        color: Rgb(255, 147, 41),
    }]);
    assert_eq!(
        mock.sent()[0].body().unwrap(),
        json!({ "groups": ["group1", "group2"], "color": [255, 147, 41] })
    );
}

#[tokio::test]
async fn test_invalid_color_keeps_previous() {
    let (mut panel, _mock, _dir) = panel();
    panel.set_color("00ff00").unwrap();

    assert!(panel.set_color("not-a-color").is_err());
    assert_eq!(panel.color(), Rgb(0, 255, 0));
}

// ===== Effects =====

#[tokio::test]
async fn test_start_pulsate_body() {
    let (mut panel, mock, _dir) = panel();
    panel.toggle_group("Photon Ring");
    panel.set_effect(EffectKind::Pulsate);
    panel.effect_settings_mut().set_param("speed", "0.2").unwrap();
    panel.effect_settings_mut().set_param("pulsate_min", "50").unwrap();
    panel.effect_settings_mut().set_param("pulsate_max", "255").unwrap();

    panel.start_effect();
    panel.settle().await;

    let sent = mock.sent_to("/start_effect");
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].body().unwrap(),
        json!({
            "groups": ["photon_ring"],
            "effect": "pulsate",
            "speed": "0.20",
            "pulsate_min": 50,
            "pulsate_max": 255,
        })
    );
}

#[tokio::test]
async fn test_plain_effect_carries_no_parameters() {
    let (mut panel, mock, _dir) = panel();
    panel.toggle_group("Shelf Right");
    panel.set_effect(EffectKind::StarryNight);

    panel.start_effect();
    panel.settle().await;

    let body = mock.sent()[0].body().unwrap();
    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3, "unexpected fields in {body}");
    assert_eq!(body["effect"], "starry_night");
}

// ===== Stop =====

#[tokio::test]
async fn test_stop_all_ignores_selection() {
    let (mut panel, mock, _dir) = panel();

    panel.stop_all();
    panel.toggle_group("Shelf Top");
    panel.stop_all();
    panel.settle().await;

    mock.assert_sent(&[Command::StopAll, Command::StopAll]);
    assert_eq!(mock.sent()[0].body().unwrap(), json!({}));
}

#[tokio::test]
async fn test_stop_selected_targets_selection() {
    let (mut panel, mock, _dir) = panel();
    panel.toggle_group("Shelf Right");
    panel.toggle_group("Photon Ring");

    panel.stop_selected();
    panel.settle().await;

    mock.assert_sent(&[Command::StopGroups {
        groups: vec!["group3".to_string(), "photon_ring".to_string()],
    }]);
}

// ===== Failures and ordering =====

#[tokio::test]
async fn test_failed_request_is_reported_not_raised() {
    let (mut panel, mock, _dir) = panel();
    mock.script("/set_color", MockReply::Unreachable);
    panel.toggle_group(DisplayGroup::ShelfTop.label());

    panel.send_color();
    let settled = panel.settle().await;

    assert_eq!(settled.len(), 1);
    assert!(!settled[0].ok);
    assert!(settled[0].error.as_deref().unwrap().contains("/set_color"));
    assert_eq!(panel.in_flight(), 0);
}

#[tokio::test]
async fn test_completions_apply_in_arrival_order() {
    let (mut panel, _mock, _dir) =
        panel_with(MockController::new().with_delay("/off_all", Duration::from_millis(200)));
    panel.toggle_group("Shelf Top");

    let slow = panel.stop_all();
    let fast = panel.send_color().unwrap();
    assert_eq!(panel.in_flight(), 2);

    let first = panel.next_completion().await.unwrap();
    let second = panel.next_completion().await.unwrap();

    assert_eq!(first.id, fast);
    assert_eq!(second.id, slow);
    assert!(panel.next_completion().await.is_none());
}

#[tokio::test]
async fn test_unknown_group_label_passes_through() {
    let (mut panel, mock, _dir) = panel();
    panel.toggle_group("Porch");

    panel.stop_selected();
    panel.settle().await;

    mock.assert_sent(&[Command::StopGroups {
        groups: vec!["Porch".to_string()],
    }]);
}
