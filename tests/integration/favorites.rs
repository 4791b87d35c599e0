//! Integration tests for favorites fetch, add, remove and reconciliation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;

use dotstar::error::PanelError;
use dotstar::model::Rgb;
use dotstar::panel::ControlPanel;
use dotstar::request::Command;
use dotstar::storage::RangeStore;
use dotstar::transport::mock::{MockController, MockReply};

const RED: Rgb = Rgb(255, 0, 0);
const GREEN: Rgb = Rgb(0, 255, 0);
const BLUE: Rgb = Rgb(0, 0, 255);

async fn loaded_panel(
    favorites: Vec<Rgb>,
) -> (ControlPanel<MockController>, Arc<MockController>, TempDir) {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(MockController::new().with_favorites(favorites));
    let store = RangeStore::new(dir.path().join("group_ranges.json"));
    let mut panel = ControlPanel::new(Arc::clone(&mock), store);

    panel.fetch_favorites();
    let settled = panel.settle().await;
    assert!(settled.iter().all(|s| s.ok), "fetch failed: {settled:?}");
    mock.clear_sent();
    (panel, mock, dir)
}

#[tokio::test]
async fn test_fetch_loads_controller_list() {
    let (panel, _mock, _dir) = loaded_panel(vec![RED, BLUE]).await;
    assert_eq!(panel.favorites(), [RED, BLUE]);
}

#[tokio::test]
async fn test_add_pushes_list_plus_active_color() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED]).await;
    panel.set_color("00ff00").unwrap();

    panel.add_favorite().unwrap();
    // Not applied until the controller answers.
    assert_eq!(panel.favorites(), [RED]);
    panel.settle().await;

    mock.assert_sent(&[Command::ReplaceFavorites {
        favorites: vec![RED, GREEN],
    }]);
    assert_eq!(mock.sent()[0].body().unwrap(), json!([[255, 0, 0], [0, 255, 0]]));
    assert_eq!(panel.favorites(), [RED, GREEN]);
}

#[tokio::test]
async fn test_remove_drops_exactly_that_index() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED, GREEN, BLUE]).await;

    panel.remove_favorite(1).unwrap();
    panel.settle().await;

    mock.assert_sent(&[Command::ReplaceFavorites {
        favorites: vec![RED, BLUE],
    }]);
    assert_eq!(panel.favorites(), [RED, BLUE]);
    assert_eq!(mock.stored_favorites(), [RED, BLUE]);
}

#[tokio::test]
async fn test_remove_out_of_range_sends_nothing() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED]).await;

    let err = panel.remove_favorite(3).unwrap_err();
    assert!(matches!(err, PanelError::FavoriteIndex { index: 3, len: 1 }));
    mock.assert_nothing_sent();
}

#[tokio::test]
async fn test_failed_push_leaves_cache_alone() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED, GREEN]).await;
    mock.script("/favorites", MockReply::Status(500, "disk full".to_string()));

    panel.remove_favorite(0).unwrap();
    let settled = panel.settle().await;

    assert!(!settled[0].ok);
    assert_eq!(panel.favorites(), [RED, GREEN]);
}

#[tokio::test]
async fn test_controller_list_wins_over_pushed_list() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED]).await;
    mock.script(
        "/favorites",
        MockReply::Json(json!({ "status": "updated", "favorites": [[0, 0, 255]] })),
    );

    panel.add_favorite().unwrap();
    panel.settle().await;

    assert_eq!(panel.favorites(), [BLUE]);
}

#[tokio::test]
async fn test_plain_status_reply_keeps_pushed_list() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED]).await;
    mock.script("/favorites", MockReply::Json(json!({ "status": "updated" })));

    panel.set_color("0000ff").unwrap();
    panel.add_favorite().unwrap();
    panel.settle().await;

    assert_eq!(panel.favorites(), [RED, BLUE]);
}

#[tokio::test]
async fn test_select_favorite_sets_active_color() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED, BLUE]).await;

    assert_eq!(panel.select_favorite(1).unwrap(), BLUE);
    assert_eq!(panel.color(), BLUE);
    assert!(panel.select_favorite(2).is_err());
    mock.assert_nothing_sent();
}

#[tokio::test]
async fn test_malformed_fetch_keeps_previous_list() {
    let (mut panel, mock, _dir) = loaded_panel(vec![RED]).await;
    mock.script("/favorites", MockReply::Json(json!({ "status": "error" })));

    panel.fetch_favorites();
    let settled = panel.settle().await;

    assert!(!settled[0].ok);
    assert_eq!(panel.favorites(), [RED]);
}

// ===== Edit guards =====

fn unloaded_panel(mock: MockController) -> (ControlPanel<MockController>, Arc<MockController>, TempDir) {
    let dir = TempDir::new().unwrap();
    let mock = Arc::new(mock);
    let store = RangeStore::new(dir.path().join("group_ranges.json"));
    (ControlPanel::new(Arc::clone(&mock), store), mock, dir)
}

#[tokio::test]
async fn test_edit_before_any_fetch_is_refused() {
    let (mut panel, mock, _dir) = unloaded_panel(MockController::new().with_favorites(vec![RED]));

    assert!(!panel.favorites_loaded());
    assert!(matches!(panel.add_favorite(), Err(PanelError::FavoritesNotLoaded)));
    assert!(matches!(panel.remove_favorite(0), Err(PanelError::FavoritesNotLoaded)));
    mock.assert_nothing_sent();
}

#[tokio::test]
async fn test_failed_fetch_keeps_controller_list_safe() {
    let seeded = vec![Rgb(1, 1, 1), Rgb(2, 2, 2)];
    let (mut panel, mock, _dir) =
        unloaded_panel(MockController::new().with_favorites(seeded.clone()));
    mock.script("/favorites", MockReply::Unreachable);

    panel.fetch_favorites();
    let settled = panel.settle().await;
    assert!(!settled[0].ok);

    panel.set_color("00ff00").unwrap();
    let err = panel.add_favorite().unwrap_err();
    assert!(matches!(err, PanelError::FavoritesNotLoaded));
    assert_eq!(err.suggestion(), Some("Run: fav refresh"));
    assert_eq!(mock.sent_to("/favorites"), [Command::FetchFavorites]);
    assert_eq!(mock.stored_favorites(), seeded);

    // A successful refresh unlocks edits against the real list.
    panel.fetch_favorites();
    panel.settle().await;
    panel.add_favorite().unwrap();
    panel.settle().await;
    assert_eq!(mock.stored_favorites(), [Rgb(1, 1, 1), Rgb(2, 2, 2), GREEN]);
}

#[tokio::test]
async fn test_overlapping_edits_do_not_lose_entries() {
    let (mut panel, mock, _dir) = unloaded_panel(
        MockController::new()
            .with_favorites(vec![RED])
            .with_delay("/favorites", Duration::from_millis(50)),
    );
    panel.fetch_favorites();
    panel.settle().await;

    panel.set_color("00ff00").unwrap();
    panel.add_favorite().unwrap();
    panel.set_color("0000ff").unwrap();
    assert!(matches!(
        panel.add_favorite(),
        Err(PanelError::FavoritesBusy { pending: 1 })
    ));
    assert!(matches!(
        panel.remove_favorite(0),
        Err(PanelError::FavoritesBusy { .. })
    ));
    panel.settle().await;
    assert_eq!(panel.favorites(), [RED, GREEN]);

    panel.add_favorite().unwrap();
    panel.settle().await;
    assert_eq!(panel.favorites(), [RED, GREEN, BLUE]);
    assert_eq!(mock.stored_favorites(), [RED, GREEN, BLUE]);
}

#[tokio::test]
async fn test_edit_waits_for_fetch_in_flight() {
    let (mut panel, _mock, _dir) = unloaded_panel(
        MockController::new()
            .with_favorites(vec![RED])
            .with_delay("/favorites", Duration::from_millis(50)),
    );
    panel.fetch_favorites();
    panel.settle().await;

    panel.fetch_favorites();
    assert!(matches!(panel.add_favorite(), Err(PanelError::FavoritesBusy { .. })));
    panel.settle().await;
    assert!(panel.add_favorite().is_ok());
}
