//! State persistence tests
//!
//! Usage ranking and collapse state must survive a restart of the host
//! process, and a limit lowered between sessions must hold before the first
//! render.

use quickchars::config::Settings;
use quickchars::message::PanelMessage;
use quickchars::panel::{Host, Panel};
use quickchars::store::JsonFileStore;
use quickchars::usage::UsageTracker;
use quickchars::view_state::{GroupKey, ViewStateStore};
use std::path::Path;
use tempfile::TempDir;

/// Host with an always-open document that discards renders
struct NullHost;

impl Host for NullHost {
    fn insert_snippet(&mut self, _text: &str) -> bool {
        true
    }

    fn open_settings(&mut self, _query: &str) {}

    fn set_html(&mut self, _html: &str) {}
}

fn open_panel(state: &Path, settings: Settings) -> Panel<JsonFileStore> {
    let store = JsonFileStore::open(state);
    Panel::new(store, settings, String::new())
}

fn insert(text: &str, label: &str) -> PanelMessage {
    PanelMessage::Insert {
        text: text.to_string(),
        label: label.to_string(),
    }
}

#[test]
fn test_ranking_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");

    {
        let mut panel = open_panel(&state, Settings::default());
        for _ in 0..3 {
            panel.handle(insert("café", "Café"), &mut NullHost);
        }
        panel.handle(insert("naïve", "naïve"), &mut NullHost);
    }

    let mut panel = open_panel(&state, Settings::default());
    let recent = panel.recently_used();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].text, "café");
    assert_eq!(recent[0].count, 3);
    assert_eq!(recent[1].text, "naïve");
    assert_eq!(recent[1].count, 1);
}

#[test]
fn test_view_state_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");

    {
        let mut store = JsonFileStore::open(&state);
        let mut view = ViewStateStore::new(&mut store);
        assert!(view.get_expanded(&GroupKey::RecentlyUsed, true));
        view.set_expanded(&GroupKey::RecentlyUsed, false);
        view.set_expanded(&GroupKey::group("Arrows"), true);
    }

    let mut store = JsonFileStore::open(&state);
    let view = ViewStateStore::new(&mut store);
    assert!(!view.get_expanded(&GroupKey::RecentlyUsed, true));
    assert!(view.get_expanded(&GroupKey::group("Arrows"), false));
    assert!(!view.get_expanded(&GroupKey::group("Snippets"), false));
}

#[test]
fn test_lowered_limit_applies_on_activation() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");

    {
        let mut store = JsonFileStore::open(&state);
        let mut tracker = UsageTracker::new(&mut store, true, 10);
        for text in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"] {
            tracker.record_usage(text, text);
        }
        assert_eq!(tracker.get_ranked(usize::MAX).len(), 10);
    }

    // Next session starts with a smaller limit and records nothing new
    let settings = Settings {
        recently_used_limit: 3,
        ..Settings::default()
    };
    let mut panel = open_panel(&state, settings);
    assert_eq!(panel.tracker().get_ranked(usize::MAX).len(), 3);

    // The truncation was written, not just hidden
    let mut store = JsonFileStore::open(&state);
    let tracker = UsageTracker::new(&mut store, true, 50);
    assert_eq!(tracker.get_ranked(usize::MAX).len(), 3);
}

#[test]
fn test_clear_persists() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");

    {
        let mut panel = open_panel(&state, Settings::default());
        panel.handle(insert("→", "→"), &mut NullHost);
        panel.handle(PanelMessage::ClearRecentlyUsed, &mut NullHost);
    }

    let mut panel = open_panel(&state, Settings::default());
    assert!(panel.recently_used().is_empty());
    assert!(!panel.render().contains("Recently Used"));
}

#[test]
fn test_corrupted_state_file_degrades_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let state = temp_dir.path().join("state.json");
    std::fs::write(&state, "{ not json").unwrap();

    let mut panel = open_panel(&state, Settings::default());
    assert!(panel.recently_used().is_empty());

    let view = panel.view();
    assert!(view.tray.is_none());
    assert!(view.groups[0].expanded);
    assert!(!view.groups[1].expanded);
}

#[test]
fn test_unwritable_state_location_still_renders() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("Cargo.toml");
    std::fs::write(&blocker, "[package]").unwrap();
    let state = blocker.join("state.json");

    let mut panel = open_panel(&state, Settings::default());
    assert!(panel.render().starts_with("<!DOCTYPE html>"));

    // Insertions still work for the session even though nothing is saved
    panel.handle(insert("→", "→"), &mut NullHost);
    assert_eq!(panel.recently_used().len(), 1);
    assert!(panel.render().contains("Recently Used"));
}
