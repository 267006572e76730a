//! Panel behaviour tests
//!
//! Drives the panel through the same JSON messages the front end posts and
//! checks what ends up on screen.

use quickchars::config::{GroupDefinition, GroupItem, Settings};
use quickchars::message::PanelMessage;
use quickchars::panel::{Host, Panel};
use quickchars::store::MemoryStore;

#[derive(Default)]
struct FakeEditor {
    document: String,
    last_html: String,
}

impl Host for FakeEditor {
    fn insert_snippet(&mut self, text: &str) -> bool {
        self.document.push_str(text);
        true
    }

    fn open_settings(&mut self, _query: &str) {}

    fn set_html(&mut self, html: &str) {
        self.last_html = html.to_string();
    }
}

fn send(panel: &mut Panel<MemoryStore>, editor: &mut FakeEditor, json: &str) {
    if let Some(message) = PanelMessage::from_json(json) {
        panel.handle(message, editor);
    }
}

fn settings(limit: i64) -> Settings {
    Settings {
        groups: vec![
            GroupDefinition {
                name: "Accents".to_string(),
                items: vec![GroupItem::character("é"), GroupItem::character("ï")],
            },
            GroupDefinition {
                name: "Empty".to_string(),
                items: Vec::new(),
            },
        ],
        recently_used_limit: limit,
        show_info_banner: false,
        ..Settings::default()
    }
}

#[test]
fn test_limit_two_keeps_two_latest_insertions() {
    let mut panel = Panel::new(MemoryStore::new(), settings(2), String::new());
    let mut editor = FakeEditor::default();

    send(&mut panel, &mut editor, r#"{"command":"insert","text":"x"}"#);
    std::thread::sleep(std::time::Duration::from_millis(5));
    send(&mut panel, &mut editor, r#"{"command":"insert","text":"y"}"#);
    std::thread::sleep(std::time::Duration::from_millis(5));
    send(&mut panel, &mut editor, r#"{"command":"insert","text":"z"}"#);

    assert_eq!(editor.document, "xyz");
    let texts: Vec<String> = panel.recently_used().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["z", "y"]);
}

#[test]
fn test_tray_appears_after_first_insert() {
    let mut panel = Panel::new(MemoryStore::new(), settings(10), String::new());
    let mut editor = FakeEditor::default();

    assert!(!panel.render().contains("Recently Used"));

    send(
        &mut panel,
        &mut editor,
        r#"{"command":"insert","text":"é","label":"e acute"}"#,
    );

    assert!(editor.last_html.contains("<h3>Recently Used</h3>"));
    assert!(editor.last_html.contains(">e acute</button>"));
}

#[test]
fn test_collapsed_tray_renders_collapsed() {
    let mut panel = Panel::new(MemoryStore::new(), settings(10), String::new());
    let mut editor = FakeEditor::default();

    send(&mut panel, &mut editor, r#"{"command":"insert","text":"é"}"#);
    send(
        &mut panel,
        &mut editor,
        r#"{"command":"toggleGroup","groupIndex":-1,"isExpanded":false}"#,
    );

    let html = panel.render();
    assert!(html.contains("class=\"group-content collapsed\" id=\"content-recent\""));
    assert!(html.contains("class=\"group-content\" id=\"content-0\""));
}

#[test]
fn test_all_groups_empty_shows_empty_state() {
    let empty = Settings {
        groups: vec![GroupDefinition {
            name: "Empty".to_string(),
            items: Vec::new(),
        }],
        ..Settings::default()
    };
    let mut panel = Panel::new(MemoryStore::new(), empty, String::new());

    assert!(panel.render().contains("No items to show"));
}

#[test]
fn test_garbage_messages_change_nothing() {
    let mut panel = Panel::new(MemoryStore::new(), settings(10), String::new());
    let mut editor = FakeEditor::default();

    for json in [
        r#"{"command":"launchRockets"}"#,
        r#"{"command":"toggleGroup","groupIndex":-2,"isExpanded":true}"#,
        r#"{"command":"toggleGroup","groupIndex":99,"isExpanded":true}"#,
        r#"[1,2,3]"#,
    ] {
        send(&mut panel, &mut editor, json);
    }

    assert!(editor.document.is_empty());
    assert!(editor.last_html.is_empty());
    assert!(panel.recently_used().is_empty());
    assert_eq!(panel.store(), &MemoryStore::new());
}
