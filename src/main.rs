//! # CLI Entry Point
//!
//! Runs the `quickchars` panel against a host editor over stdio, or inspects and
//! edits its persisted state directly.
//!
//! ## Usage
//!
//! ```bash
//! # Speak the panel protocol on stdin/stdout (default)
//! quickchars serve
//!
//! # Print the panel document
//! quickchars render --styles ./styles/webview.css
//!
//! # Show or reset the recently used tray
//! quickchars recent --limit 5
//! quickchars clear
//!
//! # Choose where the host shows the panel
//! quickchars toggle-activity-bar
//! quickchars toggle-explorer
//! ```
//!
//! ## Protocol
//!
//! `serve` reads one JSON object per line. Objects with a `command` field are
//! panel messages (see [`quickchars::message`]); objects with an `event` field
//! are host notifications:
//!
//! ```json
//! {"event": "configurationChanged", "affected": ["quickChars.groups"]}
//! ```
//!
//! Host actions are written back one JSON object per line:
//!
//! ```json
//! {"action": "setHtml", "html": "<!DOCTYPE html>..."}
//! {"action": "insertSnippet", "text": "→"}
//! {"action": "openSettings", "query": "quickChars"}
//! ```

use quickchars::config::Settings;
use quickchars::logging;
use quickchars::message::PanelMessage;
use quickchars::panel::{load_styles, Host, Panel};
use quickchars::store::{default_state_path, JsonFileStore, MemoryStore, StateStore};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Insert frequently used characters and snippets with one click
#[derive(Parser, Debug)]
#[command(name = "quickchars")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Insert frequently used characters and snippets", long_about = None)]
struct Args {
    /// Settings file (defaults to the XDG config location)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// State file holding usage and collapse state (defaults to the XDG data location)
    #[arg(long, value_name = "FILE", global = true)]
    state: Option<PathBuf>,

    /// Stylesheet embedded into the rendered panel
    #[arg(long, value_name = "FILE", global = true)]
    styles: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Speak the panel protocol on stdin/stdout
    Serve,
    /// Print the panel document
    Render,
    /// List the recently used tray
    Recent {
        /// Show at most this many entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Forget all recently used entries
    Clear,
    /// Show or hide the panel in the activity bar
    ToggleActivityBar,
    /// Show or hide the panel in the explorer
    ToggleExplorer,
}

/// Notifications from the host that are not panel messages
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum HostEvent {
    ConfigurationChanged {
        #[serde(default)]
        affected: Vec<String>,
    },
}

/// Actions the panel asks the host to perform
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
enum HostAction<'a> {
    SetHtml { html: &'a str },
    InsertSnippet { text: &'a str },
    OpenSettings { query: &'a str },
}

/// Host that forwards actions as JSON lines
struct StdioHost<W: Write> {
    out: W,
}

impl<W: Write> StdioHost<W> {
    fn send(&mut self, action: &HostAction<'_>) {
        let result = serde_json::to_string(action)
            .map_err(io::Error::from)
            .and_then(|line| writeln!(self.out, "{}", line))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!("Failed to send host action: {}", e);
        }
    }
}

impl<W: Write> Host for StdioHost<W> {
    fn insert_snippet(&mut self, text: &str) -> bool {
        self.send(&HostAction::InsertSnippet { text });
        true
    }

    fn open_settings(&mut self, query: &str) {
        self.send(&HostAction::OpenSettings { query });
    }

    fn set_html(&mut self, html: &str) {
        self.send(&HostAction::SetHtml { html });
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);
    run(args)
}

fn run(args: Args) -> Result<()> {
    let settings_path = match args.config {
        Some(path) => path,
        None => Settings::settings_path()?,
    };
    let mut settings = Settings::load_from_or_default(&settings_path);

    match args.command.unwrap_or(Command::Serve) {
        Command::ToggleActivityBar => {
            let message = settings.toggle_activity_bar();
            settings.save_to(&settings_path)?;
            println!("{}", message);
            return Ok(());
        }
        Command::ToggleExplorer => {
            let message = settings.toggle_explorer();
            settings.save_to(&settings_path)?;
            println!("{}", message);
            return Ok(());
        }
        command => {
            let store = open_store(args.state);
            let styles = load_styles(args.styles.as_deref());
            let mut panel = Panel::new(store, settings, styles);

            match command {
                Command::Serve => {
                    let stdin = io::stdin();
                    let stdout = io::stdout();
                    serve(&mut panel, &settings_path, stdin.lock(), stdout.lock())?;
                }
                Command::Render => println!("{}", panel.render()),
                Command::Recent { limit } => {
                    let mut records = panel.recently_used();
                    if let Some(limit) = limit {
                        records.truncate(limit);
                    }
                    if records.is_empty() {
                        println!("No recently used items");
                    }
                    for record in records {
                        println!("{:>4}  {}  {}", record.count, record.label, record.text);
                    }
                }
                Command::Clear => {
                    panel.tracker().clear();
                    println!("Cleared recently used items");
                }
                Command::ToggleActivityBar | Command::ToggleExplorer => {}
            }
        }
    }

    Ok(())
}

/// Open the persisted state, or an in-memory store if no location can be
/// determined. Write failures later on are logged by the components.
fn open_store(state: Option<PathBuf>) -> Box<dyn StateStore> {
    let path = match state {
        Some(path) => path,
        None => match default_state_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Keeping state in memory only: {:#}", e);
                return Box::new(MemoryStore::new());
            }
        },
    };
    tracing::debug!("Using state file {}", path.display());
    Box::new(JsonFileStore::open(&path))
}

/// Run the message loop until `input` is exhausted.
fn serve<S: StateStore>(
    panel: &mut Panel<S>,
    settings_path: &Path,
    input: impl BufRead,
    output: impl Write,
) -> Result<()> {
    let mut host = StdioHost { out: output };
    panel.refresh(&mut host);

    for line in input.lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        dispatch(panel, settings_path, &line, &mut host);
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}

fn dispatch<S: StateStore>(
    panel: &mut Panel<S>,
    settings_path: &Path,
    line: &str,
    host: &mut impl Host,
) {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Ignoring malformed input line: {}", e);
            return;
        }
    };

    if value.get("event").is_some() {
        match serde_json::from_value::<HostEvent>(value) {
            Ok(HostEvent::ConfigurationChanged { affected }) => {
                let settings = Settings::load_from_or_default(settings_path);
                panel.on_configuration_changed(&affected, settings, host);
            }
            Err(e) => tracing::debug!("Ignoring unknown host event: {}", e),
        }
        return;
    }

    if let Some(message) = PanelMessage::from_value(value) {
        panel.handle(message, host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickchars::view_state::GroupKey;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn actions(output: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_args_parsing_defaults_to_no_command() {
        let args = Args::try_parse_from(["quickchars"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.config.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_parsing_recent_with_limit() {
        let args =
            Args::try_parse_from(["quickchars", "recent", "--limit", "3", "--state", "s.json"])
                .unwrap();
        assert_eq!(args.command, Some(Command::Recent { limit: Some(3) }));
        assert_eq!(args.state, Some(PathBuf::from("s.json")));
    }

    #[test]
    fn test_args_parsing_rejects_unknown_command() {
        assert!(Args::try_parse_from(["quickchars", "explode"]).is_err());
    }

    #[test]
    fn test_serve_insert_toggle_and_settings() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        let mut panel = Panel::new(MemoryStore::new(), Settings::default(), String::new());

        let input = [
            r#"{"command":"insert","text":"→","label":"Arrow"}"#,
            "",
            "garbage",
            r#"{"command":"toggleGroup","groupIndex":1,"isExpanded":true}"#,
            r#"{"command":"openSettings"}"#,
            r#"{"command":"unknown"}"#,
        ]
        .join("\n");
        let mut output = Vec::new();

        serve(&mut panel, &settings_path, Cursor::new(input), &mut output).unwrap();

        let actions = actions(&output);
        let kinds: Vec<&str> = actions
            .iter()
            .map(|a| a["action"].as_str().unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec!["setHtml", "insertSnippet", "setHtml", "openSettings"]
        );
        assert_eq!(actions[1]["text"], "→");
        assert_eq!(actions[3]["query"], "quickChars");

        assert_eq!(panel.recently_used()[0].label, "Arrow");
        assert!(panel
            .view_state()
            .get_expanded(&GroupKey::group("Arrows"), false));
    }

    #[test]
    fn test_open_store_under_regular_file_still_renders() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("Cargo.toml");
        std::fs::write(&blocker, "[package]").unwrap();

        let store = open_store(Some(blocker.join("state.json")));
        let mut panel = Panel::new(store, Settings::default(), String::new());
        let mut output = Vec::new();

        serve(
            &mut panel,
            &temp_dir.path().join("settings.json"),
            Cursor::new(r#"{"command":"insert","text":"→"}"#),
            &mut output,
        )
        .unwrap();

        let actions = actions(&output);
        assert_eq!(actions[0]["action"], "setHtml");
        assert!(actions[0]["html"]
            .as_str()
            .unwrap()
            .starts_with("<!DOCTYPE html>"));
        assert_eq!(actions[1]["action"], "insertSnippet");
        assert_eq!(panel.recently_used().len(), 1);
    }

    #[test]
    fn test_serve_configuration_change_reloads_settings() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        let mut panel = Panel::new(MemoryStore::new(), Settings::default(), String::new());

        let updated = Settings {
            show_info_banner: false,
            recently_used_limit: 1,
            ..Settings::default()
        };
        updated.save_to(&settings_path).unwrap();

        let input = [
            r#"{"command":"insert","text":"a"}"#,
            r#"{"command":"insert","text":"b"}"#,
            r#"{"event":"configurationChanged","affected":["editor.tabSize"]}"#,
            r#"{"event":"configurationChanged","affected":["quickChars.recentlyUsedLimit"]}"#,
            r#"{"event":"somethingElse"}"#,
        ]
        .join("\n");
        let mut output = Vec::new();

        serve(&mut panel, &settings_path, Cursor::new(input), &mut output).unwrap();

        assert!(!panel.settings().show_info_banner);
        assert_eq!(panel.recently_used().len(), 1);
        assert_eq!(panel.tracker().get_ranked(usize::MAX).len(), 1);

        let renders = actions(&output)
            .iter()
            .filter(|a| a["action"] == "setHtml")
            .count();
        // initial + two inserts + one relevant settings change
        assert_eq!(renders, 4);
    }
}
