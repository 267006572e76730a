//! # Settings
//!
//! User configuration stored in `~/.config/quickchars/settings.json`.
//!
//! ## Overview
//!
//! The [`Settings`] struct is serialized to / deserialized from a JSON file in
//! the user's XDG config directory. Keys use the host's camelCase spelling:
//!
//! ```json
//! {
//!   "groups": [
//!     { "name": "Arrows", "items": [{ "label": "→", "text": "→" }] }
//!   ],
//!   "showRecentlyUsed": true,
//!   "recentlyUsedLimit": 10,
//!   "showInfoBanner": false
//! }
//! ```
//!
//! Every key is optional. Out-of-range values are not rejected here; the
//! recently-used limit is clamped where it is used.

use crate::usage::DEFAULT_RECENTLY_USED_LIMIT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Namespace of every setting and of the settings UI filter
pub const SETTINGS_NAMESPACE: &str = "quickChars";

/// One insertable button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupItem {
    pub label: String,
    pub text: String,
    /// Snippet text may contain host placeholder syntax
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_snippet: bool,
}

impl GroupItem {
    pub fn character(text: &str) -> Self {
        Self {
            label: text.to_string(),
            text: text.to_string(),
            is_snippet: false,
        }
    }

    pub fn snippet(label: &str, text: &str) -> Self {
        Self {
            label: label.to_string(),
            text: text.to_string(),
            is_snippet: true,
        }
    }
}

/// A named, user-defined collection of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub name: String,
    #[serde(default)]
    pub items: Vec<GroupItem>,
}

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_groups")]
    pub groups: Vec<GroupDefinition>,
    /// Also switches usage tracking on or off
    #[serde(default = "default_true")]
    pub show_recently_used: bool,
    /// Raw configured value; clamped to `1..=50` wherever it is applied
    #[serde(default = "default_recently_used_limit")]
    pub recently_used_limit: i64,
    #[serde(default = "default_true")]
    pub show_info_banner: bool,
    #[serde(default = "default_true")]
    pub show_in_activity_bar: bool,
    #[serde(default = "default_true")]
    pub show_in_explorer: bool,
}

fn default_true() -> bool {
    true
}

fn default_recently_used_limit() -> i64 {
    DEFAULT_RECENTLY_USED_LIMIT
}

/// Sample groups shown on a fresh install
fn default_groups() -> Vec<GroupDefinition> {
    vec![
        GroupDefinition {
            name: "Symbols".to_string(),
            items: ["©", "®", "™", "°", "±", "×", "÷", "…", "§", "¶"]
                .into_iter()
                .map(GroupItem::character)
                .collect(),
        },
        GroupDefinition {
            name: "Arrows".to_string(),
            items: ["→", "←", "↑", "↓", "↔", "⇒", "⇐", "⇔"]
                .into_iter()
                .map(GroupItem::character)
                .collect(),
        },
        GroupDefinition {
            name: "Snippets".to_string(),
            items: vec![
                GroupItem::snippet("TODO", "// TODO(${1:owner}): ${2:description}"),
                GroupItem::snippet("Link", "[${1:text}](${2:url})"),
            ],
        },
    ]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            show_recently_used: true,
            recently_used_limit: DEFAULT_RECENTLY_USED_LIMIT,
            show_info_banner: true,
            show_in_activity_bar: true,
            show_in_explorer: true,
        }
    }
}

impl Settings {
    /// Load settings from a specific path. Returns `Settings::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;
        Ok(settings)
    }

    /// Like [`Settings::load_from`], but falls back to defaults on any error.
    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Using default settings: {:#}", e);
            Self::default()
        })
    }

    /// Save the current settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Flip whether the panel shows in the activity bar and describe the result.
    pub fn toggle_activity_bar(&mut self) -> String {
        self.show_in_activity_bar = !self.show_in_activity_bar;
        toggle_message(self.show_in_activity_bar, "Activity Bar")
    }

    /// Flip whether the panel shows in the explorer and describe the result.
    pub fn toggle_explorer(&mut self) -> String {
        self.show_in_explorer = !self.show_in_explorer;
        toggle_message(self.show_in_explorer, "Explorer")
    }

    /// Return the path to the settings file.
    pub fn settings_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "quickchars")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("settings.json"))
    }
}

fn toggle_message(enabled: bool, location: &str) -> String {
    let state = if enabled { "enabled" } else { "disabled" };
    format!("QuickChars panel {} in {}", state, location)
}

/// Whether a changed configuration key belongs to this panel's namespace
pub fn affects_namespace(key: &str) -> bool {
    key == SETTINGS_NAMESPACE
        || key
            .strip_prefix(SETTINGS_NAMESPACE)
            .is_some_and(|rest| rest.starts_with('.'))
}
