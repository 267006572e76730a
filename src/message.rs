//! # Panel Messages
//!
//! The panel front end posts untyped JSON objects tagged by `command`:
//!
//! ```json
//! { "command": "insert", "text": "→", "label": "Arrow" }
//! { "command": "toggleGroup", "groupIndex": 2, "isExpanded": false }
//! { "command": "toggleGroup", "groupIndex": -1, "isExpanded": true }
//! { "command": "clearRecentlyUsed" }
//! { "command": "openSettings" }
//! ```
//!
//! A `groupIndex` of `-1` addresses the recently-used tray. Anything that does
//! not match one of these shapes is dropped.

use serde::Deserialize;

/// Wire value of `groupIndex` that addresses the recently-used tray
pub const TRAY_GROUP_INDEX: i64 = -1;

/// Which section a toggle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTarget {
    /// Position in the configured group list
    ByIndex(usize),
    RecentlyUsed,
}

impl GroupTarget {
    /// Map a wire index onto a target. Negative indices other than the tray
    /// sentinel address nothing.
    pub fn from_wire(index: i64) -> Option<Self> {
        if index == TRAY_GROUP_INDEX {
            return Some(Self::RecentlyUsed);
        }
        usize::try_from(index).ok().map(Self::ByIndex)
    }
}

/// A command from the panel front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelMessage {
    Insert { text: String, label: String },
    ToggleGroup { target: GroupTarget, expanded: bool },
    ClearRecentlyUsed,
    OpenSettings,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
enum RawMessage {
    Insert {
        text: String,
        #[serde(default)]
        label: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    ToggleGroup { group_index: i64, is_expanded: bool },
    ClearRecentlyUsed,
    OpenSettings,
}

impl PanelMessage {
    /// Parse a message from its JSON text. Returns `None` for anything
    /// unrecognised or malformed.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<serde_json::Value>(json) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                tracing::debug!("Ignoring non-JSON panel message: {}", e);
                None
            }
        }
    }

    /// Interpret an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        let raw: RawMessage = match serde_json::from_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Ignoring unrecognised panel message: {}", e);
                return None;
            }
        };

        match raw {
            RawMessage::Insert { text, label } => {
                let label = label.unwrap_or_else(|| text.clone());
                Some(Self::Insert { text, label })
            }
            RawMessage::ToggleGroup {
                group_index,
                is_expanded,
            } => {
                let Some(target) = GroupTarget::from_wire(group_index) else {
                    tracing::debug!("Ignoring toggle for group index {}", group_index);
                    return None;
                };
                Some(Self::ToggleGroup {
                    target,
                    expanded: is_expanded,
                })
            }
            RawMessage::ClearRecentlyUsed => Some(Self::ClearRecentlyUsed),
            RawMessage::OpenSettings => Some(Self::OpenSettings),
        }
    }
}
