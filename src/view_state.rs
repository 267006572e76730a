//! # Group View State
//!
//! Remembers which sections of the panel are expanded. Each user group is
//! keyed by its name; the recently-used tray has its own key in a separate
//! namespace so no group name can ever address it.
//!
//! A key starts out absent and reads as the caller's default until the first
//! toggle writes it. There is no removal.

use crate::store::StateStore;
use serde_json::Value;

const GROUP_STATE_PREFIX: &str = "quickChars.groupState.";
const TRAY_STATE_KEY: &str = "quickChars.trayState.recentlyUsed";

/// A collapsible section of the panel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// A user-defined group, by name
    Group(String),
    /// The recently-used tray
    RecentlyUsed,
}

impl GroupKey {
    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    /// Key under which this section's flag is persisted
    pub fn storage_key(&self) -> String {
        match self {
            Self::Group(name) => format!("{}{}", GROUP_STATE_PREFIX, name),
            Self::RecentlyUsed => TRAY_STATE_KEY.to_string(),
        }
    }
}

/// Expanded/collapsed flags on top of a state store
#[derive(Debug)]
pub struct ViewStateStore<'a, S: StateStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: StateStore + ?Sized> ViewStateStore<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// The stored flag for `key`, or `default` if none was ever written.
    ///
    /// A stored value that is not a boolean also reads as `default`.
    pub fn get_expanded(&self, key: &GroupKey, default: bool) -> bool {
        match self.store.get(&key.storage_key()) {
            Some(Value::Bool(expanded)) => expanded,
            Some(other) => {
                tracing::debug!("Ignoring non-boolean view state for {:?}: {}", key, other);
                default
            }
            None => default,
        }
    }

    /// Store the flag for `key`, replacing any previous value.
    pub fn set_expanded(&mut self, key: &GroupKey, expanded: bool) {
        if let Err(e) = self
            .store
            .update(&key.storage_key(), Value::Bool(expanded))
        {
            tracing::warn!("Failed to persist view state for {:?}: {:#}", key, e);
        }
    }
}
