//! # State Store
//!
//! The persisted key-value state that the usage tracker and the view-state
//! store write through. Both components receive the store explicitly; nothing
//! in the crate reaches for a global.
//!
//! ## Storage Location
//!
//! [`JsonFileStore`] keeps every key in a single JSON object:
//!
//! ```text
//! ~/.local/share/quickchars/state.json
//! ```
//!
//! ```json
//! {
//!   "quickChars.recentlyUsed": [ ... ],
//!   "quickChars.groupState.Arrows": true,
//!   "quickChars.trayState.recentlyUsed": false
//! }
//! ```

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value state with get/update semantics, surviving restarts.
///
/// Each `update` is expected to be atomic on its own. Callers never hold a
/// value across events, so no locking is needed.
pub trait StateStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, overwriting any previous value.
    fn update(&mut self, key: &str, value: Value) -> Result<()>;
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn update(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).update(key, value)
    }
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn get(&self, key: &str) -> Option<Value> {
        (**self).get(key)
    }

    fn update(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).update(key, value)
    }
}

/// In-process store. Nothing is written to disk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by one JSON file, written through on every update.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// Never fails: a missing file starts empty, and a file that cannot be
    /// read or is not a JSON object also starts empty. The broken file is
    /// overwritten on the next update. Problems writing to `path` only show
    /// up as errors from [`StateStore::update`], while reads keep working from
    /// memory.
    pub fn open(path: &Path) -> Self {
        let values = if path.exists() {
            load_values(path).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable state file: {:#}", e);
                Map::new()
            })
        } else {
            Map::new()
        };

        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(&self.values).context("Failed to serialize state")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write state file: {}", self.path.display()))?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn update(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }
}

/// Default location of the state file.
pub fn default_state_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "quickchars")
        .context("Failed to determine application data directory")?;
    Ok(dirs.data_dir().join("state.json"))
}

fn load_values(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    let values: Map<String, Value> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file: {}", path.display()))?;
    Ok(values)
}
