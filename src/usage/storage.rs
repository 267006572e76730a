//! # Usage Storage
//!
//! Reads, ranks and writes the recently-used list through a
//! [`StateStore`]. Every mutation is written back immediately.

use crate::store::StateStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Hard ceiling on the number of tracked entries, whatever the configuration says
pub const MAX_RECENTLY_USED: usize = 50;

/// The tray always has at least one slot
pub const MIN_RECENTLY_USED: usize = 1;

/// Limit used when the configuration does not set one
pub const DEFAULT_RECENTLY_USED_LIMIT: i64 = 10;

/// Storage key of the ranked list
pub const RECENTLY_USED_KEY: &str = "quickChars.recentlyUsed";

/// Heading shown above the tray
pub const RECENTLY_USED_TITLE: &str = "Recently Used";

/// A single tracked insertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// The inserted content; identifies the record
    pub text: String,
    /// Display name, refreshed on every use
    pub label: String,
    /// Number of insertions, at least 1
    pub count: u64,
    /// When this entry was last inserted
    pub last_used: DateTime<Utc>,
}

/// Clamp a configured limit into `MIN_RECENTLY_USED..=MAX_RECENTLY_USED`.
///
/// Zero and negative values become 1.
pub fn clamp_limit(limit: i64) -> usize {
    // Both bounds fit in i64, so the cast back is lossless
    limit.clamp(MIN_RECENTLY_USED as i64, MAX_RECENTLY_USED as i64) as usize
}

/// Manages the ranked recently-used list on top of a state store
#[derive(Debug)]
pub struct UsageTracker<'a, S: StateStore + ?Sized> {
    store: &'a mut S,
    /// Whether insertions are recorded at all
    enabled: bool,
    /// Clamped bound on the list length
    limit: usize,
}

impl<'a, S: StateStore + ?Sized> UsageTracker<'a, S> {
    /// Create a tracker writing to `store`.
    ///
    /// `limit` is the raw configured value and is clamped here.
    pub fn new(store: &'a mut S, enabled: bool, limit: i64) -> Self {
        Self {
            store,
            enabled,
            limit: clamp_limit(limit),
        }
    }

    /// The clamped limit currently in force
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record an insertion of `text` at the current time.
    pub fn record_usage(&mut self, text: &str, label: &str) {
        self.record_usage_at(text, label, Utc::now());
    }

    /// Record an insertion of `text` at `now`.
    ///
    /// Bumps the count of an existing entry or appends a new one, re-ranks,
    /// truncates to the limit and persists. Does nothing while tracking is
    /// disabled.
    pub fn record_usage_at(&mut self, text: &str, label: &str, now: DateTime<Utc>) {
        if !self.enabled {
            tracing::debug!("Usage tracking disabled, not recording insertion");
            return;
        }

        let mut records = self.load();
        match records.iter_mut().find(|r| r.text == text) {
            Some(record) => {
                record.count = record.count.saturating_add(1);
                record.last_used = now;
                record.label = label.to_string();
            }
            None => records.push(UsageRecord {
                text: text.to_string(),
                label: label.to_string(),
                count: 1,
                last_used: now,
            }),
        }

        rank(&mut records);
        records.truncate(self.limit);
        self.save(&records);
    }

    /// The ranked list, cut to at most `limit` entries. Read-only.
    pub fn get_ranked(&self, limit: usize) -> Vec<UsageRecord> {
        let mut records = self.load();
        records.truncate(limit);
        records
    }

    /// Check if anything has been recorded
    pub fn has_usage_data(&self) -> bool {
        !self.load().is_empty()
    }

    /// Forget every entry. Idempotent.
    pub fn clear(&mut self) {
        self.save(&[]);
    }

    /// Adopt a new configured limit and truncate the stored list to it.
    ///
    /// Only writes when the stored list is actually longer than the bound.
    pub fn enforce_limit(&mut self, new_limit: i64) {
        self.limit = clamp_limit(new_limit);

        let mut records = self.load();
        if records.len() > self.limit {
            tracing::debug!(
                "Truncating recently used list from {} to {} entries",
                records.len(),
                self.limit
            );
            records.truncate(self.limit);
            self.save(&records);
        }
    }

    /// Load the persisted list, ranked.
    ///
    /// Missing state or a value that is not a list reads as an empty list.
    /// Entries that do not parse are skipped, duplicate texts keep their first
    /// occurrence, and a count of zero reads as 1.
    fn load(&self) -> Vec<UsageRecord> {
        let Some(value) = self.store.get(RECENTLY_USED_KEY) else {
            return Vec::new();
        };

        let Value::Array(entries) = value else {
            tracing::warn!("Ignoring malformed recently used list: not a list");
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut records: Vec<UsageRecord> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<UsageRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed recently used entry: {}", e);
                    None
                }
            })
            .filter(|r| seen.insert(r.text.clone()))
            .map(|mut r| {
                r.count = r.count.max(1);
                r
            })
            .collect();
        rank(&mut records);
        records
    }

    fn save(&mut self, records: &[UsageRecord]) {
        let value = match serde_json::to_value(records) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to serialize recently used list: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.update(RECENTLY_USED_KEY, value) {
            tracing::warn!("Failed to persist recently used list: {:#}", e);
        }
    }
}

/// Sort by count descending, then last use descending. Stable.
fn rank(records: &mut [UsageRecord]) {
    records.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.last_used.cmp(&a.last_used))
    });
}
