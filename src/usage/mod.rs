//! # Usage Tracking Module
//!
//! Tracks which characters and snippets get inserted so the panel can show a
//! "Recently Used" tray above the user's own groups.
//!
//! ## Ranking
//!
//! Entries are ordered by use count (descending), ties broken by the time of
//! last use (most recent first). Entries with equal count and equal time keep
//! their previous relative order. The list is bounded by the configured limit,
//! which is always clamped to `1..=50`.
//!
//! ## Data Format
//!
//! The list lives under a single key of the [`StateStore`](crate::store::StateStore):
//!
//! ```json
//! {
//!   "quickChars.recentlyUsed": [
//!     { "text": "→", "label": "→", "count": 7, "lastUsed": "2026-02-05T10:30:00Z" },
//!     { "text": "${1:name}: ${2:type}", "label": "field", "count": 2, "lastUsed": "2026-02-04T09:12:00Z" }
//!   ]
//! }
//! ```

mod storage;

pub use storage::{
    clamp_limit, UsageRecord, UsageTracker, DEFAULT_RECENTLY_USED_LIMIT, MAX_RECENTLY_USED,
    MIN_RECENTLY_USED, RECENTLY_USED_KEY, RECENTLY_USED_TITLE,
};
