//! A single recorded insertion.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The timestamp and value recorded by one `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// When the value was inserted
    pub inserted_at: DateTime<Utc>,
    /// The inserted value
    pub value: i64,
}

impl Entry {
    pub fn new(inserted_at: DateTime<Utc>, value: i64) -> Self {
        Self { inserted_at, value }
    }

    /// Last instant at which this entry is still visible.
    ///
    /// `None` when that instant is beyond the representable date range, in
    /// which case the entry never expires.
    pub fn expires_at(&self, window: Duration) -> Option<DateTime<Utc>> {
        self.inserted_at.checked_add_signed(window)
    }

    /// Whether the entry is inside its window at `now`.
    ///
    /// The window is closed: an entry read exactly `window` after insertion is
    /// still live.
    pub fn is_live(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.expires_at(window).map_or(true, |end| now <= end)
    }
}
