//! Latest-value index: point lookup of the newest entry per key.

use super::Entry;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Result of reading a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// The newest entry for the key is inside the window
    Live(i64),
    /// The key was inserted but its newest entry has left the window
    Expired,
    /// The key was never inserted
    Absent,
}

impl Lookup {
    /// The value, with expired and absent keys both reading as zero.
    pub fn value_or_zero(self) -> i64 {
        match self {
            Lookup::Live(value) => value,
            Lookup::Expired | Lookup::Absent => 0,
        }
    }

    /// The value if live.
    pub fn into_option(self) -> Option<i64> {
        match self {
            Lookup::Live(value) => Some(value),
            Lookup::Expired | Lookup::Absent => None,
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Lookup::Live(_))
    }
}

/// Map from key to the entry of its most recent insertion.
#[derive(Debug, Default)]
pub struct LatestIndex {
    entries: HashMap<String, Entry>,
}

impl LatestIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `entry` as the newest for `key`, replacing any previous one.
    pub fn insert(&mut self, key: String, entry: Entry) -> Option<Entry> {
        self.entries.insert(key, entry)
    }

    /// Classify the newest entry for `key` at `now`.
    pub fn lookup(&self, key: &str, now: DateTime<Utc>, window: Duration) -> Lookup {
        match self.entries.get(key) {
            Some(entry) if entry.is_live(now, window) => Lookup::Live(entry.value),
            Some(_) => Lookup::Expired,
            None => Lookup::Absent,
        }
    }

    /// Number of distinct keys ever inserted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_classification() {
        let start = Utc::now();
        let window = Duration::seconds(10);
        let mut index = LatestIndex::new();
        index.insert("a".to_string(), Entry::new(start, 5));

        assert_eq!(index.lookup("a", start, window), Lookup::Live(5));
        assert_eq!(
            index.lookup("a", start + Duration::seconds(11), window),
            Lookup::Expired
        );
        assert_eq!(index.lookup("b", start, window), Lookup::Absent);
    }

    #[test]
    fn test_insert_overwrites() {
        let start = Utc::now();
        let mut index = LatestIndex::new();

        assert!(index.insert("k".to_string(), Entry::new(start, 1)).is_none());
        let previous = index.insert("k".to_string(), Entry::new(start, 2));

        assert_eq!(previous.map(|e| e.value), Some(1));
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.lookup("k", start, Duration::seconds(1)),
            Lookup::Live(2)
        );
    }

    #[test]
    fn test_zero_folding() {
        assert_eq!(Lookup::Live(-3).value_or_zero(), -3);
        assert_eq!(Lookup::Expired.value_or_zero(), 0);
        assert_eq!(Lookup::Absent.into_option(), None);
        assert_eq!(Lookup::Live(4).into_option(), Some(4));
    }
}
