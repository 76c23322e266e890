//! Insertion log: every entry in the order it was recorded.
//!
//! Entries are appended with non-decreasing timestamps, so once the oldest
//! entry is inside the window every newer one is too. Expired entries are
//! only ever removed from the front.

use super::Entry;
use chrono::{DateTime, Duration, Utc};
use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Outcome of averaging the log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAverage {
    /// Mean of the live values, `0.0` when there are none
    pub mean: f64,
    /// Number of insertions averaged
    pub samples: usize,
    /// Entries dropped from the front during this call
    pub trimmed: usize,
}

/// Time-ordered history of insertions.
#[derive(Debug, Default)]
pub struct InsertionLog {
    entries: VecDeque<Entry>,
}

impl InsertionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` and drop any expired entries at the front.
    ///
    /// Returns the number of entries dropped.
    pub fn push(&mut self, entry: Entry, window: Duration) -> usize {
        self.entries.push_back(entry);
        self.trim_expired(entry.inserted_at, window)
    }

    /// Drop expired entries from the front of the log.
    pub fn trim_expired(&mut self, now: DateTime<Utc>, window: Duration) -> usize {
        let mut trimmed = 0;
        while let Some(front) = self.entries.front() {
            if front.is_live(now, window) {
                break;
            }
            self.entries.pop_front();
            trimmed += 1;
        }
        trimmed
    }

    /// Mean of the values in the newest run of live entries.
    ///
    /// Scans from the newest entry backwards and stops at the first expired
    /// one. Everything before that point is discarded. An entry read exactly
    /// `window` after insertion still counts, as it does for key reads.
    pub fn average(&mut self, now: DateTime<Utc>, window: Duration) -> WindowAverage {
        let samples = self
            .entries
            .iter()
            .rev()
            .take_while(|entry| entry.is_live(now, window))
            .count();
        let trimmed = self.entries.len() - samples;
        self.entries.drain(..trimmed);

        let mean = if samples == 0 {
            0.0
        } else {
            self.entries.iter().map(|entry| entry.value as f64).mean()
        };

        WindowAverage {
            mean,
            samples,
            trimmed,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Duration {
        Duration::seconds(60)
    }

    #[test]
    fn test_empty_average_is_zero() {
        let mut log = InsertionLog::new();
        let result = log.average(Utc::now(), window());

        assert_eq!(result.mean, 0.0);
        assert_eq!(result.samples, 0);
        assert_eq!(result.trimmed, 0);
    }

    #[test]
    fn test_average_counts_every_insertion() {
        let start = Utc::now();
        let mut log = InsertionLog::new();
        log.push(Entry::new(start, 10), window());
        log.push(Entry::new(start, 10), window());
        log.push(Entry::new(start + Duration::seconds(1), 40), window());

        let result = log.average(start + Duration::seconds(2), window());
        assert_eq!(result.samples, 3);
        assert!((result.mean - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_trims_expired_prefix() {
        let start = Utc::now();
        let mut log = InsertionLog::new();
        log.push(Entry::new(start, 1), window());
        log.push(Entry::new(start + Duration::seconds(30), 3), window());
        log.push(Entry::new(start + Duration::seconds(50), 5), window());

        let result = log.average(start + Duration::seconds(70), window());
        assert_eq!(result.trimmed, 1);
        assert_eq!(result.samples, 2);
        assert!((result.mean - 4.0).abs() < 1e-9);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_average_counts_entry_at_window_edge() {
        let start = Utc::now();
        let mut log = InsertionLog::new();
        log.push(Entry::new(start, 6), window());

        let result = log.average(start + window(), window());
        assert_eq!(result.samples, 1);
        assert_eq!(result.mean, 6.0);
    }

    #[test]
    fn test_fully_expired_log_averages_zero() {
        let start = Utc::now();
        let mut log = InsertionLog::new();
        log.push(Entry::new(start, 100), window());

        let result = log.average(start + Duration::seconds(61), window());
        assert_eq!(result.mean, 0.0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_push_trims_front() {
        let start = Utc::now();
        let mut log = InsertionLog::new();
        log.push(Entry::new(start, 1), window());
        log.push(Entry::new(start + Duration::seconds(10), 2), window());

        let trimmed = log.push(Entry::new(start + Duration::seconds(65), 3), window());
        assert_eq!(trimmed, 1);
        assert_eq!(
            log.iter().map(|e| e.value).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_average_stops_at_newest_expired_entry() {
        // Out-of-order timestamps, as a wall clock stepping backwards would produce.
        let start = Utc::now();
        let mut log = InsertionLog::new();
        log.entries.push_back(Entry::new(start + Duration::seconds(50), 8));
        log.entries.push_back(Entry::new(start, 100));
        log.entries.push_back(Entry::new(start + Duration::seconds(55), 2));

        let result = log.average(start + Duration::seconds(90), window());
        assert_eq!(result.samples, 1);
        assert_eq!(result.trimmed, 2);
        assert!((result.mean - 2.0).abs() < 1e-9);
    }
}
