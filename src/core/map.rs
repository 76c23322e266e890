//! The windowed map itself.

use super::{Entry, InsertionLog, LatestIndex, Lookup};
use crate::clock::{Clock, MonotonicClock};
use crate::config::{Config, ConfigError};
use crate::stats::{MapStats, StatsSnapshot};
use chrono::Duration;
use tracing::{debug, trace};

/// A string to integer map whose entries are only visible for a fixed
/// window after insertion.
///
/// Two structures hold the same entries:
/// - a latest-value index for point lookups by key
/// - an insertion log, in time order, for averaging
///
/// Expired entries are never purged from the index. They are classified on
/// every read by comparing the clock against the insertion time.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use windowed_map::{ManualClock, WindowedMap};
///
/// let clock = ManualClock::at_epoch();
/// let mut map = WindowedMap::with_clock(60_000, clock.clone()).unwrap();
///
/// map.put("foo", 42);
/// assert_eq!(map.get("foo"), 42);
///
/// clock.advance(Duration::minutes(2));
/// assert_eq!(map.get("foo"), 0);
/// assert_eq!(map.get_average(), 0.0);
/// ```
#[derive(Debug)]
pub struct WindowedMap<C: Clock = MonotonicClock> {
    window: Duration,
    latest: LatestIndex,
    log: InsertionLog,
    clock: C,
    stats: MapStats,
}

impl WindowedMap<MonotonicClock> {
    /// Create a map with a `window_size_ms` millisecond window and a monotonic clock.
    pub fn new(window_size_ms: i64) -> Result<Self, ConfigError> {
        Self::with_clock(window_size_ms, MonotonicClock::new())
    }
}

impl<C: Clock> WindowedMap<C> {
    /// Create a map reading time from `clock`.
    pub fn with_clock(window_size_ms: i64, clock: C) -> Result<Self, ConfigError> {
        Self::from_config(&Config::new(window_size_ms), clock)
    }

    /// Create a map from a configuration.
    pub fn from_config(config: &Config, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let stats = MapStats::new(clock.now());

        Ok(Self {
            window: config.window(),
            latest: LatestIndex::new(),
            log: InsertionLog::new(),
            clock,
            stats,
        })
    }

    /// Record `value` under `key` at the current time.
    pub fn put(&mut self, key: impl Into<String>, value: i64) {
        let key = key.into();
        let entry = Entry::new(self.clock.now(), value);
        trace!(key = %key, value, "put");

        self.latest.insert(key, entry);
        let trimmed = self.log.push(entry, self.window);
        if trimmed > 0 {
            debug!(trimmed, remaining = self.log.len(), "trimmed expired log entries");
            self.stats.record_trimmed(trimmed as u64);
        }
        self.stats.record_put();
    }

    /// Value of `key`, or 0 if the key is expired or was never inserted.
    pub fn get(&self, key: &str) -> i64 {
        self.lookup(key).value_or_zero()
    }

    /// Read `key`, distinguishing expired keys from absent ones.
    pub fn lookup(&self, key: &str) -> Lookup {
        let result = self.latest.lookup(key, self.clock.now(), self.window);
        trace!(key, ?result, "lookup");

        match result {
            Lookup::Live(_) => self.stats.record_hit(),
            Lookup::Expired => self.stats.record_expired_read(),
            Lookup::Absent => self.stats.record_absent_read(),
        }
        result
    }

    /// Mean of every value inserted within the window, 0 if there are none.
    ///
    /// A key inserted twice inside the window contributes twice.
    pub fn get_average(&mut self) -> f64 {
        let result = self.log.average(self.clock.now(), self.window);
        trace!(mean = result.mean, samples = result.samples, "average");

        if result.trimmed > 0 {
            debug!(
                trimmed = result.trimmed,
                remaining = self.log.len(),
                "trimmed expired log entries"
            );
            self.stats.record_trimmed(result.trimmed as u64);
        }
        self.stats.record_average();
        result.mean
    }

    /// Width of the visibility window.
    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn window_size_ms(&self) -> i64 {
        self.window.num_milliseconds()
    }

    /// Number of distinct keys ever inserted, expired ones included.
    pub fn key_count(&self) -> usize {
        self.latest.len()
    }

    /// Number of entries currently retained in the insertion log.
    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current usage counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.clock.now())
    }

    /// Zero the usage counters. Stored entries are untouched.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn map_with_clock(window_ms: i64) -> (WindowedMap<ManualClock>, ManualClock) {
        let clock = ManualClock::at_epoch();
        let map = WindowedMap::with_clock(window_ms, clock.clone()).unwrap();
        (map, clock)
    }

    #[test]
    fn test_rejects_non_positive_window() {
        assert!(matches!(
            WindowedMap::new(0),
            Err(ConfigError::InvalidWindow(0))
        ));
        assert!(WindowedMap::with_clock(-1, ManualClock::at_epoch()).is_err());
    }

    #[test]
    fn test_get_within_and_after_window() {
        let (mut map, clock) = map_with_clock(1000);
        map.put("a", 9);

        clock.advance(Duration::milliseconds(1000));
        assert_eq!(map.get("a"), 9);

        clock.advance(Duration::milliseconds(1));
        assert_eq!(map.get("a"), 0);
        assert_eq!(map.lookup("a"), Lookup::Expired);
    }

    #[test]
    fn test_absent_key() {
        let (map, _) = map_with_clock(1000);
        assert_eq!(map.get("nothing"), 0);
        assert_eq!(map.lookup("nothing"), Lookup::Absent);
    }

    #[test]
    fn test_overwrite_supersedes_old_value() {
        let (mut map, clock) = map_with_clock(1000);
        map.put("k", 1);
        clock.advance(Duration::milliseconds(500));
        map.put("k", 2);

        assert_eq!(map.get("k"), 2);
        clock.advance(Duration::milliseconds(900));
        assert_eq!(map.get("k"), 2);
        assert_eq!(map.key_count(), 1);
    }

    #[test]
    fn test_put_uses_one_timestamp() {
        let (mut map, clock) = map_with_clock(1000);
        map.put("k", 5);
        clock.advance(Duration::milliseconds(1000));

        // Both structures see the entry expire at the same instant.
        assert_eq!(map.get("k"), 5);
        assert_eq!(map.get_average(), 5.0);
        clock.advance(Duration::milliseconds(1));
        assert_eq!(map.get("k"), 0);
        assert_eq!(map.get_average(), 0.0);
    }

    #[test]
    fn test_stats_track_reads() {
        let (mut map, clock) = map_with_clock(1000);
        map.put("a", 1);
        map.get("a");
        map.get("b");
        clock.advance(Duration::seconds(2));
        map.get("a");
        map.get_average();

        let stats = map.stats();
        assert_eq!(stats.puts, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.absent_reads, 1);
        assert_eq!(stats.expired_reads, 1);
        assert_eq!(stats.averages, 1);
        assert_eq!(stats.trimmed, 1);
        assert_eq!(stats.uptime_ms, 2000);
    }

    #[test]
    fn test_reset_stats_keeps_entries() {
        let (mut map, _) = map_with_clock(1000);
        map.put("a", 1);
        map.get("a");
        map.reset_stats();

        let stats = map.stats();
        assert_eq!(stats.puts, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(map.get("a"), 1);
        assert_eq!(map.stats().hits, 1);
    }

    #[test]
    fn test_put_trims_log() {
        let (mut map, clock) = map_with_clock(1000);
        for value in 0..5 {
            map.put("k", value);
        }
        assert_eq!(map.log_len(), 5);

        clock.advance(Duration::seconds(5));
        map.put("k", 99);
        assert_eq!(map.log_len(), 1);
    }
}
