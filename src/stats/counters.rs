//! Atomic operation counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Usage counters for one map.
///
/// Counters are atomic so read paths can record through `&self`.
#[derive(Debug)]
pub struct MapStats {
    /// Number of `put` calls
    puts: AtomicU64,
    /// Reads that found a live entry
    hits: AtomicU64,
    /// Reads that found an entry past its window
    expired_reads: AtomicU64,
    /// Reads of keys that were never inserted
    absent_reads: AtomicU64,
    /// Number of averages computed
    averages: AtomicU64,
    /// Log entries dropped because they left the window
    trimmed: AtomicU64,
    /// When counting started
    started_at: DateTime<Utc>,
}

impl MapStats {
    /// Create a zeroed set of counters starting at `started_at`.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            puts: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            expired_reads: AtomicU64::new(0),
            absent_reads: AtomicU64::new(0),
            averages: AtomicU64::new(0),
            trimmed: AtomicU64::new(0),
            started_at,
        }
    }

    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired_read(&self) {
        self.expired_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_absent_read(&self) {
        self.absent_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_average(&self) {
        self.averages.fetch_add(1, Ordering::Relaxed);
    }

    /// Record `count` log entries trimmed in one pass.
    pub fn record_trimmed(&self, count: u64) {
        self.trimmed.fetch_add(count, Ordering::Relaxed);
    }

    /// Get the current counters, stamped with `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> StatsSnapshot {
        StatsSnapshot {
            puts: self.puts.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            expired_reads: self.expired_reads.load(Ordering::Relaxed),
            absent_reads: self.absent_reads.load(Ordering::Relaxed),
            averages: self.averages.load(Ordering::Relaxed),
            trimmed: self.trimmed.load(Ordering::Relaxed),
            started_at: self.started_at,
            uptime_ms: (now - self.started_at).num_milliseconds().max(0) as u64,
        }
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.puts.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.expired_reads.store(0, Ordering::Relaxed);
        self.absent_reads.store(0, Ordering::Relaxed);
        self.averages.store(0, Ordering::Relaxed);
        self.trimmed.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub puts: u64,
    pub hits: u64,
    pub expired_reads: u64,
    pub absent_reads: u64,
    pub averages: u64,
    pub trimmed: u64,
    pub started_at: DateTime<Utc>,
    pub uptime_ms: u64,
}

impl StatsSnapshot {
    /// Total number of key reads.
    pub fn reads(&self) -> u64 {
        self.hits + self.expired_reads + self.absent_reads
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        format!(
            "Map Statistics:\n\
             - Puts: {}\n\
             - Reads: {} ({} live, {} expired, {} absent)\n\
             - Averages computed: {}\n\
             - Log entries trimmed: {}\n\
             - Uptime: {} ms",
            self.puts,
            self.reads(),
            self.hits,
            self.expired_reads,
            self.absent_reads,
            self.averages,
            self.trimmed,
            self.uptime_ms
        )
    }
}
