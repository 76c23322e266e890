//! Thread-safe handle to a windowed map.
//!
//! One mutex guards both the latest-value index and the insertion log. It is
//! held for the whole of each operation, and nothing inside the critical
//! section blocks or performs I/O.

use crate::clock::{Clock, MonotonicClock};
use crate::core::{Lookup, WindowedMap};
use crate::stats::StatsSnapshot;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable, lock-protected windowed map.
#[derive(Debug)]
pub struct SharedWindowedMap<C: Clock = MonotonicClock> {
    inner: Arc<Mutex<WindowedMap<C>>>,
}

impl<C: Clock> Clone for SharedWindowedMap<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> SharedWindowedMap<C> {
    pub fn new(map: WindowedMap<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    // A panic while the lock is held can at worst leave a put recorded in
    // the index but not the log, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, WindowedMap<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put(&self, key: impl Into<String>, value: i64) {
        self.lock().put(key, value);
    }

    pub fn get(&self, key: &str) -> i64 {
        self.lock().get(key)
    }

    pub fn lookup(&self, key: &str) -> Lookup {
        self.lock().lookup(key)
    }

    pub fn get_average(&self) -> f64 {
        self.lock().get_average()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.lock().stats()
    }

    pub fn reset_stats(&self) {
        self.lock().reset_stats();
    }

    /// Run `f` with exclusive access to the map.
    pub fn with<R>(&self, f: impl FnOnce(&mut WindowedMap<C>) -> R) -> R {
        f(&mut self.lock())
    }
}

impl<C: Clock> From<WindowedMap<C>> for SharedWindowedMap<C> {
    fn from(map: WindowedMap<C>) -> Self {
        Self::new(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::Duration;
    use std::thread;

    #[test]
    fn test_concurrent_puts() {
        let clock = ManualClock::at_epoch();
        let map = SharedWindowedMap::new(WindowedMap::with_clock(1000, clock).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let map = map.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        map.put(format!("w{worker}-{i}"), 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.stats().puts, 100);
        assert_eq!(map.get("w3-24"), 2);
        assert_eq!(map.get_average(), 2.0);
        assert_eq!(map.with(|m| m.key_count()), 100);

        map.reset_stats();
        assert_eq!(map.stats().puts, 0);
    }

    #[test]
    fn test_clones_share_state() {
        let clock = ManualClock::at_epoch();
        let map: SharedWindowedMap<ManualClock> =
            WindowedMap::with_clock(1000, clock.clone()).unwrap().into();
        let other = map.clone();

        map.put("x", 3);
        assert_eq!(other.lookup("x"), Lookup::Live(3));

        clock.advance(Duration::seconds(2));
        assert_eq!(other.lookup("x"), Lookup::Expired);
    }
}
