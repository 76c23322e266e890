//! Windowed Map - a key-value store with a trailing visibility window.
//!
//! Each value stored under a string key is visible for a fixed window after
//! it was inserted. After that it reads as expired, without any background
//! purge: expiry is worked out from the clock on every read.
//!
//! The map also reports the average of every value inserted within the
//! window, counted per insertion rather than per key.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       WindowedMap                        │
//! ├──────────────────────────────────────────────────────────┤
//! │         put ───────┬───────────────────┐                 │
//! │                    ▼                   ▼                 │
//! │           ┌──────────────┐    ┌────────────────┐         │
//! │           │ LatestIndex  │    │  InsertionLog  │         │
//! │           │ key -> Entry │    │ Entry, Entry.. │         │
//! │           └──────────────┘    └────────────────┘         │
//! │                    │                   │                 │
//! │              get / lookup         get_average            │
//! │                    ▲                   ▲                 │
//! │                    └─────── Clock ─────┘                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use windowed_map::WindowedMap;
//!
//! let mut map = WindowedMap::new(60 * 60 * 1000).expect("window is positive");
//! map.put("foo", 42);
//! map.put("bar", 76);
//!
//! assert_eq!(map.get("foo"), 42);
//! assert_eq!(map.get_average(), 59.0);
//! ```

pub mod clock;
pub mod config;
pub mod core;
pub mod repl;
pub mod shared;
pub mod stats;

// Re-export key types at crate root for convenience
pub use clock::{Clock, ManualClock, MonotonicClock, SystemClock};
pub use config::{Config, ConfigError, DEFAULT_WINDOW_SIZE_MS};
pub use core::{Entry, Lookup, WindowedMap};
pub use shared::SharedWindowedMap;
pub use stats::{MapStats, StatsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
