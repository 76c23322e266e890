//! Operation counters for a windowed map.
//!
//! These track how the map is being used (reads that hit, reads that found
//! an expired entry, log trimming) without recording keys or values.

pub mod counters;

// Re-export commonly used types
pub use counters::{MapStats, StatsSnapshot};
