//! Core functionality of the windowed map.
//!
//! This module contains:
//! - The entry type shared by both internal structures
//! - The latest-value index used for point lookups
//! - The insertion log used for averaging
//! - The map combining the two

pub mod entry;
pub mod latest;
pub mod log;
pub mod map;

// Re-export commonly used types
pub use entry::Entry;
pub use latest::{LatestIndex, Lookup};
pub use log::{InsertionLog, WindowAverage};
pub use map::WindowedMap;
