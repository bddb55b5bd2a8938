//! Comparison runtime for errwatch.
//!
//! Ties the data layer to the statistics: rate-change detection, the
//! target/history comparison, notification sinks and the end-to-end run.

pub mod comparison;
pub mod detector;
pub mod notifier;
pub mod orchestrator;

pub use errwatch_core as core;
pub use errwatch_data as data;
