//! Core types and algorithms for errwatch.
//!
//! Business-day window generation, the bootstrap rate-change test, HTML
//! rendering of comparison results, CLI settings and the shared error type.

pub mod business_days;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod stats;

pub use error::{Result, WatchError};
