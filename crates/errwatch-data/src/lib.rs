//! Data ingestion layer for errwatch.
//!
//! Report sources (JSON files, caching and retrying decorators) and the
//! aggregation of daily reports into per-key count sequences.

pub mod aggregator;
pub mod reader;
pub mod source;

pub use errwatch_core as core;
