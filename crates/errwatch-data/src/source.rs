//! Report sources and the decorators wrapped around them.
//!
//! A [`ReportSource`] returns the per-category, per-key occurrence counts for
//! one day interval. [`CachingReportSource`] memoizes by interval and
//! [`RetryingReportSource`] retries transient failures with back-off.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use chrono::NaiveDateTime;
use errwatch_core::error::{Result, WatchError};
use errwatch_core::models::{DayInterval, Report};

// ── ReportSource ──────────────────────────────────────────────────────────────

/// Anything that can produce a [`Report`] for an exact interval.
pub trait ReportSource {
    /// Fetch the occurrence counts recorded between `start` and `end`.
    fn fetch(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Report>;

    /// Convenience wrapper taking a [`DayInterval`].
    fn fetch_interval(&mut self, interval: &DayInterval) -> Result<Report> {
        self.fetch(interval.start, interval.end)
    }
}

impl<S: ReportSource + ?Sized> ReportSource for &mut S {
    fn fetch(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Report> {
        (**self).fetch(start, end)
    }
}

impl<S: ReportSource + ?Sized> ReportSource for Box<S> {
    fn fetch(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Report> {
        (**self).fetch(start, end)
    }
}

// ── CachingReportSource ───────────────────────────────────────────────────────

/// In-memory memoization of an inner source, keyed by interval.
pub struct CachingReportSource<S> {
    inner: S,
    cache: HashMap<DayInterval, Report>,
    hits: usize,
    misses: usize,
}

impl<S: ReportSource> CachingReportSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Number of fetches answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of fetches forwarded to the inner source.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop every cached report.
    pub fn invalidate(&mut self) {
        self.cache.clear();
        tracing::debug!("report cache invalidated");
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ReportSource> ReportSource for CachingReportSource<S> {
    fn fetch(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Report> {
        let key = DayInterval { start, end };
        if let Some(report) = self.cache.get(&key) {
            self.hits += 1;
            tracing::debug!(start = %start, end = %end, "report served from cache");
            return Ok(report.clone());
        }

        self.misses += 1;
        let report = self.inner.fetch(start, end)?;
        self.cache.insert(key, report.clone());
        Ok(report)
    }
}

// ── RetryingReportSource ──────────────────────────────────────────────────────

/// Default pause added per retry (attempt 2 → 100 ms, attempt 3 → 200 ms, …).
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Retries transient fetch failures of an inner source.
///
/// Missing reports and malformed documents are returned immediately; only
/// I/O-style failures are retried.
pub struct RetryingReportSource<S> {
    inner: S,
    max_attempts: u32,
    backoff: Duration,
}

impl<S: ReportSource> RetryingReportSource<S> {
    /// Wrap `inner`, trying each fetch at most `max_attempts` times
    /// (minimum 1).
    pub fn new(inner: S, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Override the per-attempt back-off step.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ReportSource> ReportSource for RetryingReportSource<S> {
    fn fetch(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Report> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let sleep = self.backoff * attempt;
                tracing::debug!(
                    attempt,
                    sleep_ms = sleep.as_millis() as u64,
                    "retrying fetch after back-off"
                );
                thread::sleep(sleep);
            }

            match self.inner.fetch(start, end) {
                Ok(report) => return Ok(report),
                Err(e) if is_transient(&e) && attempt + 1 < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        start = %start,
                        error = %e,
                        "report fetch attempt failed"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// `true` for failures that may succeed when retried.
pub fn is_transient(err: &WatchError) -> bool {
    matches!(
        err,
        WatchError::Fetch(_) | WatchError::Io(_) | WatchError::ReportRead { .. }
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
