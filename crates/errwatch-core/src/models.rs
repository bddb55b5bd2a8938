use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category compared by default; the dashboard also reports others
/// (e.g. `"Document"`, `"Search"`) which are carried but not compared.
pub const WEBSITE_CATEGORY: &str = "Website";

/// Date format used in subjects and report file names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Occurrence counts for one interval: category → error key → count.
pub type Report = BTreeMap<String, BTreeMap<String, u64>>;

/// Per-key count sequences across a window: category → error key → counts.
///
/// A key contributes one entry per date on which it appeared; absent dates
/// add nothing.
pub type AggregatedReport = BTreeMap<String, BTreeMap<String, Vec<u64>>>;

/// One window: day intervals ordered from most recent to oldest.
pub type DateWindow = Vec<DayInterval>;

// ── DayInterval ───────────────────────────────────────────────────────────────

/// A single calendar day, from local midnight to 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DayInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayInterval {
    /// Build the interval covering `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end = start + Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59);
        Self { start, end }
    }

    /// Calendar date the interval covers.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

// ── ConfidenceInterval ────────────────────────────────────────────────────────

/// Two-sided bootstrap interval for the difference of medians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// `true` when the whole interval lies strictly above zero.
    pub fn is_increase(&self) -> bool {
        self.low > 0.0
    }
}

// ── ComparisonResult ──────────────────────────────────────────────────────────

/// Outcome of comparing a target window against its history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Keys seen in the target window but never in the history window.
    pub new_errors: BTreeMap<String, Vec<u64>>,
    /// Keys whose median occurrence rate went up significantly.
    pub errors_increased: BTreeMap<String, ConfidenceInterval>,
}

impl ComparisonResult {
    /// `true` when there is nothing to report.
    pub fn is_empty(&self) -> bool {
        self.new_errors.is_empty() && self.errors_increased.is_empty()
    }
}

// ── Notification ──────────────────────────────────────────────────────────────

/// A rendered message ready for a notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: String,
    /// HTML body.
    pub body: String,
}
