//! Merging of per-day reports into per-key count sequences.

use errwatch_core::error::Result;
use errwatch_core::models::{AggregatedReport, DayInterval, Report};

use crate::source::ReportSource;

// ── ReportAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that merges daily reports across a window.
pub struct ReportAggregator;

impl ReportAggregator {
    /// Fetch one report per interval of `window`, in order, and merge them.
    ///
    /// The source is called exactly once per interval. The first failing
    /// fetch aborts the aggregation and its error is returned unchanged.
    pub fn aggregate<S: ReportSource + ?Sized>(
        source: &mut S,
        window: &[DayInterval],
    ) -> Result<AggregatedReport> {
        let mut aggregated = AggregatedReport::new();

        for interval in window {
            let report = source.fetch(interval.start, interval.end)?;
            tracing::debug!(
                date = %interval.date(),
                categories = report.len(),
                "merging report"
            );
            Self::merge_report(&mut aggregated, &report);
        }

        Ok(aggregated)
    }

    /// Append every count of `report` to the matching sequence in
    /// `aggregated`, creating categories and keys on first sight.
    pub fn merge_report(aggregated: &mut AggregatedReport, report: &Report) {
        for (category, errors) in report {
            let keys = aggregated.entry(category.clone()).or_default();
            for (key, &count) in errors {
                keys.entry(key.clone()).or_default().push(count);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
