//! Target-versus-history comparison of aggregated reports.
//!
//! Only one category (by default [`WEBSITE_CATEGORY`]) is compared; keys that
//! appear only in the target window are new, keys whose bootstrap interval
//! lies above zero have increased.

use errwatch_core::error::{Result, WatchError};
use errwatch_core::formatting::render_notification;
use errwatch_core::models::{
    AggregatedReport, ComparisonResult, DateWindow, Notification, WEBSITE_CATEGORY,
};

use crate::detector::RateChangeDetector;

/// Classifies error keys of one category as new or increased.
pub struct ComparisonEngine<D> {
    detector: D,
    category: String,
}

impl<D: RateChangeDetector> ComparisonEngine<D> {
    /// Compare the `"Website"` category using `detector`.
    pub fn new(detector: D) -> Self {
        Self {
            detector,
            category: WEBSITE_CATEGORY.to_string(),
        }
    }

    /// Compare `category` instead of the default.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Classify every key of the compared category in `target`.
    ///
    /// # Errors
    ///
    /// [`WatchError::MissingCategory`] when either report lacks the category;
    /// detector errors are propagated.
    pub fn compare(
        &mut self,
        target: &AggregatedReport,
        history: &AggregatedReport,
    ) -> Result<ComparisonResult> {
        let target_errors = target
            .get(&self.category)
            .ok_or_else(|| WatchError::MissingCategory {
                category: self.category.clone(),
                period: "target",
            })?;
        let history_errors = history
            .get(&self.category)
            .ok_or_else(|| WatchError::MissingCategory {
                category: self.category.clone(),
                period: "history",
            })?;

        let mut result = ComparisonResult::default();

        for (key, target_counts) in target_errors {
            let Some(history_counts) = history_errors.get(key) else {
                tracing::debug!(key = %key, "new error key");
                result.new_errors.insert(key.clone(), target_counts.clone());
                continue;
            };

            let interval = self
                .detector
                .confidence_interval(target_counts, history_counts)?;
            if interval.is_increase() {
                tracing::debug!(
                    key = %key,
                    low = interval.low,
                    high = interval.high,
                    "error rate increased"
                );
                result.errors_increased.insert(key.clone(), interval);
            }
        }

        tracing::info!(
            category = %self.category,
            new_errors = result.new_errors.len(),
            errors_increased = result.errors_increased.len(),
            "comparison finished"
        );
        Ok(result)
    }

    /// Render `result` as a notification covering both windows.
    pub fn render(
        &self,
        target: &DateWindow,
        history: &DateWindow,
        result: &ComparisonResult,
    ) -> Notification {
        render_notification(&self.category, target, history, result, self.detector.alpha())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
