//! End-to-end comparison run.
//!
//! [`ErrorCompareReporter`] generates the two business-day windows around an
//! anchor date, aggregates the target window and then the history window from
//! a [`ReportSource`], classifies the keys with a [`ComparisonEngine`] and
//! hands the rendered notification to a [`NotificationSink`].

use std::path::Path;

use chrono::NaiveDate;
use errwatch_core::business_days::generate_windows;
use errwatch_core::error::{Result, WatchError};
use errwatch_core::models::{ComparisonResult, DateWindow, Notification};
use errwatch_data::aggregator::ReportAggregator;
use errwatch_data::source::ReportSource;
use serde::{Deserialize, Serialize};

use crate::comparison::ComparisonEngine;
use crate::detector::RateChangeDetector;
use crate::notifier::NotificationSink;

/// Which dates a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    pub anchor: NaiveDate,
    pub target_days: usize,
    pub history_days: usize,
}

impl WindowPlan {
    pub fn new(anchor: NaiveDate, target_days: usize, history_days: usize) -> Self {
        Self {
            anchor,
            target_days,
            history_days,
        }
    }

    /// `(target, history)` windows, most recent day first.
    pub fn windows(&self) -> (DateWindow, DateWindow) {
        generate_windows(self.anchor, self.target_days, self.history_days)
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub target_window: DateWindow,
    pub history_window: DateWindow,
    pub result: ComparisonResult,
    pub notification: Notification,
}

impl RunSummary {
    /// Atomically write the summary as pretty-printed JSON.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        tracing::debug!(path = %path.display(), "run summary written");
        Ok(())
    }

    /// Read a summary written by [`RunSummary::save_to`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WatchError::ReportRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Runs the whole fetch → aggregate → compare → notify pipeline.
pub struct ErrorCompareReporter<S, D, N> {
    plan: WindowPlan,
    source: S,
    engine: ComparisonEngine<D>,
    sink: N,
}

impl<S, D, N> ErrorCompareReporter<S, D, N>
where
    S: ReportSource,
    D: RateChangeDetector,
    N: NotificationSink,
{
    pub fn new(plan: WindowPlan, source: S, engine: ComparisonEngine<D>, sink: N) -> Self {
        Self {
            plan,
            source,
            engine,
            sink,
        }
    }

    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Execute one run. Exactly one notification is sent when the run
    /// succeeds; any failure before that aborts the run without sending.
    pub fn run(&mut self) -> Result<RunSummary> {
        let (target_window, history_window) = self.plan.windows();
        tracing::info!(
            anchor = %self.plan.anchor,
            target_days = target_window.len(),
            history_days = history_window.len(),
            "starting error comparison"
        );

        let target = ReportAggregator::aggregate(&mut self.source, &target_window)?;
        let history = ReportAggregator::aggregate(&mut self.source, &history_window)?;

        let result = self.engine.compare(&target, &history)?;
        let notification = self.engine.render(&target_window, &history_window, &result);

        self.sink.send(&notification.subject, &notification.body)?;
        tracing::info!(subject = %notification.subject, "notification sent");

        Ok(RunSummary {
            target_window,
            history_window,
            result,
            notification,
        })
    }

    pub fn into_parts(self) -> (S, ComparisonEngine<D>, N) {
        (self.source, self.engine, self.sink)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
