//! JSON-file backed report source.
//!
//! Reads one `<YYYY-MM-DD>.json` document per day from a directory. Each
//! document maps category → error key → occurrence count:
//!
//! ```json
//! { "Website": { "NullPointerException": 3 }, "Search": { "Timeout": 1 } }
//! ```

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use errwatch_core::error::{Result, WatchError};
use errwatch_core::models::{Report, DATE_FORMAT};

use crate::source::ReportSource;

/// Report source reading daily JSON files from `dir`.
#[derive(Debug, Clone)]
pub struct JsonReportSource {
    dir: PathBuf,
}

impl JsonReportSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the report file covering `date`.
    pub fn report_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}.json", date.format(DATE_FORMAT)))
    }

    /// Load the report for `date`.
    pub fn load(&self, date: NaiveDate) -> Result<Report> {
        let path = self.report_path(date);
        if !path.exists() {
            return Err(WatchError::ReportNotFound(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|source| WatchError::ReportRead {
            path: path.clone(),
            source,
        })?;
        let report: Report = serde_json::from_str(&content)?;

        tracing::debug!(
            path = %path.display(),
            categories = report.len(),
            "loaded report"
        );
        Ok(report)
    }

    /// Atomically write `report` as the file for `date`, creating the
    /// directory if needed.
    pub fn store(&self, date: NaiveDate, report: &Report) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.report_path(date);
        let json = serde_json::to_string_pretty(report)?;

        // Write to a temp file then rename.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &path)?;

        Ok(path)
    }
}

impl ReportSource for JsonReportSource {
    fn fetch(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> Result<Report> {
        if start.date() != end.date() {
            tracing::warn!(
                start = %start,
                end = %end,
                "interval spans several days; using start date"
            );
        }
        self.load(start.date())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
