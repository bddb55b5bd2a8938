use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

use crate::error::{Result, WatchError};
use crate::models::WEBSITE_CATEGORY;
use crate::stats::BootstrapConfig;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Compare dashboard error counts between business-day windows
#[derive(Parser, Debug, Clone)]
#[command(
    name = "errwatch",
    about = "Compare dashboard error counts between business-day windows",
    version
)]
pub struct Settings {
    /// Anchor date (YYYY-MM-DD); defaults to today
    #[arg(short, long, env = "ERRWATCH_DATE")]
    pub date: Option<NaiveDate>,

    /// Business days in the target window
    #[arg(
        long,
        env = "ERRWATCH_TARGET_DAYS",
        default_value = "1",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub target_days: u32,

    /// Business days in the history window
    #[arg(
        long,
        env = "ERRWATCH_HISTORY_DAYS",
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=260)
    )]
    pub history_days: u32,

    /// Report category to compare
    #[arg(long, default_value = WEBSITE_CATEGORY, env = "ERRWATCH_CATEGORY")]
    pub category: String,

    /// Bootstrap resamples per sample
    #[arg(
        long,
        env = "ERRWATCH_RESAMPLES",
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub resamples: u64,

    /// Significance level of the confidence interval
    #[arg(long, env = "ERRWATCH_ALPHA", default_value = "0.05")]
    pub alpha: f64,

    /// Fixed RNG seed for reproducible runs
    #[arg(long, env = "ERRWATCH_SEED")]
    pub seed: Option<u64>,

    /// Directory holding one <YYYY-MM-DD>.json report per day
    #[arg(long, env = "ERRWATCH_REPORTS_DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Fetch attempts per report before giving up
    #[arg(
        long,
        env = "ERRWATCH_RETRIES",
        default_value = "3",
        value_parser = clap::value_parser!(u32).range(1..=20)
    )]
    pub retries: u32,

    /// Write the HTML report to this file instead of stdout
    #[arg(short, long, env = "ERRWATCH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Also write the run summary (windows, results, message) as JSON
    #[arg(long, env = "ERRWATCH_SUMMARY")]
    pub summary: Option<PathBuf>,

    /// Logging level
    #[arg(
        long,
        env = "ERRWATCH_LOG_LEVEL",
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse process arguments, fill in defaults and validate.
    ///
    /// Exits the process on `--help`, `--version` or a usage error, like
    /// [`Parser::parse`].
    pub fn load() -> Result<Self> {
        Self::parse().finish()
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args)
            .map_err(|e| WatchError::Config(e.to_string()))?
            .finish()
    }

    fn finish(self) -> Result<Self> {
        let settings = self.resolve_defaults();
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values clap cannot range-check on its own.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(WatchError::Config(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.category.trim().is_empty() {
            return Err(WatchError::Config("category must not be empty".to_string()));
        }
        Ok(())
    }

    /// Anchor date, falling back to today's local date.
    pub fn anchor_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Reports directory, falling back to `~/.errwatch/reports`.
    pub fn reports_dir(&self) -> PathBuf {
        self.reports_dir.clone().unwrap_or_else(default_reports_dir)
    }

    /// Bootstrap parameters derived from the CLI options.
    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            resamples: usize::try_from(self.resamples).unwrap_or(usize::MAX),
            alpha: self.alpha,
            seed: self.seed,
        }
    }

    /// Fill unset paths/dates and apply the `--debug` flag.
    fn resolve_defaults(mut self) -> Self {
        if self.date.is_none() {
            self.date = Some(Local::now().date_naive());
        }
        if self.reports_dir.is_none() {
            self.reports_dir = Some(default_reports_dir());
        }
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }
        self
    }
}

/// `~/.errwatch/`, or `./.errwatch/` when no home directory is known.
pub fn default_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".errwatch")
}

/// `~/.errwatch/reports/`.
pub fn default_reports_dir() -> PathBuf {
    default_base_dir().join("reports")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
