mod bootstrap;

use anyhow::{Context, Result};
use errwatch_core::settings::Settings;
use errwatch_data::reader::JsonReportSource;
use errwatch_data::source::{CachingReportSource, RetryingReportSource};
use errwatch_runtime::comparison::ComparisonEngine;
use errwatch_runtime::detector::BootstrapDetector;
use errwatch_runtime::notifier::{FileSink, NotificationSink, WriterSink};
use errwatch_runtime::orchestrator::{ErrorCompareReporter, WindowPlan};

fn main() -> Result<()> {
    let settings = Settings::load()?;

    let reports_dir = settings.reports_dir();
    bootstrap::ensure_directories(&reports_dir)?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("errwatch v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        "Category: {}, reports: {}",
        settings.category,
        reports_dir.display()
    );

    let plan = WindowPlan::new(
        settings.anchor_date(),
        settings.target_days as usize,
        settings.history_days as usize,
    );

    let source = CachingReportSource::new(RetryingReportSource::new(
        JsonReportSource::new(reports_dir),
        settings.retries,
    ));
    let engine = ComparisonEngine::new(BootstrapDetector::new(settings.bootstrap_config()))
        .with_category(settings.category.clone());

    let sink: Box<dyn NotificationSink> = match &settings.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(WriterSink::stdout()),
    };

    let mut reporter = ErrorCompareReporter::new(plan, source, engine, sink);
    let summary = reporter
        .run()
        .with_context(|| format!("error comparison for {} failed", plan.anchor))?;

    tracing::info!(
        "{} new error(s), {} increased error(s)",
        summary.result.new_errors.len(),
        summary.result.errors_increased.len()
    );

    if let Some(path) = &settings.summary {
        summary
            .save_to(path)
            .with_context(|| format!("failed to write run summary to {}", path.display()))?;
    }

    Ok(())
}
