//! Command handlers. Results go to stdout as JSON; logs go to stderr.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use snowdash_core::{load_baseline, AppConfig, Baseline, SourceId};
use snowdash_scraper::{
    extractor_for, AreaClassifier, Dashboard, FetchPlan, HttpFetcher, SnapshotPipeline,
};

/// One refresh cycle against the live sources.
///
/// Source failures are reported inside the JSON, not as an error exit.
///
/// # Errors
///
/// Returns an error if the baseline or clock configuration is invalid or the
/// HTTP client cannot be built.
pub(crate) async fn run_refresh(
    config: &AppConfig,
    baseline_path: &Path,
    sources: &[SourceId],
    pretty: bool,
) -> anyhow::Result<()> {
    let baseline = load_checked_baseline(baseline_path)?;
    let pipeline = SnapshotPipeline::new(config.display_clock()?);
    let fetcher = HttpFetcher::new(&config.user_agent)?;

    let mut dashboard = Dashboard::new(baseline, pipeline, FetchPlan::from_config(config));
    if !sources.is_empty() {
        dashboard = dashboard.with_sources(sources);
    }

    let result = dashboard.refresh(&fetcher, Utc::now()).await;
    print_json(result, pretty)
}

/// Offline extraction of a saved page, for checking a source's markup.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub(crate) fn run_parse(source: SourceId, file: &Path, pretty: bool) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let extractor = extractor_for(source);
    if html.len() < extractor.min_markup_len() {
        tracing::warn!(
            source = %source,
            length = html.len(),
            minimum = extractor.min_markup_len(),
            "page is shorter than a live refresh would accept"
        );
    }

    let report = extractor.extract(&html, &AreaClassifier::default());
    print_json(&report, pretty)
}

/// # Errors
///
/// Returns an error if the baseline cannot be loaded or fails validation.
pub(crate) fn run_baseline(baseline_path: &Path, pretty: bool) -> anyhow::Result<()> {
    let baseline = load_checked_baseline(baseline_path)?;
    print_json(baseline.result(), pretty)
}

fn load_checked_baseline(path: &Path) -> anyhow::Result<Baseline> {
    load_baseline(path).with_context(|| format!("invalid baseline {}", path.display()))
}

pub(crate) fn render_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    println!("{}", render_json(value, pretty)?);
    Ok(())
}
