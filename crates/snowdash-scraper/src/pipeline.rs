//! Fetched markup in, merged snapshot out.
//!
//! [`SnapshotPipeline::produce_snapshot`] is pure: given the same inputs,
//! baseline and timestamp it returns the same result.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use snowdash_core::{
    fallback_result, merge_extraction, AggregateResult, Baseline, DisplayClock,
    Extraction, ResortId, SourceId, SourceOutcome, SourceStatus,
};

use crate::classify::AreaClassifier;
use crate::error::SourceError;
use crate::fetch::FetchFailure;
use crate::sources::{extractor_for, SourceReport};

/// The fetch result for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInput {
    pub source: SourceId,
    pub outcome: Result<String, FetchFailure>,
}

impl SourceInput {
    #[must_use]
    pub fn markup(source: SourceId, html: impl Into<String>) -> Self {
        Self {
            source,
            outcome: Ok(html.into()),
        }
    }

    #[must_use]
    pub fn failed(source: SourceId, failure: FetchFailure) -> Self {
        Self {
            source,
            outcome: Err(failure),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotPipeline {
    classifier: AreaClassifier,
    clock: DisplayClock,
}

impl SnapshotPipeline {
    #[must_use]
    pub fn new(clock: DisplayClock) -> Self {
        Self {
            classifier: AreaClassifier::default(),
            clock,
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: AreaClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Runs each source's extractor and merges the results over `baseline`.
    ///
    /// Failed or malformed sources only cost their own resorts; when no
    /// source yields a report the baseline is returned with an error.
    #[must_use]
    pub fn produce_snapshot(
        &self,
        inputs: &[SourceInput],
        baseline: &Baseline,
        now: DateTime<Utc>,
    ) -> AggregateResult {
        let mut statuses = Vec::with_capacity(inputs.len());
        let mut reports = Vec::new();

        for input in inputs {
            let url = extractor_for(input.source).url().to_string();
            match self.extract_source(input) {
                Ok(report) => {
                    tracing::debug!(
                        source = %input.source,
                        areas = report.areas.len(),
                        "source extracted"
                    );
                    statuses.push(SourceStatus {
                        source: input.source,
                        url,
                        outcome: SourceOutcome::Live {
                            areas: report.areas.len(),
                        },
                    });
                    reports.push(report);
                }
                Err(err) => {
                    tracing::warn!(
                        source = %input.source,
                        error = %err,
                        "source failed, its resorts keep baseline data"
                    );
                    let outcome = err.outcome().unwrap_or_else(|| SourceOutcome::Unavailable {
                        reason: err.to_string(),
                    });
                    statuses.push(SourceStatus {
                        source: input.source,
                        url,
                        outcome,
                    });
                }
            }
        }

        let live_sources = reports.len();
        let mut result = if reports.is_empty() {
            fallback_result(baseline, all_failed_message(&statuses))
        } else {
            merge_extraction(&combine_reports(reports, now), baseline, &self.clock)
        };
        result.sources = statuses;

        tracing::info!(
            live_sources,
            sources = inputs.len(),
            areas = result.area_count,
            is_live = result.is_live,
            "snapshot produced"
        );
        result
    }

    fn extract_source(&self, input: &SourceInput) -> Result<SourceReport, SourceError> {
        let extractor = extractor_for(input.source);
        let html = input
            .outcome
            .as_ref()
            .map_err(|failure| SourceError::SourceUnavailable {
                source_id: input.source,
                failure: failure.clone(),
            })?;

        let minimum = extractor.min_markup_len();
        if html.len() < minimum {
            return Err(SourceError::MalformedMarkup {
                source_id: input.source,
                length: html.len(),
                minimum,
            });
        }

        Ok(extractor.extract(html, &self.classifier))
    }
}

/// Folds per-source reports into one extraction.
///
/// Page-level texts come from the first report carrying them. Records for the
/// same area from different sources are overlaid, earlier sources winning.
fn combine_reports(reports: Vec<SourceReport>, fetched_at: DateTime<Utc>) -> Extraction {
    let mut extraction = Extraction::empty(fetched_at);
    let mut positions: HashMap<(Option<ResortId>, String), usize> = HashMap::new();
    let mut resort_sources: BTreeMap<ResortId, String> = BTreeMap::new();

    for report in reports {
        if extraction.page_date.is_none() {
            extraction.page_date = report.page_date;
        }
        if extraction.daily_report.is_none() {
            extraction.daily_report = report.daily_report;
        }
        extraction.closure_notices.extend(report.closure_notices);

        for area in report.areas {
            if let Some(resort) = area.resort_id {
                resort_sources
                    .entry(resort)
                    .or_insert_with(|| report.source_url.clone());
            }

            let key = (area.resort_id, area.name.to_lowercase());
            if let Some(&index) = positions.get(&key) {
                let earlier = std::mem::take(&mut extraction.areas[index]);
                extraction.areas[index] = earlier.overlay(area);
            } else {
                positions.insert(key, extraction.areas.len());
                extraction.areas.push(area);
            }
        }
    }

    extraction.resort_sources = resort_sources;
    extraction
}

fn all_failed_message(statuses: &[SourceStatus]) -> String {
    let reasons = statuses
        .iter()
        .map(|status| match &status.outcome {
            SourceOutcome::Unavailable { reason } => format!("{}: {reason}", status.source),
            SourceOutcome::Malformed { length, .. } => {
                format!("{}: {length} bytes of markup", status.source)
            }
            SourceOutcome::Live { .. } => format!("{}: live", status.source),
        })
        .collect::<Vec<_>>();

    if reasons.is_empty() {
        "no sources were fetched; showing snapshot data".to_string()
    } else {
        format!(
            "all sources unavailable ({}); showing snapshot data",
            reasons.join("; ")
        )
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
