//! Folds a fresh extraction into the baseline snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::app_config::DisplayClock;
use crate::baseline::Baseline;
use crate::types::{AggregateResult, AreaRecord, ResortId};

/// Placeholder the MBNR page yields when it carries no bulletin text.
pub const NO_DAILY_REPORT: &str = "No daily report found";

const CLOSED_TODAY: &str = "Closed today";

/// Everything the live sources produced in one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub page_date: Option<String>,
    pub daily_report: Option<String>,
    pub closure_notices: Vec<String>,
    pub areas: Vec<AreaRecord>,
    /// URL of the source that produced each resort's areas.
    pub resort_sources: BTreeMap<ResortId, String>,
    pub fetched_at: DateTime<Utc>,
}

impl Extraction {
    #[must_use]
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            page_date: None,
            daily_report: None,
            closure_notices: Vec::new(),
            areas: Vec::new(),
            resort_sources: BTreeMap::new(),
            fetched_at,
        }
    }
}

/// Merge `extraction` over a copy of `baseline`.
///
/// Each resort with at least one incoming area has its area list replaced
/// wholesale; every other resort keeps its baseline areas.
#[must_use]
pub fn merge_extraction(
    extraction: &Extraction,
    baseline: &Baseline,
    clock: &DisplayClock,
) -> AggregateResult {
    let mut merged = baseline.result().clone();
    merged.is_live = true;
    merged.error = None;
    merged.last_updated = clock.stamp(extraction.fetched_at, "live");

    if let Some(date) = extraction
        .page_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        merged.page_date = Some(date.to_string());
    }

    if let Some(report) = extraction
        .daily_report
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty() && *r != NO_DAILY_REPORT)
    {
        merged.daily_report = report.to_string();
    }

    if !extraction.closure_notices.is_empty() {
        merged.closure_notices.clone_from(&extraction.closure_notices);
    }

    let mut grouped: BTreeMap<ResortId, Vec<&AreaRecord>> = BTreeMap::new();
    for area in &extraction.areas {
        let Some(resort) = area.resort_id else {
            tracing::debug!(area = %area.name, "skipping unclassified area");
            continue;
        };
        if !merged.resorts.contains_key(&resort) {
            tracing::debug!(area = %area.name, resort = %resort, "resort not in baseline");
            continue;
        }
        grouped.entry(resort).or_default().push(area);
    }

    let mut area_count = 0;
    for (resort, areas) in grouped {
        let Some(snapshot) = merged.resorts.get_mut(&resort) else {
            continue;
        };

        if let Some(risk) = areas.iter().find_map(|a| a.avalanche_risk.clone()) {
            snapshot.avalanche_risk = Some(risk);
        }
        if let Some(snowfall) = areas.iter().find_map(|a| a.last_snowfall.clone()) {
            snapshot.last_snowfall = Some(snowfall);
        }

        snapshot.areas = areas.into_iter().cloned().map(publish_area).collect();
        snapshot.fetched_at = Some(extraction.fetched_at);
        if let Some(url) = extraction.resort_sources.get(&resort) {
            snapshot.source_url = Some(url.clone());
        }
        area_count += snapshot.areas.len();
    }
    merged.area_count = area_count;

    merged
}

/// The baseline unchanged, carrying `error` for display.
#[must_use]
pub fn fallback_result(baseline: &Baseline, error: impl Into<String>) -> AggregateResult {
    let mut result = baseline.result().clone();
    result.error = Some(error.into());
    result
}

fn publish_area(area: AreaRecord) -> AreaRecord {
    let mut area = area.with_derived_closure();
    if area.is_closed && area.note.is_none() {
        area.note = Some(
            area.closure_reason
                .clone()
                .unwrap_or_else(|| CLOSED_TODAY.to_string()),
        );
    }
    area
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::SnowQuality;

    const BUNDLED: &str = include_str!("../../../config/baseline.yaml");

    fn baseline() -> Baseline {
        Baseline::from_yaml_str(BUNDLED).unwrap()
    }

    fn clock() -> DisplayClock {
        DisplayClock::new(60, "CET").unwrap()
    }

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 17, 7, 45, 0).unwrap()
    }

    fn chamonix_area(name: &str, lifts_open: u32) -> AreaRecord {
        AreaRecord {
            resort_id: Some(ResortId::Chamonix),
            snow_depth_top: Some("240cm".to_string()),
            snow_quality: SnowQuality::Powder,
            lifts_open: Some(lifts_open),
            lifts_total: Some(12),
            ..AreaRecord::new(name, Some("2525m".to_string()))
        }
    }

    #[test]
    fn chamonix_only_extraction_replaces_chamonix_alone() {
        let baseline = baseline();
        let mut extraction = Extraction::empty(fetched_at());
        extraction.areas = vec![chamonix_area("Brévent", 9), chamonix_area("Flégère", 4)];
        extraction.resort_sources.insert(
            ResortId::Chamonix,
            "https://www.montblancnaturalresort.com/en/info-live".to_string(),
        );

        let merged = merge_extraction(&extraction, &baseline, &clock());

        let chamonix = &merged.resorts[&ResortId::Chamonix];
        assert_eq!(chamonix.areas.len(), 2);
        assert_eq!(chamonix.areas[0].name, "Brévent");
        assert_eq!(chamonix.areas[0].lifts_open, Some(9));
        assert_eq!(chamonix.fetched_at, Some(fetched_at()));
        assert_eq!(
            chamonix.source_url.as_deref(),
            Some("https://www.montblancnaturalresort.com/en/info-live")
        );

        for resort in ResortId::ALL.into_iter().filter(|r| *r != ResortId::Chamonix) {
            assert_eq!(
                merged.resorts[&resort],
                baseline.result().resorts[&resort],
                "{resort} must be untouched"
            );
        }
        assert_eq!(merged.area_count, 2);
    }

    #[test]
    fn empty_extraction_keeps_every_baseline_area() {
        let baseline = baseline();
        let merged = merge_extraction(&Extraction::empty(fetched_at()), &baseline, &clock());

        assert_eq!(merged.resorts, baseline.result().resorts);
        assert_eq!(merged.daily_report, baseline.result().daily_report);
        assert_eq!(merged.area_count, 0);
        assert!(merged.is_live);
    }

    #[test]
    fn merge_marks_live_with_local_timestamp() {
        let merged = merge_extraction(&Extraction::empty(fetched_at()), &baseline(), &clock());
        assert_eq!(
            merged.last_updated,
            "Tuesday 17 February 2026 — 08:45 CET (live)"
        );
    }

    #[test]
    fn merge_never_mutates_baseline() {
        let baseline = baseline();
        let before = baseline.clone();
        let mut extraction = Extraction::empty(fetched_at());
        extraction.areas = vec![chamonix_area("Brévent", 0)];
        let _ = merge_extraction(&extraction, &baseline, &clock());
        assert_eq!(baseline, before);
        assert!(!baseline.result().is_live);
    }

    #[test]
    fn placeholder_daily_report_keeps_baseline_text() {
        let baseline = baseline();
        let mut extraction = Extraction::empty(fetched_at());
        extraction.daily_report = Some(NO_DAILY_REPORT.to_string());
        let merged = merge_extraction(&extraction, &baseline, &clock());
        assert_eq!(merged.daily_report, baseline.result().daily_report);
    }

    #[test]
    fn daily_report_and_notices_replace_baseline() {
        let mut extraction = Extraction::empty(fetched_at());
        extraction.daily_report = Some("Sunny spells, light winds.".to_string());
        extraction.closure_notices = vec!["The Balme ski area is closed today.".to_string()];
        extraction.page_date = Some("Tuesday, February 17, 2026".to_string());
        let merged = merge_extraction(&extraction, &baseline(), &clock());
        assert_eq!(merged.daily_report, "Sunny spells, light winds.");
        assert_eq!(
            merged.closure_notices,
            vec!["The Balme ski area is closed today.".to_string()]
        );
        assert_eq!(merged.page_date.as_deref(), Some("Tuesday, February 17, 2026"));
    }

    #[test]
    fn zero_lift_area_published_closed_with_note() {
        let mut extraction = Extraction::empty(fetched_at());
        extraction.areas = vec![chamonix_area("Grands Montets", 0)];
        let merged = merge_extraction(&extraction, &baseline(), &clock());
        let area = &merged.resorts[&ResortId::Chamonix].areas[0];
        assert!(area.is_closed);
        assert_eq!(area.note.as_deref(), Some("Closed today"));
    }

    #[test]
    fn closure_reason_becomes_note() {
        let mut area = chamonix_area("Brévent", 3);
        area.is_closed = true;
        area.closure_reason = Some("wind".to_string());
        let mut extraction = Extraction::empty(fetched_at());
        extraction.areas = vec![area];
        let merged = merge_extraction(&extraction, &baseline(), &clock());
        assert_eq!(
            merged.resorts[&ResortId::Chamonix].areas[0].note.as_deref(),
            Some("wind")
        );
    }

    #[test]
    fn supplementary_fields_take_first_non_null() {
        let baseline = baseline();
        let mut first = chamonix_area("Brévent", 5);
        first.last_snowfall = Some("2/17/2026".to_string());
        let mut second = chamonix_area("Flégère", 5);
        second.avalanche_risk = Some("3/5".to_string());
        second.last_snowfall = Some("2/10/2026".to_string());

        let mut extraction = Extraction::empty(fetched_at());
        extraction.areas = vec![first, second];
        let merged = merge_extraction(&extraction, &baseline, &clock());

        let chamonix = &merged.resorts[&ResortId::Chamonix];
        assert_eq!(chamonix.avalanche_risk.as_deref(), Some("3/5"));
        assert_eq!(chamonix.last_snowfall.as_deref(), Some("2/17/2026"));
    }

    #[test]
    fn supplementary_fields_fall_back_to_baseline() {
        let mut extraction = Extraction::empty(fetched_at());
        extraction.areas = vec![chamonix_area("Brévent", 5)];
        let merged = merge_extraction(&extraction, &baseline(), &clock());
        let chamonix = &merged.resorts[&ResortId::Chamonix];
        assert_eq!(chamonix.avalanche_risk.as_deref(), Some("4/5"));
        assert_eq!(chamonix.last_snowfall.as_deref(), Some("2/16/2026"));
    }

    #[test]
    fn unclassified_areas_are_skipped() {
        let baseline = baseline();
        let mut extraction = Extraction::empty(fetched_at());
        extraction.areas = vec![AreaRecord::new("Vormaine", Some("1500m".to_string()))];
        let merged = merge_extraction(&extraction, &baseline, &clock());
        assert_eq!(merged.resorts, baseline.result().resorts);
        assert_eq!(merged.area_count, 0);
    }

    #[test]
    fn fallback_result_attaches_error() {
        let baseline = baseline();
        let result = fallback_result(&baseline, "all sources unavailable");
        assert_eq!(result.error.as_deref(), Some("all sources unavailable"));
        assert!(!result.is_live);
        assert_eq!(result.resorts, baseline.result().resorts);
        assert_eq!(result.last_updated, baseline.result().last_updated);
    }
}
