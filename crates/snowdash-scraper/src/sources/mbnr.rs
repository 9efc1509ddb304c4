//! Mont Blanc Natural Resort "info-live" page (English).
//!
//! One page covers Chamonix, Vallorcine and Saint-Gervais. Areas are found by
//! their "Name - 2525m" heading elements and each heading's window is parsed
//! with the English label set. Pages without heading elements fall back to
//! scanning the flattened text for headings.

use std::sync::LazyLock;

use regex::Regex;
use snowdash_core::{AreaRecord, SourceId};

use super::{SourceExtractor, SourceReport};
use crate::classify::AreaClassifier;
use crate::extract::{
    bounded, centimetres, counted_pair, first_capture, translate_quality, CLOSURE_REASON_MAX_CHARS,
};
use crate::normalize::normalize_markup;
use crate::segment::{segment_by_headings, segment_by_known_headings, Segment};

const URL: &str = "https://www.montblancnaturalresort.com/en/info-live";
const HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml"),
    ("Accept-Language", "en-GB,en;q=0.9"),
];
const DAILY_REPORT_MAX_CHARS: usize = 300;

/// Free-text values end at the next capitalized field label or at any
/// character that is neither a letter nor a space.
const LABEL_STOP: &str =
    r"(?:Snow|Fresh|Last|Visibility|Wind|Closed|Lifts?|Trains?|Slopes?|[^\p{L}\s]|$)";

static HEADING_ELEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]\s*>").expect("valid regex"));

static PAGE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday),\s+([A-Z][a-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?\s+(\d{4})",
    )
    .expect("valid regex")
});
static DAILY_REPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)Daily report\s+(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)[^.]*?\d{4}\s+(.*?)\s*(?:Opening|Lift|$)",
    )
    .expect("valid regex")
});
static DAILY_REPORT_LOOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Daily report[^A-Z]*([A-Z].{20,300}?)\s*(?:Opening|Lift|$)")
        .expect("valid regex")
});
static CLOSURE_NOTICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bThe\s+([\w\s\-()]+?)\s+(?:ski\s+area|site|will\s+be)\s+(?:is\s+)?closed[^.]*\.",
    )
    .expect("valid regex")
});

static SNOW_HEIGHT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Snow\s+height\s*:?\s*\**\s*(\d[\d\s]*?)\s*cm").expect("valid regex")
});
static SNOW_QUALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i:Snow\s+quality)\s*:?\s*\**\s*(\p{{L}}[\p{{L}}\s]*?)\s*{LABEL_STOP}"))
        .expect("valid regex")
});
static FRESH_SNOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Fresh\s+snow\s*:?\s*\**\s*(\d[\d\s]*?)\s*cm").expect("valid regex")
});
static LAST_SNOWFALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Last\s+snow\s*fall?\s*:?\s*\**\s*([\d/]+)").expect("valid regex")
});
static VISIBILITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Visibility\s*:?\s*\**\s*([^.]{3,40}?)\s*(?:Wind|$)").expect("valid regex")
});
static WIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:Wind)\s*:?\s*\**\s*(\d[\d.]*\s*[Kk]m/h\s*[A-Z]{1,3})\b").expect("valid regex")
});
static AVALANCHE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d)\s*/\s*5\s+Avalanche").expect("valid regex"));
static TEMP_MORNING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(-?\d+)\s*°C\s+Morning").expect("valid regex"));
static TEMP_AFTERNOON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(-?\d+)\s*°C\s+Afternoon").expect("valid regex"));
static LIFTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bLifts?\s*\(\s*(\d+)\s*/\s*(\d+)\s*\)").expect("valid regex")
});
static TRAINS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bTrains?\s*(?:&\s*Visits?)?\s*\(\s*(\d+)\s*/\s*(\d+)\s*\)")
        .expect("valid regex")
});
static SLOPES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSlopes?\s*\(\s*(\d+)\s*/\s*(\d+)\s*\)").expect("valid regex")
});
static CLOSED_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bClosed\s+(?:all\s+day|for\s+the\s+day|today)|\bClosed\s*:\s*(?:bad|avalanch|wind)",
    )
    .expect("valid regex")
});
static CLOSURE_REASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i:\bClosed)\s*[:\s]\s*(\p{{L}}[\p{{L}}\s]*?)\s*{LABEL_STOP}"))
        .expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Mbnr;

impl SourceExtractor for Mbnr {
    fn id(&self) -> SourceId {
        SourceId::Mbnr
    }

    fn url(&self) -> &'static str {
        URL
    }

    fn headers(&self) -> &'static [(&'static str, &'static str)] {
        HEADERS
    }

    fn min_markup_len(&self) -> usize {
        1000
    }

    fn extract(&self, html: &str, classifier: &AreaClassifier) -> SourceReport {
        let text = normalize_markup(html);
        let text = text.as_str();

        let mut report = SourceReport::new(SourceId::Mbnr, URL);
        report.page_date = PAGE_DATE_RE
            .captures(text)
            .map(|c| format!("{}, {} {}, {}", &c[1], &c[2], &c[3], &c[4]));
        report.daily_report = first_capture(&DAILY_REPORT_RE, text)
            .or_else(|| first_capture(&DAILY_REPORT_LOOSE_RE, text))
            .map(|r| bounded(r, DAILY_REPORT_MAX_CHARS));
        report.closure_notices = CLOSURE_NOTICE_RE
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .collect();
        report.areas = area_segments(html, text)
            .iter()
            .filter_map(|segment| parse_area(segment, classifier))
            .collect();

        tracing::debug!(
            source = %SourceId::Mbnr,
            areas = report.areas.len(),
            notices = report.closure_notices.len(),
            "parsed info-live page"
        );
        report
    }
}

fn area_segments<'t>(html: &str, text: &'t str) -> Vec<Segment<'t>> {
    let headings: Vec<String> = HEADING_ELEMENT_RE
        .captures_iter(html)
        .map(|caps| normalize_markup(&caps[1]).into_string())
        .collect();

    let segments = segment_by_known_headings(text, &headings);
    if segments.is_empty() {
        segment_by_headings(text)
    } else {
        segments
    }
}

fn parse_area(segment: &Segment<'_>, classifier: &AreaClassifier) -> Option<AreaRecord> {
    let resort = classifier.classify(&segment.name)?;
    let window = segment.window;

    let snow = first_capture(&SNOW_HEIGHT_RE, window).and_then(centimetres);
    let lifts = counted_pair(&LIFTS_RE, window).or_else(|| counted_pair(&TRAINS_RE, window));
    if snow.is_none() && lifts.is_none() {
        tracing::debug!(area = %segment.name, "no snow height or lift count, skipping");
        return None;
    }
    let slopes = counted_pair(&SLOPES_RE, window);

    let area = AreaRecord {
        resort_id: Some(resort),
        snow_depth_top: snow,
        snow_quality: translate_quality(first_capture(&SNOW_QUALITY_RE, window)),
        fresh_snow_24h: first_capture(&FRESH_SNOW_RE, window).and_then(centimetres),
        lifts_open: lifts.map(|(open, _)| open),
        lifts_total: lifts.map(|(_, total)| total),
        slopes_open: slopes.map(|(open, _)| open),
        slopes_total: slopes.map(|(_, total)| total),
        temperature_morning: first_capture(&TEMP_MORNING_RE, window).map(|t| format!("{t}°C")),
        temperature_afternoon: first_capture(&TEMP_AFTERNOON_RE, window)
            .map(|t| format!("{t}°C")),
        avalanche_risk: first_capture(&AVALANCHE_RE, window).map(|n| format!("{n}/5")),
        wind: first_capture(&WIND_RE, window).map(str::to_string),
        visibility: first_capture(&VISIBILITY_RE, window).map(str::to_string),
        is_closed: CLOSED_MARKER_RE.is_match(window),
        last_snowfall: first_capture(&LAST_SNOWFALL_RE, window).map(str::to_string),
        ..AreaRecord::new(segment.name.clone(), segment.altitude.clone())
    };
    let mut area = area.with_derived_closure();
    if area.is_closed {
        area.closure_reason =
            first_capture(&CLOSURE_REASON_RE, window).map(|r| bounded(r, CLOSURE_REASON_MAX_CHARS));
    }
    Some(area)
}
