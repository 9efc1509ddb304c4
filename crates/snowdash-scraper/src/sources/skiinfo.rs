//! Skiinfo bulletin for Combloux (French).
//!
//! The resort's own site blocks server-side requests; skiinfo republishes the
//! official figures on a single page with no per-area headings.

use std::sync::LazyLock;

use regex::Regex;
use snowdash_core::{AreaRecord, SlopeBreakdown, SnowForecastDay, SourceId};

use super::{has_observations, SourceExtractor, SourceReport};
use crate::classify::AreaClassifier;
use crate::extract::{centimetres, counted_pair, first_capture, pair_label, translate_quality};
use crate::normalize::normalize_markup;

const URL: &str = "https://www.skiinfo.fr/alpes-du-nord/combloux/bulletin-neige";
const HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml"),
    ("Accept-Language", "fr-FR,fr;q=0.9"),
];
const AREA_NAME: &str = "Combloux–Portes du Mont-Blanc";
const AREA_ALTITUDE: &str = "1930m";
const MAX_FORECAST_DAYS: usize = 7;

static BASE_DEPTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bEn\s+bas\s+(\d[\d\s]*?)\s*cm").expect("valid regex"));
static TOP_DEPTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bEn\s+haut\s+(\d[\d\s]*?)\s*cm").expect("valid regex"));
static BASE_QUALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bEn\s+bas\s+\d[\d\s]*?\s*cm\s+(?:(\p{L}[\p{L}\s]*?)\s*)??(?:En\s+haut|Hauteur|Remont|Piste|[^\p{L}\s]|$)",
    )
    .expect("valid regex")
});
static TOP_QUALITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bEn\s+haut\s+\d[\d\s]*?\s*cm\s+(?:(\p{L}[\p{L}\s]*?)\s*)??(?:Hauteur|Remont|Piste|[^\p{L}\s]|$)",
    )
    .expect("valid regex")
});
static LIFTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bRemont\p{L}*\s+ouvertes?\s+(\d+)\s*/\s*(\d+)").expect("valid regex")
});
static SLOPES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bPistes?\s+ouvertes?\s+(\d+)\s*/\s*(\d+)").expect("valid regex")
});
static GREEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bvertes?\s+ouvertes?\s+(\d+)\s*/\s*(\d+)").expect("valid regex")
});
static BLUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bbleues?\s+ouvertes?\s+(\d+)\s*/\s*(\d+)").expect("valid regex")
});
static RED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\brouges?\s+ouvertes?\s+(\d+)\s*/\s*(\d+)").expect("valid regex")
});
static BLACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bnoires?\s+ouvertes?\s+(\d+)\s*/\s*(\d+)").expect("valid regex")
});
static RECENT_SNOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b24\s*h\s+(\d+)\s*cm").expect("valid regex"));
static FORECAST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(lun|mar|mer|jeu|ven|sam|dim)\.\s+(\d+)\s*cm").expect("valid regex")
});
static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCombloux\s*:\s*(Ouverte|Ferm\p{L}*)").expect("valid regex")
});
static UPDATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bmise\s+[àa]\s+jour\s*:\s*(\d{1,2}\s+\p{L}+\.?)").expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct Skiinfo;

impl SourceExtractor for Skiinfo {
    fn id(&self) -> SourceId {
        SourceId::Skiinfo
    }

    fn url(&self) -> &'static str {
        URL
    }

    fn headers(&self) -> &'static [(&'static str, &'static str)] {
        HEADERS
    }

    fn extract(&self, html: &str, classifier: &AreaClassifier) -> SourceReport {
        let text = normalize_markup(html);
        let mut report = SourceReport::new(SourceId::Skiinfo, URL);
        let Some(resort) = classifier.classify(AREA_NAME) else {
            return report;
        };

        let area = parse_bulletin(text.as_str());
        if has_observations(&area) {
            report.areas.push(AreaRecord {
                resort_id: Some(resort),
                ..area
            });
        } else {
            tracing::debug!(source = %SourceId::Skiinfo, "bulletin carried no observations");
        }
        report
    }
}

fn parse_bulletin(text: &str) -> AreaRecord {
    let lifts = counted_pair(&LIFTS_RE, text);
    let slopes = counted_pair(&SLOPES_RE, text);
    let quality = first_capture(&TOP_QUALITY_RE, text).or_else(|| first_capture(&BASE_QUALITY_RE, text));

    // Without a status line the resort is assumed open.
    let is_closed = first_capture(&STATUS_RE, text)
        .is_some_and(|status| status.to_lowercase().starts_with("ferm"));

    let snow_forecast = FORECAST_RE
        .captures_iter(text)
        .take(MAX_FORECAST_DAYS)
        .map(|caps| SnowForecastDay {
            day: format!("{}.", caps[1].to_lowercase()),
            amount: format!("{}cm", &caps[2]),
        })
        .collect();

    AreaRecord {
        snow_depth_top: first_capture(&TOP_DEPTH_RE, text).and_then(centimetres),
        snow_depth_base: first_capture(&BASE_DEPTH_RE, text).and_then(centimetres),
        snow_quality: translate_quality(quality),
        fresh_snow_24h: first_capture(&RECENT_SNOW_RE, text).and_then(centimetres),
        lifts_open: lifts.map(|(open, _)| open),
        lifts_total: lifts.map(|(_, total)| total),
        slopes_open: slopes.map(|(open, _)| open),
        slopes_total: slopes.map(|(_, total)| total),
        slope_breakdown: SlopeBreakdown {
            green: pair_label(&GREEN_RE, text),
            blue: pair_label(&BLUE_RE, text),
            red: pair_label(&RED_RE, text),
            black: pair_label(&BLACK_RE, text),
        },
        is_closed,
        last_update: first_capture(&UPDATED_RE, text).map(str::to_string),
        snow_forecast,
        ..AreaRecord::new(AREA_NAME, Some(AREA_ALTITUDE.to_string()))
    }
    .with_derived_closure()
}
