//! Les Contamines "météo" page: alert banners, avalanche level, the station
//! bulletin table and the day's texts.

use std::sync::LazyLock;

use regex::Regex;
use snowdash_core::{AreaRecord, SnowQuality, SourceId, StationMeasurement};

use super::{has_observations, SourceExtractor, SourceReport, CONTAMINES_ALTITUDE, CONTAMINES_AREA};
use crate::classify::AreaClassifier;
use crate::extract::{bounded, first_capture, parse_count, scan_page_quality};
use crate::normalize::{collapse_whitespace, normalize_markup};
use crate::segment::{segment_by_stations, Segment};

const URL: &str = "https://www.lescontamines.net/meteo.html";
const HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml"),
    ("Accept-Language", "en,fr;q=0.9"),
];
const WEATHER_REPORT_MAX_CHARS: usize = 400;

const TOP_STATIONS: &[&str] = &["AIGUILLE", "SIGNAL"];
const BASE_STATIONS: &[&str] = &["ETAPE", "VILLAGE"];
const WIND_STATION: &str = "SIGNAL";

static FRESH_BANNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFra[iî]che\s+(\p{L}+)\s*\+\s*(\d+)\s*cm\s*/\s*24\s*H").expect("valid regex")
});
static AVALANCHE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d)\s*/\s*5\b\s*(TR[ÈE]S\s*FORT|FORT|MARQU\p{L}*|LIMIT\p{L}*|FAIBLE)?")
        .expect("valid regex")
});
static WEATHER_REPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bVigilance\s*:?\s*(.{20,500}?)\s*(?:Message\s+du\s+jour|[ÀA]\s+venir|Venir|Bulletin\s+neige)",
    )
    .expect("valid regex")
});
static MESSAGE_OF_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bMessage\s+du\s+jour\s*:?\s*(.{5,200}?)\s*(?:[ÀA]\s+venir|Venir|Bulletin|$)")
        .expect("valid regex")
});

// Station table cells. The depth cell never carries a leading "+".
static STATION_SNOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^+\d\s])\s*(\d{2,3})\s*cm").expect("valid regex"));
static STATION_FRESH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+\s*(\d+)\s*cm").expect("valid regex"));
static STATION_TEMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-?\d+(?:[.,]\d+)?)\s*°C").expect("valid regex"));
static STATION_WIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([NSEOW]{1,3})\s+(\d+)\s*km/h").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct ContaminesMeteo;

impl SourceExtractor for ContaminesMeteo {
    fn id(&self) -> SourceId {
        SourceId::LesContaminesMeteo
    }

    fn url(&self) -> &'static str {
        URL
    }

    fn headers(&self) -> &'static [(&'static str, &'static str)] {
        HEADERS
    }

    fn extract(&self, html: &str, classifier: &AreaClassifier) -> SourceReport {
        let text = normalize_markup(html);
        let text = text.as_str();
        let mut report = SourceReport::new(SourceId::LesContaminesMeteo, URL);
        let Some(resort) = classifier.classify(CONTAMINES_AREA) else {
            return report;
        };

        let stations: Vec<StationMeasurement> =
            segment_by_stations(text).iter().map(parse_station).collect();
        let (fresh_snow_24h, fresh_snow_detail) = fresh_from_banners(text);
        let avalanche = AVALANCHE_RE.captures(text);

        let top = pick_station(&stations, TOP_STATIONS, Extreme::Highest, |s| s.snow_depth.as_ref());
        let base = pick_station(&stations, BASE_STATIONS, Extreme::Lowest, |s| s.snow_depth.as_ref());
        let top_temp =
            pick_station(&stations, TOP_STATIONS, Extreme::Highest, |s| s.temperature.as_ref());
        let base_temp =
            pick_station(&stations, BASE_STATIONS, Extreme::Lowest, |s| s.temperature.as_ref());
        let wind = stations
            .iter()
            .find(|s| s.name == WIND_STATION)
            .and_then(|s| Some(format!("{} {}", s.wind_speed.as_ref()?, s.wind_direction.as_ref()?)));

        let area = AreaRecord {
            resort_id: Some(resort),
            snow_depth_top: top.and_then(|s| s.snow_depth.clone()),
            snow_depth_base: base.and_then(|s| s.snow_depth.clone()),
            snow_quality: scan_page_quality(text).unwrap_or(SnowQuality::Unknown),
            fresh_snow_24h,
            fresh_snow_detail,
            temperature_morning: top_temp.and_then(|s| s.temperature.clone()),
            temperature_afternoon: base_temp.and_then(|s| s.temperature.clone()),
            avalanche_risk: avalanche.as_ref().map(|caps| format!("{}/5", &caps[1])),
            avalanche_detail: avalanche
                .as_ref()
                .and_then(|caps| caps.get(2))
                .map(|level| collapse_whitespace(level.as_str()).to_uppercase()),
            wind,
            weather_report: first_capture(&WEATHER_REPORT_RE, text)
                .map(|r| bounded(r, WEATHER_REPORT_MAX_CHARS)),
            message_of_day: first_capture(&MESSAGE_OF_DAY_RE, text).map(str::to_string),
            stations,
            ..AreaRecord::new(CONTAMINES_AREA, Some(CONTAMINES_ALTITUDE.to_string()))
        };

        if has_observations(&area) {
            report.areas.push(area);
        } else {
            tracing::debug!(source = %SourceId::LesContaminesMeteo, "no station or banner data");
        }
        report
    }
}

/// Largest banner amount, plus every banner as `"Signal: +39cm, Aiguille: +45cm"`.
fn fresh_from_banners(text: &str) -> (Option<String>, Option<String>) {
    let banners: Vec<(&str, u32)> = FRESH_BANNER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let station = caps.get(1)?.as_str();
            let amount = parse_count(caps.get(2)?.as_str())?;
            Some((station, amount))
        })
        .collect();

    let Some(max) = banners.iter().map(|(_, amount)| *amount).max() else {
        return (None, None);
    };
    let detail = banners
        .iter()
        .map(|(station, amount)| format!("{station}: +{amount}cm"))
        .collect::<Vec<_>>()
        .join(", ");
    (Some(format!("{max}cm")), Some(detail))
}

fn parse_station(segment: &Segment<'_>) -> StationMeasurement {
    let window = segment.window;
    let wind = STATION_WIND_RE.captures(window);
    StationMeasurement {
        name: segment.name.clone(),
        altitude: segment.altitude.clone(),
        snow_depth: first_capture(&STATION_SNOW_RE, window).map(|n| format!("{n}cm")),
        fresh_snow: first_capture(&STATION_FRESH_RE, window).map(|n| format!("+{n}cm")),
        temperature: first_capture(&STATION_TEMP_RE, window)
            .map(|t| format!("{}°C", t.replace(',', "."))),
        wind_direction: wind.as_ref().map(|caps| caps[1].to_string()),
        wind_speed: wind.as_ref().map(|caps| format!("{} km/h", &caps[2])),
    }
}

#[derive(Debug, Clone, Copy)]
enum Extreme {
    Highest,
    Lowest,
}

/// First preferred station carrying the field, else the highest (or lowest)
/// station that does.
fn pick_station<'s>(
    stations: &'s [StationMeasurement],
    preferred: &[&str],
    fallback: Extreme,
    field: impl Fn(&StationMeasurement) -> Option<&String>,
) -> Option<&'s StationMeasurement> {
    let field = &field;
    let measured = move || stations.iter().filter(move |s| field(s).is_some());

    if let Some(station) = preferred
        .iter()
        .find_map(|name| measured().find(|s| s.name == *name))
    {
        return Some(station);
    }

    let by_altitude = |s: &&StationMeasurement| s.altitude_meters().unwrap_or(0);
    match fallback {
        Extreme::Highest => measured().max_by_key(by_altitude),
        Extreme::Lowest => measured().min_by_key(by_altitude),
    }
}
