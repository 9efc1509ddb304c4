//! Normalized snow-conditions schema.
//!
//! Every source extractor produces [`AreaRecord`]s in this shape, the merger
//! folds them into an [`AggregateResult`], and the JSON serialization of that
//! result is what the dashboard renders. Keys are camelCase on the wire.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Canonical resort key.
///
/// Declaration order is display order, and `BTreeMap<ResortId, _>` iterates
/// in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResortId {
    Chamonix,
    Vallorcine,
    SaintGervais,
    LesContamines,
    Combloux,
}

impl ResortId {
    pub const ALL: [ResortId; 5] = [
        ResortId::Chamonix,
        ResortId::Vallorcine,
        ResortId::SaintGervais,
        ResortId::LesContamines,
        ResortId::Combloux,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResortId::Chamonix => "chamonix",
            ResortId::Vallorcine => "vallorcine",
            ResortId::SaintGervais => "saint-gervais",
            ResortId::LesContamines => "les-contamines",
            ResortId::Combloux => "combloux",
        }
    }
}

impl fmt::Display for ResortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream page an extractor strategy is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    Mbnr,
    Skiinfo,
    LesContaminesMeteo,
    LesContaminesOuverture,
}

impl SourceId {
    pub const ALL: [SourceId; 4] = [
        SourceId::Mbnr,
        SourceId::Skiinfo,
        SourceId::LesContaminesMeteo,
        SourceId::LesContaminesOuverture,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::Mbnr => "mbnr",
            SourceId::Skiinfo => "skiinfo",
            SourceId::LesContaminesMeteo => "les-contamines-meteo",
            SourceId::LesContaminesOuverture => "les-contamines-ouverture",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownSource(s.to_owned()))
    }
}

/// Canonical snow surface condition.
///
/// Serialized as its display label. A phrase that matches no keyword is
/// carried verbatim in [`SnowQuality::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SnowQuality {
    Powder,
    Fresh,
    Wet,
    Groomed,
    HardIcy,
    Spring,
    #[default]
    Unknown,
    Other(String),
}

impl SnowQuality {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            SnowQuality::Powder => "Powder",
            SnowQuality::Fresh => "Fresh",
            SnowQuality::Wet => "Wet",
            SnowQuality::Groomed => "Groomed",
            SnowQuality::HardIcy => "Hard/Icy",
            SnowQuality::Spring => "Spring",
            SnowQuality::Unknown => "Unknown",
            SnowQuality::Other(raw) => raw,
        }
    }
}

impl From<String> for SnowQuality {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Powder" => SnowQuality::Powder,
            "Fresh" => SnowQuality::Fresh,
            "Wet" => SnowQuality::Wet,
            "Groomed" | "Groomed/Packed" => SnowQuality::Groomed,
            "Hard/Icy" => SnowQuality::HardIcy,
            "Spring" | "Spring snow" => SnowQuality::Spring,
            "" | "Unknown" | "—" => SnowQuality::Unknown,
            other => SnowQuality::Other(other.to_owned()),
        }
    }
}

impl From<SnowQuality> for String {
    fn from(quality: SnowQuality) -> Self {
        match quality {
            SnowQuality::Other(raw) => raw,
            known => known.label().to_owned(),
        }
    }
}

impl fmt::Display for SnowQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Open/total slope counts per difficulty colour, each as `"open/total"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopeBreakdown {
    pub green: Option<String>,
    pub blue: Option<String>,
    pub red: Option<String>,
    pub black: Option<String>,
}

impl SlopeBreakdown {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.green.is_none() && self.blue.is_none() && self.red.is_none() && self.black.is_none()
    }
}

/// One row of a station bulletin table (altitude-tagged measuring point).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StationMeasurement {
    pub name: String,
    pub altitude: Option<String>,
    pub snow_depth: Option<String>,
    pub fresh_snow: Option<String>,
    pub temperature: Option<String>,
    pub wind_direction: Option<String>,
    pub wind_speed: Option<String>,
}

impl StationMeasurement {
    /// Altitude in metres, parsed from the `"2450m"` form.
    #[must_use]
    pub fn altitude_meters(&self) -> Option<u32> {
        self.altitude
            .as_deref()
            .map(|alt| alt.trim_end_matches('m').trim())
            .and_then(|digits| digits.parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowForecastDay {
    pub day: String,
    pub amount: String,
}

/// Conditions for one ski area (sub-zone or lift sector) of a resort.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaRecord {
    pub name: String,
    pub altitude_meters: Option<String>,
    /// `None` means the classifier rejected the area; such records never reach
    /// a [`ResortSnapshot`].
    pub resort_id: Option<ResortId>,
    pub snow_depth_top: Option<String>,
    pub snow_depth_base: Option<String>,
    pub snow_quality: SnowQuality,
    pub fresh_snow_24h: Option<String>,
    pub fresh_snow_detail: Option<String>,
    pub lifts_open: Option<u32>,
    pub lifts_total: Option<u32>,
    pub slopes_open: Option<u32>,
    pub slopes_total: Option<u32>,
    #[serde(skip_serializing_if = "SlopeBreakdown::is_empty")]
    pub slope_breakdown: SlopeBreakdown,
    pub temperature_morning: Option<String>,
    pub temperature_afternoon: Option<String>,
    pub avalanche_risk: Option<String>,
    pub avalanche_detail: Option<String>,
    pub wind: Option<String>,
    pub visibility: Option<String>,
    pub is_closed: bool,
    pub closure_reason: Option<String>,
    pub last_update: Option<String>,
    pub last_snowfall: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snow_forecast: Vec<SnowForecastDay>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stations: Vec<StationMeasurement>,
    pub weather_report: Option<String>,
    pub message_of_day: Option<String>,
    pub note: Option<String>,
}

impl AreaRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, altitude_meters: Option<String>) -> Self {
        Self {
            name: name.into(),
            altitude_meters,
            ..Self::default()
        }
    }

    /// Applies the closure invariant: zero open lifts means closed.
    #[must_use]
    pub fn with_derived_closure(mut self) -> Self {
        if self.lifts_open == Some(0) {
            self.is_closed = true;
        }
        self
    }

    /// Combines two partial records describing the same area.
    ///
    /// Fields already set on `self` win; unset ones are filled from `other`.
    /// Lift and slope counts are taken as pairs so an open count is never
    /// combined with another source's total. Closure is the union of both.
    #[must_use]
    pub fn overlay(self, other: AreaRecord) -> Self {
        let (lifts_open, lifts_total) = if self.lifts_open.is_some() && self.lifts_total.is_some() {
            (self.lifts_open, self.lifts_total)
        } else {
            (other.lifts_open, other.lifts_total)
        };
        let (slopes_open, slopes_total) =
            if self.slopes_open.is_some() && self.slopes_total.is_some() {
                (self.slopes_open, self.slopes_total)
            } else {
                (other.slopes_open, other.slopes_total)
            };
        let snow_quality = if self.snow_quality == SnowQuality::Unknown {
            other.snow_quality
        } else {
            self.snow_quality
        };

        Self {
            name: self.name,
            altitude_meters: self.altitude_meters.or(other.altitude_meters),
            resort_id: self.resort_id.or(other.resort_id),
            snow_depth_top: self.snow_depth_top.or(other.snow_depth_top),
            snow_depth_base: self.snow_depth_base.or(other.snow_depth_base),
            snow_quality,
            fresh_snow_24h: self.fresh_snow_24h.or(other.fresh_snow_24h),
            fresh_snow_detail: self.fresh_snow_detail.or(other.fresh_snow_detail),
            lifts_open,
            lifts_total,
            slopes_open,
            slopes_total,
            slope_breakdown: SlopeBreakdown {
                green: self.slope_breakdown.green.or(other.slope_breakdown.green),
                blue: self.slope_breakdown.blue.or(other.slope_breakdown.blue),
                red: self.slope_breakdown.red.or(other.slope_breakdown.red),
                black: self.slope_breakdown.black.or(other.slope_breakdown.black),
            },
            temperature_morning: self.temperature_morning.or(other.temperature_morning),
            temperature_afternoon: self.temperature_afternoon.or(other.temperature_afternoon),
            avalanche_risk: self.avalanche_risk.or(other.avalanche_risk),
            avalanche_detail: self.avalanche_detail.or(other.avalanche_detail),
            wind: self.wind.or(other.wind),
            visibility: self.visibility.or(other.visibility),
            is_closed: self.is_closed || other.is_closed,
            closure_reason: self.closure_reason.or(other.closure_reason),
            last_update: self.last_update.or(other.last_update),
            last_snowfall: self.last_snowfall.or(other.last_snowfall),
            snow_forecast: if self.snow_forecast.is_empty() {
                other.snow_forecast
            } else {
                self.snow_forecast
            },
            stations: if self.stations.is_empty() {
                other.stations
            } else {
                self.stations
            },
            weather_report: self.weather_report.or(other.weather_report),
            message_of_day: self.message_of_day.or(other.message_of_day),
            note: self.note.or(other.note),
        }
        .with_derived_closure()
    }
}

/// All published areas of one resort for one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResortSnapshot {
    pub resort_id: ResortId,
    #[serde(default)]
    pub areas: Vec<AreaRecord>,
    /// `None` for curated baseline data.
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub avalanche_risk: Option<String>,
    #[serde(default)]
    pub last_snowfall: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub day: String,
    pub high: String,
    pub low: String,
    pub weather: String,
    pub snow: String,
}

/// Curated multi-day outlook. Carried from the baseline untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub summary: String,
    #[serde(default)]
    pub days: Vec<ForecastDay>,
}

/// What happened to one source during a refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SourceOutcome {
    Live { areas: usize },
    Unavailable { reason: String },
    Malformed { length: usize, minimum: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub source: SourceId,
    pub url: String,
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

impl SourceStatus {
    #[must_use]
    pub fn is_live(&self) -> bool {
        matches!(self.outcome, SourceOutcome::Live { .. })
    }
}

/// The merged dataset handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    #[serde(default)]
    pub page_date: Option<String>,
    pub daily_report: String,
    #[serde(default)]
    pub closure_notices: Vec<String>,
    pub resorts: BTreeMap<ResortId, ResortSnapshot>,
    #[serde(default)]
    pub is_live: bool,
    pub last_updated: String,
    #[serde(default)]
    pub area_count: usize,
    #[serde(default)]
    pub forecast: Option<Forecast>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
