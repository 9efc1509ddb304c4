//! One extraction strategy per upstream page.
//!
//! Each strategy owns its URL, request headers, markup sanity threshold and
//! rule set; the pipeline looks strategies up by [`SourceId`].

mod contamines_meteo;
mod contamines_ouverture;
mod mbnr;
mod skiinfo;

use serde::Serialize;
use snowdash_core::{AreaRecord, SourceId};

use crate::classify::AreaClassifier;

pub use contamines_meteo::ContaminesMeteo;
pub use contamines_ouverture::ContaminesOuverture;
pub use mbnr::Mbnr;
pub use skiinfo::Skiinfo;

/// Area name both Les Contamines pages describe.
pub(crate) const CONTAMINES_AREA: &str = "Les Contamines–Hauteluce";
pub(crate) const CONTAMINES_ALTITUDE: &str = "2500m";

const DEFAULT_MIN_MARKUP_LEN: usize = 500;

/// What one extractor recovered from one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReport {
    pub source: SourceId,
    pub source_url: String,
    pub page_date: Option<String>,
    pub daily_report: Option<String>,
    pub closure_notices: Vec<String>,
    pub areas: Vec<AreaRecord>,
}

impl SourceReport {
    #[must_use]
    pub fn new(source: SourceId, source_url: &str) -> Self {
        Self {
            source,
            source_url: source_url.to_string(),
            page_date: None,
            daily_report: None,
            closure_notices: Vec::new(),
            areas: Vec::new(),
        }
    }
}

pub trait SourceExtractor: Send + Sync {
    fn id(&self) -> SourceId;

    fn url(&self) -> &'static str;

    /// Request headers besides `User-Agent`, which the fetcher owns.
    fn headers(&self) -> &'static [(&'static str, &'static str)];

    /// Bodies shorter than this are block pages or empty responses.
    fn min_markup_len(&self) -> usize {
        DEFAULT_MIN_MARKUP_LEN
    }

    /// Never fails; fields whose anchors are missing stay `None`.
    fn extract(&self, html: &str, classifier: &AreaClassifier) -> SourceReport;
}

static MBNR: Mbnr = Mbnr;
static SKIINFO: Skiinfo = Skiinfo;
static CONTAMINES_METEO: ContaminesMeteo = ContaminesMeteo;
static CONTAMINES_OUVERTURE: ContaminesOuverture = ContaminesOuverture;

#[must_use]
pub fn extractor_for(source: SourceId) -> &'static dyn SourceExtractor {
    match source {
        SourceId::Mbnr => &MBNR,
        SourceId::Skiinfo => &SKIINFO,
        SourceId::LesContaminesMeteo => &CONTAMINES_METEO,
        SourceId::LesContaminesOuverture => &CONTAMINES_OUVERTURE,
    }
}

/// True when the record carries at least one measured condition.
pub(crate) fn has_observations(area: &AreaRecord) -> bool {
    area.snow_depth_top.is_some()
        || area.snow_depth_base.is_some()
        || area.fresh_snow_24h.is_some()
        || (area.lifts_open.is_some() && area.lifts_total.is_some())
        || (area.slopes_open.is_some() && area.slopes_total.is_some())
        || !area.stations.is_empty()
}
