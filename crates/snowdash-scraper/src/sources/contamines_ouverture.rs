//! Les Contamines "ouverture" page.
//!
//! Lifts and slopes share one list of status icons (`O` open, `F` closed,
//! `P` problem). Only the combined open count is known, so it is split
//! between lifts and slopes in proportion to the resort's fixed totals.

use snowdash_core::{AreaRecord, SourceId};

use super::{SourceExtractor, SourceReport, CONTAMINES_ALTITUDE, CONTAMINES_AREA};
use crate::classify::AreaClassifier;

const URL: &str = "https://www.lescontamines.net/ouverture.html";
const HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml"),
    ("Accept-Language", "en,fr;q=0.9"),
];

const OPEN_ICON: &str = "icons/O.png";
const CLOSED_ICON: &str = "icons/F.png";
const PROBLEM_ICON: &str = "icons/P.png";

pub const LIFTS_TOTAL: u32 = 25;
pub const SLOPES_TOTAL: u32 = 48;

/// Icon tallies from the raw markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconCounts {
    pub open: u32,
    pub closed: u32,
    pub problem: u32,
}

impl IconCounts {
    #[must_use]
    pub fn from_markup(html: &str) -> Self {
        let count = |icon: &str| u32::try_from(html.matches(icon).count()).unwrap_or(u32::MAX);
        Self {
            open: count(OPEN_ICON),
            closed: count(CLOSED_ICON),
            problem: count(PROBLEM_ICON),
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.open
            .saturating_add(self.closed)
            .saturating_add(self.problem)
    }

    /// `(lifts_open, slopes_open)`, each rounded half up and clamped to its total.
    #[must_use]
    pub fn split_open(&self) -> (u32, u32) {
        (
            proportional_share(self.open, LIFTS_TOTAL),
            proportional_share(self.open, SLOPES_TOTAL),
        )
    }
}

/// `round(open * share / (LIFTS_TOTAL + SLOPES_TOTAL))` in integer arithmetic.
fn proportional_share(open: u32, share: u32) -> u32 {
    let whole = u64::from(LIFTS_TOTAL + SLOPES_TOTAL);
    let scaled = (u64::from(open) * u64::from(share) * 2 + whole) / (whole * 2);
    u32::try_from(scaled).unwrap_or(u32::MAX).min(share)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContaminesOuverture;

impl SourceExtractor for ContaminesOuverture {
    fn id(&self) -> SourceId {
        SourceId::LesContaminesOuverture
    }

    fn url(&self) -> &'static str {
        URL
    }

    fn headers(&self) -> &'static [(&'static str, &'static str)] {
        HEADERS
    }

    fn extract(&self, html: &str, classifier: &AreaClassifier) -> SourceReport {
        let mut report = SourceReport::new(SourceId::LesContaminesOuverture, URL);
        let Some(resort) = classifier.classify(CONTAMINES_AREA) else {
            return report;
        };

        let icons = IconCounts::from_markup(html);
        if icons.total() == 0 {
            tracing::debug!(source = %SourceId::LesContaminesOuverture, "no status icons found");
            return report;
        }

        let (lifts_open, slopes_open) = icons.split_open();
        tracing::debug!(
            source = %SourceId::LesContaminesOuverture,
            open = icons.open,
            closed = icons.closed,
            problem = icons.problem,
            "counted status icons"
        );

        let area = AreaRecord {
            resort_id: Some(resort),
            lifts_open: Some(lifts_open),
            lifts_total: Some(LIFTS_TOTAL),
            slopes_open: Some(slopes_open),
            slopes_total: Some(SLOPES_TOTAL),
            ..AreaRecord::new(CONTAMINES_AREA, Some(CONTAMINES_ALTITUDE.to_string()))
        };
        report.areas.push(area.with_derived_closure());
        report
    }
}

#[cfg(test)]
mod tests {
    use snowdash_core::ResortId;

    use super::*;

    fn icons(open: usize, closed: usize, problem: usize) -> String {
        let row = |icon: &str, n: usize| format!(r#"<td><img src="/images/{icon}"></td>"#).repeat(n);
        format!(
            "<table>{}{}{}</table>",
            row(OPEN_ICON, open),
            row(CLOSED_ICON, closed),
            row(PROBLEM_ICON, problem)
        )
    }

    #[test]
    fn counts_icons_in_raw_markup() {
        let counts = IconCounts::from_markup(&icons(40, 30, 3));
        assert_eq!(
            counts,
            IconCounts {
                open: 40,
                closed: 30,
                problem: 3
            }
        );
        assert_eq!(counts.total(), 73);
    }

    #[test]
    fn splits_open_count_rounding_half_up() {
        // 40 * 25 / 73 = 13.70, 40 * 48 / 73 = 26.30
        assert_eq!(IconCounts { open: 40, closed: 0, problem: 0 }.split_open(), (14, 26));
        // 73 open is everything.
        assert_eq!(IconCounts { open: 73, closed: 0, problem: 0 }.split_open(), (25, 48));
        // 1 * 25 / 73 = 0.34, 1 * 48 / 73 = 0.66
        assert_eq!(IconCounts { open: 1, closed: 72, problem: 0 }.split_open(), (0, 1));
    }

    #[test]
    fn split_never_exceeds_totals() {
        assert_eq!(IconCounts { open: 200, closed: 0, problem: 0 }.split_open(), (25, 48));
    }

    #[test]
    fn open_counts_become_an_area() {
        let report = ContaminesOuverture.extract(&icons(40, 30, 3), &AreaClassifier::default());
        let area = &report.areas[0];
        assert_eq!(area.resort_id, Some(ResortId::LesContamines));
        assert_eq!((area.lifts_open, area.lifts_total), (Some(14), Some(25)));
        assert_eq!((area.slopes_open, area.slopes_total), (Some(26), Some(48)));
        assert!(!area.is_closed);
    }

    #[test]
    fn all_closed_icons_close_the_area() {
        let report = ContaminesOuverture.extract(&icons(0, 70, 3), &AreaClassifier::default());
        assert_eq!(report.areas[0].lifts_open, Some(0));
        assert!(report.areas[0].is_closed);
    }

    #[test]
    fn page_without_icons_is_a_miss() {
        let report =
            ContaminesOuverture.extract("<html><body>Maintenance</body></html>", &AreaClassifier::default());
        assert!(report.areas.is_empty());
    }
}
