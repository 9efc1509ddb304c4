use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};

use crate::CoreError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub baseline_path: PathBuf,
    pub user_agent: String,
    pub mbnr_timeout_secs: u64,
    pub source_timeout_secs: u64,
    pub utc_offset_minutes: i32,
    pub zone_label: String,
}

impl AppConfig {
    #[must_use]
    pub fn mbnr_timeout(&self) -> Duration {
        Duration::from_secs(self.mbnr_timeout_secs)
    }

    #[must_use]
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidUtcOffset`] if the configured offset is not
    /// a valid fixed offset.
    pub fn display_clock(&self) -> Result<DisplayClock, CoreError> {
        DisplayClock::new(self.utc_offset_minutes, &self.zone_label)
    }
}

/// Renders the human-readable "last updated" line in the resorts' local time.
///
/// Uses a fixed offset, so the label does not follow daylight-saving changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayClock {
    offset: FixedOffset,
    zone_label: String,
}

impl DisplayClock {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidUtcOffset`] if `utc_offset_minutes` is
    /// a day or more away from UTC.
    pub fn new(utc_offset_minutes: i32, zone_label: &str) -> Result<Self, CoreError> {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(CoreError::InvalidUtcOffset(utc_offset_minutes))?;
        Ok(Self {
            offset,
            zone_label: zone_label.to_string(),
        })
    }

    /// `Monday 16 February 2026 — 09:30 CET (live)`
    #[must_use]
    pub fn stamp(&self, at: DateTime<Utc>, marker: &str) -> String {
        let local = at.with_timezone(&self.offset);
        format!(
            "{} — {} {} ({marker})",
            local.format("%A %-d %B %Y"),
            local.format("%H:%M"),
            self.zone_label
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn stamp_renders_local_time_with_label() {
        let clock = DisplayClock::new(60, "CET").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 2, 16, 8, 30, 0).unwrap();
        assert_eq!(
            clock.stamp(at, "live"),
            "Monday 16 February 2026 — 09:30 CET (live)"
        );
    }

    #[test]
    fn stamp_crosses_midnight_into_next_local_day() {
        let clock = DisplayClock::new(60, "CET").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 2, 16, 23, 15, 0).unwrap();
        assert_eq!(
            clock.stamp(at, "snapshot"),
            "Tuesday 17 February 2026 — 00:15 CET (snapshot)"
        );
    }

    #[test]
    fn rejects_out_of_range_offset() {
        assert!(matches!(
            DisplayClock::new(24 * 60, "XXX"),
            Err(CoreError::InvalidUtcOffset(1440))
        ));
    }
}
