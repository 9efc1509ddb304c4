use std::collections::HashSet;
use std::path::Path;

use crate::types::{AggregateResult, ResortId};
use crate::ConfigError;

/// A validated, fully populated snapshot for all five resorts.
///
/// Never mutated; every merge starts from a clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    result: AggregateResult,
}

impl Baseline {
    /// Parse and validate a baseline from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let result: AggregateResult =
            serde_yaml::from_str(content).map_err(ConfigError::BaselineFileParse)?;
        Self::from_result(result)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `result` is not a usable baseline.
    pub fn from_result(result: AggregateResult) -> Result<Self, ConfigError> {
        validate_baseline(&result)?;
        Ok(Self { result })
    }

    #[must_use]
    pub fn result(&self) -> &AggregateResult {
        &self.result
    }
}

/// Load and validate the baseline snapshot from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_baseline(path: &Path) -> Result<Baseline, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BaselineFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    Baseline::from_yaml_str(&content)
}

fn validate_baseline(result: &AggregateResult) -> Result<(), ConfigError> {
    if result.is_live {
        return Err(ConfigError::Validation(
            "baseline must not be marked live".to_string(),
        ));
    }

    if result.daily_report.trim().is_empty() {
        return Err(ConfigError::Validation(
            "baseline daily report must be non-empty".to_string(),
        ));
    }

    if result.last_updated.trim().is_empty() {
        return Err(ConfigError::Validation(
            "baseline lastUpdated must be non-empty".to_string(),
        ));
    }

    for resort in ResortId::ALL {
        let Some(snapshot) = result.resorts.get(&resort) else {
            return Err(ConfigError::Validation(format!(
                "baseline is missing resort '{resort}'"
            )));
        };

        if snapshot.resort_id != resort {
            return Err(ConfigError::Validation(format!(
                "resort '{resort}' is keyed with resortId '{}'",
                snapshot.resort_id
            )));
        }

        if snapshot.areas.is_empty() {
            return Err(ConfigError::Validation(format!(
                "resort '{resort}' has no areas"
            )));
        }

        let mut seen_names = HashSet::new();
        for area in &snapshot.areas {
            if area.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "resort '{resort}' has an area with an empty name"
                )));
            }

            if let Some(area_resort) = area.resort_id {
                if area_resort != resort {
                    return Err(ConfigError::Validation(format!(
                        "area '{}' is listed under '{resort}' but tagged '{area_resort}'",
                        area.name
                    )));
                }
            }

            if !seen_names.insert(area.name.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate area name '{}' in resort '{resort}'",
                    area.name
                )));
            }

            for (kind, open, total) in [
                ("lifts", area.lifts_open, area.lifts_total),
                ("slopes", area.slopes_open, area.slopes_total),
            ] {
                if let (Some(open), Some(total)) = (open, total) {
                    if open > total {
                        return Err(ConfigError::Validation(format!(
                            "area '{}' has {open} of {total} {kind} open",
                            area.name
                        )));
                    }
                }
            }

            if area.lifts_open == Some(0) && !area.is_closed {
                return Err(ConfigError::Validation(format!(
                    "area '{}' has no open lifts but is not marked closed",
                    area.name
                )));
            }
        }
    }

    Ok(())
}
