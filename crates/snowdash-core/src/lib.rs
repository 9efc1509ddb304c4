//! Shared domain types, configuration and the merge step for the snow
//! conditions dashboard.

pub mod app_config;
pub mod baseline;
pub mod config;
pub mod merge;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, DisplayClock};
pub use baseline::{load_baseline, Baseline};
pub use config::{load_app_config, load_app_config_from_env};
pub use merge::{fallback_result, merge_extraction, Extraction, NO_DAILY_REPORT};
pub use types::{
    AggregateResult, AreaRecord, Forecast, ForecastDay, ResortId, ResortSnapshot, SlopeBreakdown,
    SnowForecastDay, SnowQuality, SourceId, SourceOutcome, SourceStatus, StationMeasurement,
};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("UTC offset out of range: {0} minutes")]
    InvalidUtcOffset(i32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read baseline file {path}: {source}")]
    BaselineFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse baseline file: {0}")]
    BaselineFileParse(#[from] serde_yaml::Error),

    #[error("baseline validation failed: {0}")]
    Validation(String),
}
