use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Does not read `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default; only unparsable values are errors.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i32 = |var: &str, default: &str| -> Result<i32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<i32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("SNOWDASH_LOG_LEVEL", "info");
    let baseline_path = PathBuf::from(or_default(
        "SNOWDASH_BASELINE_PATH",
        "./config/baseline.yaml",
    ));
    let user_agent = or_default(
        "SNOWDASH_USER_AGENT",
        "Mozilla/5.0 (compatible; SnowDashboard/1.0)",
    );

    let mbnr_timeout_secs = parse_u64("SNOWDASH_MBNR_TIMEOUT_SECS", "15")?;
    let source_timeout_secs = parse_u64("SNOWDASH_SOURCE_TIMEOUT_SECS", "12")?;
    for (var, secs) in [
        ("SNOWDASH_MBNR_TIMEOUT_SECS", mbnr_timeout_secs),
        ("SNOWDASH_SOURCE_TIMEOUT_SECS", source_timeout_secs),
    ] {
        if secs == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "timeout must be at least one second".to_string(),
            });
        }
    }

    let utc_offset_minutes = parse_i32("SNOWDASH_UTC_OFFSET_MINUTES", "60")?;
    if utc_offset_minutes.abs() >= 24 * 60 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SNOWDASH_UTC_OFFSET_MINUTES".to_string(),
            reason: format!("{utc_offset_minutes} is outside ±1440 minutes"),
        });
    }
    let zone_label = or_default("SNOWDASH_ZONE_LABEL", "CET");

    Ok(AppConfig {
        log_level,
        baseline_path,
        user_agent,
        mbnr_timeout_secs,
        source_timeout_secs,
        utc_offset_minutes,
        zone_label,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
