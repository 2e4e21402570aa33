use std::path::PathBuf;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("expected a boolean, got \"{other}\""))),
        }
    };

    let log_level = or_default("THREADPULSE_LOG_LEVEL", "info");
    let feeds_path = PathBuf::from(or_default("THREADPULSE_FEEDS_PATH", "./config/feeds.yaml"));
    let lexicon_path = PathBuf::from(or_default(
        "THREADPULSE_LEXICON_PATH",
        "./config/lexicon.tsv",
    ));
    let snapshot_path = PathBuf::from(or_default(
        "THREADPULSE_SNAPSHOT_PATH",
        "./data/digest.txt",
    ));

    let feed_base_url = or_default("THREADPULSE_FEED_BASE_URL", "https://www.reddit.com");
    if !feed_base_url.starts_with("http://") && !feed_base_url.starts_with("https://") {
        return Err(invalid(
            "THREADPULSE_FEED_BASE_URL",
            format!("expected an http(s) URL, got \"{feed_base_url}\""),
        ));
    }
    let feed_base_url = feed_base_url.trim_end_matches('/').to_string();

    let user_agent = or_default(
        "THREADPULSE_USER_AGENT",
        "threadpulse/0.1 (comment-sentiment)",
    );
    let request_timeout_secs = parse_u64("THREADPULSE_REQUEST_TIMEOUT_SECS", "30")?;

    let scorer_workers = parse_usize("THREADPULSE_SCORER_WORKERS", "2")?;
    if scorer_workers == 0 {
        return Err(invalid(
            "THREADPULSE_SCORER_WORKERS",
            "must be at least 1".to_string(),
        ));
    }

    let tick_ms = parse_u64("THREADPULSE_TICK_MS", "1000")?;
    if tick_ms == 0 {
        return Err(invalid("THREADPULSE_TICK_MS", "must be at least 1".to_string()));
    }

    let record_malformed = parse_bool("THREADPULSE_RECORD_MALFORMED", "false")?;

    Ok(AppConfig {
        log_level,
        feeds_path,
        lexicon_path,
        snapshot_path,
        feed_base_url,
        user_agent,
        request_timeout_secs,
        scorer_workers,
        tick_ms,
        record_malformed,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
