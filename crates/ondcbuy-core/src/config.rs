use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.trim().is_empty()) };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let api_base_url = require("ONDCBUY_API_BASE_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "ONDCBUY_API_BASE_URL".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    let env = parse_environment(&or_default("ONDCBUY_ENV", "development"));
    let log_level = or_default("ONDCBUY_LOG_LEVEL", "info");
    let proxy_url = optional("ONDCBUY_PROXY_URL");
    let storage_path = PathBuf::from(or_default(
        "ONDCBUY_STORAGE_PATH",
        "./.ondcbuy/storage.json",
    ));
    let context_path = PathBuf::from(or_default("ONDCBUY_CONTEXT_PATH", "./config/ondc.yaml"));
    let auth_token = optional("ONDCBUY_AUTH_TOKEN");

    let request_timeout_secs = parse_u64("ONDCBUY_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ONDCBUY_USER_AGENT", "ondcbuy/0.1 (buyer-app)");

    let confirm_settle_delay_ms = parse_u64("ONDCBUY_CONFIRM_SETTLE_DELAY_MS", "1000")?;
    let confirm_max_retries = parse_u32("ONDCBUY_CONFIRM_MAX_RETRIES", "5")?;
    let confirm_backoff_base_ms = parse_u64("ONDCBUY_CONFIRM_BACKOFF_BASE_MS", "500")?;
    let confirm_deadline_ms = parse_u64("ONDCBUY_CONFIRM_DEADLINE_MS", "15000")?;
    let mock_fallback = parse_bool("ONDCBUY_MOCK_FALLBACK", "true")?;

    Ok(AppConfig {
        api_base_url,
        env,
        log_level,
        proxy_url,
        storage_path,
        context_path,
        auth_token,
        request_timeout_secs,
        user_agent,
        confirm_settle_delay_ms,
        confirm_max_retries,
        confirm_backoff_base_ms,
        confirm_deadline_ms,
        mock_fallback,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
