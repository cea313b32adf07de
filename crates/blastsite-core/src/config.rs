use std::env::VarError;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Reads `.env` (if present) and then the process environment.
///
/// # Errors
///
/// Returns `ConfigError` for any value that fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] without touching `.env`.
///
/// # Errors
///
/// Returns `ConfigError` for any value that fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn parse_var<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Builds the config from `lookup` so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let api_base_url = lookup("BLASTSITE_API_BASE_URL")
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty());
    if let Some(base) = &api_base_url {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::InvalidEnvVar {
                var: "BLASTSITE_API_BASE_URL".to_string(),
                reason: format!("expected an http(s) URL, got '{base}'"),
            });
        }
    }

    let env = parse_environment(&or_default("BLASTSITE_ENV", "development"))?;
    let log_level = or_default("BLASTSITE_LOG_LEVEL", "info");
    let site_path = PathBuf::from(or_default("BLASTSITE_SITE_PATH", "./config/site.yaml"));
    let api_key = lookup("BLASTSITE_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    let api_timeout_secs: u64 = parse_var(&lookup, "BLASTSITE_API_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("BLASTSITE_USER_AGENT", "blastsite/0.1 (site-head)");
    let lazy_root_margin_px: u32 = parse_var(&lookup, "BLASTSITE_LAZY_ROOT_MARGIN_PX", "100")?;
    let form_poll_interval_ms: u64 = parse_var(&lookup, "BLASTSITE_FORM_POLL_INTERVAL_MS", "100")?;
    let form_timeout_ms: u64 = parse_var(&lookup, "BLASTSITE_FORM_TIMEOUT_MS", "10000")?;

    if form_poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BLASTSITE_FORM_POLL_INTERVAL_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        site_path,
        api_base_url,
        api_key,
        api_timeout_secs,
        user_agent,
        lazy_root_margin_px,
        form_poll_interval_ms,
        form_timeout_ms,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BLASTSITE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
