use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with the API base URL set.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("BLASTSITE_API_BASE_URL", "https://api.example.test");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "BLASTSITE_ENV"));
}

#[test]
fn build_app_config_succeeds_without_api_base_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_base_url.is_none());
    assert_eq!(cfg.site_path.to_string_lossy(), "./config/site.yaml");
    assert!(
        matches!(cfg.require_api_base_url(), Err(ConfigError::MissingEnvVar(ref v)) if v == "BLASTSITE_API_BASE_URL")
    );
}

#[test]
fn build_app_config_treats_blank_api_base_url_as_unset() {
    let mut map = HashMap::new();
    map.insert("BLASTSITE_API_BASE_URL", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_base_url.is_none());
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("BLASTSITE_API_BASE_URL", "ftp://api.example.test");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BLASTSITE_API_BASE_URL"),
        "expected InvalidEnvVar(BLASTSITE_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_applies_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.require_api_base_url().unwrap(), "https://api.example.test");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.site_path.to_string_lossy(), "./config/site.yaml");
    assert!(cfg.api_key.is_none());
    assert_eq!(cfg.api_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "blastsite/0.1 (site-head)");
    assert_eq!(cfg.lazy_root_margin_px, 100);
    assert_eq!(cfg.form_poll_interval_ms, 100);
    assert_eq!(cfg.form_timeout_ms, 10_000);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = full_env();
    map.insert("BLASTSITE_ENV", "production");
    map.insert("BLASTSITE_LAZY_ROOT_MARGIN_PX", "50");
    map.insert("BLASTSITE_FORM_TIMEOUT_MS", "2500");
    map.insert("BLASTSITE_API_KEY", "secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.lazy_root_margin_px, 50);
    assert_eq!(cfg.form_timeout_ms, 2500);
    assert_eq!(cfg.api_key.as_deref(), Some("secret"));
}

#[test]
fn build_app_config_rejects_invalid_margin() {
    let mut map = full_env();
    map.insert("BLASTSITE_LAZY_ROOT_MARGIN_PX", "-10");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BLASTSITE_LAZY_ROOT_MARGIN_PX"),
        "expected InvalidEnvVar(BLASTSITE_LAZY_ROOT_MARGIN_PX), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_poll_interval() {
    let mut map = full_env();
    map.insert("BLASTSITE_FORM_POLL_INTERVAL_MS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "BLASTSITE_FORM_POLL_INTERVAL_MS"),
        "expected InvalidEnvVar(BLASTSITE_FORM_POLL_INTERVAL_MS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = full_env();
    map.insert("BLASTSITE_API_KEY", "super-secret-value");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-value"));
    assert!(rendered.contains("[redacted]"));
}
