use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub site_path: PathBuf,
    /// Base URL of the site API serving page metadata and call logs. Only
    /// commands that talk to the API need it.
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_timeout_secs: u64,
    pub user_agent: String,
    /// Distance in pixels before the viewport at which lazy images start loading.
    pub lazy_root_margin_px: u32,
    pub form_poll_interval_ms: u64,
    pub form_timeout_ms: u64,
}

impl AppConfig {
    /// The site API base URL, for commands that call the API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `BLASTSITE_API_BASE_URL`
    /// was not set.
    pub fn require_api_base_url(&self) -> Result<&str, ConfigError> {
        self.api_base_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("BLASTSITE_API_BASE_URL".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("site_path", &self.site_path)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("lazy_root_margin_px", &self.lazy_root_margin_px)
            .field("form_poll_interval_ms", &self.form_poll_interval_ms)
            .field("form_timeout_ms", &self.form_timeout_ms)
            .finish()
    }
}
