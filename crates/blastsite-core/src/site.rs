use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{BreadcrumbItem, BusinessProfile, FormEmbedConfig, Review};
use crate::ConfigError;

/// Site-wide fallbacks used when neither an override nor a page prop supplies a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteDefaults {
    pub site_name: String,
    /// Public origin of the site, e.g. `https://www.example.com`.
    pub origin: String,
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(default = "default_twitter_card")]
    pub twitter_card: String,
}

fn default_twitter_card() -> String {
    "summary_large_image".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    pub path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub h1: Option<String>,
    #[serde(default)]
    pub og_type: Option<String>,
    #[serde(default)]
    pub breadcrumbs: Vec<BreadcrumbItem>,
    /// Whether the review list and aggregate rating are published on this page.
    #[serde(default)]
    pub show_reviews: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub site: SiteDefaults,
    pub business: BusinessProfile,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub form: Option<FormEmbedConfig>,
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

impl SiteProfile {
    /// Finds the page config for `path`, ignoring a trailing slash.
    #[must_use]
    pub fn page(&self, path: &str) -> Option<&PageConfig> {
        let wanted = normalize_path(path);
        self.pages.iter().find(|p| normalize_path(&p.path) == wanted)
    }
}

fn normalize_path(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Load and validate the site profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_site_profile(path: &Path) -> Result<SiteProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SiteFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: SiteProfile = serde_yaml::from_str(&content)?;
    validate_site_profile(&profile)?;

    Ok(profile)
}

fn validate_site_profile(profile: &SiteProfile) -> Result<(), ConfigError> {
    if profile.site.site_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site name must be non-empty".to_string(),
        ));
    }

    if !profile.site.origin.starts_with("https://") && !profile.site.origin.starts_with("http://")
    {
        return Err(ConfigError::Validation(format!(
            "site origin '{}' must be an http(s) URL",
            profile.site.origin
        )));
    }

    if profile.business.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "business name must be non-empty".to_string(),
        ));
    }

    if profile.business.service_area.radius_miles <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "service area radius must be positive, got {}",
            profile.business.service_area.radius_miles
        )));
    }

    for review in &profile.reviews {
        if !(1..=5).contains(&review.rating) {
            return Err(ConfigError::Validation(format!(
                "review by '{}' has invalid rating {}; must be 1 through 5",
                review.author, review.rating
            )));
        }
    }

    let mut seen_paths = HashSet::new();
    for page in &profile.pages {
        if !page.path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "page path '{}' must start with '/'",
                page.path
            )));
        }
        if !seen_paths.insert(normalize_path(&page.path)) {
            return Err(ConfigError::Validation(format!(
                "duplicate page path: '{}'",
                page.path
            )));
        }
        for crumb in &page.breadcrumbs {
            if !crumb.href.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "breadcrumb '{}' on page '{}' must use a site-relative href",
                    crumb.label, page.path
                )));
            }
        }
    }

    Ok(())
}
