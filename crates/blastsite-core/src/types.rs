use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-page metadata override served by the site API, keyed by page path.
///
/// Every field is optional; a missing field falls back to page props and then
/// to site defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadataOverride {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub h1: Option<String>,
}

impl PageMetadataOverride {
    /// True when no field carries a non-blank value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.meta_title, &self.meta_description, &self.h1]
            .iter()
            .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: u8,
    pub text: String,
    pub date: NaiveDate,
}

/// One entry of a breadcrumb trail. Position in the trail is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadcrumbItem {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub is_current_page: bool,
}

impl BreadcrumbItem {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            is_current_page: false,
        }
    }

    #[must_use]
    pub fn current(mut self) -> Self {
        self.is_current_page = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub locality: String,
    pub region: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "US".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub center: GeoPoint,
    pub radius_miles: f64,
    #[serde(default)]
    pub places: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub name: String,
    pub description: String,
    pub telephone: String,
    pub url: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    pub address: PostalAddress,
    pub service_area: ServiceArea,
    #[serde(default)]
    pub opening_hours: Vec<String>,
    #[serde(default)]
    pub services: Vec<ServiceOffering>,
}

/// Identifiers of the third-party lead-capture form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEmbedConfig {
    pub region: String,
    pub portal_id: String,
    pub form_id: String,
}
