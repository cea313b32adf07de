//! Shared domain types and configuration for the blastsite workspace.

pub mod app_config;
pub mod config;
pub mod site;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use site::{load_site_profile, PageConfig, SiteDefaults, SiteProfile};
pub use types::{
    BreadcrumbItem, BusinessProfile, FormEmbedConfig, GeoPoint, PageMetadataOverride,
    PostalAddress, Review, ServiceArea, ServiceOffering,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read site profile {path}: {source}")]
    SiteFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse site profile: {0}")]
    SiteFileParse(#[from] serde_yaml::Error),

    #[error("site profile validation failed: {0}")]
    Validation(String),
}
