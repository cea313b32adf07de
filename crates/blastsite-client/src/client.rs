//! HTTP client for the site API.
//!
//! Wraps `reqwest` with the two calls this layer makes: a read-only page
//! metadata lookup keyed by path, and a write-only call-tracking log.

use std::time::Duration;

use blastsite_core::PageMetadataOverride;
use reqwest::{Client, Url};

use crate::call_tracking::CallLogEntry;
use crate::error::ClientError;

const PAGE_METADATA_ENDPOINT: &str = "page-metadata";
const CALL_LOG_ENDPOINT: &str = "call-logs";

/// Client for the site API.
///
/// Use [`SiteApiClient::new`] with the configured base URL; tests point it at
/// a wiremock server.
pub struct SiteApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl SiteApiClient {
    /// Creates a client with the given base URL, timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        // A single trailing slash makes `Url::join` append endpoints instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_key: None,
        })
    }

    /// Sends `key` as a bearer token on every request.
    #[must_use]
    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Fetches the metadata override for `path`.
    ///
    /// A 404, an empty body, JSON `null`, or a record with no non-blank field
    /// all mean "no override" and return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ClientError::Deserialize`] if the body is not a metadata record.
    pub async fn get_page_metadata(
        &self,
        path: &str,
    ) -> Result<Option<PageMetadataOverride>, ClientError> {
        let mut url = self.endpoint(PAGE_METADATA_ENDPOINT)?;
        url.query_pairs_mut().append_pair("path", path);

        let response = self.authorize(self.client.get(url.clone())).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let parsed = serde_json::from_str::<Option<PageMetadataOverride>>(&body).map_err(|e| {
            ClientError::Deserialize {
                context: format!("page metadata for {path}"),
                source: e,
            }
        })?;

        Ok(parsed.filter(|record| !record.is_empty()))
    }

    /// Posts one call-tracking entry.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] for a non-2xx status.
    pub async fn post_call_log(&self, entry: &CallLogEntry) -> Result<(), ClientError> {
        let url = self.endpoint(CALL_LOG_ENDPOINT)?;
        let response = self
            .authorize(self.client.post(url.clone()))
            .json(entry)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(())
    }

    fn endpoint(&self, name: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(name)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}
