//! Tracked phone-call button.
//!
//! A click yields the `tel:` dial action straight away; the tracking log is
//! posted on a spawned task whose failure is only logged.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::client::SiteApiClient;
use crate::error::ClientError;

/// Body of one call-tracking log request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogEntry {
    /// Where on the site the button was clicked, e.g. `header` or `hero`.
    pub location: String,
    pub phone_number: String,
    pub user_agent: String,
    pub referrer: String,
}

/// Write-only destination for call-tracking entries.
pub trait CallLogger: Send + Sync + 'static {
    fn log_call(&self, entry: &CallLogEntry) -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl CallLogger for SiteApiClient {
    async fn log_call(&self, entry: &CallLogEntry) -> Result<(), ClientError> {
        self.post_call_log(entry).await
    }
}

/// Browser details attached to a click.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    pub user_agent: String,
    pub referrer: String,
}

/// The navigation a click performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialAction {
    pub href: String,
}

pub struct CallButton<L> {
    logger: Arc<L>,
    phone_number: String,
    location: String,
}

impl<L: CallLogger> CallButton<L> {
    pub fn new(logger: Arc<L>, phone_number: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            logger,
            phone_number: phone_number.into(),
            location: location.into(),
        }
    }

    /// Returns the dial action and the handle of the background log task.
    ///
    /// The dial action does not depend on the log outcome. Dropping the handle
    /// detaches the task. Must be called inside a Tokio runtime.
    pub fn click(&self, ctx: CallContext) -> (DialAction, JoinHandle<()>) {
        let entry = CallLogEntry {
            location: self.location.clone(),
            phone_number: self.phone_number.clone(),
            user_agent: ctx.user_agent,
            referrer: ctx.referrer,
        };
        let logger = Arc::clone(&self.logger);
        let handle = tokio::spawn(async move {
            match logger.log_call(&entry).await {
                Ok(()) => tracing::debug!(location = %entry.location, "call logged"),
                Err(err) => tracing::warn!(
                    location = %entry.location,
                    error = %err,
                    "call tracking log failed"
                ),
            }
        });

        (
            DialAction {
                href: tel_href(&self.phone_number),
            },
            handle,
        )
    }
}

/// `tel:` URI for a display-formatted phone number.
///
/// Keeps digits and a leading `+`; a bare ten-digit number gets the `+1`
/// country code.
#[must_use]
pub fn tel_href(phone_number: &str) -> String {
    let digits: String = phone_number.chars().filter(char::is_ascii_digit).collect();
    if phone_number.trim_start().starts_with('+') {
        format!("tel:+{digits}")
    } else if digits.len() == 10 {
        format!("tel:+1{digits}")
    } else {
        format!("tel:{digits}")
    }
}
