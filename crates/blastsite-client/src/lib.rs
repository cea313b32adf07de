//! Remote site API access and the components that depend on it.
//!
//! [`SiteApiClient`] serves the per-path metadata lookup and the call-tracking
//! log. [`MetadataResolver`] turns lookups into page metadata with
//! default fallbacks; [`CallButton`] dials immediately and logs in the
//! background.

pub mod call_tracking;
pub mod client;
pub mod error;
pub mod resolver;

pub use call_tracking::{CallButton, CallContext, CallLogEntry, CallLogger, DialAction};
pub use client::SiteApiClient;
pub use error::ClientError;
pub use resolver::{resolve_page_meta, MetadataLookup, MetadataResolver, MetadataState, ResolvedPage};
