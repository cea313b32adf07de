//! Page metadata resolution with default fallbacks.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use blastsite_core::{PageConfig, PageMetadataOverride, SiteDefaults};
use blastsite_head::PageMeta;

use crate::client::SiteApiClient;
use crate::error::ClientError;

const DEFAULT_OG_TYPE: &str = "website";

/// Source of per-path metadata overrides.
pub trait MetadataLookup: Send + Sync {
    fn lookup(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Option<PageMetadataOverride>, ClientError>> + Send;
}

impl MetadataLookup for SiteApiClient {
    async fn lookup(&self, path: &str) -> Result<Option<PageMetadataOverride>, ClientError> {
        self.get_page_metadata(path).await
    }
}

/// Lookup progress for one path.
///
/// `Loading` and `Resolved(None)` resolve to the same page metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataState {
    Loading,
    Resolved(Option<PageMetadataOverride>),
}

impl MetadataState {
    #[must_use]
    pub fn override_record(&self) -> Option<&PageMetadataOverride> {
        match self {
            Self::Resolved(Some(record)) => Some(record),
            Self::Loading | Self::Resolved(None) => None,
        }
    }
}

/// Page metadata plus the optional heading text to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    pub meta: PageMeta,
    pub h1: Option<String>,
}

/// Merges override, page props and site defaults field by field.
///
/// Each field takes the first non-blank value of: override, page prop, site
/// default. The heading has no site default.
#[must_use]
pub fn resolve_page_meta(
    state: &MetadataState,
    page: Option<&PageConfig>,
    defaults: &SiteDefaults,
    path: &str,
) -> ResolvedPage {
    let record = state.override_record();

    let title = pick(&[
        record.and_then(|r| r.meta_title.as_deref()),
        page.and_then(|p| p.title.as_deref()),
    ])
    .unwrap_or(&defaults.title);
    let description = pick(&[
        record.and_then(|r| r.meta_description.as_deref()),
        page.and_then(|p| p.description.as_deref()),
    ])
    .unwrap_or(&defaults.description);
    let image = pick(&[page.and_then(|p| p.image.as_deref())]).unwrap_or(&defaults.image);
    let og_type = pick(&[page.and_then(|p| p.og_type.as_deref())]).unwrap_or(DEFAULT_OG_TYPE);
    let h1 = pick(&[
        record.and_then(|r| r.h1.as_deref()),
        page.and_then(|p| p.h1.as_deref()),
    ]);

    ResolvedPage {
        meta: PageMeta {
            title: title.to_owned(),
            description: description.to_owned(),
            image: image.to_owned(),
            og_type: og_type.to_owned(),
            url: format!("{}{path}", defaults.origin.trim_end_matches('/')),
            site_name: defaults.site_name.clone(),
            twitter_card: defaults.twitter_card.clone(),
        },
        h1: h1.map(str::to_owned),
    }
}

fn pick<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .map(str::trim)
        .find(|v| !v.is_empty())
}

/// Resolves metadata overrides per navigation.
///
/// Successful lookups are remembered per path. Failed lookups are logged and
/// treated as "no override" without being remembered, so a later navigation
/// asks again. A lookup that completes after a newer navigation started is
/// reported as superseded.
pub struct MetadataResolver<L> {
    lookup: L,
    cache: Mutex<HashMap<String, Option<PageMetadataOverride>>>,
    generation: AtomicU64,
}

impl<L: MetadataLookup> MetadataResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            cache: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// State available for `path` without waiting: the remembered lookup, or
    /// `Loading`.
    pub fn current_state(&self, path: &str) -> MetadataState {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(path).cloned())
            .map_or(MetadataState::Loading, MetadataState::Resolved)
    }

    /// Starts a navigation to `path` and waits for its lookup.
    ///
    /// Returns `None` when another navigation began before this one finished;
    /// the caller should drop the result.
    pub async fn navigate(&self, path: &str) -> Option<MetadataState> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let state = match self.lookup.lookup(path).await {
            Ok(record) => {
                if let Ok(mut cache) = self.cache.lock() {
                    cache.insert(path.to_owned(), record.clone());
                }
                MetadataState::Resolved(record)
            }
            Err(err) => {
                tracing::warn!(path, error = %err, "metadata lookup failed; using defaults");
                MetadataState::Resolved(None)
            }
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(path, "metadata lookup superseded by a newer navigation");
            return None;
        }
        Some(state)
    }
}
