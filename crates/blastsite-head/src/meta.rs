//! Title, description and social-preview tags.

use crate::sink::{MetaKey, MetadataSink};

/// A fully resolved set of page metadata, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub image: String,
    /// Open Graph content type, e.g. `website` or `article`.
    pub og_type: String,
    /// Absolute canonical URL of the page.
    pub url: String,
    pub site_name: String,
    pub twitter_card: String,
}

impl PageMeta {
    /// The meta entries this page writes, in write order.
    #[must_use]
    pub fn entries(&self) -> Vec<(MetaKey, &str)> {
        vec![
            (MetaKey::name("description"), self.description.as_str()),
            (MetaKey::property("og:title"), self.title.as_str()),
            (MetaKey::property("og:description"), self.description.as_str()),
            (MetaKey::property("og:type"), self.og_type.as_str()),
            (MetaKey::property("og:url"), self.url.as_str()),
            (MetaKey::property("og:image"), self.image.as_str()),
            (MetaKey::property("og:site_name"), self.site_name.as_str()),
            (MetaKey::name("twitter:card"), self.twitter_card.as_str()),
            (MetaKey::name("twitter:title"), self.title.as_str()),
            (MetaKey::name("twitter:description"), self.description.as_str()),
            (MetaKey::name("twitter:image"), self.image.as_str()),
        ]
    }
}

/// Writes page metadata into a [`MetadataSink`].
///
/// One writer lives for one page load. The heading override is a one-shot:
/// once applied, later calls leave the heading alone so edits made after the
/// first application survive re-renders.
#[derive(Debug, Default)]
pub struct MetadataWriter {
    heading_applied: bool,
}

impl MetadataWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the title and create-or-updates every meta entry of `meta`.
    pub fn apply<S: MetadataSink + ?Sized>(&self, sink: &mut S, meta: &PageMeta) {
        sink.set_title(&meta.title);
        for (key, content) in meta.entries() {
            sink.upsert_meta(&key, content);
        }
        tracing::debug!(title = %meta.title, url = %meta.url, "page metadata applied");
    }

    /// Applies a heading override at most once per page load.
    ///
    /// Returns `true` only on the call that actually replaced a heading.
    pub fn apply_heading<S: MetadataSink + ?Sized>(&mut self, sink: &mut S, h1: Option<&str>) -> bool {
        if self.heading_applied {
            return false;
        }
        let Some(text) = h1.map(str::trim).filter(|t| !t.is_empty()) else {
            return false;
        };
        if sink.claim_heading(text) {
            self.heading_applied = true;
            tracing::debug!(heading = %text, "heading override applied");
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn heading_applied(&self) -> bool {
        self.heading_applied
    }
}
