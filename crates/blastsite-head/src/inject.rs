//! Structured-data injection keyed by stable script ids.

use blastsite_core::{BreadcrumbItem, BusinessProfile, Review};
use serde_json::Value;

use crate::error::HeadError;
use crate::jsonld;
use crate::sink::{MetadataSink, JSON_LD_MEDIA_TYPE};

/// The set of JSON-LD documents implied by a page's inputs.
///
/// Each document is paired with the id suffix it is injected under.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredData {
    documents: Vec<(String, Value)>,
}

impl StructuredData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the business profile under `business`.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::Serialize`] if the profile cannot be serialized.
    pub fn with_business(mut self, business: &BusinessProfile) -> Result<Self, HeadError> {
        self.documents
            .push(("business".to_string(), jsonld::local_business(business)?));
        Ok(self)
    }

    /// Adds the aggregate rating under `aggregate-rating` and each review under
    /// `review-{index}`. An empty list adds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::Serialize`] if the aggregate block cannot be serialized.
    pub fn with_reviews(mut self, business_name: &str, reviews: &[Review]) -> Result<Self, HeadError> {
        if let Some(block) = jsonld::aggregate_rating_block(business_name, reviews)? {
            self.documents.push(("aggregate-rating".to_string(), block));
        }
        for (index, review) in reviews.iter().enumerate() {
            self.documents.push((
                format!("review-{index}"),
                jsonld::review(business_name, review),
            ));
        }
        Ok(self)
    }

    /// Adds the breadcrumb trail under `breadcrumb`. An empty trail adds nothing.
    #[must_use]
    pub fn with_breadcrumbs(mut self, origin: &str, items: &[BreadcrumbItem]) -> Self {
        if !items.is_empty() {
            self.documents.push((
                "breadcrumb".to_string(),
                jsonld::breadcrumb_list(origin, items),
            ));
        }
        self
    }

    #[must_use]
    pub fn documents(&self) -> &[(String, Value)] {
        &self.documents
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorState {
    Unmounted,
    Mounted,
}

/// Owns every head script whose id starts with `{prefix}-`.
///
/// While mounted, the owned scripts in the sink are exactly the ones implied by
/// the last applied [`StructuredData`]; after [`unmount`](Self::unmount) there
/// are none.
#[derive(Debug)]
pub struct StructuredDataInjector {
    id_prefix: String,
    state: InjectorState,
    injected: Vec<String>,
}

impl StructuredDataInjector {
    /// Creates an unmounted injector owning ids under `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::InvalidPrefix`] if `prefix` is empty or contains
    /// characters other than ASCII alphanumerics and `_`. The `-` separator is
    /// excluded so one prefix can never be a leading part of another's ids.
    pub fn new(prefix: &str) -> Result<Self, HeadError> {
        if prefix.is_empty() {
            return Err(HeadError::InvalidPrefix {
                prefix: prefix.to_owned(),
                reason: "prefix must be non-empty".to_string(),
            });
        }
        if let Some(bad) = prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(HeadError::InvalidPrefix {
                prefix: prefix.to_owned(),
                reason: format!("unexpected character {bad:?}"),
            });
        }
        Ok(Self {
            id_prefix: format!("{prefix}-"),
            state: InjectorState::Unmounted,
            injected: Vec::new(),
        })
    }

    #[must_use]
    pub fn state(&self) -> InjectorState {
        self.state
    }

    /// Ids currently injected, in insertion order.
    #[must_use]
    pub fn injected_ids(&self) -> &[String] {
        &self.injected
    }

    /// Mounts or re-renders with `data`.
    ///
    /// All documents are serialized first; then every owned script is removed
    /// and the new set inserted, so old and new data never coexist.
    ///
    /// # Errors
    ///
    /// Returns [`HeadError::Serialize`] if a document fails to serialize. The
    /// sink is left untouched in that case.
    pub fn apply<S: MetadataSink + ?Sized>(
        &mut self,
        sink: &mut S,
        data: &StructuredData,
    ) -> Result<(), HeadError> {
        let rendered = data
            .documents()
            .iter()
            .map(|(suffix, doc)| {
                let id = format!("{}{suffix}", self.id_prefix);
                serde_json::to_string(doc)
                    .map(|body| (id, body))
                    .map_err(|e| HeadError::Serialize {
                        context: format!("script {}{suffix}", self.id_prefix),
                        source: e,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let removed = sink.remove_scripts_with_prefix(&self.id_prefix);
        self.injected.clear();

        for (id, body) in rendered {
            sink.upsert_script(&id, JSON_LD_MEDIA_TYPE, &body);
            self.injected.push(id);
        }
        self.state = InjectorState::Mounted;

        tracing::debug!(
            prefix = %self.id_prefix,
            removed,
            inserted = self.injected.len(),
            "structured data applied"
        );
        Ok(())
    }

    /// Removes every owned script. Safe to call when already unmounted.
    pub fn unmount<S: MetadataSink + ?Sized>(&mut self, sink: &mut S) {
        let removed = sink.remove_scripts_with_prefix(&self.id_prefix);
        self.injected.clear();
        self.state = InjectorState::Unmounted;
        tracing::debug!(prefix = %self.id_prefix, removed, "structured data unmounted");
    }
}
