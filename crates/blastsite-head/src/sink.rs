//! The narrow write interface every head writer is given.

/// Media type declared on structured-data script elements.
pub const JSON_LD_MEDIA_TYPE: &str = "application/ld+json";

/// Identifying attribute of a `<meta>` element.
///
/// Standard tags are identified by `name=`, Open Graph tags by `property=`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Name(String),
    Property(String),
}

impl MetaKey {
    pub fn name(value: impl Into<String>) -> Self {
        Self::Name(value.into())
    }

    pub fn property(value: impl Into<String>) -> Self {
        Self::Property(value.into())
    }

    /// The HTML attribute carrying the key.
    #[must_use]
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Property(_) => "property",
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Name(v) | Self::Property(v) => v,
        }
    }
}

impl std::fmt::Display for MetaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}=\"{}\"", self.attribute(), self.value())
    }
}

/// Shared document surface.
///
/// Implementations must not assume exclusive ownership of the head: content
/// written by unrelated code is left alone, and every write is
/// identify-or-create so repeated application never duplicates nodes.
pub trait MetadataSink {
    fn set_title(&mut self, title: &str);

    /// Updates the `content` of the meta element identified by `key`, appending
    /// a new element when none exists.
    fn upsert_meta(&mut self, key: &MetaKey, content: &str);

    /// Replaces the body of the script with id `id`, appending one when absent.
    fn upsert_script(&mut self, id: &str, media_type: &str, body: &str);

    /// Removes every script whose id starts with `prefix`; returns how many went.
    fn remove_scripts_with_prefix(&mut self, prefix: &str) -> usize;

    /// Replaces the text of the first heading not yet carrying the managed
    /// marker and marks it. Returns `false` when every heading is managed.
    fn claim_heading(&mut self, text: &str) -> bool;
}
