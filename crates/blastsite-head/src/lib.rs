//! Document head management for blastsite pages.
//!
//! Every writer in this crate goes through the [`MetadataSink`] trait: title,
//! meta tags and head scripts are created or updated by key, and structured
//! data is removed by id prefix. [`Document`] is the in-memory sink used by the
//! CLI preview and by tests.

pub mod document;
pub mod error;
pub mod inject;
pub mod jsonld;
pub mod meta;
pub mod sink;

pub use document::{Document, Heading, HeadNode};
pub use error::HeadError;
pub use inject::{InjectorState, StructuredData, StructuredDataInjector};
pub use jsonld::{aggregate_rating, AggregateRating};
pub use meta::{MetadataWriter, PageMeta};
pub use sink::{MetaKey, MetadataSink, JSON_LD_MEDIA_TYPE};
