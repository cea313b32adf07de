//! In-memory document model implementing [`MetadataSink`].

use std::fmt::Write as _;

use crate::sink::{MetaKey, MetadataSink};

/// Attribute written onto headings whose text was replaced by an override.
pub const MANAGED_HEADING_ATTR: &str = "data-seo-managed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadNode {
    Meta {
        key: MetaKey,
        content: String,
    },
    Script {
        id: Option<String>,
        media_type: String,
        body: String,
    },
    Link {
        rel: String,
        href: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub text: String,
    pub managed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    title: Option<String>,
    head: Vec<HeadNode>,
    headings: Vec<Heading>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unmanaged top-level heading to the body.
    #[must_use]
    pub fn with_heading(mut self, text: impl Into<String>) -> Self {
        self.headings.push(Heading {
            text: text.into(),
            managed: false,
        });
        self
    }

    /// Appends a node written by code outside this crate.
    pub fn push_node(&mut self, node: HeadNode) {
        self.head.push(node);
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn nodes(&self) -> &[HeadNode] {
        &self.head
    }

    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    #[must_use]
    pub fn meta(&self, key: &MetaKey) -> Option<&str> {
        self.head.iter().find_map(|node| match node {
            HeadNode::Meta { key: k, content } if k == key => Some(content.as_str()),
            _ => None,
        })
    }

    /// Number of meta elements identified by `key`.
    #[must_use]
    pub fn meta_count(&self, key: &MetaKey) -> usize {
        self.head
            .iter()
            .filter(|node| matches!(node, HeadNode::Meta { key: k, .. } if k == key))
            .count()
    }

    #[must_use]
    pub fn script(&self, id: &str) -> Option<&str> {
        self.head.iter().find_map(|node| match node {
            HeadNode::Script {
                id: Some(node_id),
                body,
                ..
            } if node_id == id => Some(body.as_str()),
            _ => None,
        })
    }

    /// Ids of all scripts carrying one, in document order.
    pub fn script_ids(&self) -> impl Iterator<Item = &str> {
        self.head.iter().filter_map(|node| match node {
            HeadNode::Script { id: Some(id), .. } => Some(id.as_str()),
            _ => None,
        })
    }

    /// Renders the head as HTML, one element per line.
    #[must_use]
    pub fn render_head(&self) -> String {
        let mut out = String::from("<head>\n");
        if let Some(title) = &self.title {
            let _ = writeln!(out, "  <title>{}</title>", escape_text(title));
        }
        for node in &self.head {
            match node {
                HeadNode::Meta { key, content } => {
                    let _ = writeln!(
                        out,
                        "  <meta {}=\"{}\" content=\"{}\">",
                        key.attribute(),
                        escape_attr(key.value()),
                        escape_attr(content)
                    );
                }
                HeadNode::Script {
                    id,
                    media_type,
                    body,
                } => {
                    let id_attr = id
                        .as_ref()
                        .map(|id| format!(" id=\"{}\"", escape_attr(id)))
                        .unwrap_or_default();
                    let _ = writeln!(
                        out,
                        "  <script type=\"{}\"{id_attr}>{}</script>",
                        escape_attr(media_type),
                        escape_script_body(body)
                    );
                }
                HeadNode::Link { rel, href } => {
                    let _ = writeln!(
                        out,
                        "  <link rel=\"{}\" href=\"{}\">",
                        escape_attr(rel),
                        escape_attr(href)
                    );
                }
            }
        }
        out.push_str("</head>\n");
        out
    }

    /// Renders the body headings, marking managed ones.
    #[must_use]
    pub fn render_headings(&self) -> String {
        self.headings
            .iter()
            .map(|h| {
                let marker = if h.managed {
                    format!(" {MANAGED_HEADING_ATTR}=\"true\"")
                } else {
                    String::new()
                };
                format!("<h1{marker}>{}</h1>\n", escape_text(&h.text))
            })
            .collect()
    }
}

impl MetadataSink for Document {
    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }

    fn upsert_meta(&mut self, key: &MetaKey, content: &str) {
        let existing = self.head.iter_mut().find_map(|node| match node {
            HeadNode::Meta {
                key: k,
                content: current,
            } if k == key => Some(current),
            _ => None,
        });
        match existing {
            Some(current) => content.clone_into(current),
            None => self.head.push(HeadNode::Meta {
                key: key.clone(),
                content: content.to_owned(),
            }),
        }
    }

    fn upsert_script(&mut self, id: &str, media_type: &str, body: &str) {
        let existing = self.head.iter_mut().find_map(|node| match node {
            HeadNode::Script {
                id: Some(node_id),
                media_type: current_type,
                body: current_body,
            } if node_id == id => Some((current_type, current_body)),
            _ => None,
        });
        match existing {
            Some((current_type, current_body)) => {
                media_type.clone_into(current_type);
                body.clone_into(current_body);
            }
            None => self.head.push(HeadNode::Script {
                id: Some(id.to_owned()),
                media_type: media_type.to_owned(),
                body: body.to_owned(),
            }),
        }
    }

    fn remove_scripts_with_prefix(&mut self, prefix: &str) -> usize {
        let before = self.head.len();
        self.head.retain(|node| {
            !matches!(node, HeadNode::Script { id: Some(id), .. } if id.starts_with(prefix))
        });
        before - self.head.len()
    }

    fn claim_heading(&mut self, text: &str) -> bool {
        match self.headings.iter_mut().find(|h| !h.managed) {
            Some(heading) => {
                text.clone_into(&mut heading.text);
                heading.managed = true;
                true
            }
            None => false,
        }
    }
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}

/// Keeps a script body from terminating its own element.
fn escape_script_body(raw: &str) -> String {
    raw.replace("</", "<\\/")
}
