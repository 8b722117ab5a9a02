use serde::{Deserialize, Serialize};

use crate::descriptor::Descriptor;

/// A hypermedia link found in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The link relation.
    pub rel: String,
    /// The link target.
    pub href: String,
    /// An optional human readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    /// Creates a link without title.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            title: None,
        }
    }

    /// Sets the link title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Documents one link relation.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::Descriptor;
/// use clawsnip_core::hypermedia::LinkDescriptor;
///
/// let next = LinkDescriptor::new("next", "The next page").optional();
/// assert_eq!(next.key(), "next");
/// assert!(next.is_optional());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    rel: String,
    description: String,
    optional: bool,
}

impl LinkDescriptor {
    /// Creates a required link descriptor.
    pub fn new(rel: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            description: description.into(),
            optional: false,
        }
    }

    /// Marks the relation as possibly absent from the response.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The documented relation.
    pub fn rel(&self) -> &str {
        &self.rel
    }
}

impl Descriptor for LinkDescriptor {
    fn key(&self) -> &str {
        &self.rel
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}
