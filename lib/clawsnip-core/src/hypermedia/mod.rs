//! Documentation of hypermedia links.
//!
//! A [`LinkExtractor`] reads the links of a response, grouped by relation. Two formats are
//! supported out of the box: HAL (`_links` object) and Atom-style (`links` array). The
//! [`LinksSnippet`] checks the extracted relations against its [`LinkDescriptor`]s and
//! renders the `links` template.

mod extractor;
mod link;
mod snippet;

pub use self::extractor::{
    AtomLinkExtractor, HalLinkExtractor, LinkExtractor, Links, extractor_for_content_type,
};
pub use self::link::{Link, LinkDescriptor};
pub use self::snippet::LinksSnippet;
