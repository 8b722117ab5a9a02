use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use super::link::Link;
use crate::SnippetError;
use crate::operation::OperationResponse;

/// Links of a response, grouped by relation in document order.
pub type Links = IndexMap<String, Vec<Link>>;

/// Extracts hypermedia links from a response.
pub trait LinkExtractor: Debug + Send + Sync {
    /// Returns the links of `response`, grouped by relation.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::PayloadParse`] when the body is not JSON and
    /// [`SnippetError::InvalidLinks`] when the links are not shaped as expected.
    fn extract_links(&self, response: &OperationResponse) -> Result<Links, SnippetError>;
}

/// Reads links from a HAL `_links` object.
///
/// Each member of `_links` is a relation whose value is either one link object or an
/// array of link objects, each with an `href`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalLinkExtractor;

/// Reads links from an Atom-style `links` array of `{rel, href}` objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomLinkExtractor;

#[derive(Debug, Deserialize)]
struct HalLink {
    href: String,
    #[serde(default)]
    title: Option<String>,
}

fn payload(response: &OperationResponse) -> Result<Option<Value>, SnippetError> {
    if response.content().is_empty() {
        return Ok(None);
    }
    response.payload().map(Some)
}

fn invalid(message: impl Into<String>) -> SnippetError {
    SnippetError::InvalidLinks {
        message: message.into(),
    }
}

impl LinkExtractor for HalLinkExtractor {
    fn extract_links(&self, response: &OperationResponse) -> Result<Links, SnippetError> {
        let mut links = Links::new();
        let Some(payload) = payload(response)? else {
            return Ok(links);
        };
        let Some(raw) = payload.get("_links") else {
            return Ok(links);
        };
        let Value::Object(relations) = raw else {
            return Err(invalid("'_links' must be an object"));
        };

        for (rel, value) in relations {
            let items = match value {
                Value::Array(items) => items.clone(),
                other => vec![other.clone()],
            };
            let entries = items
                .into_iter()
                .map(|item| {
                    let link = serde_json::from_value::<HalLink>(item)
                        .map_err(|err| invalid(format!("link '{rel}': {err}")))?;
                    Ok(Link {
                        rel: rel.clone(),
                        href: link.href,
                        title: link.title,
                    })
                })
                .collect::<Result<Vec<_>, SnippetError>>()?;
            trace!(%rel, count = entries.len(), "HAL links extracted");
            links.insert(rel.clone(), entries);
        }

        debug!(relations = links.len(), "HAL links extracted");
        Ok(links)
    }
}

impl LinkExtractor for AtomLinkExtractor {
    fn extract_links(&self, response: &OperationResponse) -> Result<Links, SnippetError> {
        let mut links = Links::new();
        let Some(payload) = payload(response)? else {
            return Ok(links);
        };
        let Some(raw) = payload.get("links") else {
            return Ok(links);
        };
        let Value::Array(items) = raw else {
            return Err(invalid("'links' must be an array"));
        };

        for (index, item) in items.iter().enumerate() {
            let link = serde_json::from_value::<Link>(item.clone())
                .map_err(|err| invalid(format!("link #{index}: {err}")))?;
            links.entry(link.rel.clone()).or_default().push(link);
        }

        debug!(relations = links.len(), "Atom links extracted");
        Ok(links)
    }
}

/// Picks the extractor matching the response content type.
///
/// `application/hal+json` selects [`HalLinkExtractor`] and `application/json` selects
/// [`AtomLinkExtractor`]. Content type parameters such as `charset` are ignored.
///
/// # Errors
///
/// Returns [`SnippetError::MissingLinkExtractor`] for any other, or a missing, content type.
pub fn extractor_for_content_type(
    content_type: Option<&str>,
) -> Result<Arc<dyn LinkExtractor>, SnippetError> {
    let essence = content_type
        .and_then(|content_type| content_type.parse::<mime::Mime>().ok())
        .map(|mime| mime.essence_str().to_ascii_lowercase());

    match essence.as_deref() {
        Some("application/hal+json") => Ok(Arc::new(HalLinkExtractor)),
        Some("application/json") => Ok(Arc::new(AtomLinkExtractor)),
        _ => Err(SnippetError::MissingLinkExtractor {
            content_type: content_type.map(str::to_string),
        }),
    }
}
