use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use super::extractor::{LinkExtractor, extractor_for_content_type};
use super::link::LinkDescriptor;
use crate::SnippetError;
use crate::descriptor::{Descriptor, DescriptorRegistry};
use crate::error::ValidationTarget;
use crate::operation::Operation;
use crate::payload::ValidationResult;
use crate::snippet::Snippet;
use crate::templates::{TemplateContext, TemplateEngine};

/// Documents the hypermedia links of a response (`links`).
///
/// Every extracted relation must be documented and every required relation must be
/// present. The `links` template is rendered with one `{rel, description, optional}` entry
/// per descriptor, in registration order.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::hypermedia::{HalLinkExtractor, LinkDescriptor, LinksSnippet};
///
/// let snippet = LinksSnippet::new([
///     LinkDescriptor::new("self", "This resource"),
///     LinkDescriptor::new("next", "The next page").optional(),
/// ])?
/// .with_extractor(HalLinkExtractor);
/// # Ok::<(), clawsnip_core::SnippetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LinksSnippet {
    descriptors: DescriptorRegistry<LinkDescriptor>,
    extractor: Option<Arc<dyn LinkExtractor>>,
}

impl LinksSnippet {
    /// Registers the link descriptors.
    ///
    /// Without an explicit extractor, one is chosen from the response content type.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::InvalidDescriptor`] for empty relations or descriptions.
    pub fn new(
        descriptors: impl IntoIterator<Item = LinkDescriptor>,
    ) -> Result<Self, SnippetError> {
        Ok(Self {
            descriptors: DescriptorRegistry::new(descriptors)?,
            extractor: None,
        })
    }

    /// Uses `extractor` whatever the response content type.
    pub fn with_extractor(mut self, extractor: impl LinkExtractor + 'static) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }

    /// The registered descriptors.
    pub fn descriptors(&self) -> &DescriptorRegistry<LinkDescriptor> {
        &self.descriptors
    }

    /// Compares the documented relations with the extracted ones.
    ///
    /// Undocumented relations come in response order, missing ones in registration order.
    pub fn validate<'a>(
        &self,
        relations: impl IntoIterator<Item = &'a str>,
    ) -> ValidationResult<String> {
        let actual = relations.into_iter().collect::<Vec<_>>();

        let undocumented = actual
            .iter()
            .filter(|rel| !self.descriptors.contains(rel))
            .map(|rel| rel.to_string())
            .collect();
        let missing = self
            .descriptors
            .required()
            .map(Descriptor::key)
            .filter(|rel| !actual.contains(rel))
            .map(str::to_string)
            .collect();

        ValidationResult {
            undocumented,
            missing,
        }
    }
}

impl Snippet for LinksSnippet {
    fn name(&self) -> &str {
        "links"
    }

    fn render(
        &self,
        operation: &Operation,
        templates: &dyn TemplateEngine,
    ) -> Result<String, SnippetError> {
        let response = &operation.response;
        let extractor = match &self.extractor {
            Some(extractor) => Arc::clone(extractor),
            None => extractor_for_content_type(response.content_type())?,
        };

        let links = extractor.extract_links(response)?;
        self.validate(links.keys().map(String::as_str))
            .into_result(ValidationTarget::Links)?;
        debug!(relations = links.len(), "links validated");

        let entries = self
            .descriptors
            .iter()
            .map(|descriptor| {
                json!({
                    "rel": descriptor.rel(),
                    "description": descriptor.description(),
                    "optional": descriptor.is_optional(),
                })
            })
            .collect::<Vec<_>>();

        let mut context = TemplateContext::new();
        context.insert("links".to_string(), Value::Array(entries));
        templates.compile(self.name())?.render(&context)
    }
}
