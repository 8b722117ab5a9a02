use serde_json::{Value, json};
use tracing::debug;

use super::descriptor::FieldDescriptor;
use super::field_type::{FieldType, resolve_type};
use super::path::FieldPath;
use super::validator::validate;
use crate::SnippetError;
use crate::descriptor::{Descriptor, DescriptorRegistry};
use crate::error::ValidationTarget;
use crate::operation::Operation;
use crate::snippet::Snippet;
use crate::templates::{TemplateContext, TemplateEngine};

/// Which body of the exchange a [`FieldsSnippet`] documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    /// The request body.
    Request,
    /// The response body.
    Response,
}

impl PayloadSource {
    fn snippet_name(self) -> &'static str {
        match self {
            Self::Request => "request-fields",
            Self::Response => "response-fields",
        }
    }
}

/// One row of a fields snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedField {
    /// The documented path.
    pub path: String,
    /// The explicit or resolved type.
    pub field_type: FieldType,
    /// The description.
    pub description: String,
}

/// Documents the fields of a request or response payload.
///
/// Rendering first checks that every payload field is documented and every required
/// documented field is present, then renders the `fields` template with one
/// `{path, type, description}` entry per descriptor, in registration order.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::payload::{FieldDescriptor, FieldType, FieldsSnippet};
/// use serde_json::json;
///
/// let snippet = FieldsSnippet::response([
///     FieldDescriptor::new("items[].id", "The item identifier"),
///     FieldDescriptor::new("next", "Next page cursor")
///         .with_type(FieldType::String)
///         .optional(),
/// ])?;
///
/// let fields = snippet.assemble(&json!({"items": [{"id": 1}]}))?;
/// assert_eq!(fields[0].field_type, FieldType::Number);
/// assert_eq!(fields[1].field_type, FieldType::String);
/// # Ok::<(), clawsnip_core::SnippetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FieldsSnippet {
    source: PayloadSource,
    descriptors: DescriptorRegistry<FieldDescriptor>,
}

impl FieldsSnippet {
    /// Documents the request payload (`request-fields`).
    ///
    /// # Errors
    ///
    /// See [`FieldsSnippet::new`].
    pub fn request(
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, SnippetError> {
        Self::new(PayloadSource::Request, descriptors)
    }

    /// Documents the response payload (`response-fields`).
    ///
    /// # Errors
    ///
    /// See [`FieldsSnippet::new`].
    pub fn response(
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, SnippetError> {
        Self::new(PayloadSource::Response, descriptors)
    }

    /// Registers the descriptors, checking them eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::InvalidDescriptor`] for empty paths or descriptions and
    /// [`SnippetError::InvalidPath`] for malformed paths.
    pub fn new(
        source: PayloadSource,
        descriptors: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, SnippetError> {
        let descriptors = DescriptorRegistry::new(descriptors)?;
        for descriptor in descriptors.iter() {
            FieldPath::parse(descriptor.path())?;
        }
        Ok(Self {
            source,
            descriptors,
        })
    }

    /// The registered descriptors.
    pub fn descriptors(&self) -> &DescriptorRegistry<FieldDescriptor> {
        &self.descriptors
    }

    /// Builds one entry per descriptor, resolving types that were not given explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::FieldTypeRequired`] when a descriptor has no explicit type
    /// and its path is absent from `payload`.
    pub fn assemble(&self, payload: &Value) -> Result<Vec<DocumentedField>, SnippetError> {
        self.descriptors
            .iter()
            .map(|descriptor| {
                let field_type = match descriptor.field_type() {
                    Some(field_type) => field_type,
                    None => field_type_of(descriptor, payload)?,
                };
                Ok(DocumentedField {
                    path: descriptor.path().to_string(),
                    field_type,
                    description: descriptor.description().to_string(),
                })
            })
            .collect()
    }
}

fn field_type_of(
    descriptor: &FieldDescriptor,
    payload: &Value,
) -> Result<FieldType, SnippetError> {
    let path = FieldPath::parse(descriptor.path())?;
    resolve_type(&path, payload).map_err(|err| match err {
        SnippetError::FieldDoesNotExist { path } => SnippetError::FieldTypeRequired { path },
        other => other,
    })
}

impl Snippet for FieldsSnippet {
    fn name(&self) -> &str {
        self.source.snippet_name()
    }

    fn render(
        &self,
        operation: &Operation,
        templates: &dyn TemplateEngine,
    ) -> Result<String, SnippetError> {
        let payload = match self.source {
            PayloadSource::Request => operation.request.payload()?,
            PayloadSource::Response => operation.response.payload()?,
        };

        validate(&payload, &self.descriptors)?.into_result(ValidationTarget::Fields)?;

        let fields = self
            .assemble(&payload)?
            .into_iter()
            .map(|field| {
                json!({
                    "path": field.path,
                    "type": field.field_type.to_string(),
                    "description": field.description,
                })
            })
            .collect::<Vec<_>>();
        debug!(snippet = self.name(), fields = fields.len(), "fields assembled");

        let mut context = TemplateContext::new();
        context.insert("fields".to_string(), Value::Array(fields));
        templates.compile("fields")?.render(&context)
    }
}
