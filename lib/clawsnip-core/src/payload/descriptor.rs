use super::field_type::FieldType;
use crate::descriptor::Descriptor;

/// Describes one field of a request or response payload.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::Descriptor;
/// use clawsnip_core::payload::{FieldDescriptor, FieldType};
///
/// let id = FieldDescriptor::new("items[].id", "The item identifier");
/// let next = FieldDescriptor::new("next", "Cursor of the next page")
///     .with_type(FieldType::String)
///     .optional();
///
/// assert!(next.is_optional());
/// assert_eq!(id.field_type(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    path: String,
    description: String,
    field_type: Option<FieldType>,
    optional: bool,
}

impl FieldDescriptor {
    /// Creates a required descriptor whose type is resolved from the payload.
    pub fn new(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            field_type: None,
            optional: false,
        }
    }

    /// Sets an explicit type, skipping resolution from the payload.
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    /// Marks the field as possibly absent from the payload.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The raw path expression.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The explicit type, if any.
    pub fn field_type(&self) -> Option<FieldType> {
        self.field_type
    }
}

impl Descriptor for FieldDescriptor {
    fn key(&self) -> &str {
        &self.path
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}
