//! Documentation of request and response payload fields.
//!
//! A payload is the JSON body of the exchange, deserialized into a [`serde_json::Value`].
//! Fields are addressed with path expressions:
//!
//! - `a.b` navigates object members,
//! - `items[]` fans out over every element of the `items` array,
//! - `items[2]` selects a single element.
//!
//! The [`FieldsSnippet`] ties the pieces together: it validates the registered
//! [`FieldDescriptor`]s against the payload ([`validate`]), resolves the type of each
//! documented field ([`resolve_type`]), and renders the `fields` template.

mod descriptor;
mod field_type;
mod navigator;
mod path;
mod snippet;
mod validator;

pub use self::descriptor::FieldDescriptor;
pub use self::field_type::{FieldType, resolve_type};
pub use self::navigator::{Resolution, resolve};
pub use self::path::{FieldPath, PathSegment};
pub use self::snippet::{DocumentedField, FieldsSnippet, PayloadSource};
pub use self::validator::{ValidationResult, discover_paths, validate};
