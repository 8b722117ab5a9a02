use serde_json::Value;

use super::navigator::{Resolution, resolve};
use super::path::FieldPath;
use crate::SnippetError;

/// The semantic type of a documented field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum FieldType {
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`, or a fan-out that produced no value.
    Null,
    /// Values found at the same path disagree in type.
    Varies,
}

impl FieldType {
    /// The type of a single payload value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    /// The common type of a set of values.
    ///
    /// An empty set is [`FieldType::Null`], disagreeing values are [`FieldType::Varies`].
    pub fn common<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut types = values.into_iter().map(Self::of);
        let Some(first) = types.next() else {
            return Self::Null;
        };
        if types.all(|other| other == first) {
            first
        } else {
            Self::Varies
        }
    }
}

/// Determines the type of the field at `path`.
///
/// # Errors
///
/// Returns [`SnippetError::FieldDoesNotExist`] when the path cannot be followed in the payload.
pub fn resolve_type(path: &FieldPath, payload: &Value) -> Result<FieldType, SnippetError> {
    match resolve(path, payload) {
        Resolution::NotFound => Err(SnippetError::FieldDoesNotExist {
            path: path.to_string(),
        }),
        Resolution::Found(values) => Ok(FieldType::common(values)),
    }
}
