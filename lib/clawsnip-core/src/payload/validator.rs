use std::fmt::Display;

use indexmap::IndexSet;
use serde_json::Value;
use tracing::debug;

use super::descriptor::FieldDescriptor;
use super::navigator::resolve;
use super::path::{FieldPath, PathSegment};
use crate::SnippetError;
use crate::descriptor::{Descriptor, DescriptorRegistry};
use crate::error::{SnippetValidationError, ValidationTarget};

/// Differences between documented items and what an exchange actually contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult<T> {
    /// Present in the exchange but not documented.
    pub undocumented: Vec<T>,
    /// Documented as required but absent from the exchange.
    pub missing: Vec<T>,
}

impl<T> Default for ValidationResult<T> {
    fn default() -> Self {
        Self {
            undocumented: vec![],
            missing: vec![],
        }
    }
}

impl<T: Display> ValidationResult<T> {
    /// Returns `true` when documentation and exchange agree.
    pub fn is_valid(&self) -> bool {
        self.undocumented.is_empty() && self.missing.is_empty()
    }

    /// Turns any discrepancy into a [`SnippetError::Validation`].
    ///
    /// # Errors
    ///
    /// Fails when either list is non-empty.
    pub fn into_result(self, target: ValidationTarget) -> Result<(), SnippetError> {
        if self.is_valid() {
            return Ok(());
        }
        let to_strings =
            |items: Vec<T>| -> Vec<String> { items.iter().map(ToString::to_string).collect() };
        Err(SnippetValidationError {
            target,
            undocumented: to_strings(self.undocumented),
            missing: to_strings(self.missing),
        }
        .into())
    }
}

/// Lists every object member path present in `payload`, in document order.
///
/// Array elements are folded into a single `[]` segment, so `{"a": [{"b": 1}, {"b": 2}]}`
/// yields `a` and `a[].b` once each.
pub fn discover_paths(payload: &Value) -> IndexSet<FieldPath> {
    let mut paths = IndexSet::new();
    collect_paths(payload, &FieldPath::default(), &mut paths);
    paths
}

fn collect_paths(value: &Value, prefix: &FieldPath, paths: &mut IndexSet<FieldPath>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = prefix.child(PathSegment::Key(key.clone()));
                paths.insert(path.clone());
                collect_paths(child, &path, paths);
            }
        }
        Value::Array(items) => {
            let path = prefix.child(PathSegment::Wildcard);
            for item in items {
                collect_paths(item, &path, paths);
            }
        }
        _ => {}
    }
}

/// Compares the documented fields with the fields present in `payload`.
///
/// A documented path covers its whole subtree, and a payload branch counts as documented
/// when a documented path lies beneath it. Optional descriptors are never reported missing.
///
/// # Errors
///
/// Returns [`SnippetError::InvalidPath`] if a registered path cannot be parsed.
pub fn validate(
    payload: &Value,
    descriptors: &DescriptorRegistry<FieldDescriptor>,
) -> Result<ValidationResult<FieldPath>, SnippetError> {
    let documented = descriptors
        .iter()
        .map(|descriptor| Ok((FieldPath::parse(descriptor.path())?, descriptor)))
        .collect::<Result<Vec<_>, SnippetError>>()?;

    let undocumented = discover_paths(payload)
        .into_iter()
        .filter(|actual| {
            !documented
                .iter()
                .any(|(path, _)| path.covers(actual) || actual.covers(path))
        })
        .collect::<Vec<_>>();

    let missing = documented
        .into_iter()
        .filter(|(path, descriptor)| {
            !descriptor.is_optional() && !resolve(path, payload).is_present()
        })
        .map(|(path, _)| path)
        .collect::<Vec<_>>();

    debug!(
        undocumented = undocumented.len(),
        missing = missing.len(),
        "payload fields validated"
    );
    Ok(ValidationResult {
        undocumented,
        missing,
    })
}
