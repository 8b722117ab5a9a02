use serde_json::Value;
use tracing::trace;

use super::path::{FieldPath, PathSegment};

/// The outcome of resolving a [`FieldPath`] against a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    /// Some step of the path could not be followed.
    NotFound,
    /// Every value reachable through the path, in document order.
    ///
    /// The sequence is empty when a wildcard fanned out over empty arrays only.
    Found(Vec<&'a Value>),
}

impl<'a> Resolution<'a> {
    /// Returns `true` when the path exists with at least one value.
    ///
    /// A fan-out over empty arrays counts as absent.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Found(values) if !values.is_empty())
    }

    /// The resolved values, if found.
    pub fn values(&self) -> Option<&[&'a Value]> {
        match self {
            Self::NotFound => None,
            Self::Found(values) => Some(values),
        }
    }
}

/// Resolves every value reachable by `path` in `payload`.
///
/// Navigation is strict: if any current node lacks a requested key, is not the
/// expected container, or has no element at a requested index, the whole path
/// resolves to [`Resolution::NotFound`]. Partial matches are never returned.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::payload::{FieldPath, Resolution, resolve};
/// use serde_json::json;
///
/// let payload = json!({"items": [{"id": 1}, {"id": 2}]});
///
/// let ids = resolve(&FieldPath::parse("items[].id")?, &payload);
/// assert_eq!(ids, Resolution::Found(vec![&json!(1), &json!(2)]));
///
/// let names = resolve(&FieldPath::parse("items[].name")?, &payload);
/// assert_eq!(names, Resolution::NotFound);
/// # Ok::<(), clawsnip_core::SnippetError>(())
/// ```
pub fn resolve<'a>(path: &FieldPath, payload: &'a Value) -> Resolution<'a> {
    let mut current = vec![payload];

    for segment in path.segments() {
        let mut next = Vec::with_capacity(current.len());
        for node in current {
            match (segment, node) {
                (PathSegment::Key(key), Value::Object(map)) => match map.get(key) {
                    Some(value) => next.push(value),
                    None => {
                        trace!(%path, %key, "key not found");
                        return Resolution::NotFound;
                    }
                },
                (PathSegment::Wildcard, Value::Array(items)) => next.extend(items),
                (PathSegment::Index(index), Value::Array(items)) => match items.get(*index) {
                    Some(value) => next.push(value),
                    None => {
                        trace!(%path, index, len = items.len(), "index out of bounds");
                        return Resolution::NotFound;
                    }
                },
                (segment, _) => {
                    trace!(%path, ?segment, "segment does not apply to node");
                    return Resolution::NotFound;
                }
            }
        }
        current = next;
    }

    Resolution::Found(current)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn resolve_str<'a>(raw: &str, payload: &'a Value) -> Resolution<'a> {
        let path = FieldPath::parse(raw).expect("valid path");
        resolve(&path, payload)
    }

    #[test]
    fn should_resolve_nested_key() {
        let payload = json!({"a": {"b": 1}});
        assert_eq!(resolve_str("a.b", &payload), Resolution::Found(vec![&json!(1)]));
    }

    #[test]
    fn should_not_find_absent_key() {
        let payload = json!({"a": {"b": 1}});
        assert_eq!(resolve_str("a.c", &payload), Resolution::NotFound);
    }

    #[test]
    fn should_fan_out_over_wildcard() {
        let payload = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(
            resolve_str("items[].id", &payload),
            Resolution::Found(vec![&json!(1), &json!(2)])
        );
    }

    #[test]
    fn should_not_find_key_missing_from_some_elements() {
        let payload = json!({"items": [{"id": 1}, {"name": "x"}]});
        assert_eq!(resolve_str("items[].id", &payload), Resolution::NotFound);
    }

    #[test]
    fn should_resolve_explicit_index() {
        let payload = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(
            resolve_str("items[1].id", &payload),
            Resolution::Found(vec![&json!(2)])
        );
        assert_eq!(resolve_str("items[2].id", &payload), Resolution::NotFound);
    }

    #[test]
    fn should_not_find_wildcard_on_non_array() {
        let payload = json!({"items": {"id": 1}});
        assert_eq!(resolve_str("items[].id", &payload), Resolution::NotFound);
    }

    #[test]
    fn should_not_find_key_on_scalar() {
        let payload = json!({"a": 1});
        assert_eq!(resolve_str("a.b", &payload), Resolution::NotFound);
    }

    #[test]
    fn should_resolve_empty_array_fan_out_as_found_but_absent() {
        let payload = json!({"items": []});
        let resolution = resolve_str("items[].id", &payload);

        assert_eq!(resolution, Resolution::Found(vec![]));
        assert!(!resolution.is_present());
    }

    #[test]
    fn should_resolve_nested_arrays() {
        let payload = json!({"m": [[1, 2], [3]]});
        assert_eq!(
            resolve_str("m[][]", &payload),
            Resolution::Found(vec![&json!(1), &json!(2), &json!(3)])
        );
    }

    #[test]
    fn should_resolve_top_level_array() {
        let payload = json!([{"id": "a"}, {"id": "b"}]);
        assert_eq!(
            resolve_str("[].id", &payload),
            Resolution::Found(vec![&json!("a"), &json!("b")])
        );
    }
}
