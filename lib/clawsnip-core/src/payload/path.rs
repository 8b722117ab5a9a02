use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::SnippetError;

/// One lexical token of a path: a quoted key, a bracket, a separator, or a plain key.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\['(?<quoted>(?:[^'\\]|\\.)*)'\]|\[(?<index>[^\[\]]*)\]|(?<dot>\.)|(?<key>[^.\[\]]+)",
    )
    .expect("a valid regex")
});

/// One navigation step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member access, `a` in `a.b`.
    Key(String),
    /// Every element of an array, `[]`.
    Wildcard,
    /// A specific array element, `[2]`.
    Index(usize),
}

impl PathSegment {
    /// Explicit indices compare as wildcards when matching discovered paths.
    pub(crate) fn normalized(&self) -> Self {
        match self {
            Self::Index(_) => Self::Wildcard,
            other => other.clone(),
        }
    }
}

/// A parsed field path such as `items[].id` or `matrix[0][1]`.
///
/// Two paths are equal when their segments are equal. The [`Display`] implementation
/// produces the canonical string form, which parses back to the same path.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::payload::{FieldPath, PathSegment};
///
/// let path = FieldPath::parse("items[].tags[0]")?;
/// assert_eq!(path.segments(), &[
///     PathSegment::Key("items".to_string()),
///     PathSegment::Wildcard,
///     PathSegment::Key("tags".to_string()),
///     PathSegment::Index(0),
/// ]);
/// assert_eq!(path.to_string(), "items[].tags[0]");
/// # Ok::<(), clawsnip_core::SnippetError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Parses a raw path expression.
    ///
    /// Keys that contain `.`, `[` or `]`, or that are empty, are written in the quoted
    /// bracket form `['a.b']`. Inside quotes, `\'` and `\\` escape a quote and a backslash.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::InvalidPath`] when the path is empty, contains consecutive
    /// (or leading/trailing) separators, or contains a malformed bracket expression.
    pub fn parse(raw: &str) -> Result<Self, SnippetError> {
        let invalid = |reason: &str| SnippetError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = vec![];
        let mut end = 0;
        let mut after_dot = false;
        for captures in TOKEN.captures_iter(raw) {
            let Some(token) = captures.get(0) else {
                continue;
            };
            if token.start() != end {
                break;
            }
            end = token.end();

            if captures.name("dot").is_some() {
                if segments.is_empty() || after_dot {
                    return Err(invalid("empty segment between separators"));
                }
                after_dot = true;
                continue;
            }

            if let Some(key) = captures.name("key") {
                if !segments.is_empty() && !after_dot {
                    return Err(invalid(&format!(
                        "missing separator before '{}'",
                        key.as_str()
                    )));
                }
                segments.push(PathSegment::Key(key.as_str().to_string()));
            } else if after_dot {
                return Err(invalid(&format!("missing key before '{}'", token.as_str())));
            } else if let Some(quoted) = captures.name("quoted") {
                segments.push(PathSegment::Key(unescape(quoted.as_str())));
            } else {
                let index = captures.name("index").map_or("", |it| it.as_str());
                if index.is_empty() {
                    segments.push(PathSegment::Wildcard);
                } else if index.bytes().all(|byte| byte.is_ascii_digit()) {
                    let index = index
                        .parse()
                        .map_err(|_| invalid(&format!("index '{index}' is out of range")))?;
                    segments.push(PathSegment::Index(index));
                } else {
                    return Err(invalid(&format!("malformed array index '[{index}]'")));
                }
            }
            after_dot = false;
        }

        if end != raw.len() {
            let rest = raw.get(end..).unwrap_or_default();
            return Err(invalid(&format!("malformed segment at '{rest}'")));
        }
        if after_dot {
            return Err(invalid("empty segment between separators"));
        }

        Ok(Self { segments })
    }

    /// The navigation segments, left to right.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns a new path with `segment` appended.
    pub(crate) fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Returns `true` if `self` is `other` or one of its ancestors.
    ///
    /// Explicit indices compare as wildcards.
    pub(crate) fn covers(&self, other: &Self) -> bool {
        self.segments.len() <= other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(left, right)| left.normalized() == right.normalized())
    }
}

fn needs_quotes(key: &str) -> bool {
    key.is_empty() || key.contains(['.', '[', ']'])
}

fn escape(key: &str) -> String {
    key.replace('\\', "\\\\").replace('\'', "\\'")
}

fn unescape(quoted: &str) -> String {
    let mut key = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(current) = chars.next() {
        match current {
            '\\' => key.extend(chars.next()),
            other => key.push(other),
        }
    }
    key
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if needs_quotes(key) => write!(f, "['{}']", escape(key))?,
                PathSegment::Key(key) if position == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Wildcard => write!(f, "[]")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = SnippetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn key(name: &str) -> PathSegment {
        PathSegment::Key(name.to_string())
    }

    #[test]
    fn should_parse_dotted_keys() {
        let path = FieldPath::parse("a.b.c").expect("should parse");
        assert_eq!(path.segments(), &[key("a"), key("b"), key("c")]);
    }

    #[test]
    fn should_parse_wildcards_and_indices() {
        let path = FieldPath::parse("items[].matrix[0][]").expect("should parse");
        assert_eq!(
            path.segments(),
            &[
                key("items"),
                PathSegment::Wildcard,
                key("matrix"),
                PathSegment::Index(0),
                PathSegment::Wildcard,
            ]
        );
    }

    #[test]
    fn should_parse_top_level_array() {
        let path = FieldPath::parse("[].id").expect("should parse");
        assert_eq!(path.segments(), &[PathSegment::Wildcard, key("id")]);
    }

    #[rstest]
    #[case::simple("a")]
    #[case::nested("a.b.c")]
    #[case::wildcard("items[].id")]
    #[case::index("items[3].id")]
    #[case::nested_arrays("m[][1][]")]
    #[case::root_array("[].a[].b")]
    #[case::odd_key("a-b.c_d.e f")]
    #[case::dotted_key("['a.b']")]
    #[case::empty_key("c['']")]
    #[case::bracketed_key("items[]['x[0]'].y")]
    #[case::escaped_quote(r"a['it\'s.here']")]
    #[case::escaped_backslash(r"['a\\b.c']")]
    fn should_round_trip_canonical_paths(#[case] raw: &str) {
        let path = FieldPath::parse(raw).expect("should parse");
        assert_eq!(path.to_string(), raw);

        let reparsed = FieldPath::parse(&path.to_string()).expect("should parse again");
        assert_eq!(reparsed, path);
    }

    #[test]
    fn should_parse_quoted_keys() {
        let path = FieldPath::parse(r"['a.b'].c[''][0]['it\'s']").expect("should parse");
        assert_eq!(
            path.segments(),
            &[
                key("a.b"),
                key("c"),
                key(""),
                PathSegment::Index(0),
                key("it's"),
            ]
        );
    }

    #[test]
    fn should_drop_quotes_that_are_not_needed() {
        let path = FieldPath::parse("a['b']").expect("should parse");
        assert_eq!(path.to_string(), "a.b");
    }

    #[test]
    fn should_quote_keys_that_need_it() {
        let path = FieldPath::default()
            .child(key("a.b"))
            .child(PathSegment::Wildcard)
            .child(key(""))
            .child(key("x]"));

        assert_eq!(path.to_string(), "['a.b'][]['']['x]']");
        assert_eq!(FieldPath::parse(&path.to_string()).expect("should parse"), path);
    }

    #[test]
    fn should_canonicalize_leading_zeros() {
        let path = FieldPath::parse("a[007]").expect("should parse");
        assert_eq!(path.to_string(), "a[7]");
    }

    #[rstest]
    #[case::empty("")]
    #[case::double_dot("a..b")]
    #[case::leading_dot(".a")]
    #[case::trailing_dot("a.")]
    #[case::unclosed("a[")]
    #[case::unopened("a]")]
    #[case::not_a_number("a[x]")]
    #[case::negative("a[-1]")]
    #[case::text_after_bracket("a[]b")]
    #[case::keyless_bracket_after_dot("a.[]")]
    #[case::nested_brackets("a[[]]")]
    #[case::unclosed_quote("a['b")]
    #[case::quoted_key_after_dot("a.['b.c']")]
    fn should_reject_invalid_path(#[case] raw: &str) {
        let result = FieldPath::parse(raw);
        assert!(
            matches!(result, Err(SnippetError::InvalidPath { .. })),
            "expected '{raw}' to be rejected, got {result:?}"
        );
    }

    #[test]
    fn should_report_offending_path() {
        let error = FieldPath::parse("a..b").expect_err("should fail");
        insta::assert_snapshot!(error, @"Invalid field path 'a..b': empty segment between separators");
    }

    #[test]
    fn should_cover_descendants_and_itself() {
        let parent = FieldPath::parse("items[0]").expect("parent");
        let child = FieldPath::parse("items[].id").expect("child");

        assert!(parent.covers(&child));
        assert!(child.covers(&child));
        assert!(!child.covers(&parent));
    }
}
