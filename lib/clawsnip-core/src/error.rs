use std::fmt::{self, Display};

/// Errors that can occur while documenting an operation.
///
/// Every variant is fatal for the documentation step that raised it: nothing is retried
/// or silently skipped, so a test producing a snippet fails as soon as the documentation
/// stops matching the captured exchange.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum SnippetError {
    /// A field path expression could not be parsed.
    ///
    /// Occurs for empty paths, consecutive separators, or malformed `[...]` expressions.
    #[display("Invalid field path '{path}': {reason}")]
    #[from(skip)]
    InvalidPath {
        /// The raw path that failed to parse.
        path: String,
        /// Why the path is invalid.
        reason: String,
    },

    /// A descriptor was registered with an empty key or description.
    #[display("Invalid descriptor #{index} ('{key}'): {reason}")]
    #[from(skip)]
    InvalidDescriptor {
        /// Position of the descriptor in the registered sequence.
        index: usize,
        /// The path or relation of the offending descriptor.
        key: String,
        /// Why the descriptor is invalid.
        reason: String,
    },

    /// The field is not present in the payload.
    ///
    /// Raised by type resolution and translated into [`SnippetError::FieldTypeRequired`]
    /// before it reaches a caller documenting a snippet.
    #[display("Field '{path}' does not exist in the payload")]
    #[from(skip)]
    FieldDoesNotExist {
        /// The path that could not be found.
        path: String,
    },

    /// The field type cannot be derived from the payload and must be given explicitly.
    #[display(
        "Cannot determine the type of the field '{path}' as it is not present in the payload. Please provide a type using FieldDescriptor::with_type"
    )]
    #[from(skip)]
    FieldTypeRequired {
        /// The path of the field lacking a type.
        path: String,
    },

    /// The documented descriptors do not match the captured payload.
    Validation(SnippetValidationError),

    /// The captured request URL could not be parsed.
    UrlError(url::ParseError),

    /// The request or response body is not valid JSON.
    PayloadParse(serde_json::Error),

    /// No template with the given name could be found.
    #[display("Template named '{name}' could not be resolved")]
    #[from(skip)]
    TemplateResolution {
        /// The requested template name.
        name: String,
    },

    /// A template was found but failed to compile.
    #[display("Template '{name}' failed to compile: {message}")]
    #[from(skip)]
    TemplateCompilation {
        /// The template name.
        name: String,
        /// The compiler diagnostic.
        message: String,
    },

    /// A compiled template failed to render its context.
    #[display("Template '{name}' failed to render: {message}")]
    #[from(skip)]
    TemplateRender {
        /// The template name.
        name: String,
        /// The renderer diagnostic.
        message: String,
    },

    /// No link extractor was configured and none matches the response content type.
    #[display(
        "No LinkExtractor has been provided and one is not available for the content type {content_type:?}"
    )]
    #[from(skip)]
    MissingLinkExtractor {
        /// The response content type, if any.
        content_type: Option<String>,
    },

    /// The response links are not shaped the way the extractor expects.
    #[display("Invalid links in response: {message}")]
    #[from(skip)]
    InvalidLinks {
        /// Description of the problem.
        message: String,
    },

    /// Writing a snippet to its output location failed.
    Io(std::io::Error),
}

/// What a [`SnippetValidationError`] was validating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationTarget {
    /// Request or response payload fields, identified by path.
    Fields,
    /// Hypermedia links, identified by relation.
    Links,
}

/// Discrepancies between documented descriptors and the captured exchange.
///
/// Both lists are carried verbatim so that the caller can report each of them.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct SnippetValidationError {
    /// What was validated.
    pub target: ValidationTarget,
    /// Present in the exchange but not documented.
    pub undocumented: Vec<String>,
    /// Documented as required but absent from the exchange.
    pub missing: Vec<String>,
}

impl Display for SnippetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (undocumented, missing) = match self.target {
            ValidationTarget::Fields => (
                "The following parts of the payload were not documented",
                "Fields with the following paths were not found in the payload",
            ),
            ValidationTarget::Links => (
                "Links with the following relations were not documented",
                "Links with the following relations were not found in the response",
            ),
        };

        let mut parts = Vec::with_capacity(2);
        if !self.undocumented.is_empty() {
            parts.push(format!("{undocumented}: {:?}", self.undocumented));
        }
        if !self.missing.is_empty() {
            parts.push(format!("{missing}: {:?}", self.missing));
        }
        write!(f, "{}", parts.join(". "))
    }
}
