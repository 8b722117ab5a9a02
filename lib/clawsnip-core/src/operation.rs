//! The captured HTTP exchange being documented.

use http::{Method, StatusCode, header::CONTENT_TYPE};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::SnippetError;

/// Header values grouped by name, in the order they were added.
pub type Headers = IndexMap<String, Vec<String>>;

fn first_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

fn add_header(headers: &mut Headers, name: String, value: String) {
    headers.entry(name).or_default().push(value);
}

fn parse_payload(content: &[u8]) -> Result<Value, SnippetError> {
    let value = serde_json::from_slice(content)?;
    Ok(value)
}

fn lossy_string(content: &[u8]) -> String {
    match std::str::from_utf8(content) {
        Ok(text) => text.to_string(),
        Err(error) => {
            warn!(%error, "content is not valid UTF-8, rendering lossily");
            String::from_utf8_lossy(content).into_owned()
        }
    }
}

/// One part of a `multipart/form-data` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    content: Vec<u8>,
}

impl RequestPart {
    /// Creates a part with inline content.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            content: content.into(),
        }
    }

    /// Sets the name of the uploaded file.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Sets the content type of the part.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The form field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The uploaded file name, if any.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// The part content type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The raw part content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The content as text, replacing invalid UTF-8 sequences.
    pub fn content_as_string(&self) -> String {
        lossy_string(&self.content)
    }
}

/// The request half of a captured exchange.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::OperationRequest;
/// use http::Method;
///
/// let request = OperationRequest::new(Method::POST, "http://localhost:8080/api/items")?
///     .with_header("Content-Type", "application/json")
///     .with_content(r#"{"name":"widget"}"#);
///
/// assert_eq!(request.content_type(), Some("application/json"));
/// # Ok::<(), clawsnip_core::SnippetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct OperationRequest {
    method: Method,
    uri: Url,
    context_path: String,
    headers: Headers,
    parameters: IndexMap<String, Vec<String>>,
    parts: Vec<RequestPart>,
    content: Vec<u8>,
}

impl OperationRequest {
    /// Creates a request with no headers, parameters, or body.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::UrlError`] if `uri` is not an absolute URL.
    pub fn new(method: Method, uri: &str) -> Result<Self, SnippetError> {
        let uri = Url::parse(uri)?;
        Ok(Self::from_url(method, uri))
    }

    /// Creates a request from an already parsed URL.
    pub fn from_url(method: Method, uri: Url) -> Self {
        Self {
            method,
            uri,
            context_path: String::new(),
            headers: Headers::new(),
            parameters: IndexMap::new(),
            parts: vec![],
            content: vec![],
        }
    }

    /// Sets the application context path that prefixes the request path.
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    /// Adds a header value. Repeated names keep every value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        add_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Adds a form or query parameter value.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Adds a multipart part.
    pub fn with_part(mut self, part: RequestPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Sets the request body.
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    /// The HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The absolute request URL.
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// The context path, empty when the application is mounted at the root.
    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Every header, grouped by name.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The first value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        first_header(&self.headers, name)
    }

    /// The `Content-Type` header value.
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Form and query parameters.
    pub fn parameters(&self) -> &IndexMap<String, Vec<String>> {
        &self.parameters
    }

    /// The multipart parts.
    pub fn parts(&self) -> &[RequestPart] {
        &self.parts
    }

    /// The raw body.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// The body as text, replacing invalid UTF-8 sequences.
    pub fn content_as_string(&self) -> String {
        lossy_string(&self.content)
    }

    /// Returns `true` for `multipart/form-data` requests.
    pub fn is_multipart(&self) -> bool {
        if !self.parts.is_empty() {
            return true;
        }
        self.content_type()
            .and_then(|content_type| content_type.parse::<mime::Mime>().ok())
            .is_some_and(|parsed| parsed.essence_str() == mime::MULTIPART_FORM_DATA.essence_str())
    }

    /// Deserializes the body into a payload tree.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::PayloadParse`] if the body is not valid JSON.
    pub fn payload(&self) -> Result<Value, SnippetError> {
        parse_payload(&self.content)
    }
}

/// The response half of a captured exchange.
#[derive(Debug, Clone)]
pub struct OperationResponse {
    status: StatusCode,
    headers: Headers,
    content: Vec<u8>,
}

impl OperationResponse {
    /// Creates a response with no headers or body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            content: vec![],
        }
    }

    /// Adds a header value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        add_header(&mut self.headers, name.into(), value.into());
        self
    }

    /// Sets the response body.
    pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.content = content.into();
        self
    }

    /// The status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Every header, grouped by name.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The first value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        first_header(&self.headers, name)
    }

    /// The `Content-Type` header value.
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// The raw body.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Deserializes the body into a payload tree.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::PayloadParse`] if the body is not valid JSON.
    pub fn payload(&self) -> Result<Value, SnippetError> {
        parse_payload(&self.content)
    }
}

/// A completed request/response exchange.
#[derive(Debug, Clone)]
pub struct Operation {
    /// The request that was sent.
    pub request: OperationRequest,
    /// The response that was received.
    pub response: OperationResponse,
}

impl Operation {
    /// Pairs a request with its response.
    pub fn new(request: OperationRequest, response: OperationResponse) -> Self {
        Self { request, response }
    }
}
