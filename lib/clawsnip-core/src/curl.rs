//! Documents a request as the equivalent cURL command line.

use http::Method;
use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;

use crate::SnippetError;
use crate::operation::{Operation, OperationRequest, RequestPart};
use crate::snippet::Snippet;
use crate::templates::{TemplateContext, TemplateEngine, wrap_in_code_block};

const STANDARD_PORT_HTTP: u16 = 80;
const STANDARD_PORT_HTTPS: u16 = 443;

/// The `curl-request` snippet.
///
/// Renders the `curl-request` template with a `command` entry, then wraps the result in a
/// `bash` code block.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlRequestSnippet;

impl Snippet for CurlRequestSnippet {
    fn name(&self) -> &str {
        "curl-request"
    }

    fn render(
        &self,
        operation: &Operation,
        templates: &dyn TemplateEngine,
    ) -> Result<String, SnippetError> {
        let command = curl_command(&operation.request);
        debug!(%command, "cURL command generated");

        let mut context = TemplateContext::new();
        context.insert("command".to_string(), Value::from(command));
        let rendered = templates.compile(self.name())?.render(&context)?;

        wrap_in_code_block(templates, "bash", &rendered)
    }
}

/// Builds the cURL command line reproducing `request`.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::OperationRequest;
/// use clawsnip_core::curl::curl_command;
/// use http::Method;
///
/// let request = OperationRequest::new(Method::GET, "http://example.com:8080/api/items?x=1")?
///     .with_header("Accept", "application/json");
///
/// assert_eq!(
///     curl_command(&request),
///     "curl 'http://example.com:8080/api/items?x=1' -i -H 'Accept: application/json'"
/// );
/// # Ok::<(), clawsnip_core::SnippetError>(())
/// ```
pub fn curl_command(request: &OperationRequest) -> String {
    let mut args = vec![format!("'{}{}'", authority(request), path_and_query(request))];

    args.push("-i".to_string());

    if request.method() != Method::GET {
        args.push(format!("-X {}", request.method()));
    }

    for (name, values) in request.headers() {
        for value in values {
            args.push(format!("-H '{name}: {value}'"));
        }
    }

    if request.is_multipart() {
        args.extend(request.parts().iter().map(part_argument));
    }

    args.extend(content_arguments(request));

    format!("curl {}", args.join(" "))
}

fn authority(request: &OperationRequest) -> String {
    let uri = request.uri();
    let scheme = uri.scheme();
    let host = uri.host_str().unwrap_or_default();

    let non_standard_port = match (scheme, uri.port_or_known_default()) {
        ("http", Some(port)) => port != STANDARD_PORT_HTTP,
        ("https", Some(port)) => port != STANDARD_PORT_HTTPS,
        _ => false,
    };

    match uri.port_or_known_default() {
        Some(port) if non_standard_port => format!("{scheme}://{host}:{port}"),
        _ => format!("{scheme}://{host}"),
    }
}

fn path_and_query(request: &OperationRequest) -> String {
    let context_path = request.context_path();
    let mut result = match context_path {
        "" => String::new(),
        path if path.starts_with('/') => path.to_string(),
        path => format!("/{path}"),
    };

    result.push_str(request.uri().path());
    if let Some(query) = request.uri().query() {
        result.push('?');
        result.push_str(query);
    }
    result
}

fn part_argument(part: &RequestPart) -> String {
    let value = match part.filename() {
        Some(filename) if !filename.is_empty() => format!("@{filename}"),
        _ => part.content_as_string(),
    };
    let content_type = match part.content_type() {
        Some(content_type) if !content_type.is_empty() => format!(";type={content_type}"),
        _ => String::new(),
    };
    format!("-F '{}={value}{content_type}'", part.name())
}

fn content_arguments(request: &OperationRequest) -> Vec<String> {
    if !request.content().is_empty() {
        return vec![format!("-d '{}'", request.content_as_string())];
    }

    let parameters = request
        .parameters()
        .iter()
        .flat_map(|(name, values)| values.iter().map(move |value| (name, value)));

    if request.is_multipart() {
        return parameters
            .map(|(name, value)| format!("-F '{name}={value}'"))
            .collect();
    }

    if request.method() == Method::POST || request.method() == Method::PUT {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(parameters)
            .finish();
        if !query.is_empty() {
            return vec![format!("-d '{query}'")];
        }
    }

    vec![]
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use rstest::rstest;

    use super::*;
    use crate::operation::OperationResponse;
    use crate::templates::HandlebarsTemplateEngine;

    fn request(method: Method, uri: &str) -> OperationRequest {
        OperationRequest::new(method, uri).expect("valid url")
    }

    #[test]
    fn should_omit_method_for_get_and_keep_non_standard_port() {
        let request = request(Method::GET, "http://example.com:8080/api/items?x=1")
            .with_header("Accept", "application/json");

        assert_eq!(
            curl_command(&request),
            "curl 'http://example.com:8080/api/items?x=1' -i -H 'Accept: application/json'"
        );
    }

    #[rstest]
    #[case::http_default("http://localhost:80/", "curl 'http://localhost/' -i")]
    #[case::https_default("https://localhost:443/", "curl 'https://localhost/' -i")]
    #[case::https_custom("https://localhost:8443/", "curl 'https://localhost:8443/' -i")]
    #[case::http_on_https_port("http://localhost:443/", "curl 'http://localhost:443/' -i")]
    fn should_include_port_only_when_non_standard(#[case] uri: &str, #[case] expected: &str) {
        assert_eq!(curl_command(&request(Method::GET, uri)), expected);
    }

    #[rstest]
    #[case::with_slash("/app")]
    #[case::without_slash("app")]
    fn should_prefix_context_path(#[case] context_path: &str) {
        let request = request(Method::GET, "http://localhost/items").with_context_path(context_path);

        assert_eq!(curl_command(&request), "curl 'http://localhost/app/items' -i");
    }

    #[test]
    fn should_write_method_headers_and_body() {
        let request = request(Method::POST, "http://localhost:8080/api/items")
            .with_header("Content-Type", "application/json")
            .with_header("X-Trace", "a")
            .with_header("X-Trace", "b")
            .with_content(r#"{"name":"widget"}"#);

        insta::assert_snapshot!(curl_command(&request), @r#"curl 'http://localhost:8080/api/items' -i -X POST -H 'Content-Type: application/json' -H 'X-Trace: a' -H 'X-Trace: b' -d '{"name":"widget"}'"#);
    }

    #[test]
    fn should_write_form_parameters_as_body_for_post() {
        let request = request(Method::POST, "http://localhost/login")
            .with_parameter("user", "jane doe")
            .with_parameter("scope", "read")
            .with_parameter("scope", "write");

        assert_eq!(
            curl_command(&request),
            "curl 'http://localhost/login' -i -X POST -d 'user=jane+doe&scope=read&scope=write'"
        );
    }

    #[test]
    fn should_write_form_parameters_as_body_for_put() {
        let request = request(Method::PUT, "http://localhost/items/1").with_parameter("a", "1");

        assert_eq!(
            curl_command(&request),
            "curl 'http://localhost/items/1' -i -X PUT -d 'a=1'"
        );
    }

    #[test]
    fn should_ignore_parameters_for_other_methods() {
        let request = request(Method::DELETE, "http://localhost/items/1").with_parameter("a", "1");

        assert_eq!(curl_command(&request), "curl 'http://localhost/items/1' -i -X DELETE");
    }

    #[test]
    fn should_write_multipart_parts_and_parameters() {
        let request = request(Method::POST, "http://localhost/upload")
            .with_header("Content-Type", "multipart/form-data")
            .with_part(
                RequestPart::new("image", vec![0x89, 0x50])
                    .with_filename("image.png")
                    .with_content_type("image/png"),
            )
            .with_part(RequestPart::new("note", "hello"))
            .with_parameter("album", "holidays");

        insta::assert_snapshot!(curl_command(&request), @"curl 'http://localhost/upload' -i -X POST -H 'Content-Type: multipart/form-data' -F 'image=@image.png;type=image/png' -F 'note=hello' -F 'album=holidays'");
    }

    #[test]
    fn should_render_snippet_in_bash_code_block() -> anyhow::Result<()> {
        let operation = Operation::new(
            request(Method::GET, "http://localhost:8080/api/items?x=1")
                .with_header("Accept", "application/json"),
            OperationResponse::new(StatusCode::OK),
        );

        let rendered = CurlRequestSnippet.render(&operation, &HandlebarsTemplateEngine::default())?;

        insta::assert_snapshot!(rendered, @r"
        [source,bash]
        ----
        $ curl 'http://localhost:8080/api/items?x=1' -i -H 'Accept: application/json'
        ----
        ");
        Ok(())
    }
}
