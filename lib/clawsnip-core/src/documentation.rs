use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info_span};

use crate::SnippetError;
use crate::operation::Operation;
use crate::snippet::{FileSnippetWriter, Snippet, SnippetWriter};
use crate::templates::{
    HandlebarsTemplateEngine, StandardTemplateResourceResolver, TemplateEngine,
};

const DEFAULT_OUTPUT_DIRECTORY: &str = "target/generated-snippets";
const DEFAULT_FILE_EXTENSION: &str = "adoc";

/// Renders snippets for documented operations and writes them out.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::{CurlRequestSnippet, Operation, OperationRequest, OperationResponse};
/// use clawsnip_core::RestDocumentation;
/// use http::{Method, StatusCode};
///
/// # fn example() -> Result<(), clawsnip_core::SnippetError> {
/// let documentation = RestDocumentation::builder()
///     .with_output_directory("target/generated-snippets")
///     .build();
///
/// let operation = Operation::new(
///     OperationRequest::new(Method::GET, "http://localhost:8080/items")?,
///     OperationResponse::new(StatusCode::OK),
/// );
/// documentation.document("list-items", &operation, &[&CurlRequestSnippet])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RestDocumentation {
    templates: Arc<dyn TemplateEngine>,
    writer: Arc<dyn SnippetWriter>,
}

impl RestDocumentation {
    /// Creates a builder with the default configuration.
    pub fn builder() -> RestDocumentationBuilder {
        RestDocumentationBuilder::default()
    }

    /// Renders every snippet for `operation` and writes each one under `name`.
    ///
    /// Snippets are processed in order and the first failure stops the documentation of
    /// the operation.
    ///
    /// # Errors
    ///
    /// Propagates validation, payload, template, and writer errors.
    pub fn document(
        &self,
        name: &str,
        operation: &Operation,
        snippets: &[&dyn Snippet],
    ) -> Result<(), SnippetError> {
        let span = info_span!("document", operation = %name);
        let _guard = span.enter();

        for snippet in snippets {
            let content = snippet.render(operation, self.templates.as_ref())?;
            self.writer.write(name, snippet.name(), &content)?;
            debug!(snippet = snippet.name(), "snippet documented");
        }
        Ok(())
    }
}

impl Default for RestDocumentation {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configures a [`RestDocumentation`].
///
/// # Default Configuration
///
/// - **Output directory**: `target/generated-snippets`
/// - **Templates directory**: none, only built-in templates are used
/// - **File extension**: `adoc`
///
/// A custom template engine or writer replaces the corresponding settings above.
#[derive(Debug, Clone)]
pub struct RestDocumentationBuilder {
    output_dir: PathBuf,
    templates_dir: Option<PathBuf>,
    extension: String,
    templates: Option<Arc<dyn TemplateEngine>>,
    writer: Option<Arc<dyn SnippetWriter>>,
}

impl Default for RestDocumentationBuilder {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            templates_dir: None,
            extension: DEFAULT_FILE_EXTENSION.to_string(),
            templates: None,
            writer: None,
        }
    }
}

impl RestDocumentationBuilder {
    /// Sets the directory snippets are written to.
    pub fn with_output_directory(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets a directory holding `<name>.snippet` template overrides.
    pub fn with_templates_directory(mut self, templates_dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = Some(templates_dir.into());
        self
    }

    /// Sets the extension of the written snippet files.
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Uses a custom template engine.
    pub fn with_template_engine(mut self, templates: impl TemplateEngine + 'static) -> Self {
        self.templates = Some(Arc::new(templates));
        self
    }

    /// Uses a custom snippet writer.
    pub fn with_writer(mut self, writer: Arc<dyn SnippetWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Builds the [`RestDocumentation`].
    pub fn build(self) -> RestDocumentation {
        let Self {
            output_dir,
            templates_dir,
            extension,
            templates,
            writer,
        } = self;

        let templates = templates.unwrap_or_else(|| {
            let resolver = match templates_dir {
                Some(dir) => StandardTemplateResourceResolver::with_directory(dir),
                None => StandardTemplateResourceResolver::default(),
            };
            Arc::new(HandlebarsTemplateEngine::new(resolver))
        });
        let writer =
            writer.unwrap_or_else(|| Arc::new(FileSnippetWriter::new(output_dir, extension)));

        RestDocumentation { templates, writer }
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use super::*;
    use crate::curl::CurlRequestSnippet;
    use crate::operation::{OperationRequest, OperationResponse};
    use crate::payload::{FieldDescriptor, FieldsSnippet};
    use crate::snippet::MemorySnippetWriter;

    fn operation() -> anyhow::Result<Operation> {
        let request = OperationRequest::new(Method::GET, "http://localhost:8080/items/1")?;
        let response = OperationResponse::new(StatusCode::OK)
            .with_header("Content-Type", "application/json")
            .with_content(r#"{"id": 1, "name": "widget"}"#);
        Ok(Operation::new(request, response))
    }

    #[test]
    fn should_write_snippets_to_output_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let documentation = RestDocumentation::builder()
            .with_output_directory(dir.path())
            .with_file_extension("md")
            .build();

        documentation.document("get-item", &operation()?, &[&CurlRequestSnippet])?;

        let written = std::fs::read_to_string(dir.path().join("get-item/curl-request.md"))?;
        insta::assert_snapshot!(written.trim_end(), @r"
        [source,bash]
        ----
        $ curl 'http://localhost:8080/items/1' -i
        ----
        ");
        Ok(())
    }

    #[test]
    fn should_use_template_overrides() -> anyhow::Result<()> {
        let templates = tempfile::tempdir()?;
        std::fs::write(
            templates.path().join("code-block.snippet"),
            "```{{language}}\n{{code}}\n```",
        )?;
        let writer = Arc::new(MemorySnippetWriter::default());
        let documentation = RestDocumentation::builder()
            .with_templates_directory(templates.path())
            .with_writer(writer.clone())
            .build();

        documentation.document("get-item", &operation()?, &[&CurlRequestSnippet])?;

        let written = writer.get("get-item", "curl-request").unwrap_or_default();
        insta::assert_snapshot!(written.trim_end(), @r"
        ```bash
        $ curl 'http://localhost:8080/items/1' -i
        ```
        ");
        Ok(())
    }

    #[test]
    fn should_stop_at_first_failing_snippet() -> anyhow::Result<()> {
        let writer = Arc::new(MemorySnippetWriter::default());
        let documentation = RestDocumentation::builder()
            .with_writer(writer.clone())
            .build();
        let fields = FieldsSnippet::response([FieldDescriptor::new("id", "The identifier")])?;

        let result =
            documentation.document("get-item", &operation()?, &[&CurlRequestSnippet, &fields]);

        assert!(matches!(result, Err(SnippetError::Validation(_))));
        assert_eq!(writer.keys(), ["get-item/curl-request"]);
        Ok(())
    }
}
