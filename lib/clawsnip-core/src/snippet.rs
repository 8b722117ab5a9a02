//! Snippets and the sinks they are written to.

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Mutex;

use indexmap::IndexMap;
use tracing::debug;

use crate::SnippetError;
use crate::operation::Operation;
use crate::templates::TemplateEngine;

/// Produces one documentation fragment from a captured operation.
pub trait Snippet: Debug + Send + Sync {
    /// The snippet name, used as the output file name (e.g. `curl-request`).
    fn name(&self) -> &str;

    /// Validates the operation against the snippet configuration and renders the fragment.
    ///
    /// # Errors
    ///
    /// Fails on validation discrepancies, unparsable payloads, or template problems.
    fn render(
        &self,
        operation: &Operation,
        templates: &dyn TemplateEngine,
    ) -> Result<String, SnippetError>;
}

/// Stores rendered snippets at a named output location.
pub trait SnippetWriter: Debug + Send + Sync {
    /// Writes `content` for `snippet` of the operation named `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::Io`] when the content cannot be stored.
    fn write(&self, operation: &str, snippet: &str, content: &str) -> Result<(), SnippetError>;
}

/// Writes each snippet to `<output_dir>/<operation>/<snippet>.<extension>`.
#[derive(Debug, Clone)]
pub struct FileSnippetWriter {
    output_dir: PathBuf,
    extension: String,
}

impl FileSnippetWriter {
    /// Creates a writer rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: extension.into(),
        }
    }

    /// The file a snippet ends up in.
    pub fn snippet_path(&self, operation: &str, snippet: &str) -> PathBuf {
        self.output_dir
            .join(operation)
            .join(format!("{snippet}.{}", self.extension))
    }
}

impl SnippetWriter for FileSnippetWriter {
    fn write(&self, operation: &str, snippet: &str, content: &str) -> Result<(), SnippetError> {
        let path = self.snippet_path(operation, snippet);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut content = content.to_string();
        if !content.ends_with('\n') {
            content.push('\n');
        }
        std::fs::write(&path, content)?;

        debug!(path = %path.display(), "snippet written");
        Ok(())
    }
}

/// Keeps snippets in memory, keyed by `<operation>/<snippet>`.
#[derive(Debug, Default)]
pub struct MemorySnippetWriter {
    snippets: Mutex<IndexMap<String, String>>,
}

impl MemorySnippetWriter {
    /// Returns the content stored for a snippet, if any.
    pub fn get(&self, operation: &str, snippet: &str) -> Option<String> {
        let snippets = self.snippets.lock().unwrap_or_else(|err| err.into_inner());
        snippets.get(&format!("{operation}/{snippet}")).cloned()
    }

    /// Returns the keys of every stored snippet, in write order.
    pub fn keys(&self) -> Vec<String> {
        let snippets = self.snippets.lock().unwrap_or_else(|err| err.into_inner());
        snippets.keys().cloned().collect()
    }
}

impl SnippetWriter for MemorySnippetWriter {
    fn write(&self, operation: &str, snippet: &str, content: &str) -> Result<(), SnippetError> {
        let mut snippets = self.snippets.lock().unwrap_or_else(|err| err.into_inner());
        snippets.insert(format!("{operation}/{snippet}"), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_write_snippet_file_with_trailing_newline() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let writer = FileSnippetWriter::new(dir.path(), "adoc");

        writer.write("get-items", "curl-request", "$ curl")?;

        let written = std::fs::read_to_string(dir.path().join("get-items/curl-request.adoc"))?;
        assert_eq!(written, "$ curl\n");
        Ok(())
    }

    #[test]
    fn should_overwrite_existing_snippet() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let writer = FileSnippetWriter::new(dir.path(), "md");

        writer.write("op", "links", "first\n")?;
        writer.write("op", "links", "second\n")?;

        let written = std::fs::read_to_string(writer.snippet_path("op", "links"))?;
        assert_eq!(written, "second\n");
        Ok(())
    }

    #[test]
    fn should_keep_snippets_in_memory() -> anyhow::Result<()> {
        let writer = MemorySnippetWriter::default();

        writer.write("op", "links", "links")?;
        writer.write("op", "curl-request", "curl")?;

        assert_eq!(writer.keys(), ["op/links", "op/curl-request"]);
        assert_eq!(writer.get("op", "curl-request").as_deref(), Some("curl"));
        assert_eq!(writer.get("other", "links"), None);
        Ok(())
    }
}
