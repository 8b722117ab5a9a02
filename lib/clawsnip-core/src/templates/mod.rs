//! Snippet templates: lookup, compilation, and rendering.
//!
//! Snippets never format their output directly. They build a context and hand it to a
//! [`TemplateEngine`], which compiles the named template and renders it. The default engine
//! is [`HandlebarsTemplateEngine`] backed by a [`StandardTemplateResourceResolver`], which
//! lets projects override any built-in template by dropping a `<name>.snippet` file into a
//! templates directory.

mod engine;
mod resolver;

use std::fmt::Debug;

use serde_json::{Map, Value};

use crate::SnippetError;

pub use self::engine::HandlebarsTemplateEngine;
pub use self::resolver::{StandardTemplateResourceResolver, TemplateResourceResolver};

/// The key/value context a template is rendered with.
pub type TemplateContext = Map<String, Value>;

/// A compiled template, ready to render.
pub trait Template: Send + Sync {
    /// Renders the template with `context`.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::TemplateRender`] when rendering fails.
    fn render(&self, context: &TemplateContext) -> Result<String, SnippetError>;
}

/// Compiles named templates.
///
/// Implementations are shared by every documentation pass and must be usable concurrently.
pub trait TemplateEngine: Debug + Send + Sync {
    /// Compiles the template named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::TemplateResolution`] when no template has that name, or
    /// [`SnippetError::TemplateCompilation`] when its source is invalid.
    fn compile(&self, name: &str) -> Result<Box<dyn Template>, SnippetError>;
}

/// Wraps an already rendered fragment in the `code-block` template.
///
/// # Errors
///
/// Propagates template resolution and rendering errors.
pub fn wrap_in_code_block(
    engine: &dyn TemplateEngine,
    language: &str,
    code: &str,
) -> Result<String, SnippetError> {
    let mut context = TemplateContext::new();
    context.insert("language".to_string(), Value::from(language));
    context.insert("code".to_string(), Value::from(code));
    engine.compile("code-block")?.render(&context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_fragment_in_default_code_block() {
        let engine = HandlebarsTemplateEngine::default();

        let block = wrap_in_code_block(&engine, "bash", "$ echo 'hi' && exit")
            .expect("should render");

        insta::assert_snapshot!(block, @r"
        [source,bash]
        ----
        $ echo 'hi' && exit
        ----
        ");
    }
}
