use handlebars::Handlebars;
use tracing::trace;

use super::{
    StandardTemplateResourceResolver, Template, TemplateContext, TemplateEngine,
    TemplateResourceResolver,
};
use crate::SnippetError;

/// A [`TemplateEngine`] rendering Handlebars templates, without HTML escaping.
///
/// Every compiled template is rendered with the engine's default context merged under the
/// snippet context, so snippet keys win on conflict.
///
/// # Example
///
/// ```rust
/// use clawsnip_core::templates::{HandlebarsTemplateEngine, TemplateContext, TemplateEngine};
///
/// let engine = HandlebarsTemplateEngine::default();
/// let mut context = TemplateContext::new();
/// context.insert("command".to_string(), "curl 'http://localhost/' -i".into());
///
/// let rendered = engine.compile("curl-request")?.render(&context)?;
/// assert_eq!(rendered, "$ curl 'http://localhost/' -i");
/// # Ok::<(), clawsnip_core::SnippetError>(())
/// ```
#[derive(Debug)]
pub struct HandlebarsTemplateEngine {
    resolver: Box<dyn TemplateResourceResolver>,
    default_context: TemplateContext,
}

impl Default for HandlebarsTemplateEngine {
    fn default() -> Self {
        Self::new(StandardTemplateResourceResolver::default())
    }
}

impl HandlebarsTemplateEngine {
    /// Creates an engine reading template sources from `resolver`.
    pub fn new(resolver: impl TemplateResourceResolver + 'static) -> Self {
        Self {
            resolver: Box::new(resolver),
            default_context: TemplateContext::new(),
        }
    }

    /// Adds a value available to every template.
    pub fn with_default(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.default_context.insert(key.into(), value.into());
        self
    }
}

impl TemplateEngine for HandlebarsTemplateEngine {
    fn compile(&self, name: &str) -> Result<Box<dyn Template>, SnippetError> {
        let source = self.resolver.resolve(name)?;

        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(name, source.as_ref())
            .map_err(|err| SnippetError::TemplateCompilation {
                name: name.to_string(),
                message: err.to_string(),
            })?;
        trace!(%name, "template compiled");

        Ok(Box::new(HandlebarsTemplate {
            name: name.to_string(),
            registry,
            default_context: self.default_context.clone(),
        }))
    }
}

struct HandlebarsTemplate {
    name: String,
    registry: Handlebars<'static>,
    default_context: TemplateContext,
}

impl Template for HandlebarsTemplate {
    fn render(&self, context: &TemplateContext) -> Result<String, SnippetError> {
        let mut merged = self.default_context.clone();
        merged.extend(context.iter().map(|(key, value)| (key.clone(), value.clone())));

        self.registry
            .render(&self.name, &merged)
            .map_err(|err| SnippetError::TemplateRender {
                name: self.name.clone(),
                message: err.to_string(),
            })
    }
}
