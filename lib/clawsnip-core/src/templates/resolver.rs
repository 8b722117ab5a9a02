use std::borrow::Cow;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::SnippetError;

/// Finds the source of a named template.
pub trait TemplateResourceResolver: Debug + Send + Sync {
    /// Returns the template source for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SnippetError::TemplateResolution`] if no such template exists.
    fn resolve(&self, name: &str) -> Result<Cow<'static, str>, SnippetError>;
}

fn builtin(name: &str) -> Option<&'static str> {
    let source = match name {
        "default-curl-request" => include_str!("../../templates/default-curl-request.snippet"),
        "default-code-block" => include_str!("../../templates/default-code-block.snippet"),
        "default-fields" => include_str!("../../templates/default-fields.snippet"),
        "default-links" => include_str!("../../templates/default-links.snippet"),
        _ => return None,
    };
    Some(source)
}

/// Resolves `<name>.snippet` then `default-<name>.snippet` in an optional templates
/// directory, falling back to the templates shipped with the crate.
#[derive(Debug, Clone, Default)]
pub struct StandardTemplateResourceResolver {
    templates_dir: Option<PathBuf>,
}

impl StandardTemplateResourceResolver {
    /// Resolver that looks into `templates_dir` before the built-in templates.
    pub fn with_directory(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: Some(templates_dir.into()),
        }
    }

    fn read_override(dir: &Path, name: &str) -> Result<Option<String>, SnippetError> {
        for candidate in [format!("{name}.snippet"), format!("default-{name}.snippet")] {
            let path = dir.join(candidate);
            if path.is_file() {
                debug!(path = %path.display(), "using template override");
                return Ok(Some(std::fs::read_to_string(path)?));
            }
        }
        Ok(None)
    }
}

impl TemplateResourceResolver for StandardTemplateResourceResolver {
    fn resolve(&self, name: &str) -> Result<Cow<'static, str>, SnippetError> {
        if let Some(dir) = &self.templates_dir
            && let Some(source) = Self::read_override(dir, name)?
        {
            return Ok(Cow::Owned(source));
        }

        builtin(&format!("default-{name}"))
            .map(Cow::Borrowed)
            .ok_or_else(|| SnippetError::TemplateResolution {
                name: name.to_string(),
            })
    }
}
