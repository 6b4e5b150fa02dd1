//! Template rendering.
//!
//! A fresh handlebars registry is built for every render call: the
//! auxiliary templates are read and compiled, the helper set is registered,
//! and the primary template text is rendered against the parameter map.
//! Output is never HTML-escaped since it is YAML.

pub mod helpers;

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde_yaml::Mapping;

use crate::core::RenderError;
use crate::io::TemplateSource;

/// Renders template text with a parameter map and an auxiliary template set.
pub struct Renderer<'a> {
    source: &'a dyn TemplateSource,
    strict: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(source: &'a dyn TemplateSource) -> Self {
        Self {
            source,
            strict: true,
        }
    }

    /// In strict mode, referencing an undefined field fails the render.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Render `text` (identified as `name` in diagnostics).
    pub fn render(
        &self,
        name: &str,
        text: &str,
        params: &Mapping,
        templates: &[PathBuf],
    ) -> Result<String, RenderError> {
        let registry = self.registry(templates)?;

        let data = serde_json::to_value(params).map_err(|source| RenderError::Parameters {
            name: name.to_string(),
            source,
        })?;

        registry
            .render_template(text, &data)
            .map_err(|source| RenderError::Template {
                name: name.to_string(),
                text: text.to_string(),
                source: Box::new(source),
            })
    }

    fn registry(&self, templates: &[PathBuf]) -> Result<Handlebars<'static>, RenderError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(self.strict);
        registry.register_escape_fn(handlebars::no_escape);
        helpers::register_all(&mut registry);

        for path in templates {
            let content = self
                .source
                .read_to_string(path)
                .map_err(|source| RenderError::Read {
                    path: path.clone(),
                    source,
                })?;

            for name in template_names(path) {
                if registry.has_template(&name) {
                    continue;
                }
                registry
                    .register_template_string(&name, &content)
                    .map_err(|source| RenderError::Auxiliary {
                        path: path.clone(),
                        source: Box::new(source),
                    })?;
            }
        }

        Ok(registry)
    }
}

/// Names an auxiliary template answers to: its full path and its file name.
pub fn template_names(path: &Path) -> Vec<String> {
    let full = path.to_string_lossy().into_owned();
    match path.file_name().map(|n| n.to_string_lossy().into_owned()) {
        Some(file_name) if file_name != full => vec![full, file_name],
        _ => vec![full],
    }
}

/// Render with the default (strict) settings.
pub fn render(
    params: &Mapping,
    text: &str,
    templates: &[PathBuf],
    source: &dyn TemplateSource,
) -> Result<String, RenderError> {
    Renderer::new(source).render("pipeline", text, params, templates)
}
