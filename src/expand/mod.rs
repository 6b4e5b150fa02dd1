//! Recursive expansion of `merge` directives.
//!
//! One generation folds every directive present at its start, in order, into
//! a single running accumulator. Directives declared by the folded fragments
//! form the next generation. Expansion settles when a generation produces no
//! new directives, or fails once `max_generations` is reached, which is what
//! stops self-referencing templates from recursing forever.

pub mod observer;

use std::path::{Path, PathBuf};

use serde_yaml::Mapping;

use crate::core::{Document, ExpandError, MergeDirective, RenderError, Result};
use crate::io::{FileSystemSource, TemplateSource};
use crate::merge::merge;
use crate::render::Renderer;

pub use observer::{ExpansionObserver, NoopObserver, TracingObserver};

pub const DEFAULT_MAX_GENERATIONS: usize = 64;

/// Diagnostic name of the entry document.
pub const ENTRY_TEMPLATE: &str = "pipeline";

static NOOP: NoopObserver = NoopObserver;

pub struct Expander<'a> {
    source: &'a dyn TemplateSource,
    strict: bool,
    max_generations: usize,
    observer: &'a dyn ExpansionObserver,
}

impl<'a> Expander<'a> {
    pub fn new(source: &'a dyn TemplateSource) -> Self {
        Self {
            source,
            strict: true,
            max_generations: DEFAULT_MAX_GENERATIONS,
            observer: &NOOP,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn ExpansionObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Render the entry text, expand every directive, and serialize the result.
    pub fn expand(
        &self,
        entry_text: &str,
        params: Option<&Mapping>,
        templates: Vec<PathBuf>,
    ) -> Result<String> {
        let entry = self.load(entry_text, params, templates)?;
        let document = self.transform(entry)?;
        Ok(document.to_yaml()?)
    }

    /// Render the entry text as a template and parse it.
    pub fn load(
        &self,
        entry_text: &str,
        params: Option<&Mapping>,
        templates: Vec<PathBuf>,
    ) -> Result<Document> {
        let empty = Mapping::new();
        let rendered = self.renderer().render(
            ENTRY_TEMPLATE,
            entry_text,
            params.unwrap_or(&empty),
            &templates,
        )?;

        let document = Document::parse(&rendered).map_err(|source| ExpandError::Parse {
            template: ENTRY_TEMPLATE.to_string(),
            source,
        })?;

        Ok(document.with_templates(templates))
    }

    /// Fold directives generation by generation until none remain.
    pub fn transform(&self, entry: Document) -> Result<Document> {
        let mut accumulator = entry;
        let mut generation = 0;

        while !accumulator.merge.is_empty() {
            if generation >= self.max_generations {
                return Err(ExpandError::GenerationLimit {
                    limit: self.max_generations,
                    pending: accumulator
                        .merge
                        .iter()
                        .map(|directive| directive.template.clone())
                        .collect(),
                });
            }
            generation += 1;

            let directives = std::mem::take(&mut accumulator.merge);
            self.observer.generation_started(generation, directives.len());

            for directive in &directives {
                accumulator = self.fold(accumulator, directive, generation)?;
            }
        }

        self.observer.finished(generation, &accumulator);
        Ok(accumulator)
    }

    /// Render one directive's template and merge the fragment in.
    fn fold(
        &self,
        accumulator: Document,
        directive: &MergeDirective,
        generation: usize,
    ) -> Result<Document> {
        let path = resolve_template(&directive.template, &accumulator.templates);
        self.observer.template_resolved(&directive.template, &path);

        let text = self
            .source
            .read_to_string(&path)
            .map_err(|source| RenderError::Read {
                path: path.clone(),
                source,
            })?;

        let rendered = self.renderer().render(
            &directive.template,
            &text,
            &directive.args,
            &accumulator.templates,
        )?;

        let fragment = Document::parse(&rendered).map_err(|source| ExpandError::Parse {
            template: directive.template.clone(),
            source,
        })?;
        self.observer
            .fragment_rendered(generation, &directive.template, &fragment);

        let merged = merge(accumulator, fragment).map_err(|source| {
            self.observer
                .merge_failed(generation, &directive.template, &source);
            ExpandError::Merge {
                template: directive.template.clone(),
                generation,
                source,
            }
        })?;

        Ok(merged)
    }

    fn renderer(&self) -> Renderer<'a> {
        Renderer::new(self.source).strict(self.strict)
    }
}

/// First template path whose full path or file name equals `template`,
/// otherwise `template` itself as a path.
pub fn resolve_template(template: &str, templates: &[PathBuf]) -> PathBuf {
    templates
        .iter()
        .find(|path| matches_template(path, template))
        .cloned()
        .unwrap_or_else(|| PathBuf::from(template))
}

fn matches_template(path: &Path, template: &str) -> bool {
    path.to_string_lossy() == template
        || path
            .file_name()
            .map(|name| name.to_string_lossy() == template)
            .unwrap_or(false)
}

/// Expand an entry document against the file system with default settings.
pub fn expand(
    entry_text: &str,
    initial_params: Option<&Mapping>,
    templates: &[PathBuf],
) -> Result<String> {
    let source = FileSystemSource::new();
    Expander::new(&source).expand(entry_text, initial_params, templates.to_vec())
}
