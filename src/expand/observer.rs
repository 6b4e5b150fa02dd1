//! Expansion progress reporting.
//!
//! The expander reports through an injected [`ExpansionObserver`] instead of
//! logging on its own. The default is [`NoopObserver`]; the binary installs
//! [`TracingObserver`].

use std::path::Path;

use crate::core::{Document, MergeConflict};

pub trait ExpansionObserver {
    /// A generation begins with `pending` directives to fold.
    fn generation_started(&self, _generation: usize, _pending: usize) {}

    /// A directive's template name was resolved to a readable path.
    fn template_resolved(&self, _template: &str, _path: &Path) {}

    /// A fragment was rendered and parsed, and is about to be merged.
    fn fragment_rendered(&self, _generation: usize, _template: &str, _fragment: &Document) {}

    /// A fragment could not be merged.
    fn merge_failed(&self, _generation: usize, _template: &str, _conflict: &MergeConflict) {}

    /// Expansion settled after `generations` passes.
    fn finished(&self, _generations: usize, _document: &Document) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExpansionObserver for NoopObserver {}

/// Forwards expansion events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExpansionObserver for TracingObserver {
    fn generation_started(&self, generation: usize, pending: usize) {
        tracing::info!(generation, pending, "expanding merge directives");
    }

    fn template_resolved(&self, template: &str, path: &Path) {
        tracing::debug!(template, path = %path.display(), "resolved template");
    }

    fn fragment_rendered(&self, generation: usize, template: &str, fragment: &Document) {
        tracing::debug!(
            generation,
            template,
            groups = fragment.groups.len(),
            resources = fragment.resources.len(),
            resource_types = fragment.resource_types.len(),
            jobs = fragment.jobs.len(),
            merges = fragment.merge.len(),
            "rendered fragment"
        );
    }

    fn merge_failed(&self, generation: usize, template: &str, conflict: &MergeConflict) {
        tracing::error!(
            generation,
            template,
            section = %conflict.section(),
            resource = conflict.resources.as_deref(),
            resource_type = conflict.resource_types.as_deref(),
            "unable to merge fragment"
        );
    }

    fn finished(&self, generations: usize, document: &Document) {
        tracing::info!(
            generations,
            groups = document.groups.len(),
            resources = document.resources.len(),
            resource_types = document.resource_types.len(),
            jobs = document.jobs.len(),
            "pipeline expanded"
        );
    }
}
