use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

use crate::config::LoadedConfig;
use crate::expand::{Expander, TracingObserver, DEFAULT_MAX_GENERATIONS};
use crate::io::{self, destination_for, find_templates, FileSystemSource, OutputDestination};

/// Everything the merge command needs, with CLI values already applied.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub pipeline: PathBuf,
    pub directories: Vec<PathBuf>,
    pub templates: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub args: Vec<(String, String)>,
    pub max_generations: Option<usize>,
    pub no_strict: bool,
}

/// Settings resolved from CLI flags over config file values over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub params: Mapping,
    pub templates: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
    pub max_generations: usize,
    pub strict: bool,
}

pub fn resolve_settings(config: &MergeConfig, loaded: &LoadedConfig) -> ResolvedSettings {
    let mut params = loaded.config.args_mapping();
    for (key, value) in &config.args {
        params.insert(Value::from(key.as_str()), parse_arg_value(value));
    }

    let mut directories = config.directories.clone();
    if let Some(base) = &loaded.base_dir {
        directories.extend(loaded.config.template_dirs_from(base));
    }

    ResolvedSettings {
        params,
        templates: config.templates.clone(),
        directories,
        max_generations: config
            .max_generations
            .or(loaded.config.max_generations)
            .unwrap_or(DEFAULT_MAX_GENERATIONS),
        strict: !config.no_strict && loaded.config.strict.unwrap_or(true),
    }
}

/// `--arg` values are YAML scalars (`3`, `true`, `[a, b]`), falling back to
/// the raw string.
pub fn parse_arg_value(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(Value::Null) if !matches!(raw.trim(), "~" | "null" | "Null" | "NULL") => {
            Value::from(raw)
        }
        Ok(value) => value,
        Err(_) => Value::from(raw),
    }
}

/// Compose the pipeline and return the rendered output text.
pub fn compose(config: &MergeConfig, loaded: &LoadedConfig) -> Result<String> {
    let settings = resolve_settings(config, loaded);

    let pipeline = io::read_file(&config.pipeline).context("Error reading pipeline file")?;
    let templates = find_templates(settings.templates.clone(), settings.directories.clone())
        .context("combining template files and template directories")?;
    tracing::debug!(count = templates.len(), "collected auxiliary templates");

    let source = FileSystemSource::new();
    let observer = TracingObserver;
    let params = (!settings.params.is_empty()).then_some(&settings.params);

    Expander::new(&source)
        .strict(settings.strict)
        .max_generations(settings.max_generations)
        .with_observer(&observer)
        .expand(&pipeline, params, templates)
        .context("Error creating new pipeline")
}

/// Compose the pipeline and write it to `destination`.
pub fn write_pipeline(
    config: &MergeConfig,
    loaded: &LoadedConfig,
    destination: &dyn OutputDestination,
) -> Result<()> {
    let output = compose(config, loaded)?;
    destination
        .write_str(&output)
        .context("Error writing output")?;
    tracing::info!(destination = %destination.description(), "pipeline written");
    Ok(())
}

pub fn handle_merge(config: MergeConfig, loaded: LoadedConfig) -> Result<()> {
    let destination = destination_for(config.output.as_ref());
    write_pipeline(&config, &loaded, destination.as_ref())
}
