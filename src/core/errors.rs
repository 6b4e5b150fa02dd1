//! Shared error types for pipeline composition

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Template rendering failures. All of them abort the enclosing expansion.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A template file could not be read
    #[error("failed to read template {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An auxiliary template failed to compile
    #[error("failed to parse auxiliary template {}: {source}", .path.display())]
    Auxiliary {
        path: PathBuf,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Syntax error, undefined field, failing helper or failing include
    #[error("failed to render template {name}: {source}")]
    Template {
        name: String,
        text: String,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The parameter map could not be exposed to the template engine
    #[error("failed to bind parameters for template {name}: {source}")]
    Parameters {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RenderError {
    /// Name (or path) of the template that failed.
    pub fn template_name(&self) -> String {
        match self {
            Self::Read { path, .. } | Self::Auxiliary { path, .. } => path.display().to_string(),
            Self::Template { name, .. } | Self::Parameters { name, .. } => name.clone(),
        }
    }
}

/// Rendered text that is not a well-formed pipeline document.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// The offending rendered text
    pub text: String,
    #[source]
    pub source: Option<serde_yaml::Error>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            text: text.into(),
            source: None,
        }
    }

    pub fn from_yaml(error: serde_yaml::Error, text: impl Into<String>) -> Self {
        Self {
            message: format!("malformed pipeline document: {}", error),
            text: text.into(),
            source: Some(error),
        }
    }
}

/// Which keyed sections clashed during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictSection {
    Resources,
    ResourceTypes,
    Both,
}

impl fmt::Display for ConflictSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resources => write!(f, "resources"),
            Self::ResourceTypes => write!(f, "resource_types"),
            Self::Both => write!(f, "resource_types and resources"),
        }
    }
}

/// Two records share a `name` but differ in content.
///
/// Each field holds the first conflicting name found in that section, so the
/// section(s) involved are always recoverable through [`MergeConflict::section`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub resources: Option<String>,
    pub resource_types: Option<String>,
}

impl MergeConflict {
    pub fn section(&self) -> ConflictSection {
        match (&self.resources, &self.resource_types) {
            (Some(_), Some(_)) => ConflictSection::Both,
            (None, Some(_)) => ConflictSection::ResourceTypes,
            _ => ConflictSection::Resources,
        }
    }
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} merge error; two or more items named the same are not identical",
            self.section()
        )
    }
}

impl std::error::Error for MergeConflict {}

/// Errors surfaced by a full expansion run
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("parse error in output of template {template}: {source}")]
    Parse {
        template: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot merge template {template} (generation {generation}): {source}")]
    Merge {
        template: String,
        generation: usize,
        #[source]
        source: MergeConflict,
    },

    #[error(
        "expansion did not settle after {limit} generations; still pending: {}",
        .pending.join(", ")
    )]
    GenerationLimit { limit: usize, pending: Vec<String> },

    #[error("failed to serialize pipeline: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Result type alias using the expansion error type
pub type Result<T> = std::result::Result<T, ExpandError>;
