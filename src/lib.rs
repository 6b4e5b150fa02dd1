//! Compose CI pipeline definitions from parameterized YAML templates.
//!
//! An entry document lists `merge` directives naming templates. Each template
//! is rendered with its arguments, parsed, and folded into the running
//! document; directives it declares are expanded in turn.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod expand;
pub mod io;
pub mod merge;
pub mod render;

// Re-export commonly used types
pub use crate::core::{
    ConflictSection, Document, ExpandError, Group, MergeConflict, MergeDirective, NamedRecord,
    ParseError, RenderError,
};

pub use crate::expand::{expand, Expander, ExpansionObserver, DEFAULT_MAX_GENERATIONS};
pub use crate::merge::merge;
pub use crate::render::{render, Renderer};
