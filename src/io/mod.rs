pub mod destinations;
pub mod real;
pub mod traits;
pub mod walker;

// Re-export I/O types for convenient access
pub use destinations::{
    destination_for, FileDestination, MemoryDestination, OutputDestination, StdoutDestination,
};
pub use real::{FileSystemSource, MemorySource};
pub use traits::TemplateSource;
pub use walker::{find_templates, TemplateWalker};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Error reading file {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Error writing file {}", path.display()))
}
