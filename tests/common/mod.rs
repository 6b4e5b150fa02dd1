// Shared helpers for pipeweave integration tests
#![allow(dead_code)]

use pipeweave::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write each `(relative path, content)` pair below `root`, returning the
/// written paths in order.
pub fn write_templates(root: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, content)| {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

/// A temporary directory populated with template files.
pub fn template_dir(files: &[(&str, &str)]) -> (TempDir, Vec<PathBuf>) {
    let temp = TempDir::new().unwrap();
    let paths = write_templates(temp.path(), files);
    (temp, paths)
}

pub fn doc(text: &str) -> Document {
    Document::parse(text).unwrap()
}
