use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects the auxiliary template set: explicitly named files first, then
/// every file found below the template directories.
pub struct TemplateWalker {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl TemplateWalker {
    pub fn new() -> Self {
        Self {
            files: vec![],
            dirs: vec![],
        }
    }

    pub fn with_files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = files;
        self
    }

    pub fn with_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.dirs = dirs;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut templates = self.files.clone();

        for dir in &self.dirs {
            templates.extend(self.walk_dir(dir)?);
        }

        Ok(templates)
    }

    fn walk_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.with_context(|| {
                format!("recursing directory tree rooted at {}", dir.display())
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }
}

impl Default for TemplateWalker {
    fn default() -> Self {
        Self::new()
    }
}

pub fn find_templates(files: Vec<PathBuf>, dirs: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    TemplateWalker::new().with_files(files).with_dirs(dirs).walk()
}
