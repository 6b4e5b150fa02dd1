//! Output destinations for the composed pipeline.
//!
//! `-` (or no output path at all) means stdout; anything else is a file.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

pub trait OutputDestination: Send + Sync {
    fn write_str(&self, content: &str) -> Result<()>;

    fn description(&self) -> String;
}

/// Pick the destination for an optional `--output` argument.
pub fn destination_for(output: Option<&PathBuf>) -> Box<dyn OutputDestination> {
    match output {
        Some(path) if path.as_os_str() != "-" => Box::new(FileDestination::new(path.clone())),
        _ => Box::new(StdoutDestination::new()),
    }
}

#[derive(Debug, Clone)]
pub struct FileDestination {
    path: PathBuf,
}

impl FileDestination {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OutputDestination for FileDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write to file {}", self.path.display()))
    }

    fn description(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    buffer: Arc<RwLock<String>>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_content(&self) -> String {
        self.buffer
            .read()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }
}

impl OutputDestination for MemoryDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        self.buffer
            .write()
            .map_err(|_| anyhow::anyhow!("memory destination lock poisoned"))?
            .push_str(content);
        Ok(())
    }

    fn description(&self) -> String {
        "memory".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDestination;

impl StdoutDestination {
    pub fn new() -> Self {
        Self
    }
}

impl OutputDestination for StdoutDestination {
    fn write_str(&self, content: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(content.as_bytes())
            .and_then(|_| handle.flush())
            .context("Failed to write to stdout")
    }

    fn description(&self) -> String {
        "stdout".to_string()
    }
}
