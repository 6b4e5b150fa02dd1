use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::PipeweaveConfig;

pub const CONFIG_FILE_NAME: &str = ".pipeweave.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// A configuration together with the directory it was found in.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: PipeweaveConfig,
    pub base_dir: Option<PathBuf>,
}

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<PipeweaveConfig, String> {
    let mut config = toml::from_str::<PipeweaveConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if config.max_generations == Some(0) {
        log::warn!("max_generations must be at least 1. Using default.");
        config.max_generations = None;
    }

    Ok(config)
}

/// Try loading config from a specific path
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<PipeweaveConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for a config file.
pub fn load_config_from(start: PathBuf) -> LoadedConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .find_map(|dir| {
            try_load_config_from_path(&dir.join(CONFIG_FILE_NAME)).map(|config| LoadedConfig {
                config,
                base_dir: Some(dir),
            })
        })
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            LoadedConfig::default()
        })
}

pub fn load_config() -> LoadedConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            LoadedConfig::default()
        }
    }
}
