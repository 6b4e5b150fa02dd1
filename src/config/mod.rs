//! Project configuration read from `.pipeweave.toml`.

pub mod loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config,
    LoadedConfig, CONFIG_FILE_NAME,
};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PipeweaveConfig {
    /// Ceiling on expansion generations
    #[serde(default)]
    pub max_generations: Option<usize>,

    /// Fail renders that reference undefined fields
    #[serde(default)]
    pub strict: Option<bool>,

    /// Directories searched recursively for auxiliary templates, relative to
    /// the config file
    #[serde(default)]
    pub template_dirs: Vec<PathBuf>,

    /// Parameters bound when rendering the entry pipeline
    #[serde(default)]
    pub args: toml::Table,
}

impl PipeweaveConfig {
    /// Entry parameters as a YAML mapping.
    pub fn args_mapping(&self) -> Mapping {
        match serde_yaml::to_value(&self.args) {
            Ok(Value::Mapping(mapping)) => mapping,
            _ => Mapping::new(),
        }
    }

    /// Template directories anchored at `base`.
    pub fn template_dirs_from(&self, base: &Path) -> Vec<PathBuf> {
        self.template_dirs
            .iter()
            .map(|dir| if dir.is_absolute() { dir.clone() } else { base.join(dir) })
            .collect()
    }
}

pub const DEFAULT_CONFIG: &str = r#"# pipeweave configuration

# Maximum number of merge generations before expansion is abandoned.
max_generations = 64

# Fail when a template references an undefined field.
strict = true

# Directories searched recursively for auxiliary templates.
template_dirs = []

# Parameters available to the entry pipeline.
[args]
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = parse_and_validate_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.max_generations, Some(64));
        assert_eq!(config.strict, Some(true));
        assert!(config.args.is_empty());
    }

    #[test]
    fn test_args_mapping() {
        let config =
            parse_and_validate_config("[args]\nenv = \"qa\"\nreplicas = 3\nenvs = [\"ci\", \"qa\"]\n")
                .unwrap();
        let args = config.args_mapping();
        assert_eq!(args.get("env"), Some(&Value::from("qa")));
        assert_eq!(args.get("replicas"), Some(&Value::from(3)));
        assert!(args.get("envs").unwrap().is_sequence());
    }

    #[test]
    fn test_template_dirs_are_anchored() {
        let config = PipeweaveConfig {
            template_dirs: vec!["templates".into(), "/abs".into()],
            ..Default::default()
        };
        assert_eq!(
            config.template_dirs_from(Path::new("/repo")),
            vec![PathBuf::from("/repo/templates"), PathBuf::from("/abs")]
        );
    }
}
