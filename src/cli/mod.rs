pub mod setup;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pipeweave")]
#[command(about = "Compose CI pipelines from parameterized YAML templates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v: info, -vv: debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Emit log lines as JSON
    #[arg(short = 'j', long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take the pipeline and merge all the templates into it
    Merge {
        /// File containing the pipeline to process
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Directory of additional templates, searched recursively (repeatable)
        #[arg(short = 'd', long = "directory")]
        directories: Vec<PathBuf>,

        /// Output file (defaults to stdout, `-` also means stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Parameter for the entry pipeline as key=value (repeatable)
        #[arg(short = 'a', long = "arg", value_parser = parse_key_value)]
        args: Vec<(String, String)>,

        /// Maximum number of merge generations
        #[arg(long = "max-generations", env = "PIPEWEAVE_MAX_GENERATIONS")]
        max_generations: Option<usize>,

        /// Render undefined template fields as empty instead of failing
        #[arg(long = "no-strict")]
        no_strict: bool,

        /// Additional template files made available to pipelines
        templates: Vec<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a `key=value` pair; the key must be non-empty.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("malformed argument `{}`, expected key=value", raw)),
    }
}
