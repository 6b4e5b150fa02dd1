use anyhow::Result;
use clap::Parser;
use pipeweave::cli::{setup::init_logging, Cli, Commands};
use pipeweave::commands::{self, MergeConfig};
use pipeweave::config::load_config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity, cli.json);

    match cli.command {
        Commands::Merge {
            pipeline,
            directories,
            output,
            args,
            max_generations,
            no_strict,
            templates,
        } => {
            let merge_config = MergeConfig {
                pipeline,
                directories,
                templates,
                output,
                args,
                max_generations,
                no_strict,
            };
            commands::handle_merge(merge_config, load_config())
        }
        Commands::Init { force } => commands::init_config(force),
    }
}
