use anyhow::Result;
use clap::Parser;
use riskmap::cli::{Cli, Commands};
use riskmap::commands;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Synthesize {
            input,
            config,
            strategy,
            format,
            output,
        } => commands::synthesize::run(commands::synthesize::SynthesizeConfig {
            input,
            config,
            strategy,
            format,
            output,
        }),
        Commands::Init { force } => commands::init::init_config(force),
    }
}
