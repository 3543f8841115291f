use crate::core::AggregationStrategy;
use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "riskmap")]
#[command(about = "Multi-factor project risk synthesis engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize per-domain risk factors into a project-level assessment
    Synthesize {
        /// JSON file holding one synthesis input or an array of inputs
        input: PathBuf,

        /// Configuration file (defaults to built-in weights)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Aggregation strategy
        #[arg(short, long, value_enum, default_value = "weighted-average")]
        strategy: AggregationStrategy,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a commented default configuration to riskmap.toml
    Init {
        /// Overwrite an existing riskmap.toml
        #[arg(long)]
        force: bool,
    },
}
