use crate::config::RiskWeightConfig;
use crate::core::{AggregationStrategy, MultiFactorRiskInput};
use crate::io::{create_writer, OutputFormat};
use crate::tracking::{RiskTracker, TrackedSynthesis};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Resolved arguments for the `synthesize` command.
pub struct SynthesizeConfig {
    pub input: PathBuf,
    pub config: Option<PathBuf>,
    pub strategy: AggregationStrategy,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// The input file holds either one synthesis input or an ordered batch.
/// Batch entries run through a single tracker, so trends and crossings are
/// visible across consecutive entries for the same key.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputPayload {
    Batch(Vec<MultiFactorRiskInput>),
    Single(Box<MultiFactorRiskInput>),
}

impl InputPayload {
    fn into_inputs(self) -> Vec<MultiFactorRiskInput> {
        match self {
            InputPayload::Batch(inputs) => inputs,
            InputPayload::Single(input) => vec![*input],
        }
    }
}

/// Run synthesis over the input file and write the results.
pub fn run(args: SynthesizeConfig) -> Result<()> {
    let config = match &args.config {
        Some(path) => RiskWeightConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => RiskWeightConfig::default(),
    };

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input file {}", args.input.display()))?;
    let payload: InputPayload =
        serde_json::from_str(&content).context("input file is not valid synthesis input JSON")?;

    let tracker = RiskTracker::new(config)?;
    let results: Vec<TrackedSynthesis> = payload
        .into_inputs()
        .iter()
        .map(|input| tracker.record(input, args.strategy))
        .collect::<crate::errors::Result<_>>()?;

    let mut writer = create_writer(args.format, args.output.as_deref())?;
    writer.write_results(&results)?;
    Ok(())
}
