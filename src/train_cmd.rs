//! Train command: observations CSV -> transition model JSON.

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use nimbus_io::{read_csv, write_model};
use nimbus_markov::{ParameterSet, build_transition_model_runs};

use crate::cli::TrainArgs;
use crate::config::NimbusConfig;
use crate::convert;

/// Train a model and write it to disk.
pub fn run(args: TrainArgs) -> Result<()> {
    let _cmd = info_span!("train").entered();

    // 1. Load config and apply CLI overrides
    let config = NimbusConfig::load(args.config.as_deref())?;
    let input = args
        .input
        .as_ref()
        .or(config.io.input.as_ref())
        .ok_or_else(|| anyhow::anyhow!("no input path: set [io].input in config or use --input"))?;
    let output = args
        .output
        .as_ref()
        .or(config.io.model.as_ref())
        .ok_or_else(|| {
            anyhow::anyhow!("no output path: set [io].model in config or use --output")
        })?;
    let params = match &args.params {
        Some(p) => p
            .parse::<ParameterSet>()
            .with_context(|| format!("invalid --params: {p:?}"))?,
        None => convert::parse_parameters(&config.markov.parameters)?,
    };
    let reader_cfg = convert::build_reader_config(&config.io)?;
    let markov_cfg = convert::build_markov_config(&config.markov, args.n_gram)?;

    // 2. Read observations
    info!(path = %input.display(), params = %params, "reading observations");
    let series = read_csv(input, &reader_cfg, &params)
        .with_context(|| format!("failed to read observations: {}", input.display()))?;
    let runs = series.runs();
    if let Some((first, last)) = series.span() {
        info!(n_days = series.len(), n_runs = runs.len(), %first, %last, "observations loaded");
    }

    // 3. Build model on runs of consecutive days
    let model = build_transition_model_runs(runs, &params, &markov_cfg)
        .context("failed to build transition model")?;
    let summary = model.summary();
    info!(
        n_pairs = summary.n_pairs,
        n_discarded = summary.n_discarded,
        n_sources = model.transitions().len(),
        n_destinations = model.generic().len(),
        "model built"
    );
    if summary.n_defaulted > 0 {
        warn!(
            n_defaulted = summary.n_defaulted,
            "missing or malformed measurements replaced by default bins"
        );
    }

    // 4. Write model
    write_model(output, &model)
        .with_context(|| format!("failed to write model: {}", output.display()))?;
    info!(path = %output.display(), "model written");

    Ok(())
}
