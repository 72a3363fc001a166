use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use cabo_bench::config::{BenchmarkConfig, ResolvedOutputs};
use cabo_bench::logging::init_logging;
use cabo_bench::runner::SelfPlayRunner;

/// Self-play harness for the Cabo bots.
#[derive(Debug, Parser)]
#[command(
    name = "cabo-bench",
    author,
    version,
    about = "Deterministic Cabo self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds to deal.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the RNG seed for dealing.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.games.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config
        .validate()
        .with_context(|| format!("validating overrides for {}", cli.config.display()))?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let rounds = config.games.rounds;
    let rotations = config.games.rotations;
    let agents = config
        .agents
        .iter()
        .map(|agent| agent.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    println!("Loaded configuration '{run_id}' ({rounds} rounds x {rotations} rotations): {agents}");

    if cli.validate_only {
        println!("Validation-only mode: self-play skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SelfPlayRunner::new(config, outputs).context("preparing self-play runner")?;
    let summary = runner
        .run()
        .with_context(|| format!("running self-play '{run_id}'"))?;

    println!(
        "Self-play complete for '{run_id}': {} rounds x {} rotations -> {} rows at {}",
        summary.rounds_played,
        summary.rotations,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for agent in &summary.agents {
        println!(
            "  {:<16} mean {:>6.2}  win {:>5.1}%  calls {}",
            agent.name,
            agent.mean_total,
            agent.win_rate() * 100.0,
            agent.calls
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
