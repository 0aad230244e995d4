//! Scenario generator command line.
//!
//! # Commands
//!
//! - `scenario-gen validate <config>` - Load and validate a run configuration
//! - `scenario-gen dry-run <config> --steps N` - Run control steps against the
//!   headless kinematic scene
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

#![deny(clippy::unwrap_used, clippy::expect_used)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scenario_core::{
    EpisodeRunner, KinematicScene, OrchestratorBuilder, TracingSink, VariantRegistry,
};
use scenario_types::RunConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Manipulation episode generator
#[derive(Parser)]
#[command(name = "scenario-gen")]
#[command(about = "Generate manipulation training episodes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a run configuration without building anything
    Validate {
        /// Run configuration (JSON)
        config: PathBuf,
    },

    /// Run control steps on a kinematic scene
    DryRun {
        /// Run configuration (JSON)
        config: PathBuf,

        /// Control steps to run
        #[arg(long, default_value_t = 10)]
        steps: usize,

        /// Sampler seed, overriding the configuration
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::DryRun {
            config,
            steps,
            seed,
        } => dry_run(&config, steps, seed),
    }
}

fn load(path: &Path) -> Result<RunConfig> {
    let config = RunConfig::load(path)
        .with_context(|| format!("failed to load run configuration {}", path.display()))?;
    let registry = VariantRegistry::with_builtins();
    let variant = registry.create(&config.scenario.kind)?;
    variant.validate(&config.scenario)?;
    Ok(config)
}

fn validate(path: &Path) -> Result<()> {
    let config = load(path)?;
    let scenario = &config.scenario;

    println!("{}: ok", path.display());
    println!("  scenario:   {}", scenario.kind);
    println!("  mode:       {}", scenario.simulation_mode);
    println!("  copies:     {}", config.copies);
    println!("  models:     {}", scenario.models.len());
    println!("  chain:      {:?}", scenario.manipulable_slots());
    println!("  floors:     {}", config.display.floor_count(config.copies));
    match &scenario.trials {
        Some(trials) => println!(
            "  trials:     {} x {} attempts -> {}",
            trials.number_of_trials,
            trials.attempts_per_trial,
            trials.result_file.display()
        ),
        None => println!("  log file:   {}", config.log_file.display()),
    }
    Ok(())
}

fn dry_run(path: &Path, steps: usize, seed: Option<u64>) -> Result<()> {
    let config = load(path)?;
    let mut builder = OrchestratorBuilder::new(config).with_event_sink(TracingSink);
    if let Some(seed) = seed {
        builder = builder.with_seed(seed);
    }
    let orchestrator = builder
        .build(KinematicScene::new())
        .context("failed to build scenario")?;
    let mut runner = EpisodeRunner::new(orchestrator)?;

    for step in 0..steps {
        if runner.is_halted() {
            info!(step, "All trials finished, stopping early");
            break;
        }
        runner
            .step()
            .with_context(|| format!("control step {step} failed"))?;
    }

    println!("steps run:       {}", runner.steps());
    println!("records written: {}", runner.records_written());
    if let Some(scheduler) = runner.scheduler() {
        println!(
            "trials:          {}/{} completed, {} succeeded",
            scheduler.completed_count(),
            scheduler.total(),
            scheduler.success_count()
        );
    }
    Ok(())
}
