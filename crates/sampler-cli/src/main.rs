//! sampler: command-line entry point for the tail-sampling policy
//! controller.

mod demo_clients;

use clap::{Parser, Subcommand};
use demo_clients::{FixedDelayOrchestrator, SyntheticTraceStore};
use sampler_core::PolicyCatalog;
use sampler_loop::{EpisodeLoop, HyperSearchConfig, HyperparameterDriver, LoopConfig, LoopDependencies};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sampler")]
#[command(about = "Closed-loop tuner for a collector's tail-sampling policy")]
#[command(long_about = r#"
sampler drives the episode loop that tunes a distributed telemetry
collector's tail-sampling policy set by policy gradient: sample an
action from the current policy, roll out the corresponding collector
configuration, wait for it to become ready, score the previous
episode's traces by structural entropy, and update the agent.

Examples:
  # Run 20 episodes from a fresh 0.5-per-template seed
  sampler run --catalog catalog.json --output ./trial-0

  # Resume from a previously saved theta vector
  sampler run --catalog catalog.json --seed-file theta_trial_0.json --output ./trial-1

  # Search reward-function coefficients with a nested short trial per proposal
  sampler search --catalog catalog.json --proposals 20 --output ./search
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Synthetic trace batch size per episode (demo trace-store fake).
    #[arg(long, global = true, default_value_t = 200)]
    demo_batch_size: usize,

    /// Distinct route shapes the demo trace-store fake generates.
    #[arg(long, global = true, default_value_t = 8)]
    demo_distinct_routes: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more trials of the episode loop.
    ///
    /// Loads a policy catalog and an optional seed theta vector, runs
    /// `--trials` independent trials of `--episodes` episodes each, and
    /// persists per-trial episode history and agent state under
    /// `--output`.
    Run {
        /// Path to the policy catalog JSON file.
        #[arg(long)]
        catalog: PathBuf,

        /// Directory to persist episode history and agent state under.
        #[arg(long)]
        output: PathBuf,

        /// Episodes per trial.
        #[arg(long, default_value_t = 20)]
        episodes: usize,

        /// Independent trials to run.
        #[arg(long, default_value_t = 1)]
        trials: usize,

        /// Optional path to a previously saved theta vector (as written
        /// by a prior run's `theta_trial_N.json`). Falls back to 0.5
        /// per catalog entry when absent.
        #[arg(long)]
        seed_file: Option<PathBuf>,
    },

    /// Search reward-function coefficients (alpha, beta) with a nested
    /// short trial per proposal, keeping the best-scoring one.
    Search {
        /// Path to the policy catalog JSON file.
        #[arg(long)]
        catalog: PathBuf,

        /// Directory to persist each proposal's nested trial under.
        #[arg(long)]
        output: PathBuf,

        /// Number of (alpha, beta) proposals to evaluate.
        #[arg(long, default_value_t = 30)]
        proposals: usize,

        /// Episodes per nested proposal trial.
        #[arg(long, default_value_t = 10)]
        episodes: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let batch_size = cli.demo_batch_size;
    let distinct_routes = cli.demo_distinct_routes;

    match cli.command {
        Commands::Run {
            catalog,
            output,
            episodes,
            trials,
            seed_file,
        } => {
            let catalog = PolicyCatalog::from_file(&catalog)?;
            let config = LoopConfig::default()
                .with_episodes_per_trial(episodes)
                .with_trials(trials)
                .apply_env_overrides();
            config.validate()?;

            let seed = match seed_file {
                Some(path) => {
                    let raw = std::fs::read_to_string(&path)?;
                    let state: sampler_core::AgentState = serde_json::from_str(&raw)?;
                    state.theta
                }
                None => vec![0.5; catalog.len()],
            };

            let deps = LoopDependencies::new(
                Arc::new(SyntheticTraceStore::new(batch_size, distinct_routes)),
                Arc::new(FixedDelayOrchestrator::new(0)),
                catalog,
            );
            let engine = EpisodeLoop::new(config, deps, output);
            let results = engine.run_trials(seed).await;

            for (trial, outcome) in results.into_iter().enumerate() {
                match outcome {
                    Ok(stats) => println!(
                        "trial {trial}: {} episodes, mean reward {:.4}, mean entropy {:.4}{}",
                        stats.episodes_completed,
                        stats.mean_reward,
                        stats.mean_entropy,
                        if stats.aborted { " (aborted)" } else { "" }
                    ),
                    Err(err) => println!("trial {trial}: failed: {err}"),
                }
            }
            Ok(())
        }

        Commands::Search {
            catalog,
            output,
            proposals,
            episodes,
        } => {
            let catalog = PolicyCatalog::from_file(&catalog)?;
            let catalog_len = catalog.len();
            let base_config = LoopConfig::default().apply_env_overrides();
            let search = HyperSearchConfig {
                proposals,
                episodes_per_proposal: episodes,
                ..HyperSearchConfig::default()
            };
            let driver = HyperparameterDriver::new(base_config, search, output);

            let catalog_for_factory = catalog;
            let result = driver
                .search(
                    || {
                        LoopDependencies::new(
                            Arc::new(SyntheticTraceStore::new(batch_size, distinct_routes)),
                            Arc::new(FixedDelayOrchestrator::new(0)),
                            catalog_for_factory.clone(),
                        )
                    },
                    vec![0.5; catalog_len],
                )
                .await?;

            println!(
                "best proposal: alpha={:.4} beta={:.4} mean_reward={:.4}",
                result.alpha, result.beta, result.mean_reward
            );
            Ok(())
        }
    }
}
