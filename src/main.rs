use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::Rng;

use traffic_routing_env::domain::env::config::EnvConfig;
use traffic_routing_env::domain::utils::statistics::{EpisodeRecord, EpisodeStatistics};
use traffic_routing_env::{build_environment, load_env_config, logger};

/// Runs a uniformly random routing policy on a network topology and reports
/// per-episode statistics.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Topology file (`.json` or SNDlib native format).
    #[arg(short, long)]
    topology: PathBuf,

    /// Optional environment configuration JSON.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the start/end selection seed of the configuration.
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = 10)]
    episodes: u32,

    /// Write one `;`-separated row per episode to this file.
    #[arg(long)]
    stats_csv: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init();
    log::info!("Starting random policy run for {} episodes.", args.episodes);

    let mut config = match &args.config {
        Some(path) => load_env_config(path).with_context(|| format!("loading config '{}'", path.display()))?,
        None => EnvConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut env = build_environment(&args.topology, config).with_context(|| format!("building environment from '{}'", args.topology.display()))?;
    log::info!(
        "Step budget {} | traffic source {:?} | traffic evolution {:?}",
        env.config().step_budget,
        env.config().traffic_source,
        env.config().traffic_evolution
    );

    let num_actions = env.action_space().n;
    let mut policy_rng = rand::rng();
    let mut stats = EpisodeStatistics::new();

    for _ in 0..args.episodes {
        env.reset()?;

        loop {
            let action = policy_rng.random_range(0..num_actions);
            if env.step(action)?.finished {
                break;
            }
        }

        stats.add(EpisodeRecord::capture(&env));
    }

    log::info!(
        "Run finished: {} episodes, success rate {:.1}%, mean reward {:.3}, mean steps {:.1}",
        stats.len(),
        stats.success_rate() * 100.0,
        stats.mean_reward(),
        stats.mean_steps()
    );

    if let Some(path) = &args.stats_csv {
        let file = File::create(path).with_context(|| format!("creating '{}'", path.display()))?;
        stats.write_csv(file)?;
        log::info!("Episode statistics written to '{}'.", path.display());
    }

    Ok(())
}
