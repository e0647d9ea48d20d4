mod headless;

use anyhow::Context;
use castlefront_kernel::MatchConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::headless::RunOptions;

#[derive(Parser)]
#[command(name = "castlefront-cli", about = "Headless runner for castlefront matches")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default match settings
    Info,
    /// Run a match headless with synthetic frame timestamps
    Simulate {
        /// Seconds of host time to simulate
        #[arg(long, default_value = "60")]
        seconds: f64,
        /// Synthetic frame rate
        #[arg(long, default_value = "60")]
        fps: u32,
        /// RNG seed for spawn jitter
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Spawn a player unit every SECS seconds
        #[arg(long, value_name = "SECS")]
        player_every: Option<f64>,
        /// Match configuration (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the report and event log as JSON
        #[arg(long)]
        json: bool,
        /// Print the text rendering every N frames
        #[arg(long, value_name = "N")]
        render_every: Option<u64>,
    },
    /// Run the same match twice and compare state hashes
    Replay {
        /// RNG seed for deterministic replay
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Seconds of host time to simulate
        #[arg(long, default_value = "30")]
        seconds: f64,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MatchConfig> {
    match path {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("loading match config from {}", path.display())),
        None => Ok(MatchConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let config = MatchConfig::default();
            println!("castlefront-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "field: {}x{} tile={}",
                config.field_width, config.field_height, config.tile_size
            );
            println!(
                "castles: hp={} damage={}/s",
                config.castle_max_hp, config.castle_damage_per_second
            );
            println!(
                "units: hp={} speed={} radius={} damage={}/s",
                config.unit_hp, config.unit_speed, config.unit_radius, config.unit_damage_per_second
            );
            println!("enemy spawn every {}s", config.enemy_spawn_interval);
        }
        Commands::Simulate {
            seconds,
            fps,
            seed,
            player_every,
            config,
            json,
            render_every,
        } => {
            let config = load_config(config.as_deref())?;
            let options = RunOptions {
                seed,
                seconds,
                fps,
                player_every,
                render_every,
            };
            let report = headless::run(config, &options).context("starting match")?;

            if json {
                let out = serde_json::to_string_pretty(&report).context("serializing report")?;
                println!("{out}");
            } else {
                println!("{}", report.summary);
                println!("frames={} hash={:#x}", report.frames, report.state_hash);
                match report.outcome {
                    Some(outcome) => println!("Result: {}", outcome.banner()),
                    None => println!("Result: undecided after {seconds}s"),
                }
            }
        }
        Commands::Replay { seed, seconds } => {
            println!("Deterministic replay: seed={seed}, seconds={seconds}");
            let options = RunOptions {
                seed,
                seconds,
                fps: 60,
                player_every: Some(2.0),
                render_every: None,
            };

            let first = headless::run(MatchConfig::default(), &options)?;
            let second = headless::run(MatchConfig::default(), &options)?;

            println!("Run 1: frames={}, hash={:#x}", first.frames, first.state_hash);
            println!("Run 2: frames={}, hash={:#x}", second.frames, second.state_hash);
            if first.state_hash != second.state_hash {
                anyhow::bail!("replay diverged for seed {seed}");
            }
            println!("Match: OK");
        }
    }

    Ok(())
}
