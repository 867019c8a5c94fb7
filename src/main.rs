//! VOXEL SERPENTS - CLI entry point
//!
//! Headless driver for the simulation core.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use voxel_serpents::{benchmark, Config, World};

#[derive(Parser)]
#[command(name = "voxel-serpents")]
#[command(version)]
#[command(about = "3D toroidal multi-snake simulation core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless simulation
    Run {
        /// Configuration file (YAML); defaults are used if absent
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "10000")]
        ticks: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Write final stats as JSON to this path
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },
    /// Run a quick throughput benchmark
    Bench {
        #[arg(short, long, default_value = "1000")]
        ticks: u64,

        #[arg(short, long, default_value = "100")]
        snakes: usize,
    },
    /// Write a default configuration file
    InitConfig {
        #[arg(default_value = "config.yaml")]
        path: PathBuf,
    },
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            stats_out,
        } => {
            let (config, fell_back) = if config.exists() {
                (Config::from_file(&config)?, None)
            } else {
                (Config::default(), Some(config))
            };
            // RUST_LOG still wins over the configured level
            init_logging(&config.logging.log_level);
            if let Some(path) = fell_back {
                log::info!("{} not found, using defaults", path.display());
            }

            let mut world = match seed {
                Some(seed) => World::new_with_seed(config, seed),
                None => World::new(config),
            };
            log::info!("running {} ticks (seed {})", ticks, world.seed());

            let start = Instant::now();
            world.run(ticks);
            let elapsed = start.elapsed();

            println!(
                "tick {}: {} alive of {} spawned, {} food, longest {}",
                world.tick,
                world.population(),
                world.snakes.len(),
                world.foods.len(),
                world.stats.length_max
            );
            println!(
                "{:.1} ticks/s over {:.2}s",
                world.tick as f64 / elapsed.as_secs_f64(),
                elapsed.as_secs_f64()
            );

            if let Some(path) = stats_out {
                world.stats.save_json(&path.to_string_lossy())?;
                log::info!("stats written to {}", path.display());
            }
        }
        Commands::Bench { ticks, snakes } => {
            init_logging("warn");
            let result = benchmark(ticks, snakes);
            println!("{}", result);
        }
        Commands::InitConfig { path } => {
            init_logging("info");
            Config::default().save(&path)?;
            println!("wrote default config to {}", path.display());
        }
    }

    Ok(())
}
