//! Town Simulation
//!
//! Runs a small town of oracle-driven agents for a number of ticks and writes
//! the transcript, event log and final snapshot.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use town_core::output::write_snapshot;
use town_core::setup::load_town;
use town_core::{default_config_toml, simulation_from_config, TownConfig};
use town_oracle::{build_oracle, Provider};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "town_sim")]
#[command(about = "A small town of agents that plan, act, remember and move")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Town data file (overrides simulation.town_file)
    #[arg(long)]
    town: Option<PathBuf>,

    /// Number of ticks to simulate (overrides simulation.repeats)
    #[arg(long)]
    repeats: Option<u64>,

    /// Oracle provider: openai, anthropic or random
    #[arg(long)]
    provider: Option<Provider>,

    /// Seed for the random provider
    #[arg(long)]
    seed: Option<u64>,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", default_config_toml());
        return ExitCode::SUCCESS;
    }

    let default_level = if args.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if dotenvy::dotenv().is_err() {
        tracing::debug!("no .env file loaded");
    }

    let mut config = match &args.config {
        Some(path) => match TownConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: could not load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => TownConfig::default(),
    };
    apply_overrides(&mut config, &args);

    println!("Town Simulation");
    println!("===============");
    println!("Town file: {}", config.simulation.town_file.display());
    println!("Ticks: {}", config.simulation.repeats);
    println!("Oracle: {:?}", config.oracle.provider);
    println!();

    let town = match load_town(&config.simulation.town_file) {
        Ok(town) => town,
        Err(e) => {
            eprintln!("Error: could not build town: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!(
        "  Created {} locations and {} agents",
        town.directory().len(),
        town.agents().len()
    );

    let oracle = match build_oracle(&config.oracle) {
        Ok(oracle) => oracle,
        Err(e) => {
            eprintln!("Error: could not set up oracle: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut simulation = match simulation_from_config(&config, town, oracle) {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Error: could not open outputs: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Starting run {}...", simulation.run_id());
    println!();

    let mut status = ExitCode::SUCCESS;
    for _ in 0..config.simulation.repeats {
        match simulation.step() {
            Ok(report) => println!(
                "[Tick {:>3}] {} - {} actions, {} observations, {} moves ({} rejected)",
                report.tick,
                report.hour,
                report.actions,
                report.observations,
                report.moves,
                report.rejected_moves
            ),
            Err(e) => {
                eprintln!("Error: tick {} failed: {}", simulation.clock().tick, e);
                status = ExitCode::FAILURE;
                break;
            }
        }
    }

    if let Err(e) = simulation.flush() {
        eprintln!("Error: could not flush outputs: {}", e);
        status = ExitCode::FAILURE;
    }

    if let Some(path) = &config.output.snapshot {
        let snapshot = simulation.snapshot();
        if let Err(e) = write_snapshot(&snapshot, path) {
            eprintln!("Warning: Could not write snapshot: {}", e);
        }
    }

    println!();
    println!(
        "Simulation finished at {}. Transcript written to {}.",
        simulation.clock(),
        config.output.transcript.display()
    );
    status
}

/// CLI values win over the configuration file
fn apply_overrides(config: &mut TownConfig, args: &Args) {
    if let Some(town) = &args.town {
        config.simulation.town_file = town.clone();
    }
    if let Some(repeats) = args.repeats {
        config.simulation.repeats = repeats;
    }
    if let Some(provider) = args.provider {
        config.oracle.provider = provider;
    }
    if let Some(seed) = args.seed {
        config.oracle.seed = seed;
    }
}
