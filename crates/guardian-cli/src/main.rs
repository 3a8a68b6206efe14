//! Guardian CLI - headless defender/evader sessions.
//!
//! - `guardian run` - play a session with the scripted evader and print the result
//! - `guardian config` - print the default configuration as YAML

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use guardian_sim::{Autopilot, Difficulty, SimConfig, Simulation};

#[derive(Parser)]
#[command(name = "guardian")]
#[command(about = "Multi-agent base defence simulation", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session with the scripted evader
    Run {
        /// Maximum ticks before giving up
        #[arg(long, default_value_t = 10_800)]
        ticks: u64,

        /// Session seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// YAML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// easy, normal or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if cli.log_json {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Run {
            ticks,
            seed,
            config,
            difficulty,
            json,
        } => run_session(ticks, seed, config, difficulty, json),
        Commands::Config => {
            print!("{}", SimConfig::default().to_yaml()?);
            Ok(())
        }
    }
}

fn run_session(
    ticks: u64,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
    difficulty: Option<Difficulty>,
    json: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(difficulty) = difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let mut sim = Simulation::new(config).context("Invalid session config")?;
    let mut pilot = Autopilot::default();
    let outcome = sim.run(&mut pilot, ticks);
    tracing::info!(ticks = sim.tick(), %outcome, "session finished");

    if json {
        let snapshot = serde_json::to_string_pretty(&sim.snapshot())?;
        println!("{snapshot}");
        return Ok(());
    }

    let ledger = sim.ledger();
    println!("Outcome:        {outcome}");
    println!("Ticks:          {} ({:.1}s)", sim.tick(), sim.elapsed_seconds());
    println!("Base:           {}", sim.base().stored());
    println!("Hideout:        {}", sim.hideout().secured());
    println!("Stolen:         {}", sim.base().stolen());
    println!("Delivered:      {}", sim.base().delivered());
    println!("Resources left: {}", ledger.on_map);
    println!(
        "Explored:       {:.0}%",
        sim.map().explored_fraction() * 100.0
    );
    println!();
    println!("Recent events:");
    for line in sim.events(5) {
        println!("  {line}");
    }
    println!("Recent messages:");
    for line in sim.comms_log(10) {
        println!("  {line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_json_is_a_global_flag() {
        let cli = Cli::try_parse_from(["guardian", "run", "--ticks", "5", "--log-json"]).unwrap();
        assert!(cli.log_json);
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Run { ticks: 5, .. }));

        let cli = Cli::try_parse_from(["guardian", "config"]).unwrap();
        assert!(!cli.log_json);
    }

    #[test]
    fn difficulty_parses_from_the_command_line() {
        let cli = Cli::try_parse_from(["guardian", "run", "--difficulty", "hard"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Run {
                difficulty: Some(Difficulty::Hard),
                ..
            }
        ));
    }
}
