//! Invi CLI
//!
//! Play carousel scenarios against a headless document and inspect the
//! configuration defaults.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use invi_carousel::{Carousel, CarouselOptions, CarouselSettings};
use invi_core::ConfigRegistry;
use invi_platform::HeadlessDocument;

mod scenario;
mod simulate;

use scenario::Scenario;
use simulate::Simulation;

#[derive(Parser)]
#[command(name = "invi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Invi widget toolkit CLI", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario file and print emitted events as JSON lines
    Simulate {
        /// Scenario TOML file
        scenario: PathBuf,
    },

    /// Print the carousel defaults
    Defaults {
        /// Options TOML merged onto the defaults first
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout carries the command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate { scenario } => cmd_simulate(&scenario),
        Commands::Defaults { config, json } => cmd_defaults(config.as_deref(), json),
    }
}

fn cmd_simulate(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    info!(
        "Simulating {} ({} slides, {} steps)",
        path.display(),
        scenario.slides,
        scenario.steps.len()
    );

    let stdout = io::stdout();
    let mut simulation = Simulation::new(&scenario, stdout.lock())?;
    simulation.run(&scenario.steps)
}

fn cmd_defaults(config: Option<&Path>, json: bool) -> Result<()> {
    let settings = match config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let options = CarouselOptions::from_toml_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Carousel::<HeadlessDocument>::configure(&options)?
        }
        None => ConfigRegistry::<CarouselSettings>::global().defaults(),
    };

    let output = if json {
        serde_json::to_string_pretty(&settings)?
    } else {
        toml::to_string_pretty(&settings)?
    };
    println!("{output}");
    Ok(())
}
