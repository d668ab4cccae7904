//! Evergreen CLI - Headless driver for the holiday particle scene

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ribbon, simulate, text};

#[derive(Parser)]
#[command(name = "evergreen")]
#[command(about = "Headless driver for the particle Christmas tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scene at a fixed frame rate and report what happens
    Simulate {
        /// Path to a scene config file (TOML)
        #[arg(long)]
        config: Option<String>,

        /// Number of frames to run
        #[arg(long, default_value = "600")]
        frames: u32,

        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Toggle between tree and text every N seconds (0 disables)
        #[arg(long, default_value = "5.0")]
        toggle_every: f32,

        /// Simulate a compact (narrow viewport) device
        #[arg(long)]
        compact: bool,

        /// Switch to the other device class halfway through
        #[arg(long)]
        resize: bool,
    },

    /// Sample the greeting text and print pool statistics
    Text {
        /// Number of points to request
        #[arg(long, default_value = "13000")]
        count: usize,

        /// Use the compact text layout
        #[arg(long)]
        compact: bool,

        /// Sampler seed
        #[arg(long, default_value = "12648430")]
        seed: u32,
    },

    /// Build the ribbon mesh and print its statistics
    Ribbon {
        /// Segments swept along the path
        #[arg(long, default_value = "400")]
        steps: usize,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            frames,
            fps,
            toggle_every,
            compact,
            resize,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            fps,
            toggle_every,
            compact,
            resize,
        }),
        Commands::Text {
            count,
            compact,
            seed,
        } => text::run(count, compact, seed),
        Commands::Ribbon { steps } => ribbon::run(steps),
    }
}
