//! crowdflow — headless driver for the crowdflow workspace.
//!
//! ```text
//! crowdflow simulate --project demo --simulation run1 \
//!     --grid-size 50,50 --cell-size 10 --model-scale 1 --model-delta 0,0 \
//!     --model plan.svg --font Arial --screen-size 500,500 \
//!     --agents 40 --spawn-rect 2,2,10,10 --goal 45,45
//!
//! crowdflow replay --project demo --simulation run1
//! ```
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` for per-tick output.

mod args;
mod project;
mod replay;
mod simulate;


use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use args::{ReplayArgs, SimulateArgs};

#[derive(Parser, Debug)]
#[command(name = "crowdflow", version, about = "Grid crowd simulation and congestion replay")]
struct Cli {
    /// Directory holding one sub-directory per project.
    #[arg(long, global = true, default_value = "Projects")]
    projects_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a simulation and record its trace.
    Simulate(SimulateArgs),
    /// Replay a recorded trace and export density/stuck heatmaps as CSV.
    Replay(ReplayArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Simulate(args) => simulate::run(&cli.projects_root, args).map(|_| ()),
        Command::Replay(args) => replay::run(&cli.projects_root, args).map(|_| ()),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
