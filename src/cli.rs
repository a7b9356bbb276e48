//! CLI argument parsing for the fleet-route-optimizer binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fleet-route-optimizer", about = "Field-service route scoring and scheduling")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score the routes of an optimization state and print fleet statistics
    Score {
        /// Optimization state JSON file
        #[arg(long)]
        input: PathBuf,
        /// Write per-route statistics to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Optimize a state with the engine at SOLVER_URL
    Optimize {
        /// Optimization state JSON file
        #[arg(long)]
        input: PathBuf,
        /// Write the result here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Cluster pending services onto the routes of a scheduling state
    Schedule {
        /// Scheduling state JSON file
        #[arg(long)]
        input: PathBuf,
    },
}
