//! Command-line interface for the skirmish simulator

use clap::Parser;
use std::path::PathBuf;

/// Arena skirmish combat simulator
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Arena skirmish combat simulator")]
#[command(version)]
pub struct Args {
    /// JSON skirmish config file (omit to run the default loadout)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Output path for the skirmish log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum skirmish duration in seconds
    #[arg(long, default_value = "120")]
    pub max_duration: f32,

    /// Random seed for deterministic reproduction
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
