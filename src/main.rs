//! Skirmish - Arena combat & targeting engine
//!
//! Runs a headless skirmish from a JSON config (or the default loadout)
//! and writes a combat log report when it ends.

use skirmish::cli;
use skirmish::headless::{run_headless_skirmish, SkirmishConfig};

fn main() {
    let args = cli::parse_args();

    let mut config = match &args.config {
        Some(path) => match SkirmishConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        },
        None => SkirmishConfig::default(),
    };

    // CLI flags override the config file
    if let Some(output) = &args.output {
        config.output_path = Some(output.display().to_string());
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if args.config.is_none() {
        config.max_duration_secs = args.max_duration;
    }

    if let Err(e) = run_headless_skirmish(config) {
        eprintln!("Skirmish failed: {}", e);
        std::process::exit(1);
    }
}
