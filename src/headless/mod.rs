//! Headless mode for agentic testing
//!
//! This module provides functionality to run skirmishes without any graphical
//! output, suitable for automated testing and balance analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Run a headless skirmish
//! cargo run --release -- --config skirmish.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "hero_attacks": ["LineStrike", "MeleeSweep"],
//!   "raiders": ["PulseNova", "ZoneBlast", "LineStrike"],
//!   "max_duration_secs": 120,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::SkirmishConfig;
pub use runner::run_headless_skirmish;
