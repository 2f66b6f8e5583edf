//! Skirmish - Arena combat & targeting engine
//!
//! A top-down arcade combat simulation: a hero and a ring of raiders trade
//! telegraphed attacks until one side falls. Attack shapes, timing, and
//! damage are data-driven from a RON config; skirmishes run headless for
//! automated testing.
//!
//! This library exposes the core engine modules for testing and reuse.

pub mod attack_config;
pub mod cli;
pub mod combat;
pub mod constants;
pub mod headless;
pub mod scheduler;

// Re-export commonly used types
pub use attack_config::AttackDefinitions;
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::SkirmishConfig;
