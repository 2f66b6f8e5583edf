//! JSON configuration parsing for headless mode
//!
//! Parses JSON skirmish configurations into attack loadouts and cadences.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::components::AttackKind;
use crate::constants::{DEFAULT_HERO_CADENCE_SECS, DEFAULT_RAIDER_CADENCE_SECS};

/// Headless skirmish configuration loaded from JSON
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct SkirmishConfig {
    /// Attack variants in the hero's arsenal (1-4 names)
    pub hero_attacks: Vec<String>,
    /// One attack variant per raider (1-6 names)
    pub raiders: Vec<String>,
    /// Seconds between hero attack triggers (default: 0.8)
    #[serde(default = "default_hero_cadence")]
    pub hero_cadence_secs: f32,
    /// Seconds between raider attack triggers (default: 1.6)
    #[serde(default = "default_raider_cadence")]
    pub raider_cadence_secs: f32,
    /// Custom output path for the skirmish log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Maximum skirmish duration in seconds (default: 120)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Random seed for deterministic skirmish reproduction
    /// If provided, damage rolls and crits use a seeded RNG
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_hero_cadence() -> f32 {
    DEFAULT_HERO_CADENCE_SECS
}

fn default_raider_cadence() -> f32 {
    DEFAULT_RAIDER_CADENCE_SECS
}

fn default_max_duration() -> f32 {
    120.0
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            hero_attacks: vec!["LineStrike".to_string(), "MeleeSweep".to_string()],
            raiders: vec!["PulseNova".to_string(), "ZoneBlast".to_string()],
            hero_cadence_secs: default_hero_cadence(),
            raider_cadence_secs: default_raider_cadence(),
            output_path: None,
            max_duration_secs: default_max_duration(),
            random_seed: None,
        }
    }
}

impl SkirmishConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: SkirmishConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.hero_attacks.is_empty() || self.hero_attacks.len() > 4 {
            return Err("hero_attacks must have 1-4 entries".to_string());
        }
        if self.raiders.is_empty() || self.raiders.len() > 6 {
            return Err("raiders must have 1-6 entries".to_string());
        }

        for name in self.hero_attacks.iter().chain(self.raiders.iter()) {
            Self::parse_attack(name)?;
        }

        // Duplicate kinds would collapse into one arsenal slot
        let mut seen = Vec::new();
        for name in &self.hero_attacks {
            let kind = Self::parse_attack(name)?;
            if seen.contains(&kind) {
                return Err(format!("hero_attacks lists '{}' more than once", name));
            }
            seen.push(kind);
        }

        if self.hero_cadence_secs <= 0.0 || self.raider_cadence_secs <= 0.0 {
            return Err("cadence intervals must be positive".to_string());
        }
        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }

        Ok(())
    }

    /// Parse an attack name string into an AttackKind
    pub fn parse_attack(name: &str) -> Result<AttackKind, String> {
        AttackKind::from_name(name).ok_or_else(|| {
            format!(
                "Unknown attack: '{}'. Valid attacks: LineStrike, MeleeSweep, PulseNova, ZoneBlast",
                name
            )
        })
    }

    /// The hero's arsenal as parsed kinds (call after `validate`)
    pub fn hero_kinds(&self) -> Vec<AttackKind> {
        self.hero_attacks
            .iter()
            .filter_map(|n| AttackKind::from_name(n))
            .collect()
    }
}
