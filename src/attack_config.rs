//! Data-Driven Attack Configuration
//!
//! Attack variant parameters are loaded from `assets/config/attacks.ron`
//! instead of being hardcoded. The RON file is the single source of truth
//! for timings, shapes, and damage; `constants.rs` only keeps engine-level
//! tuning values.
//!
//! ## Usage
//! ```ignore
//! fn my_system(attacks: Res<AttackDefinitions>) {
//!     let def = attacks.get_unchecked(&AttackKind::MeleeSweep);
//!     println!("Sweep telegraph: {}s", def.telegraph_secs);
//! }
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::combat::components::AttackKind;
use crate::combat::damage::DamageSpec;

fn default_crit_multiplier() -> f32 {
    1.0
}

fn default_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Complete configuration for one attack variant, loaded from RON.
///
/// Shape fields are variant-specific and defaulted: sweeps use
/// `length`/`width`, pulses and zones use `radius`, zones additionally use
/// `zone_offset` for placement ahead of the attacker.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttackConfig {
    /// Display name for logs
    pub name: String,

    // === Timing ===
    /// Telegraph wind-up duration in seconds (0.0 = instant variant)
    #[serde(default)]
    pub telegraph_secs: f32,
    /// How long the full-size shape persists after the strike instant
    pub strike_visible_secs: f32,
    /// Mandatory idle interval after a strike
    pub cooldown_secs: f32,
    /// Re-enter telegraph automatically when the cooldown elapses
    #[serde(default)]
    pub auto_repeat: bool,

    // === Damage ===
    /// Minimum base damage (inclusive)
    pub damage_min: u32,
    /// Maximum base damage (inclusive; equal to min for fixed variants)
    pub damage_max: u32,
    /// Crit probability in [0, 1]; 0 disables the crit path
    #[serde(default)]
    pub crit_chance: f32,
    /// Multiplier applied on a crit
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f32,

    // === Shape ===
    /// Sweep rectangle full length
    #[serde(default)]
    pub length: f32,
    /// Sweep rectangle width
    #[serde(default)]
    pub width: f32,
    /// Full circle radius (pulse and zone variants)
    #[serde(default)]
    pub radius: f32,
    /// How far ahead of the attacker a zone circle is placed
    #[serde(default)]
    pub zone_offset: f32,

    // === Presentation ===
    /// Base RGB color handed to the render collaborator (0.0-1.0)
    #[serde(default = "default_color")]
    pub color: [f32; 3],
}

impl AttackConfig {
    /// Damage parameters for the damage roll.
    pub fn damage_spec(&self) -> DamageSpec {
        DamageSpec {
            min: self.damage_min,
            max: self.damage_max,
            crit_chance: self.crit_chance,
            crit_multiplier: self.crit_multiplier,
        }
    }
}

/// Root structure for the attacks.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct AttacksConfig {
    pub attacks: HashMap<AttackKind, AttackConfig>,
}

/// Resource containing all attack definitions.
///
/// Loaded from `assets/config/attacks.ron` at startup.
/// Access via `Res<AttackDefinitions>` in systems.
#[derive(Resource)]
pub struct AttackDefinitions {
    definitions: HashMap<AttackKind, AttackConfig>,
}

impl Default for AttackDefinitions {
    /// Load attack definitions from the default config file.
    /// Panics if the file cannot be loaded - use for tests only.
    fn default() -> Self {
        load_attack_definitions().expect("Failed to load attack definitions in Default impl")
    }
}

impl AttackDefinitions {
    /// Create from a loaded config
    pub fn new(config: AttacksConfig) -> Self {
        Self {
            definitions: config.attacks,
        }
    }

    /// Get the configuration for an attack kind
    pub fn get(&self, kind: &AttackKind) -> Option<&AttackConfig> {
        self.definitions.get(kind)
    }

    /// Get the configuration for an attack kind, panicking if not found.
    /// Use this when the kind must exist (validated at startup).
    pub fn get_unchecked(&self, kind: &AttackKind) -> &AttackConfig {
        self.definitions
            .get(kind)
            .unwrap_or_else(|| panic!("Attack {:?} not found in definitions", kind))
    }

    /// Check that every attack kind is defined and internally consistent.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        for kind in AttackKind::ALL {
            match self.definitions.get(&kind) {
                None => problems.push(format!("{:?} is missing", kind)),
                Some(def) => {
                    if def.damage_min > def.damage_max {
                        problems.push(format!(
                            "{:?}: damage_min {} exceeds damage_max {}",
                            kind, def.damage_min, def.damage_max
                        ));
                    }
                    if kind.is_telegraphed() && def.telegraph_secs <= 0.0 {
                        problems.push(format!("{:?}: telegraphed variant needs a telegraph", kind));
                    }
                    if !kind.is_telegraphed() && def.telegraph_secs != 0.0 {
                        problems.push(format!("{:?}: instant variant must not telegraph", kind));
                    }
                }
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    /// All defined attack kinds
    pub fn attack_kinds(&self) -> impl Iterator<Item = &AttackKind> {
        self.definitions.keys()
    }
}

/// Load attack definitions from assets/config/attacks.ron
pub fn load_attack_definitions() -> Result<AttackDefinitions, String> {
    let config_path = "assets/config/attacks.ron";

    let contents = std::fs::read_to_string(config_path)
        .map_err(|e| format!("Failed to read {}: {}", config_path, e))?;

    let config: AttacksConfig =
        ron::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", config_path, e))?;

    let definitions = AttackDefinitions::new(config);

    definitions
        .validate()
        .map_err(|problems| format!("Invalid attack definitions: {}", problems.join("; ")))?;

    info!(
        "Loaded {} attack definitions from {}",
        definitions.definitions.len(),
        config_path
    );

    Ok(definitions)
}

/// Bevy plugin for attack configuration loading
pub struct AttackConfigPlugin;

impl Plugin for AttackConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_attack_definitions() {
            Ok(definitions) => {
                app.insert_resource(definitions);
            }
            Err(e) => {
                panic!("Failed to load attack definitions: {}", e);
            }
        }
    }
}
