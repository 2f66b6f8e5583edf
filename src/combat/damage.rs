//! Damage Rolls
//!
//! Raw and critical damage computation for a strike. The base amount is an
//! integer drawn uniformly from an inclusive range; an independent roll
//! decides whether the crit multiplier applies. Fixed-damage variants use
//! `min == max`, variants without a crit path carry a zero crit chance.

use super::components::GameRng;

/// Damage parameters for one attack variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageSpec {
    pub min: u32,
    pub max: u32,
    /// Probability in [0, 1] that a strike crits. 0 disables the crit path.
    pub crit_chance: f32,
    /// Multiplier applied to the base amount on a crit.
    pub crit_multiplier: f32,
}

impl DamageSpec {
    /// A fixed amount with no crit path.
    pub fn fixed(amount: u32) -> Self {
        Self {
            min: amount,
            max: amount,
            crit_chance: 0.0,
            crit_multiplier: 1.0,
        }
    }
}

/// Result of a single damage roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub amount: f32,
    pub is_crit: bool,
}

/// Roll damage for one strike.
///
/// Draws the base integer from `[min, max]` inclusive, then independently
/// draws a uniform float in [0, 1); below `crit_chance` the base is
/// multiplied by `crit_multiplier`.
pub fn roll_damage(spec: &DamageSpec, rng: &mut GameRng) -> DamageRoll {
    debug_assert!(
        spec.min <= spec.max,
        "roll_damage: min {} exceeds max {}",
        spec.min,
        spec.max
    );
    let base = rng.random_int(spec.min, spec.max) as f32;
    let is_crit = rng.random_f32() < spec.crit_chance;
    let amount = if is_crit {
        base * spec.crit_multiplier
    } else {
        base
    };
    DamageRoll { amount, is_crit }
}
