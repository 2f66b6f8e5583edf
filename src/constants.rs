//! Engine Constants
//!
//! Centralized location for tuning values that are not per-attack (those
//! live in `assets/config/attacks.ron`).

// ============================================================================
// Aiming
// ============================================================================

/// Fraction of the remaining angular difference the melee sweep closes per
/// tick while tracking its target. Shortest angular path, never overshoots.
pub const AIM_LERP_FACTOR: f32 = 0.2;

// ============================================================================
// Fighters
// ============================================================================

/// Hero health pool
pub const HERO_MAX_HEALTH: f32 = 100.0;

/// Hero collision radius
pub const HERO_RADIUS: f32 = 0.6;

/// Raider health pool
pub const RAIDER_MAX_HEALTH: f32 = 60.0;

/// Raider collision radius
pub const RAIDER_RADIUS: f32 = 0.5;

// ============================================================================
// Skirmish layout
// ============================================================================

/// Radius of the ring raiders spawn on around the hero. Inside melee sweep
/// and pulse reach so every variant participates.
pub const SPAWN_RING_RADIUS: f32 = 2.5;

// ============================================================================
// Cadence
// ============================================================================

/// Default interval between hero attack triggers in simulation runs
/// (stands in for drag-release input)
pub const DEFAULT_HERO_CADENCE_SECS: f32 = 0.8;

/// Default interval between raider attack triggers
pub const DEFAULT_RAIDER_CADENCE_SECS: f32 = 1.6;

/// Offset between consecutive raiders' first triggers so their telegraphs
/// don't land in lockstep
pub const RAIDER_CADENCE_STAGGER_SECS: f32 = 0.35;
