//! Component Definitions for the Combat Engine
//!
//! ECS components, resources, and supporting data structures used by the
//! skirmish simulation: fighters, attack slots, cadence bookkeeping, and the
//! seedable RNG resource.

use bevy::math::Rect;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::geometry::AttackGeometry;
use crate::scheduler::SchedulerHandle;

// ============================================================================
// RNG
// ============================================================================

/// Seedable random number generator resource.
///
/// When created with a seed, the whole simulation becomes reproducible,
/// which the damage-roll tests rely on.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random integer in `[min, max]` inclusive.
    pub fn random_int(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// Fighters
// ============================================================================

/// Which side a fighter is on. Attacks only ever hit the opposing faction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The player-controlled fighter
    Hero,
    /// Autonomous opponents
    Raider,
}

impl Faction {
    /// The faction whose fighters this faction's attacks can hit.
    pub fn opposing(self) -> Faction {
        match self {
            Faction::Hero => Faction::Raider,
            Faction::Raider => Faction::Hero,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Faction::Hero => "Hero",
            Faction::Raider => "Raider",
        }
    }
}

/// Core fighter component: health, visibility, and per-skirmish totals.
/// Position lives in the entity's `Transform`.
#[derive(Component, Clone, Debug)]
pub struct Fighter {
    /// Display name for the combat log ("Hero", "Raider 2", ...)
    pub name: String,
    /// Which side this fighter is on
    pub faction: Faction,
    /// Maximum health points
    pub max_health: f32,
    /// Current health points (fighter dies when this reaches 0)
    pub current_health: f32,
    /// Collision radius on the arena plane
    pub radius: f32,
    /// Whether this fighter can currently be targeted or hit
    pub visible: bool,
    /// Total damage this fighter has dealt
    pub damage_dealt: f32,
    /// Total damage this fighter has taken
    pub damage_taken: f32,
}

impl Fighter {
    pub fn new(name: impl Into<String>, faction: Faction, max_health: f32, radius: f32) -> Self {
        Self {
            name: name.into(),
            faction,
            max_health,
            current_health: max_health,
            radius,
            visible: true,
            damage_dealt: 0.0,
            damage_taken: 0.0,
        }
    }

    /// Check if this fighter is alive (health > 0).
    pub fn is_alive(&self) -> bool {
        self.current_health > 0.0
    }

    /// Check if this fighter can be targeted or hit right now.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Axis-aligned bounding square around the fighter at `position`.
    pub fn bounds(&self, position: Vec2) -> Rect {
        Rect::from_center_half_size(position, Vec2::splat(self.radius))
    }

    /// Apply damage, clamping health at zero.
    ///
    /// Returns true exactly once: on the call that first brings health to
    /// zero. Zero damage is a no-op, and damaging an already-dead fighter
    /// leaves health at zero and returns false.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        debug_assert!(
            amount >= 0.0,
            "take_damage: damage cannot be negative, got {}",
            amount
        );
        if amount <= 0.0 || !self.is_alive() {
            return false;
        }
        let actual = amount.min(self.current_health);
        self.current_health = (self.current_health - amount).max(0.0);
        self.damage_taken += actual;
        self.current_health == 0.0
    }
}

// ============================================================================
// Attacks
// ============================================================================

/// The four attack variants. Parameters for each live in
/// `assets/config/attacks.ron` (see `attack_config`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Instant line from attacker to its target; random damage, can crit
    LineStrike,
    /// Telegraphed rotating rectangle that re-aims while growing
    MeleeSweep,
    /// Telegraphed circle growing from zero radius
    PulseNova,
    /// Instant circle pre-placed ahead of the attacker toward its target
    ZoneBlast,
}

impl AttackKind {
    pub const ALL: [AttackKind; 4] = [
        AttackKind::LineStrike,
        AttackKind::MeleeSweep,
        AttackKind::PulseNova,
        AttackKind::ZoneBlast,
    ];

    /// Parse a config/CLI name like "MeleeSweep".
    pub fn from_name(name: &str) -> Option<AttackKind> {
        match name {
            "LineStrike" => Some(AttackKind::LineStrike),
            "MeleeSweep" => Some(AttackKind::MeleeSweep),
            "PulseNova" => Some(AttackKind::PulseNova),
            "ZoneBlast" => Some(AttackKind::ZoneBlast),
            _ => None,
        }
    }

    /// Whether this variant has a telegraph phase before its strike.
    pub fn is_telegraphed(self) -> bool {
        matches!(self, AttackKind::MeleeSweep | AttackKind::PulseNova)
    }
}

/// Lifecycle phase of one attack slot.
///
/// Telegraphed variants cycle Idle → Telegraph → Strike → Cooldown; instant
/// variants skip Telegraph. "Is attacking" is simply `phase != Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackPhase {
    Idle,
    Telegraph,
    Strike,
    Cooldown,
}

/// One attack slot: the state machine data for a single attack kind owned
/// by a fighter. Advanced by elapsed-time accumulation each tick; never
/// holds a stale reference past its owner's death (the whole `Arsenal` is
/// dropped with the fighter).
#[derive(Clone, Debug)]
pub struct AttackState {
    pub kind: AttackKind,
    pub phase: AttackPhase,
    /// Seconds accumulated in the current phase
    pub elapsed: f32,
    /// Collision shape while telegraphing or striking; None when idle
    pub geometry: Option<AttackGeometry>,
    /// Guard: an activation deals damage at most once
    pub dealt_damage: bool,
    /// Whether the current activation rolled a critical hit
    pub is_crit: bool,
    /// Pre-selected target for line strikes, re-validated before use
    pub bound_target: Option<Entity>,
    /// Current aim angle in radians (melee sweep), wrapped to [-PI, PI]
    pub aim_angle: f32,
    /// Presentation handle for the telegraph/strike shape, if one exists
    pub shape: Option<crate::combat::events::ShapeHandle>,
}

impl AttackState {
    pub fn new(kind: AttackKind) -> Self {
        Self {
            kind,
            phase: AttackPhase::Idle,
            elapsed: 0.0,
            geometry: None,
            dealt_damage: false,
            is_crit: false,
            bound_target: None,
            aim_angle: 0.0,
            shape: None,
        }
    }

    /// True while a cycle is in progress; re-entrant triggers are ignored
    /// whenever this holds.
    pub fn is_attacking(&self) -> bool {
        self.phase != AttackPhase::Idle
    }

    /// Return to Idle, dropping all per-activation state except the aim
    /// angle (which persists so the sweep keeps tracking between cycles).
    /// Returns the shape handle that must be destroyed, if any.
    pub fn reset(&mut self) -> Option<crate::combat::events::ShapeHandle> {
        self.phase = AttackPhase::Idle;
        self.elapsed = 0.0;
        self.geometry = None;
        self.dealt_damage = false;
        self.is_crit = false;
        self.bound_target = None;
        self.shape.take()
    }
}

/// The set of attack slots a fighter owns, one per kind it knows.
#[derive(Component, Default)]
pub struct Arsenal {
    pub attacks: SmallVec<[AttackState; 4]>,
}

impl Arsenal {
    pub fn new(kinds: impl IntoIterator<Item = AttackKind>) -> Self {
        Self {
            attacks: kinds.into_iter().map(AttackState::new).collect(),
        }
    }

    pub fn slot(&self, kind: AttackKind) -> Option<&AttackState> {
        self.attacks.iter().find(|a| a.kind == kind)
    }

    pub fn slot_mut(&mut self, kind: AttackKind) -> Option<&mut AttackState> {
        self.attacks.iter_mut().find(|a| a.kind == kind)
    }

    /// Abort every in-flight cycle (owner died mid-attack). Returns the
    /// shape handles that need a Destroy command.
    pub fn abort_all(&mut self) -> SmallVec<[crate::combat::events::ShapeHandle; 4]> {
        self.attacks.iter_mut().filter_map(|a| a.reset()).collect()
    }
}

/// Scheduler handles registered for a fighter (AI trigger cadence).
/// Cancelled synchronously when the fighter dies so no callback can fire
/// for a despawned entity.
#[derive(Component, Default)]
pub struct CadenceHandles {
    pub handles: SmallVec<[SchedulerHandle; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut fighter = Fighter::new("Hero", Faction::Hero, 50.0, 0.5);
        let died = fighter.take_damage(80.0);
        assert!(died);
        assert_eq!(fighter.current_health, 0.0);
        assert_eq!(fighter.damage_taken, 50.0);
    }

    #[test]
    fn test_zero_damage_is_noop() {
        let mut fighter = Fighter::new("Hero", Faction::Hero, 50.0, 0.5);
        assert!(!fighter.take_damage(0.0));
        assert_eq!(fighter.current_health, 50.0);
    }

    #[test]
    fn test_attack_state_reset_keeps_aim() {
        let mut state = AttackState::new(AttackKind::MeleeSweep);
        state.phase = AttackPhase::Telegraph;
        state.aim_angle = 1.25;
        state.dealt_damage = true;
        state.reset();
        assert_eq!(state.phase, AttackPhase::Idle);
        assert!(!state.dealt_damage);
        assert_eq!(state.aim_angle, 1.25);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = GameRng::from_seed(99);
        let mut b = GameRng::from_seed(99);
        for _ in 0..20 {
            assert_eq!(a.random_int(1, 100), b.random_int(1, 100));
            assert_eq!(a.random_f32(), b.random_f32());
        }
    }
}
