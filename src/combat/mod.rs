//! Combat & targeting engine
//!
//! Implements the core skirmish mechanics:
//! - Fighter registry (health, faction, visibility, damage tallies)
//! - Nearest-target selection with deterministic tie-breaking
//! - Randomized damage rolls with critical hits
//! - Telegraph / strike / cooldown attack state machines
//! - Combat logging

use bevy::prelude::*;

pub mod attacks;
pub mod components;
pub mod damage;
pub mod events;
pub mod geometry;
pub mod log;
pub mod systems;
pub mod targeting;

use events::*;
use systems::*;

/// System set labels for combat system ordering.
///
/// Use these to ensure proper ordering when adding custom systems that
/// interact with combat (the headless runner hangs its end-of-skirmish
/// check after `Cleanup`).
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSystemPhase {
    /// Phase 1: clock advancement and scheduled callbacks (AI cadence)
    Cadence,
    /// Phase 2: aim tracking and attack trigger intake
    TriggerIntake,
    /// Phase 3: state machine advancement, strikes, damage application
    AttackResolution,
    /// Phase 4: death teardown and despawns
    Cleanup,
}

/// Configures the ordering between combat system phases.
///
/// Call this once during app setup before adding combat systems.
pub fn configure_combat_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            CombatSystemPhase::Cadence,
            CombatSystemPhase::TriggerIntake,
            CombatSystemPhase::AttackResolution,
            CombatSystemPhase::Cleanup,
        )
            .chain(),
    );
}

/// Adds the core combat simulation systems to the app.
///
/// Scheduler callbacks queue their work through `Commands`, so a flush
/// sits between `Cadence` and `TriggerIntake`: a cadence firing on tick N
/// has its trigger event visible to intake on the same tick.
pub fn add_core_combat_systems(app: &mut App) {
    app.add_systems(
        Update,
        (tick_combat_log, crate::scheduler::run_scheduler)
            .chain()
            .in_set(CombatSystemPhase::Cadence),
    );

    app.add_systems(
        Update,
        apply_deferred
            .after(CombatSystemPhase::Cadence)
            .before(CombatSystemPhase::TriggerIntake),
    );

    app.add_systems(
        Update,
        (update_sweep_aim, handle_attack_triggers)
            .chain()
            .in_set(CombatSystemPhase::TriggerIntake),
    );

    app.add_systems(
        Update,
        (advance_attacks, process_damage_events)
            .chain()
            .in_set(CombatSystemPhase::AttackResolution),
    );

    app.add_systems(
        Update,
        process_deaths.in_set(CombatSystemPhase::Cleanup),
    );
}

/// Plugin for the combat engine
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<AttackTriggerEvent>()
            .add_event::<DamageEvent>()
            .add_event::<DamageAppliedEvent>()
            .add_event::<FighterDeathEvent>()
            .add_event::<ShapeCommand>()
            // Resources
            .init_resource::<log::CombatLog>()
            .init_resource::<SimulationSpeed>()
            .init_resource::<ShapeHandleAllocator>()
            .init_resource::<components::GameRng>()
            .init_resource::<crate::scheduler::AttackScheduler>();
        configure_combat_system_ordering(app);
        add_core_combat_systems(app);
    }
}

/// Controls the speed of the combat simulation
#[derive(Resource)]
pub struct SimulationSpeed {
    /// Speed multiplier (0.0 = paused, 1.0 = normal, 2.0 = double)
    pub multiplier: f32,
}

impl Default for SimulationSpeed {
    fn default() -> Self {
        Self { multiplier: 1.0 }
    }
}

impl SimulationSpeed {
    pub fn pause(&mut self) {
        self.multiplier = 0.0;
    }

    pub fn normal_speed(&mut self) {
        self.multiplier = 1.0;
    }

    pub fn double_speed(&mut self) {
        self.multiplier = 2.0;
    }

    pub fn is_paused(&self) -> bool {
        self.multiplier == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_phase_ordering() {
        assert_ne!(CombatSystemPhase::Cadence, CombatSystemPhase::TriggerIntake);
        assert_ne!(
            CombatSystemPhase::AttackResolution,
            CombatSystemPhase::Cleanup
        );
    }

    #[test]
    fn test_simulation_speed_pause() {
        let mut speed = SimulationSpeed::default();
        assert!(!speed.is_paused());
        speed.pause();
        assert!(speed.is_paused());
        speed.normal_speed();
        assert_eq!(speed.multiplier, 1.0);
    }
}
