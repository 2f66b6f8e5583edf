//! Integration tests for attack slot lifecycle behavior
//!
//! These tests verify that:
//! - Phase transitions happen at most once per step, even on huge ticks
//! - A slot stays busy (trigger-gated) until its cycle fully ends
//! - Reset and abort return shape handles for the renderer to destroy
//! - Arsenal slot lookup and teardown behave across multiple slots

use skirmish::attack_config::AttackConfig;
use skirmish::combat::attacks::{
    step_phase, telegraph_progress, PhaseEvent, MIN_TELEGRAPH_FRACTION,
};
use skirmish::combat::components::{Arsenal, AttackKind, AttackPhase, AttackState};
use skirmish::combat::events::ShapeHandle;

fn sweep_config(auto_repeat: bool) -> AttackConfig {
    AttackConfig {
        name: "Test Sweep".to_string(),
        telegraph_secs: 0.3,
        strike_visible_secs: 0.12,
        cooldown_secs: 1.0,
        auto_repeat,
        damage_min: 30,
        damage_max: 30,
        crit_chance: 0.0,
        crit_multiplier: 1.0,
        length: 3.0,
        width: 1.2,
        radius: 0.0,
        zone_offset: 0.0,
        color: [1.0, 0.5, 0.2],
    }
}

fn telegraphing_sweep() -> AttackState {
    let mut state = AttackState::new(AttackKind::MeleeSweep);
    state.phase = AttackPhase::Telegraph;
    state
}

// =============================================================================
// Step Semantics Tests
// =============================================================================

#[test]
fn test_oversized_tick_still_transitions_once() {
    let config = sweep_config(true);
    let mut state = telegraphing_sweep();

    // A 10s tick covers telegraph, strike, and cooldown, but only one
    // transition happens per step
    assert_eq!(
        step_phase(&mut state, &config, 10.0),
        Some(PhaseEvent::StrikeBegan)
    );
    assert_eq!(state.phase, AttackPhase::Strike);
    assert_eq!(
        step_phase(&mut state, &config, 10.0),
        Some(PhaseEvent::CooldownBegan)
    );
    assert_eq!(state.phase, AttackPhase::Cooldown);
}

#[test]
fn test_telegraph_progress_is_clamped() {
    let config = sweep_config(true);
    let mut state = telegraphing_sweep();

    assert_eq!(telegraph_progress(&state, &config), MIN_TELEGRAPH_FRACTION);

    state.elapsed = 0.15;
    assert!((telegraph_progress(&state, &config) - 0.5).abs() < 1e-6);

    state.elapsed = 99.0;
    assert_eq!(telegraph_progress(&state, &config), 1.0);
}

#[test]
fn test_slot_is_busy_until_cycle_ends() {
    // is_attacking is what gates re-triggering: triggers arriving during
    // telegraph, strike, or cooldown are dropped
    let config = sweep_config(false);
    let mut state = telegraphing_sweep();
    assert!(state.is_attacking());

    step_phase(&mut state, &config, 0.3);
    assert_eq!(state.phase, AttackPhase::Strike);
    assert!(state.is_attacking());

    step_phase(&mut state, &config, 0.12);
    assert_eq!(state.phase, AttackPhase::Cooldown);
    assert!(state.is_attacking(), "cooldown still gates triggers");

    step_phase(&mut state, &config, 1.0);
    assert!(!state.is_attacking(), "idle slot accepts triggers again");
}

#[test]
fn test_auto_repeat_never_goes_idle() {
    let config = sweep_config(true);
    let mut state = telegraphing_sweep();

    // Walk five full cycles; the slot must stay busy throughout
    for _ in 0..5 {
        assert_eq!(
            step_phase(&mut state, &config, 0.3),
            Some(PhaseEvent::StrikeBegan)
        );
        assert_eq!(
            step_phase(&mut state, &config, 0.12),
            Some(PhaseEvent::CooldownBegan)
        );
        assert_eq!(
            step_phase(&mut state, &config, 1.0),
            Some(PhaseEvent::Retelegraphed)
        );
        assert!(state.is_attacking());
    }
}

// =============================================================================
// Reset & Teardown Tests
// =============================================================================

#[test]
fn test_reset_returns_shape_and_keeps_aim() {
    let mut state = telegraphing_sweep();
    state.aim_angle = 1.25;
    state.shape = Some(ShapeHandle(7));
    state.dealt_damage = true;

    let handle = state.reset();

    assert_eq!(handle, Some(ShapeHandle(7)));
    assert_eq!(state.phase, AttackPhase::Idle);
    assert!(!state.dealt_damage);
    assert_eq!(state.aim_angle, 1.25, "aim persists across cycles");
}

#[test]
fn test_arsenal_slot_lookup() {
    let mut arsenal = Arsenal::new([AttackKind::LineStrike, AttackKind::MeleeSweep]);

    assert!(arsenal.slot(AttackKind::LineStrike).is_some());
    assert!(arsenal.slot(AttackKind::PulseNova).is_none());

    let sweep = arsenal.slot_mut(AttackKind::MeleeSweep).unwrap();
    sweep.phase = AttackPhase::Telegraph;
    assert!(arsenal.slot(AttackKind::MeleeSweep).unwrap().is_attacking());
    assert!(!arsenal.slot(AttackKind::LineStrike).unwrap().is_attacking());
}

#[test]
fn test_abort_all_collects_only_live_shapes() {
    let mut arsenal = Arsenal::new([AttackKind::LineStrike, AttackKind::MeleeSweep]);
    {
        let sweep = arsenal.slot_mut(AttackKind::MeleeSweep).unwrap();
        sweep.phase = AttackPhase::Telegraph;
        sweep.shape = Some(ShapeHandle(3));
    }

    let handles = arsenal.abort_all();

    assert_eq!(handles.as_slice(), &[ShapeHandle(3)]);
    for slot in &arsenal.attacks {
        assert_eq!(slot.phase, AttackPhase::Idle);
        assert!(slot.shape.is_none());
    }
}
