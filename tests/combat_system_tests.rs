//! App-level tests for the combat systems
//!
//! These drive the real schedule (trigger intake, attack advancement,
//! damage application, death teardown) through manual updates with a
//! hand-advanced clock, instead of calling the state machine directly.

use bevy::prelude::*;
use std::time::Duration;

use skirmish::attack_config::AttackConfigPlugin;
use skirmish::combat::components::{Arsenal, AttackKind, Faction, Fighter, GameRng};
use skirmish::combat::events::{AttackTriggerEvent, DamageEvent, ShapeCommand};
use skirmish::combat::log::{CombatLog, CombatLogEventType};
use skirmish::combat::{CombatPlugin, CombatSystemPhase};

fn combat_app() -> App {
    let mut app = App::new();
    app.init_resource::<Time>();
    // Seed before CombatPlugin so its init_resource keeps this one
    app.insert_resource(GameRng::from_seed(7));
    app.add_plugins((AttackConfigPlugin, CombatPlugin));
    app
}

fn spawn_fighter(
    app: &mut App,
    name: &str,
    faction: Faction,
    position: Vec2,
    health: f32,
    kinds: impl IntoIterator<Item = AttackKind>,
) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_xyz(position.x, position.y, 0.0),
            Fighter::new(name, faction, health, 0.5),
            Arsenal::new(kinds),
        ))
        .id()
}

fn tick(app: &mut App, secs: f32) {
    app.world_mut()
        .resource_mut::<Time>()
        .advance_by(Duration::from_secs_f32(secs));
    app.update();
}

#[test]
fn test_line_strike_damages_once_per_activation() {
    let mut app = combat_app();
    let hero = spawn_fighter(
        &mut app,
        "Hero",
        Faction::Hero,
        Vec2::ZERO,
        100.0,
        [AttackKind::LineStrike],
    );
    let raider = spawn_fighter(
        &mut app,
        "Raider",
        Faction::Raider,
        Vec2::new(2.0, 0.0),
        1000.0,
        [AttackKind::PulseNova],
    );

    app.world_mut().send_event(AttackTriggerEvent {
        owner: hero,
        kind: AttackKind::LineStrike,
        target_pos: None,
    });
    // Run well past the strike window and cooldown
    for _ in 0..14 {
        tick(&mut app, 0.05);
    }

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 1);
    let target = app.world().get::<Fighter>(raider).unwrap();
    // One 8-12 roll, at most doubled by a crit
    assert!(target.damage_taken >= 8.0 && target.damage_taken <= 24.0);
}

#[test]
fn test_trigger_during_active_cycle_is_dropped() {
    let mut app = combat_app();
    let hero = spawn_fighter(
        &mut app,
        "Hero",
        Faction::Hero,
        Vec2::ZERO,
        100.0,
        [AttackKind::MeleeSweep],
    );
    let raider = spawn_fighter(
        &mut app,
        "Raider",
        Faction::Raider,
        Vec2::new(2.0, 0.0),
        1000.0,
        [AttackKind::PulseNova],
    );

    app.world_mut().send_event(AttackTriggerEvent {
        owner: hero,
        kind: AttackKind::MeleeSweep,
        target_pos: None,
    });
    tick(&mut app, 0.1);

    // Mid-telegraph retrigger: must not restart or double the cycle
    app.world_mut().send_event(AttackTriggerEvent {
        owner: hero,
        kind: AttackKind::MeleeSweep,
        target_pos: None,
    });
    // Through the strike, but short of the auto-repeat's second strike
    for _ in 0..7 {
        tick(&mut app, 0.1);
    }

    let log = app.world().resource::<CombatLog>();
    assert_eq!(
        log.filter_by_type(CombatLogEventType::AttackTriggered).len(),
        1
    );
    assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 1);
    let target = app.world().get::<Fighter>(raider).unwrap();
    assert_eq!(target.damage_taken, 30.0);
}

#[test]
fn test_owner_death_mid_telegraph_cancels_strike() {
    let mut app = combat_app();
    let hero = spawn_fighter(
        &mut app,
        "Hero",
        Faction::Hero,
        Vec2::ZERO,
        100.0,
        [AttackKind::MeleeSweep],
    );
    let raider = spawn_fighter(
        &mut app,
        "Raider",
        Faction::Raider,
        Vec2::new(2.0, 0.0),
        60.0,
        [AttackKind::PulseNova],
    );

    app.world_mut().send_event(AttackTriggerEvent {
        owner: hero,
        kind: AttackKind::MeleeSweep,
        target_pos: None,
    });
    tick(&mut app, 0.1);

    // Kill the owner while the telegraph is still growing
    app.world_mut().send_event(DamageEvent {
        source: raider,
        target: hero,
        amount: 1000.0,
        is_crit: false,
        kind: AttackKind::PulseNova,
    });
    for _ in 0..8 {
        tick(&mut app, 0.1);
    }

    assert!(app.world().get::<Fighter>(hero).is_none());
    let target = app.world().get::<Fighter>(raider).unwrap();
    assert_eq!(target.damage_taken, 0.0);
    let log = app.world().resource::<CombatLog>();
    // The killing blow is the only damage in the log
    assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 1);
    assert_eq!(log.deaths(), vec!["Hero"]);
}

#[derive(Resource, Default)]
struct ShapeCommandLog(Vec<ShapeCommand>);

fn collect_shape_commands(mut events: EventReader<ShapeCommand>, mut log: ResMut<ShapeCommandLog>) {
    for event in events.read() {
        log.0.push(*event);
    }
}

#[test]
fn test_auto_repeat_shape_hides_through_cooldown() {
    let mut app = combat_app();
    app.init_resource::<ShapeCommandLog>();
    app.add_systems(
        Update,
        collect_shape_commands.after(CombatSystemPhase::Cleanup),
    );
    let hero = spawn_fighter(
        &mut app,
        "Hero",
        Faction::Hero,
        Vec2::ZERO,
        100.0,
        [AttackKind::MeleeSweep],
    );
    // Out of sweep reach so the cycle runs without any deaths
    spawn_fighter(
        &mut app,
        "Raider",
        Faction::Raider,
        Vec2::new(10.0, 0.0),
        60.0,
        [AttackKind::PulseNova],
    );

    app.world_mut().send_event(AttackTriggerEvent {
        owner: hero,
        kind: AttackKind::MeleeSweep,
        target_pos: None,
    });
    // Telegraph (0.3) + strike (0.12) + cooldown (1.0) + next telegraph
    for _ in 0..20 {
        tick(&mut app, 0.1);
    }

    let commands = &app.world().resource::<ShapeCommandLog>().0;
    let hidden = commands
        .iter()
        .any(|c| matches!(c, ShapeCommand::SetVisible { visible: false, .. }));
    let reshown = commands
        .iter()
        .any(|c| matches!(c, ShapeCommand::SetVisible { visible: true, .. }));
    let destroyed = commands
        .iter()
        .any(|c| matches!(c, ShapeCommand::Destroy { .. }));
    assert!(hidden, "cooldown should hide the telegraph shape");
    assert!(reshown, "re-telegraph should show the shape again");
    assert!(!destroyed, "auto-repeat cycles keep their shape alive");
}
