//! Combat Systems
//!
//! Per-tick driving of the attack state machines:
//! - Sweep aim tracking (shortest-path angular relaxation)
//! - Trigger intake (player input / AI cadence), with re-entrancy guard
//! - Attack advancement and strike resolution
//! - Damage application and death cleanup
//!
//! All systems read the fighter registry through a snapshot taken at the
//! start of the system, so targeting and collision see one consistent view
//! per tick; spawns and despawns apply between phases via `Commands`.

use bevy::prelude::*;

use super::attacks::{self, PhaseEvent};
use super::components::{
    Arsenal, AttackKind, AttackPhase, CadenceHandles, Faction, Fighter, GameRng,
};
use super::damage::{roll_damage, DamageRoll};
use super::events::{
    AttackTriggerEvent, DamageAppliedEvent, DamageEvent, FighterDeathEvent, ShapeCommand,
    ShapeHandle, ShapeHandleAllocator, ShapeKind,
};
use super::geometry::{self, AttackGeometry};
use super::log::{CombatLog, CombatLogEventType};
use super::targeting::{find_nearest, TargetCandidate};
use super::SimulationSpeed;
use crate::attack_config::{AttackConfig, AttackDefinitions};
use crate::constants::AIM_LERP_FACTOR;
use crate::scheduler::AttackScheduler;

/// The fighter query every combat system works from.
pub type FighterQuery<'w, 's> =
    Query<'w, 's, (Entity, &'static Fighter, &'static Transform, &'static mut Arsenal)>;

// ============================================================================
// Registry snapshot
// ============================================================================

/// Read-only view of one fighter for targeting and collision, valid for
/// the duration of a single system.
#[derive(Clone, Copy, Debug)]
struct FighterSnapshot {
    entity: Entity,
    faction: Faction,
    position: Vec2,
    radius: f32,
    alive: bool,
    visible: bool,
}

/// Snapshot every fighter, sorted by entity index so candidate order (and
/// therefore nearest-target tie-breaking) matches spawn order.
fn take_snapshot(fighters: &FighterQuery) -> Vec<FighterSnapshot> {
    let mut snapshot: Vec<FighterSnapshot> = fighters
        .iter()
        .map(|(entity, fighter, transform, _)| FighterSnapshot {
            entity,
            faction: fighter.faction,
            position: transform.translation.truncate(),
            radius: fighter.radius,
            alive: fighter.is_alive(),
            visible: fighter.is_visible(),
        })
        .collect();
    snapshot.sort_by_key(|s| s.entity.index());
    snapshot
}

fn enemy_candidates(snapshot: &[FighterSnapshot], attacker: Faction) -> Vec<TargetCandidate> {
    snapshot
        .iter()
        .filter(|s| s.faction == attacker.opposing())
        .map(|s| TargetCandidate {
            entity: s.entity,
            position: s.position,
            alive: s.alive,
            visible: s.visible,
        })
        .collect()
}

fn snapshot_entry(snapshot: &[FighterSnapshot], entity: Entity) -> Option<&FighterSnapshot> {
    snapshot.iter().find(|s| s.entity == entity)
}

fn shape_kind_for(kind: AttackKind) -> ShapeKind {
    match kind {
        AttackKind::LineStrike => ShapeKind::Line,
        AttackKind::MeleeSweep => ShapeKind::Rect,
        AttackKind::PulseNova | AttackKind::ZoneBlast => ShapeKind::Circle,
    }
}

/// Apply one damage roll to every opposing fighter the geometry touches.
/// Targets are re-validated against the snapshot (alive, visible) before
/// any damage event is sent. Returns the number of hits.
fn resolve_strike(
    geometry: &AttackGeometry,
    attacker: Entity,
    attacker_faction: Faction,
    kind: AttackKind,
    roll: DamageRoll,
    snapshot: &[FighterSnapshot],
    damage: &mut EventWriter<DamageEvent>,
) -> usize {
    let mut hits = 0;
    for target in snapshot {
        if target.faction != attacker_faction.opposing() || !target.alive || !target.visible {
            continue;
        }
        if geometry.touches_fighter(target.position, target.radius) {
            damage.send(DamageEvent {
                source: attacker,
                target: target.entity,
                amount: roll.amount,
                is_crit: roll.is_crit,
                kind,
            });
            hits += 1;
        }
    }
    hits
}

// ============================================================================
// Aiming
// ============================================================================

/// Relax each melee sweep's aim angle toward the nearest valid enemy.
///
/// Runs while the slot is Idle or Telegraph (the telegraph re-aims every
/// tick; the angle freezes once the strike begins). A fixed fraction of
/// the remaining angular difference closes per tick along the shortest
/// path, so the sweep never spins the long way around.
pub fn update_sweep_aim(speed: Res<SimulationSpeed>, mut fighters: FighterQuery) {
    if speed.is_paused() {
        return;
    }
    let snapshot = take_snapshot(&fighters);
    for (_, fighter, transform, mut arsenal) in fighters.iter_mut() {
        if !fighter.is_alive() {
            continue;
        }
        let origin = transform.translation.truncate();
        let Some(slot) = arsenal.slot_mut(AttackKind::MeleeSweep) else {
            continue;
        };
        if !matches!(slot.phase, AttackPhase::Idle | AttackPhase::Telegraph) {
            continue;
        }
        let candidates = enemy_candidates(&snapshot, fighter.faction);
        let Some(target) = find_nearest(origin, &candidates) else {
            continue;
        };
        let Some(target_snapshot) = snapshot_entry(&snapshot, target) else {
            continue;
        };
        // Coincident positions: no direction to aim along, skip the update
        if geometry::distance(origin, target_snapshot.position) <= f32::EPSILON {
            continue;
        }
        let desired = geometry::angle_between(origin, target_snapshot.position);
        slot.aim_angle = geometry::approach_angle(slot.aim_angle, desired, AIM_LERP_FACTOR);
    }
}

// ============================================================================
// Trigger intake
// ============================================================================

/// Start attack cycles for incoming triggers.
///
/// A trigger is dropped silently when the owner is gone or dead, the slot
/// is mid-cycle, or no valid target exists for a target-dependent variant.
/// Instant variants (line, zone) resolve their damage here, synchronously,
/// the moment the strike begins.
pub fn handle_attack_triggers(
    mut triggers: EventReader<AttackTriggerEvent>,
    defs: Res<AttackDefinitions>,
    mut rng: ResMut<GameRng>,
    mut fighters: FighterQuery,
    mut shape_alloc: ResMut<ShapeHandleAllocator>,
    mut shapes: EventWriter<ShapeCommand>,
    mut damage: EventWriter<DamageEvent>,
    mut log: ResMut<CombatLog>,
) {
    if triggers.is_empty() {
        return;
    }
    let snapshot = take_snapshot(&fighters);
    for trigger in triggers.read() {
        let Ok((owner, fighter, transform, mut arsenal)) = fighters.get_mut(trigger.owner) else {
            continue;
        };
        if !fighter.is_alive() {
            continue;
        }
        let Some(config) = defs.get(&trigger.kind) else {
            warn!("No definition for attack {:?}", trigger.kind);
            continue;
        };
        let origin = transform.translation.truncate();
        let faction = fighter.faction;
        let owner_name = fighter.name.clone();
        let Some(slot) = arsenal.slot_mut(trigger.kind) else {
            debug!("{} has no {:?} slot", owner_name, trigger.kind);
            continue;
        };
        if slot.is_attacking() {
            continue;
        }

        match trigger.kind {
            AttackKind::LineStrike | AttackKind::ZoneBlast => {
                let search_origin = trigger.target_pos.unwrap_or(origin);
                let candidates = enemy_candidates(&snapshot, faction);
                let Some(target) = find_nearest(search_origin, &candidates) else {
                    continue;
                };
                let Some(target_snapshot) = snapshot_entry(&snapshot, target) else {
                    continue;
                };
                let built = match trigger.kind {
                    AttackKind::LineStrike => attacks::line_geometry(
                        origin,
                        target_snapshot.position,
                        target_snapshot.radius,
                    ),
                    _ => attacks::zone_geometry(origin, target_snapshot.position, config),
                };
                let Some(built) = built else {
                    // Attacker standing on its target: no aim direction
                    continue;
                };

                let roll = roll_damage(&config.damage_spec(), &mut rng);
                slot.phase = AttackPhase::Strike;
                slot.elapsed = 0.0;
                slot.geometry = Some(built);
                slot.is_crit = roll.is_crit;
                slot.bound_target =
                    (trigger.kind == AttackKind::LineStrike).then_some(target);
                // Resolves now and never again for this activation
                slot.dealt_damage = true;

                let handle = shape_alloc.allocate();
                slot.shape = Some(handle);
                send_create_shape(&mut shapes, handle, trigger.kind, config, &built);

                log.log(
                    CombatLogEventType::AttackTriggered,
                    format!("{} unleashes {}", owner_name, config.name),
                );
                match trigger.kind {
                    // A line strike is target-bound: it damages the enemy
                    // it was drawn to, nothing else
                    AttackKind::LineStrike => {
                        damage.send(DamageEvent {
                            source: owner,
                            target,
                            amount: roll.amount,
                            is_crit: roll.is_crit,
                            kind: trigger.kind,
                        });
                    }
                    // A zone blast hits everything standing in its circle
                    _ => {
                        resolve_strike(
                            &built,
                            owner,
                            faction,
                            trigger.kind,
                            roll,
                            &snapshot,
                            &mut damage,
                        );
                    }
                }
            }
            AttackKind::MeleeSweep | AttackKind::PulseNova => {
                slot.phase = AttackPhase::Telegraph;
                slot.elapsed = 0.0;
                slot.dealt_damage = false;
                slot.is_crit = false;
                let built = attacks::telegraph_geometry(
                    trigger.kind,
                    config,
                    origin,
                    slot.aim_angle,
                    attacks::MIN_TELEGRAPH_FRACTION,
                );
                slot.geometry = Some(built);
                let handle = shape_alloc.allocate();
                slot.shape = Some(handle);
                send_create_shape(&mut shapes, handle, trigger.kind, config, &built);
                log.log(
                    CombatLogEventType::AttackTriggered,
                    format!("{} telegraphs {}", owner_name, config.name),
                );
            }
        }
    }
}

fn send_create_shape(
    shapes: &mut EventWriter<ShapeCommand>,
    handle: ShapeHandle,
    kind: AttackKind,
    config: &AttackConfig,
    geometry: &AttackGeometry,
) {
    let (x, y, size) = match *geometry {
        AttackGeometry::Segment { start, end } => (start.x, start.y, geometry::distance(start, end)),
        AttackGeometry::Sweep { origin, length, .. } => (origin.x, origin.y, length),
        AttackGeometry::Circle { center, radius } => (center.x, center.y, radius),
    };
    shapes.send(ShapeCommand::Create {
        handle,
        kind: shape_kind_for(kind),
        x,
        y,
        size,
        color: config.color,
    });
    if let AttackGeometry::Sweep { angle, .. } = *geometry {
        shapes.send(ShapeCommand::SetRotation {
            handle,
            radians: angle,
        });
    }
}

// ============================================================================
// Advancement & strike resolution
// ============================================================================

/// Advance every active attack by the tick delta.
///
/// Telegraph shapes grow linearly and (for sweeps) follow the aim angle;
/// a strike resolves its damage exactly once the instant it begins, before
/// any cooldown timing starts.
pub fn advance_attacks(
    time: Res<Time>,
    speed: Res<SimulationSpeed>,
    defs: Res<AttackDefinitions>,
    mut rng: ResMut<GameRng>,
    mut fighters: FighterQuery,
    mut shape_alloc: ResMut<ShapeHandleAllocator>,
    mut shapes: EventWriter<ShapeCommand>,
    mut damage: EventWriter<DamageEvent>,
) {
    if speed.is_paused() {
        return;
    }
    let dt = time.delta_secs() * speed.multiplier;
    if dt <= 0.0 {
        return;
    }
    let snapshot = take_snapshot(&fighters);
    for (owner, fighter, transform, mut arsenal) in fighters.iter_mut() {
        if !fighter.is_alive() {
            continue;
        }
        let origin = transform.translation.truncate();
        for slot in arsenal.attacks.iter_mut() {
            if slot.phase == AttackPhase::Idle {
                continue;
            }
            let Some(config) = defs.get(&slot.kind) else {
                continue;
            };
            match attacks::step_phase(slot, config, dt) {
                None => {
                    if slot.phase == AttackPhase::Telegraph {
                        grow_telegraph(slot, config, origin, &mut shapes);
                    }
                }
                Some(PhaseEvent::StrikeBegan) => {
                    // Lock the full-size shape; for sweeps the angle locked
                    // at telegraph end is whatever the last re-aim set
                    let full =
                        attacks::telegraph_geometry(slot.kind, config, origin, slot.aim_angle, 1.0);
                    slot.geometry = Some(full);
                    if let Some(handle) = slot.shape {
                        shapes.send(ShapeCommand::SetSize {
                            handle,
                            size: full_size(slot.kind, config),
                        });
                    }
                    if !slot.dealt_damage {
                        let roll = roll_damage(&config.damage_spec(), &mut rng);
                        slot.is_crit = roll.is_crit;
                        slot.dealt_damage = true;
                        resolve_strike(
                            &full,
                            owner,
                            fighter.faction,
                            slot.kind,
                            roll,
                            &snapshot,
                            &mut damage,
                        );
                    }
                }
                Some(PhaseEvent::CooldownBegan) => {
                    slot.geometry = None;
                    // Auto-repeat attacks keep their shape and hide it through
                    // the cooldown; one-shot attacks tear it down for good
                    if config.auto_repeat {
                        if let Some(handle) = slot.shape {
                            shapes.send(ShapeCommand::SetVisible {
                                handle,
                                visible: false,
                            });
                        }
                    } else if let Some(handle) = slot.shape.take() {
                        shapes.send(ShapeCommand::Destroy { handle });
                    }
                }
                Some(PhaseEvent::Retelegraphed) => {
                    slot.dealt_damage = false;
                    slot.is_crit = false;
                    slot.bound_target = None;
                    match slot.shape {
                        Some(handle) => {
                            shapes.send(ShapeCommand::SetVisible {
                                handle,
                                visible: true,
                            });
                            grow_telegraph(slot, config, origin, &mut shapes);
                        }
                        None => {
                            let built = attacks::telegraph_geometry(
                                slot.kind,
                                config,
                                origin,
                                slot.aim_angle,
                                attacks::MIN_TELEGRAPH_FRACTION,
                            );
                            slot.geometry = Some(built);
                            let handle = shape_alloc.allocate();
                            slot.shape = Some(handle);
                            send_create_shape(&mut shapes, handle, slot.kind, config, &built);
                        }
                    }
                }
                Some(PhaseEvent::CycleEnded) => {
                    if let Some(handle) = slot.reset() {
                        shapes.send(ShapeCommand::Destroy { handle });
                    }
                }
            }
        }
    }
}

fn grow_telegraph(
    slot: &mut super::components::AttackState,
    config: &AttackConfig,
    origin: Vec2,
    shapes: &mut EventWriter<ShapeCommand>,
) {
    let progress = attacks::telegraph_progress(slot, config);
    let built = attacks::telegraph_geometry(slot.kind, config, origin, slot.aim_angle, progress);
    slot.geometry = Some(built);
    if let Some(handle) = slot.shape {
        shapes.send(ShapeCommand::SetPosition {
            handle,
            x: origin.x,
            y: origin.y,
        });
        shapes.send(ShapeCommand::SetSize {
            handle,
            size: full_size(slot.kind, config) * progress,
        });
        if let AttackGeometry::Sweep { angle, .. } = built {
            shapes.send(ShapeCommand::SetRotation {
                handle,
                radians: angle,
            });
        }
    }
}

fn full_size(kind: AttackKind, config: &AttackConfig) -> f32 {
    match kind {
        AttackKind::MeleeSweep => config.length,
        _ => config.radius,
    }
}

// ============================================================================
// Damage application & deaths
// ============================================================================

/// Apply queued damage events to their targets and emit the outbound
/// presentation notifications. Targets that died earlier in the tick are
/// skipped: damage never lands on a dead fighter.
pub fn process_damage_events(
    mut events: EventReader<DamageEvent>,
    defs: Res<AttackDefinitions>,
    mut fighters: Query<(&mut Fighter, &Transform)>,
    mut applied: EventWriter<DamageAppliedEvent>,
    mut deaths: EventWriter<FighterDeathEvent>,
    mut log: ResMut<CombatLog>,
) {
    for event in events.read() {
        let source_name = fighters
            .get(event.source)
            .map(|(f, _)| f.name.clone())
            .unwrap_or_else(|_| "Unknown".to_string());
        let attack_name = defs
            .get(&event.kind)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("{:?}", event.kind));

        let (actual, died, target_name, position) = {
            let Ok((mut target, transform)) = fighters.get_mut(event.target) else {
                continue;
            };
            if !target.is_alive() {
                continue;
            }
            let actual = event.amount.min(target.current_health);
            let died = target.take_damage(event.amount);
            (
                actual,
                died,
                target.name.clone(),
                transform.translation.truncate(),
            )
        };

        applied.send(DamageAppliedEvent {
            target: event.target,
            amount: event.amount,
            is_crit: event.is_crit,
            position,
        });
        log.log_damage(
            source_name.clone(),
            target_name.clone(),
            actual,
            event.is_crit,
            format!(
                "{} hits {} with {} for {:.0}{}",
                source_name,
                target_name,
                attack_name,
                actual,
                if event.is_crit { " (CRIT)" } else { "" }
            ),
        );

        if let Ok((mut source, _)) = fighters.get_mut(event.source) {
            source.damage_dealt += actual;
        }

        if died {
            deaths.send(FighterDeathEvent {
                victim: event.target,
                killer: event.source,
            });
            log.log_death(
                source_name,
                target_name.clone(),
                format!("{} has fallen", target_name),
            );
        }
    }
}

/// Tear down dead fighters: abort in-flight attack cycles, destroy their
/// shapes, cancel cadence callbacks, and despawn. Cancellation happens
/// synchronously here so no scheduled callback can fire for the victim
/// on a later tick.
pub fn process_deaths(
    mut deaths: EventReader<FighterDeathEvent>,
    mut commands: Commands,
    mut scheduler: ResMut<AttackScheduler>,
    mut victims: Query<(&mut Arsenal, Option<&CadenceHandles>)>,
    mut shapes: EventWriter<ShapeCommand>,
) {
    for death in deaths.read() {
        if let Ok((mut arsenal, cadence)) = victims.get_mut(death.victim) {
            for handle in arsenal.abort_all() {
                shapes.send(ShapeCommand::Destroy { handle });
            }
            if let Some(cadence) = cadence {
                for handle in &cadence.handles {
                    scheduler.cancel(*handle);
                }
            }
        }
        commands.entity(death.victim).despawn();
    }
}

/// Advance the combat log clock with the speed-scaled tick delta.
pub fn tick_combat_log(time: Res<Time>, speed: Res<SimulationSpeed>, mut log: ResMut<CombatLog>) {
    if speed.is_paused() {
        return;
    }
    log.skirmish_time += time.delta_secs() * speed.multiplier;
}
