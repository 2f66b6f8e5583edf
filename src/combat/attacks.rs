//! Attack Lifecycle
//!
//! The generic telegraph/strike/cooldown state machine, advanced purely by
//! elapsed-time accumulation, plus the geometry builders that parameterize
//! it per variant. Systems react to the returned `PhaseEvent`s; everything
//! here is plain data so the lifecycle is testable without a running app.

use bevy::math::Vec2;

use super::components::{AttackKind, AttackPhase, AttackState};
use super::geometry::AttackGeometry;
use crate::attack_config::AttackConfig;

/// Telegraph shapes start at this fraction of full size rather than a true
/// zero, so the renderer always has something to draw.
pub const MIN_TELEGRAPH_FRACTION: f32 = 0.05;

/// Transition produced by one advancement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEvent {
    /// Telegraph elapsed: collision and damage resolve now, exactly once.
    StrikeBegan,
    /// Strike visual expired; cooldown timing starts.
    CooldownBegan,
    /// Cooldown elapsed on an auto-repeating attack: a fresh telegraph
    /// begins immediately and per-activation state must be cleared.
    Retelegraphed,
    /// Cooldown elapsed with no auto-repeat: the cycle is over.
    CycleEnded,
}

/// Advance one attack slot by `dt` seconds.
///
/// At most one transition per step; idle slots are untouched. The caller
/// owns the side effects (geometry rebuild, damage resolution, shape
/// commands) keyed off the returned event.
pub fn step_phase(state: &mut AttackState, config: &AttackConfig, dt: f32) -> Option<PhaseEvent> {
    match state.phase {
        AttackPhase::Idle => None,
        AttackPhase::Telegraph => {
            state.elapsed += dt;
            if state.elapsed >= config.telegraph_secs {
                state.phase = AttackPhase::Strike;
                state.elapsed = 0.0;
                Some(PhaseEvent::StrikeBegan)
            } else {
                None
            }
        }
        AttackPhase::Strike => {
            state.elapsed += dt;
            if state.elapsed >= config.strike_visible_secs {
                state.phase = AttackPhase::Cooldown;
                state.elapsed = 0.0;
                Some(PhaseEvent::CooldownBegan)
            } else {
                None
            }
        }
        AttackPhase::Cooldown => {
            state.elapsed += dt;
            if state.elapsed >= config.cooldown_secs {
                state.elapsed = 0.0;
                if config.auto_repeat {
                    state.phase = AttackPhase::Telegraph;
                    Some(PhaseEvent::Retelegraphed)
                } else {
                    state.phase = AttackPhase::Idle;
                    Some(PhaseEvent::CycleEnded)
                }
            } else {
                None
            }
        }
    }
}

/// Fraction of full size a telegraphing shape has reached.
pub fn telegraph_progress(state: &AttackState, config: &AttackConfig) -> f32 {
    if config.telegraph_secs <= 0.0 {
        return 1.0;
    }
    (state.elapsed / config.telegraph_secs).clamp(MIN_TELEGRAPH_FRACTION, 1.0)
}

/// Geometry for a telegraphed variant at the given growth fraction.
/// `progress` of 1.0 is the full-size strike shape.
pub fn telegraph_geometry(
    kind: AttackKind,
    config: &AttackConfig,
    origin: Vec2,
    aim_angle: f32,
    progress: f32,
) -> AttackGeometry {
    debug_assert!(kind.is_telegraphed(), "instant variants have no telegraph");
    match kind {
        AttackKind::MeleeSweep => AttackGeometry::Sweep {
            origin,
            angle: aim_angle,
            length: config.length * progress,
            width: config.width,
        },
        _ => AttackGeometry::Circle {
            center: origin,
            radius: config.radius * progress,
        },
    }
}

/// Segment from the attacker to a point half the target's radius short of
/// the target center. None when attacker and target coincide (no direction
/// to normalize).
pub fn line_geometry(origin: Vec2, target_pos: Vec2, target_radius: f32) -> Option<AttackGeometry> {
    let delta = target_pos - origin;
    let len = delta.length();
    if len <= f32::EPSILON {
        return None;
    }
    let dir = delta / len;
    let end = target_pos - dir * (target_radius * 0.5);
    Some(AttackGeometry::Segment { start: origin, end })
}

/// Zone circle pre-placed `zone_offset` ahead of the attacker toward the
/// target. None when the two positions coincide.
pub fn zone_geometry(origin: Vec2, target_pos: Vec2, config: &AttackConfig) -> Option<AttackGeometry> {
    let delta = target_pos - origin;
    let len = delta.length();
    if len <= f32::EPSILON {
        return None;
    }
    let dir = delta / len;
    Some(AttackGeometry::Circle {
        center: origin + dir * config.zone_offset,
        radius: config.radius,
    })
}
