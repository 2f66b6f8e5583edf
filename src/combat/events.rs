//! Combat events
//!
//! The event boundaries of the combat core: inbound attack triggers (player
//! input or AI cadence), internal damage events, and the outbound streams
//! consumed by presentation collaborators (shape commands, damage numbers,
//! deaths). The core only ever writes the outbound streams; it never reads
//! rendering state back.

use bevy::prelude::*;

use super::components::AttackKind;

/// Inbound trigger: start an attack cycle for `owner`'s `kind` slot.
///
/// Sent by the input layer for the hero and by scheduler cadence callbacks
/// for raiders. Ignored when the slot is mid-cycle or the owner is gone.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackTriggerEvent {
    pub owner: Entity,
    pub kind: AttackKind,
    /// Optional aim point (drag-release position). When absent the attack
    /// aims at the nearest valid enemy.
    pub target_pos: Option<Vec2>,
}

/// Internal event: a strike resolved against a target. Consumed by the
/// damage application system in the same tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    pub source: Entity,
    pub target: Entity,
    pub amount: f32,
    pub is_crit: bool,
    pub kind: AttackKind,
}

/// Outbound notification: damage was actually applied to a fighter.
/// Presentation collaborators use this for damage numbers and health bars.
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageAppliedEvent {
    pub target: Entity,
    pub amount: f32,
    pub is_crit: bool,
    /// Target position at application time, for floating-number placement
    pub position: Vec2,
}

/// Outbound notification: a fighter just died.
#[derive(Event, Debug, Clone, Copy)]
pub struct FighterDeathEvent {
    pub victim: Entity,
    /// Fighter that dealt the killing blow
    pub killer: Entity,
}

// ============================================================================
// Shape commands (render collaborator boundary)
// ============================================================================

/// Opaque handle tying the shape commands for one visual together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub u64);

/// Allocates unique shape handles for the lifetime of the app.
#[derive(Resource, Default)]
pub struct ShapeHandleAllocator {
    next: u64,
}

impl ShapeHandleAllocator {
    pub fn allocate(&mut self) -> ShapeHandle {
        self.next += 1;
        ShapeHandle(self.next)
    }
}

/// What kind of primitive the renderer should draw for a shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rect,
    Circle,
}

/// Outbound commands describing telegraph outlines, growing shapes, and
/// strike flashes. A renderer consumes these; the core never reads back.
#[derive(Event, Debug, Clone, Copy)]
pub enum ShapeCommand {
    Create {
        handle: ShapeHandle,
        kind: ShapeKind,
        x: f32,
        y: f32,
        size: f32,
        color: [f32; 3],
    },
    SetPosition {
        handle: ShapeHandle,
        x: f32,
        y: f32,
    },
    SetRotation {
        handle: ShapeHandle,
        radians: f32,
    },
    SetSize {
        handle: ShapeHandle,
        size: f32,
    },
    SetVisible {
        handle: ShapeHandle,
        visible: bool,
    },
    Destroy {
        handle: ShapeHandle,
    },
}
