//! Attack Lifecycle Scheduler
//!
//! Tick-driven deferred-callback and repeat-timer resource. Attack phase
//! timing itself lives in the attack state machines; the scheduler covers
//! everything around them: AI trigger cadence and deferred cleanup.
//!
//! Callbacks execute synchronously inside `run_scheduler`, never
//! concurrently with each other, and only receive `Commands` — any world
//! mutation they request lands at the next command flush. Cancellation is
//! idempotent: cancelling an unknown or already-cancelled handle is a no-op.

use bevy::prelude::*;

use crate::combat::SimulationSpeed;

/// Handle identifying one scheduled callback. Never reused within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SchedulerHandle(u64);

type ScheduledFn = Box<dyn FnMut(&mut Commands) + Send + Sync + 'static>;

struct ScheduledEntry {
    handle: SchedulerHandle,
    /// Seconds until the callback fires
    remaining: f32,
    /// Re-arm interval for repeating entries; None for one-shots
    repeat: Option<f32>,
    callback: ScheduledFn,
}

/// Scheduler resource. Advanced once per tick by `run_scheduler`.
#[derive(Resource, Default)]
pub struct AttackScheduler {
    next_handle: u64,
    entries: Vec<ScheduledEntry>,
}

impl AttackScheduler {
    /// Run `callback` once after `delay` seconds.
    pub fn after(
        &mut self,
        delay: f32,
        callback: impl FnMut(&mut Commands) + Send + Sync + 'static,
    ) -> SchedulerHandle {
        self.push(delay, None, Box::new(callback))
    }

    /// Run `callback` every `interval` seconds, first firing after one
    /// full interval.
    pub fn every(
        &mut self,
        interval: f32,
        callback: impl FnMut(&mut Commands) + Send + Sync + 'static,
    ) -> SchedulerHandle {
        self.push(interval, Some(interval), Box::new(callback))
    }

    /// Run `callback` every `interval` seconds, first firing after
    /// `delay`. Used to stagger raider cadences.
    pub fn every_after(
        &mut self,
        delay: f32,
        interval: f32,
        callback: impl FnMut(&mut Commands) + Send + Sync + 'static,
    ) -> SchedulerHandle {
        self.push(delay, Some(interval), Box::new(callback))
    }

    /// Cancel a scheduled callback. Safe to call any number of times,
    /// with live or stale handles.
    pub fn cancel(&mut self, handle: SchedulerHandle) {
        self.entries.retain(|e| e.handle != handle);
    }

    /// Whether a handle still refers to a pending callback.
    pub fn is_scheduled(&self, handle: SchedulerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.entries.len()
    }

    fn push(&mut self, delay: f32, repeat: Option<f32>, callback: ScheduledFn) -> SchedulerHandle {
        self.next_handle += 1;
        let handle = SchedulerHandle(self.next_handle);
        self.entries.push(ScheduledEntry {
            handle,
            remaining: delay.max(0.0),
            repeat,
            callback,
        });
        handle
    }

    /// Advance all entries by `dt` seconds and fire the due ones.
    pub fn advance(&mut self, dt: f32, commands: &mut Commands) {
        let mut idx = 0;
        while idx < self.entries.len() {
            self.entries[idx].remaining -= dt;
            if self.entries[idx].remaining > 0.0 {
                idx += 1;
                continue;
            }
            match self.entries[idx].repeat {
                Some(interval) => {
                    (self.entries[idx].callback)(commands);
                    self.entries[idx].remaining = interval;
                    idx += 1;
                }
                None => {
                    // Remove before firing so a stale handle can't match
                    let mut entry = self.entries.remove(idx);
                    (entry.callback)(commands);
                }
            }
        }
    }
}

/// System: drives the scheduler with the speed-scaled tick delta.
pub fn run_scheduler(
    mut scheduler: ResMut<AttackScheduler>,
    time: Res<Time>,
    speed: Res<SimulationSpeed>,
    mut commands: Commands,
) {
    if speed.is_paused() {
        return;
    }
    let dt = time.delta_secs() * speed.multiplier;
    scheduler.advance(dt, &mut commands);
}
