//! Target Selection
//!
//! Nearest-valid-target policy shared by every aiming and placement path.
//! Candidates that are dead or invisible are skipped; ties at equal
//! distance go to the first candidate encountered, which determines which
//! enemy gets the targeting outline when two are equidistant.

use bevy::prelude::*;

/// A targeting snapshot entry: entity plus the state needed to qualify it.
#[derive(Clone, Copy, Debug)]
pub struct TargetCandidate {
    pub entity: Entity,
    pub position: Vec2,
    pub alive: bool,
    pub visible: bool,
}

/// Find the valid candidate nearest to `origin`.
///
/// Linear scan with a strict minimum: at equal distance the earlier
/// candidate wins. Returns None when no candidate is alive and visible.
pub fn find_nearest(origin: Vec2, candidates: &[TargetCandidate]) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for candidate in candidates {
        if !candidate.alive || !candidate.visible {
            continue;
        }
        let dist = origin.distance(candidate.position);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((candidate.entity, dist)),
        }
    }
    best.map(|(entity, _)| entity)
}
