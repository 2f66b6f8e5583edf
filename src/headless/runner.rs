//! Headless skirmish execution
//!
//! Runs skirmishes without any graphical output, suitable for automated testing.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use smallvec::{smallvec, SmallVec};
use std::f32::consts::TAU;
use std::time::Duration;

use crate::attack_config::AttackConfigPlugin;
use crate::combat::components::{Arsenal, AttackKind, CadenceHandles, Faction, Fighter, GameRng};
use crate::combat::events::{AttackTriggerEvent, FighterDeathEvent};
use crate::combat::log::{CombatLog, CombatLogEventType, FighterMetadata, SkirmishMetadata};
use crate::combat::systems::process_deaths;
use crate::combat::{CombatPlugin, CombatSystemPhase};
use crate::constants::{
    HERO_MAX_HEALTH, HERO_RADIUS, RAIDER_CADENCE_STAGGER_SECS, RAIDER_MAX_HEALTH, RAIDER_RADIUS,
    SPAWN_RING_RADIUS,
};
use crate::scheduler::AttackScheduler;

use super::config::SkirmishConfig;

/// Result of a completed headless skirmish
///
/// Provides programmatic access to skirmish results for testing and analysis.
#[derive(Debug, Clone)]
pub struct SkirmishResult {
    /// The winning faction, or None for a draw
    pub winner: Option<Faction>,
    /// Total skirmish duration in seconds
    pub skirmish_time: f32,
    /// Per-fighter statistics, fallen fighters included
    pub fighters: Vec<FighterResult>,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// Statistics for a single fighter after the skirmish
#[derive(Debug, Clone)]
pub struct FighterResult {
    pub name: String,
    pub faction: Faction,
    pub max_health: f32,
    /// Health remaining at skirmish end (0 if dead)
    pub final_health: f32,
    pub survived: bool,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

impl FighterResult {
    fn from_fighter(fighter: &Fighter) -> Self {
        Self {
            name: fighter.name.clone(),
            faction: fighter.faction,
            max_health: fighter.max_health,
            final_health: fighter.current_health,
            survived: fighter.is_alive(),
            damage_dealt: fighter.damage_dealt,
            damage_taken: fighter.damage_taken,
        }
    }

    fn to_metadata(&self) -> FighterMetadata {
        FighterMetadata {
            name: self.name.clone(),
            faction: self.faction,
            max_health: self.max_health,
            final_health: self.final_health,
            damage_dealt: self.damage_dealt,
            damage_taken: self.damage_taken,
            survived: self.survived,
        }
    }
}

/// Resource to track headless skirmish state
#[derive(Resource)]
pub struct HeadlessSkirmishState {
    /// Maximum skirmish duration before declaring a draw
    pub max_duration: f32,
    /// Elapsed skirmish time
    pub elapsed_time: f32,
    /// Custom output path for the skirmish log
    pub output_path: Option<String>,
    /// Whether the skirmish has completed
    pub skirmish_complete: bool,
    /// Random seed for deterministic simulation (if provided)
    pub random_seed: Option<u64>,
    /// Stats of fighters captured at the moment they fell; the registry
    /// despawns the dead, so survivors are the only entities left to query
    pub fallen: Vec<FighterResult>,
    /// Skirmish result (populated when the skirmish completes)
    pub result: Option<SkirmishResult>,
}

/// Plugin for headless skirmish execution
pub struct HeadlessPlugin {
    pub config: SkirmishConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(HeadlessSkirmishState {
                max_duration: self.config.max_duration_secs,
                elapsed_time: 0.0,
                output_path: self.config.output_path.clone(),
                skirmish_complete: false,
                random_seed: self.config.random_seed,
                fallen: Vec::new(),
                result: None,
            });

        // Fallen-fighter stats must be read before the despawn commands
        // flush at the end of Cleanup, so the recorder runs inside that
        // phase ahead of the teardown system
        app.add_systems(Startup, headless_setup_skirmish)
            .add_systems(
                Update,
                headless_record_fallen
                    .in_set(CombatSystemPhase::Cleanup)
                    .before(process_deaths),
            )
            .add_systems(
                Update,
                (headless_track_time, headless_check_skirmish_end)
                    .chain()
                    .after(CombatSystemPhase::Cleanup),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

///// Setup system for a headless skirmish: spawn the hero at the origin and
/// the raiders on a ring around it, then register cadence callbacks that
/// feed attack triggers into the combat systems.
fn headless_setup_skirmish(
    mut commands: Commands,
    config: Res<SkirmishConfig>,
    state: Res<HeadlessSkirmishState>,
    mut scheduler: ResMut<AttackScheduler>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::SkirmishEvent,
        "Skirmish started (headless mode)".to_string(),
    );

    let game_rng = match state.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };
    commands.insert_resource(game_rng);

    // Hero
    let hero_kinds = config.hero_kinds();
    let hero = commands
        .spawn((
            Transform::from_xyz(0.0, 0.0, 0.0),
            Fighter::new("Hero", Faction::Hero, HERO_MAX_HEALTH, HERO_RADIUS),
            Arsenal::new(hero_kinds.iter().copied()),
        ))
        .id();

    let mut hero_handles: SmallVec<[_; 2]> = SmallVec::new();
    for (i, kind) in hero_kinds.iter().copied().enumerate() {
        // Stagger slots slightly so multi-attack heroes don't burst
        let handle = scheduler.every_after(
            config.hero_cadence_secs + i as f32 * 0.1,
            config.hero_cadence_secs,
            move |commands| {
                commands.send_event(AttackTriggerEvent {
                    owner: hero,
                    kind,
                    target_pos: None,
                });
            },
        );
        hero_handles.push(handle);
    }
    commands.entity(hero).insert(CadenceHandles {
        handles: hero_handles,
    });

    // Raiders on the spawn ring
    let raider_count = config.raiders.len();
    for (i, name) in config.raiders.iter().enumerate() {
        let Some(kind) = AttackKind::from_name(name) else {
            // Config was validated at load; skip rather than crash
            warn!("Skipping raider with unknown attack '{}'", name);
            continue;
        };
        let angle = TAU * i as f32 / raider_count as f32;
        let position = Vec2::new(angle.cos(), angle.sin()) * SPAWN_RING_RADIUS;
        let raider = commands
            .spawn((
                Transform::from_xyz(position.x, position.y, 0.0),
                Fighter::new(
                    format!("Raider {} ({})", i + 1, name),
                    Faction::Raider,
                    RAIDER_MAX_HEALTH,
                    RAIDER_RADIUS,
                ),
                Arsenal::new([kind]),
            ))
            .id();
        let handle = scheduler.every_after(
            config.raider_cadence_secs + i as f32 * RAIDER_CADENCE_STAGGER_SECS,
            config.raider_cadence_secs,
            move |commands| {
                commands.send_event(AttackTriggerEvent {
                    owner: raider,
                    kind,
                    target_pos: None,
                });
            },
        );
        commands.entity(raider).insert(CadenceHandles {
            handles: smallvec![handle],
        });
    }

    info!(
        "Headless skirmish setup complete: hero with {} attacks vs {} raiders",
        hero_kinds.len(),
        raider_count
    );
}

/// Capture final stats for fighters the moment they fall. Their entities
/// despawn at the end of the tick, so this is the last chance to read them.
fn headless_record_fallen(
    mut deaths: EventReader<FighterDeathEvent>,
    fighters: Query<&Fighter>,
    mut state: ResMut<HeadlessSkirmishState>,
) {
    for death in deaths.read() {
        if let Ok(fighter) = fighters.get(death.victim) {
            state.fallen.push(FighterResult::from_fighter(fighter));
        }
    }
}

/// Track elapsed skirmish time (used for timeout detection)
fn headless_track_time(time: Res<Time>, mut state: ResMut<HeadlessSkirmishState>) {
    if !state.skirmish_complete {
        state.elapsed_time += time.delta_secs();
    }
}

/// Check if the skirmish has ended (a side eliminated, or timeout)
fn headless_check_skirmish_end(
    fighters: Query<&Fighter>,
    combat_log: Res<CombatLog>,
    mut state: ResMut<HeadlessSkirmishState>,
) {
    if state.skirmish_complete {
        return;
    }

    // Timeout first
    if state.elapsed_time >= state.max_duration {
        info!(
            "Skirmish timed out after {:.1}s - declaring DRAW",
            state.elapsed_time
        );
        finish_skirmish(&fighters, &combat_log, None, &mut state);
        return;
    }

    let hero_alive = fighters
        .iter()
        .any(|f| f.faction == Faction::Hero && f.is_alive());
    let raiders_alive = fighters
        .iter()
        .any(|f| f.faction == Faction::Raider && f.is_alive());

    if !hero_alive || !raiders_alive {
        let winner = if !hero_alive && !raiders_alive {
            info!("Skirmish ended in a DRAW (both sides eliminated simultaneously)!");
            None
        } else if hero_alive {
            info!("Skirmish ended! The hero prevails!");
            Some(Faction::Hero)
        } else {
            info!("Skirmish ended! The raiders prevail!");
            Some(Faction::Raider)
        };
        finish_skirmish(&fighters, &combat_log, winner, &mut state);
    }
}

/// Assemble the result from survivors plus recorded fallen, save the log,
/// and mark the skirmish complete.
fn finish_skirmish(
    fighters: &Query<&Fighter>,
    combat_log: &Res<CombatLog>,
    winner: Option<Faction>,
    state: &mut HeadlessSkirmishState,
) {
    let mut results: Vec<FighterResult> = state.fallen.clone();
    for fighter in fighters.iter() {
        if fighter.is_alive() {
            results.push(FighterResult::from_fighter(fighter));
        }
    }
    // Heroes first, then raiders, stable within each faction
    results.sort_by_key(|r| r.faction != Faction::Hero);

    let metadata = SkirmishMetadata {
        winner,
        fighters: results.iter().map(|r| r.to_metadata()).collect(),
    };
    match combat_log.save_to_file(&metadata, state.output_path.as_deref()) {
        Ok(filename) => {
            println!("Skirmish complete. Log saved to: {}", filename);
        }
        Err(e) => {
            eprintln!("Failed to save combat log: {}", e);
        }
    }

    state.result = Some(SkirmishResult {
        winner,
        skirmish_time: state.elapsed_time,
        fighters: results,
        random_seed: state.random_seed,
    });
    state.skirmish_complete = true;
}

/// Exit the app when the skirmish is complete
fn headless_exit_on_complete(
    state: Res<HeadlessSkirmishState>,
    mut exit: EventWriter<AppExit>,
) {
    if state.skirmish_complete {
        exit.send(AppExit::Success);
    }
}

/// Run a headless skirmish with the given configuration
pub fn run_headless_skirmish(config: SkirmishConfig) -> Result<(), String> {
    config.validate()?;

    println!("Starting headless skirmish simulation...");
    println!("  Hero attacks: {:?}", config.hero_attacks);
    println!("  Raiders: {:?}", config.raiders);
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    App::new()
        // Minimal plugins - no window, no rendering
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        // Transform and hierarchy plugins needed for entity positions
        .add_plugins(TransformPlugin)
        .add_plugins(HierarchyPlugin)
        // Load attack definitions from config
        .add_plugins(AttackConfigPlugin)
        // Core combat engine
        .add_plugins(CombatPlugin)
        // Our headless skirmish plugin
        .add_plugins(HeadlessPlugin { config })
        .run();

    Ok(())
}
