//! Combat logging
//!
//! Records all combat events for post-skirmish analysis and the saved
//! text report.

use bevy::prelude::*;
use std::collections::HashMap;

use super::components::Faction;

/// A single entry in the combat log
#[derive(Debug, Clone)]
pub struct CombatLogEntry {
    /// Timestamp in skirmish time (seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Fighter that caused the event, if any
    pub source: Option<String>,
    /// Fighter the event happened to, if any
    pub target: Option<String>,
    /// Damage amount for damage entries
    pub amount: f32,
    /// Whether a damage entry was a critical hit
    pub is_crit: bool,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatLogEventType {
    /// Damage applied to a fighter
    Damage,
    /// An attack cycle was triggered
    AttackTriggered,
    /// Fighter died
    Death,
    /// Skirmish event (start, end, timeout)
    SkirmishEvent,
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current skirmish time
    pub skirmish_time: f32,
}

impl CombatLog {
    /// Clear the log for a new skirmish
    pub fn clear(&mut self) {
        self.entries.clear();
        self.skirmish_time = 0.0;
    }

    /// Add a plain entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.skirmish_time,
            event_type,
            source: None,
            target: None,
            amount: 0.0,
            is_crit: false,
            message,
        });
    }

    /// Record applied damage with structured fields for aggregation
    pub fn log_damage(
        &mut self,
        source: String,
        target: String,
        amount: f32,
        is_crit: bool,
        message: String,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.skirmish_time,
            event_type: CombatLogEventType::Damage,
            source: Some(source),
            target: Some(target),
            amount,
            is_crit,
            message,
        });
    }

    /// Record a death, attributed to the killer
    pub fn log_death(&mut self, killer: String, victim: String, message: String) {
        self.entries.push(CombatLogEntry {
            timestamp: self.skirmish_time,
            event_type: CombatLogEventType::Death,
            source: Some(killer),
            target: Some(victim),
            amount: 0.0,
            is_crit: false,
            message,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Total damage applied, grouped by source fighter
    pub fn damage_by_source(&self) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for entry in &self.entries {
            if entry.event_type != CombatLogEventType::Damage {
                continue;
            }
            if let Some(source) = &entry.source {
                *totals.entry(source.clone()).or_insert(0.0) += entry.amount;
            }
        }
        totals
    }

    /// Number of killing blows attributed to a fighter
    pub fn killing_blows(&self, fighter: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                e.event_type == CombatLogEventType::Death && e.source.as_deref() == Some(fighter)
            })
            .count()
    }

    /// Names of fighters that died, in order
    pub fn deaths(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.event_type == CombatLogEventType::Death)
            .filter_map(|e| e.target.as_deref())
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Write the full log plus the skirmish summary to a text file.
    /// Returns the path written to.
    pub fn save_to_file(
        &self,
        metadata: &SkirmishMetadata,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let filename = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("skirmish_log_{}.txt", stamp)
            }
        };

        let mut report = String::new();
        report.push_str("=== Skirmish Report ===\n");
        match metadata.winner {
            Some(faction) => report.push_str(&format!("Winner: {}\n", faction.name())),
            None => report.push_str("Winner: Draw\n"),
        }
        report.push_str(&format!("Duration: {:.1}s\n\n", self.skirmish_time));

        report.push_str("--- Fighters ---\n");
        for fighter in &metadata.fighters {
            report.push_str(&format!(
                "{} ({}): {:.0}/{:.0} HP, dealt {:.0}, taken {:.0}, {}\n",
                fighter.name,
                fighter.faction.name(),
                fighter.final_health,
                fighter.max_health,
                fighter.damage_dealt,
                fighter.damage_taken,
                if fighter.survived { "survived" } else { "died" },
            ));
        }

        report.push_str("\n--- Events ---\n");
        for entry in &self.entries {
            report.push_str(&format!("[{:8.2}] {}\n", entry.timestamp, entry.message));
        }

        std::fs::write(&filename, report)
            .map_err(|e| format!("Failed to write {}: {}", filename, e))?;
        Ok(filename)
    }
}

/// Final per-fighter numbers for the report header.
#[derive(Debug, Clone)]
pub struct FighterMetadata {
    pub name: String,
    pub faction: Faction,
    pub max_health: f32,
    pub final_health: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub survived: bool,
}

/// Skirmish outcome metadata passed to `save_to_file`.
#[derive(Debug, Clone)]
pub struct SkirmishMetadata {
    pub winner: Option<Faction>,
    pub fighters: Vec<FighterMetadata>,
}
