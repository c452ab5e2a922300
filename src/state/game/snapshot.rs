//! Snapshot creation for GameEngine - get_snapshot.

use super::GameEngine;
use crate::shared::snapshot::GameplaySnapshot;

impl GameEngine {
    /// Creates a snapshot of the current engine state for rendering.
    pub fn get_snapshot(&self) -> GameplaySnapshot {
        GameplaySnapshot {
            audio_time: self.audio_clock,
            phase: self.phase,
            notes: self.notes.iter().filter(|n| !n.resolved).copied().collect(),
            travel_seconds: self.travel_seconds,
            combo: self.threat.combo,
            misses: self.threat.misses,
            max_misses: self.threat.max_misses,
            threat_level: self.threat.threat_level(),
            hidden: self.threat.is_hidden(),
            hit_stats: self.hit_stats.clone(),
            accuracy: self.hit_stats.calculate_accuracy(),
            last_judgement: self.last_judgement,
            judgement_position: self.judgement_position,
        }
    }
}
