//! Note expiry and judgement bookkeeping - sweep_expired, apply_judgement.

use super::GameEngine;
use crate::models::gimmick::{
    Gimmick, NOTE_RUSH_CADENCE, NOTE_RUSH_SECONDS, SLOW_MOTION_RATE, SLOW_MOTION_SECONDS,
};
use crate::models::stats::Judgement;
use crate::models::threat::SessionPhase;
use crate::shared::messages::EngineEvent;

impl GameEngine {
    /// Auto-misses every note whose late window has passed.
    ///
    /// A note stays hittable until `target + tolerance`; only past that point
    /// is "did nothing" punished. The tolerance is re-read after each miss
    /// because the window tightens as the threat rises.
    pub(crate) fn sweep_expired(&mut self, now: f64) {
        while self.phase == SessionPhase::Playing {
            let tolerance = self.tolerance();
            let expired = self
                .notes
                .iter()
                .position(|n| !n.resolved && now > n.target_time + tolerance);
            let Some(idx) = expired else { break };

            let id = self.notes[idx].id;
            self.notes[idx].resolved = true;
            self.emit(EngineEvent::NoteResolved {
                id,
                tier: Judgement::Miss,
            });
            self.apply_judgement(Judgement::Miss);
        }

        self.notes.retain(|n| !n.resolved);
    }

    /// Applies a judgement to the session state (combo, misses, threat).
    ///
    /// The only place counters move, whether the judgement came from an
    /// input or from an expired note.
    pub(crate) fn apply_judgement(&mut self, judgement: Judgement) {
        self.last_judgement = Some(judgement);
        self.hit_stats.record(judgement);
        self.emit(EngineEvent::Judgement(judgement));

        if judgement.is_hit() {
            let combo = self.threat.record_hit();
            self.emit(EngineEvent::ComboChanged(combo));
            if let Some(gimmick) = Gimmick::for_combo(combo) {
                log::info!("ENGINE: Combo {} fires {:?}", combo, gimmick);
                self.emit(EngineEvent::GimmickTriggered(gimmick));
                self.apply_gimmick(gimmick);
            }
        } else {
            let game_over = self.threat.record_miss();
            self.emit(EngineEvent::ComboChanged(0));
            self.emit(EngineEvent::MissChanged {
                misses: self.threat.misses,
                max: self.threat.max_misses,
            });
            if game_over {
                self.phase = SessionPhase::GameOver;
                log::info!(
                    "ENGINE: Game over - {}/{} misses",
                    self.threat.misses,
                    self.threat.max_misses
                );
                self.emit(EngineEvent::GameOver);
            }
        }
    }

    /// Engine-side effects of milestone gimmicks.
    ///
    /// Most gimmicks are presentation-only; these two bend the scheduler
    /// until an audio-clock deadline.
    fn apply_gimmick(&mut self, gimmick: Gimmick) {
        let now = self.audio_clock;
        match gimmick {
            Gimmick::SlowMotion => {
                self.travel_seconds = self.base_travel_seconds / SLOW_MOTION_RATE;
                self.slow_motion_until = Some(now + SLOW_MOTION_SECONDS);
            }
            Gimmick::NoteRush => {
                self.rush_until = Some(now + NOTE_RUSH_SECONDS);
                self.rush_next_spawn =
                    now + NOTE_RUSH_CADENCE * self.clock.config().seconds_per_beat();
            }
            _ => {}
        }
    }
}
